//! Signed transactions assembled from account authenticators

use movekey_account::account::{
    Account, Ed25519Account, KeylessAccount, MultiKeyAccount, MultiKeySigner, SingleKeyAccount,
};
use movekey_account::address::AccountAddress;
use movekey_account::crypto::multi_key::MultiKey;
use movekey_account::crypto::single_key::AnyPublicKey;
use movekey_account::test_utils::{
    FAR_FUTURE_SECS, ed25519_key, keyless_params, secp256k1_key, transfer_transaction,
};
use movekey_account::transaction::AnyRawTransaction;
use movekey_account::{AccountAuthenticator, SignedTransaction, TransactionAuthenticator};

fn legacy(seed: u8) -> Account {
    Ed25519Account::new(ed25519_key(seed), None).into()
}

fn single_secp256k1(seed: u8) -> Account {
    SingleKeyAccount::new(secp256k1_key(seed), None).into()
}

fn keyless(sub: &str, seed: u8) -> KeylessAccount {
    KeylessAccount::new(keyless_params(sub, seed, FAR_FUTURE_SECS)).unwrap()
}

fn submit(raw: AnyRawTransaction, authenticator: TransactionAuthenticator) -> SignedTransaction {
    let signed = SignedTransaction::new(raw.raw_txn, authenticator);
    let bytes = signed.to_bytes();
    let decoded: SignedTransaction = movekey_bcs::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, signed);
    signed
}

#[test]
fn test_legacy_sender_uses_dedicated_variant() {
    let sender = legacy(1);
    let transaction = AnyRawTransaction::simple(transfer_transaction(sender.address(), 0));
    let authenticator = TransactionAuthenticator::for_transaction(
        &transaction,
        sender.sign_transaction_with_authenticator(&transaction).unwrap(),
        vec![],
        None,
    );
    assert!(matches!(authenticator, TransactionAuthenticator::Ed25519 { .. }));

    let signed = submit(transaction, authenticator);
    assert!(signed.verify());
    assert_eq!(signed.to_bytes()[..32], *sender.address().as_bytes());
}

#[test]
fn test_single_key_sender_wraps_in_single_sender() {
    let sender = single_secp256k1(2);
    let transaction = AnyRawTransaction::simple(transfer_transaction(sender.address(), 7));
    let authenticator = TransactionAuthenticator::for_transaction(
        &transaction,
        sender.sign_transaction_with_authenticator(&transaction).unwrap(),
        vec![],
        None,
    );
    assert!(matches!(
        authenticator,
        TransactionAuthenticator::SingleSender {
            sender: AccountAuthenticator::SingleKey { .. }
        }
    ));
    assert!(submit(transaction, authenticator).verify());
}

#[test]
fn test_tampered_transaction_fails_verification() {
    let sender = legacy(3);
    let transaction = AnyRawTransaction::simple(transfer_transaction(sender.address(), 0));
    let authenticator = TransactionAuthenticator::for_transaction(
        &transaction,
        sender.sign_transaction_with_authenticator(&transaction).unwrap(),
        vec![],
        None,
    );
    let mut raw = transaction.raw_txn;
    raw.sequence_number += 1;
    assert!(!SignedTransaction::new(raw, authenticator).verify());
}

#[test]
fn test_multi_agent_signers_share_one_message() {
    let sender = legacy(4);
    let second = single_secp256k1(5);
    let transaction = AnyRawTransaction::multi_agent(
        transfer_transaction(sender.address(), 0),
        vec![second.address()],
    );
    let authenticator = TransactionAuthenticator::for_transaction(
        &transaction,
        sender.sign_transaction_with_authenticator(&transaction).unwrap(),
        vec![second.sign_transaction_with_authenticator(&transaction).unwrap()],
        None,
    );
    assert!(matches!(authenticator, TransactionAuthenticator::MultiAgent { .. }));
    assert!(submit(transaction, authenticator).verify());
}

#[test]
fn test_fee_payer_flow() {
    let sender = single_secp256k1(6);
    let fee_payer = legacy(7);

    // The sender signs before the sponsor is known
    let unsponsored = AnyRawTransaction::fee_payer(
        transfer_transaction(sender.address(), 1),
        vec![],
        AccountAddress::ZERO,
    );
    let sender_auth = sender.sign_transaction_with_authenticator(&unsponsored).unwrap();

    let sponsored = AnyRawTransaction {
        fee_payer_address: Some(fee_payer.address()),
        ..unsponsored
    };
    let fee_payer_auth = fee_payer.sign_transaction_with_authenticator(&sponsored).unwrap();
    let authenticator = TransactionAuthenticator::for_transaction(
        &sponsored,
        sender_auth,
        vec![],
        Some(fee_payer_auth),
    );
    let TransactionAuthenticator::FeePayer {
        fee_payer_address, ..
    } = &authenticator
    else {
        panic!("expected fee payer authenticator");
    };
    assert_eq!(*fee_payer_address, fee_payer.address());
    assert!(submit(sponsored, authenticator).verify());
}

#[test]
fn test_fee_payer_must_sign_over_its_own_address() {
    let sender = legacy(8);
    let fee_payer = legacy(9);
    let unsponsored = AnyRawTransaction::fee_payer(
        transfer_transaction(sender.address(), 1),
        vec![],
        AccountAddress::ZERO,
    );
    let authenticator = TransactionAuthenticator::FeePayer {
        sender: sender.sign_transaction_with_authenticator(&unsponsored).unwrap(),
        secondary_signer_addresses: vec![],
        secondary_signers: vec![],
        fee_payer_address: fee_payer.address(),
        fee_payer_signer: fee_payer.sign_transaction_with_authenticator(&unsponsored).unwrap(),
    };
    assert!(!SignedTransaction::new(unsponsored.raw_txn, authenticator).verify());
}

#[test]
fn test_multi_key_sender() {
    let keys = vec![
        AnyPublicKey::from(ed25519_key(10).public_key()),
        AnyPublicKey::from(secp256k1_key(11).public_key()),
        AnyPublicKey::from(ed25519_key(12).public_key()),
    ];
    let sender = Account::from(
        MultiKeyAccount::new(
            MultiKey::new(keys, 2).unwrap(),
            vec![
                MultiKeySigner::Ed25519(Ed25519Account::new(ed25519_key(12), None)),
                MultiKeySigner::SingleKey(SingleKeyAccount::new(secp256k1_key(11), None)),
            ],
            None,
        )
        .unwrap(),
    );
    let transaction = AnyRawTransaction::simple(transfer_transaction(sender.address(), 0));
    let sender_auth = sender.sign_transaction_with_authenticator(&transaction).unwrap();
    assert_eq!(sender_auth.number_of_signatures(), 2);

    let authenticator =
        TransactionAuthenticator::for_transaction(&transaction, sender_auth, vec![], None);
    assert!(submit(transaction, authenticator).verify());
}

#[test]
fn test_keyless_sender() {
    let sender = Account::from(keyless("sender", 13));
    let transaction = AnyRawTransaction::simple(transfer_transaction(sender.address(), 0));
    let authenticator = TransactionAuthenticator::for_transaction(
        &transaction,
        sender.sign_transaction_with_authenticator(&transaction).unwrap(),
        vec![],
        None,
    );
    assert!(matches!(
        authenticator,
        TransactionAuthenticator::SingleSender {
            sender: AccountAuthenticator::SingleKey { .. }
        }
    ));

    let mut tampered = transaction.raw_txn.clone();
    tampered.sequence_number += 1;
    assert!(!SignedTransaction::new(tampered, authenticator.clone()).verify());
    assert!(submit(transaction, authenticator).verify());
}

#[test]
fn test_keyless_sender_with_fee_payer() {
    let sender = Account::from(keyless("sponsored", 14));
    let fee_payer = legacy(15);
    let unsponsored = AnyRawTransaction::fee_payer(
        transfer_transaction(sender.address(), 4),
        vec![],
        AccountAddress::ZERO,
    );
    let sender_auth = sender.sign_transaction_with_authenticator(&unsponsored).unwrap();
    let sponsored = AnyRawTransaction {
        fee_payer_address: Some(fee_payer.address()),
        ..unsponsored
    };
    let authenticator = TransactionAuthenticator::for_transaction(
        &sponsored,
        sender_auth,
        vec![],
        Some(fee_payer.sign_transaction_with_authenticator(&sponsored).unwrap()),
    );
    assert!(submit(sponsored, authenticator).verify());
}

#[test]
fn test_multi_key_sender_with_keyless_member() {
    let member = keyless("member", 16);
    let keys = vec![
        AnyPublicKey::from(ed25519_key(17).public_key()),
        member.any_public_key(),
        AnyPublicKey::from(secp256k1_key(18).public_key()),
    ];
    let sender = Account::from(
        MultiKeyAccount::new(
            MultiKey::new(keys, 2).unwrap(),
            vec![
                MultiKeySigner::Keyless(member),
                MultiKeySigner::SingleKey(SingleKeyAccount::new(secp256k1_key(18), None)),
            ],
            None,
        )
        .unwrap(),
    );
    let transaction = AnyRawTransaction::simple(transfer_transaction(sender.address(), 0));
    let sender_auth = sender.sign_transaction_with_authenticator(&transaction).unwrap();
    assert!(sender_auth.verify_transaction(&transaction));
    assert!(!sender_auth.verify(&transaction.signing_message().unwrap()));

    let authenticator =
        TransactionAuthenticator::for_transaction(&transaction, sender_auth, vec![], None);
    assert!(submit(transaction, authenticator).verify());
}
