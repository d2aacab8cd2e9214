//! Signer order, bitmaps and thresholds across the multi-signer accounts

use movekey_account::account::{
    Account, Ed25519Account, KeylessAccount, MultiEd25519Account, MultiKeyAccount, MultiKeySigner,
    SingleKeyAccount,
};
use movekey_account::crypto::CryptoError;
use movekey_account::crypto::multi_ed25519::MultiEd25519PublicKey;
use movekey_account::crypto::multi_key::MultiKey;
use movekey_account::crypto::single_key::{AnyPublicKey, AnySignature};
use movekey_account::test_utils::{
    FAR_FUTURE_SECS, ed25519_key, keyless_params, secp256k1_key, transfer_transaction,
};
use movekey_account::transaction::AnyRawTransaction;
use movekey_account::{AccountError, AccountSignature};

fn mixed_multi_key(threshold: u8) -> (MultiKey, KeylessAccount) {
    let keyless = KeylessAccount::new(keyless_params("member", 20, FAR_FUTURE_SECS)).unwrap();
    let keys = vec![
        AnyPublicKey::from(ed25519_key(1).public_key()),
        AnyPublicKey::from(secp256k1_key(2).public_key()),
        keyless.any_public_key(),
        AnyPublicKey::from(ed25519_key(4).public_key()),
    ];
    (MultiKey::new(keys, threshold).unwrap(), keyless)
}

#[test]
fn test_multi_key_signatures_follow_member_order() {
    let (multi_key, keyless) = mixed_multi_key(3);
    let account = MultiKeyAccount::new(
        multi_key,
        vec![
            MultiKeySigner::Ed25519(Ed25519Account::new(ed25519_key(4), None)),
            MultiKeySigner::Keyless(keyless),
            MultiKeySigner::SingleKey(SingleKeyAccount::new(secp256k1_key(2), None)),
        ],
        None,
    )
    .unwrap();
    assert_eq!(account.signer_indices(), vec![1, 2, 3]);

    let signature = account.sign(b"ordered").unwrap();
    assert_eq!(signature.bitmap(), &[0b0111_0000, 0, 0, 0]);
    assert!(matches!(
        signature.signatures(),
        [AnySignature::Secp256k1(_), AnySignature::Keyless(_), AnySignature::Ed25519(_)]
    ));
    assert!(account.public_key().verify_signature(b"ordered", &signature));
}

#[test]
fn test_multi_key_transaction_uses_each_signers_message() {
    let (multi_key, keyless) = mixed_multi_key(2);
    let keyless_key = keyless.public_key().clone();
    let account = MultiKeyAccount::new(
        multi_key,
        vec![
            MultiKeySigner::Keyless(keyless),
            MultiKeySigner::Ed25519(Ed25519Account::new(ed25519_key(1), None)),
        ],
        None,
    )
    .unwrap();
    let transaction = AnyRawTransaction::simple(transfer_transaction(account.address(), 3));
    let message = transaction.signing_message().unwrap();

    let signature = account.sign_transaction(&transaction).unwrap();
    let [AnySignature::Ed25519(ed25519), keyless_sig @ AnySignature::Keyless(keyless)] =
        signature.signatures()
    else {
        panic!("unexpected signature order");
    };
    assert!(ed25519_key(1).public_key().verify_signature(&message, ed25519));

    let bound = transaction.signing_message_for(keyless_sig).unwrap();
    assert_ne!(bound, message);
    assert!(keyless_key.verify_signature(&bound, keyless));
    assert!(!keyless_key.verify_signature(&message, keyless));
    assert!(account.public_key().verify_signature_with(&signature, |pk, sig| {
        pk.verify_signature(&transaction.signing_message_for(sig).unwrap(), sig)
    }));
}

#[test]
fn test_multi_key_threshold_must_match_exactly() {
    for count in [1, 3] {
        let (multi_key, _) = mixed_multi_key(2);
        let signers = [1, 4, 5][..count]
            .iter()
            .map(|&seed| MultiKeySigner::Ed25519(Ed25519Account::new(ed25519_key(seed), None)))
            .collect::<Vec<_>>();
        let result = MultiKeyAccount::new(multi_key, signers, None);
        assert!(matches!(
            result,
            Err(AccountError::ThresholdMismatch { threshold: 2, signers }) if signers == count
        ));
    }
}

#[test]
fn test_multi_key_rejects_duplicates_and_outsiders() {
    let (multi_key, _) = mixed_multi_key(2);
    let duplicate = MultiKeyAccount::new(
        multi_key.clone(),
        vec![
            MultiKeySigner::Ed25519(Ed25519Account::new(ed25519_key(1), None)),
            MultiKeySigner::SingleKey(SingleKeyAccount::new(ed25519_key(1), None)),
        ],
        None,
    );
    assert!(matches!(
        duplicate,
        Err(AccountError::Crypto(CryptoError::DuplicateBit(0)))
    ));

    let outsider = MultiKeyAccount::new(
        multi_key,
        vec![
            MultiKeySigner::Ed25519(Ed25519Account::new(ed25519_key(1), None)),
            MultiKeySigner::Ed25519(Ed25519Account::new(ed25519_key(9), None)),
        ],
        None,
    );
    assert!(matches!(
        outsider,
        Err(AccountError::Crypto(CryptoError::KeyNotFound))
    ));
}

#[test]
fn test_multi_ed25519_signs_in_index_order() {
    let keys: Vec<_> = (1..=5).map(ed25519_key).collect();
    let public_key =
        MultiEd25519PublicKey::new(keys.iter().map(|k| k.public_key()).collect(), 3).unwrap();
    let account = MultiEd25519Account::new(
        public_key,
        vec![keys[4].clone(), keys[0].clone(), keys[2].clone()],
        None,
    )
    .unwrap();
    assert_eq!(account.signer_indices(), vec![0, 2, 4]);

    let signature = account.sign(b"legacy").unwrap();
    assert_eq!(signature.bitmap(), &[0b1010_1000, 0, 0, 0]);
    assert_eq!(signature.signatures()[0], keys[0].sign(b"legacy"));
    assert_eq!(signature.signatures()[2], keys[4].sign(b"legacy"));
    assert!(account.verify_signature(b"legacy", &signature));
}

#[test]
fn test_multi_accounts_verify_through_the_enum() {
    let keys: Vec<_> = (10..=12).map(ed25519_key).collect();
    let public_key =
        MultiEd25519PublicKey::new(keys.iter().map(|k| k.public_key()).collect(), 2).unwrap();
    let account = Account::from(
        MultiEd25519Account::new(public_key, vec![keys[2].clone(), keys[1].clone()], None)
            .unwrap(),
    );

    let signature = account.sign(b"enum").unwrap();
    assert!(matches!(signature, AccountSignature::MultiEd25519(_)));
    assert!(account.verify_signature(b"enum", &signature));
    assert!(!account.verify_signature(b"other", &signature));

    let restored = Account::from_bytes(&account.to_bytes().unwrap()).unwrap();
    assert_eq!(restored.address(), account.address());
    assert_eq!(restored.sign(b"enum").unwrap(), signature);
}
