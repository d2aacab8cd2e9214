//! Keyless sessions driven through their proof lifecycle

use movekey_account::account::{Account, KeylessAccount, KeylessAccountParams};
use movekey_account::crypto::keyless::ZeroKnowledgeSig;
use movekey_account::keyless::{ProofFetchStatus, ProofSource, ProofState};
use movekey_account::test_utils::{
    FAR_FUTURE_SECS, keyless_params, test_proof, transfer_transaction,
};
use movekey_account::transaction::{AnyRawTransaction, TransactionAndProof};
use movekey_account::{AccountError, KeylessError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};

fn pending_params(
    sub: &str,
    fetch: impl FnOnce() -> Result<ZeroKnowledgeSig, String> + Send + 'static,
    on_complete: impl FnOnce(ProofFetchStatus) + Send + 'static,
) -> KeylessAccountParams {
    let mut params = keyless_params(sub, 9, FAR_FUTURE_SECS);
    params.proof = ProofSource::pending(fetch, on_complete);
    params
}

#[test]
fn test_failed_fetch_reports_once_and_blocks_signing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let status = Arc::new(Mutex::new(None));
    let (calls_cb, status_cb) = (Arc::clone(&calls), Arc::clone(&status));

    let account = KeylessAccount::new(pending_params(
        "alice",
        || Err("prover returned 503".to_string()),
        move |outcome| {
            calls_cb.fetch_add(1, Ordering::SeqCst);
            *status_cb.lock().unwrap() = Some(outcome);
        },
    ))
    .unwrap();

    assert_eq!(
        account.wait_for_proof(),
        ProofState::Failed("prover returned 503".to_string())
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        *status.lock().unwrap(),
        Some(ProofFetchStatus::Failed("prover returned 503".to_string()))
    );

    assert!(matches!(
        account.sign(b"message"),
        Err(AccountError::Keyless(KeylessError::ProofNotFound))
    ));
    assert!(matches!(
        Account::from(account.clone()).to_bytes(),
        Err(AccountError::Keyless(KeylessError::ProofNotFound))
    ));
}

#[test]
fn test_pending_proof_signs_after_release() {
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let account = KeylessAccount::new(pending_params(
        "bob",
        move || {
            release_rx.recv().map_err(|e| e.to_string())?;
            Ok(test_proof())
        },
        |_| {},
    ))
    .unwrap();

    assert_eq!(account.proof_state(), ProofState::Unresolved);
    assert!(matches!(
        account.sign(b"early"),
        Err(AccountError::Keyless(KeylessError::ProofNotFound))
    ));

    release_tx.send(()).unwrap();
    assert_eq!(account.wait_for_proof(), ProofState::Resolved(test_proof()));
    let signature = account.sign(b"late").unwrap();
    assert!(account.verify_signature(b"late", &signature));
}

#[test]
fn test_clones_share_the_proof() {
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let account = KeylessAccount::new(pending_params(
        "carol",
        move || {
            release_rx.recv().map_err(|e| e.to_string())?;
            Ok(test_proof())
        },
        |_| {},
    ))
    .unwrap();
    let clone = account.clone();

    release_tx.send(()).unwrap();
    account.wait_for_proof();
    assert_eq!(clone.proof(), Some(test_proof()));
}

#[test]
fn test_expired_ephemeral_key_refuses_to_sign() {
    let account = KeylessAccount::new(keyless_params("dave", 4, 1)).unwrap();

    assert!(account.is_expired());
    assert!(matches!(
        account.sign(b"message"),
        Err(AccountError::Keyless(KeylessError::EphemeralKeyPairExpired))
    ));
}

#[test]
fn test_transaction_signature_commits_to_proof() {
    let account = KeylessAccount::new(keyless_params("erin", 5, FAR_FUTURE_SECS)).unwrap();
    let transaction = AnyRawTransaction::simple(transfer_transaction(account.address(), 0));
    let signature = account.sign_transaction(&transaction).unwrap();

    let with_proof = TransactionAndProof {
        transaction: transaction.signing_target(),
        proof: Some(test_proof().proof),
    }
    .signing_message()
    .unwrap();
    assert!(account.verify_signature(&with_proof, &signature));
    assert!(!account.verify_signature(&transaction.signing_message().unwrap(), &signature));
}

#[test]
fn test_persisted_session_restores_address_and_proof() {
    let account: Account = KeylessAccount::new(keyless_params("frank", 6, FAR_FUTURE_SECS))
        .unwrap()
        .into();
    let restored = Account::from_bytes(&account.to_bytes().unwrap()).unwrap();

    assert_eq!(restored.address(), account.address());
    assert_eq!(restored.public_key(), account.public_key());
    let signature = restored.sign(b"after restart").unwrap();
    assert!(account.verify_signature(b"after restart", &signature));
}
