//! Batch submission
//!
//! [`BatchSubmitter::submit`] takes one or more call descriptors, folds them
//! into exactly one top-level `Utility` batch, signs it with the configured
//! identity and waits for finalization.
//!
//! One call becomes a non-atomic `Utility.batch`; several calls become an
//! atomic `Utility.batch_all`. A lone descriptor that is already a batch is
//! submitted unchanged.
//!
//! Submissions are never retried. Two concurrent submissions signed by the
//! same seed race for the same account nonce; serializing them is up to the
//! caller.

use crate::call::{batch, CallDescriptor};
use crate::error::{Result, WasmAssetHubError};
use std::fmt;

#[cfg(not(target_arch = "wasm32"))]
pub use native::BatchSubmitter;

/// Input accepted by [`BatchSubmitter::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum Calls {
    One(CallDescriptor),
    Many(Vec<CallDescriptor>),
}

impl Calls {
    pub fn into_vec(self) -> Vec<CallDescriptor> {
        match self {
            Calls::One(call) => vec![call],
            Calls::Many(calls) => calls,
        }
    }
}

impl From<CallDescriptor> for Calls {
    fn from(call: CallDescriptor) -> Self {
        Calls::One(call)
    }
}

impl From<Vec<CallDescriptor>> for Calls {
    fn from(calls: Vec<CallDescriptor>) -> Self {
        Calls::Many(calls)
    }
}

impl<const N: usize> From<[CallDescriptor; N]> for Calls {
    fn from(calls: [CallDescriptor; N]) -> Self {
        Calls::Many(calls.into())
    }
}

/// Fold calls into the single top-level batch that gets signed
pub fn wrap_calls(mut calls: Vec<CallDescriptor>) -> Result<CallDescriptor> {
    match calls.len() {
        0 => Err(WasmAssetHubError::EmptyBatch),
        1 => {
            let call = calls.remove(0);
            if call.is_batch() {
                Ok(call)
            } else {
                batch(vec![call], false)
            }
        }
        _ => batch(calls, true),
    }
}

/// Lifecycle of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Signing,
    Submitting,
    AwaitingFinalization,
    Finalized,
    Failed,
}

impl SubmissionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionState::Finalized | SubmissionState::Failed)
    }

    fn can_advance_to(self, next: SubmissionState) -> bool {
        use SubmissionState::*;
        match (self, next) {
            (Idle, Validating)
            | (Validating, Signing)
            | (Signing, Submitting)
            | (Submitting, AwaitingFinalization)
            | (AwaitingFinalization, Finalized) => true,
            (current, Failed) => !current.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Enforces the submission state order
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    state: SubmissionState,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn advance(&mut self, next: SubmissionState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(WasmAssetHubError::InvalidInput(format!(
                "Illegal submission transition {} -> {}",
                self.state, next
            )));
        }
        tracing::debug!(from = %self.state, to = %next, "submission state");
        self.state = next;
        Ok(())
    }

    /// Move to `Failed` and hand `err` back for propagation
    pub fn fail(&mut self, err: WasmAssetHubError) -> WasmAssetHubError {
        if !self.state.is_terminal() {
            tracing::debug!(from = %self.state, error = %err, "submission failed");
            self.state = SubmissionState::Failed;
        }
        err
    }
}

/// The finalization timeout needs tokio's timer, which is unavailable in
/// the browser build
#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use crate::client::{ChainConnector, ClientError};
    use crate::config::AssetHubConfig;
    use crate::keyring::{derive_signer, KeyPair, SecretSeed};
    use crate::receipt::{PartialReceipt, TxReceipt};
    use crate::types::Chain;
    use std::sync::Arc;

    /// Signs and submits batches through a [`ChainConnector`]
    pub struct BatchSubmitter {
        connector: Arc<dyn ChainConnector>,
        config: AssetHubConfig,
    }

    impl BatchSubmitter {
        pub fn new(connector: Arc<dyn ChainConnector>, config: AssetHubConfig) -> Self {
            BatchSubmitter { connector, config }
        }

        pub fn config(&self) -> &AssetHubConfig {
            &self.config
        }

        /// Submit `data` as one batch on `chain` and wait for finalization.
        ///
        /// The signing seed is `seed` if given, otherwise the configured
        /// `PRIVATE_KEY`. The connection opened here is left to the connector.
        pub async fn submit(
            &self,
            data: impl Into<Calls>,
            chain: &Chain,
            seed: Option<&SecretSeed>,
        ) -> Result<TxReceipt> {
            let calls = data.into().into_vec();
            let mut tracker = SubmissionTracker::new();

            tracker.advance(SubmissionState::Validating)?;
            if calls.is_empty() {
                return Err(tracker.fail(WasmAssetHubError::EmptyBatch));
            }
            for call in &calls {
                call.validate().map_err(|e| tracker.fail(e))?;
            }

            tracker.advance(SubmissionState::Signing)?;
            let seed = self.resolve_seed(seed).map_err(|e| tracker.fail(e))?;
            let signer = derive_signer(KeyPair::from_seed(&seed));
            let outer = wrap_calls(calls).map_err(|e| tracker.fail(e))?;
            let signer_address = signer
                .address(chain.address_format)
                .map_err(|e| tracker.fail(e))?;

            tracing::info!(
                chain = %chain.key,
                signer = %signer_address,
                kind = outer.kind(),
                calls = outer.leaf_count(),
                "submitting batch"
            );

            tracker.advance(SubmissionState::Submitting)?;
            let client = self
                .connector
                .connect(chain)
                .await
                .map_err(|e| tracker.fail(submission_error(e)))?;

            tracker.advance(SubmissionState::AwaitingFinalization)?;
            let timeout = self.config.finalization_timeout();
            let finalized = client.submit_signed(&outer, &signer);
            let payload = match tokio::time::timeout(timeout, finalized).await {
                Ok(Ok(payload)) => payload,
                Ok(Err(e)) => return Err(tracker.fail(submission_error(e))),
                Err(_) => {
                    tracing::warn!(
                        chain = %chain.key,
                        waited_secs = timeout.as_secs(),
                        "gave up waiting for finalization; the transaction may still finalize"
                    );
                    return Err(tracker.fail(WasmAssetHubError::SubmissionTimeout {
                        waited_secs: timeout.as_secs(),
                    }));
                }
            };

            if !payload.ok {
                let reason = payload
                    .dispatch_error
                    .clone()
                    .unwrap_or_else(|| "dispatch failed".to_string());
                return Err(tracker.fail(WasmAssetHubError::ChainExecution {
                    reason,
                    partial: PartialReceipt::from(payload),
                }));
            }

            tracker.advance(SubmissionState::Finalized)?;
            let receipt = TxReceipt::from(payload);
            tracing::info!(
                chain = %chain.key,
                block = receipt.block().number,
                tx_hash = receipt.tx_hash(),
                events = receipt.events().len(),
                "batch finalized"
            );
            Ok(receipt)
        }

        fn resolve_seed(&self, seed: Option<&SecretSeed>) -> Result<SecretSeed> {
            if let Some(seed) = seed {
                return Ok(seed.clone());
            }
            match self.config.seed() {
                Ok(seed) => Ok(seed),
                Err(WasmAssetHubError::MissingConfig(_)) => {
                    Err(WasmAssetHubError::MissingCredentials)
                }
                Err(e) => Err(e),
            }
        }
    }

    fn submission_error(err: ClientError) -> WasmAssetHubError {
        WasmAssetHubError::Submission {
            reason: err.message,
            partial: err.partial,
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::call::{mint_asset, remark, MintAssetParams};
    use crate::client::{ChainClient, ChainConnector, ClientError};
    use crate::config::AssetHubConfig;
    use crate::keyring::{KeyPair, SecretSeed, Signer};
    use crate::receipt::{BlockRef, EventRecord, FinalizedPayload, PartialReceipt};
    use crate::types::Chain;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const ALICE: &str = "15sND1xy2556eoAx6eGV6zkURiPJ9T9qJ8XMDHsYTuZezp7f";

    enum Behavior {
        Finalize { ok: bool },
        Fail(ClientError),
        Hang,
    }

    struct MockClient {
        behavior: Behavior,
        submitted: Mutex<Vec<CallDescriptor>>,
        signers: Mutex<Vec<[u8; 32]>>,
        disconnects: AtomicUsize,
    }

    #[async_trait]
    impl ChainClient for MockClient {
        async fn submit_signed(
            &self,
            call: &CallDescriptor,
            signer: &Signer,
        ) -> std::result::Result<FinalizedPayload, ClientError> {
            self.submitted.lock().unwrap().push(call.clone());
            self.signers.lock().unwrap().push(signer.public_key());
            match &self.behavior {
                Behavior::Finalize { ok } => Ok(FinalizedPayload {
                    ok: *ok,
                    dispatch_error: (!ok).then(|| "Assets.NoPermission".to_string()),
                    block: BlockRef {
                        hash: "0xbeef".to_string(),
                        number: 42,
                        index: 1,
                    },
                    events: vec![EventRecord::new("Utility", "BatchCompleted")],
                    tx_hash: "0xfeed".to_string(),
                }),
                Behavior::Fail(err) => Err(err.clone()),
                Behavior::Hang => std::future::pending().await,
            }
        }

        async fn disconnect(&self) -> std::result::Result<(), ClientError> {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct MockConnector {
        client: Arc<MockClient>,
        connects: AtomicUsize,
        refuse: bool,
    }

    #[async_trait]
    impl ChainConnector for MockConnector {
        async fn connect(
            &self,
            _chain: &Chain,
        ) -> std::result::Result<Arc<dyn ChainClient>, ClientError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if self.refuse {
                return Err(ClientError::new("connection refused"));
            }
            Ok(self.client.clone())
        }
    }

    fn mock(behavior: Behavior) -> Arc<MockConnector> {
        mock_with(behavior, false)
    }

    fn mock_with(behavior: Behavior, refuse: bool) -> Arc<MockConnector> {
        Arc::new(MockConnector {
            client: Arc::new(MockClient {
                behavior,
                submitted: Mutex::new(Vec::new()),
                signers: Mutex::new(Vec::new()),
                disconnects: AtomicUsize::new(0),
            }),
            connects: AtomicUsize::new(0),
            refuse,
        })
    }

    fn submitter(connector: &Arc<MockConnector>) -> BatchSubmitter {
        BatchSubmitter::new(
            connector.clone(),
            AssetHubConfig::default().with_private_key(SEED),
        )
    }

    fn submitted(connector: &MockConnector) -> Vec<CallDescriptor> {
        connector.client.submitted.lock().unwrap().clone()
    }

    #[test]
    fn test_wrap_single_call_is_non_atomic() {
        let outer = wrap_calls(vec![remark("solo")]).unwrap();
        assert_eq!(outer, batch(vec![remark("solo")], false).unwrap());
    }

    #[test]
    fn test_wrap_many_calls_is_atomic() {
        let outer = wrap_calls(vec![remark("a"), remark("b")]).unwrap();
        assert_eq!(outer.kind(), "Utility.batch_all");
        assert_eq!(outer.items(), &[remark("a"), remark("b")]);
    }

    #[test]
    fn test_wrap_lone_batch_unchanged() {
        let inner = batch(vec![remark("a"), remark("b")], false).unwrap();
        assert_eq!(wrap_calls(vec![inner.clone()]).unwrap(), inner);
        assert!(matches!(
            wrap_calls(vec![]),
            Err(WasmAssetHubError::EmptyBatch)
        ));
    }

    #[test]
    fn test_tracker_rejects_illegal_transitions() {
        let mut tracker = SubmissionTracker::new();
        assert!(tracker.advance(SubmissionState::Signing).is_err());
        tracker.advance(SubmissionState::Validating).unwrap();
        tracker.advance(SubmissionState::Signing).unwrap();
        tracker.fail(WasmAssetHubError::MissingCredentials);
        assert_eq!(tracker.state(), SubmissionState::Failed);
        assert!(tracker.advance(SubmissionState::Submitting).is_err());
        assert!(tracker.advance(SubmissionState::Failed).is_err());
    }

    #[tokio::test]
    async fn test_empty_submit_never_connects() {
        let connector = mock(Behavior::Finalize { ok: true });
        let err = submitter(&connector)
            .submit(Vec::<CallDescriptor>::new(), &Chain::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WasmAssetHubError::EmptyBatch));
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_single_call_submits_non_atomic_batch() {
        let connector = mock(Behavior::Finalize { ok: true });
        let receipt = submitter(&connector)
            .submit(remark("hello"), &Chain::default(), None)
            .await
            .unwrap();

        assert_eq!(receipt.block().number, 42);
        assert_eq!(receipt.tx_hash(), "0xfeed");
        assert_eq!(
            submitted(&connector),
            vec![batch(vec![remark("hello")], false).unwrap()]
        );
    }

    #[tokio::test]
    async fn test_multiple_calls_submit_atomic_batch_in_order() {
        let connector = mock(Behavior::Finalize { ok: true });
        let mint = mint_asset(MintAssetParams {
            asset_id: Some(1984),
            beneficiary: Some(ALICE.into()),
            amount: Some(10),
        })
        .unwrap();

        submitter(&connector)
            .submit(
                [remark("first"), mint.clone(), remark("last")],
                &Chain::default(),
                None,
            )
            .await
            .unwrap();

        let sent = submitted(&connector);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind(), "Utility.batch_all");
        assert_eq!(sent[0].items(), &[remark("first"), mint, remark("last")]);
    }

    #[tokio::test]
    async fn test_explicit_seed_wins_over_config() {
        let connector = mock(Behavior::Finalize { ok: true });
        let submitter = BatchSubmitter::new(
            connector.clone(),
            AssetHubConfig::default().with_private_key(SEED),
        );
        let other = SecretSeed::from_bytes(&[7u8; 32]).unwrap();

        submitter
            .submit(remark("x"), &Chain::default(), Some(&other))
            .await
            .unwrap();

        let signers = connector.client.signers.lock().unwrap().clone();
        assert_eq!(signers, vec![KeyPair::from_seed(&other).public_key()]);
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let connector = mock(Behavior::Finalize { ok: true });
        let submitter = BatchSubmitter::new(connector.clone(), AssetHubConfig::default());

        let err = submitter
            .submit(remark("x"), &Chain::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WasmAssetHubError::MissingCredentials));
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_descriptor_rejected_before_connect() {
        let connector = mock(Behavior::Finalize { ok: true });
        let bad: CallDescriptor = serde_json::from_str(
            r#"{ "type": "mintAsset", "assetId": 1, "beneficiary": "", "amount": 5 }"#,
        )
        .unwrap();

        let err = submitter(&connector)
            .submit(bad, &Chain::default(), None)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chain_execution_failure_keeps_events() {
        let connector = mock(Behavior::Finalize { ok: false });
        let err = submitter(&connector)
            .submit(vec![remark("a"), remark("b")], &Chain::default(), None)
            .await
            .unwrap_err();

        match err {
            WasmAssetHubError::ChainExecution { reason, partial } => {
                assert_eq!(reason, "Assets.NoPermission");
                assert!(partial.was_broadcast());
                assert_eq!(partial.events.len(), 1);
            }
            other => panic!("Expected ChainExecution, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_carries_partial() {
        let partial = PartialReceipt {
            tx_hash: Some("0x99".to_string()),
            ..Default::default()
        };
        let connector = mock(Behavior::Fail(
            ClientError::new("socket closed").with_partial(partial.clone()),
        ));

        let err = submitter(&connector)
            .submit(remark("x"), &Chain::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WasmAssetHubError::Submission { .. }));
        assert_eq!(err.partial_receipt(), Some(&partial));
    }

    #[tokio::test]
    async fn test_connect_failure_is_submission_error() {
        let connector = mock_with(Behavior::Hang, true);

        let err = submitter(&connector)
            .submit(remark("x"), &Chain::default(), None)
            .await
            .unwrap_err();
        match err {
            WasmAssetHubError::Submission { reason, partial } => {
                assert_eq!(reason, "connection refused");
                assert!(partial.is_none());
            }
            other => panic!("Expected Submission, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_finalization_timeout() {
        let connector = mock(Behavior::Hang);
        let submitter = BatchSubmitter::new(
            connector.clone(),
            AssetHubConfig::default()
                .with_private_key(SEED)
                .with_finalization_timeout(Duration::ZERO),
        );

        let err = submitter
            .submit(remark("x"), &Chain::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WasmAssetHubError::SubmissionTimeout { waited_secs: 0 }
        ));
    }

    #[tokio::test]
    async fn test_submitter_leaves_connection_open() {
        let connector = mock(Behavior::Finalize { ok: true });
        let submitter = submitter(&connector);
        submitter
            .submit(remark("a"), &Chain::default(), None)
            .await
            .unwrap();
        submitter
            .submit(remark("b"), &Chain::default(), None)
            .await
            .unwrap();

        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
        assert_eq!(connector.client.disconnects.load(Ordering::SeqCst), 0);
    }
}
