use super::error::ComposerError;
use crate::calldata::token_transfer::GeneratedCalldata;
use crate::types::call::Call;
use crate::types::draft_transaction::{DraftTransaction, TransactionField};
use crate::utils::address::parse_address;
use crate::wallet::batch_submitter::BatchSubmitter;
use crate::wallet::submission::SubmissionStatus;
use crate::wallet::wallet_connection::WalletStatus;
use alloy::primitives::{
    Bytes, U256,
    utils::{ParseUnits, parse_units},
};
use eyre::Result;
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Ordered list of draft transactions plus the outcome of the latest
/// submission. Always holds at least one entry.
#[derive(Debug)]
pub struct BatchComposer {
    entries: Vec<DraftTransaction>,
    status: Arc<watch::Sender<SubmissionStatus>>,
}

impl Default for BatchComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchComposer {
    pub fn new() -> Self {
        Self::from_drafts(Vec::new())
    }

    pub fn from_drafts(mut entries: Vec<DraftTransaction>) -> Self {
        if entries.is_empty() {
            entries.push(DraftTransaction::default());
        }
        let (status, _) = watch::channel(SubmissionStatus::Idle);
        Self {
            entries,
            status: Arc::new(status),
        }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let entries: Vec<DraftTransaction> = serde_json::from_value(value)?;
        Ok(Self::from_drafts(entries))
    }

    pub fn from_json_str(json_str: &str) -> Result<Self> {
        let entries: Vec<DraftTransaction> = serde_json::from_str(json_str)?;
        Ok(Self::from_drafts(entries))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn entries(&self) -> &[DraftTransaction] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&DraftTransaction> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true, kept alongside `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an empty entry and returns its index.
    pub fn add_entry(&mut self) -> usize {
        self.entries.push(DraftTransaction::default());
        debug!("Added transaction {}", self.entries.len());
        self.entries.len() - 1
    }

    pub fn remove_entry(&mut self, index: usize) -> Result<DraftTransaction, ComposerError> {
        if index >= self.entries.len() {
            return Err(ComposerError::IndexOutOfRange(index));
        }
        if self.entries.len() == 1 {
            return Err(ComposerError::LastEntry);
        }
        debug!("Removing transaction {}", index + 1);
        Ok(self.entries.remove(index))
    }

    pub fn update_field(
        &mut self,
        index: usize,
        field: TransactionField,
    ) -> Result<(), ComposerError> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(ComposerError::IndexOutOfRange(index))?;
        entry.apply(field);
        Ok(())
    }

    /// Puts generated call data into an entry. The recipient is set to the
    /// token contract only when the entry has none yet.
    pub fn apply_generated(
        &mut self,
        index: usize,
        generated: &GeneratedCalldata,
    ) -> Result<(), ComposerError> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(ComposerError::IndexOutOfRange(index))?;
        entry.data = generated.data.to_string();
        if entry.to.is_empty() {
            entry.to = generated.token.to_checksum(None);
        }
        Ok(())
    }

    pub fn is_valid(entry: &DraftTransaction) -> bool {
        entry.is_valid()
    }

    pub fn has_submittable(&self) -> bool {
        self.entries.iter().any(Self::is_valid)
    }

    /// Converts the valid entries into calls, in entry order. Invalid entries
    /// are left out without error. A valid entry whose value or call data
    /// cannot be converted fails the whole batch.
    pub fn build_batch(&self) -> Result<Vec<Call>, ComposerError> {
        let mut calls = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            if !Self::is_valid(entry) {
                continue;
            }
            let Some(to) = parse_address(&entry.to) else {
                continue;
            };

            let value = if entry.has_value() {
                let wei = parse_native_value(&entry.value).map_err(|reason| {
                    ComposerError::InvalidValue {
                        index,
                        value: entry.value.clone(),
                        reason,
                    }
                })?;
                Some(wei)
            } else {
                None
            };

            let data = if entry.has_data() && !entry.data.is_empty() {
                Some(parse_calldata(&entry.data).ok_or_else(|| ComposerError::InvalidData {
                    index,
                    data: entry.data.clone(),
                })?)
            } else {
                None
            };

            calls.push(Call { to, value, data });
        }

        debug!(
            "Built batch of {} call(s) from {} transaction(s)",
            calls.len(),
            self.entries.len()
        );
        Ok(calls)
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.status.borrow().is_pending()
    }

    pub fn can_submit(&self, wallet: &WalletStatus) -> bool {
        wallet.is_connected() && self.has_submittable() && !self.is_pending()
    }

    /// Hands the batch to `submitter` on the wallet's active chain and returns
    /// a receiver for the outcome. The draft is left as is either way.
    ///
    /// The send runs on the current tokio runtime. Without one, nothing is
    /// sent and `NoRuntime` is returned.
    pub fn submit<S>(
        &self,
        wallet: &WalletStatus,
        submitter: Arc<S>,
    ) -> Result<watch::Receiver<SubmissionStatus>, ComposerError>
    where
        S: BatchSubmitter + ?Sized + 'static,
    {
        let WalletStatus::Connected { account, chain_id } = *wallet else {
            return Err(ComposerError::WalletDisconnected);
        };
        let runtime = Handle::try_current().map_err(|_| ComposerError::NoRuntime)?;
        if self.is_pending() {
            return Err(ComposerError::SubmissionPending);
        }
        if !self.has_submittable() {
            return Err(ComposerError::NothingToSubmit);
        }

        let calls = match self.build_batch() {
            Ok(calls) => calls,
            Err(e) => {
                warn!("Batch not sent: {}", e);
                self.status.send_replace(SubmissionStatus::failed(&e));
                return Err(e);
            }
        };

        info!(
            "Submitting batch of {} call(s) from {} on chain {}",
            calls.len(),
            account,
            chain_id
        );
        self.status.send_replace(SubmissionStatus::Pending);
        let receiver = self.status.subscribe();
        let status = Arc::clone(&self.status);

        runtime.spawn(async move {
            let outcome = match submitter.send_calls(chain_id, account, calls).await {
                Ok(receipt) => {
                    info!("Batch {} sent", receipt.id);
                    SubmissionStatus::Succeeded(receipt)
                }
                Err(e) => {
                    warn!("Batch submission failed: {}", e);
                    SubmissionStatus::failed(e)
                }
            };
            status.send_replace(outcome);
        });

        Ok(receiver)
    }
}

/// Native value in ether, converted to wei. Negative amounts are rejected.
fn parse_native_value(value: &str) -> Result<U256, String> {
    match parse_units(value, "ether").map_err(|e| e.to_string())? {
        ParseUnits::U256(wei) => Ok(wei),
        ParseUnits::I256(_) => Err("value must not be negative".to_string()),
    }
}

fn parse_calldata(data: &str) -> Option<Bytes> {
    if !data.starts_with("0x") {
        return None;
    }
    data.parse::<Bytes>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calldata::calldata_assistant::CalldataAssistant;
    use crate::calldata::token_transfer::TokenStandard;
    use crate::wallet::batch_submitter::BatchReceipt;
    use crate::wallet::submission::{GENERIC_SUBMISSION_ERROR, wait_for_outcome};
    use alloy::primitives::{Address, U256, address, bytes};
    use async_trait::async_trait;
    use eyre::eyre;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    const RECIPIENT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    const OTHER: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

    fn connected() -> WalletStatus {
        WalletStatus::Connected {
            account: address!("0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB"),
            chain_id: 8453,
        }
    }

    #[derive(Default)]
    struct MockSubmitter {
        sent: Mutex<Vec<(u64, Address, Vec<Call>)>>,
        error: Option<String>,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl BatchSubmitter for MockSubmitter {
        async fn send_calls(
            &self,
            chain_id: u64,
            from: Address,
            calls: Vec<Call>,
        ) -> Result<BatchReceipt> {
            self.sent.lock().unwrap().push((chain_id, from, calls));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &self.error {
                Some(message) => Err(eyre!("{}", message)),
                None => Ok(BatchReceipt {
                    id: "0x01".to_string(),
                    transaction_hashes: vec![],
                }),
            }
        }
    }

    #[test]
    fn test_starts_with_one_empty_entry() {
        let composer = BatchComposer::new();
        assert_eq!(composer.len(), 1);
        assert_eq!(composer.entries()[0], DraftTransaction::default());
        assert!(!composer.has_submittable());
        assert_eq!(composer.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn test_add_and_remove_entries() {
        let mut composer = BatchComposer::new();
        assert_eq!(composer.add_entry(), 1);
        assert_eq!(composer.add_entry(), 2);
        composer
            .update_field(1, TransactionField::To(RECIPIENT.to_string()))
            .unwrap();

        let removed = composer.remove_entry(1).unwrap();
        assert_eq!(removed.to, RECIPIENT);
        assert_eq!(composer.len(), 2);
        assert_eq!(composer.remove_entry(5), Err(ComposerError::IndexOutOfRange(5)));
    }

    #[test]
    fn test_cannot_remove_last_entry() {
        let mut composer = BatchComposer::new();
        assert_eq!(composer.remove_entry(0), Err(ComposerError::LastEntry));
        assert_eq!(composer.len(), 1);

        composer.add_entry();
        composer.remove_entry(0).unwrap();
        assert_eq!(composer.remove_entry(0), Err(ComposerError::LastEntry));
        assert_eq!(composer.len(), 1);
    }

    #[test]
    fn test_update_field_out_of_range() {
        let mut composer = BatchComposer::new();
        assert_eq!(
            composer.update_field(3, TransactionField::Value("1".to_string())),
            Err(ComposerError::IndexOutOfRange(3))
        );
    }

    #[test]
    fn test_build_batch_drops_invalid_entries() {
        let composer = BatchComposer::from_drafts(vec![
            DraftTransaction::new(RECIPIENT, "", "0x"),
            DraftTransaction::new(OTHER, "0.01", "0x"),
        ]);

        let calls = composer.build_batch().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            Call {
                to: address!("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"),
                value: Some(U256::from(10_000_000_000_000_000u64)),
                data: None,
            }
        );
    }

    #[test]
    fn test_build_batch_length_matches_valid_count() {
        let drafts = vec![
            DraftTransaction::new(RECIPIENT, "1", "0x"),
            DraftTransaction::new("0xnot-an-address", "1", "0x"),
            DraftTransaction::new(OTHER, "", "0xa9059cbb"),
            DraftTransaction::default(),
            DraftTransaction::new(OTHER, "0.5", "0xdeadbeef"),
        ];
        let valid = drafts.iter().filter(|d| BatchComposer::is_valid(d)).count();
        let composer = BatchComposer::from_drafts(drafts);

        let calls = composer.build_batch().unwrap();
        assert_eq!(valid, 3);
        assert_eq!(calls.len(), valid);
        assert!(calls.len() <= composer.len());

        // order is preserved
        assert_eq!(calls[0].to, address!("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert_eq!(calls[1].value, None);
        assert_eq!(calls[1].data, Some(bytes!("a9059cbb")));
        assert_eq!(
            calls[2].value,
            Some(U256::from(500_000_000_000_000_000u64))
        );
        assert_eq!(calls[2].data, Some(bytes!("deadbeef")));
    }

    #[test]
    fn test_build_batch_rejects_unconvertible_value() {
        let composer = BatchComposer::from_drafts(vec![
            DraftTransaction::new(RECIPIENT, "1", "0x"),
            DraftTransaction::new(OTHER, "one", "0x"),
        ]);
        match composer.build_batch() {
            Err(ComposerError::InvalidValue { index, value, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(value, "one");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_build_batch_rejects_malformed_calldata() {
        let composer =
            BatchComposer::from_drafts(vec![DraftTransaction::new(RECIPIENT, "", "0xzz")]);
        assert_eq!(
            composer.build_batch(),
            Err(ComposerError::InvalidData {
                index: 0,
                data: "0xzz".to_string()
            })
        );
    }

    #[test]
    fn test_apply_generated_calldata() {
        let mut assistant = CalldataAssistant::new(TokenStandard::Erc20);
        assistant.token = OTHER.to_string();
        assistant.recipient = RECIPIENT.to_string();
        assistant.amount = "2".to_string();
        let generated = assistant.generate().unwrap();

        let mut composer = BatchComposer::new();
        composer.apply_generated(0, &generated).unwrap();
        assert_eq!(composer.entries()[0].to, OTHER);
        assert!(composer.has_submittable());

        let calls = composer.build_batch().unwrap();
        assert_eq!(calls[0].to, generated.token);
        assert_eq!(calls[0].data, Some(generated.data.clone()));
        assert_eq!(calls[0].value, None);

        // An existing recipient is kept.
        composer.add_entry();
        composer
            .update_field(1, TransactionField::To(RECIPIENT.to_string()))
            .unwrap();
        composer.apply_generated(1, &generated).unwrap();
        assert_eq!(composer.entries()[1].to, RECIPIENT);
    }

    #[test]
    fn test_json_round_trip() {
        let json = format!(r#"[{{ "to": "{RECIPIENT}", "value": "0.01" }}, {{}}]"#);
        let composer = BatchComposer::from_json_str(&json).unwrap();
        assert_eq!(composer.len(), 2);
        assert_eq!(composer.entries()[0].data, "0x");

        let reloaded = BatchComposer::from_json_str(&composer.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reloaded.entries(), composer.entries());

        assert_eq!(BatchComposer::from_json_str("[]").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_requires_connected_wallet() {
        let composer = BatchComposer::from_drafts(vec![DraftTransaction::new(RECIPIENT, "1", "0x")]);
        let submitter = Arc::new(MockSubmitter::default());

        assert!(!composer.can_submit(&WalletStatus::Disconnected));
        assert_eq!(
            composer
                .submit(&WalletStatus::Disconnected, submitter.clone())
                .unwrap_err(),
            ComposerError::WalletDisconnected
        );
        assert!(submitter.sent.lock().unwrap().is_empty());
        assert_eq!(composer.status(), SubmissionStatus::Idle);
    }

    #[tokio::test]
    async fn test_submit_requires_valid_entry() {
        let composer = BatchComposer::from_drafts(vec![DraftTransaction::new(RECIPIENT, "", "0x")]);
        let submitter = Arc::new(MockSubmitter::default());

        assert!(!composer.can_submit(&connected()));
        assert_eq!(
            composer.submit(&connected(), submitter).unwrap_err(),
            ComposerError::NothingToSubmit
        );
    }

    #[tokio::test]
    async fn test_submit_success() {
        let composer = BatchComposer::from_drafts(vec![
            DraftTransaction::new(RECIPIENT, "", "0x"),
            DraftTransaction::new(OTHER, "0.01", "0x"),
        ]);
        let submitter = Arc::new(MockSubmitter::default());

        assert!(composer.can_submit(&connected()));
        let mut receiver = composer.submit(&connected(), submitter.clone()).unwrap();
        let outcome = wait_for_outcome(&mut receiver).await.unwrap();

        assert_eq!(
            outcome,
            SubmissionStatus::Succeeded(BatchReceipt {
                id: "0x01".to_string(),
                transaction_hashes: vec![],
            })
        );
        assert_eq!(composer.status(), outcome);

        let sent = submitter.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (chain_id, from, calls) = &sent[0];
        assert_eq!(*chain_id, 8453);
        assert_eq!(*from, address!("0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB"));
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].value, Some(U256::from(10_000_000_000_000_000u64)));

        // The draft is not cleared.
        assert_eq!(composer.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_draft() {
        let composer = BatchComposer::from_drafts(vec![DraftTransaction::new(RECIPIENT, "1", "0x")]);
        let submitter = Arc::new(MockSubmitter {
            error: Some("User rejected the request.".to_string()),
            ..MockSubmitter::default()
        });

        let mut receiver = composer.submit(&connected(), submitter).unwrap();
        let outcome = wait_for_outcome(&mut receiver).await.unwrap();
        assert_eq!(
            outcome,
            SubmissionStatus::Failed {
                message: "User rejected the request.".to_string()
            }
        );
        assert_eq!(composer.entries()[0], DraftTransaction::new(RECIPIENT, "1", "0x"));
        assert!(composer.can_submit(&connected()));
    }

    #[tokio::test]
    async fn test_submit_failure_without_message_uses_fallback() {
        let composer = BatchComposer::from_drafts(vec![DraftTransaction::new(RECIPIENT, "1", "0x")]);
        let submitter = Arc::new(MockSubmitter {
            error: Some(String::new()),
            ..MockSubmitter::default()
        });

        let mut receiver = composer.submit(&connected(), submitter).unwrap();
        assert_eq!(
            wait_for_outcome(&mut receiver).await.unwrap(),
            SubmissionStatus::Failed {
                message: GENERIC_SUBMISSION_ERROR.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_no_second_submission_while_pending() {
        let composer = BatchComposer::from_drafts(vec![DraftTransaction::new(RECIPIENT, "1", "0x")]);
        let gate = Arc::new(Notify::new());
        let submitter = Arc::new(MockSubmitter {
            gate: Some(gate.clone()),
            ..MockSubmitter::default()
        });

        let mut receiver = composer.submit(&connected(), submitter.clone()).unwrap();
        assert!(composer.is_pending());
        assert!(!composer.can_submit(&connected()));
        assert_eq!(
            composer.submit(&connected(), submitter.clone()).unwrap_err(),
            ComposerError::SubmissionPending
        );

        gate.notify_one();
        let outcome = wait_for_outcome(&mut receiver).await.unwrap();
        assert!(matches!(outcome, SubmissionStatus::Succeeded(_)));
        assert_eq!(submitter.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_build_batch_rejects_negative_value() {
        let composer = BatchComposer::from_drafts(vec![DraftTransaction::new(RECIPIENT, "-1", "0x")]);
        match composer.build_batch() {
            Err(ComposerError::InvalidValue { index, value, reason }) => {
                assert_eq!(index, 0);
                assert_eq!(value, "-1");
                assert_eq!(reason, "value must not be negative");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_negative_value_is_never_sent() {
        let composer = BatchComposer::from_drafts(vec![DraftTransaction::new(RECIPIENT, "-1", "0x")]);
        let submitter = Arc::new(MockSubmitter::default());

        let err = composer.submit(&connected(), submitter.clone()).unwrap_err();
        assert!(matches!(err, ComposerError::InvalidValue { index: 0, .. }));
        assert!(matches!(composer.status(), SubmissionStatus::Failed { .. }));
        assert!(submitter.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_submit_outside_runtime() {
        let composer = BatchComposer::from_drafts(vec![DraftTransaction::new(RECIPIENT, "1", "0x")]);
        let submitter = Arc::new(MockSubmitter::default());

        assert_eq!(
            composer.submit(&connected(), submitter.clone()).unwrap_err(),
            ComposerError::NoRuntime
        );
        assert_eq!(composer.status(), SubmissionStatus::Idle);
        assert!(submitter.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unconvertible_value_fails_attempt() {
        let composer = BatchComposer::from_drafts(vec![DraftTransaction::new(RECIPIENT, "1.2.3", "0x")]);
        let submitter = Arc::new(MockSubmitter::default());

        let err = composer.submit(&connected(), submitter.clone()).unwrap_err();
        assert!(matches!(err, ComposerError::InvalidValue { index: 0, .. }));
        assert!(matches!(composer.status(), SubmissionStatus::Failed { .. }));
        assert!(submitter.sent.lock().unwrap().is_empty());
    }
}
