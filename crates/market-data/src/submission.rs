//! Submission flow - validates the whole batch and hands it to the
//! transport collaborator in one request.
//!
//! ```text
//! Editing -> Validating -> Submitting -> Succeeded -> (banner hidden) Editing
//!               |              |
//!               v              v
//!            Editing         Failed -> Editing
//! ```
//!
//! There is exactly one attempt per `submit()` call and no retry.

use crate::banner::{BannerPhase, SuccessBanner};
use crate::client::MarketDataClient;
use crate::error::{MarketDataError, StoreResult};
use crate::store::{RecordStore, StoreChange};
use crate::Result;
use chrono::{DateTime, Utc};
use common::{MarketDataRecord, RecordField};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

pub const SUCCESS_MESSAGE: &str = "Market data submitted successfully!";
pub const FAILURE_MESSAGE: &str = "Failed to submit market data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Editing,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionState::Editing => write!(f, "editing"),
            SubmissionState::Validating => write!(f, "validating"),
            SubmissionState::Submitting => write!(f, "submitting"),
            SubmissionState::Succeeded => write!(f, "succeeded"),
            SubmissionState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Global notification raised after a submission attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    fn new(kind: NoticeKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
            at: Utc::now(),
        }
    }
}

pub struct SubmissionFlow {
    store: RecordStore,
    client: Arc<dyn MarketDataClient>,
    access_token: String,
    banner: SuccessBanner,
    state: SubmissionState,
    last_notice: Option<Notice>,
}

impl SubmissionFlow {
    pub fn new(
        store: RecordStore,
        client: Arc<dyn MarketDataClient>,
        access_token: impl Into<String>,
        banner: SuccessBanner,
    ) -> Self {
        Self {
            store,
            client,
            access_token: access_token.into(),
            banner,
            state: SubmissionState::Editing,
            last_notice: None,
        }
    }

    /// Current state. `Succeeded` reverts to `Editing` once the banner is hidden.
    pub fn state(&self) -> SubmissionState {
        match self.state {
            SubmissionState::Succeeded if self.banner.phase() == BannerPhase::Hidden => {
                SubmissionState::Editing
            }
            state => state,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn records(&self) -> &[MarketDataRecord] {
        self.store.records()
    }

    pub fn banner(&self) -> &SuccessBanner {
        &self.banner
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.last_notice.as_ref()
    }

    pub fn add_record(&mut self) -> StoreChange {
        self.store.add_from_template()
    }

    pub fn remove_record(&mut self, index: usize) -> StoreResult<StoreChange> {
        self.store.remove(index)
    }

    pub fn update_field(
        &mut self,
        index: usize,
        field: RecordField,
        value: &str,
    ) -> StoreResult<StoreChange> {
        self.store.update_field(index, field, value)
    }

    /// Validate every record and, if all pass, post the batch once.
    ///
    /// Every error leaves the records untouched and the flow back in
    /// `Editing`.
    #[instrument(skip(self), fields(batch_id = %Uuid::new_v4(), records = self.store.len()))]
    pub async fn submit(&mut self) -> Result<Value> {
        // A new attempt supersedes the previous success banner
        self.banner.cancel();
        self.transition(SubmissionState::Validating);

        if !self.store.validate_all() {
            let invalid_records = self.store.invalid_indices();
            warn!(?invalid_records, "Submission blocked by validation errors");
            self.transition(SubmissionState::Editing);
            return Err(MarketDataError::Validation { invalid_records });
        }

        self.transition(SubmissionState::Submitting);

        match self
            .client
            .post_batch(self.store.records(), &self.access_token)
            .await
        {
            Ok(body) => {
                self.transition(SubmissionState::Succeeded);
                self.last_notice = Some(Notice::new(NoticeKind::Success, SUCCESS_MESSAGE));
                self.banner.show();
                info!("Market data batch submitted");
                Ok(body)
            }
            Err(e) => {
                let err = match e {
                    MarketDataError::Transport(_) => e,
                    other => MarketDataError::Transport(other.to_string()),
                };
                error!("Error submitting market data: {}", err);
                self.transition(SubmissionState::Failed);
                self.last_notice = Some(Notice::new(NoticeKind::Failure, FAILURE_MESSAGE));
                self.transition(SubmissionState::Editing);
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: SubmissionState) {
        debug!(from = %self.state, to = %next, "Submission state change");
        self.state = next;
    }
}
