//! Market data entry core
//!
//! Collects market data records, validates them field by field and
//! submits them as one batch.
//!
//! # Core Components
//!
//! - [`validator`] - Per-record validation rules
//! - [`store`] - Record Store keeping records and error maps index-aligned
//! - [`template`] - Blank and demo starting values for new records
//! - [`client`] - Transport collaborator (HTTP and mock)
//! - [`banner`] - Two-phase success banner timer
//! - [`submission`] - Submission state machine
//! - [`batch`] - Batch file loading and saving
//!
//! # Key Invariants
//!
//! - The store always holds at least one record
//! - Error map `i` always describes record `i`
//! - Nothing is sent while any record has validation errors
//! - One submission attempt per `submit()`; no retry

pub mod banner;
pub mod batch;
pub mod client;
pub mod error;
pub mod store;
pub mod submission;
pub mod template;
pub mod validator;

pub use banner::{BannerPhase, BannerTimings, SuccessBanner};
pub use batch::{load_batch, save_batch};
pub use client::{HttpMarketDataClient, MarketDataClient, MockMarketDataClient, RecordedBatch};
pub use error::{MarketDataError, StoreError, StoreResult};
pub use store::{RecordStore, StoreChange, StoreSnapshot};
pub use submission::{Notice, NoticeKind, SubmissionFlow, SubmissionState};
pub use template::RecordTemplate;
pub use validator::{validate, validate_all, ErrorMap, FieldError};

pub type Result<T> = std::result::Result<T, MarketDataError>;
