// ABOUTME: Backend API module
// ABOUTME: Wire models and the HTTP client for the transfer backend

pub mod client;
pub mod models;

pub use client::{BackendClient, DEFAULT_TIMEOUT_SECS};
pub use models::{ProgressEvent, TransferMode, TransferOutcome, TransferRequest};
