// ABOUTME: Transfer orchestration module
// ABOUTME: The gating state machine and the progress/log projector

pub mod coordinator;
pub mod progress;

pub use coordinator::{parse_chunk_size, CoordinatorState, TransferCoordinator, TransferSettings};
pub use progress::{LogEntry, ProgressProjector, ProgressView, Severity};
