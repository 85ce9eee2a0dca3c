// ABOUTME: Transfer gating state machine and outcome interpretation
// ABOUTME: Composes transfer requests and feeds results to the projector

use tracing::info;

use crate::error::TransferToolError;
use crate::remote::models::{TransferMode, TransferOutcome, TransferRequest};
use crate::transfer::progress::{LogEntry, ProgressProjector, ProgressView, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CoordinatorState {
    #[default]
    Idle,
    Gated {
        needs_source: bool,
        needs_target: bool,
        needs_selection: bool,
    },
    Ready,
    Running,
    Completed,
    PartiallyFailed,
    Failed,
}

impl CoordinatorState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CoordinatorState::Completed | CoordinatorState::PartiallyFailed | CoordinatorState::Failed
        )
    }
}

#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub mode: TransferMode,
    pub chunk_size: u32,
    pub truncate: bool,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            mode: TransferMode::default(),
            chunk_size: 1000,
            truncate: true,
        }
    }
}

/// Parses the chunk-size field. Non-numeric or non-positive input is a
/// client-side validation error; nothing is dispatched.
pub fn parse_chunk_size(text: &str) -> Result<u32, TransferToolError> {
    let value: u32 = text
        .trim()
        .parse()
        .map_err(|_| TransferToolError::Validation(format!("Invalid chunk size: {}", text)))?;
    if value == 0 {
        return Err(TransferToolError::Validation(
            "Chunk size must be a positive integer".to_string(),
        ));
    }
    Ok(value)
}

/// Gates transfer start and interprets the terminal outcome. Readiness is
/// recomputed from current state on every relevant change, never latched.
#[derive(Debug, Default)]
pub struct TransferCoordinator {
    state: CoordinatorState,
    projector: ProgressProjector,
}

impl TransferCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CoordinatorState {
        &self.state
    }

    pub fn log(&self) -> &[LogEntry] {
        self.projector.entries()
    }

    pub fn view(&self) -> Option<&ProgressView> {
        self.projector.view()
    }

    /// Recomputes the gate after a connect outcome or selection change. A
    /// running transfer is never superseded by re-evaluation.
    pub fn evaluate(&mut self, source_connected: bool, target_connected: bool, selection_len: usize) {
        if self.state == CoordinatorState::Running {
            return;
        }
        self.state = if source_connected && target_connected && selection_len > 0 {
            CoordinatorState::Ready
        } else {
            CoordinatorState::Gated {
                needs_source: !source_connected,
                needs_target: !target_connected,
                needs_selection: selection_len == 0,
            }
        };
    }

    /// Starts a transfer: clears the log, emits the opening entries, and
    /// returns the composed request in the operator's selection order.
    /// Guard rejections leave the state untouched.
    pub fn begin(
        &mut self,
        source_connected: bool,
        target_connected: bool,
        selection: &[String],
        settings: &TransferSettings,
    ) -> Result<TransferRequest, TransferToolError> {
        if self.state == CoordinatorState::Running {
            return Err(TransferToolError::Transfer(
                "A transfer is already running; wait for it to finish".to_string(),
            ));
        }
        if selection.is_empty() {
            return Err(TransferToolError::Validation(
                "Select at least one table to transfer".to_string(),
            ));
        }
        if !source_connected || !target_connected {
            return Err(TransferToolError::Validation(
                "Both source and target must be connected".to_string(),
            ));
        }
        if settings.chunk_size == 0 {
            return Err(TransferToolError::Validation(
                "Chunk size must be a positive integer".to_string(),
            ));
        }

        self.projector.reset();
        self.projector.append(Severity::Info, "Starting transfer...");
        self.projector
            .append(Severity::Info, format!("{} tables to transfer", selection.len()));
        self.state = CoordinatorState::Running;

        let request = TransferRequest {
            tables: selection.to_vec(),
            mode: settings.mode,
            chunk_size: settings.chunk_size,
            truncate: settings.truncate,
        };
        info!(tables = request.tables.len(), mode = %request.mode, "transfer dispatched");
        Ok(request)
    }

    /// Consumes the terminal outcome: projects every event in order, forces
    /// the 100% completion view on success, and lands in a terminal state.
    pub fn finish(&mut self, outcome: &TransferOutcome) {
        if outcome.success {
            for event in &outcome.events {
                self.projector.project(event);
                self.projector.append(
                    Severity::Success,
                    format!(
                        "{}: {}/{} rows",
                        event.table_name, event.current_rows, event.total_rows
                    ),
                );
            }
            self.projector.complete();
            if outcome.errors.is_empty() {
                self.projector
                    .append(Severity::Success, "Transfer completed successfully");
                self.state = CoordinatorState::Completed;
            } else {
                for error in &outcome.errors {
                    self.projector.append(Severity::Error, error.clone());
                }
                self.state = CoordinatorState::PartiallyFailed;
            }
        } else {
            self.projector
                .append(Severity::Error, format!("Transfer failed: {}", outcome.message));
            for error in &outcome.errors {
                self.projector.append(Severity::Error, format!("  - {}", error));
            }
            self.state = CoordinatorState::Failed;
        }
        info!(state = ?self.state, "transfer settled");
    }

    /// Transport failure while awaiting the outcome. Identical to a failed
    /// outcome carrying a single synthetic message; never retried here.
    pub fn fail_transport(&mut self, message: &str) {
        self.finish(&TransferOutcome {
            success: false,
            message: message.to_string(),
            events: Vec::new(),
            errors: Vec::new(),
        });
    }
}
