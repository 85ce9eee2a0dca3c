// ABOUTME: Progress projection and the append-only transfer log
// ABOUTME: Turns backend progress events into display views and log lines

use chrono::{DateTime, Local};

use crate::remote::models::ProgressEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub text: String,
}

impl LogEntry {
    pub fn render(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub percentage: u8,
    pub current_table_label: String,
    pub table_ordinal_label: String,
    pub rows_label: String,
}

/// Projects the ordered event stream of one transfer into a display view and
/// an append-only log. Backend percentages are advisory; only the forced
/// completion projection is authoritative.
#[derive(Debug, Default)]
pub struct ProgressProjector {
    log: Vec<LogEntry>,
    current: Option<ProgressView>,
}

impl ProgressProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the log and the current view. Called once at transfer start;
    /// entries are never removed at any other time.
    pub fn reset(&mut self) {
        self.log.clear();
        self.current = None;
    }

    pub fn project(&mut self, event: &ProgressEvent) -> ProgressView {
        let view = ProgressView {
            percentage: round_percentage(event.percentage),
            current_table_label: event.table_name.clone(),
            table_ordinal_label: format!("{}/{}", event.current_table, event.total_tables),
            rows_label: format!("{}/{}", event.current_rows, event.total_rows),
        };
        self.current = Some(view.clone());
        view
    }

    /// Terminal projection at 100%, overriding whatever the last event said.
    /// Idempotent; keeps the last event's labels.
    pub fn complete(&mut self) -> ProgressView {
        let mut view = self.current.clone().unwrap_or(ProgressView {
            percentage: 0,
            current_table_label: String::new(),
            table_ordinal_label: String::new(),
            rows_label: String::new(),
        });
        view.percentage = 100;
        self.current = Some(view.clone());
        view
    }

    pub fn append(&mut self, severity: Severity, text: impl Into<String>) {
        self.log.push(LogEntry {
            timestamp: Local::now(),
            severity,
            text: text.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn view(&self) -> Option<&ProgressView> {
        self.current.as_ref()
    }
}

fn round_percentage(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}
