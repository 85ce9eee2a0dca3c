// ABOUTME: Data structures for backend API requests and responses
// ABOUTME: These are serialized to JSON for API communication

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TransferToolError;
use crate::profile::ConnectionProfile;

/// Payload for `/api/connect`: a profile plus the role slot it fills.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectPayload {
    #[serde(flatten)]
    pub profile: ConnectionProfile,
    #[serde(rename = "type")]
    pub role: String,
}

/// Payload for `/api/save-connection`: a profile with a storage name.
#[derive(Debug, Clone, Serialize)]
pub struct SavePayload {
    #[serde(flatten)]
    pub profile: ConnectionProfile,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TablesResponse {
    pub success: bool,
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadConnectionResponse {
    pub success: bool,
    pub connection: Option<ConnectionProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Transfer mode set defined by the backend; passed through opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    SchemaOnly,
    #[default]
    SchemaAndData,
    DataOnly,
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransferMode::SchemaOnly => write!(f, "schema_only"),
            TransferMode::SchemaAndData => write!(f, "schema_and_data"),
            TransferMode::DataOnly => write!(f, "data_only"),
        }
    }
}

impl FromStr for TransferMode {
    type Err = TransferToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "schema_only" => Ok(TransferMode::SchemaOnly),
            "schema_and_data" => Ok(TransferMode::SchemaAndData),
            "data_only" => Ok(TransferMode::DataOnly),
            other => Err(TransferToolError::Validation(format!(
                "Unknown transfer mode: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRequest {
    pub tables: Vec<String>,
    pub mode: TransferMode,
    pub chunk_size: u32,
    pub truncate: bool,
}

/// One reported unit of completion for a single table. Ordinals are 1-based
/// within the job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressEvent {
    pub table_name: String,
    pub current_table: u32,
    pub total_tables: u32,
    pub current_rows: u64,
    pub total_rows: u64,
    pub percentage: f64,
}

/// Terminal result of one transfer invocation. Progress arrives as a single
/// batch after the job finishes server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "progress_updates")]
    pub events: Vec<ProgressEvent>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::EngineKind;

    fn profile() -> ConnectionProfile {
        ConnectionProfile {
            engine: EngineKind::Postgres,
            host: "localhost".to_string(),
            port: 5432,
            username: "app".to_string(),
            password: "pw".to_string(),
            database: "shop".to_string(),
        }
    }

    #[test]
    fn connect_payload_flattens_profile_with_role_tag() {
        let payload = ConnectPayload {
            profile: profile(),
            role: "source".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "source");
        assert_eq!(value["db_type"], "postgresql");
        assert_eq!(value["port"], 5432);
    }

    #[test]
    fn transfer_request_uses_backend_field_names() {
        let request = TransferRequest {
            tables: vec!["users".to_string()],
            mode: TransferMode::DataOnly,
            chunk_size: 500,
            truncate: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["mode"], "data_only");
        assert_eq!(value["chunk_size"], 500);
        assert_eq!(value["truncate"], false);
    }

    #[test]
    fn outcome_defaults_missing_batches_to_empty() {
        let outcome: TransferOutcome =
            serde_json::from_str(r#"{"success": false, "message": "boom"}"#).unwrap();
        assert!(!outcome.success);
        assert!(outcome.events.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn outcome_parses_progress_updates_batch() {
        let json = r#"{
            "success": true,
            "message": "2 tables processed",
            "progress_updates": [
                {"table_name": "t1", "current_table": 1, "total_tables": 2,
                 "current_rows": 50, "total_rows": 100, "percentage": 50.0}
            ],
            "errors": []
        }"#;
        let outcome: TransferOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].table_name, "t1");
        assert_eq!(outcome.events[0].total_rows, 100);
    }

    #[test]
    fn transfer_mode_round_trips_through_str() {
        for mode in [
            TransferMode::SchemaOnly,
            TransferMode::SchemaAndData,
            TransferMode::DataOnly,
        ] {
            assert_eq!(mode.to_string().parse::<TransferMode>().unwrap(), mode);
        }
        assert!("rowcount_only".parse::<TransferMode>().is_err());
    }
}
