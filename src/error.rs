// ABOUTME: Custom error types for the transfer tool
// ABOUTME: Provides context-specific error variants with actionable messages

use std::fmt;

#[derive(Debug)]
pub enum TransferToolError {
    Validation(String),
    Connectivity(String),
    CatalogLoad(String),
    Transfer(String),
}

impl fmt::Display for TransferToolError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransferToolError::Validation(msg) => write!(f, "Validation error: {}", msg),
            TransferToolError::Connectivity(msg) => write!(f, "Connection error: {}", msg),
            TransferToolError::CatalogLoad(msg) => write!(f, "Table listing error: {}", msg),
            TransferToolError::Transfer(msg) => write!(f, "Transfer error: {}", msg),
        }
    }
}

impl std::error::Error for TransferToolError {}
