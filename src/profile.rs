// ABOUTME: Connection profile types and the form-level builder
// ABOUTME: Handles engine-specific port defaults and field validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TransferToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineKind {
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "postgresql")]
    Postgres,
}

impl EngineKind {
    pub fn default_port(self) -> u16 {
        match self {
            EngineKind::MySql => 3306,
            EngineKind::Postgres => 5432,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineKind::MySql => write!(f, "mysql"),
            EngineKind::Postgres => write!(f, "postgresql"),
        }
    }
}

impl FromStr for EngineKind {
    type Err = TransferToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(EngineKind::MySql),
            "postgresql" | "postgres" => Ok(EngineKind::Postgres),
            other => Err(TransferToolError::Validation(format!(
                "Unsupported database type: {}",
                other
            ))),
        }
    }
}

/// A fully validated connection descriptor, built fresh from the form for
/// every test/connect/save action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    #[serde(rename = "db_type")]
    pub engine: EngineKind,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

/// Form state for one connection panel. The port keeps its engine default
/// until the operator edits it; after that, engine changes leave it alone.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    engine: Option<EngineKind>,
    host: String,
    port: String,
    port_touched: bool,
    username: String,
    password: String,
    database: String,
}

impl ProfileForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_engine(&mut self, kind: EngineKind) {
        if !self.port_touched {
            self.port = kind.default_port().to_string();
        }
        self.engine = Some(kind);
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    pub fn set_port(&mut self, port: impl Into<String>) {
        self.port = port.into();
        self.port_touched = true;
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn set_database(&mut self, database: impl Into<String>) {
        self.database = database.into();
    }

    pub fn engine(&self) -> Option<EngineKind> {
        self.engine
    }

    pub fn port_text(&self) -> &str {
        &self.port
    }

    /// Fills the form from a saved profile. The stored port counts as an
    /// explicit operator value, so later engine changes do not reset it.
    pub fn populate(&mut self, profile: &ConnectionProfile) {
        self.engine = Some(profile.engine);
        self.host = profile.host.clone();
        self.port = profile.port.to_string();
        self.port_touched = true;
        self.username = profile.username.clone();
        self.password = profile.password.clone();
        self.database = profile.database.clone();
    }

    /// Validates the form and builds a profile. Port text to integer is the
    /// only coercion applied; every other field passes through verbatim.
    pub fn build(&self) -> Result<ConnectionProfile, TransferToolError> {
        let engine = self.engine.ok_or_else(|| {
            TransferToolError::Validation("Select a database type first".to_string())
        })?;

        if self.host.trim().is_empty() {
            return Err(TransferToolError::Validation(
                "Host must not be empty".to_string(),
            ));
        }
        if self.database.trim().is_empty() {
            return Err(TransferToolError::Validation(
                "Database name must not be empty".to_string(),
            ));
        }

        let port: u16 = self.port.trim().parse().map_err(|_| {
            TransferToolError::Validation(format!("Invalid port number: {}", self.port))
        })?;
        if port == 0 {
            return Err(TransferToolError::Validation(
                "Port must be between 1 and 65535".to_string(),
            ));
        }

        Ok(ConnectionProfile {
            engine,
            host: self.host.clone(),
            port,
            username: self.username.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ProfileForm {
        let mut form = ProfileForm::new();
        form.set_engine(EngineKind::MySql);
        form.set_host("db.internal");
        form.set_username("app");
        form.set_password("s3cret");
        form.set_database("orders");
        form
    }

    #[test]
    fn engine_change_applies_default_port_when_untouched() {
        let mut form = ProfileForm::new();
        form.set_engine(EngineKind::MySql);
        assert_eq!(form.port_text(), "3306");
        form.set_engine(EngineKind::Postgres);
        assert_eq!(form.port_text(), "5432");
    }

    #[test]
    fn engine_change_keeps_operator_port_once_edited() {
        let mut form = ProfileForm::new();
        form.set_engine(EngineKind::MySql);
        form.set_port("13306");
        form.set_engine(EngineKind::Postgres);
        assert_eq!(form.port_text(), "13306");
    }

    #[test]
    fn build_rejects_non_numeric_port() {
        let mut form = filled_form();
        form.set_port("abc");
        assert!(form.build().is_err());
    }

    #[test]
    fn build_rejects_port_zero() {
        let mut form = filled_form();
        form.set_port("0");
        assert!(form.build().is_err());
    }

    #[test]
    fn build_requires_engine_and_host() {
        let form = ProfileForm::new();
        assert!(form.build().is_err());

        let mut form = ProfileForm::new();
        form.set_engine(EngineKind::Postgres);
        form.set_database("orders");
        assert!(form.build().is_err());
    }

    #[test]
    fn profile_round_trips_through_json() {
        let profile = filled_form().build().unwrap();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"db_type\":\"mysql\""));
        let back: ConnectionProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn populate_marks_port_as_operator_set() {
        let profile = filled_form().build().unwrap();
        let mut form = ProfileForm::new();
        form.populate(&profile);
        form.set_engine(EngineKind::Postgres);
        assert_eq!(form.port_text(), "3306");
    }
}
