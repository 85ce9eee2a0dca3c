// ABOUTME: Command dispatch tying forms, connections, catalog, and transfers together
// ABOUTME: Owns all session state; the UI layer only sends commands and renders

use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

use crate::catalog::TableCatalog;
use crate::config::Config;
use crate::error::TransferToolError;
use crate::profile::ProfileForm;
use crate::remote::BackendClient;
use crate::session::{ConnectionManager, ConnectionState, Role};
use crate::transfer::{TransferCoordinator, TransferSettings};

/// One typed command per operator action.
#[derive(Debug, Clone)]
pub enum Command {
    TestConnection(Role),
    Connect(Role),
    SaveConnection { role: Role, name: String },
    LoadConnection { role: Role, name: String },
    LoadTables,
    SelectAll,
    DeselectAll,
    ToggleTable(String),
    SetCheckedTables(Vec<String>),
    StartTransfer,
}

/// Status line handed back to the UI for the command just handled.
#[derive(Debug, Clone)]
pub struct ActionReport {
    pub success: bool,
    pub message: String,
}

impl ActionReport {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

pub struct App {
    client: BackendClient,
    manager: ConnectionManager,
    catalog: TableCatalog,
    coordinator: TransferCoordinator,
    source_form: ProfileForm,
    target_form: ProfileForm,
    settings: TransferSettings,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let client = BackendClient::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let settings = TransferSettings {
            chunk_size: config.chunk_size,
            ..TransferSettings::default()
        };
        Ok(Self {
            client,
            manager: ConnectionManager::new(),
            catalog: TableCatalog::new(),
            coordinator: TransferCoordinator::new(),
            source_form: ProfileForm::new(),
            target_form: ProfileForm::new(),
            settings,
        })
    }

    pub fn form(&self, role: Role) -> &ProfileForm {
        match role {
            Role::Source => &self.source_form,
            Role::Target => &self.target_form,
        }
    }

    pub fn form_mut(&mut self, role: Role) -> &mut ProfileForm {
        match role {
            Role::Source => &mut self.source_form,
            Role::Target => &mut self.target_form,
        }
    }

    pub fn connection_state(&self, role: Role) -> &ConnectionState {
        self.manager.state(role)
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    pub fn coordinator(&self) -> &TransferCoordinator {
        &self.coordinator
    }

    pub fn settings(&self) -> &TransferSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut TransferSettings {
        &mut self.settings
    }

    pub fn is_transfer_ready(&self) -> bool {
        self.manager
            .is_transfer_ready(!self.catalog.selected().is_empty())
    }

    pub async fn handle(&mut self, command: Command) -> ActionReport {
        match command {
            Command::TestConnection(role) => self.test_connection(role).await,
            Command::Connect(role) => self.connect(role).await,
            Command::SaveConnection { role, name } => self.save_connection(role, &name).await,
            Command::LoadConnection { role, name } => self.load_connection(role, &name).await,
            Command::LoadTables => self.load_tables().await,
            Command::SelectAll => {
                self.catalog.select_all();
                self.reevaluate();
                ActionReport::ok(format!("{} tables selected", self.catalog.selected().len()))
            }
            Command::DeselectAll => {
                self.catalog.deselect_all();
                self.reevaluate();
                ActionReport::ok("Selection cleared")
            }
            Command::ToggleTable(name) => {
                self.catalog.toggle(&name);
                self.reevaluate();
                ActionReport::ok(format!("{} tables selected", self.catalog.selected().len()))
            }
            Command::SetCheckedTables(checked) => {
                self.catalog.set_checked(&checked);
                self.reevaluate();
                ActionReport::ok(format!("{} tables selected", self.catalog.selected().len()))
            }
            Command::StartTransfer => self.start_transfer().await,
        }
    }

    async fn test_connection(&mut self, role: Role) -> ActionReport {
        let profile = match self.form(role).build() {
            Ok(profile) => profile,
            Err(err) => return ActionReport::fail(err.to_string()),
        };
        if let Err(err) = self.manager.begin_attempt(role) {
            return ActionReport::fail(err.to_string());
        }

        let result = self.client.test_connection(&profile).await;
        // A probe never changes the slot's settled state.
        self.manager.finish_test(role);

        match result {
            Ok(status) => ActionReport {
                success: status.success,
                message: status.message,
            },
            Err(err) => {
                warn!(%role, "connection test failed: {:#}", err);
                ActionReport::fail(TransferToolError::Connectivity(format!("{:#}", err)).to_string())
            }
        }
    }

    async fn connect(&mut self, role: Role) -> ActionReport {
        let profile = match self.form(role).build() {
            Ok(profile) => profile,
            Err(err) => return ActionReport::fail(err.to_string()),
        };
        if let Err(err) = self.manager.begin_attempt(role) {
            return ActionReport::fail(err.to_string());
        }

        let report = match self.client.connect(role, &profile).await {
            Ok(status) => {
                self.manager.finish_connect(role, status.success, &status.message);
                ActionReport {
                    success: status.success,
                    message: status.message,
                }
            }
            Err(err) => {
                let message = format!("{:#}", err);
                self.manager.finish_connect(role, false, &message);
                ActionReport::fail(TransferToolError::Connectivity(message).to_string())
            }
        };

        // Catalog discovery is an ordered-after effect of a successful
        // source connect, never attempted on failure.
        if role == Role::Source && report.success {
            let load = self.load_tables().await;
            if !load.success {
                self.reevaluate();
                return ActionReport::fail(format!("{} ({})", report.message, load.message));
            }
        }

        self.reevaluate();
        report
    }

    async fn save_connection(&mut self, role: Role, name: &str) -> ActionReport {
        if name.trim().is_empty() {
            return ActionReport::fail(
                TransferToolError::Validation("A connection name is required".to_string())
                    .to_string(),
            );
        }
        let profile = match self.form(role).build() {
            Ok(profile) => profile,
            Err(err) => return ActionReport::fail(err.to_string()),
        };

        match self.client.save_connection(name, &profile).await {
            Ok(status) => ActionReport {
                success: status.success,
                message: status.message,
            },
            Err(err) => ActionReport::fail(format!("{:#}", err)),
        }
    }

    async fn load_connection(&mut self, role: Role, name: &str) -> ActionReport {
        match self.client.load_connection(name).await {
            Ok(response) => match response.connection {
                Some(profile) if response.success => {
                    self.form_mut(role).populate(&profile);
                    ActionReport::ok(format!("Loaded connection '{}'", name))
                }
                _ => ActionReport::fail(
                    response
                        .message
                        .unwrap_or_else(|| format!("Connection '{}' not found", name)),
                ),
            },
            Err(err) => ActionReport::fail(format!("{:#}", err)),
        }
    }

    async fn load_tables(&mut self) -> ActionReport {
        if !self.manager.state(Role::Source).is_connected() {
            return ActionReport::fail(
                TransferToolError::CatalogLoad("Source is not connected".to_string()).to_string(),
            );
        }

        match self.client.list_tables().await {
            Ok(response) if response.success => {
                let count = response.tables.len();
                self.catalog.replace(response.tables);
                self.reevaluate();
                info!(count, "table catalog loaded");
                ActionReport::ok(format!("{} tables found", count))
            }
            // Catalog stays unchanged on a failed listing.
            Ok(response) => ActionReport::fail(
                TransferToolError::CatalogLoad(
                    response.message.unwrap_or_else(|| "Table listing failed".to_string()),
                )
                .to_string(),
            ),
            Err(err) => ActionReport::fail(
                TransferToolError::CatalogLoad(format!("{:#}", err)).to_string(),
            ),
        }
    }

    async fn start_transfer(&mut self) -> ActionReport {
        let request = match self.coordinator.begin(
            self.manager.state(Role::Source).is_connected(),
            self.manager.state(Role::Target).is_connected(),
            self.catalog.selected(),
            &self.settings,
        ) {
            Ok(request) => request,
            Err(err) => return ActionReport::fail(err.to_string()),
        };

        match self.client.run_transfer(&request).await {
            Ok(outcome) => {
                self.coordinator.finish(&outcome);
                if outcome.success {
                    ActionReport::ok("Transfer finished")
                } else {
                    ActionReport::fail(TransferToolError::Transfer(outcome.message).to_string())
                }
            }
            Err(err) => {
                let message = format!("{:#}", err);
                self.coordinator.fail_transport(&message);
                ActionReport::fail(TransferToolError::Transfer(message).to_string())
            }
        }
    }

    fn reevaluate(&mut self) {
        self.coordinator.evaluate(
            self.manager.state(Role::Source).is_connected(),
            self.manager.state(Role::Target).is_connected(),
            self.catalog.selected().len(),
        );
    }

    #[cfg(test)]
    fn seed_catalog(&mut self, tables: &[&str]) {
        self.catalog
            .replace(tables.iter().map(|t| t.to_string()).collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::CoordinatorState;

    fn app() -> App {
        App::new(&Config::default()).unwrap()
    }

    #[tokio::test]
    async fn selection_commands_recompute_the_gate() {
        let mut app = app();
        app.seed_catalog(&["t1", "t2", "t3"]);

        app.handle(Command::SelectAll).await;
        assert_eq!(app.catalog().selected().len(), 3);
        // Connections are still missing, so selection alone never readies.
        assert!(!app.is_transfer_ready());
        assert!(matches!(
            app.coordinator().state(),
            CoordinatorState::Gated {
                needs_source: true,
                needs_target: true,
                needs_selection: false,
            }
        ));

        app.handle(Command::DeselectAll).await;
        app.handle(Command::ToggleTable("t2".to_string())).await;
        assert_eq!(app.catalog().selected(), ["t2".to_string()]);
    }

    #[tokio::test]
    async fn start_transfer_without_selection_never_dispatches() {
        let mut app = app();
        let report = app.handle(Command::StartTransfer).await;
        assert!(!report.success);
        assert!(app.coordinator().log().is_empty());
        assert!(!matches!(app.coordinator().state(), CoordinatorState::Running));
    }

    #[tokio::test]
    async fn save_connection_requires_a_name() {
        let mut app = app();
        let report = app
            .handle(Command::SaveConnection {
                role: Role::Source,
                name: "  ".to_string(),
            })
            .await;
        assert!(!report.success);
    }

    #[tokio::test]
    async fn load_tables_requires_a_connected_source() {
        let mut app = app();
        let report = app.handle(Command::LoadTables).await;
        assert!(!report.success);
        assert!(report.message.contains("not connected"));
        assert!(app.catalog().tables().is_empty());
    }

    #[tokio::test]
    async fn test_command_rejects_an_unbuilt_form() {
        let mut app = app();
        let report = app.handle(Command::TestConnection(Role::Source)).await;
        assert!(!report.success);
        assert_eq!(
            *app.connection_state(Role::Source),
            ConnectionState::Disconnected
        );
    }
}
