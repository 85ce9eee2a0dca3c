// ABOUTME: CLI entry point and interactive menu
// ABOUTME: Translates operator input into commands and renders projections

use anyhow::Result;
use clap::Parser;
use dialoguer::console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sql_quick_transfer::app::{ActionReport, App, Command};
use sql_quick_transfer::config::Config;
use sql_quick_transfer::profile::EngineKind;
use sql_quick_transfer::remote::TransferMode;
use sql_quick_transfer::session::{ConnectionState, Role};
use sql_quick_transfer::transfer::{parse_chunk_size, Severity};

#[derive(Parser)]
#[command(
    name = "sql-quick-transfer",
    version,
    about = "Bulk database-to-database transfer client"
)]
struct Args {
    /// Backend API base URL (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout_secs = secs;
    }

    let mut app = App::new(&config)?;
    run(&mut app).await
}

async fn run(app: &mut App) -> Result<()> {
    let theme = ColorfulTheme::default();
    loop {
        println!();
        print_status(app);

        let actions = [
            "Edit source connection",
            "Edit target connection",
            "Test a connection",
            "Connect",
            "Save a connection",
            "Load a saved connection",
            "Reload table list",
            "Choose tables",
            "Transfer options",
            "Start transfer",
            "Quit",
        ];
        let choice = Select::with_theme(&theme)
            .with_prompt("Action")
            .items(&actions)
            .default(0)
            .interact()?;

        match choice {
            0 => edit_form(app, Role::Source, &theme)?,
            1 => edit_form(app, Role::Target, &theme)?,
            2 => {
                let role = pick_role(&theme)?;
                report(app.handle(Command::TestConnection(role)).await);
            }
            3 => {
                let role = pick_role(&theme)?;
                report(app.handle(Command::Connect(role)).await);
            }
            4 => {
                let role = pick_role(&theme)?;
                let name: String = Input::with_theme(&theme)
                    .with_prompt("Connection name")
                    .interact_text()?;
                report(app.handle(Command::SaveConnection { role, name }).await);
            }
            5 => {
                let role = pick_role(&theme)?;
                let name: String = Input::with_theme(&theme)
                    .with_prompt("Connection name")
                    .interact_text()?;
                report(app.handle(Command::LoadConnection { role, name }).await);
            }
            6 => report(app.handle(Command::LoadTables).await),
            7 => choose_tables(app, &theme).await?,
            8 => transfer_options(app, &theme)?,
            9 => start_transfer(app).await,
            _ => break,
        }
    }
    Ok(())
}

fn print_status(app: &App) {
    for role in [Role::Source, Role::Target] {
        let label = match app.connection_state(role) {
            ConnectionState::Disconnected => style("disconnected".to_string()).dim(),
            ConnectionState::Testing => style("testing...".to_string()).yellow(),
            ConnectionState::Connected => style("connected".to_string()).green(),
            ConnectionState::Failed(msg) => style(format!("failed: {}", msg)).red(),
        };
        println!("  {}: {}", role, label);
    }
    println!("  selected tables: {}", app.catalog().selected().len());
    if app.is_transfer_ready() {
        println!("  {}", style("ready to transfer").green());
    }
}

fn pick_role(theme: &ColorfulTheme) -> Result<Role> {
    let idx = Select::with_theme(theme)
        .with_prompt("Role")
        .items(&["source", "target"])
        .default(0)
        .interact()?;
    Ok(if idx == 0 { Role::Source } else { Role::Target })
}

fn edit_form(app: &mut App, role: Role, theme: &ColorfulTheme) -> Result<()> {
    let engines = [EngineKind::MySql, EngineKind::Postgres];
    let engine_idx = Select::with_theme(theme)
        .with_prompt("Database type")
        .items(&["mysql", "postgresql"])
        .default(0)
        .interact()?;

    let form = app.form_mut(role);
    form.set_engine(engines[engine_idx]);

    let host: String = Input::with_theme(theme)
        .with_prompt("Host")
        .default("localhost".to_string())
        .interact_text()?;
    form.set_host(host);

    let suggested_port = form.port_text().to_string();
    let port: String = Input::with_theme(theme)
        .with_prompt("Port")
        .default(suggested_port.clone())
        .interact_text()?;
    // Accepting the suggested default is not an operator override.
    if port != suggested_port {
        form.set_port(port);
    }

    let username: String = Input::with_theme(theme)
        .with_prompt("Username")
        .allow_empty(true)
        .interact_text()?;
    form.set_username(username);

    let password = Password::with_theme(theme)
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;
    form.set_password(password);

    let database: String = Input::with_theme(theme)
        .with_prompt("Database")
        .interact_text()?;
    form.set_database(database);

    Ok(())
}

async fn choose_tables(app: &mut App, theme: &ColorfulTheme) -> Result<()> {
    if app.catalog().tables().is_empty() {
        println!(
            "{}",
            style("No tables loaded; connect the source first").yellow()
        );
        return Ok(());
    }

    let items: Vec<String> = app.catalog().tables().to_vec();
    let defaults: Vec<bool> = items.iter().map(|t| app.catalog().is_selected(t)).collect();
    let picked = MultiSelect::with_theme(theme)
        .with_prompt("Tables to transfer (space toggles, enter confirms)")
        .items(&items)
        .defaults(&defaults)
        .interact()?;

    let checked: Vec<String> = picked.into_iter().map(|i| items[i].clone()).collect();
    report(app.handle(Command::SetCheckedTables(checked)).await);
    Ok(())
}

fn transfer_options(app: &mut App, theme: &ColorfulTheme) -> Result<()> {
    let modes = [
        TransferMode::SchemaAndData,
        TransferMode::SchemaOnly,
        TransferMode::DataOnly,
    ];
    let labels: Vec<String> = modes.iter().map(|m| m.to_string()).collect();
    let current = modes
        .iter()
        .position(|m| *m == app.settings().mode)
        .unwrap_or(0);
    let mode_idx = Select::with_theme(theme)
        .with_prompt("Transfer mode")
        .items(&labels)
        .default(current)
        .interact()?;

    let chunk_text: String = Input::with_theme(theme)
        .with_prompt("Chunk size (rows per batch)")
        .default(app.settings().chunk_size.to_string())
        .interact_text()?;
    let chunk_size = match parse_chunk_size(&chunk_text) {
        Ok(value) => value,
        Err(err) => {
            println!("{}", style(err.to_string()).red());
            return Ok(());
        }
    };

    let truncate = Confirm::with_theme(theme)
        .with_prompt("Truncate target tables before load?")
        .default(app.settings().truncate)
        .interact()?;

    let settings = app.settings_mut();
    settings.mode = modes[mode_idx];
    settings.chunk_size = chunk_size;
    settings.truncate = truncate;
    Ok(())
}

async fn start_transfer(app: &mut App) {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            .expect("valid progress template")
            .progress_chars("=>-"),
    );
    bar.set_message("waiting for the backend...");

    let outcome = app.handle(Command::StartTransfer).await;

    if let Some(view) = app.coordinator().view() {
        bar.set_position(u64::from(view.percentage));
        bar.set_message(format!(
            "{} (table {}, rows {})",
            view.current_table_label, view.table_ordinal_label, view.rows_label
        ));
    }
    bar.finish();

    for entry in app.coordinator().log() {
        let line = entry.render();
        match entry.severity {
            Severity::Info => println!("{}", line),
            Severity::Success => println!("{}", style(line).green()),
            Severity::Error => println!("{}", style(line).red()),
        }
    }
    report(outcome);
}

fn report(outcome: ActionReport) {
    if outcome.success {
        println!("{} {}", style("✓").green(), outcome.message);
    } else {
        println!("{} {}", style("✗").red(), outcome.message);
    }
}
