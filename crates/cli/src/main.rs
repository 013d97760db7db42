use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use contactsync_core::ContactSyncTrigger;
use contactsync_domain::Config;
use contactsync_infra::database::{DbManager, SqliteExternalRefStore};
use contactsync_infra::{config, logging, GoogleContactsConnector};
use tracing::{debug, info};

mod input;
use input::RunInput;

#[derive(Parser, Debug)]
#[clap(name = "contactsync", version, about = "Mirror company and contact changes into an external directory")]
struct CliArgs {
    /// Configuration file (JSON or TOML). Without it, the environment and the
    /// standard locations are tried.
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[clap(long, global = true)]
    json_logs: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synchronize one change event and print the result as JSON.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON change event file, or `-` for stdin.
    #[clap(long, conflicts_with_all = ["code", "entity"])]
    event: Option<String>,

    /// Legacy trigger code such as COMPANY_CREATE or CONTACT_DELETE.
    #[clap(long, requires = "entity")]
    code: Option<String>,

    /// JSON entity snapshot file for --code, or `-` for stdin.
    #[clap(long, requires = "code")]
    entity: Option<String>,
}

impl RunArgs {
    fn into_input(self) -> Result<RunInput> {
        match (self.event, self.code, self.entity) {
            (Some(source), _, _) => {
                Ok(RunInput::Event(input::parse_event(&input::read_source(&source)?)?))
            }
            (None, Some(code), Some(source)) => Ok(RunInput::Code {
                code,
                entity: input::parse_entity(&input::read_source(&source)?)?,
            }),
            _ => anyhow::bail!("either --event or --code with --entity is required"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let dotenv = dotenvy::dotenv();
    let cli_args = CliArgs::parse();

    logging::init(cli_args.json_logs);
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) => debug!(error = %e, "no .env file loaded"),
    }

    let config = match cli_args.config {
        Some(path) => config::load_from_file(Some(path)),
        None => config::load(),
    }
    .context("failed to load configuration")?;

    match cli_args.command {
        Command::Run(args) => run(config, args.into_input()?).await,
    }
}

async fn run(config: Config, input: RunInput) -> Result<ExitCode> {
    let manager = DbManager::from_config(&config.database).context("failed to open database")?;
    let store = SqliteExternalRefStore::new(Arc::new(manager));
    store.migrate().await.context("failed to migrate database")?;

    let connector =
        GoogleContactsConnector::new(config.google).context("invalid google configuration")?;
    let trigger = ContactSyncTrigger::new(config.sync, Arc::new(connector), Arc::new(store));

    let result = match input {
        RunInput::Event(event) => trigger.run(event).await,
        RunInput::Code { code, entity } => trigger.run_code(&code, entity).await,
    }
    .context("failed to record sync outcome")?;

    info!(status = result.status.as_str(), "run finished");
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(if result.is_failure() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
