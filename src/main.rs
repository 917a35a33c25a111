mod chat;
mod common;
mod config;
mod insight;
mod network;
mod portrait;
mod storage;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use chat::ChatSession;
use common::Result;
use config::AppConfig;
use insight::{InsightService, InsightSource};
use network::{HttpApi, ZodiacApi};
use portrait::PortraitService;
use storage::ProfileStore;
use ui::ChatApp;
use ui::components::insight_view;

#[derive(Parser)]
#[command(
    name = "celestial_client",
    version,
    about = "Birth portrait, daily transit insight and a streaming chat guide"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the stored birth profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Show today's transit insight
    Insight,
    /// Chat with the celestial guide
    Chat,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Create a portrait and store the birth profile
    Set {
        #[arg(long)]
        city: String,
        /// Birth date and time, ISO-8601
        #[arg(long)]
        datetime: String,
    },
    /// Print the stored portrait
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);

    match run(cli.command, &app_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, app_config: &AppConfig) -> Result<()> {
    storage::ensure_data_dir(&app_config.database_path)?;
    let mut profile = ProfileStore::with_path(&app_config.database_path)?;
    let api: Arc<dyn ZodiacApi> = Arc::new(HttpApi::new(app_config.api_base_url.clone()));
    log::debug!("Using API at {}", app_config.api_base_url);

    match command {
        Command::Profile {
            action: ProfileAction::Set { city, datetime },
        } => {
            let portrait = PortraitService::new(api)
                .create(&city, &datetime, &mut profile)
                .await?;
            print!("{}", insight_view::render_portrait(&portrait));
        }
        Command::Profile {
            action: ProfileAction::Show,
        } => match PortraitService::new(api).cached(&profile) {
            Some(portrait) => print!("{}", insight_view::render_portrait(&portrait)),
            None => println!("No profile yet. Run `profile set --city <CITY> --datetime <ISO>`."),
        },
        Command::Insight => {
            let (insight, source) = InsightService::new(api)
                .load(&profile)
                .await
                .inspect_err(|_| eprintln!("Unable to load insight"))?;
            if source == InsightSource::Cache {
                log::info!("Showing today's cached insight");
            }
            print!("{}", insight_view::render_insight(&insight));
        }
        Command::Chat => {
            ChatApp::new(ChatSession::new(api), profile).run().await?;
        }
    }

    Ok(())
}
