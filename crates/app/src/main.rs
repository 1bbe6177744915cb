mod cli;
mod config;
mod db;
mod seed;

use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::{DB_URL_ENV, TryoutConfig};
use services::{AppServices, Clock};

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_logging(config: &TryoutConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.logging.filter)
            .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = TryoutConfig::load(cli.config.as_deref())?;
    init_logging(&config)?;

    let db_url = db::normalize_sqlite_url(
        &config.database_url(cli.db.as_deref(), std::env::var(DB_URL_ENV).ok()),
    );
    db::prepare_sqlite_file(&db_url)?;

    let clock = Clock::from_override(cli.now);
    let access = Arc::new(config.access.to_access_control());
    let app = AppServices::new_sqlite(&db_url, clock, config.scoring, access)
        .await
        .with_context(|| format!("failed to open {db_url}"))?;

    match cli.command {
        Commands::Seed => print_json(&seed::seed_demo(app.storage()).await?),
        Commands::Start(cmd) => {
            let session = app.assessment().start_session(cmd.user, cmd.package).await?;
            print_json(&session)
        }
        Commands::Answer(cmd) => {
            let is_correct = app
                .assessment()
                .submit_answer(cmd.session, cmd.question, &cmd.option, cmd.user)
                .await?;
            print_json(&json!({
                "session_id": cmd.session,
                "question_id": cmd.question,
                "is_correct": is_correct,
            }))
        }
        Commands::Finish(cmd) => {
            print_json(&app.assessment().finish_session(cmd.session, cmd.user).await?)
        }
        Commands::Results(cmd) => {
            print_json(&app.assessment().get_results(cmd.session, cmd.user).await?)
        }
        Commands::Progress(cmd) => {
            print_json(&app.assessment().progress(cmd.session, cmd.user).await?)
        }
        Commands::Ranking(cmd) => print_json(&app.leaderboard().get_ranking(cmd.package).await?),
        Commands::Percentile(cmd) => {
            print_json(&app.leaderboard().get_percentile(cmd.session).await?)
        }
        Commands::Analytics(cmd) => print_json(&app.analytics().get_analytics(cmd.user).await?),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
