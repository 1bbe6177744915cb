use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use tryout_core::model::{PackageId, QuestionId, SessionId, UserId};

#[derive(Parser)]
#[command(name = "tryout", version, about = "Tryout sessions, scoring and analytics")]
pub struct Cli {
    /// Database URL (overrides TRYOUT_DB_URL and the config file)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Config file path (default: ./tryout.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Pin the clock to an RFC 3339 timestamp
    #[arg(long, global = true)]
    pub now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the demo package, questions and study materials
    Seed,
    /// Start a session on a package
    Start(StartCommand),
    /// Submit an answer to one question
    Answer(AnswerCommand),
    /// Finish a session and freeze its scores
    Finish(SessionCommand),
    /// Show the frozen result of a finished session
    Results(SessionCommand),
    /// Show how far a session has progressed
    Progress(SessionCommand),
    /// Leaderboard of a package, best attempt per user
    Ranking(PackageCommand),
    /// Percentile of a finished session within its package
    Percentile(PercentileCommand),
    /// Topic mastery, weaknesses, recommendations and pass prediction
    Analytics(UserCommand),
}

#[derive(Args)]
pub struct StartCommand {
    #[arg(long)]
    pub user: UserId,
    #[arg(long)]
    pub package: PackageId,
}

#[derive(Args)]
pub struct AnswerCommand {
    #[arg(long)]
    pub user: UserId,
    #[arg(long)]
    pub session: SessionId,
    #[arg(long)]
    pub question: QuestionId,
    /// Option letter A-E
    #[arg(long)]
    pub option: String,
}

#[derive(Args)]
pub struct SessionCommand {
    #[arg(long)]
    pub user: UserId,
    #[arg(long)]
    pub session: SessionId,
}

#[derive(Args)]
pub struct PackageCommand {
    #[arg(long)]
    pub package: PackageId,
}

#[derive(Args)]
pub struct PercentileCommand {
    #[arg(long)]
    pub session: SessionId,
}

#[derive(Args)]
pub struct UserCommand {
    #[arg(long)]
    pub user: UserId,
}
