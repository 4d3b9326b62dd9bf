use anyhow::Result;
use clap::Parser;
use job_search::commands::{self, Mode};
use job_search::config::Settings;
use job_search::credentials::CredentialStore;
use job_search::error::Error;
use job_search::prompt::TerminalSecret;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

const EXAMPLES: &str = "\
Examples:
    job-search
    job-search --save-key
    job-search --reset-key";

#[derive(Parser)]
#[command(
    name = "job-search",
    version,
    about = "Search for current job openings using Claude with live web search",
    after_help = EXAMPLES
)]
struct Cli {
    /// Save or update your Anthropic API key
    #[arg(long, conflicts_with = "reset_key")]
    save_key: bool,

    /// Remove the saved API key
    #[arg(long)]
    reset_key: bool,

    /// Path to a settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model override
    #[arg(long)]
    model: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.save_key {
            Mode::SaveKey
        } else if self.reset_key {
            Mode::ResetKey
        } else {
            Mode::Search
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // `.env` may set RUST_LOG, so it has to be loaded before the subscriber.
    dotenvy::dotenv().ok();

    let directive = log_directive(cli.verbose, std::env::var("RUST_LOG").ok());
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&directive)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("job_search=warn")),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n❌ Error: {e:#}");
            if let Some(hint) = e.downcast_ref::<Error>().and_then(Error::hint) {
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn log_directive(verbose: bool, rust_log: Option<String>) -> String {
    match rust_log.filter(|d| !d.trim().is_empty()) {
        Some(directive) => directive,
        None if verbose => "job_search=debug".into(),
        None => "job_search=warn".into(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = CredentialStore::default_location()?;
    let mut stdout = io::stdout();

    match cli.mode() {
        Mode::SaveKey => commands::save_key(
            &store,
            &mut TerminalSecret::detect(),
            &mut io::stdin().lock(),
            &mut stdout,
        )?,
        Mode::ResetKey => commands::reset_key(&store, &mut stdout)?,
        Mode::Search => {
            let settings = Settings::resolve(
                cli.config.as_deref(),
                std::env::var("JOB_SEARCH_BASE_URL").ok(),
                cli.model,
            )?;
            commands::search_session(
                &store,
                &settings.llm,
                &mut TerminalSecret::detect(),
                &mut io::stdin().lock(),
                &mut stdout,
            )
            .await?;
        }
    }
    Ok(())
}
