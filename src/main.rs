use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use sibyl::config::{EngineConfig, ENGINE_CANDIDATES};
use sibyl::{CalibratorKind, PolicyKind, Premise, ReasonerModel};

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Bridge to an external spatial reasoning engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a candidate premise against background premises
    Query {
        /// Background premise as relation,subject,object (repeatable)
        #[arg(long = "task", required = true)]
        task: Vec<String>,

        /// Candidate premise as relation,subject,object (repeatable)
        #[arg(long = "choice", required = true)]
        choice: Vec<String>,

        /// Decision policy (skeptical, credulous, initial, adapted)
        #[arg(long, default_value = "initial")]
        policy: String,

        /// Engine executable (defaults to PATH discovery)
        #[arg(long)]
        engine: Option<PathBuf>,

        /// Configuration file
        #[arg(long, default_value = "sibyl.toml")]
        config: PathBuf,

        /// Per-verdict timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Check engine availability
    Doctor {
        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Query {
            task,
            choice,
            policy,
            engine,
            config,
            timeout,
            json,
        } => run_query(task, choice, policy, engine, config, timeout, json),
        Commands::Doctor { json } => run_doctor(json),
    }
}

fn run_query(
    task: Vec<String>,
    choice: Vec<String>,
    policy: String,
    engine: Option<PathBuf>,
    config_path: PathBuf,
    timeout: Option<u64>,
    json: bool,
) -> Result<()> {
    let policy = PolicyKind::from_name(&policy)?;

    let task: Vec<Premise> = task
        .iter()
        .map(|raw| Premise::parse(raw))
        .collect::<sibyl::Result<_>>()
        .context("invalid --task premise")?;
    let choice: Vec<Premise> = choice
        .iter()
        .map(|raw| Premise::parse(raw))
        .collect::<sibyl::Result<_>>()
        .context("invalid --choice premise")?;

    let mut config = EngineConfig::load_or_default(&config_path)?;
    if let Some(engine) = engine {
        config.executable = Some(engine);
    }
    if let Some(secs) = timeout {
        config.query_timeout_secs = secs;
    }

    let mut model = ReasonerModel::start(&config, policy, CalibratorKind::Batch)
        .context("failed to start engine session")?;
    let accepted = model.predict_verify(&task, &choice)?;
    model.terminate()?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "policy": policy.name(),
                "accepted": accepted,
            })
        );
    } else if accepted {
        println!("{} candidate accepted ({})", "✓".green(), policy.name());
    } else {
        println!("{} candidate rejected ({})", "✗".red(), policy.name());
    }
    Ok(())
}

fn run_doctor(json: bool) -> Result<()> {
    let found = EngineConfig::default().resolve_executable().ok();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "candidates": ENGINE_CANDIDATES,
                "executable": found.as_ref().map(|p| p.display().to_string()),
            })
        );
        return Ok(());
    }

    match found {
        Some(path) => println!("{} engine executable: {}", "✓".green(), path.display()),
        None => {
            println!(
                "{} no engine executable found (tried {})",
                "✗".red(),
                ENGINE_CANDIDATES.join(", ")
            );
            println!("  install Clozure CL or point --engine at the binary");
        }
    }
    Ok(())
}
