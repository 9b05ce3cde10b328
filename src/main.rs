use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use notefs::config::Config;
use notefs::remote::{Gateway, MemoryGateway, RemoteClient};
use notefs::shell::{Outcome, Shell};
use notefs::vfs::PathIndex;

#[derive(Parser)]
#[command(name = "notefs")]
#[command(about = "Browse a remote page store as a filesystem", long_about = None)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "notefs.json")]
    config: PathBuf,

    /// Use an empty in-memory store instead of a remote (demo mode)
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List a directory
    Ls { path: String },

    /// Print a file
    Cat { path: String },

    /// Show record metadata for a path
    Stat { path: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let index = if cli.offline {
        let gateway: Arc<dyn Gateway> = Arc::new(MemoryGateway::new());
        Arc::new(PathIndex::new(
            gateway,
            None,
            std::time::Duration::from_secs(notefs::config::DEFAULT_CACHE_TTL_SECS),
        ))
    } else {
        let cfg = Config::load(&cli.config)?;
        let gateway: Arc<dyn Gateway> =
            Arc::new(RemoteClient::new(cfg.base_url.clone(), cfg.token.clone())?);
        Arc::new(PathIndex::new(
            gateway,
            cfg.root_id.clone().map(notefs::model::RecordId),
            cfg.cache_ttl(),
        ))
    };

    // Paths cannot resolve before the first successful rebuild.
    index.refresh(true).context("initial index")?;

    match cli.command {
        None => run_shell(index),
        Some(Commands::Ls { path }) => one_shot(index, &format!("ls \"{path}\"")),
        Some(Commands::Cat { path }) => one_shot(index, &format!("cat \"{path}\"")),
        Some(Commands::Stat { path }) => one_shot(index, &format!("stat \"{path}\"")),
    }
}

fn one_shot(index: Arc<PathIndex>, line: &str) -> Result<()> {
    let mut shell = Shell::new(index);
    match shell.run_line(line)? {
        Outcome::Lines(lines) => {
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
        Outcome::Exit => Ok(()),
    }
}

fn run_shell(index: Arc<PathIndex>) -> Result<()> {
    let mut shell = Shell::new(index);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "{}", shell.prompt()).context("write prompt")?;
        stdout.flush().context("flush prompt")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("read line")? == 0 {
            return Ok(());
        }

        match shell.run_line(&line) {
            Ok(Outcome::Exit) => return Ok(()),
            Ok(Outcome::Lines(lines)) => {
                for line in lines {
                    println!("{line}");
                }
            }
            Err(err) => eprintln!("error: {err}"),
        }
    }
}
