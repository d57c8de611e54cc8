use clap::{Parser, Subcommand, ValueEnum};
use compactores_config::ConfigStore;
use std::path::PathBuf;
use std::process;

/// compactores config CLI — bootstrap, inspect, and repair the on-disk
/// configuration store
#[derive(Parser)]
#[command(name = "compactores-config", version, about)]
struct Cli {
    /// Application config directory that holds the `compactores` root
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Application version the store is validated against
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    app_version: String,

    /// Output format
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Bootstrap the store (generating defaults if needed) and load all documents
    Init,

    /// Show marker versions, staleness, and document counts
    Status,

    /// Resolve a pending configuration update
    Update {
        /// What to do with the outdated configuration
        action: UpdateAction,
    },

    /// Wipe all documents and regenerate the bundled defaults
    Reset {
        /// Cause reported by the consumer that failed to interpret the config
        #[arg(long)]
        cause: Option<String>,

        /// Confirm the wipe; without this the command fails
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum UpdateAction {
    /// Regenerate the defaults and record the running version
    Accept,
    /// Keep the current documents and stop prompting for this version
    Decline,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::open(&cli.config_dir, &cli.app_version)?;

    match cli.command {
        Command::Init => {
            if store.pending_update().is_some() {
                println!(
                    "The configuration was generated by another application version; \
                     run `update accept` or `update decline` to resolve."
                );
            }
            print_status(&store.status(), &cli.format);
        }

        Command::Status => {
            print_status(&store.status(), &cli.format);
        }

        Command::Update { action } => {
            let pending = store
                .pending_update()
                .ok_or("No configuration update is pending")?;
            match action {
                UpdateAction::Accept => {
                    pending.accept(store.bundle())?;
                    println!("Configuration regenerated; restart the application.");
                }
                UpdateAction::Decline => {
                    pending.decline(store.bundle())?;
                    println!("Keeping the current configuration.");
                }
            }
        }

        Command::Reset { cause, yes } => {
            let failure = cause.as_deref().map(|c| store.report_load_failure(c));
            if !yes {
                // non-interactive contract: no reset affordance, surface the cause
                return Err(match failure {
                    Some(e) => Box::new(e),
                    None => "configuration reset is destructive; pass --yes to confirm".into(),
                });
            }
            store.reset_to_defaults()?;
            println!("Configuration reset to defaults; restart the application.");
        }
    }

    Ok(())
}

fn print_status(status: &serde_json::Value, format: &OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(status).unwrap());
        }
        OutputFormat::Text => {
            println!("config root:     {}", status["root"].as_str().unwrap_or("?"));
            println!(
                "created by:      {}",
                status["versions"]["created"].as_str().unwrap_or("?")
            );
            println!(
                "last updated by: {}",
                status["versions"]["updated"].as_str().unwrap_or("?")
            );
            println!(
                "active version:  {}",
                status["active_version"].as_str().unwrap_or("?")
            );
            println!(
                "stale:           {}",
                status["stale"].as_bool().unwrap_or(false)
            );
            if let Some(docs) = status["documents"].as_object() {
                for (category, count) in docs {
                    println!("{category}: {count} documents");
                }
            }
        }
    }
}
