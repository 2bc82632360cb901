use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cinematch_core::{AppConfig, CinematchError, ExitCode, Locale, TitleSet};
use cinematch_tmdb::{DatasetPipeline, GenerateOptions, TmdbError, TmdbSource};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "cinematch",
    about = "Match a movie list against TMDB and generate an enriched dataset",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of ~/.config/cinematch/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output in JSON format.
    /// Also enabled by setting CINEMATCH_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every movie in a CSV file and write the YAML dataset.
    Generate {
        /// Input CSV: director, year, title, country, preference, award, award.
        input: PathBuf,
        /// Output YAML dataset.
        output: PathBuf,
        /// Keep records already present in the output and resolve only new ones.
        #[arg(long)]
        incremental: bool,
    },

    /// Show how a raw title is split into main and supplemental titles.
    ParseTitle { title: String },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

// ─── Config Actions ──────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Print the config file path.
    Path,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_code(&err) as i32);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();
    let json_output = cli.json || std::env::var("CINEMATCH_JSON").as_deref() == Ok("1");

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path)?;
    tracing::debug!("config loaded from {}", config_path.display());

    match cli.command {
        // ── Generate ───────────────────────────────────────────────────────
        Commands::Generate {
            input,
            output,
            incremental,
        } => {
            let source = TmdbSource::from_config(&config.tmdb)?;
            let pipeline = DatasetPipeline::new(source, &config);
            let options = GenerateOptions::new(input, output).incremental(incremental);
            let summary = pipeline.generate(&options).await?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": {
                        "output": options.output,
                        "incremental_file": summary.incremental_file,
                        "processed": summary.processed,
                        "identified": summary.identified,
                        "unresolved": summary.unresolved,
                        "with_imdb_id": summary.with_imdb_id,
                        "with_poster": summary.with_poster,
                        "survivors": summary.survivors,
                        "output_total": summary.output_total,
                    },
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                println!("{summary}");
                println!("Wrote {}", options.output.display());
                if let Some(path) = &summary.incremental_file {
                    println!("Wrote {}", path.display());
                }
            }
        }

        // ── Parse title ────────────────────────────────────────────────────
        Commands::ParseTitle { title } => {
            let parsed = TitleSet::parse(&title)?;
            let korean = parsed.get_title_by_locale(Some(Locale::Korean));

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "title_set": parsed, "korean_title": korean },
                }))?;
            } else {
                println!("Parsing '{}'", parsed.raw_title);
                println!(
                    "  Main Title: '{}' (Locale: {})",
                    parsed.main_title.text, parsed.main_title.locale
                );
                if !parsed.supplemental_titles.is_empty() {
                    println!("  Supplemental Titles:");
                    for variant in &parsed.supplemental_titles {
                        println!("    - '{}' (Locale: {})", variant.text, variant.locale);
                    }
                }
                println!("  Retrieved Korean Title: '{}'", korean.unwrap_or_default());
            }
        }

        // ── Config ─────────────────────────────────────────────────────────
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":config}))?;
                } else {
                    print!("{}", config.to_toml()?);
                }
            }
            ConfigAction::Path => {
                if json_output {
                    print_json(&serde_json::json!({
                        "status": "ok",
                        "data": { "path": config_path, "exists": config_path.exists() }
                    }))?;
                } else {
                    println!("{}", config_path.display());
                }
            }
        },
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    if let Some(err) = err.downcast_ref::<CinematchError>() {
        return err.exit_code();
    }
    match err.downcast_ref::<TmdbError>() {
        Some(TmdbError::Core(err)) => err.exit_code(),
        Some(TmdbError::MissingApiKey(_)) => ExitCode::InvalidInput,
        _ => ExitCode::GeneralError,
    }
}
