use anyhow::{Context, Result};
use atlas_analyzer::{AnalyzerConfig, ProjectAnalyzer};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "Structural source analysis with boundary-safe chunking", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a project tree and print the result as JSON
    Analyze {
        /// Project root directory
        path: PathBuf,

        /// Exclusion glob, repeatable
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Load configuration from a TOML file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the chunk size threshold (bytes)
        #[arg(long)]
        chunk_threshold: Option<usize>,

        /// Override the large-file threshold (bytes)
        #[arg(long)]
        large_file_threshold: Option<usize>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Print per-module summary lines instead of full JSON
        #[arg(long)]
        summary: bool,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Analyze {
            path,
            exclude,
            config,
            chunk_threshold,
            large_file_threshold,
            pretty,
            summary,
        } => {
            let mut analyzer_config = match config {
                Some(config_path) => AnalyzerConfig::from_toml_path(&config_path)
                    .with_context(|| format!("loading {}", config_path.display()))?,
                None => AnalyzerConfig::default(),
            };
            analyzer_config.exclude.extend(exclude);
            if chunk_threshold.is_some() {
                analyzer_config.chunk_size_threshold = chunk_threshold;
            }
            if large_file_threshold.is_some() {
                analyzer_config.large_file_threshold = large_file_threshold;
            }
            analyzer_config.validate()?;
            log::debug!("effective configuration: {analyzer_config:?}");

            let mut analyzer = ProjectAnalyzer::new(&path, analyzer_config)
                .with_context(|| format!("opening {}", path.display()))?;
            let analysis = analyzer.analyze().await?;

            if summary {
                print_summary(&analysis);
            } else if pretty {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                println!("{}", serde_json::to_string(&analysis)?);
            }
        }
    }

    Ok(())
}

fn print_summary(analysis: &atlas_analyzer::ProjectAnalysis) {
    println!(
        "{} modules | {} skipped | {} failed | primary language: {}",
        analysis.modules.len(),
        analysis.stats.skipped,
        analysis.stats.failed,
        analysis.primary_language
    );

    for module in &analysis.modules {
        println!(
            "  {} [{}] functions={} classes={} complexity={}",
            module.file.relative_path,
            module.strategy.as_str(),
            module.total_functions,
            module.total_classes,
            module.complexity
        );
    }
}
