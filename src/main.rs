//! tooling-report - static build helper for a build-tool compatibility matrix
//!
//! Loads the nested test definitions, scores every configured tool and
//! writes the static report pages.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, test loading, file write failure, etc.)

mod cli;
mod config;
mod loader;
mod models;
mod output;
mod report;
mod scoring;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use loader::SuiteLoader;
use models::{TestScores, ToolSummary};
use report::ReportInput;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("tooling-report v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_build(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Build failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .tooling-report.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to choose the tools under test and the output directory.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete build. Returns the exit code.
async fn run_build(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    if config.tools().is_empty() {
        warn!("No test subjects configured; every score will be empty");
    }

    // Step 1: Load the test suite
    let tests_dir = config.general.tests_dir.clone();
    if !args.quiet {
        println!("📥 Loading tests from: {}", tests_dir.display());
    }
    let tests = SuiteLoader::new(&tests_dir)
        .load()
        .with_context(|| format!("Failed to load tests from {}", tests_dir.display()))?;
    info!(
        "Loaded {} tests ({} nodes)",
        tests.len(),
        loader::count_nodes(&tests)
    );

    // Step 2: Score every configured tool
    let totals = scoring::calculate_score_totals(&tests, config.tools());
    let per_test = scoring::score_by_test(&tests, config.tools());

    if args.dry_run {
        print_summary(&totals, &per_test);
        if !args.quiet {
            println!("\n✅ Dry run complete. No files were written.");
        }
        return Ok(0);
    }

    // Step 3: Render the report files
    let input = ReportInput {
        tests: &tests,
        totals: &totals,
        per_test: &per_test,
        config: &config,
        generated_at: Utc::now(),
    };
    let files = report::build_output_map(&input, args.format)?;

    // Step 4: Write them out
    let output_dir = config.general.output_dir.clone();
    if !args.quiet {
        println!("📝 Writing {} files to {}", files.len(), output_dir.display());
    }
    let written = output::write_files(&files, &output_dir, !args.quiet)
        .await
        .context("Failed to write build output")?;

    if !args.quiet {
        print_summary(&totals, &per_test);
        println!(
            "\n✅ Build complete! {} files written in {:.1}s",
            written,
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(0)
}

/// Print the per-tool totals, best tool first.
fn print_summary(totals: &[ToolSummary], per_test: &[TestScores]) {
    println!("\n📊 Score Summary ({} tests):", per_test.len());
    for summary in scoring::rank_tools(totals) {
        println!(
            "   {:<12} {:>6} / {:<4} ({:.1}%)",
            summary.tool.as_str(),
            summary.score.score,
            summary.score.possible,
            summary.score.percent()
        );
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
