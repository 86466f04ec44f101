//! Echo Load Tester - Main CLI Application
//!
//! Opens a fixed number of TCP connections to an echo server, drives
//! round-trips on each until the configured duration elapses, and prints
//! throughput and latency figures.

use clap::Parser;
use echo_load_tester::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config, EnvManager},
    error::{AppError, ErrorReporter, Result},
    executor::LoadDriver,
    logging::LoggerFactory,
    output::{format_ms, OutputCoordinator, OutputFormatterFactory},
    BUILD_TIME, GIT_COMMIT, PKG_NAME, TARGET_TRIPLE, VERSION,
};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    // Worker panics are caught at the join and reported per worker
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic: {}", panic_info);
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    if let Err(e) = run_application(cli).await {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::config)?;

    if cli.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!(
            "Built {} from {} for {}",
            BUILD_TIME.unwrap_or("unknown"),
            GIT_COMMIT.unwrap_or("unknown"),
            TARGET_TRIPLE.unwrap_or("unknown")
        );
        println!("Debug mode enabled");
        println!();
    }

    let config = load_config(cli)?;

    for warning in validate_config(&config)? {
        eprintln!("{}", warning.format(config.enable_color));
    }

    if config.debug {
        println!("Configuration loaded successfully:");
        for line in display_config_summary(&config).lines() {
            println!("  {}", line);
        }
        if let Some(problems) = EnvManager::check_env_file(Path::new(".env"))? {
            for problem in problems {
                println!("  .env: {}", problem);
            }
        }
        println!();
    }

    let factory = LoggerFactory::new(config.clone());
    let logger = factory.create_logger("MAIN").await;
    logger.add_context_field("target".to_string(), config.target()).await;
    echo_load_tester::log_debug!(logger, "Session {}", factory.session_id());

    let driver = LoadDriver::new(logger.clone());
    let report = driver.run_config(&config).await?;

    echo_load_tester::log_debug!(
        logger,
        "Run finished in {} with {} samples",
        format_ms(report.elapsed),
        report.aggregate.all_latencies.len()
    );

    let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
    let coordinator = OutputCoordinator::new(formatter);

    if report.all_failed() {
        eprintln!(
            "{}",
            coordinator.display_warning(&format!("every worker against {} failed", report.target))?
        );
    }

    println!("{}", coordinator.display_report(&report)?);

    Ok(())
}
