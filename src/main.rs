//! Solana Vanity Address Generator CLI
//!
//! Usage:
//!   sol_vanity -p Sun -c yes        # Address starting with exactly "Sun"
//!   sol_vanity -p abc -c no -w 8    # Any case of "abc", 8 workers
//!   sol_vanity                      # Prompt for prefix and case rule

use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use sol_vanity::{
    Config, ConfigError, Coordinator, Pattern, RunResult, RunSummary, SearchConfig,
    SolanaGenerator, WalletFile,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_names(true)
        .init();

    let config = Config::parse();

    let search_config = match resolve(&config) {
        Ok(search_config) => search_config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let pattern = Pattern::new(search_config.prefix.as_str(), search_config.case_sensitive);

    println!("Solana Vanity Address Generator");
    println!("===============================");
    println!("Prefix:     {}", search_config.prefix);
    let case_rule = if pattern.case_sensitive() {
        "sensitive"
    } else {
        "insensitive"
    };
    println!("Case:       {}", case_rule);
    println!("Difficulty: {}", pattern.difficulty_description());
    println!("Workers:    {}", search_config.worker_count);
    println!("Batch size: {}", format_number(u64::from(search_config.batch_size)));
    println!("Output:     {}", config.output.display());
    println!();

    let sink = WalletFile::new(&config.output);
    let coordinator = Coordinator::new(search_config, Arc::new(SolanaGenerator), sink);

    let stop = coordinator.stop_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("\nInterrupted. Stopping all workers...");
        stop.cancel();
    }) {
        warn!(error = %e, "failed to install Ctrl-C handler");
    }

    println!("Searching... (Press Ctrl+C to stop)\n");

    match coordinator.start() {
        Ok(summary) => print_summary(&summary, &config),
        Err(e) => {
            eprintln!("Search failed: {}", e);
            process::exit(1);
        }
    }
}

/// Fills in prefix and case rule from the CLI or, when absent, from stdin.
fn resolve(config: &Config) -> Result<SearchConfig, ConfigError> {
    let prefix = match &config.prefix {
        Some(prefix) => prefix.clone(),
        None => prompt("Enter the desired wallet prefix: ")?,
    };
    let case_sensitive = match &config.case_sensitive {
        Some(answer) => answer.clone(),
        None => prompt("Case-sensitive? (yes/no): ")?,
    };

    config.search_config(&prefix, &case_sensitive)
}

fn prompt(question: &str) -> Result<String, ConfigError> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", question)?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_summary(summary: &RunSummary, config: &Config) {
    match &summary.result {
        RunResult::Found(found) => {
            println!("\n=== Match Found (worker {}) ===", found.worker_id);
            println!("Wallet Address: {}", found.public_key);
            println!("Private Key:    {}", found.private_key);
            if summary.persisted > 0 {
                println!("\nSaved to {}", config.output.display());
            }
            if summary.matches > 1 {
                println!(
                    "{} matches found while stopping, {} saved.",
                    summary.matches, summary.persisted
                );
            }
        }
        RunResult::Cancelled => {
            println!("\nStopped by user.");
            if summary.persisted > 0 {
                println!(
                    "{} match(es) found while stopping, saved to {}",
                    summary.persisted,
                    config.output.display()
                );
            }
        }
    }

    println!("\n--- Final Statistics ---");
    println!("Total attempts:  {}", format_number(summary.snapshot.total_attempts));
    println!("Matches found:   {}", summary.matches);
    println!("Time elapsed:    {:.2}s", summary.elapsed.as_secs_f64());
    println!("Average speed:   {}/s", format_number(summary.average_speed() as u64));
    if summary.failed_workers > 0 {
        println!("Failed workers:  {}", summary.failed_workers);
    }
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
