//! `skillbridge-cli` – SkillBridge command line interface
//!
//! The entry point for running the dispatcher against the in-process demo
//! backends.  It:
//!
//! 1. Initialises structured logging (with optional OTLP export).
//! 2. Loads `~/.skillbridge/config.toml`, writing defaults on first run.
//! 3. Starts the dispatch loop over an [`InMemoryChannel`] and a
//!    [`SimGateway`] on a background Tokio task.
//! 4. Drops the user into an interactive planner shell (`help` lists the
//!    commands).
//! 5. Intercepts **Ctrl-C** to raise the shutdown flag and stop the loop.

mod config;
mod shell;

use colored::Colorize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, warn};

use skillbridge_channel::{InMemoryChannel, PlannerClient};
use skillbridge_dispatch::Dispatcher;
use skillbridge_gateway::SimGateway;

fn main() {
    // Hold the guard for the whole process so pending spans are flushed on
    // exit.
    let _telemetry_guard = skillbridge_dispatch::init_tracing("skillbridge");

    print_banner();

    // ── Config ────────────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  No config found – defaults written to {}",
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("{}: {}", "Could not write default config".yellow(), e),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };

    // ── Shared shutdown flag ──────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_ctrlc = shutdown.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!(
            "{}",
            "⚠  Ctrl-C received – stopping the dispatcher …".yellow().bold()
        );
        shutdown_ctrlc.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; graceful shutdown on Ctrl-C will not be available");
    }

    // ── Runtime and backends ──────────────────────────────────────────────
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build Tokio runtime");
            eprintln!("{}: {}", "Fatal".red(), e);
            return;
        }
    };

    let channel = InMemoryChannel::new();
    let gateway = SimGateway::new();
    let planner = PlannerClient::new(channel.clone());

    let dispatcher = Dispatcher::new(channel, gateway.clone());
    let poll_interval = Duration::from_millis(cfg.poll_interval_ms);
    let dispatcher_task = {
        let shutdown = shutdown.clone();
        runtime.spawn(async move { dispatcher.run(shutdown, poll_interval).await })
    };

    println!(
        "  Dispatcher polling every {} ms (sim gateway).",
        cfg.poll_interval_ms.to_string().bold()
    );
    println!("  Type {} for a list of commands.\n", "help".bold().cyan());

    // ── Interactive planner shell ─────────────────────────────────────────
    shell::run(
        shutdown.clone(),
        planner,
        gateway,
        runtime.handle().clone(),
        cfg,
    );

    // ── Shutdown ──────────────────────────────────────────────────────────
    shutdown.store(true, Ordering::SeqCst);
    match runtime.block_on(dispatcher_task) {
        Ok(Ok(())) => println!("{}", "  ✓ Dispatcher stopped cleanly.".green()),
        Ok(Err(e)) => {
            error!(error = %e, "dispatcher stopped with a fatal error");
            println!("{}: {}", "Dispatcher error".red(), e);
        }
        Err(e) => {
            error!(error = %e, "dispatcher task panicked");
            println!("{}: {}", "Dispatcher task failed".red(), e);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"   ____    __   _  __ ____       _     __          "#.bold().cyan());
    println!("{}", r#"  / __/___/ /__(_)/ / / / /  ____(_)___/ /__ ____   "#.bold().cyan());
    println!("{}", r#" _\ \/  '_/ / // / / / _  \/ __/ / _  / _ `/ -_)  "#.bold().cyan());
    println!("{}", r#"/___/_/\_\_/_//_/_/ /____/_/ /_/\_,_/\_, /\__/   "#.bold().cyan());
    println!("{}", r#"                                    /___/        "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "SkillBridge".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Parameter-channel skill dispatcher");
    println!();
}
