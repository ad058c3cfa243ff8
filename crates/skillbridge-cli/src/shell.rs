//! Interactive planner shell.
//!
//! Stands in for the high-level planner: every command writes the same
//! channel keys a real planner process would, then waits for the dispatcher
//! to publish a result.
//!
//! Supported commands:
//!   nav [target]        – navigate to a named target (or staged waypoints)
//!   waypoints <list>    – stage `x,y,z|x,y,z|` for the next nav
//!   pick <object>       – pick up an object
//!   place               – semantic place of the held object
//!   opendrawer          – open the drawer
//!   closedrawer         – close the drawer
//!   findagentaction     – report the observed human state
//!   human <state>       – set the observed human state
//!   fail <skill> / pass <skill> – script / clear a sim skill failure
//!   result              – show the last published result
//!   help, quit, exit

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use skillbridge_channel::{InMemoryChannel, PlannerClient};
use skillbridge_gateway::SimGateway;
use skillbridge_types::{Command, SkillKind, SkillResult, decode_waypoint_list, wire};
use tokio::runtime::Handle;

use crate::config::Config;

/// Entry point for the interactive shell.
///
/// `shutdown` is polled each iteration; when set the shell exits cleanly.
pub fn run(
    shutdown: Arc<AtomicBool>,
    planner: PlannerClient<InMemoryChannel>,
    gateway: SimGateway,
    handle: Handle,
    config: Config,
) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "skillbridge>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((v, r)) => (v, r.trim()),
            None => (trimmed, ""),
        };

        match verb {
            "help" => cmd_help(),
            "quit" | "exit" => {
                println!("{}", "Goodbye.".green());
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            "nav" => {
                let target = if rest.is_empty() { wire::NONE_FIELD } else { rest };
                dispatch_and_wait(&handle, &planner, &config, SkillKind::Nav, target);
            }
            "waypoints" => cmd_waypoints(&handle, &planner, rest),
            "pick" => {
                if rest.is_empty() {
                    println!("{} pick <object>", "Usage:".yellow());
                } else {
                    dispatch_and_wait(&handle, &planner, &config, SkillKind::Pick, rest);
                }
            }
            "place" => dispatch_and_wait(&handle, &planner, &config, SkillKind::Place, wire::NONE_FIELD),
            "opendrawer" => {
                dispatch_and_wait(&handle, &planner, &config, SkillKind::OpenDrawer, wire::NONE_FIELD)
            }
            "closedrawer" => {
                dispatch_and_wait(&handle, &planner, &config, SkillKind::CloseDrawer, wire::NONE_FIELD)
            }
            "findagentaction" => dispatch_and_wait(
                &handle,
                &planner,
                &config,
                SkillKind::FindAgentAction,
                wire::NONE_FIELD,
            ),
            "human" => {
                if rest.is_empty() {
                    println!("{} human <state>", "Usage:".yellow());
                } else if let Err(e) = handle.block_on(planner.set_human_state(rest)) {
                    println!("{}: {}", "Channel error".red(), e);
                } else {
                    println!("  human_state = {}", rest.yellow());
                }
            }
            "fail" => cmd_script_failure(&gateway, rest, true),
            "pass" => cmd_script_failure(&gateway, rest, false),
            "result" => cmd_result(&handle, &planner),
            other => {
                println!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "help".bold()
                );
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help() {
    println!();
    println!("{}", "SkillBridge Planner Commands".bold().underline());
    println!("  {}        – navigate to a named target (or staged waypoints)", "nav [target]".bold().cyan());
    println!("  {}    – stage x,y,z|x,y,z| for the next nav", "waypoints <list>".bold().cyan());
    println!("  {}       – pick up an object", "pick <object>".bold().cyan());
    println!("  {}               – semantic place of the held object", "place".bold().cyan());
    println!("  {}  – drawer skills", "opendrawer  closedrawer".bold().cyan());
    println!("  {}     – report the observed human state", "findagentaction".bold().cyan());
    println!("  {}       – set the observed human state", "human <state>".bold().cyan());
    println!("  {} – script / clear a sim skill failure", "fail <skill>  pass <skill>".bold().cyan());
    println!("  {}              – show the last published result", "result".bold().cyan());
    println!("  {}          – exit", "quit  exit".bold().cyan());
    println!();
}

fn cmd_waypoints(handle: &Handle, planner: &PlannerClient<InMemoryChannel>, raw: &str) {
    if raw.is_empty() {
        println!("{} waypoints x,y,z|x,y,z|", "Usage:".yellow());
        return;
    }
    // Normalise a missing terminal delimiter before validating.
    let normalised = if raw.ends_with('|') {
        raw.to_string()
    } else {
        format!("{raw}|")
    };
    match decode_waypoint_list(&normalised) {
        Ok(Some(waypoints)) => {
            if let Err(e) = handle.block_on(planner.stage_waypoints(&waypoints)) {
                println!("{}: {}", "Channel error".red(), e);
                return;
            }
            println!(
                "  Staged {} waypoint(s) for the next {}.",
                waypoints.len().to_string().bold(),
                "nav".cyan()
            );
        }
        Ok(None) => {
            // `waypoints None` (or an empty list) clears the staged list.
            if let Err(e) = handle.block_on(planner.stage_waypoints(&[])) {
                println!("{}: {}", "Channel error".red(), e);
            } else {
                println!("  Cleared staged waypoints.");
            }
        }
        Err(e) => println!("{}: {}", "Invalid waypoint list".red(), e),
    }
}

fn cmd_script_failure(gateway: &SimGateway, raw: &str, failing: bool) {
    match SkillKind::from_wire(raw) {
        Some(kind) => {
            gateway.set_skill_failure(kind, failing);
            let verb = if failing { "will fail" } else { "will succeed" };
            println!("  sim: {} {}", kind.to_string().bold(), verb.yellow());
        }
        None => println!(
            "{} unknown skill '{}' (expected one of: nav pick place opendrawer closedrawer findagentaction)",
            "Error:".red(),
            raw.yellow()
        ),
    }
}

fn cmd_result(handle: &Handle, planner: &PlannerClient<InMemoryChannel>) {
    match handle.block_on(planner.result()) {
        Ok(Some(result)) => print_result(&result),
        Ok(None) => println!("  {}", "(no result yet)".dimmed()),
        Err(e) => println!("{}: {}", "Channel error".red(), e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Send one command and block until the dispatcher publishes its result (or
/// the configured wait budget runs out).
fn dispatch_and_wait(
    handle: &Handle,
    planner: &PlannerClient<InMemoryChannel>,
    config: &Config,
    kind: SkillKind,
    input: &str,
) {
    let command = Command::new(kind, input);
    if let Err(e) = handle.block_on(planner.send(&command)) {
        println!("{}: {}", "Channel error".red(), e);
        return;
    }
    println!("  Sent {}, waiting …", command.encode().bold());

    let deadline = Instant::now() + Duration::from_millis(config.result_wait_ms);
    while Instant::now() < deadline {
        // Result-visible implies command-cleared, but the command is also
        // checked so a dead dispatcher is reported as "never consumed"
        // rather than as a stale result.
        let pending = match handle.block_on(planner.command_pending()) {
            Ok(p) => p,
            Err(e) => {
                println!("{}: {}", "Channel error".red(), e);
                return;
            }
        };
        if !pending {
            match handle.block_on(planner.result()) {
                Ok(Some(result)) => {
                    print_result(&result);
                    return;
                }
                Ok(None) => {} // publish in progress; keep polling
                Err(e) => {
                    println!("{}: {}", "Channel error".red(), e);
                    return;
                }
            }
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    println!(
        "{} no result within {} ms (is the dispatcher running?)",
        "Timeout:".red(),
        config.result_wait_ms
    );
}

fn print_result(result: &SkillResult) {
    if result.succeeded {
        println!(
            "  {} {} – {}",
            "✓".green().bold(),
            result.kind.to_string().bold(),
            result.message
        );
    } else {
        println!(
            "  {} {} – {}",
            "✗".red().bold(),
            result.kind.to_string().bold(),
            result.message
        );
    }
}
