// Author: Dustin Pilgrim
// License: MIT

use crate::cli::{Args, Command};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub async fn run(args: Args) -> Result<(), AnyError> {
    // command mode: args.command is Some
    let Some(cmd) = args.command.as_ref() else {
        return Ok(());
    };

    match cmd {
        Command::Status { json } => {
            let msg = if *json { "status --json" } else { "status" };

            match crate::ipc::client::send_raw(msg).await {
                Ok(resp) => {
                    if !resp.is_empty() {
                        println!("{resp}");
                    }
                    Ok(())
                }
                Err(e) => {
                    if *json {
                        // Waybar needs valid JSON on stdout even when the daemon isn't running.
                        println!(
                            "{}",
                            r#"{"text":"","alt":"not_running","class":"not_running","tooltip":"Perch not running"}"#
                        );
                    } else {
                        eprintln!("perch: {e}");
                    }
                    Ok(())
                }
            }
        }

        Command::Start => relay("start", "Session started").await,
        Command::Pause => relay("pause", "Session paused").await,
        Command::Reset => relay("reset", "Session reset").await,

        Command::FastForward { seconds } => {
            let msg = format!("fast-forward {seconds}");
            relay(&msg, "Session shifted").await
        }

        Command::Thresholds { yellow, red } => {
            let msg = format!("set-thresholds {yellow} {red}");
            relay(&msg, "Thresholds updated").await
        }

        Command::IdleReset { seconds } => {
            let msg = format!("set-idle-reset {seconds}");
            relay(&msg, "Idle reset updated").await
        }

        Command::SimulateIdle { state } => {
            let msg = format!("simulate-idle {state}");
            relay(&msg, "Idle simulation toggled").await
        }

        Command::Stop => relay("stop", "Stopping perch daemon").await,

        Command::Dump { lines } => {
            // The log file is shared state on disk, no need to bother the daemon.
            let path = crate::log::log_path();
            match std::fs::read_to_string(&path) {
                Ok(contents) => {
                    let all: Vec<&str> = contents.lines().collect();
                    let start = all.len().saturating_sub(*lines);
                    for line in &all[start..] {
                        println!("{line}");
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("perch: failed to read {}: {e}", path.display());
                    Ok(())
                }
            }
        }
    }
}

async fn relay(msg: &str, fallback: &str) -> Result<(), AnyError> {
    match crate::ipc::client::send_raw(msg).await {
        Ok(resp) => {
            let out = resp.trim_end();
            if out.is_empty() {
                println!("{fallback}");
            } else {
                println!("{out}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("perch: {e}");
            Ok(())
        }
    }
}
