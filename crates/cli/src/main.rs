// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! onsite - GPS attendance CLI
//!
//! Every command talks to the per-roster daemon (onsited) over a Unix
//! socket, starting it on demand. Worker commands authenticate with a
//! bearer token from `--token` or `ONSITE_TOKEN`.

mod client;
mod commands;
mod completions;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{breaks, clock_in, clock_out, completed, daemon, ping, roster, status};
use std::path::PathBuf;

use crate::client::{find_roster_file, ClientError, DaemonClient};
use crate::completions::{generate_completions, CompletionsArgs};
use onsite_core::{HoursBreakdown, SessionStatus, SiteId};
use onsite_engine::PingStatus;

#[derive(Parser)]
#[command(name = "onsite", version, about = "Onsite - GPS attendance for field crews")]
struct Cli {
    /// Roster file (defaults to ONSITE_ROSTER or the nearest roster.toml)
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Worker bearer token (defaults to ONSITE_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clock in and open a work segment
    ClockIn(clock_in::ClockInArgs),
    /// Clock out and close the open segment
    ClockOut(clock_out::ClockOutArgs),
    /// Start or end the day's break
    Break(breaks::BreakArgs),
    /// Report a location fix for the open shift
    Ping(ping::PingArgs),
    /// Show the worker's live status
    Status(status::StatusArgs),
    /// Show whether the worker already finished a shift today
    CompletedToday(completed::CompletedTodayArgs),
    /// Roster file tooling
    Roster(roster::RosterArgs),
    /// Daemon management
    Daemon(daemon::DaemonArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("error: {:#}", err);
        std::process::exit(exit_code(&err));
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Handle completions, roster checks, and daemon management separately
    // (they don't need a client connection or a worker token)
    if let Commands::Completions(args) = cli.command {
        generate_completions::<Cli>(args.shell);
        return Ok(());
    }
    if let Commands::Roster(args) = cli.command {
        return roster::check(args, cli.roster);
    }
    if let Commands::Daemon(args) = cli.command {
        return daemon::daemon(args, cli.roster).await;
    }

    // All other commands go through the daemon; resolve the token first
    // so a missing credential never boots one
    let token = cli
        .token
        .or_else(|| std::env::var("ONSITE_TOKEN").ok())
        .ok_or(ClientError::MissingToken)?;

    let roster_path = cli.roster.map_or_else(find_roster_file, Ok)?;
    let client = DaemonClient::connect_or_start(roster_path).await?;

    match cli.command {
        Commands::ClockIn(args) => {
            let site = args.site.map(SiteId);
            let location = args.lat.zip(args.lon);
            let outcome = client
                .clock_in(&token, site, location, args.self_declared)
                .await?;

            let verb = if outcome.resumed {
                "Back on the clock"
            } else {
                "Clocked in"
            };
            println!(
                "{} at {} ({})",
                verb,
                outcome.site,
                outcome.at.format("%H:%M")
            );

            match (outcome.within_geofence, outcome.distance_m) {
                (true, Some(distance)) => {
                    println!("  on site, {:.0} m from center", distance);
                }
                (false, Some(distance)) => {
                    println!("  self-declared, {:.0} m from site center", distance);
                }
                (false, None) => println!("  self-declared, no GPS fix"),
                // within_geofence is never set without a fix
                (true, None) => {}
            }

            if let Some(schedule) = outcome.schedule {
                println!(
                    "  scheduled {} to {} (+{} min overtime allowed)",
                    schedule.work_start.format("%H:%M"),
                    schedule.work_end.format("%H:%M"),
                    schedule.max_overtime_minutes
                );
            }
        }

        Commands::ClockOut(args) => {
            let location = args.lat.zip(args.lon);
            let summary = client.clock_out(&token, location).await?;

            println!(
                "Clocked out of {} ({} to {})",
                summary.site,
                summary.checked_in_at.format("%H:%M"),
                summary.checked_out_at.format("%H:%M")
            );
            println!("  segment: {}", format_hours(&summary.segment_hours));
            println!("  today:   {}", format_hours(&summary.day_hours));
            if summary.overtime_minutes > 0 {
                let note = if summary.overtime_allowance_exceeded {
                    " (exceeds the site allowance)"
                } else {
                    ""
                };
                println!("  overtime: {} min{}", summary.overtime_minutes, note);
            }
        }

        Commands::Break(args) => {
            use commands::breaks::BreakCommand;

            match args.command {
                BreakCommand::Start { lat, lon } => {
                    let outcome = client.start_break(&token, lat, lon).await?;
                    println!("Break started at {}", outcome.started_at.format("%H:%M"));
                }
                BreakCommand::End => {
                    let outcome = client.end_break(&token).await?;
                    println!(
                        "Break ended at {} ({:.0} min)",
                        outcome.ended_at.format("%H:%M"),
                        outcome.break_minutes
                    );
                }
            }
        }

        Commands::Ping(args) => {
            let outcome = client.ping(&token, args.lat, args.lon).await?;
            match outcome.status {
                PingStatus::Paused if outcome.status_changed => {
                    if let Some(distance) = outcome.distance_m {
                        println!(
                            "Outside the geofence ({:.0} m from site); tracking paused",
                            distance
                        );
                    } else {
                        println!("Outside the geofence; tracking paused");
                    }
                }
                PingStatus::Paused => {
                    println!("Still outside the geofence; tracking paused");
                }
                PingStatus::Resumed => {
                    if let Some(seconds) = outcome.pause_duration_seconds {
                        println!("Back on site ({:.0} min paused)", seconds / 60.0);
                    } else {
                        println!("Back on site");
                    }
                }
                PingStatus::Active => println!("Ping recorded, on site"),
                PingStatus::NotApplicable => println!("Ping recorded"),
            }
        }

        Commands::Status(args) => {
            let snapshot = client.status(&token).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else if snapshot.status == SessionStatus::NoSession {
                println!("No session for {}", snapshot.date);
            } else {
                println!("Status: {}", snapshot.status);
                if let Some(site) = &snapshot.site {
                    println!("  site: {}", site);
                }
                if let Some(at) = snapshot.checked_in_at {
                    println!("  checked in: {}", at.format("%H:%M"));
                }
                if let Some(at) = snapshot.last_ping_at {
                    println!("  last ping:  {}", at.format("%H:%M"));
                }
                println!("  today: {}", format_hours(&snapshot.hours));
                println!("  segments completed: {}", snapshot.segments_completed);
            }
        }

        Commands::CompletedToday(args) => {
            let report = client.completed_today(&token).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.completed {
                println!(
                    "Completed today: yes ({} segment{})",
                    report.segments,
                    if report.segments == 1 { "" } else { "s" }
                );
            } else {
                println!("Completed today: no");
            }
        }

        // Handled above, before the client exists
        Commands::Roster(_) | Commands::Daemon(_) | Commands::Completions(_) => unreachable!(),
    }

    Ok(())
}

fn format_hours(hours: &HoursBreakdown) -> String {
    format!(
        "{:.2} h worked ({:.2} h break, {:.2} h paused)",
        hours.worked_hours, hours.break_hours, hours.pause_hours
    )
}

/// Map failures to exit codes. Requests the daemon rejected (validation,
/// conflict, not-found, schedule) exit with 2; transport and internal
/// errors exit with 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(client_err) = err.downcast_ref::<ClientError>() {
        return match client_err {
            ClientError::Rejected { kind, .. } => match kind.as_str() {
                "validation" | "conflict" | "not_found" | "schedule" => 2,
                _ => 1,
            },
            ClientError::MissingToken
            | ClientError::NoRoster
            | ClientError::RosterNotFound(_) => 2,
            _ => 1,
        };
    }
    if err.downcast_ref::<onsite_roster::ParseError>().is_some() {
        return 2;
    }
    1
}
