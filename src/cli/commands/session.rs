//! Session command - create, list and end sessions

use super::Target;
use crate::cli::args::{OutputFormat, SessionAction, SessionArgs};
use crate::config::Config;
use crate::error::CacheResult;
use crate::session::SessionInfo;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the session command
pub fn execute(args: SessionArgs, target: &Target, config: &Config) -> CacheResult<()> {
    let manager = target.manager(config);

    match args.action {
        SessionAction::New => {
            let session = manager.create()?;
            println!("{}", session.id());
        }
        SessionAction::List { format } => {
            let sessions = manager.list()?;
            print_sessions(&sessions, format)?;
        }
        SessionAction::End { id } => {
            let ctx = UiContext::detect();
            let id = match id {
                Some(id) => id,
                None => target.session(config)?.id().to_string(),
            };
            manager.end(&id)?;
            ui::step_ok(&ctx, &format!("Ended session {}", id));
        }
        SessionAction::Cleanup { hours } => {
            let ctx = UiContext::detect();
            let cleaned = manager.cleanup(hours)?;
            if cleaned == 0 {
                ui::step_info(&ctx, "No sessions to clean up");
            } else {
                ui::step_ok(&ctx, &format!("Removed {} session(s)", cleaned));
            }
        }
        SessionAction::Path => {
            println!("{}", target.session(config)?.dir().display());
        }
    }

    Ok(())
}

fn print_sessions(sessions: &[SessionInfo], format: OutputFormat) -> CacheResult<()> {
    if sessions.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(&ctx, "No sessions");
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => {
            println!(
                "{:<38} {:<8} {:<20}",
                style("SESSION").bold(),
                style("KEYS").bold(),
                style("MODIFIED").bold()
            );
            println!("{}", "-".repeat(66));

            for session in sessions {
                let modified = session
                    .modified
                    .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("{:<38} {:<8} {:<20}", session.id, session.entries, modified);
            }

            println!();
            println!("{} session(s)", sessions.len());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(sessions)?),
        OutputFormat::Plain => {
            for session in sessions {
                println!("{}", session.id);
            }
        }
    }

    Ok(())
}
