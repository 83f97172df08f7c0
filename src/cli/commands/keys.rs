//! Keys command - list stored keys

use super::Target;
use crate::cli::args::{KeysArgs, OutputFormat};
use crate::config::Config;
use crate::envelope::CacheEnvelope;
use crate::error::CacheResult;
use crate::ui::{self, UiContext};
use chrono::{DateTime, TimeZone, Utc};
use console::style;
use serde::Serialize;
use serde_json::Value;

/// One row of the listing
#[derive(Debug, Serialize)]
struct KeyRow {
    key: String,
    created_at: Option<i64>,
    updated_at: Option<i64>,
}

impl KeyRow {
    fn new(key: String, envelope: Option<CacheEnvelope<Value>>) -> Self {
        Self {
            key,
            created_at: envelope.as_ref().map(|e| e.created_at),
            updated_at: envelope.as_ref().map(|e| e.updated_at),
        }
    }
}

/// Execute the keys command
pub fn execute(args: KeysArgs, target: &Target, config: &Config) -> CacheResult<()> {
    let cache = target.cache(config)?;

    let rows: Vec<KeyRow> = cache
        .keys()?
        .into_iter()
        .map(|key| {
            // Entries that do not parse are listed without timestamps
            let envelope = cache.peek(&key).ok().flatten();
            KeyRow::new(key, envelope)
        })
        .collect();

    if rows.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(&ctx, "No cached keys");
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&rows, Utc::now()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Plain => {
            for row in &rows {
                println!("{}", row.key);
            }
        }
    }

    Ok(())
}

fn print_table(rows: &[KeyRow], now: DateTime<Utc>) {
    println!(
        "{:<32} {:<20} {:<20} {:<10}",
        style("KEY").bold(),
        style("CREATED").bold(),
        style("UPDATED").bold(),
        style("AGE").bold()
    );
    println!("{}", "-".repeat(84));

    for row in rows {
        let created = row.created_at.map(format_millis).unwrap_or_default();
        let updated = row.updated_at.map(format_millis).unwrap_or_default();
        let age = match row.updated_at {
            Some(updated_at) => format_age(now.timestamp_millis() - updated_at),
            None => style("malformed").red().to_string(),
        };

        println!("{:<32} {:<20} {:<20} {:<10}", row.key, created, updated, age);
    }

    println!();
    println!("{} key(s)", rows.len());
}

fn format_millis(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Coarse human age: seconds, minutes, hours or days
fn format_age(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86_400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ages_are_coarse() {
        assert_eq!(format_age(-5), "0s");
        assert_eq!(format_age(59_999), "59s");
        assert_eq!(format_age(60_000), "1m");
        assert_eq!(format_age(7_200_000), "2h");
        assert_eq!(format_age(3 * 86_400_000), "3d");
    }

    #[test]
    fn millis_formatted_in_utc() {
        assert_eq!(format_millis(0), "1970-01-01 00:00:00");
    }

    #[test]
    fn rows_without_envelope_have_no_times() {
        let row = KeyRow::new("k".to_string(), None);
        assert!(row.created_at.is_none());
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["key"], "k");
        assert!(json["updated_at"].is_null());
    }
}
