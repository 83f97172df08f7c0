//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::envelope::minutes_to_millis;
use crate::error::{CacheError, CacheResult};
use crate::session::validate_id;
use crate::ui::{self, UiContext};
use std::path::PathBuf;

const VALID_KEYS: [&str; 6] = [
    "general.log_format",
    "cache.namespace",
    "cache.default_max_age_minutes",
    "storage.session",
    "storage.quota_bytes",
    "storage.dir",
];

/// Execute the config command
pub fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> CacheResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force)?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value)?,
    }

    Ok(())
}

fn show_config(config: &Config) -> CacheResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn init_config(manager: &ConfigManager, force: bool) -> CacheResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default())?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());

    Ok(())
}

fn set_value(manager: &ConfigManager, config: &Config, key: &str, value: &str) -> CacheResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();
    apply(&mut config, key, value)?;

    manager.save(&config)?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply a dot-separated `key = value` to `config`
fn apply(config: &mut Config, key: &str, value: &str) -> CacheResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(CacheError::User(format!(
                    "Invalid log format: {}. Use text or json",
                    value
                )))
            }
        },

        ["cache", "namespace"] => {
            config.cache.namespace = (!value.is_empty()).then(|| value.to_string())
        }
        ["cache", "default_max_age_minutes"] => {
            let minutes = parse_f64(value)?;
            minutes_to_millis(minutes)?;
            config.cache.default_max_age_minutes = minutes;
        }

        ["storage", "session"] => {
            validate_id(value)?;
            config.storage.session = value.to_string();
        }
        ["storage", "quota_bytes"] => config.storage.quota_bytes = parse_u64(value)?,
        ["storage", "dir"] => {
            config.storage.dir = (!value.is_empty()).then(|| PathBuf::from(value))
        }

        _ => {
            return Err(CacheError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

fn parse_f64(value: &str) -> CacheResult<f64> {
    value
        .parse()
        .map_err(|_| CacheError::User(format!("Invalid number: {}", value)))
}

fn parse_u64(value: &str) -> CacheResult<u64> {
    value
        .parse()
        .map_err(|_| CacheError::User(format!("Invalid number: {}", value)))
}
