//! Get command - read a fresh value

use super::Target;
use crate::cli::args::GetArgs;
use crate::config::Config;
use crate::envelope::CacheEnvelope;
use crate::error::CacheResult;
use serde_json::Value;

/// Execute the get command
pub fn execute(args: GetArgs, target: &Target, config: &Config) -> CacheResult<()> {
    let cache = target.cache(config)?;
    let max_age = args
        .max_age
        .unwrap_or(config.cache.default_max_age_minutes);

    let envelope: CacheEnvelope<Value> = cache.try_read(&args.key, max_age)?;

    let json = if args.data_only {
        serde_json::to_string_pretty(&envelope.data)?
    } else {
        serde_json::to_string_pretty(&envelope)?
    };
    println!("{}", json);

    Ok(())
}
