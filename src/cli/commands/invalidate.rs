//! Invalidate command - remove a value

use super::Target;
use crate::cli::args::InvalidateArgs;
use crate::config::Config;
use crate::error::CacheResult;
use crate::ui::{self, UiContext};

/// Execute the invalidate command
pub fn execute(args: InvalidateArgs, target: &Target, config: &Config) -> CacheResult<()> {
    let ctx = UiContext::detect();
    let cache = target.cache(config)?;

    cache.try_invalidate(&args.key)?;
    ui::step_ok(&ctx, &format!("Invalidated {}", args.key));

    Ok(())
}
