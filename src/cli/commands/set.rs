//! Set command - write a value

use super::Target;
use crate::cli::args::SetArgs;
use crate::config::Config;
use crate::error::CacheResult;
use crate::ui::{self, UiContext};
use serde_json::Value;

/// Execute the set command
pub fn execute(args: SetArgs, target: &Target, config: &Config) -> CacheResult<()> {
    let ctx = UiContext::detect();
    let cache = target.cache(config)?;

    let value = parse_value(&args.value);
    let envelope = cache.try_write(&args.key, &value)?;

    let detail = if envelope.created_at == envelope.updated_at {
        "new".to_string()
    } else {
        match envelope.created() {
            Some(created) => format!("since {}", created.format("%Y-%m-%d %H:%M:%S")),
            None => "updated".to_string(),
        }
    };
    ui::step_ok_detail(&ctx, &format!("Cached {}", args.key), &detail);

    Ok(())
}

/// JSON if it parses, otherwise the raw text as a JSON string
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_values_parsed() {
        assert_eq!(parse_value(r#"{"a":[1,2]}"#), json!({"a": [1, 2]}));
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("false"), json!(false));
        assert_eq!(parse_value(r#""quoted""#), json!("quoted"));
    }

    #[test]
    fn plain_text_becomes_string() {
        assert_eq!(parse_value("hello world"), json!("hello world"));
        assert_eq!(parse_value(""), json!(""));
    }
}
