//! UI module for consistent CLI output
//!
//! Styled with `console`; colors and symbols are dropped automatically when
//! output is not a terminal or when running under CI.

mod context;
mod output;

pub use context::UiContext;
pub use output::{step_info, step_ok, step_ok_detail, step_warn_hint};
