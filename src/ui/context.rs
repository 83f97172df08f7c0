//! Whether output goes to a person or to a pipe / CI log

use std::io::IsTerminal;

/// Variables that mark a CI runner
const CI_VARS: [&str; 5] = ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "BUILDKITE", "TF_BUILD"];

/// Decides between styled and plain output
#[derive(Debug, Clone)]
pub struct UiContext {
    fancy: bool,
}

impl UiContext {
    /// Styled output only on a terminal outside CI
    pub fn detect() -> Self {
        let ci = in_ci(|var| std::env::var_os(var).is_some());
        Self {
            fancy: std::io::stdout().is_terminal() && !ci,
        }
    }

    /// Plain output regardless of the environment
    pub fn non_interactive() -> Self {
        Self { fancy: false }
    }

    pub fn use_fancy_output(&self) -> bool {
        self.fancy
    }
}

fn in_ci(is_set: impl Fn(&str) -> bool) -> bool {
    CI_VARS.iter().any(|var| is_set(var))
}
