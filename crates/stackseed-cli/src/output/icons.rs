//! Unicode icons for CLI output.

use std::env;

/// Status icons
pub struct Icons;

impl Icons {
    pub const CHECK: &'static str = "✓";
    pub const CROSS: &'static str = "✗";
    pub const ARROW: &'static str = "→";

    /// Fallback ASCII versions
    pub const CHECK_ASCII: &'static str = "[ok]";
    pub const CROSS_ASCII: &'static str = "[err]";
    pub const ARROW_ASCII: &'static str = "->";
}

/// Icon context that handles unicode support detection
#[derive(Debug, Clone, Copy)]
pub struct IconContext {
    unicode: bool,
}

impl IconContext {
    pub fn new() -> Self {
        Self {
            unicode: detect_unicode_support(),
        }
    }

    pub fn ascii() -> Self {
        Self { unicode: false }
    }

    pub fn check(&self) -> &'static str {
        if self.unicode { Icons::CHECK } else { Icons::CHECK_ASCII }
    }

    pub fn cross(&self) -> &'static str {
        if self.unicode { Icons::CROSS } else { Icons::CROSS_ASCII }
    }

    pub fn arrow(&self) -> &'static str {
        if self.unicode { Icons::ARROW } else { Icons::ARROW_ASCII }
    }
}

impl Default for IconContext {
    fn default() -> Self {
        Self::new()
    }
}

fn detect_unicode_support() -> bool {
    env::var("TERM")
        .map(|t| !t.contains("linux"))
        .unwrap_or(true)
        && env::var("LANG")
            .map(|l| l.to_uppercase().contains("UTF"))
            .unwrap_or(true)
}
