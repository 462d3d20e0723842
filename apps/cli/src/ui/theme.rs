use owo_colors::OwoColorize;
use std::fmt;

/// Colour palette for orchestrator output.
pub struct Theme;

impl Theme {
    /// Progress and headings (cyan).
    pub fn primary(text: impl fmt::Display) -> String {
        format!("{}", text.cyan().bold())
    }

    pub fn bold(text: impl fmt::Display) -> String {
        format!("{}", text.bold())
    }

    pub fn success(text: impl fmt::Display) -> String {
        format!("{}", text.green().bold())
    }

    pub fn warning(text: impl fmt::Display) -> String {
        format!("{}", text.yellow().bold())
    }

    pub fn error(text: impl fmt::Display) -> String {
        format!("{}", text.red().bold())
    }

    /// Paths, command lines and other metadata.
    pub fn muted(text: impl fmt::Display) -> String {
        format!("{}", text.dimmed())
    }
}

pub enum Icon {
    Package,
    Wrench,
    Check,
    Info,
    Warning,
    Link,
    Broom,
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self {
            Icon::Package => "📦",
            Icon::Wrench => "🔧",
            Icon::Check => "✔",
            Icon::Info => "ℹ️ ",
            Icon::Warning => "⚠️ ",
            Icon::Link => "🔗",
            Icon::Broom => "🧹",
        };
        write!(f, "{}", icon)
    }
}
