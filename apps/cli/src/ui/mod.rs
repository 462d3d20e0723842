use std::sync::atomic::{AtomicBool, Ordering};

pub mod reporter;
pub mod theme;

pub use reporter::ConsoleReporter;
pub use theme::{Icon, Theme};

static QUIET: AtomicBool = AtomicBool::new(false);

/// Suppresses progress lines. Warnings and errors are always shown.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn info(message: impl AsRef<str>) {
    if !quiet() {
        println!("{} {}", Theme::primary(Icon::Info), message.as_ref());
    }
}

pub fn step(icon: Icon, message: impl AsRef<str>) {
    if !quiet() {
        println!("{} {}", icon, message.as_ref());
    }
}

pub fn success(message: impl AsRef<str>) {
    if !quiet() {
        println!("{} {}", Theme::success(Icon::Check), message.as_ref());
    }
}

pub fn warn(message: impl AsRef<str>) {
    eprintln!("{} {}", Theme::warning(Icon::Warning), message.as_ref());
}

/// Unadorned output, e.g. machine-readable plans.
pub fn println(message: impl AsRef<str>) {
    println!("{}", message.as_ref());
}
