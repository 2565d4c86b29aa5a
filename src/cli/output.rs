//! Output-mode helpers shared by all subcommands.
//!
//! Global flags are mirrored into environment variables by `main` so every
//! module can check them without threading a config struct around.

use serde_json::Value;

pub fn is_json() -> bool {
    std::env::var("FORMFILL_JSON").is_ok()
}

pub fn is_quiet() -> bool {
    std::env::var("FORMFILL_QUIET").is_ok()
}

pub fn is_verbose() -> bool {
    std::env::var("FORMFILL_VERBOSE").is_ok()
}

/// Print a machine-readable JSON value on a single line.
pub fn print_json(value: &Value) {
    println!("{value}");
}

/// Print a human line unless quiet or JSON mode is active.
pub fn say(line: &str) {
    if !is_quiet() && !is_json() {
        println!("{line}");
    }
}
