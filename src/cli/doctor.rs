//! Environment readiness check.

use crate::cli::output;
use crate::driver::chromium::find_chromium;
use anyhow::Result;
use std::process::Command;

/// Check Chromium availability, the state directory, and available memory.
pub async fn run() -> Result<()> {
    output::say("Formfill Doctor");
    output::say("===============");
    output::say("");

    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    output::say(&format!("OS:   {os}"));
    output::say(&format!("Arch: {arch}"));
    output::say("");

    let chromium_path = find_chromium();
    match &chromium_path {
        Some(path) => output::say(&format!("[OK] Chromium found: {}", path.display())),
        None => output::say(
            "[!!] Chromium NOT found. Install google-chrome/chromium or set FORMFILL_CHROMIUM_PATH.",
        ),
    }

    let state_dir = dirs::home_dir().map(|h| h.join(".formfill"));
    match &state_dir {
        Some(dir) => {
            if std::fs::create_dir_all(dir).is_ok() {
                output::say(&format!("[OK] State dir writable: {}", dir.display()));
            } else {
                output::say(&format!("[!!] State dir not writable: {}", dir.display()));
            }
        }
        None => output::say("[!!] Could not determine home directory"),
    }

    match get_available_memory_mb() {
        Some(mb) if mb >= 256 => {
            output::say(&format!("[OK] Available memory: {mb}MB (>= 256MB required)"))
        }
        Some(mb) => output::say(&format!(
            "[!!] Available memory: {mb}MB (< 256MB, may be insufficient)"
        )),
        None => output::say("[??] Could not determine available memory"),
    }

    output::say("");
    if chromium_path.is_some() {
        output::say("Status: READY");
    } else {
        output::say("Status: NOT READY");
        output::say("  Install Chromium, then re-run `formfill doctor`.");
    }

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "os": os,
            "arch": arch,
            "chromium": chromium_path.as_ref().map(|p| p.display().to_string()),
            "ready": chromium_path.is_some(),
        }));
    }

    Ok(())
}

/// Get available memory in MB (platform-specific).
fn get_available_memory_mb() -> Option<u64> {
    #[cfg(target_os = "macos")]
    {
        let output = Command::new("sysctl")
            .args(["-n", "hw.memsize"])
            .output()
            .ok()?;
        let s = String::from_utf8_lossy(&output.stdout);
        let bytes: u64 = s.trim().parse().ok()?;
        Some(bytes / 1_048_576)
    }
    #[cfg(target_os = "linux")]
    {
        let output = Command::new("free").args(["-m"]).output().ok()?;
        let s = String::from_utf8_lossy(&output.stdout);
        for line in s.lines() {
            if line.starts_with("Mem:") {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 7 {
                    return parts[6].parse().ok();
                }
            }
        }
        None
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        None
    }
}
