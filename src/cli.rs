//! Toggle and status commands, the switch panel the daemon is driven by.

use crate::config;
use crate::daemon;
use crate::prefs::{PrefStore, Prefs};
use crate::rules::{rule_by_name, RULES};
use crate::Result;

/// Flip one rule's flag. Takes effect on the daemon's next event.
pub fn set_enabled(name: Option<&str>, value: bool) -> Result<()> {
    let Some(name) = name else {
        eprintln!(
            "Usage: blockwatch {} <rule>",
            if value { "enable" } else { "disable" }
        );
        std::process::exit(1);
    };
    let rule = rule_by_name(name).ok_or_else(|| crate::Error::UnknownRule(name.to_string()))?;

    let prefs = open_prefs()?;
    prefs.set_bool(rule.pref_key, value)?;

    println!("{} {}", rule.name, if value { "enabled" } else { "disabled" });
    Ok(())
}

/// Show daemon liveness, each rule's toggle state, and hit bookkeeping.
pub fn status() -> Result<()> {
    match daemon::running_pid() {
        Some(pid) => println!("Daemon running (pid {})", pid),
        None => {
            println!("Daemon not running.");
            println!("Start it with: blockwatch daemon");
        }
    }

    let prefs = open_prefs()?;
    println!("\nRules:");
    for rule in RULES {
        let state = if prefs.get_bool(rule.pref_key, false) {
            "on"
        } else {
            "off"
        };
        let blocked = match prefs.hit(rule.name)? {
            Some(hit) => {
                let when = chrono::DateTime::from_timestamp(hit.last_fired, 0)
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                format!("blocked {} times, last {}", hit.hits, when)
            }
            None => "never blocked".to_string(),
        };
        println!("  {}: {}  ({})", rule.name, state, blocked);
    }
    Ok(())
}

fn open_prefs() -> Result<Prefs> {
    let data_dir = config::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    Prefs::open(&data_dir.join("blockwatch.db"))
}
