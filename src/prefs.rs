//! Persisted toggle state and per-rule hit bookkeeping.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::Result;

/// Key-value capability the monitor reads its flags through. Injected so the
/// evaluation path is testable without a real on-disk store.
pub trait PrefStore {
    /// Read a boolean preference. Falls back to `default` when the key is
    /// missing or the store cannot be read; a read never fails upward.
    fn get_bool(&self, key: &str, default: bool) -> bool;

    fn set_bool(&self, key: &str, value: bool) -> Result<()>;
}

/// Hit bookkeeping for one rule, as shown by `blockwatch status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub hits: i64,
    /// Unix seconds of the most recent block.
    pub last_fired: i64,
}

pub struct Prefs {
    conn: Arc<Mutex<Connection>>,
}

impl Prefs {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL so the daemon and toggle CLI can share the store.
        let _: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        conn.execute("PRAGMA synchronous=NORMAL", [])?;

        let prefs = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        prefs.initialize_schema()?;
        Ok(prefs)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let prefs = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        prefs.initialize_schema()?;
        Ok(prefs)
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS prefs (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS rule_hits (
                rule TEXT PRIMARY KEY,
                hits INTEGER NOT NULL,
                last_fired INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Bump a rule's block counter and stamp the time it fired.
    pub fn record_hit(&self, rule: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO rule_hits (rule, hits, last_fired) VALUES (?1, 1, ?2)
             ON CONFLICT(rule) DO UPDATE SET hits = hits + 1, last_fired = ?2",
            params![rule, now],
        )?;
        Ok(())
    }

    /// Hit bookkeeping for a rule, or `None` if it has never fired.
    pub fn hit(&self, rule: &str) -> Result<Option<RuleHit>> {
        let conn = self.conn.lock().unwrap();
        let hit = conn
            .query_row(
                "SELECT hits, last_fired FROM rule_hits WHERE rule = ?1",
                params![rule],
                |row| {
                    Ok(RuleHit {
                        hits: row.get(0)?,
                        last_fired: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(hit)
    }
}

impl PrefStore for Prefs {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT value FROM prefs WHERE key = ?1",
            params![key],
            |row| row.get::<_, i64>(0),
        )
        .map(|value| value != 0)
        .unwrap_or(default)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO prefs (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value as i64],
        )?;
        Ok(())
    }
}

impl Clone for Prefs {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}
