use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::config::{self, Settings};
use crate::monitor::{Monitor, UiEvent};
use crate::prefs::Prefs;
use crate::protocol::{EventRequest, EventResponse};
use crate::ui::tree;
use crate::Result;

pub struct Daemon {
    socket_path: PathBuf,
    pid_path: PathBuf,
    monitor: Monitor<Prefs>,
    settings: Settings,
    last_activity: Arc<RwLock<Instant>>,
    events_seen: AtomicU64,
}

impl Daemon {
    pub(crate) fn new(
        socket_path: PathBuf,
        pid_path: PathBuf,
        monitor: Monitor<Prefs>,
        settings: Settings,
    ) -> Self {
        Self {
            socket_path,
            pid_path,
            monitor,
            settings,
            last_activity: Arc::new(RwLock::new(Instant::now())),
            events_seen: AtomicU64::new(0),
        }
    }

    pub(crate) fn prefs(&self) -> &Prefs {
        self.monitor.prefs()
    }

    pub async fn run() -> Result<()> {
        let data_dir = config::data_dir();
        std::fs::create_dir_all(&data_dir)?;

        let socket_path = data_dir.join("blockwatch.sock");
        let pid_path = data_dir.join("blockwatch.pid");
        let db_path = data_dir.join("blockwatch.db");

        if let Some(pid) = running_pid() {
            return Err(crate::Error::DaemonAlreadyRunning(pid));
        }

        // Remove stale socket
        let _ = std::fs::remove_file(&socket_path);

        // Write PID file
        std::fs::write(&pid_path, std::process::id().to_string())?;

        let settings = config::resolve();
        let monitor = Monitor::new(Prefs::open(&db_path)?);
        let daemon = Arc::new(Self::new(
            socket_path.clone(),
            pid_path,
            monitor,
            settings,
        ));

        let listener = UnixListener::bind(&socket_path)?;
        tracing::info!("Daemon listening on {:?}", socket_path);

        // Spawn idle timeout checker
        let daemon_clone = Arc::clone(&daemon);
        tokio::spawn(async move {
            daemon_clone.idle_timeout_loop().await;
        });

        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    // One bridge connection at a time: events are evaluated
                    // strictly in arrival order, each to completion before
                    // the next is read.
                    if let Err(e) = daemon.handle_connection(stream).await {
                        tracing::error!("Connection error: {}", e);
                    }
                }
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                }
            }
        }
    }

    async fn idle_timeout_loop(&self) {
        let idle_timeout = Duration::from_millis(self.settings.daemon_idle_timeout_ms);
        loop {
            tokio::time::sleep(Duration::from_secs(60)).await;

            let last = *self.last_activity.read().await;
            if last.elapsed() > idle_timeout {
                tracing::info!("Idle timeout reached, shutting down");
                self.cleanup();
                std::process::exit(0);
            }
        }
    }

    fn cleanup(&self) {
        let _ = std::fs::remove_file(&self.socket_path);
        let _ = std::fs::remove_file(&self.pid_path);
    }

    async fn handle_connection(&self, stream: UnixStream) -> Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();
            let n = reader.read_line(&mut line).await?;
            if n == 0 {
                break; // EOF
            }

            // Update activity timestamp
            *self.last_activity.write().await = Instant::now();

            let response = self.handle_line(&line);
            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }

    /// Evaluate one event line and produce its verdict. Unparseable lines
    /// degrade to a `none` verdict rather than dropping the connection.
    pub(crate) fn handle_line(&self, line: &str) -> EventResponse {
        let request: EventRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Unparseable event line: {}", e);
                return EventResponse::parse_error(format!("Parse error: {}", e));
            }
        };

        let seen = self.events_seen.fetch_add(1, Ordering::Relaxed) + 1;
        if seen % self.settings.events_log_every == 0 {
            tracing::debug!(events = seen, "event stream alive");
        }
        if let Some(snapshot) = &request.tree {
            tracing::trace!(
                nodes = tree::count_nodes(snapshot),
                "snapshot\n{}",
                tree::format_compact(snapshot)
            );
        }

        let event = UiEvent {
            package_name: request.package_name,
            tree: request.tree,
        };

        match self.monitor.on_event(&event) {
            Some((action, rule)) => {
                tracing::info!(rule = rule.name, "blocked surface active, navigating back");
                if let Err(e) = self.prefs().record_hit(rule.name) {
                    tracing::warn!("Failed to record hit: {}", e);
                }
                EventResponse::matched(action, rule.name)
            }
            None => EventResponse::none(),
        }
    }
}

/// Pid of a live daemon for this data dir, if one is running.
pub fn running_pid() -> Option<u32> {
    let pid_path = config::data_dir().join("blockwatch.pid");
    let pid = std::fs::read_to_string(pid_path)
        .ok()?
        .trim()
        .parse::<u32>()
        .ok()?;
    is_process_alive(pid).then_some(pid)
}

/// Check if a process is alive. Returns true if the process exists, even if
/// we lack permission to signal it (EPERM).
fn is_process_alive(pid: u32) -> bool {
    let result = unsafe { libc::kill(pid as i32, 0) };
    if result == 0 {
        return true;
    }
    let err = std::io::Error::last_os_error();
    matches!(err.raw_os_error(), Some(libc::EPERM))
}
