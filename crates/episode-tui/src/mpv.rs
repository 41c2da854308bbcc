//! mpv-backed media sink.
//!
//! ```text
//!   MpvSink (MediaSink, sync) ── watch<PlayerTarget> ──▶ player_task
//!                                                         │
//!                                                         ├── MpvDriver   owns the child process
//!                                                         └── MpvHandle   JSON IPC client
//!                                                               ├── writer_task  ← requests → socket
//!                                                               └── reader_task  ← responses / events
//! ```
//!
//! The selection controller must not block, so the sink only records the
//! desired state.  The player task converges mpv onto the latest target and
//! skips any loads superseded while it was busy.  It spawns mpv lazily on
//! the first load and respawns it if the window was closed.  Failures are
//! logged and otherwise ignored.
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use episode_proto::config::MpvConfig;
use episode_proto::platform;

use crate::surface::{MediaSink, PlaybackError};

#[cfg(unix)]
use tokio::net::UnixStream;

#[cfg(windows)]
use tokio::net::windows::named_pipe::ClientOptions;

static NEXT_REQ_ID: AtomicU64 = AtomicU64::new(1);

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<anyhow::Result<Value>>>>>;

struct PendingRequest {
    req_id: u64,
    payload: String, // serialised JSON line (already has '\n')
    reply: oneshot::Sender<anyhow::Result<Value>>,
}

// ── sink ──────────────────────────────────────────────────────────────────────

/// What the player should be doing.  Only the newest value matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerTarget {
    pub url: Option<String>,
    /// Bumped on every load, so reselecting the same url still reloads.
    pub load_seq: u64,
    pub playing: bool,
    pub shutdown: bool,
}

/// `MediaSink` that publishes targets to the player task.
#[derive(Clone)]
pub struct MpvSink {
    tx: Arc<watch::Sender<PlayerTarget>>,
}

impl MpvSink {
    /// Ask the player task to quit mpv and exit.
    pub fn shutdown(&self) {
        self.tx.send_modify(|t| t.shutdown = true);
    }

    fn publish(&self, update: impl FnOnce(&mut PlayerTarget)) -> Result<(), PlaybackError> {
        if self.tx.is_closed() {
            return Err(PlaybackError::Unavailable);
        }
        self.tx.send_modify(update);
        Ok(())
    }
}

impl MediaSink for MpvSink {
    fn load(&mut self, url: &str) -> Result<(), PlaybackError> {
        self.publish(|t| {
            t.url = Some(url.to_string());
            t.load_seq += 1;
            t.playing = false;
        })
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.publish(|t| t.playing = true)
    }
}

/// Start the player task.  mpv itself is not launched until the first load.
pub fn spawn_player(config: MpvConfig) -> (MpvSink, JoinHandle<()>) {
    let (tx, rx) = watch::channel(PlayerTarget::default());
    let task = tokio::spawn(player_task(MpvDriver::new(config), rx));
    (MpvSink { tx: Arc::new(tx) }, task)
}

async fn player_task(mut driver: MpvDriver, mut rx: watch::Receiver<PlayerTarget>) {
    let mut handle: Option<MpvHandle> = None;
    let mut loaded_seq = 0u64;

    while rx.changed().await.is_ok() {
        let target = rx.borrow_and_update().clone();
        if target.shutdown {
            break;
        }

        if target.load_seq != loaded_seq {
            loaded_seq = target.load_seq;
            let Some(url) = target.url.as_deref() else {
                continue;
            };
            if handle.is_none() || !driver.process_alive() {
                handle = match driver.spawn_and_connect().await {
                    Ok(h) => Some(h),
                    Err(e) => {
                        warn!("mpv: could not start player: {}", e);
                        None
                    }
                };
            }
            match handle.as_ref() {
                Some(h) => {
                    if let Err(e) = h.load_file(url).await {
                        debug!("mpv: loadfile {} failed: {}", url, e);
                    }
                }
                None => debug!("mpv: dropping load of {} (no player)", url),
            }
            // A newer selection arrived meanwhile; its load goes first.
            if rx.has_changed().unwrap_or(false) {
                continue;
            }
        }

        if target.playing {
            match handle.as_ref() {
                Some(h) => {
                    if let Err(e) = h.set_pause(false).await {
                        debug!("mpv: playback did not start: {}", e);
                    }
                }
                None => debug!("mpv: play ignored (no player)"),
            }
        }
    }

    if let Some(h) = handle.take() {
        let _ = h.send(json!(["quit"])).await;
    }
    driver.kill().await;
    debug!("mpv: player task exiting");
}

// ── IPC handle ────────────────────────────────────────────────────────────────

/// Cloneable handle to the mpv writer task.
#[derive(Clone)]
pub struct MpvHandle {
    tx: mpsc::Sender<PendingRequest>,
}

impl MpvHandle {
    pub async fn send(&self, command: Value) -> anyhow::Result<Value> {
        let req_id = NEXT_REQ_ID.fetch_add(1, Ordering::Relaxed);
        let msg = json!({ "command": command, "request_id": req_id });
        let mut raw = serde_json::to_string(&msg)?;
        raw.push('\n');

        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(PendingRequest {
                req_id,
                payload: raw,
                reply: reply_tx,
            })
            .await
            .map_err(|_| anyhow::anyhow!("mpv writer task gone"))?;

        tokio::time::timeout(tokio::time::Duration::from_secs(5), reply_rx)
            .await
            .map_err(|_| anyhow::anyhow!("mpv IPC timeout for req={}", req_id))?
            .map_err(|_| anyhow::anyhow!("mpv reply channel dropped req={}", req_id))?
    }

    /// `loadfile <url> replace`: drops the current file and reloads.
    pub async fn load_file(&self, url: &str) -> anyhow::Result<()> {
        debug!("mpv: loadfile {}", url);
        self.send(json!(["loadfile", url, "replace"])).await?;
        Ok(())
    }

    pub async fn set_pause(&self, paused: bool) -> anyhow::Result<()> {
        self.send(json!(["set_property", "pause", paused])).await?;
        Ok(())
    }
}

// ── driver ────────────────────────────────────────────────────────────────────

/// Owns the mpv child process.
pub struct MpvDriver {
    config: MpvConfig,
    socket_name: String,
    process: Option<tokio::process::Child>,
}

impl MpvDriver {
    pub fn new(config: MpvConfig) -> Self {
        Self {
            config,
            socket_name: platform::mpv_socket_name(),
            process: None,
        }
    }

    pub fn process_alive(&mut self) -> bool {
        let Some(child) = self.process.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                info!("mpv: process exited ({})", status);
                false
            }
            Err(e) => {
                warn!("mpv: process_alive check failed: {}", e);
                false
            }
        }
    }

    pub async fn kill(&mut self) {
        if let Some(mut p) = self.process.take() {
            let _ = p.kill().await;
        }
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--idle=yes".to_string(),
            "--quiet".to_string(),
            platform::mpv_socket_arg(),
            format!(
                "--volume={}",
                (self.config.default_volume * 100.0).clamp(0.0, 100.0).round() as i64
            ),
        ];
        if self.config.video {
            args.push("--force-window=yes".to_string());
        } else {
            args.push("--no-video".to_string());
        }
        args
    }

    fn spawn_process(&mut self) -> anyhow::Result<()> {
        let mpv_binary =
            platform::find_mpv_binary().ok_or_else(|| anyhow::anyhow!("mpv binary not found"))?;

        let stderr_path = platform::data_dir().join("mpv-stderr.log");
        let stderr_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&stderr_path)?;

        let child = tokio::process::Command::new(&mpv_binary)
            .args(self.args())
            .stdout(std::process::Stdio::null())
            .stderr(stderr_file)
            .kill_on_drop(true)
            .spawn()?;
        info!(
            "mpv: spawned {} (pid {:?}), stderr → {}",
            mpv_binary.display(),
            child.id(),
            stderr_path.display()
        );
        self.process = Some(child);
        Ok(())
    }

    #[cfg(unix)]
    pub async fn spawn_and_connect(&mut self) -> anyhow::Result<MpvHandle> {
        self.kill().await;

        let socket_path = std::path::PathBuf::from(&self.socket_name);
        let _ = tokio::fs::remove_file(&socket_path).await;

        self.spawn_process()?;

        for _ in 0..50 {
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            if socket_path.exists() {
                break;
            }
        }
        if !socket_path.exists() {
            anyhow::bail!("mpv IPC socket did not appear");
        }

        let stream = UnixStream::connect(&socket_path).await?;
        info!("mpv: connected to IPC socket");
        Ok(start_io_tasks(stream))
    }

    #[cfg(windows)]
    pub async fn spawn_and_connect(&mut self) -> anyhow::Result<MpvHandle> {
        self.kill().await;
        self.spawn_process()?;

        let pipe_path = format!(r"\\.\pipe\{}", self.socket_name);
        for _ in 0..50 {
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            if let Ok(client) = ClientOptions::new().open(&pipe_path) {
                info!("mpv: connected to named pipe");
                return Ok(start_io_tasks(client));
            }
        }
        anyhow::bail!("mpv named pipe did not appear")
    }
}

fn start_io_tasks<S>(stream: S) -> MpvHandle
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (cmd_tx, cmd_rx) = mpsc::channel::<PendingRequest>(64);

    tokio::spawn(writer_task(write_half, cmd_rx, pending.clone()));
    tokio::spawn(reader_task(BufReader::new(read_half), pending));

    MpvHandle { tx: cmd_tx }
}

// ── reader / writer tasks ─────────────────────────────────────────────────────

async fn reader_task<R>(mut reader: BufReader<R>, pending: PendingMap)
where
    R: AsyncRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        let closed_reason = match reader.read_line(&mut line).await {
            Ok(0) => "mpv IPC connection closed".to_string(),
            Err(e) => format!("mpv IPC read error: {}", e),
            Ok(_) => {
                route_line(line.trim(), &pending).await;
                continue;
            }
        };
        debug!("mpv reader: {}", closed_reason);
        let mut map = pending.lock().await;
        for (_, tx) in map.drain() {
            let _ = tx.send(Err(anyhow::anyhow!(closed_reason.clone())));
        }
        break;
    }
}

/// Resolve a response line against its pending request; log anything else.
async fn route_line(line: &str, pending: &PendingMap) {
    if line.is_empty() {
        return;
    }
    let val: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            debug!("mpv reader: invalid json '{}': {}", line, e);
            return;
        }
    };

    let Some(req_id) = val.get("request_id").and_then(|v| v.as_u64()) else {
        if let Some(event) = val.get("event").and_then(|v| v.as_str()) {
            debug!("mpv event: {}", event);
        }
        return;
    };

    let Some(tx) = pending.lock().await.remove(&req_id) else {
        debug!("mpv reader: response for unknown req={}", req_id);
        return;
    };
    let result = match val["error"].as_str() {
        Some("success") => Ok(val),
        other => Err(anyhow::anyhow!("mpv error: {}", other.unwrap_or("unknown error"))),
    };
    let _ = tx.send(result);
}

async fn writer_task<W>(mut writer: W, mut rx: mpsc::Receiver<PendingRequest>, pending: PendingMap)
where
    W: AsyncWrite + Unpin,
{
    while let Some(req) = rx.recv().await {
        // Register before writing so the reader can always match the reply.
        pending.lock().await.insert(req.req_id, req.reply);
        debug!("mpv writer: req={} {}", req.req_id, req.payload.trim());
        if let Err(e) = writer.write_all(req.payload.as_bytes()).await {
            warn!("mpv writer: write error: {}", e);
            if let Some(tx) = pending.lock().await.remove(&req.req_id) {
                let _ = tx.send(Err(anyhow::anyhow!("mpv write error: {}", e)));
            }
            break;
        }
    }
    debug!("mpv writer: task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> (MpvSink, watch::Receiver<PlayerTarget>) {
        let (tx, rx) = watch::channel(PlayerTarget::default());
        (MpvSink { tx: Arc::new(tx) }, rx)
    }

    #[test]
    fn test_load_then_play_sets_target() {
        let (mut sink, rx) = sink();
        sink.load("https://v/1.mp4").unwrap();
        assert!(!rx.borrow().playing);
        sink.play().unwrap();

        let target = rx.borrow().clone();
        assert_eq!(target.url.as_deref(), Some("https://v/1.mp4"));
        assert_eq!(target.load_seq, 1);
        assert!(target.playing);
    }

    #[test]
    fn test_reloading_same_url_bumps_seq() {
        let (mut sink, rx) = sink();
        sink.load("https://v/1.mp4").unwrap();
        sink.load("https://v/1.mp4").unwrap();
        assert_eq!(rx.borrow().load_seq, 2);
    }

    #[test]
    fn test_sink_without_player_is_unavailable() {
        let (mut sink, rx) = sink();
        drop(rx);
        assert!(matches!(sink.play(), Err(PlaybackError::Unavailable)));
    }

    #[test]
    fn test_latest_selection_wins_while_player_is_busy() {
        use crate::render::render_episode_list;
        use crate::selection::SelectionController;
        use crate::surface::test_support::episodes;
        use crate::surface::DisplaySurface;
        use crate::card::EpisodeId;

        // Nothing drains the receiver, like a player stuck spawning mpv.
        let (sink, rx) = sink();
        let mut surface = DisplaySurface::new(sink);
        let controller = SelectionController::new();
        render_episode_list(&mut surface, &controller, episodes(40));
        for idx in 0..40 {
            controller.select(&mut surface, EpisodeId(idx));
        }

        let target = rx.borrow().clone();
        assert_eq!(surface.title, "Episode 40");
        assert_eq!(target.url, surface.media_source);
        assert_eq!(target.url.as_deref(), Some("https://cdn.example.com/ep40.mp4"));
        assert!(target.playing);
    }

    #[test]
    fn test_shutdown_is_published() {
        let (sink, rx) = sink();
        sink.shutdown();
        assert!(rx.borrow().shutdown);
    }

    #[test]
    fn test_args_follow_config() {
        let driver = MpvDriver::new(MpvConfig {
            default_volume: 0.25,
            video: false,
        });
        let args = driver.args();
        assert!(args.contains(&"--volume=25".to_string()));
        assert!(args.contains(&"--no-video".to_string()));
        assert!(!args.contains(&"--force-window=yes".to_string()));
    }

    #[tokio::test]
    async fn test_reply_routes_to_pending_request() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(7, tx);

        route_line(r#"{"request_id": 7, "error": "success", "data": null}"#, &pending).await;
        assert!(rx.await.unwrap().is_ok());

        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(8, tx);
        route_line(r#"{"request_id": 8, "error": "loading failed"}"#, &pending).await;
        assert!(rx.await.unwrap().is_err());
    }
}
