//! Configuration file watcher for hot reload.
//!
//! The prerender route allow-list has to track whatever the external page
//! generation step actually produced; reloading without a restart keeps the
//! two from drifting for long.
//!
//! # Design Decisions
//! - A rejected reload keeps the running config; the gateway never swaps in
//!   a config that failed validation
//! - Editors and the generation step tend to fire several notify events per
//!   save, so accepted reloads are debounced

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GatewayConfig;

const DEBOUNCE: Duration = Duration::from_millis(500);

/// Watches the configuration file and emits validated configs on change.
pub struct ConfigWatcher {
    path: PathBuf,
    debounce: Duration,
    update_tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates. Only
    /// configs that pass validation are ever sent.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GatewayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                debounce: DEBOUNCE,
                update_tx,
            },
            update_rx,
        )
    }

    /// Override the debounce window (tests use a short one).
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Start watching the file in a background thread.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            debounce,
            update_tx,
        } = self;

        let watch_path = path.clone();
        // Timestamp of the last accepted reload; rejected loads do not count,
        // so a bad save followed by a quick fix still applies.
        let mut last_accepted: Option<Instant> = None;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    if let Some(at) = last_accepted {
                        if at.elapsed() < debounce {
                            tracing::trace!("Config change within debounce window, skipping");
                            return;
                        }
                    }
                    match load_config(&path) {
                        Ok(new_config) => {
                            last_accepted = Some(Instant::now());
                            tracing::info!(
                                routes = new_config.prerender.routes.len(),
                                static_dir = %new_config.prerender.static_dir,
                                "Config reloaded"
                            );
                            let _ = update_tx.send(new_config);
                        }
                        Err(e) => {
                            tracing::error!(
                                error = %e,
                                "Config reload rejected, keeping current configuration"
                            );
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watch_path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?watch_path, "Config watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
        [prerender]
        static_dir = "snapshots"
        routes = ["/", "/blog", "/marketplace"]
    "#;

    // Duplicate route: fails validation, must never reach the receiver.
    const INVALID_CONFIG: &str = r#"
        [prerender]
        static_dir = "snapshots"
        routes = ["/blog", "/blog"]
    "#;

    fn temp_config_file() -> PathBuf {
        let path = std::env::temp_dir().join(format!("gw-watch-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, VALID_CONFIG).unwrap();
        path
    }

    #[tokio::test]
    async fn rejected_reload_is_not_forwarded() {
        let path = temp_config_file();
        let (watcher, mut updates) = ConfigWatcher::new(&path);
        let watcher = watcher.with_debounce(Duration::from_millis(10));
        let _handle = watcher.run().unwrap();

        // An invalid save must be dropped; the valid one after it must land.
        std::fs::write(&path, INVALID_CONFIG).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(&path, VALID_CONFIG).unwrap();

        let received = tokio::time::timeout(Duration::from_secs(10), updates.recv())
            .await
            .expect("no reload arrived")
            .expect("update channel closed");

        // Whatever arrived first passed validation.
        assert_eq!(received.prerender.routes.len(), 3);
        assert!(received.prerender.routes.contains(&"/marketplace".to_string()));

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn valid_edit_is_delivered() {
        let path = temp_config_file();
        let (watcher, mut updates) = ConfigWatcher::new(&path);
        let watcher = watcher.with_debounce(Duration::from_millis(10));
        let _handle = watcher.run().unwrap();

        std::fs::write(&path, VALID_CONFIG).unwrap();

        let received = tokio::time::timeout(Duration::from_secs(10), updates.recv())
            .await
            .expect("no reload arrived")
            .expect("update channel closed");
        assert_eq!(received.prerender.static_dir, "snapshots");

        std::fs::remove_file(&path).unwrap();
    }
}
