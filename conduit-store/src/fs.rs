//! Filesystem-backed conversation store.

use std::path::{Path, PathBuf};

use conduit_types::{StoreError, Turn};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::trait_def::ConversationStore;

/// Filesystem-backed conversation store.
///
/// Each conversation is one append-only file under `root`, one JSON-encoded
/// [`Turn`] per line. A process-local mutex serializes writes so the
/// duplicate-save idempotency check (read existing turns, skip if already
/// present) can't race with a concurrent append.
pub struct FsStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FsStore {
    /// Create a store rooted at the given directory. The directory is
    /// created lazily on first write.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn path_for(&self, conv_id: &str) -> PathBuf {
        self.root.join(format!("{conv_id}.jsonl"))
    }

    async fn read_all(&self, conv_id: &str) -> Result<Vec<Turn>, StoreError> {
        let path = self.path_for(conv_id);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }
}

impl ConversationStore for FsStore {
    async fn save_turn(&self, conv_id: &str, turn: Turn) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let existing = self.read_all(conv_id).await?;
        if existing.contains(&turn) {
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(StoreError::Io)?;

        let line = serde_json::to_string(&turn).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let path = self.path_for(conv_id);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(StoreError::Io)?;
        file.write_all(line.as_bytes())
            .await
            .map_err(StoreError::Io)?;
        file.write_all(b"\n").await.map_err(StoreError::Io)?;
        Ok(())
    }

    async fn load_context(&self, conv_id: &str, k: i64) -> Result<Vec<Turn>, StoreError> {
        let turns = self.read_all(conv_id).await?;
        if k <= 0 || k as usize >= turns.len() {
            return Ok(turns);
        }
        let start = turns.len() - k as usize;
        Ok(turns[start..].to_vec())
    }
}
