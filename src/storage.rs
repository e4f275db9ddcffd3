use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

#[cfg(test)]
pub use memory::MemoryStore;

/// One mutation inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvOp {
    Put { key: String, value: String },
    Remove { key: String },
}

impl KvOp {
    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Self {
        KvOp::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        KvOp::Remove { key: key.into() }
    }
}

/// String-keyed blob store. `apply` commits every op of a batch or none.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn apply(&self, batch: Vec<KvOp>) -> anyhow::Result<()>;

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.apply(vec![KvOp::put(key, value)]).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.apply(vec![KvOp::remove(key)]).await
    }
}

fn apply_ops(map: &mut BTreeMap<String, String>, batch: Vec<KvOp>) {
    for op in batch {
        match op {
            KvOp::Put { key, value } => {
                map.insert(key, value);
            }
            KvOp::Remove { key } => {
                map.remove(&key);
            }
        }
    }
}

/// Whole store kept as one JSON object on disk, replaced via temp file + rename.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "store.json";

    pub async fn open(dir: &Path) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create data dir {}", dir.display()))?;
        let path = dir.join(Self::FILE_NAME);

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => {
                anyhow::bail!("store file {} is empty", path.display())
            }
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("parse store file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("read store file {}", path.display()))
            }
        };
        debug!(path = %path.display(), keys = entries.len(), "file store opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(entries).context("serialize store")?;
        let tmp = self.path.with_extension("json.tmp");

        let mut file = tokio::fs::File::create(&tmp)
            .await
            .with_context(|| format!("create {}", tmp.display()))?;
        file.write_all(&json)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("sync {}", tmp.display()))?;
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
                .await
                .with_context(|| format!("chmod {}", tmp.display()))?;
        }

        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("rename {} -> {}", tmp.display(), self.path.display()))?;

        // the rename itself is only durable once the directory entry is flushed
        #[cfg(unix)]
        if let Some(dir) = self.path.parent() {
            tokio::fs::File::open(dir)
                .await
                .with_context(|| format!("open dir {}", dir.display()))?
                .sync_all()
                .await
                .with_context(|| format!("sync dir {}", dir.display()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn apply(&self, batch: Vec<KvOp>) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        let ops = batch.len();
        apply_ops(&mut next, batch);
        self.persist(&next).await?;
        *entries = next;
        debug!(ops, "file store batch committed");
        Ok(())
    }
}

#[cfg(test)]
mod memory {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// In-memory store that counts committed batches.
    #[derive(Default)]
    pub struct MemoryStore {
        entries: Mutex<BTreeMap<String, String>>,
        batches: AtomicUsize,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of batches committed so far.
        pub fn batch_count(&self) -> usize {
            self.batches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl KvStore for MemoryStore {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.entries.lock().await.get(key).cloned())
        }

        async fn apply(&self, batch: Vec<KvOp>) -> anyhow::Result<()> {
            let mut entries = self.entries.lock().await;
            apply_ops(&mut *entries, batch);
            self.batches.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
