//! Sticker record store with live, predicate-filtered queries.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use fs2::FileExt;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::StoreError;
use crate::model::{Sticker, StickerId, StickerInfoSnapshot, StickerPredicate};
use crate::services::image_store::{ImageKind, ImageStoreService};

const INDEX_FILE: &str = "stickers.json";
const INDEX_VERSION: u32 = 1;

/// Latest result of a live query.
pub type QueryResult = Result<Vec<Sticker>, StoreError>;

/// Live list of stickers matching a predicate.
///
/// Re-emits whenever a matching record is inserted, updated or deleted.
pub struct StickerQuery {
    receiver: watch::Receiver<QueryResult>,
}

impl StickerQuery {
    pub fn new(receiver: watch::Receiver<QueryResult>) -> Self {
        Self { receiver }
    }

    /// Current result, marking it as seen.
    pub fn current(&mut self) -> QueryResult {
        self.receiver.borrow_and_update().clone()
    }

    /// Whether a result arrived since the last [`current`](Self::current).
    ///
    /// `None` once the store has gone away.
    pub fn has_changed(&self) -> Option<bool> {
        self.receiver.has_changed().ok()
    }

    /// Wait for the next result. Returns `false` once the store has gone away.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}

/// Persistent sticker records.
#[async_trait]
pub trait StickerStoreService: Send + Sync {
    /// Live query over all records matching `predicate`, in store order.
    fn fetch_stickers(&self, predicate: StickerPredicate) -> StickerQuery;

    /// Point lookup by identity.
    fn sticker(&self, id: StickerId) -> Option<Sticker>;

    /// Insert or update the record and image blobs for `info`.
    async fn store(&self, info: StickerInfoSnapshot) -> Result<Sticker, StoreError>;

    /// Remove the record and its image blobs.
    async fn delete(&self, id: StickerId) -> Result<(), StoreError>;
}

#[derive(Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    stickers: Vec<Sticker>,
}

struct StoreInner {
    stickers: Vec<Sticker>,
    queries: Vec<(StickerPredicate, watch::Sender<QueryResult>)>,
}

/// Sticker store backed by memory, optionally mirrored to a JSON index file.
///
/// Records keep insertion order. Writes for the same identity are
/// serialized; writes for different identities may interleave.
pub struct LocalStickerStore {
    images: Arc<dyn ImageStoreService>,
    index_path: Option<PathBuf>,
    inner: RwLock<StoreInner>,
    sticker_locks: Mutex<HashMap<StickerId, Arc<tokio::sync::Mutex<()>>>>,
    index_lock: tokio::sync::Mutex<()>,
}

impl LocalStickerStore {
    /// Store that never touches the filesystem.
    pub fn in_memory(images: Arc<dyn ImageStoreService>) -> Self {
        Self::with_records(images, None, Vec::new())
    }

    /// Open the index in `dir`, creating the directory if needed.
    pub fn open(dir: &Path, images: Arc<dyn ImageStoreService>) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, &e))?;
        let index_path = dir.join(INDEX_FILE);
        let stickers = read_index(&index_path)?;
        tracing::debug!(
            path = %index_path.display(),
            count = stickers.len(),
            "Opened sticker index"
        );
        Ok(Self::with_records(images, Some(index_path), stickers))
    }

    fn with_records(
        images: Arc<dyn ImageStoreService>,
        index_path: Option<PathBuf>,
        stickers: Vec<Sticker>,
    ) -> Self {
        Self {
            images,
            index_path,
            inner: RwLock::new(StoreInner {
                stickers,
                queries: Vec::new(),
            }),
            sticker_locks: Mutex::new(HashMap::new()),
            index_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// All records in store order.
    pub fn all(&self) -> Vec<Sticker> {
        self.inner.read().stickers.clone()
    }

    fn lock_for(&self, id: StickerId) -> Arc<tokio::sync::Mutex<()>> {
        self.sticker_locks
            .lock()
            .entry(id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Push the current records to every live query, dropping queries
    /// nobody listens to anymore.
    fn publish(inner: &mut StoreInner) {
        let stickers = &inner.stickers;
        inner.queries.retain(|(predicate, sender)| {
            if sender.is_closed() {
                return false;
            }
            let matching = stickers
                .iter()
                .filter(|sticker| predicate.matches(sticker))
                .cloned()
                .collect();
            sender.send_replace(Ok(matching));
            true
        });
    }

    /// Drop the per-id lock once nobody but the map and `lock` holds it.
    ///
    /// Checked under the map mutex, which `lock_for` also takes, so no
    /// caller can pick the entry up in between.
    fn release_lock(&self, id: StickerId, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.sticker_locks.lock();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&id);
        }
    }

    /// Apply `change` to a copy of the records and write the index. Memory
    /// and live queries only see the change once the index holds it.
    async fn commit<T, F>(&self, change: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Vec<Sticker>) -> Result<T, StoreError> + Send,
    {
        let _guard = self.index_lock.lock().await;
        let mut stickers = self.all();
        let value = change(&mut stickers)?;
        if let Some(path) = &self.index_path {
            write_index(path, stickers.clone())?;
        }
        {
            let mut inner = self.inner.write();
            inner.stickers = stickers;
            Self::publish(&mut inner);
        }
        Ok(value)
    }

    async fn delete_locked(&self, id: StickerId) -> Result<(), StoreError> {
        self.commit(|stickers| {
            let before = stickers.len();
            stickers.retain(|sticker| sticker.id != id);
            if stickers.len() == before {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
        .await?;

        self.images.remove(id)?;
        tracing::info!(sticker_id = %id, "Sticker deleted");
        Ok(())
    }
}

#[async_trait]
impl StickerStoreService for LocalStickerStore {
    fn fetch_stickers(&self, predicate: StickerPredicate) -> StickerQuery {
        let mut inner = self.inner.write();
        let matching = inner
            .stickers
            .iter()
            .filter(|sticker| predicate.matches(sticker))
            .cloned()
            .collect();
        let (sender, receiver) = watch::channel(Ok(matching));
        inner.queries.push((predicate, sender));
        StickerQuery::new(receiver)
    }

    fn sticker(&self, id: StickerId) -> Option<Sticker> {
        self.inner
            .read()
            .stickers
            .iter()
            .find(|sticker| sticker.id == id)
            .cloned()
    }

    async fn store(&self, info: StickerInfoSnapshot) -> Result<Sticker, StoreError> {
        let lock = self.lock_for(info.id);
        let _guard = lock.lock().await;

        let original = info
            .original_image
            .as_ref()
            .ok_or(StoreError::MissingImage(info.id))?;
        self.images.store(original, info.id, ImageKind::Original)?;
        if let Some(rendered) = &info.rendered_sticker {
            self.images.store(rendered, info.id, ImageKind::Rendered)?;
        }

        let record = self
            .commit(|stickers| {
                let record = match stickers.iter_mut().find(|s| s.id == info.id) {
                    Some(existing) => {
                        *existing = info.to_sticker(existing.revision + 1);
                        existing.clone()
                    }
                    None => {
                        let record = info.to_sticker(1);
                        stickers.push(record.clone());
                        record
                    }
                };
                Ok(record)
            })
            .await?;

        tracing::info!(
            sticker_id = %record.id,
            revision = record.revision,
            rendered = record.has_rendered_image,
            "Sticker stored"
        );
        Ok(record)
    }

    async fn delete(&self, id: StickerId) -> Result<(), StoreError> {
        let lock = self.lock_for(id);
        let result = {
            let _guard = lock.lock().await;
            self.delete_locked(id).await
        };
        self.release_lock(id, lock);
        result
    }
}

fn read_index(path: &Path) -> Result<Vec<Sticker>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(StoreError::io(path, &err)),
    };
    let index: IndexFile =
        serde_json::from_str(&content).map_err(|e| StoreError::Serialize(e.to_string()))?;
    if index.version != INDEX_VERSION {
        tracing::warn!(
            version = index.version,
            expected = INDEX_VERSION,
            "Sticker index version mismatch, reading anyway"
        );
    }
    Ok(index.stickers)
}

fn write_index(path: &Path, stickers: Vec<Sticker>) -> Result<(), StoreError> {
    let lock_path = path.with_extension("json.lock");
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| StoreError::io(&lock_path, &e))?;
    lock_file.lock_exclusive().map_err(|e| StoreError::Lock {
        path: lock_path.display().to_string(),
        message: e.to_string(),
    })?;

    let result = write_index_locked(path, stickers);
    if let Err(err) = FileExt::unlock(&lock_file) {
        tracing::warn!(error = %err, "Failed to unlock sticker index");
    }
    result
}

fn write_index_locked(path: &Path, stickers: Vec<Sticker>) -> Result<(), StoreError> {
    let index = IndexFile {
        version: INDEX_VERSION,
        stickers,
    };
    let json =
        serde_json::to_string_pretty(&index).map_err(|e| StoreError::Serialize(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    {
        use std::io::Write;
        let mut file = File::create(&tmp).map_err(|e| StoreError::io(&tmp, &e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| StoreError::io(&tmp, &e))?;
        file.sync_all().map_err(|e| StoreError::io(&tmp, &e))?;
    }
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, &e))
}
