//! Shared test utilities and recording fakes.

#![allow(dead_code, unused_imports)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};

use photo_stickers::app::{AppServices, HostContext};
use photo_stickers::error::{InsertError, StoreError};
use photo_stickers::flow::Screen;
use photo_stickers::geometry::Rect;
use photo_stickers::media::StickerImage;
use photo_stickers::model::{Sticker, StickerId, StickerInfoSnapshot, StickerPredicate};
use photo_stickers::reactive::Property;
use photo_stickers::services::{
    ImageSource, ImageStoreService, ImagePicker, LocalStickerStore, MemoryImageStore,
    QueryResult, StickerQuery, StickerRenderService, StickerStoreService, ThumbnailCache,
};
use photo_stickers::ui::PresentationStyle;

/// Opaque image filled with one color.
pub fn solid_image(width: u32, height: u32) -> StickerImage {
    StickerImage::new(RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255])))
}

/// Drain every value currently queued on `rx`.
pub fn drain<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
    let mut out = Vec::new();
    while let Ok(value) = rx.try_recv() {
        out.push(value);
    }
    out
}

// -- Renderer -----------------------------------------------------------------

/// Render service that counts calls and returns a fixed result.
///
/// With a gate, each render blocks until [`CountingRenderer::release`] is
/// called, keeping the render in flight.
pub struct CountingRenderer {
    calls: AtomicUsize,
    result: Option<StickerImage>,
    gate: Option<Mutex<std_mpsc::Receiver<()>>>,
    gate_tx: Option<std_mpsc::Sender<()>>,
    last_input: Mutex<Option<StickerInfoSnapshot>>,
}

impl CountingRenderer {
    pub fn returning(result: Option<StickerImage>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result,
            gate: None,
            gate_tx: None,
            last_input: Mutex::new(None),
        }
    }

    pub fn gated(result: Option<StickerImage>) -> Self {
        let (tx, rx) = std_mpsc::channel();
        Self {
            gate: Some(Mutex::new(rx)),
            gate_tx: Some(tx),
            ..Self::returning(result)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<StickerInfoSnapshot> {
        self.last_input.lock().clone()
    }

    /// Let one gated render finish.
    pub fn release(&self) {
        if let Some(tx) = &self.gate_tx {
            let _ = tx.send(());
        }
    }
}

impl StickerRenderService for CountingRenderer {
    fn render(&self, info: &StickerInfoSnapshot) -> Option<StickerImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock() = Some(info.clone());
        if let Some(gate) = &self.gate {
            let _ = gate.lock().recv_timeout(Duration::from_secs(5));
        }
        self.result.clone()
    }
}

// -- Sticker store --------------------------------------------------------------

/// In-memory sticker store that records every call.
///
/// Queries can be switched to a channel the test drives directly, to
/// simulate a failing store.
pub struct RecordingStore {
    inner: LocalStickerStore,
    stored: Mutex<Vec<StickerInfoSnapshot>>,
    deleted: Mutex<Vec<StickerId>>,
    fail_store: AtomicBool,
    scripted_query: Mutex<Option<watch::Sender<QueryResult>>>,
}

impl RecordingStore {
    pub fn new(images: Arc<dyn ImageStoreService>) -> Self {
        Self {
            inner: LocalStickerStore::in_memory(images),
            stored: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            fail_store: AtomicBool::new(false),
            scripted_query: Mutex::new(None),
        }
    }

    pub fn stored(&self) -> Vec<StickerInfoSnapshot> {
        self.stored.lock().clone()
    }

    pub fn deleted(&self) -> Vec<StickerId> {
        self.deleted.lock().clone()
    }

    pub fn all(&self) -> Vec<Sticker> {
        self.inner.all()
    }

    pub fn set_fail_store(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    /// Route later queries through a channel driven by [`send_query`].
    pub fn script_queries(&self, initial: QueryResult) {
        let (tx, _rx) = watch::channel(initial);
        *self.scripted_query.lock() = Some(tx);
    }

    pub fn send_query(&self, result: QueryResult) {
        if let Some(tx) = self.scripted_query.lock().as_ref() {
            tx.send_replace(result);
        }
    }

    /// Store a record directly, bypassing the recording.
    pub async fn seed(&self, rendered: bool) -> Sticker {
        let snapshot = StickerInfoSnapshot {
            id: StickerId::new(),
            original_image: Some(solid_image(40, 30)),
            crop_bounds: Rect::new(0.0, 0.0, 30.0, 30.0),
            rendered_sticker: rendered.then(|| solid_image(30, 30)),
        };
        self.inner.store(snapshot).await.expect("seed sticker")
    }
}

#[async_trait]
impl StickerStoreService for RecordingStore {
    fn fetch_stickers(&self, predicate: StickerPredicate) -> StickerQuery {
        if let Some(tx) = self.scripted_query.lock().as_ref() {
            return StickerQuery::new(tx.subscribe());
        }
        self.inner.fetch_stickers(predicate)
    }

    fn sticker(&self, id: StickerId) -> Option<Sticker> {
        self.inner.sticker(id)
    }

    async fn store(&self, info: StickerInfoSnapshot) -> Result<Sticker, StoreError> {
        self.stored.lock().push(info.clone());
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(StoreError::Serialize("disk full".to_string()));
        }
        self.inner.store(info).await
    }

    async fn delete(&self, id: StickerId) -> Result<(), StoreError> {
        self.deleted.lock().push(id);
        self.inner.delete(id).await
    }
}

/// Services over a recording store and the given renderer.
pub struct Harness {
    pub services: AppServices,
    pub store: Arc<RecordingStore>,
    pub images: Arc<MemoryImageStore>,
    pub renderer: Arc<CountingRenderer>,
}

pub fn harness(renderer: CountingRenderer) -> Harness {
    let images = Arc::new(MemoryImageStore::new());
    let store = Arc::new(RecordingStore::new(images.clone()));
    let renderer = Arc::new(renderer);
    let services = AppServices::new(
        store.clone(),
        images.clone(),
        renderer.clone(),
        Arc::new(ThumbnailCache::new(16, 8)),
    );
    Harness {
        services,
        store,
        images,
        renderer,
    }
}

// -- Host and picker ------------------------------------------------------------

/// Host that records what the session asked of it.
pub struct ScriptedHost {
    style: Property<PresentationStyle>,
    grant_requests: bool,
    pub embedded: Mutex<Vec<Screen>>,
    pub style_requests: Mutex<Vec<PresentationStyle>>,
    pub inserted: Mutex<Vec<(StickerId, bool)>>,
}

impl ScriptedHost {
    pub fn new(grant_requests: bool) -> Self {
        Self {
            style: Property::new(PresentationStyle::Compact),
            grant_requests,
            embedded: Mutex::new(Vec::new()),
            style_requests: Mutex::new(Vec::new()),
            inserted: Mutex::new(Vec::new()),
        }
    }

    /// Simulate the user resizing the host container.
    pub fn switch_style(&self, style: PresentationStyle) {
        self.style.set_if_changed(style);
    }
}

impl HostContext for ScriptedHost {
    fn presentation_style(&self) -> watch::Receiver<PresentationStyle> {
        self.style.subscribe()
    }

    fn request_presentation_style(&self, style: PresentationStyle) {
        self.style_requests.lock().push(style);
        if self.grant_requests {
            self.style.set_if_changed(style);
        }
    }

    fn embed(&self, screen: &Screen) {
        self.embedded.lock().push(screen.clone());
    }

    fn insert_sticker(
        &self,
        sticker: &Sticker,
        image: Option<&StickerImage>,
    ) -> Result<(), InsertError> {
        self.inserted.lock().push((sticker.id, image.is_some()));
        match image {
            Some(_) => Ok(()),
            None => Err(InsertError::NoRenderedImage(sticker.id)),
        }
    }
}

/// Picker that hands out queued results; `None` once the queue is empty.
pub struct ScriptedPicker {
    results: Mutex<VecDeque<Option<StickerImage>>>,
    calls: AtomicUsize,
}

impl ScriptedPicker {
    pub fn new(results: Vec<Option<StickerImage>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImagePicker for ScriptedPicker {
    fn pick(&self, _source: ImageSource) -> Option<StickerImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results.lock().pop_front().flatten()
    }
}
