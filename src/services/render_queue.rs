//! Serial background queue for sticker rendering.
//!
//! Rendering is the one CPU-bound step in the app. Jobs run one at a time
//! on a dedicated thread; callers get the result through a callback and are
//! responsible for handing it back to their own thread.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use crate::media::StickerImage;
use crate::model::StickerInfoSnapshot;
use crate::services::render::StickerRenderService;

type RenderCallback = Box<dyn FnOnce(Option<StickerImage>) + Send>;

struct RenderJob {
    info: StickerInfoSnapshot,
    on_done: RenderCallback,
}

/// Handle to the render thread. Cheap to clone; the thread exits once every
/// handle is dropped and the backlog is drained.
#[derive(Clone)]
pub struct RenderQueue {
    sender: Sender<RenderJob>,
}

impl RenderQueue {
    pub fn new(renderer: Arc<dyn StickerRenderService>) -> Self {
        let (sender, receiver) = channel();
        let spawned = std::thread::Builder::new()
            .name("sticker-render".to_string())
            .spawn(move || render_loop(receiver, renderer));
        if let Err(err) = spawned {
            // Jobs sent to a queue without a worker report `None` right away.
            tracing::error!(error = %err, "Failed to start render thread");
        }
        Self { sender }
    }

    /// Queue a render of `info`. `on_done` runs on the render thread with
    /// the result; `None` covers both a soft render failure and a queue
    /// whose worker is gone.
    pub fn submit<F>(&self, info: StickerInfoSnapshot, on_done: F)
    where
        F: FnOnce(Option<StickerImage>) + Send + 'static,
    {
        let job = RenderJob {
            info,
            on_done: Box::new(on_done),
        };
        if let Err(err) = self.sender.send(job) {
            tracing::warn!("Render queue closed, dropping render job");
            (err.0.on_done)(None);
        }
    }
}

fn render_loop(receiver: Receiver<RenderJob>, renderer: Arc<dyn StickerRenderService>) {
    while let Ok(job) = receiver.recv() {
        let sticker_id = job.info.id;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            renderer.render(&job.info)
        }));
        let image = match result {
            Ok(image) => image,
            Err(_) => {
                tracing::error!(sticker_id = %sticker_id, "Render service panicked");
                None
            }
        };
        if image.is_none() {
            tracing::debug!(sticker_id = %sticker_id, "Render produced no sticker");
        }
        (job.on_done)(image);
    }
    tracing::debug!("Render queue drained, worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::StickerId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread::ThreadId;
    use std::time::Duration;

    struct ThreadRecorder {
        calls: AtomicUsize,
        threads: parking_lot::Mutex<Vec<ThreadId>>,
    }

    impl StickerRenderService for ThreadRecorder {
        fn render(&self, _info: &StickerInfoSnapshot) -> Option<StickerImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.threads.lock().push(std::thread::current().id());
            Some(StickerImage::transparent(1, 1))
        }
    }

    struct Panicking;

    impl StickerRenderService for Panicking {
        fn render(&self, _info: &StickerInfoSnapshot) -> Option<StickerImage> {
            panic!("boom");
        }
    }

    fn info() -> StickerInfoSnapshot {
        StickerInfoSnapshot {
            id: StickerId::new(),
            original_image: Some(StickerImage::transparent(2, 2)),
            crop_bounds: Rect::new(0.0, 0.0, 2.0, 2.0),
            rendered_sticker: None,
        }
    }

    #[test]
    fn jobs_run_serially_off_the_caller_thread() {
        let recorder = Arc::new(ThreadRecorder {
            calls: AtomicUsize::new(0),
            threads: parking_lot::Mutex::new(Vec::new()),
        });
        let queue = RenderQueue::new(recorder.clone());
        let (tx, rx) = channel();
        for _ in 0..3 {
            let tx = tx.clone();
            queue.submit(info(), move |image| {
                let _ = tx.send(image.is_some());
            });
        }
        for _ in 0..3 {
            assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap());
        }

        assert_eq!(recorder.calls.load(Ordering::SeqCst), 3);
        let threads = recorder.threads.lock();
        assert!(threads.iter().all(|id| *id == threads[0]));
        assert_ne!(threads[0], std::thread::current().id());
    }

    #[test]
    fn panicking_renderer_reports_none() {
        let queue = RenderQueue::new(Arc::new(Panicking));
        let (tx, rx) = channel();
        queue.submit(info(), move |image| {
            let _ = tx.send(image);
        });
        assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap().is_none());
    }
}
