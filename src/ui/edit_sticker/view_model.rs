//! Edit screen view-model: binds intents into the sticker being edited and
//! drives the render → persist → dismiss chain.

use tokio::sync::mpsc;

use crate::app::AppServices;
use crate::model::{Sticker, StickerId, StickerInfo};
use crate::services::ImageSource;
use crate::ui::mvi;

use super::intent::EditStickerIntent;
use super::output::EditStickerOutput;
use super::reducer::EditStickerReducer;
use super::state::{Activity, EditStickerState};

/// View-model for one edit session.
///
/// The owner calls [`dispatch`](Self::dispatch) for UI events and feeds
/// background completions back in through
/// [`try_process_completions`](Self::try_process_completions),
/// [`settle`](Self::settle) or [`run`](Self::run). `StickerInfo` is only
/// written inside `dispatch`.
///
/// Dropping the view-model drops the completion receiver, so results of
/// work still in flight are discarded.
pub struct EditStickerViewModel {
    info: StickerInfo,
    state: EditStickerState,
    services: AppServices,
    outputs: mpsc::UnboundedSender<EditStickerOutput>,
    completion_tx: mpsc::UnboundedSender<EditStickerIntent>,
    completions: mpsc::UnboundedReceiver<EditStickerIntent>,
}

enum Wake {
    Ui(Option<EditStickerIntent>),
    Completion(Option<EditStickerIntent>),
}

impl EditStickerViewModel {
    /// Create a session for `sticker`. A sticker the store already knows is
    /// loaded with its images; any other starts out blank.
    pub fn new(
        sticker: &Sticker,
        services: &AppServices,
    ) -> (Self, mpsc::UnboundedReceiver<EditStickerOutput>) {
        let (info, is_persisted) = match services.sticker_store.sticker(sticker.id) {
            Some(stored) => (StickerInfo::load(&stored, services.image_store.as_ref()), true),
            None => (StickerInfo::new(sticker.id), false),
        };
        let (outputs, output_rx) = mpsc::unbounded_channel();
        let (completion_tx, completions) = mpsc::unbounded_channel();

        let mut view_model = Self {
            info,
            state: EditStickerState::default(),
            services: services.clone(),
            outputs,
            completion_tx,
            completions,
        };
        view_model.state.is_persisted = is_persisted;
        (view_model, output_rx)
    }

    /// Emit initial outputs and start the session. Prompts for an image
    /// when the sticker has none.
    pub fn start(&mut self) {
        if let Some(image) = self.info.original_image() {
            self.emit(EditStickerOutput::OriginalImageWithBounds {
                image,
                bounds: self.info.crop_bounds(),
            });
        }
        self.emit(EditStickerOutput::SaveEnabled(self.state.save_enabled));

        let started = EditStickerIntent::SessionStarted {
            has_image: !self.info.original_image_is_none(),
            crop_is_empty: self.info.crop_bounds_are_empty(),
            is_persisted: self.state.is_persisted,
        };
        self.dispatch(started);
    }

    pub fn sticker_id(&self) -> StickerId {
        self.info.id()
    }

    pub fn info(&self) -> &StickerInfo {
        &self.info
    }

    pub fn state(&self) -> &EditStickerState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.activity.is_finished()
    }

    pub fn is_busy(&self) -> bool {
        self.state.activity.is_busy()
    }

    /// Apply one intent: bind its payload, reduce, then emit outputs and
    /// start background work for the transition.
    pub fn dispatch(&mut self, intent: EditStickerIntent) {
        tracing::debug!(sticker_id = %self.info.id(), ?intent, "Edit intent");

        let (intent, image_changed) = if self.is_finished() {
            (intent, false)
        } else {
            self.bind(intent)
        };

        let previous = mvi::dispatch::<EditStickerReducer>(&mut self.state, intent);
        self.apply_transition(&previous, image_changed);
    }

    /// Dispatch every completion that has already arrived. Returns how many
    /// were handled.
    pub fn try_process_completions(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(intent) = self.completions.try_recv() {
            self.dispatch(intent);
            handled += 1;
        }
        handled
    }

    /// Wait until no render, persist or delete is outstanding.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            match self.completions.recv().await {
                Some(intent) => self.dispatch(intent),
                None => break,
            }
        }
    }

    /// Drive the session from a stream of UI intents until it finishes, or
    /// until the UI side closes and nothing is in flight.
    pub async fn run(&mut self, mut intents: mpsc::UnboundedReceiver<EditStickerIntent>) {
        let mut ui_open = true;
        while !self.is_finished() {
            if !ui_open && !self.is_busy() {
                break;
            }
            let wake = tokio::select! {
                intent = intents.recv(), if ui_open => Wake::Ui(intent),
                done = self.completions.recv() => Wake::Completion(done),
            };
            match wake {
                Wake::Ui(Some(intent)) | Wake::Completion(Some(intent)) => self.dispatch(intent),
                Wake::Ui(None) => ui_open = false,
                Wake::Completion(None) => break,
            }
        }
    }

    /// Write intent payloads into the sticker info. Returns the intent to
    /// reduce and whether the original image changed.
    fn bind(&mut self, intent: EditStickerIntent) -> (EditStickerIntent, bool) {
        match intent {
            // A running render owns the current image and crop.
            EditStickerIntent::ImagePicked(_) | EditStickerIntent::CropChanged(_)
                if self.is_busy() =>
            {
                tracing::debug!(sticker_id = %self.info.id(), "Ignoring edit while saving");
                (intent, false)
            }
            EditStickerIntent::ImagePicked(Some(image)) => {
                self.info.set_original_image(image.clone());
                (EditStickerIntent::ImagePicked(Some(image)), true)
            }
            EditStickerIntent::CropChanged(bounds) => {
                self.info.set_crop_bounds(bounds);
                (intent, false)
            }
            EditStickerIntent::RenderFinished(Some(image))
                if self.state.activity == Activity::Rendering =>
            {
                if self.info.set_rendered_sticker(image.clone()) {
                    (EditStickerIntent::RenderFinished(Some(image)), false)
                } else {
                    (EditStickerIntent::RenderFinished(None), false)
                }
            }
            EditStickerIntent::Persisted(Ok(ref sticker)) => {
                tracing::info!(
                    sticker_id = %sticker.id,
                    revision = sticker.revision,
                    "Sticker saved"
                );
                (intent, false)
            }
            EditStickerIntent::Persisted(Err(ref err)) => {
                tracing::warn!(sticker_id = %self.info.id(), error = %err, "Failed to save sticker");
                (intent, false)
            }
            EditStickerIntent::Deleted(Ok(())) => {
                tracing::info!(sticker_id = %self.info.id(), "Sticker deleted");
                (intent, false)
            }
            EditStickerIntent::Deleted(Err(ref err)) => {
                tracing::warn!(sticker_id = %self.info.id(), error = %err, "Failed to delete sticker");
                (intent, false)
            }
            other => (other, false),
        }
    }

    fn apply_transition(&mut self, previous: &EditStickerState, image_changed: bool) {
        if image_changed {
            if let Some(image) = self.info.original_image() {
                self.emit(EditStickerOutput::OriginalImageWithBounds {
                    image,
                    bounds: self.info.crop_bounds(),
                });
            }
        }

        if self.state.save_enabled != previous.save_enabled {
            self.emit(EditStickerOutput::SaveEnabled(self.state.save_enabled));
        }

        if self.state.picker_requests > previous.picker_requests {
            self.emit(EditStickerOutput::PresentImagePicker(ImageSource::PhotoLibrary));
        }

        match (previous.activity, self.state.activity) {
            (Activity::Idle, Activity::Rendering) => self.start_render(),
            (Activity::Rendering, Activity::Persisting) => self.start_persist(),
            (Activity::Idle, Activity::Deleting) => self.start_delete(),
            (before, Activity::Finished(reason)) if !before.is_finished() => {
                tracing::debug!(sticker_id = %self.info.id(), ?reason, "Edit session finished");
                self.emit(EditStickerOutput::Dismiss(reason));
            }
            _ => {}
        }
    }

    fn start_render(&self) {
        let completions = self.completion_tx.clone();
        self.services
            .render_queue
            .submit(self.info.snapshot(), move |image| {
                let _ = completions.send(EditStickerIntent::RenderFinished(image));
            });
    }

    fn start_persist(&self) {
        let store = self.services.sticker_store.clone();
        let snapshot = self.info.snapshot();
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = store.store(snapshot).await;
            let _ = completions.send(EditStickerIntent::Persisted(result));
        });
    }

    fn start_delete(&self) {
        let store = self.services.sticker_store.clone();
        let id = self.info.id();
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = store.delete(id).await;
            let _ = completions.send(EditStickerIntent::Deleted(result));
        });
    }

    fn emit(&self, output: EditStickerOutput) {
        // The screen may already be gone.
        let _ = self.outputs.send(output);
    }
}
