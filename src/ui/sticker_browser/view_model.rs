//! Browser view-model: live list of rendered stickers, edit mode and
//! selection.

use tokio::sync::mpsc;

use crate::app::AppServices;
use crate::flow::{Step, StepRelay, Stepper};
use crate::model::StickerPredicate;
use crate::reactive::Property;
use crate::services::StickerQuery;
use crate::ui::mvi;
use crate::ui::presentation::PresentationStyle;

use super::intent::StickerBrowserIntent;
use super::output::StickerBrowserOutput;
use super::reducer::StickerBrowserReducer;
use super::section::{section_items, StickerSectionItem};
use super::state::StickerBrowserState;

/// View-model for the sticker browser.
///
/// Observes the store for stickers that have a rendered image and rebuilds
/// the whole section list whenever that result or the editing flag
/// changes. Selections are turned into steps on the relay.
pub struct StickerBrowserViewModel {
    state: StickerBrowserState,
    services: AppServices,
    query: StickerQuery,
    query_open: bool,
    is_editing: Property<bool>,
    items: Vec<StickerSectionItem>,
    steps: StepRelay,
    outputs: mpsc::UnboundedSender<StickerBrowserOutput>,
}

enum Wake {
    Ui(Option<StickerBrowserIntent>),
    Store(bool),
}

impl StickerBrowserViewModel {
    pub fn new(
        services: &AppServices,
        steps: StepRelay,
    ) -> (Self, mpsc::UnboundedReceiver<StickerBrowserOutput>) {
        let query = services
            .sticker_store
            .fetch_stickers(StickerPredicate::has_rendered_image());
        let (outputs, output_rx) = mpsc::unbounded_channel();
        let view_model = Self {
            state: StickerBrowserState::default(),
            services: services.clone(),
            query,
            query_open: true,
            is_editing: Property::new(false),
            items: Vec::new(),
            steps,
            outputs,
        };
        (view_model, output_rx)
    }

    /// Emit initial outputs and the first list.
    pub fn start(&mut self) {
        self.emit(StickerBrowserOutput::NavigationBarHidden(
            self.state.navigation_bar_hidden(),
        ));
        self.emit(StickerBrowserOutput::ActionButtonType(
            self.state.action_button_type(),
        ));
        let current = self.query.current();
        self.dispatch(StickerBrowserIntent::StickersChanged(current));
    }

    pub fn state(&self) -> &StickerBrowserState {
        &self.state
    }

    /// Current section list.
    pub fn items(&self) -> &[StickerSectionItem] {
        &self.items
    }

    pub fn dispatch(&mut self, intent: StickerBrowserIntent) {
        tracing::debug!(?intent, "Browser intent");

        let selected = match intent {
            StickerBrowserIntent::ItemSelected(index) => Some(index),
            _ => None,
        };
        let stickers_changed = matches!(intent, StickerBrowserIntent::StickersChanged(_));
        let style_changed = matches!(intent, StickerBrowserIntent::PresentationStyleChanged(_));
        if let StickerBrowserIntent::StickersChanged(Err(ref err)) = intent {
            tracing::warn!(error = %err, "Sticker query failed, showing empty list");
        }

        let previous = mvi::dispatch::<StickerBrowserReducer>(&mut self.state, intent);

        let editing_changed = previous.is_editing != self.state.is_editing;
        if editing_changed {
            self.is_editing.set(self.state.is_editing);
            self.emit(StickerBrowserOutput::ActionButtonType(
                self.state.action_button_type(),
            ));
            if self.state.is_editing {
                self.emit(StickerBrowserOutput::RequestPresentationStyle(
                    PresentationStyle::Expanded,
                ));
            }
        }

        if style_changed {
            self.emit(StickerBrowserOutput::NavigationBarHidden(
                self.state.navigation_bar_hidden(),
            ));
        }

        if stickers_changed || editing_changed {
            self.items = section_items(
                &self.state.stickers,
                &self.is_editing.subscribe(),
                &self.services.image_store,
                &self.services.thumbnails,
            );
            self.emit(StickerBrowserOutput::SectionItems(self.items.clone()));
        }

        if let Some(index) = selected {
            self.select(index);
        }
    }

    /// Pick up a new store result if one arrived. Returns whether one did.
    ///
    /// Once the store goes away the last list stays on screen.
    pub fn poll_store(&mut self) -> bool {
        match self.query.has_changed() {
            Some(true) => {
                let current = self.query.current();
                self.dispatch(StickerBrowserIntent::StickersChanged(current));
                true
            }
            Some(false) => false,
            None => {
                self.close_query();
                false
            }
        }
    }

    /// Drive the browser from UI intents and store updates until the UI
    /// side closes.
    pub async fn run(&mut self, mut intents: mpsc::UnboundedReceiver<StickerBrowserIntent>) {
        loop {
            let query_open = self.query_open;
            let wake = tokio::select! {
                intent = intents.recv() => Wake::Ui(intent),
                alive = self.query.changed(), if query_open => Wake::Store(alive),
            };
            match wake {
                Wake::Ui(Some(intent)) => self.dispatch(intent),
                Wake::Ui(None) => break,
                Wake::Store(true) => {
                    let current = self.query.current();
                    self.dispatch(StickerBrowserIntent::StickersChanged(current));
                }
                Wake::Store(false) => self.close_query(),
            }
        }
    }

    fn select(&mut self, index: usize) {
        let Some(item) = self.items.get(index).cloned() else {
            tracing::debug!(index, count = self.items.len(), "Ignoring out of range selection");
            return;
        };
        let step = match item.sticker() {
            Some(sticker) => Step::StickerIsPicked(sticker.clone()),
            None => Step::AddStickerIsPicked,
        };
        self.emit(StickerBrowserOutput::OpenStickerItem(item));
        self.steps.emit(step);
    }

    fn close_query(&mut self) {
        if self.query_open {
            tracing::debug!("Sticker query closed, keeping last list");
            self.query_open = false;
        }
    }

    fn emit(&self, output: StickerBrowserOutput) {
        let _ = self.outputs.send(output);
    }
}

/// The browser only emits steps in response to selections.
impl Stepper for StickerBrowserViewModel {}
