//! Headless driver for one picker session: embeds the root screen, routes
//! screen outputs to the host and the coordinator, and applies transitions.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::error::StartupError;
use crate::flow::{FlowCoordinator, FlowTransition, OneStepper, Screen, Step};
use crate::geometry::Rect;
use crate::model::StickerId;
use crate::services::{ImageKind, ImagePicker};
use crate::ui::edit_sticker::{
    DismissReason, EditStickerIntent, EditStickerOutput, EditStickerViewModel,
};
use crate::ui::sticker_browser::{
    ActionButtonType, StickerBrowserIntent, StickerBrowserOutput, StickerBrowserViewModel,
    StickerSectionItem,
};
use crate::ui::PresentationStyle;

use super::host::HostContext;
use super::Application;

/// Something the session did that its driver may want to report.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Embedded(Screen),
    Pushed(Screen),
    Popped,
    EditorDismissed(DismissReason),
    PresentationStyleRequested(PresentationStyle),
    StickerInserted(StickerId),
    InsertFailed { sticker_id: StickerId, message: String },
}

struct BrowserScreen {
    view_model: StickerBrowserViewModel,
    outputs: mpsc::UnboundedReceiver<StickerBrowserOutput>,
    items: Vec<StickerSectionItem>,
    navigation_bar_hidden: bool,
    action_button: ActionButtonType,
}

struct EditorScreen {
    view_model: EditStickerViewModel,
    outputs: mpsc::UnboundedReceiver<EditStickerOutput>,
    save_enabled: bool,
    shown_bounds: Option<Rect>,
}

/// One picker session.
pub struct Session {
    app: Application,
    host: Arc<dyn HostContext>,
    picker: Arc<dyn ImagePicker>,
    coordinator: FlowCoordinator,
    style: watch::Receiver<PresentationStyle>,
    browser: Option<BrowserScreen>,
    editor: Option<EditorScreen>,
}

impl Session {
    /// Fails when no host context is available; the picker cannot run
    /// outside a container.
    pub fn new(
        app: Application,
        host: Option<Arc<dyn HostContext>>,
        picker: Arc<dyn ImagePicker>,
    ) -> Result<Self, StartupError> {
        let host = host.ok_or(StartupError::HostContextUnavailable)?;
        let style = host.presentation_style();
        let coordinator = FlowCoordinator::new(app.config().flow.sticker_pick);
        Ok(Self {
            app,
            host,
            picker,
            coordinator,
            style,
            browser: None,
            editor: None,
        })
    }

    /// Embed the browser and process everything that follows from it.
    pub async fn start(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let transition = self
            .coordinator
            .coordinate(&OneStepper::new(Step::StickerBrowserIsRequired));
        self.apply(transition, &mut events);
        events.extend(self.settle().await);
        events
    }

    pub fn stack(&self) -> &[Screen] {
        self.coordinator.stack().screens()
    }

    /// Latest browser list.
    pub fn browser_items(&self) -> &[StickerSectionItem] {
        match self.browser.as_ref() {
            Some(browser) => &browser.items,
            None => &[],
        }
    }

    pub fn navigation_bar_hidden(&self) -> bool {
        self.browser
            .as_ref()
            .map_or(true, |browser| browser.navigation_bar_hidden)
    }

    pub fn action_button(&self) -> Option<ActionButtonType> {
        self.browser.as_ref().map(|browser| browser.action_button)
    }

    /// Index of the browser item showing `id`.
    pub fn browser_index_of(&self, id: StickerId) -> Option<usize> {
        self.browser_items()
            .iter()
            .position(|item| item.sticker().is_some_and(|sticker| sticker.id == id))
    }

    /// Index of the "add sticker" entry.
    pub fn add_sticker_index(&self) -> Option<usize> {
        self.browser_items()
            .iter()
            .position(StickerSectionItem::is_add_sticker)
    }

    pub fn editor(&self) -> Option<&EditStickerViewModel> {
        self.editor.as_ref().map(|editor| &editor.view_model)
    }

    /// Last save button state the editor reported.
    pub fn editor_save_enabled(&self) -> Option<bool> {
        self.editor.as_ref().map(|editor| editor.save_enabled)
    }

    /// Crop rectangle shown with the editor's current image.
    pub fn editor_shown_bounds(&self) -> Option<Rect> {
        self.editor.as_ref().and_then(|editor| editor.shown_bounds)
    }

    pub fn send_browser(&mut self, intent: StickerBrowserIntent) -> bool {
        match self.browser.as_mut() {
            Some(browser) => {
                browser.view_model.dispatch(intent);
                true
            }
            None => false,
        }
    }

    pub fn send_editor(&mut self, intent: EditStickerIntent) -> bool {
        match self.editor.as_mut() {
            Some(editor) => {
                editor.view_model.dispatch(intent);
                true
            }
            None => false,
        }
    }

    /// Process outputs, steps and background completions until nothing is
    /// left in flight.
    pub async fn settle(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        loop {
            let progressed = self.pump(&mut events);
            if let Some(editor) = self.editor.as_mut() {
                if editor.view_model.is_busy() {
                    editor.view_model.settle().await;
                    continue;
                }
            }
            if !progressed {
                break;
            }
        }
        events
    }

    /// One pass over every source. Returns whether anything was handled.
    fn pump(&mut self, events: &mut Vec<SessionEvent>) -> bool {
        let mut progressed = false;

        if self.style.has_changed().unwrap_or(false) {
            let style = *self.style.borrow_and_update();
            progressed |= self.send_browser(StickerBrowserIntent::PresentationStyleChanged(style));
        }

        if let Some(browser) = self.browser.as_mut() {
            progressed |= browser.view_model.poll_store();
        }
        if let Some(editor) = self.editor.as_mut() {
            progressed |= editor.view_model.try_process_completions() > 0;
        }

        progressed |= self.drain_browser(events);
        progressed |= self.drain_editor(events);

        while let Some(step) = self.coordinator.try_next_step() {
            let transition = self.coordinator.navigate(step);
            self.apply(transition, events);
            progressed = true;
        }

        progressed
    }

    fn drain_browser(&mut self, events: &mut Vec<SessionEvent>) -> bool {
        let Some(browser) = self.browser.as_mut() else {
            return false;
        };
        let mut progressed = false;
        while let Ok(output) = browser.outputs.try_recv() {
            progressed = true;
            match output {
                StickerBrowserOutput::SectionItems(items) => browser.items = items,
                StickerBrowserOutput::NavigationBarHidden(hidden) => {
                    browser.navigation_bar_hidden = hidden
                }
                StickerBrowserOutput::ActionButtonType(button) => browser.action_button = button,
                StickerBrowserOutput::RequestPresentationStyle(style) => {
                    self.host.request_presentation_style(style);
                    events.push(SessionEvent::PresentationStyleRequested(style));
                }
                StickerBrowserOutput::OpenStickerItem(item) => {
                    tracing::debug!(?item, "Opened browser item");
                }
            }
        }
        progressed
    }

    fn drain_editor(&mut self, events: &mut Vec<SessionEvent>) -> bool {
        let mut progressed = false;
        let mut dismissed = None;
        let mut follow_ups = Vec::new();

        if let Some(editor) = self.editor.as_mut() {
            while let Ok(output) = editor.outputs.try_recv() {
                progressed = true;
                match output {
                    EditStickerOutput::OriginalImageWithBounds { bounds, .. } => {
                        editor.shown_bounds = Some(bounds)
                    }
                    EditStickerOutput::SaveEnabled(enabled) => editor.save_enabled = enabled,
                    EditStickerOutput::PresentImagePicker(source) => {
                        let picked = self.picker.pick(source);
                        let needs_default_crop = editor.view_model.info().crop_bounds_are_empty();
                        // Crop first so the image is shown with its default crop.
                        if let (Some(image), true) = (&picked, needs_default_crop) {
                            follow_ups.push(EditStickerIntent::CropChanged(
                                Rect::centered_square(image.size()),
                            ));
                        }
                        follow_ups.push(EditStickerIntent::ImagePicked(picked));
                    }
                    EditStickerOutput::Dismiss(reason) => dismissed = Some(reason),
                }
            }
        }

        for intent in follow_ups {
            self.send_editor(intent);
        }

        if let Some(reason) = dismissed {
            events.push(SessionEvent::EditorDismissed(reason));
            let transition = self.coordinator.dismiss_top();
            self.apply(transition, events);
        }
        progressed
    }

    fn apply(&mut self, transition: FlowTransition, events: &mut Vec<SessionEvent>) {
        let mut pending = VecDeque::from([transition]);
        while let Some(transition) = pending.pop_front() {
            match transition {
                FlowTransition::SetRoot(screen) => {
                    self.browser = None;
                    self.editor = None;
                    self.host.embed(&screen);
                    if let Some(next) = self.open(&screen) {
                        pending.push_back(next);
                    }
                    events.push(SessionEvent::Embedded(screen));
                }
                FlowTransition::Push(screen) => {
                    if let Some(next) = self.open(&screen) {
                        pending.push_back(next);
                    }
                    events.push(SessionEvent::Pushed(screen));
                }
                FlowTransition::Pop => {
                    // Dropping the editor discards whatever it still had in flight.
                    self.editor = None;
                    events.push(SessionEvent::Popped);
                }
                FlowTransition::InsertSticker(sticker) => {
                    let image = self
                        .app
                        .services()
                        .image_store
                        .fetch(sticker.id, ImageKind::Rendered);
                    match self.host.insert_sticker(&sticker, image.as_ref()) {
                        Ok(()) => events.push(SessionEvent::StickerInserted(sticker.id)),
                        Err(err) => {
                            tracing::warn!(sticker_id = %sticker.id, error = %err, "Failed to insert sticker");
                            events.push(SessionEvent::InsertFailed {
                                sticker_id: sticker.id,
                                message: err.to_string(),
                            });
                        }
                    }
                }
                FlowTransition::None => {}
            }
        }
    }

    /// Create the view-model for `screen`. Returns the transition its
    /// stepper asks for, if any.
    fn open(&mut self, screen: &Screen) -> Option<FlowTransition> {
        match screen {
            Screen::StickerBrowser => {
                let (mut view_model, outputs) =
                    StickerBrowserViewModel::new(self.app.services(), self.coordinator.relay());
                let next = self.coordinator.coordinate(&view_model);
                view_model.start();
                view_model.dispatch(StickerBrowserIntent::PresentationStyleChanged(
                    *self.style.borrow_and_update(),
                ));
                self.browser = Some(BrowserScreen {
                    view_model,
                    outputs,
                    items: Vec::new(),
                    navigation_bar_hidden: true,
                    action_button: ActionButtonType::Edit,
                });
                (next != FlowTransition::None).then_some(next)
            }
            Screen::EditSticker { sticker } => {
                let (mut view_model, outputs) =
                    EditStickerViewModel::new(sticker, self.app.services());
                view_model.start();
                self.editor = Some(EditorScreen {
                    view_model,
                    outputs,
                    save_enabled: false,
                    shown_bounds: None,
                });
                None
            }
        }
    }
}
