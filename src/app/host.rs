use parking_lot::Mutex;
use tokio::sync::watch;

use crate::clipboard::ClipboardHandler;
use crate::error::InsertError;
use crate::flow::Screen;
use crate::media::StickerImage;
use crate::model::Sticker;
use crate::reactive::Property;
use crate::ui::PresentationStyle;

/// The container the picker runs in.
pub trait HostContext {
    /// Presentation style, updated whenever the host switches it.
    fn presentation_style(&self) -> watch::Receiver<PresentationStyle>;

    /// Ask the host to switch presentation style.
    fn request_presentation_style(&self, style: PresentationStyle);

    /// Show `screen` as the root of the container.
    fn embed(&self, screen: &Screen);

    /// Insert a sticker into the conversation.
    fn insert_sticker(
        &self,
        sticker: &Sticker,
        image: Option<&StickerImage>,
    ) -> Result<(), InsertError>;
}

/// Host for a desktop process: grants every style request and inserts
/// stickers by copying them to the clipboard.
pub struct DesktopHost {
    style: Property<PresentationStyle>,
    clipboard: Mutex<Option<ClipboardHandler>>,
}

impl DesktopHost {
    pub fn new(style: PresentationStyle) -> Self {
        Self {
            style: Property::new(style),
            clipboard: Mutex::new(None),
        }
    }
}

impl HostContext for DesktopHost {
    fn presentation_style(&self) -> watch::Receiver<PresentationStyle> {
        self.style.subscribe()
    }

    fn request_presentation_style(&self, style: PresentationStyle) {
        if self.style.set_if_changed(style) {
            tracing::debug!(?style, "Presentation style changed");
        }
    }

    fn embed(&self, screen: &Screen) {
        tracing::debug!(?screen, "Embedded root screen");
    }

    fn insert_sticker(
        &self,
        sticker: &Sticker,
        image: Option<&StickerImage>,
    ) -> Result<(), InsertError> {
        let image = image.ok_or(InsertError::NoRenderedImage(sticker.id))?;

        let mut guard = self.clipboard.lock();
        if guard.is_none() {
            let handler =
                ClipboardHandler::new().map_err(|e| InsertError::Clipboard(e.to_string()))?;
            *guard = Some(handler);
        }
        let Some(clipboard) = guard.as_mut() else {
            return Err(InsertError::Clipboard("not initialized".to_string()));
        };
        clipboard.set_image(image).map_err(InsertError::Clipboard)?;
        tracing::info!(sticker_id = %sticker.id, "Sticker copied to clipboard");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_requests_are_granted() {
        let host = DesktopHost::new(PresentationStyle::Compact);
        let mut style = host.presentation_style();
        host.request_presentation_style(PresentationStyle::Expanded);
        assert!(style.has_changed().unwrap());
        assert_eq!(*style.borrow_and_update(), PresentationStyle::Expanded);

        host.request_presentation_style(PresentationStyle::Expanded);
        assert!(!style.has_changed().unwrap());
    }

    #[test]
    fn insert_without_rendered_image_fails_before_clipboard() {
        let host = DesktopHost::new(PresentationStyle::Compact);
        let sticker = Sticker::new();
        assert_eq!(
            host.insert_sticker(&sticker, None),
            Err(InsertError::NoRenderedImage(sticker.id))
        );
    }
}
