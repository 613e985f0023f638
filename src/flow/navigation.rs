//! Navigation stack and the pure step resolver.

use crate::config::StickerPickPolicy;
use crate::model::Sticker;

use super::step::Step;

/// A screen on the navigation stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    StickerBrowser,
    EditSticker { sticker: Sticker },
}

/// What the host has to do for a resolved step.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowTransition {
    /// Replace the whole stack with this screen.
    SetRoot(Screen),
    /// Show this screen above the current one.
    Push(Screen),
    /// Close the top screen.
    Pop,
    /// Hand the sticker to the host conversation; the stack is unchanged.
    InsertSticker(Sticker),
    /// Nothing to do.
    None,
}

/// Screens from root to top.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationStack {
    screens: Vec<Screen>,
}

impl NavigationStack {
    pub fn top(&self) -> Option<&Screen> {
        self.screens.last()
    }

    pub fn root(&self) -> Option<&Screen> {
        self.screens.first()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    /// The stack after `transition`.
    pub fn apply(&self, transition: &FlowTransition) -> NavigationStack {
        let mut screens = self.screens.clone();
        match transition {
            FlowTransition::SetRoot(screen) => screens = vec![screen.clone()],
            FlowTransition::Push(screen) => screens.push(screen.clone()),
            FlowTransition::Pop => {
                screens.pop();
            }
            FlowTransition::InsertSticker(_) | FlowTransition::None => {}
        }
        NavigationStack { screens }
    }

    /// Pop that never removes the root screen.
    pub fn pop_transition(&self) -> FlowTransition {
        if self.screens.len() > 1 {
            FlowTransition::Pop
        } else {
            FlowTransition::None
        }
    }
}

/// Decide what `step` does given the current stack.
///
/// Pick steps only act while the browser is on top, so a stray step from a
/// covered screen cannot stack editors.
pub fn resolve(stack: &NavigationStack, step: &Step, policy: StickerPickPolicy) -> FlowTransition {
    let browser_on_top = matches!(stack.top(), Some(Screen::StickerBrowser));
    match step {
        Step::StickerBrowserIsRequired => {
            if stack.screens() == [Screen::StickerBrowser] {
                FlowTransition::None
            } else {
                FlowTransition::SetRoot(Screen::StickerBrowser)
            }
        }
        Step::AddStickerIsPicked if browser_on_top => FlowTransition::Push(Screen::EditSticker {
            sticker: Sticker::new(),
        }),
        Step::StickerIsPicked(sticker) if browser_on_top => match policy {
            StickerPickPolicy::Edit => FlowTransition::Push(Screen::EditSticker {
                sticker: sticker.clone(),
            }),
            StickerPickPolicy::Insert => FlowTransition::InsertSticker(sticker.clone()),
        },
        Step::AddStickerIsPicked | Step::StickerIsPicked(_) => FlowTransition::None,
    }
}
