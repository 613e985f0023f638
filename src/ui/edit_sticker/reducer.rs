//! Reducer for the edit-sticker screen.

use crate::ui::mvi::Reducer;

use super::intent::EditStickerIntent;
use super::state::{Activity, DismissReason, EditStickerState};

/// Edit screen state transitions.
///
/// Pure: rendering, persisting and output emission are done by the view
/// model from the before/after states.
pub struct EditStickerReducer;

impl Reducer for EditStickerReducer {
    type State = EditStickerState;
    type Intent = EditStickerIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        if state.activity.is_finished() {
            return state;
        }

        let mut next = match intent {
            EditStickerIntent::SessionStarted {
                has_image,
                crop_is_empty,
                is_persisted,
            } => {
                let mut next = EditStickerState {
                    has_image,
                    crop_is_empty,
                    is_persisted,
                    ..state
                };
                if !next.picker_prompted {
                    next.picker_prompted = true;
                    if !has_image {
                        next.picker_requests += 1;
                    }
                }
                next
            }

            // The render in flight was taken from the current image and
            // crop, so they stay put until the chain ends.
            EditStickerIntent::PhotosTapped
            | EditStickerIntent::ImagePicked(_)
            | EditStickerIntent::CropChanged(_)
                if state.activity.is_busy() =>
            {
                state
            }

            EditStickerIntent::PhotosTapped => EditStickerState {
                picker_requests: state.picker_requests + 1,
                ..state
            },

            EditStickerIntent::ImagePicked(Some(_)) => EditStickerState {
                has_image: true,
                ..state
            },
            EditStickerIntent::ImagePicked(None) => state,

            EditStickerIntent::CropChanged(bounds) => EditStickerState {
                crop_is_empty: bounds.is_empty(),
                ..state
            },

            // Gate on the value at tap time; taps during a running chain
            // are dropped.
            EditStickerIntent::SaveTapped if state.can_save() => EditStickerState {
                activity: Activity::Rendering,
                ..state
            },
            EditStickerIntent::SaveTapped => state,

            EditStickerIntent::RenderFinished(result) => match state.activity {
                Activity::Rendering => EditStickerState {
                    activity: if result.is_some() {
                        Activity::Persisting
                    } else {
                        Activity::Idle
                    },
                    ..state
                },
                _ => state,
            },

            EditStickerIntent::Persisted(result) => match state.activity {
                Activity::Persisting => match result {
                    Ok(_) => EditStickerState {
                        is_persisted: true,
                        activity: Activity::Finished(DismissReason::Saved),
                        ..state
                    },
                    Err(_) => EditStickerState {
                        activity: Activity::Idle,
                        ..state
                    },
                },
                _ => state,
            },

            EditStickerIntent::DeleteTapped => match state.activity {
                Activity::Idle if state.is_persisted => EditStickerState {
                    activity: Activity::Deleting,
                    ..state
                },
                // Nothing stored yet: deleting is discarding.
                Activity::Idle => EditStickerState {
                    activity: Activity::Finished(DismissReason::Deleted),
                    ..state
                },
                _ => state,
            },

            EditStickerIntent::Deleted(result) => match state.activity {
                Activity::Deleting => match result {
                    Ok(()) => EditStickerState {
                        is_persisted: false,
                        activity: Activity::Finished(DismissReason::Deleted),
                        ..state
                    },
                    Err(_) => EditStickerState {
                        activity: Activity::Idle,
                        ..state
                    },
                },
                _ => state,
            },

            EditStickerIntent::CancelTapped => match state.activity {
                // The store already has the write; its completion dismisses.
                Activity::Persisting | Activity::Deleting => state,
                _ => EditStickerState {
                    activity: Activity::Finished(DismissReason::Cancelled),
                    ..state
                },
            },
        };

        next.save_enabled = next.has_image && !next.crop_is_empty;
        next
    }
}
