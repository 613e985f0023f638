//! Photo sticker picker.
//!
//! Import a photo, crop it, render it into a transparent sticker and browse
//! the saved stickers to insert one into a conversation.
//!
//! Screens are view-models in [`ui`] that turn intents into outputs, with
//! pure reducers deciding every state change. [`flow`] maps the steps they
//! emit to screen transitions, and [`app`] wires the [`services`] into a
//! [`app::Session`].

pub mod app;
mod clipboard;
pub mod config;
pub mod error;
pub mod flow;
pub mod geometry;
pub mod logging;
pub mod media;
pub mod model;
pub mod reactive;
pub mod services;
pub mod ui;
