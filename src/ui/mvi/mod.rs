//! Model-View-Intent primitives shared by every screen.
//!
//! ```text
//! UI event ──→ Intent ──→ Reducer ──→ State ──→ outputs
//!                 ↑                                │
//!                 └──── background completions ────┘
//! ```
//!
//! - **State**: value snapshot of everything a screen decides on
//! - **Intent**: user action or completion of background work
//! - **Reducer**: pure `(State, Intent) -> State`
//!
//! View-models wrap a reducer: they bind intent payloads into observable
//! records, run the reducer, then turn the state transition into outputs
//! and side effects.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::{dispatch, Reducer};
pub use state::UiState;
