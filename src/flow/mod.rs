//! Step-driven navigation.
//!
//! Screens emit [`Step`]s instead of navigating themselves. The
//! [`FlowCoordinator`] resolves each step against a [`NavigationStack`]
//! with the pure [`resolve`] function and hands the resulting
//! [`FlowTransition`] to the host.

mod coordinator;
mod navigation;
mod step;
mod stepper;

pub use coordinator::FlowCoordinator;
pub use navigation::{resolve, FlowTransition, NavigationStack, Screen};
pub use step::Step;
pub use stepper::{OneStepper, StepRelay, Stepper};
