use tokio::sync::mpsc;

use super::step::Step;

/// Sending half of the coordinator's step channel, handed to screens.
#[derive(Debug, Clone)]
pub struct StepRelay {
    sender: mpsc::UnboundedSender<Step>,
}

impl StepRelay {
    pub fn new(sender: mpsc::UnboundedSender<Step>) -> Self {
        Self { sender }
    }

    pub fn emit(&self, step: Step) {
        tracing::debug!(?step, "Step emitted");
        if self.sender.send(step).is_err() {
            tracing::debug!("Coordinator gone, dropping step");
        }
    }
}

/// A source of steps.
///
/// Screens emit later steps through a [`StepRelay`]; the stepper itself
/// only says which step, if any, the coordinator should take as soon as it
/// starts coordinating it.
pub trait Stepper {
    fn initial_step(&self) -> Option<Step> {
        None
    }
}

/// Stepper that contributes a single fixed step.
#[derive(Debug, Clone)]
pub struct OneStepper {
    step: Step,
}

impl OneStepper {
    pub fn new(step: Step) -> Self {
        Self { step }
    }
}

impl Stepper for OneStepper {
    fn initial_step(&self) -> Option<Step> {
        Some(self.step.clone())
    }
}
