use tokio::sync::mpsc;

use crate::config::StickerPickPolicy;

use super::navigation::{resolve, FlowTransition, NavigationStack};
use super::step::Step;
use super::stepper::{StepRelay, Stepper};

/// Turns steps into screen transitions.
///
/// One per session. Keeps only the navigation stack; the host performs the
/// returned transitions.
pub struct FlowCoordinator {
    policy: StickerPickPolicy,
    stack: NavigationStack,
    relay: StepRelay,
    steps: mpsc::UnboundedReceiver<Step>,
}

impl FlowCoordinator {
    pub fn new(policy: StickerPickPolicy) -> Self {
        let (sender, steps) = mpsc::unbounded_channel();
        Self {
            policy,
            stack: NavigationStack::default(),
            relay: StepRelay::new(sender),
            steps,
        }
    }

    /// Relay for screens to emit steps on.
    pub fn relay(&self) -> StepRelay {
        self.relay.clone()
    }

    pub fn stack(&self) -> &NavigationStack {
        &self.stack
    }

    pub fn policy(&self) -> StickerPickPolicy {
        self.policy
    }

    /// Start coordinating `stepper`, navigating its initial step if it has
    /// one.
    pub fn coordinate(&mut self, stepper: &dyn Stepper) -> FlowTransition {
        match stepper.initial_step() {
            Some(step) => self.navigate(step),
            None => FlowTransition::None,
        }
    }

    /// Resolve `step` against the current stack and apply it.
    pub fn navigate(&mut self, step: Step) -> FlowTransition {
        tracing::debug!(?step, depth = self.stack.len(), "Will navigate");
        let transition = resolve(&self.stack, &step, self.policy);
        self.stack = self.stack.apply(&transition);
        tracing::info!(?step, ?transition, depth = self.stack.len(), "Did navigate");
        transition
    }

    /// Close the top screen; the root stays.
    pub fn dismiss_top(&mut self) -> FlowTransition {
        let transition = self.stack.pop_transition();
        self.stack = self.stack.apply(&transition);
        tracing::debug!(?transition, depth = self.stack.len(), "Dismissed top screen");
        transition
    }

    /// Wait for the next step a screen emitted.
    pub async fn next_step(&mut self) -> Option<Step> {
        self.steps.recv().await
    }

    /// Next step already emitted, if any.
    pub fn try_next_step(&mut self) -> Option<Step> {
        self.steps.try_recv().ok()
    }
}
