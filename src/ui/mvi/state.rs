//! Base trait for screen state.

/// Marker trait for screen state objects.
///
/// States are cloneable value snapshots with a defined starting point
/// (`Default`) and are compared (`PartialEq`) to detect transitions.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
