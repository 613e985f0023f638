/// Display mode of the host container the picker is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationStyle {
    /// Small inline panel.
    #[default]
    Compact,
    /// Full height.
    Expanded,
}

impl PresentationStyle {
    pub fn is_expanded(&self) -> bool {
        matches!(self, Self::Expanded)
    }
}
