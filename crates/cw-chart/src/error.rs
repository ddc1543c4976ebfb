//! Error types for chart layout

/// Chart configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    /// A palette needs at least one color
    #[error("palette must contain at least one color")]
    EmptyPalette,
}
