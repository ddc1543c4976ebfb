//! Slice color palette

use crate::error::ChartError;
use serde::{Deserialize, Serialize};

/// Default slice colors, cycled by segment position
pub const DEFAULT_COLORS: [&str; 7] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#D3D3D3",
];

/// Non-empty ordered list of slice colors
///
/// Segments store a `color_index` (`position mod len`); the palette resolves
/// it to a color. Emptiness is rejected at construction and deserialization,
/// so the modulus is always defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Create a palette from colors
    ///
    /// # Errors
    /// Returns `ChartError::EmptyPalette` when `colors` is empty.
    pub fn new<I, S>(colors: I) -> Result<Self, ChartError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return Err(ChartError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Number of colors; never zero
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; present for API symmetry with collections
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color index for a segment at `position`
    #[inline]
    #[must_use]
    pub fn index_for(&self, position: usize) -> usize {
        position % self.colors.len()
    }

    /// Resolve a color index, wrapping out-of-range indices
    #[inline]
    #[must_use]
    pub fn color(&self, color_index: usize) -> &str {
        &self.colors[self.index_for(color_index)]
    }

    /// All colors in order
    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = ChartError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Palette> for Vec<String> {
    fn from(value: Palette) -> Self {
        value.colors
    }
}
