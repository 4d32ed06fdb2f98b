/// A half-open interval of row indexes into the logical dataset.
///
/// Ranges are recomputed on every scroll tick and never mutated in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub start: usize,
    pub end: usize, // exclusive
}

impl Range {
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Range: start must not exceed end");
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// Total number of rows in the attached dataset.
///
/// `Unknown` means more pages may exist. Once a length becomes `Known` it is final for the
/// lifetime of the attachment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DatasetLength {
    #[default]
    Unknown,
    Known(usize),
}

impl DatasetLength {
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn known(&self) -> Option<usize> {
        match *self {
            Self::Known(n) => Some(n),
            Self::Unknown => None,
        }
    }

    /// Clamps `index` to the length when it is known.
    pub fn clamp(&self, index: usize) -> usize {
        match *self {
            Self::Known(n) => index.min(n),
            Self::Unknown => index,
        }
    }

    /// Returns `true` when the length is known and `index` lies at or beyond it.
    pub fn is_exhausted_at(&self, index: usize) -> bool {
        matches!(*self, Self::Known(n) if index >= n)
    }
}

/// The non-scrolling edge a sticky row is pinned against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StickyBand {
    Header,
    Footer,
}
