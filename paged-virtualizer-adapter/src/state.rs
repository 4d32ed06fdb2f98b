use paged_virtualizer::{DatasetLength, Range, ScrollState};

/// A lightweight, serializable snapshot of a [`crate::TableController`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerState {
    pub scroll: ScrollState,
    pub range: Range,
    pub dataset_length: DatasetLength,
    /// Number of rows currently held in the buffer.
    pub loaded_rows: usize,
}
