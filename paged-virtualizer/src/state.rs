/// A lightweight, serializable snapshot of the scroll geometry fed to a [`crate::RangeStrategy`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    /// Scroll offset of the viewport, in pixels.
    pub offset: f64,
    /// Viewport extent along the scroll axis. `0` means "not laid out yet".
    pub extent: f64,
}
