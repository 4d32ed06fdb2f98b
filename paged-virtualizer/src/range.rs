use crate::{DatasetLength, Range, ScrollConfig, ScrollState};

/// Maps a scroll offset to the window of row indexes that should be rendered.
///
/// The header band does not scroll, so its height is subtracted from the offset before rows are
/// counted. `buffer_multiplier × viewport_extent` pixels of slack are rendered on each side.
/// While `length` is unknown only the lower bound is clamped; hosts render placeholders for rows
/// that have not been fetched yet.
///
/// A viewport that has not been laid out (`viewport_extent <= 0`) yields an empty range.
pub fn compute_range(
    config: &ScrollConfig,
    length: DatasetLength,
    scroll_offset: f64,
    viewport_extent: f64,
) -> Range {
    if !(viewport_extent.is_finite() && viewport_extent > 0.0) {
        return Range::EMPTY;
    }
    let scroll_offset = if scroll_offset.is_finite() {
        scroll_offset
    } else {
        0.0
    };

    let row_height = config.row_height;
    let content_offset = scroll_offset - config.effective_header_height();
    let buffer = config.buffer_multiplier * viewport_extent;

    let start = floor_index((content_offset - buffer) / row_height);
    let end = ceil_index((content_offset + viewport_extent + buffer) / row_height);

    let start = length.clamp(start);
    let end = length.clamp(end.max(start));
    Range::new(start, end)
}

// Negative values clamp to 0, so truncation is enough for the floor.
fn floor_index(value: f64) -> usize {
    if value > 0.0 { value as usize } else { 0 }
}

fn ceil_index(value: f64) -> usize {
    if value <= 0.0 || value.is_nan() {
        return 0;
    }
    let truncated = value as usize;
    if (truncated as f64) < value {
        truncated.saturating_add(1)
    } else {
        truncated
    }
}

/// Stateful wrapper around [`compute_range`] driven by host notifications.
///
/// Every setter recomputes and returns the range. Each returned value is authoritative: a length
/// update may shrink a previously emitted `end`.
#[derive(Clone, Debug)]
pub struct RangeStrategy {
    config: ScrollConfig,
    length: DatasetLength,
    scroll: ScrollState,
    range: Range,
}

impl Default for RangeStrategy {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl RangeStrategy {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config: config.sanitized(),
            length: DatasetLength::Unknown,
            scroll: ScrollState::default(),
            range: Range::EMPTY,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ScrollConfig) -> Range {
        self.config = config.sanitized();
        vtrace!(
            row_height = self.config.row_height,
            page_size = self.config.page_size,
            "RangeStrategy::set_config"
        );
        self.recompute()
    }

    pub fn dataset_length(&self) -> DatasetLength {
        self.length
    }

    pub fn set_dataset_length(&mut self, length: DatasetLength) -> Range {
        self.length = length;
        self.recompute()
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll.offset
    }

    pub fn viewport_extent(&self) -> f64 {
        self.scroll.extent
    }

    pub fn is_laid_out(&self) -> bool {
        self.scroll.extent > 0.0
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    /// Restores scroll geometry from a previously captured snapshot.
    pub fn restore_scroll_state(&mut self, state: ScrollState) -> Range {
        self.scroll = state;
        self.recompute()
    }

    pub fn on_scroll(&mut self, offset: f64) -> Range {
        self.scroll.offset = offset;
        self.recompute()
    }

    pub fn on_viewport_resized(&mut self, extent: f64) -> Range {
        self.scroll.extent = extent;
        self.recompute()
    }

    /// Offset of the first rendered row, measured from the first body row.
    pub fn rendered_offset(&self) -> f64 {
        self.range.start as f64 * self.config.row_height
    }

    /// Full content extent (header, rows, footer) once the length is known.
    pub fn total_extent(&self) -> Option<f64> {
        let rows = self.length.known()?;
        Some(
            self.config.effective_header_height()
                + rows as f64 * self.config.row_height
                + self.config.effective_footer_height(),
        )
    }

    fn recompute(&mut self) -> Range {
        self.range = compute_range(
            &self.config,
            self.length,
            self.scroll.offset,
            self.scroll.extent,
        );
        vtrace!(
            offset = self.scroll.offset,
            extent = self.scroll.extent,
            start = self.range.start,
            end = self.range.end,
            "RangeStrategy::recompute"
        );
        self.range
    }
}
