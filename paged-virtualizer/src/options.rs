use alloc::string::String;

pub const DEFAULT_ROW_HEIGHT: f64 = 52.0;
pub const DEFAULT_HEADER_HEIGHT: f64 = 56.0;
pub const DEFAULT_HEADER_ENABLED: bool = true;
pub const DEFAULT_FOOTER_HEIGHT: f64 = 48.0;
pub const DEFAULT_FOOTER_ENABLED: bool = false;
pub const DEFAULT_BUFFER_MULTIPLIER: f64 = 0.7;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration for [`crate::RangeStrategy`] and [`crate::PaginationCoordinator`].
///
/// Values are process-wide defaults that can be overridden per attachment. Changes take effect
/// on the next range computation, never retroactively.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrollConfig {
    /// Fixed height of every body row.
    pub row_height: f64,
    /// Height of the non-scrolling header band.
    pub header_height: f64,
    pub header_enabled: bool,
    /// Height of the non-scrolling footer band.
    pub footer_height: f64,
    pub footer_enabled: bool,
    /// Fraction of the viewport extent rendered as slack on each side of the visible rows.
    pub buffer_multiplier: f64,
    /// Number of rows requested per page.
    pub page_size: usize,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            header_height: DEFAULT_HEADER_HEIGHT,
            header_enabled: DEFAULT_HEADER_ENABLED,
            footer_height: DEFAULT_FOOTER_HEIGHT,
            footer_enabled: DEFAULT_FOOTER_ENABLED,
            buffer_multiplier: DEFAULT_BUFFER_MULTIPLIER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ScrollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_header(mut self, enabled: bool, height: f64) -> Self {
        self.header_enabled = enabled;
        self.header_height = height;
        self
    }

    pub fn with_header_enabled(mut self, enabled: bool) -> Self {
        self.header_enabled = enabled;
        self
    }

    pub fn with_footer(mut self, enabled: bool, height: f64) -> Self {
        self.footer_enabled = enabled;
        self.footer_height = height;
        self
    }

    pub fn with_footer_enabled(mut self, enabled: bool) -> Self {
        self.footer_enabled = enabled;
        self
    }

    pub fn with_buffer_multiplier(mut self, buffer_multiplier: f64) -> Self {
        self.buffer_multiplier = buffer_multiplier;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Replaces every out-of-domain field with its default.
    ///
    /// Malformed configuration is never an error: each field falls back independently.
    pub fn sanitized(self) -> Self {
        Self {
            row_height: positive_or(self.row_height, DEFAULT_ROW_HEIGHT, "row_height"),
            header_height: positive_or(self.header_height, DEFAULT_HEADER_HEIGHT, "header_height"),
            header_enabled: self.header_enabled,
            footer_height: positive_or(self.footer_height, DEFAULT_FOOTER_HEIGHT, "footer_height"),
            footer_enabled: self.footer_enabled,
            buffer_multiplier: if self.buffer_multiplier.is_finite() && self.buffer_multiplier >= 0.0
            {
                self.buffer_multiplier
            } else {
                vdebug!(
                    value = self.buffer_multiplier,
                    "ScrollConfig: invalid buffer_multiplier, using default"
                );
                DEFAULT_BUFFER_MULTIPLIER
            },
            page_size: if self.page_size > 0 {
                self.page_size
            } else {
                vdebug!("ScrollConfig: page_size must be positive, using default");
                DEFAULT_PAGE_SIZE
            },
        }
    }

    /// Header band height, or `0` when the header is disabled.
    pub fn effective_header_height(&self) -> f64 {
        if self.header_enabled {
            self.header_height
        } else {
            0.0
        }
    }

    /// Footer band height, or `0` when the footer is disabled.
    pub fn effective_footer_height(&self) -> f64 {
        if self.footer_enabled {
            self.footer_height
        } else {
            0.0
        }
    }

    /// Maps a row index to the 1-based page that should be loaded for it.
    ///
    /// `max(1, floor(index / page_size))`.
    pub fn page_for_index(&self, index: usize) -> usize {
        page_for_index(index, self.page_size)
    }

    /// Index of the first row of `page` (1-based).
    pub fn page_start(&self, page: usize) -> usize {
        page_start(page, self.page_size)
    }
}

pub(crate) fn page_for_index(index: usize, page_size: usize) -> usize {
    (index / page_size.max(1)).max(1)
}

pub(crate) fn page_start(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1).saturating_mul(page_size)
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn positive_or(value: f64, default: f64, field: &'static str) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        vdebug!(field, value, "ScrollConfig: invalid value, using default");
        default
    }
}

/// A loosely typed configuration value, as handed over by hosts that store attributes as
/// either numbers or strings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ConfigValue {
    Number(f64),
    Text(String),
}

impl ConfigValue {
    /// Numeric interpretation of the value. Text is trimmed and parsed; anything that is not a
    /// number yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<usize> for ConfigValue {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(String::from(value))
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Unvalidated configuration input. Every field is optional; missing and malformed values
/// resolve to the documented defaults.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawScrollConfig {
    pub page_size: Option<ConfigValue>,
    pub row_height: Option<ConfigValue>,
    pub header_enabled: Option<bool>,
    pub header_height: Option<ConfigValue>,
    pub footer_enabled: Option<bool>,
    pub footer_height: Option<ConfigValue>,
    pub buffer_multiplier: Option<ConfigValue>,
}

impl RawScrollConfig {
    /// Resolves the raw input into a valid [`ScrollConfig`]. Never fails.
    pub fn resolve(&self) -> ScrollConfig {
        let number = |v: &Option<ConfigValue>| v.as_ref().and_then(ConfigValue::as_number);

        let page_size = match number(&self.page_size) {
            Some(n) if n.is_finite() && n >= 1.0 && (n as usize) as f64 == n => n as usize,
            Some(_) => {
                vdebug!("RawScrollConfig: page_size is not a positive integer, using default");
                DEFAULT_PAGE_SIZE
            }
            None => DEFAULT_PAGE_SIZE,
        };

        ScrollConfig {
            row_height: number(&self.row_height).unwrap_or(DEFAULT_ROW_HEIGHT),
            header_height: number(&self.header_height).unwrap_or(DEFAULT_HEADER_HEIGHT),
            header_enabled: self.header_enabled.unwrap_or(DEFAULT_HEADER_ENABLED),
            footer_height: number(&self.footer_height).unwrap_or(DEFAULT_FOOTER_HEIGHT),
            footer_enabled: self.footer_enabled.unwrap_or(DEFAULT_FOOTER_ENABLED),
            buffer_multiplier: number(&self.buffer_multiplier)
                .unwrap_or(DEFAULT_BUFFER_MULTIPLIER),
            page_size,
        }
        .sanitized()
    }
}

impl From<RawScrollConfig> for ScrollConfig {
    fn from(raw: RawScrollConfig) -> Self {
        raw.resolve()
    }
}

impl From<&RawScrollConfig> for ScrollConfig {
    fn from(raw: &RawScrollConfig) -> Self {
        raw.resolve()
    }
}
