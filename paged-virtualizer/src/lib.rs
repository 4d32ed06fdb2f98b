//! A headless virtualization and pagination engine for tall, fixed-row-height tables.
//!
//! For host-facing wiring (listeners, teardown, the full event flow), see the
//! `paged-virtualizer-adapter` crate.
//!
//! Only the rows inside the viewport (plus a buffer) are materialized, and the dataset is
//! fetched page by page as the user scrolls. The crate provides three cooperating engines:
//! - [`RangeStrategy`]: scroll offset → window of row indexes, clamped to the known length
//! - [`PaginationCoordinator`]: range changes → deduplicated, latest-wins page fetches
//! - [`StickyOffsetEngine`]: keeps header/footer rows pinned over virtualized content
//!
//! It is UI-agnostic. The host is expected to provide:
//! - viewport extent and scroll offset
//! - a [`DataSource`] whose [`PageSource`] starts page loads, and the results of those loads
//! - a [`StickyHost`] view of its rendered sticky rows
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod buffer;
mod error;
mod key;
mod length;
mod options;
mod pagination;
mod range;
mod source;
mod state;
mod sticky;
mod types;


pub use buffer::DataBuffer;
pub use error::{AttachError, BoxError, FetchError};
pub use key::RowKey;
pub use length::{DatasetLengthTracker, LengthUpdate};
pub use options::{
    ConfigValue, DEFAULT_BUFFER_MULTIPLIER, DEFAULT_FOOTER_ENABLED, DEFAULT_FOOTER_HEIGHT,
    DEFAULT_HEADER_ENABLED, DEFAULT_HEADER_HEIGHT, DEFAULT_PAGE_SIZE, DEFAULT_ROW_HEIGHT,
    RawScrollConfig, ScrollConfig,
};
pub use pagination::{
    FetchTicket, PageApplied, PageRequest, PageResult, PaginationCoordinator, SettleOutcome,
};
pub use range::{RangeStrategy, compute_range};
pub use source::{DataSource, PageSource};
pub use state::ScrollState;
pub use sticky::{PinnedBands, StickyHost, StickyOffsetEngine, StickyState};
pub use types::{DatasetLength, Range, StickyBand};
