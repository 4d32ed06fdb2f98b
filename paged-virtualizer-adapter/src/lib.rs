//! Host-facing wiring for the `paged-virtualizer` crate.
//!
//! The `paged-virtualizer` crate provides the range, pagination and sticky-row engines as
//! independent pieces. This crate connects them into the event flow a table host needs:
//!
//! - scroll / resize notifications recompute the range and fetch the frontier page
//! - settled pages re-clamp the range and may trigger the next fetch
//! - structural-change and quiescence notifications drive sticky-row rebuilds
//! - listeners for range changes and fetch failures
//!
//! This crate is intentionally framework-agnostic (no DOM or widget bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod state;

#[cfg(test)]
mod tests;

pub use controller::{OnFetchError, OnRangeChange, TableController};
pub use state::ControllerState;
