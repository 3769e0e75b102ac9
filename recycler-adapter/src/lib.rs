//! Host-facing workflows for the `recycler` crate.
//!
//! The `recycler` crate is UI-agnostic and holds the core algorithms. This crate composes them
//! into what a list widget binding actually calls:
//!
//! - [`ListAdapter`]: mutations with selectable notification, queries, binding and lifecycle
//!   forwarding
//! - [`Controller`]: provider-driven refreshes (immediate, delayed, after layout) and the
//!   sticky header overlay
//! - [`footer_top_offset`]: keeping the last row pinned to the bottom of short lists
//!
//! This crate is framework-agnostic (no toolkit bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod adapter;
mod controller;
mod footer;
mod key;

#[cfg(test)]
mod tests;

pub use adapter::{ListAdapter, Notify};
pub use controller::{Controller, DataProvider, DispatchMethod};
pub use footer::footer_top_offset;
