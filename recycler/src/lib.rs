//! A headless engine for heterogeneous recycling lists.
//!
//! For the host-facing adapter (lifecycle forwarding, delayed refresh, sticky footers), see the
//! `recycler-adapter` crate.
//!
//! A list is an ordered sequence of [`Item`]s. Each item wraps a value implementing
//! [`ItemKind`], which knows how to produce and populate a visual of host type `V`. This crate
//! provides the pieces a UI layer needs around that sequence:
//! - stable numeric kind identities so visuals can be pooled per kind ([`TypeRegistry`])
//! - the mutable sequence itself ([`ItemStore`])
//! - a reconciler turning a sequence replacement into range operations ([`diff`], [`replay`])
//! - bind-time attribute resolution with one-shot entry animations ([`Presenter`])
//! - a pinned group-header overlay ([`StickyOverlay`])
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the visual type `V` and a way to measure it
//! - the rows currently on screen, top to bottom
//! - a [`ChangeSink`] receiving structural notifications
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod batcher;
mod error;
mod item;
mod key;
mod measure;
mod options;
mod presenter;
mod reconcile;
mod registry;
mod sticky;
mod store;
mod tag;
mod types;


pub use batcher::OpBatcher;
pub use error::{MeasureError, ReplayError, StoreError};
pub use item::{ClickHandler, ContentEq, Item, ItemKind};
pub use measure::{MeasureSpec, Size, Viewport, child_measure_spec};
pub use options::AdapterOptions;
pub use presenter::{PresentationDefaults, Presenter, Resolved};
pub use reconcile::{ChangeSink, DiffOptions, ReplayFailure, diff, refresh_all, replay};
pub use registry::{TypeRegistry, kind_hash};
pub use sticky::{OverlayFrame, OverlayHost, OverlayState, StickyOverlay};
pub use store::ItemStore;
pub use tag::Tag;
pub use types::{
    AnimationId, Dimension, KindId, LayoutSize, Margins, Orientation, StructuralOp, VisibleRow,
    VisualKey,
};
