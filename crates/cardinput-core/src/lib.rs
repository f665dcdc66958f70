//! # Fields, snapshots and views
//!
//! Cardinput splits a card-entry form into two halves. A *State Provider*
//! owns every field value and validity status; the form only reads them and
//! reports user intent back. This crate holds the vocabulary both halves
//! share:
//!
//! - `FieldId` / `FieldStatus` / `FieldMap<T>` — the fixed set of card fields
//!   and per-field lookups.
//! - `FormSnapshot` + `FormCallbacks` — what a provider hands to the form
//!   on every render, and the four events the form sends back.
//! - `View` / `Modifier` / `TextStyle` — a declarative tree the UI crate
//!   builds and lays out.
//! - `Tween` / `Clock` — the animation clock used by programmatic scrolling.
//!
//! ```rust
//! use cardinput_core::*;
//!
//! let mut snapshot = FormSnapshot::default();
//! snapshot.values.insert(FieldId::Number, "4242".into());
//! snapshot.status.insert(FieldId::Number, FieldStatus::Incomplete);
//! snapshot.focused = Some(FieldId::Number);
//!
//! assert_eq!(snapshot.value(FieldId::Number), "4242");
//! assert_eq!(snapshot.value(FieldId::Cvc), "");
//! ```
//!
//! Providers usually keep their own state and produce a fresh snapshot after
//! each event; see the `card_form` demo for a queue-driven one.

pub mod animation;
pub mod color;
pub mod error;
pub mod field;
pub mod geometry;
pub mod modifier;
pub mod provider;
pub mod view;

pub use animation::*;
pub use color::*;
pub use error::*;
pub use field::*;
pub use geometry::*;
pub use modifier::*;
pub use provider::*;
pub use view::*;
