//! Backtest Configuration Form
//!
//! Typed model, validation and editing for the form that configures a
//! trading-strategy backtest: general settings, data settings, nested super
//! strategies and execution settings. A validated submission becomes the single
//! stored snapshot, which the viewer renders as formatted JSON.

pub mod config;
pub mod editor;
pub mod error;
pub mod keyed;
pub mod schema;
pub mod store;
pub mod types;
pub mod viewer;

pub use config::Config;
pub use editor::FormEditor;
pub use error::{EditError, FieldError, FieldPath, ValidationErrors};
pub use keyed::{EntryKey, KeyedList};
pub use store::{submit, FormStore};
pub use types::*;
