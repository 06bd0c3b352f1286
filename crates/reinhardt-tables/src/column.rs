//! Column declarations
//!
//! - [`Column`]: per-column metadata and hooks
//! - [`FieldPath`]: validated, possibly nested field reference
//! - [`ChoiceFilter`]: descriptive choice list shown above a column
//! - [`ColumnRegistry`]: ordered, duplicate-free column set of a table

pub mod base;
pub mod filter;
pub mod path;
pub mod registry;

pub use base::{Align, Column, FilterHook, RenderHook, humanize_field_name};
pub use filter::{ChoiceFilter, FilterChoice};
pub use path::{FieldPath, PATH_SEPARATOR};
pub use registry::ColumnRegistry;
