//! Product catalog for Mobile DVR base systems and their accessories.
//!
//! The catalog is static reference data: it is loaded once (from the embedded
//! `config/catalog.toml`, or an override file) and never mutated afterwards.
//!
//! # Architecture
//!
//! - **Products**: base systems carry a `compatible_with` list and an
//!   installation tier; accessories carry neither
//! - **Validation**: ids are unique and every compatibility entry resolves to
//!   an accessory, checked once at load time
//! - **Queries**: category filtering and compatible-accessory lookup in
//!   catalog order, for the product listing and the configurator
//!
//! # Example
//!
//! ```ignore
//! use dvr_configurator::catalog::default_catalog;
//!
//! let catalog = default_catalog();
//! for accessory in catalog.compatible_accessories("x3n-ai-premium") {
//!     println!("{} ({})", accessory.name, accessory.price);
//! }
//! ```

mod data;
mod index;
mod types;

pub use data::{default_catalog, load_catalog, parse_catalog};
pub use index::{Catalog, ALL_CATEGORIES};
pub use types::*;
