//! Shared types for the ATLHub packaging pipeline.
//!
//! Everything here is plain data: the catalog records read at startup, the
//! identifiers derived from them, and the Flatpak manifest model that the
//! core crate serializes to YAML.

pub mod catalog;
pub mod identity;
pub mod manifest;

// Re-exports
pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use identity::AppIdentity;
pub use manifest::FlatpakManifest;

/// Edge lengths, in pixels, of every icon variant rendered per app.
pub const ICON_SIZES: [u32; 9] = [16, 24, 32, 48, 64, 128, 192, 256, 512];
