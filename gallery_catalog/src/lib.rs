//! Painting catalog for the gallery: ordered records with stable indices,
//! parsed from a pipe-delimited file with a deterministic built-in fallback.

pub mod assets;
pub mod catalog;
pub mod record;

pub use assets::{ImageResolution, resolve_images};
pub use catalog::Catalog;
pub use record::{PaintingRecord, SaleListing};
