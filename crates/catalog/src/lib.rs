//! # Catalog Crate
//!
//! In-memory movie catalog for the rental system.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, ProductionCompany, Catalog)
//! - **index**: Catalog insertion, lookup, and ranking
//! - **parser**: Parse CSV records into `NewMovie` values
//! - **error**: Error types for catalog operations
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::Catalog;
//! use std::path::Path;
//!
//! let mut catalog = Catalog::new();
//! catalog.load_file(Path::new("data/catalog.csv"))?;
//!
//! for line in catalog.search("Sci-Fi") {
//!     println!("{}", line);
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{Catalog, Movie, NewMovie, ProductionCompany, MAX_RATING, MIN_RATING};
