//! Error types for rental operations.
//!
//! Each rejected operation maps to exactly one variant so the caller can
//! decide between reporting, re-prompting, or offering the waitlist.

use catalog::CatalogError;
use thiserror::Error;

use crate::customer::CustomerId;

#[derive(Error, Debug)]
pub enum RentalError {
    #[error("Customer ID {0} doesn't exist")]
    CustomerNotFound(CustomerId),

    #[error("Movie '{0}' is not in the catalog")]
    MovieNotFound(String),

    #[error("Customer {customer_id} already has the maximum of {max_rentals} rentals")]
    LimitExceeded {
        customer_id: CustomerId,
        max_rentals: usize,
    },

    #[error("No copies of '{0}' are available")]
    Unavailable(String),

    #[error("Customer {customer_id} already rented '{title}'")]
    AlreadyHeld {
        customer_id: CustomerId,
        title: String,
    },

    #[error("Customer {customer_id} hasn't rented '{title}'")]
    NotHeld {
        customer_id: CustomerId,
        title: String,
    },

    #[error("Invalid rating {0}: enter a number between 1 and 5")]
    InvalidRating(i64),

    /// Non-numeric or otherwise unusable input at the menu boundary
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Catalog source not found or unreadable: {path}")]
    SourceUnavailable { path: String },

    #[error("All {0} customer IDs are taken")]
    IdSpaceExhausted(u64),

    #[error(transparent)]
    Catalog(CatalogError),
}

impl From<CatalogError> for RentalError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidRating(rating) => RentalError::InvalidRating(rating),
            CatalogError::SourceUnavailable { path } => RentalError::SourceUnavailable { path },
            other => RentalError::Catalog(other),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RentalError>;
