//! Tunable limits for the rental manager.

use crate::customer::CustomerId;

/// Store-wide rental rules.
///
/// `Default` gives the standard store policy; the CLI overrides individual
/// fields from its flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RentalPolicy {
    /// Simultaneous rentals allowed for newly registered customers
    pub max_rentals: usize,
    /// A rental older than this many days counts as late
    pub late_threshold_days: i64,
    /// Upper bound on recommendations returned per customer
    pub recommendation_limit: usize,
    /// How many movies the top-rated listing shows
    pub top_rated_limit: usize,
    /// Customer IDs are drawn from `0..=max_customer_id`
    pub max_customer_id: CustomerId,
}

impl Default for RentalPolicy {
    fn default() -> Self {
        Self {
            max_rentals: 3,
            late_threshold_days: 14,
            recommendation_limit: 5,
            top_rated_limit: 3,
            max_customer_id: 100_000,
        }
    }
}
