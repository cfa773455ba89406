//! Customers and their rental ledgers.
//!
//! A ledger entry is keyed by movie title, the catalog's identity for a
//! movie, so holding two copies of the same title is impossible by
//! construction.

use chrono::NaiveDate;

use crate::error::{RentalError, Result};

/// Unique identifier for a registered customer
pub type CustomerId = u32;

/// One currently rented movie
#[derive(Debug, Clone, PartialEq)]
pub struct Rental {
    pub title: String,
    pub rented_on: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub max_rentals: usize,
    /// Current rentals in the order they were made
    rentals: Vec<Rental>,
    total_rental_fees: f64,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        email: impl Into<String>,
        max_rentals: usize,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            max_rentals,
            rentals: Vec::new(),
            total_rental_fees: 0.0,
        }
    }

    pub fn rentals(&self) -> &[Rental] {
        &self.rentals
    }

    pub fn rental_count(&self) -> usize {
        self.rentals.len()
    }

    pub fn holds(&self, title: &str) -> bool {
        self.rentals.iter().any(|r| r.title == title)
    }

    pub fn is_at_limit(&self) -> bool {
        self.rentals.len() >= self.max_rentals
    }

    /// Fees accrued over every rental this customer has made
    pub fn total_rental_fees(&self) -> f64 {
        self.total_rental_fees
    }

    /// Add a title to the ledger and charge its fee.
    pub fn rent(&mut self, title: &str, rented_on: NaiveDate, fee: f64) -> Result<()> {
        if self.is_at_limit() {
            return Err(RentalError::LimitExceeded {
                customer_id: self.id,
                max_rentals: self.max_rentals,
            });
        }
        if self.holds(title) {
            return Err(RentalError::AlreadyHeld {
                customer_id: self.id,
                title: title.to_string(),
            });
        }
        self.rentals.push(Rental {
            title: title.to_string(),
            rented_on,
        });
        self.total_rental_fees += fee;
        Ok(())
    }

    /// Remove a title from the ledger, returning the date it was rented
    pub fn return_title(&mut self, title: &str) -> Result<NaiveDate> {
        let position = self
            .rentals
            .iter()
            .position(|r| r.title == title)
            .ok_or_else(|| RentalError::NotHeld {
                customer_id: self.id,
                title: title.to_string(),
            })?;
        Ok(self.rentals.remove(position).rented_on)
    }
}
