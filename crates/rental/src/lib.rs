//! Rental crate for the movie rental system.
//!
//! This crate contains the manager that owns the catalog, customers, and
//! waitlist, and enforces the rules that tie them together.

pub mod config;
pub mod customer;
pub mod error;
pub mod manager;
pub mod waitlist;

pub use config::RentalPolicy;
pub use customer::{Customer, CustomerId, Rental};
pub use error::{RentalError, Result};
pub use manager::{RentalManager, today};
pub use waitlist::{Waitlist, WaitlistStatus};
