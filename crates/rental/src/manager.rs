//! # Rental Manager
//!
//! Owns the catalog, the customer registry, and the waitlist, and is the only
//! way the outside world changes any of them:
//! 1. Catalog intake (single movie or bulk file)
//! 2. Customer registration
//! 3. Rent / return, keeping shelf stock and ledgers in step
//! 4. Ratings, recorded separately from the return itself
//! 5. Queries: search, availability, top rated, recommendations
//! 6. Waitlist and late-return scans
//!
//! Every operation runs to completion under `&mut self`; a rejected
//! operation leaves all state exactly as it was.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use catalog::{Catalog, NewMovie};

use crate::config::RentalPolicy;
use crate::customer::{Customer, CustomerId};
use crate::error::{RentalError, Result};
use crate::waitlist::{Waitlist, WaitlistStatus};

/// Today's date on the local clock
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct RentalManager {
    catalog: Catalog,
    /// Ordered by ID so scans are deterministic
    customers: BTreeMap<CustomerId, Customer>,
    waitlist: Waitlist,
    policy: RentalPolicy,
    rng: StdRng,
}

impl RentalManager {
    /// Create a manager over an existing catalog with an OS-seeded ID generator
    pub fn new(catalog: Catalog, policy: RentalPolicy) -> Self {
        Self::with_rng(catalog, policy, StdRng::from_os_rng())
    }

    /// Create a manager with a caller-supplied ID generator
    pub fn with_rng(catalog: Catalog, policy: RentalPolicy, rng: StdRng) -> Self {
        Self {
            catalog,
            customers: BTreeMap::new(),
            waitlist: Waitlist::new(),
            policy,
            rng,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &RentalPolicy {
        &self.policy
    }

    pub fn get_customer(&self, customer_id: CustomerId) -> Option<&Customer> {
        self.customers.get(&customer_id)
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    // =========================================================================
    // Catalog intake
    // =========================================================================

    /// Add (or replace) one movie in the catalog
    pub fn add_movie(&mut self, new_movie: NewMovie) {
        info!("Adding movie '{}'", new_movie.title);
        self.catalog.add_movie(new_movie);
    }

    /// Bulk-load movies from a CSV file into the catalog.
    ///
    /// The file is fully parsed first; on any error nothing is added.
    /// Returns the number of records loaded.
    pub fn load_catalog(&mut self, path: &Path) -> Result<usize> {
        let count = self
            .catalog
            .load_file(path)
            .inspect_err(|e| warn!("Catalog load from {:?} failed: {}", path, e))?;
        Ok(count)
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Register a customer under a fresh random ID.
    ///
    /// IDs are drawn from `0..=max_customer_id` and redrawn while taken.
    pub fn register_customer(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<CustomerId> {
        let id_space = self.policy.max_customer_id as u64 + 1;
        if self.customers.len() as u64 >= id_space {
            warn!("Cannot register customer: all {} IDs are taken", id_space);
            return Err(RentalError::IdSpaceExhausted(id_space));
        }

        let mut customer_id = self.rng.random_range(0..=self.policy.max_customer_id);
        while self.customers.contains_key(&customer_id) {
            debug!("Customer ID {} taken, drawing again", customer_id);
            customer_id = self.rng.random_range(0..=self.policy.max_customer_id);
        }

        let customer = Customer::new(customer_id, name, email, self.policy.max_rentals);
        info!("Registered customer {} ({})", customer_id, customer.name);
        self.customers.insert(customer_id, customer);
        Ok(customer_id)
    }

    // =========================================================================
    // Rent / return / rate
    // =========================================================================

    /// Rent a movie dated today
    pub fn rent_movie(&mut self, title: &str, customer_id: CustomerId) -> Result<()> {
        self.rent_movie_on(title, customer_id, today())
    }

    /// Rent a movie with an explicit rental date.
    ///
    /// Checks run in this order: customer exists, customer under limit,
    /// title exists, a copy is on the shelf, title not already held.
    pub fn rent_movie_on(
        &mut self,
        title: &str,
        customer_id: CustomerId,
        rented_on: NaiveDate,
    ) -> Result<()> {
        self.try_rent(title, customer_id, rented_on)
            .inspect(|_| info!("Customer {} rented '{}'", customer_id, title))
            .inspect_err(|e| warn!("Rental of '{}' by {} rejected: {}", title, customer_id, e))
    }

    fn try_rent(&mut self, title: &str, customer_id: CustomerId, rented_on: NaiveDate) -> Result<()> {
        let customer = self
            .customers
            .get_mut(&customer_id)
            .ok_or(RentalError::CustomerNotFound(customer_id))?;
        if customer.is_at_limit() {
            return Err(RentalError::LimitExceeded {
                customer_id,
                max_rentals: customer.max_rentals,
            });
        }

        let movie = self
            .catalog
            .get_movie_mut(title)
            .ok_or_else(|| RentalError::MovieNotFound(title.to_string()))?;
        if !movie.is_available() {
            return Err(RentalError::Unavailable(title.to_string()));
        }

        customer.rent(title, rented_on, movie.rental_fee)?;
        movie.check_out();
        Ok(())
    }

    /// Return a rented movie, putting the copy back on the shelf.
    ///
    /// Rating is a separate step, see [`RentalManager::record_rating`].
    /// Returns the date the movie was rented.
    pub fn return_movie(&mut self, title: &str, customer_id: CustomerId) -> Result<NaiveDate> {
        let movie = self
            .catalog
            .get_movie_mut(title)
            .ok_or_else(|| RentalError::MovieNotFound(title.to_string()))?;
        let customer = self
            .customers
            .get_mut(&customer_id)
            .ok_or(RentalError::CustomerNotFound(customer_id))?;

        let rented_on = customer
            .return_title(title)
            .inspect_err(|e| warn!("Return rejected: {}", e))?;
        if !movie.check_in() {
            // Title was re-added with fewer copies while this one was out
            warn!(
                "'{}' shelf already full ({} copies), returned copy not restocked",
                title,
                movie.copies()
            );
        }

        info!("Customer {} returned '{}'", customer_id, title);
        Ok(rented_on)
    }

    /// Record a 1-5 star rating and refresh the movie's average.
    ///
    /// Returns the new average.
    pub fn record_rating(&mut self, title: &str, rating: i64) -> Result<f64> {
        let movie = self
            .catalog
            .get_movie_mut(title)
            .ok_or_else(|| RentalError::MovieNotFound(title.to_string()))?;
        movie.add_rating(rating)?;
        movie.update_average_rating();

        debug!("'{}' rated {}, average now {:.2}", title, rating, movie.average_rating());
        Ok(movie.average_rating())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn search_movie(&self, query: &str) -> Vec<String> {
        self.catalog.search(query)
    }

    pub fn display_available_movies(&self) -> Vec<String> {
        self.catalog.list_available()
    }

    /// Top rated movies, as many as the policy's `top_rated_limit`
    pub fn display_top_rated_movies(&self) -> Vec<String> {
        self.catalog.top_rated(self.policy.top_rated_limit)
    }

    /// A customer's current rentals as (display string, rental date) pairs
    pub fn display_customer_movies(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<(String, NaiveDate)>> {
        let customer = self
            .customers
            .get(&customer_id)
            .ok_or(RentalError::CustomerNotFound(customer_id))?;

        Ok(customer
            .rentals()
            .iter()
            .map(|rental| {
                let label = self
                    .catalog
                    .get_movie(&rental.title)
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| rental.title.clone());
                (label, rental.rented_on)
            })
            .collect())
    }

    /// Movies sharing a genre with anything the customer currently rents.
    ///
    /// Catalog order, capped at the policy's `recommendation_limit`. Titles the
    /// customer already holds are not excluded.
    pub fn recommend_movies(&self, customer_id: CustomerId) -> Result<Vec<String>> {
        let customer = self
            .customers
            .get(&customer_id)
            .ok_or(RentalError::CustomerNotFound(customer_id))?;

        let genres: HashSet<&str> = customer
            .rentals()
            .iter()
            .filter_map(|rental| self.catalog.get_movie(&rental.title))
            .map(|movie| movie.genre.as_str())
            .collect();

        Ok(self
            .catalog
            .movies()
            .iter()
            .filter(|movie| genres.contains(movie.genre.as_str()))
            .take(self.policy.recommendation_limit)
            .map(|movie| movie.to_string())
            .collect())
    }

    // =========================================================================
    // Waitlist
    // =========================================================================

    /// Queue a customer for a title that has no copies on the shelf.
    ///
    /// Never changes the queue while copies are available.
    pub fn add_to_waitlist(&mut self, title: &str, customer_id: CustomerId) -> Result<WaitlistStatus> {
        let movie = self
            .catalog
            .get_movie(title)
            .ok_or_else(|| RentalError::MovieNotFound(title.to_string()))?;
        if !self.customers.contains_key(&customer_id) {
            return Err(RentalError::CustomerNotFound(customer_id));
        }
        if movie.is_available() {
            return Ok(WaitlistStatus::CopiesAvailable);
        }

        let status = self.waitlist.enqueue(title, customer_id);
        info!("Waitlist for '{}': customer {} -> {:?}", title, customer_id, status);
        Ok(status)
    }

    /// Pop the next waiting customer once a copy of the title is back.
    ///
    /// `None` while the shelf is still empty or nobody is waiting.
    pub fn notify_next_available(&mut self, title: &str) -> Result<Option<CustomerId>> {
        let movie = self
            .catalog
            .get_movie(title)
            .ok_or_else(|| RentalError::MovieNotFound(title.to_string()))?;
        if !movie.is_available() {
            return Ok(None);
        }

        let next = self.waitlist.pop_next(title);
        if let Some(customer_id) = next {
            info!("Customer {} is next for '{}'", customer_id, title);
        }
        Ok(next)
    }

    /// Customers waiting for a title, head first
    pub fn waitlist(&self, title: &str) -> Vec<CustomerId> {
        self.waitlist.waiting(title)
    }

    // =========================================================================
    // Late returns
    // =========================================================================

    /// Late rentals as of today
    pub fn check_late_returns(&self, days_threshold: i64) -> Vec<CustomerId> {
        self.check_late_returns_as_of(today(), days_threshold)
    }

    /// One customer ID per rental held for more than `days_threshold` days.
    ///
    /// A customer with several late movies appears once per movie.
    pub fn check_late_returns_as_of(&self, today: NaiveDate, days_threshold: i64) -> Vec<CustomerId> {
        let late: Vec<CustomerId> = self
            .customers
            .values()
            .flat_map(|customer| {
                customer
                    .rentals()
                    .iter()
                    .filter(move |rental| (today - rental.rented_on).num_days() > days_threshold)
                    .map(move |_| customer.id)
            })
            .collect();

        debug!("{} late rentals older than {} days", late.len(), days_threshold);
        late
    }
}
