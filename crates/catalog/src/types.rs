//! Core domain types for the rental catalog.
//!
//! Movies are owned by the [`Catalog`]; production companies and genre
//! buckets only hold titles, so there is never more than one owner of a
//! `Movie` and no reference cycles between entities.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::{CatalogError, Result};

// =============================================================================
// Constants
// =============================================================================

/// Lowest star rating a movie can receive
pub const MIN_RATING: i64 = 1;

/// Highest star rating a movie can receive
pub const MAX_RATING: i64 = 5;

// =============================================================================
// Movie
// =============================================================================

/// Field set needed to put a movie into the catalog.
///
/// This is what the CSV loader produces per record and what the interactive
/// "add movie" flow collects from the user. The founding year only matters
/// the first time a production company is seen.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub director: String,
    pub year: i32,
    pub copies: u32,
    pub genre: String,
    pub production_company: String,
    pub rental_fee: f64,
    pub founded_year: i32,
}

/// A rentable title with its stock counters and rating history.
///
/// Stock and ratings are private so the `0 <= available <= copies` and
/// `1 <= rating <= 5` invariants can only be changed through the methods below.
#[derive(Debug, Clone)]
pub struct Movie {
    pub title: String,
    pub director: String,
    pub year: i32,
    pub genre: String,
    /// Name of the production company, the key into the company index
    pub production_company: String,
    pub rental_fee: f64,
    copies: u32,
    available_copies: u32,
    ratings: Vec<u8>,
    average_rating: f64,
}

impl Movie {
    /// Build a movie with every copy on the shelf and no ratings yet
    pub fn new(new_movie: NewMovie) -> Self {
        Self {
            title: new_movie.title,
            director: new_movie.director,
            year: new_movie.year,
            genre: new_movie.genre,
            production_company: new_movie.production_company,
            rental_fee: new_movie.rental_fee,
            copies: new_movie.copies,
            available_copies: new_movie.copies,
            ratings: Vec::new(),
            average_rating: 0.0,
        }
    }

    pub fn copies(&self) -> u32 {
        self.copies
    }

    pub fn available_copies(&self) -> u32 {
        self.available_copies
    }

    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Copies currently off the shelf
    pub fn rented_out(&self) -> u32 {
        self.copies - self.available_copies
    }

    /// Mark `outstanding` copies as already rented.
    ///
    /// Used when a title is replaced while customers still hold copies of
    /// it; the shelf never goes below zero.
    pub(crate) fn carry_rentals(&mut self, outstanding: u32) {
        self.available_copies = self.copies.saturating_sub(outstanding);
    }

    /// All recorded ratings in the order they were given
    pub fn ratings(&self) -> &[u8] {
        &self.ratings
    }

    pub fn rating_count(&self) -> usize {
        self.ratings.len()
    }

    /// Mean of all ratings, 0 while the movie is unrated
    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    /// Take one copy off the shelf.
    ///
    /// Returns `false` without touching the counter when nothing is left.
    pub fn check_out(&mut self) -> bool {
        if self.available_copies == 0 {
            return false;
        }
        self.available_copies -= 1;
        true
    }

    /// Put one copy back on the shelf.
    ///
    /// Returns `false` when every copy is already in stock.
    pub fn check_in(&mut self) -> bool {
        if self.available_copies >= self.copies {
            return false;
        }
        self.available_copies += 1;
        true
    }

    /// Record a star rating; anything outside 1-5 is rejected unchanged.
    ///
    /// The average is not refreshed here, see [`Movie::update_average_rating`].
    pub fn add_rating(&mut self, rating: i64) -> Result<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(CatalogError::InvalidRating(rating));
        }
        self.ratings.push(rating as u8);
        Ok(())
    }

    /// Recompute the average from the rating list. No-op while unrated.
    pub fn update_average_rating(&mut self) {
        if self.ratings.is_empty() {
            return;
        }
        let total: u32 = self.ratings.iter().map(|&r| r as u32).sum();
        self.average_rating = total as f64 / self.ratings.len() as f64;
    }
}

impl fmt::Display for Movie {
    /// `"{title} by {company} ({year}) {average}/5 stars"`.
    ///
    /// Unrated movies show a bare `0`, rated ones always carry a decimal
    /// point (`4.0`, `3.5`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) ",
            self.title, self.production_company, self.year
        )?;
        if self.ratings.is_empty() {
            write!(f, "0/5 stars")
        } else {
            write!(f, "{:?}/5 stars", self.average_rating)
        }
    }
}

// =============================================================================
// ProductionCompany
// =============================================================================

/// A studio and the titles it has in the catalog.
///
/// The title set is a relation, not ownership: movies live in the catalog.
#[derive(Debug, Clone)]
pub struct ProductionCompany {
    pub name: String,
    pub founded_year: i32,
    pub(crate) movies: BTreeSet<String>,
}

impl ProductionCompany {
    pub fn new(name: impl Into<String>, founded_year: i32) -> Self {
        Self {
            name: name.into(),
            founded_year,
            movies: BTreeSet::new(),
        }
    }

    /// Link a title to this company. Adding a title twice is a no-op.
    pub fn add_movie(&mut self, title: &str) {
        if !self.movies.contains(title) {
            self.movies.insert(title.to_string());
        }
    }

    pub fn has_movie(&self, title: &str) -> bool {
        self.movies.contains(title)
    }

    /// Titles produced by this company, sorted
    pub fn movie_titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(String::as_str)
    }
}

// =============================================================================
// Catalog - the in-memory movie store
// =============================================================================

/// Holds every movie plus the company and genre lookup tables.
///
/// `movies` keeps catalog (insertion) order, which is the order listings,
/// searches, and recommendations are produced in. `title_index` maps a title
/// to its slot in `movies`.
#[derive(Debug)]
pub struct Catalog {
    pub(crate) movies: Vec<Movie>,
    pub(crate) title_index: HashMap<String, usize>,
    pub(crate) companies: HashMap<String, ProductionCompany>,
    /// Titles grouped by genre
    pub(crate) genre_index: HashMap<String, BTreeSet<String>>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            title_index: HashMap::new(),
            companies: HashMap::new(),
            genre_index: HashMap::new(),
        }
    }

    /// Get a movie by title
    pub fn get_movie(&self, title: &str) -> Option<&Movie> {
        self.title_index.get(title).map(|&slot| &self.movies[slot])
    }

    /// Get a movie by title for stock or rating updates
    pub fn get_movie_mut(&mut self, title: &str) -> Option<&mut Movie> {
        let slot = *self.title_index.get(title)?;
        self.movies.get_mut(slot)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.title_index.contains_key(title)
    }

    /// Every movie in catalog order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Get a production company by name
    pub fn get_company(&self, name: &str) -> Option<&ProductionCompany> {
        self.companies.get(name)
    }

    /// Titles filed under a genre, sorted. Empty for unknown genres.
    pub fn titles_in_genre(&self, genre: &str) -> Vec<&str> {
        self.genre_index
            .get(genre)
            .map(|titles| titles.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every genre that has at least one title, sorted
    pub fn genres(&self) -> Vec<&str> {
        let mut genres: Vec<&str> = self
            .genre_index
            .iter()
            .filter(|(_, titles)| !titles.is_empty())
            .map(|(genre, _)| genre.as_str())
            .collect();
        genres.sort_unstable();
        genres
    }

    /// (movies, companies, genres), for logging and tests
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.movies.len(), self.companies.len(), self.genres().len())
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
