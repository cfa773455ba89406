//! Catalog building, querying, and loading.
//!
//! Insertion keeps three tables in step:
//! - title -> movie (catalog order)
//! - company name -> production company (titles it produced)
//! - genre -> titles

use std::cmp::Ordering;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;

impl Catalog {
    /// Add every movie in a CSV file to this catalog.
    ///
    /// The whole file is parsed before anything is inserted, so a malformed
    /// file yields an error and leaves the catalog untouched. Titles already
    /// present are replaced as by [`Catalog::add_movie`].
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        info!("Loading catalog from {:?}", path);

        let records = parser::read_file(path)?;
        let loaded = records.len();

        for record in records {
            self.add_movie(record);
        }
        self.validate()?;

        let (movies, companies, genres) = self.counts();
        info!(
            "Loaded {} records; catalog has {} movies from {} production companies across {} genres",
            loaded, movies, companies, genres
        );
        Ok(loaded)
    }

    /// Insert a movie, replacing any movie already filed under its title.
    ///
    /// A replaced movie keeps its catalog position and its count of copies
    /// still out with customers. Its old company and genre links are dropped
    /// before the new ones are added.
    pub fn add_movie(&mut self, new_movie: NewMovie) {
        let founded_year = new_movie.founded_year;
        let movie = Movie::new(new_movie);
        let title = movie.title.clone();

        match self.title_index.get(&title).copied() {
            Some(slot) => {
                let mut movie = movie;
                movie.carry_rentals(self.movies[slot].rented_out());
                let previous = std::mem::replace(&mut self.movies[slot], movie);
                self.unlink(&previous);
                debug!(
                    "Replaced movie '{}' ({} copies still rented)",
                    title,
                    previous.rented_out()
                );
            }
            None => {
                self.title_index.insert(title.clone(), self.movies.len());
                self.movies.push(movie);
                debug!("Added movie '{}'", title);
            }
        }

        let slot = self.title_index[&title];
        let company_name = self.movies[slot].production_company.clone();
        let genre = self.movies[slot].genre.clone();

        self.companies
            .entry(company_name.clone())
            .or_insert_with(|| ProductionCompany::new(company_name, founded_year))
            .add_movie(&title);

        self.genre_index.entry(genre).or_default().insert(title);
    }

    /// Movies whose title, genre, or director equals `query` exactly.
    pub fn search(&self, query: &str) -> Vec<String> {
        self.movies
            .iter()
            .filter(|m| m.title == query || m.genre == query || m.director == query)
            .map(|m| m.to_string())
            .collect()
    }

    /// Every movie with at least one copy on the shelf
    pub fn list_available(&self) -> Vec<String> {
        self.movies
            .iter()
            .filter(|m| m.is_available())
            .map(|m| m.to_string())
            .collect()
    }

    /// The `n` highest-rated movies, best first.
    ///
    /// Equal averages keep catalog order (the sort is stable).
    pub fn top_rated(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<&Movie> = self.movies.iter().collect();
        ranked.sort_by(|a, b| {
            b.average_rating()
                .partial_cmp(&a.average_rating())
                .unwrap_or(Ordering::Equal)
        });
        ranked.into_iter().take(n).map(|m| m.to_string()).collect()
    }

    /// Check that the title, company, and genre tables agree.
    ///
    /// - every title slot points at a movie with that title
    /// - every movie is linked from its company and its genre bucket
    /// - stock counters are within bounds
    pub fn validate(&self) -> Result<()> {
        if self.title_index.len() != self.movies.len() {
            return Err(CatalogError::Inconsistent(format!(
                "{} titles indexed for {} movies",
                self.title_index.len(),
                self.movies.len()
            )));
        }
        for (title, &slot) in &self.title_index {
            if self.movies.get(slot).map(|m| &m.title) != Some(title) {
                return Err(CatalogError::Inconsistent(format!(
                    "title '{}' points at the wrong slot",
                    title
                )));
            }
        }
        for movie in &self.movies {
            let linked = self
                .companies
                .get(&movie.production_company)
                .is_some_and(|c| c.has_movie(&movie.title));
            if !linked {
                return Err(CatalogError::Inconsistent(format!(
                    "'{}' missing from company '{}'",
                    movie.title, movie.production_company
                )));
            }
            let filed = self
                .genre_index
                .get(&movie.genre)
                .is_some_and(|titles| titles.contains(&movie.title));
            if !filed {
                return Err(CatalogError::Inconsistent(format!(
                    "'{}' missing from genre '{}'",
                    movie.title, movie.genre
                )));
            }
            if movie.available_copies() > movie.copies() {
                return Err(CatalogError::InvalidValue {
                    field: "available_copies".to_string(),
                    value: movie.available_copies().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Drop the company and genre links of a movie that is being replaced
    fn unlink(&mut self, previous: &Movie) {
        if let Some(company) = self.companies.get_mut(&previous.production_company) {
            company.movies.remove(&previous.title);
        }
        if let Some(titles) = self.genre_index.get_mut(&previous.genre) {
            titles.remove(&previous.title);
        }
    }
}
