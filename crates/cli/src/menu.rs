//! Interactive text menu.
//!
//! Translates numbered choices into `RentalManager` calls and turns their
//! results into lines of text. Input and output are generic so a whole
//! session can be scripted in tests.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::debug;

use catalog::NewMovie;
use rental::{CustomerId, RentalError, RentalManager, WaitlistStatus};

/// Whether the loop keeps going after an action
enum Flow {
    Continue,
    Exit,
}

pub struct Menu<R, W> {
    manager: RentalManager,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(manager: RentalManager, input: R, output: W) -> Self {
        Self {
            manager,
            input,
            output,
        }
    }

    /// Hand back the manager once the session is over
    pub fn into_manager(self) -> RentalManager {
        self.manager
    }

    /// Run until the user picks "Exit" or input runs out
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Please enter your choice: ")? else {
                break;
            };
            let choice = match parse_number::<u32>(&choice) {
                Ok(n) if (1..=10).contains(&n) => n,
                _ => {
                    writeln!(self.output, "{} Please enter a number 1-10", "✗".red())?;
                    continue;
                }
            };
            debug!("Menu choice {}", choice);

            let flow = match choice {
                1 => self.add_movie()?,
                2 => self.register_customer()?,
                3 => self.rent_movie()?,
                4 => self.return_movie()?,
                5 => self.search()?,
                6 => self.available()?,
                7 => self.customer_movies()?,
                8 => self.recommend()?,
                9 => self.late_returns()?,
                _ => {
                    writeln!(self.output, "Thank you for using the movie rental system")?;
                    Flow::Exit
                }
            };
            if let Flow::Exit = flow {
                break;
            }
        }
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "MOVIE RENTAL CORNER".bold().blue())?;
        for (number, label) in [
            "Add Movie",
            "Register Customer",
            "Rent Movie",
            "Return Movie",
            "Search Movies",
            "Display Available Movies",
            "Display Customer's Rented Movies",
            "Recommend Movies",
            "Check Late Returns",
            "Exit",
        ]
        .iter()
        .enumerate()
        {
            writeln!(self.output, "{}. {}", number + 1, label)?;
        }
        Ok(())
    }

    /// Print a label and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt for a number; `None` on end of input or a non-numeric entry
    fn prompt_number<T: FromStr>(&mut self, label: &str) -> Result<Option<T>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        match parse_number(&raw) {
            Ok(n) => Ok(Some(n)),
            Err(e) => {
                self.report(&e)?;
                Ok(None)
            }
        }
    }

    fn report(&mut self, err: &RentalError) -> Result<()> {
        writeln!(self.output, "{} {}", "✗".red(), err)?;
        Ok(())
    }

    fn print_list(&mut self, header: &str, lines: &[String], empty: &str) -> Result<()> {
        if lines.is_empty() {
            writeln!(self.output, "{}", empty)?;
            return Ok(());
        }
        writeln!(self.output, "{}", header.bold())?;
        for line in lines {
            writeln!(self.output, "  - {}", line)?;
        }
        Ok(())
    }

    // =========================================================================
    // Actions
    // =========================================================================

    fn add_movie(&mut self) -> Result<Flow> {
        let Some(title) = self.prompt("Enter movie title: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(director) = self.prompt("Enter director name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(production_company) = self.prompt("Enter production company: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(year) = self.prompt_number::<i32>("Enter release year: ")? else {
            return Ok(Flow::Continue);
        };
        let Some(copies) = self.prompt_number::<u32>("Enter number of copies: ")? else {
            return Ok(Flow::Continue);
        };
        let Some(rental_fee) = self.prompt_number::<f64>("Enter rental fee: ")? else {
            return Ok(Flow::Continue);
        };
        let Some(founded_year) = self.prompt_number::<i32>("Enter production company founded year: ")? else {
            return Ok(Flow::Continue);
        };
        let Some(genre) = self.prompt("Enter movie genre: ")? else {
            return Ok(Flow::Exit);
        };

        self.manager.add_movie(NewMovie {
            title,
            director,
            year,
            copies,
            genre,
            production_company,
            rental_fee,
            founded_year,
        });
        writeln!(self.output, "{} Movie successfully registered", "✓".green())?;
        Ok(Flow::Continue)
    }

    fn register_customer(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt("Enter customer name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(email) = self.prompt("Enter customer email: ")? else {
            return Ok(Flow::Exit);
        };

        match self.manager.register_customer(name, email) {
            Ok(customer_id) => writeln!(
                self.output,
                "{} Customer successfully registered, your Customer ID is: {}",
                "✓".green(),
                customer_id
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn rent_movie(&mut self) -> Result<Flow> {
        let Some(customer_id) = self.prompt_number::<CustomerId>("Enter your Customer ID: ")? else {
            return Ok(Flow::Continue);
        };
        let Some(title) = self.prompt("Enter movie title: ")? else {
            return Ok(Flow::Exit);
        };

        match self.manager.rent_movie(&title, customer_id) {
            Ok(()) => writeln!(self.output, "{} Movie successfully rented", "✓".green())?,
            Err(e @ RentalError::Unavailable(_)) => {
                self.report(&e)?;
                self.offer_waitlist(&title, customer_id)?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn offer_waitlist(&mut self, title: &str, customer_id: CustomerId) -> Result<()> {
        let Some(answer) = self.prompt("Join the waitlist? (y/n): ")? else {
            return Ok(());
        };
        if !answer.eq_ignore_ascii_case("y") {
            return Ok(());
        }
        match self.manager.add_to_waitlist(title, customer_id) {
            Ok(WaitlistStatus::Queued(position)) => {
                writeln!(self.output, "You are number {} on the waitlist", position)?
            }
            Ok(WaitlistStatus::AlreadyQueued(position)) => writeln!(
                self.output,
                "You are already number {} on the waitlist",
                position
            )?,
            Ok(WaitlistStatus::CopiesAvailable) => {
                writeln!(self.output, "A copy is available, you can rent it now")?
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn return_movie(&mut self) -> Result<Flow> {
        let Some(customer_id) = self.prompt_number::<CustomerId>("Enter customer ID: ")? else {
            return Ok(Flow::Continue);
        };
        let Some(title) = self.prompt("Enter movie title: ")? else {
            return Ok(Flow::Exit);
        };

        if let Err(e) = self.manager.return_movie(&title, customer_id) {
            self.report(&e)?;
            return Ok(Flow::Continue);
        }

        // Re-prompt until the rating is a number in range
        loop {
            let Some(raw) = self.prompt("Rate the movie (1-5 stars): ")? else {
                break;
            };
            let result = parse_number::<i64>(&raw)
                .and_then(|rating| self.manager.record_rating(&title, rating));
            match result {
                Ok(_) => break,
                Err(e) => self.report(&e)?,
            }
        }
        writeln!(self.output, "{} Movie successfully returned", "✓".green())?;

        if let Ok(Some(next)) = self.manager.notify_next_available(&title) {
            writeln!(
                self.output,
                "Customer {} is next on the waitlist for '{}'",
                next, title
            )?;
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self) -> Result<Flow> {
        let Some(query) = self.prompt("Enter the movie title, genre or director: ")? else {
            return Ok(Flow::Exit);
        };
        let results = self.manager.search_movie(&query);
        self.print_list("Search results:", &results, "No movies matched")?;
        Ok(Flow::Continue)
    }

    fn available(&mut self) -> Result<Flow> {
        let movies = self.manager.display_available_movies();
        self.print_list("Available movies:", &movies, "No movies are available")?;
        Ok(Flow::Continue)
    }

    fn customer_movies(&mut self) -> Result<Flow> {
        let Some(customer_id) = self.prompt_number::<CustomerId>("Enter Customer ID: ")? else {
            return Ok(Flow::Continue);
        };
        match self.manager.display_customer_movies(customer_id) {
            Ok(rentals) if rentals.is_empty() => {
                writeln!(self.output, "Customer hasn't rented any movies yet")?
            }
            Ok(rentals) => {
                writeln!(self.output, "{}", "Movies rented by customer:".bold())?;
                for (movie, date) in rentals {
                    writeln!(self.output, "  {} (rented on {})", movie, date)?;
                }
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn recommend(&mut self) -> Result<Flow> {
        let Some(customer_id) = self.prompt_number::<CustomerId>("Enter Customer ID: ")? else {
            return Ok(Flow::Continue);
        };
        let recommendations = match self.manager.recommend_movies(customer_id) {
            Ok(recommendations) => recommendations,
            Err(e) => {
                self.report(&e)?;
                return Ok(Flow::Continue);
            }
        };

        let top = self.manager.display_top_rated_movies();
        self.print_list("Top rated movies:", &top, "No movies in the catalog")?;
        self.print_list(
            "Recommended movies:",
            &recommendations,
            "There are no recommendations available",
        )?;
        Ok(Flow::Continue)
    }

    fn late_returns(&mut self) -> Result<Flow> {
        let threshold = self.manager.policy().late_threshold_days;
        let late = self.manager.check_late_returns(threshold);
        if late.is_empty() {
            writeln!(self.output, "No late returns")?;
        } else {
            let ids: Vec<String> = late.iter().map(|id| id.to_string()).collect();
            writeln!(self.output, "Late returns (customer IDs): {}", ids.join(", "))?;
        }
        Ok(Flow::Continue)
    }
}

/// Parse a numeric menu entry, reporting junk as `InvalidInput`
fn parse_number<T: FromStr>(raw: &str) -> rental::Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| RentalError::InvalidInput(format!("'{}' is not a valid number", raw)))
}
