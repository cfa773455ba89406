mod menu;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use catalog::Catalog;
use rental::{CustomerId, RentalManager, RentalPolicy};

use crate::menu::Menu;

/// Movie Rental - in-memory catalog and rental desk
#[derive(Parser)]
#[command(name = "movie-rental")]
#[command(about = "Rent, return, rate, and search movies from an in-memory catalog", long_about = None)]
struct Cli {
    /// CSV file to load the catalog from at startup
    #[arg(short, long, default_value = "data/catalog.csv")]
    data_file: PathBuf,

    /// Simultaneous rentals allowed per customer
    #[arg(long, default_value = "3")]
    max_rentals: usize,

    /// Rentals held longer than this many days are late
    #[arg(long, default_value = "14")]
    late_days: i64,

    /// Customer IDs are drawn from 0 up to this value
    #[arg(long, default_value = "100000")]
    max_customer_id: CustomerId,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    Menu,

    /// Find movies whose title, genre, or director matches exactly
    Search {
        /// Exact, case-sensitive title, genre, or director
        #[arg(long)]
        query: String,
    },

    /// List movies with copies on the shelf
    Available,

    /// Show the highest rated movies
    TopRated {
        /// Number of movies to show
        #[arg(long, default_value = "3")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let policy = RentalPolicy {
        max_rentals: cli.max_rentals,
        late_threshold_days: cli.late_days,
        max_customer_id: cli.max_customer_id,
        ..RentalPolicy::default()
    };
    let mut manager = RentalManager::new(Catalog::new(), policy);

    // A missing or malformed file is reported and the desk opens empty
    let start = Instant::now();
    match manager.load_catalog(&cli.data_file) {
        Ok(count) => println!(
            "{} Loaded {} movies from {} in {:?}",
            "✓".green(),
            count,
            cli.data_file.display(),
            start.elapsed()
        ),
        Err(e) => {
            warn!("Starting with an empty catalog: {}", e);
            println!("{} {}", "!".yellow(), e);
        }
    }

    // Dispatch to appropriate command handler
    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => handle_menu(manager)?,
        Commands::Search { query } => handle_search(&manager, &query),
        Commands::Available => handle_available(&manager),
        Commands::TopRated { limit } => handle_top_rated(&manager, limit),
    }

    Ok(())
}

/// Handle the 'menu' command
fn handle_menu(manager: RentalManager) -> Result<()> {
    info!("Starting interactive menu");
    let stdin = io::stdin();
    let mut menu = Menu::new(manager, stdin.lock(), io::stdout());
    menu.run().context("Interactive menu failed")
}

/// Handle the 'search' command
fn handle_search(manager: &RentalManager, query: &str) {
    println!("{}", format!("Search results for '{}':", query).bold().blue());
    print_movies(&manager.search_movie(query));
}

/// Handle the 'available' command
fn handle_available(manager: &RentalManager) {
    println!("{}", "Available movies:".bold().blue());
    print_movies(&manager.display_available_movies());
}

/// Handle the 'top-rated' command
fn handle_top_rated(manager: &RentalManager, limit: usize) {
    println!("{}", "Top rated movies:".bold().blue());
    print_movies(&manager.catalog().top_rated(limit));
}

fn print_movies(movies: &[String]) {
    if movies.is_empty() {
        println!("  (none)");
    }
    for (rank, movie) in movies.iter().enumerate() {
        println!("{}. {}", (rank + 1).to_string().green(), movie);
    }
}
