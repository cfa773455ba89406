//! Integration tests for the rental manager.
//!
//! These walk full rent/return/rate/waitlist flows through the public API
//! and check the stock and ledger invariants after every step.

use std::collections::HashSet;
use std::path::PathBuf;

use catalog::{Catalog, NewMovie};
use chrono::{Duration, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rental::{CustomerId, RentalError, RentalManager, RentalPolicy, WaitlistStatus};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("rental=debug,catalog=debug")
        .with_test_writer()
        .try_init();
}

fn movie(title: &str, genre: &str, copies: u32) -> NewMovie {
    NewMovie {
        title: title.to_string(),
        director: "Denis Villeneuve".to_string(),
        year: 2021,
        copies,
        genre: genre.to_string(),
        production_company: "Legendary".to_string(),
        rental_fee: 4.99,
        founded_year: 2000,
    }
}

fn create_test_setup() -> RentalManager {
    init_tracing();
    let mut manager = RentalManager::with_rng(
        Catalog::new(),
        RentalPolicy::default(),
        StdRng::seed_from_u64(1234),
    );
    manager.add_movie(movie("Dune", "Sci-Fi", 2));
    manager.add_movie(movie("Arrival", "Sci-Fi", 1));
    manager.add_movie(movie("Sicario", "Thriller", 3));
    manager.add_movie(movie("Prisoners", "Thriller", 1));
    manager.add_movie(movie("Blade Runner 2049", "Sci-Fi", 1));
    manager
}

/// Stock bounds and ledger bounds for the whole system
fn assert_invariants(manager: &RentalManager, customers: &[CustomerId]) {
    for m in manager.catalog().movies() {
        assert!(m.available_copies() <= m.copies(), "{} over-stocked", m.title);
    }
    for id in customers {
        let customer = manager.get_customer(*id).unwrap();
        assert!(customer.rental_count() <= customer.max_rentals);
        let titles: HashSet<&str> = customer.rentals().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles.len(), customer.rental_count());
    }
}

fn available(manager: &RentalManager, title: &str) -> u32 {
    manager.catalog().get_movie(title).unwrap().available_copies()
}

#[test]
fn test_dune_runs_out() {
    let mut manager = create_test_setup();
    let a = manager.register_customer("A", "a@example.com").unwrap();
    let b = manager.register_customer("B", "b@example.com").unwrap();
    let c = manager.register_customer("C", "c@example.com").unwrap();

    manager.rent_movie("Dune", a).unwrap();
    assert_eq!(available(&manager, "Dune"), 1);
    assert!(manager.get_customer(a).unwrap().holds("Dune"));

    manager.rent_movie("Dune", b).unwrap();
    assert_eq!(available(&manager, "Dune"), 0);

    let err = manager.rent_movie("Dune", c).unwrap_err();
    assert!(matches!(err, RentalError::Unavailable(ref t) if t == "Dune"));
    assert_eq!(available(&manager, "Dune"), 0);
    assert_eq!(manager.get_customer(c).unwrap().rental_count(), 0);

    assert_invariants(&manager, &[a, b, c]);
}

#[test]
fn test_readding_rented_title_keeps_stock_consistent() {
    let mut manager = create_test_setup();
    let a = manager.register_customer("A", "a@example.com").unwrap();
    let b = manager.register_customer("B", "b@example.com").unwrap();
    let c = manager.register_customer("C", "c@example.com").unwrap();

    manager.rent_movie("Dune", a).unwrap();
    manager.add_movie(movie("Dune", "Sci-Fi", 2));
    assert_eq!(available(&manager, "Dune"), 1);

    manager.rent_movie("Dune", b).unwrap();
    let err = manager.rent_movie("Dune", c).unwrap_err();
    assert!(matches!(err, RentalError::Unavailable(_)));
    assert_invariants(&manager, &[a, b, c]);

    manager.return_movie("Dune", a).unwrap();
    manager.return_movie("Dune", b).unwrap();
    assert_eq!(available(&manager, "Dune"), 2);
    assert_invariants(&manager, &[a, b, c]);
}

#[test]
fn test_return_after_readding_with_fewer_copies() {
    let mut manager = create_test_setup();
    let a = manager.register_customer("A", "a@example.com").unwrap();
    let b = manager.register_customer("B", "b@example.com").unwrap();

    manager.rent_movie("Dune", a).unwrap();
    manager.rent_movie("Dune", b).unwrap();
    manager.add_movie(movie("Dune", "Sci-Fi", 1));
    assert_eq!(available(&manager, "Dune"), 0);

    // The ledger entry is cleared even when the shelf has no room
    manager.return_movie("Dune", a).unwrap();
    manager.return_movie("Dune", b).unwrap();
    assert_eq!(available(&manager, "Dune"), 1);
    assert!(!manager.get_customer(b).unwrap().holds("Dune"));
    assert_invariants(&manager, &[a, b]);
}

#[test]
fn test_fourth_rental_exceeds_limit() {
    let mut manager = create_test_setup();
    let a = manager.register_customer("A", "a@example.com").unwrap();

    for title in ["Dune", "Arrival", "Sicario"] {
        manager.rent_movie(title, a).unwrap();
    }
    let err = manager.rent_movie("Prisoners", a).unwrap_err();
    assert!(matches!(err, RentalError::LimitExceeded { max_rentals: 3, .. }));
    assert_eq!(available(&manager, "Prisoners"), 1);

    assert_invariants(&manager, &[a]);
}

#[test]
fn test_rent_return_round_trip() {
    let mut manager = create_test_setup();
    let a = manager.register_customer("A", "a@example.com").unwrap();
    let before = available(&manager, "Sicario");

    manager.rent_movie("Sicario", a).unwrap();
    assert_eq!(available(&manager, "Sicario"), before - 1);

    manager.return_movie("Sicario", a).unwrap();
    assert_eq!(available(&manager, "Sicario"), before);
    assert!(!manager.get_customer(a).unwrap().holds("Sicario"));

    // The copy can be rented again after the round trip
    manager.rent_movie("Sicario", a).unwrap();
    assert_invariants(&manager, &[a]);
}

#[test]
fn test_rating_and_top_rated() {
    let mut manager = create_test_setup();

    manager.record_rating("Sicario", 3).unwrap();
    manager.record_rating("Sicario", 5).unwrap();
    assert_eq!(manager.catalog().get_movie("Sicario").unwrap().average_rating(), 4.0);

    let top = manager.catalog().top_rated(1);
    assert_eq!(top, vec!["Sicario by Legendary (2021) 4.0/5 stars"]);

    let top = manager.display_top_rated_movies();
    assert_eq!(top.len(), 3);
    // Unrated titles follow in catalog order
    assert!(top[1].starts_with("Dune"));
    assert!(top[2].starts_with("Arrival"));
}

#[test]
fn test_invalid_rating_leaves_average_alone() {
    let mut manager = create_test_setup();
    manager.record_rating("Dune", 2).unwrap();

    assert!(matches!(
        manager.record_rating("Dune", 0),
        Err(RentalError::InvalidRating(0))
    ));
    let dune = manager.catalog().get_movie("Dune").unwrap();
    assert_eq!(dune.average_rating(), 2.0);
    assert_eq!(dune.ratings(), &[2]);
}

#[test]
fn test_late_returns() {
    let mut manager = create_test_setup();
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let late = manager.register_customer("Late", "late@example.com").unwrap();
    let prompt = manager.register_customer("Prompt", "prompt@example.com").unwrap();

    manager
        .rent_movie_on("Dune", late, today - Duration::days(20))
        .unwrap();
    manager
        .rent_movie_on("Sicario", prompt, today - Duration::days(5))
        .unwrap();

    assert_eq!(manager.check_late_returns_as_of(today, 14), vec![late]);

    // Exactly at the threshold is not late
    assert!(manager.check_late_returns_as_of(today - Duration::days(6), 14).is_empty());
}

#[test]
fn test_late_returns_listed_once_per_movie() {
    let mut manager = create_test_setup();
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let a = manager.register_customer("A", "a@example.com").unwrap();

    manager.rent_movie_on("Dune", a, today - Duration::days(30)).unwrap();
    manager.rent_movie_on("Arrival", a, today - Duration::days(15)).unwrap();

    assert_eq!(manager.check_late_returns_as_of(today, 14), vec![a, a]);
    assert_eq!(manager.check_late_returns_as_of(today, 20), vec![a]);
}

#[test]
fn test_register_customer_ids_are_unique() {
    let policy = RentalPolicy {
        max_customer_id: 50,
        ..RentalPolicy::default()
    };
    let mut manager = RentalManager::with_rng(Catalog::new(), policy, StdRng::seed_from_u64(99));

    let ids: Vec<CustomerId> = (0..51)
        .map(|i| manager.register_customer(format!("c{i}"), "c@example.com").unwrap())
        .collect();
    let unique: HashSet<CustomerId> = ids.iter().copied().collect();

    assert_eq!(unique.len(), 51);
    assert!(ids.iter().all(|&id| id <= 50));
    assert_eq!(manager.customer_count(), 51);
}

#[test]
fn test_recommendations_follow_rented_genres() {
    let mut manager = create_test_setup();
    let a = manager.register_customer("A", "a@example.com").unwrap();

    assert!(manager.recommend_movies(a).unwrap().is_empty());

    manager.rent_movie("Prisoners", a).unwrap();
    let recs = manager.recommend_movies(a).unwrap();
    assert_eq!(recs.len(), 2);
    assert!(recs[0].starts_with("Sicario"));
    // Held titles are not filtered out
    assert!(recs[1].starts_with("Prisoners"));

    manager.rent_movie("Dune", a).unwrap();
    assert_eq!(manager.recommend_movies(a).unwrap().len(), 5);

    assert!(matches!(
        manager.recommend_movies(a.wrapping_add(1)),
        Err(RentalError::CustomerNotFound(_))
    ));
}

#[test]
fn test_recommendations_capped() {
    let mut manager = create_test_setup();
    for i in 0..10 {
        manager.add_movie(movie(&format!("Sci-Fi {i}"), "Sci-Fi", 1));
    }
    let a = manager.register_customer("A", "a@example.com").unwrap();
    manager.rent_movie("Dune", a).unwrap();

    let recs = manager.recommend_movies(a).unwrap();
    assert_eq!(recs.len(), 5);
    assert!(recs[0].starts_with("Dune"));
}

#[test]
fn test_waitlist_ignored_while_copies_available() {
    let mut manager = create_test_setup();
    let a = manager.register_customer("A", "a@example.com").unwrap();

    assert_eq!(
        manager.add_to_waitlist("Dune", a).unwrap(),
        WaitlistStatus::CopiesAvailable
    );
    assert_eq!(
        manager.add_to_waitlist("Dune", a).unwrap(),
        WaitlistStatus::CopiesAvailable
    );
    assert!(manager.waitlist("Dune").is_empty());
}

#[test]
fn test_waitlist_queue() {
    let mut manager = create_test_setup();
    let a = manager.register_customer("A", "a@example.com").unwrap();
    let b = manager.register_customer("B", "b@example.com").unwrap();
    let c = manager.register_customer("C", "c@example.com").unwrap();

    manager.rent_movie("Arrival", a).unwrap();
    assert_eq!(manager.add_to_waitlist("Arrival", b).unwrap(), WaitlistStatus::Queued(1));
    assert_eq!(manager.add_to_waitlist("Arrival", c).unwrap(), WaitlistStatus::Queued(2));
    assert_eq!(
        manager.add_to_waitlist("Arrival", b).unwrap(),
        WaitlistStatus::AlreadyQueued(1)
    );
    assert_eq!(manager.waitlist("Arrival"), vec![b, c]);

    assert!(matches!(
        manager.add_to_waitlist("Nope", b),
        Err(RentalError::MovieNotFound(_))
    ));

    manager.return_movie("Arrival", a).unwrap();
    assert_eq!(manager.notify_next_available("Arrival").unwrap(), Some(b));
    manager.rent_movie("Arrival", b).unwrap();
    assert_eq!(manager.notify_next_available("Arrival").unwrap(), None);
    assert_eq!(manager.waitlist("Arrival"), vec![c]);
}

#[test]
fn test_load_catalog_from_file() {
    init_tracing();
    let path: PathBuf = std::env::temp_dir().join(format!(
        "rental-catalog-{}.csv",
        std::process::id()
    ));
    std::fs::write(
        &path,
        "title,director,year,copies,genre,production_company,rental_fee,founded_year\n\
         Dune,Denis Villeneuve,2021,2,Sci-Fi,Legendary,4.99,2000\n\
         \"Crouching Tiger, Hidden Dragon\",Ang Lee,2000,1,Action,Sony Pictures Classics,3.50,1992\n",
    )
    .unwrap();

    let mut manager = RentalManager::new(Catalog::new(), RentalPolicy::default());
    let loaded = manager.load_catalog(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, 2);
    assert_eq!(
        manager.search_movie("Ang Lee"),
        vec!["Crouching Tiger, Hidden Dragon by Sony Pictures Classics (2000) 0/5 stars"]
    );
    assert_eq!(manager.display_available_movies().len(), 2);
}

#[test]
fn test_missing_catalog_leaves_catalog_empty() {
    init_tracing();
    let mut manager = RentalManager::new(Catalog::new(), RentalPolicy::default());

    let err = manager
        .load_catalog(&PathBuf::from("definitely/not/here.csv"))
        .unwrap_err();
    assert!(matches!(err, RentalError::SourceUnavailable { .. }));
    assert!(manager.catalog().is_empty());
}
