//! # Seed Data Generator
//!
//! Populates the database with a starter tour catalog for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p tourdesk-db --bin seed
//!
//! # Specify database path
//! cargo run -p tourdesk-db --bin seed -- --db ./data/tourdesk.db
//! ```

use chrono::Utc;
use std::env;
use tourdesk_core::validation::validate_tour_input;
use tourdesk_core::{Tour, TourInput};
use tourdesk_db::repository::tour::generate_tour_id;
use tourdesk_db::{Database, DbConfig};

/// (name, kind, icon, adult, child, native) in cents.
const CATALOG: &[(&str, &str, &str, i64, i64, i64)] = &[
    ("Sunset Boat", "boat", "⛵", 12_000, 6_000, 8_000),
    ("Island Hopping", "boat", "🏝️", 18_000, 9_000, 12_000),
    ("Mangrove Kayak", "kayak", "🛶", 9_000, 4_500, 6_000),
    ("Waterfall Trail", "trail", "🥾", 7_000, 3_500, 4_000),
    ("Historic Center Walk", "city", "🏛️", 5_000, 0, 2_500),
    ("Dune Buggy", "4x4", "🚙", 15_000, 7_500, 10_000),
    ("Snorkel Reef", "diving", "🤿", 14_000, 7_000, 9_000),
    ("Dolphin Watch", "boat", "🐬", 16_000, 8_000, 11_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./tourdesk_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tour Desk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./tourdesk_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tour Desk Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.tours().count_active().await?;
    if existing > 0 {
        println!("⚠ Database already has {} active tours", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut generated = 0;
    for &(name, kind, icon, adult, child, native) in CATALOG {
        let input = TourInput {
            id: None,
            name: name.to_string(),
            kind: kind.to_string(),
            price_adult_cents: adult,
            price_child_cents: child,
            price_native_cents: native,
            icon: icon.to_string(),
        };
        validate_tour_input(&input)?;

        let tour = Tour {
            id: generate_tour_id(),
            name: input.name,
            kind: input.kind,
            price_adult_cents: input.price_adult_cents,
            price_child_cents: input.price_child_cents,
            price_native_cents: input.price_native_cents,
            icon: input.icon,
            active: true,
            created_at: Utc::now(),
        };

        if let Err(e) = db.tours().insert(&tour).await {
            eprintln!("Failed to insert {}: {}", tour.name, e);
            continue;
        }
        generated += 1;
    }

    println!();
    println!("✓ Inserted {} tours", generated);
    for tour in db.tours().list_active().await? {
        println!("  {} {:<24} adult {}", tour.icon, tour.name, tour.price_for(tourdesk_core::AudienceType::Adult));
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
