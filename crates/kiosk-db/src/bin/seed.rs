//! # Seed Data Generator
//!
//! Populates a fresh database with the demo catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p kiosk-db --bin seed
//!
//! # Specify database path
//! cargo run -p kiosk-db --bin seed -- --db ./data/kiosk.db
//! ```
//!
//! Seeding is skipped when the catalog already has products, so the
//! binary is safe to run on every dev startup.

use chrono::Utc;
use std::env;
use uuid::Uuid;

use kiosk_core::{Category, Product};
use kiosk_db::{Database, DbConfig};

/// Demo categories: (name, prefix, description)
const CATEGORIES: &[(&str, &str, &str)] = &[
    ("BEVERAGES", "BEB", "Sodas, water, juice"),
    ("SNACKS", "SNA", "Chips and crisps"),
    ("CANDY", "GOL", "Chocolate and sweets"),
];

/// Demo products: (sku, name, description, quantity, price_cents, min_stock, category)
const PRODUCTS: &[(&str, &str, &str, i64, i64, i64, &str)] = &[
    ("BEB001", "Coca-Cola 600ml", "Soda", 50, 2500, 10, "BEVERAGES"),
    ("BEB002", "Sprite 600ml", "Soda", 40, 2500, 8, "BEVERAGES"),
    ("BEB003", "Agua 500ml", "Mineral water", 100, 1500, 20, "BEVERAGES"),
    ("SNA001", "Lays 60g", "Potato chips", 75, 2000, 15, "SNACKS"),
    ("SNA002", "Doritos 70g", "Nachos", 80, 2000, 15, "SNACKS"),
    ("GOL001", "Chocolate 50g", "Milk chocolate", 100, 3000, 20, "CANDY"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kiosk_pos.db");

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
                println!("Kiosk POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kiosk_pos.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Kiosk POS Seed Data Generator");
    println!("=============================");
    println!("Database: {db_path}");
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {existing} products");
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Seeding demo catalog...");

    let now = Utc::now();

    for (name, prefix, description) in CATEGORIES {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            prefix: prefix.to_string(),
            description: Some(description.to_string()),
            active: true,
            created_at: now,
        };
        db.categories().insert(&category).await?;
        println!("  Category {name} ({prefix})");
    }

    for (sku, name, description, quantity, price_cents, min_stock, category) in PRODUCTS {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            sku: sku.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            quantity: *quantity,
            price_cents: *price_cents,
            min_stock: *min_stock,
            category_label: category.to_string(),
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;
        println!("  Product {sku} - {name}");
    }

    // Sanity check the ranked search over the fresh data
    println!();
    println!("Verifying search...");
    let hits = db.products().search_for_sale("cola", 10).await?;
    println!("  Search 'cola': {} results", hits.len());
    let hits = db.products().search_for_sale("beb001", 10).await?;
    println!("  Search 'beb001': {} results", hits.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
