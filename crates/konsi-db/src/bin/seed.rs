//! # Seed Data Generator
//!
//! Populates the database with a small demo catalog and two partner stores
//! for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p konsi-db --bin seed
//!
//! # Specify database path
//! cargo run -p konsi-db --bin seed -- --db ./data/konsi.db
//!
//! # Also run a sample ledger flow (ship → deliver → sell → pay)
//! cargo run -p konsi-db --bin seed -- --with-history
//! ```

use std::env;

use chrono::{Duration, Utc};
use konsi_core::PaymentMethod;
use konsi_db::ledger::NewSale;
use konsi_db::repository::partner::NewPartner;
use konsi_db::repository::product::NewProduct;
use konsi_db::{Database, DbConfig};

/// Demo catalog: (name, category, price, stock, discount_percent)
const PRODUCTS: &[(&str, &str, i64, i64, u32)] = &[
    ("Kopi Arabika 250g", "Minuman", 45_000, 150, 0),
    ("Teh Hijau Organik", "Minuman", 35_000, 15, 0),
    ("Cokelat Bubuk Premium", "Makanan", 60_000, 85, 10),
    ("Gula Aren Cair", "Bahan Baku", 25_000, 10, 0),
];

/// Demo partners: (name, owner, address, phone)
const PARTNERS: &[(&str, &str, &str, &str)] = &[
    (
        "Toko Berkah Utama",
        "Budi Santoso",
        "Jl. Melati No. 5",
        "08123456789",
    ),
    (
        "Mini Market Sejahtera",
        "Siti Aminah",
        "Ruko Hijau Kav 3",
        "08987654321",
    ),
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

    let mut db_path = String::from("./konsi_dev.db");
    let mut with_history = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--with-history" => {
                with_history = true;
            }
            "--help" | "-h" => {
                println!("Konsi Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./konsi_dev.db)");
                println!("      --with-history Run a sample ledger flow after seeding");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Konsi Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Refuse to double-seed
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");
    let mut product_ids = Vec::new();
    for &(name, category, price, stock, discount_percent) in PRODUCTS {
        let product = db
            .products()
            .create(NewProduct {
                name: name.to_string(),
                category: category.to_string(),
                price,
                stock,
                discount_percent,
            })
            .await?;
        println!("  + {} ({})", product.name, product.category);
        product_ids.push(product.id);
    }

    println!();
    println!("Seeding partners...");
    let mut partner_ids = Vec::new();
    for &(name, owner, address, phone) in PARTNERS {
        let partner = db
            .partners()
            .create(NewPartner {
                name: name.to_string(),
                owner: owner.to_string(),
                address: address.to_string(),
                phone: phone.to_string(),
                credit_limit: 0,
            })
            .await?;
        println!("  + {} ({})", partner.name, partner.owner);
        partner_ids.push(partner.id);
    }

    if with_history {
        println!();
        println!("Running sample ledger flow...");
        let ledger = db.ledger(db.load_settings().await?);

        let req_date = (Utc::now() + Duration::days(3)).date_naive();
        let dist = ledger
            .ship_to_partner(&product_ids[0], &partner_ids[0], 20, req_date)
            .await?;
        println!("  → shipped 20 × {} ({})", dist.product_name, dist.value());

        ledger.confirm_delivery(&dist.id).await?;
        println!("  → delivery confirmed");

        let sale = ledger
            .record_sale(NewSale {
                product_id: product_ids[0].clone(),
                partner_id: Some(partner_ids[0].clone()),
                qty: 5,
                unit_price: None,
                buyer_name: "Ibu Ani".to_string(),
                payment_method: PaymentMethod::Cash,
            })
            .await?;
        println!("  → sold 5 units through the partner ({})", sale.total());

        ledger.record_payment(&partner_ids[0], 200_000).await?;
        println!("  → payment of Rp200.000 recorded");

        let alerts = ledger.notifications().await?;
        println!("  → {} active notifications", alerts.len());
    }

    println!();
    println!("✓ Seed complete!");
    println!(
        "  {} products, {} partners",
        db.products().count().await?,
        db.partners().count().await?
    );

    Ok(())
}
