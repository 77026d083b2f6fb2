//! # Seed Data Generator
//!
//! Populates the database with canteen products (and optionally a few
//! sample sales) for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p canteen-db --bin seed
//!
//! # Specify database path
//! cargo run -p canteen-db --bin seed -- --db ./data/canteen.db
//!
//! # Also record sample sales so reports have data
//! cargo run -p canteen-db --bin seed -- --with-sales
//! ```
//!
//! ## Generated Products
//! A realistic school-canteen catalog: drinks, toasts, pastries and
//! snacks, each with a numeric barcode, a price in kuruş and an
//! opening stock level.

use std::env;

use canteen_core::{Cart, Money, Product};
use canteen_db::{Database, DbConfig};
use chrono::Local;

/// The canteen catalog: (barcode, name, price in kuruş, opening stock).
const CATALOG: &[(&str, &str, i64, i64)] = &[
    ("8690000000011", "Ayran 200ml", 750, 60),
    ("8690000000028", "Su 500ml", 500, 120),
    ("8690000000035", "Limonata", 1250, 40),
    ("8690000000042", "Meyve Suyu Vişne", 1000, 50),
    ("8690000000059", "Soğuk Çay Şeftali", 1500, 45),
    ("8690000000110", "Kaşarlı Tost", 2500, 30),
    ("8690000000127", "Karışık Tost", 3000, 30),
    ("8690000000134", "Sucuklu Tost", 3250, 25),
    ("8690000000219", "Simit", 500, 80),
    ("8690000000226", "Poğaça Peynirli", 1000, 50),
    ("8690000000233", "Açma", 900, 40),
    ("8690000000240", "Börek Ispanaklı", 1750, 25),
    ("8690000000318", "Çikolatalı Gofret", 850, 100),
    ("8690000000325", "Tuzlu Kraker", 600, 90),
    ("8690000000332", "Kek Kakaolu", 950, 70),
    ("8690000000349", "Kuruyemiş Karışık", 2000, 35),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,canteen_db=warn".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./canteen_dev.db");
    let mut with_sales = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--with-sales" | "-s" => {
                with_sales = true;
            }
            "--help" | "-h" => {
                println!("Canteen POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./canteen_dev.db)");
                println!("  -s, --with-sales   Also record sample sales for report testing");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Canteen POS Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Insert the catalog
    println!();
    println!("Inserting catalog...");

    let mut inserted = 0;
    for &(barcode, name, price_kurus, stock) in CATALOG {
        let product = Product::new(barcode, name, Money::from_kurus(price_kurus), stock)?;

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", barcode, e);
            continue;
        }

        inserted += 1;
    }

    println!("✓ Inserted {} products", inserted);

    // Record a few sales through the real checkout path, so stock
    // levels and the ledger are consistent.
    if with_sales {
        println!();
        println!("Recording sample sales...");

        let products = db.products().list_all().await?;
        let checkout = db.checkout();

        let mut recorded = 0;
        for (i, chunk) in products.chunks(3).take(5).enumerate() {
            let mut cart = Cart::new();
            for (j, product) in chunk.iter().enumerate() {
                cart.add_line(product, (i + j) as i64 % 3 + 1)?;
            }

            let receipt = checkout.confirm_sale(&cart).await?;
            println!(
                "  Sale #{}: {} lines, {}",
                receipt.sale_id, receipt.line_count, receipt.total
            );
            recorded += 1;
        }

        println!("✓ Recorded {} sales", recorded);

        // Verify the report path end to end
        println!();
        println!("Verifying report query...");
        let today = Local::now().date_naive();
        let rows = db.sales().aggregate_by_product(today, today).await?;
        println!("  Report for {}: {} product rows", today, rows.len());
        for row in rows.iter().take(3) {
            println!(
                "    {} × {} = {}",
                row.product_name, row.total_quantity, row.total_revenue
            );
        }
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
