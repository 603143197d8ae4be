//! # Seed Data Generator
//!
//! Loads a demo gastrobar menu for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p gastro-db --bin seed
//!
//! # Specify database path
//! cargo run -p gastro-db --bin seed -- --db ./data/gastro.db
//! ```
//!
//! ## Generated Data
//! - Ingredients with stock (a couple marked insuficiente)
//! - Beers and cocktails linked to their ingredients
//! - The "Adiciones" catalog
//! - One provider with an opening invoice
//! - A weekly Wednesday alert

use std::env;

use gastro_core::{
    AlertInput, IngredientInput, Money, MovementInput, MovementType, ProductIngredientInput,
    ProductInput, ProviderInput, QuantityInput, ADDITIONS_CATEGORY,
};
use gastro_db::{Database, DbConfig};

/// (name, unit, price, stock); `None` stock is insuficiente.
const INGREDIENTS: &[(&str, &str, i64, Option<f64>)] = &[
    ("Club Colombia botella", "botella", 3_200, Some(48.0)),
    ("Aguila botella", "botella", 2_800, Some(36.0)),
    ("Ron blanco", "ml", 60, Some(3_000.0)),
    ("Limon", "und", 300, None),
    ("Hierbabuena", "atado", 1_500, Some(4.0)),
    ("Pan brioche", "und", 1_200, Some(30.0)),
    ("Carne de res", "g", 35, Some(5_000.0)),
    ("Queso cheddar", "tajada", 700, None),
];

/// (name, category, price, [(ingredient, quantity)])
const PRODUCTS: &[(&str, &str, i64, &[(&str, f64)])] = &[
    ("Club Colombia", "Cervezas", 8_000, &[("Club Colombia botella", 1.0)]),
    ("Aguila", "Cervezas", 7_000, &[("Aguila botella", 1.0)]),
    (
        "Mojito",
        "Cocteles",
        22_000,
        &[("Ron blanco", 60.0), ("Limon", 1.0), ("Hierbabuena", 0.2)],
    ),
    (
        "Hamburguesa de la casa",
        "Platos",
        28_000,
        &[("Pan brioche", 1.0), ("Carne de res", 180.0), ("Queso cheddar", 2.0)],
    ),
    ("Queso extra", ADDITIONS_CATEGORY, 3_000, &[("Queso cheddar", 1.0)]),
    ("Tocineta", ADDITIONS_CATEGORY, 4_000, &[]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = "./gastro_dev.db".to_string();

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
                println!("Gastrobar POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./gastro_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Gastrobar POS Seed Data Generator");
    println!("====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Ingredients
    let mut ingredient_ids = Vec::with_capacity(INGREDIENTS.len());
    for (name, unit, price, stock) in INGREDIENTS {
        let ingredient = db
            .ingredients()
            .create(&IngredientInput {
                name: name.to_string(),
                description: None,
                quantity: Some(match stock {
                    Some(qty) => QuantityInput::Number(*qty),
                    None => QuantityInput::Text("insuficiente".to_string()),
                }),
                price: Money::from_pesos(*price),
                unit: unit.to_string(),
            })
            .await?;
        ingredient_ids.push((*name, ingredient.id));
    }
    println!("✓ {} ingredients", ingredient_ids.len());

    let ingredient_id = |name: &str| {
        ingredient_ids
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, id)| id.clone())
    };

    // Products
    for (name, category, price, recipe) in PRODUCTS {
        let ingredients = recipe
            .iter()
            .filter_map(|(ingredient, quantity)| {
                ingredient_id(*ingredient).map(|id| ProductIngredientInput {
                    ingredient_id: id,
                    quantity: *quantity,
                })
            })
            .collect();

        if let Err(e) = db
            .products()
            .create(&ProductInput {
                name: name.to_string(),
                description: None,
                price: Money::from_pesos(*price),
                category: category.to_string(),
                ingredients,
            })
            .await
        {
            eprintln!("Failed to insert {}: {}", name, e);
        }
    }
    println!("✓ {} products", db.products().count().await?);

    // Provider with an opening invoice
    let provider = db
        .providers()
        .create(&ProviderInput {
            name: "Distribuidora Andina".to_string(),
            description: Some("Cervezas y licores".to_string()),
            account_number: Some("Bancolombia 123-456789-00".to_string()),
            phone: Some("+57 300 123 4567".to_string()),
        })
        .await?;

    let supplied: Vec<String> = ["Club Colombia botella", "Aguila botella", "Ron blanco", "Limon"]
        .iter()
        .filter_map(|name| ingredient_id(*name))
        .collect();
    db.providers().set_ingredients(&provider.id, &supplied).await?;

    db.providers()
        .record_movement(&MovementInput {
            provider_id: provider.id.clone(),
            movement_type: MovementType::Invoice,
            amount: Money::from_pesos(450_000),
            description: Some("Factura inicial".to_string()),
            image_url: None,
            occurred_at: None,
        })
        .await?;
    println!("✓ Provider '{}' with opening invoice", provider.name);

    db.alerts()
        .create(&AlertInput {
            title: "Pedir hielo".to_string(),
            description: Some("Confirmar pedido para el fin de semana".to_string()),
            alert_time: None,
            repeat_weekly: true,
            repeat_day: Some(3),
        })
        .await?;
    println!("✓ Weekly alert (Wednesday)");

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
