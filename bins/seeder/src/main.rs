//! Development data seeder.
//!
//! Seeds an admin login, the product catalogue and one demo supplier.
//! Running it twice skips whatever already exists.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use tealeaf_core::{auth::hash_password, order::ProductKind, registry::RegisterCode};
use tealeaf_db::repositories::{
    AccountRepository, CreateProductInput, ProductError, ProductRepository,
    RegisterSupplierInput,
};

/// Demo supplier register code.
const DEMO_SUPPLIER: &str = "SUP-001";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    println!("Connecting to database...");
    let db = Arc::new(
        tealeaf_db::connect(&database_url)
            .await
            .context("Failed to connect to database")?,
    );

    println!("Seeding admin account...");
    seed_admin(&db).await?;

    println!("Seeding products...");
    seed_products(&db).await?;

    println!("Seeding demo supplier...");
    seed_supplier(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_admin(db: &Arc<DatabaseConnection>) -> anyhow::Result<()> {
    let login = std::env::var("SEED_ADMIN_LOGIN").unwrap_or_else(|_| "admin".to_string());
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin-password".to_string());
    let accounts = AccountRepository::new(Arc::clone(db));

    if accounts.find_by_login(&login).await?.is_some() {
        println!("  Admin {login} already exists, skipping...");
        return Ok(());
    }

    accounts.create_admin(&login, hash_password(&password)?).await?;
    println!("  Created admin {login}");
    Ok(())
}

async fn seed_products(db: &Arc<DatabaseConnection>) -> anyhow::Result<()> {
    let products = ProductRepository::new(Arc::clone(db));
    let catalogue = [
        ("Urea 50kg", ProductKind::Fertilizer, dec!(4500), 200),
        ("T200 Tea Fertilizer 50kg", ProductKind::Fertilizer, dec!(5200), 150),
        ("Dolomite 25kg", ProductKind::Fertilizer, dec!(1200), 80),
        ("BOPF Tea Packet 1kg", ProductKind::TeaPacket, dec!(1800), 500),
    ];

    for (name, kind, rate_per_bag, stock_bags) in catalogue {
        let input = CreateProductInput {
            name: name.to_string(),
            kind,
            rate_per_bag,
            stock_bags,
        };
        match products.create(input).await {
            Ok(product) => println!("  Created {} ({})", product.name, product.id),
            Err(ProductError::DuplicateName(_)) => println!("  {name} already exists, skipping..."),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

async fn seed_supplier(db: &Arc<DatabaseConnection>) -> anyhow::Result<()> {
    let accounts = AccountRepository::new(Arc::clone(db));

    if accounts.find_by_login(DEMO_SUPPLIER).await?.is_some() {
        println!("  Supplier {DEMO_SUPPLIER} already exists, skipping...");
        return Ok(());
    }

    let input = RegisterSupplierInput {
        code: RegisterCode::parse(DEMO_SUPPLIER)?,
        name: "Demo Estate".to_string(),
        phone: Some("0771234567".to_string()),
        address: Some("Nuwara Eliya".to_string()),
        bank_name: None,
        bank_account_no: None,
        bank_branch: None,
        password_hash: hash_password("green-leaf-2024")?,
    };
    let (supplier, _) = accounts.register_supplier(input).await?;
    println!("  Created supplier {} ({})", supplier.id, supplier.name);
    Ok(())
}
