//! Catalog seeding command.
//!
//! Inserts the starter lineup of Irish music CDs. Refuses to run against a
//! non-empty catalog unless `--force` is given, so a stray invocation never
//! duplicates the live inventory.

use rust_decimal_macros::dec;
use tracing::info;

use gilsenan_storefront::db::{ProductRepository, create_pool};
use gilsenan_storefront::models::NewProduct;

use super::{CommandError, database_url};

fn starter_catalog() -> Vec<NewProduct> {
    vec![
        NewProduct {
            title: "The Best of Irish Country".to_string(),
            artist: "Various Artists".to_string(),
            description: Some(
                "A collection of Ireland's finest country music spanning four decades".to_string(),
            ),
            price: dec!(15.99),
            category: "Irish Country".to_string(),
            stock: 10,
            featured: true,
            image_url: None,
        },
        NewProduct {
            title: "Traditional Irish Fiddle Music".to_string(),
            artist: "Kevin Burke".to_string(),
            description: Some("Authentic fiddle tunes from County Sligo".to_string()),
            price: dec!(18.99),
            category: "Traditional".to_string(),
            stock: 5,
            featured: true,
            image_url: None,
        },
        NewProduct {
            title: "Celtic Folk Tales".to_string(),
            artist: "The Dubliners".to_string(),
            description: Some("Stories and songs from the heart of Dublin".to_string()),
            price: dec!(16.99),
            category: "Folk".to_string(),
            stock: 8,
            featured: false,
            image_url: None,
        },
        NewProduct {
            title: "Songs of Kells".to_string(),
            artist: "Meath Traditional Ensemble".to_string(),
            description: Some("Music from George's hometown in County Meath".to_string()),
            price: dec!(19.99),
            category: "Traditional".to_string(),
            stock: 3,
            featured: true,
            image_url: None,
        },
        NewProduct {
            title: "Wexford Melodies".to_string(),
            artist: "Coastal Irish Band".to_string(),
            description: Some("Beautiful sounds from Ireland's Ancient East".to_string()),
            price: dec!(17.50),
            category: "Folk".to_string(),
            stock: 7,
            featured: false,
            image_url: None,
        },
    ]
}

/// Seed the catalog with the starter products.
///
/// # Errors
///
/// Returns an error if the database URL is missing or an insert fails.
pub async fn run(force: bool) -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!("Connecting to storefront database...");
    let pool = create_pool(&database_url).await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if existing > 0 && !force {
        info!(existing, "catalog is not empty; pass --force to seed anyway");
        return Ok(());
    }

    let repository = ProductRepository::new(&pool);
    for product in starter_catalog() {
        let created = repository.create(&product).await?;
        info!(id = %created.id, title = %created.title, "seeded product");
    }

    info!("Added sample Irish music products!");
    Ok(())
}
