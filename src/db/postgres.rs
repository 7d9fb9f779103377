use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{CatalogStore, InteractionStore},
    error::AppResult,
    models::{Interaction, NewInteraction, Product, ProductId},
};

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    category: String,
    price: f64,
    description: Option<String>,
    popularity: Option<f64>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            category: row.category,
            price: row.price,
            description: row.description.unwrap_or_default(),
            popularity: row.popularity.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InteractionRow {
    id: i64,
    user_id: String,
    product_id: i64,
    interaction_type: String,
    timestamp: DateTime<Utc>,
}

impl From<InteractionRow> for Interaction {
    fn from(row: InteractionRow) -> Self {
        Interaction {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            interaction_type: row.interaction_type.into(),
            timestamp: row.timestamp,
        }
    }
}

/// Catalog and interaction store backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgStore {
    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, category, price, description, popularity
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, id: ProductId) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, category, price, description, popularity
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }
}

#[async_trait::async_trait]
impl InteractionStore for PgStore {
    async fn interactions_for_user(&self, user_id: &str) -> AppResult<Vec<Interaction>> {
        let rows = sqlx::query_as::<_, InteractionRow>(
            r#"
            SELECT id, user_id, product_id, interaction_type, "timestamp"
            FROM user_interactions
            WHERE user_id = $1
            ORDER BY "timestamp", id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Interaction::from).collect())
    }

    async fn record_interaction(&self, interaction: NewInteraction) -> AppResult<Interaction> {
        let row = sqlx::query_as::<_, InteractionRow>(
            r#"
            INSERT INTO user_interactions (user_id, product_id, interaction_type, "timestamp")
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, product_id, interaction_type, "timestamp"
            "#,
        )
        .bind(&interaction.user_id)
        .bind(interaction.product_id)
        .bind(interaction.interaction_type.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete_interactions_for_user(&self, user_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM user_interactions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
