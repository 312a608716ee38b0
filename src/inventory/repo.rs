use axum::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::repo_types::{Classification, NewVehicle, Vehicle};
use super::sort::{order_by, SortKey};
use crate::db::RepoResult;

const VEHICLE_COLUMNS: &str = "inv_id, inv_make, inv_model, inv_year, inv_description, \
     inv_image, inv_thumbnail, inv_price, inv_miles, inv_color, classification_id";

#[async_trait]
pub trait InventoryRepo: Send + Sync {
    /// Every classification, ordered by name.
    async fn list_classifications(&self) -> RepoResult<Vec<Classification>>;
    async fn find_classification(&self, classification_id: i32)
        -> RepoResult<Option<Classification>>;
    async fn classification_exists(&self, name: &str) -> RepoResult<bool>;
    async fn create_classification(&self, name: &str) -> RepoResult<Classification>;
    async fn list_by_classification(
        &self,
        classification_id: i32,
        sort: &[SortKey],
    ) -> RepoResult<Vec<Vehicle>>;
    async fn find_vehicle(&self, inv_id: i32) -> RepoResult<Option<Vehicle>>;
    async fn create_vehicle(&self, vehicle: NewVehicle) -> RepoResult<Vehicle>;
}

#[derive(Clone)]
pub struct PgInventoryRepo {
    db: PgPool,
}

impl PgInventoryRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventoryRepo for PgInventoryRepo {
    async fn list_classifications(&self) -> RepoResult<Vec<Classification>> {
        let rows = sqlx::query_as::<_, Classification>(
            "SELECT classification_id, classification_name FROM classification ORDER BY classification_name",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_classification(
        &self,
        classification_id: i32,
    ) -> RepoResult<Option<Classification>> {
        let row = sqlx::query_as::<_, Classification>(
            "SELECT classification_id, classification_name FROM classification WHERE classification_id = $1",
        )
        .bind(classification_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn classification_exists(&self, name: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM classification WHERE classification_name = $1)",
        )
        .bind(name)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }

    async fn create_classification(&self, name: &str) -> RepoResult<Classification> {
        let row = sqlx::query_as::<_, Classification>(
            r#"
            INSERT INTO classification (classification_name)
            VALUES ($1)
            RETURNING classification_id, classification_name
            "#,
        )
        .bind(name)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn list_by_classification(
        &self,
        classification_id: i32,
        sort: &[SortKey],
    ) -> RepoResult<Vec<Vehicle>> {
        // ORDER BY terms come from the closed SortKey set, never from input.
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        qb.push(VEHICLE_COLUMNS)
            .push(" FROM inventory WHERE classification_id = ")
            .push_bind(classification_id)
            .push(" ORDER BY ")
            .push(order_by(sort));
        let rows = qb.build_query_as::<Vehicle>().fetch_all(&self.db).await?;
        Ok(rows)
    }

    async fn find_vehicle(&self, inv_id: i32) -> RepoResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM inventory WHERE inv_id = $1"
        ))
        .bind(inv_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create_vehicle(&self, v: NewVehicle) -> RepoResult<Vehicle> {
        let row = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            INSERT INTO inventory (inv_make, inv_model, inv_year, inv_description, inv_image,
                                   inv_thumbnail, inv_price, inv_miles, inv_color,
                                   classification_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(&v.make)
        .bind(&v.model)
        .bind(v.year)
        .bind(&v.description)
        .bind(&v.image)
        .bind(&v.thumbnail)
        .bind(v.price)
        .bind(v.miles)
        .bind(&v.color)
        .bind(v.classification_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }
}
