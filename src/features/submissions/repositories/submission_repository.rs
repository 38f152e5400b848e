use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{is_foreign_key_violation, unique_violation, AppError, Result};
use crate::features::products::models::Product;
use crate::features::submissions::models::{
    IntakeOutcome, NewIntake, PhotoWrite, Submission, SubmissionRow, SubmissionStatus,
    SubmissionWithProduct,
};
use crate::shared::constants::RETURNED_QUANTITY;

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>>;

    /// Resolve the product by name (creating it with `intake.sku` if absent)
    /// and insert the submission, all or nothing.
    ///
    /// `photo` is awaited only after the product is resolved and the
    /// submitter is known to exist; its failure aborts the intake. An SKU
    /// collision on creation is `InvalidProduct`; an unknown submitter is
    /// `NotFound`. Neither runs the photo write.
    async fn record_intake(&self, intake: NewIntake, photo: PhotoWrite) -> Result<IntakeOutcome>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SubmissionWithProduct>>;

    /// Every submission, newest first
    async fn list_all(&self) -> Result<Vec<SubmissionWithProduct>>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SubmissionWithProduct>>;

    /// Returns `false` if no submission has this id
    async fn update_status(&self, id: Uuid, status: SubmissionStatus) -> Result<bool>;
}

const LEDGER_SELECT: &str = r#"
    SELECT s.id, s.user_id, s.product_id, s.submitted_at, s.status,
           s.returned_quantity, s.photo_url, s.confidence,
           p.name AS product_name, p.sku AS product_sku,
           p.description AS product_description, p.created_at AS product_created_at
    FROM submissions s
    JOIN products p ON p.id = s.product_id
"#;

pub struct PgSubmissionRepository {
    pool: PgPool,
}

impl PgSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Serialize concurrent intakes of the same name, then re-read the
    /// product under the lock so only the first one creates it.
    async fn resolve_product(
        tx: &mut Transaction<'_, Postgres>,
        intake: &NewIntake,
    ) -> Result<(Product, bool)> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&intake.product_name)
            .execute(&mut **tx)
            .await?;

        let existing = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sku, description, created_at
            FROM products
            WHERE name = $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(&intake.product_name)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(product) = existing {
            return Ok((product, false));
        }

        let created = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, sku)
            VALUES ($1, $2)
            RETURNING id, name, sku, description, created_at
            "#,
        )
        .bind(&intake.product_name)
        .bind(&intake.sku)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => AppError::InvalidProduct(format!(
                "Could not create product '{}': SKU '{}' already exists",
                intake.product_name, intake.sku
            )),
            None => AppError::Database(e),
        })?;

        Ok((created, true))
    }
}

#[async_trait]
impl SubmissionRepository for PgSubmissionRepository {
    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sku, description, created_at
            FROM products
            WHERE name = $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find product by name: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn record_intake(&self, intake: NewIntake, photo: PhotoWrite) -> Result<IntakeOutcome> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start intake transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let (product, product_created) = Self::resolve_product(&mut tx, &intake).await?;

        // Key-share lock keeps the submitter from being deleted before commit
        let submitter = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE id = $1 FOR KEY SHARE",
        )
        .bind(intake.user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if submitter.is_none() {
            return Err(AppError::NotFound(format!(
                "User '{}' not found",
                intake.user_id
            )));
        }

        // Dropping `tx` on failure rolls the product back
        let photo_url = photo.await?;

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions
                (user_id, product_id, status, returned_quantity, photo_url, confidence)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, product_id, submitted_at, status,
                      returned_quantity, photo_url, confidence
            "#,
        )
        .bind(intake.user_id)
        .bind(product.id)
        .bind(intake.status)
        .bind(RETURNED_QUANTITY)
        .bind(&photo_url)
        .bind(intake.confidence)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::NotFound(format!("User '{}' not found", intake.user_id))
            } else {
                tracing::error!("Failed to insert submission: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit intake transaction: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(IntakeOutcome {
            submission,
            product,
            product_created,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SubmissionWithProduct>> {
        let sql = format!("{} WHERE s.id = $1", LEDGER_SELECT);
        let row = sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get submission: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(row.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<SubmissionWithProduct>> {
        let sql = format!("{} ORDER BY s.submitted_at DESC, s.id DESC", LEDGER_SELECT);
        let rows = sqlx::query_as::<_, SubmissionRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list submissions: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SubmissionWithProduct>> {
        let sql = format!(
            "{} WHERE s.user_id = $1 ORDER BY s.submitted_at DESC, s.id DESC",
            LEDGER_SELECT
        );
        let rows = sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list user submissions: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_status(&self, id: Uuid, status: SubmissionStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE submissions SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update submission status: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
