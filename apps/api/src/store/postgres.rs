//! Postgres-backed store. Each record is kept whole as a JSONB document next
//! to the few columns used for filtering and ordering. Schema: `migrations/`.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::payroll::models::{PayrollEntry, PayrollRun};
use crate::performance::models::PerformanceReview;
use crate::store::HrStore;
use crate::talent::models::Candidate;
use crate::workflow::{ProcessKind, ProcessRecord};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HrStore for PgStore {
    async fn insert_process(&self, record: &ProcessRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO processes (id, kind, subject_id, status, record, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(record.kind.as_str())
        .bind(&record.subject_id)
        .bind(record.status.as_str())
        .bind(Json(record))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        debug!("Inserted process {} ({})", record.id, record.kind.as_str());
        Ok(())
    }

    async fn get_process(&self, id: Uuid) -> Result<Option<ProcessRecord>> {
        let row: Option<Json<ProcessRecord>> =
            sqlx::query_scalar("SELECT record FROM processes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|Json(record)| record))
    }

    async fn update_process(&self, record: &ProcessRecord) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE processes SET status = $2, record = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(record.id)
        .bind(record.status.as_str())
        .bind(Json(record))
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_processes(&self, kind: ProcessKind) -> Result<Vec<ProcessRecord>> {
        let rows: Vec<Json<ProcessRecord>> = sqlx::query_scalar(
            "SELECT record FROM processes WHERE kind = $1 ORDER BY created_at ASC",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(r)| r).collect())
    }

    async fn list_candidates(&self) -> Result<Vec<Candidate>> {
        let rows: Vec<Json<Candidate>> =
            sqlx::query_scalar("SELECT record FROM candidates ORDER BY applied_at ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|Json(c)| c).collect())
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>> {
        let row: Option<Json<Candidate>> =
            sqlx::query_scalar("SELECT record FROM candidates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|Json(c)| c))
    }

    async fn insert_candidate(&self, candidate: &Candidate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO candidates (id, current_stage, record, applied_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(candidate.id)
        .bind(candidate.current_stage.as_str())
        .bind(Json(candidate))
        .bind(candidate.applied_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_candidate(&self, candidate: &Candidate) -> Result<bool> {
        let result =
            sqlx::query("UPDATE candidates SET current_stage = $2, record = $3 WHERE id = $1")
                .bind(candidate.id)
                .bind(candidate.current_stage.as_str())
                .bind(Json(candidate))
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_payroll_entries(&self) -> Result<Vec<PayrollEntry>> {
        let rows: Vec<Json<PayrollEntry>> =
            sqlx::query_scalar("SELECT record FROM payroll_entries ORDER BY employee_id ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|Json(e)| e).collect())
    }

    async fn upsert_payroll_entry(&self, entry: &PayrollEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payroll_entries (employee_id, record) VALUES ($1, $2)
            ON CONFLICT (employee_id) DO UPDATE SET record = EXCLUDED.record
            "#,
        )
        .bind(&entry.employee_id)
        .bind(Json(entry))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_payroll_runs(&self) -> Result<Vec<PayrollRun>> {
        let rows: Vec<Json<PayrollRun>> =
            sqlx::query_scalar("SELECT record FROM payroll_runs ORDER BY processed_at ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|Json(r)| r).collect())
    }

    async fn insert_payroll_run(&self, run: &PayrollRun) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO payroll_runs (id, period, record, processed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (period) DO NOTHING
            "#,
        )
        .bind(run.id)
        .bind(&run.period)
        .bind(Json(run))
        .bind(run.processed_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_reviews(&self) -> Result<Vec<PerformanceReview>> {
        let rows: Vec<Json<PerformanceReview>> = sqlx::query_scalar(
            "SELECT record FROM performance_reviews ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(r)| r).collect())
    }

    async fn insert_review(&self, review: &PerformanceReview) -> Result<()> {
        sqlx::query(
            "INSERT INTO performance_reviews (id, employee_id, record, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(review.id)
        .bind(&review.employee_id)
        .bind(Json(review))
        .bind(review.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
