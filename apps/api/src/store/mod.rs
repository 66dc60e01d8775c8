//! Record storage, pluggable behind [`HrStore`].
//!
//! `AppState` holds an `Arc<dyn HrStore>`: [`MemoryStore`] by default, [`PgStore`]
//! when `DATABASE_URL` is configured. Writes are last-writer-wins with no
//! transactions across calls.

use async_trait::async_trait;
use anyhow::Result;
use uuid::Uuid;

use crate::payroll::models::{PayrollEntry, PayrollRun};
use crate::performance::models::PerformanceReview;
use crate::talent::models::Candidate;
use crate::workflow::{ProcessKind, ProcessRecord};

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait HrStore: Send + Sync {
    async fn insert_process(&self, record: &ProcessRecord) -> Result<()>;
    async fn get_process(&self, id: Uuid) -> Result<Option<ProcessRecord>>;
    /// Replaces a stored record. Returns false when the id is unknown.
    async fn update_process(&self, record: &ProcessRecord) -> Result<bool>;
    /// Records of one kind, oldest first.
    async fn list_processes(&self, kind: ProcessKind) -> Result<Vec<ProcessRecord>>;

    /// All candidates, oldest application first.
    async fn list_candidates(&self) -> Result<Vec<Candidate>>;
    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>>;
    async fn insert_candidate(&self, candidate: &Candidate) -> Result<()>;
    async fn update_candidate(&self, candidate: &Candidate) -> Result<bool>;

    async fn list_payroll_entries(&self) -> Result<Vec<PayrollEntry>>;
    async fn upsert_payroll_entry(&self, entry: &PayrollEntry) -> Result<()>;
    /// Runs ordered by processing time, oldest first.
    async fn list_payroll_runs(&self) -> Result<Vec<PayrollRun>>;
    /// Stores a run unless one already exists for its period. Returns false
    /// (and stores nothing) when the period is taken.
    async fn insert_payroll_run(&self, run: &PayrollRun) -> Result<bool>;

    async fn list_reviews(&self) -> Result<Vec<PerformanceReview>>;
    async fn insert_review(&self, review: &PerformanceReview) -> Result<()>;
}
