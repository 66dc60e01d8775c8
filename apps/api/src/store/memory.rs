use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::payroll::models::{PayrollEntry, PayrollRun};
use crate::performance::models::PerformanceReview;
use crate::store::HrStore;
use crate::talent::models::Candidate;
use crate::workflow::{ProcessKind, ProcessRecord};

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    processes: RwLock<HashMap<Uuid, ProcessRecord>>,
    candidates: RwLock<HashMap<Uuid, Candidate>>,
    payroll_entries: RwLock<Vec<PayrollEntry>>,
    payroll_runs: RwLock<Vec<PayrollRun>>,
    reviews: RwLock<Vec<PerformanceReview>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HrStore for MemoryStore {
    async fn insert_process(&self, record: &ProcessRecord) -> Result<()> {
        self.processes
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn get_process(&self, id: Uuid) -> Result<Option<ProcessRecord>> {
        Ok(self.processes.read().await.get(&id).cloned())
    }

    async fn update_process(&self, record: &ProcessRecord) -> Result<bool> {
        let mut processes = self.processes.write().await;
        match processes.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_processes(&self, kind: ProcessKind) -> Result<Vec<ProcessRecord>> {
        let mut records: Vec<_> = self
            .processes
            .read()
            .await
            .values()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn list_candidates(&self) -> Result<Vec<Candidate>> {
        let mut candidates: Vec<_> = self.candidates.read().await.values().cloned().collect();
        candidates.sort_by_key(|c| c.applied_at);
        Ok(candidates)
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>> {
        Ok(self.candidates.read().await.get(&id).cloned())
    }

    async fn insert_candidate(&self, candidate: &Candidate) -> Result<()> {
        self.candidates
            .write()
            .await
            .insert(candidate.id, candidate.clone());
        Ok(())
    }

    async fn update_candidate(&self, candidate: &Candidate) -> Result<bool> {
        let mut candidates = self.candidates.write().await;
        match candidates.get_mut(&candidate.id) {
            Some(existing) => {
                *existing = candidate.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_payroll_entries(&self) -> Result<Vec<PayrollEntry>> {
        Ok(self.payroll_entries.read().await.clone())
    }

    async fn upsert_payroll_entry(&self, entry: &PayrollEntry) -> Result<()> {
        let mut entries = self.payroll_entries.write().await;
        match entries
            .iter_mut()
            .find(|e| e.employee_id == entry.employee_id)
        {
            Some(existing) => *existing = entry.clone(),
            None => entries.push(entry.clone()),
        }
        Ok(())
    }

    async fn list_payroll_runs(&self) -> Result<Vec<PayrollRun>> {
        Ok(self.payroll_runs.read().await.clone())
    }

    async fn insert_payroll_run(&self, run: &PayrollRun) -> Result<bool> {
        let mut runs = self.payroll_runs.write().await;
        if runs.iter().any(|r| r.period == run.period) {
            return Ok(false);
        }
        runs.push(run.clone());
        Ok(true)
    }

    async fn list_reviews(&self) -> Result<Vec<PerformanceReview>> {
        Ok(self.reviews.read().await.clone())
    }

    async fn insert_review(&self, review: &PerformanceReview) -> Result<()> {
        self.reviews.write().await.push(review.clone());
        Ok(())
    }
}
