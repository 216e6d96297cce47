//! Process-lifetime employer storage.
//!
//! All records live in one `Vec` guarded by a single mutex. Operations are
//! short and never await, so a blocking lock is sufficient even on the
//! multi-threaded runtime.

use std::sync::{Mutex, MutexGuard};

use entity::{Employer, EmployerPatch, NewEmployer, seed_employers};
use thiserror::Error;
use tracing::debug;

/// Id handed out by a store created without any records.
pub const FIRST_ID: i32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("employer store lock poisoned")]
    Poisoned,
    #[error("employer id space exhausted")]
    IdSpaceExhausted,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
struct Records {
    rows: Vec<Employer>,
    /// `None` once `i32::MAX` has been handed out.
    next_id: Option<i32>,
}

#[derive(Debug)]
pub struct EmployerStore {
    inner: Mutex<Records>,
}

impl Default for EmployerStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl EmployerStore {
    /// Build a store over `rows`. New ids continue after the largest one present.
    pub fn new(rows: Vec<Employer>) -> Self {
        let next_id = rows
            .iter()
            .map(|row| row.id)
            .max()
            .map_or(Some(FIRST_ID), |max| max.checked_add(1));
        Self {
            inner: Mutex::new(Records { rows, next_id }),
        }
    }

    /// Store preloaded with the demo records (ids 100..=106).
    pub fn seeded() -> Self {
        Self::new(seed_employers())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Records>> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn get(&self, id: i32) -> StoreResult<Option<Employer>> {
        let records = self.lock()?;
        Ok(records.rows.iter().find(|row| row.id == id).cloned())
    }

    pub fn list(&self) -> StoreResult<Vec<Employer>> {
        Ok(self.lock()?.rows.clone())
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.rows.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn create(&self, input: NewEmployer) -> StoreResult<Employer> {
        let mut records = self.lock()?;
        let id = records.next_id.ok_or(StoreError::IdSpaceExhausted)?;
        records.next_id = id.checked_add(1);
        let employer = input.into_employer(id);
        records.rows.push(employer.clone());
        debug!(id, "employer created");
        Ok(employer)
    }

    /// Apply `patch` to the first record with `id`. `None` when nothing matched.
    pub fn update(&self, id: i32, patch: EmployerPatch) -> StoreResult<Option<Employer>> {
        let mut records = self.lock()?;
        let Some(row) = records.rows.iter_mut().find(|row| row.id == id) else {
            debug!(id, "update skipped; no such employer");
            return Ok(None);
        };
        patch.apply(row);
        debug!(id, "employer updated");
        Ok(Some(row.clone()))
    }

    /// Remove the first record with `id`, keeping the order of the rest.
    pub fn delete(&self, id: i32) -> StoreResult<Option<Employer>> {
        let mut records = self.lock()?;
        let Some(index) = records.rows.iter().position(|row| row.id == id) else {
            debug!(id, "delete skipped; no such employer");
            return Ok(None);
        };
        let removed = records.rows.remove(index);
        debug!(id, "employer deleted");
        Ok(Some(removed))
    }
}
