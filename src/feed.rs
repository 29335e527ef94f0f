// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Polling replacement for push-based live queries.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, trace};

use crate::models::Transaction;
use crate::store::TransactionStore;

pub struct SnapshotFeed {
    owner: String,
    last: Option<Vec<Transaction>>,
}

impl SnapshotFeed {
    pub fn new(owner: impl Into<String>) -> Self {
        SnapshotFeed {
            owner: owner.into(),
            last: None,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Fresh snapshot if anything changed since the last poll. The first
    /// poll always yields.
    pub fn poll<S: TransactionStore + ?Sized>(&mut self, store: &S) -> Result<Option<Vec<Transaction>>> {
        let snapshot = store.transactions_for(&self.owner)?;
        if self.last.as_ref() == Some(&snapshot) {
            trace!("No changes for {}", self.owner);
            return Ok(None);
        }
        debug!("New snapshot for {} ({} records)", self.owner, snapshot.len());
        self.last = Some(snapshot.clone());
        Ok(Some(snapshot))
    }

    /// Polls `ticks` times (forever when `None`), sleeping `interval`
    /// between polls, and hands every fresh snapshot to `on_change`.
    pub fn watch<S, F>(
        &mut self,
        store: &S,
        interval: Duration,
        ticks: Option<usize>,
        mut on_change: F,
    ) -> Result<()>
    where
        S: TransactionStore + ?Sized,
        F: FnMut(&[Transaction]) -> Result<()>,
    {
        let mut done = 0usize;
        loop {
            if let Some(snapshot) = self.poll(store)? {
                on_change(&snapshot)?;
            }
            done += 1;
            if ticks.is_some_and(|t| done >= t) {
                return Ok(());
            }
            thread::sleep(interval);
        }
    }
}
