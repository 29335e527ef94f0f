// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::models::TransactionStatus;

/// Rejections raised while turning a submitted form into a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field '{field}'")]
    Missing { field: &'static str },
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("a transaction cannot be both recurring and split into installments")]
    ConflictingModes,
}

impl ValidationError {
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::Missing { field } | ValidationError::Invalid { field, .. } => {
                Some(*field)
            }
            ValidationError::ConflictingModes => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transaction {0} not found")]
    NotFound(i64),
    #[error("cannot move transaction {id} from {from} to {to}")]
    InvalidTransition {
        id: i64,
        from: TransactionStatus,
        to: TransactionStatus,
    },
    #[error("write failed: {0}")]
    WriteFailed(#[from] rusqlite::Error),
}
