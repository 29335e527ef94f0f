// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::Months;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use super::request::{NewTransactionRequest, TransactionDraft};
use crate::models::{InstallmentInfo, NewTransaction, TransactionStatus};

fn record(draft: &TransactionDraft, is_recurring: bool) -> NewTransaction {
    NewTransaction {
        kind: draft.kind,
        description: draft.description.clone(),
        value: draft.value,
        date: draft.date,
        category: draft.category.clone(),
        category_icon: draft.category_icon.clone(),
        counterparty: draft.counterparty.clone(),
        notes: draft.notes.clone(),
        is_recurring,
        installment: None,
        status: TransactionStatus::Pending,
    }
}

/// Records to persist for `request`, with a fresh group id for
/// installment splits.
pub fn materialize(request: &NewTransactionRequest) -> Result<Vec<NewTransaction>> {
    materialize_with_group(request, &Uuid::new_v4().to_string())
}

/// Like [`materialize`], with the installment group id supplied.
///
/// Each installment carries `value / n` as is; no remainder is moved
/// between siblings, so their sum may differ from the total in the last
/// decimal places.
pub fn materialize_with_group(
    request: &NewTransactionRequest,
    group_id: &str,
) -> Result<Vec<NewTransaction>> {
    match request {
        NewTransactionRequest::OneOff(draft) => Ok(vec![record(draft, false)]),
        NewTransactionRequest::Recurring(draft) => Ok(vec![record(draft, true)]),
        NewTransactionRequest::Installment {
            draft,
            installments,
        } => {
            let n = *installments;
            if n < 2 {
                return Ok(vec![record(draft, false)]);
            }
            let per_installment = draft.value / Decimal::from(n);
            debug!(
                "Splitting {} into {} installments of {} (group {})",
                draft.value, n, per_installment, group_id
            );
            (0..n)
                .map(|i| {
                    let date = draft.date.checked_add_months(Months::new(i)).ok_or_else(|| {
                        anyhow!("Installment {} of {} falls outside the calendar", i + 1, n)
                    })?;
                    let mut rec = record(draft, false);
                    rec.date = date;
                    rec.value = per_installment;
                    rec.installment = Some(InstallmentInfo {
                        installments: n,
                        installment_number: i + 1,
                        group_id: group_id.to_string(),
                        total_value: draft.value,
                    });
                    Ok(rec)
                })
                .collect()
        }
    }
}
