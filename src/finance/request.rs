// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::models::TransactionKind;

/// Raw submission as it arrives from the command line or an import row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionForm {
    pub kind: Option<String>,
    pub description: Option<String>,
    pub value: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub category_icon: Option<String>,
    pub counterparty: Option<String>,
    pub notes: Option<String>,
    pub recurring: bool,
    pub installments: Option<String>,
}

/// Validated fields shared by every request shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub description: String,
    pub value: Decimal,
    pub date: NaiveDate,
    pub category: String,
    pub category_icon: Option<String>,
    pub counterparty: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NewTransactionRequest {
    OneOff(TransactionDraft),
    Recurring(TransactionDraft),
    /// `installments` is always at least 2.
    Installment {
        draft: TransactionDraft,
        installments: u32,
    },
}

fn required<'a>(
    v: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match v.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ValidationError::Missing { field }),
    }
}

fn optional(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl TransactionForm {
    pub fn validate(&self) -> Result<NewTransactionRequest, ValidationError> {
        let kind = required(&self.kind, "type")?
            .parse::<TransactionKind>()
            .map_err(|reason| ValidationError::Invalid {
                field: "type",
                reason,
            })?;
        let description = required(&self.description, "description")?.to_string();

        let value_raw = required(&self.value, "value")?;
        let value = value_raw
            .parse::<Decimal>()
            .map_err(|_| ValidationError::Invalid {
                field: "value",
                reason: format!("'{}' is not a decimal", value_raw),
            })?;
        if value <= Decimal::ZERO {
            return Err(ValidationError::Invalid {
                field: "value",
                reason: format!("{} must be greater than zero", value),
            });
        }

        let date_raw = required(&self.date, "date")?;
        let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d").map_err(|_| {
            ValidationError::Invalid {
                field: "date",
                reason: format!("'{}', expected YYYY-MM-DD", date_raw),
            }
        })?;
        let category = required(&self.category, "category")?.to_string();

        let installments = match optional(&self.installments) {
            None => None,
            Some(raw) => {
                let n = raw.parse::<i64>().map_err(|_| ValidationError::Invalid {
                    field: "installments",
                    reason: format!("'{}' is not a whole number", raw),
                })?;
                if n <= 0 {
                    return Err(ValidationError::Invalid {
                        field: "installments",
                        reason: format!("{} must be at least 1", n),
                    });
                }
                let n = u32::try_from(n).map_err(|_| ValidationError::Invalid {
                    field: "installments",
                    reason: format!("{} is too large", n),
                })?;
                Some(n)
            }
        };

        let draft = TransactionDraft {
            kind,
            description,
            value,
            date,
            category,
            category_icon: optional(&self.category_icon),
            counterparty: optional(&self.counterparty),
            notes: optional(&self.notes),
        };

        match (self.recurring, installments) {
            (true, Some(n)) if n > 1 => Err(ValidationError::ConflictingModes),
            (true, _) => Ok(NewTransactionRequest::Recurring(draft)),
            (false, Some(n)) if n > 1 => Ok(NewTransactionRequest::Installment {
                draft,
                installments: n,
            }),
            (false, _) => Ok(NewTransactionRequest::OneOff(draft)),
        }
    }
}
