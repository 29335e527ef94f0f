// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence boundary for transactions and monthly goals.
//!
//! Everything is scoped by `owner`, the identity of the current user.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::models::{
    InstallmentInfo, MonthlyGoal, NewTransaction, Transaction, TransactionKind, TransactionStatus,
};

pub trait TransactionStore {
    fn transactions_for(&self, owner: &str) -> Result<Vec<Transaction>>;

    fn transactions_in_group(&self, owner: &str, group_id: &str) -> Result<Vec<Transaction>>;

    /// Persists all of `records` or none of them. Returns the new ids in
    /// input order.
    fn insert_batch(&mut self, owner: &str, records: &[NewTransaction]) -> Result<Vec<i64>>;

    fn update_status(&mut self, owner: &str, id: i64, status: TransactionStatus) -> Result<()>;

    fn update_value(&mut self, owner: &str, id: i64, value: Decimal) -> Result<()>;

    fn monthly_goal(&self, owner: &str, month: &str) -> Result<Option<Decimal>>;

    fn set_monthly_goal(&mut self, owner: &str, month: &str, value: Decimal) -> Result<()>;

    fn monthly_goals(&self, owner: &str) -> Result<Vec<MonthlyGoal>>;
}

const SELECT_COLUMNS: &str = "SELECT id, owner, kind, description, value, date, category, category_icon, \
     counterparty, notes, is_recurring, installments, installment_number, group_id, total_value, status \
     FROM transactions";

struct RawRow {
    id: i64,
    owner: String,
    kind: String,
    description: String,
    value: String,
    date: String,
    category: String,
    category_icon: Option<String>,
    counterparty: Option<String>,
    notes: Option<String>,
    is_recurring: bool,
    installments: Option<u32>,
    installment_number: Option<u32>,
    group_id: Option<String>,
    total_value: Option<String>,
    status: String,
}

impl RawRow {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<RawRow> {
        Ok(RawRow {
            id: r.get(0)?,
            owner: r.get(1)?,
            kind: r.get(2)?,
            description: r.get(3)?,
            value: r.get(4)?,
            date: r.get(5)?,
            category: r.get(6)?,
            category_icon: r.get(7)?,
            counterparty: r.get(8)?,
            notes: r.get(9)?,
            is_recurring: r.get(10)?,
            installments: r.get(11)?,
            installment_number: r.get(12)?,
            group_id: r.get(13)?,
            total_value: r.get(14)?,
            status: r.get(15)?,
        })
    }

    fn into_transaction(self) -> Result<Transaction> {
        let id = self.id;
        let kind = self
            .kind
            .parse::<TransactionKind>()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Transaction {}", id))?;
        let status = self
            .status
            .parse::<TransactionStatus>()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Transaction {}", id))?;
        let value = self
            .value
            .parse::<Decimal>()
            .with_context(|| format!("Invalid value '{}' in transaction {}", self.value, id))?;
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' in transaction {}", self.date, id))?;
        let installment = match (
            self.installments,
            self.installment_number,
            self.group_id,
            self.total_value,
        ) {
            (Some(installments), Some(installment_number), Some(group_id), Some(total)) => {
                let total_value = total.parse::<Decimal>().with_context(|| {
                    format!("Invalid total value '{}' in transaction {}", total, id)
                })?;
                Some(InstallmentInfo {
                    installments,
                    installment_number,
                    group_id,
                    total_value,
                })
            }
            _ => None,
        };
        Ok(Transaction {
            id,
            owner: self.owner,
            kind,
            description: self.description,
            value,
            date,
            category: self.category,
            category_icon: self.category_icon,
            counterparty: self.counterparty,
            notes: self.notes,
            is_recurring: self.is_recurring,
            installment,
            status,
        })
    }
}

fn query_transactions(
    conn: &Connection,
    filter: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Transaction>> {
    let sql = format!("{} WHERE {} ORDER BY date, id", SELECT_COLUMNS, filter);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(args, RawRow::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?.into_transaction()?);
    }
    Ok(out)
}

fn current_status(conn: &Connection, owner: &str, id: i64) -> Result<TransactionStatus> {
    let s: Option<String> = conn
        .query_row(
            "SELECT status FROM transactions WHERE id=?1 AND owner=?2",
            params![id, owner],
            |r| r.get(0),
        )
        .optional()?;
    let s = s.ok_or(StoreError::NotFound(id))?;
    s.parse::<TransactionStatus>()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Transaction {}", id))
}

fn insert_all(conn: &mut Connection, owner: &str, records: &[NewTransaction]) -> rusqlite::Result<Vec<i64>> {
    let tx = conn.transaction()?;
    let mut ids = Vec::with_capacity(records.len());
    {
        let mut stmt = tx.prepare(
            "INSERT INTO transactions(owner, kind, description, value, date, category, category_icon, \
             counterparty, notes, is_recurring, installments, installment_number, group_id, total_value, status) \
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15)",
        )?;
        for rec in records {
            let inst = rec.installment.as_ref();
            stmt.execute(params![
                owner,
                rec.kind.as_str(),
                rec.description,
                rec.value.to_string(),
                rec.date.to_string(),
                rec.category,
                rec.category_icon,
                rec.counterparty,
                rec.notes,
                rec.is_recurring,
                inst.map(|i| i.installments),
                inst.map(|i| i.installment_number),
                inst.map(|i| i.group_id.as_str()),
                inst.map(|i| i.total_value.to_string()),
                rec.status.as_str(),
            ])?;
            ids.push(tx.last_insert_rowid());
        }
    }
    tx.commit()?;
    Ok(ids)
}

impl TransactionStore for Connection {
    fn transactions_for(&self, owner: &str) -> Result<Vec<Transaction>> {
        query_transactions(self, "owner=?1", &[&owner])
    }

    fn transactions_in_group(&self, owner: &str, group_id: &str) -> Result<Vec<Transaction>> {
        query_transactions(self, "owner=?1 AND group_id=?2", &[&owner, &group_id])
    }

    fn insert_batch(&mut self, owner: &str, records: &[NewTransaction]) -> Result<Vec<i64>> {
        let ids = insert_all(self, owner, records).map_err(StoreError::WriteFailed)?;
        info!("Persisted {} transaction(s) for {}", ids.len(), owner);
        Ok(ids)
    }

    fn update_status(&mut self, owner: &str, id: i64, status: TransactionStatus) -> Result<()> {
        let tx = self.transaction()?;
        let from = current_status(&tx, owner, id)?;
        if !from.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                id,
                from,
                to: status,
            }
            .into());
        }
        if from != status {
            tx.execute(
                "UPDATE transactions SET status=?1 WHERE id=?2 AND owner=?3",
                params![status.as_str(), id, owner],
            )
            .map_err(StoreError::WriteFailed)?;
            debug!("Transaction {} moved from {} to {}", id, from, status);
        }
        tx.commit().map_err(StoreError::WriteFailed)?;
        Ok(())
    }

    fn update_value(&mut self, owner: &str, id: i64, value: Decimal) -> Result<()> {
        let n = self
            .execute(
                "UPDATE transactions SET value=?1 WHERE id=?2 AND owner=?3",
                params![value.to_string(), id, owner],
            )
            .map_err(StoreError::WriteFailed)?;
        if n == 0 {
            return Err(StoreError::NotFound(id).into());
        }
        Ok(())
    }

    fn monthly_goal(&self, owner: &str, month: &str) -> Result<Option<Decimal>> {
        let v: Option<String> = self
            .query_row(
                "SELECT value FROM monthly_goals WHERE owner=?1 AND month=?2",
                params![owner, month],
                |r| r.get(0),
            )
            .optional()?;
        match v {
            Some(s) => Ok(Some(s.parse::<Decimal>().with_context(|| {
                format!("Invalid goal '{}' for {}", s, month)
            })?)),
            None => Ok(None),
        }
    }

    fn set_monthly_goal(&mut self, owner: &str, month: &str, value: Decimal) -> Result<()> {
        self.execute(
            "INSERT INTO monthly_goals(owner, month, value) VALUES (?1,?2,?3)
             ON CONFLICT(owner, month) DO UPDATE SET value=excluded.value",
            params![owner, month, value.to_string()],
        )
        .map_err(StoreError::WriteFailed)?;
        Ok(())
    }

    fn monthly_goals(&self, owner: &str) -> Result<Vec<MonthlyGoal>> {
        let mut stmt =
            self.prepare("SELECT month, value FROM monthly_goals WHERE owner=?1 ORDER BY month DESC")?;
        let rows = stmt.query_map(params![owner], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (month, v) = row?;
            let value = v
                .parse::<Decimal>()
                .with_context(|| format!("Invalid goal '{}' for {}", v, month))?;
            out.push(MonthlyGoal { month, value });
        }
        Ok(out)
    }
}
