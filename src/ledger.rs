// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed ledger.
//!
//! Amounts live in TEXT columns and are summed as `Decimal` here rather than
//! by SQLite, which would go through REAL.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Bucket, CategoryMapping, Recurrence, RecurringObligation, SummaryEntry, Transaction,
};
use crate::period::Grouping;
use crate::store::LedgerStore;

const OBLIGATION_COLUMNS: &str =
    "id, description, amount, income, recurrence, influence, influence_year";
const TRANSACTION_COLUMNS: &str = "id, date, description, amount, income";

pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

fn parse_amount(s: &str) -> EngineResult<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|source| EngineError::InvalidAmount {
            value: s.to_string(),
            source,
        })
}

fn parse_day(s: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|source| EngineError::InvalidDate {
        value: s.to_string(),
        source,
    })
}

fn checked_sum(acc: Decimal, amount: Decimal) -> EngineResult<Decimal> {
    acc.checked_add(amount)
        .ok_or(EngineError::Overflow("summing amounts"))
}

fn sum_amounts(amounts: Vec<String>) -> EngineResult<Decimal> {
    amounts
        .iter()
        .try_fold(Decimal::ZERO, |acc, a| checked_sum(acc, parse_amount(a)?))
}

/// Sums `(key, amount)` rows per key, in key order.
fn sum_by_key(rows: Vec<(String, String)>) -> EngineResult<BTreeMap<String, Decimal>> {
    let mut agg: BTreeMap<String, Decimal> = BTreeMap::new();
    for (key, amount) in rows {
        let slot = agg.entry(key).or_insert(Decimal::ZERO);
        *slot = checked_sum(*slot, parse_amount(&amount)?)?;
    }
    Ok(agg)
}

type RawObligation = (i64, String, String, bool, String, String, i32);
type RawTransaction = (i64, String, String, String, bool);

fn raw_obligation(r: &Row<'_>) -> rusqlite::Result<RawObligation> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
    ))
}

fn raw_transaction(r: &Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
}

fn obligation_from_raw(raw: RawObligation) -> EngineResult<RecurringObligation> {
    let (id, description, amount, income, recurrence, influence, year) = raw;
    Ok(RecurringObligation::from_stored(
        id,
        description,
        parse_amount(&amount)?,
        income,
        recurrence.parse::<Recurrence>()?,
        parse_amount(&influence)?,
        year,
    ))
}

fn transaction_from_raw(raw: RawTransaction) -> EngineResult<Transaction> {
    let (id, date, description, amount, is_income) = raw;
    Ok(Transaction {
        id,
        date: parse_day(&date)?,
        description,
        amount: parse_amount(&amount)?,
        is_income,
    })
}

impl SqliteLedger {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// In-memory ledger with the schema applied.
    pub fn in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        crate::db::init_schema(&conn)?;
        Ok(Self::new(conn))
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_transaction(
        &self,
        date: NaiveDate,
        description: &str,
        amount: Decimal,
        is_income: bool,
    ) -> EngineResult<Transaction> {
        let amount = Transaction::signed_amount(amount, is_income);
        let conn = self.conn();
        conn.execute(
            "INSERT INTO transactions(date, description, amount, income) VALUES (?1, ?2, ?3, ?4)",
            params![date.to_string(), description, amount.to_string(), is_income],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(id, %date, %amount, "transaction recorded");
        Ok(Transaction {
            id,
            date,
            description: description.to_string(),
            amount,
            is_income,
        })
    }

    /// Rewrites description, amount and income flag; the date is kept.
    pub fn update_transaction(
        &self,
        id: i64,
        description: &str,
        amount: Decimal,
        is_income: bool,
    ) -> EngineResult<Transaction> {
        let amount = Transaction::signed_amount(amount, is_income);
        let changed = self.conn().execute(
            "UPDATE transactions SET description=?1, amount=?2, income=?3 WHERE id=?4",
            params![description, amount.to_string(), is_income, id],
        )?;
        if changed == 0 {
            return Err(EngineError::NotFound {
                entity: "Transaction",
                id,
            });
        }
        tracing::info!(id, %amount, "transaction updated");
        self.transaction(id)
    }

    pub fn transaction(&self, id: i64) -> EngineResult<Transaction> {
        let raw = self
            .conn()
            .query_row(
                &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id=?1"),
                params![id],
                raw_transaction,
            )
            .optional()?
            .ok_or(EngineError::NotFound {
                entity: "Transaction",
                id,
            })?;
        transaction_from_raw(raw)
    }

    /// One-off entries in `from..=to`, oldest first. Open bounds list everything.
    pub fn transactions_between(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> EngineResult<Vec<Transaction>> {
        let from = from.map(|d| d.to_string()).unwrap_or_default();
        let to = to
            .map(|d| d.to_string())
            .unwrap_or_else(|| "9999-12-31".to_string());
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions
             WHERE date >= ?1 AND date <= ?2 ORDER BY date, id"
        ))?;
        let raws = stmt
            .query_map(params![from, to], raw_transaction)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(transaction_from_raw).collect()
    }

    pub fn add_obligation(
        &self,
        description: &str,
        amount: Decimal,
        is_income: bool,
        recurrence: Recurrence,
        year: i32,
    ) -> EngineResult<RecurringObligation> {
        let mut ob = RecurringObligation::new(0, description, amount, is_income, recurrence, year)?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO fixed(description, amount, income, recurrence, influence, influence_year)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                ob.description,
                ob.amount.to_string(),
                ob.is_income,
                ob.recurrence.as_str(),
                ob.influence().to_string(),
                ob.influence_year()
            ],
        )?;
        ob.id = conn.last_insert_rowid();
        tracing::info!(id = ob.id, influence = %ob.influence(), "obligation stored");
        Ok(ob)
    }

    /// Rewrites an obligation together with its re-derived influence in a
    /// single statement.
    pub fn update_obligation(
        &self,
        id: i64,
        description: &str,
        amount: Decimal,
        is_income: bool,
        recurrence: Recurrence,
        year: i32,
    ) -> EngineResult<RecurringObligation> {
        let ob = RecurringObligation::new(id, description, amount, is_income, recurrence, year)?;
        let changed = self.conn().execute(
            "UPDATE fixed SET description=?1, amount=?2, income=?3, recurrence=?4,
                 influence=?5, influence_year=?6
             WHERE id=?7",
            params![
                ob.description,
                ob.amount.to_string(),
                ob.is_income,
                ob.recurrence.as_str(),
                ob.influence().to_string(),
                ob.influence_year(),
                id
            ],
        )?;
        if changed == 0 {
            return Err(EngineError::NotFound {
                entity: "Obligation",
                id,
            });
        }
        tracing::info!(id, influence = %ob.influence(), "obligation updated");
        Ok(ob)
    }

    pub fn obligation(&self, id: i64) -> EngineResult<RecurringObligation> {
        let raw = self
            .conn()
            .query_row(
                &format!("SELECT {OBLIGATION_COLUMNS} FROM fixed WHERE id=?1"),
                params![id],
                raw_obligation,
            )
            .optional()?
            .ok_or(EngineError::NotFound {
                entity: "Obligation",
                id,
            })?;
        obligation_from_raw(raw)
    }

    /// Inserts or relabels mappings keyed by pattern in one transaction.
    /// Entries with a blank pattern or label are skipped.
    pub fn upsert_mappings(&self, mappings: &[CategoryMapping]) -> EngineResult<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO mappings(pattern, label) VALUES (?1, ?2)
                 ON CONFLICT(pattern) DO UPDATE SET label=excluded.label",
            )?;
            for m in mappings {
                let pattern = m.pattern.trim();
                let label = m.label.trim();
                if pattern.is_empty() || label.is_empty() {
                    continue;
                }
                stmt.execute(params![pattern, label])?;
                written += 1;
            }
        }
        tx.commit()?;
        tracing::info!(written, "mappings upserted");
        Ok(written)
    }

    pub fn mappings(&self) -> EngineResult<Vec<CategoryMapping>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, pattern, label FROM mappings ORDER BY label, pattern")?;
        let rows = stmt
            .query_map([], |r| {
                Ok(CategoryMapping {
                    id: Some(r.get(0)?),
                    pattern: r.get(1)?,
                    label: r.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Every distinct transaction description with its label, if mapped.
    pub fn descriptions(&self) -> EngineResult<Vec<(String, Option<String>)>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT t.description, m.label
             FROM transactions t LEFT JOIN mappings m ON m.pattern = t.description
             GROUP BY t.description
             ORDER BY m.label IS NOT NULL, m.label, t.description",
        )?;
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Mapped entries in `from..=to`, oldest first.
    pub fn summary_entries(&self, from: NaiveDate, to: NaiveDate) -> EngineResult<Vec<SummaryEntry>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT t.date, m.label, t.description, t.amount
             FROM transactions t JOIN mappings m ON m.pattern = t.description
             WHERE t.date >= ?1 AND t.date <= ?2
             ORDER BY t.date, t.id",
        )?;
        let raws = stmt
            .query_map(params![from.to_string(), to.to_string()], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter()
            .map(|(date, label, description, amount)| -> EngineResult<SummaryEntry> {
                Ok(SummaryEntry {
                    date: parse_day(&date)?,
                    label,
                    description,
                    amount: parse_amount(&amount)?,
                })
            })
            .collect()
    }

    /// Per-description sums for one label in `from..=to`.
    pub fn category_detail(
        &self,
        label: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<(String, Decimal)>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT t.description, t.amount
             FROM transactions t JOIN mappings m ON m.pattern = t.description
             WHERE m.label = ?1 AND t.date >= ?2 AND t.date <= ?3",
        )?;
        let raws = stmt
            .query_map(params![label, from.to_string(), to.to_string()], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sum_by_key(raws)?.into_iter().collect())
    }
}

impl LedgerStore for SqliteLedger {
    fn grouped_sum(
        &self,
        grouping: Grouping,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<Bucket>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT strftime(?1, date) AS bucket, amount FROM transactions
             WHERE date >= ?2 AND date <= ?3",
        )?;
        let raws = stmt
            .query_map(
                params![grouping.strftime(), from.to_string(), to.to_string()],
                |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        // keys are zero-padded, so string order is numeric order
        Ok(sum_by_key(raws)?
            .into_iter()
            .map(|(key, value)| Bucket { key, value })
            .collect())
    }

    fn recurring_influence_sum(&self) -> EngineResult<Decimal> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT influence FROM fixed")?;
        let influences = stmt
            .query_map([], |r| r.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        sum_amounts(influences)
    }

    fn transaction_sum_on(&self, day: NaiveDate) -> EngineResult<Decimal> {
        self.window_sum(day, day)
    }

    fn window_sum(&self, from: NaiveDate, to: NaiveDate) -> EngineResult<Decimal> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT amount FROM transactions WHERE date >= ?1 AND date <= ?2")?;
        let amounts = stmt
            .query_map(params![from.to_string(), to.to_string()], |r| {
                r.get::<_, String>(0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        sum_amounts(amounts)
    }

    fn category_grouped_sum(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<(String, Decimal)>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT m.label, t.amount
             FROM transactions t JOIN mappings m ON m.pattern = t.description
             WHERE t.date >= ?1 AND t.date <= ?2",
        )?;
        let raws = stmt
            .query_map(params![from.to_string(), to.to_string()], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        // biggest spend (most negative) first
        let mut sums: Vec<_> = sum_by_key(raws)?.into_iter().collect();
        sums.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(sums)
    }

    fn persist_influence(
        &self,
        obligation: &RecurringObligation,
        influence: Decimal,
        year: i32,
    ) -> EngineResult<()> {
        let id = obligation.id;
        let conn = self.conn();
        let changed = conn.execute(
            "UPDATE fixed SET influence=?1, influence_year=?2
             WHERE id=?3 AND amount=?4 AND income=?5 AND recurrence=?6",
            params![
                influence.to_string(),
                year,
                id,
                obligation.amount.to_string(),
                obligation.is_income,
                obligation.recurrence.as_str()
            ],
        )?;
        if changed == 0 {
            let exists = conn
                .query_row("SELECT 1 FROM fixed WHERE id=?1", params![id], |_| Ok(()))
                .optional()?
                .is_some();
            return Err(if exists {
                EngineError::StaleObligation { id }
            } else {
                EngineError::NotFound {
                    entity: "Obligation",
                    id,
                }
            });
        }
        Ok(())
    }

    /// Largest amounts first.
    fn recurring_obligations(&self) -> EngineResult<Vec<RecurringObligation>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {OBLIGATION_COLUMNS} FROM fixed"))?;
        let raws = stmt
            .query_map([], raw_obligation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let mut obligations = raws
            .into_iter()
            .map(obligation_from_raw)
            .collect::<EngineResult<Vec<_>>>()?;
        obligations.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.id.cmp(&b.id)));
        Ok(obligations)
    }

    /// Newest first.
    fn transactions_on(&self, day: NaiveDate) -> EngineResult<Vec<Transaction>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE date = ?1 ORDER BY id DESC"
        ))?;
        let raws = stmt
            .query_map(params![day.to_string()], raw_transaction)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(transaction_from_raw).collect()
    }
}
