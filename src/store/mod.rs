mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::filter::{Clause, Filter};
use crate::models::Expense;

/// Minimal persistence contract the expense operations are written against.
/// The service receives an implementation at construction; nothing in the
/// core reaches for a process-wide handle.
pub trait Store {
    fn insert(&self, expense: &Expense) -> Result<i64>;
    /// Every matching expense, date ascending; rows sharing a date keep
    /// insertion order so repeated queries enumerate candidates identically.
    fn find(&self, filter: &Filter) -> Result<Vec<Expense>>;
    /// Overwrite the given fields on one row. `Ok(false)` when the id is gone.
    fn update_by_id(&self, id: i64, fields: &Filter) -> Result<bool>;
    /// Per-category amount sums over matching expenses, category ascending.
    fn sum_by_category(&self, filter: &Filter) -> Result<Vec<(String, Decimal)>>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut store = Self { conn };
        store.migrate().context("Database migration failed")?;
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }
}

/// Turn a sparse filter into a WHERE tail plus its positional parameters.
fn where_clause(filter: &Filter) -> (String, Vec<Box<dyn rusqlite::types::ToSql>>) {
    let mut sql = String::from(" WHERE 1=1");
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    for clause in filter.clauses() {
        match clause {
            Clause::TextEq(column, value) => {
                sql.push_str(&format!(" AND {column} = ?{}", param_values.len() + 1));
                param_values.push(Box::new(value.clone()));
            }
            Clause::AmountEq(amount) => {
                // Amounts are stored as decimal text; compare numerically so
                // a query for 250.00 matches a stored "250".
                sql.push_str(&format!(
                    " AND CAST(amount AS REAL) = CAST(?{} AS REAL)",
                    param_values.len() + 1
                ));
                param_values.push(Box::new(amount.to_string()));
            }
            Clause::DateBetween(start, end) => {
                sql.push_str(&format!(
                    " AND date >= ?{} AND date <= ?{}",
                    param_values.len() + 1,
                    param_values.len() + 2
                ));
                param_values.push(Box::new(start.clone()));
                param_values.push(Box::new(end.clone()));
            }
        }
    }
    (sql, param_values)
}

impl Store for SqliteStore {
    fn insert(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (date, amount, category, subcategory, note, payment_method, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                expense.date,
                expense.amount.to_string(),
                expense.category,
                expense.subcategory,
                expense.note,
                expense.payment_method,
                expense.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find(&self, filter: &Filter) -> Result<Vec<Expense>> {
        let (where_sql, param_values) = where_clause(filter);
        let sql = format!(
            "SELECT id, date, amount, category, subcategory, note, payment_method, created_at
             FROM expenses{where_sql} ORDER BY date ASC, id ASC"
        );
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            let amount_str: String = row.get(2)?;
            Ok(Expense {
                id: Some(row.get(0)?),
                date: row.get(1)?,
                amount: Decimal::from_str(&amount_str).unwrap_or_default(),
                category: row.get(3)?,
                subcategory: row.get(4)?,
                note: row.get(5)?,
                payment_method: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn update_by_id(&self, id: i64, fields: &Filter) -> Result<bool> {
        let mut assignments: Vec<String> = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
        for clause in fields.clauses() {
            match clause {
                Clause::TextEq(column, value) => {
                    assignments.push(format!("{column} = ?{}", param_values.len() + 1));
                    param_values.push(Box::new(value.clone()));
                }
                Clause::AmountEq(amount) => {
                    assignments.push(format!("amount = ?{}", param_values.len() + 1));
                    param_values.push(Box::new(amount.to_string()));
                }
                Clause::DateBetween(..) => {
                    anyhow::bail!("date ranges cannot be written back to a record")
                }
            }
        }
        if assignments.is_empty() {
            anyhow::bail!("no fields to update");
        }

        let sql = format!(
            "UPDATE expenses SET {} WHERE id = ?{}",
            assignments.join(", "),
            param_values.len() + 1
        );
        param_values.push(Box::new(id));
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let changed = self.conn.execute(&sql, params_ref.as_slice())?;
        Ok(changed > 0)
    }

    fn sum_by_category(&self, filter: &Filter) -> Result<Vec<(String, Decimal)>> {
        let (where_sql, param_values) = where_clause(filter);
        let sql = format!(
            "SELECT category, CAST(SUM(amount) AS TEXT)
             FROM expenses{where_sql}
             GROUP BY category
             ORDER BY category ASC"
        );
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            let category: String = row.get(0)?;
            let total_str: String = row.get(1)?;
            // SQLite renders whole-number real sums as "13.0"; normalize
            // strips the trailing zeros.
            Ok((
                category,
                Decimal::from_str(&total_str).unwrap_or_default().normalize(),
            ))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
