//! SQLite-backed result store. Rows are only ever appended: a line scored in
//! several runs appears once per run id.

use crate::parser::LogLevel;
use crate::report::{AnomalyLabel, AnomalyResult, RunSummary};
use chrono::{TimeZone, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub struct ResultStore {
    conn: Mutex<Connection>,
}

impl ResultStore {
    /// Open or create the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS anomaly_results (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                run_id TEXT NOT NULL,
                log_id INTEGER NOT NULL,
                source_file TEXT NOT NULL,
                level TEXT NOT NULL,
                message TEXT NOT NULL,
                label TEXT NOT NULL,
                score REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_results_run ON anomaly_results(run_id);
            CREATE TABLE IF NOT EXISTS run_summaries (
                run_id TEXT PRIMARY KEY,
                source_file_filter TEXT,
                total_records INTEGER NOT NULL,
                anomalies_detected INTEGER NOT NULL,
                contamination REAL NOT NULL,
                ts INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append one run's results in one transaction.
    pub fn append_results(
        &self,
        run_id: &Uuid,
        results: &[AnomalyResult],
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().expect("lock");
        let tx = conn.transaction()?;
        for r in results {
            tx.execute(
                "INSERT INTO anomaly_results (run_id, log_id, source_file, level, message, label, score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    run_id.to_string(),
                    r.id,
                    r.source_file,
                    r.level.as_str(),
                    r.message,
                    r.label.as_str(),
                    r.score
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn append_summary(&self, summary: &RunSummary) -> Result<(), StoreError> {
        self.conn.lock().expect("lock").execute(
            "INSERT INTO run_summaries (run_id, source_file_filter, total_records, anomalies_detected, contamination, ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                summary.run_id.to_string(),
                summary.source_file_filter,
                summary.total_records as i64,
                summary.anomalies_detected as i64,
                summary.contamination,
                summary.ts.timestamp_millis()
            ],
        )?;
        Ok(())
    }

    /// One run's results, in appended (input) order.
    pub fn results_for_run(&self, run_id: &Uuid) -> Result<Vec<AnomalyResult>, StoreError> {
        let conn = self.conn.lock().expect("lock");
        let mut stmt = conn.prepare(
            "SELECT log_id, source_file, level, message, label, score
             FROM anomaly_results WHERE run_id = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![run_id.to_string()], |row| {
            let level: String = row.get(2)?;
            let label: String = row.get(4)?;
            Ok(AnomalyResult {
                id: row.get(0)?,
                source_file: row.get(1)?,
                level: LogLevel::parse(&level).unwrap_or(LogLevel::Info),
                message: row.get(3)?,
                label: AnomalyLabel::parse(&label).unwrap_or(AnomalyLabel::Normal),
                score: row.get(5)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Latest run summaries, newest first.
    pub fn recent_runs(&self, limit: usize) -> Result<Vec<RunSummary>, StoreError> {
        let conn = self.conn.lock().expect("lock");
        let mut stmt = conn.prepare(
            "SELECT run_id, source_file_filter, total_records, anomalies_detected, contamination, ts
             FROM run_summaries ORDER BY ts DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            let run_id: String = row.get(0)?;
            let total: i64 = row.get(2)?;
            let anomalies: i64 = row.get(3)?;
            let ts_ms: i64 = row.get(5)?;
            Ok(RunSummary {
                run_id: Uuid::parse_str(&run_id).unwrap_or_else(|_| Uuid::nil()),
                source_file_filter: row.get(1)?,
                total_records: total as usize,
                anomalies_detected: anomalies as usize,
                contamination: row.get(4)?,
                ts: Utc
                    .timestamp_millis_opt(ts_ms)
                    .single()
                    .unwrap_or_else(Utc::now),
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
