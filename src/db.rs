// 🗄️ Report History - SQLite store for validated pages
// One row per page report; the full report is kept as JSON next to a few
// columns used for listing.

use crate::report::PageReport;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::info;

/// Listing row (no entries)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub entry_count: i64,
    pub flagged_count: i64,
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS reports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            report_uuid TEXT UNIQUE NOT NULL,
            idempotency_hash TEXT UNIQUE NOT NULL,
            source TEXT NOT NULL,
            created_at TEXT NOT NULL, -- fixed-width RFC 3339, sorts as text
            entry_count INTEGER NOT NULL,
            flagged_count INTEGER NOT NULL,
            report_json TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_reports_created_at ON reports(created_at)",
        [],
    )?;

    Ok(())
}

/// Save a report. Returns false if the same page (same date strings) is
/// already stored.
pub fn insert_report(conn: &Connection, report: &PageReport) -> Result<bool> {
    let hash = report.compute_idempotency_hash();
    let report_json = serde_json::to_string(report).context("Failed to serialize report")?;

    let result = conn.execute(
        "INSERT INTO reports (
            report_uuid, idempotency_hash, source, created_at,
            entry_count, flagged_count, report_json
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            report.id,
            hash,
            report.source,
            report.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            report.entries.len() as i64,
            report.flagged_count() as i64,
            report_json,
        ],
    );

    match result {
        Ok(_) => {
            info!(id = %report.id, source = %report.source, "report saved");
            Ok(true)
        }
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            info!(source = %report.source, "duplicate report skipped");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Newest first
pub fn get_report_summaries(conn: &Connection) -> Result<Vec<ReportSummary>> {
    let mut stmt = conn.prepare(
        "SELECT report_uuid, source, created_at, entry_count, flagged_count
         FROM reports
         ORDER BY created_at DESC, id DESC",
    )?;

    let summaries = stmt
        .query_map([], |row| {
            let created_at: String = row.get(2)?;

            Ok(ReportSummary {
                id: row.get(0)?,
                source: row.get(1)?,
                created_at: parse_timestamp(&created_at, 2)?,
                entry_count: row.get(3)?,
                flagged_count: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(summaries)
}

/// Full reports, newest first
pub fn get_all_reports(conn: &Connection) -> Result<Vec<PageReport>> {
    let mut stmt = conn.prepare("SELECT report_json FROM reports ORDER BY created_at DESC, id DESC")?;

    let reports = stmt
        .query_map([], |row| {
            let json: String = row.get(0)?;
            parse_report(&json)
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(reports)
}

pub fn get_report(conn: &Connection, id: &str) -> Result<Option<PageReport>> {
    let report = conn
        .query_row(
            "SELECT report_json FROM reports WHERE report_uuid = ?1",
            params![id],
            |row| {
                let json: String = row.get(0)?;
                parse_report(&json)
            },
        )
        .optional()?;

    Ok(report)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM reports", [], |row| row.get(0))?;

    Ok(count)
}

fn parse_report(json: &str) -> rusqlite::Result<PageReport> {
    serde_json::from_str(json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

fn parse_timestamp(value: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

// ============================================================================
// TESTS
// ============================================================================
