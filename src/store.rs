// 🗄️ Report Store - SQLite persistence for custom reports
//
// Reports are small documents, so each row keeps the searchable columns
// (name, timestamps) next to the full JSON body.

use crate::error::Result;
use crate::reports::{CustomReport, ReportBook};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

pub struct ReportStore {
    conn: Connection,
}

impl ReportStore {
    /// Open (or create) a file-backed store in WAL mode
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        let store = ReportStore { conn };
        store.setup()?;
        info!(path = %path.display(), "report store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = ReportStore {
            conn: Connection::open_in_memory()?,
        };
        store.setup()?;
        Ok(store)
    }

    fn setup(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS reports (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                body TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_reports_updated ON reports(updated_at)",
            [],
        )?;

        Ok(())
    }

    /// Insert or replace by id
    pub fn save(&self, report: &CustomReport) -> Result<()> {
        let body = serde_json::to_string(report)?;
        self.conn.execute(
            "INSERT INTO reports (id, name, description, created_at, updated_at, body)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                updated_at = excluded.updated_at,
                body = excluded.body",
            params![
                report.id,
                report.name,
                report.description,
                report.created_at.to_rfc3339(),
                report.updated_at.to_rfc3339(),
                body,
            ],
        )?;
        debug!(id = %report.id, "saved report");
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<CustomReport>> {
        let body: Option<String> = self
            .conn
            .query_row("SELECT body FROM reports WHERE id = ?1", [id], |row| row.get(0))
            .optional()?;

        match body {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Most recently updated first
    pub fn load_all(&self) -> Result<Vec<CustomReport>> {
        let mut stmt = self
            .conn
            .prepare("SELECT body FROM reports ORDER BY updated_at DESC")?;

        let bodies = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        bodies
            .iter()
            .map(|json| serde_json::from_str(json).map_err(Into::into))
            .collect()
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.conn.execute("DELETE FROM reports WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM reports", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn load_book(&self) -> Result<ReportBook> {
        Ok(ReportBook::from_reports(self.load_all()?))
    }

    /// Write every report in the book
    pub fn save_book(&self, book: &ReportBook) -> Result<usize> {
        let reports = book.list();
        for report in &reports {
            self.save(report)?;
        }
        Ok(reports.len())
    }
}
