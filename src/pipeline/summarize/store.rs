//! SQLite-backed tender store.

use rusqlite::Connection;

use super::traits::TenderStore;
use crate::db::repository::{get_unprocessed_tenders, update_tender_summary};
use crate::db::DatabaseError;
use crate::models::{DerivedFields, PendingTender};

/// Relational backing: one `tenders` row per record, `status` 0/1.
pub struct SqliteTenderStore {
    conn: Connection,
}

impl SqliteTenderStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TenderStore for SqliteTenderStore {
    fn fetch_unprocessed(&self) -> Result<Vec<PendingTender>, DatabaseError> {
        get_unprocessed_tenders(&self.conn)
    }

    fn save_summary(
        &self,
        tender_id: &str,
        fields: &DerivedFields,
        ai_response: &str,
    ) -> Result<(), DatabaseError> {
        update_tender_summary(&self.conn, tender_id, fields, ai_response)
    }
}
