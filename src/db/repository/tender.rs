use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn insert_tender(conn: &Connection, tender: &NewTender) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO tenders (tender_id, title, raw_description, last_date, publish_date,
         tender_url, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
        params![
            tender.tender_id,
            tender.title,
            tender.raw_description,
            tender.last_date.map(|d| d.to_string()),
            tender.publish_date.map(|d| d.to_string()),
            tender.tender_url,
        ],
    )?;
    Ok(())
}

pub fn tender_exists(conn: &Connection, tender_id: &str) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM tenders WHERE tender_id = ?1",
        params![tender_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Parse a tender listing date written as `DD-MM-YYYY`.
pub fn parse_listing_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d-%m-%Y").ok()
}

/// All tenders still waiting for a summary, oldest first.
pub fn get_unprocessed_tenders(conn: &Connection) -> Result<Vec<PendingTender>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT tender_id, raw_description FROM tenders
         WHERE status = 0
         ORDER BY created_at ASC, tender_id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(PendingTender {
            tender_id: row.get(0)?,
            raw_description: row.get(1)?,
        })
    })?;

    let mut tenders = Vec::new();
    for row in rows {
        tenders.push(row?);
    }
    Ok(tenders)
}

/// Write the derived fields and flip the record to processed.
pub fn update_tender_summary(
    conn: &Connection,
    tender_id: &str,
    fields: &DerivedFields,
    ai_response: &str,
) -> Result<(), DatabaseError> {
    let now = Utc::now().format(TIMESTAMP_FORMAT).to_string();
    let rows = conn.execute(
        "UPDATE tenders
         SET summary = ?2, email = ?3, phone = ?4, requirements = ?5,
             ai_response = ?6, status = ?7, processed_at = ?8
         WHERE tender_id = ?1",
        params![
            tender_id,
            fields.summary,
            fields.email,
            fields.phone,
            fields.requirements,
            ai_response,
            TenderStatus::Processed.as_flag(),
            now,
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Tender".into(),
            id: tender_id.to_string(),
        });
    }
    Ok(())
}

const TENDER_COLUMNS: &str = "tender_id, title, raw_description, last_date, publish_date,
     tender_url, status, summary, email, phone, requirements, processed_at";

struct TenderRow {
    tender_id: String,
    title: String,
    raw_description: String,
    last_date: Option<String>,
    publish_date: Option<String>,
    tender_url: Option<String>,
    status: i32,
    summary: String,
    email: String,
    phone: String,
    requirements: String,
    processed_at: Option<String>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TenderRow> {
    Ok(TenderRow {
        tender_id: row.get(0)?,
        title: row.get(1)?,
        raw_description: row.get(2)?,
        last_date: row.get(3)?,
        publish_date: row.get(4)?,
        tender_url: row.get(5)?,
        status: row.get(6)?,
        summary: row.get(7)?,
        email: row.get(8)?,
        phone: row.get(9)?,
        requirements: row.get(10)?,
        processed_at: row.get(11)?,
    })
}

fn tender_from_row(row: TenderRow) -> Result<Tender, DatabaseError> {
    Ok(Tender {
        tender_id: row.tender_id,
        title: row.title,
        raw_description: row.raw_description,
        last_date: row.last_date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        publish_date: row
            .publish_date
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        tender_url: row.tender_url,
        status: TenderStatus::from_flag(row.status)?,
        fields: DerivedFields {
            summary: row.summary,
            email: row.email,
            phone: row.phone,
            requirements: row.requirements,
        },
        processed_at: row
            .processed_at
            .and_then(|t| NaiveDateTime::parse_from_str(&t, TIMESTAMP_FORMAT).ok()),
    })
}

/// Store-side lookup by id, whatever the processing status.
pub fn get_tender(conn: &Connection, tender_id: &str) -> Result<Option<Tender>, DatabaseError> {
    let sql = format!("SELECT {TENDER_COLUMNS} FROM tenders WHERE tender_id = ?1");
    let row = conn
        .query_row(&sql, params![tender_id], read_row)
        .optional()?;
    row.map(tender_from_row).transpose()
}

/// Public lookup by id; unprocessed tenders are not visible.
pub fn get_processed_tender(
    conn: &Connection,
    tender_id: &str,
) -> Result<Option<Tender>, DatabaseError> {
    let sql = format!("SELECT {TENDER_COLUMNS} FROM tenders WHERE status = 1 AND tender_id = ?1");
    let row = conn
        .query_row(&sql, params![tender_id], read_row)
        .optional()?;
    row.map(tender_from_row).transpose()
}

/// Page through processed tenders, newest due date first.
///
/// `page` is 1-based; zero is treated as the first page.
pub fn search_processed_tenders(
    conn: &Connection,
    filter: &TenderFilter,
    page: u32,
    limit: u32,
) -> Result<TenderPage, DatabaseError> {
    let page = page.max(1);
    let limit = limit.max(1);

    let mut where_clause = String::new();
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(from) = filter.date_from {
        params_vec.push(Box::new(from.to_string()));
        where_clause.push_str(&format!(" AND last_date >= ?{}", params_vec.len()));
    }
    if let Some(to) = filter.date_to {
        params_vec.push(Box::new(to.to_string()));
        where_clause.push_str(&format!(" AND last_date <= ?{}", params_vec.len()));
    }
    if let Some(ref id) = filter.tender_id {
        params_vec.push(Box::new(id.clone()));
        where_clause.push_str(&format!(" AND tender_id = ?{}", params_vec.len()));
    }
    if let Some(ref keywords) = filter.keywords {
        params_vec.push(Box::new(format!("%{keywords}%")));
        let idx = params_vec.len();
        where_clause.push_str(&format!(" AND (title LIKE ?{idx} OR summary LIKE ?{idx})"));
    }

    let count_sql = format!("SELECT COUNT(*) FROM tenders WHERE status = 1{where_clause}");
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let total_items: u32 = conn.query_row(&count_sql, param_refs.as_slice(), |row| row.get(0))?;

    let offset = i64::try_from(u64::from(page - 1) * u64::from(limit)).unwrap_or(i64::MAX);
    params_vec.push(Box::new(limit));
    let limit_idx = params_vec.len();
    params_vec.push(Box::new(offset));
    let offset_idx = params_vec.len();

    let sql = format!(
        "SELECT {TENDER_COLUMNS} FROM tenders WHERE status = 1{where_clause}
         ORDER BY last_date DESC, tender_id ASC
         LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
    );
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(param_refs.as_slice(), read_row)?;

    let mut tenders = Vec::new();
    for row in rows {
        tenders.push(tender_from_row(row?)?);
    }

    Ok(TenderPage {
        tenders,
        current_page: page,
        total_pages: total_items.div_ceil(limit),
        total_items,
        items_per_page: limit,
    })
}
