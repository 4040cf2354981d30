use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::TenderStatus;

/// A tender record as held by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tender {
    pub tender_id: String,
    pub title: String,
    pub raw_description: String,
    pub last_date: Option<NaiveDate>,
    pub publish_date: Option<NaiveDate>,
    pub tender_url: Option<String>,
    pub status: TenderStatus,
    pub fields: DerivedFields,
    pub processed_at: Option<NaiveDateTime>,
}

/// A freshly scraped tender, before any AI processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTender {
    pub tender_id: String,
    pub title: String,
    pub raw_description: String,
    pub last_date: Option<NaiveDate>,
    pub publish_date: Option<NaiveDate>,
    pub tender_url: Option<String>,
}

/// Fields derived from the AI response and written back on success.
///
/// Multi-valued fields are already flattened: emails and requirements
/// newline-joined, phone numbers comma-joined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFields {
    pub summary: String,
    pub email: String,
    pub phone: String,
    pub requirements: String,
}

impl DerivedFields {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.email.is_empty()
            && self.phone.is_empty()
            && self.requirements.is_empty()
    }
}

/// The minimal projection the summarizer works on.
#[derive(Debug, Clone)]
pub struct PendingTender {
    pub tender_id: String,
    pub raw_description: String,
}

/// One page of processed tenders plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct TenderPage {
    pub tenders: Vec<Tender>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u32,
    pub items_per_page: u32,
}
