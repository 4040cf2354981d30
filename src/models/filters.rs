use chrono::NaiveDate;

/// Filter for listing processed tenders.
#[derive(Debug, Default)]
pub struct TenderFilter {
    pub tender_id: Option<String>,
    pub keywords: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}
