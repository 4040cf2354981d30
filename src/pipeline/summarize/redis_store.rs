//! Redis-backed tender store.
//!
//! Layout per tender `id`:
//! - `{prefix}tender:{id}`: hash with the raw text, dates, status and derived fields
//! - `{prefix}tenders:by_due`: sorted set of ids scored by due date (unix seconds)
//! - `{prefix}tenders:pending`: set of ids still waiting for a summary

use std::collections::HashMap;

use chrono::Utc;
use redis::Commands;

use super::traits::TenderStore;
use crate::db::DatabaseError;
use crate::models::{DerivedFields, NewTender, PendingTender, TenderStatus};

pub struct RedisTenderStore {
    client: redis::Client,
    prefix: String,
}

impl RedisTenderStore {
    /// Open a client and verify the server answers before any work starts.
    pub fn connect(url: &str, prefix: &str) -> Result<Self, DatabaseError> {
        let client = redis::Client::open(url)?;
        let mut conn = client.get_connection()?;
        redis::cmd("PING").query::<String>(&mut conn)?;
        Ok(Self {
            client,
            prefix: prefix.to_string(),
        })
    }

    fn tender_key(&self, tender_id: &str) -> String {
        format!("{}tender:{}", self.prefix, tender_id)
    }

    fn pending_key(&self) -> String {
        format!("{}tenders:pending", self.prefix)
    }

    fn due_index_key(&self) -> String {
        format!("{}tenders:by_due", self.prefix)
    }

    /// Store a newly scraped tender, index it by due date and flag it pending.
    pub fn insert_tender(&self, tender: &NewTender) -> Result<(), DatabaseError> {
        let mut conn = self.client.get_connection()?;
        let key = self.tender_key(&tender.tender_id);

        let mut fields: Vec<(&str, String)> = vec![
            ("tender_id", tender.tender_id.clone()),
            ("title", tender.title.clone()),
            ("raw_description", tender.raw_description.clone()),
            ("status", TenderStatus::Unprocessed.as_str().to_string()),
        ];
        if let Some(date) = tender.last_date {
            fields.push(("last_date", date.to_string()));
        }
        if let Some(date) = tender.publish_date {
            fields.push(("publish_date", date.to_string()));
        }
        if let Some(ref url) = tender.tender_url {
            fields.push(("tender_url", url.clone()));
        }

        let mut pipe = redis::pipe();
        pipe.atomic()
            .hset_multiple(&key, fields.as_slice())
            .ignore()
            .sadd(self.pending_key(), &tender.tender_id)
            .ignore();
        if let Some(score) = due_score(tender) {
            pipe.zadd(self.due_index_key(), &tender.tender_id, score).ignore();
        }
        pipe.query::<()>(&mut conn)?;
        Ok(())
    }

    /// Tender ids ordered by due date, earliest first.
    pub fn ids_by_due_date(&self) -> Result<Vec<String>, DatabaseError> {
        let mut conn = self.client.get_connection()?;
        let ids: Vec<String> = conn.zrange(self.due_index_key(), 0, -1)?;
        Ok(ids)
    }
}

fn due_score(tender: &NewTender) -> Option<i64> {
    tender
        .last_date
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

impl TenderStore for RedisTenderStore {
    fn fetch_unprocessed(&self) -> Result<Vec<PendingTender>, DatabaseError> {
        let mut conn = self.client.get_connection()?;
        let mut ids: Vec<String> = conn.smembers(self.pending_key())?;
        ids.sort();

        let mut tenders = Vec::with_capacity(ids.len());
        for id in ids {
            let hash: HashMap<String, String> = conn.hgetall(self.tender_key(&id))?;
            if hash.is_empty() {
                tracing::warn!(tender_id = %id, "Pending marker without tender hash, ignoring");
                continue;
            }
            if hash.get("status").map(String::as_str) == Some(TenderStatus::Processed.as_str()) {
                continue;
            }
            tenders.push(PendingTender {
                raw_description: hash.get("raw_description").cloned().unwrap_or_default(),
                tender_id: id,
            });
        }
        Ok(tenders)
    }

    fn save_summary(
        &self,
        tender_id: &str,
        fields: &DerivedFields,
        ai_response: &str,
    ) -> Result<(), DatabaseError> {
        let mut conn = self.client.get_connection()?;
        let key = self.tender_key(tender_id);

        let exists: bool = conn.exists(&key)?;
        if !exists {
            return Err(DatabaseError::NotFound {
                entity_type: "Tender".into(),
                id: tender_id.to_string(),
            });
        }

        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let values: [(&str, &str); 7] = [
            ("summary", fields.summary.as_str()),
            ("email", fields.email.as_str()),
            ("phone", fields.phone.as_str()),
            ("requirements", fields.requirements.as_str()),
            ("ai_response", ai_response),
            ("status", TenderStatus::Processed.as_str()),
            ("processed_at", now.as_str()),
        ];

        redis::pipe()
            .atomic()
            .hset_multiple(&key, values.as_slice())
            .ignore()
            .srem(self.pending_key(), tender_id)
            .ignore()
            .query::<()>(&mut conn)?;
        Ok(())
    }
}
