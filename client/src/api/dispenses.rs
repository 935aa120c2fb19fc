use std::sync::Arc;

use serde::de::IgnoredAny;
use shared::models::{ConfirmDispensePayload, Dispense, DispenseFilters, DispenseItem};
use shared::types::{ListResponse, PageParams, SingleResponse};

use super::{ListQuery, SearchFilters};
use crate::error::ClientResult;
use crate::http::HttpClient;

/// `dispenses` endpoints
#[derive(Clone)]
pub struct DispensesApi {
    http: Arc<HttpClient>,
}

impl DispensesApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        filters: &DispenseFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<Dispense>> {
        self.http
            .get_with("dispenses", &ListQuery::new(filters, page))
            .await
    }

    /// Dispenses awaiting confirmation
    pub async fn for_dispense(
        &self,
        search: &SearchFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<Dispense>> {
        self.http
            .get_with("dispenses/for-dispense", &ListQuery::new(search, page))
            .await
    }

    pub async fn dispensed(
        &self,
        search: &SearchFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<Dispense>> {
        self.http
            .get_with("dispenses/dispensed", &ListQuery::new(search, page))
            .await
    }

    pub async fn get(&self, id: u64) -> ClientResult<Dispense> {
        let res: SingleResponse<Dispense> = self.http.get(&format!("dispenses/{id}")).await?;
        Ok(res.data)
    }

    pub async fn get_by_code(&self, code: &str) -> ClientResult<Dispense> {
        let res: SingleResponse<Dispense> = self
            .http
            .get(&format!("dispenses/code/{}", encode_segment(code)))
            .await?;
        Ok(res.data)
    }

    pub async fn items(&self, id: u64, page: PageParams) -> ClientResult<ListResponse<DispenseItem>> {
        self.http
            .get_with(&format!("dispenses/{id}/items"), &page)
            .await
    }

    /// Record who received the stock and when
    pub async fn confirm(&self, id: u64, payload: &ConfirmDispensePayload) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .post(&format!("dispenses/{id}/confirm"), payload)
            .await?;
        Ok(())
    }
}

/// Percent-encode a value used as one path segment
pub(crate) fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}
