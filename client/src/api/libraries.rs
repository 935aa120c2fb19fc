use std::sync::Arc;

use serde::de::IgnoredAny;
use shared::models::{LibraryFilters, LibraryKind, LibraryPayload, LibraryRecord};
use shared::types::{ListResponse, PageParams, SingleResponse};

use super::ListQuery;
use crate::error::ClientResult;
use crate::http::HttpClient;

/// `libraries/{slug}` endpoints; the eight tables share one shape
#[derive(Clone)]
pub struct LibraryApi {
    http: Arc<HttpClient>,
    kind: LibraryKind,
}

impl LibraryApi {
    pub fn new(http: Arc<HttpClient>, kind: LibraryKind) -> Self {
        Self { http, kind }
    }

    pub fn kind(&self) -> LibraryKind {
        self.kind
    }

    pub async fn list(
        &self,
        filters: &LibraryFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<LibraryRecord>> {
        self.http
            .get_with(&self.kind.path(), &ListQuery::new(filters, page))
            .await
    }

    /// Every record, for dropdowns
    pub async fn options(&self) -> ClientResult<Vec<LibraryRecord>> {
        let res = self
            .list(&LibraryFilters::default(), PageParams::options())
            .await?;
        Ok(res.data)
    }

    pub async fn get(&self, id: u64) -> ClientResult<LibraryRecord> {
        let res: SingleResponse<LibraryRecord> = self.http.get(&self.record(id)).await?;
        Ok(res.data)
    }

    pub async fn create(&self, payload: &LibraryPayload) -> ClientResult<()> {
        let _: IgnoredAny = self.http.post(&self.kind.path(), payload).await?;
        Ok(())
    }

    pub async fn update(&self, id: u64, payload: &LibraryPayload) -> ClientResult<()> {
        let _: IgnoredAny = self.http.put(&self.record(id), payload).await?;
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.http.delete(&self.record(id)).await
    }

    fn record(&self, id: u64) -> String {
        format!("{}/{id}", self.kind.path())
    }
}
