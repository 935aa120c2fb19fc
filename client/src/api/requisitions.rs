use std::sync::Arc;

use serde::de::IgnoredAny;
use shared::models::{
    AddItemPayload, DispenseRef, Requisition, RequisitionDetail, RequisitionFilters,
    RequisitionItem, RequisitionPayload, Stock, StockSearch, UpdateItemPayload,
};
use shared::types::{Ack, ListResponse, PageParams, SingleResponse};

use super::{ListQuery, SearchFilters};
use crate::error::ClientResult;
use crate::http::HttpClient;

/// `requisitions` endpoints
#[derive(Clone)]
pub struct RequisitionsApi {
    http: Arc<HttpClient>,
}

impl RequisitionsApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        filters: &RequisitionFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<Requisition>> {
        self.http
            .get_with("requisitions", &ListQuery::new(filters, page))
            .await
    }

    /// Header and items in one call
    pub async fn get(&self, id: u64) -> ClientResult<RequisitionDetail> {
        let res: SingleResponse<RequisitionDetail> =
            self.http.get(&format!("requisitions/{id}")).await?;
        Ok(res.data)
    }

    pub async fn create(&self, payload: &RequisitionPayload) -> ClientResult<Requisition> {
        let res: SingleResponse<Requisition> = self.http.post("requisitions", payload).await?;
        Ok(res.data)
    }

    pub async fn update(&self, id: u64, payload: &RequisitionPayload) -> ClientResult<()> {
        let _: IgnoredAny = self.http.put(&format!("requisitions/{id}"), payload).await?;
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.http.delete(&format!("requisitions/{id}")).await
    }

    pub async fn items(
        &self,
        requisition_id: u64,
        search: &SearchFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<RequisitionItem>> {
        self.http
            .get_with(
                &format!("requisitions/{requisition_id}/items"),
                &ListQuery::new(search, page),
            )
            .await
    }

    pub async fn add_item(
        &self,
        requisition_id: u64,
        payload: &AddItemPayload,
    ) -> ClientResult<RequisitionItem> {
        let res: SingleResponse<RequisitionItem> = self
            .http
            .post(&format!("requisitions/{requisition_id}/items"), payload)
            .await?;
        Ok(res.data)
    }

    pub async fn update_item(&self, item_id: u64, payload: &UpdateItemPayload) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .put(&format!("requisitions/requisition-items/{item_id}"), payload)
            .await?;
        Ok(())
    }

    pub async fn delete_item(&self, item_id: u64) -> ClientResult<()> {
        self.http
            .delete(&format!("requisitions/requisition-items/{item_id}"))
            .await
    }

    /// Advance the requisition one workflow step
    pub async fn change_step(&self, id: u64) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .post(&format!("requisitions/{id}/change-step"), &serde_json::json!({}))
            .await?;
        Ok(())
    }

    pub async fn mark_for_dispense(&self, id: u64) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .put(&format!("requisitions/{id}/mark-for-dispense"), &serde_json::json!({}))
            .await?;
        Ok(())
    }

    /// Create the dispense record; the server allocates stock. The created
    /// reference is returned when the reply carries one.
    pub async fn dispense(&self, id: u64) -> ClientResult<Option<DispenseRef>> {
        let res: Option<Ack> = self
            .http
            .post(&format!("requisitions/{id}/dispense"), &serde_json::json!({}))
            .await?;
        Ok(res.and_then(|ack| ack.data_as()))
    }

    /// Warehouse batches eligible for allocation
    pub async fn warehouse_stocks(
        &self,
        search: &StockSearch,
        page: PageParams,
    ) -> ClientResult<ListResponse<Stock>> {
        self.http
            .get_with("requisitions/stocks/warehouse", &ListQuery::new(search, page))
            .await
    }
}
