use std::sync::Arc;

use serde::de::IgnoredAny;
use shared::models::{
    DeliveryItem, DeliveryItemPayload, DeliveryItemUpdate, Inspection, InspectionDetail,
    InspectionFilters, InspectionPayload, InspectionSignatories, InspectionUpdate, PurchaseOrder,
    PurchaseOrderFilters, PurchaseOrderPayload,
};
use shared::types::{ListResponse, PageParams, SingleResponse};

use super::dispenses::encode_segment;
use super::ListQuery;
use crate::error::ClientResult;
use crate::http::HttpClient;

/// `purchase-orders` endpoints
#[derive(Clone)]
pub struct PurchaseOrdersApi {
    http: Arc<HttpClient>,
}

impl PurchaseOrdersApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        filters: &PurchaseOrderFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<PurchaseOrder>> {
        self.http
            .get_with("purchase-orders", &ListQuery::new(filters, page))
            .await
    }

    pub async fn get(&self, id: u64) -> ClientResult<PurchaseOrder> {
        let res: SingleResponse<PurchaseOrder> =
            self.http.get(&format!("purchase-orders/{id}")).await?;
        Ok(res.data)
    }

    pub async fn create(&self, payload: &PurchaseOrderPayload) -> ClientResult<PurchaseOrder> {
        let res: SingleResponse<PurchaseOrder> = self.http.post("purchase-orders", payload).await?;
        Ok(res.data)
    }

    pub async fn update(&self, id: u64, payload: &PurchaseOrderPayload) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .put(&format!("purchase-orders/{id}"), payload)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.http.delete(&format!("purchase-orders/{id}")).await
    }
}

/// `inspections` endpoints (IAR records and their delivery items)
#[derive(Clone)]
pub struct InspectionsApi {
    http: Arc<HttpClient>,
}

impl InspectionsApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        filters: &InspectionFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<Inspection>> {
        self.list_at("inspections", filters, page).await
    }

    /// Inspections not yet forwarded to the warehouse
    pub async fn to_forward(
        &self,
        filters: &InspectionFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<Inspection>> {
        self.list_at("inspections/to-forward", filters, page).await
    }

    pub async fn forwarded(
        &self,
        filters: &InspectionFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<Inspection>> {
        self.list_at("inspections/forwarded", filters, page).await
    }

    /// Lookup by IAR, PO or DR number
    pub async fn search(
        &self,
        filters: &InspectionFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<Inspection>> {
        self.list_at("inspections/search", filters, page).await
    }

    pub async fn get(&self, id: u64) -> ClientResult<InspectionDetail> {
        let res: SingleResponse<InspectionDetail> =
            self.http.get(&format!("inspections/{id}")).await?;
        Ok(res.data)
    }

    pub async fn get_by_iar(&self, iar_no: &str) -> ClientResult<InspectionDetail> {
        let res: SingleResponse<InspectionDetail> = self
            .http
            .get(&format!("inspections/iar/{}", encode_segment(iar_no)))
            .await?;
        Ok(res.data)
    }

    pub async fn create(&self, payload: &InspectionPayload) -> ClientResult<Inspection> {
        let res: SingleResponse<Inspection> = self.http.post("inspections", payload).await?;
        Ok(res.data)
    }

    pub async fn update(&self, id: u64, payload: &InspectionUpdate) -> ClientResult<()> {
        let _: IgnoredAny = self.http.put(&format!("inspections/{id}"), payload).await?;
        Ok(())
    }

    /// Inspector and acceptor signatories
    pub async fn update_details(
        &self,
        id: u64,
        payload: &InspectionSignatories,
    ) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .put(&format!("inspections/{id}/details"), payload)
            .await?;
        Ok(())
    }

    pub async fn update_remarks(&self, id: u64, remarks: &str) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .put(
                &format!("inspections/{id}/remarks"),
                &serde_json::json!({ "remarks": remarks }),
            )
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.http.delete(&format!("inspections/{id}")).await
    }

    /// Forward the inspection so its items become stock
    pub async fn submit(&self, id: u64) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .post(&format!("inspections/{id}/submit"), &serde_json::json!({}))
            .await?;
        Ok(())
    }

    pub async fn delivery_items(
        &self,
        inspection_id: u64,
        page: PageParams,
    ) -> ClientResult<ListResponse<DeliveryItem>> {
        self.http
            .get_with(&format!("inspections/{inspection_id}/delivery/items"), &page)
            .await
    }

    pub async fn add_delivery_item(
        &self,
        inspection_id: u64,
        payload: &DeliveryItemPayload,
    ) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .post(&format!("inspections/{inspection_id}/delivery/items"), payload)
            .await?;
        Ok(())
    }

    pub async fn update_delivery_item(
        &self,
        item_id: u64,
        payload: &DeliveryItemUpdate,
    ) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .put(&format!("inspections/delivery/items/{item_id}"), payload)
            .await?;
        Ok(())
    }

    pub async fn delete_delivery_item(&self, item_id: u64) -> ClientResult<()> {
        self.http
            .delete(&format!("inspections/delivery/items/{item_id}"))
            .await
    }

    async fn list_at(
        &self,
        path: &str,
        filters: &InspectionFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<Inspection>> {
        self.http.get_with(path, &ListQuery::new(filters, page)).await
    }
}
