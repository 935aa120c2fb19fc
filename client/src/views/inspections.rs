//! Inspection (IAR) pages: the tabbed list with its create/edit dialog and
//! the detail page with delivery items, remarks and forwarding.

use rust_decimal::Decimal;
use shared::models::{
    DeliveryItem, DeliveryItemPayload, DeliveryItemUpdate, Inspection, InspectionDetail,
    InspectionFilters, InspectionPayload, InspectionSignatories, InspectionTab, InspectionUpdate,
};
use shared::types::{ListResponse, PageParams};
use shared::validation::validate_payload;

use super::Context;
use crate::cache::{Invalidate, QueryKey, Resource};
use crate::error::{ClientError, ClientResult};

pub const INSPECTION_REQUIRED: &str = "IAR No, supplier, and delivery date are required.";

// ============================================================================
// List
// ============================================================================

/// `/inspections`, `/inspections/to-forward`, `/inspections/forwarded`
pub struct InspectionListView {
    ctx: Context,
    tab: InspectionTab,
    filters: InspectionFilters,
    page: PageParams,
}

impl InspectionListView {
    pub fn new(ctx: Context, tab: InspectionTab) -> Self {
        Self {
            ctx,
            tab,
            filters: InspectionFilters::default(),
            page: PageParams::default(),
        }
    }

    pub fn tab(&self) -> InspectionTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: InspectionTab) {
        self.tab = tab;
        self.page.page = 1;
    }

    pub fn set_filters(&mut self, filters: InspectionFilters) {
        self.filters = filters;
        self.page.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = PageParams::new(page, self.page.page_size);
    }

    pub async fn load(&self) -> ClientResult<ListResponse<Inspection>> {
        let tab = self.tab;
        let filters = self.filters.clone();
        let page = self.page;
        let key = QueryKey::list(Resource::Inspections).with_params(&serde_json::json!({
            "tab": tab.slug(),
            "filters": filters,
            "page": page.page,
            "pageSize": page.page_size,
        }))?;
        let api = self.ctx.api.inspections.clone();
        self.ctx
            .cache
            .query(key, move || async move {
                match tab {
                    InspectionTab::All => api.list(&filters, page).await,
                    InspectionTab::ToForward => api.to_forward(&filters, page).await,
                    InspectionTab::Forwarded => api.forwarded(&filters, page).await,
                }
            })
            .await
    }

    /// Create an inspection; the caller navigates to the returned record
    pub async fn create(&self, payload: &InspectionPayload) -> ClientResult<Inspection> {
        if let Err(failures) = validate_payload(payload) {
            return self
                .ctx
                .reject_with(ClientError::Validation(failures), INSPECTION_REQUIRED);
        }
        let created = self.ctx.api.inspections.create(payload).await?;
        tracing::info!(id = created.id, iar_no = %created.iar_no, "inspection created");
        self.invalidate().await;
        self.ctx.success("Created", "Inspection created.");
        Ok(created)
    }

    pub async fn update(&self, id: u64, payload: &InspectionUpdate) -> ClientResult<()> {
        if let Err(failures) = validate_payload(payload) {
            return self
                .ctx
                .reject_with(ClientError::Validation(failures), INSPECTION_REQUIRED);
        }
        self.ctx.api.inspections.update(id, payload).await?;
        self.invalidate().await;
        self.ctx.success("Updated", "Inspection updated.");
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.ctx.api.inspections.delete(id).await?;
        self.invalidate().await;
        self.ctx.success("Deleted", "Inspection deleted.");
        Ok(())
    }

    async fn invalidate(&self) {
        self.ctx
            .cache
            .invalidate(Invalidate::Resource(Resource::Inspections))
            .await;
    }
}

// ============================================================================
// Detail
// ============================================================================

/// `/inspections/{id}`
pub struct InspectionDetailView {
    ctx: Context,
    id: u64,
    detail: Option<InspectionDetail>,
    items: Vec<DeliveryItem>,
}

impl InspectionDetailView {
    pub fn new(ctx: Context, id: u64) -> Self {
        Self {
            ctx,
            id,
            detail: None,
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn inspection(&self) -> Option<&Inspection> {
        self.detail.as_ref().map(|d| &d.inspection)
    }

    pub fn items(&self) -> &[DeliveryItem] {
        &self.items
    }

    /// Delivery total as computed by the server
    pub fn total_amount(&self) -> Decimal {
        self.detail
            .as_ref()
            .map_or(Decimal::ZERO, |d| d.total_amount)
    }

    /// Forwarding is offered until it has happened
    pub fn can_submit(&self) -> bool {
        self.inspection().is_some_and(|i| !i.is_forward)
    }

    /// Header and delivery items
    pub async fn load(&mut self) -> ClientResult<&InspectionDetail> {
        let id = self.id;
        let api = self.ctx.api.inspections.clone();
        let detail = self
            .ctx
            .cache
            .query(QueryKey::entity(Resource::Inspections, id), || async {
                api.get(id).await
            })
            .await?;

        let api = self.ctx.api.inspections.clone();
        let items = self
            .ctx
            .cache
            .query(QueryKey::entity(Resource::DeliveryItems, id), || async {
                api.delivery_items(id, PageParams::options()).await
            })
            .await?;

        self.items = items.data;
        Ok(self.detail.insert(detail))
    }

    async fn refresh(&mut self) {
        let id = self.id;
        if let Err(err) = self.load().await {
            tracing::warn!(id, error = %err, "refetch after update failed");
        }
    }

    async fn check_editable(&mut self) -> ClientResult<()> {
        let checked = self.load().await?.inspection.check_editable();
        match checked {
            Ok(()) => Ok(()),
            Err(err) => self.ctx.reject(err.into()),
        }
    }

    async fn invalidate_detail(&self) {
        self.ctx
            .cache
            .invalidate_all([
                Invalidate::Entity(Resource::Inspections, self.id),
                Invalidate::Entity(Resource::DeliveryItems, self.id),
            ])
            .await;
    }

    /// Forward the inspection; its delivery items become warehouse stock
    pub async fn submit(&mut self) -> ClientResult<()> {
        self.check_editable().await?;
        self.ctx.api.inspections.submit(self.id).await?;
        tracing::info!(id = self.id, "inspection forwarded");
        self.ctx
            .cache
            .invalidate_all([
                Invalidate::Entity(Resource::Inspections, self.id),
                Invalidate::Resource(Resource::Inspections),
                Invalidate::Resource(Resource::WarehouseStocks),
                Invalidate::Resource(Resource::ProductStocks),
            ])
            .await;
        self.ctx.success("Submitted", "Inspection submitted.");
        self.refresh().await;
        Ok(())
    }

    pub async fn update_remarks(&mut self, remarks: &str) -> ClientResult<()> {
        self.ctx
            .api
            .inspections
            .update_remarks(self.id, remarks.trim())
            .await?;
        self.invalidate_detail().await;
        self.ctx.success("Updated", "Remarks updated.");
        self.refresh().await;
        Ok(())
    }

    pub async fn update_signatories(&mut self, payload: &InspectionSignatories) -> ClientResult<()> {
        self.ctx
            .api
            .inspections
            .update_details(self.id, payload)
            .await?;
        self.invalidate_detail().await;
        self.ctx.success("Updated", "Inspection details updated.");
        self.refresh().await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Delivery items
    // ------------------------------------------------------------------

    pub async fn add_delivery_item(&mut self, payload: &DeliveryItemPayload) -> ClientResult<()> {
        if let Err(failures) = validate_payload(payload) {
            return self.ctx.reject(ClientError::Validation(failures));
        }
        self.check_editable().await?;
        self.ctx
            .api
            .inspections
            .add_delivery_item(self.id, payload)
            .await?;
        self.invalidate_detail().await;
        self.ctx.success("Added", "Delivery item added.");
        self.refresh().await;
        Ok(())
    }

    pub async fn update_delivery_item(
        &mut self,
        item_id: u64,
        payload: &DeliveryItemUpdate,
    ) -> ClientResult<()> {
        if let Err(failures) = validate_payload(payload) {
            return self.ctx.reject(ClientError::Validation(failures));
        }
        self.check_editable().await?;
        self.ctx
            .api
            .inspections
            .update_delivery_item(item_id, payload)
            .await?;
        self.invalidate_detail().await;
        self.ctx.success("Updated", "Delivery item updated.");
        self.refresh().await;
        Ok(())
    }

    pub async fn remove_delivery_item(&mut self, item_id: u64) -> ClientResult<()> {
        self.check_editable().await?;
        self.ctx
            .api
            .inspections
            .delete_delivery_item(item_id)
            .await?;
        self.invalidate_detail().await;
        self.ctx.success("Removed", "Delivery item removed.");
        self.refresh().await;
        Ok(())
    }
}
