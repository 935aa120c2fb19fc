//! Requisition pages: the tabbed list and the detail page with its item
//! editor and the for-dispensing / dispense actions.

use rust_decimal::Decimal;
use shared::models::{
    AddItemPayload, DispenseRef, Requisition, RequisitionAction, RequisitionDetail,
    RequisitionFilters, RequisitionItem, RequisitionPayload, RequisitionStatus, RequisitionTab,
    Stock, StockSearch, UpdateItemPayload,
};
use shared::types::{ListResponse, PageParams, DEFAULT_PAGE_SIZE};
use shared::validation::{parse_quantity, validate_add_item, validate_payload, validate_quantity};

use super::Context;
use crate::api::ListQuery;
use crate::cache::{Invalidate, QueryKey, Resource};
use crate::error::{ClientError, ClientResult};

pub const HEADER_REQUIRED: &str = "RIS No, Department, Requested by and Designation are required.";
pub const ADD_ITEM_INVALID: &str = "Select a stock and enter a valid quantity.";
pub const DISPENSE_PROMPT: &str = "Create dispense record and allocate stock?";

fn detail_key(id: u64) -> QueryKey {
    QueryKey::entity(Resource::Requisitions, id)
}

// ============================================================================
// List
// ============================================================================

/// `/requisitions/{tab}`
pub struct RequisitionListView {
    ctx: Context,
    tab: RequisitionTab,
    filters: RequisitionFilters,
    page: PageParams,
}

impl RequisitionListView {
    pub fn new(ctx: Context, tab: RequisitionTab) -> Self {
        Self {
            ctx,
            tab,
            filters: RequisitionFilters::default(),
            page: PageParams::default(),
        }
    }

    pub fn tab(&self) -> RequisitionTab {
        self.tab
    }

    pub fn page(&self) -> PageParams {
        self.page
    }

    /// Switching tabs starts again from the first page
    pub fn set_tab(&mut self, tab: RequisitionTab) {
        self.tab = tab;
        self.page.page = 1;
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.filters.search = search.filter(|s| !s.trim().is_empty());
        self.page.page = 1;
    }

    pub fn set_department(&mut self, department_id: Option<u64>) {
        self.filters.department_id = department_id;
        self.page.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = PageParams::new(page, self.page.page_size);
    }

    /// Filters sent to the server: user filters plus the tab's status flags
    pub fn effective_filters(&self) -> RequisitionFilters {
        let mut filters = self.filters.clone();
        self.tab.apply(&mut filters);
        filters
    }

    pub async fn load(&self) -> ClientResult<ListResponse<Requisition>> {
        let filters = self.effective_filters();
        let page = self.page;
        let key = QueryKey::list(Resource::Requisitions)
            .with_params(&ListQuery::new(&filters, page))?;
        let api = self.ctx.api.requisitions.clone();
        self.ctx
            .cache
            .query(key, move || async move { api.list(&filters, page).await })
            .await
    }

    pub async fn create(&self, payload: &RequisitionPayload) -> ClientResult<Requisition> {
        if let Err(failures) = validate_payload(payload) {
            return self
                .ctx
                .reject_with(ClientError::Validation(failures), HEADER_REQUIRED);
        }
        let created = self.ctx.api.requisitions.create(payload).await?;
        tracing::info!(id = created.id, ris_no = %created.ris_no, "requisition created");
        self.ctx
            .cache
            .invalidate(Invalidate::Resource(Resource::Requisitions))
            .await;
        self.ctx.success("Created", "Requisition created.");
        Ok(created)
    }

    pub async fn update(&self, id: u64, payload: &RequisitionPayload) -> ClientResult<()> {
        if let Err(failures) = validate_payload(payload) {
            return self
                .ctx
                .reject_with(ClientError::Validation(failures), HEADER_REQUIRED);
        }
        self.ctx.api.requisitions.update(id, payload).await?;
        self.ctx
            .cache
            .invalidate(Invalidate::Resource(Resource::Requisitions))
            .await;
        self.ctx.success("Updated", "Requisition updated.");
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.ctx.api.requisitions.delete(id).await?;
        self.ctx
            .cache
            .invalidate(Invalidate::Resource(Resource::Requisitions))
            .await;
        self.ctx.success("Deleted", "Requisition deleted.");
        Ok(())
    }
}

// ============================================================================
// Add-item picker
// ============================================================================

/// Warehouse batch picker of the add-item dialog
#[derive(Debug, Clone)]
pub struct StockPicker {
    pub search: StockSearch,
    results: Vec<Stock>,
    selected: Option<u64>,
    quantity: Option<Decimal>,
}

impl Default for StockPicker {
    fn default() -> Self {
        Self {
            search: StockSearch::default(),
            results: Vec::new(),
            selected: None,
            quantity: Some(Decimal::ONE),
        }
    }
}

impl StockPicker {
    pub fn set_text(&mut self, text: &str) {
        let text = text.trim();
        self.search.search = (!text.is_empty()).then(|| text.to_string());
    }

    pub fn results(&self) -> &[Stock] {
        &self.results
    }

    /// Select a batch from the last search results
    pub fn select(&mut self, stock_id: u64) -> Option<&Stock> {
        let found = self.results.iter().find(|s| s.id == stock_id);
        self.selected = found.map(|s| s.id);
        found
    }

    pub fn selected(&self) -> Option<&Stock> {
        self.selected
            .and_then(|id| self.results.iter().find(|s| s.id == id))
    }

    pub fn set_quantity(&mut self, quantity: Option<Decimal>) {
        self.quantity = quantity;
    }

    /// Quantity typed as text; anything unparsable clears it
    pub fn set_quantity_text(&mut self, raw: &str) {
        self.quantity = parse_quantity(raw);
    }

    pub fn quantity(&self) -> Option<Decimal> {
        self.quantity
    }

    /// Warning when the quantity exceeds the batch balance. Not enforced.
    pub fn balance_warning(&self) -> Option<String> {
        let stock = self.selected()?;
        let quantity = self.quantity?;
        (quantity > stock.running_balance).then(|| {
            format!(
                "Quantity {} exceeds the available balance of {}.",
                quantity, stock.running_balance
            )
        })
    }

    fn set_results(&mut self, results: Vec<Stock>) {
        if let Some(id) = self.selected {
            if !results.iter().any(|s| s.id == id) {
                self.selected = None;
            }
        }
        self.results = results;
    }
}

// ============================================================================
// Detail
// ============================================================================

/// Quantity being edited in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineEdit {
    pub item_id: u64,
    pub quantity: String,
}

/// Result of asking for the for-dispensing transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    /// It already was; nothing was sent
    AlreadyMarked,
}

/// `/requisitions/{id}`
pub struct RequisitionDetailView {
    ctx: Context,
    id: u64,
    detail: Option<RequisitionDetail>,
    picker: Option<StockPicker>,
    edit: Option<InlineEdit>,
}

impl RequisitionDetailView {
    pub fn new(ctx: Context, id: u64) -> Self {
        Self {
            ctx,
            id,
            detail: None,
            picker: None,
            edit: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn detail(&self) -> Option<&RequisitionDetail> {
        self.detail.as_ref()
    }

    pub fn status(&self) -> Option<RequisitionStatus> {
        self.detail.as_ref().map(|d| d.status())
    }

    /// Buttons to show; nothing until the page has loaded
    pub fn allowed_actions(&self) -> Vec<RequisitionAction> {
        self.detail
            .as_ref()
            .map(|d| d.allowed_actions())
            .unwrap_or_default()
    }

    pub fn printable_url(&self) -> String {
        format!("{}/requisitions/{}/printable", self.ctx.domain, self.id)
    }

    /// Header and items in one query
    pub async fn load(&mut self) -> ClientResult<&RequisitionDetail> {
        let api = self.ctx.api.requisitions.clone();
        let id = self.id;
        let detail = self
            .ctx
            .cache
            .query(detail_key(id), move || async move { api.get(id).await })
            .await?;
        Ok(self.detail.insert(detail))
    }

    async fn refresh(&mut self) {
        let id = self.id;
        if let Err(err) = self.load().await {
            tracing::warn!(id, error = %err, "refetch after update failed");
        }
    }

    async fn check(&mut self, action: RequisitionAction) -> ClientResult<()> {
        let checked = self.load().await?.check(action);
        match checked {
            Ok(()) => Ok(()),
            Err(err) => self.ctx.reject(err.into()),
        }
    }

    async fn invalidate_detail(&self) {
        self.ctx
            .cache
            .invalidate(Invalidate::Entity(Resource::Requisitions, self.id))
            .await;
    }

    async fn invalidate_all(&self) {
        self.ctx
            .cache
            .invalidate(Invalidate::Resource(Resource::Requisitions))
            .await;
    }

    // ------------------------------------------------------------------
    // Header
    // ------------------------------------------------------------------

    /// Form values for the edit dialog
    pub fn header_form(&self) -> Option<RequisitionPayload> {
        self.detail
            .as_ref()
            .map(|d| RequisitionPayload::from(&d.requisition))
    }

    pub async fn update_header(&mut self, payload: &RequisitionPayload) -> ClientResult<()> {
        if let Err(failures) = validate_payload(payload) {
            return self
                .ctx
                .reject_with(ClientError::Validation(failures), HEADER_REQUIRED);
        }
        self.check(RequisitionAction::EditHeader).await?;
        self.ctx.api.requisitions.update(self.id, payload).await?;
        self.invalidate_all().await;
        self.ctx.success("Updated", "Requisition updated.");
        self.refresh().await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Open the add-item dialog
    pub async fn open_add_item(&mut self) -> ClientResult<&mut StockPicker> {
        self.check(RequisitionAction::AddItem).await?;
        Ok(self.picker.insert(StockPicker::default()))
    }

    pub fn picker(&mut self) -> Option<&mut StockPicker> {
        self.picker.as_mut()
    }

    pub fn close_add_item(&mut self) {
        self.picker = None;
    }

    /// Run the picker's current search
    pub async fn search_stocks(&mut self) -> ClientResult<&[Stock]> {
        let Some(picker) = self.picker.as_mut() else {
            return Ok(&[]);
        };
        let search = picker.search.clone();
        let page = PageParams::new(1, DEFAULT_PAGE_SIZE);
        let key = QueryKey::list(Resource::WarehouseStocks)
            .with_params(&ListQuery::new(&search, page))?;
        let api = self.ctx.api.requisitions.clone();
        let res = self
            .ctx
            .cache
            .query(key, move || async move {
                api.warehouse_stocks(&search, page).await
            })
            .await?;
        picker.set_results(res.data);
        Ok(picker.results())
    }

    /// Submit the add-item dialog. Without a selected batch and a positive
    /// quantity nothing is sent.
    pub async fn add_item(&mut self) -> ClientResult<RequisitionItem> {
        let (stock_id, quantity) = {
            let picker = self.picker.as_ref();
            validate_add_item(
                picker.and_then(|p| p.selected),
                picker.and_then(|p| p.quantity),
            )
        }
        .or_else(|failures| {
            self.ctx
                .reject_with(ClientError::Validation(failures), ADD_ITEM_INVALID)
        })?;

        if let Some(warning) = self.picker.as_ref().and_then(|p| p.balance_warning()) {
            tracing::warn!(id = self.id, stock_id, "{warning}");
        }
        self.check(RequisitionAction::AddItem).await?;

        let item = self
            .ctx
            .api
            .requisitions
            .add_item(self.id, &AddItemPayload { stock_id, quantity })
            .await?;
        self.invalidate_detail().await;
        self.picker = None;
        self.ctx.success("Added", "Item added to requisition.");
        self.refresh().await;
        Ok(item)
    }

    pub fn editing(&self) -> Option<&InlineEdit> {
        self.edit.as_ref()
    }

    /// Start editing an item's quantity in place
    pub fn begin_edit(&mut self, item_id: u64) -> ClientResult<&mut InlineEdit> {
        let Some(detail) = self.detail.as_ref() else {
            return self.ctx.reject(ClientError::NotFound {
                message: "Requisition not loaded.".into(),
            });
        };
        if let Err(err) = detail.check(RequisitionAction::EditItem) {
            return self.ctx.reject(err.into());
        }
        let Some(item) = detail.item(item_id) else {
            return self.ctx.reject(ClientError::NotFound {
                message: "Item not found.".into(),
            });
        };
        let quantity = item.quantity.normalize().to_string();
        Ok(self.edit.insert(InlineEdit { item_id, quantity }))
    }

    pub fn set_edit_quantity(&mut self, raw: &str) {
        if let Some(edit) = self.edit.as_mut() {
            edit.quantity = raw.to_string();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Commit the inline edit. Non-positive quantities are rejected locally.
    pub async fn save_edit(&mut self) -> ClientResult<()> {
        let Some(edit) = self.edit.clone() else {
            return Ok(());
        };
        let quantity = match validate_quantity(parse_quantity(&edit.quantity)) {
            Ok(q) => q,
            Err(failures) => return self.ctx.reject(ClientError::Validation(failures)),
        };
        self.check(RequisitionAction::EditItem).await?;

        let payload = UpdateItemPayload {
            quantity: Some(quantity),
            unit_price: None,
        };
        self.ctx
            .api
            .requisitions
            .update_item(edit.item_id, &payload)
            .await?;
        self.invalidate_detail().await;
        self.edit = None;
        self.ctx.success("Updated", "Item quantity updated.");
        self.refresh().await;
        Ok(())
    }

    pub async fn remove_item(&mut self, item_id: u64) -> ClientResult<()> {
        self.check(RequisitionAction::RemoveItem).await?;
        self.ctx.api.requisitions.delete_item(item_id).await?;
        self.invalidate_detail().await;
        if self.edit.as_ref().is_some_and(|e| e.item_id == item_id) {
            self.edit = None;
        }
        self.ctx.success("Removed", "Item removed.");
        self.refresh().await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Move a pending requisition with items to for-dispensing. Asking again
    /// once it is there sends nothing and only refreshes the caches.
    pub async fn mark_for_dispense(&mut self) -> ClientResult<MarkOutcome> {
        if self.load().await?.status() == RequisitionStatus::ForDispensing {
            tracing::debug!(id = self.id, "already marked for dispensing");
            self.invalidate_all().await;
            return Ok(MarkOutcome::AlreadyMarked);
        }
        self.check(RequisitionAction::MarkForDispense).await?;

        self.ctx.api.requisitions.mark_for_dispense(self.id).await?;
        tracing::info!(id = self.id, "requisition marked for dispensing");
        if let Some(detail) = self.detail.as_mut() {
            detail.requisition.is_for_dispense = true;
        }
        self.invalidate_all().await;
        self.ctx
            .success("Updated", "Requisition marked for dispensing.");
        self.refresh().await;
        Ok(MarkOutcome::Marked)
    }

    /// Create the dispense record. `confirm` is shown [`DISPENSE_PROMPT`]
    /// and must agree before anything is sent. Returns the new dispense for
    /// navigation when the server reports it.
    pub async fn dispense<F>(&mut self, confirm: F) -> ClientResult<Option<DispenseRef>>
    where
        F: FnOnce(&str) -> bool,
    {
        self.check(RequisitionAction::Dispense).await?;
        if !confirm(DISPENSE_PROMPT) {
            return self.ctx.reject(ClientError::Cancelled);
        }

        let created = self.ctx.api.requisitions.dispense(self.id).await?;
        self.ctx
            .cache
            .invalidate_all([
                Invalidate::Resource(Resource::Requisitions),
                Invalidate::Resource(Resource::Dispenses),
                Invalidate::Resource(Resource::WarehouseStocks),
            ])
            .await;
        let message = match &created {
            Some(d) => {
                tracing::info!(id = self.id, dispense = %d.dispense_code, "dispense created");
                format!("Dispense {} created.", d.dispense_code)
            }
            None => {
                tracing::info!(id = self.id, "dispense created without a reference");
                "Dispense created.".to_string()
            }
        };
        self.ctx.success("Dispense Created", message);
        self.refresh().await;
        Ok(created)
    }
}
