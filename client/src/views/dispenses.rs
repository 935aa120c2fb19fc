//! Dispense pages: the two listing tabs and the detail page with the
//! receipt confirmation form.

use chrono::{NaiveDateTime, Timelike, Utc};
use shared::models::wire::DISPENSE_AT_FORMAT;
use shared::models::{ConfirmDispensePayload, Dispense, DispenseItem, DispenseStatus, DispenseTab};
use shared::types::{ListResponse, PageParams};
use shared::validation::validate_payload;

use super::Context;
use crate::api::SearchFilters;
use crate::cache::{Invalidate, QueryKey, Resource};
use crate::error::{ClientError, ClientResult};

/// `/dispenses/{tab}`
pub struct DispenseListView {
    ctx: Context,
    tab: DispenseTab,
    search: SearchFilters,
    page: PageParams,
}

impl DispenseListView {
    pub fn new(ctx: Context, tab: DispenseTab) -> Self {
        Self {
            ctx,
            tab,
            search: SearchFilters::default(),
            page: PageParams::default(),
        }
    }

    pub fn tab(&self) -> DispenseTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: DispenseTab) {
        self.tab = tab;
        self.page.page = 1;
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.search = SearchFilters::new(search);
        self.page.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = PageParams::new(page, self.page.page_size);
    }

    pub async fn load(&self) -> ClientResult<ListResponse<Dispense>> {
        let tab = self.tab;
        let search = self.search.clone();
        let page = self.page;
        let key = QueryKey::list(Resource::Dispenses).with_params(&serde_json::json!({
            "tab": tab.slug(),
            "search": search.search,
            "page": page.page,
            "pageSize": page.page_size,
        }))?;
        let api = self.ctx.api.dispenses.clone();
        self.ctx
            .cache
            .query(key, move || async move {
                match tab {
                    DispenseTab::ForDispense => api.for_dispense(&search, page).await,
                    DispenseTab::Dispensed => api.dispensed(&search, page).await,
                }
            })
            .await
    }
}

/// Current time at minute precision, the resolution of the form field
pub fn now_minute() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// Receipt form of the confirm dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmForm {
    pub receive_by: String,
    pub dispense_at: NaiveDateTime,
}

impl Default for ConfirmForm {
    fn default() -> Self {
        Self {
            receive_by: String::new(),
            dispense_at: now_minute(),
        }
    }
}

impl ConfirmForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the receiver and restart the clock
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set the timestamp from `YYYY-MM-DDTHH:MM`; returns false if unparsable
    pub fn set_dispense_at_text(&mut self, raw: &str) -> bool {
        match NaiveDateTime::parse_from_str(raw.trim(), DISPENSE_AT_FORMAT) {
            Ok(at) => {
                self.dispense_at = at;
                true
            }
            Err(_) => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.receive_by.trim().is_empty()
    }

    pub fn payload(&self) -> ConfirmDispensePayload {
        ConfirmDispensePayload {
            receive_by: self.receive_by.trim().to_string(),
            dispense_at: self.dispense_at,
        }
    }
}

/// `/dispenses/{id}`
pub struct DispenseDetailView {
    ctx: Context,
    id: u64,
    dispense: Option<Dispense>,
    items: Vec<DispenseItem>,
    pub form: ConfirmForm,
}

impl DispenseDetailView {
    pub fn new(ctx: Context, id: u64) -> Self {
        Self {
            ctx,
            id,
            dispense: None,
            items: Vec::new(),
            form: ConfirmForm::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn dispense(&self) -> Option<&Dispense> {
        self.dispense.as_ref()
    }

    pub fn items(&self) -> &[DispenseItem] {
        &self.items
    }

    pub fn status(&self) -> Option<DispenseStatus> {
        self.dispense.as_ref().map(|d| d.status())
    }

    /// Header and items
    pub async fn load(&mut self) -> ClientResult<&Dispense> {
        let id = self.id;
        let api = self.ctx.api.dispenses.clone();
        let dispense = self
            .ctx
            .cache
            .query(QueryKey::entity(Resource::Dispenses, id), || async {
                api.get(id).await
            })
            .await?;

        let api = self.ctx.api.dispenses.clone();
        let items = self
            .ctx
            .cache
            .query(QueryKey::entity(Resource::DispenseItems, id), || async {
                api.items(id, PageParams::options()).await
            })
            .await?;

        self.items = items.data;
        Ok(self.dispense.insert(dispense))
    }

    /// Confirm is offered once, for a dispense with items
    pub fn can_confirm(&self) -> bool {
        self.dispense
            .as_ref()
            .is_some_and(|d| d.status().check_confirm(self.items.len()).is_ok())
    }

    /// Submit the confirm dialog. A blank receiver is rejected locally.
    pub async fn confirm(&mut self) -> ClientResult<()> {
        let payload = self.form.payload();
        if let Err(failures) = validate_payload(&payload) {
            return self.ctx.reject(ClientError::Validation(failures));
        }

        let status = self.load().await?.status();
        if let Err(err) = status.check_confirm(self.items.len()) {
            return self.ctx.reject(err.into());
        }

        self.ctx.api.dispenses.confirm(self.id, &payload).await?;
        tracing::info!(id = self.id, receive_by = %payload.receive_by, "dispense confirmed");
        self.ctx
            .cache
            .invalidate_all([
                Invalidate::Entity(Resource::Dispenses, self.id),
                Invalidate::Resource(Resource::Dispenses),
                Invalidate::Resource(Resource::Requisitions),
            ])
            .await;
        self.form.reset();
        self.ctx.success("Confirmed", "Dispense confirmed.");

        let id = self.id;
        if let Err(err) = self.load().await {
            tracing::warn!(id, error = %err, "refetch after confirm failed");
        }
        Ok(())
    }
}
