use std::sync::Arc;

use serde::de::IgnoredAny;
use shared::models::{Product, ProductFilters, ProductPayload, Stock};
use shared::types::{ListResponse, PageParams, SingleResponse};

use super::ListQuery;
use crate::error::ClientResult;
use crate::http::HttpClient;

/// `products` endpoints
#[derive(Clone)]
pub struct ProductsApi {
    http: Arc<HttpClient>,
}

impl ProductsApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        filters: &ProductFilters,
        page: PageParams,
    ) -> ClientResult<ListResponse<Product>> {
        self.http
            .get_with("products", &ListQuery::new(filters, page))
            .await
    }

    pub async fn get(&self, id: u64) -> ClientResult<Product> {
        let res: SingleResponse<Product> = self.http.get(&format!("products/{id}")).await?;
        Ok(res.data)
    }

    pub async fn create(&self, payload: &ProductPayload) -> ClientResult<Product> {
        let res: SingleResponse<Product> = self.http.post("products", payload).await?;
        Ok(res.data)
    }

    pub async fn update(&self, id: u64, payload: &ProductPayload) -> ClientResult<()> {
        let _: IgnoredAny = self.http.put(&format!("products/{id}"), payload).await?;
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.http.delete(&format!("products/{id}")).await
    }

    /// Stock batches of one product
    pub async fn stocks(&self, id: u64) -> ClientResult<Vec<Stock>> {
        let res: ListResponse<Stock> = self.http.get(&format!("products/{id}/stocks")).await?;
        Ok(res.data)
    }
}
