//! Wire envelopes and common types used across the platform

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Default page size for paginated tables
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Page size used when loading dropdown options
pub const OPTIONS_PAGE_SIZE: u32 = 200;

/// Reference to a named record (department, unit, brand, ...)
///
/// Library records have exactly this shape as well.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedRef {
    pub id: u64,
    pub name: String,
}

/// Pagination metadata returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl Meta {
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// `{ success, data: [...], meta }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            meta,
        }
    }
}

/// `{ success, data: {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SingleResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body returned by endpoints that acknowledge without a payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whatever `data` the endpoint chose to send back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Ack {
    /// `data` decoded as `T`; `None` when missing or of another shape
    pub fn data_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.data
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
    }
}

/// Page selection, serialized as `page` / `pageSize`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size,
        }
    }

    /// Options lists load a single large page
    pub fn options() -> Self {
        Self::new(1, OPTIONS_PAGE_SIZE)
    }
}

/// Serialize a boolean filter the way the API expects it (`0` / `1`)
pub fn flag(value: bool) -> u8 {
    u8::from(value)
}
