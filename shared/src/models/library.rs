//! Library (reference data) models

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::non_blank;

/// Library records are plain `{ id, name }` lookups
pub type LibraryRecord = crate::types::NamedRef;

/// The reference-data libraries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum LibraryKind {
    Units,
    Categories,
    Brands,
    Suppliers,
    Divisions,
    Departments,
    GenericNames,
    FundClusters,
}

impl LibraryKind {
    pub const ALL: [LibraryKind; 8] = [
        LibraryKind::Units,
        LibraryKind::Categories,
        LibraryKind::Brands,
        LibraryKind::Suppliers,
        LibraryKind::Divisions,
        LibraryKind::Departments,
        LibraryKind::GenericNames,
        LibraryKind::FundClusters,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            LibraryKind::Units => "units",
            LibraryKind::Categories => "categories",
            LibraryKind::Brands => "brands",
            LibraryKind::Suppliers => "suppliers",
            LibraryKind::Divisions => "divisions",
            LibraryKind::Departments => "departments",
            LibraryKind::GenericNames => "generic-names",
            LibraryKind::FundClusters => "fund-clusters",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.slug() == slug)
    }

    /// API path relative to the versioned base
    pub fn path(&self) -> String {
        format!("libraries/{}", self.slug())
    }

    /// Plural label used in page titles
    pub fn label(&self) -> &'static str {
        match self {
            LibraryKind::Units => "Units",
            LibraryKind::Categories => "Categories",
            LibraryKind::Brands => "Brands",
            LibraryKind::Suppliers => "Suppliers",
            LibraryKind::Divisions => "Divisions",
            LibraryKind::Departments => "Departments",
            LibraryKind::GenericNames => "Generic Names",
            LibraryKind::FundClusters => "Fund Clusters",
        }
    }

    /// Singular label used in notifications ("Unit created.")
    pub fn singular(&self) -> &'static str {
        match self {
            LibraryKind::Units => "Unit",
            LibraryKind::Categories => "Category",
            LibraryKind::Brands => "Brand",
            LibraryKind::Suppliers => "Supplier",
            LibraryKind::Divisions => "Division",
            LibraryKind::Departments => "Department",
            LibraryKind::GenericNames => "Generic Name",
            LibraryKind::FundClusters => "Fund Cluster",
        }
    }
}

impl std::fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Create/update payload for any library
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct LibraryPayload {
    #[validate(custom = "non_blank")]
    pub name: String,
}

impl LibraryPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Filter for library tables
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LibraryFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
