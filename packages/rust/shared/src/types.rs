//! Core domain types: raw sheet rows and the typed records parsed from them.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

/// One spreadsheet row: trimmed header name to trimmed cell value.
pub type Row = BTreeMap<String, String>;

/// The four tabs of the source spreadsheet, as raw rows.
#[derive(Debug, Clone, Default)]
pub struct SheetTables {
    pub stores: Vec<Row>,
    pub services: Vec<Row>,
    pub offers: Vec<Row>,
    pub stylists: Vec<Row>,
}

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Audience a service or stylist is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Unisex,
}

/// A phone number in the three shapes the pages need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneNumbers {
    /// Human-readable, e.g. `+91 87926 42299`.
    pub display: String,
    /// For `tel:` links, e.g. `+918792642299`.
    pub dial: String,
    /// For WhatsApp links (no leading `+`), e.g. `918792642299`.
    pub whatsapp: String,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A salon branch from the `store_details` tab.
#[derive(Debug, Clone, Serialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub active: bool,
    /// Raw `Store_Page_URL`, e.g. `stores/indiranagar.html`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneNumbers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landline: Option<PhoneNumbers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A menu item from the `services` tab.
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub name: String,
    pub category: String,
    pub gender: Gender,
    /// First positive price among the price columns, in priority order.
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Store ids whose availability column is affirmative.
    pub availability: BTreeSet<String>,
}

impl Service {
    /// Whether the service is offered at the given store.
    pub fn available_at(&self, store_id: &str) -> bool {
        self.availability.contains(store_id)
    }
}

/// A promotion from the `offers` tab.
#[derive(Debug, Clone, Serialize)]
pub struct Offer {
    pub store_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `Valid_till` as written in the sheet, for display.
    pub valid_till: String,
    /// Parsed `Valid_till`; `None` when empty, `-` or unparseable.
    pub expiry: Option<NaiveDate>,
}

/// A team member from the `stylists` tab.
#[derive(Debug, Clone, Serialize)]
pub struct Stylist {
    pub store_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub active: bool,
}
