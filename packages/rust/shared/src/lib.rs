//! Shared types, error model, and configuration for salonsite.
//!
//! This crate is the foundation depended on by all other salonsite crates.
//! It provides:
//! - [`SalonSiteError`] is the unified error type
//! - Row and record types ([`Row`], [`Store`], [`Service`], [`Offer`], [`Stylist`])
//! - Configuration ([`SiteConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CONFIG_FILE_NAME, HomeCategory, SheetConfig, SheetTabs, SiteConfig, SiteSettings,
    StoreOfferPolicy, TrackingConfig, config_dir, find_config_file, init_config, load_config,
    load_config_from,
};
pub use error::{Result, SalonSiteError};
pub use types::{Gender, Offer, PhoneNumbers, Row, Service, SheetTables, Store, Stylist};
