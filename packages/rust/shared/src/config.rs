//! Site configuration for salonsite.
//!
//! Lookup order: an explicit path, then `./salonsite.toml`, then
//! `~/.salonsite/salonsite.toml`. Missing files fall back to defaults, which
//! reproduce the production site's settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SalonSiteError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "salonsite.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".salonsite";

// ---------------------------------------------------------------------------
// Config structs (matching salonsite.toml schema)
// ---------------------------------------------------------------------------

/// Top-level site config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Spreadsheet source.
    #[serde(default)]
    pub sheet: SheetConfig,

    /// Output and page-building settings.
    #[serde(default)]
    pub site: SiteSettings,

    /// Third-party tracking identifiers.
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Homepage categories for the "starting from" price tiles.
    #[serde(default = "default_categories")]
    pub categories: Vec<HomeCategory>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            sheet: SheetConfig::default(),
            site: SiteSettings::default(),
            tracking: TrackingConfig::default(),
            categories: default_categories(),
        }
    }
}

/// `[sheet]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Spreadsheet document ID.
    #[serde(default = "default_sheet_id")]
    pub id: String,

    /// Base URL the document ID is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Tab names.
    #[serde(default)]
    pub tabs: SheetTabs,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            id: default_sheet_id(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            tabs: SheetTabs::default(),
        }
    }
}

fn default_sheet_id() -> String {
    "1wy0_josh4L-C0GXWNnRG8QEO9F8km5SMrDefemChFUo".into()
}
fn default_base_url() -> String {
    "https://docs.google.com/spreadsheets/d".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[sheet.tabs]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetTabs {
    #[serde(default = "default_stores_tab")]
    pub stores: String,
    #[serde(default = "default_services_tab")]
    pub services: String,
    #[serde(default = "default_offers_tab")]
    pub offers: String,
    #[serde(default = "default_stylists_tab")]
    pub stylists: String,
}

impl Default for SheetTabs {
    fn default() -> Self {
        Self {
            stores: default_stores_tab(),
            services: default_services_tab(),
            offers: default_offers_tab(),
            stylists: default_stylists_tab(),
        }
    }
}

fn default_stores_tab() -> String {
    "store_details".into()
}
fn default_services_tab() -> String {
    "services".into()
}
fn default_offers_tab() -> String {
    "offers".into()
}
fn default_stylists_tab() -> String {
    "stylists".into()
}

/// Which offers a store's own page lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreOfferPolicy {
    /// Only offers that have not expired.
    #[default]
    ActiveOnly,
    /// Every offer joined to the store, expired or not.
    All,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Brand name shown in page titles.
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Root directory the page tree is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Relative sub-directory (under `output_dir`) for store pages; empty
    /// writes them next to `index.html`.
    #[serde(default = "default_stores_dir")]
    pub stores_dir: String,

    /// Minify HTML before writing.
    #[serde(default)]
    pub minify: bool,

    /// Directory of `*.html` templates replacing the built-in set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<String>,

    /// How many soonest-expiring offers the home page features.
    #[serde(default = "default_featured_offers")]
    pub featured_offers: usize,

    /// Offer filtering on store pages.
    #[serde(default)]
    pub store_offers: StoreOfferPolicy,

    /// Canonical store order; decides which stores are built and in what order.
    #[serde(default = "default_store_order")]
    pub store_order: Vec<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            output_dir: default_output_dir(),
            stores_dir: default_stores_dir(),
            minify: false,
            template_dir: None,
            featured_offers: default_featured_offers(),
            store_offers: StoreOfferPolicy::default(),
            store_order: default_store_order(),
        }
    }
}

fn default_site_name() -> String {
    "Naturals Salon & Spa".into()
}
fn default_output_dir() -> String {
    ".".into()
}
fn default_stores_dir() -> String {
    "stores".into()
}
fn default_featured_offers() -> usize {
    3
}
fn default_store_order() -> Vec<String> {
    ["Store_N78", "Store_N77", "Store_N36", "Store_N05", "Store_N43"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// `[tracking]` section. Unset ids leave the snippets out of the pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_analytics_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_pixel_id: Option<String>,
}

/// `[[categories]]` entry: a homepage tile and the keywords that map
/// service categories onto it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeCategory {
    pub label: String,
    /// Lowercase substrings matched against a service's category.
    pub keywords: Vec<String>,
}

fn category(label: &str, keywords: &[&str]) -> HomeCategory {
    HomeCategory {
        label: label.into(),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
    }
}

fn default_categories() -> Vec<HomeCategory> {
    vec![
        category("Hair Cut & Styling", &["hair cut", "haircut", "styling", "blow"]),
        category("Hair Colour", &["colour", "color", "highlight"]),
        category("Hair Treatments", &["treatment", "keratin", "smoothening", "hair spa"]),
        category("Skin & Facials", &["facial", "skin", "clean up", "cleanup"]),
        category("Hands & Feet", &["manicure", "pedicure", "nail"]),
        category("Bridal & Makeup", &["bridal", "makeup", "make up"]),
    ]
}

impl SiteConfig {
    /// Check the values the pipeline cannot work around.
    pub fn validate(&self) -> Result<()> {
        if self.sheet.id.trim().is_empty() {
            return Err(SalonSiteError::config("sheet.id must not be empty"));
        }
        if self.sheet.timeout_secs == 0 {
            return Err(SalonSiteError::config("sheet.timeout_secs must be positive"));
        }
        if self.site.store_order.is_empty() {
            return Err(SalonSiteError::config("site.store_order must list at least one store"));
        }
        let stores_dir = self.site.stores_dir.trim();
        if stores_dir.starts_with(['/', '\\'])
            || Path::new(stores_dir).is_absolute()
            || stores_dir.split(['/', '\\']).any(|s| s == "..")
        {
            return Err(SalonSiteError::config(format!(
                "site.stores_dir must be a relative path inside the output directory, got '{}'",
                self.site.stores_dir
            )));
        }
        if let Some(c) = self.categories.iter().find(|c| c.label.trim().is_empty()) {
            return Err(SalonSiteError::config(format!(
                "category with keywords {:?} has an empty label",
                c.keywords
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.salonsite/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SalonSiteError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Resolve the config file to use, if any exists.
pub fn find_config_file() -> Result<Option<PathBuf>> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(Some(local));
    }

    let user = config_dir()?.join(CONFIG_FILE_NAME);
    Ok(user.exists().then_some(user))
}

/// Load the site config. Returns defaults when no config file exists.
pub fn load_config() -> Result<SiteConfig> {
    match find_config_file()? {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("config file not found, using defaults");
            Ok(SiteConfig::default())
        }
    }
}

/// Load the site config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<SiteConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SalonSiteError::io(path, e))?;

    let config: SiteConfig = toml::from_str(&content).map_err(|e| {
        SalonSiteError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write a default config file into `dir`. Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| SalonSiteError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(SalonSiteError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&SiteConfig::default())
        .map_err(|e| SalonSiteError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SalonSiteError::io(&path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(path)
}
