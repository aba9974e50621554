//! Page assembly: one view model per output page.
//!
//! Each assembler reads the [`Catalog`] and produces a [`Page`] whose
//! `context` is handed to the renderer as-is.

use std::path::PathBuf;

use chrono::Datelike;
use serde::Serialize;
use tracing::{debug, warn};

use salonsite_shared::{Offer, Result, SalonSiteError, Service, SiteConfig, Store, Stylist};

use crate::catalog::{Catalog, CategoryPrice};

/// Which logical page a [`Page`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    Home,
    Services,
    Store,
    Contact,
    Offers,
    CancellationPolicy,
    BookingPolicy,
}

/// A page ready to render.
#[derive(Debug, Clone)]
pub struct Page {
    pub kind: PageKind,
    /// Output path relative to the output root.
    pub path: PathBuf,
    pub template: &'static str,
    pub context: serde_json::Value,
}

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// Site-wide values every template sees as `site`.
#[derive(Debug, Serialize)]
struct SiteMeta<'a> {
    name: &'a str,
    year: i32,
    build_date: String,
    google_analytics_id: Option<&'a str>,
    meta_pixel_id: Option<&'a str>,
}

/// A store plus the link fields templates need.
#[derive(Debug, Clone, Serialize)]
struct StoreView<'a> {
    #[serde(flatten)]
    store: &'a Store,
    slug: String,
    /// Page path relative to the site root.
    url: String,
}

/// A stylist plus a photo source usable from the store page.
#[derive(Debug, Serialize)]
struct StylistView<'a> {
    #[serde(flatten)]
    stylist: &'a Stylist,
    photo_src: Option<String>,
}

#[derive(Debug, Serialize)]
struct FeaturedOffer<'a> {
    #[serde(flatten)]
    offer: &'a Offer,
    store: StoreView<'a>,
}

#[derive(Debug, Serialize)]
struct StoreOffers<'a> {
    store: StoreView<'a>,
    offers: Vec<&'a Offer>,
}

#[derive(Debug, Serialize)]
struct HomeContext<'a> {
    site: &'a SiteMeta<'a>,
    root: &'a str,
    stores: &'a [StoreView<'a>],
    featured_offers: Vec<FeaturedOffer<'a>>,
    category_prices: Vec<CategoryPrice>,
}

#[derive(Debug, Serialize)]
struct ServicesContext<'a> {
    site: &'a SiteMeta<'a>,
    root: &'a str,
    stores: &'a [StoreView<'a>],
    categories: Vec<&'a str>,
    services: &'a [Service],
    services_json: String,
}

#[derive(Debug, Serialize)]
struct StoreContext<'a> {
    site: &'a SiteMeta<'a>,
    root: &'a str,
    stores: &'a [StoreView<'a>],
    store: &'a StoreView<'a>,
    services: Vec<&'a Service>,
    services_json: String,
    offers: Vec<&'a Offer>,
    stylists: Vec<StylistView<'a>>,
    prev_store: &'a StoreView<'a>,
    next_store: &'a StoreView<'a>,
}

#[derive(Debug, Serialize)]
struct OffersContext<'a> {
    site: &'a SiteMeta<'a>,
    root: &'a str,
    stores: &'a [StoreView<'a>],
    offers_by_store: Vec<StoreOffers<'a>>,
    total_offers: usize,
}

/// Contexts for pages that only list stores.
#[derive(Debug, Serialize)]
struct StoresContext<'a> {
    site: &'a SiteMeta<'a>,
    root: &'a str,
    stores: &'a [StoreView<'a>],
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Shared state for assembling every page of one build.
pub struct PageAssembler<'a> {
    catalog: &'a Catalog,
    config: &'a SiteConfig,
    site: SiteMeta<'a>,
    stores: Vec<StoreView<'a>>,
    /// Directory holding store pages, relative to the output root.
    store_dir: PathBuf,
    /// Prefix leading from a store page back to the site root.
    store_root: String,
}

impl<'a> PageAssembler<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a SiteConfig) -> Self {
        let today = catalog.today();
        let site = SiteMeta {
            name: &config.site.name,
            year: today.year(),
            build_date: today.format("%Y-%m-%d").to_string(),
            google_analytics_id: config.tracking.google_analytics_id.as_deref(),
            meta_pixel_id: config.tracking.meta_pixel_id.as_deref(),
        };

        let segments = store_dir_segments(&config.site.stores_dir);
        let store_dir: PathBuf = segments.iter().collect();
        let store_root = "../".repeat(segments.len());

        let stores: Vec<StoreView<'a>> = catalog
            .stores()
            .iter()
            .map(|store| {
                let slug = store_slug(store);
                let file = format!("{slug}.html");
                let url = segments
                    .iter()
                    .copied()
                    .chain(std::iter::once(file.as_str()))
                    .collect::<Vec<_>>()
                    .join("/");
                StoreView { store, slug, url }
            })
            .collect();

        for (i, view) in stores.iter().enumerate() {
            if stores[..i].iter().any(|v| v.slug == view.slug) {
                warn!(slug = %view.slug, store = %view.store.id, "duplicate store slug, page will be overwritten");
            }
        }

        Self {
            catalog,
            config,
            site,
            stores,
            store_dir,
            store_root,
        }
    }

    /// Every page, in output order: home, services, one per store, then the
    /// fixed pages.
    pub fn all_pages(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::with_capacity(6 + self.stores.len());
        pages.push(self.home()?);
        pages.push(self.services()?);
        for index in 0..self.stores.len() {
            pages.push(self.store(index)?);
        }
        pages.push(self.contact()?);
        pages.push(self.offers()?);
        pages.push(self.cancellation_policy()?);
        pages.push(self.booking_policy()?);
        debug!(pages = pages.len(), "pages assembled");
        Ok(pages)
    }

    pub fn home(&self) -> Result<Page> {
        let featured_offers = self
            .catalog
            .featured_offers(self.config.site.featured_offers)
            .into_iter()
            .map(|(offer, store)| FeaturedOffer {
                offer,
                store: self.view_of(store),
            })
            .collect();

        let context = HomeContext {
            site: &self.site,
            root: "",
            stores: &self.stores,
            featured_offers,
            category_prices: self.catalog.category_min_prices(&self.config.categories),
        };
        page(PageKind::Home, "index.html", "index.html", &context)
    }

    pub fn services(&self) -> Result<Page> {
        let services = self.catalog.services();
        let context = ServicesContext {
            site: &self.site,
            root: "",
            stores: &self.stores,
            categories: self.catalog.service_categories(),
            services,
            services_json: script_json(&services)?,
        };
        page(PageKind::Services, "services.html", "services.html", &context)
    }

    /// Detail page for the active store at `index`.
    pub fn store(&self, index: usize) -> Result<Page> {
        let (view, (prev, next)) = self
            .stores
            .get(index)
            .zip(self.catalog.neighbours(index))
            .ok_or_else(|| {
                SalonSiteError::validation(format!(
                    "store index {index} out of range for {} stores",
                    self.stores.len()
                ))
            })?;
        let id = view.store.id.as_str();
        let services = self.catalog.services_for(id);
        let stylists = self
            .catalog
            .stylists_for(id)
            .into_iter()
            .map(|stylist| StylistView {
                stylist,
                photo_src: stylist
                    .photo_url
                    .as_deref()
                    .map(|url| asset_src(&self.store_root, url)),
            })
            .collect();

        let context = StoreContext {
            site: &self.site,
            root: &self.store_root,
            stores: &self.stores,
            store: view,
            services_json: script_json(&services)?,
            services,
            offers: self.catalog.offers_for(id, self.config.site.store_offers),
            stylists,
            prev_store: self.view_ref(prev),
            next_store: self.view_ref(next),
        };
        let path = self.store_dir.join(format!("{}.html", view.slug));
        page(PageKind::Store, path, "store.html", &context)
    }

    pub fn contact(&self) -> Result<Page> {
        page(
            PageKind::Contact,
            "contact.html",
            "contact.html",
            &self.stores_context(),
        )
    }

    pub fn offers(&self) -> Result<Page> {
        let offers_by_store = self
            .catalog
            .offers_by_store()
            .into_iter()
            .map(|(store, offers)| StoreOffers {
                store: self.view_of(store),
                offers,
            })
            .collect();

        let context = OffersContext {
            site: &self.site,
            root: "",
            stores: &self.stores,
            offers_by_store,
            total_offers: self.catalog.active_offer_count(),
        };
        page(PageKind::Offers, "offers.html", "offers.html", &context)
    }

    pub fn cancellation_policy(&self) -> Result<Page> {
        page(
            PageKind::CancellationPolicy,
            "cancellation-policy.html",
            "cancellation-policy.html",
            &self.stores_context(),
        )
    }

    pub fn booking_policy(&self) -> Result<Page> {
        page(
            PageKind::BookingPolicy,
            "booking-policy.html",
            "booking-policy.html",
            &self.stores_context(),
        )
    }

    fn stores_context(&self) -> StoresContext<'_> {
        StoresContext {
            site: &self.site,
            root: "",
            stores: &self.stores,
        }
    }

    /// The prepared view for an active store.
    fn view_ref(&self, store: &Store) -> &StoreView<'a> {
        self.stores
            .iter()
            .find(|v| v.store.id == store.id)
            .unwrap_or(&self.stores[0])
    }

    fn view_of(&self, store: &Store) -> StoreView<'a> {
        self.view_ref(store).clone()
    }
}

/// URL slug for a store page.
///
/// Taken from `Store_Page_URL` with any `stores/` prefix and `.html`
/// suffix removed; falls back to the id, lowercased with `_` as `-`.
pub fn store_slug(store: &Store) -> String {
    let from_url = store
        .page_url
        .as_deref()
        .map(|url| {
            let url = url.trim();
            let url = url.strip_prefix("stores/").unwrap_or(url);
            url.strip_suffix(".html").unwrap_or(url).to_string()
        })
        .filter(|slug| !slug.is_empty());

    from_url.unwrap_or_else(|| store.id.to_lowercase().replace('_', "-"))
}

/// Path segments of the store page directory; empty for a flat layout.
fn store_dir_segments(stores_dir: &str) -> Vec<&str> {
    stores_dir
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// Link to a sheet-supplied asset from a page `root` levels deep. Absolute
/// URLs are kept as given.
fn asset_src(root: &str, url: &str) -> String {
    if url.contains("://") || url.starts_with('/') || url.starts_with("data:") {
        url.to_string()
    } else {
        format!("{root}{url}")
    }
}

/// Serialize data for embedding inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)
        .map_err(|e| SalonSiteError::Template(format!("serializing page data: {e}")))?;
    Ok(json.replace("</", "<\\/"))
}

fn page<T: Serialize>(
    kind: PageKind,
    path: impl Into<PathBuf>,
    template: &'static str,
    context: &T,
) -> Result<Page> {
    let context = serde_json::to_value(context)
        .map_err(|e| SalonSiteError::Template(format!("{template}: building context: {e}")))?;
    Ok(Page {
        kind,
        path: path.into(),
        template,
        context,
    })
}
