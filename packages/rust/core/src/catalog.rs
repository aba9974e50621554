//! Filter/join engine over the four sheet tables.
//!
//! A [`Catalog`] holds the typed records plus the active stores in canonical
//! order, and answers every per-store and cross-store question the pages
//! ask. It never mutates after construction.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use salonsite_shared::{
    HomeCategory, Offer, Result, SalonSiteError, Service, SheetTables, SiteConfig, Store,
    StoreOfferPolicy, Stylist,
};

use crate::normalize::expiry_is_active;
use crate::records::{offer_from_row, service_from_row, store_from_row, stylist_from_row};

/// Minimum "starting at" price for one homepage category.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategoryPrice {
    pub label: String,
    /// `None` when no matching service has a positive price.
    pub min_price: Option<f64>,
}

/// Joined, filtered view of the spreadsheet for one build date.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Active stores, canonical order. Never empty.
    stores: Vec<Store>,
    /// Known but inactive stores, canonical order.
    skipped: Vec<Store>,
    services: Vec<Service>,
    offers: Vec<Offer>,
    stylists: Vec<Stylist>,
    today: NaiveDate,
}

impl Catalog {
    /// Parse the raw tables and select stores by `site.store_order`.
    ///
    /// Ids in the order missing from the stores table are skipped silently;
    /// stores absent from the order are never included. Fails with
    /// [`SalonSiteError::NoActiveStores`] if nothing is left.
    #[instrument(skip_all, fields(%today))]
    pub fn build(tables: &SheetTables, config: &SiteConfig, today: NaiveDate) -> Result<Self> {
        let store_order = &config.site.store_order;
        let parsed: Vec<Store> = tables.stores.iter().filter_map(store_from_row).collect();
        let dropped = tables.stores.len() - parsed.len();
        if dropped > 0 {
            warn!(dropped, "store rows without Store_ID ignored");
        }

        let all_ids: Vec<String> = parsed.iter().map(|s| s.id.clone()).collect();

        // Later rows with the same id replace earlier ones.
        let mut by_id: HashMap<String, Store> = HashMap::new();
        for store in parsed {
            by_id.insert(store.id.clone(), store);
        }

        let ordered: Vec<Store> = store_order
            .iter()
            .filter_map(|id| by_id.get(id).cloned())
            .collect();

        let unlisted = by_id
            .keys()
            .filter(|id| !store_order.contains(*id))
            .count();
        if unlisted > 0 {
            debug!(unlisted, "stores not in the canonical order are excluded");
        }

        let (stores, skipped): (Vec<Store>, Vec<Store>) =
            ordered.into_iter().partition(|s| s.active);

        if stores.is_empty() {
            return Err(SalonSiteError::NoActiveStores);
        }

        let services = tables
            .services
            .iter()
            .map(|row| service_from_row(row, &all_ids))
            .collect();
        let offers = tables.offers.iter().map(offer_from_row).collect();
        let stylists = tables.stylists.iter().map(stylist_from_row).collect();

        let catalog = Self {
            stores,
            skipped,
            services,
            offers,
            stylists,
            today,
        };

        info!(
            active_stores = catalog.stores.len(),
            skipped_stores = catalog.skipped.len(),
            services = catalog.services.len(),
            offers = catalog.offers.len(),
            stylists = catalog.stylists.len(),
            "catalog built"
        );

        Ok(catalog)
    }

    /// Active stores in canonical order.
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    /// Inactive stores that the canonical order names.
    pub fn skipped(&self) -> &[Store] {
        &self.skipped
    }

    /// Every service, in sheet order.
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn stylists(&self) -> &[Stylist] {
        &self.stylists
    }

    /// Build date used for offer expiry.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Whether an offer is running on the build date.
    pub fn is_offer_active(&self, offer: &Offer) -> bool {
        expiry_is_active(offer.expiry, self.today)
    }

    fn is_active_store(&self, store_id: &str) -> bool {
        self.stores.iter().any(|s| s.id == store_id)
    }

    /// Services available at a store.
    pub fn services_for(&self, store_id: &str) -> Vec<&Service> {
        self.services
            .iter()
            .filter(|s| s.available_at(store_id))
            .collect()
    }

    /// Offers joined to a store, filtered per `policy`.
    pub fn offers_for(&self, store_id: &str, policy: StoreOfferPolicy) -> Vec<&Offer> {
        self.offers
            .iter()
            .filter(|o| o.store_id == store_id)
            .filter(|o| match policy {
                StoreOfferPolicy::ActiveOnly => self.is_offer_active(o),
                StoreOfferPolicy::All => true,
            })
            .collect()
    }

    /// Active stylists at a store.
    pub fn stylists_for(&self, store_id: &str) -> Vec<&Stylist> {
        self.stylists
            .iter()
            .filter(|s| s.store_id == store_id && s.active)
            .collect()
    }

    /// Previous and next active store around `index`, wrapping at both ends.
    /// `None` if `index` is out of range.
    pub fn neighbours(&self, index: usize) -> Option<(&Store, &Store)> {
        let n = self.stores.len();
        if index >= n {
            return None;
        }
        Some((
            &self.stores[(index + n - 1) % n],
            &self.stores[(index + 1) % n],
        ))
    }

    /// Active offers grouped by active store, in canonical order.
    pub fn offers_by_store(&self) -> Vec<(&Store, Vec<&Offer>)> {
        self.stores
            .iter()
            .map(|store| (store, self.offers_for(&store.id, StoreOfferPolicy::ActiveOnly)))
            .collect()
    }

    /// Number of active offers at active stores.
    pub fn active_offer_count(&self) -> usize {
        self.offers
            .iter()
            .filter(|o| self.is_active_store(&o.store_id) && self.is_offer_active(o))
            .count()
    }

    /// The `limit` soonest-expiring active offers across active stores.
    ///
    /// Offers without an expiry sort after every dated one; ties keep sheet
    /// order.
    pub fn featured_offers(&self, limit: usize) -> Vec<(&Offer, &Store)> {
        let mut featured: Vec<(&Offer, &Store)> = self
            .offers
            .iter()
            .filter(|o| self.is_offer_active(o))
            .filter_map(|o| {
                self.stores
                    .iter()
                    .find(|s| s.id == o.store_id)
                    .map(|store| (o, store))
            })
            .collect();

        featured.sort_by_key(|(o, _)| o.expiry.unwrap_or(NaiveDate::MAX));
        featured.truncate(limit);
        featured
    }

    /// Lowest positive price among services whose category matches each
    /// homepage category's keywords (lowercase substring match).
    pub fn category_min_prices(&self, categories: &[HomeCategory]) -> Vec<CategoryPrice> {
        categories
            .iter()
            .map(|category| {
                let keywords: Vec<String> =
                    category.keywords.iter().map(|k| k.to_lowercase()).collect();

                let min_price = self
                    .services
                    .iter()
                    .filter(|svc| {
                        let cat = svc.category.to_lowercase();
                        keywords.iter().any(|k| cat.contains(k.as_str()))
                    })
                    .filter_map(|svc| svc.price)
                    .fold(None, |min: Option<f64>, p| {
                        Some(min.map_or(p, |m| m.min(p)))
                    });

                CategoryPrice {
                    label: category.label.clone(),
                    min_price,
                }
            })
            .collect()
    }

    /// Distinct non-empty service categories in first-seen order.
    pub fn service_categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for svc in &self.services {
            let cat = svc.category.as_str();
            if !cat.is_empty() && !seen.contains(&cat) {
                seen.push(cat);
            }
        }
        seen
    }
}
