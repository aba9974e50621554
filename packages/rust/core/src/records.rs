//! Typed records parsed from raw sheet rows.
//!
//! Rows are parsed exactly once, here. Everything downstream works on
//! [`Store`], [`Service`], [`Offer`] and [`Stylist`] values.

use salonsite_shared::{Offer, Row, Service, Store, Stylist};

use crate::normalize::{is_yes, norm_gender, normalise_phone, parse_expiry, parse_price};

/// Price columns in priority order; the first positive one wins.
pub const PRICE_FIELDS: &[&str] = &["Regular_Cost", "Price", "Cost", "MRP"];

/// Trimmed, non-empty value of a column.
fn field<'a>(row: &'a Row, key: &str) -> Option<&'a str> {
    row.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// First non-empty value among `keys`.
fn first_field<'a>(row: &'a Row, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| field(row, k))
}

fn owned(row: &Row, key: &str) -> Option<String> {
    field(row, key).map(String::from)
}

/// Parse a store row. Rows without a `Store_ID` are not stores.
pub fn store_from_row(row: &Row) -> Option<Store> {
    let id = field(row, "Store_ID")?.to_string();

    Some(Store {
        name: owned(row, "Store_Name").unwrap_or_else(|| id.clone()),
        // A missing column means active; a present but blank one does not.
        active: row.get("Active_Status").is_none_or(|v| is_yes(v)),
        page_url: owned(row, "Store_Page_URL"),
        phone: field(row, "Phone").map(normalise_phone),
        landline: field(row, "Landline").map(normalise_phone),
        address: owned(row, "Address"),
        city: owned(row, "City"),
        map_url: owned(row, "Map_URL"),
        hours: owned(row, "Timings"),
        email: owned(row, "Email"),
        id,
    })
}

/// Parse a service row. `store_ids` are the columns read as availability flags.
pub fn service_from_row<S: AsRef<str>>(row: &Row, store_ids: &[S]) -> Service {
    let price = PRICE_FIELDS
        .iter()
        .filter_map(|k| field(row, k))
        .filter_map(parse_price)
        .find(|p| *p > 0.0);

    let availability = store_ids
        .iter()
        .map(AsRef::as_ref)
        .filter(|id| row.get(*id).is_some_and(|v| is_yes(v)))
        .map(String::from)
        .collect();

    Service {
        name: first_field(row, &["Service_Name", "Service"])
            .unwrap_or_default()
            .to_string(),
        category: field(row, "Category").unwrap_or_default().to_string(),
        gender: norm_gender(field(row, "Gender").unwrap_or_default()),
        price,
        duration: owned(row, "Duration"),
        description: owned(row, "Description"),
        availability,
    }
}

/// Parse an offer row.
pub fn offer_from_row(row: &Row) -> Offer {
    let valid_till = field(row, "Valid_till").unwrap_or_default().to_string();

    Offer {
        store_id: field(row, "Store_ID").unwrap_or_default().to_string(),
        title: first_field(row, &["Offer_Title", "Offer"])
            .unwrap_or_default()
            .to_string(),
        description: owned(row, "Description"),
        expiry: parse_expiry(&valid_till),
        valid_till,
    }
}

/// Parse a stylist row. Only an explicit `no` marks a stylist inactive.
pub fn stylist_from_row(row: &Row) -> Stylist {
    Stylist {
        store_id: field(row, "Store_ID").unwrap_or_default().to_string(),
        name: field(row, "Name").unwrap_or_default().to_string(),
        role: owned(row, "Designation"),
        gender: norm_gender(field(row, "Gender").unwrap_or_default()),
        experience: owned(row, "Experience"),
        photo_url: owned(row, "Photo_URL"),
        active: row
            .get("Active_Status")
            .is_none_or(|v| v.trim().to_lowercase() != "no"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use salonsite_shared::Gender;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn store_requires_id() {
        assert!(store_from_row(&row(&[("Store_Name", "Orphan")])).is_none());
        assert!(store_from_row(&row(&[("Store_ID", "  ")])).is_none());
    }

    #[test]
    fn store_fields_and_phone() {
        let store = store_from_row(&row(&[
            ("Store_ID", "Store_N78"),
            ("Store_Name", "Indiranagar"),
            ("Active_Status", "Yes"),
            ("Phone", "918792642299"),
            ("Landline", ""),
            ("Address", "100 Feet Road"),
        ]))
        .unwrap();

        assert_eq!(store.id, "Store_N78");
        assert!(store.active);
        assert_eq!(store.phone.unwrap().display, "+91 87926 42299");
        assert!(store.landline.is_none());
        assert_eq!(store.address.as_deref(), Some("100 Feet Road"));
        assert!(store.email.is_none());
    }

    #[test]
    fn store_activity_defaults() {
        let missing = store_from_row(&row(&[("Store_ID", "A")])).unwrap();
        assert!(missing.active);
        assert_eq!(missing.name, "A");

        let blank = store_from_row(&row(&[("Store_ID", "A"), ("Active_Status", "")])).unwrap();
        assert!(!blank.active);

        let no = store_from_row(&row(&[("Store_ID", "A"), ("Active_Status", "No")])).unwrap();
        assert!(!no.active);
    }

    #[test]
    fn service_price_takes_first_positive_field() {
        let ids: [&str; 0] = [];
        let svc = service_from_row(
            &row(&[("Regular_Cost", "0"), ("Price", "n/a"), ("Cost", "450"), ("MRP", "500")]),
            &ids,
        );
        assert_eq!(svc.price, Some(450.0));

        let svc = service_from_row(&row(&[("Regular_Cost", "₹2,500"), ("MRP", "100")]), &ids);
        assert_eq!(svc.price, Some(2500.0));

        let svc = service_from_row(&row(&[("Price", "-")]), &ids);
        assert_eq!(svc.price, None);
    }

    #[test]
    fn service_availability_reads_store_columns() {
        let ids = ["Store_N78", "Store_N77", "Store_N36"];
        let svc = service_from_row(
            &row(&[
                ("Service_Name", "Hair Cut"),
                ("Category", "Hair"),
                ("Gender", "Men"),
                ("Store_N78", "Yes"),
                ("Store_N77", "no"),
                ("Description", "1"),
            ]),
            &ids,
        );

        assert_eq!(svc.name, "Hair Cut");
        assert_eq!(svc.gender, Gender::Male);
        assert!(svc.available_at("Store_N78"));
        assert!(!svc.available_at("Store_N77"));
        assert!(!svc.available_at("Store_N36"));
        assert!(!svc.available_at("Description"));
    }

    #[test]
    fn offer_parses_expiry_once() {
        let offer = offer_from_row(&row(&[
            ("Store_ID", " Store_N05 "),
            ("Offer_Title", "Bridal Trial"),
            ("Valid_till", "10/03/2026"),
        ]));
        assert_eq!(offer.store_id, "Store_N05");
        assert_eq!(offer.expiry, NaiveDate::from_ymd_opt(2026, 3, 10));
        assert_eq!(offer.valid_till, "10/03/2026");

        let open = offer_from_row(&row(&[("Store_ID", "A"), ("Valid_till", "-")]));
        assert!(open.expiry.is_none());
    }

    #[test]
    fn stylist_inactive_only_when_no() {
        assert!(stylist_from_row(&row(&[("Name", "A")])).active);
        assert!(stylist_from_row(&row(&[("Active_Status", "")])).active);
        assert!(stylist_from_row(&row(&[("Active_Status", "maybe")])).active);
        assert!(!stylist_from_row(&row(&[("Active_Status", " NO ")])).active);
    }
}
