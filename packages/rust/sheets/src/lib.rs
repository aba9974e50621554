//! Fetches the published spreadsheet tabs as CSV.
//!
//! Each tab is requested through the sheet's CSV export endpoint
//! (`<base>/<id>/gviz/tq?tqx=out:csv&sheet=<tab>`) and parsed into [`Row`]s.
//! Tabs are fetched one after another; any failure aborts the whole fetch.

mod parser;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use salonsite_shared::{Result, Row, SalonSiteError, SheetConfig, SheetTables};

/// Maximum number of redirects to follow (the export endpoint redirects once).
const MAX_REDIRECTS: usize = 5;

/// User-Agent string for sheet requests.
const USER_AGENT: &str = concat!("salonsite/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// SheetClient
// ---------------------------------------------------------------------------

/// HTTP client bound to one spreadsheet document.
#[derive(Debug, Clone)]
pub struct SheetClient {
    client: Client,
    base_url: String,
    sheet_id: String,
}

impl SheetClient {
    /// Build a client for the sheet described by `config`.
    pub fn new(config: &SheetConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SalonSiteError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sheet_id: config.id.clone(),
        })
    }

    /// CSV export URL for one tab.
    pub fn tab_url(&self, tab: &str) -> Result<Url> {
        let raw = format!("{}/{}/gviz/tq", self.base_url, self.sheet_id);
        let mut url = Url::parse(&raw)
            .map_err(|e| SalonSiteError::config(format!("invalid sheet URL '{raw}': {e}")))?;
        url.query_pairs_mut()
            .append_pair("tqx", "out:csv")
            .append_pair("sheet", tab);
        Ok(url)
    }

    /// Fetch and parse a single tab.
    #[instrument(skip(self))]
    pub async fn fetch_tab(&self, tab: &str) -> Result<Vec<Row>> {
        let url = self.tab_url(tab)?;
        info!(tab, "fetching sheet");

        let body = fetch_csv(&self.client, &url, tab).await?;
        let rows = parser::parse_csv(&body).map_err(|e| match e {
            SalonSiteError::Parse { message } => SalonSiteError::parse(format!("{tab}: {message}")),
            other => other,
        })?;

        debug!(tab, rows = rows.len(), "sheet parsed");
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Fetch all four tabs named in `config`, in order: stores, services,
/// offers, stylists.
#[instrument(skip_all, fields(sheet_id = %config.id))]
pub async fn fetch_tables(config: &SheetConfig) -> Result<SheetTables> {
    let client = SheetClient::new(config)?;
    let tabs = &config.tabs;

    let tables = SheetTables {
        stores: client.fetch_tab(&tabs.stores).await?,
        services: client.fetch_tab(&tabs.services).await?,
        offers: client.fetch_tab(&tabs.offers).await?,
        stylists: client.fetch_tab(&tabs.stylists).await?,
    };

    info!(
        stores = tables.stores.len(),
        services = tables.services.len(),
        offers = tables.offers.len(),
        stylists = tables.stylists.len(),
        "all sheets fetched"
    );

    Ok(tables)
}

/// Parse CSV text with the same rules used for fetched tabs.
pub fn parse_rows(text: &str) -> Result<Vec<Row>> {
    parser::parse_csv(text)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// GET a tab and make sure the body is CSV rather than an HTML error page.
async fn fetch_csv(client: &Client, url: &Url, tab: &str) -> Result<String> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| SalonSiteError::Network(format!("{tab}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SalonSiteError::Network(format!("{tab}: HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SalonSiteError::Network(format!("{tab}: failed to read body: {e}")))?;

    // Unpublished or private sheets answer 200 with a sign-in page.
    if body.trim_start().starts_with('<') {
        return Err(SalonSiteError::validation(format!(
            "{tab}: expected CSV but received HTML; is the sheet published?"
        )));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SHEET_ID: &str = "test-sheet";

    fn config_for(server: &MockServer) -> SheetConfig {
        SheetConfig {
            id: SHEET_ID.into(),
            base_url: format!("{}/spreadsheets/d", server.uri()),
            timeout_secs: 5,
            ..SheetConfig::default()
        }
    }

    async fn mount_tab(server: &MockServer, tab: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/spreadsheets/d/{SHEET_ID}/gviz/tq")))
            .and(query_param("tqx", "out:csv"))
            .and(query_param("sheet", tab))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[test]
    fn tab_url_encodes_sheet_name() {
        let config = SheetConfig {
            id: "abc".into(),
            ..SheetConfig::default()
        };
        let client = SheetClient::new(&config).unwrap();
        let url = client.tab_url("store details").unwrap();

        assert_eq!(url.path(), "/spreadsheets/d/abc/gviz/tq");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("tqx".into(), "out:csv".into())));
        assert!(pairs.contains(&("sheet".into(), "store details".into())));
    }

    #[tokio::test]
    async fn fetch_tables_reads_all_tabs() {
        let server = MockServer::start().await;

        mount_tab(&server, "store_details", "Store_ID,Store_Name\nStore_N78,Indiranagar\n").await;
        mount_tab(&server, "services", "Service_Name,Category,Store_N78\nHair Cut,Hair,Yes\n").await;
        mount_tab(&server, "offers", "Store_ID,Offer_Title\nStore_N78,Flat 20%\n,\n").await;
        mount_tab(&server, "stylists", "Store_ID,Name\nStore_N78,Asha\nStore_N78,Ravi\n").await;

        let tables = fetch_tables(&config_for(&server)).await.unwrap();

        assert_eq!(tables.stores.len(), 1);
        assert_eq!(tables.stores[0]["Store_Name"], "Indiranagar");
        assert_eq!(tables.services.len(), 1);
        assert_eq!(tables.offers.len(), 1);
        assert_eq!(tables.stylists.len(), 2);
    }

    #[tokio::test]
    async fn http_error_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetch_tables(&config_for(&server)).await.unwrap_err();
        assert!(matches!(err, SalonSiteError::Network(_)));
        assert!(err.to_string().contains("store_details"));
    }

    #[tokio::test]
    async fn html_body_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<!DOCTYPE html><html><body>Sign in</body></html>"),
            )
            .mount(&server)
            .await;

        let client = SheetClient::new(&config_for(&server)).unwrap();
        let err = client.fetch_tab("offers").await.unwrap_err();
        assert!(err.to_string().contains("expected CSV"));
    }

    #[tokio::test]
    async fn later_tab_failure_aborts_fetch() {
        let server = MockServer::start().await;

        mount_tab(&server, "store_details", "Store_ID\nStore_N78\n").await;
        mount_tab(&server, "services", "Service_Name\nHair Cut\n").await;
        Mock::given(method("GET"))
            .and(query_param("sheet", "offers"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = fetch_tables(&config_for(&server)).await.unwrap_err();
        assert!(err.to_string().contains("offers: HTTP 500"));
    }
}
