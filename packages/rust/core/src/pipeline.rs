//! End-to-end `build` pipeline: sheet → catalog → pages → render → write.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{info, instrument};

use salonsite_render::{Renderer, WrittenFile, write_page};
use salonsite_shared::{Result, SheetTables, SiteConfig};

use crate::catalog::Catalog;
use crate::pages::PageAssembler;

/// Options for a single build, on top of the site configuration.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory the site is written into.
    pub output_root: PathBuf,
    /// Date offers are checked against.
    pub today: NaiveDate,
    /// Minify HTML before writing.
    pub minify: bool,
}

/// Result of a build.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages written.
    pub pages_written: usize,
    /// Written files, in output order.
    pub files: Vec<WrittenFile>,
    pub active_stores: usize,
    /// Names of stores in the canonical order that are switched off.
    pub skipped_stores: Vec<String>,
    pub services: usize,
    /// Active offers at active stores.
    pub active_offers: usize,
    pub stylists: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page is written.
    fn page_written(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_written(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Fetch the sheet and build the site.
#[instrument(skip_all, fields(sheet = %config.sheet.id, out = %options.output_root.display()))]
pub async fn build_site(
    config: &SiteConfig,
    options: &BuildOptions,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    progress.phase("Fetching sheet data");
    let tables = salonsite_sheets::fetch_tables(&config.sheet).await?;
    info!(
        stores = tables.stores.len(),
        services = tables.services.len(),
        offers = tables.offers.len(),
        stylists = tables.stylists.len(),
        "sheet fetched"
    );

    build_from_tables(&tables, config, options, progress)
}

/// Build the site from already-fetched tables.
///
/// 1. Catalog: parse rows, select and order stores
/// 2. Assemble one view model per page
/// 3. Render each page and write it
#[instrument(skip_all, fields(today = %options.today, minify = options.minify))]
pub fn build_from_tables(
    tables: &SheetTables,
    config: &SiteConfig,
    options: &BuildOptions,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();
    config.validate()?;

    // --- Phase 1: Catalog ---
    progress.phase("Joining sheet data");
    let catalog = Catalog::build(tables, config, options.today)?;
    for store in catalog.skipped() {
        info!(store = %store.id, name = %store.name, "skipping inactive store");
    }

    // --- Phase 2: Pages ---
    progress.phase("Assembling pages");
    let pages = PageAssembler::new(&catalog, config).all_pages()?;

    let renderer = match &config.site.template_dir {
        Some(dir) => Renderer::from_dir(Path::new(dir))?,
        None => Renderer::builtin()?,
    };

    // --- Phase 3: Render + write ---
    progress.phase("Rendering pages");
    let minify = options.minify || config.site.minify;
    let total = pages.len();
    let mut files = Vec::with_capacity(total);

    for (i, page) in pages.iter().enumerate() {
        let html = renderer.render(page.template, &page.context)?;
        let written = write_page(&options.output_root, &page.path, &html, minify)?;
        progress.page_written(&written.path.to_string_lossy(), i + 1, total);
        files.push(written);
    }

    let result = BuildResult {
        pages_written: files.len(),
        files,
        active_stores: catalog.stores().len(),
        skipped_stores: catalog.skipped().iter().map(|s| s.name.clone()).collect(),
        services: catalog.services().len(),
        active_offers: catalog.active_offer_count(),
        stylists: catalog.stylists().len(),
        elapsed: start.elapsed(),
    };

    info!(
        pages = result.pages_written,
        active_stores = result.active_stores,
        skipped = result.skipped_stores.len(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "build complete"
    );

    progress.done(&result);
    Ok(result)
}
