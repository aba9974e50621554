//! Core pipeline orchestration and domain logic for salonsite.
//!
//! This crate turns the fetched sheet tables into a catalog of stores,
//! services, offers and stylists, assembles one view model per page, and
//! drives rendering and writing (e.g., `build_site`).

pub mod catalog;
pub mod normalize;
pub mod pages;
pub mod pipeline;
pub mod records;

pub use catalog::{Catalog, CategoryPrice};
pub use pages::{Page, PageAssembler, PageKind, store_slug};
pub use pipeline::{
    BuildOptions, BuildResult, ProgressReporter, SilentProgress, build_from_tables, build_site,
};
