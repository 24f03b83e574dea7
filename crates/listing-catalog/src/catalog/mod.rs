//! Published listings: the curated baseline, approved submissions, and browse filtering.

pub mod aggregator;
pub mod baseline;
pub mod domain;
pub mod filter;
pub mod service;

pub use aggregator::{
    locate_listing, placeholder_cover, project_submission, remove_listing, visible_catalog,
    ListingSource,
};
pub use baseline::{BaselineCatalog, BaselineImportError};
pub use domain::{
    BuildingDetails, ElectricitySource, LayoutMismatch, Listing, ListingCard, ListingFeatures,
    ListingId, Locale, LocalizedText, PropertyLayout, PropertyType,
};
pub use filter::{
    filter_catalog, matches, BedroomBound, CategoryFilter, FilterForm, FilterQuery, Range,
};
pub use service::CatalogService;
