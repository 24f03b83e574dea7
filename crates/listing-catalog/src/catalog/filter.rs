use serde::{Deserialize, Serialize};

use super::domain::{Listing, Locale, PropertyType};

/// Category selector; `All` leaves the category unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(PropertyType),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        PropertyType::parse(value).map_or(CategoryFilter::All, CategoryFilter::Only)
    }

    fn admits(self, kind: PropertyType) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == kind,
        }
    }
}

/// Lower bound on bedrooms; `Any` is the unconstrained sentinel, distinct from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedroomBound {
    #[default]
    Any,
    AtLeast(u32),
}

impl BedroomBound {
    /// The browse form offers "any" as `0`, so blank, `0` and `any` all mean no bound.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("any") {
            return BedroomBound::Any;
        }
        match trimmed.parse::<u32>() {
            Ok(0) | Err(_) => BedroomBound::Any,
            Ok(count) => BedroomBound::AtLeast(count),
        }
    }

    fn admits(self, bedrooms: u32) -> bool {
        match self {
            BedroomBound::Any => true,
            BedroomBound::AtLeast(minimum) => bedrooms >= minimum,
        }
    }
}

/// Inclusive numeric range where either side may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Range {
    pub const UNBOUNDED: Range = Range {
        min: None,
        max: None,
    };

    pub fn parse(min: &str, max: &str) -> Self {
        Self {
            min: parse_bound(min),
            max: parse_bound(max),
        }
    }

    fn admits(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

fn parse_bound(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            tracing::debug!(bound = trimmed, "ignoring non-numeric filter bound");
            None
        }
    }
}

/// Typed browse query. The default value constrains nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterQuery {
    pub location: String,
    pub bedrooms: BedroomBound,
    pub price: Range,
    pub size: Range,
    pub category: CategoryFilter,
}

impl FilterQuery {
    pub fn category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn bedrooms(mut self, bedrooms: BedroomBound) -> Self {
        self.bedrooms = bedrooms;
        self
    }

    pub fn price(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.price = Range { min, max };
        self
    }

    pub fn size(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.size = Range { min, max };
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self == &FilterQuery::default()
    }
}

/// Raw browse form as submitted by the listing UI: every field is free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterForm {
    pub location: String,
    pub bedrooms: String,
    pub min_price: String,
    pub max_price: String,
    pub min_size: String,
    pub max_size: String,
    pub category: String,
}

impl From<&FilterForm> for FilterQuery {
    fn from(form: &FilterForm) -> Self {
        FilterQuery {
            // Whitespace-only input counts as no location constraint.
            location: form.location.trim().to_string(),
            bedrooms: BedroomBound::parse(&form.bedrooms),
            price: Range::parse(&form.min_price, &form.max_price),
            size: Range::parse(&form.min_size, &form.max_size),
            category: CategoryFilter::parse(&form.category),
        }
    }
}

impl From<FilterForm> for FilterQuery {
    fn from(form: FilterForm) -> Self {
        FilterQuery::from(&form)
    }
}

/// Whether a listing satisfies every constraint in the query.
pub fn matches(listing: &Listing, query: &FilterQuery) -> bool {
    query.category.admits(listing.property_type())
        && location_matches(listing, &query.location)
        && query.price.admits(listing.features.price)
        && query.size.admits(listing.features.size)
        && query.bedrooms.admits(listing.features.bedrooms)
}

// Both scripts are searched regardless of the active display locale.
fn location_matches(listing: &Listing, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    [Locale::En, Locale::Ar].into_iter().any(|locale| {
        listing
            .address
            .exact(locale)
            .is_some_and(|address| address.to_lowercase().contains(&needle))
    })
}

/// Order-preserving selection of the listings that match the query.
pub fn filter_catalog(listings: &[Listing], query: &FilterQuery) -> Vec<Listing> {
    listings
        .iter()
        .filter(|listing| matches(listing, query))
        .cloned()
        .collect()
}
