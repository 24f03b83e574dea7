use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity shared by baseline listings and approved submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub i64);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed category enumeration for catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Villa,
    Apartment,
    Commercial,
    Land,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Villa,
        PropertyType::Apartment,
        PropertyType::Commercial,
        PropertyType::Land,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PropertyType::Villa => "villa",
            PropertyType::Apartment => "apartment",
            PropertyType::Commercial => "commercial",
            PropertyType::Land => "land",
        }
    }

    /// Apartments and commercial units sit inside a building and carry floor data.
    pub const fn is_in_building(self) -> bool {
        matches!(self, PropertyType::Apartment | PropertyType::Commercial)
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == normalized)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Floor information only apartments and commercial units have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingDetails {
    pub total_floors: u16,
    pub floor_number: i16,
    pub elevator: bool,
}

/// Category together with the fields whose presence depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyLayout {
    Villa,
    Apartment(BuildingDetails),
    Commercial(BuildingDetails),
    Land,
}

impl PropertyLayout {
    /// Pair a category with optional building data, refusing combinations the category forbids.
    pub fn new(
        kind: PropertyType,
        building: Option<BuildingDetails>,
    ) -> Result<Self, LayoutMismatch> {
        match (kind, building) {
            (PropertyType::Villa, None) => Ok(PropertyLayout::Villa),
            (PropertyType::Land, None) => Ok(PropertyLayout::Land),
            (PropertyType::Apartment, Some(details)) => Ok(PropertyLayout::Apartment(details)),
            (PropertyType::Commercial, Some(details)) => Ok(PropertyLayout::Commercial(details)),
            (kind, Some(_)) => Err(LayoutMismatch::UnexpectedBuildingDetails(kind)),
            (kind, None) => Err(LayoutMismatch::MissingBuildingDetails(kind)),
        }
    }

    pub const fn property_type(&self) -> PropertyType {
        match self {
            PropertyLayout::Villa => PropertyType::Villa,
            PropertyLayout::Apartment(_) => PropertyType::Apartment,
            PropertyLayout::Commercial(_) => PropertyType::Commercial,
            PropertyLayout::Land => PropertyType::Land,
        }
    }

    pub const fn building(&self) -> Option<&BuildingDetails> {
        match self {
            PropertyLayout::Apartment(details) | PropertyLayout::Commercial(details) => {
                Some(details)
            }
            PropertyLayout::Villa | PropertyLayout::Land => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutMismatch {
    #[error("{0} listings must include total floors, floor number and elevator")]
    MissingBuildingDetails(PropertyType),
    #[error("{0} listings cannot carry building floor details")]
    UnexpectedBuildingDetails(PropertyType),
}

/// Display locales supported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ar];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "ar" => Some(Locale::Ar),
            _ => None,
        }
    }
}

/// Text keyed by locale; English is the fallback when a translation is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ar: Option<String>,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, ar: Option<String>) -> Self {
        Self { en: en.into(), ar }
    }

    /// Same text for every supported locale.
    pub fn uniform(text: &str) -> Self {
        Self {
            en: text.to_string(),
            ar: Some(text.to_string()),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => self.ar.as_deref().unwrap_or(&self.en),
        }
    }

    /// Value stored for exactly this locale, without fallback.
    pub fn exact(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::En => Some(&self.en),
            Locale::Ar => self.ar.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectricitySource {
    Solar,
    BuildingGenerator,
    Other,
}

impl ElectricitySource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "solar" => Some(ElectricitySource::Solar),
            "building_generator" | "generator" => Some(ElectricitySource::BuildingGenerator),
            "other" => Some(ElectricitySource::Other),
            _ => None,
        }
    }
}

/// Every descriptive field a published listing and a candidate listing share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingFeatures {
    pub layout: PropertyLayout,
    pub price: f64,
    pub size: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub living_rooms: u32,
    pub kitchens: u32,
    pub balconies: u32,
    pub parking: u32,
    pub furnished: bool,
    pub construction_year: u16,
    pub water_source: String,
    #[serde(default)]
    pub electricity_sources: BTreeSet<ElectricitySource>,
    pub maps_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ListingFeatures {
    pub const fn property_type(&self) -> PropertyType {
        self.layout.property_type()
    }
}

/// Catalog-visible property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub cover_image: String,
    pub address: LocalizedText,
    #[serde(flatten)]
    pub features: ListingFeatures,
}

impl Listing {
    pub const fn property_type(&self) -> PropertyType {
        self.features.property_type()
    }

    pub fn card(&self, locale: Locale) -> ListingCard {
        ListingCard {
            id: self.id,
            property_type: self.property_type(),
            cover_image: self.cover_image.clone(),
            address: self.address.get(locale).to_string(),
            price: self.features.price,
        }
    }
}

/// Condensed listing used by the browse grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingCard {
    pub id: ListingId,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub cover_image: String,
    pub address: String,
    pub price: f64,
}
