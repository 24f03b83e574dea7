//! Curated baseline catalog supplied as static configuration.

use std::collections::{BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{
    BuildingDetails, ElectricitySource, Listing, ListingFeatures, ListingId,
    LocalizedText, PropertyLayout, PropertyType,
};

#[derive(Debug, thiserror::Error)]
pub enum BaselineImportError {
    #[error("failed to read baseline catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid baseline catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("baseline catalog line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
    #[error("baseline catalog lists id {0} more than once")]
    DuplicateId(ListingId),
}

pub struct BaselineCatalog;

impl BaselineCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Listing>, BaselineImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Listing>, BaselineImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut listings = Vec::new();
        let mut seen = HashSet::new();

        let headers = csv_reader.headers()?.clone();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |position| position.line());
            let row: BaselineRow = record.deserialize(Some(&headers))?;
            let listing = row
                .into_listing()
                .map_err(|reason| BaselineImportError::InvalidRow { line, reason })?;
            if !seen.insert(listing.id) {
                return Err(BaselineImportError::DuplicateId(listing.id));
            }
            listings.push(listing);
        }

        tracing::info!(count = listings.len(), "baseline catalog imported");
        Ok(listings)
    }

    /// Built-in showcase listings used when no baseline file is configured.
    pub fn sample() -> Vec<Listing> {
        vec![
            showcase(
                1,
                PropertyLayout::Villa,
                ("Beirut Hills, Baabda", "تلال بيروت، بعبدا"),
                (950_000.0, 420.0),
                Rooms {
                    bedrooms: 5,
                    bathrooms: 4,
                    living_rooms: 2,
                    kitchens: 1,
                    balconies: 3,
                    parking: 3,
                },
                2018,
            ),
            showcase(
                2,
                PropertyLayout::Apartment(BuildingDetails {
                    total_floors: 14,
                    floor_number: 9,
                    elevator: true,
                }),
                ("Achrafieh, Beirut", "الأشرفية، بيروت"),
                (320_000.0, 165.0),
                Rooms {
                    bedrooms: 3,
                    bathrooms: 2,
                    living_rooms: 1,
                    kitchens: 1,
                    balconies: 2,
                    parking: 1,
                },
                2012,
            ),
            showcase(
                3,
                PropertyLayout::Commercial(BuildingDetails {
                    total_floors: 6,
                    floor_number: 0,
                    elevator: true,
                }),
                ("Hamra Street, Beirut", "شارع الحمراء، بيروت"),
                (540_000.0, 210.0),
                Rooms {
                    bedrooms: 0,
                    bathrooms: 2,
                    living_rooms: 0,
                    kitchens: 1,
                    balconies: 0,
                    parking: 2,
                },
                2005,
            ),
            showcase(
                4,
                PropertyLayout::Land,
                ("Batroun Coast", "ساحل البترون"),
                (180_000.0, 1_500.0),
                Rooms::default(),
                0,
            ),
        ]
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Rooms {
    bedrooms: u32,
    bathrooms: u32,
    living_rooms: u32,
    kitchens: u32,
    balconies: u32,
    parking: u32,
}

fn showcase(
    id: i64,
    layout: PropertyLayout,
    (address_en, address_ar): (&str, &str),
    (price, size): (f64, f64),
    rooms: Rooms,
    construction_year: u16,
) -> Listing {
    Listing {
        id: ListingId(id),
        cover_image: format!("https://picsum.photos/seed/baseline-{id}/800/600"),
        address: LocalizedText::new(address_en, Some(address_ar.to_string())),
        features: ListingFeatures {
            layout,
            price,
            size,
            bedrooms: rooms.bedrooms,
            bathrooms: rooms.bathrooms,
            living_rooms: rooms.living_rooms,
            kitchens: rooms.kitchens,
            balconies: rooms.balconies,
            parking: rooms.parking,
            furnished: matches!(layout, PropertyLayout::Villa),
            construction_year,
            water_source: "Municipal".to_string(),
            electricity_sources: BTreeSet::from([ElectricitySource::BuildingGenerator]),
            maps_link: format!("https://maps.google.com/?q=baseline-{id}"),
            description: None,
        },
    }
}

#[derive(Debug, Deserialize)]
struct BaselineRow {
    id: i64,
    #[serde(rename = "type")]
    property_type: String,
    cover_image: String,
    address_en: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    address_ar: Option<String>,
    price: f64,
    size: f64,
    #[serde(default)]
    bedrooms: u32,
    #[serde(default)]
    bathrooms: u32,
    #[serde(default)]
    living_rooms: u32,
    #[serde(default)]
    kitchens: u32,
    #[serde(default)]
    balconies: u32,
    #[serde(default)]
    parking: u32,
    #[serde(default)]
    furnished: bool,
    #[serde(default)]
    construction_year: u16,
    #[serde(default)]
    water_source: String,
    #[serde(default)]
    electricity_source: String,
    #[serde(default)]
    maps_link: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(default)]
    total_floors: Option<u16>,
    #[serde(default)]
    floor_number: Option<i16>,
    #[serde(default)]
    elevator: Option<bool>,
}

impl BaselineRow {
    fn into_listing(self) -> Result<Listing, String> {
        let kind = PropertyType::parse(&self.property_type)
            .ok_or_else(|| format!("unknown property type '{}'", self.property_type))?;
        if !(self.price > 0.0) || !(self.size > 0.0) {
            return Err("price and size must be positive".to_string());
        }

        let building = match (self.total_floors, self.floor_number, self.elevator) {
            (None, None, None) => None,
            (Some(total_floors), Some(floor_number), Some(elevator)) => Some(BuildingDetails {
                total_floors,
                floor_number,
                elevator,
            }),
            _ => return Err("total_floors, floor_number and elevator go together".to_string()),
        };
        let layout = PropertyLayout::new(kind, building)
            .map_err(|mismatch| mismatch.to_string())?;

        let electricity_sources = parse_electricity(&self.electricity_source)?;

        Ok(Listing {
            id: ListingId(self.id),
            cover_image: self.cover_image,
            address: LocalizedText::new(self.address_en, self.address_ar),
            features: ListingFeatures {
                layout,
                price: self.price,
                size: self.size,
                bedrooms: self.bedrooms,
                bathrooms: self.bathrooms,
                living_rooms: self.living_rooms,
                kitchens: self.kitchens,
                balconies: self.balconies,
                parking: self.parking,
                furnished: self.furnished,
                construction_year: self.construction_year,
                water_source: self.water_source,
                electricity_sources,
                maps_link: self.maps_link,
                description: self.description,
            },
        })
    }
}

fn parse_electricity(raw: &str) -> Result<BTreeSet<ElectricitySource>, String> {
    raw.split(';')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(|tag| {
            ElectricitySource::parse(tag).ok_or_else(|| format!("unknown electricity source '{tag}'"))
        })
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
