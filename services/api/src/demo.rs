use crate::cli::StorageArgs;
use crate::infra::{apply_storage_overrides, open_catalog};
use clap::Args;
use listing_catalog::catalog::{
    BaselineCatalog, BuildingDetails, CatalogService, ElectricitySource, FilterForm, FilterQuery,
    Listing, ListingFeatures, Locale, PropertyLayout,
};
use listing_catalog::config::AppConfig;
use listing_catalog::error::AppError;
use listing_catalog::submissions::{
    CandidateListing, MemoryStore, Submission, SubmissionPayload, SubmissionStatus,
    SubmissionStore,
};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
    /// Case-insensitive address fragment (English or Arabic)
    #[arg(long, default_value = "")]
    pub(crate) location: String,
    /// Minimum bedrooms ("any" or a number)
    #[arg(long, default_value = "")]
    pub(crate) bedrooms: String,
    #[arg(long, default_value = "")]
    pub(crate) min_price: String,
    #[arg(long, default_value = "")]
    pub(crate) max_price: String,
    #[arg(long, default_value = "")]
    pub(crate) min_size: String,
    #[arg(long, default_value = "")]
    pub(crate) max_size: String,
    /// villa, apartment, commercial, land, or all
    #[arg(long, default_value = "")]
    pub(crate) category: String,
    /// Display locale for addresses (en or ar)
    #[arg(long, default_value = "en")]
    pub(crate) lang: String,
}

impl CatalogArgs {
    fn form(&self) -> FilterForm {
        FilterForm {
            location: self.location.clone(),
            bedrooms: self.bedrooms.clone(),
            min_price: self.min_price.clone(),
            max_price: self.max_price.clone(),
            min_size: self.min_size.clone(),
            max_size: self.max_size.clone(),
            category: self.category.clone(),
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct QueueArgs {
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
    /// pending, approved, or rejected; all statuses when omitted
    #[arg(long, value_parser = crate::infra::parse_status)]
    pub(crate) status: Option<SubmissionStatus>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Display locale for the printed catalog (en or ar)
    #[arg(long, default_value = "en")]
    pub(crate) lang: String,
}

pub(crate) fn run_catalog_query(args: CatalogArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    let query = FilterQuery::from(args.form());
    let locale = Locale::parse(&args.lang).unwrap_or_default();
    apply_storage_overrides(&mut config.storage, args.storage);

    let catalog = open_catalog(&config.storage)?;
    let results = catalog.search(&query);
    println!(
        "{} of {} listings match",
        results.len(),
        catalog.visible().len()
    );
    render_listings(&results, locale);
    Ok(())
}

pub(crate) fn run_submission_queue(args: QueueArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    apply_storage_overrides(&mut config.storage, args.storage);

    let catalog = open_catalog(&config.storage)?;
    let counts = catalog.submissions().counts();
    println!(
        "Moderation queue: {} pending | {} approved | {} rejected",
        counts.pending, counts.approved, counts.rejected
    );
    render_submissions(&catalog.submissions().list(args.status));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let locale = Locale::parse(&args.lang).unwrap_or_default();
    let store = Arc::new(MemoryStore::default());
    let catalog = CatalogService::new(BaselineCatalog::sample(), store.clone());

    println!("Listing catalog demo");
    println!("\nBaseline catalog");
    render_listings(&catalog.visible(), locale);

    let submitted = catalog.submissions().create(demo_payload());
    println!(
        "\nOwner {} submitted {} ({} images) as #{}",
        submitted.owner_name,
        submitted.property.full_address,
        submitted.uploaded_images.len(),
        submitted.id
    );

    let approved = catalog.submissions().approve(submitted.id, "b")?;
    println!(
        "Moderator approved #{} with cover '{}'",
        approved.id,
        approved.cover_image.as_deref().unwrap_or_default()
    );

    let rejected = catalog.submissions().create(demo_payload());
    catalog.submissions().reject(rejected.id)?;
    println!("Moderator rejected #{}", rejected.id);

    println!("\nPublished catalog");
    render_listings(&catalog.visible(), locale);

    let queries = [
        (
            "category=villa",
            FilterForm {
                category: "villa".to_string(),
                ..FilterForm::default()
            },
        ),
        (
            "minPrice=300000",
            FilterForm {
                min_price: "300000".to_string(),
                ..FilterForm::default()
            },
        ),
        (
            "location=tripoli",
            FilterForm {
                location: "tripoli".to_string(),
                ..FilterForm::default()
            },
        ),
        (
            "bedrooms=3",
            FilterForm {
                bedrooms: "3".to_string(),
                ..FilterForm::default()
            },
        ),
    ];
    for (label, form) in queries {
        let results = catalog.search(&FilterQuery::from(form));
        println!("\nFilter {label}: {} result(s)", results.len());
        render_listings(&results, locale);
    }

    let persisted = store.load_submissions()?;
    println!(
        "\nStore holds {} submission(s); {} persistence failure(s)",
        persisted.len(),
        catalog.submissions().persistence_failures()
    );
    Ok(())
}

fn demo_payload() -> SubmissionPayload {
    SubmissionPayload {
        owner_name: "Rima Haddad".to_string(),
        owner_phone: "+961 70 123 456".to_string(),
        property: CandidateListing {
            features: ListingFeatures {
                layout: PropertyLayout::Apartment(BuildingDetails {
                    total_floors: 8,
                    floor_number: 4,
                    elevator: true,
                }),
                price: 200_000.0,
                size: 120.0,
                bedrooms: 2,
                bathrooms: 1,
                living_rooms: 1,
                kitchens: 1,
                balconies: 1,
                parking: 1,
                furnished: false,
                construction_year: 2016,
                water_source: "Municipal".to_string(),
                electricity_sources: BTreeSet::from([ElectricitySource::BuildingGenerator]),
                maps_link: "https://maps.google.com/?q=Tripoli+Center".to_string(),
                description: None,
            },
            full_address: "Tripoli Center".to_string(),
        },
        uploaded_images: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        uploaded_documents: vec!["title-deed.pdf".to_string()],
        uploaded_owner_id: vec!["owner-id.png".to_string()],
    }
}

fn render_listings(listings: &[Listing], locale: Locale) {
    if listings.is_empty() {
        println!("  (none)");
        return;
    }
    for listing in listings {
        let card = listing.card(locale);
        println!(
            "  - #{} {} | {} | ${:.0} | {} bd | {:.0} m2 | cover {}",
            card.id,
            card.property_type,
            card.address,
            card.price,
            listing.features.bedrooms,
            listing.features.size,
            card.cover_image
        );
    }
}

fn render_submissions(submissions: &[Submission]) {
    if submissions.is_empty() {
        println!("  (none)");
        return;
    }
    for submission in submissions {
        println!(
            "  - #{} [{}] {} | {} | {} image(s) | owner {} ({})",
            submission.id,
            submission.status,
            submission.property.features.property_type(),
            submission.property.full_address,
            submission.uploaded_images.len(),
            submission.owner_name,
            submission.owner_phone
        );
    }
}
