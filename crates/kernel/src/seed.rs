//! Sample catalog for development databases.
//!
//! Loading is idempotent: records whose slug already exists are skipped.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate, Utc};
use tracing::info;

use crate::models::{CreateCategory, CreateConvention};
use crate::storage::DirectoryStore;

struct SampleCategory {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    color: &'static str,
}

struct SampleConvention {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    city: &'static str,
    region: &'static str,
    address: Option<&'static str>,
    postal_code: &'static str,
    /// (month, day) of first and last day.
    start: (u32, u32),
    end: (u32, u32),
    website: Option<&'static str>,
    ticket_url: Option<&'static str>,
    price: &'static str,
    popular: bool,
    category: &'static str,
}

const CATEGORIES: &[SampleCategory] = &[
    SampleCategory {
        name: "Jeux Vidéo / Geek",
        slug: "jeux-video-geek",
        description: "Conventions dédiées aux jeux vidéo, mangas, comics et culture geek",
        color: "#3B82F6",
    },
    SampleCategory {
        name: "Automobile",
        slug: "automobile",
        description: "Salons de l'automobile et événements liés à l'automobile",
        color: "#EF4444",
    },
    SampleCategory {
        name: "Manga / Anime",
        slug: "manga-anime",
        description: "Conventions dédiées au manga et à l'anime",
        color: "#8B5CF6",
    },
];

const CONVENTIONS: &[SampleConvention] = &[
    SampleConvention {
        name: "Paris Games Week",
        slug: "paris-games-week",
        description: "Le plus grand événement gaming de France",
        city: "Paris",
        region: "Île-de-France",
        address: Some("Parc des Expositions de Paris"),
        postal_code: "75015",
        start: (10, 30),
        end: (11, 3),
        website: Some("https://www.parisgamesweek.com"),
        ticket_url: Some("https://www.parisgamesweek.com/billetterie"),
        price: "À partir de 20€",
        popular: true,
        category: "jeux-video-geek",
    },
    SampleConvention {
        name: "Japan Expo",
        slug: "japan-expo",
        description: "Le plus grand festival de culture japonaise en Europe",
        city: "Paris",
        region: "Île-de-France",
        address: Some("Parc des Expositions de Paris-Nord Villepinte"),
        postal_code: "93420",
        start: (7, 5),
        end: (7, 8),
        website: Some("https://www.japan-expo-paris.com"),
        ticket_url: Some("https://www.japan-expo-paris.com/fr/billetterie"),
        price: "À partir de 25€",
        popular: true,
        category: "manga-anime",
    },
    SampleConvention {
        name: "Paris Manga",
        slug: "paris-manga",
        description: "Convention manga et anime à Paris",
        city: "Paris",
        region: "Île-de-France",
        address: Some("Grande Halle de La Villette"),
        postal_code: "75019",
        start: (3, 15),
        end: (3, 17),
        website: Some("https://www.parismanga.fr"),
        ticket_url: None,
        price: "À partir de 15€",
        popular: true,
        category: "manga-anime",
    },
    SampleConvention {
        name: "Japan Wave",
        slug: "japan-wave-douai",
        description: "Festival de culture japonaise à Douai",
        city: "Douai",
        region: "Hauts-de-France",
        address: Some("Gayant Expo"),
        postal_code: "59500",
        start: (5, 10),
        end: (5, 12),
        website: Some("https://www.japan-wave.fr"),
        ticket_url: None,
        price: "À partir de 12€",
        popular: false,
        category: "manga-anime",
    },
    SampleConvention {
        name: "Salon de l'Automobile de Paris",
        slug: "salon-auto-paris",
        description: "Le Mondial de l'Automobile, le plus grand salon auto de France",
        city: "Paris",
        region: "Île-de-France",
        address: Some("Parc des Expositions de Paris"),
        postal_code: "75015",
        start: (10, 15),
        end: (10, 27),
        website: Some("https://www.mondial-automobile.com"),
        ticket_url: Some("https://www.mondial-automobile.com/billetterie"),
        price: "À partir de 18€",
        popular: true,
        category: "automobile",
    },
    SampleConvention {
        name: "Festival Manga Orchies",
        slug: "manga-orchies",
        description: "Petit événement manga dans la ville d'Orchies",
        city: "Orchies",
        region: "Hauts-de-France",
        address: None,
        postal_code: "59310",
        start: (6, 20),
        end: (6, 21),
        website: None,
        ticket_url: None,
        price: "Gratuit",
        popular: false,
        category: "manga-anime",
    },
];

/// Counts of records written by [`load`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub conventions: usize,
}

fn rfc3339(year: i32, (month, day): (u32, u32)) -> Result<String> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc().to_rfc3339())
        .ok_or_else(|| anyhow!("invalid seed date {year}-{month}-{day}"))
}

/// Insert the sample catalog, dated in the year after the current one.
pub async fn load(store: &dyn DirectoryStore) -> Result<SeedReport> {
    load_for_year(store, Utc::now().year() + 1).await
}

/// Insert the sample catalog with conventions dated in `year`.
pub async fn load_for_year(store: &dyn DirectoryStore, year: i32) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for sample in CATEGORIES {
        if store.find_category_by_slug(sample.slug).await?.is_some() {
            continue;
        }
        let input = CreateCategory {
            name: Some(sample.name.to_string()),
            slug: Some(sample.slug.to_string()),
            description: Some(sample.description.to_string()),
            icon: None,
            color: Some(sample.color.to_string()),
        }
        .validate()
        .map_err(|e| anyhow!("invalid seed category {}: {e:?}", sample.slug))?;

        store
            .create_category(&input)
            .await
            .with_context(|| format!("failed to seed category {}", sample.slug))?;
        report.categories += 1;
    }

    for sample in CONVENTIONS {
        if store.find_convention_by_slug(sample.slug).await?.is_some() {
            continue;
        }
        let category = store
            .find_category_by_slug(sample.category)
            .await?
            .with_context(|| format!("seed category {} is missing", sample.category))?;

        let input = CreateConvention {
            name: Some(sample.name.to_string()),
            slug: Some(sample.slug.to_string()),
            description: Some(sample.description.to_string()),
            city: Some(sample.city.to_string()),
            region: Some(sample.region.to_string()),
            address: sample.address.map(str::to_string),
            postal_code: Some(sample.postal_code.to_string()),
            country: None,
            start_date: Some(rfc3339(year, sample.start)?),
            end_date: Some(rfc3339(year, sample.end)?),
            website: sample.website.map(str::to_string),
            ticket_url: sample.ticket_url.map(str::to_string),
            price: Some(sample.price.to_string()),
            is_popular: Some(sample.popular),
            is_verified: Some(sample.popular),
            image_url: None,
            category_id: Some(category.id.to_string()),
        }
        .validate()
        .map_err(|e| anyhow!("invalid seed convention {}: {e:?}", sample.slug))?;

        store
            .create_convention(&input)
            .await
            .with_context(|| format!("failed to seed convention {}", sample.slug))?;
        report.conventions += 1;
    }

    info!(
        categories = report.categories,
        conventions = report.conventions,
        "sample catalog loaded"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryDirectoryStore;

    #[tokio::test]
    async fn loads_once() {
        let store = MemoryDirectoryStore::new();

        let first = load_for_year(&store, 2030).await.unwrap();
        assert_eq!(
            first,
            SeedReport {
                categories: 3,
                conventions: 6
            }
        );

        let second = load_for_year(&store, 2030).await.unwrap();
        assert_eq!(second, SeedReport::default());
    }

    #[tokio::test]
    async fn seeded_dates_use_requested_year() {
        let store = MemoryDirectoryStore::new();
        load_for_year(&store, 2030).await.unwrap();

        let pgw = store
            .find_convention_by_slug("paris-games-week")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pgw.start_date.to_rfc3339(), "2030-10-30T00:00:00+00:00");
        assert_eq!(pgw.end_date.to_rfc3339(), "2030-11-03T00:00:00+00:00");
        assert_eq!(pgw.category.slug, "jeux-video-geek");
    }
}
