use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// STORED RECORDS
// ============================================================================

/// Business row as stored in the `businesses` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusinessRecord {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub location: String,
    pub rating: f64,
    pub total_rating: f64,
    pub reviews: i32,
    pub badge: Option<String>,
    pub verified: bool,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    pub href: Option<String>,
    pub service_percentile: Option<i32>,
    pub price_percentile: Option<i32>,
    pub ambience_percentile: Option<i32>,
    pub distance_km: Option<f64>,
    pub price_range: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Interest reference entry (table `interests`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Interest {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Deal-breaker reference entry (table `deal_breakers`)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DealBreaker {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

// ============================================================================
// INTEREST SEED SET
// ============================================================================

/// Fixed interest seed pairs, keyed by id (the upsert conflict target).
pub const INTEREST_SEED: [(&str, &str); 8] = [
    ("coffee", "Coffee & Cafés"),
    ("restaurants", "Restaurants"),
    ("fitness", "Fitness & Wellness"),
    ("nightlife", "Nightlife"),
    ("shopping", "Shopping"),
    ("arts", "Arts & Culture"),
    ("outdoors", "Outdoors"),
    ("family", "Family Activities"),
];

/// In-memory seed list, sorted by name like the table read.
pub fn interest_seed_entries() -> Vec<Interest> {
    let mut entries: Vec<Interest> = INTEREST_SEED
        .iter()
        .map(|(id, name)| Interest {
            id: (*id).to_string(),
            name: (*name).to_string(),
            icon: None,
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

// ============================================================================
// VIEW MODELS
// ============================================================================

/// Percentile scores, shown together only when the row carries all three
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentileScores {
    pub service: i32,
    pub price: i32,
    pub ambience: i32,
}

/// Business reshaped for the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessView {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub location: String,
    pub rating: f64,
    pub total_rating: f64,
    pub reviews: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentiles: Option<PercentileScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl BusinessView {
    /// Collection transform. `href` is passed through exactly as stored and
    /// may be absent.
    pub fn from_record(record: BusinessRecord) -> Self {
        let percentiles = match (
            record.service_percentile,
            record.price_percentile,
            record.ambience_percentile,
        ) {
            (Some(service), Some(price), Some(ambience)) => Some(PercentileScores {
                service,
                price,
                ambience,
            }),
            _ => None,
        };

        let distance = record.distance_km.map(|km| format!("{} km", km));

        Self {
            id: record.id,
            slug: record.slug,
            name: record.name,
            category: record.category,
            location: record.location,
            rating: record.rating,
            total_rating: record.total_rating,
            reviews: record.reviews,
            badge: record.badge,
            verified: record.verified,
            image: record.image,
            image_alt: record.image_alt,
            href: record.href,
            percentiles,
            distance,
            price_range: record.price_range,
            description: record.description,
            phone: record.phone,
            website: record.website,
            address: record.address,
        }
    }

    /// Single-entity transform: an absent or empty `href` falls back to the
    /// slug route.
    pub fn from_record_with_href_default(record: BusinessRecord) -> Self {
        let mut view = Self::from_record(record);
        if view.href.as_deref().map_or(true, str::is_empty) {
            view.href = Some(format!("/business/{}", view.slug));
        }
        view
    }
}

/// Placeholder trait scores on the detail view. Not read from storage; the
/// backing columns do not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitScores {
    pub trust: i32,
    pub punctuality: i32,
    pub friendliness: i32,
}

impl TraitScores {
    pub const PLACEHOLDER: Self = Self {
        trust: 92,
        punctuality: 88,
        friendliness: 95,
    };
}

/// Special offer entry on the detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Special {
    pub title: String,
    pub description: String,
}

/// Detail view served by the single-entity lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessDetail {
    #[serde(flatten)]
    pub business: BusinessView,
    pub scores: TraitScores,
    pub specials: Vec<Special>,
}

impl BusinessDetail {
    pub fn from_record(record: BusinessRecord) -> Self {
        Self {
            business: BusinessView::from_record_with_href_default(record),
            scores: TraitScores::PLACEHOLDER,
            specials: vec![Special {
                title: "Happy Hour".to_string(),
                description: "Two-for-one on selected items, weekdays 4-6pm".to_string(),
            }],
        }
    }
}

// ============================================================================
// QUERY FILTERS
// ============================================================================

/// Default row cap for the collection listing.
pub const DEFAULT_LISTING_LIMIT: i64 = 20;

/// Parsed collection filters. `verified` is only ever `Some(true)`: the
/// query parameter enables the filter with the literal string "true" and is
/// ignored otherwise, including "false".
#[derive(Debug, Clone)]
pub struct BusinessFilter {
    pub category: Option<String>,
    pub badge: Option<String>,
    pub verified: Option<bool>,
    pub limit: i64,
}

impl Default for BusinessFilter {
    fn default() -> Self {
        Self {
            category: None,
            badge: None,
            verified: None,
            limit: DEFAULT_LISTING_LIMIT,
        }
    }
}

// ============================================================================
// RESPONSE ENVELOPES
// ============================================================================

/// Envelope for the collection listing
#[derive(Debug, Serialize)]
pub struct BusinessListResponse {
    pub businesses: Vec<BusinessView>,
    pub count: usize,
}

impl BusinessListResponse {
    pub fn new(businesses: Vec<BusinessView>) -> Self {
        let count = businesses.len();
        Self { businesses, count }
    }
}

/// Envelope for the single-entity lookup
#[derive(Debug, Serialize)]
pub struct BusinessDetailResponse {
    pub data: BusinessDetail,
}

/// Envelope for the deal-breakers lookup list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealBreakerListResponse {
    pub deal_breakers: Vec<DealBreaker>,
    pub count: usize,
}

impl DealBreakerListResponse {
    pub fn new(deal_breakers: Vec<DealBreaker>) -> Self {
        let count = deal_breakers.len();
        Self {
            deal_breakers,
            count,
        }
    }
}

/// Envelope for the interests lookup list
#[derive(Debug, Serialize)]
pub struct InterestListResponse {
    pub interests: Vec<Interest>,
    pub count: usize,
}

impl InterestListResponse {
    pub fn new(interests: Vec<Interest>) -> Self {
        let count = interests.len();
        Self { interests, count }
    }
}
