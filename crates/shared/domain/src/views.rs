//! Role-shaped read models for store listings, rating listings and
//! dashboards.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Store;

/// Per-store aggregate as read from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRatingStats {
    pub store_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    /// Mean of all ratings, 0 when the store has none
    pub average_rating: f64,
}

/// Store row as seen by a SYSTEM_ADMIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AdminStoreView {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub address: String,
    pub rating: f64,
}

/// Store row as seen by a NORMAL_USER, including the caller's own rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserStoreView {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub rating: f64,
    pub user_rating: Option<i32>,
}

/// Store listing keyed by the caller's role.
///
/// Serialized untagged: the wire format is a bare array whose element shape
/// depends on the variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoreListing {
    Admin(Vec<AdminStoreView>),
    NormalUser(Vec<UserStoreView>),
}

impl StoreListing {
    pub fn for_admin(stats: Vec<StoreRatingStats>) -> Self {
        StoreListing::Admin(
            stats
                .into_iter()
                .map(|s| AdminStoreView {
                    id: s.store_id,
                    name: s.name,
                    email: s.email,
                    address: s.address,
                    rating: s.average_rating,
                })
                .collect(),
        )
    }

    /// `own_ratings` maps store id to the caller's rating for that store.
    pub fn for_normal_user(stats: Vec<StoreRatingStats>, own_ratings: &HashMap<Uuid, i32>) -> Self {
        StoreListing::NormalUser(
            stats
                .into_iter()
                .map(|s| UserStoreView {
                    user_rating: own_ratings.get(&s.store_id).copied(),
                    id: s.store_id,
                    name: s.name,
                    address: s.address,
                    rating: s.average_rating,
                })
                .collect(),
        )
    }
}

/// One rating of a store together with the rater's public identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RaterEntry {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub rating: i32,
    pub rated_at: DateTime<Utc>,
}

/// Platform-wide totals for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub total_users: u64,
    pub total_stores: u64,
    pub total_ratings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OwnedStore {
    pub id: Uuid,
    pub name: String,
}

/// Store-owner dashboard: own store, average, and raters newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub store: OwnedStore,
    /// Mean rating formatted with one decimal, "0.0" when unrated
    pub avg_rating: String,
    pub total_ratings: usize,
    pub raters: Vec<RaterEntry>,
}

impl OwnerSummary {
    /// `raters` must already be ordered most recent first.
    pub fn new(store: &Store, raters: Vec<RaterEntry>) -> Self {
        let average = average_rating(raters.iter().map(|r| r.rating));
        Self {
            store: OwnedStore {
                id: store.id,
                name: store.name.clone(),
            },
            avg_rating: format!("{:.1}", average),
            total_ratings: raters.len(),
            raters,
        }
    }
}

/// Arithmetic mean, 0 for an empty sequence.
pub fn average_rating(ratings: impl IntoIterator<Item = i32>) -> f64 {
    let (sum, count) = ratings
        .into_iter()
        .fold((0i64, 0u32), |(sum, count), r| (sum + i64::from(r), count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / f64::from(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(name: &str, average: f64) -> StoreRatingStats {
        StoreRatingStats {
            store_id: Uuid::new_v4(),
            name: name.to_string(),
            email: Some(format!("{}@shops.example.com", name)),
            address: "1 Market Street".to_string(),
            average_rating: average,
        }
    }

    fn store() -> Store {
        let now = Utc::now();
        Store {
            id: Uuid::new_v4(),
            name: "Owner Store".to_string(),
            email: None,
            address: "2 Market Street".to_string(),
            owner_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn rater(rating: i32) -> RaterEntry {
        RaterEntry {
            user_id: Uuid::new_v4(),
            name: "Some Rater With A Long Name".to_string(),
            email: "rater@example.com".to_string(),
            rating,
            rated_at: Utc::now(),
        }
    }

    #[test]
    fn test_average_defaults_to_zero() {
        assert_eq!(average_rating(Vec::new()), 0.0);
        assert_eq!(average_rating([4, 5]), 4.5);
    }

    #[test]
    fn test_admin_listing_keeps_email() {
        let listing = StoreListing::for_admin(vec![stats("alpha", 0.0)]);
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json[0]["email"], "alpha@shops.example.com");
        assert_eq!(json[0]["rating"], 0.0);
        assert!(json[0].get("userRating").is_none());
    }

    #[test]
    fn test_user_listing_joins_own_rating() {
        let rated = stats("rated", 3.0);
        let unrated = stats("unrated", 0.0);
        let own = HashMap::from([(rated.store_id, 4)]);

        let listing = StoreListing::for_normal_user(vec![rated, unrated], &own);
        let StoreListing::NormalUser(rows) = listing else {
            panic!("expected normal-user listing");
        };
        assert_eq!(rows[0].user_rating, Some(4));
        assert_eq!(rows[1].user_rating, None);

        let json = serde_json::to_value(&rows).unwrap();
        assert!(json[0].get("email").is_none());
        assert!(json[1]["userRating"].is_null());
    }

    #[test]
    fn test_owner_summary_average_and_count() {
        let summary = OwnerSummary::new(&store(), vec![rater(4), rater(5)]);
        assert_eq!(summary.avg_rating, "4.5");
        assert_eq!(summary.total_ratings, 2);
    }

    #[test]
    fn test_owner_summary_without_ratings() {
        let summary = OwnerSummary::new(&store(), Vec::new());
        assert_eq!(summary.avg_rating, "0.0");
        assert_eq!(summary.total_ratings, 0);
    }
}
