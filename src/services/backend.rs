use anyhow::Result;

use crate::models::{FoodPreferences, FoodRecommendation};

/// Generic transport-failure message shown when the backend is unreachable
/// or answers something unreadable.
pub const RECOMMENDATION_FALLBACK_ERROR: &str = "Terjadi kesalahan saat mengambil rekomendasi";

/// Seam over the recommendation backend so flows can run against an
/// in-memory double in tests.
#[async_trait::async_trait]
pub trait RecommendationApi: Send + Sync {
    async fn recommend(&self, preferences: &FoodPreferences) -> Result<FoodRecommendation>;
}

pub struct RecommendationClient {
    url: String,
    client: reqwest::Client,
}

impl RecommendationClient {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl RecommendationApi for RecommendationClient {
    async fn recommend(&self, preferences: &FoodPreferences) -> Result<FoodRecommendation> {
        log::info!(
            "🍽️ Requesting recommendation: {} | {} | {} | budget {} | {} orang",
            preferences.location,
            preferences.food_type,
            preferences.meal_time,
            preferences.budget,
            preferences.number_of_people
        );

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(preferences)
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ Recommendation request failed: {}", e);
                anyhow::anyhow!(RECOMMENDATION_FALLBACK_ERROR)
            })?;

        let status = response.status();
        log::debug!("📥 Recommendation response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("HTTP error! status: {}", status.as_u16());
        }

        let recommendation: FoodRecommendation = response.json().await.map_err(|e| {
            log::error!("❌ Could not parse recommendation body: {}", e);
            anyhow::anyhow!(RECOMMENDATION_FALLBACK_ERROR)
        })?;

        log::info!(
            "✅ Recommendation received: {} ({} menu items)",
            recommendation.restaurant.name,
            recommendation.menu.len()
        );

        Ok(recommendation)
    }
}
