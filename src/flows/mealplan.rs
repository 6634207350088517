use std::sync::Arc;

use crate::flows::machine::{FlowState, RequestFlow};
use crate::models::{
    format_rupiah, FoodPreferences, FoodRecommendation, FoodType, Location, MealTime,
};
use crate::services::RecommendationApi;

pub const MISSING_BACKEND_ERROR: &str =
    "Endpoint backend belum dikonfigurasi. Tambahkan BACKEND_BASE_URL.";

/// Preference-to-recommendation flow. Owns its form state and its own
/// request state machine; nothing is shared with the detector flow.
pub struct MealplanFlow {
    api: Option<Arc<dyn RecommendationApi>>,
    preferences: FoodPreferences,
    flow: RequestFlow<FoodRecommendation>,
}

impl MealplanFlow {
    /// `api` is None when no backend base URL is configured; submission then
    /// fails locally without a network call.
    pub fn new(api: Option<Arc<dyn RecommendationApi>>) -> Self {
        Self {
            api,
            preferences: FoodPreferences::default(),
            flow: RequestFlow::new(),
        }
    }

    pub fn preferences(&self) -> &FoodPreferences {
        &self.preferences
    }

    pub fn state(&self) -> &FlowState<FoodRecommendation> {
        self.flow.state()
    }

    pub fn set_location(&mut self, location: Location) {
        self.preferences.location = location;
    }

    pub fn set_food_type(&mut self, food_type: FoodType) {
        self.preferences.food_type = food_type;
    }

    pub fn set_meal_time(&mut self, meal_time: MealTime) {
        self.preferences.meal_time = meal_time;
    }

    /// Client-side minimum only; no upper bound.
    pub fn set_budget(&mut self, budget: f64) {
        self.preferences.budget = budget.max(0.0);
    }

    pub fn set_number_of_people(&mut self, count: u32) {
        self.preferences.number_of_people = count.max(1);
    }

    /// Serializes the full preference record and issues exactly one request.
    /// Ignored while a request is in flight or a result is displayed.
    pub async fn submit(&mut self) -> &FlowState<FoodRecommendation> {
        let Some(epoch) = self.flow.begin_submit() else {
            return self.flow.state();
        };

        let Some(api) = self.api.clone() else {
            self.flow.fail_now(MISSING_BACKEND_ERROR);
            return self.flow.state();
        };

        let outcome = api
            .recommend(&self.preferences)
            .await
            .map_err(|e| e.to_string());
        self.flow.complete(epoch, outcome);
        self.flow.state()
    }

    /// Back action: drops the result or error and restores the documented
    /// form defaults.
    pub fn reset(&mut self) {
        self.preferences = FoodPreferences::default();
        self.flow.reset();
    }
}

/// Renders a recommendation the way the result page lays it out: restaurant
/// header, one line per menu item, subtotal, savings sentence.
pub fn format_recommendation(rec: &FoodRecommendation) -> String {
    let mut out = String::new();

    out.push_str(&format!("🏠 {}\n", rec.restaurant.name));
    out.push_str(&format!("⭐ {}\n", rec.restaurant.rating));
    out.push_str(&format!("🕐 {}\n", rec.restaurant.open_hours));
    out.push_str(&format!("📍 {}\n", rec.restaurant.address));
    if let Some(description) = &rec.restaurant.description {
        out.push_str(&format!("   {}\n", description));
    }

    out.push_str("\nRekomendasi Menu:\n");
    for item in &rec.menu {
        out.push_str(&format!(
            "  {} — {} x{} = {}\n",
            item.name,
            format_rupiah(item.price),
            item.quantity,
            format_rupiah(item.total)
        ));
    }

    out.push_str(&format!("\nSubtotal: {}\n", format_rupiah(rec.subtotal)));
    out.push_str(&format!(
        "Kamu berhasil hemat {} dari total budget {}!\n",
        format_rupiah(rec.savings),
        format_rupiah(rec.total_budget)
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MenuItem, Restaurant};
    use anyhow::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn sample_recommendation() -> FoodRecommendation {
        FoodRecommendation {
            restaurant: Restaurant {
                name: "Rawon Setan".to_string(),
                rating: 4.7,
                open_hours: "10.00 - 22.00".to_string(),
                address: "Jl. Embong Malang No. 78/1".to_string(),
                description: None,
            },
            menu: vec![MenuItem {
                name: "Rawon Daging".to_string(),
                price: 25_000.0,
                quantity: 2,
                total: 50_000.0,
            }],
            subtotal: 50_000.0,
            savings: 25_000.0,
            total_budget: 75_000.0,
        }
    }

    /// Captures each request payload and answers with a canned outcome.
    struct MockBackend {
        calls: AtomicUsize,
        seen: Mutex<Vec<FoodPreferences>>,
        outcome: Mutex<Option<Result<FoodRecommendation, String>>>,
    }

    impl MockBackend {
        fn with(outcome: Result<FoodRecommendation, String>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                outcome: Mutex::new(Some(outcome)),
            })
        }
    }

    #[async_trait::async_trait]
    impl RecommendationApi for MockBackend {
        async fn recommend(&self, preferences: &FoodPreferences) -> Result<FoodRecommendation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(preferences.clone());
            match self.outcome.lock().unwrap().take() {
                Some(Ok(rec)) => Ok(rec),
                Some(Err(message)) => Err(anyhow::anyhow!(message)),
                None => Err(anyhow::anyhow!("mock exhausted")),
            }
        }
    }

    #[tokio::test]
    async fn test_submit_posts_form_state_field_for_field() {
        let backend = MockBackend::with(Ok(sample_recommendation()));
        let mut flow = MealplanFlow::new(Some(backend.clone()));
        flow.set_location(Location::SurabayaTimur);
        flow.set_food_type(FoodType::Pedas);
        flow.set_budget(120_000.0);
        flow.set_number_of_people(4);

        flow.submit().await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            FoodPreferences {
                location: Location::SurabayaTimur,
                food_type: FoodType::Pedas,
                meal_time: MealTime::MakanSiang,
                budget: 120_000.0,
                number_of_people: 4,
            }
        );
        assert!(matches!(flow.state(), FlowState::Success(_)));
    }

    #[tokio::test]
    async fn test_http_error_message_embeds_status() {
        let backend = MockBackend::with(Err("HTTP error! status: 503".to_string()));
        let mut flow = MealplanFlow::new(Some(backend));

        flow.submit().await;

        assert_eq!(
            *flow.state(),
            FlowState::Failed("HTTP error! status: 503".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_backend_short_circuits_without_request() {
        let mut flow = MealplanFlow::new(None);
        flow.submit().await;
        assert_eq!(*flow.state(), FlowState::Failed(MISSING_BACKEND_ERROR.to_string()));
    }

    #[tokio::test]
    async fn test_second_submit_after_success_is_ignored() {
        let backend = MockBackend::with(Ok(sample_recommendation()));
        let mut flow = MealplanFlow::new(Some(backend.clone()));

        flow.submit().await;
        flow.submit().await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let backend = MockBackend::with(Ok(sample_recommendation()));
        let mut flow = MealplanFlow::new(Some(backend));
        flow.set_location(Location::SurabayaSelatan);
        flow.set_food_type(FoodType::Manis);
        flow.set_meal_time(MealTime::Sarapan);
        flow.set_budget(30_000.0);
        flow.set_number_of_people(7);

        flow.submit().await;
        flow.reset();

        assert_eq!(*flow.state(), FlowState::Idle);
        assert_eq!(*flow.preferences(), FoodPreferences::default());
    }

    #[test]
    fn test_input_minimums() {
        let mut flow = MealplanFlow::new(None);
        flow.set_budget(-500.0);
        flow.set_number_of_people(0);
        assert_eq!(flow.preferences().budget, 0.0);
        assert_eq!(flow.preferences().number_of_people, 1);
    }

    #[test]
    fn test_format_recommendation_round_trips_server_values() {
        let text = format_recommendation(&sample_recommendation());
        assert!(text.contains("Rawon Setan"));
        assert!(text.contains("Rp 25.000 x2 = Rp 50.000"));
        assert!(text.contains("Subtotal: Rp 50.000"));
        assert!(text.contains("hemat Rp 25.000 dari total budget Rp 75.000!"));
    }
}
