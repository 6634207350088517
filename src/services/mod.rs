pub mod backend;
pub mod predictor;

pub use backend::{RecommendationApi, RecommendationClient};
pub use predictor::{PredictorApi, PredictorClient};
