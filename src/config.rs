use std::env;

/// Endpoint configuration resolved from the environment. Both URLs are
/// optional; flows that need a missing one fail locally before any request.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub backend_base_url: Option<String>,
    pub predictor_base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            backend_base_url: env::var("BACKEND_BASE_URL").ok().and_then(normalize_base_url),
            predictor_base_url: env::var("FOOD_PREDICTOR_URL")
                .ok()
                .and_then(normalize_base_url),
        }
    }

    pub fn recommendations_url(&self) -> Option<String> {
        self.backend_base_url
            .as_ref()
            .map(|base| format!("{}/food-recommendations", base))
    }

    /// Dedicated predictor wins; the general backend is the fallback.
    pub fn predict_url(&self) -> Option<String> {
        self.predictor_base_url
            .as_ref()
            .or(self.backend_base_url.as_ref())
            .map(|base| format!("{}/predict", base))
    }
}

/// Strips one trailing slash; empty values count as unset.
fn normalize_base_url(url: String) -> Option<String> {
    let trimmed = url.strip_suffix('/').unwrap_or(&url);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: Option<&str>, predictor: Option<&str>) -> Config {
        Config {
            backend_base_url: backend.map(str::to_string).and_then(normalize_base_url),
            predictor_base_url: predictor.map(str::to_string).and_then(normalize_base_url),
        }
    }

    #[test]
    fn test_normalize_strips_single_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://api.local/".to_string()),
            Some("http://api.local".to_string())
        );
        assert_eq!(
            normalize_base_url("http://api.local".to_string()),
            Some("http://api.local".to_string())
        );
        // Only one slash is stripped.
        assert_eq!(
            normalize_base_url("http://api.local//".to_string()),
            Some("http://api.local/".to_string())
        );
        assert_eq!(normalize_base_url(String::new()), None);
    }

    #[test]
    fn test_recommendations_url() {
        let cfg = config(Some("http://api.local/"), None);
        assert_eq!(
            cfg.recommendations_url(),
            Some("http://api.local/food-recommendations".to_string())
        );
        assert_eq!(config(None, Some("http://ml.local")).recommendations_url(), None);
    }

    #[test]
    fn test_predictor_overrides_backend_fallback() {
        let cfg = config(Some("http://api.local"), Some("http://ml.local/"));
        assert_eq!(cfg.predict_url(), Some("http://ml.local/predict".to_string()));

        let cfg = config(Some("http://api.local"), None);
        assert_eq!(cfg.predict_url(), Some("http://api.local/predict".to_string()));

        assert_eq!(config(None, None).predict_url(), None);
    }
}
