use anyhow::Result;
use reqwest::multipart;

use crate::models::PredictionResponse;

/// Fallback for non-2xx answers whose body carries no usable detail.
pub const PREDICT_FAILURE_FALLBACK: &str = "Gagal mendeteksi makanan";

/// Generic transport-failure message for the predictor.
pub const PREDICT_TRANSPORT_ERROR: &str = "Terjadi kesalahan saat menghubungi server";

/// Seam over the /predict endpoint so the detector flow is testable
/// without a running model server.
#[async_trait::async_trait]
pub trait PredictorApi: Send + Sync {
    async fn predict(&self, file_name: &str, bytes: &[u8]) -> Result<String>;
}

pub struct PredictorClient {
    url: String,
    client: reqwest::Client,
}

impl PredictorClient {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl PredictorApi for PredictorClient {
    async fn predict(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        log::info!(
            "📸 Uploading '{}' ({} bytes) to {}",
            file_name,
            bytes.len(),
            self.url
        );

        let part = multipart::Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ Predictor request failed: {}", e);
                anyhow::anyhow!(PREDICT_TRANSPORT_ERROR)
            })?;

        let status = response.status();
        log::debug!("📥 Predictor response status: {}", status);

        let body = response.text().await.map_err(|e| {
            log::error!("❌ Could not read predictor body: {}", e);
            anyhow::anyhow!(PREDICT_TRANSPORT_ERROR)
        })?;

        if !status.is_success() {
            log::error!("❌ Predictor error ({}): {}", status, body);
            anyhow::bail!("{}", failure_message(&body));
        }

        let label = interpret_success_body(&body)?;
        log::info!("✅ Prediction received: {}", label);
        Ok(label)
    }
}

/// Non-2xx bodies may be JSON with a string `detail`; anything else maps to
/// the generic fallback.
fn failure_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail")?.as_str().map(str::to_string))
        .unwrap_or_else(|| PREDICT_FAILURE_FALLBACK.to_string())
}

/// A 2xx body with an `error` string is a semantic failure even though the
/// transport succeeded. Otherwise the label fields are tried in priority
/// order, with the sentinel as last resort.
fn interpret_success_body(body: &str) -> Result<String> {
    let parsed: PredictionResponse = serde_json::from_str(body).map_err(|e| {
        log::error!("❌ Could not parse prediction body: {}", e);
        anyhow::anyhow!(PREDICT_TRANSPORT_ERROR)
    })?;

    if let Some(error) = parsed.error {
        anyhow::bail!("{}", error);
    }

    Ok(parsed.detected_label())
}
