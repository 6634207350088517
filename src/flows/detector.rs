use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::flows::machine::{FlowState, RequestFlow};
use crate::models::ImageSelection;
use crate::services::PredictorApi;

pub const MISSING_FILE_ERROR: &str = "Pilih gambar makanan terlebih dahulu.";
pub const MISSING_PREDICTOR_ERROR: &str =
    "Endpoint prediksi belum dikonfigurasi. Tambahkan FOOD_PREDICTOR_URL.";

static PREVIEW_SEQ: AtomicU64 = AtomicU64::new(0);

/// Byte-for-byte copy of the selected image, placed where an external viewer
/// can open it. Removed from disk exactly once: on release or on drop,
/// whichever comes first.
#[derive(Debug)]
pub struct PreviewHandle {
    path: PathBuf,
    released: bool,
}

impl PreviewHandle {
    fn create(file_name: &str, bytes: &[u8]) -> Result<Self> {
        let seq = PREVIEW_SEQ.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "mealplan-preview-{}-{}-{}",
            std::process::id(),
            seq,
            file_name
        ));
        std::fs::write(&path, bytes)
            .with_context(|| format!("could not write preview to {}", path.display()))?;
        log::debug!("🖼️ Preview created at {}", path.display());
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!("⚠️ Could not remove preview {}: {}", self.path.display(), e);
        } else {
            log::debug!("🧹 Preview released: {}", self.path.display());
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release();
    }
}

struct Selected {
    image: ImageSelection,
    preview: PreviewHandle,
}

/// Image-to-label flow. Holds at most one selection; choosing a new file
/// always supersedes the previous one and releases its preview.
pub struct DetectorFlow {
    api: Option<Arc<dyn PredictorApi>>,
    selection: Option<Selected>,
    flow: RequestFlow<String>,
}

impl DetectorFlow {
    /// `api` is None when neither a predictor nor a backend base URL is
    /// configured; submission then fails locally without a network call.
    pub fn new(api: Option<Arc<dyn PredictorApi>>) -> Self {
        Self {
            api,
            selection: None,
            flow: RequestFlow::new(),
        }
    }

    pub fn state(&self) -> &FlowState<String> {
        self.flow.state()
    }

    pub fn selection(&self) -> Option<&ImageSelection> {
        self.selection.as_ref().map(|s| &s.image)
    }

    pub fn preview_path(&self) -> Option<&Path> {
        self.selection.as_ref().map(|s| s.preview.path())
    }

    /// Reads the file and replaces any previous selection; the superseded
    /// preview is released here. Any prior prediction or error is cleared.
    pub fn select_file(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("could not read image {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let preview = PreviewHandle::create(&file_name, &bytes)?;
        let selected_at = Utc::now();
        log::info!(
            "📂 Selected '{}' ({} bytes) at {}",
            file_name,
            bytes.len(),
            selected_at
        );

        // Dropping the old Selected releases its preview exactly once.
        self.selection = Some(Selected {
            image: ImageSelection {
                file_name,
                bytes,
                selected_at,
            },
            preview,
        });
        self.flow.reset();
        Ok(())
    }

    /// Uploads the selected file as one multipart request. Missing file and
    /// missing endpoint fail locally, in that order.
    pub async fn submit(&mut self) -> &FlowState<String> {
        let Some(epoch) = self.flow.begin_submit() else {
            return self.flow.state();
        };

        let Some(selected) = &self.selection else {
            self.flow.fail_now(MISSING_FILE_ERROR);
            return self.flow.state();
        };

        let Some(api) = self.api.clone() else {
            self.flow.fail_now(MISSING_PREDICTOR_ERROR);
            return self.flow.state();
        };

        let outcome = api
            .predict(&selected.image.file_name, &selected.image.bytes)
            .await
            .map_err(|e| e.to_string());
        self.flow.complete(epoch, outcome);
        self.flow.state()
    }

    /// Back action: clears the selection and its preview entirely.
    pub fn reset(&mut self) {
        self.selection = None;
        self.flow.reset();
    }
}
