//! Notebook exports loader
//!
//! Picks up files a notebook wrote for the dashboard: a table preview
//! summary plus a fixed set of named figures, each available as a plotly
//! spec JSON with a PNG fallback. Every read is best-effort — a missing
//! file leaves its slot empty, only corrupt JSON is recorded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde_json::Value;
use tracing::debug;

use crate::message::TablePreview;
use crate::viz::PlotlySpec;

/// Default directory the dashboard refreshes from.
pub const DEFAULT_EXPORTS_DIR: &str = "notebook-exports";

/// The figure names a notebook may export.
pub const FIGURE_NAMES: [&str; 3] = ["heatmap", "stacked_bar", "boxplot"];

/// One figure slot: a validated spec wins, a PNG path is the fallback,
/// neither means "no data".
#[derive(Debug, Clone, Default)]
pub struct FigureSlot {
    pub spec: Option<PlotlySpec>,
    pub image_path: Option<PathBuf>,
}

impl FigureSlot {
    pub fn is_empty(&self) -> bool {
        self.spec.is_none() && self.image_path.is_none()
    }
}

/// Result of one refresh pass over the exports directory.
#[derive(Debug, Clone, Default)]
pub struct ExportsState {
    pub preview: Option<TablePreview>,
    pub figures: BTreeMap<String, FigureSlot>,
    pub updated_at: Option<SystemTime>,
    pub errors: Vec<String>,
}

impl ExportsState {
    /// Number of figures with any content.
    pub fn loaded_figures(&self) -> usize {
        self.figures.values().filter(|slot| !slot.is_empty()).count()
    }
}

/// Read and refresh all exports from `base`. Never fails: missing files
/// leave empty slots, corrupt JSON is reported in `errors`.
pub async fn refresh(base: &Path) -> ExportsState {
    let mut state = ExportsState::default();

    match read_json(&base.join("table_preview.json"), &mut state.errors).await {
        Some(value) => state.preview = serde_json::from_value(value).ok(),
        None => debug!(dir = %base.display(), "no table preview export"),
    }

    for name in FIGURE_NAMES {
        let mut slot = FigureSlot::default();
        if let Some(value) = read_json(&base.join(format!("{name}.json")), &mut state.errors).await
        {
            slot.spec = PlotlySpec::from_value(&value);
        }
        if slot.spec.is_none() {
            // PNG fallback
            let png = base.join(format!("{name}.png"));
            if tokio::fs::try_exists(&png).await.unwrap_or(false) {
                slot.image_path = Some(png);
            }
        }
        state.figures.insert(name.to_string(), slot);
    }

    state.updated_at = Some(SystemTime::now());
    state
}

/// Best-effort JSON read: `None` when the file is absent or unreadable,
/// with corrupt JSON additionally recorded in `errors`.
async fn read_json(path: &Path, errors: &mut Vec<String>) -> Option<Value> {
    let raw = tokio::fs::read_to_string(path).await.ok()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(format!("{}: {}", path.display(), e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn missing_dir_yields_empty_state() {
        let state = refresh(Path::new("/nonexistent/exports")).await;
        assert!(state.preview.is_none());
        assert_eq!(state.loaded_figures(), 0);
        assert!(state.errors.is_empty());
        assert!(state.updated_at.is_some());
    }

    #[tokio::test]
    async fn preview_and_spec_load() {
        let dir = TempDir::new().unwrap();
        write(&dir, "table_preview.json", r#"{"rows": 120, "cols": 14}"#);
        write(
            &dir,
            "heatmap.json",
            &json!({"library": "plotly", "data": [{"type": "heatmap"}]}).to_string(),
        );

        let state = refresh(dir.path()).await;
        assert_eq!(state.preview, Some(TablePreview::new(120, 14)));
        assert!(state.figures["heatmap"].spec.is_some());
        assert!(state.figures["heatmap"].image_path.is_none());
        assert!(state.figures["boxplot"].is_empty());
        assert_eq!(state.loaded_figures(), 1);
    }

    #[tokio::test]
    async fn invalid_spec_falls_back_to_png() {
        let dir = TempDir::new().unwrap();
        write(&dir, "boxplot.json", r#"{"library": "matplotlib"}"#);
        write(&dir, "boxplot.png", "not-really-a-png");

        let state = refresh(dir.path()).await;
        let slot = &state.figures["boxplot"];
        assert!(slot.spec.is_none());
        assert_eq!(slot.image_path, Some(dir.path().join("boxplot.png")));
    }

    #[tokio::test]
    async fn corrupt_json_is_recorded() {
        let dir = TempDir::new().unwrap();
        write(&dir, "stacked_bar.json", "{nope");

        let state = refresh(dir.path()).await;
        assert!(state.figures["stacked_bar"].is_empty());
        assert_eq!(state.errors.len(), 1);
        assert!(state.errors[0].contains("stacked_bar.json"));
    }
}
