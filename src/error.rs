//! Error types with fix suggestions

use thiserror::Error;

use crate::types::TemplateIdError;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Stream client is closed")]
    ClientClosed,

    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("Invalid template ID: {0}")]
    TemplateId(#[from] TemplateIdError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dashboard error: {0}")]
    Dashboard(anyhow::Error),
}

// Manual impl: anyhow::Error is not a std Error, so thiserror's #[from]
// cannot treat it as a source.
impl From<anyhow::Error> for DashError {
    fn from(e: anyhow::Error) -> Self {
        DashError::Dashboard(e)
    }
}

impl FixSuggestion for DashError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            DashError::ClientClosed => {
                Some("Construct a new stream client; closed clients are not reusable")
            }
            DashError::UnknownTemplate(_) => {
                Some("Run 'dapdash templates' to list the built-in templates")
            }
            DashError::TemplateId(_) => {
                Some("Template IDs are lowercase snake form, e.g. alpha_diversity")
            }
            DashError::Json(_) => Some("Check the file contains valid JSON (try jq)"),
            DashError::Io(_) => Some("Check file path and permissions"),
            DashError::Dashboard(_) => {
                Some("Check the terminal supports raw mode and the alternate screen")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_a_suggestion() {
        let errors: Vec<DashError> = vec![
            DashError::ClientClosed,
            DashError::UnknownTemplate("nope".into()),
            DashError::TemplateId(TemplateIdError::Empty),
            DashError::Json(serde_json::from_str::<serde_json::Value>("{").unwrap_err()),
            DashError::Io(std::io::Error::other("boom")),
            DashError::Dashboard(anyhow::anyhow!("boom")),
        ];
        for e in errors {
            assert!(e.fix_suggestion().is_some(), "{e}");
        }
    }
}
