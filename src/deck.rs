//! Slide deck generation
//!
//! Turns a summary into a [`SlideDeck`] and writes it to the deployment's
//! single output path. Rendering problems degrade to the one-slide fallback
//! layout; only a failure to write the file surfaces as an error.

mod model;
mod pptx;

pub use model::SlideDeck;
pub use pptx::PptxRenderer;

use model::{build, fallback};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Content type served for the artifact
pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Slide text is not representable: {0}")]
    InvalidText(String),
    #[error("Failed to package slide deck: {0}")]
    Package(#[from] zip::result::ZipError),
    #[error("Failed to encode slide deck: {0}")]
    Encode(#[from] std::io::Error),
    #[error("Failed to write slide deck to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Serializes a deck into file bytes
pub trait DeckRenderer: Send + Sync {
    fn render(&self, deck: &SlideDeck) -> Result<Vec<u8>, DeckError>;
}

impl<T: DeckRenderer + ?Sized> DeckRenderer for Arc<T> {
    fn render(&self, deck: &SlideDeck) -> Result<Vec<u8>, DeckError> {
        (**self).render(deck)
    }
}

/// Where a deck ended up and which layout it used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckOutput {
    pub path: PathBuf,
    pub fallback: bool,
}

/// Builds and writes decks to one fixed path, overwriting the previous one
pub struct DeckWriter {
    output_path: PathBuf,
    renderer: Arc<dyn DeckRenderer>,
}

impl DeckWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self::with_renderer(output_path, Arc::new(PptxRenderer))
    }

    pub fn with_renderer(output_path: impl Into<PathBuf>, renderer: Arc<dyn DeckRenderer>) -> Self {
        Self {
            output_path: output_path.into(),
            renderer,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Render the summary and write the artifact
    pub async fn write(&self, summary: &str) -> Result<DeckOutput, DeckError> {
        let deck = build(summary);
        let (bytes, fallback_used) = match self.renderer.render(&deck) {
            Ok(bytes) => (bytes, false),
            Err(e) => {
                tracing::warn!(error = %e, "Deck rendering failed, using fallback layout");
                (self.renderer.render(&fallback(summary))?, true)
            }
        };

        if let Some(parent) = self.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.write_error(source))?;
        }
        tokio::fs::write(&self.output_path, &bytes)
            .await
            .map_err(|source| self.write_error(source))?;

        tracing::info!(
            path = %self.output_path.display(),
            bytes = bytes.len(),
            bullets = deck.bullet_texts().len(),
            fallback = fallback_used,
            "Slide deck written"
        );

        Ok(DeckOutput {
            path: self.output_path.clone(),
            fallback: fallback_used,
        })
    }

    fn write_error(&self, source: std::io::Error) -> DeckError {
        DeckError::Write {
            path: self.output_path.clone(),
            source,
        }
    }
}
