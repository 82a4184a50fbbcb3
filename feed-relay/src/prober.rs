use crate::traits::ProbeTransport;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Resolution tags tried in order, best first.
pub const DEFAULT_RESOLUTIONS: [&str; 6] = ["originals", "1200x", "736x", "564x", "474x", "236x"];

/// Path segment that marks a thumbnail in feed image URLs.
pub const THUMBNAIL_TAG: &str = "236x";

/// Finds the largest variant of a thumbnail that the image host actually serves.
pub struct ResolutionProber {
    transport: Arc<dyn ProbeTransport>,
    resolutions: Vec<String>,
    thumbnail_tag: String,
}

impl ResolutionProber {
    pub fn new(transport: Arc<dyn ProbeTransport>) -> Self {
        Self {
            transport,
            resolutions: DEFAULT_RESOLUTIONS.iter().map(|r| r.to_string()).collect(),
            thumbnail_tag: THUMBNAIL_TAG.to_string(),
        }
    }

    pub fn with_resolutions(mut self, resolutions: Vec<String>) -> Self {
        self.resolutions = resolutions;
        self
    }

    pub fn resolutions(&self) -> &[String] {
        &self.resolutions
    }

    /// Candidate URLs for a thumbnail, in probe order. Empty when the thumbnail
    /// isn't a URL with a path we can rewrite.
    pub fn candidates(&self, thumbnail_url: &str) -> Vec<String> {
        let Ok(base) = Url::parse(thumbnail_url) else {
            return Vec::new();
        };
        let Some(segments) = base.path_segments() else {
            return Vec::new();
        };

        let mut rest: Vec<&str> = segments.collect();
        if let Some(pos) = rest.iter().position(|s| *s == self.thumbnail_tag) {
            rest.remove(pos);
        }

        self.resolutions
            .iter()
            .map(|tag| {
                let mut candidate = base.clone();
                let path = std::iter::once(tag.as_str())
                    .chain(rest.iter().copied())
                    .collect::<Vec<_>>()
                    .join("/");
                candidate.set_path(&format!("/{}", path));
                candidate.to_string()
            })
            .collect()
    }

    /// Best confirmed variant, or the thumbnail itself when nothing better answers.
    pub async fn upgrade(&self, thumbnail_url: &str) -> String {
        for candidate in self.candidates(thumbnail_url) {
            if self.transport.probe(&candidate).await {
                debug!("Upgraded {} -> {}", thumbnail_url, candidate);
                return candidate;
            }
        }

        debug!("No larger variant found for {}", thumbnail_url);
        thumbnail_url.to_string()
    }
}
