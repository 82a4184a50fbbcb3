//! Feed-related helpers shared by the sources, the sender and the config layer

/// URL utilities for feeds and items
pub mod url {
    use url::Url;

    /// Extract domain from URL
    pub fn extract_domain(url_str: &str) -> Option<String> {
        if let Ok(url) = Url::parse(url_str) {
            url.domain().map(|d| d.to_string())
        } else {
            None
        }
    }

    /// Validate feed URL format
    pub fn is_valid_rss_url(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str) {
            url.scheme() == "http" || url.scheme() == "https"
        } else {
            false
        }
    }

    /// First path segment of an item link, which on Pinterest and DeviantArt is the
    /// account name. Needs at least two segments, so a bare profile URL yields `None`.
    pub fn author_from_link(link: &str) -> Option<String> {
        let url = Url::parse(link).ok()?;
        let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
        let author = segments.next()?;
        segments.next()?;
        Some(author.to_string())
    }
}

/// Time utilities for log output
pub mod time {
    use std::time::Duration;

    /// Format duration in human-readable form
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();

        if total_seconds < 60 {
            format!("{}s", total_seconds)
        } else if total_seconds < 3600 {
            format!("{}m", total_seconds / 60)
        } else if total_seconds < 86400 {
            format!("{}h", total_seconds / 3600)
        } else {
            format!("{}d", total_seconds / 86400)
        }
    }
}

/// Feed content utilities
pub mod feed {
    use regex::Regex;
    use std::sync::OnceLock;

    fn img_src_pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| {
            Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#).expect("static regex is valid")
        })
    }

    /// `src` of the first `<img>` tag in an HTML fragment
    pub fn first_image_src(html: &str) -> Option<String> {
        img_src_pattern()
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().replace("&amp;", "&"))
    }
}
