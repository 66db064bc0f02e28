//! Path template handling

use std::collections::HashMap;
use tracing::warn;

/// Result of substituting captured parameters into a path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenPath {
    pub path: String,
    /// Placeholders that had no captured value and were left as written
    pub unresolved: Vec<String>,
}

impl RewrittenPath {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Substitute `:name` and `*name` segments of `template` from `params`.
///
/// Only whole segments are placeholders. Literal segments and placeholders
/// without a captured value are kept verbatim.
pub fn rewrite_path(template: &str, params: &HashMap<String, String>) -> RewrittenPath {
    let mut unresolved = Vec::new();

    let path = template
        .split('/')
        .map(|segment| {
            let name = segment
                .strip_prefix(':')
                .or_else(|| segment.strip_prefix('*'));

            match name {
                Some(name) if !name.is_empty() => match params.get(name) {
                    Some(value) => value.trim_start_matches('/').to_string(),
                    None => {
                        unresolved.push(name.to_string());
                        segment.to_string()
                    }
                },
                _ => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    if !unresolved.is_empty() {
        warn!(template, unresolved = ?unresolved, "path parameters left unresolved");
    }

    RewrittenPath { path, unresolved }
}

/// First `.` or `..` segment of `path`, percent-encoded forms included.
///
/// URL path normalization collapses these, so a path containing one would
/// not reach the backend as written.
pub fn dot_segment(path: &str) -> Option<&str> {
    path.split('/').find(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

/// Convert a `:name` / `*name` route pattern to actix-web syntax
pub fn to_actix_pattern(route: &str) -> String {
    route
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':').filter(|n| !n.is_empty()) {
                format!("{{{}}}", name)
            } else if let Some(name) = segment.strip_prefix('*').filter(|n| !n.is_empty()) {
                format!("{{{}:.*}}", name)
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
