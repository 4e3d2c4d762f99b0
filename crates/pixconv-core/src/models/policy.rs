//! Validation policy: size limit plus the allow-list of accepted image formats.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::constants::DEFAULT_ALLOWED_FORMATS;

/// Limits a selected file must satisfy before it is converted.
///
/// The allow-list holds mimetype subtypes (`png`, `jpeg`, ...), never file
/// extensions. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    pub max_bytes: u64,
    allowed: Vec<String>,
    matcher: Option<Regex>,
}

impl ValidationPolicy {
    /// An empty allow-list falls back to the default `gif, jpeg, png, webp`.
    /// Duplicates are dropped, keeping the first occurrence.
    pub fn new(max_bytes: u64, allowed: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let mut allowed: Vec<String> = allowed
            .into_iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();
        if allowed.is_empty() {
            allowed = DEFAULT_ALLOWED_FORMATS
                .iter()
                .map(|s| s.to_string())
                .collect();
        }

        let matcher = match build_matcher(&allowed) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(error = %e, "Allow-list pattern failed to compile");
                None
            }
        };

        Self {
            max_bytes,
            allowed,
            matcher,
        }
    }

    /// Build from a control's accept declaration, e.g. `"image/png, image/jpeg"`.
    pub fn from_accept(accept: Option<&str>, max_bytes: u64) -> Self {
        Self::new(max_bytes, accept.map(parse_accept_list).unwrap_or_default())
    }

    pub fn allowed_formats(&self) -> &[String] {
        &self.allowed
    }

    /// Whether a sniffed mimetype string is on the allow-list.
    pub fn allows(&self, mimetype: &str) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|re| re.is_match(mimetype))
    }

    /// Whole megabytes (decimal) for user-facing messages.
    pub fn max_megabytes(&self) -> u64 {
        self.max_bytes / 1_000_000
    }

    /// Human-readable list: `gif, jpeg, png, or webp`.
    pub fn allowed_list_message(&self) -> String {
        match self.allowed.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            [rest @ .., last] => format!("{}, or {}", rest.join(", "), last),
        }
    }
}

fn build_matcher(allowed: &[String]) -> Result<Regex, regex::Error> {
    let alternatives: Vec<String> = allowed.iter().map(|s| regex::escape(s)).collect();
    RegexBuilder::new(&format!("^image/({})$", alternatives.join("|")))
        .case_insensitive(true)
        .build()
}

/// Extract subtypes from an accept list: `"image/png, image/jpeg"` -> `["png", "jpeg"]`.
///
/// Entries without a slash (bare extensions like `.png`) are ignored. A
/// wildcard subtype (`image/*`) stands for the default formats.
pub fn parse_accept_list(accept: &str) -> Vec<String> {
    let mut subtypes = Vec::new();
    for (_, sub) in accept
        .split(',')
        .filter_map(|entry| entry.trim().split_once('/'))
    {
        let sub = sub.trim().to_lowercase();
        if sub == "*" {
            tracing::debug!("Wildcard accept entry expanded to the default formats");
            subtypes.extend(DEFAULT_ALLOWED_FORMATS.iter().map(|s| s.to_string()));
        } else if !sub.is_empty() {
            subtypes.push(sub);
        }
    }
    subtypes
}
