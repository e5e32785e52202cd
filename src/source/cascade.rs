//! Ordered enumeration of the URLs to probe: every candidate window, newest
//! first, and within a window every file name variant.

use crate::types::window::WindowCandidate;
use reqwest::Url;

/// One concrete URL of the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    /// Position of the candidate in the planned list, 0 being the newest.
    pub candidate_index: usize,
    pub candidate: WindowCandidate,
    pub suffix: String,
    pub url: String,
}

/// Builds the file URL for one candidate and suffix. The file name contains a
/// space, which ends up percent-encoded.
pub fn source_url(base: &Url, file_prefix: &str, candidate: &WindowCandidate, suffix: &str) -> String {
    let file_name = format!("{}{}-{}.json", file_prefix, candidate.file_stamp(), suffix);
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .push(&candidate.date_path())
            .push(&file_name);
    }
    url.to_string()
}

/// Puts `hint` first when it is one of `suffixes`, keeping the rest in their
/// configured order.
pub fn order_suffixes(suffixes: &[String], hint: Option<&str>) -> Vec<String> {
    let mut ordered = Vec::with_capacity(suffixes.len());
    if let Some(hint) = hint {
        if suffixes.iter().any(|s| s == hint) {
            ordered.push(hint.to_string());
        }
    }
    ordered.extend(
        suffixes
            .iter()
            .filter(|s| Some(s.as_str()) != hint)
            .cloned(),
    );
    ordered
}

pub struct UrlCascade<'a> {
    base: &'a Url,
    file_prefix: &'a str,
    candidates: &'a [WindowCandidate],
    suffixes: Vec<String>,
    candidate_pos: usize,
    suffix_pos: usize,
}

impl<'a> UrlCascade<'a> {
    pub fn new(
        base: &'a Url,
        file_prefix: &'a str,
        candidates: &'a [WindowCandidate],
        suffixes: Vec<String>,
    ) -> Self {
        Self {
            base,
            file_prefix,
            candidates,
            suffixes,
            candidate_pos: 0,
            suffix_pos: 0,
        }
    }
}

impl Iterator for UrlCascade<'_> {
    type Item = SourceUrl;

    fn next(&mut self) -> Option<Self::Item> {
        if self.suffixes.is_empty() {
            return None;
        }
        let candidate = self.candidates.get(self.candidate_pos)?;
        let suffix = &self.suffixes[self.suffix_pos];
        let item = SourceUrl {
            candidate_index: self.candidate_pos,
            candidate: *candidate,
            suffix: suffix.clone(),
            url: source_url(self.base, self.file_prefix, candidate, suffix),
        };

        self.suffix_pos += 1;
        if self.suffix_pos == self.suffixes.len() {
            self.suffix_pos = 0;
            self.candidate_pos += 1;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.suffixes.is_empty() {
            0
        } else {
            self.candidates.len().saturating_sub(self.candidate_pos) * self.suffixes.len()
                - self.suffix_pos
        };
        (remaining, Some(remaining))
    }
}
