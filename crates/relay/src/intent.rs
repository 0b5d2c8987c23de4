//! Detection of time and date questions.

use regex::Regex;

/// Decides whether a message asks for the current time or date.
///
/// A message matches when it contains one of the keywords as a whole word,
/// ignoring case. With the default keywords this behaves like the JavaScript
/// `/\b(time|date|clock)\b/i`: word boundaries only consider ASCII word
/// characters, and ASCII keywords fold case over ASCII only.
#[derive(Debug, Clone)]
pub(crate) struct IntentDetector {
    pattern: Option<Regex>,
}

impl IntentDetector {
    pub(crate) fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        if keywords.is_empty() {
            return Ok(Self { pattern: None });
        }

        let alternatives = keywords
            .iter()
            .map(|keyword| keyword_pattern(keyword.as_ref().trim()))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = Regex::new(&format!(r"(?-u:\b)(?:{alternatives})(?-u:\b)"))?;

        Ok(Self { pattern: Some(pattern) })
    }

    /// True if the message is a time query. Absent or empty input never matches.
    pub(crate) fn is_time_query(&self, message: Option<&str>) -> bool {
        match (&self.pattern, message) {
            (Some(pattern), Some(message)) if !message.is_empty() => pattern.is_match(message),
            _ => false,
        }
    }
}

fn keyword_pattern(keyword: &str) -> String {
    let escaped = regex::escape(keyword);

    if keyword.is_ascii() {
        format!("(?i-u:{escaped})")
    } else {
        format!("(?i:{escaped})")
    }
}
