//! Optional query modifiers for the connection target.

use std::fmt;

/// One optional key/value contribution to the connection target's query.
///
/// A modifier replaces a default of the same name instead of adding a
/// second value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOption {
    /// ISO 639-1 language code to enforce
    LanguageCode(String),
    /// Output audio format (e.g. `mp3_44100_128`, `pcm_16000`)
    OutputFormat(String),
    SyncAlignment(bool),
    /// Seconds before an idle connection is dropped
    InactivityTimeout(u32),
    EnableSsmlParsing(bool),
}

impl QueryOption {
    /// Query parameter name.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::LanguageCode(_) => "language_code",
            Self::OutputFormat(_) => "output_format",
            Self::SyncAlignment(_) => "sync_alignment",
            Self::InactivityTimeout(_) => "inactivity_timeout",
            Self::EnableSsmlParsing(_) => "enable_ssml_parsing",
        }
    }

    /// Query parameter value.
    pub fn value(&self) -> String {
        match self {
            Self::LanguageCode(v) | Self::OutputFormat(v) => v.clone(),
            Self::SyncAlignment(b) | Self::EnableSsmlParsing(b) => b.to_string(),
            Self::InactivityTimeout(secs) => secs.to_string(),
        }
    }
}

impl fmt::Display for QueryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key(), self.value())
    }
}

/// Apply `options` on top of `pairs`, replacing same-named entries in place
/// and appending new ones in order.
pub fn merge(pairs: &mut Vec<(String, String)>, options: &[QueryOption]) {
    for option in options {
        let key = option.key();
        if let Some(entry) = pairs.iter_mut().find(|(k, _)| k == key) {
            entry.1 = option.value();
            continue;
        }
        pairs.push((key.to_string(), option.value()));
    }
}
