//! Per-character timing alignment.

use serde::{Deserialize, Serialize};

use super::context::ContextId;

/// Per-character timing metadata aligned to synthesized audio.
///
/// Three parallel sequences: start offset (ms), duration (ms) and the
/// character itself. All three always have the same length and start
/// offsets never decrease; [`AlignmentSegment::validate`] enforces both
/// at the parsing boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentSegment {
    #[serde(default)]
    pub char_start_times_ms: Vec<u32>,
    #[serde(default)]
    pub char_durations_ms: Vec<u32>,
    #[serde(default)]
    pub chars: Vec<String>,
}

impl AlignmentSegment {
    /// Number of aligned characters.
    pub const fn len(&self) -> usize {
        self.chars.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Check the structural invariants of the segment.
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        let chars = self.chars.len();
        if self.char_start_times_ms.len() != chars || self.char_durations_ms.len() != chars {
            return Err(format!(
                "alignment sequences differ in length (starts={}, durations={}, chars={chars})",
                self.char_start_times_ms.len(),
                self.char_durations_ms.len(),
            ));
        }
        if let Some(pos) = self
            .char_start_times_ms
            .windows(2)
            .position(|pair| pair[1] < pair[0])
        {
            return Err(format!(
                "alignment start offsets decrease at index {}",
                pos + 1
            ));
        }
        Ok(())
    }

    /// Iterate `(character, start_ms, duration_ms)` triples.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u32, u32)> {
        self.chars
            .iter()
            .zip(&self.char_start_times_ms)
            .zip(&self.char_durations_ms)
            .map(|((c, start), duration)| (c.as_str(), *start, *duration))
    }

    /// End offset of the last character, if any.
    pub fn end_ms(&self) -> Option<u32> {
        self.entries()
            .last()
            .map(|(_, start, duration)| start.saturating_add(duration))
    }

    /// The aligned text, characters concatenated.
    pub fn text(&self) -> String {
        self.chars.concat()
    }
}

/// Non-audio part of one inbound frame, delivered on the results queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Context the frame belongs to, when the service tagged it.
    pub context_id: Option<ContextId>,
    /// Whether this is the last frame for the context.
    pub is_final: bool,
    /// Alignment over the normalized (spoken) text.
    pub normalized_alignment: AlignmentSegment,
    /// Alignment over the text as submitted.
    pub alignment: AlignmentSegment,
}
