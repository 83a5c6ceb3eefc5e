//! Producer-side input items.

use speechlink_core::ContextId;

/// One item from the text producer.
///
/// Items without a context address the session's default context. In
/// single-context mode every item addresses the default context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Text to synthesize.
    Text {
        context: Option<ContextId>,
        text: String,
    },
    /// End-of-utterance marker for a context.
    Flush { context: Option<ContextId> },
    /// Close a context and release its admission slot.
    CloseContext(ContextId),
}

impl Fragment {
    /// Text for the default context.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            context: None,
            text: text.into(),
        }
    }

    /// Text for a specific context.
    pub fn text_for(context: ContextId, text: impl Into<String>) -> Self {
        Self::Text {
            context: Some(context),
            text: text.into(),
        }
    }

    pub const fn flush(context: Option<ContextId>) -> Self {
        Self::Flush { context }
    }

    pub const fn close(context: ContextId) -> Self {
        Self::CloseContext(context)
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}
