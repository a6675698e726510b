//! Relay message types.
//!
//! A relay message is a browser-to-host call: a target name, a method
//! name, and at most one scalar payload. Messages arrive as query
//! parameters on the relay route and are dispatched into host code on
//! the host's own thread.
//!
//! # Format
//!
//! On the wire the payload is tagged by parameter name:
//!
//! ```text
//! GET /bridgeMessage?target=game&method=setScore&valueNum=42
//! GET /bridgeMessage?target=game&method=setName&valueStr=Ada
//! GET /bridgeMessage?target=game&method=reset
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// RelayPayload
// ============================================================================

/// The scalar payload of a relay message.
///
/// Exactly two shapes exist: a number (always carried as `f64`, the
/// way it is parsed off the wire) or a text string. A message carries
/// at most one payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayPayload {
    /// Numeric payload, parsed from the `valueNum` parameter.
    Number(f64),
    /// Text payload, taken verbatim from the `valueStr` parameter.
    Text(String),
}

impl RelayPayload {
    /// Returns `true` if this is a numeric payload.
    #[inline]
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Returns `true` if this is a text payload.
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns the numeric value, if this is a numeric payload.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Returns the text value, if this is a text payload.
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for RelayPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

// ============================================================================
// RelayMessage
// ============================================================================

/// A single browser-to-host call waiting for dispatch.
///
/// # Examples
///
/// ```
/// use browser_bridge::relay::RelayMessage;
///
/// let msg = RelayMessage::with_number("game", "setScore", 42.0);
/// assert_eq!(msg.target, "game");
/// assert!(msg.payload.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RelayMessage {
    /// Name of the registered target that should receive the call.
    pub target: String,

    /// Method name passed through to the target.
    pub method: String,

    /// Optional scalar payload.
    pub payload: Option<RelayPayload>,
}

impl RelayMessage {
    /// Creates a message with no payload.
    #[inline]
    #[must_use]
    pub fn bare(target: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
            payload: None,
        }
    }

    /// Creates a message with a numeric payload.
    #[inline]
    #[must_use]
    pub fn with_number(target: impl Into<String>, method: impl Into<String>, value: f64) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
            payload: Some(RelayPayload::Number(value)),
        }
    }

    /// Creates a message with a text payload.
    #[inline]
    #[must_use]
    pub fn with_text(
        target: impl Into<String>,
        method: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
            payload: Some(RelayPayload::Text(value.into())),
        }
    }

    /// Returns `true` if this message carries a payload.
    #[inline]
    #[must_use]
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }
}

impl fmt::Display for RelayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{}.{}({payload})", self.target, self.method),
            None => write!(f, "{}.{}()", self.target, self.method),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_message() {
        let msg = RelayMessage::bare("game", "reset");
        assert_eq!(msg.target, "game");
        assert_eq!(msg.method, "reset");
        assert!(!msg.has_payload());
    }

    #[test]
    fn test_number_message() {
        let msg = RelayMessage::with_number("game", "setScore", 42.0);
        let payload = msg.payload.expect("payload");
        assert!(payload.is_number());
        assert_eq!(payload.as_number(), Some(42.0));
        assert_eq!(payload.as_text(), None);
    }

    #[test]
    fn test_text_message() {
        let msg = RelayMessage::with_text("game", "setName", "Ada");
        let payload = msg.payload.expect("payload");
        assert!(payload.is_text());
        assert_eq!(payload.as_text(), Some("Ada"));
        assert_eq!(payload.as_number(), None);
    }

    #[test]
    fn test_display_rendering() {
        assert_eq!(RelayMessage::bare("ui", "refresh").to_string(), "ui.refresh()");
        assert_eq!(
            RelayMessage::with_number("game", "setScore", 42.0).to_string(),
            "game.setScore(42)"
        );
        assert_eq!(
            RelayMessage::with_text("game", "setName", "Ada").to_string(),
            "game.setName(\"Ada\")"
        );
    }
}
