//! Wire-neutral types exchanged with the remote protocol

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to one live DOM node, issued by the remote side
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteHandle(String);

impl RemoteHandle {
    /// Wrap a reference id received from the remote side
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Raw reference id
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Context a find operation is evaluated against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// The currently selected document (top level or frame)
    Document,
    /// Descendants of an element
    Element(RemoteHandle),
}

/// Structured, exact-match element query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementQuery {
    /// Tag name, lowercased
    pub tag_name: Option<String>,
    /// Attribute equality constraints
    pub attributes: Vec<(String, String)>,
    /// Class names that must all be present
    pub classes: Vec<String>,
    /// Normalized text content
    pub text: Option<String>,
}

impl ElementQuery {
    /// True when the query has no constraint at all
    pub fn is_empty(&self) -> bool {
        self.tag_name.is_none()
            && self.attributes.is_empty()
            && self.classes.is_empty()
            && self.text.is_none()
    }
}

/// Finding strategy handed to the remote side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum By {
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
    /// Structured query compiled by the driver
    Query(ElementQuery),
}

/// Result of a liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Live,
    Detached,
}

/// Modifier keys held during a click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Shift,
    Control,
    Alt,
    Meta,
}

impl Modifier {
    /// W3C key code point
    pub fn key_code(&self) -> char {
        match self {
            Modifier::Shift => '\u{E008}',
            Modifier::Control => '\u{E009}',
            Modifier::Alt => '\u{E00A}',
            Modifier::Meta => '\u{E03D}',
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Modifier::Shift => "shift",
            Modifier::Control => "control",
            Modifier::Alt => "alt",
            Modifier::Meta => "meta",
        };
        f.write_str(name)
    }
}

/// Non-printable keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKey {
    Backspace,
    Tab,
    Return,
    Enter,
    Escape,
    Space,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Delete,
    Modifier(Modifier),
}

impl SpecialKey {
    /// W3C key code point
    pub fn key_code(&self) -> char {
        match self {
            SpecialKey::Backspace => '\u{E003}',
            SpecialKey::Tab => '\u{E004}',
            SpecialKey::Return => '\u{E006}',
            SpecialKey::Enter => '\u{E007}',
            SpecialKey::Escape => '\u{E00C}',
            SpecialKey::Space => '\u{E00D}',
            SpecialKey::ArrowLeft => '\u{E012}',
            SpecialKey::ArrowUp => '\u{E013}',
            SpecialKey::ArrowRight => '\u{E014}',
            SpecialKey::ArrowDown => '\u{E015}',
            SpecialKey::Delete => '\u{E017}',
            SpecialKey::Modifier(m) => m.key_code(),
        }
    }
}

/// One chunk of keyboard input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Text(String),
    Special(SpecialKey),
}

impl KeyInput {
    /// Encode as the W3C text payload
    pub fn to_wire(&self) -> String {
        match self {
            KeyInput::Text(text) => text.clone(),
            KeyInput::Special(key) => key.key_code().to_string(),
        }
    }
}

impl From<&str> for KeyInput {
    fn from(text: &str) -> Self {
        KeyInput::Text(text.to_string())
    }
}

impl From<String> for KeyInput {
    fn from(text: String) -> Self {
        KeyInput::Text(text)
    }
}

impl From<SpecialKey> for KeyInput {
    fn from(key: SpecialKey) -> Self {
        KeyInput::Special(key)
    }
}

/// Remote operation performed against an element handle
#[derive(Debug, Clone, PartialEq)]
pub enum ElementAction {
    Click { modifiers: Vec<Modifier> },
    DoubleClick,
    ContextClick,
    MoveTo,
    DragAndDropOn { target: RemoteHandle },
    DragAndDropBy { right: i64, down: i64 },
    SendKeys(Vec<KeyInput>),
    Clear,
}

impl ElementAction {
    /// True when the action needs the low-level input device API
    pub fn needs_input_devices(&self) -> bool {
        match self {
            ElementAction::Click { modifiers } => !modifiers.is_empty(),
            ElementAction::DoubleClick
            | ElementAction::ContextClick
            | ElementAction::MoveTo
            | ElementAction::DragAndDropOn { .. }
            | ElementAction::DragAndDropBy { .. } => true,
            ElementAction::SendKeys(_) | ElementAction::Clear => false,
        }
    }
}

/// Value returned by a script atom
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Null,
    String(String),
    Bool(bool),
    Number(f64),
    Element(RemoteHandle),
}

impl ScriptValue {
    /// String content, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::String(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_input_wire_encoding() {
        assert_eq!(KeyInput::from("abc").to_wire(), "abc");
        assert_eq!(KeyInput::from(SpecialKey::Return).to_wire(), "\u{E006}");
        assert_eq!(
            KeyInput::Special(SpecialKey::Modifier(Modifier::Shift)).to_wire(),
            "\u{E008}"
        );
    }

    #[test]
    fn test_input_device_requirements() {
        assert!(!ElementAction::Click { modifiers: vec![] }.needs_input_devices());
        assert!(ElementAction::Click { modifiers: vec![Modifier::Shift] }.needs_input_devices());
        assert!(ElementAction::DoubleClick.needs_input_devices());
        assert!(!ElementAction::Clear.needs_input_devices());
    }
}
