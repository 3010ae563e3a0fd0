//! Attribute accessor registry
//!
//! Accessor names map to the DOM property they read and how the raw string
//! is interpreted. Names outside the table are rejected, except `data_*` and
//! `aria_*`, which read the dashed content attribute directly.

use phf::phf_map;

/// How a property value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    String,
    Bool,
    Int,
}

/// Registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// DOM property name
    pub property: &'static str,
    pub kind: AttributeKind,
}

const fn string(property: &'static str) -> AttributeSpec {
    AttributeSpec {
        property,
        kind: AttributeKind::String,
    }
}

const fn boolean(property: &'static str) -> AttributeSpec {
    AttributeSpec {
        property,
        kind: AttributeKind::Bool,
    }
}

const fn int(property: &'static str) -> AttributeSpec {
    AttributeSpec {
        property,
        kind: AttributeKind::Int,
    }
}

static ATTRIBUTES: phf::Map<&'static str, AttributeSpec> = phf_map! {
    // Global attributes
    "id" => string("id"),
    "class_name" => string("className"),
    "title" => string("title"),
    "lang" => string("lang"),
    "dir" => string("dir"),
    "access_key" => string("accessKey"),
    "tab_index" => int("tabIndex"),
    "hidden" => boolean("hidden"),
    "content_editable" => string("contentEditable"),
    "draggable" => boolean("draggable"),

    // Forms
    "name" => string("name"),
    "type" => string("type"),
    "value" => string("value"),
    "placeholder" => string("placeholder"),
    "disabled" => boolean("disabled"),
    "read_only" => boolean("readOnly"),
    "required" => boolean("required"),
    "checked" => boolean("checked"),
    "multiple" => boolean("multiple"),
    "max_length" => int("maxLength"),
    "size" => int("size"),
    "rows" => int("rows"),
    "cols" => int("cols"),
    "form_action" => string("formAction"),
    "html_for" => string("htmlFor"),

    // Links and embedded content
    "href" => string("href"),
    "target" => string("target"),
    "rel" => string("rel"),
    "src" => string("src"),
    "alt" => string("alt"),
    "width" => int("width"),
    "height" => int("height"),
};

/// How an accessor name is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeLookup {
    /// Registered DOM property
    Property(AttributeSpec),
    /// Content attribute read verbatim (`data-*`, `aria-*`)
    Content(String),
}

/// Resolve an accessor name
pub fn lookup(name: &str) -> Option<AttributeLookup> {
    if let Some(spec) = ATTRIBUTES.get(name) {
        return Some(AttributeLookup::Property(*spec));
    }
    if name.starts_with("data_") || name.starts_with("aria_") {
        return Some(AttributeLookup::Content(name.replace('_', "-")));
    }
    None
}

/// Typed attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    String(String),
    Bool(bool),
    Int(Option<i64>),
}

impl AttributeValue {
    /// Interpret a raw property value
    pub fn from_raw(kind: AttributeKind, raw: Option<String>) -> Self {
        match kind {
            AttributeKind::String => AttributeValue::String(raw.unwrap_or_default()),
            AttributeKind::Bool => AttributeValue::Bool(raw.as_deref() == Some("true")),
            AttributeKind::Int => AttributeValue::Int(raw.and_then(|v| v.trim().parse().ok())),
        }
    }

    /// String content, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_names() {
        assert_eq!(
            lookup("class_name"),
            Some(AttributeLookup::Property(string("className")))
        );
        assert_eq!(lookup("read_only"), Some(AttributeLookup::Property(boolean("readOnly"))));
        assert_eq!(lookup("bogus"), None);
    }

    #[test]
    fn test_wildcards() {
        assert_eq!(
            lookup("data_test_id"),
            Some(AttributeLookup::Content("data-test-id".to_string()))
        );
        assert_eq!(
            lookup("aria_label"),
            Some(AttributeLookup::Content("aria-label".to_string()))
        );
    }

    #[test]
    fn test_value_conversion() {
        assert_eq!(
            AttributeValue::from_raw(AttributeKind::Bool, Some("true".to_string())),
            AttributeValue::Bool(true)
        );
        assert_eq!(AttributeValue::from_raw(AttributeKind::Bool, None), AttributeValue::Bool(false));
        assert_eq!(
            AttributeValue::from_raw(AttributeKind::Int, Some("12".to_string())),
            AttributeValue::Int(Some(12))
        );
        assert_eq!(
            AttributeValue::from_raw(AttributeKind::String, None),
            AttributeValue::String(String::new())
        );
    }
}
