//! Element selectors

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

use crate::remote::RemoteHandle;

/// Match criterion for one selector key
#[derive(Debug, Clone)]
pub enum Criterion {
    /// Exact string equality
    Exact(String),
    /// Regular expression, evaluated locally against candidates
    Pattern(Regex),
}

impl Criterion {
    /// Whether `value` satisfies the criterion
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Criterion::Exact(expected) => expected == value,
            Criterion::Pattern(re) => re.is_match(value),
        }
    }

    /// True for regular expression criteria
    pub fn is_pattern(&self) -> bool {
        matches!(self, Criterion::Pattern(_))
    }
}

impl From<&str> for Criterion {
    fn from(value: &str) -> Self {
        Criterion::Exact(value.to_string())
    }
}

impl From<String> for Criterion {
    fn from(value: String) -> Self {
        Criterion::Exact(value)
    }
}

impl From<Regex> for Criterion {
    fn from(re: Regex) -> Self {
        Criterion::Pattern(re)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Exact(value) => write!(f, "{:?}", value),
            Criterion::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Immutable description of which element a proxy refers to
///
/// Criteria-based selectors are re-evaluated against the live DOM. Handle
/// based selectors wrap a reference the remote side already issued; they may
/// carry criteria as a fallback, which is only used when the relocation
/// policy allows it.
#[derive(Debug, Clone)]
pub enum Selector {
    Criteria {
        criteria: BTreeMap<String, Criterion>,
        index: Option<usize>,
    },
    Handle {
        handle: RemoteHandle,
        fallback: Option<Box<Selector>>,
    },
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}

impl Selector {
    /// Empty criteria selector, matching any element
    pub fn new() -> Self {
        Selector::Criteria {
            criteria: BTreeMap::new(),
            index: None,
        }
    }

    /// Add a criterion; ignored on handle-based selectors
    pub fn with<K: Into<String>, C: Into<Criterion>>(mut self, key: K, criterion: C) -> Self {
        if let Selector::Criteria { criteria, .. } = &mut self {
            criteria.insert(key.into(), criterion.into());
        }
        self
    }

    /// Select the n-th match, counting from zero
    pub fn index(mut self, n: usize) -> Self {
        if let Selector::Criteria { index, .. } = &mut self {
            *index = Some(n);
        }
        self
    }

    /// `{id: value}`
    pub fn id(value: &str) -> Self {
        Self::new().with("id", value)
    }

    /// `{css: value}`
    pub fn css(value: &str) -> Self {
        Self::new().with("css", value)
    }

    /// `{xpath: value}`
    pub fn xpath(value: &str) -> Self {
        Self::new().with("xpath", value)
    }

    /// `{tag_name: value}`
    pub fn tag(value: &str) -> Self {
        Self::new().with("tag_name", value)
    }

    /// Wrap a handle the remote side already issued
    pub fn from_handle(handle: RemoteHandle) -> Self {
        Selector::Handle {
            handle,
            fallback: None,
        }
    }

    /// Wrap a handle and remember the criteria that found it
    pub fn from_handle_with_fallback(handle: RemoteHandle, fallback: Selector) -> Self {
        let fallback = match fallback {
            // Only criteria can be re-evaluated
            Selector::Handle { fallback, .. } => fallback,
            criteria => Some(Box::new(criteria)),
        };
        Selector::Handle { handle, fallback }
    }

    /// True when the selector wraps an existing handle
    pub fn is_handle_based(&self) -> bool {
        matches!(self, Selector::Handle { .. })
    }

    /// Criteria of a criteria-based selector
    pub fn criteria(&self) -> Option<&BTreeMap<String, Criterion>> {
        match self {
            Selector::Criteria { criteria, .. } => Some(criteria),
            Selector::Handle { .. } => None,
        }
    }

    /// Value of one criterion
    pub fn get(&self, key: &str) -> Option<&Criterion> {
        self.criteria().and_then(|c| c.get(key))
    }

    /// Ordinal of a criteria-based selector
    pub fn ordinal(&self) -> Option<usize> {
        match self {
            Selector::Criteria { index, .. } => *index,
            Selector::Handle { .. } => None,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Criteria { criteria, index } => {
                let mut parts: Vec<String> = criteria
                    .iter()
                    .map(|(key, criterion)| format!("{}: {}", key, criterion))
                    .collect();
                if let Some(index) = index {
                    parts.push(format!("index: {}", index));
                }
                write!(f, "{{{}}}", parts.join(", "))
            }
            Selector::Handle { .. } => f.write_str("{element: (remote element)}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_criteria() {
        let selector = Selector::id("submit").with("class", "primary").index(2);
        assert_eq!(selector.to_string(), r#"{class: "primary", id: "submit", index: 2}"#);

        let selector = Selector::new().with("text", Regex::new("^Sign (in|up)$").unwrap());
        assert_eq!(selector.to_string(), "{text: /^Sign (in|up)$/}");
    }

    #[test]
    fn test_display_handle() {
        let selector = Selector::from_handle(RemoteHandle::new("abc"));
        assert_eq!(selector.to_string(), "{element: (remote element)}");
        assert!(selector.is_handle_based());
    }

    #[test]
    fn test_handle_builders_ignore_criteria() {
        let selector = Selector::from_handle(RemoteHandle::new("abc")).with("id", "x").index(1);
        assert!(selector.criteria().is_none());
        assert_eq!(selector.ordinal(), None);
    }

    #[test]
    fn test_fallback_must_be_criteria() {
        let inner = Selector::from_handle(RemoteHandle::new("a"));
        match Selector::from_handle_with_fallback(RemoteHandle::new("b"), inner) {
            Selector::Handle { fallback, .. } => assert!(fallback.is_none()),
            _ => panic!("expected handle selector"),
        }

        let inner = Selector::from_handle_with_fallback(RemoteHandle::new("a"), Selector::id("x"));
        match Selector::from_handle_with_fallback(RemoteHandle::new("b"), inner) {
            Selector::Handle { fallback, .. } => {
                assert_eq!(fallback.map(|f| f.to_string()).as_deref(), Some(r#"{id: "x"}"#))
            }
            _ => panic!("expected handle selector"),
        }
    }

    #[test]
    fn test_criterion_matching() {
        assert!(Criterion::from("a").matches("a"));
        assert!(!Criterion::from("a").matches("ab"));
        assert!(Criterion::from(Regex::new("^a").unwrap()).matches("ab"));
    }
}
