//! Element locator
//!
//! Translates a [`Selector`] into one remote find operation, filters the
//! candidates by any pattern criteria and applies the ordinal.

use std::sync::Arc;
use tracing::{debug, instrument};

use super::selector::{Criterion, Selector};
use crate::remote::{By, ElementQuery, RemoteDriver, RemoteHandle, Scope};
use crate::{Error, Result};

/// Outcome of one resolution attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved(RemoteHandle),
    NotFound,
    /// The scope element was detached while searching
    Stale,
}

/// Criteria split into what the remote side evaluates and what is checked locally
#[derive(Debug)]
struct CompiledSelector {
    by: By,
    patterns: Vec<(String, Criterion)>,
}

/// Element locator
///
/// Issues exactly one find per call and never retries.
pub struct ElementLocator {
    driver: Arc<dyn RemoteDriver>,
}

impl ElementLocator {
    /// Create a new locator
    pub fn new(driver: Arc<dyn RemoteDriver>) -> Self {
        Self { driver }
    }

    /// Resolve a selector to at most one handle
    #[instrument(skip(self, selector), fields(selector = %selector))]
    pub async fn locate(&self, scope: &Scope, selector: &Selector) -> Result<ResolutionOutcome> {
        if let Selector::Handle { handle, .. } = selector {
            return Ok(ResolutionOutcome::Resolved(handle.clone()));
        }

        let candidates = match self.candidates(scope, selector).await {
            Ok(candidates) => candidates,
            Err(e) if e.is_stale() => return Ok(ResolutionOutcome::Stale),
            Err(e) => return Err(e),
        };

        let index = selector.ordinal().unwrap_or(0);
        debug!("Locator found {} candidate(s), taking index {}", candidates.len(), index);

        Ok(candidates
            .into_iter()
            .nth(index)
            .map_or(ResolutionOutcome::NotFound, ResolutionOutcome::Resolved))
    }

    /// Resolve every element matching the selector, ignoring its ordinal
    #[instrument(skip(self, selector), fields(selector = %selector))]
    pub async fn locate_all(&self, scope: &Scope, selector: &Selector) -> Result<Vec<RemoteHandle>> {
        match selector {
            Selector::Handle { handle, .. } => Ok(vec![handle.clone()]),
            Selector::Criteria { .. } => self.candidates(scope, selector).await,
        }
    }

    async fn candidates(&self, scope: &Scope, selector: &Selector) -> Result<Vec<RemoteHandle>> {
        let compiled = compile(selector)?;
        let found = self.driver.find_elements(scope, &compiled.by).await?;

        if compiled.patterns.is_empty() {
            return Ok(found);
        }

        let mut matching = Vec::with_capacity(found.len());
        for handle in found {
            match self.matches_patterns(&handle, &compiled.patterns).await {
                Ok(true) => matching.push(handle),
                Ok(false) => {}
                // Candidate vanished between find and filter
                Err(e) if e.is_stale() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(matching)
    }

    async fn matches_patterns(&self, handle: &RemoteHandle, patterns: &[(String, Criterion)]) -> Result<bool> {
        for (key, criterion) in patterns {
            let actual = match key.as_str() {
                "text" => self.driver.text(handle).await?,
                "tag_name" => self.driver.tag_name(handle).await?.to_lowercase(),
                "class" | "class_name" => self.driver.attribute(handle, "class").await?.unwrap_or_default(),
                other => self
                    .driver
                    .attribute(handle, &attribute_name(other))
                    .await?
                    .unwrap_or_default(),
            };
            if !criterion.matches(&actual) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Map a selector key to the DOM attribute it constrains
fn attribute_name(key: &str) -> String {
    key.replace('_', "-")
}

fn exact<'a>(key: &str, criterion: &'a Criterion) -> Result<&'a str> {
    match criterion {
        Criterion::Exact(value) => Ok(value.as_str()),
        Criterion::Pattern(_) => Err(Error::invalid_selector(format!(
            "{} does not accept a regular expression",
            key
        ))),
    }
}

fn compile(selector: &Selector) -> Result<CompiledSelector> {
    let criteria = selector
        .criteria()
        .ok_or_else(|| Error::internal("handle-based selector cannot be compiled"))?;

    for raw in ["css", "xpath"] {
        if let Some(criterion) = criteria.get(raw) {
            if criteria.len() > 1 {
                return Err(Error::invalid_selector(format!(
                    "{} cannot be combined with other criteria (except index): {}",
                    raw, selector
                )));
            }
            let expr = exact(raw, criterion)?.to_string();
            let by = if raw == "css" { By::Css(expr) } else { By::XPath(expr) };
            return Ok(CompiledSelector {
                by,
                patterns: Vec::new(),
            });
        }
    }

    let mut query = ElementQuery::default();
    let mut patterns = Vec::new();

    for (key, criterion) in criteria {
        if criterion.is_pattern() {
            patterns.push((key.clone(), criterion.clone()));
            continue;
        }
        let value = exact(key, criterion)?;
        match key.as_str() {
            "tag_name" => query.tag_name = Some(value.to_lowercase()),
            "text" => query.text = Some(value.to_string()),
            "class" | "class_name" => {
                query.classes.extend(value.split_whitespace().map(str::to_string));
            }
            other => query.attributes.push((attribute_name(other), value.to_string())),
        }
    }

    Ok(CompiledSelector {
        by: By::Query(query),
        patterns,
    })
}
