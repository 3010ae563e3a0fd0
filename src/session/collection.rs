//! Element collections

use std::sync::Arc;
use tracing::debug;

use super::parent::Parent;
use crate::element::{Element, ElementLocator, Selector};
use crate::remote::RemoteHandle;
use crate::Result;

/// Every element matching a selector under one parent
///
/// Located on each call; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ElementCollection {
    parent: Parent,
    selector: Selector,
}

impl ElementCollection {
    pub fn new(parent: Parent, selector: Selector) -> Self {
        Self { parent, selector }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    async fn handles(&self) -> Result<Vec<RemoteHandle>> {
        let scope = self.parent.ensure_context().await?;
        let driver = self.parent.session().driver();
        let handles = ElementLocator::new(driver).locate_all(&scope, &self.selector).await?;
        debug!("Collection {} matched {} element(s)", self.selector, handles.len());
        Ok(handles)
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.handles().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Lazy proxy for the n-th match; re-locates by criteria and index
    pub fn get(&self, index: usize) -> Arc<Element> {
        Element::new(self.parent.clone(), self.selector.clone().index(index))
    }

    /// Handle-based proxies for the current matches
    ///
    /// Each carries its criteria and index as fallback, used only when the
    /// session allows handle-based relocation.
    pub async fn to_vec(&self) -> Result<Vec<Arc<Element>>> {
        let handles = self.handles().await?;
        Ok(handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| {
                let fallback = self.selector.clone().index(index);
                Element::new(
                    self.parent.clone(),
                    Selector::from_handle_with_fallback(handle, fallback),
                )
            })
            .collect())
    }
}
