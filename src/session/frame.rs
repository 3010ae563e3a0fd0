//! Frame contexts

use std::sync::Arc;
use tracing::debug;

use super::parent::Parent;
use super::root::Session;
use crate::element::{Element, Selector};
use crate::{Error, Result};

/// Frame-typed parent
///
/// Wraps the proxy of the `iframe`/`frame` element itself. Children located
/// through it always switch into the frame immediately before use.
#[derive(Debug, Clone)]
pub struct Frame {
    element: Arc<Element>,
}

impl Frame {
    pub fn new(parent: Parent, selector: Selector) -> Self {
        Self::from_element(Element::new(parent, selector))
    }

    pub fn from_element(element: Arc<Element>) -> Self {
        Self { element }
    }

    /// Proxy of the frame element
    pub fn frame_element(&self) -> &Arc<Element> {
        &self.element
    }

    pub fn session(&self) -> &Session {
        self.element.session()
    }

    /// Switch the remote session into this frame
    pub async fn switch_to(&self) -> Result<()> {
        debug!("Switching to frame {}", self.element.selector());
        self.element
            .element_call(|driver, handle| async move { driver.switch_to_frame(&handle).await })
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    Error::unknown_frame(format!(
                        "unable to locate frame, using {}",
                        self.element.selector()
                    ))
                } else {
                    e
                }
            })
    }
}
