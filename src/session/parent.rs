//! Parent chain

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

use super::frame::Frame;
use super::root::Session;
use crate::element::Element;
use crate::remote::Scope;
use crate::Result;

/// What an element is located relative to
#[derive(Debug, Clone)]
pub enum Parent {
    /// Top-level document of the session
    Session(Session),
    /// Descendants of another element
    Element(Arc<Element>),
    /// Document inside a frame
    Frame(Frame),
}

impl Parent {
    pub fn session(&self) -> &Session {
        match self {
            Parent::Session(session) => session,
            Parent::Element(element) => element.session(),
            Parent::Frame(frame) => frame.session(),
        }
    }

    /// Make the parent live and the remote context point at it
    ///
    /// Frame switching is session-global, so this runs before every find and
    /// probe instead of trusting whatever context was last selected.
    pub fn ensure_context(&self) -> BoxFuture<'_, Result<Scope>> {
        async move {
            match self {
                Parent::Session(session) => {
                    session.driver().switch_to_default_content().await?;
                    Ok(Scope::Document)
                }
                Parent::Element(element) => element.ensure_resolved().await.map(Scope::Element),
                Parent::Frame(frame) => {
                    frame.switch_to().await?;
                    Ok(Scope::Document)
                }
            }
        }
        .boxed()
    }

    /// Forget the parent's cached handle
    pub(crate) async fn invalidate(&self) {
        match self {
            Parent::Session(_) => {}
            Parent::Element(element) => element.reset().await,
            Parent::Frame(frame) => frame.frame_element().reset().await,
        }
    }
}
