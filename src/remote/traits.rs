//! Remote protocol traits
//!
//! This module defines the interface the element layer needs from a remote
//! WebDriver-style protocol. Operations on a detached handle must fail with
//! [`Error::StaleElement`](crate::Error::StaleElement).

use async_trait::async_trait;

use super::atoms::Atom;
use super::types::{By, ElementAction, Liveness, RemoteHandle, Scope, ScriptValue};
use crate::Error;

/// Remote driver trait
///
/// One implementation per transport. Frame switching is session-global.
#[async_trait]
pub trait RemoteDriver: Send + Sync + std::fmt::Debug {
    /// Find all elements matching `by` within `scope`, in document order
    async fn find_elements(&self, scope: &Scope, by: &By) -> Result<Vec<RemoteHandle>, Error>;

    /// Cheap check whether the handle still refers to an attached node
    async fn probe_liveness(&self, handle: &RemoteHandle) -> Result<Liveness, Error>;

    /// Read a DOM property
    async fn read_property(&self, handle: &RemoteHandle, name: &str) -> Result<Option<String>, Error>;

    /// Read a content attribute
    async fn attribute(&self, handle: &RemoteHandle, name: &str) -> Result<Option<String>, Error>;

    /// Read a computed style value
    async fn css_value(&self, handle: &RemoteHandle, property: &str) -> Result<String, Error>;

    /// Tag name as reported by the remote side
    async fn tag_name(&self, handle: &RemoteHandle) -> Result<String, Error>;

    /// Rendered text
    async fn text(&self, handle: &RemoteHandle) -> Result<String, Error>;

    /// Whether the element is rendered visibly
    async fn is_displayed(&self, handle: &RemoteHandle) -> Result<bool, Error>;

    /// Whether the element is enabled
    async fn is_enabled(&self, handle: &RemoteHandle) -> Result<bool, Error>;

    /// Perform a user-level action on the element
    async fn perform_action(&self, handle: &RemoteHandle, action: &ElementAction) -> Result<(), Error>;

    /// Run a script atom against the element
    async fn execute_atom(&self, handle: &RemoteHandle, atom: &Atom) -> Result<ScriptValue, Error>;

    /// Element that currently has focus
    async fn active_element(&self) -> Result<Option<RemoteHandle>, Error>;

    /// Switch the session into a frame
    async fn switch_to_frame(&self, frame: &RemoteHandle) -> Result<(), Error>;

    /// Switch the session back to the top-level document
    async fn switch_to_default_content(&self) -> Result<(), Error>;

    /// Whether the low-level input device API is available
    fn supports_input_devices(&self) -> bool {
        true
    }
}
