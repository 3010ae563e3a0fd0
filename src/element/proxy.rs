//! Element proxy
//!
//! An [`Element`] is the long-lived object callers hold. It caches at most
//! one remote handle, confirms the handle is still attached before reuse and
//! re-locates through its selector when the relocation policy allows it.

use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::attributes::{AttributeKind, AttributeValue};
use super::locator::{ElementLocator, ResolutionOutcome};
use super::selector::Selector;
use crate::config::RelocatePolicy;
use crate::remote::{Liveness, RemoteDriver, RemoteHandle};
use crate::session::{Parent, Session};
use crate::wait::{Condition, Interaction};
use crate::{Error, Result};

/// Live handle produced by one resolution
#[derive(Debug, Clone)]
pub(crate) struct Resolution {
    pub handle: RemoteHandle,
    /// A cached handle was found detached and replaced by locating again
    pub relocated: bool,
}

/// Element proxy
pub struct Element {
    id: String,
    session: Session,
    parent: Parent,
    selector: Selector,
    policy: RelocatePolicy,
    cache: RwLock<Option<RemoteHandle>>,
    /// Set once the wrapped handle of a handle-based selector was seen detached
    handle_lost: AtomicBool,
}

impl Element {
    /// Create a proxy; no remote call is made
    pub fn new(parent: Parent, selector: Selector) -> Arc<Self> {
        let policy = parent.session().config().relocate_policy();
        Self::with_policy(parent, selector, policy)
    }

    /// Create a proxy with an explicit relocation policy
    pub fn with_policy(parent: Parent, selector: Selector, policy: RelocatePolicy) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4().to_string(),
            session: parent.session().clone(),
            parent,
            selector,
            policy,
            cache: RwLock::new(None),
            handle_lost: AtomicBool::new(false),
        })
    }

    /// Local proxy id, unrelated to the DOM `id`
    pub fn proxy_id(&self) -> &str {
        &self.id
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn parent(&self) -> &Parent {
        &self.parent
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn policy(&self) -> RelocatePolicy {
        self.policy
    }

    pub(crate) fn driver(&self) -> Arc<dyn RemoteDriver> {
        self.session.driver()
    }

    /// Cached handle, if the proxy is currently resolved
    pub async fn cached_handle(&self) -> Option<RemoteHandle> {
        self.cache.read().await.clone()
    }

    /// Whether a handle is cached
    pub async fn is_located(&self) -> bool {
        self.cache.read().await.is_some()
    }

    /// Drop the cached handle; the next operation resolves again
    pub async fn reset(&self) {
        *self.cache.write().await = None;
    }

    /// Drop the cached handle after the remote side reported it detached
    async fn mark_stale(&self) {
        self.reset().await;
        if self.selector.is_handle_based() {
            self.handle_lost.store(true, Ordering::Relaxed);
        }
    }

    /// Whether a detached handle may be replaced by locating again
    pub fn may_relocate(&self) -> bool {
        match &self.selector {
            Selector::Criteria { .. } => self.policy.always_locate,
            Selector::Handle { fallback, .. } => {
                fallback.is_some() && self.policy.always_locate && self.policy.relocate_handle_based
            }
        }
    }

    /// Return a live handle, locating the element if needed
    pub fn ensure_resolved(&self) -> BoxFuture<'_, Result<RemoteHandle>> {
        self.resolve()
            .map(|resolved| resolved.map(|resolution| resolution.handle))
            .boxed()
    }

    fn resolve(&self) -> BoxFuture<'_, Result<Resolution>> {
        async move {
            let mut relocated = false;
            if let Selector::Handle { handle, .. } = &self.selector {
                if !self.handle_lost.load(Ordering::Relaxed) {
                    let mut cache = self.cache.write().await;
                    if cache.is_none() {
                        *cache = Some(handle.clone());
                    }
                }
            }

            if let Some(handle) = self.cached_handle().await {
                match self.confirm_live(&handle).await? {
                    Liveness::Live => return Ok(Resolution { handle, relocated }),
                    Liveness::Detached => {
                        self.mark_stale().await;
                        if !self.may_relocate() {
                            return Err(Error::unknown_object(format!(
                                "element is no longer attached to the DOM - {}",
                                self.selector
                            )));
                        }
                        debug!("Cached handle detached, re-locating {}", self.selector);
                        relocated = true;
                    }
                }
            }

            let selector = match &self.selector {
                Selector::Handle { fallback: Some(fallback), .. } if self.may_relocate() => fallback.as_ref(),
                Selector::Handle { .. } => {
                    return Err(Error::unknown_object(format!(
                        "element is no longer attached to the DOM - {}",
                        self.selector
                    )))
                }
                criteria => criteria,
            };
            let handle = self.locate_and_cache(selector).await?;
            Ok(Resolution { handle, relocated })
        }
        .boxed()
    }

    /// Liveness probe in the parent's context
    async fn confirm_live(&self, handle: &RemoteHandle) -> Result<Liveness> {
        self.parent.ensure_context().await?;
        self.driver().probe_liveness(handle).await
    }

    async fn locate_and_cache(&self, selector: &Selector) -> Result<RemoteHandle> {
        let scope = self.parent.ensure_context().await?;
        let locator = ElementLocator::new(self.driver());

        match locator.locate(&scope, selector).await? {
            ResolutionOutcome::Resolved(handle) => {
                debug!("Resolved {} to {}", self.selector, handle);
                *self.cache.write().await = Some(handle.clone());
                Ok(handle)
            }
            ResolutionOutcome::NotFound => Err(Error::unknown_object(format!(
                "unable to locate element, using {}",
                self.selector
            ))),
            ResolutionOutcome::Stale => {
                self.parent.invalidate().await;
                Err(Error::unknown_object(format!(
                    "parent element went stale while locating, using {}",
                    self.selector
                )))
            }
        }
    }

    /// Run a remote operation against a live handle
    ///
    /// A detached-handle failure clears the cache and, when relocation is
    /// allowed, re-resolves and runs `op` exactly once more. Detachment that
    /// is not recovered surfaces as [`Error::UnknownObject`].
    pub(crate) async fn element_call<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn(Arc<dyn RemoteDriver>, RemoteHandle) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let resolution = self.resolve().await?;
        self.dispatch(resolution, op).await
    }

    /// Run `op` against an already confirmed handle
    ///
    /// At most one re-locate per dispatch: if `resolution` already replaced a
    /// detached handle, a stale failure from `op` is final.
    pub(crate) async fn dispatch<T, F, Fut>(&self, resolution: Resolution, op: F) -> Result<T>
    where
        F: Fn(Arc<dyn RemoteDriver>, RemoteHandle) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let err = match op(self.driver(), resolution.handle).await {
            Err(e) if e.is_stale() => e,
            other => return other,
        };

        self.mark_stale().await;
        if resolution.relocated || !self.may_relocate() {
            return Err(Error::unknown_object(format!("{} - {}", err, self.selector)));
        }

        warn!("Element went stale during dispatch, retrying once: {}", self.selector);
        let retry = self.resolve().await?;
        match op(self.driver(), retry.handle).await {
            Err(e) if e.is_stale() => {
                self.mark_stale().await;
                Err(Error::unknown_object(format!("{} - {}", e, self.selector)))
            }
            other => other,
        }
    }

    /// Whether the element can be located
    pub async fn exists(&self) -> Result<bool> {
        match self.ensure_resolved().await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether the element is rendered visibly; fails if it cannot be located
    pub async fn visible(&self) -> Result<bool> {
        self.element_call(|driver, handle| async move { driver.is_displayed(&handle).await })
            .await
    }

    /// Exists and visible; losing the element mid-check counts as not present
    pub async fn present(&self) -> Result<bool> {
        if !self.exists().await? {
            return Ok(false);
        }
        match self.visible().await {
            Ok(visible) => Ok(visible),
            Err(e) if e.is_stale() || e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Compare the resolved handles of two proxies
    pub async fn is_same_as(&self, other: &Element) -> Result<bool> {
        Ok(self.ensure_resolved().await? == other.ensure_resolved().await?)
    }

    // Locate failures stay errors so the poller keeps them as the diagnostic
    async fn check(&self, condition: Condition) -> Result<bool> {
        match condition {
            Condition::Exists => self.ensure_resolved().await.map(|_| true),
            Condition::Present | Condition::Visible => self.visible().await,
            Condition::Enabled => Ok(self.visible().await? && self.enabled().await?),
            Condition::Writable => {
                Ok(self.visible().await? && self.enabled().await? && !self.read_only().await?)
            }
            Condition::NotPresent => Ok(!self.present().await?),
        }
    }

    fn timeout_error(&self, timeout: Duration, condition: Condition, diagnostic: Option<String>) -> Error {
        let mut message = format!(
            "timed out after {} seconds, waiting for {} to become {}",
            timeout.as_secs_f64(),
            self.selector,
            condition
        );
        if let Some(diagnostic) = diagnostic {
            message.push_str(&format!(" (last error: {})", diagnostic));
        }
        Error::timeout(message)
    }

    /// Poll until `condition` holds or `timeout` elapses
    #[instrument(skip(self), fields(selector = %self.selector))]
    pub async fn wait_until(&self, condition: Condition, timeout: Duration) -> Result<()> {
        let this = self;
        let outcome = self
            .session
            .timer()
            .wait(timeout, move || this.check(condition))
            .await;

        if outcome.satisfied {
            debug!("{} became {} after {:?}", self.selector, condition, outcome.elapsed);
            return Ok(());
        }
        Err(self.timeout_error(timeout, condition, outcome.diagnostic()))
    }

    /// Wait until present, using the session default when `timeout` is `None`
    pub async fn wait_until_present(&self, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or_else(|| self.session.config().default_timeout());
        self.wait_until(Condition::Present, timeout).await
    }

    /// Wait until the element is gone or hidden
    pub async fn wait_while_present(&self, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or_else(|| self.session.config().default_timeout());
        self.wait_until(Condition::NotPresent, timeout).await
    }

    /// Wait until present and hand the proxy back for chaining
    pub async fn when_present(&self, timeout: Option<Duration>) -> Result<&Self> {
        self.wait_until_present(timeout).await?;
        Ok(self)
    }

    async fn readiness(&self, interaction: Interaction) -> Result<Option<Resolution>> {
        let resolution = self.resolve().await?;
        let driver = self.driver();
        let handle = &resolution.handle;

        if !driver.is_displayed(handle).await? {
            return Ok(None);
        }
        if interaction >= Interaction::Enabled && !driver.is_enabled(handle).await? {
            return Err(Error::object_disabled(format!("object is disabled {}", self.selector)));
        }
        if interaction == Interaction::Writable {
            let raw = driver.read_property(handle, "readOnly").await?;
            if AttributeValue::from_raw(AttributeKind::Bool, raw).as_bool() == Some(true) {
                return Err(Error::object_read_only(format!("object is read only {}", self.selector)));
            }
        }
        Ok(Some(resolution))
    }

    /// Block until the element is ready for an action
    ///
    /// Returns the handle the readiness check confirmed, for use with
    /// [`Element::dispatch`]. On timeout a disabled or read-only element
    /// reports that state; anything else becomes [`Error::Timeout`] carrying
    /// the last diagnostic.
    pub(crate) async fn wait_for(&self, interaction: Interaction) -> Result<Resolution> {
        let timeout = self.session.config().default_timeout();
        let this = self;
        let outcome = self
            .session
            .timer()
            .poll(timeout, move || this.readiness(interaction))
            .await;

        if let Some(resolution) = outcome.value {
            return Ok(resolution);
        }
        match outcome.last_error {
            Some(e @ (Error::ObjectDisabled(_) | Error::ObjectReadOnly(_))) => Err(e),
            last_error => Err(self.timeout_error(
                timeout,
                interaction.condition(),
                last_error.map(|e| e.to_string()),
            )),
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let located = self.cache.try_read().map(|c| c.is_some()).unwrap_or(false);
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("located", &located)
            .field("selector", &self.selector.to_string())
            .finish()
    }
}
