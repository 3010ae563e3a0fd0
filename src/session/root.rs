//! Session root
//!
//! Owns the remote driver, the configuration and the post-action checkers
//! shared by every proxy created under it.

use async_trait::async_trait;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::remote::{RemoteDriver, WebDriverClient};
use crate::wait::Timer;
use crate::Result;

/// Hook run after click-type actions
///
/// Typical uses are failing fast on an error page or a server-side
/// exception banner.
#[async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, session: &Session) -> Result<()>;
}

struct SessionInner {
    id: String,
    driver: Arc<dyn RemoteDriver>,
    config: Config,
    timer: Timer,
    checkers: RwLock<Vec<Arc<dyn Checker>>>,
}

/// Root of every parent chain
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Create a session over an existing driver
    pub fn new(driver: Arc<dyn RemoteDriver>, config: Config) -> Self {
        let timer = Timer::new(config.poll_interval());
        Self {
            inner: Arc::new(SessionInner {
                id: Uuid::new_v4().to_string(),
                driver,
                config,
                timer,
                checkers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Open a new WebDriver session at `config.webdriver_url`
    pub async fn connect(config: Config) -> Result<Self> {
        info!("Connecting to WebDriver at {}", config.webdriver_url);
        let client = WebDriverClient::connect(&config.webdriver_url, json!({})).await?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn driver(&self) -> Arc<dyn RemoteDriver> {
        self.inner.driver.clone()
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn timer(&self) -> Timer {
        self.inner.timer
    }

    /// Register a checker
    pub async fn add_checker(&self, checker: Arc<dyn Checker>) {
        self.inner.checkers.write().await.push(checker);
    }

    /// Remove all checkers
    pub async fn clear_checkers(&self) {
        self.inner.checkers.write().await.clear();
    }

    /// Run every checker in registration order, stopping at the first failure
    pub async fn run_checkers(&self) -> Result<()> {
        let checkers = self.inner.checkers.read().await.clone();
        if !checkers.is_empty() {
            debug!("Running {} checker(s)", checkers.len());
        }
        for checker in checkers {
            checker.check(self).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("driver", &self.inner.driver)
            .finish()
    }
}
