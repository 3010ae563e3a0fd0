//! Tests for the session root, containers and collections

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;
use crate::config::Config;
use crate::element::Selector;
use crate::remote::{ContextSwitch, MockDriver, MockNode, RemoteDriver};
use crate::{Error, Result};

fn create_test_session(driver: &Arc<MockDriver>) -> Session {
    Session::new(
        driver.clone(),
        Config {
            default_timeout_ms: 300,
            poll_interval_ms: 10,
            ..Default::default()
        },
    )
}

struct CountingChecker {
    runs: AtomicUsize,
}

#[async_trait]
impl Checker for CountingChecker {
    async fn check(&self, _session: &Session) -> Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct ErrorPageChecker;

#[async_trait]
impl Checker for ErrorPageChecker {
    async fn check(&self, session: &Session) -> Result<()> {
        if session.element(Selector::id("error-banner")).present().await? {
            return Err(Error::internal("error page detected"));
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_session_identity() {
    let driver = Arc::new(MockDriver::new());
    let a = create_test_session(&driver);
    let b = create_test_session(&driver);

    assert_ne!(a.id(), b.id());
    assert_eq!(a.clone().id(), a.id());
    assert_eq!(a.timer().interval(), std::time::Duration::from_millis(10));
}

#[tokio::test]
async fn test_checkers_run_after_clicks() {
    let driver = Arc::new(MockDriver::new());
    driver.insert(MockNode::new("button").id("go"));
    driver.insert(MockNode::new("input").id("q"));
    let session = create_test_session(&driver);

    let checker = Arc::new(CountingChecker {
        runs: AtomicUsize::new(0),
    });
    session.add_checker(checker.clone()).await;

    session.element(Selector::id("go")).click(&[]).await.unwrap();
    session.element(Selector::id("go")).double_click().await.unwrap();
    assert_eq!(checker.runs.load(Ordering::SeqCst), 2);

    // Typing is not a click-type action
    session.element(Selector::id("q")).send_keys(["x"]).await.unwrap();
    assert_eq!(checker.runs.load(Ordering::SeqCst), 2);

    session.clear_checkers().await;
    session.element(Selector::id("go")).click(&[]).await.unwrap();
    assert_eq!(checker.runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_checker_failure_surfaces() {
    let driver = Arc::new(MockDriver::new());
    driver.insert(MockNode::new("button").id("go"));
    driver.insert(MockNode::new("div").id("error-banner"));
    let session = create_test_session(&driver);
    session.add_checker(Arc::new(ErrorPageChecker)).await;

    let err = session.element(Selector::id("go")).click(&[]).await.unwrap_err();
    assert!(matches!(err, Error::Internal(_)));
    // The click itself went through
    assert_eq!(driver.actions().len(), 1);
}

#[tokio::test]
async fn test_session_parent_switches_to_default_content() {
    let driver = Arc::new(MockDriver::new());
    let frame = driver.insert(MockNode::new("iframe").id("f"));
    driver.insert(MockNode::new("p").id("top"));
    let session = create_test_session(&driver);

    driver.switch_to_frame(&frame).await.unwrap();

    let top = session.element(Selector::id("top"));
    assert!(top.exists().await.unwrap());
    assert_eq!(driver.context_switches().last(), Some(&ContextSwitch::Default));
}

#[tokio::test]
async fn test_nested_frames() {
    let driver = Arc::new(MockDriver::new());
    let outer = driver.insert(MockNode::new("iframe").id("outer"));
    let inner = driver.insert_in_frame(&outer, MockNode::new("iframe").id("inner"));
    driver.insert_in_frame(&inner, MockNode::new("span").id("deep").text("found me"));
    let session = create_test_session(&driver);

    let deep = session
        .frame(Selector::id("outer"))
        .frame(Selector::id("inner"))
        .element(Selector::id("deep"));

    assert_eq!(deep.text().await.unwrap(), "found me");
    assert_eq!(
        driver.context_switches()[..3],
        [
            ContextSwitch::Default,
            ContextSwitch::Frame(outer),
            ContextSwitch::Frame(inner),
        ]
    );
}

#[tokio::test]
async fn test_switching_into_non_frame_fails() {
    let driver = Arc::new(MockDriver::new());
    driver.insert(MockNode::new("div").id("not-a-frame"));
    let session = create_test_session(&driver);

    let frame = session.frame(Selector::id("not-a-frame"));
    let err = frame.switch_to().await.unwrap_err();
    assert!(matches!(err, Error::UnknownFrame(_)));
}

#[tokio::test]
async fn test_collection_len_and_get() {
    let driver = Arc::new(MockDriver::new());
    driver.insert(MockNode::new("li").text("one"));
    driver.insert(MockNode::new("li").text("two"));
    driver.insert(MockNode::new("li").text("three"));
    let session = create_test_session(&driver);

    let items = session.elements(Selector::tag("li"));
    assert_eq!(items.len().await.unwrap(), 3);
    assert!(!items.is_empty().await.unwrap());

    let second = items.get(1);
    assert!(!second.selector().is_handle_based());
    assert_eq!(second.text().await.unwrap(), "two");

    let none = session.elements(Selector::tag("table"));
    assert!(none.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_collection_to_vec_is_handle_based() {
    let driver = Arc::new(MockDriver::new());
    let first = driver.insert(MockNode::new("li").text("one"));
    driver.insert(MockNode::new("li").text("two"));
    let session = create_test_session(&driver);

    let items = session.elements(Selector::tag("li")).to_vec().await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.selector().is_handle_based()));

    // Default policy never re-locates handle-based proxies
    let finds = driver.find_count();
    driver.replace(&first);
    let err = items[0].tag_name().await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(driver.find_count(), finds);
}

#[tokio::test]
async fn test_collection_under_element() {
    let driver = Arc::new(MockDriver::new());
    let nav = driver.insert(MockNode::new("nav").id("main"));
    driver.insert_child(&nav, MockNode::new("a").text("Home"));
    driver.insert_child(&nav, MockNode::new("a").text("About"));
    driver.insert(MockNode::new("a").text("Footer"));
    let session = create_test_session(&driver);

    let links = session.element(Selector::id("main")).elements(Selector::tag("a"));
    assert_eq!(links.len().await.unwrap(), 2);
}
