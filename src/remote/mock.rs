//! Mock remote driver for testing
//!
//! An in-memory DOM that behaves like a WebDriver session: handles go stale
//! when nodes are removed or replaced, frames are a session-global context,
//! and nodes can be scheduled to appear later. Every remote call is counted
//! so tests can assert on round-trips.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::atoms::Atom;
use super::traits::RemoteDriver;
use super::types::{
    By, ElementAction, ElementQuery, KeyInput, Liveness, RemoteHandle, Scope, ScriptValue,
};
use crate::Error;

/// Description of a node to insert into the mock DOM
#[derive(Debug, Clone)]
pub struct MockNode {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    displayed: bool,
    enabled: bool,
}

impl MockNode {
    /// Create a node with the given tag
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            displayed: true,
            enabled: true,
        }
    }

    /// Set an attribute
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Set the id attribute
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Set the class attribute
    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    /// Set the text content
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Render the node invisible
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Disable the node
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Mark the node read only
    pub fn read_only(self) -> Self {
        self.attr("readonly", "readonly")
    }
}

/// Recorded context switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextSwitch {
    Frame(RemoteHandle),
    Default,
}

#[derive(Debug)]
struct NodeState {
    node: MockNode,
    parent: Option<u64>,
    frame: Option<u64>,
    attached: bool,
    appears_at: Option<Instant>,
    order: u64,
}

impl NodeState {
    fn present(&self, now: Instant) -> bool {
        self.attached && self.appears_at.map_or(true, |at| at <= now)
    }
}

#[derive(Debug, Default)]
struct Dom {
    nodes: HashMap<u64, NodeState>,
    next_id: u64,
    next_order: u64,
    context: Option<u64>,
    active: Option<u64>,
    stale_actions: usize,
}

impl Dom {
    fn add(&mut self, node: MockNode, parent: Option<u64>, frame: Option<u64>, appears_at: Option<Instant>) -> u64 {
        self.next_id += 1;
        self.next_order += 10;
        let id = self.next_id;
        self.nodes.insert(
            id,
            NodeState {
                node,
                parent,
                frame,
                attached: true,
                appears_at,
                order: self.next_order,
            },
        );
        id
    }

    fn is_descendant(&self, id: u64, ancestor: u64) -> bool {
        let mut current = self.nodes.get(&id).and_then(|n| n.parent);
        while let Some(pid) = current {
            if pid == ancestor {
                return true;
            }
            current = self.nodes.get(&pid).and_then(|n| n.parent);
        }
        false
    }

    fn detach_subtree(&mut self, root: u64) {
        let ids: Vec<u64> = self
            .nodes
            .keys()
            .copied()
            .filter(|id| *id == root || self.is_descendant(*id, root))
            .collect();
        for id in ids {
            if let Some(state) = self.nodes.get_mut(&id) {
                state.attached = false;
            }
        }
    }

    /// Node usable from the current browsing context
    fn live(&self, handle: &RemoteHandle) -> Result<&NodeState, Error> {
        let now = Instant::now();
        let state = parse_id(handle)
            .and_then(|id| self.nodes.get(&id))
            .filter(|state| state.present(now))
            .ok_or_else(|| Error::stale(format!("{} is not attached to the page document", handle)))?;

        if state.frame != self.context {
            return Err(Error::stale(format!(
                "{} does not belong to the current browsing context",
                handle
            )));
        }
        Ok(state)
    }

    fn live_mut(&mut self, handle: &RemoteHandle) -> Result<&mut NodeState, Error> {
        self.live(handle)?;
        parse_id(handle)
            .and_then(|id| self.nodes.get_mut(&id))
            .ok_or_else(|| Error::stale(handle.to_string()))
    }

    fn displayed(&self, id: u64) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            match self.nodes.get(&cid) {
                Some(state) if state.node.displayed => current = state.parent,
                _ => return false,
            }
        }
        true
    }

    fn children(&self, id: u64) -> Vec<u64> {
        let mut children: Vec<(u64, u64)> = self
            .nodes
            .iter()
            .filter(|(_, s)| s.parent == Some(id) && s.attached)
            .map(|(cid, s)| (s.order, *cid))
            .collect();
        children.sort();
        children.into_iter().map(|(_, cid)| cid).collect()
    }

    fn inner_html(&self, id: u64) -> String {
        let mut html = self.nodes.get(&id).map(|s| s.node.text.clone()).unwrap_or_default();
        for child in self.children(id) {
            html.push_str(&self.outer_html(child));
        }
        html
    }

    fn outer_html(&self, id: u64) -> String {
        let Some(state) = self.nodes.get(&id) else {
            return String::new();
        };
        let attrs: String = state
            .node
            .attributes
            .iter()
            .map(|(k, v)| format!(" {}=\"{}\"", k, v))
            .collect();
        format!("<{tag}{attrs}>{inner}</{tag}>", tag = state.node.tag, attrs = attrs, inner = self.inner_html(id))
    }
}

fn handle_for(id: u64) -> RemoteHandle {
    RemoteHandle::new(format!("mock-{}", id))
}

fn parse_id(handle: &RemoteHandle) -> Option<u64> {
    handle.id().strip_prefix("mock-").and_then(|id| id.parse().ok())
}

fn normalize_space(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn style_value(style: &str, property: &str) -> Option<String> {
    style.split(';').find_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        (name.trim() == property).then(|| value.trim().to_string())
    })
}

fn set_style_value(style: &str, property: &str, value: &str) -> String {
    let mut decls: Vec<String> = style
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter(|d| d.split_once(':').map_or(true, |(n, _)| n.trim() != property))
        .map(str::to_string)
        .collect();
    if !value.is_empty() {
        decls.push(format!("{}: {}", property, value));
    }
    decls.join("; ")
}

fn matches_query(node: &MockNode, query: &ElementQuery) -> bool {
    if let Some(tag) = &query.tag_name {
        if !node.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if !query
        .attributes
        .iter()
        .all(|(name, value)| node.attributes.get(name) == Some(value))
    {
        return false;
    }
    let classes: Vec<&str> = node
        .attributes
        .get("class")
        .map(|c| c.split_whitespace().collect())
        .unwrap_or_default();
    if !query.classes.iter().all(|c| classes.contains(&c.as_str())) {
        return false;
    }
    if let Some(text) = &query.text {
        if normalize_space(&node.text) != normalize_space(text) {
            return false;
        }
    }
    true
}

/// Parse the simple compound CSS subset the mock understands: `tag#id.class`
fn parse_simple_css(css: &str) -> Result<ElementQuery, Error> {
    let css = css.trim();
    if css.is_empty() || css.contains(|c: char| c.is_whitespace() || "[]>+~:*,".contains(c)) {
        return Err(Error::invalid_selector(format!("mock driver cannot evaluate css: {}", css)));
    }

    let mut query = ElementQuery::default();
    let mut token = String::new();
    let mut kind = ' ';
    for c in css.chars().chain(std::iter::once('\0')) {
        if c == '#' || c == '.' || c == '\0' {
            match kind {
                ' ' if !token.is_empty() => query.tag_name = Some(token.to_lowercase()),
                '#' => query.attributes.push(("id".to_string(), token.clone())),
                '.' => query.classes.push(token.clone()),
                _ => {}
            }
            token.clear();
            kind = c;
        } else {
            token.push(c);
        }
    }
    Ok(query)
}

/// Mock remote driver
#[derive(Debug, Default)]
pub struct MockDriver {
    dom: Mutex<Dom>,
    finds: AtomicUsize,
    probes: AtomicUsize,
    action_attempts: AtomicUsize,
    actions: Mutex<Vec<(RemoteHandle, ElementAction)>>,
    atoms: Mutex<Vec<(RemoteHandle, Atom)>>,
    switches: Mutex<Vec<ContextSwitch>>,
    no_input_devices: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockDriver {
    /// Create an empty mock document
    pub fn new() -> Self {
        Self::default()
    }

    /// Report no input device support
    pub fn without_input_devices(self) -> Self {
        self.no_input_devices.store(true, Ordering::Relaxed);
        self
    }

    /// Insert a node into the top-level document
    pub fn insert(&self, node: MockNode) -> RemoteHandle {
        handle_for(lock(&self.dom).add(node, None, None, None))
    }

    /// Insert a node that becomes findable only after `delay`
    pub fn insert_later(&self, node: MockNode, delay: Duration) -> RemoteHandle {
        let at = Instant::now() + delay;
        handle_for(lock(&self.dom).add(node, None, None, Some(at)))
    }

    /// Insert a node as the last child of `parent`
    pub fn insert_child(&self, parent: &RemoteHandle, node: MockNode) -> RemoteHandle {
        let mut dom = lock(&self.dom);
        let pid = parse_id(parent);
        let frame = pid.and_then(|id| dom.nodes.get(&id)).and_then(|s| s.frame);
        handle_for(dom.add(node, pid, frame, None))
    }

    /// Insert a node into the document of `frame`
    pub fn insert_in_frame(&self, frame: &RemoteHandle, node: MockNode) -> RemoteHandle {
        let mut dom = lock(&self.dom);
        handle_for(dom.add(node, None, parse_id(frame), None))
    }

    /// Remove a node and its subtree; their handles go stale
    pub fn remove(&self, handle: &RemoteHandle) {
        if let Some(id) = parse_id(handle) {
            lock(&self.dom).detach_subtree(id);
        }
    }

    /// Replace a node with an identical-looking one carrying a fresh handle
    pub fn replace(&self, handle: &RemoteHandle) -> Option<RemoteHandle> {
        let mut dom = lock(&self.dom);
        let id = parse_id(handle)?;
        let (node, parent, frame, order) = {
            let state = dom.nodes.get(&id)?;
            (state.node.clone(), state.parent, state.frame, state.order)
        };
        dom.detach_subtree(id);
        let new_id = dom.add(node, parent, frame, None);
        if let Some(state) = dom.nodes.get_mut(&new_id) {
            state.order = order;
        }
        Some(handle_for(new_id))
    }

    fn update<F: FnOnce(&mut MockNode)>(&self, handle: &RemoteHandle, f: F) {
        let mut dom = lock(&self.dom);
        if let Some(state) = parse_id(handle).and_then(|id| dom.nodes.get_mut(&id)) {
            f(&mut state.node);
        }
    }

    /// Toggle visibility
    pub fn set_displayed(&self, handle: &RemoteHandle, displayed: bool) {
        self.update(handle, |node| node.displayed = displayed);
    }

    /// Toggle enabled state
    pub fn set_enabled(&self, handle: &RemoteHandle, enabled: bool) {
        self.update(handle, |node| node.enabled = enabled);
    }

    /// Set or overwrite an attribute
    pub fn set_attribute(&self, handle: &RemoteHandle, name: &str, value: &str) {
        self.update(handle, |node| {
            node.attributes.insert(name.to_string(), value.to_string());
        });
    }

    /// Remove an attribute
    pub fn remove_attribute(&self, handle: &RemoteHandle, name: &str) {
        self.update(handle, |node| {
            node.attributes.remove(name);
        });
    }

    /// Current attribute value, regardless of attachment
    pub fn attribute_of(&self, handle: &RemoteHandle, name: &str) -> Option<String> {
        let dom = lock(&self.dom);
        parse_id(handle)
            .and_then(|id| dom.nodes.get(&id))
            .and_then(|state| state.node.attributes.get(name).cloned())
    }

    /// Whether the handle still refers to an attached node
    pub fn is_attached(&self, handle: &RemoteHandle) -> bool {
        let dom = lock(&self.dom);
        parse_id(handle)
            .and_then(|id| dom.nodes.get(&id))
            .map_or(false, |state| state.attached)
    }

    /// Make the next `count` actions fail as if the node had just been detached
    pub fn fail_next_actions(&self, count: usize) {
        lock(&self.dom).stale_actions = count;
    }

    /// Number of find operations issued
    pub fn find_count(&self) -> usize {
        self.finds.load(Ordering::Relaxed)
    }

    /// Number of liveness probes issued
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }

    /// Number of action calls, including failed ones
    pub fn action_attempts(&self) -> usize {
        self.action_attempts.load(Ordering::Relaxed)
    }

    /// Successfully performed actions
    pub fn actions(&self) -> Vec<(RemoteHandle, ElementAction)> {
        lock(&self.actions).clone()
    }

    /// Executed script atoms
    pub fn atoms(&self) -> Vec<(RemoteHandle, Atom)> {
        lock(&self.atoms).clone()
    }

    /// Context switches in call order
    pub fn context_switches(&self) -> Vec<ContextSwitch> {
        lock(&self.switches).clone()
    }

    /// Reset all call counters and logs
    pub fn reset_counters(&self) {
        self.finds.store(0, Ordering::Relaxed);
        self.probes.store(0, Ordering::Relaxed);
        self.action_attempts.store(0, Ordering::Relaxed);
        lock(&self.actions).clear();
        lock(&self.atoms).clear();
        lock(&self.switches).clear();
    }
}

#[async_trait]
impl RemoteDriver for MockDriver {
    async fn find_elements(&self, scope: &Scope, by: &By) -> Result<Vec<RemoteHandle>, Error> {
        self.finds.fetch_add(1, Ordering::Relaxed);

        let query = match by {
            By::Query(query) => query.clone(),
            By::Css(css) => parse_simple_css(css)?,
            By::XPath(xpath) => {
                return Err(Error::invalid_selector(format!(
                    "mock driver cannot evaluate xpath: {}",
                    xpath
                )))
            }
        };

        let dom = lock(&self.dom);
        let root = match scope {
            Scope::Document => None,
            Scope::Element(handle) => {
                dom.live(handle)?;
                parse_id(handle)
            }
        };

        let now = Instant::now();
        let mut found: Vec<(u64, u64)> = dom
            .nodes
            .iter()
            .filter(|(_, s)| s.present(now) && s.frame == dom.context)
            .filter(|(id, _)| root.map_or(true, |r| dom.is_descendant(**id, r)))
            .filter(|(_, s)| matches_query(&s.node, &query))
            .map(|(id, s)| (s.order, *id))
            .collect();
        found.sort();

        Ok(found.into_iter().map(|(_, id)| handle_for(id)).collect())
    }

    async fn probe_liveness(&self, handle: &RemoteHandle) -> Result<Liveness, Error> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        Ok(match lock(&self.dom).live(handle) {
            Ok(_) => Liveness::Live,
            Err(_) => Liveness::Detached,
        })
    }

    async fn read_property(&self, handle: &RemoteHandle, name: &str) -> Result<Option<String>, Error> {
        let dom = lock(&self.dom);
        let state = dom.live(handle)?;
        let attrs = &state.node.attributes;

        Ok(match name {
            "className" => attrs.get("class").cloned(),
            "readOnly" => Some(attrs.contains_key("readonly").to_string()),
            "disabled" => Some((!state.node.enabled || attrs.contains_key("disabled")).to_string()),
            "checked" => Some(attrs.contains_key("checked").to_string()),
            "hidden" => Some(attrs.contains_key("hidden").to_string()),
            "required" => Some(attrs.contains_key("required").to_string()),
            "tagName" => Some(state.node.tag.to_uppercase()),
            "textContent" => Some(state.node.text.clone()),
            "value" if matches!(state.node.tag.as_str(), "input" | "textarea" | "select") => {
                Some(attrs.get("value").cloned().unwrap_or_default())
            }
            other => attrs
                .get(other)
                .or_else(|| attrs.get(&other.to_lowercase()))
                .cloned(),
        })
    }

    async fn attribute(&self, handle: &RemoteHandle, name: &str) -> Result<Option<String>, Error> {
        let dom = lock(&self.dom);
        Ok(dom.live(handle)?.node.attributes.get(name).cloned())
    }

    async fn css_value(&self, handle: &RemoteHandle, property: &str) -> Result<String, Error> {
        let dom = lock(&self.dom);
        let state = dom.live(handle)?;
        if property == "display" && !state.node.displayed {
            return Ok("none".to_string());
        }
        Ok(state
            .node
            .attributes
            .get("style")
            .and_then(|style| style_value(style, property))
            .unwrap_or_default())
    }

    async fn tag_name(&self, handle: &RemoteHandle) -> Result<String, Error> {
        let dom = lock(&self.dom);
        Ok(dom.live(handle)?.node.tag.to_uppercase())
    }

    async fn text(&self, handle: &RemoteHandle) -> Result<String, Error> {
        let dom = lock(&self.dom);
        let state = dom.live(handle)?;
        let id = parse_id(handle).unwrap_or_default();
        if dom.displayed(id) {
            Ok(normalize_space(&state.node.text))
        } else {
            Ok(String::new())
        }
    }

    async fn is_displayed(&self, handle: &RemoteHandle) -> Result<bool, Error> {
        let dom = lock(&self.dom);
        dom.live(handle)?;
        Ok(dom.displayed(parse_id(handle).unwrap_or_default()))
    }

    async fn is_enabled(&self, handle: &RemoteHandle) -> Result<bool, Error> {
        let dom = lock(&self.dom);
        let state = dom.live(handle)?;
        Ok(state.node.enabled && !state.node.attributes.contains_key("disabled"))
    }

    async fn perform_action(&self, handle: &RemoteHandle, action: &ElementAction) -> Result<(), Error> {
        self.action_attempts.fetch_add(1, Ordering::Relaxed);

        if action.needs_input_devices() && !self.supports_input_devices() {
            return Err(Error::not_supported("mock driver has no input devices"));
        }

        let mut dom = lock(&self.dom);
        if dom.stale_actions > 0 {
            dom.stale_actions -= 1;
            return Err(Error::stale(format!("{} was detached during the action", handle)));
        }
        if let ElementAction::DragAndDropOn { target } = action {
            dom.live(target)?;
        }

        let id = parse_id(handle).unwrap_or_default();
        let state = dom.live_mut(handle)?;
        let node = &mut state.node;
        match action {
            ElementAction::Click { .. } => {
                let input_type = node.attributes.get("type").cloned().unwrap_or_default();
                if node.tag == "input" && input_type == "checkbox" {
                    if node.attributes.remove("checked").is_none() {
                        node.attributes.insert("checked".to_string(), "checked".to_string());
                    }
                } else if node.tag == "input" && input_type == "radio" {
                    node.attributes.insert("checked".to_string(), "checked".to_string());
                }
                dom.active = Some(id);
            }
            ElementAction::SendKeys(keys) => {
                let mut value = node.attributes.get("value").cloned().unwrap_or_default();
                for key in keys {
                    if let KeyInput::Text(text) = key {
                        value.push_str(text);
                    }
                }
                node.attributes.insert("value".to_string(), value);
                dom.active = Some(id);
            }
            ElementAction::Clear => {
                node.attributes.insert("value".to_string(), String::new());
            }
            _ => {}
        }
        drop(dom);

        lock(&self.actions).push((handle.clone(), action.clone()));
        Ok(())
    }

    async fn execute_atom(&self, handle: &RemoteHandle, atom: &Atom) -> Result<ScriptValue, Error> {
        let mut dom = lock(&self.dom);
        let id = parse_id(handle).unwrap_or_default();
        let state = dom.live_mut(handle)?;

        let value = match atom {
            Atom::OuterHtml | Atom::InnerHtml | Atom::Focus => ScriptValue::Null,
            Atom::FireEvent(_) => ScriptValue::Bool(true),
            Atom::ParentElement => state.parent.map_or(ScriptValue::Null, |p| ScriptValue::Element(handle_for(p))),
            Atom::SelectText(needle) => {
                let value = state.node.attributes.get("value").cloned().unwrap_or_default();
                ScriptValue::Bool(state.node.text.contains(needle.as_str()) || value.contains(needle.as_str()))
            }
            Atom::BackgroundColor => ScriptValue::String(
                state
                    .node
                    .attributes
                    .get("style")
                    .and_then(|s| style_value(s, "background-color"))
                    .unwrap_or_default(),
            ),
            Atom::SetBackgroundColor(color) => {
                let style = state.node.attributes.get("style").cloned().unwrap_or_default();
                state
                    .node
                    .attributes
                    .insert("style".to_string(), set_style_value(&style, "background-color", color));
                ScriptValue::Null
            }
        };

        // Atoms that read the whole subtree run after the node borrow ends
        let value = match atom {
            Atom::OuterHtml => ScriptValue::String(dom.outer_html(id)),
            Atom::InnerHtml => ScriptValue::String(dom.inner_html(id)),
            Atom::Focus => {
                dom.active = Some(id);
                ScriptValue::Null
            }
            _ => value,
        };
        drop(dom);

        lock(&self.atoms).push((handle.clone(), atom.clone()));
        Ok(value)
    }

    async fn active_element(&self) -> Result<Option<RemoteHandle>, Error> {
        let dom = lock(&self.dom);
        Ok(dom
            .active
            .map(handle_for)
            .filter(|handle| dom.live(handle).is_ok()))
    }

    async fn switch_to_frame(&self, frame: &RemoteHandle) -> Result<(), Error> {
        lock(&self.switches).push(ContextSwitch::Frame(frame.clone()));

        let mut dom = lock(&self.dom);
        let state = dom.live(frame)?;
        if !matches!(state.node.tag.as_str(), "iframe" | "frame") {
            return Err(Error::unknown_frame(format!("{} is not a frame", frame)));
        }
        dom.context = parse_id(frame);
        Ok(())
    }

    async fn switch_to_default_content(&self) -> Result<(), Error> {
        lock(&self.switches).push(ContextSwitch::Default);
        lock(&self.dom).context = None;
        Ok(())
    }

    fn supports_input_devices(&self) -> bool {
        !self.no_input_devices.load(Ordering::Relaxed)
    }
}
