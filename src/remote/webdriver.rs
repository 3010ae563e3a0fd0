//! W3C WebDriver adapter
//!
//! Implements [`RemoteDriver`] over the W3C WebDriver HTTP protocol.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::atoms::Atom;
use super::traits::RemoteDriver;
use super::types::{
    By, ElementAction, ElementQuery, Liveness, Modifier, RemoteHandle, Scope, ScriptValue,
};
use crate::{Error, Result};

/// W3C web element identifier key
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// WebDriver client bound to one remote session
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl WebDriverClient {
    /// Attach to an existing session
    ///
    /// # Arguments
    /// * `base_url` - WebDriver endpoint, e.g. `http://localhost:4444`
    /// * `session_id` - Id of an already created session
    pub fn new<U: Into<String>, S: Into<String>>(base_url: U, session_id: S) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_id: session_id.into(),
        }
    }

    /// Create a new remote session
    pub async fn connect(base_url: &str, capabilities: Value) -> Result<Self> {
        info!("Creating WebDriver session at {}", base_url);

        let http = reqwest::Client::new();
        let base_url = base_url.trim_end_matches('/').to_string();
        let response = http
            .post(format!("{}/session", base_url))
            .json(&json!({ "capabilities": { "alwaysMatch": capabilities } }))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body: Value = response.json().await?;
        let value = decode_response(status, body)?;

        let session_id = value
            .get("sessionId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::internal("New session response without sessionId"))?
            .to_string();

        debug!("WebDriver session created: {}", session_id);

        Ok(Self {
            http,
            base_url,
            session_id,
        })
    }

    /// Session id
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// End the remote session
    pub async fn quit(&self) -> Result<()> {
        self.command(Method::DELETE, "", None).await?;
        Ok(())
    }

    /// Execute one session command and return its `value`
    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}/session/{}{}", self.base_url, self.session_id, path);
        debug!("WebDriver {} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body: Value = response.json().await?;

        decode_response(status, body)
    }

    async fn element_get(&self, handle: &RemoteHandle, suffix: &str) -> Result<Value> {
        self.command(
            Method::GET,
            &format!("/element/{}/{}", handle.id(), suffix),
            None,
        )
        .await
    }

    async fn perform_actions(&self, actions: Value) -> Result<()> {
        self.command(Method::POST, "/actions", Some(json!({ "actions": actions })))
            .await?;
        self.command(Method::DELETE, "/actions", None).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteDriver for WebDriverClient {
    async fn find_elements(&self, scope: &Scope, by: &By) -> Result<Vec<RemoteHandle>> {
        let (using, value) = by_to_wire(by, scope)?;
        let path = match scope {
            Scope::Document => "/elements".to_string(),
            Scope::Element(handle) => format!("/element/{}/elements", handle.id()),
        };

        let result = self
            .command(Method::POST, &path, Some(json!({ "using": using, "value": value })))
            .await?;

        Ok(result
            .as_array()
            .map(|items| items.iter().filter_map(parse_handle).collect())
            .unwrap_or_default())
    }

    async fn probe_liveness(&self, handle: &RemoteHandle) -> Result<Liveness> {
        match self.element_get(handle, "enabled").await {
            Ok(_) => Ok(Liveness::Live),
            Err(e) if e.is_stale() => Ok(Liveness::Detached),
            Err(e) => Err(e),
        }
    }

    async fn read_property(&self, handle: &RemoteHandle, name: &str) -> Result<Option<String>> {
        let value = self.element_get(handle, &format!("property/{}", name)).await?;
        Ok(value_to_string(&value))
    }

    async fn attribute(&self, handle: &RemoteHandle, name: &str) -> Result<Option<String>> {
        let value = self.element_get(handle, &format!("attribute/{}", name)).await?;
        Ok(value_to_string(&value))
    }

    async fn css_value(&self, handle: &RemoteHandle, property: &str) -> Result<String> {
        let value = self.element_get(handle, &format!("css/{}", property)).await?;
        Ok(value_to_string(&value).unwrap_or_default())
    }

    async fn tag_name(&self, handle: &RemoteHandle) -> Result<String> {
        let value = self.element_get(handle, "name").await?;
        Ok(value_to_string(&value).unwrap_or_default())
    }

    async fn text(&self, handle: &RemoteHandle) -> Result<String> {
        let value = self.element_get(handle, "text").await?;
        Ok(value_to_string(&value).unwrap_or_default())
    }

    async fn is_displayed(&self, handle: &RemoteHandle) -> Result<bool> {
        let value = self.element_get(handle, "displayed").await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn is_enabled(&self, handle: &RemoteHandle) -> Result<bool> {
        let value = self.element_get(handle, "enabled").await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn perform_action(&self, handle: &RemoteHandle, action: &ElementAction) -> Result<()> {
        let element_path = |suffix: &str| format!("/element/{}/{}", handle.id(), suffix);

        match action {
            ElementAction::Click { modifiers } if modifiers.is_empty() => {
                self.command(Method::POST, &element_path("click"), Some(json!({})))
                    .await?;
            }
            ElementAction::Clear => {
                self.command(Method::POST, &element_path("clear"), Some(json!({})))
                    .await?;
            }
            ElementAction::SendKeys(keys) => {
                let text: String = keys.iter().map(|k| k.to_wire()).collect();
                self.command(Method::POST, &element_path("value"), Some(json!({ "text": text })))
                    .await?;
            }
            other => {
                let actions = actions_payload(handle, other)
                    .ok_or_else(|| Error::internal("Action has no input device encoding"))?;
                self.perform_actions(actions).await?;
            }
        }
        Ok(())
    }

    async fn execute_atom(&self, handle: &RemoteHandle, atom: &Atom) -> Result<ScriptValue> {
        let mut args = vec![element_ref(handle)];
        args.extend(atom.extra_args());

        let value = self
            .command(
                Method::POST,
                "/execute/sync",
                Some(json!({ "script": atom.script(), "args": args })),
            )
            .await?;

        Ok(parse_script_value(value))
    }

    async fn active_element(&self) -> Result<Option<RemoteHandle>> {
        match self.command(Method::GET, "/element/active", None).await {
            Ok(value) => Ok(parse_handle(&value)),
            Err(Error::WebDriver { error, .. }) if error == "no such element" => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn switch_to_frame(&self, frame: &RemoteHandle) -> Result<()> {
        self.command(Method::POST, "/frame", Some(json!({ "id": element_ref(frame) })))
            .await?;
        Ok(())
    }

    async fn switch_to_default_content(&self) -> Result<()> {
        self.command(Method::POST, "/frame", Some(json!({ "id": Value::Null })))
            .await?;
        Ok(())
    }
}

/// Unwrap a WebDriver response body, mapping protocol errors
pub(crate) fn decode_response(status: u16, body: Value) -> Result<Value> {
    let value = body.get("value").cloned().unwrap_or(Value::Null);

    let error = value.get("error").and_then(|e| e.as_str());
    if status < 400 && error.is_none() {
        return Ok(value);
    }

    let error = error.unwrap_or("unknown error").to_string();
    let message = value
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or_default()
        .to_string();

    Err(match error.as_str() {
        "stale element reference" | "detached shadow root" => Error::stale(message),
        "no such frame" => Error::unknown_frame(message),
        "invalid selector" => Error::invalid_selector(message),
        _ => Error::webdriver(error, message),
    })
}

fn element_ref(handle: &RemoteHandle) -> Value {
    json!({ ELEMENT_KEY: handle.id() })
}

fn parse_handle(value: &Value) -> Option<RemoteHandle> {
    value
        .get(ELEMENT_KEY)
        .and_then(|id| id.as_str())
        .map(RemoteHandle::new)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_script_value(value: Value) -> ScriptValue {
    if let Some(handle) = parse_handle(&value) {
        return ScriptValue::Element(handle);
    }
    match value {
        Value::Null => ScriptValue::Null,
        Value::Bool(b) => ScriptValue::Bool(b),
        Value::Number(n) => ScriptValue::Number(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => ScriptValue::String(s),
        other => ScriptValue::String(other.to_string()),
    }
}

fn by_to_wire(by: &By, scope: &Scope) -> Result<(&'static str, String)> {
    Ok(match by {
        By::Css(css) => ("css selector", css.clone()),
        By::XPath(xpath) => ("xpath", xpath.clone()),
        By::Query(query) => ("xpath", compile_query(query, scope)?),
    })
}

/// Quote a string as an XPath literal, even when it holds both quote kinds
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{}'", s);
    }
    if !s.contains('"') {
        return format!("\"{}\"", s);
    }

    let parts: Vec<String> = s
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
}

/// Compile a structured query into an XPath expression
pub fn compile_query(query: &ElementQuery, scope: &Scope) -> Result<String> {
    let prefix = match scope {
        Scope::Document => "//",
        Scope::Element(_) => ".//",
    };

    let tag = match &query.tag_name {
        Some(tag) if valid_name(tag) => tag.as_str(),
        Some(tag) => return Err(Error::invalid_selector(format!("invalid tag name: {}", tag))),
        None => "*",
    };

    let mut predicates = Vec::new();
    for (name, value) in &query.attributes {
        if !valid_name(name) {
            return Err(Error::invalid_selector(format!("invalid attribute name: {}", name)));
        }
        predicates.push(format!("@{}={}", name, xpath_literal(value)));
    }
    for class in &query.classes {
        predicates.push(format!(
            "contains(concat(' ', normalize-space(@class), ' '), {})",
            xpath_literal(&format!(" {} ", class))
        ));
    }
    if let Some(text) = &query.text {
        predicates.push(format!("normalize-space()={}", xpath_literal(text)));
    }

    if predicates.is_empty() {
        Ok(format!("{}{}", prefix, tag))
    } else {
        Ok(format!("{}{}[{}]", prefix, tag, predicates.join(" and ")))
    }
}

fn pointer_move_to(handle: &RemoteHandle) -> Value {
    json!({ "type": "pointerMove", "duration": 0, "origin": element_ref(handle), "x": 0, "y": 0 })
}

fn pointer_button(kind: &str, button: u8) -> Value {
    json!({ "type": kind, "button": button })
}

fn pause() -> Value {
    json!({ "type": "pause", "duration": 0 })
}

fn pointer_source(actions: Vec<Value>) -> Value {
    json!({
        "type": "pointer",
        "id": "mouse",
        "parameters": { "pointerType": "mouse" },
        "actions": actions,
    })
}

/// Encode a gesture for the W3C actions endpoint
pub(crate) fn actions_payload(handle: &RemoteHandle, action: &ElementAction) -> Option<Value> {
    let pointer = match action {
        ElementAction::Click { modifiers } => {
            return Some(modified_click(handle, modifiers));
        }
        ElementAction::DoubleClick => vec![
            pointer_move_to(handle),
            pointer_button("pointerDown", 0),
            pointer_button("pointerUp", 0),
            pointer_button("pointerDown", 0),
            pointer_button("pointerUp", 0),
        ],
        ElementAction::ContextClick => vec![
            pointer_move_to(handle),
            pointer_button("pointerDown", 2),
            pointer_button("pointerUp", 2),
        ],
        ElementAction::MoveTo => vec![pointer_move_to(handle)],
        ElementAction::DragAndDropOn { target } => vec![
            pointer_move_to(handle),
            pointer_button("pointerDown", 0),
            pointer_move_to(target),
            pointer_button("pointerUp", 0),
        ],
        ElementAction::DragAndDropBy { right, down } => vec![
            pointer_move_to(handle),
            pointer_button("pointerDown", 0),
            json!({ "type": "pointerMove", "duration": 0, "origin": "pointer", "x": right, "y": down }),
            pointer_button("pointerUp", 0),
        ],
        ElementAction::SendKeys(_) | ElementAction::Clear => return None,
    };

    Some(json!([pointer_source(pointer)]))
}

fn modified_click(handle: &RemoteHandle, modifiers: &[Modifier]) -> Value {
    let mut keys = Vec::new();
    let mut pointer = Vec::new();

    for modifier in modifiers {
        keys.push(json!({ "type": "keyDown", "value": modifier.key_code().to_string() }));
        pointer.push(pause());
    }

    for step in [
        pointer_move_to(handle),
        pointer_button("pointerDown", 0),
        pointer_button("pointerUp", 0),
    ] {
        pointer.push(step);
        keys.push(pause());
    }

    for modifier in modifiers {
        keys.push(json!({ "type": "keyUp", "value": modifier.key_code().to_string() }));
        pointer.push(pause());
    }

    json!([
        { "type": "key", "id": "keyboard", "actions": keys },
        pointer_source(pointer),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success() {
        let value = decode_response(200, json!({ "value": { "sessionId": "abc" } })).unwrap();
        assert_eq!(value["sessionId"], "abc");
    }

    #[test]
    fn test_decode_stale_element() {
        let body = json!({
            "value": {
                "error": "stale element reference",
                "message": "element is not attached to the page document",
                "stacktrace": ""
            }
        });
        let err = decode_response(404, body).unwrap_err();
        assert!(err.is_stale());
    }

    #[test]
    fn test_decode_other_errors() {
        let body = json!({ "value": { "error": "no such frame", "message": "gone" } });
        assert!(matches!(decode_response(404, body), Err(Error::UnknownFrame(_))));

        let body = json!({ "value": { "error": "element not interactable", "message": "hidden" } });
        match decode_response(400, body) {
            Err(Error::WebDriver { error, message }) => {
                assert_eq!(error, "element not interactable");
                assert_eq!(message, "hidden");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_xpath_literal_quoting() {
        assert_eq!(xpath_literal("plain"), "'plain'");
        assert_eq!(xpath_literal("single 'quotes'"), "\"single 'quotes'\"");
        assert_eq!(
            xpath_literal(r#"it's "both""#),
            r#"concat('it', "'", 's "both"')"#
        );
    }

    #[test]
    fn test_compile_query() {
        let query = ElementQuery {
            tag_name: Some("button".to_string()),
            attributes: vec![("id".to_string(), "submit".to_string())],
            classes: vec!["primary".to_string()],
            text: Some("Save".to_string()),
        };

        let xpath = compile_query(&query, &Scope::Document).unwrap();
        assert_eq!(
            xpath,
            "//button[@id='submit' and contains(concat(' ', normalize-space(@class), ' '), ' primary ') and normalize-space()='Save']"
        );

        let scoped = compile_query(&ElementQuery::default(), &Scope::Element(RemoteHandle::new("e1"))).unwrap();
        assert_eq!(scoped, ".//*");
    }

    #[test]
    fn test_compile_query_rejects_bad_names() {
        let query = ElementQuery {
            attributes: vec![("on click".to_string(), "x".to_string())],
            ..Default::default()
        };
        assert!(matches!(
            compile_query(&query, &Scope::Document),
            Err(Error::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_parse_script_value() {
        let element = parse_script_value(json!({ ELEMENT_KEY: "node-7" }));
        assert_eq!(element, ScriptValue::Element(RemoteHandle::new("node-7")));
        assert_eq!(parse_script_value(Value::Null), ScriptValue::Null);
        assert_eq!(parse_script_value(json!("x")), ScriptValue::String("x".to_string()));
    }

    #[test]
    fn test_modified_click_payload() {
        let handle = RemoteHandle::new("e1");
        let payload = actions_payload(
            &handle,
            &ElementAction::Click { modifiers: vec![Modifier::Shift, Modifier::Control] },
        )
        .unwrap();

        let keys = payload[0]["actions"].as_array().unwrap();
        let pointer = payload[1]["actions"].as_array().unwrap();
        // Both sources advance in lockstep.
        assert_eq!(keys.len(), pointer.len());
        assert_eq!(keys[0]["type"], "keyDown");
        assert_eq!(keys.last().unwrap()["type"], "keyUp");
        assert!(actions_payload(&handle, &ElementAction::Clear).is_none());
    }
}
