//! Script atoms executed against a single element
//!
//! Each atom is a closed, named script. The element is always passed as
//! `arguments[0]`; extra arguments follow in order.

use serde_json::Value;

/// Outer HTML of `arguments[0]`
pub const OUTER_HTML_SCRIPT: &str = "return arguments[0].outerHTML;";

/// Inner HTML of `arguments[0]`
pub const INNER_HTML_SCRIPT: &str = "return arguments[0].innerHTML;";

/// Focus `arguments[0]`
pub const FOCUS_SCRIPT: &str = "return arguments[0].focus();";

/// Parent element of `arguments[0]`, or null
pub const PARENT_ELEMENT_SCRIPT: &str = r#"
var parent = arguments[0].parentNode;
return (parent && parent.nodeType === 1) ? parent : null;
"#;

/// Dispatch a DOM event named `arguments[1]` on `arguments[0]`
pub const FIRE_EVENT_SCRIPT: &str = r#"
var element = arguments[0];
var name = arguments[1];
var event;
if (/^(click|dblclick|mouse(down|up|over|out|move|enter|leave)|contextmenu)$/.test(name)) {
    event = new MouseEvent(name, { bubbles: true, cancelable: true, view: window });
} else if (/^key(down|up|press)$/.test(name)) {
    event = new KeyboardEvent(name, { bubbles: true, cancelable: true });
} else if (/^(focus|blur)$/.test(name)) {
    event = new FocusEvent(name, { bubbles: false, cancelable: false });
} else {
    event = new Event(name, { bubbles: true, cancelable: true });
}
return element.dispatchEvent(event);
"#;

/// Select the first occurrence of `arguments[1]` inside `arguments[0]`
pub const SELECT_TEXT_SCRIPT: &str = r#"
var element = arguments[0];
var needle = arguments[1];
if (typeof element.setSelectionRange === 'function' && typeof element.value === 'string') {
    var start = element.value.indexOf(needle);
    if (start < 0) return false;
    element.focus();
    element.setSelectionRange(start, start + needle.length);
    return true;
}
var walker = document.createTreeWalker(element, NodeFilter.SHOW_TEXT, null, false);
var node;
while ((node = walker.nextNode())) {
    var index = node.nodeValue.indexOf(needle);
    if (index >= 0) {
        var range = document.createRange();
        range.setStart(node, index);
        range.setEnd(node, index + needle.length);
        var selection = window.getSelection();
        selection.removeAllRanges();
        selection.addRange(range);
        return true;
    }
}
return false;
"#;

/// Inline background color of `arguments[0]`
pub const BACKGROUND_COLOR_SCRIPT: &str = "return arguments[0].style.backgroundColor;";

/// Set the inline background color of `arguments[0]` to `arguments[1]`
pub const SET_BACKGROUND_COLOR_SCRIPT: &str =
    "arguments[0].style.backgroundColor = arguments[1]; return null;";

/// Closed set of element scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    OuterHtml,
    InnerHtml,
    Focus,
    FireEvent(String),
    ParentElement,
    SelectText(String),
    BackgroundColor,
    SetBackgroundColor(String),
}

impl Atom {
    /// Script body
    pub fn script(&self) -> &'static str {
        match self {
            Atom::OuterHtml => OUTER_HTML_SCRIPT,
            Atom::InnerHtml => INNER_HTML_SCRIPT,
            Atom::Focus => FOCUS_SCRIPT,
            Atom::FireEvent(_) => FIRE_EVENT_SCRIPT,
            Atom::ParentElement => PARENT_ELEMENT_SCRIPT,
            Atom::SelectText(_) => SELECT_TEXT_SCRIPT,
            Atom::BackgroundColor => BACKGROUND_COLOR_SCRIPT,
            Atom::SetBackgroundColor(_) => SET_BACKGROUND_COLOR_SCRIPT,
        }
    }

    /// Arguments following the element itself
    pub fn extra_args(&self) -> Vec<Value> {
        match self {
            Atom::FireEvent(name) => vec![Value::String(name.clone())],
            Atom::SelectText(text) => vec![Value::String(text.clone())],
            Atom::SetBackgroundColor(color) => vec![Value::String(color.clone())],
            _ => Vec::new(),
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Atom::OuterHtml => "getOuterHtml",
            Atom::InnerHtml => "getInnerHtml",
            Atom::Focus => "focus",
            Atom::FireEvent(_) => "fireEvent",
            Atom::ParentElement => "getParentElement",
            Atom::SelectText(_) => "selectText",
            Atom::BackgroundColor => "getBackgroundColor",
            Atom::SetBackgroundColor(_) => "setBackgroundColor",
        }
    }
}
