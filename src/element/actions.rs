//! Element readers and user actions
//!
//! Every operation resolves through [`Element::element_call`]. Interactive
//! actions first wait for the readiness they need and dispatch against the
//! handle that wait confirmed.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::attributes::{self, AttributeLookup, AttributeValue};
use super::proxy::{Element, Resolution};
use super::selector::Selector;
use crate::remote::{Atom, ElementAction, KeyInput, Modifier, ScriptValue};
use crate::wait::Interaction;
use crate::{Error, Result};

/// Pause between color changes while flashing
const FLASH_DELAY: Duration = Duration::from_millis(50);
const FLASH_COLOR: &str = "red";

impl Element {
    async fn perform(&self, ready: Resolution, action: ElementAction) -> Result<()> {
        self.dispatch(ready, move |driver, handle| {
            let action = action.clone();
            async move { driver.perform_action(&handle, &action).await }
        })
        .await
    }

    async fn run_atom(&self, atom: Atom) -> Result<ScriptValue> {
        debug!("Executing atom {} on {}", atom.name(), self.selector());
        self.element_call(move |driver, handle| {
            let atom = atom.clone();
            async move { driver.execute_atom(&handle, &atom).await }
        })
        .await
    }

    fn assert_input_devices(&self, name: &str) -> Result<()> {
        if self.driver().supports_input_devices() {
            Ok(())
        } else {
            Err(Error::not_supported(format!(
                "Element::{} is not supported by this driver",
                name
            )))
        }
    }

    // Readers

    /// Rendered text; waits until the element is present
    pub async fn text(&self) -> Result<String> {
        self.wait_until_present(None).await?;
        info!("Retrieving element text: {}", self.selector());
        self.element_call(|driver, handle| async move { driver.text(&handle).await })
            .await
    }

    /// Lowercased tag name
    pub async fn tag_name(&self) -> Result<String> {
        self.element_call(|driver, handle| async move { driver.tag_name(&handle).await })
            .await
            .map(|tag| tag.to_lowercase())
    }

    /// Current value, empty when the element has none
    pub async fn value(&self) -> Result<String> {
        self.element_call(|driver, handle| async move { driver.read_property(&handle, "value").await })
            .await
            .map(Option::unwrap_or_default)
    }

    /// Raw content attribute
    pub async fn attribute_value(&self, name: &str) -> Result<Option<String>> {
        self.element_call(|driver, handle| async move { driver.attribute(&handle, name).await })
            .await
    }

    /// Read an attribute through the accessor registry
    pub async fn attribute(&self, name: &str) -> Result<AttributeValue> {
        match attributes::lookup(name).ok_or_else(|| Error::unknown_attribute(name))? {
            AttributeLookup::Property(spec) => {
                let raw = self
                    .element_call(|driver, handle| async move {
                        driver.read_property(&handle, spec.property).await
                    })
                    .await?;
                Ok(AttributeValue::from_raw(spec.kind, raw))
            }
            AttributeLookup::Content(attr) => {
                let raw = self.attribute_value(&attr).await?;
                Ok(AttributeValue::String(raw.unwrap_or_default()))
            }
        }
    }

    /// `id` attribute
    pub async fn id(&self) -> Result<String> {
        Ok(self.attribute("id").await?.as_str().unwrap_or_default().to_string())
    }

    /// `class` attribute
    pub async fn class_name(&self) -> Result<String> {
        Ok(self
            .attribute("class_name")
            .await?
            .as_str()
            .unwrap_or_default()
            .to_string())
    }

    pub async fn outer_html(&self) -> Result<String> {
        let value = self.run_atom(Atom::OuterHtml).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub async fn inner_html(&self) -> Result<String> {
        let value = self.run_atom(Atom::InnerHtml).await?;
        Ok(value.as_str().unwrap_or_default().trim().to_string())
    }

    /// Computed value of one CSS property, or the inline style when `None`
    pub async fn style(&self, property: Option<&str>) -> Result<String> {
        match property {
            Some(property) => {
                self.element_call(|driver, handle| async move { driver.css_value(&handle, property).await })
                    .await
            }
            None => Ok(self
                .attribute_value("style")
                .await?
                .unwrap_or_default()
                .trim()
                .to_string()),
        }
    }

    /// Whether the element has focus
    pub async fn focused(&self) -> Result<bool> {
        self.element_call(|driver, handle| async move {
            let active = driver.active_element().await?;
            Ok::<_, Error>(active.as_ref() == Some(&handle))
        })
        .await
    }

    pub async fn enabled(&self) -> Result<bool> {
        self.element_call(|driver, handle| async move { driver.is_enabled(&handle).await })
            .await
    }

    pub async fn read_only(&self) -> Result<bool> {
        Ok(self.attribute("read_only").await?.as_bool().unwrap_or(false))
    }

    /// Parent element as a handle-based proxy under the same parent
    pub async fn parent_element(&self) -> Result<Option<Arc<Element>>> {
        match self.run_atom(Atom::ParentElement).await? {
            ScriptValue::Element(handle) => Ok(Some(Element::with_policy(
                self.parent().clone(),
                Selector::from_handle(handle),
                self.policy(),
            ))),
            _ => Ok(None),
        }
    }

    // Actions

    /// Click, optionally holding modifier keys
    #[instrument(skip(self), fields(selector = %self.selector()))]
    pub async fn click(&self, modifiers: &[Modifier]) -> Result<()> {
        if !modifiers.is_empty() {
            self.assert_input_devices("click")?;
        }
        let ready = self.wait_for(Interaction::Enabled).await?;

        info!("Clicking element: {}", self.selector());
        self.perform(ready, ElementAction::Click {
            modifiers: modifiers.to_vec(),
        })
        .await?;
        self.session().run_checkers().await
    }

    #[instrument(skip(self), fields(selector = %self.selector()))]
    pub async fn double_click(&self) -> Result<()> {
        self.assert_input_devices("double_click")?;
        let ready = self.wait_for(Interaction::Present).await?;

        info!("Double clicking element: {}", self.selector());
        self.perform(ready, ElementAction::DoubleClick).await?;
        self.session().run_checkers().await
    }

    #[instrument(skip(self), fields(selector = %self.selector()))]
    pub async fn right_click(&self) -> Result<()> {
        self.assert_input_devices("right_click")?;
        let ready = self.wait_for(Interaction::Present).await?;

        info!("Right clicking element: {}", self.selector());
        self.perform(ready, ElementAction::ContextClick).await?;
        self.session().run_checkers().await
    }

    /// Move the pointer over the element
    pub async fn hover(&self) -> Result<()> {
        self.assert_input_devices("hover")?;
        let ready = self.wait_for(Interaction::Present).await?;
        self.perform(ready, ElementAction::MoveTo).await
    }

    pub async fn focus(&self) -> Result<()> {
        self.wait_for(Interaction::Present).await?;
        self.run_atom(Atom::Focus).await.map(|_| ())
    }

    /// Drag this element onto `other`
    ///
    /// The target is resolved on every attempt, so a retry never reuses a
    /// dead target handle and a lost target is reported with its own selector.
    pub async fn drag_and_drop_on(&self, other: &Element) -> Result<()> {
        self.assert_input_devices("drag_and_drop_on")?;
        let ready = self.wait_for(Interaction::Present).await?;
        other.wait_for(Interaction::Present).await?;

        self.dispatch(ready, |driver, handle| async move {
            let target = other.ensure_resolved().await?;
            driver
                .perform_action(&handle, &ElementAction::DragAndDropOn { target })
                .await
        })
        .await
    }

    /// Drag this element by an offset in pixels
    pub async fn drag_and_drop_by(&self, right: i64, down: i64) -> Result<()> {
        self.assert_input_devices("drag_and_drop_by")?;
        let ready = self.wait_for(Interaction::Present).await?;
        self.perform(ready, ElementAction::DragAndDropBy { right, down }).await
    }

    /// Type into the element
    #[instrument(skip(self, keys), fields(selector = %self.selector()))]
    pub async fn send_keys<I, K>(&self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: Into<KeyInput>,
    {
        let keys: Vec<KeyInput> = keys.into_iter().map(Into::into).collect();
        let ready = self.wait_for(Interaction::Writable).await?;

        info!("Typing into element: {}", self.selector());
        self.perform(ready, ElementAction::SendKeys(keys)).await
    }

    /// Dispatch a DOM event; `onclick` and `Click` both mean `click`
    pub async fn fire_event(&self, event: &str) -> Result<()> {
        let name = event.strip_prefix("on").unwrap_or(event).to_lowercase();
        self.wait_for(Interaction::Present).await?;

        debug!("Firing {} on {}", name, self.selector());
        self.run_atom(Atom::FireEvent(name)).await.map(|_| ())
    }

    /// Briefly highlight the element, then restore its background
    pub async fn flash(&self) -> Result<()> {
        self.wait_for(Interaction::Present).await?;

        let original = self.run_atom(Atom::BackgroundColor).await?;
        let original = original.as_str().unwrap_or_default().to_string();

        for n in 0..10 {
            let color = if n % 2 == 0 { FLASH_COLOR } else { original.as_str() };
            self.run_atom(Atom::SetBackgroundColor(color.to_string())).await?;
            tokio::time::sleep(FLASH_DELAY).await;
        }

        self.run_atom(Atom::SetBackgroundColor(original)).await.map(|_| ())
    }

    /// Select the first occurrence of `text`; returns false if it is absent
    pub async fn select_text(&self, text: &str) -> Result<bool> {
        let found = self.run_atom(Atom::SelectText(text.to_string())).await?;
        Ok(matches!(found, ScriptValue::Bool(true)))
    }
}
