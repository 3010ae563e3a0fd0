//! Closed set of typed element variants

use phf::phf_map;
use std::sync::Arc;

use super::editable::{CheckBox, FileField, Radio, TextField};
use super::proxy::Element;
use super::selector::Selector;
use crate::session::Frame;
use crate::Result;

/// Variant chosen for a resolved element
#[derive(Debug, Clone)]
pub enum TypedElement {
    Button(Arc<Element>),
    CheckBox(CheckBox),
    Radio(Radio),
    FileField(FileField),
    TextField(TextField),
    Frame(Frame),
    Generic(Arc<Element>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Button,
    CheckBox,
    Radio,
    FileField,
    TextField,
    Frame,
    Generic,
}

static INPUT_TYPES: phf::Map<&'static str, Kind> = phf_map! {
    "button" => Kind::Button,
    "reset" => Kind::Button,
    "submit" => Kind::Button,
    "image" => Kind::Button,
    "checkbox" => Kind::CheckBox,
    "radio" => Kind::Radio,
    "file" => Kind::FileField,
};

static TAGS: phf::Map<&'static str, Kind> = phf_map! {
    "button" => Kind::Button,
    "textarea" => Kind::TextField,
    "iframe" => Kind::Frame,
    "frame" => Kind::Frame,
};

fn classify(tag: &str, input_type: &str) -> Kind {
    if tag == "input" {
        return INPUT_TYPES.get(input_type).copied().unwrap_or(Kind::TextField);
    }
    TAGS.get(tag).copied().unwrap_or(Kind::Generic)
}

impl TypedElement {
    /// Underlying proxy
    pub fn element(&self) -> &Arc<Element> {
        match self {
            TypedElement::Button(e) | TypedElement::Generic(e) => e,
            TypedElement::CheckBox(e) => e.element(),
            TypedElement::Radio(e) => e.element(),
            TypedElement::FileField(e) => e.element(),
            TypedElement::TextField(e) => e.element(),
            TypedElement::Frame(f) => f.frame_element(),
        }
    }
}

impl Element {
    /// Resolve the element and wrap it in its most specific variant
    ///
    /// The returned proxy is handle-based and keeps this selector as its
    /// fallback criteria.
    pub async fn to_subtype(&self) -> Result<TypedElement> {
        let (tag, input_type, handle) = self
            .element_call(|driver, handle| async move {
                let tag = driver.tag_name(&handle).await?.to_lowercase();
                let input_type = if tag == "input" {
                    driver
                        .attribute(&handle, "type")
                        .await?
                        .unwrap_or_default()
                        .to_lowercase()
                } else {
                    String::new()
                };
                Ok::<_, crate::Error>((tag, input_type, handle))
            })
            .await?;

        let selector = Selector::from_handle_with_fallback(handle, self.selector().clone());
        let element = Element::with_policy(self.parent().clone(), selector, self.policy());

        Ok(match classify(&tag, &input_type) {
            Kind::Button => TypedElement::Button(element),
            Kind::CheckBox => TypedElement::CheckBox(CheckBox::new(element)),
            Kind::Radio => TypedElement::Radio(Radio::new(element)),
            Kind::FileField => TypedElement::FileField(FileField::new(element)),
            Kind::TextField => TypedElement::TextField(TextField::new(element)),
            Kind::Frame => TypedElement::Frame(Frame::from_element(element)),
            Kind::Generic => TypedElement::Generic(element),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("input", "submit"), Kind::Button);
        assert_eq!(classify("input", "checkbox"), Kind::CheckBox);
        assert_eq!(classify("input", "email"), Kind::TextField);
        assert_eq!(classify("input", ""), Kind::TextField);
        assert_eq!(classify("textarea", ""), Kind::TextField);
        assert_eq!(classify("iframe", ""), Kind::Frame);
        assert_eq!(classify("div", ""), Kind::Generic);
    }
}
