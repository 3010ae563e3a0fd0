//! Containing capability
//!
//! Anything that can act as a [`Parent`] hands out child proxies.

use std::sync::Arc;

use super::collection::ElementCollection;
use super::frame::Frame;
use super::parent::Parent;
use super::root::Session;
use crate::element::{CheckBox, Element, FileField, Radio, Selector, TextField};

/// Creates child proxies; none of these make a remote call
pub trait Container {
    fn as_parent(&self) -> Parent;

    fn element(&self, selector: Selector) -> Arc<Element> {
        Element::new(self.as_parent(), selector)
    }

    fn elements(&self, selector: Selector) -> ElementCollection {
        ElementCollection::new(self.as_parent(), selector)
    }

    fn frame(&self, selector: Selector) -> Frame {
        Frame::new(self.as_parent(), selector)
    }

    fn button(&self, selector: Selector) -> Arc<Element> {
        self.element(selector)
    }

    fn text_field(&self, selector: Selector) -> TextField {
        TextField::new(self.element(selector))
    }

    fn checkbox(&self, selector: Selector) -> CheckBox {
        CheckBox::new(self.element(selector))
    }

    fn radio(&self, selector: Selector) -> Radio {
        Radio::new(self.element(selector))
    }

    fn file_field(&self, selector: Selector) -> FileField {
        FileField::new(self.element(selector))
    }
}

impl Container for Session {
    fn as_parent(&self) -> Parent {
        Parent::Session(self.clone())
    }
}

impl Container for Arc<Element> {
    fn as_parent(&self) -> Parent {
        Parent::Element(self.clone())
    }
}

impl Container for Frame {
    fn as_parent(&self) -> Parent {
        Parent::Frame(self.clone())
    }
}
