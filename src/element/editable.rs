//! Typed element wrappers for form controls

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::proxy::Element;
use crate::remote::ElementAction;
use crate::wait::Interaction;
use crate::Result;

macro_rules! element_wrapper {
    ($name:ident) => {
        #[derive(Debug, Clone)]
        pub struct $name(Arc<Element>);

        impl $name {
            pub fn new(element: Arc<Element>) -> Self {
                Self(element)
            }

            /// Underlying proxy
            pub fn element(&self) -> &Arc<Element> {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = Element;

            fn deref(&self) -> &Element {
                &self.0
            }
        }
    };
}

element_wrapper!(TextField);
element_wrapper!(CheckBox);
element_wrapper!(Radio);
element_wrapper!(FileField);

impl TextField {
    /// Clear the field, then type `value`
    pub async fn set(&self, value: &str) -> Result<()> {
        self.clear().await?;
        self.0.send_keys([value]).await
    }

    /// Type `value` after the current content
    pub async fn append(&self, value: &str) -> Result<()> {
        self.0.send_keys([value]).await
    }

    pub async fn clear(&self) -> Result<()> {
        let ready = self.0.wait_for(Interaction::Writable).await?;
        info!("Clearing text field: {}", self.0.selector());
        self.0
            .dispatch(ready, |driver, handle| async move {
                driver.perform_action(&handle, &ElementAction::Clear).await
            })
            .await
    }
}

async fn is_checked(element: &Element) -> Result<bool> {
    Ok(element.attribute("checked").await?.as_bool().unwrap_or(false))
}

impl CheckBox {
    pub async fn is_set(&self) -> Result<bool> {
        is_checked(&self.0).await
    }

    /// Check or uncheck; clicks only when the state differs
    pub async fn set(&self, value: bool) -> Result<()> {
        self.0.wait_for(Interaction::Enabled).await?;
        if self.is_set().await? != value {
            self.0.click(&[]).await?;
        }
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.set(false).await
    }
}

impl Radio {
    pub async fn is_set(&self) -> Result<bool> {
        is_checked(&self.0).await
    }

    /// Select the radio button unless it already is
    pub async fn set(&self) -> Result<()> {
        self.0.wait_for(Interaction::Enabled).await?;
        if !self.is_set().await? {
            self.0.click(&[]).await?;
        }
        Ok(())
    }
}

impl FileField {
    /// Type the absolute path of an existing file into the field
    pub async fn set(&self, path: &Path) -> Result<()> {
        let path = std::fs::canonicalize(path)?;
        self.0.send_keys([path.to_string_lossy().into_owned()]).await
    }
}
