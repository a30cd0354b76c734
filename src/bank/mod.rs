//! Decoded key templates shared across classification passes.
//!
//! A bank is built once from decoded images and is read-only afterwards, so a
//! single bank can be shared by reference across threads for a whole
//! classification sweep.

mod pairs;

pub use pairs::{pair_templates, TemplatePairing};

use crate::image::Image;
use crate::util::{TintMatchError, TintMatchResult};

/// A named key template used for classification.
#[derive(Clone, Debug)]
pub struct KeyTemplate {
    name: String,
    image: Image,
}

impl KeyTemplate {
    /// Returns the template name (its file name under `keys/`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the decoded template image.
    pub fn image(&self) -> &Image {
        &self.image
    }
}

/// Immutable ordered set of key templates.
#[derive(Clone, Debug, Default)]
pub struct TemplateBank {
    templates: Vec<KeyTemplate>,
}

impl TemplateBank {
    /// Builds a bank from `(name, image)` pairs, keeping their order.
    ///
    /// Order matters: on equal scores the earlier template wins.
    pub fn new<I, S>(templates: I) -> TintMatchResult<Self>
    where
        I: IntoIterator<Item = (S, Image)>,
        S: Into<String>,
    {
        let mut out: Vec<KeyTemplate> = Vec::new();
        for (name, image) in templates {
            let name = name.into();
            if name.is_empty() {
                return Err(TintMatchError::InvalidInput("template name must not be empty"));
            }
            if out.iter().any(|t| t.name == name) {
                return Err(TintMatchError::InvalidInput("duplicate template name"));
            }
            out.push(KeyTemplate { name, image });
        }
        Ok(Self { templates: out })
    }

    /// Returns the number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true when the bank holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterates templates in bank order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyTemplate> {
        self.templates.iter()
    }

    /// Looks up a template by name.
    pub fn get(&self, name: &str) -> Option<&KeyTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Returns template names in bank order.
    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }
}
