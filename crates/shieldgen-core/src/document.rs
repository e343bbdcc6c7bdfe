//! Generic structured-document reader for project descriptors.
//!
//! The rest of the crate only needs "elements by tag, attributes by name",
//! so the XML tree is flattened into owned records right after parsing.

use std::path::Path;

use shieldgen_error::{Error, Result};

use crate::paths::read_text;

/// One element of a parsed document, addressed by its local tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// Trimmed text of the element's first text child, if any.
    pub text: Option<String>,
    pub attributes: Vec<(String, String)>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A parsed descriptor document: all elements in document order.
#[derive(Debug, Clone, Default)]
pub struct DescriptorDocument {
    elements: Vec<Element>,
}

impl DescriptorDocument {
    /// Parse document text. Namespaces are ignored; tags match on local name.
    pub fn parse(text: &str) -> std::result::Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(text)?;
        let elements = doc
            .descendants()
            .filter(|node| node.is_element())
            .map(|node| Element {
                tag: node.tag_name().name().to_string(),
                text: node
                    .text()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
                attributes: node
                    .attributes()
                    .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                    .collect(),
            })
            .collect();
        Ok(Self { elements })
    }

    /// Read and parse the document at `path`.
    ///
    /// Read failures keep their I/O kind; parse failures become `MalformedDescriptor`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path).map_err(|e| e.with_operation("document::load"))?;
        Self::parse(&text).map_err(|err| {
            Error::malformed_descriptor(path, err.to_string())
                .with_operation("document::load")
                .set_source(err)
        })
    }

    /// Elements with the given local tag name, in document order.
    pub fn elements_by_tag<'a>(&'a self, tag: &str) -> impl Iterator<Item = &'a Element> {
        self.elements.iter().filter(move |el| el.tag == tag)
    }

    /// Text of the first element named `tag` that carries non-empty text.
    pub fn first_text(&self, tag: &str) -> Option<&str> {
        self.elements_by_tag(tag).find_map(|el| el.text.as_deref())
    }

    /// Value of `attr` on every element named `tag` that declares it.
    pub fn attribute_values<'a>(&'a self, tag: &str, attr: &str) -> Vec<&'a str> {
        self.elements_by_tag(tag)
            .filter_map(|el| el.attribute(attr))
            .collect()
    }
}
