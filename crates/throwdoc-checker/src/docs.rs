//! Exception-related tags of XML documentation.
//!
//! Only two tags matter:
//!
//! ```xml
//! <exception cref="T:N.IoError" accessor="get">...</exception>
//! <inheritdoc cref="M:N.Base.Run"/>
//! ```
//!
//! Everything else in the documentation is ignored. Malformed text is
//! treated as documentation without tags.

use rustc_hash::FxHashMap;
use tracing::debug;

/// `<exception cref=".." accessor="..">`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExceptionTag {
    pub cref: String,
    /// Raw accessor text; interpreted by the resolver.
    pub accessor: Option<String>,
}

/// Tags extracted from one declaration's documentation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocTags {
    pub exceptions: Vec<ExceptionTag>,
    /// One entry per `<inheritdoc>`; `None` inherits from the overridden and
    /// implemented declarations.
    pub inherit: Vec<Option<String>>,
}

impl DocTags {
    pub fn is_empty(&self) -> bool {
        self.exceptions.is_empty() && self.inherit.is_empty()
    }

    fn collect(node: roxmltree::Node<'_, '_>) -> Self {
        let mut tags = Self::default();
        for child in node.descendants().filter(roxmltree::Node::is_element) {
            match child.tag_name().name() {
                "exception" => {
                    if let Some(cref) = child.attribute("cref") {
                        tags.exceptions.push(ExceptionTag {
                            cref: cref.to_string(),
                            accessor: child.attribute("accessor").map(str::to_string),
                        });
                    }
                }
                "inheritdoc" => tags.inherit.push(child.attribute("cref").map(str::to_string)),
                _ => {}
            }
        }
        tags
    }
}

/// Parse a documentation fragment as attached to a declaration.
///
/// The fragment has no single root (`<summary/><exception/>`), so it is
/// wrapped before parsing.
pub fn parse_fragment(text: &str) -> DocTags {
    if text.trim().is_empty() {
        return DocTags::default();
    }
    let wrapped = format!("<doc>{text}</doc>");
    match roxmltree::Document::parse(&wrapped) {
        Ok(document) => DocTags::collect(document.root_element()),
        Err(error) => {
            debug!(%error, "documentation fragment is not well-formed");
            DocTags::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocFileError {
    #[error("malformed documentation file: {0}")]
    Malformed(#[from] roxmltree::Error),
}

/// Per-member tags of an external module's side documentation file.
#[derive(Debug, Default)]
pub struct ModuleDocs {
    members: FxHashMap<String, DocTags>,
}

impl ModuleDocs {
    /// Tags of one member, if the file documents it.
    pub fn member(&self, doc_id: &str) -> Option<&DocTags> {
        self.members.get(doc_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Parse `<doc><members><member name="ID">..</member></members></doc>`.
    ///
    /// Some shipped files wrap members in a legacy root and contain HTML
    /// inline markup that is not well-formed XML. When the first parse fails
    /// and such markup is present, `br`, `p` and `span` tags are stripped and
    /// the parse is retried once.
    pub fn parse(xml: &str) -> Result<Self, DocFileError> {
        match Self::parse_strict(xml) {
            Ok(docs) => Ok(docs),
            Err(error) if has_inline_markup(xml) => {
                debug!(%error, "retrying documentation file without inline markup");
                Self::parse_strict(&strip_inline_markup(xml))
            }
            Err(error) => Err(error),
        }
    }

    fn parse_strict(xml: &str) -> Result<Self, DocFileError> {
        let document = roxmltree::Document::parse(xml)?;
        let members = document
            .descendants()
            .filter(|node| node.has_tag_name("member"))
            .filter_map(|node| {
                let name = node.attribute("name")?;
                Some((name.to_string(), DocTags::collect(node)))
            })
            .collect();
        Ok(Self { members })
    }
}

const INLINE_MARKUP_TAGS: [&str; 3] = ["br", "p", "span"];

fn has_inline_markup(xml: &str) -> bool {
    let mut rest = xml;
    while let Some(open) = rest.find('<') {
        rest = &rest[open..];
        if markup_tag_len(rest).is_some() {
            return true;
        }
        rest = &rest[1..];
    }
    false
}

/// Length of a `br`/`p`/`span` open, close or self-closing tag at the start
/// of `text`.
fn markup_tag_len(text: &str) -> Option<usize> {
    let inner = text.strip_prefix('<')?;
    let inner = inner.strip_prefix('/').unwrap_or(inner);
    let name_len = inner
        .bytes()
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    let name = &inner[..name_len];
    if !INLINE_MARKUP_TAGS
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(name))
    {
        return None;
    }
    match inner.as_bytes().get(name_len) {
        Some(b'>' | b'/' | b' ' | b'\t' | b'\r' | b'\n') => {}
        _ => return None,
    }
    let close = text.find('>')?;
    Some(close + 1)
}

/// Remove every `br`, `p` and `span` tag, keeping their text content.
pub fn strip_inline_markup(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        rest = &rest[open..];
        match markup_tag_len(rest) {
            Some(len) => rest = &rest[len..],
            None => {
                out.push('<');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "tests/docs_tests.rs"]
mod tests;
