//! Sanity checks for generated DMN documents.
//!
//! [`Document::parse`] is a small well-formedness parser (elements,
//! attributes, character data, comments, entity references). [`validate`]
//! runs it and then checks the DMN structure the builder is expected to
//! produce. Neither is a schema validator.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;
use winnow::combinator::{alt, cut_err, delimited, opt, repeat};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{take_until, take_while};

use crate::build::DMN_MODEL_NS;
use crate::xml::unescape_entity;

/// A document that is not well-formed XML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed XML: {message}")]
pub struct XmlError {
    message: String,
}

/// One element with its attributes, direct character data and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unescaped value of the attribute `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Unescaped character data directly inside this element, trimmed.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Direct children named `name`.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.push(self);
        for child in &self.children {
            child.collect(out);
        }
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// # Errors
    ///
    /// Returns [`XmlError`] if `xml` is not a single well-formed element,
    /// optionally surrounded by a declaration, comments and whitespace.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        document
            .parse(xml)
            .map(|root| Document { root })
            .map_err(|e| XmlError {
                message: e.to_string(),
            })
    }

    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Every element in document order, root first.
    #[must_use]
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.root.collect(&mut out);
        out
    }

    /// Every element named `name`, in document order.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<&Element> {
        self.elements()
            .into_iter()
            .filter(|e| e.name == name)
            .collect()
    }
}

// -- Grammar ----------------------------------------------------------------

enum Content {
    Text(String),
    Child(Element),
    Skip,
}

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

fn ws1(input: &mut &str) -> ModalResult<()> {
    take_while(1.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

fn name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1, |c: char| c.is_alphabetic() || c == '_' || c == ':'),
        take_while(0.., |c: char| {
            c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.')
        }),
    )
        .take()
        .parse_next(input)
}

fn comment(input: &mut &str) -> ModalResult<()> {
    ("<!--", cut_err((take_until(0.., "-->"), "-->")))
        .void()
        .parse_next(input)
}

fn processing_instruction(input: &mut &str) -> ModalResult<()> {
    ("<?", cut_err((take_until(0.., "?>"), "?>")))
        .void()
        .parse_next(input)
}

fn misc(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(0.., alt((ws1, comment, processing_instruction))).parse_next(input)?;
    Ok(())
}

/// Replace entity references in `raw`; `None` on an unknown or unterminated one.
fn decode(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        let after = &rest[at + 1..];
        let end = after.find(';')?;
        out.push(unescape_entity(&after[..end])?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}

fn decoded(input: &mut &str, raw: &str) -> ModalResult<String> {
    decode(raw).ok_or_else(|| ErrMode::from_input(input).cut())
}

fn char_data(input: &mut &str) -> ModalResult<String> {
    let raw = take_while(1.., |c: char| c != '<').parse_next(input)?;
    decoded(input, raw)
}

fn attribute_value(input: &mut &str) -> ModalResult<String> {
    let raw = alt((
        delimited('"', take_while(0.., |c: char| c != '"' && c != '<'), '"'),
        delimited('\'', take_while(0.., |c: char| c != '\'' && c != '<'), '\''),
    ))
    .parse_next(input)?;
    decoded(input, raw)
}

fn attribute(input: &mut &str) -> ModalResult<(String, String)> {
    ws1.parse_next(input)?;
    let key = name.parse_next(input)?;
    ws.parse_next(input)?;
    cut_err('=')
        .context(StrContext::Expected(StrContextValue::CharLiteral('=')))
        .parse_next(input)?;
    ws.parse_next(input)?;
    let value = cut_err(attribute_value)
        .context(StrContext::Expected(StrContextValue::Description(
            "quoted attribute value",
        )))
        .parse_next(input)?;
    Ok((key.to_owned(), value))
}

fn content(input: &mut &str) -> ModalResult<Content> {
    alt((
        comment.map(|()| Content::Skip),
        element.map(Content::Child),
        char_data
            .context(StrContext::Label("character data"))
            .map(Content::Text),
    ))
    .parse_next(input)
}

fn element(input: &mut &str) -> ModalResult<Element> {
    '<'.parse_next(input)?;
    let tag = name.parse_next(input)?;
    let attributes: Vec<(String, String)> = repeat(0.., attribute).parse_next(input)?;
    ws.parse_next(input)?;

    let mut element = Element {
        name: tag.to_owned(),
        attributes,
        text: String::new(),
        children: Vec::new(),
    };

    if opt("/>").parse_next(input)?.is_some() {
        return Ok(element);
    }
    cut_err('>')
        .context(StrContext::Expected(StrContextValue::CharLiteral('>')))
        .parse_next(input)?;

    let parts: Vec<Content> = repeat(0.., content).parse_next(input)?;
    for part in parts {
        match part {
            Content::Text(text) => element.text.push_str(&text),
            Content::Child(child) => element.children.push(child),
            Content::Skip => {}
        }
    }

    cut_err("</")
        .context(StrContext::Expected(StrContextValue::StringLiteral("</")))
        .parse_next(input)?;
    cut_err(name.verify(|end: &str| end == tag))
        .context(StrContext::Label("matching end tag"))
        .parse_next(input)?;
    ws.parse_next(input)?;
    cut_err('>')
        .context(StrContext::Expected(StrContextValue::CharLiteral('>')))
        .parse_next(input)?;

    Ok(element)
}

fn document(input: &mut &str) -> ModalResult<Element> {
    misc.parse_next(input)?;
    let root = cut_err(element)
        .context(StrContext::Label("root element"))
        .parse_next(input)?;
    misc.parse_next(input)?;
    Ok(root)
}

// -- Validation -------------------------------------------------------------

/// Problems found in a generated document.
///
/// Errors make the document unusable; warnings flag things a consumer may
/// still cope with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct ValidationReport {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationReport {
    /// True when no errors were found. Warnings do not count.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(crate) fn into_errors(self) -> Vec<String> {
        self.errors
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_valid() { "valid" } else { "invalid" };
        writeln!(
            f,
            "{status} ({} errors, {} warnings)",
            self.errors.len(),
            self.warnings.len()
        )?;
        for e in &self.errors {
            writeln!(f, "  error: {e}")?;
        }
        for w in &self.warnings {
            writeln!(f, "  warning: {w}")?;
        }
        Ok(())
    }
}

/// Check that `xml` is well-formed and shaped like a DMN decision table.
pub fn validate(xml: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    if xml.trim().is_empty() {
        report.error("document is empty");
        return report;
    }
    if !xml.trim_start().starts_with("<?xml") {
        report.warning("missing XML declaration");
    }

    let doc = match Document::parse(xml) {
        Ok(doc) => doc,
        Err(e) => {
            report.error(e.to_string());
            return report;
        }
    };

    check_structure(&doc, &mut report);
    check_ids(&doc, &mut report);
    report
}

fn check_structure(doc: &Document, report: &mut ValidationReport) {
    let root = doc.root();
    if root.name() != "definitions" {
        report.error(format!(
            "root element is <{}>, expected <definitions>",
            root.name()
        ));
    }
    if !root
        .attribute("xmlns")
        .is_some_and(|ns| ns.starts_with("https://www.omg.org/spec/DMN"))
    {
        report.warning(format!("missing OMG DMN namespace {DMN_MODEL_NS}"));
    }

    if doc.find_all("decision").is_empty() {
        report.error("missing <decision> element");
    }
    let tables = doc.find_all("decisionTable");
    if tables.is_empty() {
        report.error("missing <decisionTable> element");
    }

    for table in tables {
        let table_id = table.attribute("id").unwrap_or("?");
        if table.attribute("hitPolicy").is_none() {
            report.warning(format!("decision table '{table_id}' has no hitPolicy"));
        }
        let inputs = table.children_named("input").count();
        let outputs = table.children_named("output").count();
        for rule in table.children_named("rule") {
            let rule_id = rule.attribute("id").unwrap_or("?");
            let input_entries = rule.children_named("inputEntry").count();
            let output_entries = rule.children_named("outputEntry").count();
            if input_entries != inputs {
                report.error(format!(
                    "rule '{rule_id}' has {input_entries} input entries for {inputs} inputs"
                ));
            }
            if output_entries != outputs {
                report.error(format!(
                    "rule '{rule_id}' has {output_entries} output entries for {outputs} outputs"
                ));
            }
        }
    }
}

/// Duplicate ids are warnings: a decision id may legitimately match a
/// generated column id such as `input_age`.
fn check_ids(doc: &Document, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for id in doc.elements().into_iter().filter_map(|e| e.attribute("id")) {
        if !seen.insert(id) {
            report.warning(format!("duplicate id '{id}'"));
        }
    }
}
