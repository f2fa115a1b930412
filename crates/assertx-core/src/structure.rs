//! Structural comparison of document trees.
//!
//! Compares tag names, optionally attribute names, and element children
//! position by position. Text and CDATA leaves carry no structure and are
//! ignored. A tag-name or child-count mismatch ends the whole comparison,
//! since positional comparison of children is meaningless after it; other
//! mismatches are reported and the walk continues.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

/// A child of a [`TreeNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(TreeNode),
    Text(String),
    CData(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&TreeNode> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) | Node::CData(_) => None,
        }
    }
}

/// An element: tag, ordered attributes, ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeNode {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl TreeNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add or replace an attribute, keeping first-seen order.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_cdata(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::CData(text.into()));
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Children with text and CDATA leaves stripped.
    pub fn element_children(&self) -> impl Iterator<Item = &TreeNode> {
        self.children.iter().filter_map(Node::as_element)
    }
}

/// What a structural mismatch is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    TagName,
    AttributeCount,
    MissingAttribute,
    ChildCount,
}

impl MismatchKind {
    /// Fatal mismatches end the comparison.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MismatchKind::TagName | MismatchKind::ChildCount)
    }
}

/// One detected difference, located by an XPath-like path
/// (`/root/item[2]`, positions counted from 1 among element siblings
/// with the same tag).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureMismatch {
    pub kind: MismatchKind,
    pub path: String,
    pub message: String,
}

/// Compare two trees and collect every mismatch; empty means equal.
pub fn equal_structure(
    expected: &TreeNode,
    actual: &TreeNode,
    check_attributes: bool,
) -> Vec<StructureMismatch> {
    let mut mismatches = Vec::new();
    equal_structure_with(expected, actual, check_attributes, |m| {
        mismatches.push(m.clone())
    });
    mismatches
}

/// Compare two trees, reporting each mismatch through `on_mismatch`.
/// Returns whether the trees are structurally equal.
pub fn equal_structure_with<F>(
    expected: &TreeNode,
    actual: &TreeNode,
    check_attributes: bool,
    mut on_mismatch: F,
) -> bool
where
    F: FnMut(&StructureMismatch),
{
    let mut equal = true;
    let mut report = |mismatch: StructureMismatch| {
        equal = false;
        on_mismatch(&mismatch);
        if mismatch.kind.is_fatal() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    };
    let path = format!("/{}", expected.tag);
    let _ = compare_nodes(expected, actual, check_attributes, &path, &mut report);
    equal
}

fn compare_nodes(
    expected: &TreeNode,
    actual: &TreeNode,
    check_attributes: bool,
    path: &str,
    report: &mut dyn FnMut(StructureMismatch) -> ControlFlow<()>,
) -> ControlFlow<()> {
    if expected.tag != actual.tag {
        report(StructureMismatch {
            kind: MismatchKind::TagName,
            path: path.to_string(),
            message: format!(
                "expected element <{}>, found <{}>",
                expected.tag, actual.tag
            ),
        })?;
    }

    if check_attributes {
        // Extra attributes on the actual side are tolerated.
        if actual.attributes.len() < expected.attributes.len() {
            report(StructureMismatch {
                kind: MismatchKind::AttributeCount,
                path: path.to_string(),
                message: format!(
                    "expected {} attribute(s), found {}",
                    expected.attributes.len(),
                    actual.attributes.len()
                ),
            })?;
        }
        for (name, _) in &expected.attributes {
            if actual.attribute(name).is_none() {
                report(StructureMismatch {
                    kind: MismatchKind::MissingAttribute,
                    path: path.to_string(),
                    message: format!("attribute \"{}\" not found", name),
                })?;
            }
        }
    }

    let expected_children: Vec<&TreeNode> = expected.element_children().collect();
    let actual_children: Vec<&TreeNode> = actual.element_children().collect();
    if expected_children.len() != actual_children.len() {
        report(StructureMismatch {
            kind: MismatchKind::ChildCount,
            path: path.to_string(),
            message: format!(
                "expected {} child element(s), found {}",
                expected_children.len(),
                actual_children.len()
            ),
        })?;
    }

    let mut positions: BTreeMap<&str, usize> = BTreeMap::new();
    for (e, a) in expected_children.iter().zip(&actual_children) {
        let position = positions.entry(e.tag.as_str()).or_insert(0);
        *position += 1;
        let child_path = format!("{}/{}[{}]", path, e.tag, position);
        compare_nodes(e, a, check_attributes, &child_path, report)?;
    }
    ControlFlow::Continue(())
}
