use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// How much output a decode call produces.
///
/// Both levels run the same byte-consumption code; `SummaryOnly` only skips
/// building the field tree, so offsets never diverge between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    SummaryOnly,
    #[default]
    Full,
}

/// Repeated structures whose entries get a stable subtree identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    NegotiationParameter,
    IrcommParameter,
    TtpParameter,
    IapAttribute,
}

/// Stable identifier of one list entry subtree: `(list kind, position)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubtreeId {
    pub kind: ListKind,
    pub index: u16,
}

impl SubtreeId {
    pub fn new(kind: ListKind, index: usize) -> Self {
        Self {
            kind,
            index: u16::try_from(index).unwrap_or(u16::MAX),
        }
    }
}

/// One decoded item in the field tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    pub offset: usize,
    pub len: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtree: Option<SubtreeId>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub malformed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Field>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Field {
    fn new(label: String, offset: usize, len: usize) -> Self {
        Self {
            label,
            offset,
            len,
            value: None,
            subtree: None,
            malformed: false,
            children: Vec::new(),
        }
    }

    /// Depth-first search for the first field with `label`.
    pub fn find(&self, label: &str) -> Option<&Field> {
        if self.label == label {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(label))
    }
}

/// Output sink for one frame: protocol/info columns plus the field tree.
#[derive(Debug)]
pub struct Output {
    detail: DetailLevel,
    protocol: &'static str,
    info: String,
    roots: Vec<Field>,
    open: Vec<Field>,
    malformed: bool,
}

impl Output {
    pub fn new(detail: DetailLevel) -> Self {
        Self {
            detail,
            protocol: "",
            info: String::new(),
            roots: Vec::new(),
            open: Vec::new(),
            malformed: false,
        }
    }

    pub fn detail(&self) -> DetailLevel {
        self.detail
    }

    fn is_full(&self) -> bool {
        self.detail == DetailLevel::Full
    }

    pub fn protocol(&self) -> &'static str {
        self.protocol
    }

    pub fn set_protocol(&mut self, protocol: &'static str) {
        self.protocol = protocol;
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn set_info(&mut self, info: impl Into<String>) {
        self.info = info.into();
    }

    pub fn append_info(&mut self, text: &str) {
        self.info.push_str(text);
    }

    pub fn has_malformed(&self) -> bool {
        self.malformed
    }

    /// Add a `label: value` item.
    pub fn add(&mut self, label: &str, offset: usize, len: usize, value: impl Display) {
        if !self.is_full() {
            return;
        }
        let mut field = Field::new(label.to_string(), offset, len);
        field.value = Some(value.to_string());
        self.push(field);
    }

    /// Add a text-only item.
    pub fn add_text(&mut self, text: impl Display, offset: usize, len: usize) {
        if !self.is_full() {
            return;
        }
        self.push(Field::new(text.to_string(), offset, len));
    }

    /// Record a malformed span. The frame-level flag is kept at every detail
    /// level.
    pub fn malformed(&mut self, offset: usize, len: usize, reason: impl Display) {
        self.malformed = true;
        if !self.is_full() {
            return;
        }
        let mut field = Field::new("Malformed".to_string(), offset, len);
        field.value = Some(reason.to_string());
        field.malformed = true;
        self.push(field);
    }

    pub(crate) fn open_subtree(
        &mut self,
        label: impl Display,
        offset: usize,
        subtree: Option<SubtreeId>,
    ) {
        if !self.is_full() {
            return;
        }
        let mut field = Field::new(label.to_string(), offset, 0);
        field.subtree = subtree;
        self.open.push(field);
    }

    pub(crate) fn close_subtree(&mut self, end: usize) {
        if !self.is_full() {
            return;
        }
        if let Some(mut field) = self.open.pop() {
            field.len = end.saturating_sub(field.offset);
            self.push(field);
        }
    }

    fn push(&mut self, field: Field) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(field),
            None => self.roots.push(field),
        }
    }

    /// Close any subtree left open and hand back the finished tree.
    pub fn into_parts(mut self, end: usize) -> (&'static str, String, Vec<Field>, bool) {
        while !self.open.is_empty() {
            self.close_subtree(end);
        }
        (self.protocol, self.info, self.roots, self.malformed)
    }
}
