//! Per-frame decoding engine.
//!
//! A [`Dissector`] owns the conversation histories and drives one frame at a
//! time through IrLAP and whatever sits above it. Decoding never fails: every
//! problem ends up as a malformed item in the returned [`DecodedFrame`].

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conversation::{CircuitId, Conversations, FrameNumber};
use crate::protocols::common::error::DecodeError;
use crate::protocols::common::hex_string;
use crate::protocols::common::reader::FrameReader;
use crate::protocols::common::tree::{DetailLevel, Field, Output, SubtreeId};
use crate::protocols::iap::AttributeRegistry;
use crate::protocols::irlap;

/// IrLMP PDU classification, as seen by TTP and the applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PduKind {
    Connect,
    Disconnect,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsapPair {
    pub dlsap: u8,
    pub slsap: u8,
}

/// What the layers learned about the frame being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    pub number: FrameNumber,
    pub circuit: Option<CircuitId>,
    pub lsaps: Option<LsapPair>,
    pub pdu: Option<PduKind>,
}

impl FrameContext {
    pub fn new(number: FrameNumber) -> Self {
        Self {
            number,
            circuit: None,
            lsaps: None,
            pdu: None,
        }
    }

    /// Command frames carry the C/R bit.
    pub fn is_command(&self) -> bool {
        self.circuit.is_some_and(CircuitId::is_command)
    }
}

/// Everything a layer decoder can touch while decoding one frame.
pub struct Dissection<'s> {
    pub frame: FrameContext,
    pub out: Output,
    pub conversations: &'s mut Conversations,
    pub registry: &'static AttributeRegistry,
}

impl Dissection<'_> {
    pub fn circuit(&self) -> CircuitId {
        self.frame.circuit.unwrap_or(CircuitId(0))
    }

    /// Run `f` inside a subtree spanning whatever it consumes from `reader`.
    pub fn subtree<'a, R>(
        &mut self,
        reader: &mut FrameReader<'a>,
        label: impl Display,
        id: Option<SubtreeId>,
        f: impl FnOnce(&mut FrameReader<'a>, &mut Self) -> R,
    ) -> R {
        self.out.open_subtree(label, reader.offset(), id);
        let result = f(reader, self);
        self.out.close_subtree(reader.offset());
        result
    }

    /// Opaque-payload fallback for whatever is left in `reader`.
    pub fn opaque(&mut self, reader: &mut FrameReader<'_>, label: &str) {
        if reader.is_empty() {
            return;
        }
        let offset = reader.offset();
        let data = reader.read_rest();
        self.out.add(
            label,
            offset,
            data.len(),
            format_args!("{} byte{}: {}", data.len(), plural(data.len()), hex_string(data)),
        );
    }

    /// Mark the rest of `reader` malformed after `err`.
    pub fn fail(&mut self, reader: &mut FrameReader<'_>, err: &DecodeError) {
        let offset = reader.offset();
        let rest = reader.read_rest();
        debug!(frame = self.frame.number, %err, "malformed field");
        self.out.malformed(offset, rest.len(), err);
    }
}

pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Result of decoding one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    pub context: FrameContext,
    /// Highest protocol that claimed the frame.
    pub protocol: String,
    /// One-line summary.
    pub info: String,
    /// Field tree; empty at `DetailLevel::SummaryOnly`.
    pub fields: Vec<Field>,
    pub malformed: bool,
}

impl DecodedFrame {
    pub fn find(&self, label: &str) -> Option<&Field> {
        self.fields.iter().find_map(|field| field.find(label))
    }
}

/// The decoding engine: static attribute registry plus mutable histories.
#[derive(Debug, Clone)]
pub struct Dissector {
    registry: &'static AttributeRegistry,
    conversations: Conversations,
}

impl Default for Dissector {
    fn default() -> Self {
        Self::new()
    }
}

impl Dissector {
    pub fn new() -> Self {
        Self::with_conversations(Conversations::new())
    }

    /// Start from an existing history state.
    pub fn with_conversations(conversations: Conversations) -> Self {
        Self {
            registry: AttributeRegistry::standard(),
            conversations,
        }
    }

    pub fn conversations(&self) -> &Conversations {
        &self.conversations
    }

    pub fn registry(&self) -> &'static AttributeRegistry {
        self.registry
    }

    /// Full reload: forget every binding.
    pub fn reset(&mut self) {
        self.conversations.reset();
    }

    /// Decode one IrLAP frame (pseudo-header already stripped).
    pub fn decode(&mut self, number: FrameNumber, bytes: &[u8], detail: DetailLevel) -> DecodedFrame {
        let mut reader = FrameReader::new(bytes);
        let mut cx = Dissection {
            frame: FrameContext::new(number),
            out: Output::new(detail),
            conversations: &mut self.conversations,
            registry: self.registry,
        };
        irlap::dissect(&mut reader, &mut cx);

        let context = cx.frame;
        let (protocol, info, fields, malformed) = cx.out.into_parts(bytes.len());
        if malformed {
            debug!(frame = number, protocol, "frame decoded with malformed fields");
        }
        DecodedFrame {
            context,
            protocol: protocol.to_string(),
            info,
            fields,
            malformed,
        }
    }
}
