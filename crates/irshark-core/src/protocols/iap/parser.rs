use crate::conversation::QueryBinding;
use crate::dissector::{Dissection, plural};
use crate::protocols::common::error::DecodeError;
use crate::protocols::common::reader::FrameReader;
use crate::protocols::common::tree::{ListKind, SubtreeId};
use crate::protocols::common::{hex_string, text_string, value_name};

use super::layout;
use super::registry::AttributeOutcome;

/// IAP control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IapControl {
    pub last: bool,
    pub ack: bool,
    pub opcode: u8,
}

impl IapControl {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            last: byte & layout::LST_BIT != 0,
            ack: byte & layout::ACK_BIT != 0,
            opcode: byte & layout::OPCODE_MASK,
        }
    }

    pub fn opcode_name(&self) -> &'static str {
        value_name(self.opcode, layout::OPCODES).unwrap_or("Unknown")
    }
}

/// Typed value of one attribute list entry.
#[derive(Debug, Clone)]
pub enum AttributeValue<'a> {
    Missing,
    Integer(u32),
    /// Narrowed reader over the sequence bytes.
    OctetSequence(FrameReader<'a>),
    UserString { charset: u8, text: &'a [u8] },
}

/// One entry of a GetValueByClass result.
#[derive(Debug, Clone)]
pub struct AttributeEntry<'a> {
    pub index: usize,
    pub object_id: u16,
    /// Span of the typed value, length prefixes included.
    pub offset: usize,
    pub len: usize,
    pub value: AttributeValue<'a>,
}

impl AttributeEntry<'_> {
    pub fn octets(&self) -> Option<&[u8]> {
        match &self.value {
            AttributeValue::OctetSequence(seq) => Some(seq.clone().read_rest()),
            _ => None,
        }
    }
}

/// Rendering of user-string text in its declared character set.
pub fn string_text(charset: u8, text: &[u8]) -> String {
    if charset == layout::CHARSET_UNICODE {
        let units: Vec<u16> = text
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    text_string(text)
}

fn dissect_control(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
) -> Result<IapControl, DecodeError> {
    let offset = reader.offset();
    let control = IapControl::from_byte(reader.read_u8()?);
    cx.out.add("Last Frame", offset, 1, control.last);
    cx.out.add("Ack", offset, 1, control.ack);
    cx.out.add(
        "Opcode",
        offset,
        1,
        format_args!("{} (0x{:02x})", control.opcode_name(), control.opcode),
    );
    Ok(control)
}

/// IAS query sent to LSAP 0x00.
pub fn dissect_request(reader: &mut FrameReader<'_>, cx: &mut Dissection<'_>) {
    cx.out.set_protocol("IAP");
    cx.subtree(reader, "IAP Query", None, |reader, cx| {
        if let Err(err) = dissect_request_body(reader, cx) {
            if cx.out.info().is_empty() {
                cx.out.set_info("Malformed IAP query");
            }
            cx.fail(reader, &err);
        }
    });
}

fn dissect_request_body(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
) -> Result<(), DecodeError> {
    let control = dissect_control(reader, cx)?;
    cx.out.set_info(control.opcode_name());
    if control.ack {
        cx.out.append_info(" (Ack)");
        cx.opaque(reader, "Data");
        return Ok(());
    }
    if control.opcode != layout::GET_VALUE_BY_CLASS {
        cx.opaque(reader, "Data");
        return Ok(());
    }

    let class_name = dissect_name(reader, cx, "Class Name", "class name")?;
    let attribute_name = dissect_name(reader, cx, "Attribute Name", "attribute name")?;
    cx.out
        .set_info(format!("GetValueByClass: \"{class_name}\" \"{attribute_name}\""));

    let decoder = cx.registry.lookup(&class_name, &attribute_name);
    let circuit = cx.circuit();
    cx.conversations.record_query(
        circuit,
        QueryBinding {
            query_frame: cx.frame.number,
            class_name,
            attribute_name,
            decoder,
        },
    );
    cx.opaque(reader, "Trailing Data");
    Ok(())
}

/// Length-prefixed name, at most `MAX_NAME_LEN` bytes of it taken.
fn dissect_name(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
    label: &str,
    field: &'static str,
) -> Result<String, DecodeError> {
    let offset = reader.offset();
    let declared = reader.read_u8()?;
    let len = usize::from(declared).min(layout::MAX_NAME_LEN);
    let bytes = reader.read_declared(field, len)?;
    let name = text_string(bytes);
    cx.out.add(label, offset, 1 + len, &name);
    Ok(name)
}

/// IAS result sent from LSAP 0x00.
pub fn dissect_result(reader: &mut FrameReader<'_>, cx: &mut Dissection<'_>) {
    cx.out.set_protocol("IAP");
    cx.subtree(reader, "IAP Result", None, |reader, cx| {
        if let Err(err) = dissect_result_body(reader, cx) {
            if cx.out.info().is_empty() {
                cx.out.set_info("Malformed IAP result");
            }
            cx.fail(reader, &err);
        }
    });
}

fn dissect_result_body(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
) -> Result<(), DecodeError> {
    let control = dissect_control(reader, cx)?;
    cx.out.set_info(control.opcode_name());
    if control.ack {
        cx.out.append_info(" (Ack)");
        cx.opaque(reader, "Data");
        return Ok(());
    }

    let offset = reader.offset();
    let code = reader.read_u8()?;
    let code_name = value_name(code, layout::RETURN_CODES).unwrap_or("Unknown");
    cx.out
        .add("Return Code", offset, 1, format_args!("{code_name} ({code})"));
    cx.out.append_info(&format!(": {code_name}"));
    if code != layout::RETURN_SUCCESS || control.opcode != layout::GET_VALUE_BY_CLASS {
        cx.opaque(reader, "Data");
        return Ok(());
    }

    let offset = reader.offset();
    let count = usize::from(reader.read_u16_be()?);
    cx.out.add("List Length", offset, 2, count);
    cx.out
        .append_info(&format!(", {count} entr{}", if count == 1 { "y" } else { "ies" }));

    let decoder = cx
        .conversations
        .query_for_result(cx.circuit(), cx.frame.number)
        .and_then(|binding| binding.decoder);

    let mut decoded = 0;
    while decoded < count {
        if reader.is_empty() {
            let missing = count - decoded;
            cx.out.malformed(
                reader.offset(),
                0,
                format_args!("{missing} declared entr{} missing", if missing == 1 { "y" } else { "ies" }),
            );
            break;
        }
        let id = SubtreeId::new(ListKind::IapAttribute, decoded);
        let complete = cx.subtree(reader, format_args!("Attribute {}", decoded + 1), Some(id), |reader, cx| {
            match read_entry(reader, cx, decoded) {
                Ok(Some(entry)) => {
                    let outcome = match decoder {
                        Some(decoder) => decoder.decode(&entry, cx),
                        None => AttributeOutcome::Declined,
                    };
                    if outcome == AttributeOutcome::Declined {
                        render_generic(&entry, cx);
                    }
                    true
                }
                Ok(None) => {
                    cx.opaque(reader, "Data");
                    false
                }
                Err(err) => {
                    cx.fail(reader, &err);
                    false
                }
            }
        });
        if !complete {
            break;
        }
        decoded += 1;
    }
    cx.opaque(reader, "Trailing Data");
    Ok(())
}

/// Read one entry. `Ok(None)` means an unknown attribute type: the value
/// size is unknowable, so enumeration cannot continue.
fn read_entry<'a>(
    reader: &mut FrameReader<'a>,
    cx: &mut Dissection<'_>,
    index: usize,
) -> Result<Option<AttributeEntry<'a>>, DecodeError> {
    let offset = reader.offset();
    let object_id = reader.read_u16_be()?;
    cx.out
        .add("Object Identifier", offset, 2, format_args!("0x{object_id:04x}"));
    let offset = reader.offset();
    let kind = reader.read_u8()?;
    let kind_name = value_name(kind, layout::ATTRIBUTE_TYPES).unwrap_or("Unknown");
    cx.out
        .add("Attribute Type", offset, 1, format_args!("{kind_name} ({kind})"));

    let offset = reader.offset();
    let value = match kind {
        layout::TYPE_MISSING => AttributeValue::Missing,
        layout::TYPE_INTEGER => AttributeValue::Integer(reader.read_u32_be()?),
        layout::TYPE_OCTET_SEQUENCE => {
            let len = usize::from(reader.read_u16_be()?);
            AttributeValue::OctetSequence(reader.sub_reader("octet sequence", len)?)
        }
        layout::TYPE_USER_STRING => {
            let charset = reader.read_u8()?;
            let len = usize::from(reader.read_u8()?);
            let text = reader.read_declared("user string", len)?;
            AttributeValue::UserString { charset, text }
        }
        _ => return Ok(None),
    };
    Ok(Some(AttributeEntry {
        index,
        object_id,
        offset,
        len: reader.offset() - offset,
        value,
    }))
}

/// Type-appropriate rendering when no decoder claims the entry.
pub fn render_generic(entry: &AttributeEntry<'_>, cx: &mut Dissection<'_>) {
    let offset = entry.offset;
    match &entry.value {
        AttributeValue::Missing => cx.out.add_text("Missing Value", offset, 0),
        AttributeValue::Integer(value) => cx.out.add("Integer", offset, 4, value),
        AttributeValue::OctetSequence(seq) => {
            let bytes = seq.clone().read_rest();
            cx.out.add("Octet Sequence Length", offset, 2, bytes.len());
            cx.out.add(
                "Octet Sequence",
                seq.offset(),
                bytes.len(),
                format_args!("{} byte{}: {}", bytes.len(), plural(bytes.len()), hex_string(bytes)),
            );
        }
        AttributeValue::UserString { charset, text } => {
            cx.out
                .add("Character Set", offset, 1, format_args!("0x{charset:02x}"));
            cx.out.add("String Length", offset + 1, 1, text.len());
            cx.out.add("String", offset + 2, text.len(), string_text(*charset, text));
        }
    }
}
