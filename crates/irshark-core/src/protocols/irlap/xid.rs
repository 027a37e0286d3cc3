//! XID discovery frames.

use crate::dissector::Dissection;
use crate::protocols::common::error::DecodeError;
use crate::protocols::common::reader::FrameReader;
use crate::protocols::common::{bit_names, text_string};

use super::layout;

/// Names for the service hint bytes, in catalog order.
pub fn service_hint_names(hints: &[u8]) -> Option<String> {
    let first = hints.first().and_then(|b| bit_names(u32::from(*b), layout::HINTS_FIRST));
    let second = hints.get(1).and_then(|b| bit_names(u32::from(*b), layout::HINTS_SECOND));
    match (first, second) {
        (Some(a), Some(b)) => Some(format!("{a}, {b}")),
        (a, b) => a.or(b),
    }
}

fn charset_name(charset: u8) -> String {
    match charset {
        layout::CHARSET_ASCII => "ASCII".to_string(),
        0x01..=0x09 => format!("ISO 8859-{charset}"),
        layout::CHARSET_UNICODE => "Unicode".to_string(),
        other => format!("Unknown (0x{other:02x})"),
    }
}

pub fn dissect(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
) -> Result<(), DecodeError> {
    cx.subtree(reader, "XID", None, dissect_body)
}

fn dissect_body(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
) -> Result<(), DecodeError> {
    let command = cx.frame.is_command();

    let offset = reader.offset();
    let format = reader.read_u8()?;
    let format_name = if format == layout::XID_FORMAT_DISCOVERY {
        "Discovery"
    } else {
        "Unknown"
    };
    cx.out.add(
        "Format Identifier",
        offset,
        1,
        format_args!("0x{format:02x} ({format_name})"),
    );

    let offset = reader.offset();
    let source = reader.read_u32_le()?;
    cx.out.add("Source Device Address", offset, 4, format_args!("0x{source:08x}"));
    let offset = reader.offset();
    let destination = reader.read_u32_le()?;
    cx.out.add(
        "Destination Device Address",
        offset,
        4,
        format_args!("0x{destination:08x}"),
    );
    cx.out.set_info(format!(
        "XID {}, S=0x{source:08x}, D=0x{destination:08x}",
        if command { "cmd" } else { "rsp" }
    ));

    let offset = reader.offset();
    let flags = reader.read_u8()?;
    let slots = layout::XID_SLOT_COUNTS[usize::from(flags & layout::XID_SLOTS_MASK)];
    let conflict = flags & layout::XID_CONFLICT != 0;
    cx.out.add("Discovery Flags", offset, 1, format_args!("0x{flags:02x}"));
    cx.out.add("Number of Slots", offset, 1, slots);
    cx.out.add("Conflict", offset, 1, conflict);

    if command {
        let offset = reader.offset();
        let slot = reader.read_u8()?;
        if slot == layout::XID_FINAL_SLOT {
            cx.out.add("Slot Number", offset, 1, "Final (0xff)");
        } else {
            cx.out.add("Slot Number", offset, 1, slot);
        }
    }

    let offset = reader.offset();
    let version = reader.read_u8()?;
    cx.out.add("Version Number", offset, 1, format_args!("0x{version:02x}"));

    if !reader.is_empty() {
        dissect_discovery_info(reader, cx)?;
    }
    Ok(())
}

fn dissect_discovery_info(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
) -> Result<(), DecodeError> {
    let offset = reader.offset();
    let mut hints = Vec::new();
    loop {
        let hint = reader.read_u8()?;
        hints.push(hint);
        if hint & layout::HINT_EXTENSION == 0 {
            break;
        }
    }
    let names = service_hint_names(&hints).unwrap_or_else(|| "None".to_string());
    cx.out.add(
        "Service Hints",
        offset,
        hints.len(),
        format_args!("{} ({names})", crate::protocols::common::hex_string(&hints)),
    );

    if reader.is_empty() {
        return Ok(());
    }
    let offset = reader.offset();
    let charset = reader.read_u8()?;
    cx.out.add("Character Set", offset, 1, charset_name(charset));

    if charset == layout::CHARSET_ASCII {
        let offset = reader.offset();
        let nickname = text_string(reader.read_rest());
        cx.out.add("Device Nickname", offset, reader.offset() - offset, &nickname);
        cx.out.append_info(&format!(", \"{nickname}\""));
    } else {
        cx.opaque(reader, "Unsupported Character Set Data");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::service_hint_names;
    use crate::dissector::Dissector;
    use crate::protocols::common::tree::DetailLevel;

    fn xid(address: u8, control: u8, tail: &[u8]) -> Vec<u8> {
        let mut bytes = vec![address, control, 0x01];
        bytes.extend_from_slice(&0x1234_5678u32.to_le_bytes());
        bytes.extend_from_slice(&0xffff_ffffu32.to_le_bytes());
        bytes.extend_from_slice(tail);
        bytes
    }

    #[test]
    fn hint_catalog_spans_two_bytes() {
        assert_eq!(
            service_hint_names(&[0x84, 0x24]).as_deref(),
            Some("Computer, IrCOMM, OBEX")
        );
        assert_eq!(service_hint_names(&[0x80, 0x00]), None);
    }

    #[test]
    fn command_carries_slot_number() {
        let bytes = xid(0xff, 0x3f, &[0x01, 0xff, 0x00]);
        let frame = Dissector::new().decode(1, &bytes, DetailLevel::Full);
        assert!(!frame.malformed);
        assert_eq!(frame.info, "XID cmd, S=0x12345678, D=0xffffffff");
        assert_eq!(frame.find("Number of Slots").unwrap().value.as_deref(), Some("6"));
        assert_eq!(
            frame.find("Slot Number").unwrap().value.as_deref(),
            Some("Final (0xff)")
        );
    }

    #[test]
    fn response_with_hints_and_nickname() {
        let mut tail = vec![0x06, 0x00, 0x84, 0x04, 0x00];
        tail.extend_from_slice(b"Palm");
        let bytes = xid(0xfe, 0xbf, &tail);
        let frame = Dissector::new().decode(2, &bytes, DetailLevel::Full);
        assert!(!frame.malformed);
        assert!(frame.find("Slot Number").is_none());
        assert_eq!(frame.find("Conflict").unwrap().value.as_deref(), Some("true"));
        assert_eq!(
            frame.find("Service Hints").unwrap().value.as_deref(),
            Some("8404 (Computer, IrCOMM)")
        );
        assert_eq!(frame.find("Device Nickname").unwrap().value.as_deref(), Some("Palm"));
        assert!(frame.info.ends_with(", \"Palm\""));
    }

    #[test]
    fn unsupported_charset_is_opaque() {
        let bytes = xid(0xfe, 0xbf, &[0x00, 0x00, 0x04, 0xff, 0x00, 0x41]);
        let frame = Dissector::new().decode(3, &bytes, DetailLevel::Full);
        assert_eq!(frame.find("Character Set").unwrap().value.as_deref(), Some("Unicode"));
        assert!(frame.find("Unsupported Character Set Data").is_some());
        assert!(frame.find("Device Nickname").is_none());
    }

    #[test]
    fn truncated_hint_chain_is_malformed() {
        let bytes = xid(0xfe, 0xbf, &[0x00, 0x00, 0x84]);
        let frame = Dissector::new().decode(4, &bytes, DetailLevel::Full);
        assert!(frame.malformed);
        assert!(frame.find("Version Number").is_some());
    }
}
