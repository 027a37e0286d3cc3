use crate::conversation::LmpBinding;
use crate::dissector::{Dissection, LsapPair, PduKind};
use crate::protocols::common::error::DecodeError;
use crate::protocols::common::reader::FrameReader;
use crate::protocols::common::value_name;
use crate::protocols::{iap, ircomm, ttp};

use super::layout;

/// LMP header of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LmpHeader {
    pub control: bool,
    pub lsaps: LsapPair,
    pub opcode: Option<u8>,
}

impl LmpHeader {
    pub fn pdu(&self) -> Option<PduKind> {
        match self.opcode {
            None => Some(PduKind::Data),
            Some(layout::CONNECT_CMD | layout::CONNECT_CNF) => Some(PduKind::Connect),
            Some(layout::DISCONNECT) => Some(PduKind::Disconnect),
            Some(_) => None,
        }
    }
}

pub fn is_application_lsap(lsap: u8) -> bool {
    (layout::FIRST_APPLICATION_LSAP..=layout::LAST_APPLICATION_LSAP).contains(&lsap)
}

fn lsap_label(lsap: u8) -> String {
    match lsap {
        layout::IAS_LSAP => "0x00 (IAS)".to_string(),
        lsap if is_application_lsap(lsap) => format!("0x{lsap:02x}"),
        lsap => format!("0x{lsap:02x} (reserved)"),
    }
}

fn opcode_name(opcode: u8) -> &'static str {
    match opcode {
        layout::CONNECT_CMD => "Connect",
        layout::CONNECT_CNF => "Connect Confirm",
        layout::DISCONNECT => "Disconnect",
        layout::ACCESS_MODE_CMD => "Access Mode",
        layout::ACCESS_MODE_CNF => "Access Mode Confirm",
        _ => "Unknown Opcode",
    }
}

/// Where the payload after the LMP header goes.
enum Next {
    IapRequest,
    IapResult,
    Application(LmpBinding, PduKind),
    Opaque(&'static str),
    Done,
}

/// Decode the IrLMP header and demultiplex the payload.
pub fn dissect(reader: &mut FrameReader<'_>, cx: &mut Dissection<'_>) {
    cx.out.set_protocol("IrLMP");
    let next = cx.subtree(reader, "IrLMP", None, |reader, cx| {
        match dissect_header(reader, cx) {
            Ok(next) => next,
            Err(err) => {
                cx.out.set_info("Malformed IrLMP frame");
                cx.fail(reader, &err);
                Next::Done
            }
        }
    });

    match next {
        Next::IapRequest => iap::dissect_request(reader, cx),
        Next::IapResult => iap::dissect_result(reader, cx),
        Next::Application(binding, pdu) => dissect_application(reader, cx, binding, pdu),
        Next::Opaque(label) => cx.opaque(reader, label),
        Next::Done => {}
    }
}

fn dissect_header(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
) -> Result<Next, DecodeError> {
    let header = read_header(reader, cx)?;
    let LsapPair { dlsap, slsap } = header.lsaps;
    cx.frame.lsaps = Some(header.lsaps);
    cx.frame.pdu = header.pdu();

    let Some(opcode) = header.opcode else {
        cx.out
            .set_info(format!("Data, DLSAP=0x{dlsap:02x}, SLSAP=0x{slsap:02x}"));
        if dlsap == layout::IAS_LSAP {
            return Ok(Next::IapRequest);
        }
        if slsap == layout::IAS_LSAP {
            return Ok(Next::IapResult);
        }
        return Ok(bound_application(cx, header, PduKind::Data));
    };

    cx.out.set_info(format!(
        "{}, DLSAP=0x{dlsap:02x}, SLSAP=0x{slsap:02x}",
        opcode_name(opcode)
    ));
    match opcode {
        layout::CONNECT_CMD | layout::CONNECT_CNF => {
            if !reader.is_empty() {
                let offset = reader.offset();
                let reserved = reader.read_u8()?;
                cx.out.add("Reserved", offset, 1, format_args!("0x{reserved:02x}"));
            }
            Ok(bound_application(cx, header, PduKind::Connect))
        }
        layout::DISCONNECT => {
            let offset = reader.offset();
            let reason = reader.read_u8()?;
            let name = value_name(reason, layout::DISCONNECT_REASONS).unwrap_or("Unknown");
            cx.out.add("Reason", offset, 1, format_args!("{name} (0x{reason:02x})"));
            cx.out.append_info(&format!(", {name}"));
            Ok(bound_application(cx, header, PduKind::Disconnect))
        }
        layout::ACCESS_MODE_CMD | layout::ACCESS_MODE_CNF => {
            let offset = reader.offset();
            let status = reader.read_u8()?;
            if opcode == layout::ACCESS_MODE_CNF {
                let name = value_name(status, layout::ACCESS_MODE_STATUS).unwrap_or("Unknown");
                cx.out.add("Status", offset, 1, format_args!("{name} (0x{status:02x})"));
            } else {
                cx.out.add("Reserved", offset, 1, format_args!("0x{status:02x}"));
            }
            let offset = reader.offset();
            let mode = reader.read_u8()?;
            let name = value_name(mode, layout::ACCESS_MODES).unwrap_or("Unknown");
            cx.out.add("Mode", offset, 1, format_args!("{name} (0x{mode:02x})"));
            cx.out.append_info(&format!(", {name}"));
            Ok(Next::Opaque("Data"))
        }
        _ => Ok(Next::Opaque("Data")),
    }
}

fn read_header(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
) -> Result<LmpHeader, DecodeError> {
    let offset = reader.offset();
    let destination = reader.read_u8()?;
    let control = destination & layout::CONTROL_BIT != 0;
    let dlsap = destination & layout::LSAP_MASK;
    cx.out.add("Control Frame", offset, 1, control);
    cx.out.add("Destination LSAP", offset, 1, lsap_label(dlsap));

    let offset = reader.offset();
    let source = reader.read_u8()?;
    let slsap = source & layout::LSAP_MASK;
    cx.out.add("Source LSAP", offset, 1, lsap_label(slsap));

    let opcode = if control {
        let offset = reader.offset();
        let opcode = reader.read_u8()?;
        cx.out.add(
            "Opcode",
            offset,
            1,
            format_args!("{} (0x{opcode:02x})", opcode_name(opcode)),
        );
        Some(opcode)
    } else {
        None
    };

    Ok(LmpHeader {
        control,
        lsaps: LsapPair { dlsap, slsap },
        opcode,
    })
}

fn bound_application(cx: &mut Dissection<'_>, header: LmpHeader, pdu: PduKind) -> Next {
    let LsapPair { dlsap, slsap } = header.lsaps;
    let binding = cx
        .conversations
        .lsap_binding(cx.circuit(), cx.frame.number, dlsap, slsap)
        .copied();
    match binding {
        Some(binding) => Next::Application(binding, pdu),
        None if pdu == PduKind::Data => Next::Opaque("Data"),
        None => Next::Opaque("User Data"),
    }
}

/// TTP (unless the binding says otherwise, or the PDU is a disconnect),
/// then the bound application when payload remains.
fn dissect_application(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
    binding: LmpBinding,
    pdu: PduKind,
) {
    if binding.ttp && pdu != PduKind::Disconnect && ttp::dissect(reader, cx, pdu).is_none() {
        return;
    }
    // Credit-only TTP PDUs and bare connects carry nothing for the application.
    if reader.is_empty() {
        return;
    }
    ircomm::dissect(reader, cx, binding.protocol, pdu);
}

#[cfg(test)]
mod tests {
    use super::is_application_lsap;
    use crate::conversation::{CircuitId, Conversations, LmpBinding};
    use crate::dissector::{Dissector, LsapPair, PduKind};
    use crate::protocols::common::tree::DetailLevel;
    use crate::protocols::ircomm::AppProtocol;

    fn i_frame(address: u8, lmp: &[u8]) -> Vec<u8> {
        let mut bytes = vec![address, 0x10];
        bytes.extend_from_slice(lmp);
        bytes
    }

    fn bound(protocol: AppProtocol, ttp: bool) -> Dissector {
        let mut conversations = Conversations::new();
        conversations.record_lsap(
            CircuitId(0x03),
            LmpBinding {
                discovery_frame: 2,
                lsap: 0x05,
                ttp,
                protocol,
            },
        );
        Dissector::with_conversations(conversations)
    }

    #[test]
    fn selector_ranges() {
        assert!(!is_application_lsap(0x00));
        assert!(is_application_lsap(0x01));
        assert!(is_application_lsap(0x6f));
        assert!(!is_application_lsap(0x70));
    }

    #[test]
    fn connect_command_sets_frame_context() {
        let bytes = i_frame(0x03, &[0x85, 0x12, 0x01, 0x00]);
        let frame = Dissector::new().decode(4, &bytes, DetailLevel::Full);
        assert!(!frame.malformed);
        assert_eq!(frame.protocol, "IrLMP");
        assert_eq!(frame.info, "Connect, DLSAP=0x05, SLSAP=0x12");
        assert_eq!(frame.context.lsaps, Some(LsapPair { dlsap: 0x05, slsap: 0x12 }));
        assert_eq!(frame.context.pdu, Some(PduKind::Connect));
        assert_eq!(frame.find("Reserved").unwrap().offset, 5);
    }

    #[test]
    fn disconnect_reason_is_named() {
        let bytes = i_frame(0x03, &[0x85, 0x12, 0x02, 0x01]);
        let frame = Dissector::new().decode(4, &bytes, DetailLevel::Full);
        assert_eq!(frame.info, "Disconnect, DLSAP=0x05, SLSAP=0x12, User request");
        assert_eq!(frame.context.pdu, Some(PduKind::Disconnect));
    }

    #[test]
    fn disconnect_without_reason_is_malformed() {
        let bytes = i_frame(0x03, &[0x85, 0x12, 0x02]);
        let frame = Dissector::new().decode(4, &bytes, DetailLevel::Full);
        assert!(frame.malformed);
        assert!(frame.find("Opcode").is_some());
    }

    #[test]
    fn access_mode_confirm() {
        let bytes = i_frame(0x02, &[0x92, 0x05, 0x83, 0x00, 0x01]);
        let frame = Dissector::new().decode(4, &bytes, DetailLevel::Full);
        assert_eq!(frame.info, "Access Mode Confirm, DLSAP=0x12, SLSAP=0x05, Exclusive");
        assert_eq!(frame.find("Status").unwrap().value.as_deref(), Some("Success (0x00)"));
        assert_eq!(frame.context.pdu, None);
    }

    #[test]
    fn unbound_data_is_opaque() {
        let bytes = i_frame(0x03, &[0x05, 0x12, 0xaa, 0xbb]);
        let frame = Dissector::new().decode(4, &bytes, DetailLevel::Full);
        assert_eq!(frame.protocol, "IrLMP");
        assert_eq!(frame.find("Data").unwrap().value.as_deref(), Some("2 bytes: aabb"));
    }

    #[test]
    fn bound_data_goes_through_ttp_to_ircomm() {
        let mut dissector = bound(AppProtocol::IrcommCooked, true);
        let bytes = i_frame(0x02, &[0x12, 0x05, 0x03, 0x00, 0x41, 0x42]);
        let frame = dissector.decode(9, &bytes, DetailLevel::Full);
        assert!(!frame.malformed);
        assert_eq!(frame.protocol, "IrCOMM");
        assert!(frame.find("TTP").is_some());
        assert_eq!(frame.find("Delta Credit").unwrap().value.as_deref(), Some("3"));
        assert_eq!(frame.info, "Clen=0, UserData: 2 bytes");
    }

    #[test]
    fn credit_only_data_is_a_clean_ttp_frame() {
        let mut dissector = bound(AppProtocol::IrcommCooked, true);
        let bytes = i_frame(0x02, &[0x12, 0x05, 0x07]);
        let frame = dissector.decode(9, &bytes, DetailLevel::Full);
        assert!(!frame.malformed);
        assert_eq!(frame.protocol, "TTP");
        assert_eq!(frame.info, "Data, Credit=7");
        assert_eq!(frame.find("Delta Credit").unwrap().value.as_deref(), Some("7"));
        assert!(frame.find("IrCOMM").is_none());
    }

    #[test]
    fn empty_raw_data_stays_irlmp() {
        let mut dissector = bound(AppProtocol::Irlpt, false);
        let bytes = i_frame(0x03, &[0x05, 0x12]);
        let frame = dissector.decode(9, &bytes, DetailLevel::Full);
        assert!(!frame.malformed);
        assert_eq!(frame.protocol, "IrLMP");
        assert_eq!(frame.info, "Data, DLSAP=0x05, SLSAP=0x12");
    }

    #[test]
    fn binding_after_frame_is_ignored() {
        let mut dissector = bound(AppProtocol::IrcommCooked, true);
        let bytes = i_frame(0x02, &[0x12, 0x05, 0x03, 0x00]);
        let frame = dissector.decode(1, &bytes, DetailLevel::Full);
        assert_eq!(frame.protocol, "IrLMP");
    }

    #[test]
    fn bound_disconnect_skips_ttp() {
        let mut dissector = bound(AppProtocol::Irlpt, false);
        let bytes = i_frame(0x03, &[0x85, 0x12, 0x02, 0x01, 0x50]);
        let frame = dissector.decode(7, &bytes, DetailLevel::Full);
        assert_eq!(frame.protocol, "IrLPT");
        assert!(frame.find("TTP").is_none());
    }
}
