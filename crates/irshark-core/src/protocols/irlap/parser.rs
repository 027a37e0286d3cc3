use crate::conversation::CircuitId;
use crate::dissector::{Dissection, plural};
use crate::protocols::common::bit_names;
use crate::protocols::common::error::DecodeError;
use crate::protocols::common::reader::FrameReader;
use crate::protocols::common::tuple::dissect_tuples;
use crate::protocols::irlmp;

use super::layout;
use super::negotiation::NegotiationParams;
use super::xid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisoryKind {
    ReceiveReady,
    ReceiveNotReady,
    Reject,
    SelectiveReject,
}

impl SupervisoryKind {
    fn name(self) -> &'static str {
        match self {
            SupervisoryKind::ReceiveReady => "RR",
            SupervisoryKind::ReceiveNotReady => "RNR",
            SupervisoryKind::Reject => "REJ",
            SupervisoryKind::SelectiveReject => "SREJ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnnumberedKind {
    Snrm,
    Disc,
    Ua,
    Frmr,
    Dm,
    Ui,
    XidCommand,
    XidResponse,
    Test,
    Unknown(u8),
}

impl UnnumberedKind {
    /// SNRM and DISC share their modifier with RNRM and RD; the C/R bit
    /// tells them apart.
    fn name(self, command: bool) -> String {
        match self {
            UnnumberedKind::Snrm if command => "SNRM".to_string(),
            UnnumberedKind::Snrm => "RNRM".to_string(),
            UnnumberedKind::Disc if command => "DISC".to_string(),
            UnnumberedKind::Disc => "RD".to_string(),
            UnnumberedKind::Ua => "UA".to_string(),
            UnnumberedKind::Frmr => "FRMR".to_string(),
            UnnumberedKind::Dm => "DM".to_string(),
            UnnumberedKind::Ui => "UI".to_string(),
            UnnumberedKind::XidCommand => "XID cmd".to_string(),
            UnnumberedKind::XidResponse => "XID rsp".to_string(),
            UnnumberedKind::Test => "TEST".to_string(),
            UnnumberedKind::Unknown(modifier) => format!("Unknown U frame (0x{modifier:02x})"),
        }
    }
}

/// IrLAP frame classification derived from the control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Information,
    Supervisory(SupervisoryKind),
    Unnumbered(UnnumberedKind),
}

pub fn classify_control(control: u8) -> FrameKind {
    if control & layout::I_FRAME_MASK == 0 {
        return FrameKind::Information;
    }
    if control & layout::FRAME_TYPE_MASK == layout::S_FRAME {
        let kind = match control & layout::S_TYPE_MASK {
            layout::RR => SupervisoryKind::ReceiveReady,
            layout::RNR => SupervisoryKind::ReceiveNotReady,
            layout::REJ => SupervisoryKind::Reject,
            _ => SupervisoryKind::SelectiveReject,
        };
        return FrameKind::Supervisory(kind);
    }
    let modifier = control & layout::U_MODIFIER_MASK;
    let kind = match modifier {
        layout::SNRM => UnnumberedKind::Snrm,
        layout::DISC => UnnumberedKind::Disc,
        layout::UA => UnnumberedKind::Ua,
        layout::FRMR => UnnumberedKind::Frmr,
        layout::DM => UnnumberedKind::Dm,
        layout::UI => UnnumberedKind::Ui,
        layout::XID_CMD => UnnumberedKind::XidCommand,
        layout::XID_RSP => UnnumberedKind::XidResponse,
        layout::TEST => UnnumberedKind::Test,
        other => UnnumberedKind::Unknown(other),
    };
    FrameKind::Unnumbered(kind)
}

/// Where the frame goes once the IrLAP header is done.
enum Next {
    Lmp,
    Done,
}

/// Decode one IrLAP frame and everything it carries.
pub fn dissect(reader: &mut FrameReader<'_>, cx: &mut Dissection<'_>) {
    cx.out.set_protocol("IrLAP");
    let next = cx.subtree(reader, "IrLAP", None, |reader, cx| {
        match dissect_frame(reader, cx) {
            Ok(next) => next,
            Err(err) => {
                if cx.out.info().is_empty() {
                    cx.out.set_info("Malformed IrLAP frame");
                }
                cx.fail(reader, &err);
                Next::Done
            }
        }
    });
    if let Next::Lmp = next {
        irlmp::dissect(reader, cx);
    }
}

fn dissect_frame(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
) -> Result<Next, DecodeError> {
    let address = reader.read_u8()?;
    let circuit = CircuitId(address);
    cx.frame.circuit = Some(circuit);
    let command = circuit.is_command();
    let connection = circuit.connection_address();
    if connection == layout::BROADCAST_ADDRESS {
        cx.out.add("Connection Address", 0, 1, "0x7f (broadcast)");
    } else {
        cx.out.add("Connection Address", 0, 1, format_args!("0x{connection:02x}"));
    }
    cx.out.add("C/R", 0, 1, if command { "Command" } else { "Response" });

    let offset = reader.offset();
    let control = reader.read_u8()?;
    let poll_final = control & layout::PF_BIT != 0;
    let pf_suffix = match (poll_final, command) {
        (false, _) => "",
        (true, true) => ", P",
        (true, false) => ", F",
    };
    let nr = (control >> layout::NR_SHIFT) & layout::SEQ_MASK;

    match classify_control(control) {
        FrameKind::Information => {
            let ns = (control >> layout::NS_SHIFT) & layout::SEQ_MASK;
            cx.out.add("Control", offset, 1, format_args!("0x{control:02x} (I frame)"));
            cx.out.add("N(R)", offset, 1, nr);
            cx.out.add("P/F", offset, 1, poll_final);
            cx.out.add("N(S)", offset, 1, ns);
            cx.out.set_info(format!("I, Nr={nr}, Ns={ns}{pf_suffix}"));
            Ok(Next::Lmp)
        }
        FrameKind::Supervisory(kind) => {
            cx.out.add(
                "Control",
                offset,
                1,
                format_args!("0x{control:02x} ({})", kind.name()),
            );
            cx.out.add("N(R)", offset, 1, nr);
            cx.out.add("P/F", offset, 1, poll_final);
            cx.out.set_info(format!("{}, Nr={nr}{pf_suffix}", kind.name()));
            cx.opaque(reader, "Unexpected Data");
            Ok(Next::Done)
        }
        FrameKind::Unnumbered(kind) => {
            let name = kind.name(command);
            cx.out.add("Control", offset, 1, format_args!("0x{control:02x} ({name})"));
            cx.out.add("P/F", offset, 1, poll_final);
            cx.out.set_info(format!("{name}{pf_suffix}"));
            dissect_unnumbered(reader, cx, kind, command)?;
            Ok(Next::Done)
        }
    }
}

fn dissect_unnumbered(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
    kind: UnnumberedKind,
    command: bool,
) -> Result<(), DecodeError> {
    match kind {
        UnnumberedKind::Snrm if command => {
            if reader.is_empty() {
                return Ok(());
            }
            if reader.remaining() < layout::SNRM_HEADER_LEN {
                return truncated(reader, cx);
            }
            dissect_station_addresses(reader, cx)?;
            let offset = reader.offset();
            let ca = reader.read_u8()? >> 1;
            cx.out.add("Connection Address", offset, 1, format_args!("0x{ca:02x}"));
            dissect_negotiation(reader, cx);
        }
        UnnumberedKind::Ua => {
            if reader.is_empty() {
                return Ok(());
            }
            if reader.remaining() < layout::STATION_ADDRESSES_LEN {
                return truncated(reader, cx);
            }
            dissect_station_addresses(reader, cx)?;
            dissect_negotiation(reader, cx);
        }
        UnnumberedKind::XidCommand | UnnumberedKind::XidResponse => {
            xid::dissect(reader, cx)?;
        }
        UnnumberedKind::Test => {
            if reader.remaining() < layout::STATION_ADDRESSES_LEN {
                return truncated(reader, cx);
            }
            dissect_station_addresses(reader, cx)?;
            cx.opaque(reader, "Information");
        }
        UnnumberedKind::Frmr => {
            if reader.remaining() < layout::FRMR_INFO_LEN {
                return truncated(reader, cx);
            }
            dissect_frmr(reader, cx)?;
        }
        UnnumberedKind::Ui => cx.opaque(reader, "Information"),
        _ => cx.opaque(reader, "Data"),
    }
    Ok(())
}

/// Address fields cut short: keep the bytes as opaque data.
fn truncated(reader: &mut FrameReader<'_>, cx: &mut Dissection<'_>) -> Result<(), DecodeError> {
    cx.out.append_info(" (truncated)");
    cx.opaque(reader, "Data");
    Ok(())
}

fn dissect_station_addresses(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
) -> Result<(), DecodeError> {
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
    cx.out
        .append_info(&format!(", S=0x{source:08x}, D=0x{destination:08x}"));
    Ok(())
}

fn dissect_negotiation(reader: &mut FrameReader<'_>, cx: &mut Dissection<'_>) {
    if reader.is_empty() {
        return;
    }
    let count = cx.subtree(reader, "Negotiation Parameters", None, |reader, cx| {
        dissect_tuples::<NegotiationParams>(reader, &mut cx.out)
    });
    cx.out
        .append_info(&format!(", {count} parameter{}", plural(count)));
}

fn dissect_frmr(reader: &mut FrameReader<'_>, cx: &mut Dissection<'_>) -> Result<(), DecodeError> {
    let offset = reader.offset();
    let rejected = reader.read_u8()?;
    cx.out.add(
        "Rejected Control Field",
        offset,
        1,
        format_args!("0x{rejected:02x}"),
    );
    let offset = reader.offset();
    let vars = reader.read_u8()?;
    cx.out.add("V(S)", offset, 1, (vars >> 1) & layout::SEQ_MASK);
    cx.out.add("C/R", offset, 1, vars & 0x10 != 0);
    cx.out.add("V(R)", offset, 1, (vars >> 5) & layout::SEQ_MASK);
    let offset = reader.offset();
    let flags = reader.read_u8()?;
    let reasons = bit_names(u32::from(flags), layout::FRMR_FLAGS).unwrap_or_else(|| "None".to_string());
    cx.out.add("Reject Reason", offset, 1, reasons);
    cx.opaque(reader, "Data");
    Ok(())
}
