use serde::{Deserialize, Serialize};

use crate::dissector::{Dissection, PduKind, plural};
use crate::protocols::common::reader::FrameReader;
use crate::protocols::common::tuple::dissect_tuples;

use super::params::IrcommParams;

/// Application protocol an LSAP selector can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppProtocol {
    /// IrCOMM with control channel, over Tiny TP.
    IrcommCooked,
    /// 3-wire raw IrCOMM.
    IrcommRaw,
    Irlpt,
}

impl AppProtocol {
    /// Protocol column name.
    pub fn name(self) -> &'static str {
        match self {
            AppProtocol::IrcommCooked | AppProtocol::IrcommRaw => "IrCOMM",
            AppProtocol::Irlpt => "IrLPT",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AppProtocol::IrcommCooked => "IrCOMM cooked",
            AppProtocol::IrcommRaw => "IrCOMM raw",
            AppProtocol::Irlpt => "IrLPT",
        }
    }
}

/// Decode an application payload for a bound LSAP.
pub fn dissect(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
    protocol: AppProtocol,
    pdu: PduKind,
) {
    match (protocol, pdu) {
        (AppProtocol::IrcommCooked, PduKind::Data) => {
            dissect_cooked(reader, cx);
        }
        (AppProtocol::IrcommCooked, PduKind::Connect) => dissect_cooked_connect(reader, cx),
        _ => dissect_raw(reader, cx, protocol),
    }
}

/// Cooked data PDU: control-channel length, parameter tuples, user data.
/// Returns the number of user data bytes.
pub fn dissect_cooked(reader: &mut FrameReader<'_>, cx: &mut Dissection<'_>) -> usize {
    cx.out.set_protocol(AppProtocol::IrcommCooked.name());
    cx.subtree(reader, "IrCOMM", None, |reader, cx| {
        let offset = reader.offset();
        let clen = match reader.read_u8() {
            Ok(clen) => clen,
            Err(err) => {
                cx.out.set_info("Malformed IrCOMM frame");
                cx.fail(reader, &err);
                return 0;
            }
        };
        cx.out.add("Control Channel Length", offset, 1, clen);
        cx.out.set_info(format!("Clen={clen}"));

        let mut control = match reader.sub_reader("control channel", usize::from(clen)) {
            Ok(control) => control,
            Err(err) => {
                cx.fail(reader, &err);
                return 0;
            }
        };
        if clen > 0 {
            cx.subtree(&mut control, "Control Channel", None, |control, cx| {
                dissect_tuples::<IrcommParams>(control, &mut cx.out)
            });
        }

        let len = reader.remaining();
        if len > 0 {
            cx.out
                .append_info(&format!(", UserData: {len} byte{}", plural(len)));
            cx.opaque(reader, "User Data");
        }
        len
    })
}

/// Connect PDU user data: initial control parameters.
fn dissect_cooked_connect(reader: &mut FrameReader<'_>, cx: &mut Dissection<'_>) {
    cx.out.set_protocol(AppProtocol::IrcommCooked.name());
    cx.subtree(reader, "IrCOMM", None, |reader, cx| {
        let count = cx.subtree(reader, "Initial Parameters", None, |reader, cx| {
            dissect_tuples::<IrcommParams>(reader, &mut cx.out)
        });
        cx.out
            .set_info(format!("Connect, {count} parameter{}", plural(count)));
    });
}

/// Raw IrCOMM and IrLPT: the whole payload is user data.
fn dissect_raw(reader: &mut FrameReader<'_>, cx: &mut Dissection<'_>, protocol: AppProtocol) {
    cx.out.set_protocol(protocol.name());
    let len = reader.remaining();
    cx.out
        .set_info(format!("UserData: {len} byte{}", plural(len)));
    cx.subtree(reader, protocol.name(), None, |reader, cx| {
        cx.opaque(reader, "User Data");
    });
}
