use crate::dissector::{Dissection, PduKind};
use crate::protocols::common::error::DecodeError;
use crate::protocols::common::reader::FrameReader;
use crate::protocols::common::tree::ListKind;
use crate::protocols::common::tuple::{ParamSchema, ParamTuple, dissect_tuples};

use super::layout;

/// Decoded credit byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtpHeader {
    pub credit: u8,
    /// Parameters present on connect PDUs, more-data on data PDUs.
    pub flag: bool,
}

/// Tiny TP connect parameters.
pub struct TtpParams;

impl ParamSchema for TtpParams {
    const KIND: ListKind = ListKind::TtpParameter;

    fn name(pi: u8) -> Option<&'static str> {
        (pi == layout::PI_MAX_SDU_SIZE).then_some("MaxSduSize")
    }

    fn describe(tuple: &ParamTuple<'_>) -> Option<String> {
        match tuple.pi {
            layout::PI_MAX_SDU_SIZE if tuple.value_be() == 0 => {
                Some("0 (no segmentation)".to_string())
            }
            layout::PI_MAX_SDU_SIZE => Some(format!("{} bytes", tuple.value_be())),
            _ => None,
        }
    }
}

/// Decode the credit byte ahead of an application payload. Returns `None`
/// when the header is malformed and nothing is left for the application.
pub fn dissect(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
    pdu: PduKind,
) -> Option<TtpHeader> {
    cx.out.set_protocol("TTP");
    cx.subtree(reader, "TTP", None, |reader, cx| {
        match dissect_header(reader, cx, pdu) {
            Ok(header) => Some(header),
            Err(err) => {
                cx.out.set_info("Malformed TTP header");
                cx.fail(reader, &err);
                None
            }
        }
    })
}

fn dissect_header(
    reader: &mut FrameReader<'_>,
    cx: &mut Dissection<'_>,
    pdu: PduKind,
) -> Result<TtpHeader, DecodeError> {
    let offset = reader.offset();
    let byte = reader.read_u8()?;
    let header = TtpHeader {
        credit: byte & layout::CREDIT_MASK,
        flag: byte & layout::PARAMETERS_BIT != 0,
    };

    if pdu == PduKind::Connect {
        cx.out.add("Parameters Present", offset, 1, header.flag);
        cx.out.add("Initial Credit", offset, 1, header.credit);
        cx.out.set_info(format!("Connect, Credit={}", header.credit));
        if header.flag {
            let offset = reader.offset();
            let len = reader.read_u8()?;
            cx.out.add("Parameter Length", offset, 1, len);
            let mut params = reader.sub_reader("TTP parameters", usize::from(len))?;
            cx.subtree(&mut params, "Parameters", None, |params, cx| {
                dissect_tuples::<TtpParams>(params, &mut cx.out)
            });
        }
    } else {
        cx.out.add("More Data", offset, 1, header.flag);
        cx.out.add("Delta Credit", offset, 1, header.credit);
        cx.out.set_info(format!("Data, Credit={}", header.credit));
        if byte & layout::MORE_BIT != 0 {
            cx.out.append_info(", More");
        }
    }
    Ok(header)
}
