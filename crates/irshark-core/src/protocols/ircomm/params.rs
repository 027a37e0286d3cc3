use crate::protocols::common::text_string;
use crate::protocols::common::tree::ListKind;
use crate::protocols::common::tuple::{ParamSchema, ParamTuple, describe_mask};

use super::layout;

/// Control-channel parameters of cooked IrCOMM.
pub struct IrcommParams;

fn data_format(format: u8) -> String {
    let bits = 5 + (format & layout::CHAR_LENGTH_MASK);
    let stop = if format & layout::STOP_BITS_BIT != 0 { "2 stop bits" } else { "1 stop bit" };
    let parity = if format & layout::PARITY_ENABLE_BIT != 0 {
        let kind = usize::from((format >> layout::PARITY_TYPE_SHIFT) & 0x03);
        format!("{} parity", layout::PARITY_TYPES[kind])
    } else {
        "no parity".to_string()
    };
    format!("{bits} bits, {stop}, {parity}")
}

fn char_pair(tuple: &ParamTuple<'_>, first: &str, second: &str) -> Option<String> {
    match tuple.pv {
        [a, b] => Some(format!("{first}=0x{a:02x}, {second}=0x{b:02x}")),
        _ => None,
    }
}

impl ParamSchema for IrcommParams {
    const KIND: ListKind = ListKind::IrcommParameter;

    fn name(pi: u8) -> Option<&'static str> {
        let name = match pi {
            layout::PI_SERVICE_TYPE => "Service Type",
            layout::PI_PORT_TYPE => "Port Type",
            layout::PI_PORT_NAME => "Port Name",
            layout::PI_DATA_RATE => "Data Rate",
            layout::PI_DATA_FORMAT => "Data Format",
            layout::PI_FLOW_CONTROL => "Flow Control",
            layout::PI_XON_XOFF => "XON/XOFF Characters",
            layout::PI_ENQ_ACK => "ENQ/ACK Characters",
            layout::PI_LINE_STATUS => "Line Status",
            layout::PI_BREAK => "Break",
            layout::PI_DTE => "DTE Line Settings",
            layout::PI_DCE => "DCE Line Settings",
            layout::PI_POLL => "Poll Line Settings",
            _ => return None,
        };
        Some(name)
    }

    fn describe(tuple: &ParamTuple<'_>) -> Option<String> {
        match tuple.pi {
            layout::PI_SERVICE_TYPE => describe_mask(tuple, layout::SERVICE_TYPES),
            layout::PI_PORT_TYPE => describe_mask(tuple, layout::PORT_TYPES),
            layout::PI_PORT_NAME => Some(text_string(tuple.pv)),
            layout::PI_DATA_RATE => Some(format!("{} bps", tuple.value_be())),
            layout::PI_DATA_FORMAT => tuple.pv.first().map(|format| data_format(*format)),
            layout::PI_FLOW_CONTROL => describe_mask(tuple, layout::FLOW_CONTROL),
            layout::PI_XON_XOFF => char_pair(tuple, "XON", "XOFF"),
            layout::PI_ENQ_ACK => char_pair(tuple, "ENQ", "ACK"),
            layout::PI_LINE_STATUS => describe_mask(tuple, layout::LINE_STATUS),
            layout::PI_BREAK => {
                let set = tuple.pv.first().is_some_and(|state| *state != 0);
                Some(if set { "Set" } else { "Clear" }.to_string())
            }
            layout::PI_DTE => describe_mask(tuple, layout::DTE_LINE_SETTINGS),
            layout::PI_DCE => describe_mask(tuple, layout::DCE_LINE_SETTINGS),
            _ => None,
        }
    }
}
