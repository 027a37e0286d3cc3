//! Decoders for the mandatory "Device" class.

use crate::dissector::Dissection;
use crate::protocols::common::bit_names;

use super::layout;
use super::parser::{AttributeEntry, AttributeValue, string_text};
use super::registry::AttributeOutcome;

pub fn decode_device_name(entry: &AttributeEntry<'_>, cx: &mut Dissection<'_>) -> AttributeOutcome {
    let AttributeValue::UserString { charset, text } = entry.value else {
        return AttributeOutcome::Declined;
    };
    let name = string_text(charset, text);
    cx.out.add("Device Name", entry.offset, entry.len, &name);
    cx.out.append_info(&format!(", \"{name}\""));
    AttributeOutcome::Handled
}

pub fn decode_irlmp_support(
    entry: &AttributeEntry<'_>,
    cx: &mut Dissection<'_>,
) -> AttributeOutcome {
    let Some(octets) = entry.octets() else {
        return AttributeOutcome::Declined;
    };
    let [version, ias, mux] = octets else {
        return AttributeOutcome::Declined;
    };
    // Sequence bytes start after the u16 length prefix.
    let start = entry.offset + 2;
    cx.out.add("IrLMP Version", start, 1, version);
    let ias_names = bit_names(u32::from(*ias), layout::IAS_SUPPORT).unwrap_or_else(|| "None".to_string());
    cx.out.add("IAS Support", start + 1, 1, format_args!("0x{ias:02x} ({ias_names})"));
    let mux_names = bit_names(u32::from(*mux), layout::MUX_SUPPORT).unwrap_or_else(|| "None".to_string());
    cx.out.add("LM-MUX Support", start + 2, 1, format_args!("0x{mux:02x} ({mux_names})"));
    AttributeOutcome::Handled
}
