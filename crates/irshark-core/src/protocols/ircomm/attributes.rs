//! IAS attribute decoders owned by IrCOMM and IrLPT.
//!
//! The LSAP selector decoders are how these protocols find themselves: a
//! valid selector in a query result becomes an LMP conversation binding
//! starting at the result frame.

use crate::conversation::LmpBinding;
use crate::dissector::Dissection;
use crate::protocols::common::tuple::dissect_tuples;
use crate::protocols::iap::{AttributeEntry, AttributeOutcome, AttributeValue};
use crate::protocols::irlmp::is_application_lsap;

use super::params::IrcommParams;
use super::parser::AppProtocol;

/// LSAP selector carried by an attribute value, if it is a valid
/// application selector (0x01..=0x6F).
///
/// Integers are taken as is. Strings hold the selector as decimal or
/// `0x`-prefixed hex text. A one-byte octet sequence is the selector itself.
pub fn lsap_from_value(value: &AttributeValue<'_>) -> Option<u8> {
    let lsap = match value {
        AttributeValue::Integer(value) => u8::try_from(*value).ok()?,
        AttributeValue::UserString { text, .. } => parse_selector(text)?,
        AttributeValue::OctetSequence(seq) => match seq.clone().read_rest() {
            [lsap] => *lsap,
            _ => return None,
        },
        AttributeValue::Missing => return None,
    };
    is_application_lsap(lsap).then_some(lsap)
}

fn parse_selector(text: &[u8]) -> Option<u8> {
    let text = std::str::from_utf8(text).ok()?;
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// LSAP selector attribute: record the binding and render the selector.
pub fn decode_lsap_attribute(
    entry: &AttributeEntry<'_>,
    cx: &mut Dissection<'_>,
    protocol: AppProtocol,
    ttp: bool,
) -> AttributeOutcome {
    let Some(lsap) = lsap_from_value(&entry.value) else {
        return AttributeOutcome::Declined;
    };
    cx.out.add(
        "LSAP Selector",
        entry.offset,
        entry.len,
        format_args!("0x{lsap:02x} ({})", protocol.description()),
    );
    let circuit = cx.circuit();
    cx.conversations.record_lsap(
        circuit,
        LmpBinding {
            discovery_frame: cx.frame.number,
            lsap,
            ttp,
            protocol,
        },
    );
    cx.out
        .append_info(&format!(", {} on LSAP 0x{lsap:02x}", protocol.name()));
    AttributeOutcome::Handled
}

/// "Parameters" attribute: an octet sequence of IrCOMM parameter tuples.
pub fn decode_parameters_attribute(
    entry: &AttributeEntry<'_>,
    cx: &mut Dissection<'_>,
) -> AttributeOutcome {
    let AttributeValue::OctetSequence(seq) = &entry.value else {
        return AttributeOutcome::Declined;
    };
    cx.out
        .add("Octet Sequence Length", entry.offset, 2, seq.remaining());
    let mut seq = seq.clone();
    cx.subtree(&mut seq, "IrCOMM Parameters", None, |seq, cx| {
        dissect_tuples::<IrcommParams>(seq, &mut cx.out)
    });
    AttributeOutcome::Handled
}
