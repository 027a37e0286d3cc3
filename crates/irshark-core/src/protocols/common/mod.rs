//! Building blocks shared by every IrDA layer: the frame cursor, the output
//! sink, and the parameter-tuple decoder.

pub mod error;
pub mod reader;
pub mod tree;
pub mod tuple;

/// Lower-case hex rendering of a byte span.
pub(crate) fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Text field rendering: lossy UTF-8 with trailing NULs removed.
pub(crate) fn text_string(bytes: &[u8]) -> String {
    let raw = String::from_utf8_lossy(bytes);
    raw.trim_end_matches('\0').to_string()
}

/// Comma-joined names of the bits set in `mask`, or `None` when no bit in
/// `table` is set.
pub(crate) fn bit_names(mask: u32, table: &[(u32, &str)]) -> Option<String> {
    let names: Vec<&str> = table
        .iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|(_, name)| *name)
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

/// Look up `value` in a value/name table.
pub(crate) fn value_name(value: u8, table: &[(u8, &'static str)]) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == value)
        .map(|(_, name)| *name)
}
