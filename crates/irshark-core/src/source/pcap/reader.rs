use std::io::{Read, Seek, SeekFrom};

use super::error::PcapSourceError;
use super::layout;
use pcap_parser::Linktype;

/// Read the magic bytes and rewind the reader to the start.
///
/// # Errors
/// Returns `PcapSourceError` when the reader cannot be read or rewound.
pub fn read_magic_and_rewind<R: Read + Seek>(reader: &mut R) -> Result<[u8; 4], PcapSourceError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(magic)
}

pub fn is_pcapng_magic(magic: &[u8; 4]) -> bool {
    magic == &layout::PCAPNG_MAGIC
}

pub fn is_legacy_magic(magic: &[u8; 4]) -> bool {
    layout::LEGACY_MAGICS.contains(magic)
}

/// Link type of interface `if_id`, in order of the interface description
/// blocks seen so far.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// use irshark_core::source::pcap::reader::linktype_for_interface;
/// use pcap_parser::Linktype;
///
/// let linktypes = [Linktype(144)];
/// assert_eq!(linktype_for_interface(&linktypes, 0), Linktype(144));
/// assert_eq!(linktype_for_interface(&linktypes, 1), Linktype::ETHERNET);
/// ```
pub fn linktype_for_interface(linktypes: &[Linktype], if_id: u32) -> Linktype {
    usize::try_from(if_id)
        .ok()
        .and_then(|idx| linktypes.get(idx))
        .copied()
        .unwrap_or(layout::FALLBACK_LINKTYPE)
}

/// PCAPNG 64-bit microsecond timestamp to seconds.
pub fn pcapng_ts_to_seconds(ts_high: u32, ts_low: u32) -> f64 {
    let ts = (u64::from(ts_high) << 32) | u64::from(ts_low);
    ts as f64 / 1_000_000.0
}

/// Legacy PCAP seconds + microseconds to seconds.
pub fn legacy_ts_to_seconds(ts_sec: u32, ts_usec: u32) -> f64 {
    f64::from(ts_sec) + f64::from(ts_usec) / 1_000_000.0
}
