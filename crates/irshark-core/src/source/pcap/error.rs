use thiserror::Error;

/// Failures while opening or walking a capture file.
#[derive(Debug, Error)]
pub enum PcapSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file starts with neither a PCAPNG section header nor a legacy
    /// PCAP magic number.
    #[error("not a PCAP or PCAPNG capture (magic {magic:02x?})")]
    UnknownMagic { magic: [u8; 4] },
    #[error("PCAP parse error ({context}): {message}")]
    Pcap {
        context: &'static str,
        message: String,
    },
}
