//! Capture sources.
//!
//! A [`PacketSource`] yields raw packet events in file order. Sources own all
//! file I/O; nothing downstream touches the filesystem.

pub mod pcap;

pub use pcap::PcapFileSource;

use pcap_parser::Linktype;
use thiserror::Error;

/// One captured packet as read from the file.
#[derive(Debug, Clone)]
pub struct PacketEvent {
    /// Seconds since the Unix epoch, when the format carries one.
    pub ts: Option<f64>,
    pub linktype: Linktype,
    pub data: Vec<u8>,
    /// Length on the wire; larger than `data.len()` for sliced captures.
    pub orig_len: u32,
}

pub trait PacketSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError>;
}

/// In-memory source, mostly for tests and callers that already hold packets.
#[derive(Debug, Default)]
pub struct VecSource {
    packets: std::collections::VecDeque<PacketEvent>,
}

impl VecSource {
    pub fn new(packets: Vec<PacketEvent>) -> Self {
        Self {
            packets: packets.into(),
        }
    }
}

impl PacketSource for VecSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        Ok(self.packets.pop_front())
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error: {0}")]
    Pcap(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::Pcap { context, message } => {
                SourceError::Pcap(format!("{context}: {message}"))
            }
            err @ pcap::error::PcapSourceError::UnknownMagic { .. } => {
                SourceError::Pcap(err.to_string())
            }
        }
    }
}
