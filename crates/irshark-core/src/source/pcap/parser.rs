use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader,
    traits::PcapReaderIterator,
};
use tracing::debug;

use crate::source::{PacketEvent, PacketSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    is_legacy_magic, is_pcapng_magic, legacy_ts_to_seconds, linktype_for_interface,
    pcapng_ts_to_seconds, read_magic_and_rewind,
};

pub struct PcapFileSource {
    inner: PcapReader,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        let inner = create_reader(file).map_err(SourceError::from)?;
        Ok(Self { inner })
    }
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        next_packet(&mut self.inner).map_err(SourceError::from)
    }
}

fn create_reader(file: File) -> Result<PcapReader, PcapSourceError> {
    let mut file = file;
    let magic = read_magic_and_rewind(&mut file)?;

    if is_pcapng_magic(&magic) {
        debug!("opening PCAPNG capture");
        let reader = PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
            PcapSourceError::Pcap {
                context: "pcapng reader init",
                message: e.to_string(),
            }
        })?;
        Ok(PcapReader::Ng {
            reader,
            linktypes: Vec::new(),
        })
    } else if is_legacy_magic(&magic) {
        debug!("opening legacy PCAP capture");
        let reader = LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
            PcapSourceError::Pcap {
                context: "pcap reader init",
                message: e.to_string(),
            }
        })?;
        Ok(PcapReader::Legacy {
            reader,
            linktype: None,
        })
    } else {
        Err(PcapSourceError::UnknownMagic { magic })
    }
}

/// Captured bytes only, whatever padding the block format adds.
fn captured(data: &[u8], caplen: u32) -> Vec<u8> {
    let len = usize::try_from(caplen).unwrap_or(usize::MAX).min(data.len());
    data[..len].to_vec()
}

fn legacy_event(block: PcapBlockOwned<'_>, linktype: &mut Option<Linktype>) -> Option<PacketEvent> {
    match block {
        PcapBlockOwned::LegacyHeader(header) => {
            *linktype = Some(header.network);
            None
        }
        PcapBlockOwned::Legacy(packet) => Some(PacketEvent {
            ts: Some(legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec)),
            linktype: linktype.unwrap_or(layout::FALLBACK_LINKTYPE),
            data: captured(packet.data, packet.caplen),
            orig_len: packet.origlen,
        }),
        _ => None,
    }
}

fn ng_event(block: PcapBlockOwned<'_>, linktypes: &mut Vec<Linktype>) -> Option<PacketEvent> {
    match block {
        PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
            linktypes.push(intf.linktype);
            None
        }
        PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => Some(PacketEvent {
            ts: Some(pcapng_ts_to_seconds(packet.ts_high, packet.ts_low)),
            linktype: linktype_for_interface(linktypes, packet.if_id),
            data: captured(packet.data, packet.caplen),
            orig_len: packet.origlen,
        }),
        _ => None,
    }
}

enum Step {
    Packet(PacketEvent),
    Skip,
    Eof,
}

/// Error contexts for one reader flavour.
struct Contexts {
    next: &'static str,
    refill: &'static str,
}

const LEGACY: Contexts = Contexts {
    next: "pcap reader next",
    refill: "pcap reader refill",
};
const NG: Contexts = Contexts {
    next: "pcapng reader next",
    refill: "pcapng reader refill",
};

fn step<R: PcapReaderIterator>(
    reader: &mut R,
    contexts: &Contexts,
    mut on_block: impl FnMut(PcapBlockOwned<'_>) -> Option<PacketEvent>,
) -> Result<Step, PcapSourceError> {
    match reader.next() {
        Ok((offset, block)) => {
            let event = on_block(block);
            reader.consume(offset);
            Ok(event.map_or(Step::Skip, Step::Packet))
        }
        Err(PcapError::Eof) => Ok(Step::Eof),
        Err(PcapError::Incomplete(_)) => {
            reader.refill().map_err(|e| PcapSourceError::Pcap {
                context: contexts.refill,
                message: e.to_string(),
            })?;
            Ok(Step::Skip)
        }
        Err(e) => Err(PcapSourceError::Pcap {
            context: contexts.next,
            message: e.to_string(),
        }),
    }
}

fn next_packet(reader: &mut PcapReader) -> Result<Option<PacketEvent>, PcapSourceError> {
    loop {
        let step = match reader {
            PcapReader::Legacy { reader, linktype } => {
                step(reader, &LEGACY, |block| legacy_event(block, linktype))?
            }
            PcapReader::Ng { reader, linktypes } => {
                step(reader, &NG, |block| ng_event(block, linktypes))?
            }
        };
        match step {
            Step::Packet(event) => return Ok(Some(event)),
            Step::Skip => {}
            Step::Eof => return Ok(None),
        }
    }
}
