use pcap_parser::Linktype;
use serde::{Deserialize, Serialize};

use crate::source::pcap::layout::LINKTYPE_IRDA;

use super::error::IrdaHeaderError;
use super::layout;
use super::reader::IrdaHeaderReader;

/// Direction of a captured frame relative to the capturing station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// One record of a Linux IrDA capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrdaRecord<'a> {
    Frame {
        direction: Direction,
        frame: &'a [u8],
    },
    /// Text the kernel logged into the capture.
    LogMessage(String),
    /// The capture lost records at this point.
    MissedMessages,
}

/// Strip the pseudo-header of an IrDA capture record.
///
/// Returns `Ok(None)` when the packet is not of the IrDA link type.
pub fn parse_irda_packet(
    linktype: Linktype,
    data: &[u8],
) -> Result<Option<IrdaRecord<'_>>, IrdaHeaderError> {
    if linktype != LINKTYPE_IRDA {
        return Ok(None);
    }
    let reader = IrdaHeaderReader::new(data)?;
    let record = match reader.packet_type() {
        layout::PACKET_LOG_MESSAGE => {
            let text = String::from_utf8_lossy(reader.payload());
            IrdaRecord::LogMessage(text.trim_end_matches(['\0', '\n', '\r']).to_string())
        }
        layout::PACKET_MISSED_MESSAGES => IrdaRecord::MissedMessages,
        packet_type => {
            let protocol = reader.protocol();
            if protocol != layout::PROTOCOL_IRDA {
                return Err(IrdaHeaderError::UnexpectedProtocol(protocol));
            }
            let direction = if packet_type == layout::PACKET_OUTGOING {
                Direction::Outgoing
            } else {
                Direction::Incoming
            };
            IrdaRecord::Frame {
                direction,
                frame: reader.payload(),
            }
        }
    };
    Ok(Some(record))
}

#[cfg(test)]
mod tests {
    use super::{Direction, IrdaRecord, parse_irda_packet};
    use crate::analysis::irda_header::error::IrdaHeaderError;
    use crate::source::pcap::layout::LINKTYPE_IRDA;
    use pcap_parser::Linktype;

    fn record(packet_type: u16, protocol: u16, payload: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; 16];
        data[0..2].copy_from_slice(&packet_type.to_be_bytes());
        data[14..16].copy_from_slice(&protocol.to_be_bytes());
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn outgoing_frame() {
        let data = record(4, 0x17, &[0xff, 0x3f]);
        let parsed = parse_irda_packet(LINKTYPE_IRDA, &data).unwrap();
        assert_eq!(
            parsed,
            Some(IrdaRecord::Frame {
                direction: Direction::Outgoing,
                frame: &[0xff, 0x3f],
            })
        );
    }

    #[test]
    fn incoming_frame() {
        let data = record(0, 0x17, &[0x02, 0x73]);
        let parsed = parse_irda_packet(LINKTYPE_IRDA, &data).unwrap().unwrap();
        assert!(matches!(
            parsed,
            IrdaRecord::Frame {
                direction: Direction::Incoming,
                ..
            }
        ));
    }

    #[test]
    fn log_and_missed_records() {
        let data = record(0x100, 0, b"irlap: discovery\n\0");
        let parsed = parse_irda_packet(LINKTYPE_IRDA, &data).unwrap();
        assert_eq!(parsed, Some(IrdaRecord::LogMessage("irlap: discovery".to_string())));

        let data = record(0x101, 0, &[]);
        let parsed = parse_irda_packet(LINKTYPE_IRDA, &data).unwrap();
        assert_eq!(parsed, Some(IrdaRecord::MissedMessages));
    }

    #[test]
    fn other_linktypes_are_ignored() {
        let data = record(0, 0x17, &[0x01]);
        assert_eq!(parse_irda_packet(Linktype::ETHERNET, &data).unwrap(), None);
    }

    #[test]
    fn wrong_protocol() {
        let data = record(0, 0x0800, &[0x01]);
        let err = parse_irda_packet(LINKTYPE_IRDA, &data).unwrap_err();
        assert_eq!(err, IrdaHeaderError::UnexpectedProtocol(0x0800));
    }
}
