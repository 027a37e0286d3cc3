use std::ops::Range;

/// Linux cooked pseudo-header in front of every IrDA record.
pub const HEADER_LEN: usize = 16;
pub const PACKET_TYPE_RANGE: Range<usize> = 0..2;
pub const PROTOCOL_RANGE: Range<usize> = 14..16;

/// Any other packet type (0 in practice) is an incoming frame.
pub const PACKET_OUTGOING: u16 = 0x0004;
pub const PACKET_LOG_MESSAGE: u16 = 0x0100;
pub const PACKET_MISSED_MESSAGES: u16 = 0x0101;

/// `ETH_P_IRDA`.
pub const PROTOCOL_IRDA: u16 = 0x0017;
