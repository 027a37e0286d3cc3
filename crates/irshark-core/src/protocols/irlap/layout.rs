/// Address byte: command/response bit.
pub const CR_BIT: u8 = 0x01;
/// Connection address reserved for broadcast.
pub const BROADCAST_ADDRESS: u8 = 0x7F;

/// Control byte: poll/final bit.
pub const PF_BIT: u8 = 0x10;
pub const I_FRAME_MASK: u8 = 0x01;
pub const FRAME_TYPE_MASK: u8 = 0x03;
pub const S_FRAME: u8 = 0x01;
pub const U_FRAME: u8 = 0x03;
pub const S_TYPE_MASK: u8 = 0x0F;
pub const U_MODIFIER_MASK: u8 = !PF_BIT;
pub const NR_SHIFT: u8 = 5;
pub const NS_SHIFT: u8 = 1;
pub const SEQ_MASK: u8 = 0x07;

pub const RR: u8 = 0x01;
pub const RNR: u8 = 0x05;
pub const REJ: u8 = 0x09;
pub const SREJ: u8 = 0x0D;

pub const SNRM: u8 = 0x83;
pub const DISC: u8 = 0x43;
pub const UA: u8 = 0x63;
pub const FRMR: u8 = 0x87;
pub const DM: u8 = 0x0F;
pub const UI: u8 = 0x03;
pub const XID_CMD: u8 = 0x2F;
pub const XID_RSP: u8 = 0xAF;
pub const TEST: u8 = 0xE3;

pub const STATION_ADDRESSES_LEN: usize = 8;
/// SNRM source + destination + connection address.
pub const SNRM_HEADER_LEN: usize = STATION_ADDRESSES_LEN + 1;
pub const FRMR_INFO_LEN: usize = 3;

pub const FRMR_FLAGS: &[(u32, &str)] = &[
    (0x01, "W: invalid control field"),
    (0x02, "X: information field not permitted"),
    (0x04, "Y: information field too long"),
    (0x08, "Z: invalid N(R)"),
];

/// Negotiation parameter identifiers.
pub const PI_BAUD_RATE: u8 = 0x01;
pub const PI_LINK_DISCONNECT: u8 = 0x08;
pub const PI_MAX_TURN_TIME: u8 = 0x82;
pub const PI_DATA_SIZE: u8 = 0x83;
pub const PI_WINDOW_SIZE: u8 = 0x84;
pub const PI_ADDITIONAL_BOFS: u8 = 0x85;
pub const PI_MIN_TURN_TIME: u8 = 0x86;

pub const BAUD_RATES: &[(u32, &str)] = &[
    (0x0001, "2400 bps"),
    (0x0002, "9600 bps"),
    (0x0004, "19200 bps"),
    (0x0008, "38400 bps"),
    (0x0010, "57600 bps"),
    (0x0020, "115200 bps"),
    (0x0040, "576000 bps"),
    (0x0080, "1152000 bps"),
    (0x0100, "4000000 bps"),
    (0x0200, "16000000 bps"),
];

pub const MAX_TURN_TIMES: &[(u32, &str)] = &[
    (0x01, "500 ms"),
    (0x02, "250 ms"),
    (0x04, "100 ms"),
    (0x08, "50 ms"),
    (0x10, "25 ms"),
    (0x20, "10 ms"),
    (0x40, "5 ms"),
];

pub const DATA_SIZES: &[(u32, &str)] = &[
    (0x01, "64 bytes"),
    (0x02, "128 bytes"),
    (0x04, "256 bytes"),
    (0x08, "512 bytes"),
    (0x10, "1024 bytes"),
    (0x20, "2048 bytes"),
];

pub const WINDOW_SIZES: &[(u32, &str)] = &[
    (0x01, "1 frame"),
    (0x02, "2 frames"),
    (0x04, "3 frames"),
    (0x08, "4 frames"),
    (0x10, "5 frames"),
    (0x20, "6 frames"),
    (0x40, "7 frames"),
];

pub const ADDITIONAL_BOFS: &[(u32, &str)] = &[
    (0x01, "48 BOFs"),
    (0x02, "24 BOFs"),
    (0x04, "12 BOFs"),
    (0x08, "5 BOFs"),
    (0x10, "3 BOFs"),
    (0x20, "2 BOFs"),
    (0x40, "1 BOF"),
    (0x80, "0 BOFs"),
];

pub const MIN_TURN_TIMES: &[(u32, &str)] = &[
    (0x01, "10 ms"),
    (0x02, "5 ms"),
    (0x04, "1 ms"),
    (0x08, "0.5 ms"),
    (0x10, "0.1 ms"),
    (0x20, "0.05 ms"),
    (0x40, "0.01 ms"),
    (0x80, "0 ms"),
];

pub const LINK_DISCONNECT_TIMES: &[(u32, &str)] = &[
    (0x01, "3 s"),
    (0x02, "8 s"),
    (0x04, "12 s"),
    (0x08, "16 s"),
    (0x10, "20 s"),
    (0x20, "25 s"),
    (0x40, "30 s"),
    (0x80, "40 s"),
];

/// XID discovery.
pub const XID_FORMAT_DISCOVERY: u8 = 0x01;
pub const XID_SLOTS_MASK: u8 = 0x03;
pub const XID_CONFLICT: u8 = 0x04;
pub const XID_SLOT_COUNTS: [u8; 4] = [1, 6, 8, 16];
pub const XID_FINAL_SLOT: u8 = 0xFF;
pub const HINT_EXTENSION: u8 = 0x80;

pub const HINTS_FIRST: &[(u32, &str)] = &[
    (0x01, "PnP Compatible"),
    (0x02, "PDA/Palmtop"),
    (0x04, "Computer"),
    (0x08, "Printer"),
    (0x10, "Modem"),
    (0x20, "Fax"),
    (0x40, "LAN Access"),
];

pub const HINTS_SECOND: &[(u32, &str)] = &[
    (0x01, "Telephony"),
    (0x02, "File Server"),
    (0x04, "IrCOMM"),
    (0x20, "OBEX"),
];

pub const CHARSET_ASCII: u8 = 0x00;
pub const CHARSET_UNICODE: u8 = 0xFF;
