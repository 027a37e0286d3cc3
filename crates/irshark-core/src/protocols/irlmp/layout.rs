/// Destination byte: set on link-management control frames.
pub const CONTROL_BIT: u8 = 0x80;
pub const LSAP_MASK: u8 = 0x7F;

/// LSAP selector of the Information Access Service.
pub const IAS_LSAP: u8 = 0x00;
pub const FIRST_APPLICATION_LSAP: u8 = 0x01;
pub const LAST_APPLICATION_LSAP: u8 = 0x6F;

pub const HEADER_LEN: usize = 2;

pub const CONNECT_CMD: u8 = 0x01;
pub const CONNECT_CNF: u8 = 0x81;
pub const DISCONNECT: u8 = 0x02;
pub const ACCESS_MODE_CMD: u8 = 0x03;
pub const ACCESS_MODE_CNF: u8 = 0x83;

pub const DISCONNECT_REASONS: &[(u8, &str)] = &[
    (0x01, "User request"),
    (0x02, "Unexpected IrLAP disconnect"),
    (0x03, "Failed to establish IrLAP connection"),
    (0x04, "IrLAP reset"),
    (0x05, "Link management initiated disconnect"),
    (0x06, "Data delivered on disconnected LSAP-connection"),
    (0x07, "Non responsive LM-MUX client"),
    (0x08, "No available LM-MUX client"),
    (0x09, "Connection half open"),
    (0x0A, "Illegal source address"),
    (0xFF, "Unspecified disconnect reason"),
];

pub const ACCESS_MODE_STATUS: &[(u8, &str)] = &[
    (0x00, "Success"),
    (0x01, "Failure"),
    (0xFF, "Unsupported"),
];

pub const ACCESS_MODES: &[(u8, &str)] = &[(0x00, "Multiplexed"), (0x01, "Exclusive")];
