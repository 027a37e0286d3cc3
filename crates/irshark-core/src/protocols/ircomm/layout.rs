pub const CLASS_IRCOMM: &str = "IrDA:IrCOMM";
pub const CLASS_IRLPT: &str = "IrLPT";
pub const ATTR_PARAMETERS: &str = "Parameters";
pub const ATTR_TINYTP_LSAP_SEL: &str = "IrDA:TinyTP:LsapSel";
pub const ATTR_IRLMP_LSAP_SEL: &str = "IrDA:IrLMP:LsapSel";

pub const PI_SERVICE_TYPE: u8 = 0x00;
pub const PI_PORT_TYPE: u8 = 0x01;
pub const PI_PORT_NAME: u8 = 0x02;
pub const PI_DATA_RATE: u8 = 0x10;
pub const PI_DATA_FORMAT: u8 = 0x11;
pub const PI_FLOW_CONTROL: u8 = 0x12;
pub const PI_XON_XOFF: u8 = 0x13;
pub const PI_ENQ_ACK: u8 = 0x14;
pub const PI_LINE_STATUS: u8 = 0x15;
pub const PI_BREAK: u8 = 0x16;
pub const PI_DTE: u8 = 0x20;
pub const PI_DCE: u8 = 0x21;
pub const PI_POLL: u8 = 0x22;

pub const SERVICE_TYPES: &[(u32, &str)] = &[
    (0x01, "3-Wire raw"),
    (0x02, "3-Wire"),
    (0x04, "9-Wire"),
    (0x08, "Centronics"),
];

pub const PORT_TYPES: &[(u32, &str)] = &[(0x01, "Serial"), (0x02, "Parallel")];

pub const FLOW_CONTROL: &[(u32, &str)] = &[
    (0x01, "XON/XOFF on input"),
    (0x02, "XON/XOFF on output"),
    (0x04, "RTS/CTS on input"),
    (0x08, "RTS/CTS on output"),
    (0x10, "DSR/DTR on input"),
    (0x20, "DSR/DTR on output"),
    (0x40, "ENQ/ACK on input"),
    (0x80, "ENQ/ACK on output"),
];

pub const LINE_STATUS: &[(u32, &str)] = &[
    (0x02, "Overrun error"),
    (0x04, "Parity error"),
    (0x08, "Framing error"),
];

pub const DTE_LINE_SETTINGS: &[(u32, &str)] = &[
    (0x01, "Delta DTR"),
    (0x02, "Delta RTS"),
    (0x04, "DTR"),
    (0x08, "RTS"),
];

pub const DCE_LINE_SETTINGS: &[(u32, &str)] = &[
    (0x01, "Delta CTS"),
    (0x02, "Delta DSR"),
    (0x04, "Delta RI"),
    (0x08, "Delta CD"),
    (0x10, "CTS"),
    (0x20, "DSR"),
    (0x40, "RI"),
    (0x80, "CD"),
];

/// Data format byte.
pub const CHAR_LENGTH_MASK: u8 = 0x03;
pub const STOP_BITS_BIT: u8 = 0x04;
pub const PARITY_ENABLE_BIT: u8 = 0x08;
pub const PARITY_TYPE_SHIFT: u8 = 4;
pub const PARITY_TYPES: [&str; 4] = ["odd", "even", "mark", "space"];
