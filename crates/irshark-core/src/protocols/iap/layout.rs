/// Control byte: last frame of the request or result.
pub const LST_BIT: u8 = 0x80;
/// Control byte: acknowledgement of a multi-frame exchange.
pub const ACK_BIT: u8 = 0x40;
pub const OPCODE_MASK: u8 = 0x3F;

pub const GET_INFO_BASE_DETAILS: u8 = 0x01;
pub const GET_OBJECTS: u8 = 0x02;
pub const GET_VALUE: u8 = 0x03;
pub const GET_VALUE_BY_CLASS: u8 = 0x04;
pub const GET_OBJECT_INFO: u8 = 0x05;
pub const GET_ATTRIBUTE_NAMES: u8 = 0x06;

pub const OPCODES: &[(u8, &str)] = &[
    (GET_INFO_BASE_DETAILS, "GetInfoBaseDetails"),
    (GET_OBJECTS, "GetObjects"),
    (GET_VALUE, "GetValue"),
    (GET_VALUE_BY_CLASS, "GetValueByClass"),
    (GET_OBJECT_INFO, "GetObjectInfo"),
    (GET_ATTRIBUTE_NAMES, "GetAttributeNames"),
];

/// Longest class or attribute name read from a query.
pub const MAX_NAME_LEN: usize = 60;

pub const RETURN_SUCCESS: u8 = 0;
pub const RETURN_CODES: &[(u8, &str)] = &[
    (RETURN_SUCCESS, "Success"),
    (1, "No such class"),
    (2, "No such attribute"),
    (3, "Attribute list too long"),
    (10, "Disconnect (Linux-IrDA only)"),
    (255, "Not supported"),
];

pub const TYPE_MISSING: u8 = 0;
pub const TYPE_INTEGER: u8 = 1;
pub const TYPE_OCTET_SEQUENCE: u8 = 2;
pub const TYPE_USER_STRING: u8 = 3;

pub const ATTRIBUTE_TYPES: &[(u8, &str)] = &[
    (TYPE_MISSING, "Missing"),
    (TYPE_INTEGER, "Integer"),
    (TYPE_OCTET_SEQUENCE, "Octet Sequence"),
    (TYPE_USER_STRING, "String"),
];

pub const CHARSET_ASCII: u8 = 0x00;
pub const CHARSET_UNICODE: u8 = 0xFF;

/// IrLMPSupport octet sequence: version, IAS support, LM-MUX support.
pub const IAS_SUPPORT: &[(u32, &str)] = &[
    (0x01, "GetInfoBaseDetails"),
    (0x02, "GetObjects"),
    (0x04, "GetValue"),
    (0x08, "GetValueByClass"),
    (0x10, "GetObjectInfo"),
    (0x20, "GetAttributeNames"),
];

pub const MUX_SUPPORT: &[(u32, &str)] = &[(0x01, "Exclusive Mode"), (0x02, "Connectionless Data")];

pub const CLASS_DEVICE: &str = "Device";
pub const ATTR_DEVICE_NAME: &str = "DeviceName";
pub const ATTR_IRLMP_SUPPORT: &str = "IrLMPSupport";
