/// Connect PDUs: parameters follow the credit byte.
pub const PARAMETERS_BIT: u8 = 0x80;
/// Data PDUs: more segments of the same SDU follow.
pub const MORE_BIT: u8 = 0x80;
pub const CREDIT_MASK: u8 = 0x7F;

pub const PI_MAX_SDU_SIZE: u8 = 0x01;
