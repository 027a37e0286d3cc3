use super::error::IrdaHeaderError;
use super::layout;

pub struct IrdaHeaderReader<'a> {
    data: &'a [u8],
}

impl<'a> IrdaHeaderReader<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, IrdaHeaderError> {
        if data.len() < layout::HEADER_LEN {
            return Err(IrdaHeaderError::TooShort {
                needed: layout::HEADER_LEN,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }

    fn read_u16_be(&self, range: std::ops::Range<usize>) -> u16 {
        let bytes = &self.data[range];
        u16::from_be_bytes([bytes[0], bytes[1]])
    }

    pub fn packet_type(&self) -> u16 {
        self.read_u16_be(layout::PACKET_TYPE_RANGE)
    }

    pub fn protocol(&self) -> u16 {
        self.read_u16_be(layout::PROTOCOL_RANGE)
    }

    /// Everything after the pseudo-header.
    pub fn payload(&self) -> &'a [u8] {
        &self.data[layout::HEADER_LEN..]
    }
}

#[cfg(test)]
mod tests {
    use super::IrdaHeaderReader;
    use crate::analysis::irda_header::error::IrdaHeaderError;

    #[test]
    fn reads_big_endian_fields() {
        let mut data = vec![0u8; 18];
        data[1] = 0x04;
        data[15] = 0x17;
        data[16] = 0xff;
        let reader = IrdaHeaderReader::new(&data).unwrap();
        assert_eq!(reader.packet_type(), 4);
        assert_eq!(reader.protocol(), 0x17);
        assert_eq!(reader.payload(), &[0xff, 0x00]);
    }

    #[test]
    fn short_header() {
        let err = IrdaHeaderReader::new(&[0u8; 15]).err().unwrap();
        assert_eq!(err, IrdaHeaderError::TooShort { needed: 16, actual: 15 });
    }
}
