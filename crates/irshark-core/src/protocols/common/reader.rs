use super::error::DecodeError;

/// Bounds-checked cursor over one captured frame.
///
/// Offsets are absolute within the frame, including for readers narrowed with
/// [`FrameReader::sub_reader`], so every layer reports positions on the same
/// axis.
#[derive(Debug, Clone)]
pub struct FrameReader<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
        }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.end
    }

    pub fn require(&self, needed: usize) -> Result<(), DecodeError> {
        if self.remaining() < needed {
            return Err(DecodeError::BufferUnderrun {
                offset: self.pos,
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        self.require(1)?;
        Ok(self.data[self.pos])
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let value = self.peek_u8()?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_array::<2>()?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_array::<4>()?;
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_array::<4>()?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.require(len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read `declared` bytes announced by a length prefix.
    ///
    /// Unlike [`FrameReader::read_bytes`], a short buffer is reported as
    /// `MalformedLength` for `field`, and nothing is consumed.
    pub fn read_declared(
        &mut self,
        field: &'static str,
        declared: usize,
    ) -> Result<&'a [u8], DecodeError> {
        if declared > self.remaining() {
            return Err(DecodeError::MalformedLength {
                field,
                offset: self.pos,
                declared,
                available: self.remaining(),
            });
        }
        self.read_bytes(declared)
    }

    /// Consume everything up to the end of this reader.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.pos..self.end];
        self.pos = self.end;
        bytes
    }

    /// Split off the next `declared` bytes as a reader of their own.
    pub fn sub_reader(
        &mut self,
        field: &'static str,
        declared: usize,
    ) -> Result<FrameReader<'a>, DecodeError> {
        let start = self.pos;
        self.read_declared(field, declared)?;
        Ok(FrameReader {
            data: self.data,
            pos: start,
            end: start + declared,
        })
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}
