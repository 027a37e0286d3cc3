use super::error::DecodeError;
use super::reader::FrameReader;
use super::tree::{ListKind, Output, SubtreeId};
use super::{bit_names, hex_string};

/// One `(PI, PL, PV)` parameter tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamTuple<'a> {
    pub offset: usize,
    pub pi: u8,
    pub pl: u8,
    pub pv: &'a [u8],
}

impl ParamTuple<'_> {
    /// PV as a little-endian integer (IrLAP bit masks). Only the first four
    /// bytes contribute.
    pub fn value_le(&self) -> u32 {
        self.pv
            .iter()
            .take(4)
            .enumerate()
            .fold(0u32, |acc, (idx, byte)| acc | (u32::from(*byte) << (8 * idx)))
    }

    /// PV as a big-endian integer (IrCOMM and TTP values).
    pub fn value_be(&self) -> u32 {
        self.pv
            .iter()
            .take(4)
            .fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte))
    }

    /// Total encoded size of the tuple.
    pub fn encoded_len(&self) -> usize {
        2 + self.pv.len()
    }
}

/// Read the next tuple. PL is checked against the remaining bytes before PV
/// is taken.
pub fn read_tuple<'a>(reader: &mut FrameReader<'a>) -> Result<ParamTuple<'a>, DecodeError> {
    let offset = reader.offset();
    let pi = reader.read_u8()?;
    let pl = reader.read_u8()?;
    let pv = reader.read_declared("parameter value", usize::from(pl))?;
    Ok(ParamTuple { offset, pi, pl, pv })
}

/// Iterator over a tuple stream; yields at most one error, then stops.
pub struct Tuples<'r, 'a> {
    reader: &'r mut FrameReader<'a>,
    failed: bool,
}

pub fn tuples<'r, 'a>(reader: &'r mut FrameReader<'a>) -> Tuples<'r, 'a> {
    Tuples {
        reader,
        failed: false,
    }
}

impl<'a> Iterator for Tuples<'_, 'a> {
    type Item = Result<ParamTuple<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_empty() {
            return None;
        }
        let item = read_tuple(self.reader);
        self.failed = item.is_err();
        Some(item)
    }
}

/// Names and renders the parameters one layer knows about.
pub trait ParamSchema {
    const KIND: ListKind;

    fn name(pi: u8) -> Option<&'static str>;

    /// Human-readable rendering of a known parameter's value.
    fn describe(tuple: &ParamTuple<'_>) -> Option<String>;
}

/// Render every tuple left in `reader`. A malformed tuple ends the stream and
/// consumes the rest of the reader. Returns the number of complete tuples.
pub fn dissect_tuples<S: ParamSchema>(reader: &mut FrameReader<'_>, out: &mut Output) -> usize {
    let mut count = 0;
    let mut stream = tuples(reader);
    while let Some(item) = stream.next() {
        match item {
            Ok(tuple) => {
                render_tuple::<S>(&tuple, count, out);
                count += 1;
            }
            Err(err) => {
                let offset = stream.reader.offset();
                let rest = stream.reader.read_rest();
                out.malformed(offset, rest.len(), &err);
            }
        }
    }
    count
}

fn render_tuple<S: ParamSchema>(tuple: &ParamTuple<'_>, index: usize, out: &mut Output) {
    let label = match (S::name(tuple.pi), S::describe(tuple)) {
        (Some(name), Some(text)) => format!("{name}: {text}"),
        (Some(name), None) => name.to_string(),
        (None, _) => format!("Parameter 0x{:02x}", tuple.pi),
    };
    out.open_subtree(label, tuple.offset, Some(SubtreeId::new(S::KIND, index)));
    out.add("Parameter Identifier", tuple.offset, 1, format_args!("0x{:02x}", tuple.pi));
    out.add("Parameter Length", tuple.offset + 1, 1, tuple.pl);
    out.add(
        "Parameter Value",
        tuple.offset + 2,
        tuple.pv.len(),
        hex_string(tuple.pv),
    );
    out.close_subtree(tuple.offset + tuple.encoded_len());
}

/// Describe a bit-mask parameter against its table.
pub fn describe_mask(tuple: &ParamTuple<'_>, table: &[(u32, &str)]) -> Option<String> {
    bit_names(tuple.value_le(), table)
}

#[cfg(test)]
mod tests {
    use super::{ParamSchema, ParamTuple, dissect_tuples, read_tuple, tuples};
    use crate::protocols::common::error::DecodeError;
    use crate::protocols::common::reader::FrameReader;
    use crate::protocols::common::tree::{DetailLevel, ListKind, Output};

    struct Plain;

    impl ParamSchema for Plain {
        const KIND: ListKind = ListKind::NegotiationParameter;

        fn name(pi: u8) -> Option<&'static str> {
            (pi == 0x01).then_some("Known")
        }

        fn describe(tuple: &ParamTuple<'_>) -> Option<String> {
            Some(format!("{}", tuple.value_le()))
        }
    }

    fn encode(tuples: &[(u8, Vec<u8>)]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (pi, pv) in tuples {
            bytes.push(*pi);
            bytes.push(pv.len() as u8);
            bytes.extend_from_slice(pv);
        }
        bytes
    }

    #[test]
    fn well_formed_tuples_never_report_malformed_length() {
        for len in 0..=24usize {
            let pv: Vec<u8> = (0..len as u8).collect();
            let bytes = encode(&[(0x42, pv.clone()), (0x01, vec![0x04]), (0xff, pv)]);
            let mut reader = FrameReader::new(&bytes);
            let decoded: Result<Vec<_>, DecodeError> = tuples(&mut reader).collect();
            let decoded = decoded.unwrap();
            assert_eq!(decoded.len(), 3);
            assert_eq!(decoded[0].pv.len(), len);
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn length_past_end_is_malformed() {
        let bytes = [0x01, 0x05, 0xAA];
        let mut reader = FrameReader::new(&bytes);
        let err = read_tuple(&mut reader).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedLength { declared: 5, available: 1, .. }));
    }

    #[test]
    fn dissect_marks_truncated_tail_and_keeps_earlier_tuples() {
        let bytes = [0x01, 0x01, 0x04, 0x09, 0x03, 0x00];
        let mut reader = FrameReader::new(&bytes);
        let mut out = Output::new(DetailLevel::Full);
        let count = dissect_tuples::<Plain>(&mut reader, &mut out);
        assert_eq!(count, 1);
        assert!(reader.is_empty());
        let (_, _, fields, malformed) = out.into_parts(bytes.len());
        assert!(malformed);
        assert_eq!(fields[0].label, "Known: 4");
        assert_eq!(fields[0].len, 3);
        assert!(fields[1].malformed);
    }

    #[test]
    fn unknown_identifier_is_kept_opaque() {
        let bytes = [0x77, 0x02, 0xDE, 0xAD];
        let mut reader = FrameReader::new(&bytes);
        let mut out = Output::new(DetailLevel::Full);
        dissect_tuples::<Plain>(&mut reader, &mut out);
        let (_, _, fields, _) = out.into_parts(bytes.len());
        assert_eq!(fields[0].label, "Parameter 0x77");
        let value = fields[0].find("Parameter Value").unwrap();
        assert_eq!(value.value.as_deref(), Some("dead"));
    }

    #[test]
    fn integer_views() {
        let tuple = ParamTuple {
            offset: 0,
            pi: 0x01,
            pl: 2,
            pv: &[0x01, 0x02],
        };
        assert_eq!(tuple.value_le(), 0x0201);
        assert_eq!(tuple.value_be(), 0x0102);
    }
}
