//! The binary wire codec: zigzag varints, booleans, IEEE-754 little-endian
//! floats and length-prefixed byte runs. Everything above this layer
//! dispatches on schema tags; everything below it is a `Read` or `Write`.

use crate::error::{read_failed, AvroliteErr, AvroliteResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use integer_encoding::VarIntWriter;
use std::io::{Read, Write};

/// Maximum encoded width of an `int` zigzag varint.
pub(crate) const MAX_VARINT_BYTES_INT: usize = 5;
/// Maximum encoded width of a `long` zigzag varint.
pub(crate) const MAX_VARINT_BYTES_LONG: usize = 10;

pub(crate) fn encode_int<W: Write>(value: i32, writer: &mut W) -> AvroliteResult<usize> {
    writer.write_varint(value).map_err(AvroliteErr::EncodeFailed)
}

pub(crate) fn encode_long<W: Write>(value: i64, writer: &mut W) -> AvroliteResult<usize> {
    writer.write_varint(value).map_err(AvroliteErr::EncodeFailed)
}

pub(crate) fn read_u8<R: Read>(reader: &mut R) -> AvroliteResult<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf).map_err(read_failed)?;
    Ok(buf[0])
}

// Accumulates 7-bit groups, low group first, until a byte with the high bit
// clear. Group ten of a long may only carry the top bit of the value.
fn decode_varint<R: Read>(reader: &mut R, max_bytes: usize) -> AvroliteResult<u64> {
    let mut acc: u64 = 0;
    for i in 0..max_bytes {
        let byte = read_u8(reader)?;
        let group = u64::from(byte & 0x7f);
        if i == 9 && group > 1 {
            return Err(AvroliteErr::VarintRange);
        }
        acc |= group << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(acc);
        }
    }
    Err(AvroliteErr::VarintTooLong { max: max_bytes })
}

pub(crate) fn decode_int<R: Read>(reader: &mut R) -> AvroliteResult<i32> {
    let unsigned = decode_varint(reader, MAX_VARINT_BYTES_INT)?;
    if unsigned > u64::from(u32::MAX) {
        return Err(AvroliteErr::VarintRange);
    }
    let unsigned = unsigned as u32;
    Ok(((unsigned >> 1) as i32) ^ -((unsigned & 1) as i32))
}

pub(crate) fn decode_long<R: Read>(reader: &mut R) -> AvroliteResult<i64> {
    let unsigned = decode_varint(reader, MAX_VARINT_BYTES_LONG)?;
    Ok(((unsigned >> 1) as i64) ^ -((unsigned & 1) as i64))
}

pub(crate) fn encode_bool<W: Write>(value: bool, writer: &mut W) -> AvroliteResult<()> {
    writer
        .write_all(&[value as u8])
        .map_err(AvroliteErr::EncodeFailed)
}

pub(crate) fn decode_bool<R: Read>(reader: &mut R) -> AvroliteResult<bool> {
    match read_u8(reader)? {
        0x00 => Ok(false),
        0x01 => Ok(true),
        other => Err(AvroliteErr::InvalidBoolean(other)),
    }
}

pub(crate) fn encode_float<W: Write>(value: f32, writer: &mut W) -> AvroliteResult<()> {
    writer
        .write_f32::<LittleEndian>(value)
        .map_err(AvroliteErr::EncodeFailed)
}

pub(crate) fn decode_float<R: Read>(reader: &mut R) -> AvroliteResult<f32> {
    reader.read_f32::<LittleEndian>().map_err(read_failed)
}

pub(crate) fn encode_double<W: Write>(value: f64, writer: &mut W) -> AvroliteResult<()> {
    writer
        .write_f64::<LittleEndian>(value)
        .map_err(AvroliteErr::EncodeFailed)
}

pub(crate) fn decode_double<R: Read>(reader: &mut R) -> AvroliteResult<f64> {
    reader.read_f64::<LittleEndian>().map_err(read_failed)
}

pub(crate) fn encode_raw_bytes<W: Write>(value: &[u8], writer: &mut W) -> AvroliteResult<()> {
    writer.write_all(value).map_err(AvroliteErr::EncodeFailed)
}

pub(crate) fn encode_bytes<W: Write>(value: &[u8], writer: &mut W) -> AvroliteResult<()> {
    encode_long(value.len() as i64, writer)?;
    encode_raw_bytes(value, writer)
}

pub(crate) fn decode_len<R: Read>(reader: &mut R) -> AvroliteResult<usize> {
    let len = decode_long(reader)?;
    if len < 0 {
        return Err(AvroliteErr::NegativeLength(len));
    }
    Ok(len as usize)
}

pub(crate) fn decode_raw_bytes<R: Read>(reader: &mut R, len: usize) -> AvroliteResult<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| AvroliteErr::AllocationFailed)?;
    buf.resize(len, 0);
    reader.read_exact(&mut buf).map_err(read_failed)?;
    Ok(buf)
}

pub(crate) fn decode_bytes<R: Read>(reader: &mut R) -> AvroliteResult<Vec<u8>> {
    let len = decode_len(reader)?;
    decode_raw_bytes(reader, len)
}

pub(crate) fn decode_string<R: Read>(reader: &mut R) -> AvroliteResult<String> {
    let buf = decode_bytes(reader)?;
    String::from_utf8(buf).map_err(|_| AvroliteErr::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn int_bytes(value: i32) -> Vec<u8> {
        let mut buf = vec![];
        encode_int(value, &mut buf).unwrap();
        buf
    }

    fn long_bytes(value: i64) -> Vec<u8> {
        let mut buf = vec![];
        encode_long(value, &mut buf).unwrap();
        buf
    }

    #[test]
    fn zigzag_int_wire_format() {
        assert_eq!(int_bytes(0), [0x00]);
        assert_eq!(int_bytes(-1), [0x01]);
        assert_eq!(int_bytes(1), [0x02]);
        assert_eq!(int_bytes(64), [0x80, 0x01]);
        assert_eq!(long_bytes(3), [0x06]);
    }

    #[test]
    fn varint_round_trip_is_minimal() {
        for &value in &[0i32, -1, 1, 63, 64, -65, i32::MAX, i32::MIN] {
            let buf = int_bytes(value);
            // no trailing continuation byte
            assert_eq!(buf.last().unwrap() & 0x80, 0);
            assert_eq!(decode_int(&mut buf.as_slice()).unwrap(), value);
        }
        for &value in &[0i64, -1, 1 << 40, -(1 << 40), i64::MAX, i64::MIN] {
            let buf = long_bytes(value);
            assert_eq!(buf.last().unwrap() & 0x80, 0);
            assert_eq!(decode_long(&mut buf.as_slice()).unwrap(), value);
        }
    }

    #[test]
    fn extreme_varint_widths() {
        assert_eq!(int_bytes(i32::MIN).len(), MAX_VARINT_BYTES_INT);
        assert_eq!(long_bytes(i64::MIN).len(), MAX_VARINT_BYTES_LONG);
    }

    #[test]
    fn unterminated_int_varint_is_malformed() {
        let buf = [0x80u8; 6];
        let err = decode_int(&mut buf.as_slice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn int_varint_out_of_range() {
        // five full groups decode to more than 32 bits
        let buf = [0xff, 0xff, 0xff, 0xff, 0x7f];
        let err = decode_int(&mut buf.as_slice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn long_varint_tenth_group_overflow() {
        let buf = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f];
        assert!(decode_long(&mut buf.as_slice()).is_err());
        let buf = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        assert_eq!(decode_long(&mut buf.as_slice()).unwrap(), i64::MIN);
    }

    #[test]
    fn string_wire_format() {
        let mut buf = vec![];
        encode_bytes(b"foo", &mut buf).unwrap();
        assert_eq!(buf, [0x06, 0x66, 0x6f, 0x6f]);
        assert_eq!(decode_string(&mut buf.as_slice()).unwrap(), "foo");
    }

    #[test]
    fn bool_rejects_other_bytes() {
        assert!(!decode_bool(&mut [0x00u8].as_slice()).unwrap());
        assert!(decode_bool(&mut [0x01u8].as_slice()).unwrap());
        let err = decode_bool(&mut [0x02u8].as_slice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn negative_byte_length_is_malformed() {
        // zigzag -2 as a bytes length
        let buf = [0x03u8];
        let err = decode_bytes(&mut buf.as_slice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn truncated_body_is_malformed() {
        // length 3 but only two bytes follow
        let buf = [0x06, 0x61, 0x62];
        let err = decode_string(&mut buf.as_slice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn floats_are_little_endian() {
        let mut buf = vec![];
        encode_float(1.0f32, &mut buf).unwrap();
        assert_eq!(buf, [0x00, 0x00, 0x80, 0x3f]);
        assert_eq!(decode_float(&mut buf.as_slice()).unwrap(), 1.0);

        let mut buf = vec![];
        encode_double(5.0f64, &mut buf).unwrap();
        assert_eq!(decode_double(&mut buf.as_slice()).unwrap(), 5.0);
    }
}
