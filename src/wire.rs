//! Length-checked primitives for extracting and inserting wire fields.
//!
//! All multi-byte integers on the 1905.1 wire are network (big-endian) order.
//! The extract helpers operate on a [`Buf`] cursor: on success the cursor
//! advances past the field, on failure ([`CodecError::Truncated`]) the cursor
//! is left untouched.

use crate::addr::MacAddress;
use crate::error::CodecError;
use bytes::{Buf, BufMut, Bytes};

macro_rules! ensure_remaining {
    ($buf:expr, $len:expr) => {
        if $buf.remaining() < $len {
            return Err(crate::error::CodecError::Truncated);
        }
    };
}
pub(crate) use ensure_remaining;

pub(crate) fn read_u8<T: Buf>(buf: &mut T) -> Result<u8, CodecError> {
    ensure_remaining!(buf, 1);
    Ok(buf.get_u8())
}

pub(crate) fn read_u16<T: Buf>(buf: &mut T) -> Result<u16, CodecError> {
    ensure_remaining!(buf, 2);
    Ok(buf.get_u16())
}

pub(crate) fn read_u32<T: Buf>(buf: &mut T) -> Result<u32, CodecError> {
    ensure_remaining!(buf, 4);
    Ok(buf.get_u32())
}

pub(crate) fn read_mac<T: Buf>(buf: &mut T) -> Result<MacAddress, CodecError> {
    Ok(MacAddress(read_array(buf)?))
}

pub(crate) fn read_array<T: Buf, const N: usize>(buf: &mut T) -> Result<[u8; N], CodecError> {
    ensure_remaining!(buf, N);
    let mut out = [0u8; N];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

pub(crate) fn read_bytes<T: Buf>(buf: &mut T, len: usize) -> Result<Bytes, CodecError> {
    ensure_remaining!(buf, len);
    Ok(buf.copy_to_bytes(len))
}

pub(crate) fn put_mac<T: BufMut>(buf: &mut T, mac: &MacAddress) {
    buf.put_slice(&mac.0);
}

/// Write a list-length field that must fit in one octet.
pub(crate) fn put_u8_count<T: BufMut>(
    buf: &mut T,
    count: usize,
    field: &'static str,
) -> Result<(), CodecError> {
    let n = u8::try_from(count).map_err(|_| CodecError::InvalidField {
        field,
        value: count as u32,
    })?;
    buf.put_u8(n);
    Ok(())
}

/// Write a list-length field that must fit in two octets.
pub(crate) fn put_u16_count<T: BufMut>(
    buf: &mut T,
    count: usize,
    field: &'static str,
) -> Result<(), CodecError> {
    let n = u16::try_from(count).map_err(|_| CodecError::InvalidField {
        field,
        value: count as u32,
    })?;
    buf.put_u16(n);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{Bytes, BytesMut};

    #[test]
    fn reads_are_network_order() {
        let mut buf = Bytes::from_static(&[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(read_u16(&mut buf).unwrap(), 0x1234);
        assert_eq!(read_u16(&mut buf).unwrap(), 0x5678);
    }

    #[test]
    fn short_read_leaves_cursor_in_place() {
        let mut buf = Bytes::from_static(&[0xaa]);
        assert_eq!(read_u16(&mut buf), Err(CodecError::Truncated));
        assert_eq!(read_u8(&mut buf).unwrap(), 0xaa);
    }

    #[test]
    fn mac_round_trip() {
        let mac = MacAddress([1, 2, 3, 4, 5, 6]);
        let mut out = BytesMut::new();
        put_mac(&mut out, &mac);
        let mut buf = out.freeze();
        assert_eq!(read_mac(&mut buf).unwrap(), mac);
        assert!(!buf.has_remaining());
    }
}
