use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::FieldVisitor;
use crate::wire;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Non-1905 neighbor device list TLV ("IEEE Std 1905.1-2013, Section 6.4.8"):
/// stations behind a local interface that do not speak 1905.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Non1905NeighborDeviceList {
    pub local_mac_address: MacAddress,
    pub non_1905_neighbors: Vec<MacAddress>,
}

impl Non1905NeighborDeviceList {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        // The body length must be 6 + 6*n.
        if body.remaining() < 6 || (body.remaining() - 6) % 6 != 0 {
            return Err(CodecError::LengthMismatch("NON_1905_NEIGHBOR_DEVICE_LIST"));
        }
        let local_mac_address = wire::read_mac(body)?;
        let mut non_1905_neighbors = Vec::with_capacity(body.remaining() / 6);
        while body.has_remaining() {
            non_1905_neighbors.push(wire::read_mac(body)?);
        }
        Ok(Non1905NeighborDeviceList {
            local_mac_address,
            non_1905_neighbors,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_mac(out, &self.local_mac_address);
        for mac in &self.non_1905_neighbors {
            wire::put_mac(out, mac);
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "local_mac_address", self.local_mac_address.to_string());
        emit(
            prefix,
            "non_1905_neighbors_nr",
            format!("{}", self.non_1905_neighbors.len()),
        );
        for (i, mac) in self.non_1905_neighbors.iter().enumerate() {
            emit(prefix, &format!("non_1905_neighbors[{i}]"), mac.to_string());
        }
    }
}

/// 1905 neighbor device list TLV ("IEEE Std 1905.1-2013, Section 6.4.9").
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NeighborDeviceList {
    pub local_mac_address: MacAddress,
    pub neighbors: Vec<NeighborEntry>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NeighborEntry {
    /// AL MAC address of the 1905 neighbor.
    pub mac_address: MacAddress,
    /// Set when at least one non-1905 bridge sits between the reporting
    /// interface and this neighbor.
    pub bridge_flag: bool,
}

impl NeighborDeviceList {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        // The body length must be 6 + 7*n.
        if body.remaining() < 6 || (body.remaining() - 6) % 7 != 0 {
            return Err(CodecError::LengthMismatch("NEIGHBOR_DEVICE_LIST"));
        }
        let local_mac_address = wire::read_mac(body)?;
        let mut neighbors = Vec::with_capacity(body.remaining() / 7);
        while body.has_remaining() {
            let mac_address = wire::read_mac(body)?;
            let flags = wire::read_u8(body)?;
            neighbors.push(NeighborEntry {
                mac_address,
                bridge_flag: flags & 0x80 != 0,
            });
        }
        Ok(NeighborDeviceList {
            local_mac_address,
            neighbors,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_mac(out, &self.local_mac_address);
        for neighbor in &self.neighbors {
            wire::put_mac(out, &neighbor.mac_address);
            out.put_u8(if neighbor.bridge_flag { 0x80 } else { 0x00 });
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "local_mac_address", self.local_mac_address.to_string());
        emit(prefix, "neighbors_nr", format!("{}", self.neighbors.len()));
        for (i, neighbor) in self.neighbors.iter().enumerate() {
            let p = format!("{prefix}neighbors[{i}]->");
            emit(&p, "mac_address", neighbor.mac_address.to_string());
            emit(&p, "bridge_flag", format!("{}", neighbor.bridge_flag as u8));
        }
    }
}
