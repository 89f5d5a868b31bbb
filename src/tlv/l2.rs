use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::FieldVisitor;
use crate::wire;
use bytes::{Buf, Bytes, BytesMut};

/// L2 neighbor device TLV ("IEEE Std 1905.1-2013, Section 6.4.31"): for each
/// local interface, the L2 neighbors heard on it and the stations observed
/// behind each of those neighbors.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct L2NeighborDevice {
    pub local_interfaces: Vec<L2InterfaceEntry>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct L2InterfaceEntry {
    pub local_mac_address: MacAddress,
    pub l2_neighbors: Vec<L2NeighborEntry>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct L2NeighborEntry {
    pub l2_neighbor_mac_address: MacAddress,
    pub behind_mac_addresses: Vec<MacAddress>,
}

impl L2NeighborDevice {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        if !body.has_remaining() {
            // Legacy zero-length empty-list encoding.
            if cfg!(feature = "fix-broken-tlvs") {
                return Ok(L2NeighborDevice::default());
            }
            return Err(CodecError::LengthMismatch("L2_NEIGHBOR_DEVICE"));
        }
        let interfaces_nr = wire::read_u8(body)?;
        let mut local_interfaces = Vec::with_capacity(interfaces_nr as usize);
        for _ in 0..interfaces_nr {
            let local_mac_address = wire::read_mac(body)?;
            let neighbors_nr = wire::read_u16(body)?;
            let mut l2_neighbors = Vec::with_capacity(neighbors_nr as usize);
            for _ in 0..neighbors_nr {
                let l2_neighbor_mac_address = wire::read_mac(body)?;
                let behind_nr = wire::read_u16(body)?;
                let mut behind_mac_addresses = Vec::with_capacity(behind_nr as usize);
                for _ in 0..behind_nr {
                    behind_mac_addresses.push(wire::read_mac(body)?);
                }
                l2_neighbors.push(L2NeighborEntry {
                    l2_neighbor_mac_address,
                    behind_mac_addresses,
                });
            }
            local_interfaces.push(L2InterfaceEntry {
                local_mac_address,
                l2_neighbors,
            });
        }
        Ok(L2NeighborDevice { local_interfaces })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(out, self.local_interfaces.len(), "local_interfaces_nr")?;
        for intf in &self.local_interfaces {
            wire::put_mac(out, &intf.local_mac_address);
            wire::put_u16_count(out, intf.l2_neighbors.len(), "l2_neighbors_nr")?;
            for neighbor in &intf.l2_neighbors {
                wire::put_mac(out, &neighbor.l2_neighbor_mac_address);
                wire::put_u16_count(
                    out,
                    neighbor.behind_mac_addresses.len(),
                    "behind_mac_addresses_nr",
                )?;
                for mac in &neighbor.behind_mac_addresses {
                    wire::put_mac(out, mac);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(
            prefix,
            "local_interfaces_nr",
            format!("{}", self.local_interfaces.len()),
        );
        for (i, intf) in self.local_interfaces.iter().enumerate() {
            let p = format!("{prefix}local_interfaces[{i}]->");
            emit(&p, "local_mac_address", intf.local_mac_address.to_string());
            for (j, neighbor) in intf.l2_neighbors.iter().enumerate() {
                let p = format!("{p}l2_neighbors[{j}]->");
                emit(
                    &p,
                    "l2_neighbor_mac_address",
                    neighbor.l2_neighbor_mac_address.to_string(),
                );
                for (k, mac) in neighbor.behind_mac_addresses.iter().enumerate() {
                    emit(&p, &format!("behind_mac_addresses[{k}]"), mac.to_string());
                }
            }
        }
    }
}
