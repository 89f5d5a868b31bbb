//! TLVs carried in higher-layer query responses.

use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::{printable_string, FieldVisitor};
use crate::wire;
use bytes::{Buf, BufMut, Bytes, BytesMut};

pub const IPV4_TYPE_UNKNOWN: u8 = 0;
pub const IPV4_TYPE_DHCP: u8 = 1;
pub const IPV4_TYPE_STATIC: u8 = 2;
pub const IPV4_TYPE_AUTOIP: u8 = 3;

pub const IPV6_TYPE_UNKNOWN: u8 = 0;
pub const IPV6_TYPE_DHCP: u8 = 1;
pub const IPV6_TYPE_STATIC: u8 = 2;
pub const IPV6_TYPE_SLAAC: u8 = 3;

/// Device identification type TLV ("IEEE Std 1905.1-2013, Section 6.4.22").
/// Three fixed 64-byte, zero-padded text fields.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DeviceIdentification {
    pub friendly_name: [u8; 64],
    pub manufacturer_name: [u8; 64],
    pub manufacturer_model: [u8; 64],
}

impl DeviceIdentification {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        if body.remaining() != 192 {
            return Err(CodecError::LengthMismatch("DEVICE_IDENTIFICATION"));
        }
        Ok(DeviceIdentification {
            friendly_name: wire::read_array(body)?,
            manufacturer_name: wire::read_array(body)?,
            manufacturer_model: wire::read_array(body)?,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        out.put_slice(&self.friendly_name);
        out.put_slice(&self.manufacturer_name);
        out.put_slice(&self.manufacturer_model);
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "friendly_name", printable_string(&self.friendly_name));
        emit(
            prefix,
            "manufacturer_name",
            printable_string(&self.manufacturer_name),
        );
        emit(
            prefix,
            "manufacturer_model",
            printable_string(&self.manufacturer_model),
        );
    }
}

/// Control URL type TLV ("IEEE Std 1905.1-2013, Section 6.4.23").
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ControlUrl {
    pub url: Bytes,
}

impl ControlUrl {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        Ok(ControlUrl {
            url: body.copy_to_bytes(body.remaining()),
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        out.extend_from_slice(&self.url);
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "url", printable_string(&self.url));
    }
}

/// IPv4 type TLV ("IEEE Std 1905.1-2013, Section 6.4.24").
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Ipv4 {
    pub ipv4_interfaces: Vec<Ipv4Interface>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ipv4Interface {
    pub mac_address: MacAddress,
    pub addresses: Vec<Ipv4Entry>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Ipv4Entry {
    /// How the address was obtained (one of the `IPV4_TYPE_*` values).
    pub kind: u8,
    pub address: [u8; 4],
    pub dhcp_server: [u8; 4],
}

impl Ipv4 {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        if !body.has_remaining() {
            // Legacy zero-length empty-list encoding.
            if cfg!(feature = "fix-broken-tlvs") {
                return Ok(Ipv4::default());
            }
            return Err(CodecError::LengthMismatch("IPV4"));
        }
        let count = wire::read_u8(body)?;
        let mut ipv4_interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac_address = wire::read_mac(body)?;
            let entries_nr = wire::read_u8(body)?;
            let mut addresses = Vec::with_capacity(entries_nr as usize);
            for _ in 0..entries_nr {
                addresses.push(Ipv4Entry {
                    kind: wire::read_u8(body)?,
                    address: wire::read_array(body)?,
                    dhcp_server: wire::read_array(body)?,
                });
            }
            ipv4_interfaces.push(Ipv4Interface {
                mac_address,
                addresses,
            });
        }
        Ok(Ipv4 { ipv4_interfaces })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(out, self.ipv4_interfaces.len(), "ipv4_interfaces_nr")?;
        for intf in &self.ipv4_interfaces {
            wire::put_mac(out, &intf.mac_address);
            wire::put_u8_count(out, intf.addresses.len(), "ipv4_nr")?;
            for addr in &intf.addresses {
                out.put_u8(addr.kind);
                out.put_slice(&addr.address);
                out.put_slice(&addr.dhcp_server);
            }
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(
            prefix,
            "ipv4_interfaces_nr",
            format!("{}", self.ipv4_interfaces.len()),
        );
        for (i, intf) in self.ipv4_interfaces.iter().enumerate() {
            let p = format!("{prefix}ipv4_interfaces[{i}]->");
            emit(&p, "mac_address", intf.mac_address.to_string());
            for (j, addr) in intf.addresses.iter().enumerate() {
                let p = format!("{p}ipv4[{j}]->");
                emit(&p, "type", format!("{}", addr.kind));
                emit(&p, "ipv4_address", dotted_quad(&addr.address));
                emit(&p, "ipv4_dhcp_server", dotted_quad(&addr.dhcp_server));
            }
        }
    }
}

fn dotted_quad(octets: &[u8; 4]) -> String {
    format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3])
}

/// IPv6 type TLV ("IEEE Std 1905.1-2013, Section 6.4.25").
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Ipv6 {
    pub ipv6_interfaces: Vec<Ipv6Interface>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Ipv6Interface {
    pub mac_address: MacAddress,
    pub link_local_address: [u8; 16],
    pub addresses: Vec<Ipv6Entry>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Ipv6Entry {
    /// How the address was obtained (one of the `IPV6_TYPE_*` values).
    pub kind: u8,
    pub address: [u8; 16],
    /// Address of the entity the address came from, or all-zero.
    pub origin: [u8; 16],
}

impl Ipv6 {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        if !body.has_remaining() {
            // Legacy zero-length empty-list encoding.
            if cfg!(feature = "fix-broken-tlvs") {
                return Ok(Ipv6::default());
            }
            return Err(CodecError::LengthMismatch("IPV6"));
        }
        let count = wire::read_u8(body)?;
        let mut ipv6_interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac_address = wire::read_mac(body)?;
            let link_local_address = wire::read_array(body)?;
            let entries_nr = wire::read_u8(body)?;
            let mut addresses = Vec::with_capacity(entries_nr as usize);
            for _ in 0..entries_nr {
                addresses.push(Ipv6Entry {
                    kind: wire::read_u8(body)?,
                    address: wire::read_array(body)?,
                    origin: wire::read_array(body)?,
                });
            }
            ipv6_interfaces.push(Ipv6Interface {
                mac_address,
                link_local_address,
                addresses,
            });
        }
        Ok(Ipv6 { ipv6_interfaces })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(out, self.ipv6_interfaces.len(), "ipv6_interfaces_nr")?;
        for intf in &self.ipv6_interfaces {
            wire::put_mac(out, &intf.mac_address);
            out.put_slice(&intf.link_local_address);
            wire::put_u8_count(out, intf.addresses.len(), "ipv6_nr")?;
            for addr in &intf.addresses {
                out.put_u8(addr.kind);
                out.put_slice(&addr.address);
                out.put_slice(&addr.origin);
            }
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(
            prefix,
            "ipv6_interfaces_nr",
            format!("{}", self.ipv6_interfaces.len()),
        );
        for (i, intf) in self.ipv6_interfaces.iter().enumerate() {
            let p = format!("{prefix}ipv6_interfaces[{i}]->");
            emit(&p, "mac_address", intf.mac_address.to_string());
            emit(
                &p,
                "ipv6_link_local_address",
                crate::tlv::hex_string(&intf.link_local_address),
            );
            for (j, addr) in intf.addresses.iter().enumerate() {
                let p = format!("{p}ipv6[{j}]->");
                emit(&p, "type", format!("{}", addr.kind));
                emit(&p, "ipv6_address", crate::tlv::hex_string(&addr.address));
                emit(
                    &p,
                    "ipv6_address_origin",
                    crate::tlv::hex_string(&addr.origin),
                );
            }
        }
    }
}
