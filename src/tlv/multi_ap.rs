//! Multi-AP (Wi-Fi EasyMesh) TLVs, "Multi-AP Specification v1.0, Section 17.2".

use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::{printable_string, FieldVisitor};
use crate::wire;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// A Multi-AP service advertised or searched for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ServiceType(pub u8);

impl ServiceType {
    pub const MULTI_AP_CONTROLLER: ServiceType = ServiceType(0x00);
    pub const MULTI_AP_AGENT: ServiceType = ServiceType(0x01);
}

/// An 802.11 SSID: up to 32 octets, not necessarily valid UTF-8.
#[derive(Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Ssid(Vec<u8>);

pub const SSID_MAX_LEN: usize = 32;

impl Ssid {
    pub fn new(bytes: &[u8]) -> Result<Ssid, CodecError> {
        if bytes.len() > SSID_MAX_LEN {
            return Err(CodecError::InvalidField {
                field: "ssid_length",
                value: bytes.len() as u32,
            });
        }
        Ok(Ssid(bytes.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Ssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", printable_string(&self.0))
    }
}

/// Supported service TLV (0x80) and searched service TLV (0x81); both share
/// the same body layout, so the searched variant reuses this structure.
///
/// Comparison is set-based: two TLVs listing the same services in different
/// order are equal.
#[derive(Clone, Eq, Debug, Default)]
pub struct SupportedService {
    pub services: Vec<ServiceType>,
}

impl PartialEq for SupportedService {
    fn eq(&self, other: &Self) -> bool {
        self.services.len() == other.services.len()
            && self
                .services
                .iter()
                .all(|s| other.services.contains(s))
    }
}

impl SupportedService {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        let count = wire::read_u8(body)? as usize;
        // The count must describe the entire rest of the body.
        if count != body.len() {
            return Err(CodecError::LengthMismatch("SUPPORTED_SERVICE"));
        }
        let mut services = Vec::with_capacity(count);
        for _ in 0..count {
            services.push(ServiceType(wire::read_u8(body)?));
        }
        Ok(SupportedService { services })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(out, self.services.len(), "supported_service_nr")?;
        for service in &self.services {
            out.put_u8(service.0);
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "services_nr", format!("{}", self.services.len()));
        let list = self
            .services
            .iter()
            .map(|s| format!("0x{:02x}", s.0))
            .collect::<Vec<_>>()
            .join(" ");
        emit(prefix, "services", list);
    }
}

/// AP operational BSS TLV (0x83): the BSSes currently operated on each radio.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ApOperationalBss {
    pub radios: Vec<ApOperationalBssRadio>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ApOperationalBssRadio {
    pub radio_uid: MacAddress,
    pub bsses: Vec<ApOperationalBssInfo>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ApOperationalBssInfo {
    pub bssid: MacAddress,
    pub ssid: Ssid,
}

impl ApOperationalBss {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        let radios_nr = wire::read_u8(body)?;
        let mut radios = Vec::with_capacity(radios_nr as usize);
        for _ in 0..radios_nr {
            let radio_uid = wire::read_mac(body)?;
            let bss_nr = wire::read_u8(body)?;
            let mut bsses = Vec::with_capacity(bss_nr as usize);
            for _ in 0..bss_nr {
                let bssid = wire::read_mac(body)?;
                let ssid_len = wire::read_u8(body)? as usize;
                if ssid_len > SSID_MAX_LEN {
                    return Err(CodecError::InvalidField {
                        field: "ssid_length",
                        value: ssid_len as u32,
                    });
                }
                let ssid_bytes = wire::read_bytes(body, ssid_len)?;
                bsses.push(ApOperationalBssInfo {
                    bssid,
                    ssid: Ssid(ssid_bytes.to_vec()),
                });
            }
            radios.push(ApOperationalBssRadio { radio_uid, bsses });
        }
        Ok(ApOperationalBss { radios })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(out, self.radios.len(), "radios_nr")?;
        for radio in &self.radios {
            wire::put_mac(out, &radio.radio_uid);
            wire::put_u8_count(out, radio.bsses.len(), "bss_nr")?;
            for bss in &radio.bsses {
                wire::put_mac(out, &bss.bssid);
                wire::put_u8_count(out, bss.ssid.len(), "ssid_length")?;
                out.put_slice(bss.ssid.as_bytes());
            }
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "radios_nr", format!("{}", self.radios.len()));
        for (i, radio) in self.radios.iter().enumerate() {
            let p = format!("{prefix}radio[{i}]->");
            emit(&p, "radio_uid", radio.radio_uid.to_string());
            for (j, bss) in radio.bsses.iter().enumerate() {
                let p = format!("{p}bss[{j}]->");
                emit(&p, "bssid", bss.bssid.to_string());
                emit(&p, "ssid", bss.ssid.to_string());
            }
        }
    }
}

/// Associated clients TLV (0x84): the clients associated to each operated
/// BSS, with the seconds elapsed since each association.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct AssociatedClients {
    pub bsses: Vec<AssociatedClientsBssInfo>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AssociatedClientsBssInfo {
    pub bssid: MacAddress,
    pub clients: Vec<AssociatedClientInfo>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AssociatedClientInfo {
    pub addr: MacAddress,
    /// Seconds since association, saturating at 0xffff.
    pub age: u16,
}

impl AssociatedClients {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        let bss_nr = wire::read_u8(body)?;
        let mut bsses = Vec::with_capacity(bss_nr as usize);
        for _ in 0..bss_nr {
            let bssid = wire::read_mac(body)?;
            let clients_nr = wire::read_u16(body)?;
            let mut clients = Vec::with_capacity(clients_nr as usize);
            for _ in 0..clients_nr {
                clients.push(AssociatedClientInfo {
                    addr: wire::read_mac(body)?,
                    age: wire::read_u16(body)?,
                });
            }
            bsses.push(AssociatedClientsBssInfo { bssid, clients });
        }
        Ok(AssociatedClients { bsses })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(out, self.bsses.len(), "bss_nr")?;
        for bss in &self.bsses {
            wire::put_mac(out, &bss.bssid);
            wire::put_u16_count(out, bss.clients.len(), "clients_nr")?;
            for client in &bss.clients {
                wire::put_mac(out, &client.addr);
                out.put_u16(client.age);
            }
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "bss_nr", format!("{}", self.bsses.len()));
        for (i, bss) in self.bsses.iter().enumerate() {
            let p = format!("{prefix}bss[{i}]->");
            emit(&p, "bssid", bss.bssid.to_string());
            for (j, client) in bss.clients.iter().enumerate() {
                let p = format!("{p}client[{j}]->");
                emit(&p, "addr", client.addr.to_string());
                emit(&p, "age", format!("{}", client.age));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssid_length_is_capped() {
        assert!(Ssid::new(&[0x61; 33]).is_err());
        assert_eq!(Ssid::new(b"home").unwrap().len(), 4);
    }

    #[test]
    fn supported_service_count_must_cover_body() {
        // Count says 2 but only one service byte follows.
        let mut body = Bytes::from_static(&[2, 0]);
        assert!(SupportedService::parse(&mut body).is_err());
    }
}
