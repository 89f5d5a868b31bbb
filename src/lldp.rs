//! The trimmed LLDP profile used for 1905.1 bridge discovery.
//!
//! "IEEE Std 1905.1-2013, Section 6.1" mandates bridge-discovery frames that
//! carry exactly one chassis-ID TLV (subtype MAC address), one port-ID TLV
//! (subtype MAC address) and one time-to-live TLV, closed by an
//! end-of-LLDPPDU TLV. Anything else is rejected.
//!
//! LLDP TLV headers differ from 1905 ones: two octets holding a 7-bit type
//! and a 9-bit length ("IEEE Std 802.1AB-2009, Section 8.5").

use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::FieldVisitor;
use crate::wire::{self, ensure_remaining};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::warn;

pub const TLV_TYPE_END_OF_LLDPPDU: u8 = 0;
pub const TLV_TYPE_CHASSIS_ID: u8 = 1;
pub const TLV_TYPE_PORT_ID: u8 = 2;
pub const TLV_TYPE_TIME_TO_LIVE: u8 = 3;

pub const CHASSIS_ID_SUBTYPE_MAC_ADDRESS: u8 = 4;
pub const PORT_ID_SUBTYPE_MAC_ADDRESS: u8 = 3;

/// TTL value mandated for 1905.1 bridge discovery frames.
pub const TIME_TO_LIVE_TLV_1905_DEFAULT_VALUE: u16 = 180;

/// One LLDP TLV of the 1905.1 profile.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LldpTlv {
    /// Chassis ID with MAC-address subtype: the AL MAC address.
    ChassisId(MacAddress),
    /// Port ID with MAC-address subtype: the sending interface address.
    PortId(MacAddress),
    /// Time to live in seconds.
    TimeToLive(u16),
}

impl LldpTlv {
    /// Parse one LLDP TLV off the front of `buf`. Returns `None` for the
    /// end-of-LLDPPDU marker.
    fn parse(buf: &mut Bytes) -> Result<Option<LldpTlv>, CodecError> {
        let byte1 = wire::read_u8(buf)?;
        let byte2 = wire::read_u8(buf)?;
        let tlv_type = byte1 >> 1;
        let len = (((byte1 & 0x01) as usize) << 8) | byte2 as usize;
        ensure_remaining!(buf, len);
        let mut body = buf.split_to(len);

        let tlv = match tlv_type {
            TLV_TYPE_END_OF_LLDPPDU => {
                if len != 0 {
                    return Err(CodecError::LengthMismatch("END_OF_LLDPPDU"));
                }
                return Ok(None);
            }
            TLV_TYPE_CHASSIS_ID => {
                // Only the MAC-address subtype with a 6-byte payload is part
                // of the 1905.1 profile.
                if len != 7 {
                    return Err(CodecError::LengthMismatch("CHASSIS_ID"));
                }
                let subtype = wire::read_u8(&mut body)?;
                if subtype != CHASSIS_ID_SUBTYPE_MAC_ADDRESS {
                    return Err(CodecError::InvalidField {
                        field: "chassis_id_subtype",
                        value: subtype as u32,
                    });
                }
                LldpTlv::ChassisId(wire::read_mac(&mut body)?)
            }
            TLV_TYPE_PORT_ID => {
                if len != 7 {
                    return Err(CodecError::LengthMismatch("PORT_ID"));
                }
                let subtype = wire::read_u8(&mut body)?;
                if subtype != PORT_ID_SUBTYPE_MAC_ADDRESS {
                    return Err(CodecError::InvalidField {
                        field: "port_id_subtype",
                        value: subtype as u32,
                    });
                }
                LldpTlv::PortId(wire::read_mac(&mut body)?)
            }
            TLV_TYPE_TIME_TO_LIVE => {
                if len != 2 {
                    return Err(CodecError::LengthMismatch("TIME_TO_LIVE"));
                }
                LldpTlv::TimeToLive(wire::read_u16(&mut body)?)
            }
            n => {
                return Err(CodecError::InvalidField {
                    field: "lldp_tlv_type",
                    value: n as u32,
                })
            }
        };
        Ok(Some(tlv))
    }

    fn forge(&self, out: &mut BytesMut) {
        match self {
            LldpTlv::ChassisId(mac) => {
                put_lldp_header(out, TLV_TYPE_CHASSIS_ID, 7);
                out.put_u8(CHASSIS_ID_SUBTYPE_MAC_ADDRESS);
                wire::put_mac(out, mac);
            }
            LldpTlv::PortId(mac) => {
                put_lldp_header(out, TLV_TYPE_PORT_ID, 7);
                out.put_u8(PORT_ID_SUBTYPE_MAC_ADDRESS);
                wire::put_mac(out, mac);
            }
            LldpTlv::TimeToLive(ttl) => {
                put_lldp_header(out, TLV_TYPE_TIME_TO_LIVE, 2);
                out.put_u16(*ttl);
            }
        }
    }

    pub fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        match self {
            LldpTlv::ChassisId(mac) => emit(prefix, "chassis_id", mac.to_string()),
            LldpTlv::PortId(mac) => emit(prefix, "port_id", mac.to_string()),
            LldpTlv::TimeToLive(ttl) => emit(prefix, "time_to_live", format!("{ttl}")),
        }
    }
}

fn put_lldp_header(out: &mut BytesMut, tlv_type: u8, len: u16) {
    out.put_u8((tlv_type << 1) | ((len >> 8) as u8 & 0x01));
    out.put_u8(len as u8);
}

/// A 1905.1 bridge-discovery PDU: exactly one of each required TLV.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LldpPayload {
    pub tlvs: Vec<LldpTlv>,
}

impl LldpPayload {
    /// Standard bridge-discovery content for the given addresses.
    pub fn bridge_discovery(al_mac: MacAddress, interface_mac: MacAddress) -> LldpPayload {
        LldpPayload {
            tlvs: vec![
                LldpTlv::ChassisId(al_mac),
                LldpTlv::PortId(interface_mac),
                LldpTlv::TimeToLive(TIME_TO_LIVE_TLV_1905_DEFAULT_VALUE),
            ],
        }
    }

    pub fn chassis_id(&self) -> Option<MacAddress> {
        self.tlvs.iter().find_map(|t| match t {
            LldpTlv::ChassisId(mac) => Some(*mac),
            _ => None,
        })
    }

    pub fn port_id(&self) -> Option<MacAddress> {
        self.tlvs.iter().find_map(|t| match t {
            LldpTlv::PortId(mac) => Some(*mac),
            _ => None,
        })
    }

    /// Parse a PDU, enforcing the 1905.1 cardinality rules.
    pub fn parse(stream: &[u8]) -> Result<LldpPayload, CodecError> {
        let mut buf = Bytes::copy_from_slice(stream);
        let mut tlvs = Vec::new();
        loop {
            match LldpTlv::parse(&mut buf)? {
                Some(tlv) => tlvs.push(tlv),
                None => break,
            }
        }

        let payload = LldpPayload { tlvs };
        if !payload.cardinality_ok() {
            warn!("LLDP PDU with missing or duplicated required TLVs");
            return Err(CodecError::BadLldpProfile);
        }
        Ok(payload)
    }

    /// Serialize: the three required TLVs in order, then end-of-LLDPPDU.
    pub fn forge(&self) -> Result<Bytes, CodecError> {
        if !self.cardinality_ok() {
            return Err(CodecError::BadLldpProfile);
        }
        let mut out = BytesMut::new();
        // Emit in the profile's canonical order regardless of list order.
        for tlv in [
            self.tlvs.iter().find(|t| matches!(t, LldpTlv::ChassisId(_))),
            self.tlvs.iter().find(|t| matches!(t, LldpTlv::PortId(_))),
            self.tlvs.iter().find(|t| matches!(t, LldpTlv::TimeToLive(_))),
        ]
        .into_iter()
        .flatten()
        {
            tlv.forge(&mut out);
        }
        put_lldp_header(&mut out, TLV_TYPE_END_OF_LLDPPDU, 0);
        Ok(out.freeze())
    }

    pub fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        for tlv in &self.tlvs {
            tlv.visit(prefix, emit);
        }
    }

    fn cardinality_ok(&self) -> bool {
        let chassis = self
            .tlvs
            .iter()
            .filter(|t| matches!(t, LldpTlv::ChassisId(_)))
            .count();
        let port = self
            .tlvs
            .iter()
            .filter(|t| matches!(t, LldpTlv::PortId(_)))
            .count();
        let ttl = self
            .tlvs
            .iter()
            .filter(|t| matches!(t, LldpTlv::TimeToLive(_)))
            .count();
        self.tlvs.len() == 3 && chassis == 1 && port == 1 && ttl == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(last: u8) -> MacAddress {
        MacAddress([0x02, 0x00, 0x00, 0x00, 0x00, last])
    }

    #[test]
    fn bridge_discovery_round_trip() {
        let payload = LldpPayload::bridge_discovery(mac(1), mac(2));
        let bytes = payload.forge().unwrap();
        // chassis-id: type 1, length 7, subtype 4
        assert_eq!(&bytes[..3], &[0x02, 0x07, 0x04]);
        // closing end-of-LLDPPDU
        assert_eq!(&bytes[bytes.len() - 2..], &[0x00, 0x00]);
        let parsed = LldpPayload::parse(&bytes).unwrap();
        assert_eq!(parsed, payload);
        assert_eq!(parsed.chassis_id(), Some(mac(1)));
        assert_eq!(parsed.port_id(), Some(mac(2)));
    }

    #[test]
    fn missing_ttl_is_rejected() {
        let mut out = BytesMut::new();
        LldpTlv::ChassisId(mac(1)).forge(&mut out);
        LldpTlv::PortId(mac(2)).forge(&mut out);
        put_lldp_header(&mut out, TLV_TYPE_END_OF_LLDPPDU, 0);
        assert_eq!(
            LldpPayload::parse(&out.freeze()),
            Err(CodecError::BadLldpProfile)
        );
    }

    #[test]
    fn duplicate_chassis_id_is_rejected() {
        let mut out = BytesMut::new();
        LldpTlv::ChassisId(mac(1)).forge(&mut out);
        LldpTlv::ChassisId(mac(3)).forge(&mut out);
        LldpTlv::PortId(mac(2)).forge(&mut out);
        LldpTlv::TimeToLive(180).forge(&mut out);
        put_lldp_header(&mut out, TLV_TYPE_END_OF_LLDPPDU, 0);
        assert_eq!(
            LldpPayload::parse(&out.freeze()),
            Err(CodecError::BadLldpProfile)
        );
    }

    #[test]
    fn non_mac_subtype_is_rejected() {
        // Chassis ID with a locally-assigned (7) subtype.
        let raw = [0x02, 0x07, 0x07, 1, 2, 3, 4, 5, 6, 0x00, 0x00];
        assert!(LldpPayload::parse(&raw).is_err());
    }
}
