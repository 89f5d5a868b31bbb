//! CMDU assembly and disassembly.
//!
//! A CMDU (Control Message Data Unit) is an 8-byte header followed by a TLV
//! sequence terminated by the end-of-message TLV. Messages larger than one
//! network segment are split into fragments that share the header fields and
//! count up `fragment_id`, the last one flagged in the indicators octet.
//!
//! The per-message-type TLV cardinality rules of "IEEE Std 1905.1-2013,
//! Section 6.2/6.3" are enforced on both paths, with an asymmetry taken from
//! the standard: a forged CMDU carrying an unexpected TLV is rejected (never
//! put invalid messages on the wire), while a received CMDU merely has the
//! unexpected TLVs dropped (process the valid remainder).

use crate::error::CodecError;
use crate::tlv::{Tlv, TlvType};
use crate::wire::ensure_remaining;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

/// Largest L2 frame the platform can carry, Ethernet header included.
pub const MAX_NETWORK_SEGMENT_SIZE: usize = 1500;

/// Per-fragment overhead: Ethernet addressing and ethertype (14), the CMDU
/// header (8), and the closing end-of-message TLV (3).
const FRAGMENT_OVERHEAD: usize = 25;

/// CMDU header length on the wire.
const HEADER_LEN: usize = 8;

pub const MESSAGE_VERSION_1905_1_2013: u8 = 0x00;

const INDICATOR_LAST_FRAGMENT: u8 = 0x80;
const INDICATOR_RELAY: u8 = 0x40;

/// CMDU message types, "IEEE Std 1905.1-2013, Table 6-3".
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum MessageType {
    TopologyDiscovery,
    TopologyNotification,
    TopologyQuery,
    TopologyResponse,
    VendorSpecific,
    LinkMetricQuery,
    LinkMetricResponse,
    ApAutoconfigurationSearch,
    ApAutoconfigurationResponse,
    ApAutoconfigurationWsc,
    ApAutoconfigurationRenew,
    PushButtonEventNotification,
    PushButtonJoinNotification,
    HigherLayerQuery,
    HigherLayerResponse,
    InterfacePowerChangeRequest,
    InterfacePowerChangeResponse,
    GenericPhyQuery,
    GenericPhyResponse,
}

impl MessageType {
    pub fn value(self) -> u16 {
        match self {
            MessageType::TopologyDiscovery => 0x0000,
            MessageType::TopologyNotification => 0x0001,
            MessageType::TopologyQuery => 0x0002,
            MessageType::TopologyResponse => 0x0003,
            MessageType::VendorSpecific => 0x0004,
            MessageType::LinkMetricQuery => 0x0005,
            MessageType::LinkMetricResponse => 0x0006,
            MessageType::ApAutoconfigurationSearch => 0x0007,
            MessageType::ApAutoconfigurationResponse => 0x0008,
            MessageType::ApAutoconfigurationWsc => 0x0009,
            MessageType::ApAutoconfigurationRenew => 0x000a,
            MessageType::PushButtonEventNotification => 0x000b,
            MessageType::PushButtonJoinNotification => 0x000c,
            MessageType::HigherLayerQuery => 0x000d,
            MessageType::HigherLayerResponse => 0x000e,
            MessageType::InterfacePowerChangeRequest => 0x000f,
            MessageType::InterfacePowerChangeResponse => 0x0010,
            MessageType::GenericPhyQuery => 0x0011,
            MessageType::GenericPhyResponse => 0x0012,
        }
    }

    pub fn from_value(value: u16) -> Result<MessageType, CodecError> {
        Ok(match value {
            0x0000 => MessageType::TopologyDiscovery,
            0x0001 => MessageType::TopologyNotification,
            0x0002 => MessageType::TopologyQuery,
            0x0003 => MessageType::TopologyResponse,
            0x0004 => MessageType::VendorSpecific,
            0x0005 => MessageType::LinkMetricQuery,
            0x0006 => MessageType::LinkMetricResponse,
            0x0007 => MessageType::ApAutoconfigurationSearch,
            0x0008 => MessageType::ApAutoconfigurationResponse,
            0x0009 => MessageType::ApAutoconfigurationWsc,
            0x000a => MessageType::ApAutoconfigurationRenew,
            0x000b => MessageType::PushButtonEventNotification,
            0x000c => MessageType::PushButtonJoinNotification,
            0x000d => MessageType::HigherLayerQuery,
            0x000e => MessageType::HigherLayerResponse,
            0x000f => MessageType::InterfacePowerChangeRequest,
            0x0010 => MessageType::InterfacePowerChangeResponse,
            0x0011 => MessageType::GenericPhyQuery,
            0x0012 => MessageType::GenericPhyResponse,
            n => return Err(CodecError::UnknownMessageType(n)),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageType::TopologyDiscovery => "CMDU_TYPE_TOPOLOGY_DISCOVERY",
            MessageType::TopologyNotification => "CMDU_TYPE_TOPOLOGY_NOTIFICATION",
            MessageType::TopologyQuery => "CMDU_TYPE_TOPOLOGY_QUERY",
            MessageType::TopologyResponse => "CMDU_TYPE_TOPOLOGY_RESPONSE",
            MessageType::VendorSpecific => "CMDU_TYPE_VENDOR_SPECIFIC",
            MessageType::LinkMetricQuery => "CMDU_TYPE_LINK_METRIC_QUERY",
            MessageType::LinkMetricResponse => "CMDU_TYPE_LINK_METRIC_RESPONSE",
            MessageType::ApAutoconfigurationSearch => "CMDU_TYPE_AP_AUTOCONFIGURATION_SEARCH",
            MessageType::ApAutoconfigurationResponse => "CMDU_TYPE_AP_AUTOCONFIGURATION_RESPONSE",
            MessageType::ApAutoconfigurationWsc => "CMDU_TYPE_AP_AUTOCONFIGURATION_WSC",
            MessageType::ApAutoconfigurationRenew => "CMDU_TYPE_AP_AUTOCONFIGURATION_RENEW",
            MessageType::PushButtonEventNotification => "CMDU_TYPE_PUSH_BUTTON_EVENT_NOTIFICATION",
            MessageType::PushButtonJoinNotification => "CMDU_TYPE_PUSH_BUTTON_JOIN_NOTIFICATION",
            MessageType::HigherLayerQuery => "CMDU_TYPE_HIGHER_LAYER_QUERY",
            MessageType::HigherLayerResponse => "CMDU_TYPE_HIGHER_LAYER_RESPONSE",
            MessageType::InterfacePowerChangeRequest => "CMDU_TYPE_INTERFACE_POWER_CHANGE_REQUEST",
            MessageType::InterfacePowerChangeResponse => {
                "CMDU_TYPE_INTERFACE_POWER_CHANGE_RESPONSE"
            }
            MessageType::GenericPhyQuery => "CMDU_TYPE_GENERIC_PHY_QUERY",
            MessageType::GenericPhyResponse => "CMDU_TYPE_GENERIC_PHY_RESPONSE",
        }
    }

    /// The relay-indicator value mandated for this message type by "IEEE Std
    /// 1905.1-2013, Table 6-4". `None` means the type (vendor specific)
    /// allows either value.
    pub fn relay_indicator(self) -> Option<bool> {
        match self {
            MessageType::VendorSpecific => None,
            MessageType::TopologyNotification
            | MessageType::ApAutoconfigurationSearch
            | MessageType::ApAutoconfigurationRenew
            | MessageType::PushButtonEventNotification
            | MessageType::PushButtonJoinNotification => Some(true),
            _ => Some(false),
        }
    }

    /// TLV types that must appear exactly once in a CMDU of this type.
    fn required_once(self) -> &'static [TlvType] {
        use TlvType::*;
        match self {
            MessageType::TopologyDiscovery => &[AlMacAddress, MacAddress],
            MessageType::TopologyNotification => &[AlMacAddress],
            MessageType::TopologyResponse => &[DeviceInformation],
            MessageType::LinkMetricQuery => &[LinkMetricQuery],
            MessageType::ApAutoconfigurationSearch => {
                &[AlMacAddress, SearchedRole, AutoconfigFreqBand]
            }
            MessageType::ApAutoconfigurationResponse => &[SupportedRole, SupportedFreqBand],
            MessageType::ApAutoconfigurationWsc => &[Wsc],
            MessageType::ApAutoconfigurationRenew => {
                &[AlMacAddress, SupportedRole, SupportedFreqBand]
            }
            MessageType::PushButtonEventNotification => {
                &[AlMacAddress, PushButtonEventNotification]
            }
            MessageType::PushButtonJoinNotification => &[AlMacAddress, PushButtonJoinNotification],
            MessageType::HigherLayerResponse => {
                &[AlMacAddress, ProfileVersion, DeviceIdentification]
            }
            MessageType::InterfacePowerChangeRequest => &[InterfacePowerChangeInformation],
            MessageType::InterfacePowerChangeResponse => &[InterfacePowerChangeStatus],
            MessageType::GenericPhyResponse => &[GenericPhyDeviceInformation],
            _ => &[],
        }
    }

    /// TLV types that may appear any number of times in a CMDU of this type.
    /// Vendor-specific TLVs are always admitted and not listed here.
    fn allowed_any(self) -> &'static [TlvType] {
        use TlvType::*;
        match self {
            MessageType::TopologyResponse => &[
                DeviceBridgingCapability,
                Non1905NeighborDeviceList,
                NeighborDeviceList,
                PowerOffInterface,
                L2NeighborDevice,
                SupportedService,
                ApOperationalBss,
                AssociatedClients,
            ],
            MessageType::LinkMetricResponse => &[TransmitterLinkMetric, ReceiverLinkMetric],
            MessageType::ApAutoconfigurationSearch => &[SupportedService, SearchedService],
            MessageType::ApAutoconfigurationResponse => &[SupportedService],
            MessageType::PushButtonEventNotification => &[PushButtonGenericPhyEventNotification],
            MessageType::HigherLayerResponse => &[ControlUrl, Ipv4, Ipv6],
            _ => &[],
        }
    }
}

/// Header fields shared by every fragment of a CMDU.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CmduHeader {
    pub message_version: u8,
    pub message_type: u16,
    pub message_id: u16,
    pub fragment_id: u8,
    pub last_fragment: bool,
    pub relay_indicator: bool,
}

/// Peek at a fragment's header without parsing the TLV payload. Used by the
/// relay path to decide forwarding before reassembly.
pub fn parse_header(stream: &[u8]) -> Result<CmduHeader, CodecError> {
    let mut buf = stream;
    ensure_remaining!(buf, HEADER_LEN);
    let message_version = buf.get_u8();
    let _reserved = buf.get_u8();
    let message_type = buf.get_u16();
    let message_id = buf.get_u16();
    let fragment_id = buf.get_u8();
    let indicators = buf.get_u8();
    Ok(CmduHeader {
        message_version,
        message_type,
        message_id,
        fragment_id,
        last_fragment: indicators & INDICATOR_LAST_FRAGMENT != 0,
        relay_indicator: indicators & INDICATOR_RELAY != 0,
    })
}

/// A reassembled (or to-be-forged) CMDU.
#[derive(Clone, PartialEq, Debug)]
pub struct Cmdu {
    pub message_version: u8,
    pub message_type: MessageType,
    pub message_id: u16,
    /// Only meaningful for vendor-specific CMDUs; every other type carries
    /// the fixed table value on the wire.
    pub relay_indicator: bool,
    pub tlvs: Vec<Tlv>,
}

impl Cmdu {
    pub fn new(message_type: MessageType, message_id: u16, tlvs: Vec<Tlv>) -> Cmdu {
        Cmdu {
            message_version: MESSAGE_VERSION_1905_1_2013,
            message_type,
            message_id,
            relay_indicator: message_type.relay_indicator().unwrap_or(false),
            tlvs,
        }
    }

    /// Reassemble a CMDU from its fragments.
    ///
    /// Fragments may arrive in any order; they are matched up by
    /// `fragment_id`. All fragments must agree on the header fields, the
    /// relay indicator must match the table value for the message type, and
    /// the last-fragment flag must sit on the highest fragment id and nowhere
    /// else. Receive-side TLV rules are applied before returning.
    pub fn parse(fragments: &[Bytes]) -> Result<Cmdu, CodecError> {
        if fragments.is_empty() {
            return Err(CodecError::BadFragments);
        }

        let mut message_version = 0;
        let mut message_type = MessageType::TopologyDiscovery;
        let mut message_id = 0;
        let mut relay_indicator = false;
        let mut tlvs = Vec::new();

        for current_fragment in 0..fragments.len() {
            // Fragments are visited in fragment_id order, not input order.
            let raw = fragments
                .iter()
                .find(|f| f.len() >= HEADER_LEN && f[6] as usize == current_fragment)
                .ok_or(CodecError::BadFragments)?;

            let header = parse_header(raw)?;
            let this_type = MessageType::from_value(header.message_type)?;

            if current_fragment == 0 {
                message_version = header.message_version;
                message_type = this_type;
                message_id = header.message_id;
                relay_indicator = header.relay_indicator;
            } else if header.message_version != message_version
                || this_type != message_type
                || header.message_id != message_id
                || header.relay_indicator != relay_indicator
            {
                return Err(CodecError::BadFragments);
            }

            if let Some(expected) = message_type.relay_indicator() {
                if header.relay_indicator != expected {
                    return Err(CodecError::BadFragments);
                }
            }

            let last = current_fragment == fragments.len() - 1;
            if header.last_fragment != last {
                return Err(CodecError::BadFragments);
            }

            let mut buf = raw.slice(HEADER_LEN..);
            loop {
                // The end-of-message TLV closes this fragment's TLV list.
                if buf.remaining() >= 3 && buf[0] == 0 {
                    break;
                }
                match Tlv::parse(&mut buf) {
                    Ok(tlv) => tlvs.push(tlv),
                    Err(e) => {
                        warn!(
                            "TLV parsing error in fragment {current_fragment}, dumping head: {}",
                            dump_head(&buf)
                        );
                        return Err(e);
                    }
                }
            }
        }

        let mut cmdu = Cmdu {
            message_version,
            message_type,
            message_id,
            relay_indicator,
            tlvs,
        };

        debug!("CMDU type: {}", cmdu.message_type.name());

        if cmdu.message_type == MessageType::VendorSpecific {
            // The only structural requirement on a vendor-specific CMDU is
            // that its first TLV is a vendor-specific one.
            match cmdu.tlvs.first() {
                Some(Tlv::VendorSpecific(_)) => {}
                _ => return Err(CodecError::VendorCmduWithoutVendorTlv),
            }
        } else {
            cmdu.apply_rx_rules()?;
        }

        Ok(cmdu)
    }

    /// Serialize into one or more fragments, each at most `max_segment_size`
    /// minus the Ethernet overhead.
    ///
    /// Send-side TLV rules are applied first; a CMDU that violates them is
    /// never emitted.
    pub fn forge(&self, max_segment_size: usize) -> Result<Vec<Bytes>, CodecError> {
        self.check_tx_rules()?;

        let max_tlv_block = max_segment_size.saturating_sub(FRAGMENT_OVERHEAD);
        if max_tlv_block == 0 {
            return Err(CodecError::TlvTooBig);
        }

        let mut forged: Vec<Bytes> = Vec::with_capacity(self.tlvs.len());
        for tlv in &self.tlvs {
            forged.push(tlv.forge()?);
        }

        let relay = match self.message_type.relay_indicator() {
            Some(fixed) => fixed,
            None => self.relay_indicator,
        };

        let mut fragments = Vec::new();
        let mut tlv_start = 0;
        loop {
            // Greedily take TLVs while they fit in this fragment.
            let mut tlv_stop = tlv_start;
            let mut block_size = 0;
            while tlv_stop < forged.len() && block_size + forged[tlv_stop].len() < max_tlv_block {
                block_size += forged[tlv_stop].len();
                tlv_stop += 1;
            }
            if tlv_stop == tlv_start && tlv_stop < forged.len() {
                // A single TLV exceeds the fragment budget. The standard has
                // no way to split one TLV across fragments.
                return Err(CodecError::TlvTooBig);
            }

            let last = tlv_stop == forged.len();
            let mut indicators = 0;
            if last {
                indicators |= INDICATOR_LAST_FRAGMENT;
            }
            if relay {
                indicators |= INDICATOR_RELAY;
            }

            let mut out = BytesMut::with_capacity(HEADER_LEN + block_size + 3);
            out.put_u8(self.message_version);
            out.put_u8(0); // reserved
            out.put_u16(self.message_type.value());
            out.put_u16(self.message_id);
            out.put_u8(fragments.len() as u8);
            out.put_u8(indicators);
            for tlv in &forged[tlv_start..tlv_stop] {
                out.extend_from_slice(tlv);
            }
            // End-of-message TLV.
            out.put_slice(&[0, 0, 0]);
            fragments.push(out.freeze());

            if last {
                break;
            }
            tlv_start = tlv_stop;
        }

        Ok(fragments)
    }

    /// Walk the header fields and every TLV, invoking `emit` per leaf field.
    pub fn visit(&self, prefix: &str, emit: &mut crate::tlv::FieldVisitor) {
        emit(prefix, "message_version", format!("{}", self.message_version));
        emit(
            prefix,
            "message_type",
            format!("{}", self.message_type.value()),
        );
        emit(prefix, "message_id", format!("{}", self.message_id));
        emit(
            prefix,
            "relay_indicator",
            format!("{}", self.relay_indicator as u8),
        );
        for tlv in &self.tlvs {
            let p = format!("{prefix}TLV({})->", tlv.tlv_type().name());
            tlv.visit(&p, emit);
        }
    }

    /// Send-side rule check: every required TLV present exactly once, no
    /// unexpected TLVs (vendor-specific always allowed).
    fn check_tx_rules(&self) -> Result<(), CodecError> {
        if self.message_type == MessageType::VendorSpecific {
            return Ok(());
        }
        self.check_required_once()?;
        for tlv in &self.tlvs {
            let t = tlv.tlv_type();
            if !self.tlv_expected(t) {
                warn!(
                    "TLV {} should not appear on a {}",
                    t.name(),
                    self.message_type.name()
                );
                return Err(CodecError::UnexpectedTlv(t));
            }
        }
        Ok(())
    }

    /// Receive-side rule check: a missing required TLV rejects the CMDU,
    /// unexpected TLVs are dropped from the list.
    fn apply_rx_rules(&mut self) -> Result<(), CodecError> {
        self.check_required_once()?;
        let message_type = self.message_type;
        self.tlvs.retain(|tlv| {
            let t = tlv.tlv_type();
            let keep = t == TlvType::VendorSpecific
                || message_type.required_once().contains(&t)
                || message_type.allowed_any().contains(&t);
            if !keep {
                warn!(
                    "dropping unexpected TLV {} from received {}",
                    t.name(),
                    message_type.name()
                );
            }
            keep
        });
        Ok(())
    }

    fn check_required_once(&self) -> Result<(), CodecError> {
        for &required in self.message_type.required_once() {
            let count = self
                .tlvs
                .iter()
                .filter(|tlv| tlv.tlv_type() == required)
                .count();
            if count != 1 {
                warn!(
                    "TLV {} should appear once on a {}, appears {} times",
                    required.name(),
                    self.message_type.name(),
                    count
                );
                return Err(CodecError::MissingRequiredTlv(required));
            }
        }
        Ok(())
    }

    fn tlv_expected(&self, t: TlvType) -> bool {
        t == TlvType::VendorSpecific
            || self.message_type.required_once().contains(&t)
            || self.message_type.allowed_any().contains(&t)
    }
}

/// Render the first bytes of an unparseable TLV for the log.
fn dump_head(buf: &Bytes) -> String {
    let head = &buf[..buf.len().min(32)];
    head.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::MacAddress;
    use crate::tlv::*;

    fn mac(last: u8) -> MacAddress {
        MacAddress([0x02, 0x00, 0x00, 0x00, 0x00, last])
    }

    fn topology_discovery() -> Cmdu {
        Cmdu::new(
            MessageType::TopologyDiscovery,
            7,
            vec![
                Tlv::AlMacAddress(AlMacAddress {
                    al_mac_address: mac(1),
                }),
                Tlv::MacAddress(MacAddressType {
                    mac_address: mac(2),
                }),
            ],
        )
    }

    #[test]
    fn single_fragment_round_trip() {
        let cmdu = topology_discovery();
        let fragments = cmdu.forge(MAX_NETWORK_SEGMENT_SIZE).unwrap();
        assert_eq!(fragments.len(), 1);
        // version, reserved, type, mid, fragment 0, last-fragment flag
        assert_eq!(&fragments[0][..8], &[0, 0, 0, 0, 0, 7, 0, 0x80]);
        // trailing end-of-message TLV
        assert_eq!(&fragments[0][fragments[0].len() - 3..], &[0, 0, 0]);
        let parsed = Cmdu::parse(&fragments).unwrap();
        assert_eq!(parsed, cmdu);
    }

    #[test]
    fn missing_required_tlv_fails_both_ways() {
        let mut cmdu = topology_discovery();
        cmdu.tlvs.pop();
        assert!(matches!(
            cmdu.forge(MAX_NETWORK_SEGMENT_SIZE),
            Err(CodecError::MissingRequiredTlv(TlvType::MacAddress))
        ));

        // Same CMDU received over the wire: forge without rules by faking a
        // vendor-specific wrapper is not possible, so build the frame by hand.
        let mut raw = BytesMut::new();
        raw.put_slice(&[0, 0, 0, 0, 0, 7, 0, 0x80]);
        raw.extend_from_slice(
            &Tlv::AlMacAddress(AlMacAddress {
                al_mac_address: mac(1),
            })
            .forge()
            .unwrap(),
        );
        raw.put_slice(&[0, 0, 0]);
        assert!(Cmdu::parse(&[raw.freeze()]).is_err());
    }

    #[test]
    fn unexpected_tlv_rejected_on_send_dropped_on_receive() {
        // A topology response carrying a searched-role TLV.
        let cmdu = Cmdu::new(
            MessageType::TopologyResponse,
            1,
            vec![
                Tlv::DeviceInformation(DeviceInformation {
                    al_mac_address: mac(1),
                    local_interfaces: vec![],
                }),
                Tlv::SearchedRole(SearchedRole {
                    role: IEEE_1905_REGISTRAR_ROLE,
                }),
            ],
        );
        assert_eq!(
            cmdu.forge(MAX_NETWORK_SEGMENT_SIZE),
            Err(CodecError::UnexpectedTlv(TlvType::SearchedRole))
        );

        // Receive path: build the same frame manually and expect the
        // searched-role TLV to be silently removed.
        let mut raw = BytesMut::new();
        raw.put_slice(&[0, 0, 0, 3, 0, 1, 0, 0x80]);
        for tlv in &cmdu.tlvs {
            raw.extend_from_slice(&tlv.forge().unwrap());
        }
        raw.put_slice(&[0, 0, 0]);
        let parsed = Cmdu::parse(&[raw.freeze()]).unwrap();
        assert_eq!(parsed.tlvs.len(), 1);
        assert_eq!(parsed.tlvs[0].tlv_type(), TlvType::DeviceInformation);
    }

    #[test]
    fn fragmentation_at_three_thousand_bytes() {
        // 200 neighbor-list TLVs of 15 bytes each: 3000 bytes of TLV payload
        // forces 3 fragments at the default segment size.
        let tlvs: Vec<Tlv> = (0..200)
            .map(|i| {
                Tlv::NeighborDeviceList(NeighborDeviceList {
                    local_mac_address: mac(2),
                    neighbors: vec![NeighborEntry {
                        mac_address: mac(i as u8),
                        bridge_flag: false,
                    }],
                })
            })
            .collect();
        let mut cmdu = Cmdu::new(MessageType::TopologyResponse, 42, tlvs);
        cmdu.tlvs.insert(
            0,
            Tlv::DeviceInformation(DeviceInformation {
                al_mac_address: mac(1),
                local_interfaces: vec![],
            }),
        );

        let fragments = cmdu.forge(MAX_NETWORK_SEGMENT_SIZE).unwrap();
        assert_eq!(fragments.len(), 3);
        for (i, fragment) in fragments.iter().enumerate() {
            assert!(fragment.len() <= MAX_NETWORK_SEGMENT_SIZE);
            let header = parse_header(fragment).unwrap();
            assert_eq!(header.fragment_id as usize, i);
            assert_eq!(header.last_fragment, i == fragments.len() - 1);
            assert_eq!(header.message_id, 42);
        }

        // Reassembly from shuffled fragments restores the original.
        let shuffled = vec![
            fragments[2].clone(),
            fragments[0].clone(),
            fragments[1].clone(),
        ];
        let parsed = Cmdu::parse(&shuffled).unwrap();
        assert_eq!(parsed, cmdu);
    }

    #[test]
    fn oversized_single_tlv_is_fatal() {
        let cmdu = Cmdu::new(
            MessageType::VendorSpecific,
            1,
            vec![Tlv::VendorSpecific(VendorSpecific {
                oui: crate::addr::Oui([0, 0x25, 0x6d]),
                payload: vec![0u8; 2000].into(),
            })],
        );
        assert_eq!(
            cmdu.forge(MAX_NETWORK_SEGMENT_SIZE),
            Err(CodecError::TlvTooBig)
        );
    }

    #[test]
    fn vendor_cmdu_must_lead_with_vendor_tlv() {
        let mut raw = BytesMut::new();
        raw.put_slice(&[0, 0, 0, 4, 0, 9, 0, 0x80]);
        raw.extend_from_slice(
            &Tlv::AlMacAddress(AlMacAddress {
                al_mac_address: mac(1),
            })
            .forge()
            .unwrap(),
        );
        raw.put_slice(&[0, 0, 0]);
        assert_eq!(
            Cmdu::parse(&[raw.freeze()]),
            Err(CodecError::VendorCmduWithoutVendorTlv)
        );
    }

    #[test]
    fn relay_indicator_must_match_table() {
        // Topology discovery with the relay bit set is malformed.
        let mut raw = BytesMut::new();
        raw.put_slice(&[0, 0, 0, 0, 0, 7, 0, 0x80 | 0x40]);
        for tlv in &topology_discovery().tlvs {
            raw.extend_from_slice(&tlv.forge().unwrap());
        }
        raw.put_slice(&[0, 0, 0]);
        assert_eq!(
            Cmdu::parse(&[raw.freeze()]),
            Err(CodecError::BadFragments)
        );
    }

    #[test]
    fn last_fragment_flag_must_sit_on_last_fragment() {
        let cmdu = topology_discovery();
        let mut fragments = cmdu.forge(MAX_NETWORK_SEGMENT_SIZE).unwrap();
        // Clear the last-fragment bit.
        let mut broken = BytesMut::from(&fragments[0][..]);
        broken[7] &= !0x80;
        fragments[0] = broken.freeze();
        assert_eq!(Cmdu::parse(&fragments), Err(CodecError::BadFragments));
    }

    #[test]
    fn header_peek() {
        let fragments = topology_discovery().forge(MAX_NETWORK_SEGMENT_SIZE).unwrap();
        let header = parse_header(&fragments[0]).unwrap();
        assert_eq!(header.message_id, 7);
        assert_eq!(header.fragment_id, 0);
        assert!(header.last_fragment);
        assert!(!header.relay_indicator);
    }
}
