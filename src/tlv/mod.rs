//! The IEEE 1905.1/1a TLV codec.
//!
//! Every TLV defined by "IEEE Std 1905.1-2013, Section 6.4" plus the Multi-AP
//! (Wi-Fi EasyMesh) additions is modelled as one variant of [`Tlv`], each with
//! its own structure type. Per variant the codec offers:
//!
//! * `parse`  — bytes to structure, with exact length validation,
//! * `forge`  — structure to bytes (3-byte header + body),
//! * structural equality via `PartialEq`,
//! * `visit`  — walk every leaf field, handing (prefix, name, rendered value)
//!   to a caller-supplied callback, decoupling traversal from formatting.
//!
//! On the wire a TLV is a 1-byte type, a 2-byte big-endian body length, and
//! the body. The end-of-message TLV (type 0, length 0) is a framing artifact:
//! it is synthesized by the CMDU forger and consumed by the CMDU parser, and
//! never appears in a TLV list.

mod basic;
mod bridging;
mod device_info;
mod generic_phy;
mod higher_layer;
mod l2;
mod link_metric;
mod media;
mod multi_ap;
mod neighbors;
mod power;
mod vendor;
mod wsc;

pub use self::basic::*;
pub use self::bridging::*;
pub use self::device_info::*;
pub use self::generic_phy::*;
pub use self::higher_layer::*;
pub use self::l2::*;
pub use self::link_metric::*;
pub use self::media::*;
pub use self::multi_ap::*;
pub use self::neighbors::*;
pub use self::power::*;
pub use self::vendor::*;
pub use self::wsc::*;

use crate::error::CodecError;
use crate::wire::{self, ensure_remaining};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::warn;

/// The 1-byte TLV type discriminant.
///
/// Values 0..=30 come from "IEEE Std 1905.1-2013, Table 6-7"; the 0x80 range
/// from the Multi-AP specification.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum TlvType {
    EndOfMessage,
    AlMacAddress,
    MacAddress,
    DeviceInformation,
    DeviceBridgingCapability,
    Non1905NeighborDeviceList,
    NeighborDeviceList,
    LinkMetricQuery,
    TransmitterLinkMetric,
    ReceiverLinkMetric,
    VendorSpecific,
    LinkMetricResultCode,
    SearchedRole,
    AutoconfigFreqBand,
    SupportedRole,
    SupportedFreqBand,
    Wsc,
    PushButtonEventNotification,
    PushButtonJoinNotification,
    GenericPhyDeviceInformation,
    DeviceIdentification,
    ControlUrl,
    Ipv4,
    Ipv6,
    PushButtonGenericPhyEventNotification,
    ProfileVersion,
    PowerOffInterface,
    InterfacePowerChangeInformation,
    InterfacePowerChangeStatus,
    L2NeighborDevice,
    SupportedService,
    SearchedService,
    ApOperationalBss,
    AssociatedClients,
    Unknown(u8),
}

impl From<u8> for TlvType {
    fn from(code: u8) -> Self {
        match code {
            0 => TlvType::EndOfMessage,
            1 => TlvType::AlMacAddress,
            2 => TlvType::MacAddress,
            3 => TlvType::DeviceInformation,
            4 => TlvType::DeviceBridgingCapability,
            6 => TlvType::Non1905NeighborDeviceList,
            7 => TlvType::NeighborDeviceList,
            8 => TlvType::LinkMetricQuery,
            9 => TlvType::TransmitterLinkMetric,
            10 => TlvType::ReceiverLinkMetric,
            11 => TlvType::VendorSpecific,
            12 => TlvType::LinkMetricResultCode,
            13 => TlvType::SearchedRole,
            14 => TlvType::AutoconfigFreqBand,
            15 => TlvType::SupportedRole,
            16 => TlvType::SupportedFreqBand,
            17 => TlvType::Wsc,
            18 => TlvType::PushButtonEventNotification,
            19 => TlvType::PushButtonJoinNotification,
            20 => TlvType::GenericPhyDeviceInformation,
            21 => TlvType::DeviceIdentification,
            22 => TlvType::ControlUrl,
            23 => TlvType::Ipv4,
            24 => TlvType::Ipv6,
            25 => TlvType::PushButtonGenericPhyEventNotification,
            26 => TlvType::ProfileVersion,
            27 => TlvType::PowerOffInterface,
            28 => TlvType::InterfacePowerChangeInformation,
            29 => TlvType::InterfacePowerChangeStatus,
            30 => TlvType::L2NeighborDevice,
            0x80 => TlvType::SupportedService,
            0x81 => TlvType::SearchedService,
            0x83 => TlvType::ApOperationalBss,
            0x84 => TlvType::AssociatedClients,
            n => TlvType::Unknown(n),
        }
    }
}

impl TlvType {
    pub fn value(self) -> u8 {
        match self {
            TlvType::EndOfMessage => 0,
            TlvType::AlMacAddress => 1,
            TlvType::MacAddress => 2,
            TlvType::DeviceInformation => 3,
            TlvType::DeviceBridgingCapability => 4,
            TlvType::Non1905NeighborDeviceList => 6,
            TlvType::NeighborDeviceList => 7,
            TlvType::LinkMetricQuery => 8,
            TlvType::TransmitterLinkMetric => 9,
            TlvType::ReceiverLinkMetric => 10,
            TlvType::VendorSpecific => 11,
            TlvType::LinkMetricResultCode => 12,
            TlvType::SearchedRole => 13,
            TlvType::AutoconfigFreqBand => 14,
            TlvType::SupportedRole => 15,
            TlvType::SupportedFreqBand => 16,
            TlvType::Wsc => 17,
            TlvType::PushButtonEventNotification => 18,
            TlvType::PushButtonJoinNotification => 19,
            TlvType::GenericPhyDeviceInformation => 20,
            TlvType::DeviceIdentification => 21,
            TlvType::ControlUrl => 22,
            TlvType::Ipv4 => 23,
            TlvType::Ipv6 => 24,
            TlvType::PushButtonGenericPhyEventNotification => 25,
            TlvType::ProfileVersion => 26,
            TlvType::PowerOffInterface => 27,
            TlvType::InterfacePowerChangeInformation => 28,
            TlvType::InterfacePowerChangeStatus => 29,
            TlvType::L2NeighborDevice => 30,
            TlvType::SupportedService => 0x80,
            TlvType::SearchedService => 0x81,
            TlvType::ApOperationalBss => 0x83,
            TlvType::AssociatedClients => 0x84,
            TlvType::Unknown(n) => n,
        }
    }

    /// Diagnostic name, used in log messages and dumps.
    pub fn name(self) -> &'static str {
        match self {
            TlvType::EndOfMessage => "END_OF_MESSAGE",
            TlvType::AlMacAddress => "AL_MAC_ADDRESS",
            TlvType::MacAddress => "MAC_ADDRESS",
            TlvType::DeviceInformation => "DEVICE_INFORMATION",
            TlvType::DeviceBridgingCapability => "DEVICE_BRIDGING_CAPABILITIES",
            TlvType::Non1905NeighborDeviceList => "NON_1905_NEIGHBOR_DEVICE_LIST",
            TlvType::NeighborDeviceList => "NEIGHBOR_DEVICE_LIST",
            TlvType::LinkMetricQuery => "LINK_METRIC_QUERY",
            TlvType::TransmitterLinkMetric => "TRANSMITTER_LINK_METRIC",
            TlvType::ReceiverLinkMetric => "RECEIVER_LINK_METRIC",
            TlvType::VendorSpecific => "VENDOR_SPECIFIC",
            TlvType::LinkMetricResultCode => "LINK_METRIC_RESULT_CODE",
            TlvType::SearchedRole => "SEARCHED_ROLE",
            TlvType::AutoconfigFreqBand => "AUTOCONFIG_FREQ_BAND",
            TlvType::SupportedRole => "SUPPORTED_ROLE",
            TlvType::SupportedFreqBand => "SUPPORTED_FREQ_BAND",
            TlvType::Wsc => "WSC",
            TlvType::PushButtonEventNotification => "PUSH_BUTTON_EVENT_NOTIFICATION",
            TlvType::PushButtonJoinNotification => "PUSH_BUTTON_JOIN_NOTIFICATION",
            TlvType::GenericPhyDeviceInformation => "GENERIC_PHY_DEVICE_INFORMATION",
            TlvType::DeviceIdentification => "DEVICE_IDENTIFICATION",
            TlvType::ControlUrl => "CONTROL_URL",
            TlvType::Ipv4 => "IPV4",
            TlvType::Ipv6 => "IPV6",
            TlvType::PushButtonGenericPhyEventNotification => {
                "PUSH_BUTTON_GENERIC_PHY_EVENT_NOTIFICATION"
            }
            TlvType::ProfileVersion => "1905_PROFILE_VERSION",
            TlvType::PowerOffInterface => "POWER_OFF_INTERFACE",
            TlvType::InterfacePowerChangeInformation => "INTERFACE_POWER_CHANGE_INFORMATION",
            TlvType::InterfacePowerChangeStatus => "INTERFACE_POWER_CHANGE_STATUS",
            TlvType::L2NeighborDevice => "L2_NEIGHBOR_DEVICE",
            TlvType::SupportedService => "SUPPORTED_SERVICE",
            TlvType::SearchedService => "SEARCHED_SERVICE",
            TlvType::ApOperationalBss => "AP_OPERATIONAL_BSS",
            TlvType::AssociatedClients => "ASSOCIATED_CLIENTS",
            TlvType::Unknown(_) => "UNKNOWN",
        }
    }
}

/// Callback invoked by the visitors once per leaf field with
/// `(prefix, field name, rendered value)`.
pub type FieldVisitor<'a> = dyn FnMut(&str, &str, String) + 'a;

/// A parsed 1905.1 TLV.
#[derive(Clone, PartialEq, Debug)]
pub enum Tlv {
    AlMacAddress(AlMacAddress),
    MacAddress(MacAddressType),
    DeviceInformation(DeviceInformation),
    DeviceBridgingCapability(DeviceBridgingCapability),
    Non1905NeighborDeviceList(Non1905NeighborDeviceList),
    NeighborDeviceList(NeighborDeviceList),
    LinkMetricQuery(LinkMetricQuery),
    TransmitterLinkMetric(TransmitterLinkMetric),
    ReceiverLinkMetric(ReceiverLinkMetric),
    VendorSpecific(VendorSpecific),
    LinkMetricResultCode(LinkMetricResultCode),
    SearchedRole(SearchedRole),
    AutoconfigFreqBand(AutoconfigFreqBand),
    SupportedRole(SupportedRole),
    SupportedFreqBand(SupportedFreqBand),
    Wsc(Wsc),
    PushButtonEventNotification(PushButtonEventNotification),
    PushButtonJoinNotification(PushButtonJoinNotification),
    GenericPhyDeviceInformation(GenericPhyDeviceInformation),
    DeviceIdentification(DeviceIdentification),
    ControlUrl(ControlUrl),
    Ipv4(Ipv4),
    Ipv6(Ipv6),
    PushButtonGenericPhyEventNotification(PushButtonGenericPhyEventNotification),
    ProfileVersion(ProfileVersion),
    PowerOffInterface(PowerOffInterface),
    InterfacePowerChangeInformation(InterfacePowerChangeInformation),
    InterfacePowerChangeStatus(InterfacePowerChangeStatus),
    L2NeighborDevice(L2NeighborDevice),
    SupportedService(SupportedService),
    SearchedService(SupportedService),
    ApOperationalBss(ApOperationalBss),
    AssociatedClients(AssociatedClients),
}

impl Tlv {
    pub fn tlv_type(&self) -> TlvType {
        match self {
            Tlv::AlMacAddress(_) => TlvType::AlMacAddress,
            Tlv::MacAddress(_) => TlvType::MacAddress,
            Tlv::DeviceInformation(_) => TlvType::DeviceInformation,
            Tlv::DeviceBridgingCapability(_) => TlvType::DeviceBridgingCapability,
            Tlv::Non1905NeighborDeviceList(_) => TlvType::Non1905NeighborDeviceList,
            Tlv::NeighborDeviceList(_) => TlvType::NeighborDeviceList,
            Tlv::LinkMetricQuery(_) => TlvType::LinkMetricQuery,
            Tlv::TransmitterLinkMetric(_) => TlvType::TransmitterLinkMetric,
            Tlv::ReceiverLinkMetric(_) => TlvType::ReceiverLinkMetric,
            Tlv::VendorSpecific(_) => TlvType::VendorSpecific,
            Tlv::LinkMetricResultCode(_) => TlvType::LinkMetricResultCode,
            Tlv::SearchedRole(_) => TlvType::SearchedRole,
            Tlv::AutoconfigFreqBand(_) => TlvType::AutoconfigFreqBand,
            Tlv::SupportedRole(_) => TlvType::SupportedRole,
            Tlv::SupportedFreqBand(_) => TlvType::SupportedFreqBand,
            Tlv::Wsc(_) => TlvType::Wsc,
            Tlv::PushButtonEventNotification(_) => TlvType::PushButtonEventNotification,
            Tlv::PushButtonJoinNotification(_) => TlvType::PushButtonJoinNotification,
            Tlv::GenericPhyDeviceInformation(_) => TlvType::GenericPhyDeviceInformation,
            Tlv::DeviceIdentification(_) => TlvType::DeviceIdentification,
            Tlv::ControlUrl(_) => TlvType::ControlUrl,
            Tlv::Ipv4(_) => TlvType::Ipv4,
            Tlv::Ipv6(_) => TlvType::Ipv6,
            Tlv::PushButtonGenericPhyEventNotification(_) => {
                TlvType::PushButtonGenericPhyEventNotification
            }
            Tlv::ProfileVersion(_) => TlvType::ProfileVersion,
            Tlv::PowerOffInterface(_) => TlvType::PowerOffInterface,
            Tlv::InterfacePowerChangeInformation(_) => TlvType::InterfacePowerChangeInformation,
            Tlv::InterfacePowerChangeStatus(_) => TlvType::InterfacePowerChangeStatus,
            Tlv::L2NeighborDevice(_) => TlvType::L2NeighborDevice,
            Tlv::SupportedService(_) => TlvType::SupportedService,
            Tlv::SearchedService(_) => TlvType::SearchedService,
            Tlv::ApOperationalBss(_) => TlvType::ApOperationalBss,
            Tlv::AssociatedClients(_) => TlvType::AssociatedClients,
        }
    }

    /// Parse one TLV off the front of `buf`.
    ///
    /// On success the cursor has advanced past the TLV. The declared body
    /// length must be exactly consumed by the body parser; a shorter or longer
    /// body is a malformed TLV.
    pub fn parse(buf: &mut Bytes) -> Result<Tlv, CodecError> {
        let tlv_type = wire::read_u8(buf)?;
        let len = wire::read_u16(buf)? as usize;
        ensure_remaining!(buf, len);
        let mut body = buf.split_to(len);

        let tlv_type = TlvType::from(tlv_type);
        let parsed = match tlv_type {
            TlvType::EndOfMessage => Err(CodecError::InvalidField {
                field: "tlv_type",
                value: 0,
            }),
            TlvType::AlMacAddress => AlMacAddress::parse(&mut body).map(Tlv::AlMacAddress),
            TlvType::MacAddress => MacAddressType::parse(&mut body).map(Tlv::MacAddress),
            TlvType::DeviceInformation => {
                DeviceInformation::parse(&mut body).map(Tlv::DeviceInformation)
            }
            TlvType::DeviceBridgingCapability => {
                DeviceBridgingCapability::parse(&mut body).map(Tlv::DeviceBridgingCapability)
            }
            TlvType::Non1905NeighborDeviceList => {
                Non1905NeighborDeviceList::parse(&mut body).map(Tlv::Non1905NeighborDeviceList)
            }
            TlvType::NeighborDeviceList => {
                NeighborDeviceList::parse(&mut body).map(Tlv::NeighborDeviceList)
            }
            TlvType::LinkMetricQuery => LinkMetricQuery::parse(&mut body).map(Tlv::LinkMetricQuery),
            TlvType::TransmitterLinkMetric => {
                TransmitterLinkMetric::parse(&mut body).map(Tlv::TransmitterLinkMetric)
            }
            TlvType::ReceiverLinkMetric => {
                ReceiverLinkMetric::parse(&mut body).map(Tlv::ReceiverLinkMetric)
            }
            TlvType::VendorSpecific => VendorSpecific::parse(&mut body).map(Tlv::VendorSpecific),
            TlvType::LinkMetricResultCode => {
                LinkMetricResultCode::parse(&mut body).map(Tlv::LinkMetricResultCode)
            }
            TlvType::SearchedRole => SearchedRole::parse(&mut body).map(Tlv::SearchedRole),
            TlvType::AutoconfigFreqBand => {
                AutoconfigFreqBand::parse(&mut body).map(Tlv::AutoconfigFreqBand)
            }
            TlvType::SupportedRole => SupportedRole::parse(&mut body).map(Tlv::SupportedRole),
            TlvType::SupportedFreqBand => {
                SupportedFreqBand::parse(&mut body).map(Tlv::SupportedFreqBand)
            }
            TlvType::Wsc => Wsc::parse(&mut body).map(Tlv::Wsc),
            TlvType::PushButtonEventNotification => {
                PushButtonEventNotification::parse(&mut body).map(Tlv::PushButtonEventNotification)
            }
            TlvType::PushButtonJoinNotification => {
                PushButtonJoinNotification::parse(&mut body).map(Tlv::PushButtonJoinNotification)
            }
            TlvType::GenericPhyDeviceInformation => {
                GenericPhyDeviceInformation::parse(&mut body).map(Tlv::GenericPhyDeviceInformation)
            }
            TlvType::DeviceIdentification => {
                DeviceIdentification::parse(&mut body).map(Tlv::DeviceIdentification)
            }
            TlvType::ControlUrl => ControlUrl::parse(&mut body).map(Tlv::ControlUrl),
            TlvType::Ipv4 => Ipv4::parse(&mut body).map(Tlv::Ipv4),
            TlvType::Ipv6 => Ipv6::parse(&mut body).map(Tlv::Ipv6),
            TlvType::PushButtonGenericPhyEventNotification => {
                PushButtonGenericPhyEventNotification::parse(&mut body)
                    .map(Tlv::PushButtonGenericPhyEventNotification)
            }
            TlvType::ProfileVersion => ProfileVersion::parse(&mut body).map(Tlv::ProfileVersion),
            TlvType::PowerOffInterface => {
                PowerOffInterface::parse(&mut body).map(Tlv::PowerOffInterface)
            }
            TlvType::InterfacePowerChangeInformation => {
                InterfacePowerChangeInformation::parse(&mut body)
                    .map(Tlv::InterfacePowerChangeInformation)
            }
            TlvType::InterfacePowerChangeStatus => {
                InterfacePowerChangeStatus::parse(&mut body).map(Tlv::InterfacePowerChangeStatus)
            }
            TlvType::L2NeighborDevice => {
                L2NeighborDevice::parse(&mut body).map(Tlv::L2NeighborDevice)
            }
            TlvType::SupportedService => {
                SupportedService::parse(&mut body).map(Tlv::SupportedService)
            }
            TlvType::SearchedService => SupportedService::parse(&mut body).map(Tlv::SearchedService),
            TlvType::ApOperationalBss => {
                ApOperationalBss::parse(&mut body).map(Tlv::ApOperationalBss)
            }
            TlvType::AssociatedClients => {
                AssociatedClients::parse(&mut body).map(Tlv::AssociatedClients)
            }
            TlvType::Unknown(n) => Err(CodecError::UnknownTlvType(n)),
        };

        let tlv = match parsed {
            Ok(tlv) => tlv,
            Err(e) => {
                warn!("malformed {} TLV: {}", tlv_type.name(), e);
                return Err(e);
            }
        };

        if body.has_remaining() {
            warn!(
                "{} TLV declared {} bytes but its body ends {} bytes early",
                tlv_type.name(),
                len,
                body.remaining()
            );
            return Err(CodecError::LengthMismatch(tlv_type.name()));
        }
        Ok(tlv)
    }

    /// Serialize this TLV: 1-byte type, 2-byte body length, body.
    pub fn forge(&self) -> Result<Bytes, CodecError> {
        let mut body = BytesMut::new();
        self.forge_body(&mut body)?;
        if body.len() > u16::MAX as usize {
            return Err(CodecError::BodyTooBig(body.len()));
        }
        let mut out = BytesMut::with_capacity(3 + body.len());
        out.put_u8(self.tlv_type().value());
        out.put_u16(body.len() as u16);
        out.extend_from_slice(&body);
        Ok(out.freeze())
    }

    fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        match self {
            Tlv::AlMacAddress(x) => x.forge_body(out),
            Tlv::MacAddress(x) => x.forge_body(out),
            Tlv::DeviceInformation(x) => x.forge_body(out),
            Tlv::DeviceBridgingCapability(x) => x.forge_body(out),
            Tlv::Non1905NeighborDeviceList(x) => x.forge_body(out),
            Tlv::NeighborDeviceList(x) => x.forge_body(out),
            Tlv::LinkMetricQuery(x) => x.forge_body(out),
            Tlv::TransmitterLinkMetric(x) => x.forge_body(out),
            Tlv::ReceiverLinkMetric(x) => x.forge_body(out),
            Tlv::VendorSpecific(x) => x.forge_body(out),
            Tlv::LinkMetricResultCode(x) => x.forge_body(out),
            Tlv::SearchedRole(x) => x.forge_body(out),
            Tlv::AutoconfigFreqBand(x) => x.forge_body(out),
            Tlv::SupportedRole(x) => x.forge_body(out),
            Tlv::SupportedFreqBand(x) => x.forge_body(out),
            Tlv::Wsc(x) => x.forge_body(out),
            Tlv::PushButtonEventNotification(x) => x.forge_body(out),
            Tlv::PushButtonJoinNotification(x) => x.forge_body(out),
            Tlv::GenericPhyDeviceInformation(x) => x.forge_body(out),
            Tlv::DeviceIdentification(x) => x.forge_body(out),
            Tlv::ControlUrl(x) => x.forge_body(out),
            Tlv::Ipv4(x) => x.forge_body(out),
            Tlv::Ipv6(x) => x.forge_body(out),
            Tlv::PushButtonGenericPhyEventNotification(x) => x.forge_body(out),
            Tlv::ProfileVersion(x) => x.forge_body(out),
            Tlv::PowerOffInterface(x) => x.forge_body(out),
            Tlv::InterfacePowerChangeInformation(x) => x.forge_body(out),
            Tlv::InterfacePowerChangeStatus(x) => x.forge_body(out),
            Tlv::L2NeighborDevice(x) => x.forge_body(out),
            Tlv::SupportedService(x) => x.forge_body(out),
            Tlv::SearchedService(x) => x.forge_body(out),
            Tlv::ApOperationalBss(x) => x.forge_body(out),
            Tlv::AssociatedClients(x) => x.forge_body(out),
        }
    }

    /// Walk the structure, invoking `emit` once per leaf field.
    pub fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        match self {
            Tlv::AlMacAddress(x) => x.visit(prefix, emit),
            Tlv::MacAddress(x) => x.visit(prefix, emit),
            Tlv::DeviceInformation(x) => x.visit(prefix, emit),
            Tlv::DeviceBridgingCapability(x) => x.visit(prefix, emit),
            Tlv::Non1905NeighborDeviceList(x) => x.visit(prefix, emit),
            Tlv::NeighborDeviceList(x) => x.visit(prefix, emit),
            Tlv::LinkMetricQuery(x) => x.visit(prefix, emit),
            Tlv::TransmitterLinkMetric(x) => x.visit(prefix, emit),
            Tlv::ReceiverLinkMetric(x) => x.visit(prefix, emit),
            Tlv::VendorSpecific(x) => x.visit(prefix, emit),
            Tlv::LinkMetricResultCode(x) => x.visit(prefix, emit),
            Tlv::SearchedRole(x) => x.visit(prefix, emit),
            Tlv::AutoconfigFreqBand(x) => x.visit(prefix, emit),
            Tlv::SupportedRole(x) => x.visit(prefix, emit),
            Tlv::SupportedFreqBand(x) => x.visit(prefix, emit),
            Tlv::Wsc(x) => x.visit(prefix, emit),
            Tlv::PushButtonEventNotification(x) => x.visit(prefix, emit),
            Tlv::PushButtonJoinNotification(x) => x.visit(prefix, emit),
            Tlv::GenericPhyDeviceInformation(x) => x.visit(prefix, emit),
            Tlv::DeviceIdentification(x) => x.visit(prefix, emit),
            Tlv::ControlUrl(x) => x.visit(prefix, emit),
            Tlv::Ipv4(x) => x.visit(prefix, emit),
            Tlv::Ipv6(x) => x.visit(prefix, emit),
            Tlv::PushButtonGenericPhyEventNotification(x) => x.visit(prefix, emit),
            Tlv::ProfileVersion(x) => x.visit(prefix, emit),
            Tlv::PowerOffInterface(x) => x.visit(prefix, emit),
            Tlv::InterfacePowerChangeInformation(x) => x.visit(prefix, emit),
            Tlv::InterfacePowerChangeStatus(x) => x.visit(prefix, emit),
            Tlv::L2NeighborDevice(x) => x.visit(prefix, emit),
            Tlv::SupportedService(x) => x.visit(prefix, emit),
            Tlv::SearchedService(x) => x.visit(prefix, emit),
            Tlv::ApOperationalBss(x) => x.visit(prefix, emit),
            Tlv::AssociatedClients(x) => x.visit(prefix, emit),
        }
    }
}

/// Render a byte slice as space-separated hex pairs.
pub(crate) fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render possibly-binary text: printable ASCII verbatim, everything else as
/// an escaped hex byte.
pub(crate) fn printable_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if b.is_ascii_graphic() || b == b' ' {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\x{b:02x}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::{MacAddress, Oui};

    fn round_trip(tlv: Tlv) {
        let bytes = tlv.forge().unwrap();
        // Forge length property: total = declared body length + 3.
        let declared = u16::from_be_bytes([bytes[1], bytes[2]]) as usize;
        assert_eq!(bytes.len(), declared + 3);
        let mut buf = bytes.clone();
        let reparsed = Tlv::parse(&mut buf).unwrap();
        assert!(!bytes::Buf::has_remaining(&buf));
        assert_eq!(tlv, reparsed, "round trip failed for {bytes:02x?}");
    }

    fn mac(last: u8) -> MacAddress {
        MacAddress([0x02, 0x00, 0x00, 0x00, 0x00, last])
    }

    #[test]
    fn round_trip_every_variant() {
        round_trip(Tlv::AlMacAddress(AlMacAddress {
            al_mac_address: mac(1),
        }));
        round_trip(Tlv::MacAddress(MacAddressType {
            mac_address: mac(2),
        }));
        round_trip(Tlv::DeviceInformation(DeviceInformation {
            al_mac_address: mac(1),
            local_interfaces: vec![
                LocalInterfaceInfo {
                    mac_address: mac(2),
                    media_type: MediaType::IEEE_802_3AB_GIGABIT_ETHERNET,
                    media_specific_data: MediaSpecificData::None,
                },
                LocalInterfaceInfo {
                    mac_address: mac(3),
                    media_type: MediaType::IEEE_802_11G_2_4_GHZ,
                    media_specific_data: MediaSpecificData::Ieee80211 {
                        network_membership: mac(9),
                        role: IEEE80211_ROLE_AP,
                        ap_channel_band: 1,
                        ap_channel_center_frequency_index_1: 6,
                        ap_channel_center_frequency_index_2: 0,
                    },
                },
                LocalInterfaceInfo {
                    mac_address: mac(4),
                    media_type: MediaType::IEEE_1901_FFT,
                    media_specific_data: MediaSpecificData::Ieee1901 {
                        network_identifier: [1, 2, 3, 4, 5, 6, 7],
                    },
                },
            ],
        }));
        round_trip(Tlv::DeviceBridgingCapability(DeviceBridgingCapability {
            bridging_tuples: vec![
                BridgingTuple {
                    macs: vec![mac(2), mac(3)],
                },
                BridgingTuple { macs: vec![] },
            ],
        }));
        round_trip(Tlv::Non1905NeighborDeviceList(Non1905NeighborDeviceList {
            local_mac_address: mac(2),
            non_1905_neighbors: vec![mac(0x10), mac(0x11)],
        }));
        round_trip(Tlv::NeighborDeviceList(NeighborDeviceList {
            local_mac_address: mac(2),
            neighbors: vec![
                NeighborEntry {
                    mac_address: mac(0xaa),
                    bridge_flag: true,
                },
                NeighborEntry {
                    mac_address: mac(0xab),
                    bridge_flag: false,
                },
            ],
        }));
        round_trip(Tlv::LinkMetricQuery(LinkMetricQuery {
            destination: LinkMetricDestination::SpecificNeighbor,
            specific_neighbor: mac(0xaa),
            link_metrics_type: LinkMetricsType::RxOnly,
        }));
        round_trip(Tlv::TransmitterLinkMetric(TransmitterLinkMetric {
            local_al_address: mac(1),
            neighbor_al_address: mac(0xaa),
            transmitter_link_metrics: vec![TransmitterLinkMetricEntry {
                local_interface_address: mac(2),
                neighbor_interface_address: mac(0xab),
                intf_type: MediaType::IEEE_802_3AB_GIGABIT_ETHERNET,
                bridge_flag: 0,
                packet_errors: 12,
                transmitted_packets: 3456,
                mac_throughput_capacity: 1000,
                link_availability: 100,
                phy_rate: 1000,
            }],
        }));
        round_trip(Tlv::ReceiverLinkMetric(ReceiverLinkMetric {
            local_al_address: mac(1),
            neighbor_al_address: mac(0xaa),
            receiver_link_metrics: vec![ReceiverLinkMetricEntry {
                local_interface_address: mac(2),
                neighbor_interface_address: mac(0xab),
                intf_type: MediaType::IEEE_802_11AC_5_GHZ,
                packet_errors: 0,
                packets_received: 9999,
                rssi: 220,
            }],
        }));
        round_trip(Tlv::VendorSpecific(VendorSpecific {
            oui: Oui([0x00, 0x25, 0x6d]),
            payload: vec![1, 2, 3, 4].into(),
        }));
        round_trip(Tlv::LinkMetricResultCode(LinkMetricResultCode {
            result_code: LINK_METRIC_RESULT_CODE_INVALID_NEIGHBOR,
        }));
        round_trip(Tlv::SearchedRole(SearchedRole {
            role: IEEE_1905_REGISTRAR_ROLE,
        }));
        round_trip(Tlv::AutoconfigFreqBand(AutoconfigFreqBand {
            freq_band: FREQ_BAND_2_4_GHZ,
        }));
        round_trip(Tlv::SupportedRole(SupportedRole {
            role: IEEE_1905_REGISTRAR_ROLE,
        }));
        round_trip(Tlv::SupportedFreqBand(SupportedFreqBand {
            freq_band: FREQ_BAND_5_GHZ,
        }));
        round_trip(Tlv::Wsc(Wsc {
            frame: vec![0x10, 0x4a, 0x00, 0x01, 0x10].into(),
        }));
        round_trip(Tlv::PushButtonEventNotification(
            PushButtonEventNotification {
                media_types: vec![MediaTypeEntry {
                    media_type: MediaType::IEEE_802_11N_2_4_GHZ,
                    media_specific_data: MediaSpecificData::Ieee80211 {
                        network_membership: mac(9),
                        role: IEEE80211_ROLE_AP,
                        ap_channel_band: 0,
                        ap_channel_center_frequency_index_1: 1,
                        ap_channel_center_frequency_index_2: 0,
                    },
                }],
            },
        ));
        round_trip(Tlv::PushButtonJoinNotification(PushButtonJoinNotification {
            al_mac_address: mac(1),
            message_identifier: 0x4242,
            mac_address: mac(2),
            new_mac_address: mac(0x77),
        }));
        round_trip(Tlv::GenericPhyDeviceInformation(
            GenericPhyDeviceInformation {
                al_mac_address: mac(1),
                local_interfaces: vec![GenericPhyInterfaceEntry {
                    local_interface_address: mac(5),
                    generic_phy_common_data: GenericPhyCommonData {
                        oui: Oui([0x00, 0x19, 0xa7]),
                        variant_index: 1,
                        media_specific_bytes: vec![0x01, 0x02].into(),
                    },
                    variant_name: padded(b"ITU-T G.hn, profile 1"),
                    generic_phy_description_xml_url: Bytes::from_static(
                        b"http://example.invalid/ghn.xml",
                    ),
                }],
            },
        ));
        round_trip(Tlv::DeviceIdentification(DeviceIdentification {
            friendly_name: padded(b"kitchen-router"),
            manufacturer_name: padded(b"ACME"),
            manufacturer_model: padded(b"AM-1905"),
        }));
        round_trip(Tlv::ControlUrl(ControlUrl {
            url: Bytes::from_static(b"http://192.168.1.1/"),
        }));
        round_trip(Tlv::Ipv4(Ipv4 {
            ipv4_interfaces: vec![Ipv4Interface {
                mac_address: mac(2),
                addresses: vec![Ipv4Entry {
                    kind: IPV4_TYPE_DHCP,
                    address: [192, 168, 1, 10],
                    dhcp_server: [192, 168, 1, 1],
                }],
            }],
        }));
        round_trip(Tlv::Ipv6(Ipv6 {
            ipv6_interfaces: vec![Ipv6Interface {
                mac_address: mac(2),
                link_local_address: [0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
                addresses: vec![Ipv6Entry {
                    kind: IPV6_TYPE_SLAAC,
                    address: [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2],
                    origin: [0; 16],
                }],
            }],
        }));
        round_trip(Tlv::PushButtonGenericPhyEventNotification(
            PushButtonGenericPhyEventNotification {
                local_interfaces: vec![GenericPhyCommonData {
                    oui: Oui([0x00, 0x19, 0xa7]),
                    variant_index: 0,
                    media_specific_bytes: Bytes::new(),
                }],
            },
        ));
        round_trip(Tlv::ProfileVersion(ProfileVersion {
            profile: PROFILE_1905_1A,
        }));
        round_trip(Tlv::PowerOffInterface(PowerOffInterface {
            power_off_interfaces: vec![PowerOffInterfaceEntry {
                interface_address: mac(2),
                media_type: MediaType::UNKNOWN,
                generic_phy_common_data: GenericPhyCommonData {
                    oui: Oui([0x00, 0x19, 0xa7]),
                    variant_index: 2,
                    media_specific_bytes: Bytes::new(),
                },
            }],
        }));
        round_trip(Tlv::InterfacePowerChangeInformation(
            InterfacePowerChangeInformation {
                power_change_interfaces: vec![PowerChangeRequest {
                    interface_address: mac(2),
                    requested_power_state: POWER_STATE_SAVE,
                }],
            },
        ));
        round_trip(Tlv::InterfacePowerChangeStatus(InterfacePowerChangeStatus {
            power_change_interfaces: vec![PowerChangeStatus {
                interface_address: mac(2),
                result: POWER_CHANGE_COMPLETED,
            }],
        }));
        round_trip(Tlv::L2NeighborDevice(L2NeighborDevice {
            local_interfaces: vec![L2InterfaceEntry {
                local_mac_address: mac(2),
                l2_neighbors: vec![L2NeighborEntry {
                    l2_neighbor_mac_address: mac(0x55),
                    behind_mac_addresses: vec![mac(0x56), mac(0x57)],
                }],
            }],
        }));
        round_trip(Tlv::SupportedService(SupportedService {
            services: vec![ServiceType::MULTI_AP_AGENT],
        }));
        round_trip(Tlv::SearchedService(SupportedService {
            services: vec![ServiceType::MULTI_AP_CONTROLLER],
        }));
        round_trip(Tlv::ApOperationalBss(ApOperationalBss {
            radios: vec![ApOperationalBssRadio {
                radio_uid: mac(0x90),
                bsses: vec![ApOperationalBssInfo {
                    bssid: mac(0x91),
                    ssid: Ssid::new(b"backhaul-5g").unwrap(),
                }],
            }],
        }));
        round_trip(Tlv::AssociatedClients(AssociatedClients {
            bsses: vec![AssociatedClientsBssInfo {
                bssid: mac(0x91),
                clients: vec![AssociatedClientInfo {
                    addr: mac(0x92),
                    age: 120,
                }],
            }],
        }));
    }

    fn padded<const N: usize>(name: &[u8]) -> [u8; N] {
        let mut out = [0u8; N];
        out[..name.len()].copy_from_slice(name);
        out
    }

    #[test]
    fn link_metric_query_all_neighbors_wire_bytes() {
        // The all-neighbors query sets the first byte of the unused address
        // field to the metrics-type value, for compatibility with
        // implementations that omit the field entirely.
        let tlv = Tlv::LinkMetricQuery(LinkMetricQuery {
            destination: LinkMetricDestination::AllNeighbors,
            specific_neighbor: MacAddress::ZERO,
            link_metrics_type: LinkMetricsType::TxAndRx,
        });
        let bytes = tlv.forge().unwrap();
        assert_eq!(
            &bytes[..],
            &[0x08, 0x00, 0x08, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02]
        );
        let mut buf = bytes;
        assert_eq!(Tlv::parse(&mut buf).unwrap(), tlv);
    }

    #[test]
    fn declared_length_must_match_body() {
        // AL MAC TLV with a 7-byte body: one trailing byte inside the
        // declared length.
        let mut buf = Bytes::from_static(&[0x01, 0x00, 0x07, 1, 2, 3, 4, 5, 6, 0xff]);
        assert!(Tlv::parse(&mut buf).is_err());

        // Truncated body.
        let mut buf = Bytes::from_static(&[0x01, 0x00, 0x06, 1, 2, 3]);
        assert_eq!(Tlv::parse(&mut buf), Err(CodecError::Truncated));
    }

    #[test]
    fn media_specific_size_is_enforced() {
        // 802.11 interface entry must carry exactly 10 media-specific bytes.
        let mut bad = BytesMut::new();
        bad.put_u8(3); // device information
        bad.put_u16(6 + 1 + 6 + 2 + 1 + 3);
        bad.put_slice(&[2, 0, 0, 0, 0, 1]); // AL MAC
        bad.put_u8(1); // one interface
        bad.put_slice(&[2, 0, 0, 0, 0, 2]); // MAC
        bad.put_u16(0x0101); // 802.11g
        bad.put_u8(3); // wrong size
        bad.put_slice(&[0, 0, 0]);
        let mut buf = bad.freeze();
        assert!(Tlv::parse(&mut buf).is_err());
    }

    #[cfg(feature = "fix-broken-tlvs")]
    #[test]
    fn zero_length_list_tlvs_parse_as_empty() {
        for tlv_type in [4u8, 18, 23, 24, 25, 27, 28, 29, 30] {
            let mut buf = Bytes::from(vec![tlv_type, 0, 0]);
            let tlv = Tlv::parse(&mut buf)
                .unwrap_or_else(|e| panic!("type {tlv_type} rejected empty encoding: {e}"));
            assert_eq!(tlv.tlv_type().value(), tlv_type);
        }
    }

    #[test]
    fn supported_service_comparison_ignores_order() {
        let a = SupportedService {
            services: vec![ServiceType::MULTI_AP_CONTROLLER, ServiceType::MULTI_AP_AGENT],
        };
        let b = SupportedService {
            services: vec![ServiceType::MULTI_AP_AGENT, ServiceType::MULTI_AP_CONTROLLER],
        };
        assert_eq!(a, b);
        let c = SupportedService {
            services: vec![ServiceType::MULTI_AP_AGENT],
        };
        assert_ne!(a, c);
    }

    #[test]
    fn visit_walks_nested_fields() {
        let tlv = Tlv::NeighborDeviceList(NeighborDeviceList {
            local_mac_address: mac(2),
            neighbors: vec![NeighborEntry {
                mac_address: mac(0xaa),
                bridge_flag: true,
            }],
        });
        let mut seen = Vec::new();
        tlv.visit("dev->", &mut |prefix, name, value| {
            seen.push(format!("{prefix}{name}: {value}"));
        });
        assert!(seen.iter().any(|l| l.contains("local_mac_address")));
        assert!(seen.iter().any(|l| l.contains("bridge_flag")));
    }

    #[test]
    fn unknown_tlv_type_is_rejected() {
        let mut buf = Bytes::from_static(&[0x7f, 0x00, 0x01, 0xaa]);
        assert_eq!(Tlv::parse(&mut buf), Err(CodecError::UnknownTlvType(0x7f)));
    }
}
