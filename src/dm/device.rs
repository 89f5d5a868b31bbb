//! The entities of the topology data model: devices, interfaces, radios and
//! the registrar.

use crate::addr::MacAddress;
use crate::tlv::{MediaType, Ssid};

/// Rough classification of an L2 interface.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InterfaceType {
    Ethernet,
    Wifi,
    #[default]
    Other,
}

/// Role of an 802.11 interface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WifiRole {
    Ap,
    Sta,
    Other,
}

/// A BSS: its BSSID and network name.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct BssInfo {
    pub bssid: MacAddress,
    pub ssid: Ssid,
}

/// A client associated to one of our APs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ClientInfo {
    pub addr: MacAddress,
    /// Milliseconds timestamp of the association.
    pub since_ms: u64,
}

/// 802.11 refinement of an [`Interface`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InterfaceWifi {
    pub role: WifiRole,
    pub bss: BssInfo,
    /// Unique id of the radio this BSS is configured on.
    pub radio_uid: MacAddress,
    /// Associated clients; only populated when `role` is AP.
    pub clients: Vec<ClientInfo>,
}

/// A reference from a local interface to a 1905 neighbor interface. The
/// referenced interface is owned by its device; the link only names it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NeighborLink {
    /// AL MAC address of the owning device.
    pub device: MacAddress,
    /// Address of the remote interface.
    pub interface: MacAddress,
}

/// An L2 interface. Local interfaces carry a name and a neighbor list;
/// interfaces discovered on remote devices carry neither.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Interface {
    pub name: Option<String>,
    pub addr: MacAddress,
    pub interface_type: InterfaceType,
    pub media_type: MediaType,
    /// Media-specific information bytes, at most 16.
    pub media_specific_info: Vec<u8>,
    /// Milliseconds timestamp of the last topology discovery received from
    /// this interface. Unused on interfaces of the local device.
    pub last_topology_discovery_ts: u64,
    /// Milliseconds timestamp of the last LLDP bridge discovery received
    /// from this interface.
    pub last_bridge_discovery_ts: u64,
    /// 1905 neighbors heard on this interface. Only populated on local
    /// interfaces.
    pub neighbors: Vec<NeighborLink>,
    pub wifi: Option<InterfaceWifi>,
}

impl Interface {
    pub(crate) fn new(name: Option<String>, addr: MacAddress) -> Interface {
        Interface {
            name,
            addr,
            interface_type: InterfaceType::default(),
            media_type: MediaType::UNKNOWN,
            media_specific_info: Vec::new(),
            last_topology_discovery_ts: 0,
            last_bridge_discovery_ts: 0,
            neighbors: Vec::new(),
            wifi: None,
        }
    }
}

/// An 802.11 radio and the BSSes configured on it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Radio {
    /// Radio Unique Identifier.
    pub uid: MacAddress,
    pub configured_bsses: Vec<BssInfo>,
}

/// A 1905.1 device, one per AL MAC address known to the stack, the local
/// device included.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AlDevice {
    pub al_mac_addr: MacAddress,
    /// True when the device advertises the Multi-AP agent service.
    pub is_map_agent: bool,
    pub interfaces: Vec<Interface>,
    pub radios: Vec<Radio>,
}

impl AlDevice {
    pub(crate) fn new(al_mac_addr: MacAddress) -> AlDevice {
        AlDevice {
            al_mac_addr,
            is_map_agent: false,
            interfaces: Vec::new(),
            radios: Vec::new(),
        }
    }

    pub fn interface(&self, addr: MacAddress) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.addr == addr)
    }

    pub(crate) fn interface_mut(&mut self, addr: MacAddress) -> Option<&mut Interface> {
        self.interfaces.iter_mut().find(|i| i.addr == addr)
    }

    pub fn radio(&self, uid: MacAddress) -> Option<&Radio> {
        self.radios.iter().find(|r| r.uid == uid)
    }
}

/// WPS constants used in [`WscDeviceData`].
pub const WPS_AUTH_OPEN: u16 = 0x0001;
pub const WPS_AUTH_WPAPSK: u16 = 0x0002;
pub const WPS_AUTH_SHARED: u16 = 0x0004;
pub const WPS_AUTH_WPA: u16 = 0x0008;
pub const WPS_AUTH_WPA2: u16 = 0x0010;
pub const WPS_AUTH_WPA2PSK: u16 = 0x0020;

pub const WPS_ENCR_NONE: u16 = 0x0001;
pub const WPS_ENCR_WEP: u16 = 0x0002;
pub const WPS_ENCR_TKIP: u16 = 0x0004;
pub const WPS_ENCR_AES: u16 = 0x0008;

pub const WPS_RF_24GHZ: u8 = 0x01;
pub const WPS_RF_50GHZ: u8 = 0x02;
pub const WPS_RF_60GHZ: u8 = 0x04;

/// RF band index into the registrar's per-band WSC slots.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RfBand {
    Band2_4 = 0,
    Band5 = 1,
    Band60 = 2,
}

/// Device data configured through a WSC exchange, one instance per RF band.
///
/// An empty slot has a zero `bssid` and zero `rf_bands`. Only PSK
/// authentication is supported, so the key is a fixed-size buffer.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct WscDeviceData {
    pub bssid: MacAddress,
    pub device_name: String,
    pub manufacturer_name: String,
    pub model_name: String,
    pub model_number: String,
    pub serial_number: String,
    pub uuid: [u8; 16],
    /// Bitmask of `WPS_RF_*` values.
    pub rf_bands: u8,
    pub ssid: Ssid,
    /// Bitmask of `WPS_AUTH_*` values.
    pub auth_types: u16,
    /// Bitmask of `WPS_ENCR_*` values.
    pub encr_types: u16,
    /// Pre-shared key, at most 64 octets.
    pub key: Vec<u8>,
}

impl WscDeviceData {
    pub fn is_empty(&self) -> bool {
        self.bssid.is_zero() && self.rf_bands == 0
    }
}

/// The AP-autoconfiguration registrar / Multi-AP controller singleton.
///
/// At most one registrar exists in the network. The local device is the
/// registrar iff `device` names it.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Registrar {
    /// AL MAC of the device offering the registrar/controller service.
    pub device: Option<MacAddress>,
    /// True for a Multi-AP controller, false for a plain 1905.1 registrar.
    pub is_map: bool,
    /// Per-band WSC device data (2.4 / 5 / 60 GHz).
    pub wsc_data: [WscDeviceData; 3],
}
