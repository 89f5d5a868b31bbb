//! The per-device TLV cache.
//!
//! For every 1905 device (the local one at index 0, then one record per
//! remote device) the stack caches the most recently received TLVs that
//! describe it. Single-instance TLV types occupy one slot each; types that
//! may repeat are kept as lists. The record owns its TLVs: installing a new
//! one drops its predecessor.

use crate::addr::MacAddress;
use crate::tlv::{
    ControlUrl, DeviceBridgingCapability, DeviceIdentification, DeviceInformation,
    GenericPhyDeviceInformation, Ipv4, Ipv6, L2NeighborDevice, NeighborDeviceList,
    Non1905NeighborDeviceList, PowerOffInterface, ProfileVersion, ReceiverLinkMetric,
    SupportedService, TransmitterLinkMetric, VendorSpecific,
};

/// Link metrics reported by one device about the links towards one of its
/// neighbors, each direction with its own reception timestamp.
#[derive(Clone, PartialEq, Debug)]
pub struct NeighborMetrics {
    pub neighbor_al_mac_address: MacAddress,
    pub tx_metrics_timestamp: u64,
    pub tx_metrics: Option<TransmitterLinkMetric>,
    pub rx_metrics_timestamp: u64,
    pub rx_metrics: Option<ReceiverLinkMetric>,
}

/// A transmitter or receiver link-metric TLV handed to the metrics updater.
#[derive(Clone, PartialEq, Debug)]
pub enum LinkMetricTlv {
    Transmitter(TransmitterLinkMetric),
    Receiver(ReceiverLinkMetric),
}

impl LinkMetricTlv {
    /// The device the metrics are reported from.
    pub fn from_al_mac(&self) -> MacAddress {
        match self {
            LinkMetricTlv::Transmitter(m) => m.local_al_address,
            LinkMetricTlv::Receiver(m) => m.local_al_address,
        }
    }

    /// The device the metrics are reported against.
    pub fn to_al_mac(&self) -> MacAddress {
        match self {
            LinkMetricTlv::Transmitter(m) => m.neighbor_al_address,
            LinkMetricTlv::Receiver(m) => m.neighbor_al_address,
        }
    }
}

/// The cached TLVs of one 1905 device.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct NetworkDeviceRecord {
    /// Milliseconds timestamp of the last update; drives re-query gating and
    /// garbage collection.
    pub update_timestamp: u64,
    pub info: Option<DeviceInformation>,
    pub bridges: Vec<DeviceBridgingCapability>,
    pub non1905_neighbors: Vec<Non1905NeighborDeviceList>,
    pub x1905_neighbors: Vec<NeighborDeviceList>,
    pub power_off: Vec<PowerOffInterface>,
    pub l2_neighbors: Vec<L2NeighborDevice>,
    pub supported_service: Option<SupportedService>,
    pub generic_phy: Option<GenericPhyDeviceInformation>,
    pub profile: Option<ProfileVersion>,
    pub identification: Option<DeviceIdentification>,
    pub control_url: Option<ControlUrl>,
    pub ipv4: Option<Ipv4>,
    pub ipv6: Option<Ipv6>,
    pub metrics_with_neighbors: Vec<NeighborMetrics>,
    /// Vendor-specific TLVs attached by extension modules. The record frees
    /// them uniformly on teardown; their content is the owning module's
    /// business.
    pub extensions: Vec<VendorSpecific>,
}

impl NetworkDeviceRecord {
    pub(crate) fn new(now_ms: u64) -> NetworkDeviceRecord {
        NetworkDeviceRecord {
            update_timestamp: now_ms,
            ..NetworkDeviceRecord::default()
        }
    }

    pub(crate) fn matches(&self, al_mac: MacAddress) -> bool {
        self.info
            .as_ref()
            .map(|info| info.al_mac_address == al_mac)
            .unwrap_or(false)
    }

    pub(crate) fn metrics_slot_mut(
        &mut self,
        neighbor: MacAddress,
    ) -> Option<&mut NeighborMetrics> {
        self.metrics_with_neighbors
            .iter_mut()
            .find(|m| m.neighbor_al_mac_address == neighbor)
    }
}

/// One per-slot update of a device record. `Some` installs the carried value
/// (dropping the previous one), `None` leaves the existing slot untouched.
/// Installing an empty list clears the slot.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct DeviceInfoUpdate {
    pub info: Option<DeviceInformation>,
    pub bridges: Option<Vec<DeviceBridgingCapability>>,
    pub non1905_neighbors: Option<Vec<Non1905NeighborDeviceList>>,
    pub x1905_neighbors: Option<Vec<NeighborDeviceList>>,
    pub power_off: Option<Vec<PowerOffInterface>>,
    pub l2_neighbors: Option<Vec<L2NeighborDevice>>,
    pub supported_service: Option<SupportedService>,
    pub generic_phy: Option<GenericPhyDeviceInformation>,
    pub profile: Option<ProfileVersion>,
    pub identification: Option<DeviceIdentification>,
    pub control_url: Option<ControlUrl>,
    pub ipv4: Option<Ipv4>,
    pub ipv6: Option<Ipv6>,
}

impl DeviceInfoUpdate {
    /// An update carrying only the device-information TLV.
    pub fn with_info(info: DeviceInformation) -> DeviceInfoUpdate {
        DeviceInfoUpdate {
            info: Some(info),
            ..DeviceInfoUpdate::default()
        }
    }

    pub(crate) fn apply_to(self, record: &mut NetworkDeviceRecord, now_ms: u64) {
        record.update_timestamp = now_ms;
        if let Some(info) = self.info {
            record.info = Some(info);
        }
        if let Some(bridges) = self.bridges {
            record.bridges = bridges;
        }
        if let Some(non1905) = self.non1905_neighbors {
            record.non1905_neighbors = non1905;
        }
        if let Some(x1905) = self.x1905_neighbors {
            record.x1905_neighbors = x1905;
        }
        if let Some(power_off) = self.power_off {
            record.power_off = power_off;
        }
        if let Some(l2) = self.l2_neighbors {
            record.l2_neighbors = l2;
        }
        if let Some(ss) = self.supported_service {
            record.supported_service = Some(ss);
        }
        if let Some(phy) = self.generic_phy {
            record.generic_phy = Some(phy);
        }
        if let Some(profile) = self.profile {
            record.profile = Some(profile);
        }
        if let Some(id) = self.identification {
            record.identification = Some(id);
        }
        if let Some(url) = self.control_url {
            record.control_url = Some(url);
        }
        if let Some(ipv4) = self.ipv4 {
            record.ipv4 = Some(ipv4);
        }
        if let Some(ipv6) = self.ipv6 {
            record.ipv6 = Some(ipv6);
        }
    }
}
