//! The in-memory topology data model.
//!
//! One [`DataModel`] instance holds everything the stack knows about the
//! network: the local device and its interfaces, every discovered 1905
//! device, the per-link discovery timestamps that feed bridge inference, the
//! per-device TLV cache, and the registrar singleton. All operations run on
//! the caller's event loop; nothing here blocks or locks.
//!
//! The platform timer stays outside the model: every time-sensitive
//! operation takes the current monotonic time in milliseconds.

mod cache;
mod device;

pub use cache::*;
pub use device::*;

use crate::addr::MacAddress;
use crate::error::DmError;
use crate::tlv::VendorSpecific;
use tracing::{debug, warn};

/// Gap between topology-discovery and bridge-discovery reception beyond
/// which a link is inferred to cross a transparent bridge.
pub const DISCOVERY_THRESHOLD_MS: u64 = 120_000;

/// Age in seconds after which a device record is considered out of date and
/// worth re-querying. Smaller than the 60 s topology discovery period.
pub const MAX_AGE: u64 = 50;

/// Age in seconds after which the garbage collector drops a device record.
pub const GC_MAX_AGE: u64 = 90;

/// Which discovery message refreshed a link timestamp.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DiscoveryKind {
    TopologyDiscovery,
    BridgeDiscovery,
}

/// Outcome of a discovery timestamp update.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DiscoveryUpdate {
    /// The neighbor was seen on this interface for the first time.
    FirstSighting,
    /// The neighbor was already known; `elapsed_ms` is the time since the
    /// previous discovery of the same kind on this link.
    Refreshed { elapsed_ms: u64 },
}

/// The process-wide network view, passed explicitly to everything that needs
/// it.
#[derive(Clone, PartialEq, Debug)]
pub struct DataModel {
    map_whole_network: bool,
    local_al_mac: Option<MacAddress>,
    /// Every known device; the local one (when set) is included.
    devices: Vec<AlDevice>,
    registrar: Registrar,
    /// TLV cache; index 0 is always the local device and is never aged out.
    records: Vec<NetworkDeviceRecord>,
}

impl DataModel {
    /// Create an empty model. The record list starts with the local slot;
    /// the local device itself is allocated by [`set_local_al_mac`] once its
    /// address is known.
    ///
    /// [`set_local_al_mac`]: DataModel::set_local_al_mac
    pub fn new(now_ms: u64) -> DataModel {
        DataModel {
            map_whole_network: false,
            local_al_mac: None,
            devices: Vec::new(),
            registrar: Registrar::default(),
            records: vec![NetworkDeviceRecord::new(now_ms)],
        }
    }

    /// Create the local device. May be called exactly once.
    pub fn set_local_al_mac(&mut self, al_mac: MacAddress) -> Result<(), DmError> {
        if self.local_al_mac.is_some() {
            return Err(DmError::LocalDeviceAlreadySet);
        }
        self.local_al_mac = Some(al_mac);
        self.devices.push(AlDevice::new(al_mac));
        Ok(())
    }

    pub fn local_al_mac(&self) -> Option<MacAddress> {
        self.local_al_mac
    }

    pub fn set_map_whole_network(&mut self, flag: bool) {
        self.map_whole_network = flag;
    }

    pub fn map_whole_network(&self) -> bool {
        self.map_whole_network
    }

    /// Declare the registrar/controller. May be called exactly once.
    pub fn set_registrar(&mut self, al_mac: MacAddress, is_map: bool) -> Result<(), DmError> {
        if self.registrar.device.is_some() {
            return Err(DmError::RegistrarAlreadySet);
        }
        self.registrar.device = Some(al_mac);
        self.registrar.is_map = is_map;
        Ok(())
    }

    pub fn registrar(&self) -> &Registrar {
        &self.registrar
    }

    /// Install the WSC device data for one band on the registrar.
    pub fn set_registrar_wsc(&mut self, band: RfBand, data: WscDeviceData) {
        self.registrar.wsc_data[band as usize] = data;
    }

    /// True iff the registrar service is offered by the local device.
    pub fn registrar_is_local(&self) -> bool {
        match (self.local_al_mac, self.registrar.device) {
            (Some(local), Some(registrar)) => local == registrar,
            _ => false,
        }
    }

    pub fn local_device(&self) -> Option<&AlDevice> {
        let local = self.local_al_mac?;
        self.devices.iter().find(|d| d.al_mac_addr == local)
    }

    fn local_device_mut(&mut self) -> Option<&mut AlDevice> {
        let local = self.local_al_mac?;
        self.devices.iter_mut().find(|d| d.al_mac_addr == local)
    }

    pub fn device(&self, al_mac: MacAddress) -> Option<&AlDevice> {
        self.devices.iter().find(|d| d.al_mac_addr == al_mac)
    }

    pub fn devices(&self) -> &[AlDevice] {
        &self.devices
    }

    /// Register a local interface. Idempotent when the same (name, address)
    /// pair is inserted again; a name reuse with a different address is an
    /// error.
    pub fn insert_interface(&mut self, name: &str, addr: MacAddress) -> Result<(), DmError> {
        let local = self.local_device_mut().ok_or(DmError::LocalDeviceNotSet)?;
        if let Some(existing) = local
            .interfaces
            .iter()
            .find(|i| i.name.as_deref() == Some(name))
        {
            if existing.addr == addr {
                return Ok(());
            }
            return Err(DmError::InterfaceMacMismatch(name.to_string()));
        }
        local
            .interfaces
            .push(Interface::new(Some(name.to_string()), addr));
        Ok(())
    }

    /// Register a local 802.11 interface and attach it to its radio's
    /// configured-BSS list.
    pub fn insert_wifi_interface(
        &mut self,
        name: &str,
        addr: MacAddress,
        role: WifiRole,
        bss: BssInfo,
        radio_uid: MacAddress,
    ) -> Result<(), DmError> {
        {
            let local = self.local_device_mut().ok_or(DmError::LocalDeviceNotSet)?;
            if local.radio(radio_uid).is_none() {
                return Err(DmError::NoSuchRadio(radio_uid));
            }
        }
        self.insert_interface(name, addr)?;
        let local = self.local_device_mut().expect("local device exists");
        let intf = local.interface_mut(addr).expect("interface just inserted");
        intf.interface_type = InterfaceType::Wifi;
        intf.wifi = Some(InterfaceWifi {
            role,
            bss: bss.clone(),
            radio_uid,
            clients: Vec::new(),
        });
        let radio = local
            .radios
            .iter_mut()
            .find(|r| r.uid == radio_uid)
            .expect("radio checked above");
        if !radio.configured_bsses.iter().any(|b| b.bssid == bss.bssid) {
            radio.configured_bsses.push(bss);
        }
        Ok(())
    }

    /// Register a local radio. Idempotent on the unique id.
    pub fn add_radio(&mut self, uid: MacAddress) -> Result<(), DmError> {
        let local = self.local_device_mut().ok_or(DmError::LocalDeviceNotSet)?;
        if local.radio(uid).is_none() {
            local.radios.push(Radio {
                uid,
                configured_bsses: Vec::new(),
            });
        }
        Ok(())
    }

    pub fn interface_name_to_mac(&self, name: &str) -> Option<MacAddress> {
        self.local_device()?
            .interfaces
            .iter()
            .find(|i| i.name.as_deref() == Some(name))
            .map(|i| i.addr)
    }

    pub fn mac_to_interface_name(&self, addr: MacAddress) -> Option<&str> {
        self.local_device()?
            .interfaces
            .iter()
            .find(|i| i.addr == addr)
            .and_then(|i| i.name.as_deref())
    }

    fn local_interface(&self, name: &str) -> Option<&Interface> {
        self.local_device()?
            .interfaces
            .iter()
            .find(|i| i.name.as_deref() == Some(name))
    }

    /// AL MAC addresses of the 1905 neighbors heard on one local interface.
    pub fn interface_neighbors(&self, name: &str) -> Vec<MacAddress> {
        let mut out = Vec::new();
        if let Some(intf) = self.local_interface(name) {
            for link in &intf.neighbors {
                if !out.contains(&link.device) {
                    out.push(link.device);
                }
            }
        }
        out
    }

    /// AL MAC addresses of every known 1905 neighbor, deduplicated across
    /// interfaces.
    pub fn neighbors(&self) -> Vec<MacAddress> {
        let mut out = Vec::new();
        if let Some(local) = self.local_device() {
            for intf in &local.interfaces {
                for link in &intf.neighbors {
                    if !out.contains(&link.device) {
                        out.push(link.device);
                    }
                }
            }
        }
        out
    }

    /// Every (local interface name, remote interface address) link towards
    /// one neighbor.
    pub fn links_with_neighbor(&self, al_mac: MacAddress) -> Vec<(String, MacAddress)> {
        let mut out = Vec::new();
        if let Some(local) = self.local_device() {
            for intf in &local.interfaces {
                let Some(name) = intf.name.as_deref() else {
                    continue;
                };
                for link in &intf.neighbors {
                    if link.device == al_mac {
                        out.push((name.to_string(), link.interface));
                    }
                }
            }
        }
        out
    }

    /// Map any known address (the local AL MAC, a local interface, a
    /// neighbor AL MAC or a neighbor interface) to the AL MAC of the device
    /// owning it. The lookup walks the discovery graph, so a device whose
    /// links have all been removed is no longer reachable here.
    pub fn mac_to_al_mac(&self, mac: MacAddress) -> Option<MacAddress> {
        let local_al = self.local_al_mac?;
        if mac == local_al {
            return Some(local_al);
        }
        let local = self.local_device()?;
        for intf in &local.interfaces {
            if intf.addr == mac {
                return Some(local_al);
            }
            for link in &intf.neighbors {
                if link.device == mac || link.interface == mac {
                    return Some(link.device);
                }
            }
        }
        None
    }

    /// Record the reception of a discovery message.
    ///
    /// Upserts the neighbor device, its remote interface and the link from
    /// the receiving interface, then refreshes the timestamp of `kind` on
    /// the remote interface.
    pub fn update_discovery_timestamps(
        &mut self,
        receiving_interface_addr: MacAddress,
        al_mac: MacAddress,
        remote_interface_mac: MacAddress,
        kind: DiscoveryKind,
        now_ms: u64,
    ) -> Result<DiscoveryUpdate, DmError> {
        if self
            .local_device()
            .and_then(|d| d.interface(receiving_interface_addr))
            .is_none()
        {
            warn!(
                "discovery received on unknown local interface {}",
                receiving_interface_addr
            );
            return Err(DmError::NoSuchInterface(receiving_interface_addr));
        }

        // Find or create the neighbor device and its interface.
        if self.device(al_mac).is_none() {
            self.devices.push(AlDevice::new(al_mac));
        }
        let neighbor = self
            .devices
            .iter_mut()
            .find(|d| d.al_mac_addr == al_mac)
            .expect("neighbor device exists");
        if neighbor.interface(remote_interface_mac).is_none() {
            neighbor
                .interfaces
                .push(Interface::new(None, remote_interface_mac));
        }

        // Link the receiving interface to the neighbor.
        let local = self.local_device_mut().expect("local device exists");
        let intf = local
            .interface_mut(receiving_interface_addr)
            .expect("receiving interface exists");
        let already_known = intf.neighbors.iter().any(|l| l.device == al_mac);
        let link = NeighborLink {
            device: al_mac,
            interface: remote_interface_mac,
        };
        if !intf.neighbors.contains(&link) {
            intf.neighbors.push(link);
        }

        debug!(
            "discovery timestamp update: local {} / neighbor {} / remote {}",
            receiving_interface_addr, al_mac, remote_interface_mac
        );

        let remote = self
            .devices
            .iter_mut()
            .find(|d| d.al_mac_addr == al_mac)
            .and_then(|d| d.interface_mut(remote_interface_mac))
            .expect("remote interface exists");

        let slot = match kind {
            DiscoveryKind::TopologyDiscovery => &mut remote.last_topology_discovery_ts,
            DiscoveryKind::BridgeDiscovery => &mut remote.last_bridge_discovery_ts,
        };
        let update = if already_known {
            DiscoveryUpdate::Refreshed {
                elapsed_ms: now_ms.saturating_sub(*slot),
            }
        } else {
            DiscoveryUpdate::FirstSighting
        };
        *slot = now_ms;
        Ok(update)
    }

    /// Whether the link (local interface, neighbor, remote interface) sits
    /// behind a transparent bridge: the two discovery timestamps differ by
    /// at least [`DISCOVERY_THRESHOLD_MS`]. `None` when any referenced
    /// entity does not exist.
    pub fn is_link_bridged(
        &self,
        local_interface_name: &str,
        neighbor_al_mac: MacAddress,
        remote_interface_mac: MacAddress,
    ) -> Option<bool> {
        let intf = self.local_interface(local_interface_name)?;
        intf.neighbors
            .iter()
            .find(|l| l.device == neighbor_al_mac && l.interface == remote_interface_mac)?;
        let remote = self
            .device(neighbor_al_mac)?
            .interface(remote_interface_mac)?;
        let gap = remote
            .last_topology_discovery_ts
            .abs_diff(remote.last_bridge_discovery_ts);
        Some(gap >= DISCOVERY_THRESHOLD_MS)
    }

    /// Whether any link to this neighbor through this interface is bridged.
    pub fn is_neighbor_bridged(
        &self,
        local_interface_name: &str,
        neighbor_al_mac: MacAddress,
    ) -> Option<bool> {
        let intf = self.local_interface(local_interface_name)?;
        let links: Vec<MacAddress> = intf
            .neighbors
            .iter()
            .filter(|l| l.device == neighbor_al_mac)
            .map(|l| l.interface)
            .collect();
        if links.is_empty() {
            return None;
        }
        Some(links.iter().any(|remote| {
            self.is_link_bridged(local_interface_name, neighbor_al_mac, *remote) == Some(true)
        }))
    }

    /// Whether any neighbor on this interface is bridged.
    pub fn is_interface_bridged(&self, local_interface_name: &str) -> Option<bool> {
        let intf = self.local_interface(local_interface_name)?;
        let neighbors: Vec<MacAddress> = intf.neighbors.iter().map(|l| l.device).collect();
        Some(neighbors.iter().any(|al_mac| {
            self.is_neighbor_bridged(local_interface_name, *al_mac) == Some(true)
        }))
    }

    fn record_index(&self, al_mac: MacAddress) -> Option<usize> {
        if self.local_al_mac == Some(al_mac) {
            return Some(0);
        }
        self.records
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, r)| r.matches(al_mac))
            .map(|(i, _)| i)
    }

    /// Install newly received TLVs in a device's record.
    ///
    /// Creating a record for a previously unknown device requires the
    /// device-information TLV to be part of the update; updates for unknown
    /// devices without it are discarded (the caller keeps waiting for the
    /// device information to arrive).
    pub fn update_network_device_info(
        &mut self,
        al_mac: MacAddress,
        update: DeviceInfoUpdate,
        now_ms: u64,
    ) {
        match self.record_index(al_mac) {
            Some(i) => update.apply_to(&mut self.records[i], now_ms),
            None => {
                if update.info.is_some() {
                    let mut record = NetworkDeviceRecord::new(now_ms);
                    update.apply_to(&mut record, now_ms);
                    self.records.push(record);
                } else {
                    debug!(
                        "ignoring update for unknown device {} without device information",
                        al_mac
                    );
                }
            }
        }
    }

    /// Install a received link-metric TLV, keyed by the (from, to) AL MAC
    /// pair it carries. The reporting device must already have a record; a
    /// new slot is created per reported-against neighbor, and re-reports
    /// replace the previous TLV of the same direction.
    ///
    /// Returns false when the reporting device is unknown.
    pub fn update_network_device_metrics(&mut self, metric: LinkMetricTlv, now_ms: u64) -> bool {
        let from = metric.from_al_mac();
        let to = metric.to_al_mac();

        // Metrics from devices we have no general information about yet are
        // discarded rather than seeding half-empty records.
        let Some(record) = self.records.iter_mut().find(|r| r.matches(from)) else {
            debug!("metrics received from unknown 1905 node {}, ignoring", from);
            return false;
        };

        if record.metrics_slot_mut(to).is_none() {
            record.metrics_with_neighbors.push(NeighborMetrics {
                neighbor_al_mac_address: to,
                tx_metrics_timestamp: 0,
                tx_metrics: None,
                rx_metrics_timestamp: 0,
                rx_metrics: None,
            });
        }
        let slot = record.metrics_slot_mut(to).expect("slot just ensured");
        match metric {
            LinkMetricTlv::Transmitter(m) => {
                slot.tx_metrics_timestamp = now_ms;
                slot.tx_metrics = Some(m);
            }
            LinkMetricTlv::Receiver(m) => {
                slot.rx_metrics_timestamp = now_ms;
                slot.rx_metrics = Some(m);
            }
        }
        true
    }

    /// Whether the device's record is missing or older than [`MAX_AGE`].
    pub fn network_device_info_needs_update(&self, al_mac: MacAddress, now_ms: u64) -> bool {
        match self.records.iter().find(|r| r.matches(al_mac)) {
            None => true,
            Some(record) => now_ms.saturating_sub(record.update_timestamp) > MAX_AGE * 1000,
        }
    }

    pub fn record(&self, al_mac: MacAddress) -> Option<&NetworkDeviceRecord> {
        self.records.iter().find(|r| r.matches(al_mac))
    }

    pub fn local_record(&self) -> &NetworkDeviceRecord {
        &self.records[0]
    }

    pub fn local_record_mut(&mut self) -> &mut NetworkDeviceRecord {
        &mut self.records[0]
    }

    /// The vendor extension area of a device's record.
    pub fn extensions(&self, al_mac: MacAddress) -> Option<&Vec<VendorSpecific>> {
        self.records.iter().find(|r| r.matches(al_mac)).map(|r| &r.extensions)
    }

    pub fn extensions_mut(&mut self, al_mac: MacAddress) -> Option<&mut Vec<VendorSpecific>> {
        self.records
            .iter_mut()
            .find(|r| r.matches(al_mac))
            .map(|r| &mut r.extensions)
    }

    /// Drop every non-local device whose record is older than [`GC_MAX_AGE`]
    /// or whose AL MAC has disappeared from the discovery graph, along with
    /// every cross-reference to it. Record order is not preserved. Returns
    /// the number of devices removed.
    pub fn run_garbage_collector(&mut self, now_ms: u64) -> usize {
        let mut removed = 0;

        // Index 0 is the local device: always refreshed on demand, never
        // collected.
        let mut i = 1;
        while i < self.records.len() {
            let too_old =
                now_ms.saturating_sub(self.records[i].update_timestamp) > GC_MAX_AGE * 1000;
            let al_mac = self.records[i].info.as_ref().map(|info| info.al_mac_address);
            let unreachable = match al_mac {
                Some(mac) => self.mac_to_al_mac(mac).is_none(),
                None => false,
            };
            if !too_old && !unreachable {
                i += 1;
                continue;
            }

            match al_mac {
                Some(mac) => debug!("removing old device entry {}", mac),
                None => warn!("removing old device entry (unknown AL MAC)"),
            }
            self.records.swap_remove(i);
            removed += 1;

            let Some(al_mac) = al_mac else { continue };

            // Purge metric entries other devices keep against the removed
            // one.
            for record in &mut self.records {
                record
                    .metrics_with_neighbors
                    .retain(|m| m.neighbor_al_mac_address != al_mac);
            }

            // And drop it from the discovery graph.
            self.remove_al_neighbor_from_interface(al_mac, None);
            self.devices.retain(|d| d.al_mac_addr != al_mac);
        }

        removed
    }

    /// Remove a neighbor from one local interface's neighbor list, or from
    /// every interface when `interface_name` is `None`.
    pub fn remove_al_neighbor_from_interface(
        &mut self,
        al_mac: MacAddress,
        interface_name: Option<&str>,
    ) {
        let Some(local) = self.local_device_mut() else {
            return;
        };
        for intf in &mut local.interfaces {
            if let Some(name) = interface_name {
                if intf.name.as_deref() != Some(name) {
                    continue;
                }
            }
            intf.neighbors.retain(|l| l.device != al_mac);
        }
    }

    /// Emit a textual dump of every device record through `write`, one line
    /// per field.
    pub fn dump(&self, write: &mut dyn FnMut(&str)) {
        write(&format!("network_devices_nr: {}\n", self.records.len()));
        for (i, record) in self.records.iter().enumerate() {
            let prefix = format!("network_devices[{i}]->");
            write(&format!(
                "{prefix}update_timestamp: {}\n",
                record.update_timestamp
            ));
            let mut emit = |p: &str, name: &str, value: String| {
                write(&format!("{p}{name}: {value}\n"));
            };
            if let Some(info) = &record.info {
                info.visit(&format!("{prefix}info->"), &mut emit);
            }
            for (j, tlv) in record.bridges.iter().enumerate() {
                tlv.visit(&format!("{prefix}bridges[{j}]->"), &mut emit);
            }
            for (j, tlv) in record.non1905_neighbors.iter().enumerate() {
                tlv.visit(&format!("{prefix}non1905_neighbors[{j}]->"), &mut emit);
            }
            for (j, tlv) in record.x1905_neighbors.iter().enumerate() {
                tlv.visit(&format!("{prefix}x1905_neighbors[{j}]->"), &mut emit);
            }
            for (j, tlv) in record.power_off.iter().enumerate() {
                tlv.visit(&format!("{prefix}power_off[{j}]->"), &mut emit);
            }
            for (j, tlv) in record.l2_neighbors.iter().enumerate() {
                tlv.visit(&format!("{prefix}l2_neighbors[{j}]->"), &mut emit);
            }
            if let Some(tlv) = &record.supported_service {
                tlv.visit(&format!("{prefix}supported_service->"), &mut emit);
            }
            if let Some(tlv) = &record.generic_phy {
                tlv.visit(&format!("{prefix}generic_phy->"), &mut emit);
            }
            if let Some(tlv) = &record.profile {
                tlv.visit(&format!("{prefix}profile->"), &mut emit);
            }
            if let Some(tlv) = &record.identification {
                tlv.visit(&format!("{prefix}identification->"), &mut emit);
            }
            if let Some(tlv) = &record.control_url {
                tlv.visit(&format!("{prefix}control_url->"), &mut emit);
            }
            if let Some(tlv) = &record.ipv4 {
                tlv.visit(&format!("{prefix}ipv4->"), &mut emit);
            }
            if let Some(tlv) = &record.ipv6 {
                tlv.visit(&format!("{prefix}ipv6->"), &mut emit);
            }
            for (j, metrics) in record.metrics_with_neighbors.iter().enumerate() {
                let p = format!("{prefix}metrics[{j}]->");
                emit(
                    &p,
                    "neighbor_al_mac_address",
                    metrics.neighbor_al_mac_address.to_string(),
                );
                if let Some(tx) = &metrics.tx_metrics {
                    tx.visit(&format!("{p}tx->"), &mut emit);
                }
                if let Some(rx) = &metrics.rx_metrics {
                    rx.visit(&format!("{p}rx->"), &mut emit);
                }
            }
            for (j, tlv) in record.extensions.iter().enumerate() {
                tlv.visit(&format!("{prefix}extensions[{j}]->"), &mut emit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv::{DeviceInformation, MediaType, TransmitterLinkMetric, TransmitterLinkMetricEntry};

    fn mac(last: u8) -> MacAddress {
        MacAddress([0x02, 0x00, 0x00, 0x00, 0x00, last])
    }

    fn device_info(al_mac: MacAddress) -> DeviceInformation {
        DeviceInformation {
            al_mac_address: al_mac,
            local_interfaces: vec![],
        }
    }

    fn model_with_eth0() -> DataModel {
        let mut dm = DataModel::new(0);
        dm.set_local_al_mac(mac(0x01)).unwrap();
        dm.insert_interface("eth0", mac(0x02)).unwrap();
        dm
    }

    #[test]
    fn local_device_is_created_once() {
        let mut dm = DataModel::new(0);
        assert!(dm.set_local_al_mac(mac(1)).is_ok());
        assert_eq!(
            dm.set_local_al_mac(mac(2)),
            Err(DmError::LocalDeviceAlreadySet)
        );
        assert_eq!(dm.local_al_mac(), Some(mac(1)));
    }

    #[test]
    fn registrar_is_write_once() {
        let mut dm = model_with_eth0();
        assert!(!dm.registrar_is_local());
        dm.set_registrar(mac(0x01), true).unwrap();
        assert!(dm.registrar_is_local());
        assert_eq!(
            dm.set_registrar(mac(0xaa), false),
            Err(DmError::RegistrarAlreadySet)
        );
    }

    #[test]
    fn interface_insertion_is_idempotent_on_same_mac() {
        let mut dm = model_with_eth0();
        assert!(dm.insert_interface("eth0", mac(0x02)).is_ok());
        assert_eq!(
            dm.insert_interface("eth0", mac(0x03)),
            Err(DmError::InterfaceMacMismatch("eth0".into()))
        );
        assert_eq!(dm.interface_name_to_mac("eth0"), Some(mac(0x02)));
        assert_eq!(dm.mac_to_interface_name(mac(0x02)), Some("eth0"));
    }

    #[test]
    fn topology_discovery_inserts_neighbor() {
        // A topology discovery from AL aa, interface ab, received on eth0.
        let mut dm = model_with_eth0();
        let update = dm
            .update_discovery_timestamps(
                mac(0x02),
                mac(0xaa),
                mac(0xab),
                DiscoveryKind::TopologyDiscovery,
                1000,
            )
            .unwrap();
        assert_eq!(update, DiscoveryUpdate::FirstSighting);
        assert_eq!(dm.interface_neighbors("eth0"), vec![mac(0xaa)]);
        // No bridge discovery seen yet: the 1000 ms gap stays below the
        // threshold only because both stamps started from zero.
        assert_eq!(dm.is_link_bridged("eth0", mac(0xaa), mac(0xab)), Some(false));

        let update = dm
            .update_discovery_timestamps(
                mac(0x02),
                mac(0xaa),
                mac(0xab),
                DiscoveryKind::TopologyDiscovery,
                61_000,
            )
            .unwrap();
        assert_eq!(update, DiscoveryUpdate::Refreshed { elapsed_ms: 60_000 });
    }

    #[test]
    fn unknown_receiving_interface_is_an_error() {
        let mut dm = model_with_eth0();
        assert_eq!(
            dm.update_discovery_timestamps(
                mac(0x55),
                mac(0xaa),
                mac(0xab),
                DiscoveryKind::TopologyDiscovery,
                0,
            ),
            Err(DmError::NoSuchInterface(mac(0x55)))
        );
        assert!(dm.interface_neighbors("eth0").is_empty());
    }

    #[test]
    fn bridged_inference_threshold_boundary() {
        let mut dm = model_with_eth0();
        dm.update_discovery_timestamps(
            mac(0x02),
            mac(0xaa),
            mac(0xab),
            DiscoveryKind::BridgeDiscovery,
            0,
        )
        .unwrap();
        dm.update_discovery_timestamps(
            mac(0x02),
            mac(0xaa),
            mac(0xab),
            DiscoveryKind::TopologyDiscovery,
            119_999,
        )
        .unwrap();
        assert_eq!(dm.is_link_bridged("eth0", mac(0xaa), mac(0xab)), Some(false));
        assert_eq!(dm.is_neighbor_bridged("eth0", mac(0xaa)), Some(false));

        dm.update_discovery_timestamps(
            mac(0x02),
            mac(0xaa),
            mac(0xab),
            DiscoveryKind::TopologyDiscovery,
            120_000,
        )
        .unwrap();
        assert_eq!(dm.is_link_bridged("eth0", mac(0xaa), mac(0xab)), Some(true));
        assert_eq!(dm.is_neighbor_bridged("eth0", mac(0xaa)), Some(true));
        assert_eq!(dm.is_interface_bridged("eth0"), Some(true));

        // Unknown entities report absence, not a verdict.
        assert_eq!(dm.is_link_bridged("eth1", mac(0xaa), mac(0xab)), None);
        assert_eq!(dm.is_link_bridged("eth0", mac(0xbb), mac(0xab)), None);
    }

    #[test]
    fn mac_to_al_mac_walks_the_discovery_graph() {
        let mut dm = model_with_eth0();
        dm.update_discovery_timestamps(
            mac(0x02),
            mac(0xaa),
            mac(0xab),
            DiscoveryKind::TopologyDiscovery,
            0,
        )
        .unwrap();
        assert_eq!(dm.mac_to_al_mac(mac(0x01)), Some(mac(0x01)));
        assert_eq!(dm.mac_to_al_mac(mac(0x02)), Some(mac(0x01)));
        assert_eq!(dm.mac_to_al_mac(mac(0xaa)), Some(mac(0xaa)));
        assert_eq!(dm.mac_to_al_mac(mac(0xab)), Some(mac(0xaa)));
        assert_eq!(dm.mac_to_al_mac(mac(0x99)), None);

        dm.remove_al_neighbor_from_interface(mac(0xaa), None);
        assert_eq!(dm.mac_to_al_mac(mac(0xaa)), None);
    }

    #[test]
    fn device_record_requires_device_information() {
        let mut dm = model_with_eth0();
        // An update without the device-information TLV for an unknown
        // device leaves the table unchanged.
        dm.update_network_device_info(mac(0xaa), DeviceInfoUpdate::default(), 100);
        assert!(dm.record(mac(0xaa)).is_none());

        dm.update_network_device_info(
            mac(0xaa),
            DeviceInfoUpdate::with_info(device_info(mac(0xaa))),
            100,
        );
        let record = dm.record(mac(0xaa)).unwrap();
        assert_eq!(record.update_timestamp, 100);
    }

    #[test]
    fn metrics_require_known_reporting_device() {
        let mut dm = model_with_eth0();
        let metric = LinkMetricTlv::Transmitter(TransmitterLinkMetric {
            local_al_address: mac(0xaa),
            neighbor_al_address: mac(0xbb),
            transmitter_link_metrics: vec![tx_entry()],
        });
        assert!(!dm.update_network_device_metrics(metric.clone(), 0));

        dm.update_network_device_info(
            mac(0xaa),
            DeviceInfoUpdate::with_info(device_info(mac(0xaa))),
            0,
        );
        assert!(dm.update_network_device_metrics(metric.clone(), 10));
        let record = dm.record(mac(0xaa)).unwrap();
        assert_eq!(record.metrics_with_neighbors.len(), 1);
        assert_eq!(record.metrics_with_neighbors[0].tx_metrics_timestamp, 10);

        // Same (from, to) key again: the slot is replaced, not duplicated.
        assert!(dm.update_network_device_metrics(metric, 20));
        let record = dm.record(mac(0xaa)).unwrap();
        assert_eq!(record.metrics_with_neighbors.len(), 1);
        assert_eq!(record.metrics_with_neighbors[0].tx_metrics_timestamp, 20);
    }

    fn tx_entry() -> TransmitterLinkMetricEntry {
        TransmitterLinkMetricEntry {
            local_interface_address: mac(2),
            neighbor_interface_address: mac(0xab),
            intf_type: MediaType::IEEE_802_3AB_GIGABIT_ETHERNET,
            bridge_flag: 0,
            packet_errors: 0,
            transmitted_packets: 1,
            mac_throughput_capacity: 1000,
            link_availability: 100,
            phy_rate: 1000,
        }
    }

    #[test]
    fn needs_update_follows_max_age() {
        let mut dm = model_with_eth0();
        assert!(dm.network_device_info_needs_update(mac(0xaa), 0));
        dm.update_network_device_info(
            mac(0xaa),
            DeviceInfoUpdate::with_info(device_info(mac(0xaa))),
            0,
        );
        assert!(!dm.network_device_info_needs_update(mac(0xaa), MAX_AGE * 1000));
        assert!(dm.network_device_info_needs_update(mac(0xaa), MAX_AGE * 1000 + 1));
    }

    #[test]
    fn garbage_collector_sweeps_stale_devices() {
        let mut dm = model_with_eth0();
        dm.update_discovery_timestamps(
            mac(0x02),
            mac(0xaa),
            mac(0xab),
            DiscoveryKind::TopologyDiscovery,
            0,
        )
        .unwrap();
        dm.update_network_device_info(
            mac(0xaa),
            DeviceInfoUpdate::with_info(device_info(mac(0xaa))),
            0,
        );
        // Another device holding metrics against the one about to expire.
        dm.update_network_device_info(
            mac(0xbb),
            DeviceInfoUpdate::with_info(device_info(mac(0xbb))),
            91_000,
        );
        dm.update_discovery_timestamps(
            mac(0x02),
            mac(0xbb),
            mac(0xbc),
            DiscoveryKind::TopologyDiscovery,
            91_000,
        )
        .unwrap();
        dm.update_network_device_metrics(
            LinkMetricTlv::Transmitter(TransmitterLinkMetric {
                local_al_address: mac(0xbb),
                neighbor_al_address: mac(0xaa),
                transmitter_link_metrics: vec![tx_entry()],
            }),
            91_000,
        );

        // 91 s after the aa record was written: one device collected.
        assert_eq!(dm.run_garbage_collector(91_000), 1);
        assert!(dm.record(mac(0xaa)).is_none());
        assert!(dm.interface_neighbors("eth0").iter().all(|m| *m != mac(0xaa)));
        // The cross-referenced metric entry went with it.
        assert!(dm
            .record(mac(0xbb))
            .unwrap()
            .metrics_with_neighbors
            .is_empty());

        // Idempotence: nothing left to collect.
        assert_eq!(dm.run_garbage_collector(91_000), 0);
    }

    #[test]
    fn garbage_collector_drops_unreachable_devices() {
        let mut dm = model_with_eth0();
        dm.update_discovery_timestamps(
            mac(0x02),
            mac(0xaa),
            mac(0xab),
            DiscoveryKind::TopologyDiscovery,
            0,
        )
        .unwrap();
        dm.update_network_device_info(
            mac(0xaa),
            DeviceInfoUpdate::with_info(device_info(mac(0xaa))),
            0,
        );
        // Fresh record, but the neighbor links are gone (interface down).
        dm.remove_al_neighbor_from_interface(mac(0xaa), Some("eth0"));
        assert_eq!(dm.run_garbage_collector(1), 1);
        assert!(dm.record(mac(0xaa)).is_none());
    }

    #[test]
    fn wifi_interfaces_attach_to_radios() {
        let mut dm = model_with_eth0();
        let bss = BssInfo {
            bssid: mac(0x91),
            ssid: crate::tlv::Ssid::new(b"home").unwrap(),
        };
        assert_eq!(
            dm.insert_wifi_interface("wlan0", mac(0x90), WifiRole::Ap, bss.clone(), mac(0x80)),
            Err(DmError::NoSuchRadio(mac(0x80)))
        );
        dm.add_radio(mac(0x80)).unwrap();
        dm.insert_wifi_interface("wlan0", mac(0x90), WifiRole::Ap, bss, mac(0x80))
            .unwrap();
        let local = dm.local_device().unwrap();
        let intf = local.interface(mac(0x90)).unwrap();
        assert_eq!(intf.interface_type, InterfaceType::Wifi);
        assert_eq!(local.radio(mac(0x80)).unwrap().configured_bsses.len(), 1);
    }

    #[test]
    fn dump_renders_every_record() {
        let mut dm = model_with_eth0();
        dm.update_network_device_info(
            mac(0xaa),
            DeviceInfoUpdate::with_info(device_info(mac(0xaa))),
            0,
        );
        let mut out = String::new();
        dm.dump(&mut |line| out.push_str(line));
        assert!(out.contains("network_devices_nr: 2"));
        assert!(out.contains("al_mac_address: 02:00:00:00:00:aa"));
    }
}
