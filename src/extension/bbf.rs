//! The Broadband Forum extension: link metrics towards non-1905 neighbors.
//!
//! BBF defines private TLV subtypes that mirror the standard link-metric
//! TLVs but describe links to stations that do not speak 1905. They travel
//! embedded in vendor-specific TLVs under the BBF OUI:
//!
//! * an outgoing link-metric query gains an embedded non-1905 query,
//! * a link-metric response answering such a query gains non-1905
//!   transmitter/receiver metric TLVs, one pair per non-1905 neighbor,
//! * the same TLVs feed the extended data-model rows shown in ALME dumps.
//!
//! Because a non-1905 neighbor has no AL MAC address, the `neighbor_al`
//! field of these TLVs is all-zero and the neighbor is identified by its
//! interface address inside the per-link entries.

use crate::addr::{MacAddress, Oui};
use crate::cmdu::{Cmdu, MessageType};
use crate::dm::DataModel;
use crate::error::{CodecError, DmError};
use crate::extension::{
    embed_extension, insert_in_cmdu, vendor_tlvs_with_oui, CmduExtension, DataModelExtension,
    ExtensionRegistry,
};
use crate::tlv::{
    FieldVisitor, LinkMetricQuery, LinkMetricResultCode, ReceiverLinkMetric,
    ReceiverLinkMetricEntry, TransmitterLinkMetric, TransmitterLinkMetricEntry, VendorSpecific,
};
use crate::wire::{self, ensure_remaining};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

pub const BBF_OUI: Oui = Oui([0x00, 0x25, 0x6d]);

pub const BBF_TLV_TYPE_NON_1905_LINK_METRIC_QUERY: u8 = 1;
pub const BBF_TLV_TYPE_NON_1905_TRANSMITTER_LINK_METRIC: u8 = 2;
pub const BBF_TLV_TYPE_NON_1905_RECEIVER_LINK_METRIC: u8 = 3;
pub const BBF_TLV_TYPE_NON_1905_LINK_METRIC_RESULT_CODE: u8 = 4;

/// A BBF private TLV. The bodies reuse the standard link-metric layouts
/// under BBF subtype codes.
#[derive(Clone, PartialEq, Debug)]
pub enum BbfTlv {
    Non1905LinkMetricQuery(LinkMetricQuery),
    Non1905TransmitterLinkMetric(TransmitterLinkMetric),
    Non1905ReceiverLinkMetric(ReceiverLinkMetric),
    Non1905LinkMetricResultCode(LinkMetricResultCode),
}

impl BbfTlv {
    pub fn tlv_type(&self) -> u8 {
        match self {
            BbfTlv::Non1905LinkMetricQuery(_) => BBF_TLV_TYPE_NON_1905_LINK_METRIC_QUERY,
            BbfTlv::Non1905TransmitterLinkMetric(_) => {
                BBF_TLV_TYPE_NON_1905_TRANSMITTER_LINK_METRIC
            }
            BbfTlv::Non1905ReceiverLinkMetric(_) => BBF_TLV_TYPE_NON_1905_RECEIVER_LINK_METRIC,
            BbfTlv::Non1905LinkMetricResultCode(_) => BBF_TLV_TYPE_NON_1905_LINK_METRIC_RESULT_CODE,
        }
    }

    /// Parse a BBF TLV from a vendor-specific payload.
    pub fn parse(stream: &[u8]) -> Result<BbfTlv, CodecError> {
        let mut buf = Bytes::copy_from_slice(stream);
        let tlv_type = wire::read_u8(&mut buf)?;
        let len = wire::read_u16(&mut buf)? as usize;
        ensure_remaining!(buf, len);
        let mut body = buf.split_to(len);
        let tlv = match tlv_type {
            BBF_TLV_TYPE_NON_1905_LINK_METRIC_QUERY => {
                BbfTlv::Non1905LinkMetricQuery(LinkMetricQuery::parse(&mut body)?)
            }
            BBF_TLV_TYPE_NON_1905_TRANSMITTER_LINK_METRIC => {
                BbfTlv::Non1905TransmitterLinkMetric(TransmitterLinkMetric::parse(&mut body)?)
            }
            BBF_TLV_TYPE_NON_1905_RECEIVER_LINK_METRIC => {
                BbfTlv::Non1905ReceiverLinkMetric(ReceiverLinkMetric::parse(&mut body)?)
            }
            BBF_TLV_TYPE_NON_1905_LINK_METRIC_RESULT_CODE => {
                BbfTlv::Non1905LinkMetricResultCode(LinkMetricResultCode::parse(&mut body)?)
            }
            n => return Err(CodecError::UnknownTlvType(n)),
        };
        if body.has_remaining() {
            return Err(CodecError::LengthMismatch("BBF"));
        }
        Ok(tlv)
    }

    /// Serialize with the same 3-byte header as a standard TLV.
    pub fn forge(&self) -> Result<Bytes, CodecError> {
        let mut body = BytesMut::new();
        match self {
            BbfTlv::Non1905LinkMetricQuery(q) => q.forge_body(&mut body)?,
            BbfTlv::Non1905TransmitterLinkMetric(m) => m.forge_body(&mut body)?,
            BbfTlv::Non1905ReceiverLinkMetric(m) => m.forge_body(&mut body)?,
            BbfTlv::Non1905LinkMetricResultCode(c) => c.forge_body(&mut body)?,
        }
        if body.len() > u16::MAX as usize {
            return Err(CodecError::BodyTooBig(body.len()));
        }
        let mut out = BytesMut::with_capacity(3 + body.len());
        out.put_u8(self.tlv_type());
        out.put_u16(body.len() as u16);
        out.extend_from_slice(&body);
        Ok(out.freeze())
    }

    pub fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        match self {
            BbfTlv::Non1905LinkMetricQuery(q) => q.visit(prefix, emit),
            BbfTlv::Non1905TransmitterLinkMetric(m) => m.visit(prefix, emit),
            BbfTlv::Non1905ReceiverLinkMetric(m) => m.visit(prefix, emit),
            BbfTlv::Non1905LinkMetricResultCode(c) => c.visit(prefix, emit),
        }
    }

    fn is_metric(payload: &[u8]) -> bool {
        matches!(
            payload.first(),
            Some(&BBF_TLV_TYPE_NON_1905_TRANSMITTER_LINK_METRIC)
                | Some(&BBF_TLV_TYPE_NON_1905_RECEIVER_LINK_METRIC)
                | Some(&BBF_TLV_TYPE_NON_1905_LINK_METRIC_RESULT_CODE)
        )
    }
}

/// Link metrics for one (local interface, non-1905 neighbor) link, supplied
/// by the platform.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Non1905LinkMetrics {
    /// Interface address of the non-1905 neighbor.
    pub neighbor: MacAddress,
    pub tx: TransmitterLinkMetricEntry,
    pub rx: ReceiverLinkMetricEntry,
}

/// Source of local non-1905 link metrics. Collection involves the platform's
/// interface statistics, which stay outside the core.
pub trait Non1905MetricsSource {
    fn collect(&mut self, dm: &DataModel) -> Vec<Non1905LinkMetrics>;
}

struct BbfState {
    source: Box<dyn Non1905MetricsSource>,
    /// Latched when a received link-metric query carried an embedded BBF
    /// query; consumed by the next outgoing link-metric response.
    query_pending: bool,
}

/// The BBF extension. One instance registers into both extension tables and
/// shares its state between them.
#[derive(Clone)]
pub struct BbfExtension {
    state: Rc<RefCell<BbfState>>,
}

impl BbfExtension {
    pub fn new(source: Box<dyn Non1905MetricsSource>) -> BbfExtension {
        BbfExtension {
            state: Rc::new(RefCell::new(BbfState {
                source,
                query_pending: false,
            })),
        }
    }

    /// Register the extension in both tables of `registry`.
    pub fn register(
        registry: &mut ExtensionRegistry,
        source: Box<dyn Non1905MetricsSource>,
    ) -> Result<BbfExtension, DmError> {
        let extension = BbfExtension::new(source);
        registry.register_cmdu_extension(Box::new(extension.clone()))?;
        registry.register_dm_extension(Box::new(extension.clone()))?;
        Ok(extension)
    }

    /// Build the per-neighbor non-1905 metric TLV pairs from the platform
    /// source, already embedded in vendor-specific TLVs.
    fn local_metric_tlvs(&self, dm: &DataModel) -> Result<Vec<VendorSpecific>, CodecError> {
        let local_al = dm.local_al_mac().unwrap_or(MacAddress::ZERO);
        let links = self.state.borrow_mut().source.collect(dm);

        // Group links by neighbor; each neighbor gets one Tx and one Rx TLV
        // with one entry per link.
        let mut neighbors: Vec<MacAddress> = Vec::new();
        for link in &links {
            if !neighbors.contains(&link.neighbor) {
                neighbors.push(link.neighbor);
            }
        }

        let mut out = Vec::new();
        for neighbor in neighbors {
            let entries: Vec<&Non1905LinkMetrics> =
                links.iter().filter(|l| l.neighbor == neighbor).collect();
            let tx = BbfTlv::Non1905TransmitterLinkMetric(TransmitterLinkMetric {
                local_al_address: local_al,
                // A non-1905 neighbor has no AL MAC address.
                neighbor_al_address: MacAddress::ZERO,
                transmitter_link_metrics: entries.iter().map(|l| l.tx).collect(),
            });
            let rx = BbfTlv::Non1905ReceiverLinkMetric(ReceiverLinkMetric {
                local_al_address: local_al,
                neighbor_al_address: MacAddress::ZERO,
                receiver_link_metrics: entries.iter().map(|l| l.rx).collect(),
            });
            out.push(embed_extension(tx.forge()?, BBF_OUI));
            out.push(embed_extension(rx.forge()?, BBF_OUI));
        }
        Ok(out)
    }
}

impl CmduExtension for BbfExtension {
    fn name(&self) -> &str {
        "bbf"
    }

    fn process(&mut self, dm: &mut DataModel, cmdu: &Cmdu) {
        match cmdu.message_type {
            MessageType::LinkMetricQuery => {
                // A peer interested in non-1905 metrics embeds a BBF query;
                // remember it so the response can carry the metrics.
                for vs in vendor_tlvs_with_oui(cmdu, BBF_OUI) {
                    if matches!(
                        BbfTlv::parse(&vs.payload),
                        Ok(BbfTlv::Non1905LinkMetricQuery(_))
                    ) {
                        self.state.borrow_mut().query_pending = true;
                    }
                }
            }
            MessageType::LinkMetricResponse => {
                // Route received non-1905 metrics into the reporting
                // device's extension area.
                let metric_tlvs: Vec<VendorSpecific> = vendor_tlvs_with_oui(cmdu, BBF_OUI)
                    .filter(|vs| BbfTlv::is_metric(&vs.payload))
                    .cloned()
                    .collect();
                if metric_tlvs.is_empty() {
                    return;
                }
                let Some(reporter) = metric_tlvs
                    .iter()
                    .find_map(|vs| match BbfTlv::parse(&vs.payload) {
                        Ok(BbfTlv::Non1905TransmitterLinkMetric(m)) => Some(m.local_al_address),
                        Ok(BbfTlv::Non1905ReceiverLinkMetric(m)) => Some(m.local_al_address),
                        _ => None,
                    })
                else {
                    return;
                };
                self.update_info(dm, &metric_tlvs, reporter);
            }
            _ => {}
        }
    }

    fn send(&mut self, dm: &DataModel, cmdu: &mut Cmdu) {
        match cmdu.message_type {
            MessageType::LinkMetricQuery => {
                let query =
                    BbfTlv::Non1905LinkMetricQuery(LinkMetricQuery::all_neighbors_both_directions());
                if let Ok(body) = query.forge() {
                    insert_in_cmdu(cmdu, embed_extension(body, BBF_OUI));
                }
            }
            MessageType::LinkMetricResponse => {
                let pending = {
                    let mut state = self.state.borrow_mut();
                    std::mem::take(&mut state.query_pending)
                };
                if !pending {
                    return;
                }
                match self.local_metric_tlvs(dm) {
                    Ok(tlvs) => {
                        for vs in tlvs {
                            insert_in_cmdu(cmdu, vs);
                        }
                    }
                    Err(e) => debug!("could not build non-1905 metric TLVs: {e}"),
                }
            }
            _ => {}
        }
    }
}

impl DataModelExtension for BbfExtension {
    fn name(&self) -> &str {
        "bbf"
    }

    fn obtain_local_info(&mut self, dm: &DataModel) -> Vec<VendorSpecific> {
        match self.local_metric_tlvs(dm) {
            Ok(tlvs) if !tlvs.is_empty() => tlvs,
            // No non-1905 neighbors: report that as an explicit result code.
            _ => {
                let result = BbfTlv::Non1905LinkMetricResultCode(LinkMetricResultCode {
                    result_code: crate::tlv::LINK_METRIC_RESULT_CODE_INVALID_NEIGHBOR,
                });
                match result.forge() {
                    Ok(body) => vec![embed_extension(body, BBF_OUI)],
                    Err(_) => Vec::new(),
                }
            }
        }
    }

    fn update_info(&mut self, dm: &mut DataModel, tlvs: &[VendorSpecific], al_mac: MacAddress) {
        let incoming: Vec<VendorSpecific> = tlvs
            .iter()
            .filter(|vs| vs.oui == BBF_OUI && BbfTlv::is_metric(&vs.payload))
            .cloned()
            .collect();
        if incoming.is_empty() {
            return;
        }
        let Some(extensions) = dm.extensions_mut(al_mac) else {
            debug!("extension received from unknown 1905 node {al_mac}, ignoring");
            return;
        };
        // A response always carries the complete metric set, so replace
        // whatever BBF metrics the previous one left behind.
        extensions.retain(|vs| !(vs.oui == BBF_OUI && BbfTlv::is_metric(&vs.payload)));
        extensions.extend(incoming);
    }

    fn dump(&self, tlvs: &[VendorSpecific], emit: &mut FieldVisitor, prefix: &str) {
        // Present the metrics grouped per non-1905 neighbor interface, the
        // way the standard metric TLVs are grouped per device.
        let mut neighbors: Vec<MacAddress> = Vec::new();
        let mut parsed: Vec<(MacAddress, BbfTlv)> = Vec::new();
        for vs in tlvs {
            if vs.oui != BBF_OUI {
                continue;
            }
            let Ok(tlv) = BbfTlv::parse(&vs.payload) else {
                continue;
            };
            let neighbor = match &tlv {
                BbfTlv::Non1905TransmitterLinkMetric(m) => m
                    .transmitter_link_metrics
                    .first()
                    .map(|e| e.neighbor_interface_address),
                BbfTlv::Non1905ReceiverLinkMetric(m) => m
                    .receiver_link_metrics
                    .first()
                    .map(|e| e.neighbor_interface_address),
                _ => None,
            };
            let Some(neighbor) = neighbor else { continue };
            if !neighbors.contains(&neighbor) {
                neighbors.push(neighbor);
            }
            parsed.push((neighbor, tlv));
        }

        emit(
            prefix,
            &format!("OUI({BBF_OUI})->non1905_metrics_nr"),
            format!("{}", neighbors.len()),
        );
        for (i, neighbor) in neighbors.iter().enumerate() {
            for (owner, tlv) in &parsed {
                if owner != neighbor {
                    continue;
                }
                let direction = match tlv {
                    BbfTlv::Non1905TransmitterLinkMetric(_) => "tx",
                    BbfTlv::Non1905ReceiverLinkMetric(_) => "rx",
                    _ => continue,
                };
                let p = format!("{prefix}OUI({BBF_OUI})->non1905_metrics[{i}]->{direction}->");
                tlv.visit(&p, emit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dm::{DeviceInfoUpdate, DiscoveryKind};
    use crate::tlv::{LinkMetricDestination, LinkMetricsType, MediaType, Tlv};

    fn mac(last: u8) -> MacAddress {
        MacAddress([0x02, 0x00, 0x00, 0x00, 0x00, last])
    }

    struct StubSource(Vec<Non1905LinkMetrics>);

    impl Non1905MetricsSource for StubSource {
        fn collect(&mut self, _: &DataModel) -> Vec<Non1905LinkMetrics> {
            self.0.clone()
        }
    }

    fn link(neighbor: MacAddress) -> Non1905LinkMetrics {
        Non1905LinkMetrics {
            neighbor,
            tx: TransmitterLinkMetricEntry {
                local_interface_address: mac(2),
                neighbor_interface_address: neighbor,
                intf_type: MediaType::IEEE_802_3AB_GIGABIT_ETHERNET,
                bridge_flag: 0,
                packet_errors: 0,
                transmitted_packets: 10,
                mac_throughput_capacity: 1000,
                link_availability: 100,
                phy_rate: 1000,
            },
            rx: ReceiverLinkMetricEntry {
                local_interface_address: mac(2),
                neighbor_interface_address: neighbor,
                intf_type: MediaType::IEEE_802_3AB_GIGABIT_ETHERNET,
                packet_errors: 0,
                packets_received: 10,
                rssi: 0,
            },
        }
    }

    fn model() -> DataModel {
        let mut dm = DataModel::new(0);
        dm.set_local_al_mac(mac(1)).unwrap();
        dm.insert_interface("eth0", mac(2)).unwrap();
        dm
    }

    #[test]
    fn bbf_tlv_round_trip() {
        let query = BbfTlv::Non1905LinkMetricQuery(LinkMetricQuery::all_neighbors_both_directions());
        let bytes = query.forge().unwrap();
        assert_eq!(bytes[0], BBF_TLV_TYPE_NON_1905_LINK_METRIC_QUERY);
        assert_eq!(BbfTlv::parse(&bytes).unwrap(), query);
    }

    #[test]
    fn outgoing_query_gains_a_non_1905_query() {
        let dm = model();
        let mut registry = ExtensionRegistry::new();
        BbfExtension::register(&mut registry, Box::new(StubSource(vec![]))).unwrap();

        let mut cmdu = Cmdu::new(
            MessageType::LinkMetricQuery,
            1,
            vec![Tlv::LinkMetricQuery(
                LinkMetricQuery::all_neighbors_both_directions(),
            )],
        );
        registry.send_cmdu_extensions(&dm, &mut cmdu);

        let vendor: Vec<&VendorSpecific> = vendor_tlvs_with_oui(&cmdu, BBF_OUI).collect();
        assert_eq!(vendor.len(), 1);
        match BbfTlv::parse(&vendor[0].payload).unwrap() {
            BbfTlv::Non1905LinkMetricQuery(q) => {
                assert_eq!(q.destination, LinkMetricDestination::AllNeighbors);
                assert_eq!(q.link_metrics_type, LinkMetricsType::TxAndRx);
            }
            other => panic!("unexpected BBF TLV {other:?}"),
        }

        // The extended CMDU still passes the send rules.
        assert!(cmdu.forge(crate::cmdu::MAX_NETWORK_SEGMENT_SIZE).is_ok());
    }

    #[test]
    fn response_carries_metrics_only_after_a_query() {
        let mut dm = model();
        let mut registry = ExtensionRegistry::new();
        BbfExtension::register(
            &mut registry,
            Box::new(StubSource(vec![link(mac(0x61)), link(mac(0x62))])),
        )
        .unwrap();

        // Without a prior query the response stays bare.
        let mut response = Cmdu::new(MessageType::LinkMetricResponse, 2, vec![]);
        registry.send_cmdu_extensions(&dm, &mut response);
        assert_eq!(vendor_tlvs_with_oui(&response, BBF_OUI).count(), 0);

        // A received query with an embedded BBF query latches the flag.
        let mut query = Cmdu::new(
            MessageType::LinkMetricQuery,
            3,
            vec![Tlv::LinkMetricQuery(
                LinkMetricQuery::all_neighbors_both_directions(),
            )],
        );
        let bbf_query = BbfTlv::Non1905LinkMetricQuery(LinkMetricQuery::all_neighbors_both_directions());
        insert_in_cmdu(&mut query, embed_extension(bbf_query.forge().unwrap(), BBF_OUI));
        registry.process_cmdu_extensions(&mut dm, &query);

        let mut response = Cmdu::new(MessageType::LinkMetricResponse, 4, vec![]);
        registry.send_cmdu_extensions(&dm, &mut response);
        // One Tx and one Rx TLV per non-1905 neighbor.
        assert_eq!(vendor_tlvs_with_oui(&response, BBF_OUI).count(), 4);

        // The latch is consumed.
        let mut response = Cmdu::new(MessageType::LinkMetricResponse, 5, vec![]);
        registry.send_cmdu_extensions(&dm, &mut response);
        assert_eq!(vendor_tlvs_with_oui(&response, BBF_OUI).count(), 0);
    }

    #[test]
    fn update_replaces_previous_bbf_metrics() {
        let mut dm = model();
        dm.update_network_device_info(
            mac(0xaa),
            DeviceInfoUpdate::with_info(crate::tlv::DeviceInformation {
                al_mac_address: mac(0xaa),
                local_interfaces: vec![],
            }),
            0,
        );
        let mut registry = ExtensionRegistry::new();
        BbfExtension::register(&mut registry, Box::new(StubSource(vec![]))).unwrap();

        let tx = BbfTlv::Non1905TransmitterLinkMetric(TransmitterLinkMetric {
            local_al_address: mac(0xaa),
            neighbor_al_address: MacAddress::ZERO,
            transmitter_link_metrics: vec![link(mac(0x61)).tx],
        });
        let first = vec![embed_extension(tx.forge().unwrap(), BBF_OUI)];
        registry.update_extended_info(&mut dm, &first, mac(0xaa));
        assert_eq!(dm.extensions(mac(0xaa)).unwrap().len(), 1);

        let tx2 = BbfTlv::Non1905TransmitterLinkMetric(TransmitterLinkMetric {
            local_al_address: mac(0xaa),
            neighbor_al_address: MacAddress::ZERO,
            transmitter_link_metrics: vec![link(mac(0x62)).tx],
        });
        let rx2 = BbfTlv::Non1905ReceiverLinkMetric(ReceiverLinkMetric {
            local_al_address: mac(0xaa),
            neighbor_al_address: MacAddress::ZERO,
            receiver_link_metrics: vec![link(mac(0x62)).rx],
        });
        let second = vec![
            embed_extension(tx2.forge().unwrap(), BBF_OUI),
            embed_extension(rx2.forge().unwrap(), BBF_OUI),
        ];
        registry.update_extended_info(&mut dm, &second, mac(0xaa));

        // The first set is gone; only the replacement remains.
        let extensions = dm.extensions(mac(0xaa)).unwrap();
        assert_eq!(extensions.len(), 2);
        for vs in extensions {
            match BbfTlv::parse(&vs.payload).unwrap() {
                BbfTlv::Non1905TransmitterLinkMetric(m) => {
                    assert_eq!(
                        m.transmitter_link_metrics[0].neighbor_interface_address,
                        mac(0x62)
                    );
                }
                BbfTlv::Non1905ReceiverLinkMetric(m) => {
                    assert_eq!(
                        m.receiver_link_metrics[0].neighbor_interface_address,
                        mac(0x62)
                    );
                }
                other => panic!("unexpected BBF TLV {other:?}"),
            }
        }
    }

    #[test]
    fn received_response_updates_the_reporting_device() {
        let mut dm = model();
        dm.update_discovery_timestamps(
            mac(2),
            mac(0xaa),
            mac(0xab),
            DiscoveryKind::TopologyDiscovery,
            0,
        )
        .unwrap();
        dm.update_network_device_info(
            mac(0xaa),
            DeviceInfoUpdate::with_info(crate::tlv::DeviceInformation {
                al_mac_address: mac(0xaa),
                local_interfaces: vec![],
            }),
            0,
        );
        let mut registry = ExtensionRegistry::new();
        BbfExtension::register(&mut registry, Box::new(StubSource(vec![]))).unwrap();

        let tx = BbfTlv::Non1905TransmitterLinkMetric(TransmitterLinkMetric {
            local_al_address: mac(0xaa),
            neighbor_al_address: MacAddress::ZERO,
            transmitter_link_metrics: vec![link(mac(0x61)).tx],
        });
        let mut response = Cmdu::new(MessageType::LinkMetricResponse, 9, vec![]);
        insert_in_cmdu(&mut response, embed_extension(tx.forge().unwrap(), BBF_OUI));
        registry.process_cmdu_extensions(&mut dm, &response);

        assert_eq!(dm.extensions(mac(0xaa)).unwrap().len(), 1);
    }

    #[test]
    fn obtain_without_neighbors_reports_a_result_code() {
        let dm = model();
        let mut registry = ExtensionRegistry::new();
        BbfExtension::register(&mut registry, Box::new(StubSource(vec![]))).unwrap();
        let tlvs = registry.obtain_extended_local_info(&dm);
        assert_eq!(tlvs.len(), 1);
        assert!(matches!(
            BbfTlv::parse(&tlvs[0].payload).unwrap(),
            BbfTlv::Non1905LinkMetricResultCode(_)
        ));
    }

    #[test]
    fn dump_groups_by_neighbor() {
        let dm = model();
        let mut registry = ExtensionRegistry::new();
        BbfExtension::register(
            &mut registry,
            Box::new(StubSource(vec![link(mac(0x61))])),
        )
        .unwrap();
        let tlvs = registry.obtain_extended_local_info(&dm);
        let mut lines = Vec::new();
        registry.dump_extended_info(&tlvs, &mut |p, n, v| lines.push(format!("{p}{n}: {v}")), "al->");
        assert!(lines.iter().any(|l| l.contains("non1905_metrics_nr: 1")));
        assert!(lines.iter().any(|l| l.contains("tx->")));
        assert!(lines.iter().any(|l| l.contains("rx->")));
    }
}
