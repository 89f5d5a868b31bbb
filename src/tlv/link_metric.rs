use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::{FieldVisitor, MediaType};
use crate::wire;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Whose links a link-metric query asks about.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LinkMetricDestination {
    /// Metrics for every 1905 neighbor.
    AllNeighbors,
    /// Metrics for the neighbor named in `specific_neighbor` only.
    SpecificNeighbor,
}

/// Which direction of metrics a link-metric query asks for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LinkMetricsType {
    TxOnly,
    RxOnly,
    TxAndRx,
}

impl LinkMetricsType {
    fn value(self) -> u8 {
        match self {
            LinkMetricsType::TxOnly => 0,
            LinkMetricsType::RxOnly => 1,
            LinkMetricsType::TxAndRx => 2,
        }
    }
}

/// Link metric query TLV ("IEEE Std 1905.1-2013, Section 6.4.10").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LinkMetricQuery {
    pub destination: LinkMetricDestination,
    /// Only meaningful when `destination` is `SpecificNeighbor`; zeroed
    /// otherwise.
    pub specific_neighbor: MacAddress,
    pub link_metrics_type: LinkMetricsType,
}

impl LinkMetricQuery {
    /// Query every neighbor in both directions.
    pub fn all_neighbors_both_directions() -> Self {
        LinkMetricQuery {
            destination: LinkMetricDestination::AllNeighbors,
            specific_neighbor: MacAddress::ZERO,
            link_metrics_type: LinkMetricsType::TxAndRx,
        }
    }

    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        let destination = wire::read_u8(body)?;
        let mac = wire::read_mac(body)?;
        let (destination, specific_neighbor) = match destination {
            0 => (LinkMetricDestination::AllNeighbors, MacAddress::ZERO),
            1 => (LinkMetricDestination::SpecificNeighbor, mac),
            n => {
                return Err(CodecError::InvalidField {
                    field: "destination",
                    value: n as u32,
                })
            }
        };
        let link_metrics_type = match wire::read_u8(body)? {
            0 => LinkMetricsType::TxOnly,
            1 => LinkMetricsType::RxOnly,
            2 => LinkMetricsType::TxAndRx,
            n => {
                return Err(CodecError::InvalidField {
                    field: "link_metrics_type",
                    value: n as u32,
                })
            }
        };
        Ok(LinkMetricQuery {
            destination,
            specific_neighbor,
            link_metrics_type,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        match self.destination {
            LinkMetricDestination::AllNeighbors => {
                out.put_u8(0);
                // The address field is unused when querying all neighbors.
                // Its first byte is set to the metrics-type value: some
                // implementations omit the field entirely and read the
                // metrics type here, and this encoding satisfies both
                // readings of the standard.
                out.put_slice(&[self.link_metrics_type.value(), 0, 0, 0, 0, 0]);
            }
            LinkMetricDestination::SpecificNeighbor => {
                out.put_u8(1);
                wire::put_mac(out, &self.specific_neighbor);
            }
        }
        out.put_u8(self.link_metrics_type.value());
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(
            prefix,
            "destination",
            format!(
                "{}",
                match self.destination {
                    LinkMetricDestination::AllNeighbors => 0,
                    LinkMetricDestination::SpecificNeighbor => 1,
                }
            ),
        );
        emit(prefix, "specific_neighbor", self.specific_neighbor.to_string());
        emit(
            prefix,
            "link_metrics_type",
            format!("{}", self.link_metrics_type.value()),
        );
    }
}

/// Transmitter link metric TLV ("IEEE Std 1905.1-2013, Section 6.4.11").
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TransmitterLinkMetric {
    pub local_al_address: MacAddress,
    pub neighbor_al_address: MacAddress,
    pub transmitter_link_metrics: Vec<TransmitterLinkMetricEntry>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TransmitterLinkMetricEntry {
    pub local_interface_address: MacAddress,
    pub neighbor_interface_address: MacAddress,
    pub intf_type: MediaType,
    pub bridge_flag: u8,
    pub packet_errors: u32,
    pub transmitted_packets: u32,
    /// Estimated MAC throughput in Mb/s.
    pub mac_throughput_capacity: u16,
    /// Availability of the link in percent.
    pub link_availability: u16,
    /// PHY rate in Mb/s.
    pub phy_rate: u16,
}

impl TransmitterLinkMetric {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        // The body length must be 12 + 29*n with n >= 1.
        if body.remaining() < 12 + 29 || (body.remaining() - 12) % 29 != 0 {
            return Err(CodecError::LengthMismatch("TRANSMITTER_LINK_METRIC"));
        }
        let local_al_address = wire::read_mac(body)?;
        let neighbor_al_address = wire::read_mac(body)?;
        let mut transmitter_link_metrics = Vec::with_capacity(body.remaining() / 29);
        while body.has_remaining() {
            transmitter_link_metrics.push(TransmitterLinkMetricEntry {
                local_interface_address: wire::read_mac(body)?,
                neighbor_interface_address: wire::read_mac(body)?,
                intf_type: MediaType(wire::read_u16(body)?),
                bridge_flag: wire::read_u8(body)?,
                packet_errors: wire::read_u32(body)?,
                transmitted_packets: wire::read_u32(body)?,
                mac_throughput_capacity: wire::read_u16(body)?,
                link_availability: wire::read_u16(body)?,
                phy_rate: wire::read_u16(body)?,
            });
        }
        Ok(TransmitterLinkMetric {
            local_al_address,
            neighbor_al_address,
            transmitter_link_metrics,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_mac(out, &self.local_al_address);
        wire::put_mac(out, &self.neighbor_al_address);
        for m in &self.transmitter_link_metrics {
            wire::put_mac(out, &m.local_interface_address);
            wire::put_mac(out, &m.neighbor_interface_address);
            out.put_u16(m.intf_type.0);
            out.put_u8(m.bridge_flag);
            out.put_u32(m.packet_errors);
            out.put_u32(m.transmitted_packets);
            out.put_u16(m.mac_throughput_capacity);
            out.put_u16(m.link_availability);
            out.put_u16(m.phy_rate);
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "local_al_address", self.local_al_address.to_string());
        emit(
            prefix,
            "neighbor_al_address",
            self.neighbor_al_address.to_string(),
        );
        for (i, m) in self.transmitter_link_metrics.iter().enumerate() {
            let p = format!("{prefix}transmitter_link_metrics[{i}]->");
            emit(&p, "local_interface_address", m.local_interface_address.to_string());
            emit(
                &p,
                "neighbor_interface_address",
                m.neighbor_interface_address.to_string(),
            );
            emit(&p, "intf_type", format!("0x{:04x}", m.intf_type.0));
            emit(&p, "bridge_flag", format!("{}", m.bridge_flag));
            emit(&p, "packet_errors", format!("{}", m.packet_errors));
            emit(&p, "transmitted_packets", format!("{}", m.transmitted_packets));
            emit(
                &p,
                "mac_throughput_capacity",
                format!("{}", m.mac_throughput_capacity),
            );
            emit(&p, "link_availability", format!("{}", m.link_availability));
            emit(&p, "phy_rate", format!("{}", m.phy_rate));
        }
    }
}

/// Receiver link metric TLV ("IEEE Std 1905.1-2013, Section 6.4.12").
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ReceiverLinkMetric {
    pub local_al_address: MacAddress,
    pub neighbor_al_address: MacAddress,
    pub receiver_link_metrics: Vec<ReceiverLinkMetricEntry>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReceiverLinkMetricEntry {
    pub local_interface_address: MacAddress,
    pub neighbor_interface_address: MacAddress,
    pub intf_type: MediaType,
    pub packet_errors: u32,
    pub packets_received: u32,
    /// RSSI in dB (802.11 links only).
    pub rssi: u8,
}

impl ReceiverLinkMetric {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        // The body length must be 12 + 23*n with n >= 1.
        if body.remaining() < 12 + 23 || (body.remaining() - 12) % 23 != 0 {
            return Err(CodecError::LengthMismatch("RECEIVER_LINK_METRIC"));
        }
        let local_al_address = wire::read_mac(body)?;
        let neighbor_al_address = wire::read_mac(body)?;
        let mut receiver_link_metrics = Vec::with_capacity(body.remaining() / 23);
        while body.has_remaining() {
            receiver_link_metrics.push(ReceiverLinkMetricEntry {
                local_interface_address: wire::read_mac(body)?,
                neighbor_interface_address: wire::read_mac(body)?,
                intf_type: MediaType(wire::read_u16(body)?),
                packet_errors: wire::read_u32(body)?,
                packets_received: wire::read_u32(body)?,
                rssi: wire::read_u8(body)?,
            });
        }
        Ok(ReceiverLinkMetric {
            local_al_address,
            neighbor_al_address,
            receiver_link_metrics,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_mac(out, &self.local_al_address);
        wire::put_mac(out, &self.neighbor_al_address);
        for m in &self.receiver_link_metrics {
            wire::put_mac(out, &m.local_interface_address);
            wire::put_mac(out, &m.neighbor_interface_address);
            out.put_u16(m.intf_type.0);
            out.put_u32(m.packet_errors);
            out.put_u32(m.packets_received);
            out.put_u8(m.rssi);
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "local_al_address", self.local_al_address.to_string());
        emit(
            prefix,
            "neighbor_al_address",
            self.neighbor_al_address.to_string(),
        );
        for (i, m) in self.receiver_link_metrics.iter().enumerate() {
            let p = format!("{prefix}receiver_link_metrics[{i}]->");
            emit(&p, "local_interface_address", m.local_interface_address.to_string());
            emit(
                &p,
                "neighbor_interface_address",
                m.neighbor_interface_address.to_string(),
            );
            emit(&p, "intf_type", format!("0x{:04x}", m.intf_type.0));
            emit(&p, "packet_errors", format!("{}", m.packet_errors));
            emit(&p, "packets_received", format!("{}", m.packets_received));
            emit(&p, "rssi", format!("{}", m.rssi));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_metric_needs_at_least_one_entry() {
        let mut raw = BytesMut::new();
        raw.put_slice(&[1u8; 12]);
        let mut body = raw.freeze();
        assert!(TransmitterLinkMetric::parse(&mut body).is_err());
    }

    #[test]
    fn specific_neighbor_query_round_trips_the_address() {
        let q = LinkMetricQuery {
            destination: LinkMetricDestination::SpecificNeighbor,
            specific_neighbor: MacAddress([0xaa; 6]),
            link_metrics_type: LinkMetricsType::TxOnly,
        };
        let mut out = BytesMut::new();
        q.forge_body(&mut out).unwrap();
        assert_eq!(out.len(), 8);
        let mut body = out.freeze();
        assert_eq!(LinkMetricQuery::parse(&mut body).unwrap(), q);
    }
}
