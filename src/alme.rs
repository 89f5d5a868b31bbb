//! The ALME (Abstraction Layer Management Entity) primitive codec.
//!
//! ALME primitives are the private management surface of the stack: a 1-byte
//! type discriminator followed by a fixed or length-prefixed payload. They
//! never travel in CMDUs; the platform transports them between the AL and its
//! management clients. The codec is self-contained except that two
//! primitives (get-metric response, get-intf-list response) embed standard
//! TLVs and delegate those to the TLV codec.

use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::{FieldVisitor, ReceiverLinkMetric, Tlv, TransmitterLinkMetric};
use crate::wire;
use bytes::{Buf, BufMut, Bytes, BytesMut};

pub const ALME_TYPE_GET_INTF_LIST_REQUEST: u8 = 0x01;
pub const ALME_TYPE_GET_INTF_LIST_RESPONSE: u8 = 0x02;
pub const ALME_TYPE_SET_INTF_PWR_STATE_REQUEST: u8 = 0x03;
pub const ALME_TYPE_SET_INTF_PWR_STATE_CONFIRM: u8 = 0x04;
pub const ALME_TYPE_GET_INTF_PWR_STATE_REQUEST: u8 = 0x05;
pub const ALME_TYPE_GET_INTF_PWR_STATE_RESPONSE: u8 = 0x06;
pub const ALME_TYPE_SET_FWD_RULE_REQUEST: u8 = 0x07;
pub const ALME_TYPE_SET_FWD_RULE_CONFIRM: u8 = 0x08;
pub const ALME_TYPE_GET_FWD_RULES_REQUEST: u8 = 0x09;
pub const ALME_TYPE_GET_FWD_RULES_RESPONSE: u8 = 0x10;
pub const ALME_TYPE_MODIFY_FWD_RULE_REQUEST: u8 = 0x0a;
pub const ALME_TYPE_MODIFY_FWD_RULE_CONFIRM: u8 = 0x0b;
pub const ALME_TYPE_REMOVE_FWD_RULE_REQUEST: u8 = 0x0c;
pub const ALME_TYPE_REMOVE_FWD_RULE_CONFIRM: u8 = 0x0d;
pub const ALME_TYPE_GET_METRIC_REQUEST: u8 = 0x0e;
pub const ALME_TYPE_GET_METRIC_RESPONSE: u8 = 0x0f;
pub const ALME_TYPE_CUSTOM_COMMAND_REQUEST: u8 = 0xf0;
pub const ALME_TYPE_CUSTOM_COMMAND_RESPONSE: u8 = 0xf1;

pub const ALME_REASON_SUCCESS: u8 = 0x00;
pub const ALME_REASON_FAILURE: u8 = 0x01;

/// Custom command asking for a textual dump of the network device table.
pub const CUSTOM_COMMAND_DUMP_NETWORK_DEVICES: u8 = b'n';

/// A classification rule, shared by the forwarding-rule primitives. Each
/// criterion carries a companion flag telling whether it participates in the
/// match.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ClassificationSet {
    pub mac_da: MacAddress,
    pub mac_da_flag: u8,
    pub mac_sa: MacAddress,
    pub mac_sa_flag: u8,
    pub ether_type: u16,
    pub ether_type_flag: u8,
    /// 12-bit VLAN id.
    pub vid: u16,
    pub vid_flag: u8,
    /// 3-bit priority code point.
    pub pcp: u8,
    pub pcp_flag: u8,
}

impl ClassificationSet {
    fn parse(buf: &mut Bytes) -> Result<Self, CodecError> {
        Ok(ClassificationSet {
            mac_da: wire::read_mac(buf)?,
            mac_da_flag: wire::read_u8(buf)?,
            mac_sa: wire::read_mac(buf)?,
            mac_sa_flag: wire::read_u8(buf)?,
            ether_type: wire::read_u16(buf)?,
            ether_type_flag: wire::read_u8(buf)?,
            vid: wire::read_u16(buf)? & 0x0fff,
            vid_flag: wire::read_u8(buf)?,
            pcp: wire::read_u8(buf)? & 0x07,
            pcp_flag: wire::read_u8(buf)?,
        })
    }

    fn forge(&self, out: &mut BytesMut) {
        wire::put_mac(out, &self.mac_da);
        out.put_u8(self.mac_da_flag);
        wire::put_mac(out, &self.mac_sa);
        out.put_u8(self.mac_sa_flag);
        out.put_u16(self.ether_type);
        out.put_u8(self.ether_type_flag);
        out.put_u16(self.vid & 0x0fff);
        out.put_u8(self.vid_flag);
        out.put_u8(self.pcp & 0x07);
        out.put_u8(self.pcp_flag);
    }

    fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "mac_da", self.mac_da.to_string());
        emit(prefix, "mac_da_flag", format!("{}", self.mac_da_flag));
        emit(prefix, "mac_sa", self.mac_sa.to_string());
        emit(prefix, "mac_sa_flag", format!("{}", self.mac_sa_flag));
        emit(prefix, "ether_type", format!("0x{:04x}", self.ether_type));
        emit(prefix, "ether_type_flag", format!("{}", self.ether_type_flag));
        emit(prefix, "vid", format!("{}", self.vid));
        emit(prefix, "vid_flag", format!("{}", self.vid_flag));
        emit(prefix, "pcp", format!("{}", self.pcp));
        emit(prefix, "pcp_flag", format!("{}", self.pcp_flag));
    }
}

/// One interface descriptor in a get-intf-list response.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InterfaceDescriptor {
    pub interface_address: MacAddress,
    pub interface_type: u16,
    pub bridge_flag: u8,
    pub vendor_specific_info: Vec<VendorSpecificInfo>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VendorSpecificInfo {
    pub ie_type: u16,
    pub oui: [u8; 3],
    pub vendor_si: Bytes,
}

/// One forwarding rule in a get-fwd-rules response.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ForwardingRule {
    pub classification_set: ClassificationSet,
    pub addresses: Vec<MacAddress>,
    pub last_matched: u16,
}

/// One per-neighbor metric descriptor in a get-metric response, embedding
/// one standard transmitter and one standard receiver link-metric TLV, each
/// restricted to the link through `local_intf_address`.
#[derive(Clone, PartialEq, Debug)]
pub struct MetricDescriptor {
    pub neighbor_dev_address: MacAddress,
    pub local_intf_address: MacAddress,
    pub bridge_flag: u8,
    pub tx_metric: TransmitterLinkMetric,
    pub rx_metric: ReceiverLinkMetric,
}

/// A parsed ALME primitive.
#[derive(Clone, PartialEq, Debug)]
pub enum Alme {
    GetIntfListRequest,
    GetIntfListResponse {
        interface_descriptors: Vec<InterfaceDescriptor>,
    },
    SetIntfPwrStateRequest {
        interface_address: MacAddress,
        power_state: u8,
    },
    SetIntfPwrStateConfirm {
        interface_address: MacAddress,
        reason_code: u8,
    },
    GetIntfPwrStateRequest {
        interface_address: MacAddress,
    },
    GetIntfPwrStateResponse {
        interface_address: MacAddress,
        power_state: u8,
    },
    SetFwdRuleRequest {
        classification_set: ClassificationSet,
        addresses: Vec<MacAddress>,
    },
    SetFwdRuleConfirm {
        rule_id: u16,
        reason_code: u8,
    },
    GetFwdRulesRequest,
    GetFwdRulesResponse {
        rules: Vec<ForwardingRule>,
    },
    ModifyFwdRuleRequest {
        rule_id: u16,
        addresses: Vec<MacAddress>,
    },
    ModifyFwdRuleConfirm {
        rule_id: u16,
        reason_code: u8,
    },
    RemoveFwdRuleRequest {
        rule_id: u16,
    },
    RemoveFwdRuleConfirm {
        rule_id: u16,
        reason_code: u8,
    },
    GetMetricRequest {
        interface_address: MacAddress,
    },
    GetMetricResponse {
        metrics: Vec<MetricDescriptor>,
    },
    CustomCommandRequest {
        command: u8,
    },
    CustomCommandResponse {
        data: Bytes,
    },
}

impl Alme {
    pub fn alme_type(&self) -> u8 {
        match self {
            Alme::GetIntfListRequest => ALME_TYPE_GET_INTF_LIST_REQUEST,
            Alme::GetIntfListResponse { .. } => ALME_TYPE_GET_INTF_LIST_RESPONSE,
            Alme::SetIntfPwrStateRequest { .. } => ALME_TYPE_SET_INTF_PWR_STATE_REQUEST,
            Alme::SetIntfPwrStateConfirm { .. } => ALME_TYPE_SET_INTF_PWR_STATE_CONFIRM,
            Alme::GetIntfPwrStateRequest { .. } => ALME_TYPE_GET_INTF_PWR_STATE_REQUEST,
            Alme::GetIntfPwrStateResponse { .. } => ALME_TYPE_GET_INTF_PWR_STATE_RESPONSE,
            Alme::SetFwdRuleRequest { .. } => ALME_TYPE_SET_FWD_RULE_REQUEST,
            Alme::SetFwdRuleConfirm { .. } => ALME_TYPE_SET_FWD_RULE_CONFIRM,
            Alme::GetFwdRulesRequest => ALME_TYPE_GET_FWD_RULES_REQUEST,
            Alme::GetFwdRulesResponse { .. } => ALME_TYPE_GET_FWD_RULES_RESPONSE,
            Alme::ModifyFwdRuleRequest { .. } => ALME_TYPE_MODIFY_FWD_RULE_REQUEST,
            Alme::ModifyFwdRuleConfirm { .. } => ALME_TYPE_MODIFY_FWD_RULE_CONFIRM,
            Alme::RemoveFwdRuleRequest { .. } => ALME_TYPE_REMOVE_FWD_RULE_REQUEST,
            Alme::RemoveFwdRuleConfirm { .. } => ALME_TYPE_REMOVE_FWD_RULE_CONFIRM,
            Alme::GetMetricRequest { .. } => ALME_TYPE_GET_METRIC_REQUEST,
            Alme::GetMetricResponse { .. } => ALME_TYPE_GET_METRIC_RESPONSE,
            Alme::CustomCommandRequest { .. } => ALME_TYPE_CUSTOM_COMMAND_REQUEST,
            Alme::CustomCommandResponse { .. } => ALME_TYPE_CUSTOM_COMMAND_RESPONSE,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Alme::GetIntfListRequest => "ALME_TYPE_GET_INTF_LIST_REQUEST",
            Alme::GetIntfListResponse { .. } => "ALME_TYPE_GET_INTF_LIST_RESPONSE",
            Alme::SetIntfPwrStateRequest { .. } => "ALME_TYPE_SET_INTF_PWR_STATE_REQUEST",
            Alme::SetIntfPwrStateConfirm { .. } => "ALME_TYPE_SET_INTF_PWR_STATE_CONFIRM",
            Alme::GetIntfPwrStateRequest { .. } => "ALME_TYPE_GET_INTF_PWR_STATE_REQUEST",
            Alme::GetIntfPwrStateResponse { .. } => "ALME_TYPE_GET_INTF_PWR_STATE_RESPONSE",
            Alme::SetFwdRuleRequest { .. } => "ALME_TYPE_SET_FWD_RULE_REQUEST",
            Alme::SetFwdRuleConfirm { .. } => "ALME_TYPE_SET_FWD_RULE_CONFIRM",
            Alme::GetFwdRulesRequest => "ALME_TYPE_GET_FWD_RULES_REQUEST",
            Alme::GetFwdRulesResponse { .. } => "ALME_TYPE_GET_FWD_RULES_RESPONSE",
            Alme::ModifyFwdRuleRequest { .. } => "ALME_TYPE_MODIFY_FWD_RULE_REQUEST",
            Alme::ModifyFwdRuleConfirm { .. } => "ALME_TYPE_MODIFY_FWD_RULE_CONFIRM",
            Alme::RemoveFwdRuleRequest { .. } => "ALME_TYPE_REMOVE_FWD_RULE_REQUEST",
            Alme::RemoveFwdRuleConfirm { .. } => "ALME_TYPE_REMOVE_FWD_RULE_CONFIRM",
            Alme::GetMetricRequest { .. } => "ALME_TYPE_GET_METRIC_REQUEST",
            Alme::GetMetricResponse { .. } => "ALME_TYPE_GET_METRIC_RESPONSE",
            Alme::CustomCommandRequest { .. } => "ALME_TYPE_CUSTOM_COMMAND_REQUEST",
            Alme::CustomCommandResponse { .. } => "ALME_TYPE_CUSTOM_COMMAND_RESPONSE",
        }
    }

    /// Parse a primitive from a complete byte stream.
    pub fn parse(stream: &[u8]) -> Result<Alme, CodecError> {
        let mut buf = Bytes::copy_from_slice(stream);
        let alme_type = wire::read_u8(&mut buf)?;
        let alme = match alme_type {
            ALME_TYPE_GET_INTF_LIST_REQUEST => Alme::GetIntfListRequest,
            ALME_TYPE_GET_INTF_LIST_RESPONSE => {
                let count = wire::read_u8(&mut buf)?;
                let mut interface_descriptors = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let interface_address = wire::read_mac(&mut buf)?;
                    let interface_type = wire::read_u16(&mut buf)?;
                    let bridge_flag = wire::read_u8(&mut buf)?;
                    let vs_nr = wire::read_u8(&mut buf)?;
                    let mut vendor_specific_info = Vec::with_capacity(vs_nr as usize);
                    for _ in 0..vs_nr {
                        let ie_type = wire::read_u16(&mut buf)?;
                        let length_field = wire::read_u16(&mut buf)? as usize;
                        let oui = wire::read_array(&mut buf)?;
                        let vendor_si = wire::read_bytes(&mut buf, length_field)?;
                        vendor_specific_info.push(VendorSpecificInfo {
                            ie_type,
                            oui,
                            vendor_si,
                        });
                    }
                    interface_descriptors.push(InterfaceDescriptor {
                        interface_address,
                        interface_type,
                        bridge_flag,
                        vendor_specific_info,
                    });
                }
                Alme::GetIntfListResponse {
                    interface_descriptors,
                }
            }
            ALME_TYPE_SET_INTF_PWR_STATE_REQUEST => Alme::SetIntfPwrStateRequest {
                interface_address: wire::read_mac(&mut buf)?,
                power_state: wire::read_u8(&mut buf)?,
            },
            ALME_TYPE_SET_INTF_PWR_STATE_CONFIRM => Alme::SetIntfPwrStateConfirm {
                interface_address: wire::read_mac(&mut buf)?,
                reason_code: wire::read_u8(&mut buf)?,
            },
            ALME_TYPE_GET_INTF_PWR_STATE_REQUEST => Alme::GetIntfPwrStateRequest {
                interface_address: wire::read_mac(&mut buf)?,
            },
            ALME_TYPE_GET_INTF_PWR_STATE_RESPONSE => Alme::GetIntfPwrStateResponse {
                interface_address: wire::read_mac(&mut buf)?,
                power_state: wire::read_u8(&mut buf)?,
            },
            ALME_TYPE_SET_FWD_RULE_REQUEST => {
                let classification_set = ClassificationSet::parse(&mut buf)?;
                let addresses = parse_address_list(&mut buf)?;
                Alme::SetFwdRuleRequest {
                    classification_set,
                    addresses,
                }
            }
            ALME_TYPE_SET_FWD_RULE_CONFIRM => Alme::SetFwdRuleConfirm {
                rule_id: wire::read_u16(&mut buf)?,
                reason_code: wire::read_u8(&mut buf)?,
            },
            ALME_TYPE_GET_FWD_RULES_REQUEST => Alme::GetFwdRulesRequest,
            ALME_TYPE_GET_FWD_RULES_RESPONSE => {
                let count = wire::read_u8(&mut buf)?;
                let mut rules = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let classification_set = ClassificationSet::parse(&mut buf)?;
                    let addresses = parse_address_list(&mut buf)?;
                    let last_matched = wire::read_u16(&mut buf)?;
                    rules.push(ForwardingRule {
                        classification_set,
                        addresses,
                        last_matched,
                    });
                }
                Alme::GetFwdRulesResponse { rules }
            }
            ALME_TYPE_MODIFY_FWD_RULE_REQUEST => {
                let rule_id = wire::read_u16(&mut buf)?;
                let addresses = parse_address_list(&mut buf)?;
                Alme::ModifyFwdRuleRequest { rule_id, addresses }
            }
            ALME_TYPE_MODIFY_FWD_RULE_CONFIRM => Alme::ModifyFwdRuleConfirm {
                rule_id: wire::read_u16(&mut buf)?,
                reason_code: wire::read_u8(&mut buf)?,
            },
            ALME_TYPE_REMOVE_FWD_RULE_REQUEST => Alme::RemoveFwdRuleRequest {
                rule_id: wire::read_u16(&mut buf)?,
            },
            ALME_TYPE_REMOVE_FWD_RULE_CONFIRM => Alme::RemoveFwdRuleConfirm {
                rule_id: wire::read_u16(&mut buf)?,
                reason_code: wire::read_u8(&mut buf)?,
            },
            ALME_TYPE_GET_METRIC_REQUEST => Alme::GetMetricRequest {
                interface_address: wire::read_mac(&mut buf)?,
            },
            ALME_TYPE_GET_METRIC_RESPONSE => {
                let count = wire::read_u8(&mut buf)?;
                let mut metrics = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let neighbor_dev_address = wire::read_mac(&mut buf)?;
                    let local_intf_address = wire::read_mac(&mut buf)?;
                    let bridge_flag = wire::read_u8(&mut buf)?;
                    let tx_metric = match Tlv::parse(&mut buf)? {
                        Tlv::TransmitterLinkMetric(m) => m,
                        other => {
                            return Err(CodecError::InvalidField {
                                field: "embedded_tlv_type",
                                value: other.tlv_type().value() as u32,
                            })
                        }
                    };
                    let rx_metric = match Tlv::parse(&mut buf)? {
                        Tlv::ReceiverLinkMetric(m) => m,
                        other => {
                            return Err(CodecError::InvalidField {
                                field: "embedded_tlv_type",
                                value: other.tlv_type().value() as u32,
                            })
                        }
                    };
                    metrics.push(MetricDescriptor {
                        neighbor_dev_address,
                        local_intf_address,
                        bridge_flag,
                        tx_metric,
                        rx_metric,
                    });
                }
                Alme::GetMetricResponse { metrics }
            }
            ALME_TYPE_CUSTOM_COMMAND_REQUEST => Alme::CustomCommandRequest {
                command: wire::read_u8(&mut buf)?,
            },
            ALME_TYPE_CUSTOM_COMMAND_RESPONSE => {
                let len = wire::read_u16(&mut buf)? as usize;
                Alme::CustomCommandResponse {
                    data: wire::read_bytes(&mut buf, len)?,
                }
            }
            n => return Err(CodecError::UnknownAlmeType(n)),
        };

        if buf.has_remaining() {
            return Err(CodecError::LengthMismatch("ALME"));
        }
        Ok(alme)
    }

    /// Serialize the primitive.
    pub fn forge(&self) -> Result<Bytes, CodecError> {
        let mut out = BytesMut::new();
        out.put_u8(self.alme_type());
        match self {
            Alme::GetIntfListRequest | Alme::GetFwdRulesRequest => {}
            Alme::GetIntfListResponse {
                interface_descriptors,
            } => {
                wire::put_u8_count(&mut out, interface_descriptors.len(), "interface_descriptors_nr")?;
                for desc in interface_descriptors {
                    wire::put_mac(&mut out, &desc.interface_address);
                    out.put_u16(desc.interface_type);
                    out.put_u8(desc.bridge_flag);
                    wire::put_u8_count(
                        &mut out,
                        desc.vendor_specific_info.len(),
                        "vendor_specific_info_nr",
                    )?;
                    for vs in &desc.vendor_specific_info {
                        out.put_u16(vs.ie_type);
                        wire::put_u16_count(&mut out, vs.vendor_si.len(), "length_field")?;
                        out.put_slice(&vs.oui);
                        out.put_slice(&vs.vendor_si);
                    }
                }
            }
            Alme::SetIntfPwrStateRequest {
                interface_address,
                power_state,
            } => {
                wire::put_mac(&mut out, interface_address);
                out.put_u8(*power_state);
            }
            Alme::SetIntfPwrStateConfirm {
                interface_address,
                reason_code,
            } => {
                wire::put_mac(&mut out, interface_address);
                out.put_u8(*reason_code);
            }
            Alme::GetIntfPwrStateRequest { interface_address } => {
                wire::put_mac(&mut out, interface_address);
            }
            Alme::GetIntfPwrStateResponse {
                interface_address,
                power_state,
            } => {
                wire::put_mac(&mut out, interface_address);
                out.put_u8(*power_state);
            }
            Alme::SetFwdRuleRequest {
                classification_set,
                addresses,
            } => {
                classification_set.forge(&mut out);
                forge_address_list(&mut out, addresses)?;
            }
            Alme::SetFwdRuleConfirm {
                rule_id,
                reason_code,
            }
            | Alme::ModifyFwdRuleConfirm {
                rule_id,
                reason_code,
            }
            | Alme::RemoveFwdRuleConfirm {
                rule_id,
                reason_code,
            } => {
                out.put_u16(*rule_id);
                out.put_u8(*reason_code);
            }
            Alme::GetFwdRulesResponse { rules } => {
                wire::put_u8_count(&mut out, rules.len(), "rules_nr")?;
                for rule in rules {
                    rule.classification_set.forge(&mut out);
                    forge_address_list(&mut out, &rule.addresses)?;
                    out.put_u16(rule.last_matched);
                }
            }
            Alme::ModifyFwdRuleRequest { rule_id, addresses } => {
                out.put_u16(*rule_id);
                forge_address_list(&mut out, addresses)?;
            }
            Alme::RemoveFwdRuleRequest { rule_id } => {
                out.put_u16(*rule_id);
            }
            Alme::GetMetricRequest { interface_address } => {
                wire::put_mac(&mut out, interface_address);
            }
            Alme::GetMetricResponse { metrics } => {
                wire::put_u8_count(&mut out, metrics.len(), "metrics_nr")?;
                for metric in metrics {
                    wire::put_mac(&mut out, &metric.neighbor_dev_address);
                    wire::put_mac(&mut out, &metric.local_intf_address);
                    out.put_u8(metric.bridge_flag);
                    let tx = Tlv::TransmitterLinkMetric(metric.tx_metric.clone()).forge()?;
                    out.extend_from_slice(&tx);
                    let rx = Tlv::ReceiverLinkMetric(metric.rx_metric.clone()).forge()?;
                    out.extend_from_slice(&rx);
                }
            }
            Alme::CustomCommandRequest { command } => {
                out.put_u8(*command);
            }
            Alme::CustomCommandResponse { data } => {
                wire::put_u16_count(&mut out, data.len(), "data_len")?;
                out.put_slice(data);
            }
        }
        Ok(out.freeze())
    }

    /// Walk every leaf field, invoking `emit` per field.
    pub fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        match self {
            Alme::GetIntfListRequest | Alme::GetFwdRulesRequest => {}
            Alme::GetIntfListResponse {
                interface_descriptors,
            } => {
                emit(
                    prefix,
                    "interface_descriptors_nr",
                    format!("{}", interface_descriptors.len()),
                );
                for (i, desc) in interface_descriptors.iter().enumerate() {
                    let p = format!("{prefix}interface_descriptors[{i}]->");
                    emit(&p, "interface_address", desc.interface_address.to_string());
                    emit(&p, "interface_type", format!("0x{:04x}", desc.interface_type));
                    emit(&p, "bridge_flag", format!("{}", desc.bridge_flag));
                    for (j, vs) in desc.vendor_specific_info.iter().enumerate() {
                        let p = format!("{p}vendor_specific_info[{j}]->");
                        emit(&p, "ie_type", format!("{}", vs.ie_type));
                        emit(&p, "oui", crate::tlv::hex_string(&vs.oui));
                        emit(&p, "vendor_si", crate::tlv::hex_string(&vs.vendor_si));
                    }
                }
            }
            Alme::SetIntfPwrStateRequest {
                interface_address,
                power_state,
            }
            | Alme::GetIntfPwrStateResponse {
                interface_address,
                power_state,
            } => {
                emit(prefix, "interface_address", interface_address.to_string());
                emit(prefix, "power_state", format!("{power_state}"));
            }
            Alme::SetIntfPwrStateConfirm {
                interface_address,
                reason_code,
            } => {
                emit(prefix, "interface_address", interface_address.to_string());
                emit(prefix, "reason_code", format!("{reason_code}"));
            }
            Alme::GetIntfPwrStateRequest { interface_address }
            | Alme::GetMetricRequest { interface_address } => {
                emit(prefix, "interface_address", interface_address.to_string());
            }
            Alme::SetFwdRuleRequest {
                classification_set,
                addresses,
            } => {
                classification_set.visit(prefix, emit);
                visit_address_list(prefix, addresses, emit);
            }
            Alme::SetFwdRuleConfirm {
                rule_id,
                reason_code,
            }
            | Alme::ModifyFwdRuleConfirm {
                rule_id,
                reason_code,
            }
            | Alme::RemoveFwdRuleConfirm {
                rule_id,
                reason_code,
            } => {
                emit(prefix, "rule_id", format!("{rule_id}"));
                emit(prefix, "reason_code", format!("{reason_code}"));
            }
            Alme::GetFwdRulesResponse { rules } => {
                emit(prefix, "rules_nr", format!("{}", rules.len()));
                for (i, rule) in rules.iter().enumerate() {
                    let p = format!("{prefix}rules[{i}]->");
                    rule.classification_set.visit(&p, emit);
                    visit_address_list(&p, &rule.addresses, emit);
                    emit(&p, "last_matched", format!("{}", rule.last_matched));
                }
            }
            Alme::ModifyFwdRuleRequest { rule_id, addresses } => {
                emit(prefix, "rule_id", format!("{rule_id}"));
                visit_address_list(prefix, addresses, emit);
            }
            Alme::RemoveFwdRuleRequest { rule_id } => {
                emit(prefix, "rule_id", format!("{rule_id}"));
            }
            Alme::GetMetricResponse { metrics } => {
                emit(prefix, "metrics_nr", format!("{}", metrics.len()));
                for (i, metric) in metrics.iter().enumerate() {
                    let p = format!("{prefix}metrics[{i}]->");
                    emit(&p, "neighbor_dev_address", metric.neighbor_dev_address.to_string());
                    emit(&p, "local_intf_address", metric.local_intf_address.to_string());
                    emit(&p, "bridge_flag", format!("{}", metric.bridge_flag));
                    metric.tx_metric.visit(&format!("{p}tx->"), emit);
                    metric.rx_metric.visit(&format!("{p}rx->"), emit);
                }
            }
            Alme::CustomCommandRequest { command } => {
                emit(prefix, "command", format!("0x{command:02x}"));
            }
            Alme::CustomCommandResponse { data } => {
                emit(prefix, "data_len", format!("{}", data.len()));
                emit(prefix, "data", crate::tlv::printable_string(data));
            }
        }
    }
}

fn parse_address_list(buf: &mut Bytes) -> Result<Vec<MacAddress>, CodecError> {
    let count = wire::read_u8(buf)?;
    let mut addresses = Vec::with_capacity(count as usize);
    for _ in 0..count {
        addresses.push(wire::read_mac(buf)?);
    }
    Ok(addresses)
}

fn forge_address_list(out: &mut BytesMut, addresses: &[MacAddress]) -> Result<(), CodecError> {
    wire::put_u8_count(out, addresses.len(), "addresses_nr")?;
    for mac in addresses {
        wire::put_mac(out, mac);
    }
    Ok(())
}

fn visit_address_list(prefix: &str, addresses: &[MacAddress], emit: &mut FieldVisitor) {
    emit(prefix, "addresses_nr", format!("{}", addresses.len()));
    for (i, mac) in addresses.iter().enumerate() {
        emit(prefix, &format!("addresses[{i}]"), mac.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv::{
        MediaType, ReceiverLinkMetricEntry, TransmitterLinkMetricEntry,
    };

    fn mac(last: u8) -> MacAddress {
        MacAddress([0x02, 0x00, 0x00, 0x00, 0x00, last])
    }

    fn round_trip(alme: Alme) {
        let bytes = alme.forge().unwrap();
        assert_eq!(bytes[0], alme.alme_type());
        assert_eq!(Alme::parse(&bytes).unwrap(), alme);
    }

    #[test]
    fn round_trip_every_primitive() {
        round_trip(Alme::GetIntfListRequest);
        round_trip(Alme::GetIntfListResponse {
            interface_descriptors: vec![InterfaceDescriptor {
                interface_address: mac(2),
                interface_type: 0x0001,
                bridge_flag: 0,
                vendor_specific_info: vec![VendorSpecificInfo {
                    ie_type: 1,
                    oui: [0x00, 0x25, 0x6d],
                    vendor_si: vec![0xde, 0xad].into(),
                }],
            }],
        });
        round_trip(Alme::SetIntfPwrStateRequest {
            interface_address: mac(2),
            power_state: crate::tlv::POWER_STATE_SAVE,
        });
        round_trip(Alme::SetIntfPwrStateConfirm {
            interface_address: mac(2),
            reason_code: ALME_REASON_SUCCESS,
        });
        round_trip(Alme::GetIntfPwrStateRequest {
            interface_address: mac(2),
        });
        round_trip(Alme::GetIntfPwrStateResponse {
            interface_address: mac(2),
            power_state: crate::tlv::POWER_STATE_ON,
        });
        round_trip(Alme::SetFwdRuleRequest {
            classification_set: ClassificationSet {
                mac_da: mac(9),
                mac_da_flag: 1,
                vid: 100,
                vid_flag: 1,
                ..Default::default()
            },
            addresses: vec![mac(2), mac(3)],
        });
        round_trip(Alme::SetFwdRuleConfirm {
            rule_id: 7,
            reason_code: ALME_REASON_SUCCESS,
        });
        round_trip(Alme::GetFwdRulesRequest);
        round_trip(Alme::GetFwdRulesResponse {
            rules: vec![ForwardingRule {
                classification_set: ClassificationSet::default(),
                addresses: vec![mac(2)],
                last_matched: 55,
            }],
        });
        round_trip(Alme::ModifyFwdRuleRequest {
            rule_id: 7,
            addresses: vec![mac(4)],
        });
        round_trip(Alme::ModifyFwdRuleConfirm {
            rule_id: 7,
            reason_code: ALME_REASON_FAILURE,
        });
        round_trip(Alme::RemoveFwdRuleRequest { rule_id: 7 });
        round_trip(Alme::RemoveFwdRuleConfirm {
            rule_id: 7,
            reason_code: ALME_REASON_SUCCESS,
        });
        round_trip(Alme::GetMetricRequest {
            interface_address: mac(0xaa),
        });
        round_trip(Alme::GetMetricResponse {
            metrics: vec![MetricDescriptor {
                neighbor_dev_address: mac(0xaa),
                local_intf_address: mac(2),
                bridge_flag: 0,
                tx_metric: TransmitterLinkMetric {
                    local_al_address: mac(1),
                    neighbor_al_address: mac(0xaa),
                    transmitter_link_metrics: vec![TransmitterLinkMetricEntry {
                        local_interface_address: mac(2),
                        neighbor_interface_address: mac(0xab),
                        intf_type: MediaType::IEEE_802_3AB_GIGABIT_ETHERNET,
                        bridge_flag: 0,
                        packet_errors: 0,
                        transmitted_packets: 100,
                        mac_throughput_capacity: 1000,
                        link_availability: 100,
                        phy_rate: 1000,
                    }],
                },
                rx_metric: ReceiverLinkMetric {
                    local_al_address: mac(1),
                    neighbor_al_address: mac(0xaa),
                    receiver_link_metrics: vec![ReceiverLinkMetricEntry {
                        local_interface_address: mac(2),
                        neighbor_interface_address: mac(0xab),
                        intf_type: MediaType::IEEE_802_3AB_GIGABIT_ETHERNET,
                        packet_errors: 1,
                        packets_received: 99,
                        rssi: 0,
                    }],
                },
            }],
        });
        round_trip(Alme::CustomCommandRequest {
            command: CUSTOM_COMMAND_DUMP_NETWORK_DEVICES,
        });
        round_trip(Alme::CustomCommandResponse {
            data: Bytes::from_static(b"network devices:\n  <none>\n"),
        });
    }

    #[test]
    fn metric_response_embeds_standard_tlvs() {
        let alme = Alme::GetMetricResponse {
            metrics: vec![MetricDescriptor {
                neighbor_dev_address: mac(0xaa),
                local_intf_address: mac(2),
                bridge_flag: 1,
                tx_metric: TransmitterLinkMetric {
                    local_al_address: mac(1),
                    neighbor_al_address: mac(0xaa),
                    transmitter_link_metrics: vec![TransmitterLinkMetricEntry {
                        local_interface_address: mac(2),
                        neighbor_interface_address: mac(0xab),
                        intf_type: MediaType::IEEE_802_3U_FAST_ETHERNET,
                        bridge_flag: 0,
                        packet_errors: 0,
                        transmitted_packets: 1,
                        mac_throughput_capacity: 100,
                        link_availability: 100,
                        phy_rate: 100,
                    }],
                },
                rx_metric: ReceiverLinkMetric {
                    local_al_address: mac(1),
                    neighbor_al_address: mac(0xaa),
                    receiver_link_metrics: vec![ReceiverLinkMetricEntry {
                        local_interface_address: mac(2),
                        neighbor_interface_address: mac(0xab),
                        intf_type: MediaType::IEEE_802_3U_FAST_ETHERNET,
                        packet_errors: 0,
                        packets_received: 1,
                        rssi: 0,
                    }],
                },
            }],
        };
        let bytes = alme.forge().unwrap();
        // After the two addresses and the bridge flag the embedded
        // transmitter link metric TLV starts with its standard header.
        let tlv_offset = 1 + 1 + 6 + 6 + 1;
        assert_eq!(bytes[tlv_offset], 9); // transmitter link metric
        assert_eq!(
            u16::from_be_bytes([bytes[tlv_offset + 1], bytes[tlv_offset + 2]]),
            12 + 29
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = Alme::GetFwdRulesRequest.forge().unwrap().to_vec();
        bytes.push(0x00);
        assert_eq!(Alme::parse(&bytes), Err(CodecError::LengthMismatch("ALME")));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert_eq!(Alme::parse(&[0x42]), Err(CodecError::UnknownAlmeType(0x42)));
    }
}
