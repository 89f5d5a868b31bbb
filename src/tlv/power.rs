//! Interface power management TLVs.

use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::{FieldVisitor, GenericPhyCommonData, MediaType};
use crate::wire;
use bytes::{Buf, BufMut, Bytes, BytesMut};

pub const POWER_STATE_OFF: u8 = 0x00;
pub const POWER_STATE_ON: u8 = 0x01;
pub const POWER_STATE_SAVE: u8 = 0x02;

pub const POWER_CHANGE_COMPLETED: u8 = 0x00;
pub const POWER_CHANGE_NO_CHANGE: u8 = 0x01;
pub const POWER_CHANGE_ALTERNATIVE: u8 = 0x02;

/// Power off interface TLV ("IEEE Std 1905.1-2013, Section 6.4.28").
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PowerOffInterface {
    pub power_off_interfaces: Vec<PowerOffInterfaceEntry>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PowerOffInterfaceEntry {
    pub interface_address: MacAddress,
    pub media_type: MediaType,
    pub generic_phy_common_data: GenericPhyCommonData,
}

impl PowerOffInterface {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        if !body.has_remaining() {
            // Legacy zero-length empty-list encoding.
            if cfg!(feature = "fix-broken-tlvs") {
                return Ok(PowerOffInterface::default());
            }
            return Err(CodecError::LengthMismatch("POWER_OFF_INTERFACE"));
        }
        let count = wire::read_u8(body)?;
        let mut power_off_interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let interface_address = wire::read_mac(body)?;
            let media_type = MediaType(wire::read_u16(body)?);
            let generic_phy_common_data = GenericPhyCommonData::parse(body)?;
            power_off_interfaces.push(PowerOffInterfaceEntry {
                interface_address,
                media_type,
                generic_phy_common_data,
            });
        }
        Ok(PowerOffInterface {
            power_off_interfaces,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(out, self.power_off_interfaces.len(), "power_off_interfaces_nr")?;
        for intf in &self.power_off_interfaces {
            wire::put_mac(out, &intf.interface_address);
            out.put_u16(intf.media_type.0);
            intf.generic_phy_common_data.forge(out)?;
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(
            prefix,
            "power_off_interfaces_nr",
            format!("{}", self.power_off_interfaces.len()),
        );
        for (i, intf) in self.power_off_interfaces.iter().enumerate() {
            let p = format!("{prefix}power_off_interfaces[{i}]->");
            emit(&p, "interface_address", intf.interface_address.to_string());
            emit(&p, "media_type", format!("0x{:04x}", intf.media_type.0));
            intf.generic_phy_common_data.visit(&p, emit);
        }
    }
}

/// Interface power change information TLV ("IEEE Std 1905.1-2013, Section
/// 6.4.29"): requested power states.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct InterfacePowerChangeInformation {
    pub power_change_interfaces: Vec<PowerChangeRequest>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PowerChangeRequest {
    pub interface_address: MacAddress,
    pub requested_power_state: u8,
}

impl InterfacePowerChangeInformation {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        if !body.has_remaining() {
            // Legacy zero-length empty-list encoding.
            if cfg!(feature = "fix-broken-tlvs") {
                return Ok(InterfacePowerChangeInformation::default());
            }
            return Err(CodecError::LengthMismatch(
                "INTERFACE_POWER_CHANGE_INFORMATION",
            ));
        }
        let count = wire::read_u8(body)?;
        let mut power_change_interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            power_change_interfaces.push(PowerChangeRequest {
                interface_address: wire::read_mac(body)?,
                requested_power_state: wire::read_u8(body)?,
            });
        }
        Ok(InterfacePowerChangeInformation {
            power_change_interfaces,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(
            out,
            self.power_change_interfaces.len(),
            "power_change_interfaces_nr",
        )?;
        for intf in &self.power_change_interfaces {
            wire::put_mac(out, &intf.interface_address);
            out.put_u8(intf.requested_power_state);
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(
            prefix,
            "power_change_interfaces_nr",
            format!("{}", self.power_change_interfaces.len()),
        );
        for (i, intf) in self.power_change_interfaces.iter().enumerate() {
            let p = format!("{prefix}power_change_interfaces[{i}]->");
            emit(&p, "interface_address", intf.interface_address.to_string());
            emit(
                &p,
                "requested_power_state",
                format!("{}", intf.requested_power_state),
            );
        }
    }
}

/// Interface power change status TLV ("IEEE Std 1905.1-2013, Section
/// 6.4.30"): results of a previous power change request.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct InterfacePowerChangeStatus {
    pub power_change_interfaces: Vec<PowerChangeStatus>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PowerChangeStatus {
    pub interface_address: MacAddress,
    pub result: u8,
}

impl InterfacePowerChangeStatus {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        if !body.has_remaining() {
            // Legacy zero-length empty-list encoding.
            if cfg!(feature = "fix-broken-tlvs") {
                return Ok(InterfacePowerChangeStatus::default());
            }
            return Err(CodecError::LengthMismatch("INTERFACE_POWER_CHANGE_STATUS"));
        }
        let count = wire::read_u8(body)?;
        let mut power_change_interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            power_change_interfaces.push(PowerChangeStatus {
                interface_address: wire::read_mac(body)?,
                result: wire::read_u8(body)?,
            });
        }
        Ok(InterfacePowerChangeStatus {
            power_change_interfaces,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(
            out,
            self.power_change_interfaces.len(),
            "power_change_interfaces_nr",
        )?;
        for intf in &self.power_change_interfaces {
            wire::put_mac(out, &intf.interface_address);
            out.put_u8(intf.result);
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(
            prefix,
            "power_change_interfaces_nr",
            format!("{}", self.power_change_interfaces.len()),
        );
        for (i, intf) in self.power_change_interfaces.iter().enumerate() {
            let p = format!("{prefix}power_change_interfaces[{i}]->");
            emit(&p, "interface_address", intf.interface_address.to_string());
            emit(&p, "result", format!("{}", intf.result));
        }
    }
}
