use crate::addr::{MacAddress, Oui};
use crate::error::CodecError;
use crate::tlv::{hex_string, printable_string, FieldVisitor};
use crate::wire;
use bytes::{Buf, Bytes, BytesMut};

/// The (OUI, variant, media-specific bytes) triple shared by every
/// generic-PHY construct ("IEEE Std 1905.1-2013, Table 6-29").
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GenericPhyCommonData {
    pub oui: Oui,
    pub variant_index: u8,
    pub media_specific_bytes: Bytes,
}

impl GenericPhyCommonData {
    /// Parse the `oui | variant_index | nr | bytes` wire layout.
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        let oui = Oui(wire::read_array(body)?);
        let variant_index = wire::read_u8(body)?;
        let nr = wire::read_u8(body)? as usize;
        Ok(GenericPhyCommonData {
            oui,
            variant_index,
            media_specific_bytes: wire::read_bytes(body, nr)?,
        })
    }

    pub(crate) fn forge(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        out.extend_from_slice(&self.oui.0);
        out.extend_from_slice(&[self.variant_index]);
        wire::put_u8_count(out, self.media_specific_bytes.len(), "media_specific_bytes_nr")?;
        out.extend_from_slice(&self.media_specific_bytes);
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "oui", self.oui.to_string());
        emit(prefix, "variant_index", format!("{}", self.variant_index));
        emit(
            prefix,
            "media_specific_bytes_nr",
            format!("{}", self.media_specific_bytes.len()),
        );
        if !self.media_specific_bytes.is_empty() {
            emit(
                prefix,
                "media_specific_bytes",
                hex_string(&self.media_specific_bytes),
            );
        }
    }
}

/// Generic PHY device information TLV ("IEEE Std 1905.1-2013, Section
/// 6.4.21"): describes local interfaces whose media are outside the 1905
/// media-type table.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GenericPhyDeviceInformation {
    pub al_mac_address: MacAddress,
    pub local_interfaces: Vec<GenericPhyInterfaceEntry>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GenericPhyInterfaceEntry {
    pub local_interface_address: MacAddress,
    pub generic_phy_common_data: GenericPhyCommonData,
    /// Fixed-width variant name, space padded.
    pub variant_name: [u8; 32],
    /// URL of the XML description of this PHY variant.
    pub generic_phy_description_xml_url: Bytes,
}

impl GenericPhyDeviceInformation {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        let al_mac_address = wire::read_mac(body)?;
        let count = wire::read_u8(body)?;
        let mut local_interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let local_interface_address = wire::read_mac(body)?;
            let oui = Oui(wire::read_array(body)?);
            let variant_index = wire::read_u8(body)?;
            let variant_name = wire::read_array(body)?;
            let url_len = wire::read_u8(body)? as usize;
            let media_specific_nr = wire::read_u8(body)? as usize;
            let generic_phy_description_xml_url = wire::read_bytes(body, url_len)?;
            let media_specific_bytes = wire::read_bytes(body, media_specific_nr)?;
            local_interfaces.push(GenericPhyInterfaceEntry {
                local_interface_address,
                generic_phy_common_data: GenericPhyCommonData {
                    oui,
                    variant_index,
                    media_specific_bytes,
                },
                variant_name,
                generic_phy_description_xml_url,
            });
        }
        Ok(GenericPhyDeviceInformation {
            al_mac_address,
            local_interfaces,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_mac(out, &self.al_mac_address);
        wire::put_u8_count(out, self.local_interfaces.len(), "local_interfaces_nr")?;
        for intf in &self.local_interfaces {
            wire::put_mac(out, &intf.local_interface_address);
            out.extend_from_slice(&intf.generic_phy_common_data.oui.0);
            out.extend_from_slice(&[intf.generic_phy_common_data.variant_index]);
            out.extend_from_slice(&intf.variant_name);
            wire::put_u8_count(
                out,
                intf.generic_phy_description_xml_url.len(),
                "generic_phy_description_xml_url_len",
            )?;
            wire::put_u8_count(
                out,
                intf.generic_phy_common_data.media_specific_bytes.len(),
                "media_specific_bytes_nr",
            )?;
            out.extend_from_slice(&intf.generic_phy_description_xml_url);
            out.extend_from_slice(&intf.generic_phy_common_data.media_specific_bytes);
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "al_mac_address", self.al_mac_address.to_string());
        emit(
            prefix,
            "local_interfaces_nr",
            format!("{}", self.local_interfaces.len()),
        );
        for (i, intf) in self.local_interfaces.iter().enumerate() {
            let p = format!("{prefix}local_interfaces[{i}]->");
            emit(
                &p,
                "local_interface_address",
                intf.local_interface_address.to_string(),
            );
            intf.generic_phy_common_data.visit(&p, emit);
            emit(&p, "variant_name", printable_string(&intf.variant_name));
            emit(
                &p,
                "generic_phy_description_xml_url",
                printable_string(&intf.generic_phy_description_xml_url),
            );
        }
    }
}

/// Push button generic PHY event notification TLV ("IEEE Std 1905.1-2013,
/// Section 6.4.26").
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PushButtonGenericPhyEventNotification {
    pub local_interfaces: Vec<GenericPhyCommonData>,
}

impl PushButtonGenericPhyEventNotification {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        if !body.has_remaining() {
            // Legacy zero-length empty-list encoding.
            if cfg!(feature = "fix-broken-tlvs") {
                return Ok(PushButtonGenericPhyEventNotification::default());
            }
            return Err(CodecError::LengthMismatch(
                "PUSH_BUTTON_GENERIC_PHY_EVENT_NOTIFICATION",
            ));
        }
        let count = wire::read_u8(body)?;
        let mut local_interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            local_interfaces.push(GenericPhyCommonData::parse(body)?);
        }
        Ok(PushButtonGenericPhyEventNotification { local_interfaces })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(out, self.local_interfaces.len(), "local_interfaces_nr")?;
        for intf in &self.local_interfaces {
            intf.forge(out)?;
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(
            prefix,
            "local_interfaces_nr",
            format!("{}", self.local_interfaces.len()),
        );
        for (i, intf) in self.local_interfaces.iter().enumerate() {
            let p = format!("{prefix}local_interfaces[{i}]->");
            intf.visit(&p, emit);
        }
    }
}
