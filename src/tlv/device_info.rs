use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::{FieldVisitor, MediaSpecificData, MediaType};
use crate::wire;
use bytes::{BufMut, Bytes, BytesMut};

/// Device information TLV ("IEEE Std 1905.1-2013, Section 6.4.5"): the AL MAC
/// address plus one entry per local 1905 interface.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DeviceInformation {
    pub al_mac_address: MacAddress,
    pub local_interfaces: Vec<LocalInterfaceInfo>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LocalInterfaceInfo {
    pub mac_address: MacAddress,
    pub media_type: MediaType,
    pub media_specific_data: MediaSpecificData,
}

impl DeviceInformation {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        let al_mac_address = wire::read_mac(body)?;
        let count = wire::read_u8(body)?;
        let mut local_interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac_address = wire::read_mac(body)?;
            let media_type = MediaType(wire::read_u16(body)?);
            let media_specific_data = MediaSpecificData::parse(media_type, body)?;
            local_interfaces.push(LocalInterfaceInfo {
                mac_address,
                media_type,
                media_specific_data,
            });
        }
        Ok(DeviceInformation {
            al_mac_address,
            local_interfaces,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_mac(out, &self.al_mac_address);
        wire::put_u8_count(out, self.local_interfaces.len(), "local_interfaces_nr")?;
        for intf in &self.local_interfaces {
            wire::put_mac(out, &intf.mac_address);
            out.put_u16(intf.media_type.0);
            intf.media_specific_data.forge(intf.media_type, out)?;
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
            emit(&p, "mac_address", intf.mac_address.to_string());
            emit(&p, "media_type", format!("0x{:04x}", intf.media_type.0));
            intf.media_specific_data.visit(&p, emit);
        }
    }

    /// The local interface entry carrying `mac`, if any.
    pub fn interface(&self, mac: MacAddress) -> Option<&LocalInterfaceInfo> {
        self.local_interfaces.iter().find(|i| i.mac_address == mac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv::Tlv;

    #[test]
    fn trailing_interface_bytes_are_rejected() {
        let mut raw = BytesMut::new();
        raw.put_u8(3);
        raw.put_u16(8); // declares one extra byte after the count
        raw.put_slice(&[2, 0, 0, 0, 0, 1]);
        raw.put_u8(0);
        raw.put_u8(0xee);
        let mut buf = raw.freeze();
        assert!(Tlv::parse(&mut buf).is_err());
    }

    #[test]
    fn interface_lookup() {
        let info = DeviceInformation {
            al_mac_address: MacAddress([2, 0, 0, 0, 0, 1]),
            local_interfaces: vec![LocalInterfaceInfo {
                mac_address: MacAddress([2, 0, 0, 0, 0, 2]),
                media_type: MediaType::IEEE_802_3U_FAST_ETHERNET,
                media_specific_data: MediaSpecificData::None,
            }],
        };
        assert!(info.interface(MacAddress([2, 0, 0, 0, 0, 2])).is_some());
        assert!(info.interface(MacAddress([2, 0, 0, 0, 0, 9])).is_none());
    }
}
