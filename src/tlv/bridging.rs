use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::FieldVisitor;
use crate::wire;
use bytes::{Buf, Bytes, BytesMut};

/// Device bridging capability TLV ("IEEE Std 1905.1-2013, Section 6.4.6"):
/// groups of interface addresses that are bridged together on the reporting
/// device.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DeviceBridgingCapability {
    pub bridging_tuples: Vec<BridgingTuple>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BridgingTuple {
    pub macs: Vec<MacAddress>,
}

impl DeviceBridgingCapability {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        if !body.has_remaining() {
            // A compliant empty list is encoded with length 1 (a zero tuple
            // count); at least one deployed implementation encodes it with
            // length 0 instead.
            if cfg!(feature = "fix-broken-tlvs") {
                return Ok(DeviceBridgingCapability::default());
            }
            return Err(CodecError::LengthMismatch("DEVICE_BRIDGING_CAPABILITIES"));
        }
        let count = wire::read_u8(body)?;
        let mut bridging_tuples = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let macs_nr = wire::read_u8(body)?;
            let mut macs = Vec::with_capacity(macs_nr as usize);
            for _ in 0..macs_nr {
                macs.push(wire::read_mac(body)?);
            }
            bridging_tuples.push(BridgingTuple { macs });
        }
        Ok(DeviceBridgingCapability { bridging_tuples })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(out, self.bridging_tuples.len(), "bridging_tuples_nr")?;
        for tuple in &self.bridging_tuples {
            wire::put_u8_count(out, tuple.macs.len(), "bridging_tuple_macs_nr")?;
            for mac in &tuple.macs {
                wire::put_mac(out, mac);
            }
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(
            prefix,
            "bridging_tuples_nr",
            format!("{}", self.bridging_tuples.len()),
        );
        for (i, tuple) in self.bridging_tuples.iter().enumerate() {
            let p = format!("{prefix}bridging_tuples[{i}]->");
            emit(&p, "bridging_tuple_macs_nr", format!("{}", tuple.macs.len()));
            for (j, mac) in tuple.macs.iter().enumerate() {
                emit(&p, &format!("mac_address[{j}]"), mac.to_string());
            }
        }
    }
}
