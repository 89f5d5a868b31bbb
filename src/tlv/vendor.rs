use crate::addr::Oui;
use crate::error::CodecError;
use crate::tlv::{hex_string, FieldVisitor};
use crate::wire;
use bytes::{Buf, Bytes, BytesMut};

/// Vendor specific TLV ("IEEE Std 1905.1-2013, Section 6.4.2").
///
/// The payload after the OUI is opaque to the core codec; vendor modules
/// registered with the extension tables interpret it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VendorSpecific {
    pub oui: Oui,
    pub payload: Bytes,
}

impl VendorSpecific {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        let oui = Oui(wire::read_array(body)?);
        let payload = body.copy_to_bytes(body.remaining());
        Ok(VendorSpecific { oui, payload })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        out.extend_from_slice(&self.oui.0);
        out.extend_from_slice(&self.payload);
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "vendor_oui", self.oui.to_string());
        emit(prefix, "m_nr", format!("{}", self.payload.len()));
        emit(prefix, "m", hex_string(&self.payload));
    }
}
