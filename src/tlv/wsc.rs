use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::{hex_string, FieldVisitor, MediaSpecificData, MediaType};
use crate::wire;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// WSC TLV ("IEEE Std 1905.1-2013, Section 6.4.18").
///
/// The frame is a Wi-Fi Simple Configuration payload; its internals belong to
/// the WSC state machine and are carried here as opaque bytes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Wsc {
    pub frame: Bytes,
}

impl Wsc {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        Ok(Wsc {
            frame: body.copy_to_bytes(body.remaining()),
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        out.extend_from_slice(&self.frame);
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "wsc_frame_size", format!("{}", self.frame.len()));
        emit(prefix, "wsc_frame", hex_string(&self.frame));
    }
}

/// Push button event notification TLV ("IEEE Std 1905.1-2013, Section
/// 6.4.19"): the media types on which a push-button configuration sequence
/// was started.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PushButtonEventNotification {
    pub media_types: Vec<MediaTypeEntry>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MediaTypeEntry {
    pub media_type: MediaType,
    pub media_specific_data: MediaSpecificData,
}

impl PushButtonEventNotification {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        if !body.has_remaining() {
            // Same legacy empty-list encoding as the bridging capability TLV.
            if cfg!(feature = "fix-broken-tlvs") {
                return Ok(PushButtonEventNotification::default());
            }
            return Err(CodecError::LengthMismatch("PUSH_BUTTON_EVENT_NOTIFICATION"));
        }
        let count = wire::read_u8(body)?;
        let mut media_types = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let media_type = MediaType(wire::read_u16(body)?);
            let media_specific_data = MediaSpecificData::parse(media_type, body)?;
            media_types.push(MediaTypeEntry {
                media_type,
                media_specific_data,
            });
        }
        Ok(PushButtonEventNotification { media_types })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_u8_count(out, self.media_types.len(), "media_types_nr")?;
        for entry in &self.media_types {
            out.put_u16(entry.media_type.0);
            entry.media_specific_data.forge(entry.media_type, out)?;
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "media_types_nr", format!("{}", self.media_types.len()));
        for (i, entry) in self.media_types.iter().enumerate() {
            let p = format!("{prefix}media_types[{i}]->");
            emit(&p, "media_type", format!("0x{:04x}", entry.media_type.0));
            entry.media_specific_data.visit(&p, emit);
        }
    }
}

/// Push button join notification TLV ("IEEE Std 1905.1-2013, Section
/// 6.4.20"): a device reporting that a new station joined following a
/// push-button sequence.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PushButtonJoinNotification {
    pub al_mac_address: MacAddress,
    /// Message id of the push-button event notification that triggered the
    /// join.
    pub message_identifier: u16,
    pub mac_address: MacAddress,
    pub new_mac_address: MacAddress,
}

impl PushButtonJoinNotification {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        if body.remaining() != 20 {
            return Err(CodecError::LengthMismatch("PUSH_BUTTON_JOIN_NOTIFICATION"));
        }
        Ok(PushButtonJoinNotification {
            al_mac_address: wire::read_mac(body)?,
            message_identifier: wire::read_u16(body)?,
            mac_address: wire::read_mac(body)?,
            new_mac_address: wire::read_mac(body)?,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_mac(out, &self.al_mac_address);
        out.put_u16(self.message_identifier);
        wire::put_mac(out, &self.mac_address);
        wire::put_mac(out, &self.new_mac_address);
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "al_mac_address", self.al_mac_address.to_string());
        emit(
            prefix,
            "message_identifier",
            format!("{}", self.message_identifier),
        );
        emit(prefix, "mac_address", self.mac_address.to_string());
        emit(prefix, "new_mac_address", self.new_mac_address.to_string());
    }
}
