//! Fixed-size scalar TLVs.

use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::FieldVisitor;
use crate::wire;
use bytes::{BufMut, Bytes, BytesMut};

/// The role advertised in searched-role and supported-role TLVs. 1905.1
/// defines only the registrar.
pub const IEEE_1905_REGISTRAR_ROLE: u8 = 0x00;

pub const FREQ_BAND_2_4_GHZ: u8 = 0x00;
pub const FREQ_BAND_5_GHZ: u8 = 0x01;
pub const FREQ_BAND_60_GHZ: u8 = 0x02;

pub const PROFILE_1905_1: u8 = 0x00;
pub const PROFILE_1905_1A: u8 = 0x01;

/// Result code of a link-metric response that could not be answered.
pub const LINK_METRIC_RESULT_CODE_INVALID_NEIGHBOR: u8 = 0x00;

/// AL MAC address TLV ("IEEE Std 1905.1-2013, Section 6.4.3").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AlMacAddress {
    pub al_mac_address: MacAddress,
}

impl AlMacAddress {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        Ok(AlMacAddress {
            al_mac_address: wire::read_mac(body)?,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_mac(out, &self.al_mac_address);
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "al_mac_address", self.al_mac_address.to_string());
    }
}

/// MAC address TLV ("IEEE Std 1905.1-2013, Section 6.4.4"): the address of
/// the interface a topology discovery was sent from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MacAddressType {
    pub mac_address: MacAddress,
}

impl MacAddressType {
    pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
        Ok(MacAddressType {
            mac_address: wire::read_mac(body)?,
        })
    }

    pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
        wire::put_mac(out, &self.mac_address);
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        emit(prefix, "mac_address", self.mac_address.to_string());
    }
}

macro_rules! one_byte_tlv {
    ($(#[$doc:meta])* $name:ident, $field:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug)]
        pub struct $name {
            pub $field: u8,
        }

        impl $name {
            pub(crate) fn parse(body: &mut Bytes) -> Result<Self, CodecError> {
                Ok($name {
                    $field: wire::read_u8(body)?,
                })
            }

            pub(crate) fn forge_body(&self, out: &mut BytesMut) -> Result<(), CodecError> {
                out.put_u8(self.$field);
                Ok(())
            }

            pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
                emit(prefix, stringify!($field), format!("{}", self.$field));
            }
        }
    };
}

one_byte_tlv!(
    /// Link metric result code TLV ("IEEE Std 1905.1-2013, Section 6.4.13").
    LinkMetricResultCode,
    result_code
);
one_byte_tlv!(
    /// Searched role TLV ("IEEE Std 1905.1-2013, Section 6.4.14").
    SearchedRole,
    role
);
one_byte_tlv!(
    /// Autoconfig frequency band TLV ("IEEE Std 1905.1-2013, Section 6.4.15").
    AutoconfigFreqBand,
    freq_band
);
one_byte_tlv!(
    /// Supported role TLV ("IEEE Std 1905.1-2013, Section 6.4.16").
    SupportedRole,
    role
);
one_byte_tlv!(
    /// Supported frequency band TLV ("IEEE Std 1905.1-2013, Section 6.4.17").
    SupportedFreqBand,
    freq_band
);
one_byte_tlv!(
    /// 1905 profile version TLV ("IEEE Std 1905.1-2013, Section 6.4.27").
    ProfileVersion,
    profile
);
