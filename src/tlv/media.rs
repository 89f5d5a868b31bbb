use crate::addr::MacAddress;
use crate::error::CodecError;
use crate::tlv::{hex_string, FieldVisitor};
use crate::wire;
use bytes::{BufMut, Bytes, BytesMut};

/// The 16-bit media type of an interface, per "IEEE Std 1905.1-2013,
/// Table 6-12".
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct MediaType(pub u16);

impl MediaType {
    pub const IEEE_802_3U_FAST_ETHERNET: MediaType = MediaType(0x0000);
    pub const IEEE_802_3AB_GIGABIT_ETHERNET: MediaType = MediaType(0x0001);
    pub const IEEE_802_11B_2_4_GHZ: MediaType = MediaType(0x0100);
    pub const IEEE_802_11G_2_4_GHZ: MediaType = MediaType(0x0101);
    pub const IEEE_802_11A_5_GHZ: MediaType = MediaType(0x0102);
    pub const IEEE_802_11N_2_4_GHZ: MediaType = MediaType(0x0103);
    pub const IEEE_802_11N_5_GHZ: MediaType = MediaType(0x0104);
    pub const IEEE_802_11AC_5_GHZ: MediaType = MediaType(0x0105);
    pub const IEEE_802_11AD_60_GHZ: MediaType = MediaType(0x0106);
    pub const IEEE_802_11AF_GHZ: MediaType = MediaType(0x0107);
    pub const IEEE_1901_WAVELET: MediaType = MediaType(0x0200);
    pub const IEEE_1901_FFT: MediaType = MediaType(0x0201);
    pub const MOCA_V1_1: MediaType = MediaType(0x0300);
    pub const UNKNOWN: MediaType = MediaType(0xffff);

    pub fn is_ieee_802_11(self) -> bool {
        (0x0100..=0x0107).contains(&self.0)
    }

    pub fn is_ieee_1901(self) -> bool {
        (0x0200..=0x0201).contains(&self.0)
    }
}

/// 802.11 role nibble inside the media-specific information.
pub const IEEE80211_ROLE_AP: u8 = 0x0;
pub const IEEE80211_ROLE_STA: u8 = 0x4;
pub const IEEE80211_ROLE_P2P_CLIENT: u8 = 0x8;
pub const IEEE80211_ROLE_P2P_GROUP_OWNER: u8 = 0x9;
pub const IEEE80211_ROLE_AD_PCP: u8 = 0xa;

/// The media-specific information block that follows a media type on the
/// wire. 802.11 media carry exactly 10 bytes, 1901 media exactly 7, every
/// other media type carries none; a mismatch is a malformed TLV.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum MediaSpecificData {
    Ieee80211 {
        /// BSSID of the network the interface belongs to.
        network_membership: MacAddress,
        /// Role nibble (AP/STA/...), stored in the upper half of its octet.
        role: u8,
        ap_channel_band: u8,
        ap_channel_center_frequency_index_1: u8,
        ap_channel_center_frequency_index_2: u8,
    },
    Ieee1901 {
        network_identifier: [u8; 7],
    },
    #[default]
    None,
}

impl MediaSpecificData {
    /// Number of payload octets this block occupies on the wire.
    pub fn size(&self) -> u8 {
        match self {
            MediaSpecificData::Ieee80211 { .. } => 10,
            MediaSpecificData::Ieee1901 { .. } => 7,
            MediaSpecificData::None => 0,
        }
    }

    /// Parse the size octet plus payload, validating both against
    /// `media_type`.
    pub(crate) fn parse(media_type: MediaType, body: &mut Bytes) -> Result<Self, CodecError> {
        let size = wire::read_u8(body)?;
        if media_type.is_ieee_802_11() {
            if size != 10 {
                return Err(CodecError::InvalidField {
                    field: "media_specific_data_size",
                    value: size as u32,
                });
            }
            let network_membership = wire::read_mac(body)?;
            let role = wire::read_u8(body)? >> 4;
            Ok(MediaSpecificData::Ieee80211 {
                network_membership,
                role,
                ap_channel_band: wire::read_u8(body)?,
                ap_channel_center_frequency_index_1: wire::read_u8(body)?,
                ap_channel_center_frequency_index_2: wire::read_u8(body)?,
            })
        } else if media_type.is_ieee_1901() {
            if size != 7 {
                return Err(CodecError::InvalidField {
                    field: "media_specific_data_size",
                    value: size as u32,
                });
            }
            Ok(MediaSpecificData::Ieee1901 {
                network_identifier: wire::read_array(body)?,
            })
        } else {
            if size != 0 {
                return Err(CodecError::InvalidField {
                    field: "media_specific_data_size",
                    value: size as u32,
                });
            }
            Ok(MediaSpecificData::None)
        }
    }

    /// Emit the size octet plus payload; the variant must agree with
    /// `media_type`.
    pub(crate) fn forge(&self, media_type: MediaType, out: &mut BytesMut) -> Result<(), CodecError> {
        let consistent = match self {
            MediaSpecificData::Ieee80211 { .. } => media_type.is_ieee_802_11(),
            MediaSpecificData::Ieee1901 { .. } => media_type.is_ieee_1901(),
            MediaSpecificData::None => !media_type.is_ieee_802_11() && !media_type.is_ieee_1901(),
        };
        if !consistent {
            return Err(CodecError::InvalidField {
                field: "media_type",
                value: media_type.0 as u32,
            });
        }
        out.put_u8(self.size());
        match self {
            MediaSpecificData::Ieee80211 {
                network_membership,
                role,
                ap_channel_band,
                ap_channel_center_frequency_index_1,
                ap_channel_center_frequency_index_2,
            } => {
                wire::put_mac(out, network_membership);
                out.put_u8(role << 4);
                out.put_u8(*ap_channel_band);
                out.put_u8(*ap_channel_center_frequency_index_1);
                out.put_u8(*ap_channel_center_frequency_index_2);
            }
            MediaSpecificData::Ieee1901 { network_identifier } => {
                out.put_slice(network_identifier);
            }
            MediaSpecificData::None => {}
        }
        Ok(())
    }

    pub(crate) fn visit(&self, prefix: &str, emit: &mut FieldVisitor) {
        match self {
            MediaSpecificData::Ieee80211 {
                network_membership,
                role,
                ap_channel_band,
                ap_channel_center_frequency_index_1,
                ap_channel_center_frequency_index_2,
            } => {
                emit(prefix, "network_membership", network_membership.to_string());
                emit(prefix, "role", format!("{role}"));
                emit(prefix, "ap_channel_band", format!("{ap_channel_band}"));
                emit(
                    prefix,
                    "ap_channel_center_frequency_index_1",
                    format!("{ap_channel_center_frequency_index_1}"),
                );
                emit(
                    prefix,
                    "ap_channel_center_frequency_index_2",
                    format!("{ap_channel_center_frequency_index_2}"),
                );
            }
            MediaSpecificData::Ieee1901 { network_identifier } => {
                emit(prefix, "network_identifier", hex_string(network_identifier));
            }
            MediaSpecificData::None => {}
        }
    }
}
