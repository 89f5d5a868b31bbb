use thiserror::Error;

/// A frame, TLV, or management primitive on the wire is malformed.
///
/// Codec errors are recoverable at the message level: the offending frame is
/// dropped and reception continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("not enough bytes")]
    Truncated,
    #[error("declared length does not match the {0} body")]
    LengthMismatch(&'static str),
    #[error("unknown TLV type {0}")]
    UnknownTlvType(u8),
    #[error("unknown CMDU message type {0}")]
    UnknownMessageType(u16),
    #[error("unknown ALME primitive type {0}")]
    UnknownAlmeType(u8),
    #[error("invalid value {value} in field {field}")]
    InvalidField { field: &'static str, value: u32 },
    #[error("TLV {0:?} must appear exactly once in this CMDU")]
    MissingRequiredTlv(crate::tlv::TlvType),
    #[error("TLV {0:?} is not allowed in this CMDU")]
    UnexpectedTlv(crate::tlv::TlvType),
    #[error("a vendor-specific CMDU must start with a vendor-specific TLV")]
    VendorCmduWithoutVendorTlv,
    #[error("fragment set is inconsistent or incomplete")]
    BadFragments,
    #[error("a single TLV does not fit in one fragment")]
    TlvTooBig,
    #[error("TLV body of {0} bytes exceeds the 16-bit length field")]
    BodyTooBig(usize),
    #[error("LLDP PDU does not carry the 1905.1 required TLV set")]
    BadLldpProfile,
}

/// A data-model operation was invoked against its preconditions or named an
/// entity that does not exist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DmError {
    #[error("the local AL MAC address has already been set")]
    LocalDeviceAlreadySet,
    #[error("the local AL MAC address has not been set yet")]
    LocalDeviceNotSet,
    #[error("the registrar has already been set")]
    RegistrarAlreadySet,
    #[error("interface {0} already exists with a different MAC address")]
    InterfaceMacMismatch(String),
    #[error("no local interface with address {0}")]
    NoSuchInterface(crate::addr::MacAddress),
    #[error("no radio with unique id {0}")]
    NoSuchRadio(crate::addr::MacAddress),
    #[error("an extension named {0:?} is already registered")]
    DuplicateExtension(String),
    #[error("extension name {0:?} is longer than {1} characters")]
    ExtensionNameTooLong(String, usize),
}
