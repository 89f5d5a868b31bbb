//! Vendor extension hooks.
//!
//! Vendor modules extend the stack without touching the core: they register
//! callbacks that inject vendor-specific TLVs into outgoing CMDUs, consume
//! them from incoming ones, and contribute vendor rows to the data model.
//! Registration is name-keyed and append-only; both tables are normally
//! filled once at startup.

pub mod bbf;

use crate::addr::Oui;
use crate::cmdu::Cmdu;
use crate::dm::DataModel;
use crate::error::DmError;
use crate::tlv::{FieldVisitor, Tlv, VendorSpecific};
use bytes::Bytes;
use tracing::warn;

/// Longest accepted extension name.
pub const MAX_EXTENSION_NAME_LEN: usize = 20;

/// Hooks invoked around CMDU reception and transmission.
pub trait CmduExtension {
    fn name(&self) -> &str;

    /// Inspect a received CMDU. Vendor-specific TLVs belonging to the
    /// module's OUI may update module or data-model state.
    fn process(&mut self, dm: &mut DataModel, cmdu: &Cmdu);

    /// Extend an outgoing CMDU with vendor-specific TLVs.
    fn send(&mut self, dm: &DataModel, cmdu: &mut Cmdu);
}

/// Hooks contributing vendor data to the data model and its dumps.
pub trait DataModelExtension {
    fn name(&self) -> &str;

    /// Collect the local device's vendor TLVs.
    fn obtain_local_info(&mut self, dm: &DataModel) -> Vec<VendorSpecific>;

    /// Route received vendor TLVs into the extension area of the device
    /// with `al_mac`.
    fn update_info(&mut self, dm: &mut DataModel, tlvs: &[VendorSpecific], al_mac: crate::addr::MacAddress);

    /// Render the vendor TLVs of one device for a textual dump.
    fn dump(&self, tlvs: &[VendorSpecific], emit: &mut FieldVisitor, prefix: &str);
}

/// The two append-only extension tables.
#[derive(Default)]
pub struct ExtensionRegistry {
    cmdu: Vec<Box<dyn CmduExtension>>,
    dm: Vec<Box<dyn DataModelExtension>>,
}

impl ExtensionRegistry {
    pub fn new() -> ExtensionRegistry {
        ExtensionRegistry::default()
    }

    /// Register CMDU hooks. Duplicate names are rejected.
    pub fn register_cmdu_extension(
        &mut self,
        extension: Box<dyn CmduExtension>,
    ) -> Result<(), DmError> {
        let name = extension.name().to_string();
        check_name(&name)?;
        if self.cmdu.iter().any(|e| e.name() == name) {
            warn!("a protocol extension named {name:?} already exists, ignoring");
            return Err(DmError::DuplicateExtension(name));
        }
        self.cmdu.push(extension);
        Ok(())
    }

    /// Register data-model hooks. Duplicate names are rejected.
    pub fn register_dm_extension(
        &mut self,
        extension: Box<dyn DataModelExtension>,
    ) -> Result<(), DmError> {
        let name = extension.name().to_string();
        check_name(&name)?;
        if self.dm.iter().any(|e| e.name() == name) {
            warn!("a data model extension named {name:?} already exists, ignoring");
            return Err(DmError::DuplicateExtension(name));
        }
        self.dm.push(extension);
        Ok(())
    }

    /// Hand a received CMDU to every registered processor.
    pub fn process_cmdu_extensions(&mut self, dm: &mut DataModel, cmdu: &Cmdu) {
        for extension in &mut self.cmdu {
            extension.process(dm, cmdu);
        }
    }

    /// Let every registered sender extend an outgoing CMDU.
    pub fn send_cmdu_extensions(&mut self, dm: &DataModel, cmdu: &mut Cmdu) {
        for extension in &mut self.cmdu {
            extension.send(dm, cmdu);
        }
    }

    /// Collect the local vendor TLVs of every registered module,
    /// concatenated in registration order.
    pub fn obtain_extended_local_info(&mut self, dm: &DataModel) -> Vec<VendorSpecific> {
        let mut out = Vec::new();
        for extension in &mut self.dm {
            out.extend(extension.obtain_local_info(dm));
        }
        out
    }

    /// Route received vendor TLVs into the target device's extension area.
    pub fn update_extended_info(
        &mut self,
        dm: &mut DataModel,
        tlvs: &[VendorSpecific],
        al_mac: crate::addr::MacAddress,
    ) {
        for extension in &mut self.dm {
            extension.update_info(dm, tlvs, al_mac);
        }
    }

    /// Render a device's vendor TLVs through every registered dumper.
    pub fn dump_extended_info(
        &self,
        tlvs: &[VendorSpecific],
        emit: &mut FieldVisitor,
        prefix: &str,
    ) {
        for extension in &self.dm {
            extension.dump(tlvs, emit, prefix);
        }
    }
}

fn check_name(name: &str) -> Result<(), DmError> {
    if name.len() > MAX_EXTENSION_NAME_LEN {
        return Err(DmError::ExtensionNameTooLong(
            name.to_string(),
            MAX_EXTENSION_NAME_LEN,
        ));
    }
    Ok(())
}

/// Remove every vendor-specific TLV from a CMDU, releasing them. Vendor TLVs
/// are all structured alike, so no per-module release hook is needed.
pub fn strip_vendor_tlvs(cmdu: &mut Cmdu) {
    cmdu.tlvs.retain(|tlv| !matches!(tlv, Tlv::VendorSpecific(_)));
}

/// Wrap an already-forged vendor body in a vendor-specific TLV.
pub fn embed_extension(body: Bytes, oui: Oui) -> VendorSpecific {
    VendorSpecific { oui, payload: body }
}

/// Append a vendor-specific TLV to a CMDU's TLV list.
pub fn insert_in_cmdu(cmdu: &mut Cmdu, vendor_specific: VendorSpecific) {
    cmdu.tlvs.push(Tlv::VendorSpecific(vendor_specific));
}

/// The vendor-specific TLVs of a CMDU, in list order.
pub fn vendor_tlvs(cmdu: &Cmdu) -> impl Iterator<Item = &VendorSpecific> {
    cmdu.tlvs.iter().filter_map(|tlv| match tlv {
        Tlv::VendorSpecific(vs) => Some(vs),
        _ => None,
    })
}

/// Parse-and-check helper for modules that only care about their own OUI.
pub fn vendor_tlvs_with_oui<'a>(
    cmdu: &'a Cmdu,
    oui: Oui,
) -> impl Iterator<Item = &'a VendorSpecific> {
    vendor_tlvs(cmdu).filter(move |vs| vs.oui == oui)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::MacAddress;
    use crate::cmdu::MessageType;

    struct Noop(&'static str);

    impl CmduExtension for Noop {
        fn name(&self) -> &str {
            self.0
        }
        fn process(&mut self, _: &mut DataModel, _: &Cmdu) {}
        fn send(&mut self, _: &DataModel, _: &mut Cmdu) {}
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = ExtensionRegistry::new();
        registry.register_cmdu_extension(Box::new(Noop("bbf"))).unwrap();
        assert_eq!(
            registry.register_cmdu_extension(Box::new(Noop("bbf"))),
            Err(DmError::DuplicateExtension("bbf".into()))
        );
    }

    #[test]
    fn overlong_names_are_rejected() {
        let mut registry = ExtensionRegistry::new();
        assert!(matches!(
            registry.register_cmdu_extension(Box::new(Noop("a-very-long-extension-name"))),
            Err(DmError::ExtensionNameTooLong(..))
        ));
    }

    #[test]
    fn strip_vendor_tlvs_keeps_the_rest() {
        let mut cmdu = Cmdu::new(
            MessageType::TopologyDiscovery,
            1,
            vec![
                Tlv::AlMacAddress(crate::tlv::AlMacAddress {
                    al_mac_address: MacAddress([2, 0, 0, 0, 0, 1]),
                }),
                Tlv::VendorSpecific(VendorSpecific {
                    oui: Oui([0, 0x25, 0x6d]),
                    payload: Bytes::from_static(&[1, 2, 3]),
                }),
            ],
        );
        strip_vendor_tlvs(&mut cmdu);
        assert_eq!(cmdu.tlvs.len(), 1);
    }
}
