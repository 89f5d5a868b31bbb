/*!

An IEEE 1905.1/1a "Abstraction Layer" protocol engine with Multi-AP (Wi-Fi
EasyMesh) and Broadband Forum vendor extensions.

From "IEEE Std 1905.1-2013":

> This standard defines an abstraction layer for multiple home networking
> technologies that provides a common interface to widely deployed home
> networking technologies [...] The abstraction layer supports interface
> selection for the transmission of packets arriving from any interface or
> application. This standard also specifies a topology discovery protocol for
> the home network.

The crate covers the wire-level protocol engine and the topology data model:

* [`tlv`] — parse/forge/compare/visit for every defined TLV,
* [`cmdu`] — CMDU framing: per-message-type TLV cardinality rules,
  fragmentation on send and fragment reassembly on receive,
* [`lldp`] — the trimmed LLDP profile used for bridge discovery,
* [`alme`] — the private management primitive codec,
* [`dm`] — the in-memory network topology: devices, interfaces, neighbors,
  per-link discovery timestamps, per-device TLV cache, and the garbage
  collector that ages stale devices out,
* [`extension`] — the vendor extension hook registry, with the BBF non-1905
  link-metrics extension as the in-tree example.

Platform concerns (raw sockets, Wi-Fi driver glue, timers, configuration)
stay outside: the caller feeds received frames in, transmits the frames
handed back, and drives the periodic discovery/garbage-collection ticks.

*/

mod addr;
pub mod alme;
pub mod cmdu;
pub mod dm;
mod error;
pub mod extension;
pub mod lldp;
pub mod tlv;
mod wire;

pub use addr::{MacAddress, Oui};
pub use cmdu::{Cmdu, MessageType, MAX_NETWORK_SEGMENT_SIZE};
pub use error::{CodecError, DmError};
pub use tlv::{Tlv, TlvType};
