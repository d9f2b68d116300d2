//! Static catalogs of the decoders and buses a RIVO device supports.
//!
//! Both catalogs are built once on first use and shared afterwards.

mod decoder;
mod field;
mod protocol;

pub use decoder::{DecoderCatalog, DecoderConfig, DecoderType};
pub use field::{FieldKind, FieldSpec};
pub use protocol::{BusProtocol, ProtocolCatalog, ValidationReport};
