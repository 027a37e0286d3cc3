//! IAP: queries to and results from the Information Access Service.
//!
//! A GetValueByClass query records a query binding on the querying circuit,
//! resolved against the attribute registry. The matching result (the latest
//! query strictly before it, on the peer side of the circuit) picks the
//! attribute decoder for every entry of the returned list. LSAP selector
//! decoders turn those entries into LMP conversation bindings.
//!
//! IAS integers, lengths and object identifiers are big-endian.
//!
//! Version française (résumé):
//! Une requête GetValueByClass enregistre une liaison requête/résultat; le
//! résultat correspondant choisit le décodeur d'attribut, qui peut à son tour
//! enregistrer une liaison LSAP.

pub mod device;
pub mod layout;
pub mod parser;
pub mod registry;

pub use parser::{
    AttributeEntry, AttributeValue, IapControl, dissect_request, dissect_result, render_generic,
};
pub use registry::{AttributeDecoder, AttributeOutcome, AttributeRegistry, ClassEntry};
