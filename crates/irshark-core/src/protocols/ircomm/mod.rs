//! IrCOMM serial/parallel emulation and IrLPT.
//!
//! Cooked IrCOMM frames carry a control-channel length, that many bytes of
//! parameter tuples, then user data. Raw IrCOMM and IrLPT payloads are
//! opaque user data. The attribute decoders here turn IAS results into the
//! LSAP bindings that route later frames to these decoders.
//!
//! Version française (résumé):
//! IrCOMM « cooked » : longueur du canal de contrôle, paramètres, puis
//! données. IrCOMM brut et IrLPT : données opaques. Les décodeurs d'attributs
//! IAS enregistrent les liaisons LSAP.

pub mod attributes;
pub mod layout;
pub mod params;
pub mod parser;

pub use attributes::{decode_lsap_attribute, decode_parameters_attribute, lsap_from_value};
pub use params::IrcommParams;
pub use parser::{AppProtocol, dissect, dissect_cooked};
