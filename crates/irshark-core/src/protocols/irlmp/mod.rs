//! IrLMP link-management multiplexing.
//!
//! The parser reads the destination and source LSAP selectors, decodes the
//! control opcodes (connect, disconnect with reason, access mode) and
//! demultiplexes data: selector 0x00 goes to IAP, bound selectors go to their
//! application through the LMP conversation history, everything else stays
//! opaque.
//!
//! Version française (résumé):
//! Le module lit les sélecteurs LSAP, décode les opcodes de contrôle et
//! aiguille les données vers IAP, l'application liée ou un bloc opaque.

pub mod layout;
pub mod parser;

pub use parser::{LmpHeader, dissect, is_application_lsap};
