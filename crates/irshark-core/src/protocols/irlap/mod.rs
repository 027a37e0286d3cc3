//! IrLAP link-access decoding.
//!
//! The parser reads the address byte (connection address plus C/R bit),
//! classifies the control byte into I/S/U frames and dispatches U frames to
//! the SNRM, UA, XID, TEST and FRMR decoders. I frames hand their payload to
//! IrLMP. The decoder keeps no state of its own between frames; the circuit
//! it extracts is published on the frame context for the upper layers.
//!
//! A truncated address field or an unknown U modifier falls back to opaque
//! data for the rest of the frame only.
//!
//! Version française (résumé):
//! Le module décode l'octet d'adresse (adresse de connexion + bit C/R), classe
//! la trame (I/S/U) et délègue SNRM, UA, XID, TEST et FRMR. Les trames I
//! passent à IrLMP. Aucun état entre trames.

pub mod layout;
pub mod negotiation;
pub mod parser;
pub mod xid;

pub use parser::{FrameKind, SupervisoryKind, UnnumberedKind, classify_control, dissect};
