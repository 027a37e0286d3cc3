//! Tiny TP credit-based flow control.
//!
//! One credit byte precedes the application payload on connect and data
//! PDUs. Connect PDUs may carry a parameter block (maximum SDU size).
//! Disconnect PDUs never reach this layer.

pub mod layout;
pub mod parser;

pub use parser::{TtpHeader, TtpParams, dissect};
