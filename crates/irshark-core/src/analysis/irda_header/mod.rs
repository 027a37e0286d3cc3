pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{Direction, IrdaRecord, parse_irda_packet};
