//! IrLAP quality-of-service negotiation parameters (SNRM / UA / XID).

use crate::protocols::common::tree::ListKind;
use crate::protocols::common::tuple::{ParamSchema, ParamTuple, describe_mask};

use super::layout;

/// Parameter schema for IrLAP negotiation tuples.
pub struct NegotiationParams;

impl NegotiationParams {
    fn table(pi: u8) -> Option<&'static [(u32, &'static str)]> {
        match pi {
            layout::PI_BAUD_RATE => Some(layout::BAUD_RATES),
            layout::PI_MAX_TURN_TIME => Some(layout::MAX_TURN_TIMES),
            layout::PI_DATA_SIZE => Some(layout::DATA_SIZES),
            layout::PI_WINDOW_SIZE => Some(layout::WINDOW_SIZES),
            layout::PI_ADDITIONAL_BOFS => Some(layout::ADDITIONAL_BOFS),
            layout::PI_MIN_TURN_TIME => Some(layout::MIN_TURN_TIMES),
            layout::PI_LINK_DISCONNECT => Some(layout::LINK_DISCONNECT_TIMES),
            _ => None,
        }
    }
}

impl ParamSchema for NegotiationParams {
    const KIND: ListKind = ListKind::NegotiationParameter;

    fn name(pi: u8) -> Option<&'static str> {
        match pi {
            layout::PI_BAUD_RATE => Some("Baud Rate"),
            layout::PI_MAX_TURN_TIME => Some("Maximum Turnaround Time"),
            layout::PI_DATA_SIZE => Some("Data Size"),
            layout::PI_WINDOW_SIZE => Some("Window Size"),
            layout::PI_ADDITIONAL_BOFS => Some("Additional BOFs"),
            layout::PI_MIN_TURN_TIME => Some("Minimum Turnaround Time"),
            layout::PI_LINK_DISCONNECT => Some("Link Disconnect/Threshold Time"),
            _ => None,
        }
    }

    fn describe(tuple: &ParamTuple<'_>) -> Option<String> {
        describe_mask(tuple, Self::table(tuple.pi)?)
    }
}
