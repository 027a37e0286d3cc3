use serde::{Deserialize, Serialize};

use crate::dissector::Dissection;
use crate::protocols::ircomm::{self, AppProtocol};

use super::device;
use super::layout;
use super::parser::AttributeEntry;

/// Specialized decoder for one `(class, attribute)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeDecoder {
    DeviceName,
    IrlmpSupport,
    IrcommParameters,
    /// Cooked IrCOMM over Tiny TP.
    TinyTpLsapSel,
    /// 3-wire raw IrCOMM directly on IrLMP.
    IrcommLmpLsapSel,
    IrlptLsapSel,
}

/// Whether a decoder took ownership of an entry's rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOutcome {
    Handled,
    Declined,
}

impl AttributeDecoder {
    pub fn name(self) -> &'static str {
        match self {
            AttributeDecoder::DeviceName => "Device name",
            AttributeDecoder::IrlmpSupport => "IrLMP support",
            AttributeDecoder::IrcommParameters => "IrCOMM parameters",
            AttributeDecoder::TinyTpLsapSel => "IrCOMM LSAP (Tiny TP)",
            AttributeDecoder::IrcommLmpLsapSel => "IrCOMM LSAP (IrLMP)",
            AttributeDecoder::IrlptLsapSel => "IrLPT LSAP",
        }
    }

    /// Render `entry`, possibly recording an LSAP binding. A decoder that
    /// does not recognize the value shape declines and leaves the entry to
    /// the generic rendering.
    pub fn decode(self, entry: &AttributeEntry<'_>, cx: &mut Dissection<'_>) -> AttributeOutcome {
        match self {
            AttributeDecoder::DeviceName => device::decode_device_name(entry, cx),
            AttributeDecoder::IrlmpSupport => device::decode_irlmp_support(entry, cx),
            AttributeDecoder::IrcommParameters => ircomm::decode_parameters_attribute(entry, cx),
            AttributeDecoder::TinyTpLsapSel => {
                ircomm::decode_lsap_attribute(entry, cx, AppProtocol::IrcommCooked, true)
            }
            AttributeDecoder::IrcommLmpLsapSel => {
                ircomm::decode_lsap_attribute(entry, cx, AppProtocol::IrcommRaw, false)
            }
            AttributeDecoder::IrlptLsapSel => {
                ircomm::decode_lsap_attribute(entry, cx, AppProtocol::Irlpt, false)
            }
        }
    }
}

#[derive(Debug)]
pub struct ClassEntry {
    pub name: &'static str,
    pub attributes: &'static [(&'static str, AttributeDecoder)],
}

/// Immutable `class -> attribute -> decoder` table.
#[derive(Debug)]
pub struct AttributeRegistry {
    classes: &'static [ClassEntry],
}

static STANDARD: AttributeRegistry = AttributeRegistry {
    classes: &[
        ClassEntry {
            name: layout::CLASS_DEVICE,
            attributes: &[
                (layout::ATTR_DEVICE_NAME, AttributeDecoder::DeviceName),
                (layout::ATTR_IRLMP_SUPPORT, AttributeDecoder::IrlmpSupport),
            ],
        },
        ClassEntry {
            name: ircomm::layout::CLASS_IRCOMM,
            attributes: &[
                (ircomm::layout::ATTR_PARAMETERS, AttributeDecoder::IrcommParameters),
                (ircomm::layout::ATTR_TINYTP_LSAP_SEL, AttributeDecoder::TinyTpLsapSel),
                (ircomm::layout::ATTR_IRLMP_LSAP_SEL, AttributeDecoder::IrcommLmpLsapSel),
            ],
        },
        ClassEntry {
            name: ircomm::layout::CLASS_IRLPT,
            attributes: &[(ircomm::layout::ATTR_IRLMP_LSAP_SEL, AttributeDecoder::IrlptLsapSel)],
        },
    ],
};

impl AttributeRegistry {
    /// The registry every dissector uses. Built at compile time.
    pub fn standard() -> &'static AttributeRegistry {
        &STANDARD
    }

    pub fn new(classes: &'static [ClassEntry]) -> Self {
        Self { classes }
    }

    /// Exact class match, then exact attribute match within that class.
    pub fn lookup(&self, class: &str, attribute: &str) -> Option<AttributeDecoder> {
        let entry = self.classes.iter().find(|entry| entry.name == class)?;
        entry
            .attributes
            .iter()
            .find(|(name, _)| *name == attribute)
            .map(|(_, decoder)| *decoder)
    }

    pub fn classes(&self) -> &'static [ClassEntry] {
        self.classes
    }
}
