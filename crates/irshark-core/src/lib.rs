//! irshark core library: IrDA protocol stack decoding for capture files.
//!
//! Packet sources feed the analysis layer, which strips the Linux IrDA
//! pseudo-header and drives the layered decoders (IrLAP, XID, IrLMP, IAP,
//! Tiny TP, IrCOMM/IrLPT) through a [`Dissector`]. Cross-frame knowledge
//! (which IAS query a result answers, which application an LSAP selector
//! belongs to) lives in frame-ordered conversation histories, so any frame
//! can be decoded again in isolation with the same result.
//!
//! Invariants:
//! - Decoding a frame never fails; problems become malformed items.
//! - Report outputs are deterministic and stable across runs.
//! - Binding lookups for frame N only see entries positioned before N
//!   (queries) or at/before N (LSAP bindings).
//!
//! Version française (résumé):
//! Cette crate décode la pile IrDA à partir de captures : sources -> en-tête
//! IrDA -> décodeurs par couche -> rapport déterministe. L'état entre trames
//! est conservé dans des historiques ordonnés par numéro de trame, ce qui
//! permet de redécoder une trame isolément.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use irshark_core::analyze_pcap_file;
//!
//! let report = analyze_pcap_file(Path::new("capture.pcapng"))?;
//! println!("report version: {}", report.report_version);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod conversation;
pub mod dissector;
pub mod protocols;
mod source;

pub use analysis::{
    AnalysisError, AnalysisOptions, Capture, CapturedRecord, Direction, RecordKind,
    analyze_pcap_file, analyze_pcap_file_with, analyze_source,
};
pub use conversation::{CircuitId, Conversations, FrameNumber};
pub use dissector::{DecodedFrame, Dissector};
pub use protocols::common::error::DecodeError;
pub use protocols::common::tree::{DetailLevel, Field};
pub use protocols::iap::{AttributeDecoder, AttributeRegistry};
pub use protocols::ircomm::AppProtocol;
pub use source::{PacketEvent, PacketSource, PcapFileSource, SourceError, VecSource};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoded capture with deterministic ordering.
///
/// # Examples
/// ```
/// use irshark_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.report_version, irshark_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input capture metadata.
    pub input: InputInfo,

    /// Optional capture summary (may be empty when unavailable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Decoded IrLAP frames in capture order.
    pub frames: Vec<FrameRecord>,
    /// Frame counts per protocol column, sorted by name.
    pub protocols: Vec<ProtocolCount>,
    /// LSAP bindings discovered through IAS, by discovery frame.
    pub lsap_bindings: Vec<LsapBindingSummary>,
    /// IAS queries seen, by query frame.
    pub iap_queries: Vec<IapQuerySummary>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use irshark_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "irshark".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "irshark");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "irshark").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
///
/// # Examples
/// ```
/// use irshark_core::InputInfo;
///
/// let input = InputInfo {
///     path: "capture.pcapng".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Record counts and time bounds of the capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Every record in the file, IrDA or not.
    pub packets_total: u64,
    pub irda_frames: u64,
    /// Kernel log records embedded in the capture.
    pub log_messages: u64,
    /// Records telling that the capture dropped frames.
    pub missed_records: u64,
    /// Records of other link types or with an unreadable pseudo-header.
    pub skipped: u64,
    pub malformed_frames: u64,
    /// RFC3339 timestamp of the first packet (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the last packet (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// One decoded IrLAP frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    /// 1-based record number in the capture file.
    pub number: FrameNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub direction: Direction,
    /// Highest protocol that claimed the frame.
    pub protocol: String,
    pub info: String,
    pub malformed: bool,
    /// Field tree; omitted for summary-only reports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolCount {
    pub protocol: String,
    pub frames: u64,
}

/// An LSAP selector bound to an application protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsapBindingSummary {
    /// Frame carrying the IAS result that announced the selector.
    pub discovery_frame: FrameNumber,
    /// 7-bit IrLAP connection address.
    pub connection_address: u8,
    pub lsap: u8,
    pub protocol: AppProtocol,
    /// Whether the application runs over Tiny TP.
    pub ttp: bool,
}

/// An IAS GetValueByClass query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IapQuerySummary {
    pub query_frame: FrameNumber,
    /// IrLAP address byte of the querying station (C/R bit included).
    pub address: u8,
    pub class_name: String,
    pub attribute_name: String,
    /// Decoder selected for the answer; absent for unknown attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoder: Option<AttributeDecoder>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use irshark_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.report_version, irshark_core::REPORT_VERSION);
/// assert!(report.frames.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "irshark".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        frames: vec![],
        protocols: vec![],
        lsap_bindings: vec![],
        iap_queries: vec![],
    }
}
