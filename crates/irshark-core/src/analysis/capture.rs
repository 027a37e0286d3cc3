//! A loaded capture: every record in file order plus the engine that
//! decodes them.
//!
//! Loading runs one strict first pass over all frames so the conversation
//! histories are complete. After that any frame can be decoded again on its
//! own, in any order, with any detail level.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::conversation::{Conversations, FrameNumber};
use crate::dissector::{DecodedFrame, Dissector};
use crate::protocols::common::tree::DetailLevel;
use crate::source::{PacketEvent, PacketSource, PcapFileSource};
use crate::{CaptureSummary, DEFAULT_GENERATED_AT, FrameRecord, InputInfo, Report, make_stub_report};

use super::irda_header::{Direction, IrdaRecord, parse_irda_packet};
use super::summaries::{
    add_protocol_frame, build_iap_queries, build_lsap_bindings, build_protocol_counts,
};
use super::{AnalysisError, AnalysisOptions, ts_to_rfc3339, update_ts_bounds};

/// What one capture record turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    Frame { direction: Direction, bytes: Vec<u8> },
    LogMessage(String),
    MissedMessages,
    /// Not an IrDA record, or an unreadable pseudo-header.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct CapturedRecord {
    /// 1-based position in the capture file.
    pub number: FrameNumber,
    pub ts: Option<f64>,
    pub kind: RecordKind,
}

#[derive(Debug)]
pub struct Capture {
    input: InputInfo,
    records: Vec<CapturedRecord>,
    dissector: Dissector,
}

impl Capture {
    /// Read a PCAP or PCAPNG file and run the first pass.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let source = PcapFileSource::open(path)?;
        let input = InputInfo {
            path: path.display().to_string(),
            bytes: path.metadata()?.len(),
        };
        Self::read(input, source)
    }

    /// Drain `source` and run the first pass.
    pub fn read<S: PacketSource>(input: InputInfo, mut source: S) -> Result<Self, AnalysisError> {
        let mut records = Vec::new();
        let mut number: FrameNumber = 0;
        while let Some(event) = source.next_packet()? {
            number += 1;
            records.push(classify(number, event));
        }
        let mut capture = Self {
            input,
            records,
            dissector: Dissector::new(),
        };
        capture.first_pass();
        info!(
            path = %capture.input.path,
            records = capture.records.len(),
            queries = capture.conversations().queries().len(),
            bindings = capture.conversations().lsaps().len(),
            "capture loaded"
        );
        Ok(capture)
    }

    fn first_pass(&mut self) {
        for record in &self.records {
            if let RecordKind::Frame { bytes, .. } = &record.kind {
                self.dissector
                    .decode(record.number, bytes, DetailLevel::SummaryOnly);
            }
        }
    }

    /// Discard the histories and rebuild them from scratch.
    pub fn reload(&mut self) {
        debug!(records = self.records.len(), "reloading capture");
        self.dissector.reset();
        self.first_pass();
    }

    pub fn input(&self) -> &InputInfo {
        &self.input
    }

    pub fn records(&self) -> &[CapturedRecord] {
        &self.records
    }

    pub fn record(&self, number: FrameNumber) -> Option<&CapturedRecord> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.records.get(index)
    }

    pub fn conversations(&self) -> &Conversations {
        self.dissector.conversations()
    }

    /// Decode record `number` alone. `None` when it is not an IrLAP frame.
    pub fn decode(&mut self, number: FrameNumber, detail: DetailLevel) -> Option<DecodedFrame> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        match &self.records.get(index)?.kind {
            RecordKind::Frame { bytes, .. } => Some(self.dissector.decode(number, bytes, detail)),
            _ => None,
        }
    }

    /// Build the JSON report.
    pub fn report(&mut self, options: &AnalysisOptions) -> Report {
        let mut summary = CaptureSummary {
            packets_total: self.records.len() as u64,
            irda_frames: 0,
            log_messages: 0,
            missed_records: 0,
            skipped: 0,
            malformed_frames: 0,
            time_start: None,
            time_end: None,
        };
        let mut first_ts = None;
        let mut last_ts = None;
        let mut protocol_counts = HashMap::new();
        let mut frames = Vec::new();

        for record in &self.records {
            update_ts_bounds(&mut first_ts, &mut last_ts, record.ts);
            let (direction, bytes) = match &record.kind {
                RecordKind::Frame { direction, bytes } => (*direction, bytes),
                RecordKind::LogMessage(_) => {
                    summary.log_messages += 1;
                    continue;
                }
                RecordKind::MissedMessages => {
                    summary.missed_records += 1;
                    continue;
                }
                RecordKind::Skipped => {
                    summary.skipped += 1;
                    continue;
                }
            };
            summary.irda_frames += 1;

            let listed = options.includes(record.number);
            let detail = if listed {
                options.detail
            } else {
                DetailLevel::SummaryOnly
            };
            let decoded = self.dissector.decode(record.number, bytes, detail);
            add_protocol_frame(&mut protocol_counts, &decoded.protocol);
            if decoded.malformed {
                summary.malformed_frames += 1;
            }
            if listed {
                frames.push(FrameRecord {
                    number: record.number,
                    timestamp: ts_to_rfc3339(record.ts),
                    direction,
                    protocol: decoded.protocol,
                    info: decoded.info,
                    malformed: decoded.malformed,
                    fields: decoded.fields,
                });
            }
        }
        summary.time_start = ts_to_rfc3339(first_ts);
        summary.time_end = ts_to_rfc3339(last_ts);

        let mut report = make_stub_report(&self.input.path, self.input.bytes);
        report.generated_at = summary
            .time_end
            .clone()
            .or(summary.time_start.clone())
            .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
        report.capture_summary = Some(summary);
        report.frames = frames;
        report.protocols = build_protocol_counts(protocol_counts);
        report.lsap_bindings = build_lsap_bindings(self.conversations());
        report.iap_queries = build_iap_queries(self.conversations());
        report
    }
}

fn classify(number: FrameNumber, event: PacketEvent) -> CapturedRecord {
    let kind = match parse_irda_packet(event.linktype, &event.data) {
        Ok(Some(IrdaRecord::Frame { direction, frame })) => {
            if event.orig_len as usize > event.data.len() {
                debug!(
                    frame = number,
                    captured = event.data.len(),
                    original = event.orig_len,
                    "record was sliced by the capture"
                );
            }
            RecordKind::Frame {
                direction,
                bytes: frame.to_vec(),
            }
        }
        Ok(Some(IrdaRecord::LogMessage(text))) => RecordKind::LogMessage(text),
        Ok(Some(IrdaRecord::MissedMessages)) => {
            warn!(frame = number, "capture reports missed records");
            RecordKind::MissedMessages
        }
        Ok(None) => RecordKind::Skipped,
        Err(err) => {
            warn!(frame = number, %err, "skipping unreadable IrDA record");
            RecordKind::Skipped
        }
    };
    CapturedRecord {
        number,
        ts: event.ts,
        kind,
    }
}
