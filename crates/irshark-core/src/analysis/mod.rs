//! Analysis driver: capture records in, report out.
//!
//! The driver strips the IrDA pseudo-header from each packet, hands IrLAP
//! frames to the [`Dissector`](crate::Dissector) through a [`Capture`], and
//! aggregates per-frame results into a deterministic [`Report`].
//!
//! Version française (résumé):
//! Le pilote retire l'en-tête IrDA de chaque paquet, décode les trames IrLAP
//! via `Capture` puis agrège les résultats dans un rapport déterministe.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::conversation::FrameNumber;
use crate::protocols::common::tree::DetailLevel;
use crate::source::{PacketSource, SourceError};
use crate::{InputInfo, Report};

mod capture;
pub(crate) mod irda_header;
mod summaries;

pub use capture::{Capture, CapturedRecord, RecordKind};
pub use irda_header::Direction;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// What the report should contain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Field trees for listed frames at `Full`, none at `SummaryOnly`.
    pub detail: DetailLevel,
    /// Frame numbers to list; every IrLAP frame when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<FrameNumber>>,
}

impl AnalysisOptions {
    pub fn includes(&self, number: FrameNumber) -> bool {
        self.frames
            .as_ref()
            .is_none_or(|frames| frames.contains(&number))
    }
}

pub fn analyze_pcap_file(path: &Path) -> Result<Report, AnalysisError> {
    analyze_pcap_file_with(path, &AnalysisOptions::default())
}

pub fn analyze_pcap_file_with(
    path: &Path,
    options: &AnalysisOptions,
) -> Result<Report, AnalysisError> {
    let mut capture = Capture::load(path)?;
    Ok(capture.report(options))
}

pub fn analyze_source<S: PacketSource>(
    input: InputInfo,
    source: S,
    options: &AnalysisOptions,
) -> Result<Report, AnalysisError> {
    let mut capture = Capture::read(input, source)?;
    Ok(capture.report(options))
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let ts = match ts {
        Some(ts) => ts,
        None => return,
    };
    match first {
        None => *first = Some(ts),
        Some(existing) => {
            if ts < *existing {
                *first = Some(ts);
            }
        }
    }
    match last {
        None => *last = Some(ts),
        Some(existing) => {
            if ts > *existing {
                *last = Some(ts);
            }
        }
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use super::{AnalysisOptions, ts_to_rfc3339, update_ts_bounds};

    #[test]
    fn ts_bounds_ignore_missing_and_track_extremes() {
        let mut first = None;
        let mut last = None;
        for ts in [Some(5.0), None, Some(2.5), Some(9.0)] {
            update_ts_bounds(&mut first, &mut last, ts);
        }
        assert_eq!(first, Some(2.5));
        assert_eq!(last, Some(9.0));
    }

    #[test]
    fn rfc3339_rendering() {
        assert_eq!(ts_to_rfc3339(Some(0.0)).as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(ts_to_rfc3339(Some(60.0)).as_deref(), Some("1970-01-01T00:01:00Z"));
        assert_eq!(ts_to_rfc3339(None), None);
    }

    #[test]
    fn default_options_list_everything() {
        let options = AnalysisOptions::default();
        assert!(options.includes(1));
        let options = AnalysisOptions {
            frames: Some(vec![4, 7]),
            ..AnalysisOptions::default()
        };
        assert!(options.includes(7));
        assert!(!options.includes(5));
    }
}
