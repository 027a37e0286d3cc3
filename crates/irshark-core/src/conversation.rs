//! Cross-frame state: query/result and LSAP bindings.
//!
//! Every table here is an append-only history ordered by frame number.
//! Lookups are answered from the frame-number axis only, so a frame decoded
//! again in isolation (or out of order) sees exactly the entries a strict
//! first pass would have seen. Re-decoding a frame that already appended an
//! entry does not append a duplicate.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::protocols::iap::AttributeDecoder;
use crate::protocols::ircomm::AppProtocol;
use crate::protocols::irlap::layout::CR_BIT;

/// Frame sequence number (1-based, capture order).
pub type FrameNumber = u32;

/// Raw IrLAP address byte: connection address plus the C/R bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CircuitId(pub u8);

impl CircuitId {
    pub fn is_command(self) -> bool {
        self.0 & CR_BIT != 0
    }

    /// 7-bit connection address.
    pub fn connection_address(self) -> u8 {
        self.0 >> 1
    }

    /// The same circuit seen from the other station.
    pub fn peer(self) -> CircuitId {
        CircuitId(self.0 ^ CR_BIT)
    }
}

/// An entry that is positioned on the frame-number axis.
pub trait Binding {
    fn frame(&self) -> FrameNumber;
}

/// Per-key, frame-ordered, append-only series of bindings.
#[derive(Debug, Clone)]
pub struct History<K, T> {
    series: HashMap<K, Vec<T>>,
}

impl<K, T> Default for History<K, T> {
    fn default() -> Self {
        Self {
            series: HashMap::new(),
        }
    }
}

impl<K, T> History<K, T>
where
    K: Eq + Hash,
    T: Binding + PartialEq,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry` at its frame position. Returns `false` when an identical
    /// entry for the same frame is already present.
    pub fn append(&mut self, key: K, entry: T) -> bool {
        let series = self.series.entry(key).or_default();
        let frame = entry.frame();
        let start = series.partition_point(|existing| existing.frame() < frame);
        let end = series.partition_point(|existing| existing.frame() <= frame);
        if series[start..end].iter().any(|existing| *existing == entry) {
            return false;
        }
        series.insert(end, entry);
        true
    }

    /// Latest entry whose frame is strictly before `frame`.
    pub fn latest_before(&self, key: &K, frame: FrameNumber) -> Option<&T> {
        let series = self.series.get(key)?;
        let idx = series.partition_point(|entry| entry.frame() < frame);
        idx.checked_sub(1).map(|idx| &series[idx])
    }

    /// Latest entry at or before `frame` that satisfies `accept`.
    pub fn latest_at_or_before(
        &self,
        key: &K,
        frame: FrameNumber,
        accept: impl Fn(&T) -> bool,
    ) -> Option<&T> {
        let series = self.series.get(key)?;
        let idx = series.partition_point(|entry| entry.frame() <= frame);
        series[..idx].iter().rev().find(|entry| accept(entry))
    }

    pub fn series(&self, key: &K) -> &[T] {
        self.series.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &T)> {
        self.series
            .iter()
            .flat_map(|(key, entries)| entries.iter().map(move |entry| (key, entry)))
    }

    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self) {
        self.series.clear();
    }
}

/// Which attribute decoder an IAP query selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBinding {
    pub query_frame: FrameNumber,
    pub class_name: String,
    pub attribute_name: String,
    pub decoder: Option<AttributeDecoder>,
}

impl Binding for QueryBinding {
    fn frame(&self) -> FrameNumber {
        self.query_frame
    }
}

/// Which application protocol an LSAP selector denotes on a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LmpBinding {
    pub discovery_frame: FrameNumber,
    pub lsap: u8,
    pub ttp: bool,
    pub protocol: AppProtocol,
}

impl Binding for LmpBinding {
    fn frame(&self) -> FrameNumber {
        self.discovery_frame
    }
}

/// The two cross-frame histories shared by every layer.
#[derive(Debug, Clone, Default)]
pub struct Conversations {
    queries: History<CircuitId, QueryBinding>,
    lsaps: History<u8, LmpBinding>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a query sent on `circuit` (the querying station's address byte).
    pub fn record_query(&mut self, circuit: CircuitId, binding: QueryBinding) -> bool {
        let frame = binding.query_frame;
        let appended = self.queries.append(circuit, binding);
        if appended {
            debug!(frame, circuit = circuit.0, "recorded IAP query binding");
        }
        appended
    }

    /// Query that a result received on `result_circuit` at `frame` answers.
    pub fn query_for_result(
        &self,
        result_circuit: CircuitId,
        frame: FrameNumber,
    ) -> Option<&QueryBinding> {
        self.queries.latest_before(&result_circuit.peer(), frame)
    }

    pub fn record_lsap(&mut self, circuit: CircuitId, binding: LmpBinding) -> bool {
        let appended = self.lsaps.append(circuit.connection_address(), binding);
        if appended {
            debug!(
                frame = binding.discovery_frame,
                connection = circuit.connection_address(),
                lsap = binding.lsap,
                protocol = binding.protocol.name(),
                "recorded LSAP binding"
            );
        }
        appended
    }

    /// Binding for a data or control frame exchanged between `dlsap` and
    /// `slsap` on `circuit`.
    pub fn lsap_binding(
        &self,
        circuit: CircuitId,
        frame: FrameNumber,
        dlsap: u8,
        slsap: u8,
    ) -> Option<&LmpBinding> {
        self.lsaps
            .latest_at_or_before(&circuit.connection_address(), frame, |binding| {
                binding.lsap == dlsap || binding.lsap == slsap
            })
    }

    pub fn queries(&self) -> &History<CircuitId, QueryBinding> {
        &self.queries
    }

    /// LSAP bindings keyed by 7-bit connection address.
    pub fn lsaps(&self) -> &History<u8, LmpBinding> {
        &self.lsaps
    }

    /// Discard everything. Only a full capture reload calls this.
    pub fn reset(&mut self) {
        debug!(
            queries = self.queries.len(),
            lsaps = self.lsaps.len(),
            "discarding conversation histories"
        );
        self.queries.clear();
        self.lsaps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{Binding, CircuitId, Conversations, FrameNumber, History, LmpBinding};
    use crate::protocols::ircomm::AppProtocol;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Mark(FrameNumber, u8);

    impl Binding for Mark {
        fn frame(&self) -> FrameNumber {
            self.0
        }
    }

    fn history(frames: &[FrameNumber]) -> History<u8, Mark> {
        let mut history = History::new();
        for (idx, frame) in frames.iter().enumerate() {
            history.append(0, Mark(*frame, idx as u8));
        }
        history
    }

    #[test]
    fn strict_lookup_ignores_entries_at_or_after_frame() {
        let history = history(&[3, 7, 12]);
        assert_eq!(history.latest_before(&0, 3), None);
        assert_eq!(history.latest_before(&0, 4), Some(&Mark(3, 0)));
        assert_eq!(history.latest_before(&0, 7), Some(&Mark(3, 0)));
        assert_eq!(history.latest_before(&0, 8), Some(&Mark(7, 1)));
        assert_eq!(history.latest_before(&0, 100), Some(&Mark(12, 2)));
        assert_eq!(history.latest_before(&1, 100), None);
    }

    #[test]
    fn inclusive_lookup_includes_same_frame() {
        let history = history(&[3, 7]);
        assert_eq!(history.latest_at_or_before(&0, 7, |_| true), Some(&Mark(7, 1)));
        assert_eq!(history.latest_at_or_before(&0, 6, |_| true), Some(&Mark(3, 0)));
        assert_eq!(history.latest_at_or_before(&0, 2, |_| true), None);
    }

    #[test]
    fn later_entries_never_change_earlier_answers() {
        let frames: Vec<FrameNumber> = vec![2, 5, 9, 14];
        for cut in 0..frames.len() {
            let prefix = history(&frames[..cut]);
            let full = history(&frames);
            let bound = frames.get(cut).copied().unwrap_or(20);
            for n in 0..=bound {
                assert_eq!(
                    prefix.latest_before(&0, n).map(|m| m.0),
                    full.latest_before(&0, n).map(|m| m.0),
                    "frame {n} with {cut} entries"
                );
            }
        }
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let mut forward = History::new();
        let mut backward = History::new();
        for frame in [4u32, 10, 20] {
            forward.append(0u8, Mark(frame, 0));
        }
        for frame in [20u32, 4, 10] {
            backward.append(0u8, Mark(frame, 0));
        }
        assert_eq!(forward.series(&0), backward.series(&0));
        assert_eq!(backward.latest_before(&0, 11), Some(&Mark(10, 0)));
    }

    #[test]
    fn duplicate_append_is_ignored() {
        let mut history = History::new();
        assert!(history.append(0u8, Mark(5, 1)));
        assert!(!history.append(0u8, Mark(5, 1)));
        assert!(history.append(0u8, Mark(5, 2)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn lsap_binding_matches_either_selector_and_ignores_cr_bit() {
        let mut conversations = Conversations::new();
        conversations.record_lsap(
            CircuitId(0x03),
            LmpBinding {
                discovery_frame: 10,
                lsap: 0x05,
                ttp: true,
                protocol: AppProtocol::IrcommCooked,
            },
        );
        let found = conversations.lsap_binding(CircuitId(0x02), 11, 0x12, 0x05);
        assert_eq!(found.map(|b| b.lsap), Some(0x05));
        assert!(conversations.lsap_binding(CircuitId(0x03), 11, 0x05, 0x12).is_some());
        assert!(conversations.lsap_binding(CircuitId(0x03), 9, 0x05, 0x12).is_none());
        assert!(conversations.lsap_binding(CircuitId(0x05), 11, 0x05, 0x12).is_none());
    }

    #[test]
    fn reset_discards_everything() {
        let mut conversations = Conversations::new();
        conversations.record_lsap(
            CircuitId(0x01),
            LmpBinding {
                discovery_frame: 1,
                lsap: 0x10,
                ttp: false,
                protocol: AppProtocol::Irlpt,
            },
        );
        conversations.reset();
        assert!(conversations.lsaps().is_empty());
    }
}
