use std::collections::HashMap;

use crate::conversation::Conversations;
use crate::{IapQuerySummary, LsapBindingSummary, ProtocolCount};

pub(crate) fn add_protocol_frame(counts: &mut HashMap<String, u64>, protocol: &str) {
    match counts.get_mut(protocol) {
        Some(count) => *count += 1,
        None => {
            counts.insert(protocol.to_string(), 1);
        }
    }
}

pub(crate) fn build_protocol_counts(counts: HashMap<String, u64>) -> Vec<ProtocolCount> {
    let mut protocols: Vec<ProtocolCount> = counts
        .into_iter()
        .map(|(protocol, frames)| ProtocolCount { protocol, frames })
        .collect();
    protocols.sort_by(|a, b| a.protocol.cmp(&b.protocol));
    protocols
}

pub(crate) fn build_lsap_bindings(conversations: &Conversations) -> Vec<LsapBindingSummary> {
    let mut bindings: Vec<LsapBindingSummary> = conversations
        .lsaps()
        .iter()
        .map(|(connection_address, binding)| LsapBindingSummary {
            discovery_frame: binding.discovery_frame,
            connection_address: *connection_address,
            lsap: binding.lsap,
            protocol: binding.protocol,
            ttp: binding.ttp,
        })
        .collect();
    bindings.sort_by(|a, b| {
        a.discovery_frame
            .cmp(&b.discovery_frame)
            .then_with(|| a.connection_address.cmp(&b.connection_address))
            .then_with(|| a.lsap.cmp(&b.lsap))
            .then_with(|| a.protocol.cmp(&b.protocol))
    });
    bindings
}

pub(crate) fn build_iap_queries(conversations: &Conversations) -> Vec<IapQuerySummary> {
    let mut queries: Vec<IapQuerySummary> = conversations
        .queries()
        .iter()
        .map(|(circuit, query)| IapQuerySummary {
            query_frame: query.query_frame,
            address: circuit.0,
            class_name: query.class_name.clone(),
            attribute_name: query.attribute_name.clone(),
            decoder: query.decoder,
        })
        .collect();
    queries.sort_by(|a, b| {
        a.query_frame
            .cmp(&b.query_frame)
            .then_with(|| a.address.cmp(&b.address))
            .then_with(|| a.class_name.cmp(&b.class_name))
            .then_with(|| a.attribute_name.cmp(&b.attribute_name))
    });
    queries
}
