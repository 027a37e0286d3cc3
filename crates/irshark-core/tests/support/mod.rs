#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const LINKTYPE_IRDA: u16 = 144;
pub const LINKTYPE_ETHERNET: u16 = 1;

pub const INCOMING: u16 = 0x0000;
pub const OUTGOING: u16 = 0x0004;
pub const LOG_MESSAGE: u16 = 0x0100;
pub const MISSED_MESSAGES: u16 = 0x0101;

/// Prefix an IrLAP frame with the 16-byte Linux IrDA pseudo-header.
pub fn irda_record(packet_type: u16, frame: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 16];
    data[0..2].copy_from_slice(&packet_type.to_be_bytes());
    data[14..16].copy_from_slice(&0x0017u16.to_be_bytes());
    data.extend_from_slice(frame);
    data
}

pub fn write_pcapng(path: &Path, linktype: u16, packets: &[(u64, Vec<u8>)]) {
    let mut output = Vec::new();
    output.extend_from_slice(&pcapng_block(0x0A0D0D0A, &section_header_body()));
    output.extend_from_slice(&pcapng_block(1, &interface_desc_body(linktype)));
    for (ts_us, data) in packets {
        output.extend_from_slice(&pcapng_block(6, &enhanced_packet_body(*ts_us, data)));
    }
    fs::write(path, output).unwrap();
}

/// Legacy little-endian pcap with microsecond timestamps.
pub fn write_pcap(path: &Path, linktype: u16, packets: &[(u64, Vec<u8>)]) {
    let mut output = Vec::new();
    output.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
    output.extend_from_slice(&2u16.to_le_bytes());
    output.extend_from_slice(&4u16.to_le_bytes());
    output.extend_from_slice(&0i32.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes());
    output.extend_from_slice(&65535u32.to_le_bytes());
    output.extend_from_slice(&u32::from(linktype).to_le_bytes());
    for (ts_us, data) in packets {
        let secs = (ts_us / 1_000_000) as u32;
        let micros = (ts_us % 1_000_000) as u32;
        output.extend_from_slice(&secs.to_le_bytes());
        output.extend_from_slice(&micros.to_le_bytes());
        output.extend_from_slice(&(data.len() as u32).to_le_bytes());
        output.extend_from_slice(&(data.len() as u32).to_le_bytes());
        output.extend_from_slice(data);
    }
    fs::write(path, output).unwrap();
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn section_header_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    body
}

fn interface_desc_body(linktype: u16) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&linktype.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&65535u32.to_be_bytes());
    body
}

fn enhanced_packet_body(ts_us: u64, data: &[u8]) -> Vec<u8> {
    let ts_high = ((ts_us >> 32) & 0xFFFF_FFFF) as u32;
    let ts_low = (ts_us & 0xFFFF_FFFF) as u32;
    let cap_len = data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&ts_high.to_be_bytes());
    body.extend_from_slice(&ts_low.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(data);
    let pad_len = (4 - (data.len() % 4)) % 4;
    body.extend(std::iter::repeat_n(0u8, pad_len));
    body
}

/// IrLAP I frame on `address` carrying an IrLMP PDU.
pub fn i_frame(address: u8, lmp: &[u8]) -> Vec<u8> {
    let mut bytes = vec![address, 0x10];
    bytes.extend_from_slice(lmp);
    bytes
}

pub fn iap_query(address: u8, class: &str, attribute: &str) -> Vec<u8> {
    let mut lmp = vec![0x00, 0x10, 0x84, class.len() as u8];
    lmp.extend_from_slice(class.as_bytes());
    lmp.push(attribute.len() as u8);
    lmp.extend_from_slice(attribute.as_bytes());
    i_frame(address, &lmp)
}

/// GetValueByClass result with `count` declared entries.
pub fn iap_result(address: u8, count: u16, entries: &[Vec<u8>]) -> Vec<u8> {
    let mut lmp = vec![0x10, 0x00, 0x84, 0x00];
    lmp.extend_from_slice(&count.to_be_bytes());
    for entry in entries {
        lmp.extend_from_slice(entry);
    }
    i_frame(address, &lmp)
}

pub fn integer_entry(object_id: u16, value: u32) -> Vec<u8> {
    let mut entry = object_id.to_be_bytes().to_vec();
    entry.push(0x01);
    entry.extend_from_slice(&value.to_be_bytes());
    entry
}

pub fn string_entry(object_id: u16, text: &str) -> Vec<u8> {
    let mut entry = object_id.to_be_bytes().to_vec();
    entry.extend_from_slice(&[0x03, 0x00, text.len() as u8]);
    entry.extend_from_slice(text.as_bytes());
    entry
}

pub fn xid_command() -> Vec<u8> {
    let mut bytes = vec![0xff, 0x3f, 0x01];
    bytes.extend_from_slice(&0x1234_5678u32.to_le_bytes());
    bytes.extend_from_slice(&0xffff_ffffu32.to_le_bytes());
    bytes.extend_from_slice(&[0x01, 0xff, 0x00]);
    bytes
}

pub fn xid_response(nickname: &str) -> Vec<u8> {
    let mut bytes = vec![0xfe, 0xbf, 0x01];
    bytes.extend_from_slice(&0x8765_4321u32.to_le_bytes());
    bytes.extend_from_slice(&0x1234_5678u32.to_le_bytes());
    bytes.extend_from_slice(&[0x01, 0x00, 0x84, 0x04, 0x00]);
    bytes.extend_from_slice(nickname.as_bytes());
    bytes
}

pub fn snrm() -> Vec<u8> {
    let mut bytes = vec![0xff, 0x93];
    bytes.extend_from_slice(&0x1234_5678u32.to_le_bytes());
    bytes.extend_from_slice(&0x8765_4321u32.to_le_bytes());
    bytes.push(0x02);
    bytes.extend_from_slice(&[0x01, 0x01, 0x04, 0x84, 0x01, 0x01]);
    bytes
}

pub fn ua() -> Vec<u8> {
    let mut bytes = vec![0x02, 0x73];
    bytes.extend_from_slice(&0x8765_4321u32.to_le_bytes());
    bytes.extend_from_slice(&0x1234_5678u32.to_le_bytes());
    bytes.extend_from_slice(&[0x01, 0x01, 0x04]);
    bytes
}

/// Discovery, connection, IAS lookup of IrCOMM, then a cooked IrCOMM
/// session on LSAP 0x05. Timestamps one millisecond apart.
pub fn ircomm_session() -> Vec<(u64, Vec<u8>)> {
    let frames = vec![
        irda_record(OUTGOING, &xid_command()),
        irda_record(INCOMING, &xid_response("Palm")),
        irda_record(OUTGOING, &snrm()),
        irda_record(INCOMING, &ua()),
        irda_record(OUTGOING, &iap_query(0x03, "IrDA:IrCOMM", "IrDA:TinyTP:LsapSel")),
        irda_record(INCOMING, &iap_result(0x02, 1, &[integer_entry(0x0001, 5)])),
        irda_record(OUTGOING, &i_frame(0x03, &[0x85, 0x12, 0x01, 0x00, 0x0a])),
        irda_record(
            OUTGOING,
            &i_frame(0x03, &[0x05, 0x12, 0x01, 0x03, 0x00, 0x01, 0x04, b'h', b'i']),
        ),
        irda_record(INCOMING, &i_frame(0x02, &[0x12, 0x05, 0x02, 0x00, b'o', b'k'])),
    ];
    frames
        .into_iter()
        .enumerate()
        .map(|(idx, data)| (1_000_000 + idx as u64 * 1_000, data))
        .collect()
}
