use pcap_parser::Linktype;

/// Section header block type, also the first four bytes of every PCAPNG file.
pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

/// Legacy PCAP magic numbers: microsecond and nanosecond resolution, in
/// both byte orders.
pub const LEGACY_MAGICS: [[u8; 4]; 4] = [
    [0xd4, 0xc3, 0xb2, 0xa1],
    [0xa1, 0xb2, 0xc3, 0xd4],
    [0x4d, 0x3c, 0xb2, 0xa1],
    [0xa1, 0xb2, 0x3c, 0x4d],
];

pub const PCAP_READER_BUFFER_SIZE: usize = 65536;

/// Linux IrDA captures (`LINKTYPE_LINUX_IRDA`).
pub const LINKTYPE_IRDA: Linktype = Linktype(144);

/// Link type assumed when a packet references an unknown interface.
pub const FALLBACK_LINKTYPE: Linktype = Linktype::ETHERNET;
