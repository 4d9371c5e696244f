//! Shared test helpers for geoip module tests.
//!
//! Writes tiny MaxMind DB files: an IPv4 search tree of a single node whose
//! left branch (0.0.0.0/1) points at one data record and whose right branch
//! (128.0.0.0/1) is empty.

use std::io::Write;

use tempfile::NamedTempFile;

/// Build time written into fixture metadata (2023-11-14).
pub const FIXTURE_BUILD_EPOCH: u64 = 1_700_000_000;

/// Encoder for the MaxMind DB data section format.
#[derive(Default)]
pub struct MmdbEncoder {
    bytes: Vec<u8>,
}

impl MmdbEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn string(&mut self, value: &str) -> &mut Self {
        let len = value.len();
        assert!(len < 29 + 256, "fixture strings are short");
        if len < 29 {
            self.bytes.push(0x40 | len as u8);
        } else {
            self.bytes.push(0x40 | 29);
            self.bytes.push((len - 29) as u8);
        }
        self.bytes.extend_from_slice(value.as_bytes());
        self
    }

    pub fn uint16(&mut self, value: u16) -> &mut Self {
        self.uint(5, &value.to_be_bytes())
    }

    pub fn uint32(&mut self, value: u32) -> &mut Self {
        self.uint(6, &value.to_be_bytes())
    }

    pub fn uint64(&mut self, value: u64) -> &mut Self {
        let payload = trim_leading_zeros(&value.to_be_bytes());
        // Extended type: size in the control byte, then type - 7
        self.bytes.push(payload.len() as u8);
        self.bytes.push(9 - 7);
        self.bytes.extend_from_slice(&payload);
        self
    }

    pub fn map(&mut self, entries: u8) -> &mut Self {
        self.bytes.push(0xE0 | entries);
        self
    }

    pub fn array(&mut self, items: u8) -> &mut Self {
        self.bytes.push(items);
        self.bytes.push(11 - 7);
        self
    }

    fn uint(&mut self, type_num: u8, be_bytes: &[u8]) -> &mut Self {
        let payload = trim_leading_zeros(be_bytes);
        self.bytes.push((type_num << 5) | payload.len() as u8);
        self.bytes.extend_from_slice(&payload);
        self
    }
}

fn trim_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().copied().skip_while(|b| *b == 0).collect()
}

/// Assembles a complete IPv4 database whose only record is `record`.
pub fn mmdb_bytes(database_type: &str, record: MmdbEncoder) -> Vec<u8> {
    const NODE_COUNT: u32 = 1;
    // Record values past node_count + 16 address the data section
    let data_pointer = NODE_COUNT + 16;

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&data_pointer.to_be_bytes()[1..]);
    bytes.extend_from_slice(&NODE_COUNT.to_be_bytes()[1..]);
    bytes.extend_from_slice(&[0u8; 16]);
    bytes.extend_from_slice(&record.into_bytes());

    bytes.extend_from_slice(b"\xab\xcd\xefMaxMind.com");
    let mut metadata = MmdbEncoder::new();
    metadata.map(9);
    metadata.string("binary_format_major_version").uint16(2);
    metadata.string("binary_format_minor_version").uint16(0);
    metadata.string("build_epoch").uint64(FIXTURE_BUILD_EPOCH);
    metadata.string("database_type").string(database_type);
    metadata.string("description").map(1).string("en").string("Test");
    metadata.string("ip_version").uint16(4);
    metadata.string("languages").array(1).string("en");
    metadata.string("node_count").uint32(NODE_COUNT);
    metadata.string("record_size").uint16(24);
    bytes.extend_from_slice(&metadata.into_bytes());
    bytes
}

/// ASN record for 0.0.0.0/1: AS15169, Google LLC.
pub fn asn_record() -> MmdbEncoder {
    let mut record = MmdbEncoder::new();
    record.map(2);
    record.string("autonomous_system_number").uint32(15169);
    record.string("autonomous_system_organization").string("Google LLC");
    record
}

/// Country record for 0.0.0.0/1: registered in the US.
pub fn country_record() -> MmdbEncoder {
    let mut record = MmdbEncoder::new();
    record.map(1);
    record
        .string("registered_country")
        .map(2)
        .string("geoname_id")
        .uint32(6252001)
        .string("iso_code")
        .string("US");
    record
}

/// Writes a database file and keeps it alive for the returned handle.
pub fn write_mmdb(database_type: &str, record: MmdbEncoder) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(&mmdb_bytes(database_type, record))
        .expect("Failed to write temp database");
    file
}
