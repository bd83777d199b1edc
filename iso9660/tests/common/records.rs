//! Encoders for System Use records

/// Rock Ridge ER identifier written by mkisofs
pub const RRIP_ID: &[u8] = b"RRIP_1991A";

/// Both-endian 32-bit field
pub fn both(value: u32) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[..4].copy_from_slice(&value.to_le_bytes());
    out[4..].copy_from_slice(&value.to_be_bytes());
    out
}

/// Generic record: signature, length, version 1, payload
pub fn record(signature: &[u8; 2], payload: &[u8]) -> Vec<u8> {
    let mut out = vec![signature[0], signature[1], (4 + payload.len()) as u8, 1];
    out.extend_from_slice(payload);
    out
}

pub fn sp(skip: u8) -> Vec<u8> {
    record(b"SP", &[0xBE, 0xEF, skip])
}

pub fn st() -> Vec<u8> {
    record(b"ST", &[])
}

pub fn er(identifier: &[u8], descriptor: &[u8], source: &[u8]) -> Vec<u8> {
    let mut payload = vec![
        identifier.len() as u8,
        descriptor.len() as u8,
        source.len() as u8,
        1,
    ];
    payload.extend_from_slice(identifier);
    payload.extend_from_slice(descriptor);
    payload.extend_from_slice(source);
    record(b"ER", &payload)
}

pub fn er_rrip() -> Vec<u8> {
    er(RRIP_ID, b"ROCK RIDGE", b"TEST")
}

pub fn px(mode: u32, links: u32, uid: u32, gid: u32) -> Vec<u8> {
    let mut payload = Vec::new();
    for value in [mode, links, uid, gid] {
        payload.extend_from_slice(&both(value));
    }
    record(b"PX", &payload)
}

pub fn px_with_inode(mode: u32, links: u32, uid: u32, gid: u32, inode: u32) -> Vec<u8> {
    let mut out = px(mode, links, uid, gid);
    out.extend_from_slice(&both(inode));
    out[2] = out.len() as u8;
    out
}

pub fn nm(flags: u8, name: &[u8]) -> Vec<u8> {
    let mut payload = vec![flags];
    payload.extend_from_slice(name);
    record(b"NM", &payload)
}

pub fn ce(block: u32, offset: u32, length: u32) -> Vec<u8> {
    let mut payload = Vec::new();
    for value in [block, offset, length] {
        payload.extend_from_slice(&both(value));
    }
    record(b"CE", &payload)
}

/// SL with the given `(flags, content)` components
pub fn sl(components: &[(u8, &[u8])]) -> Vec<u8> {
    let mut payload = vec![0u8];
    for (flags, content) in components {
        payload.push(*flags);
        payload.push(content.len() as u8);
        payload.extend_from_slice(content);
    }
    record(b"SL", &payload)
}

/// TF with short-form stamps, in flag bit order
pub fn tf(flags: u8, stamps: &[[u8; 7]]) -> Vec<u8> {
    let mut payload = vec![flags];
    for stamp in stamps {
        payload.extend_from_slice(stamp);
    }
    record(b"TF", &payload)
}

pub fn cl(lba: u32) -> Vec<u8> {
    record(b"CL", &both(lba))
}

pub fn pl(lba: u32) -> Vec<u8> {
    record(b"PL", &both(lba))
}

pub fn re() -> Vec<u8> {
    record(b"RE", &[])
}

/// Concatenate encoded records into one System Use area
pub fn area(records: &[Vec<u8>]) -> Vec<u8> {
    records.concat()
}
