// Minimal BER (definite-length) encoding and decoding for SNMP

use bytes::{BufMut, BytesMut};

use super::{Oid, TransportError};

pub mod tag {
    pub const INTEGER: u8 = 0x02;
    pub const OCTET_STRING: u8 = 0x04;
    pub const NULL: u8 = 0x05;
    pub const OBJECT_ID: u8 = 0x06;
    pub const SEQUENCE: u8 = 0x30;

    pub const IP_ADDRESS: u8 = 0x40;
    pub const COUNTER32: u8 = 0x41;
    pub const GAUGE32: u8 = 0x42;
    pub const TIME_TICKS: u8 = 0x43;
    pub const OPAQUE: u8 = 0x44;
    pub const COUNTER64: u8 = 0x46;

    pub const NO_SUCH_OBJECT: u8 = 0x80;
    pub const NO_SUCH_INSTANCE: u8 = 0x81;
    pub const END_OF_MIB_VIEW: u8 = 0x82;

    pub const GET_REQUEST: u8 = 0xA0;
    pub const GET_RESPONSE: u8 = 0xA2;
}

/// Longest length field we accept (4 length octets).
const MAX_LENGTH_OCTETS: usize = 4;

pub fn write_length(buf: &mut BytesMut, len: usize) {
    if len < 0x80 {
        buf.put_u8(len as u8);
        return;
    }
    let bytes = (len as u64).to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    let significant = &bytes[skip..];
    buf.put_u8(0x80 | significant.len() as u8);
    buf.put_slice(significant);
}

pub fn write_tlv(buf: &mut BytesMut, tag: u8, content: &[u8]) {
    buf.put_u8(tag);
    write_length(buf, content.len());
    buf.put_slice(content);
}

/// Minimal two's-complement content octets of a signed integer.
pub fn encode_integer(v: i64) -> Vec<u8> {
    let bytes = v.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

/// Content octets of an unsigned application integer (Counter32/64, Gauge, TimeTicks).
pub fn encode_unsigned(v: u64) -> Vec<u8> {
    let bytes = v.to_be_bytes();
    let skip = bytes
        .iter()
        .take_while(|b| **b == 0)
        .count()
        .min(bytes.len() - 1);
    let mut out = Vec::with_capacity(9);
    if bytes[skip] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(&bytes[skip..]);
    out
}

pub fn encode_oid(oid: &Oid) -> Vec<u8> {
    let arcs = oid.arcs();
    let mut out = Vec::with_capacity(arcs.len() + 4);
    push_base128(&mut out, arcs[0] * 40 + arcs[1]);
    for arc in &arcs[2..] {
        push_base128(&mut out, *arc);
    }
    out
}

fn push_base128(out: &mut Vec<u8>, mut v: u32) {
    let mut groups = [0u8; 5];
    let mut n = 0;
    loop {
        groups[n] = (v & 0x7F) as u8;
        n += 1;
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    for i in (0..n).rev() {
        let cont = if i > 0 { 0x80 } else { 0x00 };
        out.push(groups[i] | cont);
    }
}

pub fn decode_integer(content: &[u8]) -> Result<i64, TransportError> {
    if content.is_empty() || content.len() > 8 {
        return Err(TransportError::malformed(format!(
            "INTEGER of {} octets",
            content.len()
        )));
    }
    let fill = if content[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut bytes = [fill; 8];
    bytes[8 - content.len()..].copy_from_slice(content);
    Ok(i64::from_be_bytes(bytes))
}

pub fn decode_unsigned(content: &[u8]) -> Result<u64, TransportError> {
    let digits = match content {
        [] => return Err(TransportError::malformed("empty unsigned integer")),
        [0x00, rest @ ..] if content.len() == 9 => rest,
        _ if content.len() > 8 => {
            return Err(TransportError::malformed(format!(
                "unsigned integer of {} octets",
                content.len()
            )));
        }
        _ => content,
    };
    Ok(digits.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

pub fn decode_oid(content: &[u8]) -> Result<Oid, TransportError> {
    if content.is_empty() {
        return Err(TransportError::malformed("empty OBJECT IDENTIFIER"));
    }
    let mut subids = Vec::with_capacity(content.len() + 1);
    let mut acc: u64 = 0;
    let mut pending = false;
    for b in content {
        acc = (acc << 7) | u64::from(b & 0x7F);
        if acc > u64::from(u32::MAX) {
            return Err(TransportError::malformed("OID arc exceeds 32 bits"));
        }
        pending = b & 0x80 != 0;
        if !pending {
            subids.push(acc as u32);
            acc = 0;
        }
    }
    if pending {
        return Err(TransportError::malformed("truncated OID arc"));
    }

    let first = subids[0];
    let (a, b) = match first {
        0..=39 => (0, first),
        40..=79 => (1, first - 40),
        _ => (2, first - 80),
    };
    let mut arcs = Vec::with_capacity(subids.len() + 1);
    arcs.push(a);
    arcs.push(b);
    arcs.extend_from_slice(&subids[1..]);
    Oid::from_arcs(&arcs)
}

/// Cursor over a sequence of TLVs.
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Reads the next TLV, returning its tag and content octets.
    pub fn read_tlv(&mut self) -> Result<(u8, &'a [u8]), TransportError> {
        let (&tag, rest) = self
            .buf
            .split_first()
            .ok_or_else(|| TransportError::malformed("unexpected end of data"))?;
        let (&first, mut rest) = rest
            .split_first()
            .ok_or_else(|| TransportError::malformed("missing length"))?;

        let len = if first < 0x80 {
            usize::from(first)
        } else {
            let n = usize::from(first & 0x7F);
            if n == 0 {
                return Err(TransportError::malformed("indefinite length not supported"));
            }
            if n > MAX_LENGTH_OCTETS || rest.len() < n {
                return Err(TransportError::malformed(format!(
                    "bad long-form length ({n} octets)"
                )));
            }
            let (len_bytes, tail) = rest.split_at(n);
            rest = tail;
            len_bytes
                .iter()
                .fold(0usize, |acc, b| (acc << 8) | usize::from(*b))
        };

        if rest.len() < len {
            return Err(TransportError::malformed(format!(
                "tag 0x{tag:02x} claims {len} octets, {} available",
                rest.len()
            )));
        }
        let (content, tail) = rest.split_at(len);
        self.buf = tail;
        Ok((tag, content))
    }

    /// Reads the next TLV and checks its tag.
    pub fn expect(&mut self, expected: u8) -> Result<&'a [u8], TransportError> {
        let (tag, content) = self.read_tlv()?;
        if tag != expected {
            return Err(TransportError::malformed(format!(
                "expected tag 0x{expected:02x}, found 0x{tag:02x}"
            )));
        }
        Ok(content)
    }
}
