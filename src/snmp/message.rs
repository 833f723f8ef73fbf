// SNMPv2c messages: GetRequest encoding and GetResponse decoding

use bytes::{Bytes, BytesMut};

use super::ber::{self, Reader, tag};
use super::{Oid, TransportError};

/// `version` field value for SNMPv2c.
pub const VERSION_2C: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    OctetString(Bytes),
    Null,
    ObjectId(Oid),
    IpAddress([u8; 4]),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Opaque(Bytes),
    Counter64(u64),
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::OctetString(_) => "OCTET STRING",
            Value::Null => "NULL",
            Value::ObjectId(_) => "OBJECT IDENTIFIER",
            Value::IpAddress(_) => "IpAddress",
            Value::Counter32(_) => "Counter32",
            Value::Gauge32(_) => "Gauge32",
            Value::TimeTicks(_) => "TimeTicks",
            Value::Opaque(_) => "Opaque",
            Value::Counter64(_) => "Counter64",
            Value::NoSuchObject => "noSuchObject",
            Value::NoSuchInstance => "noSuchInstance",
            Value::EndOfMibView => "endOfMibView",
        }
    }

    /// Counter reading widened to 64 bits.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            Value::Counter64(v) => Some(*v),
            Value::Counter32(v) | Value::Gauge32(v) => Some(u64::from(*v)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::OctetString(b) => Some(String::from_utf8_lossy(b).into_owned()),
            _ => None,
        }
    }

    fn encode(&self, buf: &mut BytesMut) {
        match self {
            Value::Integer(v) => ber::write_tlv(buf, tag::INTEGER, &ber::encode_integer(*v)),
            Value::OctetString(b) => ber::write_tlv(buf, tag::OCTET_STRING, b),
            Value::Null => ber::write_tlv(buf, tag::NULL, &[]),
            Value::ObjectId(oid) => ber::write_tlv(buf, tag::OBJECT_ID, &ber::encode_oid(oid)),
            Value::IpAddress(a) => ber::write_tlv(buf, tag::IP_ADDRESS, a),
            Value::Counter32(v) => {
                ber::write_tlv(buf, tag::COUNTER32, &ber::encode_unsigned(u64::from(*v)))
            }
            Value::Gauge32(v) => {
                ber::write_tlv(buf, tag::GAUGE32, &ber::encode_unsigned(u64::from(*v)))
            }
            Value::TimeTicks(v) => {
                ber::write_tlv(buf, tag::TIME_TICKS, &ber::encode_unsigned(u64::from(*v)))
            }
            Value::Opaque(b) => ber::write_tlv(buf, tag::OPAQUE, b),
            Value::Counter64(v) => ber::write_tlv(buf, tag::COUNTER64, &ber::encode_unsigned(*v)),
            Value::NoSuchObject => ber::write_tlv(buf, tag::NO_SUCH_OBJECT, &[]),
            Value::NoSuchInstance => ber::write_tlv(buf, tag::NO_SUCH_INSTANCE, &[]),
            Value::EndOfMibView => ber::write_tlv(buf, tag::END_OF_MIB_VIEW, &[]),
        }
    }

    fn decode(tag_byte: u8, content: &[u8]) -> Result<Self, TransportError> {
        let value = match tag_byte {
            tag::INTEGER => Value::Integer(ber::decode_integer(content)?),
            tag::OCTET_STRING => Value::OctetString(Bytes::copy_from_slice(content)),
            tag::NULL => Value::Null,
            tag::OBJECT_ID => Value::ObjectId(ber::decode_oid(content)?),
            tag::IP_ADDRESS => {
                let octets: [u8; 4] = content.try_into().map_err(|_| {
                    TransportError::malformed(format!("IpAddress of {} octets", content.len()))
                })?;
                Value::IpAddress(octets)
            }
            tag::COUNTER32 => Value::Counter32(decode_u32(content)?),
            tag::GAUGE32 => Value::Gauge32(decode_u32(content)?),
            tag::TIME_TICKS => Value::TimeTicks(decode_u32(content)?),
            tag::OPAQUE => Value::Opaque(Bytes::copy_from_slice(content)),
            tag::COUNTER64 => Value::Counter64(ber::decode_unsigned(content)?),
            tag::NO_SUCH_OBJECT => Value::NoSuchObject,
            tag::NO_SUCH_INSTANCE => Value::NoSuchInstance,
            tag::END_OF_MIB_VIEW => Value::EndOfMibView,
            other => {
                return Err(TransportError::malformed(format!(
                    "unknown value tag 0x{other:02x}"
                )));
            }
        };
        Ok(value)
    }
}

fn decode_u32(content: &[u8]) -> Result<u32, TransportError> {
    let v = ber::decode_unsigned(content)?;
    u32::try_from(v).map_err(|_| TransportError::malformed(format!("{v} does not fit 32 bits")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarBind {
    pub oid: Oid,
    pub value: Value,
}

impl VarBind {
    pub fn new(oid: Oid, value: Value) -> Self {
        Self { oid, value }
    }
}

/// A decoded community-based message (v1/v2c framing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub version: i64,
    pub community: Bytes,
    pub pdu_type: u8,
    pub request_id: i32,
    pub error_status: i64,
    pub error_index: i64,
    pub varbinds: Vec<VarBind>,
}

impl Message {
    pub fn encode(&self) -> Bytes {
        let mut varbind_list = BytesMut::new();
        for vb in &self.varbinds {
            let mut entry = BytesMut::new();
            ber::write_tlv(&mut entry, tag::OBJECT_ID, &ber::encode_oid(&vb.oid));
            vb.value.encode(&mut entry);
            ber::write_tlv(&mut varbind_list, tag::SEQUENCE, &entry);
        }

        let mut pdu = BytesMut::new();
        ber::write_tlv(&mut pdu, tag::INTEGER, &ber::encode_integer(i64::from(self.request_id)));
        ber::write_tlv(&mut pdu, tag::INTEGER, &ber::encode_integer(self.error_status));
        ber::write_tlv(&mut pdu, tag::INTEGER, &ber::encode_integer(self.error_index));
        ber::write_tlv(&mut pdu, tag::SEQUENCE, &varbind_list);

        let mut body = BytesMut::new();
        ber::write_tlv(&mut body, tag::INTEGER, &ber::encode_integer(self.version));
        ber::write_tlv(&mut body, tag::OCTET_STRING, &self.community);
        ber::write_tlv(&mut body, self.pdu_type, &pdu);

        let mut out = BytesMut::with_capacity(body.len() + 4);
        ber::write_tlv(&mut out, tag::SEQUENCE, &body);
        out.freeze()
    }

    pub fn decode(data: &[u8]) -> Result<Self, TransportError> {
        let mut outer = Reader::new(data);
        let body = outer.expect(tag::SEQUENCE)?;

        let mut reader = Reader::new(body);
        let version = ber::decode_integer(reader.expect(tag::INTEGER)?)?;
        let community = Bytes::copy_from_slice(reader.expect(tag::OCTET_STRING)?);
        let (pdu_type, pdu) = reader.read_tlv()?;

        let mut pdu = Reader::new(pdu);
        let request_id = ber::decode_integer(pdu.expect(tag::INTEGER)?)?;
        let request_id = i32::try_from(request_id).map_err(|_| {
            TransportError::malformed(format!("request-id {request_id} out of range"))
        })?;
        let error_status = ber::decode_integer(pdu.expect(tag::INTEGER)?)?;
        let error_index = ber::decode_integer(pdu.expect(tag::INTEGER)?)?;

        let mut list = Reader::new(pdu.expect(tag::SEQUENCE)?);
        let mut varbinds = Vec::new();
        while !list.is_empty() {
            let mut entry = Reader::new(list.expect(tag::SEQUENCE)?);
            let oid = ber::decode_oid(entry.expect(tag::OBJECT_ID)?)?;
            let (value_tag, content) = entry.read_tlv()?;
            varbinds.push(VarBind::new(oid, Value::decode(value_tag, content)?));
        }

        Ok(Self {
            version,
            community,
            pdu_type,
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }
}

/// Encodes an SNMPv2c GetRequest for `oids`.
pub fn encode_get_request(community: &str, request_id: i32, oids: &[Oid]) -> Bytes {
    Message {
        version: VERSION_2C,
        community: Bytes::copy_from_slice(community.as_bytes()),
        pdu_type: tag::GET_REQUEST,
        request_id,
        error_status: 0,
        error_index: 0,
        varbinds: oids
            .iter()
            .map(|oid| VarBind::new(oid.clone(), Value::Null))
            .collect(),
    }
    .encode()
}

/// Decodes a datagram that must be an SNMPv2c GetResponse.
pub fn decode_response(data: &[u8]) -> Result<Message, TransportError> {
    let message = Message::decode(data)?;
    if message.version != VERSION_2C {
        return Err(TransportError::malformed(format!(
            "unsupported SNMP version {}",
            message.version
        )));
    }
    if message.pdu_type != tag::GET_RESPONSE {
        return Err(TransportError::malformed(format!(
            "expected GetResponse, found PDU 0x{:02x}",
            message.pdu_type
        )));
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_request_matches_reference_bytes() {
        let oid: Oid = "1.3.6.1.2.1.1.1.0".parse().unwrap();
        let encoded = encode_get_request("public", 1, &[oid]);
        let expected: &[u8] = &[
            0x30, 0x26, // SEQUENCE
            0x02, 0x01, 0x01, // version 2c
            0x04, 0x06, b'p', b'u', b'b', b'l', b'i', b'c', // community
            0xA0, 0x19, // GetRequest
            0x02, 0x01, 0x01, // request-id
            0x02, 0x01, 0x00, // error-status
            0x02, 0x01, 0x00, // error-index
            0x30, 0x0E, // varbind list
            0x30, 0x0C, // varbind
            0x06, 0x08, 0x2B, 0x06, 0x01, 0x02, 0x01, 0x01, 0x01, 0x00, // oid
            0x05, 0x00, // NULL
        ];
        assert_eq!(&encoded[..], expected);
    }

    #[test]
    fn response_with_counters_and_text_decodes() {
        let in_oid: Oid = "1.3.6.1.2.1.31.1.1.1.6.4".parse().unwrap();
        let out_oid: Oid = "1.3.6.1.2.1.2.2.1.16.4".parse().unwrap();
        let descr_oid: Oid = "1.3.6.1.2.1.2.2.1.2.4".parse().unwrap();
        let response = Message {
            version: VERSION_2C,
            community: Bytes::from_static(b"public"),
            pdu_type: tag::GET_RESPONSE,
            request_id: 0x1234_5678,
            error_status: 0,
            error_index: 0,
            varbinds: vec![
                VarBind::new(in_oid.clone(), Value::Counter64(u64::MAX - 1)),
                VarBind::new(out_oid.clone(), Value::Counter32(4_000_000_000)),
                VarBind::new(descr_oid.clone(), Value::OctetString(Bytes::from_static(b"ether1"))),
            ],
        };

        let decoded = decode_response(&response.encode()).unwrap();
        assert_eq!(decoded.request_id, 0x1234_5678);
        assert_eq!(decoded.varbinds[0].oid, in_oid);
        assert_eq!(decoded.varbinds[0].value.as_counter(), Some(u64::MAX - 1));
        assert_eq!(decoded.varbinds[1].value.as_counter(), Some(4_000_000_000));
        assert_eq!(decoded.varbinds[2].value.as_text().as_deref(), Some("ether1"));
    }

    #[test]
    fn request_pdu_is_not_a_response() {
        let oid: Oid = "1.3.6.1.2.1.1.1.0".parse().unwrap();
        let request = encode_get_request("public", 7, &[oid]);
        let err = decode_response(&request).unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)));
    }

    #[test]
    fn truncated_datagram_is_malformed() {
        let oid: Oid = "1.3.6.1.2.1.1.1.0".parse().unwrap();
        let request = encode_get_request("public", 7, &[oid]);
        for cut in [0, 1, 5, request.len() - 1] {
            assert!(
                matches!(Message::decode(&request[..cut]), Err(TransportError::Malformed(_))),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn exception_values_decode() {
        let oid: Oid = "1.3.6.1.2.1.2.2.1.2.99".parse().unwrap();
        let response = Message {
            version: VERSION_2C,
            community: Bytes::from_static(b"public"),
            pdu_type: tag::GET_RESPONSE,
            request_id: 3,
            error_status: 0,
            error_index: 0,
            varbinds: vec![VarBind::new(oid, Value::NoSuchInstance)],
        };
        let decoded = decode_response(&response.encode()).unwrap();
        assert_eq!(decoded.varbinds[0].value, Value::NoSuchInstance);
        assert_eq!(decoded.varbinds[0].value.as_counter(), None);
    }
}
