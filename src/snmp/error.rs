use thiserror::Error;

/// Failure to obtain values from the device. Callers surface the message as-is.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot resolve device address {0}")]
    Resolve(String),

    #[error("no response from {target} after {attempts} attempt(s)")]
    Timeout { target: String, attempts: u32 },

    #[error("malformed SNMP message: {0}")]
    Malformed(String),

    #[error("agent returned error-status {status} (index {index})")]
    Agent { status: i64, index: i64 },

    #[error("unexpected {kind} value for {oid}")]
    UnexpectedValue { oid: String, kind: &'static str },

    #[error("no value for {0} in response")]
    MissingValue(String),

    #[error("invalid OID: {0}")]
    InvalidOid(String),
}

impl TransportError {
    pub(crate) fn malformed(what: impl Into<String>) -> Self {
        Self::Malformed(what.into())
    }
}
