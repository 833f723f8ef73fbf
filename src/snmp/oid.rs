// Object identifiers

use std::fmt;
use std::str::FromStr;

use super::TransportError;

/// An ASN.1 object identifier such as `1.3.6.1.2.1.2.2.1.2.4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid(Vec<u32>);

impl Oid {
    pub fn from_arcs(arcs: &[u32]) -> Result<Self, TransportError> {
        if arcs.len() < 2 {
            return Err(TransportError::InvalidOid(format!(
                "need at least two arcs, got {}",
                arcs.len()
            )));
        }
        if arcs[0] > 2 || (arcs[0] < 2 && arcs[1] >= 40) || arcs[1] > u32::MAX - 80 {
            return Err(TransportError::InvalidOid(format!(
                "invalid leading arcs {}.{}",
                arcs[0], arcs[1]
            )));
        }
        Ok(Self(arcs.to_vec()))
    }

    /// For compile-time tables whose arcs are known to be valid.
    pub(crate) fn from_static(arcs: &'static [u32]) -> Self {
        Self(arcs.to_vec())
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    /// This OID with `arc` appended (e.g. a table column plus a row index).
    pub fn child(&self, arc: u32) -> Self {
        let mut arcs = self.0.clone();
        arcs.push(arc);
        Self(arcs)
    }
}

impl FromStr for Oid {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('.');
        if trimmed.is_empty() {
            return Err(TransportError::InvalidOid("empty".into()));
        }
        let arcs = trimmed
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| TransportError::InvalidOid(format!("bad arc {:?} in {}", part, s)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_arcs(&arcs)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}
