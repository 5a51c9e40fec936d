//! Object Identifier: an ordered sequence of non-negative
//! sub-identifiers with equality, lexicographic order, prefix testing,
//! append and parent operations.

use snmp_ber::oid as ber_oid;
use snmp_core::{DecodeErrorKind, Result, SnmpError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid(Vec<u32>);

impl Oid {
    pub fn new(arcs: Vec<u32>) -> Self {
        Self(arcs)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` is a proper prefix of `other` (self != other, and
    /// every arc of self matches the corresponding arc of other).
    pub fn is_proper_prefix_of(&self, other: &Oid) -> bool {
        self.0.len() < other.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    /// Append a sub-identifier, returning a new OID (e.g. turning a scalar
    /// OID like sysDescr into an instance OID sysDescr.0).
    pub fn append(&self, arc: u32) -> Oid {
        let mut v = self.0.clone();
        v.push(arc);
        Oid(v)
    }

    pub fn extend(&self, arcs: &[u32]) -> Oid {
        let mut v = self.0.clone();
        v.extend_from_slice(arcs);
        Oid(v)
    }

    /// The OID with its last sub-identifier removed, or `None` if empty.
    pub fn parent(&self) -> Option<Oid> {
        if self.0.is_empty() {
            None
        } else {
            Some(Oid(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        ber_oid::encode_oid(&self.0)
    }

    pub fn decode(bytes: &[u8]) -> Result<Oid> {
        Ok(Oid(ber_oid::decode_oid(bytes)?))
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|a| a.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl FromStr for Oid {
    type Err = SnmpError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.strip_prefix('.').unwrap_or(s);
        if s.is_empty() {
            return Err(SnmpError::decode(DecodeErrorKind::InvalidOidEncoding));
        }
        let mut arcs = Vec::new();
        for part in s.split('.') {
            let arc: u32 = part
                .parse()
                .map_err(|_| SnmpError::decode(DecodeErrorKind::InvalidOidEncoding))?;
            arcs.push(arc);
        }
        Ok(Oid(arcs))
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Oid(arcs.to_vec())
    }
}

impl From<Vec<u32>> for Oid {
    fn from(arcs: Vec<u32>) -> Self {
        Oid(arcs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let oid: Oid = "1.3.6.1.2.1.1.2.0".parse().unwrap();
        let enc = oid.encode().unwrap();
        assert_eq!(Oid::decode(&enc).unwrap(), oid);
    }

    #[test]
    fn first_byte_combines_first_two_subidentifiers() {
        let oid: Oid = "1.3.6.1".parse().unwrap();
        let enc = oid.encode().unwrap();
        assert_eq!(enc[0], 0x2B);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let oid: Oid = "1.3.6.1.2.1.1.1.0".parse().unwrap();
        assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.1.0");
    }

    #[test]
    fn prefix_test() {
        let root: Oid = "1.3.6.1.2.1.1".parse().unwrap();
        let child: Oid = "1.3.6.1.2.1.1.1.0".parse().unwrap();
        assert!(root.is_proper_prefix_of(&child));
        assert!(!child.is_proper_prefix_of(&root));
        assert!(!root.is_proper_prefix_of(&root));
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a: Oid = "1.3.6.1.2.1.1.1.0".parse().unwrap();
        let b: Oid = "1.3.6.1.2.1.1.2.0".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn parent_and_append_are_inverses() {
        let oid: Oid = "1.3.6.1.2.1.1.1.0".parse().unwrap();
        let parent = oid.parent().unwrap();
        assert_eq!(parent.append(0), oid);
    }
}
