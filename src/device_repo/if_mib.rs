// IF-MIB columns polled for one interface

use crate::snmp::Oid;

/// ifDescr
const IF_DESCR: &[u32] = &[1, 3, 6, 1, 2, 1, 2, 2, 1, 2];
/// ifHCInOctets (Counter64)
const IF_HC_IN_OCTETS: &[u32] = &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 6];
/// ifHCOutOctets (Counter64)
const IF_HC_OUT_OCTETS: &[u32] = &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 10];

/// Instance OIDs for one interface row.
#[derive(Debug, Clone)]
pub struct InterfaceOids {
    pub descr: Oid,
    pub in_octets: Oid,
    pub out_octets: Oid,
}

impl InterfaceOids {
    pub fn for_index(interface_index: u32) -> Self {
        Self {
            descr: Oid::from_static(IF_DESCR).child(interface_index),
            in_octets: Oid::from_static(IF_HC_IN_OCTETS).child(interface_index),
            out_octets: Oid::from_static(IF_HC_OUT_OCTETS).child(interface_index),
        }
    }
}
