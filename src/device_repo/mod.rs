// Interface counters from the monitored device

mod if_mib;

pub use if_mib::InterfaceOids;

use crate::config::DeviceConfig;
use crate::models::CounterSample;
use crate::snmp::{Oid, SnmpClient, TransportError, VarBind};
use async_trait::async_trait;
use tracing::instrument;

/// Where counter samples come from. Object-safe so the poller can hold any source.
#[async_trait]
pub trait CounterSource: Send + Sync {
    /// Reads both byte counters of the tracked interface, stamped with the local clock.
    async fn fetch_counters(&self) -> Result<CounterSample, TransportError>;

    /// Human-readable interface description.
    async fn fetch_interface_name(&self) -> Result<String, TransportError>;
}

pub struct SnmpDeviceRepo {
    client: SnmpClient,
    interface_index: u32,
    oids: InterfaceOids,
}

impl SnmpDeviceRepo {
    pub fn new(client: SnmpClient, interface_index: u32) -> Self {
        Self {
            client,
            interface_index,
            oids: InterfaceOids::for_index(interface_index),
        }
    }

    pub fn from_config(config: &DeviceConfig) -> Self {
        let client = SnmpClient::new(
            config.address.clone(),
            config.port,
            config.community.clone(),
            config.timeout(),
            config.retries,
        );
        Self::new(client, config.interface_index)
    }
}

#[async_trait]
impl CounterSource for SnmpDeviceRepo {
    #[instrument(
        skip(self),
        fields(repo = "snmp", operation = "fetch_counters", if_index = self.interface_index)
    )]
    async fn fetch_counters(&self) -> Result<CounterSample, TransportError> {
        let varbinds = self
            .client
            .get(&[self.oids.in_octets.clone(), self.oids.out_octets.clone()])
            .await?;
        let ingress = counter_value(&varbinds, &self.oids.in_octets)?;
        let egress = counter_value(&varbinds, &self.oids.out_octets)?;
        Ok(CounterSample::now(ingress, egress))
    }

    #[instrument(
        skip(self),
        fields(
            repo = "snmp",
            operation = "fetch_interface_name",
            if_index = self.interface_index
        )
    )]
    async fn fetch_interface_name(&self) -> Result<String, TransportError> {
        let varbinds = self.client.get(std::slice::from_ref(&self.oids.descr)).await?;
        let vb = find(&varbinds, &self.oids.descr)?;
        vb.value
            .as_text()
            .ok_or_else(|| TransportError::UnexpectedValue {
                oid: vb.oid.to_string(),
                kind: vb.value.kind(),
            })
    }
}

fn find<'a>(varbinds: &'a [VarBind], oid: &Oid) -> Result<&'a VarBind, TransportError> {
    varbinds
        .iter()
        .find(|vb| &vb.oid == oid)
        .ok_or_else(|| TransportError::MissingValue(oid.to_string()))
}

fn counter_value(varbinds: &[VarBind], oid: &Oid) -> Result<u64, TransportError> {
    let vb = find(varbinds, oid)?;
    vb.value
        .as_counter()
        .ok_or_else(|| TransportError::UnexpectedValue {
            oid: oid.to_string(),
            kind: vb.value.kind(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snmp::Value;

    fn oids() -> InterfaceOids {
        InterfaceOids::for_index(4)
    }

    #[test]
    fn interface_oids_use_row_index() {
        let o = oids();
        assert_eq!(o.descr.to_string(), "1.3.6.1.2.1.2.2.1.2.4");
        assert_eq!(o.in_octets.to_string(), "1.3.6.1.2.1.31.1.1.1.6.4");
        assert_eq!(o.out_octets.to_string(), "1.3.6.1.2.1.31.1.1.1.10.4");
    }

    #[test]
    fn counter_value_widens_counter32() {
        let o = oids();
        let varbinds = vec![VarBind::new(o.in_octets.clone(), Value::Counter32(42))];
        assert_eq!(counter_value(&varbinds, &o.in_octets).unwrap(), 42);
    }

    #[test]
    fn counter_value_rejects_exceptions_and_missing() {
        let o = oids();
        let varbinds = vec![VarBind::new(o.in_octets.clone(), Value::NoSuchInstance)];
        assert!(matches!(
            counter_value(&varbinds, &o.in_octets),
            Err(TransportError::UnexpectedValue { kind: "noSuchInstance", .. })
        ));
        assert!(matches!(
            counter_value(&varbinds, &o.out_octets),
            Err(TransportError::MissingValue(_))
        ));
    }
}
