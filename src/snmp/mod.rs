// SNMPv2c GET client over UDP

pub mod ber;
mod error;
pub mod message;
mod oid;

pub use error::TransportError;
pub use message::{Message, Value, VarBind};
pub use oid::Oid;

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, instrument};

/// Largest datagram we expect from an agent.
const MAX_DATAGRAM: usize = 65_507;

pub struct SnmpClient {
    host: String,
    port: u16,
    community: String,
    timeout: Duration,
    retries: u32,
    next_request_id: AtomicI32,
}

impl SnmpClient {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        community: impl Into<String>,
        timeout: Duration,
        retries: u32,
    ) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as i32 & 0x7FFF_FFFF)
            .unwrap_or(1);
        Self {
            host: host.into(),
            port,
            community: community.into(),
            timeout,
            retries,
            next_request_id: AtomicI32::new(seed),
        }
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn request_id(&self) -> i32 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed) & 0x7FFF_FFFF
    }

    async fn resolve(&self) -> Result<SocketAddr, TransportError> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| TransportError::Resolve(format!("{}: {}", self.target(), e)))?
            .next()
            .ok_or_else(|| TransportError::Resolve(self.target()))
    }

    /// Sends a GetRequest for `oids` and returns the agent's variable bindings.
    /// Each attempt waits `timeout`; undecodable datagrams and replies with another
    /// request id are skipped.
    #[instrument(skip(self, oids), fields(target = %self.target(), oids = oids.len()))]
    pub async fn get(&self, oids: &[Oid]) -> Result<Vec<VarBind>, TransportError> {
        let target = self.resolve().await?;
        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(target).await?;

        let request_id = self.request_id();
        let request = message::encode_get_request(&self.community, request_id, oids);
        let attempts = self.retries + 1;
        let mut buf = vec![0u8; MAX_DATAGRAM];

        for attempt in 1..=attempts {
            socket.send(&request).await?;
            match tokio::time::timeout(self.timeout, recv_reply(&socket, &mut buf, request_id))
                .await
            {
                Ok(reply) => {
                    let reply = reply?;
                    if reply.error_status != 0 {
                        return Err(TransportError::Agent {
                            status: reply.error_status,
                            index: reply.error_index,
                        });
                    }
                    return Ok(reply.varbinds);
                }
                Err(_) => debug!(attempt, attempts, "SNMP request timed out"),
            }
        }

        Err(TransportError::Timeout {
            target: self.target(),
            attempts,
        })
    }
}

async fn recv_reply(
    socket: &UdpSocket,
    buf: &mut [u8],
    request_id: i32,
) -> Result<Message, TransportError> {
    loop {
        let n = socket.recv(buf).await?;
        let reply = match message::decode_response(&buf[..n]) {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, len = n, "ignoring undecodable datagram");
                continue;
            }
        };
        if reply.request_id == request_id {
            return Ok(reply);
        }
        debug!(
            expected = request_id,
            received = reply.request_id,
            "ignoring reply to an earlier request"
        );
    }
}
