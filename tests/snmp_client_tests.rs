// SNMP client and device repo against a loopback UDP agent

use bytes::Bytes;
use std::time::Duration;
use tokio::net::UdpSocket;
use trafficmon::device_repo::{CounterSource, InterfaceOids, SnmpDeviceRepo};
use trafficmon::snmp::ber::tag;
use trafficmon::snmp::{Message, SnmpClient, TransportError, Value, VarBind};

/// How the fake agent answers one request.
#[derive(Clone, Copy)]
enum Behaviour {
    Answer,
    StaleThenAnswer,
    GarbageThenAnswer,
    AgentError,
    Silent,
}

/// Spawns an agent on 127.0.0.1 that answers GetRequests from `table`.
async fn spawn_agent(table: Vec<VarBind>, behaviour: Behaviour) -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut buf = vec![0u8; 2048];
        loop {
            let Ok((n, peer)) = socket.recv_from(&mut buf).await else {
                return;
            };
            let request = Message::decode(&buf[..n]).unwrap();
            assert_eq!(request.pdu_type, tag::GET_REQUEST);
            let varbinds = request
                .varbinds
                .iter()
                .map(|vb| {
                    table
                        .iter()
                        .find(|t| t.oid == vb.oid)
                        .cloned()
                        .unwrap_or_else(|| VarBind::new(vb.oid.clone(), Value::NoSuchInstance))
                })
                .collect();
            let mut reply = Message {
                pdu_type: tag::GET_RESPONSE,
                varbinds,
                ..request
            };
            match behaviour {
                Behaviour::Silent => continue,
                Behaviour::Answer => {}
                Behaviour::StaleThenAnswer => {
                    let stale = Message {
                        request_id: reply.request_id.wrapping_add(1000),
                        ..reply.clone()
                    };
                    socket.send_to(&stale.encode(), peer).await.unwrap();
                }
                Behaviour::GarbageThenAnswer => {
                    socket.send_to(&[0xDE, 0xAD, 0xBE, 0xEF], peer).await.unwrap();
                }
                Behaviour::AgentError => {
                    reply.error_status = 2;
                    reply.error_index = 1;
                }
            }
            socket.send_to(&reply.encode(), peer).await.unwrap();
        }
    });
    port
}

fn counters_table(ingress: u64, egress: u64) -> Vec<VarBind> {
    let oids = InterfaceOids::for_index(4);
    vec![
        VarBind::new(oids.in_octets, Value::Counter64(ingress)),
        VarBind::new(oids.out_octets, Value::Counter64(egress)),
        VarBind::new(oids.descr, Value::OctetString(Bytes::from_static(b"ether4"))),
    ]
}

fn repo(port: u16, timeout_ms: u64, retries: u32) -> SnmpDeviceRepo {
    let client = SnmpClient::new(
        "127.0.0.1",
        port,
        "public",
        Duration::from_millis(timeout_ms),
        retries,
    );
    SnmpDeviceRepo::new(client, 4)
}

#[tokio::test]
async fn fetch_counters_reads_both_channels() {
    let port = spawn_agent(counters_table(u64::MAX - 5, 123_456), Behaviour::Answer).await;
    let sample = repo(port, 1000, 0).fetch_counters().await.unwrap();
    assert_eq!(sample.ingress_bytes, u64::MAX - 5);
    assert_eq!(sample.egress_bytes, 123_456);
    assert!(sample.observed_at_ms > 0);
}

#[tokio::test]
async fn fetch_interface_name_reads_description() {
    let port = spawn_agent(counters_table(0, 0), Behaviour::Answer).await;
    let name = repo(port, 1000, 0).fetch_interface_name().await.unwrap();
    assert_eq!(name, "ether4");
}

#[tokio::test]
async fn reply_with_other_request_id_is_skipped() {
    let port = spawn_agent(counters_table(10, 20), Behaviour::StaleThenAnswer).await;
    let sample = repo(port, 1000, 0).fetch_counters().await.unwrap();
    assert_eq!(sample.ingress_bytes, 10);
    assert_eq!(sample.egress_bytes, 20);
}

#[tokio::test]
async fn undecodable_datagram_is_skipped() {
    let port = spawn_agent(counters_table(10, 20), Behaviour::GarbageThenAnswer).await;
    let sample = repo(port, 1000, 0).fetch_counters().await.unwrap();
    assert_eq!(sample.ingress_bytes, 10);
    assert_eq!(sample.egress_bytes, 20);
}

#[tokio::test]
async fn agent_error_status_is_reported() {
    let port = spawn_agent(counters_table(0, 0), Behaviour::AgentError).await;
    let err = repo(port, 1000, 0).fetch_counters().await.unwrap_err();
    assert!(matches!(err, TransportError::Agent { status: 2, index: 1 }));
}

#[tokio::test]
async fn missing_instance_is_unexpected_value() {
    let port = spawn_agent(vec![], Behaviour::Answer).await;
    let err = repo(port, 1000, 0).fetch_counters().await.unwrap_err();
    assert!(matches!(
        err,
        TransportError::UnexpectedValue { kind: "noSuchInstance", .. }
    ));
}

#[tokio::test]
async fn silent_agent_times_out_after_retries() {
    let port = spawn_agent(counters_table(0, 0), Behaviour::Silent).await;
    let err = repo(port, 50, 2).fetch_counters().await.unwrap_err();
    match err {
        TransportError::Timeout { attempts, target } => {
            assert_eq!(attempts, 3);
            assert_eq!(target, format!("127.0.0.1:{port}"));
        }
        other => panic!("expected timeout, got {other}"),
    }
}

#[tokio::test]
async fn unresolvable_host_is_resolve_error() {
    let client = SnmpClient::new(
        "no-such-host.invalid",
        161,
        "public",
        Duration::from_millis(50),
        0,
    );
    let err = SnmpDeviceRepo::new(client, 4)
        .fetch_counters()
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Resolve(_)));
}
