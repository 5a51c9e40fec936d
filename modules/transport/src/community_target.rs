//! A configured SNMPv1/v2c peer and the convenience Get/GetNext/GetBulk/Set/
//! Walk API built on top of `engine::request_reply`.

use crate::convenience::{check_response, varbinds_to_map, walk_subtree};
use crate::engine::{request_reply, Acceptance, Cancellation};
use crate::socket::AsyncSocket;
use crate::RequestConfig;
use snmp_core::rng::random_request_id;
use snmp_core::{Result, SnmpError};
use snmp_message::CommunityMessage;
use snmp_pdu::{Pdu, Vb};
use snmp_smi::{Oid, Value};
use std::collections::BTreeMap;
use std::net::SocketAddr;

/// SNMPv1 or SNMPv2c peer, addressed by community string.
pub struct CommunityTarget {
    socket: AsyncSocket,
    version: u8,
    community: Vec<u8>,
    config: RequestConfig,
    cancel: Cancellation,
}

impl CommunityTarget {
    pub async fn connect(
        peer: SocketAddr,
        version: u8,
        community: impl Into<Vec<u8>>,
        config: RequestConfig,
    ) -> std::io::Result<Self> {
        Ok(Self {
            socket: AsyncSocket::connect_to(peer).await?,
            version,
            community: community.into(),
            config,
            cancel: Cancellation::new(),
        })
    }

    /// A handle that can be used to abort an in-flight request from another
    /// task.
    pub fn cancellation(&self) -> Cancellation {
        self.cancel.clone()
    }

    async fn roundtrip(&self, pdu: Pdu) -> Result<Pdu> {
        let request_id = if pdu.request_id == 0 { random_request_id() } else { pdu.request_id };
        let pdu = Pdu { request_id, ..pdu };
        let msg = CommunityMessage::new(self.version, self.community.clone(), pdu);
        let wire = msg.encode();

        let version = self.version;
        let community = self.community.clone();
        let reply_bytes = request_reply(&self.socket, &wire, &self.config, &self.cancel, move |bytes, _src| {
            let reply = CommunityMessage::decode(bytes)?;
            if reply.pdu.request_id != request_id {
                return Ok(Acceptance::Drop);
            }
            reply.validate(version, &community)?;
            Ok(Acceptance::Accept)
        })
        .await?;

        let reply = CommunityMessage::decode(&reply_bytes)?;
        reply.validate(self.version, &self.community)?;
        check_response(&reply.pdu, request_id)?;
        Ok(reply.pdu)
    }

    pub async fn get(&self, oids: Vec<Oid>) -> Result<BTreeMap<Oid, Value>> {
        tracing::debug!("SNMP GET {} OID(s) from {}", oids.len(), self.socket.peer());
        let pdu = self.roundtrip(Pdu::get(0, oids)).await?;
        Ok(varbinds_to_map(pdu.varbinds))
    }

    pub async fn get_next(&self, oids: Vec<Oid>) -> Result<Vec<Vb>> {
        tracing::debug!("SNMP GETNEXT {} OID(s) from {}", oids.len(), self.socket.peer());
        let pdu = self.roundtrip(Pdu::get_next(0, oids)).await?;
        Ok(pdu.varbinds)
    }

    /// GetBulk: only meaningful for v2c — v1 has no GetBulk PDU.
    pub async fn get_bulk(&self, non_repeaters: i32, max_repetitions: i32, oids: Vec<Oid>) -> Result<Vec<Vb>> {
        if self.version != snmp_message::community::VERSION_V2C {
            return Err(SnmpError::UnexpectedPduType { actual: snmp_ber::tags::PDU_GET_BULK });
        }
        tracing::debug!("SNMP GETBULK (max_repetitions={}) from {}", max_repetitions, self.socket.peer());
        let pdu = self.roundtrip(Pdu::get_bulk(0, non_repeaters, max_repetitions, oids)).await?;
        Ok(pdu.varbinds)
    }

    pub async fn set(&self, varbinds: Vec<Vb>) -> Result<BTreeMap<Oid, Value>> {
        tracing::debug!("SNMP SET {} varbind(s) on {}", varbinds.len(), self.socket.peer());
        let pdu = self.roundtrip(Pdu::set(0, varbinds)).await?;
        Ok(varbinds_to_map(pdu.varbinds))
    }

    /// Walk a subtree with successive GetNext requests.
    pub async fn walk(&self, root: Oid) -> Result<Vec<Vb>> {
        walk_subtree(&root, |cursor| async move {
            let reply = self.get_next(vec![cursor]).await?;
            Ok(reply.into_iter().next())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snmp_smi::Value;
    use tokio::net::UdpSocket;

    async fn fake_agent(respond_with: impl Fn(CommunityMessage) -> Pdu + Send + 'static) -> SocketAddr {
        let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = sock.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 2048];
            let (n, src) = sock.recv_from(&mut buf).await.unwrap();
            let request = CommunityMessage::decode(&buf[..n]).unwrap();
            let version = request.version;
            let community = request.community.clone();
            let reply_pdu = respond_with(request);
            let reply = CommunityMessage::new(version, community, reply_pdu);
            sock.send_to(&reply.encode(), src).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn get_round_trips_through_a_fake_agent() {
        let addr = fake_agent(|req| {
            Pdu::response(
                req.pdu.request_id,
                0,
                0,
                vec![Vb::new(req.pdu.varbinds[0].oid.clone(), Value::OctetString(b"a fake agent".to_vec()))],
            )
        })
        .await;

        let target = CommunityTarget::connect(addr, snmp_message::community::VERSION_V2C, b"public".to_vec(), RequestConfig::default())
            .await
            .unwrap();
        let result = target.get(vec!["1.3.6.1.2.1.1.1.0".parse().unwrap()]).await.unwrap();
        assert_eq!(
            result.get(&"1.3.6.1.2.1.1.1.0".parse().unwrap()),
            Some(&Value::OctetString(b"a fake agent".to_vec()))
        );
    }

    #[tokio::test]
    async fn error_status_surfaces_as_agent_error() {
        let addr = fake_agent(|req| Pdu::response(req.pdu.request_id, 5, 1, vec![])).await;
        let target = CommunityTarget::connect(addr, snmp_message::community::VERSION_V1, b"public".to_vec(), RequestConfig::default())
            .await
            .unwrap();
        let result = target.get(vec!["1.3.6.1.2.1.1.1.0".parse().unwrap()]).await;
        assert!(matches!(result, Err(SnmpError::AgentError { .. })));
    }

    #[tokio::test]
    async fn wrong_community_in_reply_is_rejected() {
        let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = sock.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 2048];
            let (n, src) = sock.recv_from(&mut buf).await.unwrap();
            let request = CommunityMessage::decode(&buf[..n]).unwrap();
            let reply_pdu = Pdu::response(request.pdu.request_id, 0, 0, vec![]);
            let reply = CommunityMessage::new(request.version, b"not-what-we-expect".to_vec(), reply_pdu);
            sock.send_to(&reply.encode(), src).await.unwrap();
        });
        let target = CommunityTarget::connect(addr, snmp_message::community::VERSION_V1, b"public".to_vec(), RequestConfig::default())
            .await
            .unwrap();
        let result = target.get(vec!["1.3.6.1.2.1.1.1.0".parse().unwrap()]).await;
        assert!(matches!(result, Err(SnmpError::CommunityMismatch)));
    }
}
