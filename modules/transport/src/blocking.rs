//! Synchronous facade over `CommunityTarget`/`UserTarget` for callers
//! without their own tokio runtime. Each instance owns a dedicated current-thread runtime and
//! blocks on the same async methods the tokio-native API uses — no second
//! protocol implementation to keep in sync.

use crate::community_target::CommunityTarget;
use crate::config::RequestConfig;
use crate::engine::Cancellation;
use crate::user_target::UserTarget;
use snmp_core::Result;
use snmp_pdu::Vb;
use snmp_smi::{Oid, Value};
use snmp_usm::params::Credentials;
use std::collections::BTreeMap;
use std::net::SocketAddr;

pub struct BlockingCommunityTarget {
    rt: tokio::runtime::Runtime,
    inner: CommunityTarget,
}

impl BlockingCommunityTarget {
    pub fn connect(peer: SocketAddr, version: u8, community: impl Into<Vec<u8>>, config: RequestConfig) -> std::io::Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let inner = rt.block_on(CommunityTarget::connect(peer, version, community, config))?;
        Ok(Self { rt, inner })
    }

    pub fn cancellation(&self) -> Cancellation {
        self.inner.cancellation()
    }

    pub fn get(&self, oids: Vec<Oid>) -> Result<BTreeMap<Oid, Value>> {
        self.rt.block_on(self.inner.get(oids))
    }

    pub fn get_next(&self, oids: Vec<Oid>) -> Result<Vec<Vb>> {
        self.rt.block_on(self.inner.get_next(oids))
    }

    pub fn get_bulk(&self, non_repeaters: i32, max_repetitions: i32, oids: Vec<Oid>) -> Result<Vec<Vb>> {
        self.rt.block_on(self.inner.get_bulk(non_repeaters, max_repetitions, oids))
    }

    pub fn set(&self, varbinds: Vec<Vb>) -> Result<BTreeMap<Oid, Value>> {
        self.rt.block_on(self.inner.set(varbinds))
    }

    pub fn walk(&self, root: Oid) -> Result<Vec<Vb>> {
        self.rt.block_on(self.inner.walk(root))
    }
}

pub struct BlockingUserTarget {
    rt: tokio::runtime::Runtime,
    inner: UserTarget,
}

impl BlockingUserTarget {
    pub fn connect(peer: SocketAddr, credentials: Credentials, config: RequestConfig) -> std::io::Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let inner = rt.block_on(UserTarget::connect(peer, credentials, config))?;
        Ok(Self { rt, inner })
    }

    pub fn cancellation(&self) -> Cancellation {
        self.inner.cancellation()
    }

    pub fn discover(&mut self) -> Result<()> {
        self.rt.block_on(self.inner.discover())
    }

    pub fn get(&mut self, oids: Vec<Oid>) -> Result<BTreeMap<Oid, Value>> {
        self.rt.block_on(self.inner.get(oids))
    }

    pub fn get_next(&mut self, oids: Vec<Oid>) -> Result<Vec<Vb>> {
        self.rt.block_on(self.inner.get_next(oids))
    }

    pub fn get_bulk(&mut self, non_repeaters: i32, max_repetitions: i32, oids: Vec<Oid>) -> Result<Vec<Vb>> {
        self.rt.block_on(self.inner.get_bulk(non_repeaters, max_repetitions, oids))
    }

    pub fn set(&mut self, varbinds: Vec<Vb>) -> Result<BTreeMap<Oid, Value>> {
        self.rt.block_on(self.inner.set(varbinds))
    }

    pub fn walk(&mut self, root: Oid) -> Result<Vec<Vb>> {
        self.rt.block_on(self.inner.walk(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snmp_message::community::{CommunityMessage, VERSION_V1};
    use snmp_pdu::Pdu;
    use std::thread;

    #[test]
    fn blocking_get_round_trips_through_a_fake_agent() {
        let std_sock = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = std_sock.local_addr().unwrap();
        thread::spawn(move || {
            let mut buf = [0u8; 2048];
            let (n, src) = std_sock.recv_from(&mut buf).unwrap();
            let request = CommunityMessage::decode(&buf[..n]).unwrap();
            let reply_pdu = Pdu::response(
                request.pdu.request_id,
                0,
                0,
                vec![Vb::new(request.pdu.varbinds[0].oid.clone(), Value::OctetString(b"blocking".to_vec()))],
            );
            let reply = CommunityMessage::new(request.version, request.community, reply_pdu);
            std_sock.send_to(&reply.encode(), src).unwrap();
        });

        let target = BlockingCommunityTarget::connect(addr, VERSION_V1, b"public".to_vec(), RequestConfig::default()).unwrap();
        let result = target.get(vec!["1.3.6.1.2.1.1.1.0".parse().unwrap()]).unwrap();
        assert_eq!(
            result.get(&"1.3.6.1.2.1.1.1.0".parse().unwrap()),
            Some(&Value::OctetString(b"blocking".to_vec()))
        );
    }
}
