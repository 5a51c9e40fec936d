//! A configured SNMPv3 peer: engine discovery, time-window tracking, USM
//! authentication/privacy, and the same Get/GetNext/GetBulk/Set/Walk
//! convenience API as `CommunityTarget`.

use crate::convenience::{check_response, varbinds_to_map};
use crate::engine::{request_reply, Acceptance, Cancellation};
use crate::report::{classify, ReportKind};
use crate::socket::AsyncSocket;
use crate::RequestConfig;
use snmp_core::rng::random_request_id;
use snmp_core::{Result, SnmpError, UsmErrorKind};
use snmp_message::v3::{self, MsgFlags, ScopedPduData, UsmSecurityParameters, V3Message};
use snmp_pdu::{Pdu, PduKind, ScopedPdu, Vb};
use snmp_smi::{Oid, Value};
use snmp_usm::params::Credentials;
use snmp_usm::SecureAgentParameters;
use std::collections::BTreeMap;
use std::net::SocketAddr;

/// SNMPv3 peer bound to one set of credentials.
pub struct UserTarget {
    socket: AsyncSocket,
    config: RequestConfig,
    cancel: Cancellation,
    state: SecureAgentParameters,
}

impl UserTarget {
    pub async fn connect(peer: SocketAddr, credentials: Credentials, config: RequestConfig) -> std::io::Result<Self> {
        Ok(Self {
            socket: AsyncSocket::connect_to(peer).await?,
            config,
            cancel: Cancellation::new(),
            state: SecureAgentParameters::new(credentials),
        })
    }

    pub fn cancellation(&self) -> Cancellation {
        self.cancel.clone()
    }

    /// Learn the agent's engineId/engineBoots/engineTime with an
    /// unauthenticated discovery exchange.
    pub async fn discover(&mut self) -> Result<()> {
        let probe = ScopedPdu::new(Vec::new(), Vec::new(), Pdu::get(0, vec![]));
        let msg = v3::discovery_message(random_request_id(), self.state.max_message_size as i32, probe);
        let expected_msg_id = msg.msg_id;
        let wire = msg.encode();

        let reply_bytes = request_reply(&self.socket, &wire, &self.config, &self.cancel, move |bytes, _src| {
            match V3Message::decode(bytes) {
                Ok((reply, _range)) if reply.msg_id == expected_msg_id => Ok(Acceptance::Accept),
                Ok(_) => Ok(Acceptance::Drop),
                Err(e) => Err(e),
            }
        })
        .await?;

        let (reply, _range) = V3Message::decode(&reply_bytes)?;
        let ScopedPduData::Plaintext(scoped) = &reply.scoped_pdu_data else {
            return Err(SnmpError::usm(UsmErrorKind::AuthenticationFailed));
        };
        match classify(&scoped.pdu) {
            ReportKind::NotInTimeWindow => Err(SnmpError::usm(UsmErrorKind::EngineTimeOutsideWindow)),
            ReportKind::UnknownEngineId | ReportKind::Other => {
                self.state.observe_engine(
                    &reply.security_params.authoritative_engine_id,
                    reply.security_params.engine_boots as u32,
                    reply.security_params.engine_time as u32,
                );
                self.state.negotiate_max_message_size(reply.msg_max_size as u32);
                tracing::debug!(
                    "SNMPv3 discovery complete: engineBoots={} engineTime={}",
                    self.state.engine_boots,
                    self.state.engine_time
                );
                Ok(())
            }
        }
    }

    fn security_params_template(&self) -> Result<UsmSecurityParameters> {
        Ok(UsmSecurityParameters {
            authoritative_engine_id: self.state.engine_id.clone(),
            engine_boots: self.state.engine_boots as i32,
            engine_time: self.state.submitted_engine_time()? as i32,
            user_name: self.state.credentials.user_name.clone(),
            auth_params: Vec::new(),
            priv_params: Vec::new(),
        })
    }

    async fn roundtrip(&mut self, pdu: Pdu) -> Result<Pdu> {
        if !self.state.is_discovered() {
            self.discover().await?;
        }
        let request_id = if pdu.request_id == 0 { random_request_id() } else { pdu.request_id };
        let pdu = Pdu { request_id, ..pdu };
        let scoped = ScopedPdu::new(self.state.context_engine_id.clone(), self.state.context_name.clone(), pdu);

        let auth_protocol = self.state.credentials.auth.as_ref().map(|(p, _)| *p);
        let priv_protocol = self.state.credentials.priv_.as_ref().map(|(p, _)| *p);
        let auth_key = self.state.auth_key()?;
        let priv_key = self.state.priv_key()?;

        let mut sec_params = self.security_params_template()?;
        let scoped_data = match (priv_protocol, priv_key.as_deref()) {
            (Some(protocol), Some(key)) => {
                let (data, params) =
                    v3::encrypt_scoped_pdu(&scoped, protocol, key, self.state.engine_boots, self.state.engine_time)?;
                sec_params.priv_params = params;
                data
            }
            _ => ScopedPduData::Plaintext(scoped),
        };

        let flags = MsgFlags::new(auth_protocol.is_some(), priv_key.is_some(), true)?;
        let msg_id = random_request_id();
        let msg = V3Message {
            msg_id,
            msg_max_size: self.state.max_message_size as i32,
            flags,
            security_params: sec_params,
            scoped_pdu_data: scoped_data,
        };
        let wire = v3::seal(msg, auth_protocol.zip(auth_key.as_deref()));

        let reply_bytes = request_reply(&self.socket, &wire, &self.config, &self.cancel, move |bytes, _src| {
            match V3Message::decode(bytes) {
                Ok((reply, _range)) if reply.msg_id == msg_id => Ok(Acceptance::Accept),
                Ok(_) => Ok(Acceptance::Drop),
                Err(e) => Err(e),
            }
        })
        .await?;

        let opened = v3::open(&reply_bytes, auth_protocol.zip(auth_key.as_deref()))?;
        let scoped_reply = match &opened.scoped_pdu_data {
            ScopedPduData::Plaintext(scoped) => scoped.clone(),
            ScopedPduData::Encrypted(ct) => {
                let protocol = priv_protocol.ok_or_else(|| SnmpError::usm(UsmErrorKind::UnsupportedPrivacyProtocol))?;
                let key = priv_key.ok_or_else(|| SnmpError::usm(UsmErrorKind::UnsupportedPrivacyProtocol))?;
                v3::decrypt_scoped_pdu(
                    ct,
                    protocol,
                    &key,
                    self.state.engine_boots,
                    self.state.engine_time,
                    &opened.security_params.priv_params,
                )?
            }
        };

        if scoped_reply.pdu.kind == PduKind::Report {
            return match classify(&scoped_reply.pdu) {
                ReportKind::UnknownEngineId | ReportKind::NotInTimeWindow => {
                    tracing::debug!("SNMPv3 agent reported stale engine state, re-observing");
                    self.state.observe_engine(
                        &opened.security_params.authoritative_engine_id,
                        opened.security_params.engine_boots as u32,
                        opened.security_params.engine_time as u32,
                    );
                    Err(SnmpError::usm(UsmErrorKind::EngineTimeOutsideWindow))
                }
                ReportKind::Other => {
                    tracing::warn!("SNMPv3 agent returned an unrecognized report PDU");
                    Err(SnmpError::Report("agent returned a report PDU".to_string()))
                }
            };
        }

        check_response(&scoped_reply.pdu, request_id)?;
        Ok(scoped_reply.pdu)
    }

    pub async fn get(&mut self, oids: Vec<Oid>) -> Result<BTreeMap<Oid, Value>> {
        let pdu = self.roundtrip(Pdu::get(0, oids)).await?;
        Ok(varbinds_to_map(pdu.varbinds))
    }

    pub async fn get_next(&mut self, oids: Vec<Oid>) -> Result<Vec<Vb>> {
        let pdu = self.roundtrip(Pdu::get_next(0, oids)).await?;
        Ok(pdu.varbinds)
    }

    pub async fn get_bulk(&mut self, non_repeaters: i32, max_repetitions: i32, oids: Vec<Oid>) -> Result<Vec<Vb>> {
        let pdu = self.roundtrip(Pdu::get_bulk(0, non_repeaters, max_repetitions, oids)).await?;
        Ok(pdu.varbinds)
    }

    pub async fn set(&mut self, varbinds: Vec<Vb>) -> Result<BTreeMap<Oid, Value>> {
        let pdu = self.roundtrip(Pdu::set(0, varbinds)).await?;
        Ok(varbinds_to_map(pdu.varbinds))
    }

    /// Walk a subtree with successive GetNext requests.
    /// Inlined rather than built on the shared `walk_subtree` combinator:
    /// each step needs `&mut self` for the USM state machine, which a
    /// reusable `FnMut(Oid) -> Fut` closure can't borrow across iterations
    /// as cleanly as a plain loop.
    pub async fn walk(&mut self, root: Oid) -> Result<Vec<Vb>> {
        let mut out = Vec::new();
        let mut cursor = root.clone();
        loop {
            let reply = self.get_next(vec![cursor.clone()]).await?;
            let Some(vb) = reply.into_iter().next() else { break };
            if !root.is_proper_prefix_of(&vb.oid) && vb.oid != root {
                break;
            }
            if vb.oid <= cursor {
                break;
            }
            if vb.value.is_exception() {
                break;
            }
            cursor = vb.oid.clone();
            out.push(vb);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snmp_usm::AuthProtocol;
    use tokio::net::UdpSocket;

    const ENGINE_ID: &[u8] = b"fake-agent-engine";

    /// A fake agent that understands discovery and one authenticated
    /// exchange, replying with the agent's own engine identity and an
    /// echoed-back varbind.
    async fn fake_v3_agent(auth: Option<(AuthProtocol, Vec<u8>)>) -> SocketAddr {
        let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = sock.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let mut buf = [0u8; 2048];
                let Ok((n, src)) = sock.recv_from(&mut buf).await else { return };
                let Ok((request, _range)) = V3Message::decode(&buf[..n]) else { return };

                if request.security_params.authoritative_engine_id.is_empty() {
                    let scoped = ScopedPdu::new(Vec::new(), Vec::new(), Pdu::report(request_id_of(&request), vec![]));
                    let reply = V3Message {
                        msg_id: request.msg_id,
                        msg_max_size: 65535,
                        flags: MsgFlags::new(false, false, false).unwrap(),
                        security_params: UsmSecurityParameters {
                            authoritative_engine_id: ENGINE_ID.to_vec(),
                            engine_boots: 1,
                            engine_time: 1000,
                            user_name: Vec::new(),
                            auth_params: Vec::new(),
                            priv_params: Vec::new(),
                        },
                        scoped_pdu_data: ScopedPduData::Plaintext(scoped),
                    };
                    sock.send_to(&reply.encode(), src).await.unwrap();
                    continue;
                }

                let opened = v3::open(&buf[..n], auth.as_ref().map(|(p, k)| (*p, k.as_slice()))).unwrap();
                let ScopedPduData::Plaintext(scoped) = &opened.scoped_pdu_data else { panic!("no privacy in this fixture") };
                let oid = scoped.pdu.varbinds[0].oid.clone();
                let reply_scoped =
                    ScopedPdu::new(Vec::new(), Vec::new(), Pdu::response(scoped.pdu.request_id, 0, 0, vec![Vb::new(oid, Value::OctetString(b"v3 reply".to_vec()))]));
                let reply = V3Message {
                    msg_id: opened.msg_id,
                    msg_max_size: 65535,
                    flags: MsgFlags::new(auth.is_some(), false, false).unwrap(),
                    security_params: UsmSecurityParameters {
                        authoritative_engine_id: ENGINE_ID.to_vec(),
                        engine_boots: 1,
                        engine_time: 1000,
                        user_name: opened.security_params.user_name.clone(),
                        auth_params: Vec::new(),
                        priv_params: Vec::new(),
                    },
                    scoped_pdu_data: ScopedPduData::Plaintext(reply_scoped),
                };
                let wire = v3::seal(reply, auth.as_ref().map(|(p, k)| (*p, k.as_slice())));
                sock.send_to(&wire, src).await.unwrap();
                return;
            }
        });
        addr
    }

    fn request_id_of(msg: &V3Message) -> i32 {
        match &msg.scoped_pdu_data {
            ScopedPduData::Plaintext(scoped) => scoped.pdu.request_id,
            ScopedPduData::Encrypted(_) => 0,
        }
    }

    #[tokio::test]
    async fn discover_learns_engine_identity() {
        let addr = fake_v3_agent(None).await;
        let mut target = UserTarget::connect(addr, Credentials::no_auth_no_priv(b"user".to_vec()), RequestConfig::default())
            .await
            .unwrap();
        target.discover().await.unwrap();
        assert_eq!(target.state.engine_id, ENGINE_ID);
        assert_eq!(target.state.engine_boots, 1);
    }

    #[tokio::test]
    async fn no_auth_no_priv_get_round_trips_after_discovery() {
        let addr = fake_v3_agent(None).await;
        let mut target = UserTarget::connect(addr, Credentials::no_auth_no_priv(b"user".to_vec()), RequestConfig::default())
            .await
            .unwrap();
        let result = target.get(vec!["1.3.6.1.2.1.1.1.0".parse().unwrap()]).await.unwrap();
        assert_eq!(
            result.get(&"1.3.6.1.2.1.1.1.0".parse().unwrap()),
            Some(&Value::OctetString(b"v3 reply".to_vec()))
        );
    }

    #[tokio::test]
    async fn auth_no_priv_get_round_trips_with_valid_mac() {
        let key = b"maplesyrup".to_vec();
        let addr = fake_v3_agent(Some((AuthProtocol::Md5, {
            let localized = snmp_usm::localize::localize_password(AuthProtocol::Md5, &key, ENGINE_ID).unwrap();
            localized.to_vec()
        })))
        .await;
        let mut target = UserTarget::connect(
            addr,
            Credentials::auth_no_priv(b"user".to_vec(), AuthProtocol::Md5, key),
            RequestConfig::default(),
        )
        .await
        .unwrap();
        let result = target.get(vec!["1.3.6.1.2.1.1.1.0".parse().unwrap()]).await.unwrap();
        assert_eq!(
            result.get(&"1.3.6.1.2.1.1.1.0".parse().unwrap()),
            Some(&Value::OctetString(b"v3 reply".to_vec()))
        );
    }
}
