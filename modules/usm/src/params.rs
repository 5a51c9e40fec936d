//! Client-side cache of per-agent SNMPv3 state.
//!
//! Created empty, populated by a discovery exchange, and otherwise mutated
//! only by explicit configuration or engineTime progression on ordinary
//! replies — never by arbitrary reply content.

use crate::protocol::{AuthProtocol, PrivProtocol};
use snmp_core::{Result, SnmpError, UsmErrorKind};
use std::time::Instant;
use zeroize::Zeroizing;

/// A cached request requires re-discovery once its engineTime snapshot is
/// older than this. Ten times RFC 3414 §3.2's 150s window — a deliberate
/// deviation (see DESIGN.md).
pub const TIME_WINDOW_SECS: u64 = 1_500;

pub const DEFAULT_MAX_MESSAGE_SIZE: u32 = 65_535;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_name: Vec<u8>,
    pub auth: Option<(AuthProtocol, Vec<u8>)>,
    pub priv_: Option<(PrivProtocol, Vec<u8>)>,
}

impl Credentials {
    pub fn no_auth_no_priv(user_name: impl Into<Vec<u8>>) -> Self {
        Self { user_name: user_name.into(), auth: None, priv_: None }
    }

    pub fn auth_no_priv(user_name: impl Into<Vec<u8>>, auth: AuthProtocol, secret: impl Into<Vec<u8>>) -> Self {
        Self { user_name: user_name.into(), auth: Some((auth, secret.into())), priv_: None }
    }

    pub fn auth_priv(
        user_name: impl Into<Vec<u8>>,
        auth: AuthProtocol,
        auth_secret: impl Into<Vec<u8>>,
        priv_proto: PrivProtocol,
        priv_secret: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            auth: Some((auth, auth_secret.into())),
            priv_: Some((priv_proto, priv_secret.into())),
        }
    }

    pub fn wants_auth(&self) -> bool {
        self.auth.is_some()
    }

    pub fn wants_priv(&self) -> bool {
        self.priv_.is_some()
    }
}

#[derive(Debug, Default)]
struct CachedKeys {
    auth_key: Option<Zeroizing<Vec<u8>>>,
    priv_key: Option<Zeroizing<Vec<u8>>>,
    for_engine_id: Vec<u8>,
}

/// Per-agent v3 state: engine identity/clock, credentials, cached localized
/// keys, and negotiated framing parameters.
pub struct SecureAgentParameters {
    pub engine_id: Vec<u8>,
    pub engine_boots: u32,
    pub engine_time: u32,
    /// Wall-clock instant at which `engine_boots`/`engine_time` were observed.
    observed_at: Option<Instant>,
    pub credentials: Credentials,
    pub context_engine_id: Vec<u8>,
    pub context_name: Vec<u8>,
    pub max_message_size: u32,
    pub reportable: bool,
    cached: CachedKeys,
}

impl SecureAgentParameters {
    /// An empty instance, as created before discovery.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            engine_id: Vec::new(),
            engine_boots: 0,
            engine_time: 0,
            observed_at: None,
            credentials,
            context_engine_id: Vec::new(),
            context_name: Vec::new(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            reportable: true,
            cached: CachedKeys::default(),
        }
    }

    pub fn is_discovered(&self) -> bool {
        !self.engine_id.is_empty()
    }

    /// Record engine identity/clock learned from a discovery Report or an
    /// authenticated reply.
    pub fn observe_engine(&mut self, engine_id: &[u8], boots: u32, time: u32) {
        if self.engine_id != engine_id {
            self.cached = CachedKeys::default();
        }
        self.engine_id = engine_id.to_vec();
        self.engine_boots = boots;
        self.engine_time = time;
        self.observed_at = Some(Instant::now());
    }

    /// Clamp `max_message_size` to the smaller of the peer's advertised
    /// value and ours.
    pub fn negotiate_max_message_size(&mut self, peer_max: u32) {
        self.max_message_size = self.max_message_size.min(peer_max);
    }

    /// True if the cached engineTime snapshot is still within the validity
    /// window.
    fn is_time_fresh(&self) -> bool {
        match self.observed_at {
            Some(stamp) => stamp.elapsed().as_secs() < TIME_WINDOW_SECS,
            None => false,
        }
    }

    /// The engineTime to submit on the next outgoing message: the cached
    /// value advanced by wall-clock elapsed seconds plus one.
    /// Returns an error if re-discovery is required.
    pub fn submitted_engine_time(&self) -> Result<u32> {
        let stamp = self.observed_at.ok_or(SnmpError::usm(UsmErrorKind::EngineTimeOutsideWindow))?;
        if !self.is_time_fresh() {
            return Err(SnmpError::usm(UsmErrorKind::EngineTimeOutsideWindow));
        }
        let elapsed = stamp.elapsed().as_secs() as u32;
        Ok(self.engine_time.wrapping_add(elapsed).wrapping_add(1))
    }

    /// The localized authentication key, computing and caching it on first
    /// use against the current engineId.
    pub fn auth_key(&mut self) -> Result<Option<Zeroizing<Vec<u8>>>> {
        let Some((proto, secret)) = self.credentials.auth.clone() else { return Ok(None) };
        self.refresh_cache_if_stale();
        if self.cached.auth_key.is_none() {
            let key = crate::localize::localize_password(proto, &secret, &self.engine_id)?;
            self.cached.auth_key = Some(key);
            self.cached.for_engine_id = self.engine_id.clone();
        }
        Ok(self.cached.auth_key.clone())
    }

    /// The localized (and extended, if the privacy protocol needs more
    /// material than the auth protocol produces) privacy key.
    pub fn priv_key(&mut self) -> Result<Option<Zeroizing<Vec<u8>>>> {
        let Some((priv_proto, secret)) = self.credentials.priv_.clone() else { return Ok(None) };
        let Some((auth_proto, _)) = self.credentials.auth.clone() else {
            return Err(SnmpError::usm(UsmErrorKind::UnsupportedNoAuthPriv));
        };
        self.refresh_cache_if_stale();
        if self.cached.priv_key.is_none() {
            let base = crate::localize::localize_password(auth_proto, &secret, &self.engine_id)?;
            let needed = priv_proto.key_material_len();
            let extended = if base.len() >= needed {
                Zeroizing::new(base[..needed].to_vec())
            } else {
                crate::localize::extend_key(auth_proto, &base, &self.engine_id, needed)
            };
            self.cached.priv_key = Some(extended);
            self.cached.for_engine_id = self.engine_id.clone();
        }
        Ok(self.cached.priv_key.clone())
    }

    fn refresh_cache_if_stale(&mut self) {
        if self.cached.for_engine_id != self.engine_id {
            self.cached = CachedKeys::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_after_discovery_stale_before() {
        let params = SecureAgentParameters::new(Credentials::no_auth_no_priv(b"user".to_vec()));
        assert!(!params.is_time_fresh());
        assert!(params.submitted_engine_time().is_err());
    }

    #[test]
    fn submitted_engine_time_advances_by_one_at_minimum() {
        let mut params = SecureAgentParameters::new(Credentials::no_auth_no_priv(b"user".to_vec()));
        params.observe_engine(b"engine-1", 1, 1000);
        let submitted = params.submitted_engine_time().unwrap();
        assert!(submitted >= 1001);
    }

    #[test]
    fn auth_key_is_cached_and_invalidated_on_engine_change() {
        let mut params = SecureAgentParameters::new(Credentials::auth_no_priv(
            b"user".to_vec(),
            AuthProtocol::Md5,
            b"maplesyrup".to_vec(),
        ));
        params.observe_engine(&hex::decode("000000000000000000000002").unwrap(), 0, 0);
        let k1 = params.auth_key().unwrap().unwrap();
        let k2 = params.auth_key().unwrap().unwrap();
        assert_eq!(k1.as_slice(), k2.as_slice());
        params.observe_engine(b"different-engine-id!", 0, 0);
        let k3 = params.auth_key().unwrap().unwrap();
        assert_ne!(k1.as_slice(), k3.as_slice());
    }

    #[test]
    fn priv_without_auth_is_rejected() {
        let mut params = SecureAgentParameters::new(Credentials {
            user_name: b"user".to_vec(),
            auth: None,
            priv_: Some((PrivProtocol::Aes128, b"secretsecret".to_vec())),
        });
        params.observe_engine(b"engine-1", 0, 0);
        assert!(params.priv_key().is_err());
    }
}
