// src/factories/client.rs

//! Connection parameters handed to whatever Redis client a test uses.

use std::path::PathBuf;

use crate::config::RedisConfig;
use crate::executor::{Endpoint, Executor};

/// Everything a client needs: where the server is, which database, and
/// whether to decode replies into strings.
///
/// Clients should prefer `unixsocket` when it is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientParams {
    pub host: String,
    pub port: u16,
    pub db: u32,
    pub username: Option<String>,
    pub password: Option<String>,
    pub unixsocket: Option<PathBuf>,
    pub decode: bool,
}

impl ClientParams {
    pub fn from_endpoint(endpoint: &Endpoint, db: u32, decode: bool) -> Self {
        Self {
            host: endpoint.host.clone(),
            port: endpoint.port,
            db,
            username: endpoint.username.clone(),
            password: endpoint.password.clone(),
            unixsocket: endpoint.unixsocket.clone(),
            decode,
        }
    }

    /// `decode` falls back to the config value when not given.
    pub fn for_executor(
        executor: &dyn Executor,
        config: &RedisConfig,
        db: u32,
        decode: Option<bool>,
    ) -> Self {
        Self::from_endpoint(executor.endpoint(), db, decode.unwrap_or(config.decode))
    }

    /// TCP connection URL, `redis://[user[:pass]@]host:port/db`.
    pub fn url(&self) -> String {
        format!(
            "redis://{}{}:{}/{}",
            self.userinfo(),
            self.host,
            self.port,
            self.db
        )
    }

    /// `unix://[user[:pass]@]/path/to.sock?db=N` when a socket is known.
    pub fn unix_url(&self) -> Option<String> {
        let socket = self.unixsocket.as_ref()?;
        Some(format!(
            "unix://{}{}?db={}",
            self.userinfo(),
            socket.display(),
            self.db
        ))
    }

    fn userinfo(&self) -> String {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => format!("{user}:{pass}@"),
            (Some(user), None) => format!("{user}@"),
            (None, Some(pass)) => format!(":{pass}@"),
            (None, None) => String::new(),
        }
    }
}
