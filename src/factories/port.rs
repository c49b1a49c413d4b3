// src/factories/port.rs

//! Turning a port request into one concrete, currently free port.

use std::collections::BTreeSet;
use std::fmt;
use std::net::{Ipv4Addr, TcpListener};
use std::str::FromStr;

use crate::errors::{FixtureError, Result};

/// What a fixture asked for.
///
/// String forms: `"8000"` (fixed), `""` or `"random"` (any free port),
/// `"2000-3000"` (inclusive range), `"4002,4003"` (set).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSpec {
    Fixed(u16),
    Random,
    Range(u16, u16),
    Set(BTreeSet<u16>),
}

impl PortSpec {
    /// Pick a port.
    ///
    /// `Fixed` is returned as is, without checking. `Random` asks the kernel.
    /// `Range` and `Set` return the first candidate that can be bound right
    /// now on the loopback interface.
    pub fn resolve(&self) -> Result<u16> {
        match self {
            PortSpec::Fixed(port) => Ok(*port),
            PortSpec::Random => {
                let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
                Ok(listener.local_addr()?.port())
            }
            PortSpec::Range(low, high) => (*low..=*high)
                .find(|port| is_free(*port))
                .ok_or_else(|| FixtureError::NoFreePort(self.to_string())),
            PortSpec::Set(ports) => ports
                .iter()
                .copied()
                .find(|port| is_free(*port))
                .ok_or_else(|| FixtureError::NoFreePort(self.to_string())),
        }
    }
}

fn is_free(port: u16) -> bool {
    port != 0 && TcpListener::bind((Ipv4Addr::LOCALHOST, port)).is_ok()
}

impl FromStr for PortSpec {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || FixtureError::ConfigError(format!("invalid port specification: {s:?}"));
        let port = |part: &str| part.trim().parse::<u16>().map_err(|_| invalid());

        if s.is_empty() || s.eq_ignore_ascii_case("random") {
            return Ok(PortSpec::Random);
        }

        if let Some((low, high)) = s.split_once('-') {
            let (low, high) = (port(low)?, port(high)?);
            if low > high {
                return Err(invalid());
            }
            return Ok(PortSpec::Range(low, high));
        }

        if s.contains(',') {
            let ports = s
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(port)
                .collect::<Result<BTreeSet<_>>>()?;
            if ports.is_empty() {
                return Err(invalid());
            }
            return Ok(PortSpec::Set(ports));
        }

        Ok(PortSpec::Fixed(port(s)?))
    }
}

impl From<u16> for PortSpec {
    fn from(port: u16) -> Self {
        PortSpec::Fixed(port)
    }
}

impl From<Option<u16>> for PortSpec {
    fn from(port: Option<u16>) -> Self {
        port.map_or(PortSpec::Random, PortSpec::Fixed)
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Fixed(port) => write!(f, "{port}"),
            PortSpec::Random => f.write_str("random"),
            PortSpec::Range(low, high) => write!(f, "{low}-{high}"),
            PortSpec::Set(ports) => {
                let parts: Vec<String> = ports.iter().map(u16::to_string).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}
