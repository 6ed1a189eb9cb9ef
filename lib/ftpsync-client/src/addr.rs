/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerAddrParseError {
    #[error("empty host")]
    EmptyHost,
    #[error("invalid port")]
    InvalidPort,
    #[error("invalid ipv6 host")]
    InvalidIpv6Host,
}

/// Address of the remote file server.
///
/// The host part is kept as the original string, it may be a domain name or
/// an IP address. A port value of 0 means no explicit port has been set.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ServerAddr {
    host: String,
    port: u16,
}

impl ServerAddr {
    pub fn new(host: &str, port: u16) -> Self {
        ServerAddr {
            host: host.to_string(),
            port,
        }
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[inline]
    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    /// Keep the host but use another port, as needed when deriving the
    /// passive data address from the control address.
    pub fn with_port(&self, port: u16) -> Self {
        ServerAddr {
            host: self.host.clone(),
            port,
        }
    }
}

impl From<SocketAddr> for ServerAddr {
    fn from(addr: SocketAddr) -> Self {
        ServerAddr {
            host: addr.ip().to_string(),
            port: addr.port(),
        }
    }
}

impl FromStr for ServerAddr {
    type Err = ServerAddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ServerAddrParseError::EmptyHost);
        }

        if let Some(r) = s.strip_prefix('[') {
            // [ipv6]:port or [ipv6]
            let Some((host, remaining)) = r.split_once(']') else {
                return Err(ServerAddrParseError::InvalidIpv6Host);
            };
            if IpAddr::from_str(host).is_err() {
                return Err(ServerAddrParseError::InvalidIpv6Host);
            }
            let port = match remaining.strip_prefix(':') {
                Some(p) => u16::from_str(p).map_err(|_| ServerAddrParseError::InvalidPort)?,
                None if remaining.is_empty() => 0,
                None => return Err(ServerAddrParseError::InvalidPort),
            };
            return Ok(ServerAddr::new(host, port));
        }

        match s.rsplit_once(':') {
            Some((host, port)) => {
                if host.contains(':') {
                    // bare ipv6 address without port
                    if IpAddr::from_str(s).is_err() {
                        return Err(ServerAddrParseError::InvalidIpv6Host);
                    }
                    Ok(ServerAddr::new(s, 0))
                } else if host.is_empty() {
                    Err(ServerAddrParseError::EmptyHost)
                } else {
                    let port = u16::from_str(port).map_err(|_| ServerAddrParseError::InvalidPort)?;
                    Ok(ServerAddr::new(host, port))
                }
            }
            None => Ok(ServerAddr::new(s, 0)),
        }
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_domain() {
        let addr = ServerAddr::from_str("ftp.example.net").unwrap();
        assert_eq!(addr.host(), "ftp.example.net");
        assert_eq!(addr.port(), 0);

        let addr = ServerAddr::from_str("ftp.example.net:2121").unwrap();
        assert_eq!(addr.host(), "ftp.example.net");
        assert_eq!(addr.port(), 2121);
    }

    #[test]
    fn parse_ipv6() {
        let addr = ServerAddr::from_str("[2001:db8::1]:21").unwrap();
        assert_eq!(addr.host(), "2001:db8::1");
        assert_eq!(addr.port(), 21);

        let addr = ServerAddr::from_str("2001:db8::1").unwrap();
        assert_eq!(addr.host(), "2001:db8::1");
        assert_eq!(addr.port(), 0);

        assert_eq!(addr.with_port(21).to_string(), "[2001:db8::1]:21");
    }

    #[test]
    fn parse_invalid() {
        assert!(ServerAddr::from_str("").is_err());
        assert!(ServerAddr::from_str(":21").is_err());
        assert!(ServerAddr::from_str("host:port").is_err());
        assert!(ServerAddr::from_str("[not-ipv6]:21").is_err());
    }

    #[test]
    fn from_socket_addr() {
        let sa = SocketAddr::from_str("192.0.2.10:2121").unwrap();
        let addr = ServerAddr::from(sa);
        assert_eq!(addr.host(), "192.0.2.10");
        assert_eq!(addr.port(), 2121);
    }
}
