use std::{fmt, net::Ipv6Addr, str::FromStr};

pub const DEFAULT_PORT: u16 = 25565;

/// Server to query. `host` is sent verbatim in the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseTargetError {
    #[error("empty input")]
    Empty,
    #[error("invalid port: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
    #[error("missing closing ']' for IPv6 literal")]
    MissingClosingBracket,
    #[error("unexpected text after IPv6 literal")]
    TrailingText,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parses `host`, `host:port`, `[v6]`, `[v6]:port` or a bare IPv6 literal.
    ///
    /// A missing port falls back to `default_port`.
    pub fn parse_with_default(s: &str, default_port: u16) -> Result<Self, ParseTargetError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseTargetError::Empty);
        }

        if let Some(rest) = s.strip_prefix('[') {
            let close = rest.find(']').ok_or(ParseTargetError::MissingClosingBracket)?;
            let host = &rest[..close];
            let port = match &rest[close + 1..] {
                "" => default_port,
                tail => tail
                    .strip_prefix(':')
                    .ok_or(ParseTargetError::TrailingText)?
                    .parse()?,
            };
            if host.is_empty() {
                return Err(ParseTargetError::Empty);
            }
            return Ok(Self::new(host, port));
        }

        // More than one colon without brackets can only be an IPv6 literal.
        if s.parse::<Ipv6Addr>().is_ok() {
            return Ok(Self::new(s, default_port));
        }

        match s.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => Ok(Self::new(host, port.parse()?)),
            Some(_) => Err(ParseTargetError::Empty),
            None => Ok(Self::new(s, default_port)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Target {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::parse_with_default(s, DEFAULT_PORT)
    }
}
