use std::fmt;
use std::str::FromStr;

/// Transport scheme of a request or of a proxy.
///
/// Closed on purpose: anything other than `http` or `https` is rejected when
/// options are built, so the dispatcher never has to guess a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    #[must_use]
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    #[must_use]
    pub fn is_tls(self) -> bool {
        matches!(self, Scheme::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = crate::Error;

    /// Accepts `http`, `https`, and the trailing-colon forms `http:` / `https:`.
    fn from_str(s: &str) -> crate::Result<Self> {
        let trimmed = s.strip_suffix(':').unwrap_or(s);
        if trimmed.eq_ignore_ascii_case("http") {
            Ok(Scheme::Http)
        } else if trimmed.eq_ignore_ascii_case("https") {
            Ok(Scheme::Https)
        } else {
            Err(crate::error::bad_scheme(s))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Scheme;

    #[test]
    fn parses_known_schemes_case_insensitively() {
        assert_eq!("http".parse::<Scheme>().ok(), Some(Scheme::Http));
        assert_eq!("HTTPS:".parse::<Scheme>().ok(), Some(Scheme::Https));
    }

    #[test]
    fn rejects_unknown_schemes() {
        let err = "ftp".parse::<Scheme>().err();
        assert!(err.is_some_and(|e| e.is_builder()));
    }
}
