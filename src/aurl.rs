//! Absolute URL parsing and canonical re-serialization.

//! This intentionally covers only what anchor hrefs need: split an
//! absolute URL into its parts, reject strings that can't be one, and
//! print the canonical form (lowercased scheme and host, default port
//! elided, `/` for an empty path after an authority).

use kstring::KString;

use crate::url_encoding::{url_decode, UrlDecodingError};

#[derive(Debug, thiserror::Error)]
pub enum UrlParseError {
    #[error("missing URL scheme")]
    MissingScheme,
    #[error("invalid URL scheme {0:?}")]
    InvalidScheme(Box<String>),
    #[error("empty host")]
    EmptyHost,
    #[error("missing ']' in host")]
    UnterminatedIpv6Host,
    #[error("invalid port {0:?}")]
    InvalidPort(Box<String>),
    #[error("whitespace or control character in URL")]
    InvalidCharacter,
    #[error("invalid percent encoding: {0}")]
    InvalidPercentEncoding(#[from] UrlDecodingError),
}

fn is_scheme_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '+'
        || c == '-'
        || c == '.'
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "ws" => Some(80),
        "https" => Some(443),
        "wss" => Some(443),
        "ftp" => Some(21),
        _ => None
    }
}

/// The `userinfo@host:port` part of a URL. The port is `None` both
/// when absent and when it is the scheme's default port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authority {
    userinfo: Option<KString>,
    host: KString,
    port: Option<u16>,
}

impl Authority {
    pub fn host(&self) -> &str { &self.host }
    pub fn port(&self) -> Option<u16> { self.port }

    fn from_str(s: &str, scheme: &str) -> Result<Self, UrlParseError> {
        let (userinfo, hostport) = match s.rsplit_once('@') {
            Some((u, hp)) => (Some(KString::from_ref(u)), hp),
            None => (None, s)
        };
        let (host_raw, port_str) =
            if hostport.starts_with('[') {
                // IPv6 literal; the port separator can only come
                // after the closing bracket.
                let close = hostport.find(']').ok_or(
                    UrlParseError::UnterminatedIpv6Host)?;
                let rest = &hostport[close + 1..];
                match rest.strip_prefix(':') {
                    Some(p) => (&hostport[..close + 1], p),
                    None => (hostport, "")
                }
            } else {
                match hostport.rsplit_once(':') {
                    Some((h, p)) => (h, p),
                    None => (hostport, "")
                }
            };
        // Schemes with a default port require a host; others
        // (e.g. file) may have an empty one.
        if host_raw.is_empty() && default_port(scheme).is_some() {
            return Err(UrlParseError::EmptyHost);
        }
        let port =
            if port_str.is_empty() {
                None
            } else {
                let port: u16 = port_str.parse().map_err(
                    |_| UrlParseError::InvalidPort(
                        Box::new(port_str.to_string())))?;
                if Some(port) == default_port(scheme) {
                    None
                } else {
                    Some(port)
                }
            };
        Ok(Authority {
            userinfo,
            host: KString::from_string(host_raw.to_ascii_lowercase()),
            port,
        })
    }
}

/// An absolute URL, i.e. one carrying a scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AUrl {
    scheme: KString,
    authority: Option<Authority>,
    path: KString,
    query: Option<KString>,
    fragment: Option<KString>,
}

impl AUrl {
    pub fn scheme(&self) -> &str { &self.scheme }
    pub fn authority(&self) -> Option<&Authority> { self.authority.as_ref() }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn fragment(&self) -> Option<&str> { self.fragment.as_deref() }

    pub fn from_str(s: &str) -> Result<Self, UrlParseError> {
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(UrlParseError::InvalidCharacter);
        }
        let colon = s.find(':').ok_or(UrlParseError::MissingScheme)?;
        let scheme_raw = &s[..colon];
        {
            let mut chars = scheme_raw.chars();
            let valid = match chars.next() {
                Some(c0) => is_scheme_start(c0) && chars.all(is_scheme_char),
                None => false
            };
            if !valid {
                return Err(UrlParseError::InvalidScheme(
                    Box::new(scheme_raw.to_string())));
            }
        }
        let scheme = scheme_raw.to_ascii_lowercase();
        let rest = &s[colon + 1..];
        let (authority, rest) =
            if let Some(rest) = rest.strip_prefix("//") {
                let end = rest.find(|c| c == '/' || c == '?' || c == '#')
                    .unwrap_or(rest.len());
                (Some(Authority::from_str(&rest[..end], &scheme)?),
                 &rest[end..])
            } else {
                (None, rest)
            };
        let (rest, fragment) = match rest.split_once('#') {
            Some((r, f)) => (r, Some(f)),
            None => (rest, None)
        };
        let (path, query) = match rest.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (rest, None)
        };
        url_decode(path)?;
        if let Some(q) = query { url_decode(q)?; }
        if let Some(f) = fragment { url_decode(f)?; }
        Ok(AUrl {
            scheme: KString::from_string(scheme),
            authority,
            path: KString::from_ref(path),
            query: query.map(KString::from_ref),
            fragment: fragment.map(KString::from_ref),
        })
    }
}

impl From<&AUrl> for String {
    fn from(u: &AUrl) -> Self {
        let mut s = String::new();
        s.push_str(&u.scheme);
        s.push(':');
        if let Some(authority) = &u.authority {
            s.push_str("//");
            if let Some(userinfo) = &authority.userinfo {
                s.push_str(userinfo);
                s.push('@');
            }
            s.push_str(&authority.host);
            if let Some(port) = authority.port {
                s.push(':');
                s.push_str(&port.to_string());
            }
            if u.path.is_empty() {
                s.push('/');
            }
        }
        s.push_str(&u.path);
        if let Some(query) = &u.query {
            s.push('?');
            s.push_str(query);
        }
        if let Some(fragment) = &u.fragment {
            s.push('#');
            s.push_str(fragment);
        }
        s
    }
}

impl From<AUrl> for String {
    fn from(u: AUrl) -> Self {
        Self::from(&u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> String {
        String::from(&AUrl::from_str(s).expect("not to fail"))
    }

    fn e(s: &str) -> UrlParseError {
        AUrl::from_str(s).expect_err("to fail")
    }

    #[test]
    fn t_canonical() {
        assert_eq!(t("https://example.com/x"), "https://example.com/x");
        assert_eq!(t("HTTPS://Example.COM"), "https://example.com/");
        assert_eq!(t("HTTPS://Example.COM:443"), "https://example.com/");
        assert_eq!(t("http://example.com:8080/a"), "http://example.com:8080/a");
        assert_eq!(t("http://user@example.com/"), "http://user@example.com/");
        assert_eq!(t("http://[::1]:80/x"), "http://[::1]/x");
        assert_eq!(t("http://[::1]:8080"), "http://[::1]:8080/");
        assert_eq!(t("https://example.com/x?a=1&b=2#frag"),
                   "https://example.com/x?a=1&b=2#frag");
        assert_eq!(t("mailto:a@b.com"), "mailto:a@b.com");
        assert_eq!(t("tel:+15551234567"), "tel:+15551234567");
        assert_eq!(t("file:///etc/passwd"), "file:///etc/passwd");
    }

    #[test]
    fn t_errors() {
        assert!(matches!(e("not a url"), UrlParseError::InvalidCharacter));
        assert!(matches!(e("noturl"), UrlParseError::MissingScheme));
        assert!(matches!(e("1http://x/"), UrlParseError::InvalidScheme(_)));
        assert!(matches!(e("://x/"), UrlParseError::InvalidScheme(_)));
        assert!(matches!(e("http://"), UrlParseError::EmptyHost));
        assert!(matches!(e("http://user@"), UrlParseError::EmptyHost));
        assert!(matches!(e("http://x:70000/"), UrlParseError::InvalidPort(_)));
        assert!(matches!(e("http://x:8x/"), UrlParseError::InvalidPort(_)));
        assert!(matches!(e("http://[::1/"), UrlParseError::UnterminatedIpv6Host));
        assert!(matches!(e("http://x/100%"),
                         UrlParseError::InvalidPercentEncoding(_)));
        assert!(matches!(e("http://x/a b"), UrlParseError::InvalidCharacter));
    }

    #[test]
    fn t_accessors() {
        let u = AUrl::from_str("https://User@Example.COM:444/x?q=1#f").unwrap();
        assert_eq!(u.scheme(), "https");
        let a = u.authority().unwrap();
        assert_eq!(a.host(), "example.com");
        assert_eq!(a.port(), Some(444));
        assert_eq!(u.path(), "/x");
        assert_eq!(u.query(), Some("q=1"));
        assert_eq!(u.fragment(), Some("f"));
    }
}
