//! Host rewriting and strict parsing of URIs.
//!
//! # Design
//! `rewrite_host` points an existing URI at another host while keeping its
//! scheme, path and query. It is built from three small rules, each exposed
//! on its own so it can be tested in isolation:
//!
//! - `authority_for`: an explicit port in the host specification wins,
//!   otherwise the original URI's explicit port (if any) is carried over.
//! - `scheme_or_default`: the original scheme, `http` when there is none.
//! - `query_suffix`: `?query` only when the original URI has a query.
//!
//! The fragment never survives: `http::Uri` drops it while parsing and HTTP
//! request targets carry none.
//!
//! `parse_strict` exists because `http::Uri` accepts authorities that are
//! fine as URI syntax but not as a server address (`exa_mple.com`, port
//! `99999`). Those are rejected up front rather than failing later in the
//! client engine.

use std::borrow::Cow;
use std::net::{Ipv4Addr, Ipv6Addr};

use http::uri::{InvalidUri, Uri};

use crate::error::{RelayError, Result};

const DEFAULT_SCHEME: &str = "http";

/// A caller-supplied target host, classified by whether it names a port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSpec<'a> {
    /// `host:port` or `[v6]:port`; used verbatim as the new authority.
    WithPort(&'a str),
    /// A host without a port; the original URI's port is inherited.
    HostOnly(Cow<'a, str>),
}

impl<'a> HostSpec<'a> {
    /// Classify `spec`.
    ///
    /// Exactly one colon means `host:port`. A bracketed IPv6 literal has a
    /// port only when `]` is followed by `:`. A bare IPv6 literal is treated
    /// as a host and bracketed so a port can follow it. Any other spec with
    /// several colons is malformed and passed through untouched as a host.
    pub fn parse(spec: &'a str) -> Self {
        if let Some(rest) = spec.strip_prefix('[') {
            return match rest.split_once(']') {
                Some((_, tail)) if tail.starts_with(':') => HostSpec::WithPort(spec),
                _ => HostSpec::HostOnly(Cow::Borrowed(spec)),
            };
        }

        match spec.split(':').count() {
            1 => HostSpec::HostOnly(Cow::Borrowed(spec)),
            2 => HostSpec::WithPort(spec),
            _ if spec.parse::<Ipv6Addr>().is_ok() => HostSpec::HostOnly(Cow::Owned(format!("[{spec}]"))),
            _ => HostSpec::HostOnly(Cow::Borrowed(spec)),
        }
    }
}

/// Authority for the rewritten URI.
pub fn authority_for(uri: &Uri, host_spec: &str) -> String {
    match HostSpec::parse(host_spec) {
        HostSpec::WithPort(authority) => authority.to_string(),
        HostSpec::HostOnly(host) => match uri.port_u16() {
            Some(port) => format!("{host}:{port}"),
            None => host.into_owned(),
        },
    }
}

pub fn scheme_or_default(uri: &Uri) -> &str {
    match uri.scheme_str() {
        Some(scheme) => scheme,
        None => DEFAULT_SCHEME,
    }
}

pub fn query_suffix(uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("?{query}"),
        None => String::new(),
    }
}

/// Rewrite the host (and possibly port) of `uri` to `host_spec`.
///
/// Never fails; a malformed `host_spec` yields a malformed URI string.
pub fn rewrite_host(uri: &Uri, host_spec: &str) -> String {
    let rewritten = format!(
        "{}://{}{}{}",
        scheme_or_default(uri),
        authority_for(uri, host_spec),
        uri.path(),
        query_suffix(uri)
    );
    tracing::debug!(original = %uri, host_spec, rewritten = %rewritten, "Rewrote URI host");
    rewritten
}

/// Parse `raw` and check that its authority, if any, names a usable server.
pub fn parse_strict(raw: &str) -> Result<Uri> {
    let uri: Uri = raw
        .parse()
        .map_err(|e: InvalidUri| RelayError::invalid_argument(raw, e))?;

    if let Some(authority) = uri.authority() {
        validate_server_authority(authority.as_str())
            .map_err(|reason| RelayError::invalid_argument(raw, reason))?;
    }
    Ok(uri)
}

fn validate_server_authority(authority: &str) -> std::result::Result<(), &'static str> {
    let host_port = match authority.rsplit_once('@') {
        Some((userinfo, rest)) => {
            if !is_userinfo(userinfo) {
                return Err("invalid userinfo");
            }
            rest
        }
        None => authority,
    };

    let (host, port) = split_host_port(host_port)?;
    if host.is_empty() {
        return Err("missing host");
    }

    if let Some(literal) = host.strip_prefix('[') {
        let literal = literal.strip_suffix(']').ok_or("unterminated IPv6 literal")?;
        literal.parse::<Ipv6Addr>().map_err(|_| "invalid IPv6 literal")?;
    } else if host.parse::<Ipv4Addr>().is_err() && !is_hostname(host) {
        return Err("invalid host");
    }

    match port {
        // An empty port after `:` is allowed by RFC 3986 and means "default".
        Some(port) if !port.is_empty() => {
            if port.len() > 5 || !port.bytes().all(|b| b.is_ascii_digit()) || port.parse::<u16>().is_err() {
                return Err("invalid port");
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn split_host_port(host_port: &str) -> std::result::Result<(&str, Option<&str>), &'static str> {
    if host_port.starts_with('[') {
        let end = host_port.find(']').ok_or("unterminated IPv6 literal")?;
        let (host, rest) = host_port.split_at(end + 1);
        return match rest {
            "" => Ok((host, None)),
            _ => rest
                .strip_prefix(':')
                .map(|port| (host, Some(port)))
                .ok_or("unexpected characters after IPv6 literal"),
        };
    }
    Ok(match host_port.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (host_port, None),
    })
}

/// DNS host name: dot separated labels of letters, digits and inner hyphens.
/// The last label must not start with a digit so `1.2.3` is not mistaken for
/// a name. One trailing dot is allowed.
fn is_hostname(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    let valid_labels = host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    });
    valid_labels
        && host
            .rsplit('.')
            .next()
            .and_then(|top| top.bytes().next())
            .is_some_and(|b| b.is_ascii_alphabetic())
}

/// `userinfo = *( unreserved / pct-encoded / sub-delims / ":" )`
fn is_userinfo(userinfo: &str) -> bool {
    let mut bytes = userinfo.bytes();
    while let Some(b) = bytes.next() {
        let valid = match b {
            b'%' => matches!(
                (bytes.next(), bytes.next()),
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            ),
            b':' => true,
            _ => is_unreserved_or_sub_delim(b),
        };
        if !valid {
            return false;
        }
    }
    true
}

fn is_unreserved_or_sub_delim(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'.' | b'_' | b'~' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
        )
}
