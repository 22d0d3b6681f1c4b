//! Client identity for admission control.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Identifier used when neither headers nor the peer address are available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derive the rate-limit key for a request.
///
/// With `trust_forwarded` set, checks proxy headers first:
/// 1. `X-Forwarded-For`, first entry of the comma-separated chain
/// 2. `X-Real-IP`
///
/// then falls back to the transport peer address.
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded: bool) -> String {
    let forwarded = trust_forwarded
        .then(|| {
            header_str(headers, "x-forwarded-for")
                .and_then(|s| s.split(',').next())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .or_else(|| {
                    header_str(headers, "x-real-ip")
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                })
        })
        .flatten();

    match (forwarded, peer) {
        (Some(id), _) => id.to_owned(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => UNKNOWN_CLIENT.to_owned(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    fn peer() -> Option<SocketAddr> {
        Some("192.0.2.7:51000".parse().unwrap())
    }

    #[test]
    fn forwarded_for_first_entry() {
        let h = headers(&[("x-forwarded-for", "203.0.113.50, 70.41.3.18")]);
        assert_eq!(client_id(&h, peer(), true), "203.0.113.50");
    }

    #[test]
    fn forwarded_for_beats_real_ip() {
        let h = headers(&[
            ("x-forwarded-for", "203.0.113.50"),
            ("x-real-ip", "198.51.100.42"),
        ]);
        assert_eq!(client_id(&h, peer(), true), "203.0.113.50");
    }

    #[test]
    fn real_ip_when_no_forwarded_for() {
        let h = headers(&[("x-real-ip", " 198.51.100.42 ")]);
        assert_eq!(client_id(&h, peer(), true), "198.51.100.42");
    }

    #[test]
    fn empty_headers_fall_back_to_peer() {
        let h = headers(&[("x-forwarded-for", " , 1.2.3.4"), ("x-real-ip", "")]);
        assert_eq!(client_id(&h, peer(), true), "192.0.2.7");
    }

    #[test]
    fn headers_ignored_when_untrusted() {
        let h = headers(&[("x-forwarded-for", "203.0.113.50")]);
        assert_eq!(client_id(&h, peer(), false), "192.0.2.7");
    }

    #[test]
    fn unknown_without_peer() {
        assert_eq!(client_id(&HeaderMap::new(), None, true), UNKNOWN_CLIENT);
    }
}
