use std::net::IpAddr;

use crate::error::SourceError;

/// What: Decide whether an address belongs to a local network.
///
/// Inputs:
/// - `ip`: Resolved address
///
/// Output:
/// - `true` for loopback, RFC 1918, link-local, CGNAT and IPv6 unique-local addresses.
#[must_use]
pub fn is_lan_address(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, ..] = v4.octets();
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || (a == 100 && (64..=127).contains(&b))
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

/// What: Find the LAN cache serving `cdn_host`.
///
/// Inputs:
/// - `cdn_host`: Host name chunks are normally fetched from
/// - `configured`: Explicit cache address from settings, if any
///
/// Output:
/// - Address to send chunk requests to.
///
/// # Errors
/// - `CacheUnreachable` when the configured address does not parse, the host
///   does not resolve, or it resolves only to public addresses (meaning no
///   cache is intercepting DNS).
///
/// Details:
/// - A cache in front of the CDN answers DNS for the CDN host with its own
///   LAN address; that is how it gets the traffic.
pub async fn resolve_cache_address(
    cdn_host: &str,
    configured: Option<&str>,
) -> Result<IpAddr, SourceError> {
    if let Some(raw) = configured {
        return raw.trim().parse::<IpAddr>().map_err(|e| {
            SourceError::cache_unreachable(format!("configured cache_server '{raw}' is invalid: {e}"))
        });
    }
    let addrs: Vec<IpAddr> = tokio::net::lookup_host((cdn_host, 80))
        .await
        .map_err(|e| {
            SourceError::cache_unreachable(format!("could not resolve {cdn_host}: {e}"))
        })?
        .map(|sa| sa.ip())
        .collect();
    tracing::debug!(host = cdn_host, addrs = ?addrs, "[Transfer] Resolved CDN host");
    addrs.into_iter().find(|ip| is_lan_address(*ip)).ok_or_else(|| {
        SourceError::cache_unreachable(format!(
            "{cdn_host} resolves to a public address; no LAN cache is intercepting it"
        ))
    })
}
