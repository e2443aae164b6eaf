/**
 * URL resolution for hits.
 *
 * The collector wants absolute URLs in `page-url` and `page-ref`, while
 * callers usually have paths (`/file.zip`) or whatever the `Referer`
 * header held. Both functions here are total: they never fail, and an
 * empty input yields an empty output which the encoder then omits.
 */
use std::net::Ipv4Addr;

use tracing::debug;
use url::Url;

use crate::context::RequestContext;

/**
 * Builds the absolute URL of the inbound request.
 *
 * `https` when the inbound connection was TLS, `http` otherwise, followed by
 * the host and the request URI. An empty request URI gives `scheme://host`.
 */
pub fn current_url(ctx: &RequestContext) -> String {
    let scheme = if ctx.secure { "https" } else { "http" };
    let uri = ctx.request_uri.as_str();

    if uri.is_empty() || uri.starts_with('/') {
        format!("{scheme}://{}{uri}", ctx.host)
    } else {
        format!("{scheme}://{}/{uri}", ctx.host)
    }
}

/**
 * Resolves `candidate` into an absolute URL using `base`.
 *
 * Rules, first match wins:
 * 1. empty candidate → empty string;
 * 2. candidate with a scheme (`https:`, `goal:`, `mailto:` ...) → unchanged;
 * 3. protocol-relative `//host/path` → `http:` prefixed;
 * 4. bare host such as `example.com/x` → `http://` prefixed (a lone
 *    `name.ext` is a file name, not a host);
 * 5. anything else is a path on the origin (`scheme://host[:port]`) of `base`.
 *
 * `base` must be an absolute URL, normally from [`current_url`]. When it
 * cannot be parsed the candidate is returned as given.
 */
pub fn absolute_url(candidate: &str, base: &str) -> String {
    if candidate.is_empty() {
        return String::new();
    }

    if has_scheme(candidate) {
        return candidate.to_string();
    }

    if candidate.starts_with("//") {
        return format!("http:{candidate}");
    }

    if has_bare_host(candidate) {
        return format!("http://{candidate}");
    }

    let Some(origin) = origin_of(base) else {
        debug!(base, candidate, "base URL has no origin, leaving candidate unresolved");
        return candidate.to_string();
    };

    if candidate.starts_with(['/', '?', '#']) {
        format!("{origin}{candidate}")
    } else {
        format!("{origin}/{candidate}")
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `scheme ":"` prefix where scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" )`.
/// Dots are rejected so `example.com:8080` reads as a host, not a scheme.
fn has_scheme(candidate: &str) -> bool {
    let Some((scheme, _)) = candidate.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-')
}

/**
 * Whether the first segment of `candidate` is a domain name or IPv4
 * address, optionally with a port: `www.example.com`, `a.b:8080`,
 * `example.com/x`, `10.0.0.1`.
 *
 * A lone two-label name with nothing after it (`report.pdf`, `example.com`)
 * reads as a file name relative to the base.
 */
fn has_bare_host(candidate: &str) -> bool {
    if candidate.starts_with(['/', '.', '?', '#']) {
        return false;
    }

    let authority = candidate
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    let host = match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => host,
        Some(_) => return false,
        None => authority,
    };
    let lone = host.len() == candidate.len();

    if host.parse::<Ipv4Addr>().is_ok() {
        return true;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || (lone && labels.len() == 2) {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    });

    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.bytes().all(|b| b.is_ascii_alphabetic()));

    labels_ok && tld_ok
}

/// `scheme://host[:port]` of an absolute URL. The port is kept only when
/// it differs from the scheme default.
fn origin_of(base: &str) -> Option<String> {
    let parsed = Url::parse(base).ok()?;
    let host = parsed.host_str()?;

    Some(match parsed.port() {
        Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
        None => format!("{}://{host}", parsed.scheme()),
    })
}
