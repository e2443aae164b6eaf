/*!
 * Metrika HTTP addon — request context from `http` types.
 *
 * Most Rust web frameworks (axum, hyper, tower-based stacks) hand out
 * `http::Request` values. This crate reads the fields a hit needs out of
 * one and returns a `metrika_core::RequestContext`:
 *
 * | Context field | Source |
 * |---|---|
 * | `secure` | URI scheme `https`, or `X-Forwarded-Proto: https` |
 * | `host` | `Host` header, else the URI authority |
 * | `request_uri` | URI path and query |
 * | `referrer` | `Referer` header |
 * | `real_ip` | `X-Real-IP`, else the first `X-Forwarded-For` entry |
 * | `user_agent` | `User-Agent` header |
 *
 * Header values that are not valid UTF-8 are treated as missing.
 */

pub use http;

use http::header::{HeaderMap, HOST, REFERER, USER_AGENT};
use http::request::Parts;
use http::{Request, Uri};
use metrika_core::RequestContext;

const X_REAL_IP: &str = "x-real-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Builds a context from a full request. The body is not touched.
pub fn context_from_request<B>(request: &Request<B>) -> RequestContext {
    context_from(request.uri(), request.headers())
}

/// Builds a context from request parts, e.g. inside an axum extractor.
pub fn context_from_parts(parts: &Parts) -> RequestContext {
    context_from(&parts.uri, &parts.headers)
}

fn context_from(uri: &Uri, headers: &HeaderMap) -> RequestContext {
    let secure = uri.scheme_str() == Some("https")
        || header(headers, X_FORWARDED_PROTO)
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"));

    let host = header(headers, HOST.as_str())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_default();

    let request_uri = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .filter(|pq| !pq.is_empty())
        .unwrap_or_else(|| "/".to_string());

    RequestContext {
        secure,
        host,
        request_uri,
        referrer: header(headers, REFERER.as_str()).unwrap_or_default().to_string(),
        real_ip: real_ip(headers).unwrap_or_default().to_string(),
        user_agent: header(headers, USER_AGENT.as_str())
            .unwrap_or_default()
            .to_string(),
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn real_ip(headers: &HeaderMap) -> Option<&str> {
    header(headers, X_REAL_IP)
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            header(headers, X_FORWARDED_FOR)
                .and_then(|chain| chain.split(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
}
