//! Header handling for proxied requests and responses.

use http::HeaderMap;

/// Hop-by-hop headers, plus `host` which is set from the proxy target instead.
fn is_hop_by_hop(name: &str) -> bool {
    name.eq_ignore_ascii_case("connection")
        || name.eq_ignore_ascii_case("keep-alive")
        || name.eq_ignore_ascii_case("proxy-authenticate")
        || name.eq_ignore_ascii_case("proxy-authorization")
        || name.eq_ignore_ascii_case("proxy-connection")
        || name.eq_ignore_ascii_case("te")
        || name.eq_ignore_ascii_case("trailer")
        || name.eq_ignore_ascii_case("trailers")
        || name.eq_ignore_ascii_case("transfer-encoding")
        || name.eq_ignore_ascii_case("upgrade")
        || name.eq_ignore_ascii_case("host")
}

/// Copies the client's end-to-end headers onto the outgoing request.
///
/// `content-length` is kept, so a streamed body of known size is not sent chunked.
pub(crate) fn apply_request_headers(
    headers: &HeaderMap,
    mut request_builder: reqwest::RequestBuilder,
) -> reqwest::RequestBuilder {
    for (name, value) in headers {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }

        request_builder = request_builder.header(name.clone(), value.clone());
    }

    request_builder
}

/// Keeps the backend's end-to-end headers for the response sent back to the client.
pub(crate) fn preserve_response_headers(backend_headers: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(backend_headers.len());

    for (name, value) in backend_headers {
        if !is_hop_by_hop(name.as_str()) {
            headers.append(name.clone(), value.clone());
        }
    }

    headers
}
