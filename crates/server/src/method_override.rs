//! Let POST requests stand in for PUT/PATCH/DELETE.
//!
//! Clients that can only send GET/POST name the intended method in one of the
//! override headers or in a `_method` query parameter. Only POST is
//! rewritten. This runs before routing, so it wraps the whole `Router`.

use axum::extract::Request;
use axum::http::Method;

pub const OVERRIDE_HEADERS: [&str; 3] = ["x-http-method-override", "x-http-method", "x-method-override"];
pub const OVERRIDE_QUERY_PARAM: &str = "_method";

fn allowed(m: &Method) -> bool {
    [Method::PUT, Method::PATCH, Method::DELETE].contains(m)
}

fn parse(value: &str) -> Option<Method> {
    Method::from_bytes(value.trim().to_ascii_uppercase().as_bytes())
        .ok()
        .filter(allowed)
}

fn from_headers(req: &Request) -> Option<Method> {
    OVERRIDE_HEADERS.iter().find_map(|name| {
        req.headers()
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(parse)
    })
}

fn from_query(req: &Request) -> Option<Method> {
    req.uri().query()?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k == OVERRIDE_QUERY_PARAM { parse(v) } else { None }
    })
}

pub fn override_method(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }
    if let Some(m) = from_headers(&req).or_else(|| from_query(&req)) {
        tracing::debug!(to = %m, path = %req.uri().path(), "method_override");
        *req.method_mut() = m;
    }
    req
}
