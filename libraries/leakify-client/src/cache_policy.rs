//! Offline cache contract for the web front-end.
//!
//! Static assets may be served from cache and refreshed in the background.
//! Navigations, API calls and media streams always go to the network: they
//! carry session-bound tokens or are too large to keep.

/// Name of the current cache generation; bump to invalidate old caches
pub const CACHE_NAME: &str = "leakify-v16";

/// Assets precached at install time
pub const STATIC_ASSETS: &[&str] = &[
    "/static/style.css",
    "/static/script.js",
    "/static/manifest.json",
    "/static/icon-192.png",
    "/static/icon-512.png",
];

/// Path fragments that are never cached
const NETWORK_ONLY_MARKERS: &[&str] = &["/api/", "/play/", "/video/", "/static/videos/", "/splash"];

/// What kind of request the browser is making
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Top-level page navigation
    Navigation,
    /// Document fetched as a frame or similar
    Document,
    /// Anything else: scripts, styles, images, XHR
    Subresource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Serve from cache when present, revalidate in the background
    CacheFirst,
    /// Always hit the network, never store
    NetworkOnly,
}

/// Decide how a request for `path` should be served
pub fn classify(path: &str, kind: RequestKind) -> CachePolicy {
    if matches!(kind, RequestKind::Navigation | RequestKind::Document) {
        return CachePolicy::NetworkOnly;
    }
    if NETWORK_ONLY_MARKERS
        .iter()
        .any(|marker| path.contains(marker))
    {
        return CachePolicy::NetworkOnly;
    }
    CachePolicy::CacheFirst
}

/// Whether a response may be written to the cache.
///
/// Only complete same-origin answers are stored.
pub fn is_storable(status: u16, same_origin: bool) -> bool {
    status == 200 && same_origin
}
