pub mod http_fetcher;
pub mod yahoo_finance;

/// User agent sent with every outgoing request.
pub(crate) const USER_AGENT: &str = concat!("mfpick/", env!("CARGO_PKG_VERSION"));
