pub mod config;
pub mod logging;

pub mod batch;
pub mod cache_key;
pub mod fetch;
pub mod record;
pub mod retry;
pub mod storage;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;
