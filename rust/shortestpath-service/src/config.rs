use anyhow::Context;
use std::env;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;

pub const DEFAULT_MAX_SEARCHES: usize = 256;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Background searches kept addressable at once; the least recently used is dropped first.
    pub max_searches: NonZeroUsize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("SHORTESTPATH_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("SHORTESTPATH_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        let db_path = env::var("SHORTESTPATH_DB").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("world.db"));
        let max_searches = env::var("SHORTESTPATH_MAX_SEARCHES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .and_then(NonZeroUsize::new)
            .or_else(|| NonZeroUsize::new(DEFAULT_MAX_SEARCHES))
            .context("search registry capacity must be positive")?;

        Ok(Self { host, port, db_path, max_searches })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
