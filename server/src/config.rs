use anyhow::{anyhow, Context};
use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};
use tracing::info;

pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub pool_max_size: u32,
    pub connection_timeout: Duration,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        Ok(Self {
            database_url,
            bind_addr: try_load(&lookup, "BIND_ADDR", "0.0.0.0:3000")?,
            pool_max_size: try_load(&lookup, "DB_POOL_MAX_SIZE", "10")?,
            connection_timeout: Duration::from_secs(try_load(
                &lookup,
                "DB_CONNECTION_TIMEOUT_SECS",
                "5",
            )?),
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}
