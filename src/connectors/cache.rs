#[cfg(feature = "db-redis")]
use crate::error::Context;
use crate::error::Result;

/// Opens a throwaway client for `url`, sends `PING`, and returns the raw reply.
///
/// Nothing is pooled: the client and its connection are dropped before returning.
#[cfg(feature = "db-redis")]
pub async fn ping(url: &str) -> Result<String> {
    let client = redis::Client::open(url).context("invalid redis connection string")?;
    let mut conn = client
        .get_multiplexed_async_connection()
        .await
        .context("failed to connect to redis")?;
    let reply: String = redis::cmd("PING")
        .query_async(&mut conn)
        .await
        .context("redis PING failed")?;
    Ok(reply)
}

#[cfg(not(feature = "db-redis"))]
pub async fn ping(_url: &str) -> Result<String> {
    Err(crate::err!(
        "cache support requires the `db-redis` feature at compile time"
    ))
}

/// `PING` answers `PONG` on a healthy server.
pub fn is_pong(reply: &str) -> bool {
    reply.eq_ignore_ascii_case("PONG")
}
