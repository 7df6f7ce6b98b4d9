use async_trait::async_trait;
use std::time::Duration;

use crate::services::cache::client::{CacheClient, CacheError, CacheResult};

/// Valkey/Redis-backend cache client.
///
/// Shares the signing certificate across authorizer processes (GET, SET NX [EX]).
#[derive(Clone, Debug)]
pub struct ValkeyClient {
    manager: redis::aio::ConnectionManager,
}

impl ValkeyClient {
    // Create a Valkey client from a URL like `redis://localhost:6379`
    pub async fn new(url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::BackendConnection(e.to_string()))?;

        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| CacheError::BackendConnection(e.to_string()))?;

        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheClient for ValkeyClient {
    fn backend_name(&self) -> &'static str {
        "valkey"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.manager.clone();

        let resp: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))?;

        Ok(resp)
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> CacheResult<bool> {
        // `OK` if set, Nil if the key already exists
        let mut conn = self.manager.clone();

        let resp: Option<String> = set_nx_command(key, value, ttl)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))?;

        Ok(resp.is_some())
    }
}

/// `SET key value NX [EX <seconds>]`. EX takes whole seconds, so sub-second TTLs round up to 1.
fn set_nx_command(key: &str, value: &str, ttl: Option<Duration>) -> redis::Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(key).arg(value).arg("NX");

    if let Some(ttl) = ttl {
        cmd.arg("EX").arg(ttl.as_secs().max(1));
    }

    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed(cmd: &redis::Cmd) -> String {
        String::from_utf8(cmd.get_packed_command()).unwrap()
    }

    #[test]
    fn pinned_slot_has_no_expiry() {
        let cmd = set_nx_command("authorizer:certificate", "pem", None);
        assert_eq!(
            packed(&cmd),
            "*4\r\n$3\r\nSET\r\n$22\r\nauthorizer:certificate\r\n$3\r\npem\r\n$2\r\nNX\r\n"
        );
    }

    #[test]
    fn expiring_slot_uses_whole_seconds() {
        let cmd = set_nx_command("k", "v", Some(Duration::from_secs(3600)));
        assert!(packed(&cmd).ends_with("$2\r\nNX\r\n$2\r\nEX\r\n$4\r\n3600\r\n"));

        let cmd = set_nx_command("k", "v", Some(Duration::from_millis(200)));
        assert!(packed(&cmd).ends_with("$2\r\nEX\r\n$1\r\n1\r\n"));
    }
}
