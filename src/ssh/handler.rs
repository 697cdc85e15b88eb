// SSH 客户端 Handler 实现
// 实现 russh::client::Handler trait

use russh::keys::PublicKey;
use std::future::Future;
use std::path::PathBuf;
use tracing::{info, warn};

use super::error::SshError;

/// SSH 客户端 Handler
/// 按 known_hosts 校验服务器公钥
pub struct SshClientHandler {
    host: String,
    port: u16,
    known_hosts_path: Option<PathBuf>,
    accept_new: bool,
}

impl SshClientHandler {
    /// 创建新的 Handler
    pub fn new(host: String, port: u16, known_hosts_path: Option<PathBuf>, accept_new: bool) -> Self {
        Self {
            host,
            port,
            known_hosts_path,
            accept_new,
        }
    }

    fn verify(&self, server_public_key: &PublicKey) -> Result<bool, SshError> {
        let fingerprint = server_public_key.fingerprint(russh::keys::ssh_key::HashAlg::Sha256);
        info!(
            "[SSH] Server key {} fingerprint: {}",
            server_public_key.algorithm(),
            fingerprint
        );

        let Some(path) = &self.known_hosts_path else {
            warn!("[SSH] No known_hosts path configured, accepting key");
            return Ok(true);
        };

        let known = if path.exists() {
            russh::keys::known_hosts::check_known_hosts_path(
                &self.host,
                self.port,
                server_public_key,
                path,
            )
            .map_err(|e| {
                SshError::HostKey(format!("{}:{} ({}): {}", self.host, self.port, fingerprint, e))
            })?
        } else {
            false
        };

        if known {
            return Ok(true);
        }

        if !self.accept_new {
            return Err(SshError::HostKey(format!(
                "Unknown host key for {}:{} ({})",
                self.host, self.port, fingerprint
            )));
        }

        warn!(
            "[SSH] Adding new host key for {}:{} to {:?}",
            self.host, self.port, path
        );
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        russh::keys::known_hosts::learn_known_hosts_path(
            &self.host,
            self.port,
            server_public_key,
            path,
        )?;
        Ok(true)
    }
}

impl russh::client::Handler for SshClientHandler {
    type Error = SshError;

    /// 检查服务器公钥
    fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        let result = self.verify(server_public_key);
        async move { result }
    }
}
