// 已认证的 SSH 会话

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use russh::client::{Handle, Msg};
use russh::{ChannelStream, Disconnect};
use tracing::debug;

use super::error::SshError;
use super::handler::SshClientHandler;

/// SSH 会话，可在同一连接上打开多个通道
pub struct SshSession {
    id: String,
    handle: Arc<Handle<SshClientHandler>>,
    host: String,
    username: String,
    is_connected: AtomicBool,
}

impl SshSession {
    pub fn new(
        id: String,
        handle: Arc<Handle<SshClientHandler>>,
        host: String,
        username: String,
    ) -> Self {
        Self {
            id,
            handle,
            host,
            username,
            is_connected: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_alive(&self) -> bool {
        self.is_connected.load(Ordering::Relaxed)
    }

    /// 打开子系统通道（如 "sftp"），返回双向字节流
    pub async fn open_subsystem(&self, name: &str) -> Result<ChannelStream<Msg>, SshError> {
        if !self.is_alive() {
            return Err(SshError::Disconnected(format!(
                "{}@{} is no longer connected",
                self.username, self.host
            )));
        }

        let channel = self.handle.channel_open_session().await?;
        channel
            .request_subsystem(true, name)
            .await
            .map_err(|e| SshError::Subsystem {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        debug!("[SSH] Subsystem '{}' opened on session {}", name, self.id);
        Ok(channel.into_stream())
    }

    /// 断开连接（重复调用无副作用）
    pub async fn close(&self) -> Result<(), SshError> {
        if !self.is_connected.swap(false, Ordering::Relaxed) {
            return Ok(());
        }
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(|e| SshError::Disconnected(e.to_string()))
    }
}
