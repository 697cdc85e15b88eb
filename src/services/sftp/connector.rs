// SFTP 句柄工厂：按需建立 SSH 连接并复用 SFTP 服务

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use super::error::SftpError;
use super::handle::{RemoteFileHandle, SftpConnector};
use super::service::SftpService;
use crate::ssh::{SshClient, SshConfig, SshManager};

/// 基于 SSH 配置的 SFTP 句柄工厂
/// 首次调用时连接，之后复用同一个 SftpService
pub struct SshSftpConnector {
    config: SshConfig,
    session_id: String,
    service: Mutex<Option<Arc<SftpService>>>,
}

impl SshSftpConnector {
    pub fn new(config: SshConfig, session_id: String) -> Self {
        Self {
            config,
            session_id,
            service: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SftpConnector for SshSftpConnector {
    async fn connect(&self) -> Result<Arc<dyn RemoteFileHandle>, SftpError> {
        let mut guard = self.service.lock().await;

        if let Some(service) = guard.as_ref() {
            if service.is_alive() {
                return Ok(service.clone() as Arc<dyn RemoteFileHandle>);
            }
            info!("[SFTP] Cached session {} is gone, reconnecting", self.session_id);
            SshManager::global().close_session(&self.session_id);
        }

        let session = SshClient::new(self.config.clone())
            .connect(self.session_id.clone())
            .await?;
        let session = SshManager::global().register_session(session);
        let service = Arc::new(SftpService::new(self.session_id.clone(), &session).await?);

        *guard = Some(service.clone());
        Ok(service as Arc<dyn RemoteFileHandle>)
    }
}
