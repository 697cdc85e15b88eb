// SFTP 服务 - 封装 russh-sftp 客户端

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use russh_sftp::client::SftpSession;
use russh_sftp::protocol::{FileAttributes, OpenFlags};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::error::SftpError;
use super::handle::RemoteFileHandle;
use crate::services::fs::set_mode;
use crate::ssh::session::SshSession;

/// SFTP 服务
/// 封装 russh-sftp 客户端，提供文件传输接口
pub struct SftpService {
    /// 会话 ID
    session_id: String,
    /// 所属 SSH 会话
    ssh_session: Arc<SshSession>,
    /// russh-sftp 客户端会话（线程安全）
    sftp: Arc<SftpSession>,
}

impl SftpService {
    /// 创建 SFTP 服务
    pub async fn new(session_id: String, ssh_session: &Arc<SshSession>) -> Result<Self, SftpError> {
        info!("[SFTP] Creating SFTP service for session {}", session_id);

        let stream = ssh_session.open_subsystem("sftp").await?;

        // 使用 russh-sftp 包装通道
        let sftp = SftpSession::new(stream)
            .await
            .map_err(|e| SftpError::Protocol(format!("Failed to create SFTP session: {}", e)))?;

        info!("[SFTP] SFTP service created for session {}", session_id);

        Ok(Self {
            session_id,
            ssh_session: ssh_session.clone(),
            sftp: Arc::new(sftp),
        })
    }

    /// 底层 SSH 会话是否仍然可用
    pub fn is_alive(&self) -> bool {
        self.ssh_session.is_alive()
    }

    /// 设置远程文件权限
    async fn apply_remote_mode(&self, remote_path: &str, mode: Option<u32>) -> Result<(), SftpError> {
        let Some(mode) = mode else {
            return Ok(());
        };
        let attrs = FileAttributes {
            permissions: Some(mode),
            ..Default::default()
        };
        self.sftp
            .set_metadata(remote_path, attrs)
            .await
            .map_err(|e| {
                SftpError::Protocol(format!("Failed to set permissions on {}: {}", remote_path, e))
            })
    }

    /// 以覆盖方式打开远程文件
    async fn open_for_write(&self, remote_path: &str) -> Result<russh_sftp::client::fs::File, SftpError> {
        self.sftp
            .open_with_flags(
                remote_path,
                OpenFlags::CREATE | OpenFlags::TRUNCATE | OpenFlags::WRITE,
            )
            .await
            .map_err(|e| SftpError::Protocol(format!("Failed to open remote file {}: {}", remote_path, e)))
    }
}

#[async_trait]
impl RemoteFileHandle for SftpService {
    async fn file_size(&self, remote_path: &str) -> Result<u64, SftpError> {
        debug!("[SFTP] Getting stat for: {}", remote_path);
        let attrs = self
            .sftp
            .metadata(remote_path)
            .await
            .map_err(|e| SftpError::Protocol(format!("Failed to stat {}: {}", remote_path, e)))?;
        Ok(attrs.size.unwrap_or(0))
    }

    async fn download(
        &self,
        remote_path: &str,
        local_path: &Path,
        mode: Option<u32>,
    ) -> Result<u64, SftpError> {
        info!("[SFTP] Downloading {} -> {:?}", remote_path, local_path);

        let mut remote = self
            .sftp
            .open(remote_path)
            .await
            .map_err(|e| SftpError::Protocol(format!("Failed to open remote file {}: {}", remote_path, e)))?;

        let mut local = tokio::fs::File::create(local_path).await?;
        let bytes = tokio::io::copy(&mut remote, &mut local)
            .await
            .map_err(|e| SftpError::Protocol(format!("Failed to download {}: {}", remote_path, e)))?;
        local.flush().await?;

        // 保留远程权限，但本地副本必须对当前用户可写
        if let Some(mode) = mode {
            set_mode(local_path, mode | 0o600).await?;
        }

        info!("[SFTP] Downloaded {} bytes to {:?}", bytes, local_path);
        Ok(bytes)
    }

    async fn upload(
        &self,
        local_path: &Path,
        remote_path: &str,
        mode: Option<u32>,
    ) -> Result<u64, SftpError> {
        info!("[SFTP] Uploading {:?} -> {}", local_path, remote_path);

        let mut local = tokio::fs::File::open(local_path).await?;
        let mut remote = self.open_for_write(remote_path).await?;

        let bytes = tokio::io::copy(&mut local, &mut remote)
            .await
            .map_err(|e| SftpError::Protocol(format!("Failed to upload to {}: {}", remote_path, e)))?;
        remote
            .flush()
            .await
            .map_err(|e| SftpError::Protocol(format!("Failed to flush {}: {}", remote_path, e)))?;

        self.apply_remote_mode(remote_path, mode).await?;

        info!("[SFTP] Uploaded {} bytes to {}", bytes, remote_path);
        Ok(bytes)
    }

    async fn write_file(
        &self,
        remote_path: &str,
        content: &str,
        mode: Option<u32>,
    ) -> Result<bool, SftpError> {
        info!("[SFTP] Writing {} bytes to {}", content.len(), remote_path);

        let mut remote = self.open_for_write(remote_path).await?;
        remote
            .write_all(content.as_bytes())
            .await
            .map_err(|e| SftpError::Protocol(format!("Failed to write {}: {}", remote_path, e)))?;
        remote
            .flush()
            .await
            .map_err(|e| SftpError::Protocol(format!("Failed to flush {}: {}", remote_path, e)))?;

        self.apply_remote_mode(remote_path, mode).await?;
        Ok(true)
    }
}

impl Drop for SftpService {
    fn drop(&mut self) {
        info!(
            "[SFTP] Dropping SFTP service for session {}",
            self.session_id
        );
    }
}
