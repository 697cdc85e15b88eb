// SFTP 错误类型定义

use thiserror::Error;

use crate::ssh::SshError;

/// SFTP 错误类型
#[derive(Debug, Error)]
pub enum SftpError {
    /// SSH 连接层错误
    #[error("SSH error: {0}")]
    Ssh(#[from] SshError),

    /// SFTP 协议 / 远程文件操作错误
    #[error("SFTP error: {0}")]
    Protocol(String),

    /// 本地文件 IO 错误
    #[error("Local IO error: {0}")]
    LocalIo(#[from] std::io::Error),
}
