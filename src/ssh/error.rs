// SSH 层错误：建立连接、认证、校验主机密钥、打开 SFTP 子系统
// 上层（SftpError）只透传这些错误，不再细分

use thiserror::Error;

/// SSH 错误类型
#[derive(Debug, Error)]
pub enum SshError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO 错误（网络连接等）
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 认证失败
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// SSH 协议错误
    #[error("SSH protocol error: {0}")]
    Protocol(String),

    /// 密钥错误
    #[error("Key error: {0}")]
    Key(String),

    /// 主机密钥校验失败
    #[error("Host key verification failed: {0}")]
    HostKey(String),

    /// 连接超时
    #[error("Connection timeout after {0}s")]
    Timeout(u64),

    /// 服务端拒绝打开子系统（如未启用 sftp-server）
    #[error("Subsystem '{name}' rejected: {reason}")]
    Subsystem { name: String, reason: String },

    /// 会话已断开
    #[error("Session disconnected: {0}")]
    Disconnected(String),
}

impl From<russh::Error> for SshError {
    fn from(e: russh::Error) -> Self {
        SshError::Protocol(e.to_string())
    }
}

impl From<russh::keys::Error> for SshError {
    fn from(e: russh::keys::Error) -> Self {
        SshError::Key(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_error_names_subsystem() {
        let err = SshError::Subsystem {
            name: "sftp".to_string(),
            reason: "channel failure".to_string(),
        };
        assert_eq!(err.to_string(), "Subsystem 'sftp' rejected: channel failure");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(SshError::from(io), SshError::Io(_)));
    }
}
