// 编辑器错误类型定义

use thiserror::Error;

use crate::services::fs::FsError;
use crate::services::sftp::SftpError;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorErrorKind {
    /// 读取 / 下载 / 打开阶段
    Load,
    /// 写入 / 上传阶段
    Write,
}

/// 编辑器错误类型
#[derive(Debug, Error)]
pub enum EditorError {
    /// 文件超过可编辑大小
    #[error("File too large to edit: {path} ({size} bytes, limit {limit} bytes)")]
    TooLarge { path: String, size: u64, limit: u64 },

    /// 读取本地文件失败
    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: FsError },

    /// 建立 SFTP 连接失败
    #[error("Failed to connect for {path}: {source}")]
    Connect { path: String, source: SftpError },

    /// 下载远程文件失败
    #[error("Failed to download {path}: {source}")]
    Download { path: String, source: SftpError },

    /// 临时文件准备失败
    #[error("Failed to prepare temp file {path}: {source}")]
    TempFile {
        path: String,
        source: std::io::Error,
    },

    /// 外置编辑器启动失败
    #[error("Failed to open {path} in external editor: {source}")]
    OpenExternal { path: String, source: FsError },

    /// 文件监控失败
    #[error("Failed to watch {path}: {source}")]
    Watch { path: String, source: FsError },

    /// 写入本地文件失败
    #[error("Failed to write {path}: {source}")]
    WriteLocal { path: String, source: FsError },

    /// 写入远程文件失败
    #[error("Failed to write {path}: {source}")]
    WriteRemote { path: String, source: SftpError },

    /// 写入返回失败结果
    #[error("Write to {path} was not accepted")]
    WriteRejected { path: String },

    /// 外置编辑后回传失败
    #[error("Failed to upload {local_path} to {remote_path}: {source}")]
    Upload {
        local_path: String,
        remote_path: String,
        source: SftpError,
    },
}

impl EditorError {
    /// 错误分类
    pub fn kind(&self) -> EditorErrorKind {
        match self {
            EditorError::TooLarge { .. }
            | EditorError::Read { .. }
            | EditorError::Connect { .. }
            | EditorError::Download { .. }
            | EditorError::TempFile { .. }
            | EditorError::OpenExternal { .. }
            | EditorError::Watch { .. } => EditorErrorKind::Load,
            EditorError::WriteLocal { .. }
            | EditorError::WriteRemote { .. }
            | EditorError::WriteRejected { .. }
            | EditorError::Upload { .. } => EditorErrorKind::Write,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        let load = EditorError::TooLarge {
            path: "/a".to_string(),
            size: 10,
            limit: 5,
        };
        assert_eq!(load.kind(), EditorErrorKind::Load);

        let write = EditorError::WriteRejected {
            path: "/a".to_string(),
        };
        assert_eq!(write.kind(), EditorErrorKind::Write);
        assert_eq!(write.to_string(), "Write to /a was not accepted");
    }

    #[test]
    fn test_error_source_is_kept() {
        use std::error::Error as _;

        let err = EditorError::Read {
            path: "/a".to_string(),
            source: FsError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
        };
        assert!(err.source().is_some());
        assert_eq!(err.kind(), EditorErrorKind::Load);
    }
}
