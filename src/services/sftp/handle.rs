// SFTP 句柄与句柄工厂

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use super::error::SftpError;

/// 已连接的 SFTP 句柄
#[async_trait]
pub trait RemoteFileHandle: Send + Sync {
    /// 远程文件大小（字节）
    async fn file_size(&self, remote_path: &str) -> Result<u64, SftpError>;

    /// 下载远程文件到本地，返回字节数
    async fn download(
        &self,
        remote_path: &str,
        local_path: &Path,
        mode: Option<u32>,
    ) -> Result<u64, SftpError>;

    /// 上传本地文件覆盖远程文件，返回字节数
    async fn upload(
        &self,
        local_path: &Path,
        remote_path: &str,
        mode: Option<u32>,
    ) -> Result<u64, SftpError>;

    /// 将文本写入远程文件
    async fn write_file(
        &self,
        remote_path: &str,
        content: &str,
        mode: Option<u32>,
    ) -> Result<bool, SftpError>;
}

/// SFTP 句柄工厂
#[async_trait]
pub trait SftpConnector: Send + Sync {
    /// 获取（必要时建立）SFTP 句柄
    async fn connect(&self) -> Result<Arc<dyn RemoteFileHandle>, SftpError>;
}
