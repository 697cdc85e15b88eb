// 本地文件系统门面：读写、外部打开、文件监控

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use async_trait::async_trait;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tracing::{debug, error, info};

use super::sftp::open_in_external_editor;

/// 文件系统错误
#[derive(Debug, Error)]
pub enum FsError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 文件监控错误
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// 外部程序启动失败
    #[error("Failed to open {path}: {reason}")]
    Open { path: String, reason: String },
}

/// 文件监控事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    /// 内容变化
    Change,
    /// 被移走或删除
    Rename,
}

/// 文件监控事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub path: PathBuf,
}

/// 文件监控回调
pub type WatchCallback = Box<dyn Fn(WatchEvent) + Send + Sync>;

/// 文件监控句柄
pub trait WatchHandle: Send {
    /// 停止监控（重复调用无副作用）
    fn close(&mut self);
}

/// 文件系统门面
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// 文件大小（字节）
    async fn file_size(&self, path: &Path) -> Result<u64, FsError>;

    /// 读取文本文件
    async fn read_file(&self, path: &Path) -> Result<String, FsError>;

    /// 写入文本文件，mode 为 Some 时同时设置权限
    async fn write_file(
        &self,
        path: &Path,
        content: &str,
        mode: Option<u32>,
    ) -> Result<bool, FsError>;

    /// 使用外部程序打开文件
    async fn open_file(&self, path: &Path) -> Result<(), FsError>;

    /// 监控文件变化
    fn watch(&self, path: &Path, callback: WatchCallback) -> Result<Box<dyn WatchHandle>, FsError>;
}

/// 本地文件系统实现
#[derive(Debug, Clone, Default)]
pub struct LocalFs {
    /// 外置编辑器路径，None 时使用系统默认应用
    external_editor: Option<String>,
}

impl LocalFs {
    pub fn new(external_editor: Option<String>) -> Self {
        Self { external_editor }
    }
}

#[async_trait]
impl FileSystem for LocalFs {
    async fn file_size(&self, path: &Path) -> Result<u64, FsError> {
        Ok(tokio::fs::metadata(path).await?.len())
    }

    async fn read_file(&self, path: &Path) -> Result<String, FsError> {
        debug!("[Fs] Reading file: {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        debug!("[Fs] Read {} bytes from {:?}", content.len(), path);
        Ok(content)
    }

    async fn write_file(
        &self,
        path: &Path,
        content: &str,
        mode: Option<u32>,
    ) -> Result<bool, FsError> {
        info!("[Fs] Writing {} bytes to {:?}", content.len(), path);
        tokio::fs::write(path, content).await?;
        if let Some(mode) = mode {
            set_mode(path, mode).await?;
        }
        Ok(true)
    }

    async fn open_file(&self, path: &Path) -> Result<(), FsError> {
        open_in_external_editor(path, self.external_editor.as_deref()).map_err(|e| {
            FsError::Open {
                path: path.to_string_lossy().to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn watch(&self, path: &Path, callback: WatchCallback) -> Result<Box<dyn WatchHandle>, FsError> {
        let requested = path.to_path_buf();
        // notify 返回真实路径，比较时使用规范化路径
        let target = path.canonicalize().unwrap_or_else(|_| requested.clone());
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let last_modified = Mutex::new(modified_time(&target));
        let target_for_handler = target.clone();
        let requested_for_handler = requested.clone();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if !event.paths.iter().any(|p| p == &target_for_handler) {
                        return;
                    }

                    let kind = match event.kind {
                        EventKind::Remove(_) => WatchEventKind::Rename,
                        // 很多编辑器先写临时文件再重命名覆盖，目标仍存在即视为内容变化
                        EventKind::Modify(ModifyKind::Name(_)) => {
                            if target_for_handler.exists() {
                                WatchEventKind::Change
                            } else {
                                WatchEventKind::Rename
                            }
                        }
                        EventKind::Modify(_) | EventKind::Create(_) => WatchEventKind::Change,
                        _ => return,
                    };

                    if kind == WatchEventKind::Change {
                        // 检查文件是否真的被修改了（避免重复事件）
                        let Some(modified) = modified_time(&target_for_handler) else {
                            return;
                        };
                        let Ok(mut last) = last_modified.lock() else {
                            return;
                        };
                        if matches!(*last, Some(prev) if modified <= prev) {
                            debug!("[FileWatcher] Duplicate event ignored: {:?}", event.kind);
                            return;
                        }
                        *last = Some(modified);
                    }

                    info!("[FileWatcher] {:?}: {:?}", kind, requested_for_handler);
                    callback(WatchEvent {
                        kind,
                        path: requested_for_handler.clone(),
                    });
                }
                Err(e) => {
                    error!("[FileWatcher] Watch error: {}", e);
                }
            }
        })?;

        // notify 需要监控父目录才能检测到替换式保存
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        info!("[FileWatcher] Watching file: {:?}", requested);

        Ok(Box::new(NotifyWatchHandle {
            watcher: Some(watcher),
            dir,
            path: requested,
        }))
    }
}

/// notify 监控句柄
pub struct NotifyWatchHandle {
    watcher: Option<RecommendedWatcher>,
    dir: PathBuf,
    path: PathBuf,
}

impl WatchHandle for NotifyWatchHandle {
    fn close(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            let _ = watcher.unwatch(&self.dir);
            info!("[FileWatcher] Unwatching file: {:?}", self.path);
        }
    }
}

impl Drop for NotifyWatchHandle {
    fn drop(&mut self) {
        self.close();
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// 设置文件权限（仅 Unix）
#[cfg(unix)]
pub(crate) async fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode & 0o7777)).await
}

#[cfg(not(unix))]
pub(crate) async fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_read_write_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let fs = LocalFs::default();

        assert!(fs.write_file(&path, "hello\nworld", None).await.unwrap());
        assert_eq!(fs.read_file(&path).await.unwrap(), "hello\nworld");
        assert_eq!(fs.file_size(&path).await.unwrap(), 11);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_applies_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.sh");
        let fs = LocalFs::default();

        fs.write_file(&path, "#!/bin/sh\n", Some(0o100750)).await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFs::default();
        let err = fs.read_file(&dir.path().join("missing")).await.unwrap_err();
        assert!(matches!(err, FsError::Io(_)));
    }

    #[test]
    fn test_watch_reports_change_and_close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watched.txt");
        std::fs::write(&path, "v1").unwrap();

        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        let fs = LocalFs::default();
        let mut handle = fs
            .watch(
                &path,
                Box::new(move |event| {
                    if let Ok(tx) = tx.lock() {
                        let _ = tx.send(event);
                    }
                }),
            )
            .unwrap();

        // 保证 mtime 前进
        std::thread::sleep(Duration::from_millis(50));
        std::fs::write(&path, "v2").unwrap();

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event.kind, WatchEventKind::Change);
        assert_eq!(event.path, path);

        handle.close();
        handle.close();
    }
}
