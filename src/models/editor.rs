// 编辑器数据模型：文件引用、编辑会话、传输关联

use std::path::{Path, PathBuf};

/// 文件位置类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// 本地文件
    Local,
    /// 远程文件（通过 SFTP 访问）
    Remote,
}

/// 文件引用（由调用方提供，编辑器不修改）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// 父目录
    pub path: String,
    /// 文件名
    pub name: String,
    /// 本地 / 远程
    pub kind: FileKind,
    /// Unix 权限（如 0o644），未知时为 None
    pub mode: Option<u32>,
}

impl FileRef {
    pub fn local(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind: FileKind::Local,
            mode: None,
        }
    }

    pub fn remote(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind: FileKind::Remote,
            mode: None,
        }
    }

    /// 设置权限
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn is_remote(&self) -> bool {
        self.kind == FileKind::Remote
    }

    /// 拼接父目录和文件名得到绝对路径
    /// 本地文件使用平台路径规则，远程文件使用 POSIX 规则
    pub fn resolved_path(&self) -> String {
        match self.kind {
            FileKind::Local => Path::new(&self.path)
                .join(&self.name)
                .to_string_lossy()
                .to_string(),
            FileKind::Remote => join_remote_path(&self.path, &self.name),
        }
    }
}

/// 拼接远程路径
pub fn join_remote_path(base: &str, name: &str) -> String {
    if base == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", base.trim_end_matches('/'), name)
    }
}

/// 拆分远程路径为 (父目录, 文件名)
pub fn split_remote_path(path: &str) -> (String, String) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => ("/".to_string(), trimmed[1..].to_string()),
        Some(idx) => (trimmed[..idx].to_string(), trimmed[idx + 1..].to_string()),
        None => (".".to_string(), trimmed.to_string()),
    }
}

/// 命令行目标解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    /// 本地文件
    Local(FileRef),
    /// 远程文件：[user@]host:path
    Remote {
        user: Option<String>,
        host: String,
        file: FileRef,
    },
}

impl EditTarget {
    /// 解析 `[user@]host:/path` 或本地路径
    pub fn parse(target: &str) -> Self {
        if let Some((host_part, path)) = target.split_once(':') {
            // Windows 盘符（C:\...）按本地路径处理
            let is_drive = host_part.len() == 1
                && host_part.chars().all(|c| c.is_ascii_alphabetic());
            let is_host = !host_part.is_empty()
                && !host_part.contains('/')
                && !host_part.contains('\\')
                && !is_drive;

            if is_host && !path.is_empty() {
                let (user, host) = match host_part.rsplit_once('@') {
                    Some((user, host)) => (Some(user.to_string()), host.to_string()),
                    None => (None, host_part.to_string()),
                };
                let (parent, name) = split_remote_path(path);
                return EditTarget::Remote {
                    user,
                    host,
                    file: FileRef::remote(parent, name),
                };
            }
        }

        let local = Path::new(target);
        let parent = local
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| ".".to_string());
        let name = local
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        EditTarget::Local(FileRef::local(parent, name))
    }

    /// 获取文件引用
    pub fn file(&self) -> &FileRef {
        match self {
            EditTarget::Local(file) => file,
            EditTarget::Remote { file, .. } => file,
        }
    }
}

/// 编辑会话（对话框内部状态）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// 已加载的文本
    pub text: String,
    /// 解析后的绝对路径
    pub path: String,
    /// 是否加载中（加载中禁用保存和重置）
    pub loading: bool,
}

impl Default for EditSession {
    fn default() -> Self {
        Self {
            text: String::new(),
            path: "loading...".to_string(),
            loading: true,
        }
    }
}

/// 外置编辑关联：本地临时文件 <-> 远程原文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLink {
    pub remote_path: String,
    pub local_path: PathBuf,
    pub file: FileRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_remote_path() {
        assert_eq!(join_remote_path("/", "etc"), "/etc");
        assert_eq!(join_remote_path("/home/user", "a.txt"), "/home/user/a.txt");
        assert_eq!(join_remote_path("/home/user/", "a.txt"), "/home/user/a.txt");
    }

    #[test]
    fn test_split_remote_path() {
        assert_eq!(
            split_remote_path("/etc/hosts"),
            ("/etc".to_string(), "hosts".to_string())
        );
        assert_eq!(
            split_remote_path("/hosts"),
            ("/".to_string(), "hosts".to_string())
        );
        assert_eq!(
            split_remote_path("notes.md"),
            (".".to_string(), "notes.md".to_string())
        );
    }

    #[test]
    fn test_resolved_path() {
        let remote = FileRef::remote("/var/www/", "index.html");
        assert_eq!(remote.resolved_path(), "/var/www/index.html");

        let local = FileRef::local("/tmp", "a.txt");
        assert_eq!(
            PathBuf::from(local.resolved_path()),
            Path::new("/tmp").join("a.txt")
        );
    }

    #[test]
    fn test_parse_remote_target() {
        let target = EditTarget::parse("root@example.com:/etc/nginx/nginx.conf");
        assert_eq!(
            target,
            EditTarget::Remote {
                user: Some("root".to_string()),
                host: "example.com".to_string(),
                file: FileRef::remote("/etc/nginx", "nginx.conf"),
            }
        );

        let target = EditTarget::parse("box:notes.md");
        assert_eq!(
            target,
            EditTarget::Remote {
                user: None,
                host: "box".to_string(),
                file: FileRef::remote(".", "notes.md"),
            }
        );
    }

    #[test]
    fn test_parse_local_target() {
        assert_eq!(
            EditTarget::parse("/tmp/a.txt"),
            EditTarget::Local(FileRef::local("/tmp", "a.txt"))
        );
        assert_eq!(
            EditTarget::parse("a.txt"),
            EditTarget::Local(FileRef::local(".", "a.txt"))
        );
        assert_eq!(EditTarget::parse("C:\\notes.txt").file().kind, FileKind::Local);
    }

    #[test]
    fn test_default_session_is_loading() {
        let session = EditSession::default();
        assert!(session.loading);
        assert_eq!(session.path, "loading...");
        assert!(session.text.is_empty());
    }
}
