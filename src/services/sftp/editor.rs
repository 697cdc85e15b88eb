// 外置编辑器服务 - 临时文件路径和外部程序启动

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

// ======================== 临时文件管理 ========================

/// 获取临时编辑目录
/// 使用系统临时目录，各平台：
/// - macOS: /private/var/folders/.../T/shelledit/edit/ (规范化后)
/// - Linux: /tmp/shelledit/edit/
/// - Windows: C:\Users\<User>\AppData\Local\Temp\shelledit\edit\
pub fn get_temp_edit_dir() -> PathBuf {
    let base = std::env::temp_dir();
    // macOS 上 /var 是 /private/var 的符号链接
    // notify crate 返回真实路径，所以需要规范化
    let base = base.canonicalize().unwrap_or(base);
    base.join("shelledit").join("edit")
}

/// 生成临时文件路径
/// 格式: {base}/{session_id}_{remote_path_hash}/{filename}
/// 文件名与远程文件保持一致，外置编辑器才能按扩展名识别文件类型
pub fn temp_file_path(base: &Path, session_id: &str, remote_path: &str) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    remote_path.hash(&mut hasher);
    let hash = hasher.finish();

    let filename = Path::new(remote_path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    base.join(format!("{}_{:x}", session_id, hash))
        .join(filename)
}

/// 确保临时文件所在目录存在
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) => std::fs::create_dir_all(parent),
        None => Ok(()),
    }
}

// ======================== 外置编辑器启动 ========================

/// 启动外置编辑器打开文件
/// editor_path 为空时使用系统默认应用，可带参数（如 "code -n"）
pub fn open_in_external_editor(file_path: &Path, editor_path: Option<&str>) -> std::io::Result<()> {
    match editor_path.map(str::trim) {
        Some(editor) if !editor.is_empty() => {
            info!("[Editor] Opening with custom editor: {}", editor);

            // macOS: .app 应用程序包使用 open -a
            #[cfg(target_os = "macos")]
            {
                if editor.ends_with(".app") {
                    info!("[Editor] Detected macOS app bundle, using 'open -a'");
                    Command::new("open")
                        .arg("-a")
                        .arg(editor)
                        .arg(file_path)
                        .spawn()?;
                    return Ok(());
                }
            }

            let mut parts = editor.split_whitespace();
            let program = parts.next().unwrap_or(editor);
            Command::new(program).args(parts).arg(file_path).spawn()?;
        }
        _ => {
            info!("[Editor] Opening with system default: {:?}", file_path);
            open::that_detached(file_path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_file_keeps_remote_name() {
        let base = Path::new("/tmp/edit");
        let path = temp_file_path(base, "s1", "/etc/nginx/nginx.conf");
        assert_eq!(path.file_name().unwrap(), "nginx.conf");
        assert!(path.starts_with(base));
    }

    #[test]
    fn test_temp_file_distinguishes_same_name() {
        let base = Path::new("/tmp/edit");
        let a = temp_file_path(base, "s1", "/a/config.yml");
        let b = temp_file_path(base, "s1", "/b/config.yml");
        let c = temp_file_path(base, "s2", "/a/config.yml");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, temp_file_path(base, "s1", "/a/config.yml"));
    }

    #[test]
    fn test_ensure_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file_path(dir.path(), "s1", "/srv/app.conf");
        ensure_parent_dir(&path).unwrap();
        assert!(path.parent().unwrap().is_dir());
    }
}
