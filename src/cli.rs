// 命令行参数解析

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::models::settings::AppSettings;
use crate::models::{EditTarget, FileRef};
use crate::ssh::{AuthMethod, SshConfig};

/// 在对话框中编辑本地文件，或通过 SFTP 编辑远程文件
#[derive(Parser, Debug)]
#[command(name = "shelledit", version)]
pub struct Cli {
    /// 本地路径或 [user@]host:/path
    pub target: String,

    /// SSH 端口
    #[arg(short, long, default_value_t = 22)]
    pub port: u16,

    /// SSH 用户名（覆盖 target 中的 user）
    #[arg(short = 'l', long)]
    pub user: Option<String>,

    /// 私钥文件
    #[arg(short, long)]
    pub identity: Option<PathBuf>,

    /// 保存私钥密码的环境变量名
    #[arg(long)]
    pub passphrase_env: Option<String>,

    /// 保存登录密码的环境变量名（设置后使用密码认证）
    #[arg(long)]
    pub password_env: Option<String>,

    /// 外置编辑器命令，如 "code -w"
    #[arg(long, env = "SHELLEDIT_EDITOR")]
    pub editor: Option<String>,

    /// 保存时使用的权限（八进制，如 644）
    #[arg(long)]
    pub mode: Option<String>,
}

/// 启动所需的全部信息
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub file: FileRef,
    /// 远程文件的 SSH 配置
    pub ssh: Option<SshConfig>,
    pub session_id: String,
}

impl Cli {
    /// 结合设置解析出启动计划，命令行参数优先
    pub fn resolve(&self, settings: &mut AppSettings) -> Result<LaunchPlan> {
        if let Some(editor) = &self.editor {
            settings.editor.external_editor_path = editor.clone();
        }

        let mode = self
            .mode
            .as_deref()
            .map(|m| u32::from_str_radix(m.trim_start_matches("0o"), 8))
            .transpose()
            .with_context(|| format!("无效的权限值: {:?}", self.mode))?;

        match EditTarget::parse(&self.target) {
            EditTarget::Local(file) => {
                if file.name.is_empty() {
                    bail!("缺少文件名: {}", self.target);
                }
                Ok(LaunchPlan {
                    file: apply_mode(file, mode),
                    ssh: None,
                    session_id: "local".to_string(),
                })
            }
            EditTarget::Remote { user, host, file } => {
                if file.name.is_empty() {
                    bail!("缺少远程文件名: {}", self.target);
                }
                let username = self
                    .user
                    .clone()
                    .or(user)
                    .or_else(|| std::env::var("USER").ok())
                    .or_else(|| std::env::var("USERNAME").ok())
                    .context("未指定 SSH 用户名")?;

                let auth = self.auth_method()?;
                let config =
                    SshConfig::new(host, self.port, username, auth, &settings.connection);

                Ok(LaunchPlan {
                    file: apply_mode(file, mode),
                    ssh: Some(config),
                    session_id: uuid::Uuid::new_v4().to_string(),
                })
            }
        }
    }

    fn auth_method(&self) -> Result<AuthMethod> {
        if let Some(var) = &self.password_env {
            let password = std::env::var(var)
                .with_context(|| format!("环境变量 {} 未设置", var))?;
            return Ok(AuthMethod::Password(password));
        }

        let key_path = match &self.identity {
            Some(path) => path.clone(),
            None => dirs::home_dir()
                .and_then(|home| default_identity(&home))
                .context("未找到可用的私钥，请使用 --identity 或 --password-env")?,
        };

        let passphrase = match &self.passphrase_env {
            Some(var) => Some(
                std::env::var(var).with_context(|| format!("环境变量 {} 未设置", var))?,
            ),
            None => None,
        };

        Ok(AuthMethod::PublicKey {
            key_path,
            passphrase,
        })
    }
}

fn apply_mode(file: FileRef, mode: Option<u32>) -> FileRef {
    match mode {
        Some(mode) => file.with_mode(mode),
        None => file,
    }
}

/// 按 OpenSSH 的顺序查找默认私钥
fn default_identity(home: &Path) -> Option<PathBuf> {
    ["id_ed25519", "id_ecdsa", "id_rsa"]
        .iter()
        .map(|name| home.join(".ssh").join(name))
        .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileKind;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("shelledit").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_local_target() {
        let cli = parse(&["/tmp/notes.txt", "--mode", "640", "--editor", "vim"]);
        let mut settings = AppSettings::default();
        let plan = cli.resolve(&mut settings).unwrap();

        assert_eq!(plan.file.kind, FileKind::Local);
        assert_eq!(plan.file.name, "notes.txt");
        assert_eq!(plan.file.mode, Some(0o640));
        assert!(plan.ssh.is_none());
        assert_eq!(settings.editor.external_editor_path, "vim");
    }

    #[test]
    fn test_remote_target_with_identity() {
        let cli = parse(&[
            "admin@example.com:/etc/nginx/nginx.conf",
            "-p",
            "2222",
            "-i",
            "/keys/id_test",
        ]);
        let plan = cli.resolve(&mut AppSettings::default()).unwrap();

        assert_eq!(plan.file.kind, FileKind::Remote);
        assert_eq!(plan.file.resolved_path(), "/etc/nginx/nginx.conf");
        let ssh = plan.ssh.unwrap();
        assert_eq!(ssh.host, "example.com");
        assert_eq!(ssh.port, 2222);
        assert_eq!(ssh.username, "admin");
        assert!(matches!(
            ssh.auth,
            AuthMethod::PublicKey { ref key_path, passphrase: None } if key_path == Path::new("/keys/id_test")
        ));
        assert_ne!(plan.session_id, "local");
    }

    #[test]
    fn test_user_flag_overrides_target_user() {
        let cli = parse(&["admin@example.com:/a.txt", "-l", "deploy", "-i", "/k"]);
        let plan = cli.resolve(&mut AppSettings::default()).unwrap();
        assert_eq!(plan.ssh.unwrap().username, "deploy");
    }

    #[test]
    fn test_password_from_env() {
        std::env::set_var("SHELLEDIT_TEST_PASSWORD", "secret");
        let cli = parse(&[
            "root@10.0.0.7:/root/.bashrc",
            "--password-env",
            "SHELLEDIT_TEST_PASSWORD",
        ]);
        let plan = cli.resolve(&mut AppSettings::default()).unwrap();
        assert!(matches!(plan.ssh.unwrap().auth, AuthMethod::Password(ref p) if p == "secret"));
    }

    #[test]
    fn test_missing_password_env_is_error() {
        let cli = parse(&[
            "root@10.0.0.7:/root/.bashrc",
            "--password-env",
            "SHELLEDIT_TEST_UNSET_VARIABLE",
        ]);
        assert!(cli.resolve(&mut AppSettings::default()).is_err());
    }

    #[test]
    fn test_invalid_mode_is_error() {
        let cli = parse(&["/tmp/a.txt", "--mode", "999"]);
        assert!(cli.resolve(&mut AppSettings::default()).is_err());
    }

    #[test]
    fn test_default_identity_order() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(home.path().join(".ssh")).unwrap();
        assert!(default_identity(home.path()).is_none());

        std::fs::write(home.path().join(".ssh").join("id_rsa"), "").unwrap();
        std::fs::write(home.path().join(".ssh").join("id_ed25519"), "").unwrap();
        assert_eq!(
            default_identity(home.path()),
            Some(home.path().join(".ssh").join("id_ed25519"))
        );
    }
}
