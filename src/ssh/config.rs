// SSH 连接配置

use std::path::PathBuf;

use crate::models::settings::ConnectionSettings;

/// SSH 连接配置
#[derive(Clone, Debug)]
pub struct SshConfig {
    /// 目标主机
    pub host: String,
    /// 端口
    pub port: u16,
    /// 用户名
    pub username: String,
    /// 认证方式
    pub auth: AuthMethod,
    /// 连接超时（秒）
    pub connect_timeout: u64,
    /// 心跳配置
    pub keepalive: KeepaliveConfig,
    /// known_hosts 文件路径，None 时不校验主机密钥
    pub known_hosts_path: Option<PathBuf>,
    /// 首次连接时自动信任主机密钥
    pub accept_new_host_keys: bool,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 22,
            username: String::new(),
            auth: AuthMethod::Password(String::new()),
            connect_timeout: 30,
            keepalive: KeepaliveConfig::default(),
            known_hosts_path: default_known_hosts_path(),
            accept_new_host_keys: true,
        }
    }
}

/// 认证方式
#[derive(Clone, Debug)]
pub enum AuthMethod {
    /// 密码认证
    Password(String),
    /// 公钥认证
    PublicKey {
        /// 私钥文件路径
        key_path: PathBuf,
        /// 私钥密码（如果有）
        passphrase: Option<String>,
    },
}

/// 心跳配置
#[derive(Clone, Debug)]
pub struct KeepaliveConfig {
    /// 是否启用心跳
    pub enabled: bool,
    /// 心跳间隔（秒）
    pub interval: u64,
    /// 最大重试次数
    pub max_retries: u32,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: 60,
            max_retries: 3,
        }
    }
}

/// OpenSSH 默认 known_hosts 路径 (~/.ssh/known_hosts)
pub fn default_known_hosts_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh").join("known_hosts"))
}

impl SshConfig {
    /// 根据连接设置构建配置
    pub fn new(
        host: String,
        port: u16,
        username: String,
        auth: AuthMethod,
        settings: &ConnectionSettings,
    ) -> Self {
        Self {
            host,
            port,
            username,
            auth,
            connect_timeout: settings.connect_timeout_secs,
            keepalive: KeepaliveConfig {
                enabled: settings.keepalive_enabled,
                interval: settings.keepalive_interval_secs,
                max_retries: settings.keepalive_max_retries,
            },
            known_hosts_path: default_known_hosts_path(),
            accept_new_host_keys: settings.accept_new_host_keys,
        }
    }

    /// 构建 russh 配置
    pub fn to_russh_config(&self) -> russh::client::Config {
        let mut config = russh::client::Config::default();
        // 设置不活动超时（russh 没有单独的 connection_timeout，我们用 inactivity_timeout）
        config.inactivity_timeout = Some(std::time::Duration::from_secs(self.connect_timeout));
        // 设置心跳
        if self.keepalive.enabled {
            config.keepalive_interval =
                Some(std::time::Duration::from_secs(self.keepalive.interval));
            config.keepalive_max = self.keepalive.max_retries as usize;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_settings() {
        let settings = ConnectionSettings {
            connect_timeout_secs: 10,
            keepalive_enabled: false,
            accept_new_host_keys: false,
            ..Default::default()
        };
        let config = SshConfig::new(
            "example.com".to_string(),
            2222,
            "deploy".to_string(),
            AuthMethod::Password("secret".to_string()),
            &settings,
        );
        assert_eq!(config.port, 2222);
        assert_eq!(config.connect_timeout, 10);
        assert!(!config.accept_new_host_keys);

        let russh_config = config.to_russh_config();
        assert_eq!(
            russh_config.inactivity_timeout,
            Some(std::time::Duration::from_secs(10))
        );
        assert_eq!(russh_config.keepalive_interval, None);
    }
}
