// SSH 连接模块
//
// 模块结构:
// - config: 连接配置 (SshConfig, AuthMethod)
// - error: 错误类型 (SshError)
// - handler: russh Handler 实现（known_hosts 校验）
// - client: SSH 客户端核心
// - session: SSH 会话 (SshSession)
// - manager: 全局运行时与会话表 (SshManager)

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod manager;
pub mod session;

// 公开导出
pub use client::SshClient;
pub use config::{AuthMethod, KeepaliveConfig, SshConfig};
pub use error::SshError;
pub use manager::SshManager;
pub use session::SshSession;
