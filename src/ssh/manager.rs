// 全局 SSH 运行时与会话表

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tracing::{error, info};

use super::session::SshSession;

/// 全局 SSH 管理器
/// GPUI 线程没有 Tokio 运行时，所有 SSH / SFTP / 文件 IO 都派发到这里执行
pub struct SshManager {
    runtime: Runtime,
    /// Session ID -> Session
    sessions: RwLock<HashMap<String, Arc<SshSession>>>,
}

impl SshManager {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("ssh-worker")
            .build()
            .expect("Failed to create SSH Tokio runtime");

        Self {
            runtime,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// 获取全局单例
    pub fn global() -> &'static SshManager {
        static MANAGER: Lazy<SshManager> = Lazy::new(SshManager::new);
        &MANAGER
    }

    /// 在运行时中执行任务，返回结果接收端（可在任意执行器上 await）
    pub fn run<T, F>(&self, task: F) -> oneshot::Receiver<T>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.runtime.spawn(async move {
            let _ = tx.send(task.await);
        });
        rx
    }

    /// 登记已认证的会话
    pub fn register_session(&self, session: SshSession) -> Arc<SshSession> {
        let session = Arc::new(session);
        match self.sessions.write() {
            Ok(mut sessions) => {
                sessions.insert(session.id().to_string(), session.clone());
            }
            Err(_) => error!("[SSH Manager] Session table poisoned, {} not registered", session.id()),
        }
        session
    }

    fn take_session(&self, id: &str) -> Option<Arc<SshSession>> {
        self.sessions.write().ok()?.remove(id)
    }

    /// 从会话表移除并在后台断开
    pub fn close_session(&self, id: &str) {
        let Some(session) = self.take_session(id) else {
            return;
        };
        self.runtime.spawn(async move {
            disconnect(&session).await;
        });
    }

    /// 断开全部会话（退出前调用）
    pub async fn close_all(&self) {
        let sessions: Vec<_> = match self.sessions.write() {
            Ok(mut sessions) => sessions.drain().map(|(_, s)| s).collect(),
            Err(_) => return,
        };
        for session in sessions {
            disconnect(&session).await;
        }
    }
}

async fn disconnect(session: &SshSession) {
    match session.close().await {
        Ok(()) => info!("[SSH Manager] Session {} closed", session.id()),
        Err(e) => error!("[SSH Manager] Failed to close session {}: {}", session.id(), e),
    }
}
