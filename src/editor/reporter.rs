// 错误上报：编辑器不在本地处理错误，统一交给注入的上报器

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::error;

use super::error::EditorError;

/// 错误上报器
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &EditorError);
}

/// 仅写日志
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &EditorError) {
        error!("[Editor] {:?} error: {}", error.kind(), error);
    }
}

/// 写日志并把错误信息转发给 UI（用于弹出通知）
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    log: TracingReporter,
    sender: UnboundedSender<String>,
}

impl ChannelReporter {
    pub fn new() -> (Self, UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                log: TracingReporter,
                sender,
            },
            receiver,
        )
    }
}

impl ErrorReporter for ChannelReporter {
    fn report(&self, error: &EditorError) {
        self.log.report(error);
        let _ = self.sender.send(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_reporter_forwards_message() {
        let (reporter, mut receiver) = ChannelReporter::new();
        reporter.report(&EditorError::WriteRejected {
            path: "/etc/hosts".to_string(),
        });
        assert_eq!(
            receiver.try_recv().unwrap(),
            "Write to /etc/hosts was not accepted"
        );
    }

    #[test]
    fn test_tracing_reporter_as_trait_object() {
        let reporter: Box<dyn ErrorReporter> = Box::new(TracingReporter);
        reporter.report(&EditorError::TooLarge {
            path: "/var/log/big.log".to_string(),
            size: 2048,
            limit: 1024,
        });
    }

    #[test]
    fn test_channel_reporter_survives_dropped_receiver() {
        let (reporter, receiver) = ChannelReporter::new();
        drop(receiver);
        reporter.report(&EditorError::WriteRejected {
            path: "/a".to_string(),
        });
    }
}
