// 数据模型模块

pub mod editor;
pub mod settings;

pub use editor::{EditSession, EditTarget, FileKind, FileRef, TransferLink};
pub use settings::AppSettings;
