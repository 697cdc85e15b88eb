// 文本编辑对话框核心（不依赖 UI 框架）

pub mod controller;
pub mod error;
pub mod form;
pub mod reporter;


pub use controller::{
    coalesce_watch_events, EditPhase, EditorCallbacks, EditorOptions, EditorServices, LoadTask, SubmitStep,
    TextEditorController, TextEditorProps, UploadTask, WriteTask,
};
pub use error::{EditorError, EditorErrorKind};
pub use form::{EditorForm, FieldRule, TEXT_FIELD};
pub use reporter::{ChannelReporter, ErrorReporter, TracingReporter};
