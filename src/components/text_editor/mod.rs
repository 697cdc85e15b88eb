// 文本编辑对话框

mod dialog;
mod state;

pub use dialog::render_text_editor_overlay;
pub use state::{open_text_editor, save_text_editor, TextEditorDialogState};
