// 页面模块

pub mod editor;

pub use editor::EditorPage;
