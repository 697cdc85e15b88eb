// UI 组件

pub mod text_editor;
