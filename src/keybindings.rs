// 全局快捷键管理
// 集中管理应用级别的快捷键绑定

use gpui::{actions, App, Entity, KeyBinding};

use crate::components::text_editor::{save_text_editor, TextEditorDialogState};

// 定义全局 actions
actions!(shelledit, [Quit, SaveFile, CloseEditor]);

/// 初始化全局快捷键
pub fn init(cx: &mut App, dialog: &Entity<TextEditorDialogState>) {
    #[cfg(target_os = "macos")]
    cx.bind_keys([
        // Cmd+Q 退出应用
        KeyBinding::new("cmd-q", Quit, None),
        // Cmd+S 保存
        KeyBinding::new("cmd-s", SaveFile, None),
        KeyBinding::new("escape", CloseEditor, None),
    ]);

    #[cfg(not(target_os = "macos"))]
    cx.bind_keys([
        // Ctrl+Q 退出应用 (Windows/Linux)
        KeyBinding::new("ctrl-q", Quit, None),
        // Ctrl+S 保存
        KeyBinding::new("ctrl-s", SaveFile, None),
        KeyBinding::new("escape", CloseEditor, None),
    ]);

    // 注册 action 处理器
    cx.on_action(|_: &Quit, cx| {
        cx.quit();
    });

    let dialog_save = dialog.clone();
    cx.on_action(move |_: &SaveFile, cx| {
        save_text_editor(dialog_save.clone(), cx);
    });

    let dialog_close = dialog.clone();
    cx.on_action(move |_: &CloseEditor, cx| {
        dialog_close.update(cx, |dialog, cx| {
            dialog.cancel();
            cx.notify();
        });
    });
}
