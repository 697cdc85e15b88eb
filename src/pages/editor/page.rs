// EditorPage 编辑器窗口根视图

use gpui::*;
use gpui_component::notification::{Notification, NotificationType};
use gpui_component::{ActiveTheme, Root, WindowExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::components::text_editor::{
    open_text_editor, render_text_editor_overlay, TextEditorDialogState,
};

/// 编辑器窗口：承载对话框，对话框关闭后退出应用
pub struct EditorPage {
    dialog: Entity<TextEditorDialogState>,
    _dialog_observer: Subscription,
}

impl EditorPage {
    pub fn new(
        dialog: Entity<TextEditorDialogState>,
        errors: UnboundedReceiver<String>,
        cx: &mut Context<Self>,
    ) -> Self {
        let dialog_observer = cx.observe(&dialog, |_, dialog, cx| {
            if !dialog.read(cx).is_open() {
                info!("[App] Editor dialog closed, quitting");
                cx.quit();
            }
        });

        start_error_notifications(errors, cx);
        open_text_editor(dialog.clone(), cx);

        Self {
            dialog,
            _dialog_observer: dialog_observer,
        }
    }
}

/// 把上报的错误转成窗口通知
fn start_error_notifications(mut errors: UnboundedReceiver<String>, cx: &mut App) {
    cx.spawn(async move |async_cx| {
        while let Some(message) = errors.recv().await {
            let _ = async_cx.update(|cx| {
                if let Some(window) = cx.active_window() {
                    let _ = cx.update_window(window, |_, window, cx| {
                        let notification = Notification::new()
                            .message(message)
                            .with_type(NotificationType::Error)
                            .w_80()
                            .py_2();
                        window.push_notification(notification, cx);
                    });
                }
            });
        }
    })
    .detach();
}

impl Render for EditorPage {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.dialog
            .update(cx, |dialog, cx| dialog.ensure_input_created(window, cx));

        let is_open = self.dialog.read(cx).is_open();
        let notification_layer = Root::render_notification_layer(window, cx);
        let overlay = is_open.then(|| render_text_editor_overlay(self.dialog.clone(), cx));

        div()
            .size_full()
            .relative()
            .bg(cx.theme().background)
            .children(overlay)
            .children(notification_layer)
    }
}
