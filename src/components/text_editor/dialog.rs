// 文本编辑对话框渲染组件

use gpui::*;
use gpui_component::input::Input;
use gpui_component::ActiveTheme;

use crate::i18n;

use super::state::{save_text_editor, TextEditorDialogState};

/// 渲染文本编辑对话框覆盖层
pub fn render_text_editor_overlay(
    state: Entity<TextEditorDialogState>,
    cx: &App,
) -> impl IntoElement {
    let state_read = state.read(cx);
    let lang = state_read.lang.clone();
    let title = state_read.title();
    let text_input = state_read.text_input.clone();
    let is_loading = state_read.is_loading();
    let is_external = state_read.is_external();
    let is_failed = state_read.is_failed();
    let is_fetching = state_read.is_fetching();
    let is_writing = state_read.is_writing();
    let accepts_input = state_read.accepts_input();
    let watched_path = state_read
        .controller()
        .watched_path()
        .map(|p| p.display().to_string());

    let state_cancel = state.clone();
    let state_reset = state.clone();
    let state_save = state.clone();

    let bg_color = cx.theme().popover;
    let border_color = cx.theme().border;
    let foreground = cx.theme().foreground;
    let muted_foreground = cx.theme().muted_foreground;
    let danger = cx.theme().danger;

    // 内容区域：加载中 / 外置编辑提示 / 加载失败 / 文本框
    let body = if is_fetching {
        div()
            .text_sm()
            .text_color(muted_foreground)
            .child(i18n::t(&lang, "common.loading"))
            .into_any_element()
    } else if is_external {
        div()
            .flex()
            .flex_col()
            .gap_2()
            .child(
                div()
                    .text_sm()
                    .text_color(foreground)
                    .child(i18n::t(&lang, "editor.external.notice")),
            )
            .children(watched_path.map(|path| {
                div()
                    .text_xs()
                    .text_color(muted_foreground)
                    .child(format!("{}: {}", i18n::t(&lang, "editor.external.local_copy"), path))
            }))
            .into_any_element()
    } else if is_failed {
        div()
            .text_sm()
            .text_color(danger)
            .child(i18n::t(&lang, "editor.load_failed"))
            .into_any_element()
    } else if let Some(input) = &text_input {
        Input::new(input).into_any_element()
    } else {
        div()
            .text_sm()
            .text_color(muted_foreground)
            .child(i18n::t(&lang, "common.loading"))
            .into_any_element()
    };

    // 只有本地编辑且空闲时可保存 / 重置，写入未完成时不可取消
    let actions_disabled = !accepts_input;

    div()
        .id("text-editor-dialog-overlay")
        .absolute()
        .top_0()
        .left_0()
        .size_full()
        .bg(gpui::black().opacity(0.5))
        .flex()
        .items_center()
        .justify_center()
        .on_mouse_down(MouseButton::Left, move |_, _, cx| {
            cx.stop_propagation();
        })
        .child(
            div()
                .w(px(760.))
                .max_h(px(640.))
                .bg(bg_color)
                .rounded_lg()
                .border_1()
                .border_color(border_color)
                .p_6()
                .flex()
                .flex_col()
                .gap_4()
                // 标题
                .child(
                    div()
                        .text_lg()
                        .font_weight(FontWeight::BOLD)
                        .text_color(foreground)
                        .truncate()
                        .child(title),
                )
                .child(
                    div()
                        .id("text-editor-body")
                        .flex_1()
                        .overflow_y_scroll()
                        .child(body),
                )
                // 底部按钮
                .child(
                    div()
                        .flex()
                        .justify_end()
                        .gap_3()
                        .pt_2()
                        // 取消按钮
                        .child({
                            let cancel_btn = div()
                                .id("text-editor-cancel-btn")
                                .px_4()
                                .py_2()
                                .bg(cx.theme().secondary)
                                .rounded_md()
                                .child(
                                    div()
                                        .text_sm()
                                        .text_color(foreground)
                                        .child(i18n::t(&lang, "common.cancel")),
                                );

                            if is_writing {
                                cancel_btn.opacity(0.6)
                            } else {
                                cancel_btn
                                    .cursor_pointer()
                                    .hover(move |s| s.bg(cx.theme().secondary_hover))
                                    .on_click(move |_, _, cx| {
                                        state_cancel.update(cx, |s, cx| {
                                            s.cancel();
                                            cx.notify();
                                        });
                                    })
                            }
                        })
                        // 重置按钮
                        .child({
                            let reset_btn = div()
                                .id("text-editor-reset-btn")
                                .px_4()
                                .py_2()
                                .bg(cx.theme().secondary)
                                .rounded_md()
                                .child(
                                    div()
                                        .text_sm()
                                        .text_color(foreground)
                                        .child(i18n::t(&lang, "editor.reset")),
                                );

                            if actions_disabled {
                                reset_btn.opacity(0.6)
                            } else {
                                reset_btn
                                    .cursor_pointer()
                                    .hover(move |s| s.bg(cx.theme().secondary_hover))
                                    .on_click(move |_, _, cx| {
                                        state_reset.update(cx, |s, cx| {
                                            s.reset();
                                            cx.notify();
                                        });
                                    })
                            }
                        })
                        // 保存按钮
                        .child({
                            let save_btn = div()
                                .id("text-editor-save-btn")
                                .px_4()
                                .py_2()
                                .bg(cx.theme().primary)
                                .rounded_md()
                                .child(
                                    div()
                                        .text_sm()
                                        .text_color(cx.theme().primary_foreground)
                                        .child(if is_loading {
                                            i18n::t(&lang, "common.loading")
                                        } else {
                                            i18n::t(&lang, "common.save")
                                        }),
                                );

                            if actions_disabled {
                                save_btn.opacity(0.6)
                            } else {
                                save_btn
                                    .cursor_pointer()
                                    .hover(move |s| s.bg(cx.theme().primary_hover))
                                    .on_click(move |_, _, cx| {
                                        save_text_editor(state_save.clone(), cx);
                                    })
                            }
                        }),
                ),
        )
}
