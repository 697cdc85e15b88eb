// 文本编辑对话框状态管理
// 控制器的 IO 任务在 SSH 运行时执行，结果回到 GPUI 线程后再更新状态

use gpui::{App, AppContext, Context, Entity, Window};
use gpui_component::input::InputState;
use tracing::{debug, error};

use crate::editor::{
    coalesce_watch_events, EditPhase, SubmitStep, TextEditorController, TEXT_FIELD,
};
use crate::i18n;
use crate::models::settings::Language;
use crate::ssh::SshManager;

/// 文本编辑对话框状态
pub struct TextEditorDialogState {
    controller: TextEditorController,
    /// 界面语言
    pub lang: Language,
    /// 多行文本输入框（渲染时创建）
    pub text_input: Option<Entity<InputState>>,
    /// 待写入输入框的内容（写入需要 Window，在渲染时应用）
    pending_text: Option<String>,
}

impl TextEditorDialogState {
    pub fn new(controller: TextEditorController, lang: Language) -> Self {
        Self {
            controller,
            lang,
            text_input: None,
            pending_text: None,
        }
    }

    pub fn controller(&self) -> &TextEditorController {
        &self.controller
    }

    pub fn is_open(&self) -> bool {
        self.controller.is_visible()
    }

    pub fn is_loading(&self) -> bool {
        self.controller.is_loading()
    }

    pub fn is_external(&self) -> bool {
        self.controller.is_external()
    }

    /// 正在读取 / 下载文件
    pub fn is_fetching(&self) -> bool {
        matches!(self.controller.phase(), EditPhase::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.controller.phase(), EditPhase::Failed)
    }

    pub fn is_writing(&self) -> bool {
        self.controller.is_writing()
    }

    /// 保存 / 重置是否可用
    pub fn accepts_input(&self) -> bool {
        self.controller.accepts_input()
    }

    /// 对话框标题
    pub fn title(&self) -> String {
        let key = if self.controller.file().is_remote() {
            "editor.title.remote"
        } else {
            "editor.title.local"
        };
        format!(
            "{}: {}",
            i18n::t(&self.lang, key),
            self.controller.session().path
        )
    }

    /// 确保输入框已创建，并写入待同步的内容
    pub fn ensure_input_created(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.text_input.is_none() {
            let placeholder = i18n::t(&self.lang, "editor.placeholder");
            self.text_input = Some(cx.new(|cx| {
                InputState::new(window, cx)
                    .placeholder(placeholder)
                    .auto_grow(20, 30)
            }));
        }

        if let Some(text) = self.pending_text.take() {
            if let Some(input) = &self.text_input {
                input.update(cx, |input, cx| input.set_value(text, window, cx));
            }
        }
    }

    fn input_text(&self, cx: &App) -> Option<String> {
        self.text_input
            .as_ref()
            .map(|input| input.read(cx).value().to_string())
    }

    /// 表单内容同步到输入框
    fn sync_input_from_form(&mut self) {
        if matches!(self.controller.phase(), EditPhase::Editing(_)) {
            self.pending_text = self
                .controller
                .form()
                .value(TEXT_FIELD)
                .map(str::to_string);
        }
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        self.sync_input_from_form();
    }

    pub fn cancel(&mut self) {
        self.controller.cancel();
    }
}

/// 打开对话框：挂载控制器、启动加载和文件监控事件处理
pub fn open_text_editor(state: Entity<TextEditorDialogState>, cx: &mut App) {
    let (task, events, settle) = state.update(cx, |s, cx| {
        let task = s.controller.mount();
        let events = s.controller.take_watch_events();
        cx.notify();
        (task, events, s.controller.upload_settle())
    });

    if let Some(mut events) = events {
        let weak = state.downgrade();
        cx.spawn(async move |async_cx| {
            while let Some(first) = events.recv().await {
                // 等待编辑器写完，再合并期间产生的事件
                async_cx.background_executor().timer(settle).await;
                let event = coalesce_watch_events(first, &mut events);

                let Ok(Some(task)) = weak.update(async_cx, |s, cx| {
                    let task = s.controller.begin_upload(&event);
                    cx.notify();
                    task
                }) else {
                    continue;
                };
                let Ok(result) = SshManager::global().run(task.run()).await else {
                    error!("[Editor] Upload task dropped");
                    let _ = weak.update(async_cx, |s, _| s.controller.abandon_transfer());
                    continue;
                };
                if weak
                    .update(async_cx, |s, cx| {
                        s.controller.finish_upload(result);
                        cx.notify();
                    })
                    .is_err()
                {
                    break;
                }
            }
            debug!("[Editor] Watch event loop stopped");
        })
        .detach();
    }

    let Some(task) = task else {
        return;
    };
    let rx = SshManager::global().run(task.run());
    cx.spawn(async move |async_cx| {
        let Ok(result) = rx.await else {
            error!("[Editor] Load task dropped");
            return;
        };
        let _ = async_cx.update(|cx| {
            state.update(cx, |s, cx| {
                s.controller.finish_load(result);
                s.sync_input_from_form();
                cx.notify();
            });
        });
    })
    .detach();
}

/// 保存：提交输入框内容（按钮和快捷键共用）
pub fn save_text_editor(state: Entity<TextEditorDialogState>, cx: &mut App) {
    let step = state.update(cx, |s, cx| {
        let Some(text) = s.input_text(cx) else {
            return SubmitStep::Ignored;
        };
        let step = s.controller.submit_text(text);
        cx.notify();
        step
    });

    let SubmitStep::Write(task) = step else {
        return;
    };
    let rx = SshManager::global().run(task.run());
    cx.spawn(async move |async_cx| {
        let Ok(result) = rx.await else {
            error!("[Editor] Write task dropped");
            let _ = async_cx.update(|cx| {
                state.update(cx, |s, cx| {
                    s.controller.abandon_transfer();
                    cx.notify();
                })
            });
            return;
        };
        let _ = async_cx.update(|cx| {
            state.update(cx, |s, cx| {
                s.controller.finish_submit(result);
                cx.notify();
            });
        });
    })
    .detach();
}
