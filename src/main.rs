// ShellEdit - 本地 / 远程文件编辑器
// 应用入口

// Windows 下 release 模式隐藏终端窗口
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::sync::Arc;

use clap::Parser;
use gpui::*;
use gpui_component::Root;
use tracing::{info, warn};

use shelledit::cli::Cli;
use shelledit::components::text_editor::TextEditorDialogState;
use shelledit::editor::{
    ChannelReporter, EditorCallbacks, EditorOptions, EditorServices, TextEditorController,
    TextEditorProps,
};
use shelledit::pages::EditorPage;
use shelledit::services::fs::LocalFs;
use shelledit::services::sftp::SshSftpConnector;
use shelledit::services::storage;
use shelledit::ssh::SshManager;

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    // 可以通过 RUST_LOG 环境变量控制日志级别，例如：RUST_LOG=debug cargo run
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false) // 不显示 target（模块路径）
        .init();

    let cli = Cli::parse();

    let mut settings = storage::load_settings().unwrap_or_else(|e| {
        warn!("[App] 读取设置失败，使用默认设置: {:#}", e);
        Default::default()
    });
    // 首次运行写入默认设置，方便用户修改
    if matches!(storage::get_settings_file(), Ok(path) if !path.exists()) {
        if let Err(e) = storage::save_settings(&settings) {
            warn!("[App] 保存默认设置失败: {:#}", e);
        }
    }
    let plan = cli.resolve(&mut settings)?;
    info!("[App] Editing {}", plan.file.resolved_path());

    let (reporter, errors) = ChannelReporter::new();

    let services = EditorServices {
        fs: Arc::new(LocalFs::new(settings.editor.external_editor())),
        // 本地文件不会发起连接
        sftp: Arc::new(SshSftpConnector::new(
            plan.ssh.clone().unwrap_or_default(),
            plan.session_id.clone(),
        )),
        reporter: Arc::new(reporter),
    };
    let callbacks = EditorCallbacks {
        after_write: Box::new(|| info!("[App] File saved")),
        on_close: Box::new(|| info!("[App] Editor closed")),
    };
    let options = EditorOptions::from_settings(&settings.editor, plan.session_id.clone());
    let controller = TextEditorController::new(
        TextEditorProps {
            file: plan.file,
            visible: true,
        },
        services,
        callbacks,
        options,
    );

    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx: &mut App| {
        // 初始化 gpui-component 组件库（必须在使用任何组件之前调用）
        gpui_component::init(cx);

        // 根据保存的设置初始化主题模式
        shelledit::theme::apply_mode(&settings.theme.mode, cx);
        shelledit::theme::init(cx);

        let lang = settings.theme.language.clone();
        let dialog = cx.new(|_| TextEditorDialogState::new(controller, lang));

        // 初始化全局快捷键（Cmd+Q / Cmd+S / Esc）
        shelledit::keybindings::init(cx, &dialog);

        // 退出前断开 SSH 连接
        cx.on_app_quit(|_| async {
            let _ = SshManager::global()
                .run(SshManager::global().close_all())
                .await;
        })
        .detach();

        let bounds = Bounds::centered(None, size(px(900.), px(720.)), cx);
        let window = cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                ..Default::default()
            },
            |window, cx| {
                let view = cx.new(|cx| EditorPage::new(dialog, errors, cx));
                // 使用 Root 包装视图，这是 gpui-component 的要求
                cx.new(|cx| Root::new(view, window, cx))
            },
        );

        if let Err(e) = window {
            tracing::error!("[App] Failed to open window: {}", e);
            cx.quit();
            return;
        }

        cx.activate(true);
    });

    Ok(())
}
