use gpui::*;
use gpui_component::theme::{Theme, ThemeMode as GpuiThemeMode};
use std::rc::Rc;

use crate::models::settings::ThemeMode;

/// 根据设置切换明暗模式
pub fn apply_mode(mode: &ThemeMode, cx: &mut App) {
    match mode {
        ThemeMode::Light => Theme::change(GpuiThemeMode::Light, None, cx),
        ThemeMode::Dark => Theme::change(GpuiThemeMode::Dark, None, cx),
        ThemeMode::System => {} // 默认已跟随系统
    }
}

/// 初始化全局主题配置
/// 深色模式使用深蓝色风格
pub fn init(cx: &mut App) {
    let (mut dark_config, mut light_config) = {
        let theme = Theme::global(cx);
        ((*theme.dark_theme).clone(), (*theme.light_theme).clone())
    };

    // ================== Dark Mode Customization ==================
    // 主背景：深蓝色 #20293A
    dark_config.colors.background = Some("#20293A".into());
    // 对话框：稍亮的深蓝色 #283446
    dark_config.colors.popover = Some("#283446".into());
    dark_config.colors.muted_foreground = Some("#94a3b8".into()); // slate-400
    // 输入框与边框
    dark_config.colors.input = Some("#475569".into());
    dark_config.colors.border = Some("#4a5c72".into());

    dark_config.colors.primary = Some("#3b82f6".into()); // Blue 500
    dark_config.colors.primary_hover = Some("#2563eb".into()); // Blue 600
    dark_config.colors.primary_foreground = Some("#ffffff".into());
    dark_config.colors.secondary = Some("#334155".into()); // Slate 700
    dark_config.colors.secondary_hover = Some("#475569".into()); // Slate 600
    dark_config.colors.secondary_foreground = Some("#ffffff".into());

    // ================== Light Mode Customization ==================
    light_config.colors.primary = Some("#3b82f6".into());
    light_config.colors.primary_hover = Some("#2563eb".into());
    light_config.colors.primary_foreground = Some("#ffffff".into());
    light_config.colors.secondary = Some("#f1f5f9".into()); // Slate 100
    light_config.colors.secondary_hover = Some("#e2e8f0".into()); // Slate 200
    light_config.colors.secondary_foreground = Some("#0f172a".into()); // Slate 900

    let theme = Theme::global_mut(cx);
    theme.dark_theme = Rc::new(dark_config);
    theme.light_theme = Rc::new(light_config);

    if theme.mode.is_dark() {
        theme.apply_config(&theme.dark_theme.clone());
    } else {
        theme.apply_config(&theme.light_theme.clone());
    }
}
