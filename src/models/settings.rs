// Settings 配置数据结构

use serde::{Deserialize, Serialize};

// ======================== 主配置结构 ========================

/// 应用设置（持久化用）
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub theme: ThemeSettings,
    pub editor: EditorSettings,
    pub connection: ConnectionSettings,
}

// ======================== 主题设置 ========================

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
    System,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub enum Language {
    #[default]
    Chinese,
    English,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ThemeSettings {
    pub mode: ThemeMode,
    pub language: Language,
}

// ======================== 编辑器设置 ========================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    /// 外置编辑器路径，为空时使用系统默认应用
    pub external_editor_path: String,
    /// 允许编辑的最大文件大小（KB），0 表示不限制
    pub max_edit_file_size_kb: u32,
    /// 外置编辑器保存并回传成功后是否关闭对话框
    pub close_after_external_save: bool,
    /// 临时目录，为空时使用系统临时目录
    pub temp_dir: String,
    /// 临时文件变化后等待多久再回传（毫秒）
    pub upload_settle_ms: u64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            external_editor_path: String::new(),
            max_edit_file_size_kb: 10 * 1024,
            close_after_external_save: true,
            temp_dir: String::new(),
            upload_settle_ms: 300,
        }
    }
}

impl EditorSettings {
    /// 最大文件大小（字节）
    pub fn max_edit_file_size(&self) -> Option<u64> {
        match self.max_edit_file_size_kb {
            0 => None,
            kb => Some(kb as u64 * 1024),
        }
    }

    /// 外置编辑器路径（空字符串视为未配置）
    pub fn external_editor(&self) -> Option<String> {
        let path = self.external_editor_path.trim();
        if path.is_empty() {
            None
        } else {
            Some(path.to_string())
        }
    }
}

// ======================== 连接设置 ========================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectionSettings {
    pub connect_timeout_secs: u64,
    pub keepalive_enabled: bool,
    pub keepalive_interval_secs: u64,
    pub keepalive_max_retries: u32,
    /// 首次连接时自动信任并记录主机密钥（类似 OpenSSH accept-new）
    pub accept_new_host_keys: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            keepalive_enabled: true,
            keepalive_interval_secs: 60,
            keepalive_max_retries: 3,
            accept_new_host_keys: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"editor":{"close_after_external_save":false}}"#).unwrap();
        assert!(!settings.editor.close_after_external_save);
        assert_eq!(settings.editor.max_edit_file_size_kb, 10 * 1024);
        assert_eq!(settings.editor.upload_settle_ms, 300);
        assert_eq!(settings.connection, ConnectionSettings::default());
        assert_eq!(settings.theme.mode, ThemeMode::Dark);
    }

    #[test]
    fn test_max_edit_file_size() {
        let mut editor = EditorSettings::default();
        assert_eq!(editor.max_edit_file_size(), Some(10 * 1024 * 1024));
        editor.max_edit_file_size_kb = 0;
        assert_eq!(editor.max_edit_file_size(), None);
    }

    #[test]
    fn test_external_editor_blank_is_none() {
        let mut editor = EditorSettings::default();
        assert_eq!(editor.external_editor(), None);
        editor.external_editor_path = "  code ".to_string();
        assert_eq!(editor.external_editor().as_deref(), Some("code"));
    }
}
