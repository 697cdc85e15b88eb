use crate::models::settings::Language;

pub fn t(lang: &Language, key: &'static str) -> &'static str {
    match lang {
        Language::Chinese => zh_cn(key),
        Language::English => en_us(key),
    }
}

fn zh_cn(key: &'static str) -> &'static str {
    match key {
        // 通用
        "common.save" => "保存",
        "common.cancel" => "取消",
        "common.loading" => "加载中...",

        // 编辑器
        "editor.title.local" => "编辑文件",
        "editor.title.remote" => "编辑远程文件",
        "editor.placeholder" => "文件内容",
        "editor.reset" => "重置",
        "editor.load_failed" => "文件加载失败，请关闭对话框后重试",
        "editor.external.notice" => "文件已在外置编辑器中打开，保存后会自动上传到服务器",
        "editor.external.local_copy" => "本地副本",

        _ => key,
    }
}

fn en_us(key: &'static str) -> &'static str {
    match key {
        // Common
        "common.save" => "Save",
        "common.cancel" => "Cancel",
        "common.loading" => "Loading...",

        // Editor
        "editor.title.local" => "Edit file",
        "editor.title.remote" => "Edit remote file",
        "editor.placeholder" => "File content",
        "editor.reset" => "Reset",
        "editor.load_failed" => "Failed to load the file. Close the dialog and try again.",
        "editor.external.notice" => {
            "The file is open in an external editor. Saved changes are uploaded to the server."
        }
        "editor.external.local_copy" => "Local copy",

        _ => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        assert_eq!(t(&Language::Chinese, "common.save"), "保存");
        assert_eq!(t(&Language::English, "editor.title.remote"), "Edit remote file");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        assert_eq!(t(&Language::English, "editor.missing"), "editor.missing");
    }
}
