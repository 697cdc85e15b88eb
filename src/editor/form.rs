// 编辑表单：字段值、初始值与校验规则

/// 文本字段名
pub const TEXT_FIELD: &str = "text";

/// 字段校验规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// 不能为空（忽略空白）
    Required,
    /// 内容字节数上限
    MaxBytes(u64),
}

impl FieldRule {
    fn check(&self, value: &str) -> Result<(), String> {
        match self {
            FieldRule::Required => {
                if value.trim().is_empty() {
                    Err("This field is required".to_string())
                } else {
                    Ok(())
                }
            }
            FieldRule::MaxBytes(limit) => {
                if value.len() as u64 > *limit {
                    Err(format!("Content exceeds {} bytes", limit))
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct FormField {
    name: String,
    initial: String,
    value: String,
    rules: Vec<FieldRule>,
    error: Option<String>,
}

/// 校验通过后的字段值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: Vec<(String, String)>,
}

impl FormValues {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// 校验失败结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors {
    /// 第一个未通过校验的字段（UI 用于聚焦）
    pub first_invalid: String,
    pub errors: Vec<FieldError>,
}

/// 编辑表单
#[derive(Debug, Clone, Default)]
pub struct EditorForm {
    fields: Vec<FormField>,
}

impl EditorForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册字段，同名字段会被替换
    pub fn register(&mut self, name: &str, initial: impl Into<String>, rules: Vec<FieldRule>) {
        let initial = initial.into();
        let field = FormField {
            name: name.to_string(),
            value: initial.clone(),
            initial,
            rules,
            error: None,
        };
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// 修改字段当前值，字段未注册时返回 false
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                field.value = value.into();
                field.error = None;
                true
            }
            None => false,
        }
    }

    /// 设置初始值并同步当前值（加载完成后调用）
    pub fn set_initial(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.field_mut(name) {
            let value = value.into();
            field.value = value.clone();
            field.initial = value;
            field.error = None;
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.error.as_deref())
    }

    /// 所有字段恢复为初始值
    pub fn reset_fields(&mut self) {
        for field in &mut self.fields {
            field.value = field.initial.clone();
            field.error = None;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.iter().any(|f| f.value != f.initial)
    }

    /// 校验全部字段
    pub fn validate(&mut self) -> Result<FormValues, FormErrors> {
        let mut errors = Vec::new();

        for field in &mut self.fields {
            field.error = field
                .rules
                .iter()
                .find_map(|rule| rule.check(&field.value).err());
            if let Some(message) = &field.error {
                errors.push(FieldError {
                    field: field.name.clone(),
                    message: message.clone(),
                });
            }
        }

        if let Some(first) = errors.first() {
            return Err(FormErrors {
                first_invalid: first.field.clone(),
                errors,
            });
        }

        Ok(FormValues {
            values: self
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.value.clone()))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_initial_and_reset() {
        let mut form = EditorForm::new();
        form.register(TEXT_FIELD, "", vec![]);
        form.set_initial(TEXT_FIELD, "hello");
        assert!(!form.is_dirty());

        assert!(form.set_value(TEXT_FIELD, "changed"));
        assert!(form.is_dirty());
        assert_eq!(form.value(TEXT_FIELD), Some("changed"));

        form.reset_fields();
        assert_eq!(form.value(TEXT_FIELD), Some("hello"));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_unknown_field() {
        let mut form = EditorForm::new();
        assert!(!form.set_value("missing", "x"));
        assert_eq!(form.value("missing"), None);
    }

    #[test]
    fn test_validate_max_bytes() {
        let mut form = EditorForm::new();
        form.register(TEXT_FIELD, "", vec![FieldRule::MaxBytes(4)]);

        form.set_value(TEXT_FIELD, "12345");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.first_invalid, TEXT_FIELD);
        assert!(form.error(TEXT_FIELD).is_some());

        form.set_value(TEXT_FIELD, "1234");
        assert!(form.error(TEXT_FIELD).is_none());
        let values = form.validate().unwrap();
        assert_eq!(values.get(TEXT_FIELD), Some("1234"));
    }

    #[test]
    fn test_validate_reports_first_invalid_in_order() {
        let mut form = EditorForm::new();
        form.register("title", "", vec![FieldRule::Required]);
        form.register(TEXT_FIELD, "", vec![FieldRule::Required]);

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.first_invalid, "title");
        assert_eq!(errors.errors.len(), 2);
    }

    #[test]
    fn test_empty_text_is_valid_without_required() {
        let mut form = EditorForm::new();
        form.register(TEXT_FIELD, "", vec![FieldRule::MaxBytes(10)]);
        assert_eq!(form.validate().unwrap().get(TEXT_FIELD), Some(""));
    }
}
