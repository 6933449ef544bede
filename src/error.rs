// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

/// The main error type for loading and evaluating block configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The source text is not a well-formed document.
    SyntaxError {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a body does not match its schema: a required attribute is
    /// missing, an unknown attribute is present, or a block carries the wrong
    /// number of labels. Always fatal.
    StructuralError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised on the strict pass for an attribute whose expression still
    /// cannot be evaluated.
    UnresolvedExpression {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// A schema definition is inconsistent.
    SchemaError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    TypeError {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    ValidationError {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    NotFound {
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    FileError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    ExportError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl ConfigError {
    pub fn code(&self) -> Option<u32> {
        match self {
            ConfigError::SyntaxError { code, .. }
            | ConfigError::StructuralError { code, .. }
            | ConfigError::UnresolvedExpression { code, .. }
            | ConfigError::SchemaError { code, .. }
            | ConfigError::TypeError { code, .. }
            | ConfigError::ValidationError { code, .. }
            | ConfigError::NotFound { code, .. }
            | ConfigError::FileError { code, .. }
            | ConfigError::ExportError { code, .. } => *code,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, ConfigError::StructuralError { .. })
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, ConfigError::UnresolvedExpression { .. })
    }
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

fn at_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::SyntaxError { message, line, column, hint, code } =>
                write!(f, "[blockcfg] Syntax Error at {}:{}: {}{}",
                    line, column, message, suffix(hint, code)),
            ConfigError::StructuralError { message, path, hint, code } =>
                write!(f, "[blockcfg] Structural Error in '{}': {}{}",
                    at_path(path), message, suffix(hint, code)),
            ConfigError::UnresolvedExpression { message, path, hint, code } =>
                write!(f, "[blockcfg] Unresolved expression for '{}': {}{}",
                    at_path(path), message, suffix(hint, code)),
            ConfigError::SchemaError { message, hint, code } =>
                write!(f, "[blockcfg] Schema Error: {}{}", message, suffix(hint, code)),
            ConfigError::TypeError { message, line, column, hint, code } =>
                write!(f, "[blockcfg] Type Error at {}:{}: {}{}",
                    line, column, message, suffix(hint, code)),
            ConfigError::ValidationError { message, line, column, hint, code } =>
                write!(f, "[blockcfg] Validation Error at {}:{}: {}{}",
                    line, column, message, suffix(hint, code)),
            ConfigError::NotFound { path, hint, code } =>
                write!(f, "[blockcfg] Path '{}' not found in configuration{}",
                    path, suffix(hint, code)),
            ConfigError::FileError { message, path, hint, code } =>
                write!(f, "[blockcfg] File Error '{}': {}{}", path, message, suffix(hint, code)),
            ConfigError::ExportError { message, hint, code } =>
                write!(f, "[blockcfg] Export Error: {}{}", message, suffix(hint, code)),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path_hint_and_code() {
        let err = ConfigError::StructuralError {
            message: "Missing required argument 'birthday'".into(),
            path: "jane_doe".into(),
            hint: Some("Add `birthday` to the block".into()),
            code: Some(601),
        };
        let text = err.to_string();
        assert!(text.contains("'jane_doe'"));
        assert!(text.contains("Hint: Add `birthday`"));
        assert!(text.contains("Code: 601"));
        assert!(err.is_structural());
        assert_eq!(err.code(), Some(601));
    }

    #[test]
    fn test_display_root_path() {
        let err = ConfigError::UnresolvedExpression {
            message: "boom".into(),
            path: String::new(),
            hint: None,
            code: None,
        };
        assert_eq!(err.to_string(), "[blockcfg] Unresolved expression for '<root>': boom");
        assert!(err.is_unresolved());
    }
}
