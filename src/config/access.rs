// Author: Dustin Pilgrim
// License: MIT

use super::*;

impl Configuration {
    /// Get a typed value from the configuration using dot notation.
    ///
    /// Automatically handles both `snake_case` and `kebab-case` key names.
    ///
    /// # Examples
    /// ```no_run
    /// # use blockcfg::Configuration;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = Configuration::from_file("family.json")?;
    /// let version: u32 = config.get("version")?;
    /// let birthday: String = config.get("jane_doe.birthday")?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns error if path doesn't exist or value can't be converted to type T.
    pub fn get<T>(&self, path: &str) -> Result<T, ConfigError>
    where
        T: TryFrom<Value, Error = ConfigError>,
    {
        let value = self.get_value_flexible(path)?;
        T::try_from(value).map_err(|e| enhance_error_with_line_info(e, path, &self.raw_content))
    }

    /// Get an optional typed value - returns `None` if key doesn't exist.
    pub fn get_optional<T>(&self, path: &str) -> Result<Option<T>, ConfigError>
    where
        T: TryFrom<Value, Error = ConfigError>,
    {
        match self.get_value_flexible(path) {
            Ok(value) => T::try_from(value)
                .map(Some)
                .map_err(|e| enhance_error_with_line_info(e, path, &self.raw_content)),
            Err(ConfigError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get a value with a fallback default.
    ///
    /// # Examples
    /// ```no_run
    /// # use blockcfg::Configuration;
    /// # let config = Configuration::from_file("family.json").unwrap();
    /// let version = config.get_or("version", 1u32);
    /// ```
    pub fn get_or<T>(&self, path: &str, default: T) -> T
    where
        T: TryFrom<Value, Error = ConfigError>,
    {
        self.get(path).unwrap_or(default)
    }

    /// Get a raw `Value` by exact dotted path. The empty path returns the
    /// whole tree.
    pub fn get_value(&self, path: &str) -> Result<Value, ConfigError> {
        if path.trim().is_empty() {
            return Ok(self.root());
        }

        let segments: Vec<&str> = path.split('.').collect();
        self.tree.lookup(segments.as_slice()).cloned().ok_or_else(|| {
            let (line, snippet) = helpers::find_config_line(path, &self.raw_content);
            ConfigError::NotFound {
                path: path.to_string(),
                hint: Some(if line > 0 {
                    format!("Closest definition on line {}: {}", line, snippet)
                } else {
                    "Check that the path exists in your config file".into()
                }),
                code: Some(304),
            }
        })
    }

    /// Tries each segment as written, then its snake_case and kebab-case
    /// spellings, so `log_level` and `log-level` both work.
    fn get_value_flexible(&self, path: &str) -> Result<Value, ConfigError> {
        // Fast path: exact
        let not_found = match self.get_value(path) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        fn dfs(cfg: &Configuration, segs: &[&str], i: usize, cur: &mut Vec<String>) -> Option<Value> {
            if i == segs.len() {
                return cfg.tree.lookup(cur.as_slice()).cloned();
            }
            for v in helpers::segment_variants(segs[i]) {
                cur.push(v);
                if let Some(val) = dfs(cfg, segs, i + 1, cur) {
                    return Some(val);
                }
                cur.pop();
            }
            None
        }

        let segs: Vec<&str> = path.split('.').collect();
        dfs(self, &segs, 0, &mut Vec::new()).ok_or(not_found)
    }

    /// Get all keys at a given path level.
    ///
    /// # Examples
    /// ```no_run
    /// # use blockcfg::Configuration;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = Configuration::from_file("family.json")?;
    /// for key in config.get_keys("")? {
    ///     println!("{}", key);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_keys(&self, path: &str) -> Result<Vec<String>, ConfigError> {
        match self.get_value_flexible(path)? {
            Value::Object(items) => Ok(items.keys().cloned().collect()),
            other => Err(ConfigError::TypeError {
                message: format!("Path '{}' is a {} value, not an object", path, other.type_name()),
                line: 0,
                column: 0,
                hint: Some("Only blocks and objects have keys".into()),
                code: Some(306),
            }),
        }
    }

    /// Check if a configuration path exists.
    pub fn has(&self, path: &str) -> bool {
        self.get_value_flexible(path).is_ok()
    }
}

/// Enhance type/validation errors with line number information from the document.
pub(super) fn enhance_error_with_line_info(e: ConfigError, path: &str, raw_content: &str) -> ConfigError {
    let (line, snippet) = helpers::find_config_line(path, raw_content);
    if line == 0 {
        return e;
    }

    match e {
        ConfigError::TypeError { message, hint, code, .. } => ConfigError::TypeError {
            message: format!("{}\n  → {}", message, snippet),
            line,
            column: 0,
            hint,
            code,
        },
        ConfigError::ValidationError { message, hint, code, .. } => ConfigError::ValidationError {
            message: format!("{}\n  → {}", message, snippet),
            line,
            column: 0,
            hint,
            code,
        },
        other => other,
    }
}
