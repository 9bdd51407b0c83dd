//! 实验参数
//!
//! 参数是一个 `key -> f64` 映射，可以从 JSON 对象或者命令行的
//! `key=value` 赋值中读取。缺少必需的键时返回带键名的配置错误。

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// 实验参数表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, f64>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式设置参数
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// 读取必需参数
    pub fn get(&self, key: &str) -> Result<f64, ConfigError> {
        self.0
            .get(key)
            .copied()
            .ok_or_else(|| ConfigError::MissingParameter(key.to_string()))
    }

    /// 读取必需的概率参数，必须位于 `[0, 1]`
    pub fn probability(&self, key: &str) -> Result<f64, ConfigError> {
        let v = self.get(key)?;
        if !(0.0..=1.0).contains(&v) {
            return Err(ConfigError::InvalidParameter {
                key: key.to_string(),
                value: v,
                reason: "probability must lie in [0, 1]",
            });
        }
        Ok(v)
    }

    /// 读取必需的非负有限参数（例如时长）
    pub fn non_negative(&self, key: &str) -> Result<f64, ConfigError> {
        let v = self.get(key)?;
        if !v.is_finite() || v < 0.0 {
            return Err(ConfigError::InvalidParameter {
                key: key.to_string(),
                value: v,
                reason: "value must be finite and non-negative",
            });
        }
        Ok(v)
    }

    /// 应用一条 `key=value` 赋值（覆盖已有值）
    pub fn assign(&mut self, assignment: &ParamAssignment) {
        self.set(assignment.key.clone(), assignment.value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// 命令行上的一条 `key=value` 参数赋值
#[derive(Debug, Clone, PartialEq)]
pub struct ParamAssignment {
    pub key: String,
    pub value: f64,
}

impl FromStr for ParamAssignment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedAssignment(s.to_string());
        let (key, value) = s.split_once('=').ok_or_else(malformed)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(malformed());
        }
        let value = value.trim().parse::<f64>().map_err(|_| malformed())?;
        Ok(ParamAssignment {
            key: key.to_string(),
            value,
        })
    }
}
