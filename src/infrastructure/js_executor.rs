//! JS 执行器 - 基础设施层
//!
//! 持有测验页面，只暴露"在页面里执行脚本"的能力

use anyhow::{Context, Result};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::BrowserError;

/// JS 执行器
///
/// 唯一的 Page 持有者；读取页面和展示结果都通过它执行脚本
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self
            .page
            .evaluate(js_code.into())
            .await
            .map_err(BrowserError::ScriptExecutionFailed)?;
        let json_value: JsonValue = result.into_value().context("脚本返回值无法转换为 JSON")?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}

/// 把参数以 JSON 字面量的形式注入脚本
///
/// 脚本通过 `payload` 变量读取参数，避免手工拼接字符串
pub fn with_payload<P: Serialize>(payload: &P, body: &str) -> Result<String> {
    let json = serde_json::to_string(payload)?;
    Ok(format!(
        "(() => {{\n    const payload = {};\n{}\n}})()",
        json, body
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_is_embedded_as_json() {
        let script = with_payload(&json!({"answers": ["a\"b", "</script>"]}), "    return payload;")
            .unwrap();

        assert!(script.starts_with("(() => {"));
        assert!(script.contains(r#"const payload = {"answers":["a\"b","</script>"]};"#));
        assert!(script.ends_with("})()"));
    }
}
