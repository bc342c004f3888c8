use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "PSE_CONFIG";

/// 运行模式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// 持续监视页面，每道新题查询一次题库
    #[default]
    Watch,
    /// 把当前页面上选中的答案提交到题库后退出
    Submit,
}

impl FromStr for RunMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "watch" => Ok(RunMode::Watch),
            "submit" => Ok(RunMode::Submit),
            _ => Err(()),
        }
    }
}

/// 页面元素选择器
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSelectors {
    /// 题型说明
    pub question_type: String,
    /// 题干
    pub question: String,
    /// 选项容器（高亮的目标）
    pub answer: String,
    /// 选项文本
    pub answer_text: String,
    /// 已选中选项的文本
    pub selected_answer_text: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            question_type: "div.ant-typography.css-1y5hf77:not(.text-center)".to_string(),
            question: "h4.ant-typography.css-1y5hf77:not(.text-center)".to_string(),
            answer: ".answer".to_string(),
            answer_text: ".answer .ant-typography".to_string(),
            selected_answer_text: ".answer-selected .ant-typography".to_string(),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题库 API 地址
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 测验页面 URL（为空时使用已打开的页面）
    pub target_url: Option<String>,
    /// 测验页面标题关键字
    pub target_title: Option<String>,
    /// 页面轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行模式
    pub run_mode: RunMode,
    /// 页面选择器
    pub selectors: PageSelectors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://pse.aedb.online/".to_string(),
            request_timeout_secs: 10,
            browser_debug_port: 9222,
            target_url: None,
            target_title: None,
            poll_interval_ms: 1000,
            verbose_logging: false,
            run_mode: RunMode::Watch,
            selectors: PageSelectors::default(),
        }
    }
}

impl Config {
    /// 默认值 → 配置文件（`PSE_CONFIG`）→ 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件加载，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: origin.to_string(),
            source,
        })
    }

    /// 使用环境变量覆盖配置
    ///
    /// `lookup` 返回变量值；无法解析的值视为错误
    pub fn with_overrides<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self;

        if let Some(v) = lookup("PSE_API_BASE_URL") {
            config.api_base_url = v;
        }
        if let Some(v) = parse_var(&lookup, "PSE_REQUEST_TIMEOUT_SECS", "u64")? {
            config.request_timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "PSE_BROWSER_DEBUG_PORT", "u16")? {
            config.browser_debug_port = v;
        }
        if let Some(v) = lookup("PSE_TARGET_URL") {
            config.target_url = Some(v);
        }
        if let Some(v) = lookup("PSE_TARGET_TITLE") {
            config.target_title = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "PSE_POLL_INTERVAL_MS", "u64")? {
            config.poll_interval_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "PSE_VERBOSE_LOGGING", "bool")? {
            config.verbose_logging = v;
        }
        if let Some(v) = parse_var(&lookup, "PSE_RUN_MODE", "run mode (watch|submit)")? {
            config.run_mode = v;
        }

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
