use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 题库请求错误
    #[error("题库错误: {0}")]
    Transport(#[from] TransportError),

    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 其他错误（用于包装展示层等第三方错误）
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 题库请求错误
///
/// 原样交给周期的调用方，本层不做重试
#[derive(Debug, Error)]
pub enum TransportError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 非 2xx 响应
    #[error("题库返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },

    /// 响应体无法解析
    #[error("响应解析失败 ({endpoint}): {source}")]
    InvalidBody {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    pub fn endpoint(&self) -> &str {
        match self {
            TransportError::RequestFailed { endpoint, .. }
            | TransportError::BadStatus { endpoint, .. }
            | TransportError::InvalidBody { endpoint, .. } => endpoint,
        }
    }
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    ScriptExecutionFailed(#[from] chromiumoxide::error::CdpError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(port: u16, source: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed { port, source })
    }

    /// 是否为题库请求错误
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
