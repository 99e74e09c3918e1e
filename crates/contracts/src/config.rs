//! RelayConfig - Config Loader 输出
//!
//! 描述完整的中继配置：HTTP 监听、后端 writer 列表。

use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的中继配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// HTTP 服务设置
    #[serde(default)]
    pub server: ServerConfig,

    /// 后端 writer 列表
    pub writers: Vec<WriterConfig>,
}

impl Default for RelayConfig {
    /// 单个 noop writer + 默认监听地址
    fn default() -> Self {
        Self {
            version: ConfigVersion::default(),
            server: ServerConfig::default(),
            writers: vec![WriterConfig::default()],
        }
    }
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址 (e.g., "0.0.0.0:9201")
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// 请求体上限 (字节)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// 解析监听地址，`:9201` 形式视为 `0.0.0.0:9201`
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        match self.listen_address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}").parse(),
            None => self.listen_address.parse(),
        }
    }
}

fn default_listen_address() -> String {
    "0.0.0.0:9201".to_string()
}

fn default_max_body_bytes() -> usize {
    32 * 1024 * 1024
}

/// Writer 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Writer 名称 (日志/指标)
    pub name: String,

    /// Writer 类型
    #[serde(default)]
    pub kind: WriterKind,

    /// 后端地址
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// 发送超时 (毫秒)，传递给 writer，由 writer 自行决定是否执行
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            name: "kafka".to_string(),
            kind: WriterKind::default(),
            endpoint: default_endpoint(),
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

impl WriterConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

fn default_endpoint() -> String {
    "localhost:9092".to_string()
}

fn default_send_timeout_ms() -> u64 {
    30_000
}

/// Writer 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriterKind {
    /// 只记录日志、不做网络 I/O 的占位 writer
    #[default]
    Noop,
}
