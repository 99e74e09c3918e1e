//! Wire decode 错误类型

use thiserror::Error;

/// Decode 错误
///
/// 任一阶段失败都会拒绝整个请求，不存在部分成功。
#[derive(Debug, Error)]
pub enum DecodeError {
    /// 请求体不是合法的 snappy block 数据
    #[error("malformed compression: {0}")]
    Compression(#[from] snap::Error),

    /// 解压后的字节不是合法的 protobuf 消息
    #[error("malformed message: {0}")]
    Message(#[from] prost::DecodeError),
}

impl DecodeError {
    /// 错误类别 (用于日志/指标标签)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Compression(_) => "malformed compression",
            Self::Message(_) => "malformed message",
        }
    }
}

/// Decode Result 类型别名
pub type Result<T> = std::result::Result<T, DecodeError>;
