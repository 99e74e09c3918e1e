//! 配置校验模块
//!
//! 校验规则：
//! - listen_address 是合法的 socket 地址 (允许 `:port`)
//! - max_body_bytes > 0
//! - 至少配置一个 writer
//! - writer 名称非空且唯一
//! - writer endpoint 非空
//! - send_timeout_ms > 0

use std::collections::HashSet;

use contracts::{ContractError, RelayConfig};

/// 校验 RelayConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &RelayConfig) -> Result<(), ContractError> {
    validate_server(config)?;
    validate_writer_names(config)?;
    validate_writer_params(config)?;
    Ok(())
}

/// 校验 HTTP 服务配置
fn validate_server(config: &RelayConfig) -> Result<(), ContractError> {
    let server = &config.server;

    if server.socket_addr().is_err() {
        return Err(ContractError::config_validation(
            "server.listen_address",
            format!(
                "'{}' is not a valid socket address (host:port or :port)",
                server.listen_address
            ),
        ));
    }

    if server.max_body_bytes == 0 {
        return Err(ContractError::config_validation(
            "server.max_body_bytes",
            "max_body_bytes must be > 0",
        ));
    }

    Ok(())
}

/// 校验 writer 名称 (非空、唯一)
fn validate_writer_names(config: &RelayConfig) -> Result<(), ContractError> {
    if config.writers.is_empty() {
        return Err(ContractError::config_validation(
            "writers",
            "at least one writer must be configured",
        ));
    }

    let mut seen = HashSet::new();
    for (idx, writer) in config.writers.iter().enumerate() {
        if writer.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("writers[{}].name", idx),
                "writer name cannot be empty",
            ));
        }
        if !seen.insert(&writer.name) {
            return Err(ContractError::config_validation(
                format!("writers[name={}]", writer.name),
                "duplicate writer name",
            ));
        }
    }
    Ok(())
}

/// 校验 writer 参数
fn validate_writer_params(config: &RelayConfig) -> Result<(), ContractError> {
    for writer in &config.writers {
        if writer.endpoint.is_empty() {
            return Err(ContractError::config_validation(
                format!("writers[{}].endpoint", writer.name),
                "endpoint cannot be empty",
            ));
        }
        if writer.send_timeout_ms == 0 {
            return Err(ContractError::config_validation(
                format!("writers[{}].send_timeout_ms", writer.name),
                "send_timeout_ms must be > 0",
            ));
        }
    }
    Ok(())
}
