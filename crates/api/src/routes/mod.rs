//! # 路由处理器
//!
//! 每个处理器只做三件事：从查询串收集参数构造 `Command`，经网关提交，
//! 把 `Reply` 转成 DTO 数组。

pub mod refdata;
pub mod view;

use crate::error::ApiError;

/// 原始查询串的键值对，保留重复键与出现顺序
pub type QueryPairs = Vec<(String, String)>;

/// 取出某个可重复查询参数的全部取值，未知参数被忽略
pub(crate) fn values<'a>(pairs: &'a [(String, String)], key: &'a str) -> impl Iterator<Item = &'a str> {
    pairs
        .iter()
        .filter(move |(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// 网关返回了与命令不匹配的结果种类
pub(crate) fn unexpected_reply(command: &str) -> ApiError {
    ApiError::Internal(format!("unexpected reply to {} command", command))
}
