//! # `kura-core` - 领域核心
//!
//! 只包含实体、端口 (Trait) 与错误类型，不含任何具体实现。
//! 上层 crate 通过这里定义的抽象互相协作：
//! - `refdata`: 交易员、账户、合约与盘口视图等参考数据实体
//! - `session`: 单属主会话 (`Session`) 端口及其错误
//! - `bridge`: 提交给会话工作线程的命令、应答与网关端口
//! - `config`: 全局应用配置

pub mod bridge;
pub mod config;
pub mod refdata;
pub mod session;
