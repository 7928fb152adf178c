//! # `kura-bridge` - 单属主会话桥接
//!
//! 让任意数量的并发调用方安全地在一个只允许单一执行上下文访问的 `Session` 上执行命令。
//!
//! ## 组成
//! - `dispatch`: 命令在会话上的唯一执行入口
//! - `handoff`: 调用方与工作线程之间的请求/应答交接通道 (`Bridge`)
//! - `worker`: 独占会话、兼顾命令执行与保活轮询的工作循环
//! - `lifecycle`: 工作线程的启动与有序关闭

pub mod dispatch;
pub mod handoff;
pub mod lifecycle;
pub mod worker;

pub use handoff::Bridge;
pub use lifecycle::{Lifecycle, LifecycleError};
pub use worker::{WorkerState, WorkerStats};
