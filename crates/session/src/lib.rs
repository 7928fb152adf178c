//! # `kura-session` - 回环会话
//!
//! 基于内存参考数据的 `Session` 实现，让网关在没有远端交易引擎时也能独立运行。
//! 它不实现任何交易引擎线协议，只满足桥接需要的会话契约。

pub mod fixture;
pub mod mem;

pub use fixture::ReferenceData;
pub use mem::MemSession;
