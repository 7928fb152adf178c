use super::entity::{Command, Reply};
use super::error::BridgeError;
use async_trait::async_trait;

/// # Summary
/// 命令网关端口。HTTP 层通过它把命令交给会话工作线程并等待应答，
/// 它是调用方触达会话的唯一通道。
///
/// # Invariants
/// - 线程安全 (`Send + Sync`)，可被任意数量的并发请求共享。
/// - 每次提交恰好得到一个应答或一个错误，工作线程终止后立即返回 `SessionClosed`。
#[async_trait]
pub trait CommandGateway: Send + Sync {
    /// 提交命令并等待其结果
    ///
    /// # Arguments
    /// * `command` - 已完成校验的命令，所有权移交给工作线程
    ///
    /// # Returns
    /// * `Ok(Reply)` - 命令执行结果
    /// * `Err(BridgeError)` - 会话已关闭或执行失败
    async fn submit(&self, command: Command) -> Result<Reply, BridgeError>;
}
