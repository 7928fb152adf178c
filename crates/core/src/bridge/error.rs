use crate::session::error::SessionError;
use thiserror::Error;

/// # Summary
/// 通过桥接提交命令时调用方可见的错误。
///
/// # Invariants
/// - 查不到的助记符不是错误，只会在结果中缺席。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// 命令参数不合法 (如结算日不是数字)，在提交前即失败
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// 会话已关闭或工作线程已终止
    #[error("Session closed")]
    SessionClosed,
    /// 会话在执行命令期间报告的失败，不自动重试
    #[error("Session fault: {0}")]
    SessionFault(String),
}

impl From<SessionError> for BridgeError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Closed => BridgeError::SessionClosed,
            other => BridgeError::SessionFault(other.to_string()),
        }
    }
}
