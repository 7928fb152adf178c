use thiserror::Error;

/// # Summary
/// 会话层错误枚举，涵盖连接断开、传输失败与非法数据等问题。
///
/// # Invariants
/// - `Closed` 与 `Fatal` 视为致命错误，工作线程遇到后必须终止。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 会话已关闭 (主动关闭或远端断开)
    #[error("Session closed")]
    Closed,
    /// 会话进入不可恢复状态
    #[error("Fatal session error: {0}")]
    Fatal(String),
    /// 单次请求的传输失败，会话仍可继续使用
    #[error("Transport error: {0}")]
    Transport(String),
    /// 参考数据不合法 (如装载的数据违反约束)
    #[error("Invalid data: {0}")]
    Invalid(String),
}

impl SessionError {
    /// 是否为终止会话的致命错误
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Closed | SessionError::Fatal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(SessionError::Closed.is_fatal());
        assert!(SessionError::Fatal("heartbeat lost".into()).is_fatal());
        assert!(!SessionError::Transport("timeout".into()).is_fatal());
        assert!(!SessionError::Invalid("bad mnem".into()).is_fatal());
    }
}
