use crate::dispatch;
use crate::handoff::{Envelope, Inbox, Outcome, Recv};
use kura_core::bridge::error::BridgeError;
use kura_core::session::error::SessionError;
use kura_core::session::port::Session;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 工作循环的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    Terminated,
}

/// 工作循环退出时的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    // 已执行的命令数 (含失败)
    pub executed: u64,
    // 已执行的命令中失败的数量
    pub failed: u64,
    // 保活轮询次数
    pub polls: u64,
    // 终止时以 `SessionClosed` 拒绝的排队命令数
    pub rejected: u64,
}

/// # Summary
/// 独占会话的工作循环。交替执行命令与保活轮询，直到收到 `Close` 或会话终止。
///
/// # Invariants
/// - `session` 是私有字段，循环不返回也不暴露任何指向它的引用。
/// - 每轮迭代至多等待 `timeout`；无论是否收到命令，只要仍在运行就执行一次 `poll`。
/// - `Terminated` 之后不再触碰会话。
pub struct Worker<S: Session> {
    session: S,
    inbox: Inbox,
    timeout: Duration,
    state: WorkerState,
    stats: WorkerStats,
}

impl<S: Session> Worker<S> {
    /// # Summary
    /// 构造工作循环，初始状态为 `Running`。
    ///
    /// # Arguments
    /// * `session` - 已打开的会话，所有权移交给工作循环
    /// * `inbox` - 交接通道的接收端
    /// * `timeout` - 空闲等待与关闭等待的上限
    pub fn new(session: S, inbox: Inbox, timeout: Duration) -> Self {
        Self {
            session,
            inbox,
            timeout,
            state: WorkerState::Running,
            stats: WorkerStats::default(),
        }
    }

    /// # Summary
    /// 运行工作循环直到终止。
    ///
    /// # Logic
    /// 1. 会话在带外被关闭 (如远端断开) 时立即终止。
    /// 2. 有界等待一条命令；收到则同步执行并应答。
    /// 3. 所有 `Bridge` 句柄都已释放时关闭会话并终止。
    /// 4. 仍在运行则执行一次保活轮询，进入下一轮。
    /// 5. 退出前拒绝所有已排队的命令，保证没有调用方永久阻塞。
    ///
    /// # Returns
    /// * `WorkerStats` - 运行统计
    pub async fn run(mut self) -> WorkerStats {
        info!(timeout = ?self.timeout, "Session worker running");

        while self.state == WorkerState::Running {
            if !self.session.is_open() {
                warn!("Session closed out-of-band, worker terminating");
                self.state = WorkerState::Terminated;
                break;
            }

            match self.inbox.recv_timeout(self.timeout).await {
                Recv::Command(envelope) => self.handle(envelope),
                Recv::Idle => {}
                Recv::Disconnected => {
                    info!("All bridge handles dropped, closing session");
                    self.inbox.close_and_drain();
                    if let Err(e) = self.session.close(self.timeout) {
                        warn!("Session close failed: {}", e);
                    }
                    self.state = WorkerState::Terminated;
                }
            }

            if self.state == WorkerState::Running {
                self.keepalive();
            }
        }

        let rejected = self.inbox.close_and_drain();
        self.stats.rejected += u64::try_from(rejected).unwrap_or(u64::MAX);
        info!(
            executed = self.stats.executed,
            failed = self.stats.failed,
            polls = self.stats.polls,
            rejected = self.stats.rejected,
            "Session worker terminated"
        );
        self.stats
    }

    /// # Summary
    /// 执行一条命令并把结果送回提交者。
    ///
    /// # Logic
    /// 1. `Close` 先关闭交接通道，之后提交的命令不会再被执行。
    /// 2. 在 `catch_unwind` 保护下执行，会话 panic 转为 `SessionFault`。
    /// 3. 致命会话错误或 `Close` 使循环转入 `Terminated`。
    fn handle(&mut self, envelope: Envelope) {
        let is_close = envelope.command.is_close();
        if is_close {
            let rejected = self.inbox.close_and_drain();
            self.stats.rejected += u64::try_from(rejected).unwrap_or(u64::MAX);
        }

        debug!(id = %envelope.id, command = envelope.command.label(), "Executing command");
        let outcome = self.execute(&envelope);
        self.stats.executed += 1;
        if outcome.is_err() {
            self.stats.failed += 1;
        }

        if is_close {
            info!(id = %envelope.id, "Session closed on request");
            self.state = WorkerState::Terminated;
        }
        envelope.reply(outcome);
    }

    fn execute(&mut self, envelope: &Envelope) -> Outcome {
        let session = &mut self.session;
        let timeout = self.timeout;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            dispatch::execute(&envelope.command, session, timeout)
        }));

        match result {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(err)) => {
                if err.is_fatal() {
                    error!(id = %envelope.id, "Fatal session error: {}", err);
                    self.state = WorkerState::Terminated;
                } else {
                    warn!(id = %envelope.id, command = envelope.command.label(), "Command failed: {}", err);
                }
                Err(BridgeError::from(err))
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                error!(id = %envelope.id, command = envelope.command.label(), "Session panicked: {}", msg);
                Err(BridgeError::SessionFault(msg))
            }
        }
    }

    /// 保活轮询。工作循环的有界等待已经提供了节奏，这里不再额外等待。
    fn keepalive(&mut self) {
        self.stats.polls += 1;
        match self.session.poll(Duration::ZERO) {
            Ok(()) => {}
            Err(err @ (SessionError::Closed | SessionError::Fatal(_))) => {
                error!("Session poll failed, worker terminating: {}", err);
                self.state = WorkerState::Terminated;
            }
            Err(err) => warn!("Session poll failed: {}", err),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "session panicked".to_string()
    }
}
