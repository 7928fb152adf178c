use async_trait::async_trait;
use kura_core::bridge::entity::{Command, Reply};
use kura_core::bridge::error::BridgeError;
use kura_core::bridge::port::CommandGateway;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use uuid::Uuid;

/// 一次提交的执行结果
pub type Outcome = Result<Reply, BridgeError>;

/// # Summary
/// 在通道中流转的一次提交：命令本身、关联 ID 与应答目的地。
///
/// # Invariants
/// - 每个信封恰好被应答一次；未被应答就被丢弃时，调用方收到 `SessionClosed`。
pub struct Envelope {
    // 关联 ID，仅用于日志追踪
    pub id: Uuid,
    pub command: Command,
    reply: oneshot::Sender<Outcome>,
}

impl Envelope {
    /// 把结果送回提交者。调用方已放弃等待时结果被静默丢弃。
    pub fn reply(self, outcome: Outcome) {
        if self.reply.send(outcome).is_err() {
            debug!(id = %self.id, "Caller gave up waiting, reply discarded");
        }
    }
}

/// 工作线程一次有界等待的结果
pub enum Recv {
    // 收到一条命令
    Command(Envelope),
    // 超时，期间没有命令到达
    Idle,
    // 所有 `Bridge` 句柄均已释放
    Disconnected,
}

/// # Summary
/// 调用方持有的桥接句柄，可自由克隆并在多个并发上下文间共享。
///
/// # Invariants
/// - 只包含交接通道的发送端，不持有也无法触达会话本身。
/// - 工作线程终止后，`submit` 立即以 `SessionClosed` 失败。
#[derive(Clone)]
pub struct Bridge {
    tx: mpsc::Sender<Envelope>,
}

/// # Summary
/// 工作线程一侧的接收端。
pub struct Inbox {
    rx: mpsc::Receiver<Envelope>,
}

impl Bridge {
    /// # Summary
    /// 创建一对交接端点。
    ///
    /// # Arguments
    /// * `capacity` - 通道中最多排队的提交数，0 按 1 处理
    ///
    /// # Returns
    /// * `(Bridge, Inbox)` - 调用方句柄与工作线程接收端
    pub fn channel(capacity: usize) -> (Bridge, Inbox) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Bridge { tx }, Inbox { rx })
    }

    fn envelope(command: Command) -> (Envelope, oneshot::Receiver<Outcome>) {
        let (reply, rx) = oneshot::channel();
        let envelope = Envelope {
            id: Uuid::new_v4(),
            command,
            reply,
        };
        (envelope, rx)
    }

    /// # Summary
    /// 提交命令并挂起当前任务直到结果返回。
    ///
    /// # Logic
    /// 1. 为命令创建独立的 oneshot 应答通道，随命令一起发送。
    /// 2. 通道已关闭 (工作线程已终止) 则立即返回 `SessionClosed`。
    /// 3. 等待应答；应答端被丢弃同样视为 `SessionClosed`。
    pub async fn submit(&self, command: Command) -> Outcome {
        let (envelope, rx) = Self::envelope(command);
        debug!(id = %envelope.id, command = envelope.command.label(), "Submitting command");
        self.tx
            .send(envelope)
            .await
            .map_err(|_| BridgeError::SessionClosed)?;
        rx.await.map_err(|_| BridgeError::SessionClosed)?
    }

    /// # Summary
    /// `submit` 的阻塞版本，供不在异步运行时中的普通线程使用。
    ///
    /// # Invariants
    /// - 不可在异步上下文中调用 (tokio 会拒绝在运行时线程上阻塞)。
    pub fn submit_blocking(&self, command: Command) -> Outcome {
        let (envelope, rx) = Self::envelope(command);
        debug!(id = %envelope.id, command = envelope.command.label(), "Submitting command (blocking)");
        self.tx
            .blocking_send(envelope)
            .map_err(|_| BridgeError::SessionClosed)?;
        rx.blocking_recv().map_err(|_| BridgeError::SessionClosed)?
    }

    /// 工作线程是否已不再接收命令
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[async_trait]
impl CommandGateway for Bridge {
    async fn submit(&self, command: Command) -> Result<Reply, BridgeError> {
        Bridge::submit(self, command).await
    }
}

impl Inbox {
    /// 至多等待 `timeout` 接收下一条命令
    pub async fn recv_timeout(&mut self, timeout: Duration) -> Recv {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(envelope)) => Recv::Command(envelope),
            Ok(None) => Recv::Disconnected,
            Err(_) => Recv::Idle,
        }
    }

    /// # Summary
    /// 停止接收新命令，并以 `SessionClosed` 应答所有已排队的命令。
    ///
    /// # Returns
    /// * `usize` - 被拒绝的命令数
    pub fn close_and_drain(&mut self) -> usize {
        self.rx.close();
        let mut rejected = 0;
        while let Ok(envelope) = self.rx.try_recv() {
            debug!(id = %envelope.id, command = envelope.command.label(), "Rejecting queued command");
            envelope.reply(Err(BridgeError::SessionClosed));
            rejected += 1;
        }
        rejected
    }
}
