use crate::handoff::Bridge;
use crate::worker::{Worker, WorkerStats};
use kura_core::bridge::entity::Command;
use kura_core::bridge::error::BridgeError;
use kura_core::config::SessionConfig;
use kura_core::session::error::SessionError;
use kura_core::session::port::Session;
use std::thread::JoinHandle;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// # Summary
/// 工作线程启动与关闭过程中的错误。
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Failed to spawn session worker thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Failed to build session worker runtime: {0}")]
    Runtime(String),
    #[error("Failed to open session: {0}")]
    Open(#[from] SessionError),
    #[error("Session worker exited before reporting readiness")]
    WorkerExited,
    #[error("Session worker thread panicked")]
    WorkerPanicked,
    #[error("Failed to join session worker thread: {0}")]
    Join(String),
    #[error("Session close failed: {0}")]
    Close(BridgeError),
}

/// # Summary
/// 会话工作线程的生命周期控制器。
///
/// # Invariants
/// - 会话在专属线程内由工厂函数创建，其所有权从未离开该线程。
/// - `shutdown` 返回之后，会话不会再被任何操作触碰。
pub struct Lifecycle {
    // 控制器自身持有的句柄，用于提交 Close
    bridge: Bridge,
    thread: JoinHandle<WorkerStats>,
    name: String,
}

impl Lifecycle {
    /// # Summary
    /// 启动会话与工作循环。
    ///
    /// # Logic
    /// 1. 创建交接通道。
    /// 2. 启动专属线程，在其中构建 current_thread 运行时并调用工厂函数打开会话。
    /// 3. 通过 oneshot 通道回报就绪或打开失败。
    /// 4. 就绪后在该线程上运行工作循环直到终止。
    ///
    /// # Arguments
    /// * `config` - 会话名称、超时与通道容量
    /// * `open` - 在工作线程内打开会话的工厂函数
    ///
    /// # Returns
    /// * `Ok(Lifecycle)` - 工作循环已处于 `Running`
    /// * `Err(LifecycleError)` - 线程、运行时或会话无法启动
    pub async fn start<S, F>(config: &SessionConfig, open: F) -> Result<Self, LifecycleError>
    where
        S: Session + 'static,
        F: FnOnce() -> Result<S, SessionError> + Send + 'static,
    {
        let (bridge, inbox) = Bridge::channel(config.capacity());
        let (ready_tx, ready_rx) = oneshot::channel::<Result<(), LifecycleError>>();
        let timeout = config.timeout();
        let name = config.name.clone();

        let thread = std::thread::Builder::new()
            .name(format!("kura-session-{}", name))
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        report(ready_tx, Err(LifecycleError::Runtime(e.to_string())));
                        return WorkerStats::default();
                    }
                };

                let session = match open() {
                    Ok(session) => session,
                    Err(e) => {
                        report(ready_tx, Err(LifecycleError::Open(e)));
                        return WorkerStats::default();
                    }
                };

                if ready_tx.send(Ok(())).is_err() {
                    // 启动方已放弃，仍需关闭已打开的会话
                    let mut session = session;
                    if let Err(e) = session.close(timeout) {
                        warn!("Session close failed: {}", e);
                    }
                    return WorkerStats::default();
                }

                rt.block_on(Worker::new(session, inbox, timeout).run())
            })?;

        match ready_rx.await {
            Ok(Ok(())) => {
                info!(session = %name, ?timeout, "Session worker started");
                Ok(Self {
                    bridge,
                    thread,
                    name,
                })
            }
            Ok(Err(e)) => {
                error!(session = %name, "Session worker failed to start: {}", e);
                join(thread).await?;
                Err(e)
            }
            Err(_) => {
                join(thread).await?;
                Err(LifecycleError::WorkerExited)
            }
        }
    }

    /// 获取一个可交给调用方的桥接句柄
    pub fn bridge(&self) -> Bridge {
        self.bridge.clone()
    }

    /// 工作线程是否已终止
    pub fn is_terminated(&self) -> bool {
        self.thread.is_finished()
    }

    /// # Summary
    /// 有序关闭：提交 Close、等待其结果、再等待工作线程退出。
    ///
    /// # Logic
    /// 1. 通过桥接提交 Close，它与普通命令同样排队，不插队。
    /// 2. 工作循环已终止 (`SessionClosed`) 时只记录警告。
    /// 3. 在阻塞线程池中 join 工作线程。
    /// 4. Close 本身失败时在 join 之后返回 `LifecycleError::Close`。
    ///
    /// # Returns
    /// * `Ok(WorkerStats)` - 工作循环的运行统计
    pub async fn shutdown(self) -> Result<WorkerStats, LifecycleError> {
        let Self {
            bridge,
            thread,
            name,
        } = self;

        info!(session = %name, "Shutting down session worker");
        let closed = bridge.submit(Command::Close).await;
        drop(bridge);

        let stats = join(thread).await?;
        match closed {
            Ok(_) => {
                info!(session = %name, "Session worker stopped");
                Ok(stats)
            }
            Err(BridgeError::SessionClosed) => {
                warn!(session = %name, "Session worker had already terminated");
                Ok(stats)
            }
            Err(e) => Err(LifecycleError::Close(e)),
        }
    }
}

fn report(tx: oneshot::Sender<Result<(), LifecycleError>>, result: Result<(), LifecycleError>) {
    if tx.send(result).is_err() {
        warn!("Session worker starter is gone");
    }
}

async fn join(thread: JoinHandle<WorkerStats>) -> Result<WorkerStats, LifecycleError> {
    tokio::task::spawn_blocking(move || thread.join())
        .await
        .map_err(|e| LifecycleError::Join(e.to_string()))?
        .map_err(|_| LifecycleError::WorkerPanicked)
}
