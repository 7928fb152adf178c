//! 测试用的脚本化会话 (`test-utils` feature)。
//!
//! `MockSession` 会被移交给工作线程独占，测试代码只持有 `MockHandle`，
//! 通过它读取调用日志、注入故障或模拟远端断开。

use super::error::SessionError;
use super::port::Session;
use crate::refdata::entity::{EntityKind, Iden, Record, SettlDate, View};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// 会话上发生过的一次调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    FindRecord(EntityKind, String),
    ListRecords(EntityKind),
    FindView(Iden, SettlDate),
    ListViews,
    Poll,
    Close,
}

/// 带时间戳的调用日志条目
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub at: Instant,
    pub call: SessionCall,
}

enum Fault {
    Error(SessionError),
    Panic(String),
}

struct Shared {
    journal: Vec<JournalEntry>,
    // 作用于下一次数据调用 (查找/列举)
    faults: VecDeque<Fault>,
    // 作用于下一次 poll
    poll_faults: VecDeque<SessionError>,
    open: bool,
    // 每次数据调用的模拟耗时
    delay: Option<Duration>,
}

/// # Summary
/// 测试侧持有的观察与控制句柄。
#[derive(Clone)]
pub struct MockHandle {
    shared: Arc<Mutex<Shared>>,
}

impl MockHandle {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 完整调用日志
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.lock().journal.clone()
    }

    /// 调用日志 (不含时间戳)
    pub fn calls(&self) -> Vec<SessionCall> {
        self.lock().journal.iter().map(|e| e.call.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.lock().journal.len()
    }

    /// 已发生的 poll 次数
    pub fn polls(&self) -> usize {
        self.poll_times().len()
    }

    /// 每次 poll 的发生时刻
    pub fn poll_times(&self) -> Vec<Instant> {
        self.lock()
            .journal
            .iter()
            .filter(|e| e.call == SessionCall::Poll)
            .map(|e| e.at)
            .collect()
    }

    /// `Close` 调用次数
    pub fn closes(&self) -> usize {
        self.lock()
            .journal
            .iter()
            .filter(|e| e.call == SessionCall::Close)
            .count()
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// 下一次数据调用返回指定错误
    pub fn fail_next(&self, err: SessionError) {
        self.lock().faults.push_back(Fault::Error(err));
    }

    /// 下一次数据调用直接 panic
    pub fn panic_next(&self, msg: impl Into<String>) {
        self.lock().faults.push_back(Fault::Panic(msg.into()));
    }

    /// 下一次 poll 返回指定错误
    pub fn fail_next_poll(&self, err: SessionError) {
        self.lock().poll_faults.push_back(err);
    }

    /// 模拟远端断开
    pub fn disconnect(&self) {
        self.lock().open = false;
    }

    /// 为每次数据调用设置阻塞耗时，模拟长耗时命令
    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }
}

/// # Summary
/// 基于内存数据的脚本化 `Session` 实现，记录每一次调用。
///
/// # Invariants
/// - 关闭或断开后，除日志记录外所有调用都返回 `SessionError::Closed`。
pub struct MockSession {
    records: Vec<Record>,
    views: Vec<View>,
    shared: Arc<Mutex<Shared>>,
}

impl MockSession {
    /// 创建会话及其控制句柄
    pub fn new(records: Vec<Record>, views: Vec<View>) -> (Self, MockHandle) {
        let shared = Arc::new(Mutex::new(Shared {
            journal: Vec::new(),
            faults: VecDeque::new(),
            poll_faults: VecDeque::new(),
            open: true,
            delay: None,
        }));
        let handle = MockHandle {
            shared: shared.clone(),
        };
        (
            Self {
                records,
                views,
                shared,
            },
            handle,
        )
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 记录一次数据调用，并应用已排队的故障
    fn enter(&self, call: SessionCall) -> Result<(), SessionError> {
        let (fault, delay) = {
            let mut shared = self.lock();
            shared.journal.push(JournalEntry {
                at: Instant::now(),
                call,
            });
            if !shared.open {
                return Err(SessionError::Closed);
            }
            (shared.faults.pop_front(), shared.delay)
        };

        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        match fault {
            None => Ok(()),
            Some(Fault::Error(err)) => Err(err),
            // 锁已释放，不会污染共享状态
            Some(Fault::Panic(msg)) => std::panic::panic_any(msg),
        }
    }
}

impl Session for MockSession {
    fn find_record(&mut self, kind: EntityKind, mnem: &str) -> Result<Option<Record>, SessionError> {
        self.enter(SessionCall::FindRecord(kind, mnem.to_string()))?;
        Ok(self
            .records
            .iter()
            .find(|r| r.kind() == kind && r.mnem() == mnem)
            .cloned())
    }

    fn list_records(&mut self, kind: EntityKind) -> Result<Vec<Record>, SessionError> {
        self.enter(SessionCall::ListRecords(kind))?;
        Ok(self
            .records
            .iter()
            .filter(|r| r.kind() == kind)
            .cloned()
            .collect())
    }

    fn find_view(&mut self, cid: Iden, settl_date: SettlDate) -> Result<Option<View>, SessionError> {
        self.enter(SessionCall::FindView(cid, settl_date))?;
        Ok(self
            .views
            .iter()
            .find(|v| v.key() == (cid, settl_date))
            .cloned())
    }

    fn list_views(&mut self) -> Result<Vec<View>, SessionError> {
        self.enter(SessionCall::ListViews)?;
        Ok(self.views.clone())
    }

    fn poll(&mut self, _timeout: Duration) -> Result<(), SessionError> {
        let mut shared = self.lock();
        shared.journal.push(JournalEntry {
            at: Instant::now(),
            call: SessionCall::Poll,
        });
        if !shared.open {
            return Err(SessionError::Closed);
        }
        match shared.poll_faults.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn close(&mut self, _timeout: Duration) -> Result<(), SessionError> {
        let mut shared = self.lock();
        shared.journal.push(JournalEntry {
            at: Instant::now(),
            call: SessionCall::Close,
        });
        if !shared.open {
            return Err(SessionError::Closed);
        }
        shared.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.lock().open
    }
}
