use super::error::SessionError;
use crate::refdata::entity::{EntityKind, Iden, Record, SettlDate, View};
use std::time::Duration;

/// # Summary
/// 与远端交易引擎之间的单属主、有状态会话连接。
/// 查询参考数据、列举盘口视图，并需要被周期性地轮询以维持连接。
///
/// # Invariants
/// - 同一时刻只能被一个执行上下文访问，因此所有方法都取 `&mut self`，且不要求 `Send + Sync`。
/// - 会话由工作线程内部构造并独占持有，任何引用都不会逃出该线程。
/// - 关闭之后的任何调用都应返回 `SessionError::Closed`。
pub trait Session {
    /// 按实体种类与助记符查找记录
    ///
    /// # Returns
    /// * `Ok(None)` - 记录不存在 (不是错误)
    fn find_record(&mut self, kind: EntityKind, mnem: &str) -> Result<Option<Record>, SessionError>;

    /// 列举某一实体种类的全部记录
    fn list_records(&mut self, kind: EntityKind) -> Result<Vec<Record>, SessionError>;

    /// 按 (合约 ID, 结算日) 查找盘口视图
    fn find_view(&mut self, cid: Iden, settl_date: SettlDate) -> Result<Option<View>, SessionError>;

    /// 列举全部盘口视图
    fn list_views(&mut self) -> Result<Vec<View>, SessionError>;

    /// 执行一次保活/轮询步骤，至多等待 `timeout`
    fn poll(&mut self, timeout: Duration) -> Result<(), SessionError>;

    /// 关闭会话，至多等待 `timeout`
    fn close(&mut self, timeout: Duration) -> Result<(), SessionError>;

    /// 会话是否仍处于打开状态
    fn is_open(&self) -> bool;
}
