use kura_core::bridge::entity::{Command, Reply};
use kura_core::refdata::entity::{EntityKind, Iden, SettlDate, View};
use kura_core::session::error::SessionError;
use kura_core::session::port::Session;
use std::collections::BTreeSet;
use std::time::Duration;

/// # Summary
/// 在会话上执行一条命令。这是命令触达会话的唯一入口。
///
/// # Logic
/// 1. `Records`: 助记符非空时逐个查找 (查不到的跳过)，否则全量列举。
/// 2. `Views`: 按合约与结算日是否给出分四路查询，见 `find_views`。
/// 3. `Close`: 在 `timeout` 内关闭会话。
///
/// # Arguments
/// * `command` - 待执行的命令
/// * `session` - 工作线程独占的会话
/// * `timeout` - 关闭会话时的等待上限
///
/// # Returns
/// * `Result<Reply, SessionError>` - 会话报告的任何错误原样返回
pub fn execute<S>(command: &Command, session: &mut S, timeout: Duration) -> Result<Reply, SessionError>
where
    S: Session + ?Sized,
{
    match command {
        Command::Records { kind, mnems } => {
            let records = if mnems.is_empty() {
                session.list_records(*kind)?
            } else {
                let mut found = Vec::with_capacity(mnems.len());
                for mnem in mnems {
                    if let Some(rec) = session.find_record(*kind, mnem)? {
                        found.push(rec);
                    }
                }
                found
            };
            Ok(Reply::Records(records))
        }
        Command::Views { mnems, settl_dates } => {
            Ok(Reply::Views(find_views(session, mnems, settl_dates)?))
        }
        Command::Close => {
            session.close(timeout)?;
            Ok(Reply::Closed)
        }
    }
}

/// # Summary
/// 盘口视图查询。
///
/// # Logic
/// 1. 先把助记符解析为合约 ID 集合，未知助记符忽略。
/// 2. 合约与结算日均有: 对每个 (合约 ID, 结算日) 组合直接查找。
/// 3. 只有合约: 全量列举后按合约过滤。
/// 4. 只有结算日: 全量列举后按结算日过滤。
/// 5. 都没有: 返回全量列举。
fn find_views<S>(
    session: &mut S,
    mnems: &BTreeSet<String>,
    settl_dates: &BTreeSet<SettlDate>,
) -> Result<Vec<View>, SessionError>
where
    S: Session + ?Sized,
{
    let mut cids: BTreeSet<Iden> = BTreeSet::new();
    for mnem in mnems {
        if let Some(rec) = session.find_record(EntityKind::Contr, mnem)? {
            cids.insert(rec.id());
        }
    }

    let views = match (cids.is_empty(), settl_dates.is_empty()) {
        (false, false) => {
            let mut views = Vec::new();
            for cid in &cids {
                for settl_date in settl_dates {
                    if let Some(view) = session.find_view(*cid, *settl_date)? {
                        views.push(view);
                    }
                }
            }
            views
        }
        (false, true) => session
            .list_views()?
            .into_iter()
            .filter(|v| cids.contains(&v.cid))
            .collect(),
        (true, false) => session
            .list_views()?
            .into_iter()
            .filter(|v| settl_dates.contains(&v.settl_date))
            .collect(),
        (true, true) => session.list_views()?,
    };

    Ok(views)
}
