use super::error::BridgeError;
use crate::refdata::entity::{EntityKind, Record, SettlDate, View};
use std::collections::BTreeSet;

/// # Summary
/// 在会话上执行的一个工作单元。
///
/// # Invariants
/// - 构造后不可变；参数集合已去重，结算日已解析为整数。
/// - 所有权在提交时移交给工作线程，执行结束后丢弃。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 按助记符查找某类记录，集合为空时列举全部
    Records {
        kind: EntityKind,
        mnems: BTreeSet<String>,
    },
    /// 按合约助记符和/或结算日查询盘口视图
    Views {
        mnems: BTreeSet<String>,
        settl_dates: BTreeSet<SettlDate>,
    },
    /// 关闭会话并终止工作线程
    Close,
}

impl Command {
    pub fn records<I, S>(kind: EntityKind, mnems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Command::Records {
            kind,
            mnems: mnems.into_iter().map(Into::into).collect(),
        }
    }

    pub fn traders<I, S>(mnems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::records(EntityKind::Trader, mnems)
    }

    pub fn accnts<I, S>(mnems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::records(EntityKind::Accnt, mnems)
    }

    pub fn contrs<I, S>(mnems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::records(EntityKind::Contr, mnems)
    }

    /// # Summary
    /// 由原始查询参数构造视图查询命令。
    ///
    /// # Logic
    /// 1. 助记符去重收集为集合。
    /// 2. 每个结算日去除首尾空白后解析为整数，任一失败即整体失败。
    ///
    /// # Arguments
    /// * `mnems` - 合约助记符
    /// * `settl_dates` - 结算日字符串
    ///
    /// # Returns
    /// * `Err(BridgeError::InvalidArgument)` - 存在非数字的结算日
    pub fn views<I, S, J, T>(mnems: I, settl_dates: J) -> Result<Self, BridgeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let settl_dates = settl_dates
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                raw.trim().parse::<SettlDate>().map_err(|_| {
                    BridgeError::InvalidArgument(format!("settl_date is not numeric: {:?}", raw))
                })
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Command::Views {
            mnems: mnems.into_iter().map(Into::into).collect(),
            settl_dates,
        })
    }

    pub fn is_close(&self) -> bool {
        matches!(self, Command::Close)
    }

    /// 日志中使用的简短名称
    pub fn label(&self) -> &'static str {
        match self {
            Command::Records { kind, .. } => match kind {
                EntityKind::Trader => "traders",
                EntityKind::Accnt => "accnts",
                EntityKind::Contr => "contrs",
            },
            Command::Views { .. } => "views",
            Command::Close => "close",
        }
    }
}

/// # Summary
/// 命令执行成功后的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Records(Vec<Record>),
    Views(Vec<View>),
    Closed,
}

impl Reply {
    pub fn into_records(self) -> Option<Vec<Record>> {
        match self {
            Reply::Records(records) => Some(records),
            _ => None,
        }
    }

    pub fn into_views(self) -> Option<Vec<View>> {
        match self {
            Reply::Views(views) => Some(views),
            _ => None,
        }
    }
}
