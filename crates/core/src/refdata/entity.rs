use serde::{Deserialize, Serialize};
use std::fmt;

/// 记录的系统级数字标识
pub type Iden = i64;

/// 结算日 (整数编码，如 `20140302`)
pub type SettlDate = i32;

/// 助记符最大字符数
pub const MNEM_MAX: usize = 16;
/// 显示名称最大字符数
pub const DISPLAY_MAX: usize = 64;
/// 邮箱最大字符数
pub const EMAIL_MAX: usize = 64;
/// 盘口视图每一侧保留的最大档位数
pub const LEVEL_MAX: usize = 3;

/// # Summary
/// 参考数据的实体种类。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    // 交易员
    Trader,
    // 账户
    Accnt,
    // 合约
    Contr,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Trader => write!(f, "trader"),
            EntityKind::Accnt => write!(f, "accnt"),
            EntityKind::Contr => write!(f, "contr"),
        }
    }
}

/// # Summary
/// 交易员或账户记录，两者字段集合相同。
///
/// # Invariants
/// - `mnem` 在同一实体种类内唯一，不超过 `MNEM_MAX` 个字符。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyRec {
    pub id: Iden,
    pub mnem: String,
    pub display: String,
    pub email: String,
}

/// # Summary
/// 合约记录，描述标的资产、报价精度与下单手数约束。
///
/// # Invariants
/// - `tick_denom` 与 `lot_denom` 不为 0。
/// - `min_lots <= max_lots`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContrRec {
    pub id: Iden,
    pub mnem: String,
    pub display: String,
    // 资产类型 (如 CURRENCY, COMMODITY)
    pub asset_type: String,
    pub asset: String,
    // 计价货币
    pub ccy: String,
    // 最小价格变动 = tick_numer / tick_denom
    pub tick_numer: i32,
    pub tick_denom: i32,
    // 每手数量 = lot_numer / lot_denom
    pub lot_numer: i32,
    pub lot_denom: i32,
    pub price_dp: i32,
    pub pip_dp: i32,
    pub qty_dp: i32,
    pub min_lots: i64,
    pub max_lots: i64,
}

/// # Summary
/// 会话查找或列举返回的参考数据记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Trader(PartyRec),
    Accnt(PartyRec),
    Contr(ContrRec),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Trader(_) => EntityKind::Trader,
            Record::Accnt(_) => EntityKind::Accnt,
            Record::Contr(_) => EntityKind::Contr,
        }
    }

    pub fn id(&self) -> Iden {
        match self {
            Record::Trader(rec) | Record::Accnt(rec) => rec.id,
            Record::Contr(rec) => rec.id,
        }
    }

    pub fn mnem(&self) -> &str {
        match self {
            Record::Trader(rec) | Record::Accnt(rec) => &rec.mnem,
            Record::Contr(rec) => &rec.mnem,
        }
    }
}

/// # Summary
/// 盘口中的单个价格档位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    // 价格 (以最小变动单位计)
    pub ticks: i64,
    // 该档位挂单总手数
    pub lots: i64,
    // 该档位挂单笔数
    pub count: u64,
}

/// # Summary
/// 某合约在某结算日的盘口快照。
///
/// # Invariants
/// - `list_bid` 按价格从高到低排列，`list_ask` 按价格从低到高排列。
/// - 每一侧至多 `LEVEL_MAX` 个档位。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    // 合约 ID
    pub cid: Iden,
    pub settl_date: SettlDate,
    #[serde(default)]
    pub list_bid: Vec<Level>,
    #[serde(default)]
    pub list_ask: Vec<Level>,
}

impl View {
    /// 视图的复合键 (合约 ID, 结算日)
    pub fn key(&self) -> (Iden, SettlDate) {
        (self.cid, self.settl_date)
    }
}
