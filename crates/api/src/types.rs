//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向调用方 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use kura_core::refdata::entity::{ContrRec, Iden, Level, PartyRec, SettlDate, View};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================
//  参与方 (交易员 / 账户) DTO
// ============================================================

/// 交易员或账户 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartyResponse {
    /// 系统 ID
    #[schema(example = 1)]
    pub id: Iden,
    /// 助记符
    #[schema(example = "WRAMIREZ")]
    pub mnem: String,
    /// 显示名称
    #[schema(example = "Wayne Ramirez")]
    pub display: String,
    /// 邮箱
    #[schema(example = "wayne.ramirez@swirlyc.com")]
    pub email: String,
}

impl From<PartyRec> for PartyResponse {
    fn from(rec: PartyRec) -> Self {
        Self {
            id: rec.id,
            mnem: rec.mnem,
            display: rec.display,
            email: rec.email,
        }
    }
}

// ============================================================
//  合约 DTO
// ============================================================

/// 合约 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContrResponse {
    #[schema(example = 1)]
    pub id: Iden,
    #[schema(example = "EURUSD")]
    pub mnem: String,
    #[schema(example = "EURUSD")]
    pub display: String,
    /// 资产类别
    #[schema(example = "CURRENCY")]
    pub asset_type: String,
    /// 基础资产
    #[schema(example = "EUR")]
    pub asset: String,
    /// 计价货币
    #[schema(example = "USD")]
    pub ccy: String,
    /// 最小价格变动 = tick_numer / tick_denom
    #[schema(example = 1)]
    pub tick_numer: i32,
    #[schema(example = 10000)]
    pub tick_denom: i32,
    /// 每手数量 = lot_numer / lot_denom
    #[schema(example = 1000000)]
    pub lot_numer: i32,
    #[schema(example = 1)]
    pub lot_denom: i32,
    /// 价格小数位
    #[schema(example = 4)]
    pub price_dp: i32,
    #[schema(example = 4)]
    pub pip_dp: i32,
    /// 数量小数位
    #[schema(example = 0)]
    pub qty_dp: i32,
    #[schema(example = 1)]
    pub min_lots: i64,
    #[schema(example = 10)]
    pub max_lots: i64,
}

impl From<ContrRec> for ContrResponse {
    fn from(rec: ContrRec) -> Self {
        Self {
            id: rec.id,
            mnem: rec.mnem,
            display: rec.display,
            asset_type: rec.asset_type,
            asset: rec.asset,
            ccy: rec.ccy,
            tick_numer: rec.tick_numer,
            tick_denom: rec.tick_denom,
            lot_numer: rec.lot_numer,
            lot_denom: rec.lot_denom,
            price_dp: rec.price_dp,
            pip_dp: rec.pip_dp,
            qty_dp: rec.qty_dp,
            min_lots: rec.min_lots,
            max_lots: rec.max_lots,
        }
    }
}

// ============================================================
//  盘口视图 DTO
// ============================================================

/// 一个价格档位
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LevelResponse {
    /// 以最小变动单位计的价格
    #[schema(example = 12344)]
    pub ticks: i64,
    /// 该价位的累计手数
    #[schema(example = 10)]
    pub lots: i64,
    /// 该价位的订单数
    #[schema(example = 1)]
    pub count: u64,
}

impl From<Level> for LevelResponse {
    fn from(level: Level) -> Self {
        Self {
            ticks: level.ticks,
            lots: level.lots,
            count: level.count,
        }
    }
}

/// 某合约在某结算日的盘口快照
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ViewResponse {
    /// 合约 ID
    #[schema(example = 1)]
    pub cid: Iden,
    /// 结算日 (YYYYMMDD)
    #[schema(example = 20140302)]
    pub settl_date: SettlDate,
    /// 买盘，价高者在前
    pub list_bid: Vec<LevelResponse>,
    /// 卖盘，价低者在前
    pub list_ask: Vec<LevelResponse>,
}

impl From<View> for ViewResponse {
    fn from(view: View) -> Self {
        Self {
            cid: view.cid,
            settl_date: view.settl_date,
            list_bid: view.list_bid.into_iter().map(Into::into).collect(),
            list_ask: view.list_ask.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================
//  错误 DTO
// ============================================================

/// 统一错误响应体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}
