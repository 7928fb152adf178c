use axum::Json;
use axum::extract::{Query, State};
use kura_core::bridge::entity::Command;
use kura_core::refdata::entity::{EntityKind, Record};

use super::{QueryPairs, unexpected_reply, values};
use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, ContrResponse, PartyResponse};

/// # Summary
/// 提交一条记录查询命令并取出记录列表。
async fn fetch(state: &AppState, kind: EntityKind, pairs: &[(String, String)]) -> Result<Vec<Record>, ApiError> {
    let command = Command::records(kind, values(pairs, "mnem"));
    let label = command.label();
    state
        .gateway
        .submit(command)
        .await?
        .into_records()
        .ok_or_else(|| unexpected_reply(label))
}

fn parties(records: Vec<Record>) -> Vec<PartyResponse> {
    records
        .into_iter()
        .filter_map(|rec| match rec {
            Record::Trader(party) | Record::Accnt(party) => Some(party.into()),
            Record::Contr(_) => None,
        })
        .collect()
}

/// 查询交易员
///
/// 不带 `mnem` 时列举全部；未知助记符被静默忽略。
#[utoipa::path(
    get,
    path = "/api/trader",
    tag = "参考数据 (RefData)",
    params(
        ("mnem" = Option<Vec<String>>, Query, description = "交易员助记符，可重复")
    ),
    responses(
        (status = 200, description = "交易员列表", body = Vec<PartyResponse>),
        (status = 503, description = "会话已关闭", body = ApiErrorResponse),
        (status = 502, description = "会话执行失败", body = ApiErrorResponse)
    )
)]
pub async fn list_traders(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<PartyResponse>>, ApiError> {
    let records = fetch(&state, EntityKind::Trader, &pairs).await?;
    Ok(Json(parties(records)))
}

/// 查询账户
#[utoipa::path(
    get,
    path = "/api/accnt",
    tag = "参考数据 (RefData)",
    params(
        ("mnem" = Option<Vec<String>>, Query, description = "账户助记符，可重复")
    ),
    responses(
        (status = 200, description = "账户列表", body = Vec<PartyResponse>),
        (status = 503, description = "会话已关闭", body = ApiErrorResponse),
        (status = 502, description = "会话执行失败", body = ApiErrorResponse)
    )
)]
pub async fn list_accnts(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<PartyResponse>>, ApiError> {
    let records = fetch(&state, EntityKind::Accnt, &pairs).await?;
    Ok(Json(parties(records)))
}

/// 查询合约
#[utoipa::path(
    get,
    path = "/api/contr",
    tag = "参考数据 (RefData)",
    params(
        ("mnem" = Option<Vec<String>>, Query, description = "合约助记符，可重复")
    ),
    responses(
        (status = 200, description = "合约列表", body = Vec<ContrResponse>),
        (status = 503, description = "会话已关闭", body = ApiErrorResponse),
        (status = 502, description = "会话执行失败", body = ApiErrorResponse)
    )
)]
pub async fn list_contrs(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<ContrResponse>>, ApiError> {
    let records = fetch(&state, EntityKind::Contr, &pairs).await?;
    let contrs = records
        .into_iter()
        .filter_map(|rec| match rec {
            Record::Contr(contr) => Some(contr.into()),
            Record::Trader(_) | Record::Accnt(_) => None,
        })
        .collect();
    Ok(Json(contrs))
}
