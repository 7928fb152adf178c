use axum::Json;
use axum::extract::{Query, State};
use kura_core::bridge::entity::Command;

use super::{QueryPairs, unexpected_reply, values};
use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, ViewResponse};

/// 查询盘口视图
///
/// # Logic
/// 1. 两个参数都缺省时列举全部视图。
/// 2. 只给 `mnem` 时返回这些合约在所有结算日的视图。
/// 3. 只给 `settl_date` 时返回所有合约在这些结算日的视图。
/// 4. 两者都给时返回二者交叉得到的视图。
///
/// 结算日不是数字时在提交之前即以 400 失败。
#[utoipa::path(
    get,
    path = "/api/view",
    tag = "参考数据 (RefData)",
    params(
        ("mnem" = Option<Vec<String>>, Query, description = "合约助记符，可重复"),
        ("settl_date" = Option<Vec<i32>>, Query, description = "结算日 (YYYYMMDD)，可重复")
    ),
    responses(
        (status = 200, description = "视图列表", body = Vec<ViewResponse>),
        (status = 400, description = "结算日不是数字", body = ApiErrorResponse),
        (status = 503, description = "会话已关闭", body = ApiErrorResponse),
        (status = 502, description = "会话执行失败", body = ApiErrorResponse)
    )
)]
pub async fn list_views(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<ViewResponse>>, ApiError> {
    let command = Command::views(values(&pairs, "mnem"), values(&pairs, "settl_date"))?;
    let views = state
        .gateway
        .submit(command)
        .await?
        .into_views()
        .ok_or_else(|| unexpected_reply("views"))?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}
