use kura_core::refdata::entity::{
    ContrRec, DISPLAY_MAX, EMAIL_MAX, Iden, MNEM_MAX, PartyRec, View,
};
use kura_core::session::error::SessionError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// # Summary
/// 回环会话装载的参考数据集。
///
/// # Invariants
/// - 经过 `validate` 之后：同类记录的 ID 与助记符唯一、长度不超限，
///   每个视图的 `cid` 都指向已知合约。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    pub traders: Vec<PartyRec>,
    pub accnts: Vec<PartyRec>,
    pub contrs: Vec<ContrRec>,
    pub views: Vec<View>,
}

impl ReferenceData {
    /// # Summary
    /// 从 JSON 文件读取并校验参考数据。
    ///
    /// # Arguments
    /// * `path` - 数据文件路径
    ///
    /// # Returns
    /// * `Err(SessionError::Invalid)` - 文件无法读取、解析失败或数据不合法
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Invalid(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    /// 从 JSON 文本解析并校验参考数据
    pub fn from_json(raw: &str) -> Result<Self, SessionError> {
        let data: ReferenceData =
            serde_json::from_str(raw).map_err(|e| SessionError::Invalid(e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    /// # Summary
    /// 校验数据集的约束。
    ///
    /// # Logic
    /// 1. 交易员、账户、合约分别检查 ID 与助记符唯一，以及字段长度。
    /// 2. 合约的分母不能为 0，且 `min_lots <= max_lots`。
    /// 3. 视图的合约必须存在，(cid, settl_date) 不能重复。
    pub fn validate(&self) -> Result<(), SessionError> {
        check_parties("trader", &self.traders)?;
        check_parties("accnt", &self.accnts)?;

        let mut ids = HashSet::new();
        let mut mnems = HashSet::new();
        for rec in &self.contrs {
            check_ident("contr", rec.id, &rec.mnem, &mut ids, &mut mnems)?;
            check_len("contr", &rec.mnem, "display", &rec.display, DISPLAY_MAX)?;
            if rec.tick_denom == 0 || rec.lot_denom == 0 {
                return Err(SessionError::Invalid(format!(
                    "contr {}: zero denominator",
                    rec.mnem
                )));
            }
            if rec.min_lots > rec.max_lots {
                return Err(SessionError::Invalid(format!(
                    "contr {}: min_lots exceeds max_lots",
                    rec.mnem
                )));
            }
        }

        let mut keys = HashSet::new();
        for view in &self.views {
            if !ids.contains(&view.cid) {
                return Err(SessionError::Invalid(format!(
                    "view references unknown contr id {}",
                    view.cid
                )));
            }
            if !keys.insert(view.key()) {
                return Err(SessionError::Invalid(format!(
                    "duplicate view for contr id {} on {}",
                    view.cid, view.settl_date
                )));
            }
        }

        Ok(())
    }
}

fn check_parties(kind: &str, parties: &[PartyRec]) -> Result<(), SessionError> {
    let mut ids = HashSet::new();
    let mut mnems = HashSet::new();
    for rec in parties {
        check_ident(kind, rec.id, &rec.mnem, &mut ids, &mut mnems)?;
        check_len(kind, &rec.mnem, "display", &rec.display, DISPLAY_MAX)?;
        check_len(kind, &rec.mnem, "email", &rec.email, EMAIL_MAX)?;
    }
    Ok(())
}

fn check_ident<'a>(
    kind: &str,
    id: Iden,
    mnem: &'a str,
    ids: &mut HashSet<Iden>,
    mnems: &mut HashSet<&'a str>,
) -> Result<(), SessionError> {
    if mnem.is_empty() || mnem.chars().count() > MNEM_MAX {
        return Err(SessionError::Invalid(format!(
            "{} mnem must be 1..={} characters: {:?}",
            kind, MNEM_MAX, mnem
        )));
    }
    if !ids.insert(id) {
        return Err(SessionError::Invalid(format!("duplicate {} id {}", kind, id)));
    }
    if !mnems.insert(mnem) {
        return Err(SessionError::Invalid(format!("duplicate {} mnem {}", kind, mnem)));
    }
    Ok(())
}

fn check_len(kind: &str, mnem: &str, field: &str, value: &str, max: usize) -> Result<(), SessionError> {
    if value.chars().count() > max {
        return Err(SessionError::Invalid(format!(
            "{} {}: {} exceeds {} characters",
            kind, mnem, field, max
        )));
    }
    Ok(())
}
