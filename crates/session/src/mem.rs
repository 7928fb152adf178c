use crate::fixture::ReferenceData;
use kura_core::refdata::entity::{EntityKind, Iden, LEVEL_MAX, Level, Record, SettlDate, View};
use kura_core::session::error::SessionError;
use kura_core::session::port::Session;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, info};

/// # Summary
/// 同一实体种类的记录表：按 ID 有序存放，另建助记符索引。
#[derive(Default)]
struct RecordTable {
    by_id: BTreeMap<Iden, Record>,
    by_mnem: HashMap<String, Iden>,
}

impl RecordTable {
    fn insert(&mut self, rec: Record) {
        self.by_mnem.insert(rec.mnem().to_string(), rec.id());
        self.by_id.insert(rec.id(), rec);
    }

    fn find(&self, mnem: &str) -> Option<&Record> {
        self.by_mnem.get(mnem).and_then(|id| self.by_id.get(id))
    }
}

/// # Summary
/// 回环会话：在内存中持有一份参考数据快照，满足 `Session` 契约。
///
/// # Invariants
/// - 视图以 (cid, settl_date) 为键有序存放，列举结果按键排序。
/// - 每个视图的买盘按价格降序、卖盘按价格升序，每侧至多 `LEVEL_MAX` 档。
/// - 关闭之后所有操作返回 `SessionError::Closed`。
pub struct MemSession {
    name: String,
    tables: HashMap<EntityKind, RecordTable>,
    views: BTreeMap<(Iden, SettlDate), View>,
    open: bool,
    // 累计的保活轮询次数
    heartbeats: u64,
}

impl MemSession {
    /// # Summary
    /// 打开一个回环会话。
    ///
    /// # Logic
    /// 1. 校验参考数据。
    /// 2. 按实体种类建立记录表与助记符索引。
    /// 3. 规范化每个视图的盘口档位后按键存放。
    ///
    /// # Arguments
    /// * `name` - 会话名称
    /// * `data` - 参考数据集
    ///
    /// # Returns
    /// * `Err(SessionError::Invalid)` - 数据不满足约束
    pub fn open(name: impl Into<String>, data: ReferenceData) -> Result<Self, SessionError> {
        data.validate()?;
        let name = name.into();

        let mut tables: HashMap<EntityKind, RecordTable> = HashMap::new();
        for rec in data.traders {
            tables.entry(EntityKind::Trader).or_default().insert(Record::Trader(rec));
        }
        for rec in data.accnts {
            tables.entry(EntityKind::Accnt).or_default().insert(Record::Accnt(rec));
        }
        for rec in data.contrs {
            tables.entry(EntityKind::Contr).or_default().insert(Record::Contr(rec));
        }

        let views: BTreeMap<_, _> = data
            .views
            .into_iter()
            .map(|view| (view.key(), normalize(view)))
            .collect();

        info!(
            session = %name,
            traders = tables.get(&EntityKind::Trader).map_or(0, |t| t.by_id.len()),
            accnts = tables.get(&EntityKind::Accnt).map_or(0, |t| t.by_id.len()),
            contrs = tables.get(&EntityKind::Contr).map_or(0, |t| t.by_id.len()),
            views = views.len(),
            "Loopback session opened"
        );

        Ok(Self {
            name,
            tables,
            views,
            open: true,
            heartbeats: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 累计的保活轮询次数
    pub fn heartbeats(&self) -> u64 {
        self.heartbeats
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.open {
            Ok(())
        } else {
            Err(SessionError::Closed)
        }
    }
}

/// 买盘价高者优先、卖盘价低者优先，并截断到 `LEVEL_MAX` 档
fn normalize(mut view: View) -> View {
    view.list_bid.sort_by(|a, b| b.ticks.cmp(&a.ticks));
    view.list_ask.sort_by(|a, b| a.ticks.cmp(&b.ticks));
    view.list_bid.truncate(LEVEL_MAX);
    view.list_ask.truncate(LEVEL_MAX);
    view
}

impl Session for MemSession {
    fn find_record(&mut self, kind: EntityKind, mnem: &str) -> Result<Option<Record>, SessionError> {
        self.ensure_open()?;
        Ok(self.tables.get(&kind).and_then(|t| t.find(mnem)).cloned())
    }

    fn list_records(&mut self, kind: EntityKind) -> Result<Vec<Record>, SessionError> {
        self.ensure_open()?;
        Ok(self
            .tables
            .get(&kind)
            .map(|t| t.by_id.values().cloned().collect())
            .unwrap_or_default())
    }

    fn find_view(&mut self, cid: Iden, settl_date: SettlDate) -> Result<Option<View>, SessionError> {
        self.ensure_open()?;
        Ok(self.views.get(&(cid, settl_date)).cloned())
    }

    fn list_views(&mut self) -> Result<Vec<View>, SessionError> {
        self.ensure_open()?;
        Ok(self.views.values().cloned().collect())
    }

    fn poll(&mut self, _timeout: Duration) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.heartbeats += 1;
        debug!(session = %self.name, heartbeats = self.heartbeats, "Heartbeat");
        Ok(())
    }

    fn close(&mut self, _timeout: Duration) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.open = false;
        info!(session = %self.name, heartbeats = self.heartbeats, "Loopback session closed");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kura_core::refdata::entity::{ContrRec, PartyRec};

    fn level(ticks: i64) -> Level {
        Level {
            ticks,
            lots: 1,
            count: 1,
        }
    }

    fn data() -> ReferenceData {
        ReferenceData {
            traders: vec![
                PartyRec {
                    id: 2,
                    mnem: "SFLAYMAN".into(),
                    display: "Steven Flayman".into(),
                    email: "sflayman@example.com".into(),
                },
                PartyRec {
                    id: 1,
                    mnem: "WRAMIREZ".into(),
                    display: "Wayne Ramirez".into(),
                    email: "wramirez@example.com".into(),
                },
            ],
            accnts: vec![],
            contrs: vec![ContrRec {
                id: 1,
                mnem: "EURUSD".into(),
                display: "EUR/USD".into(),
                asset_type: "CURRENCY".into(),
                asset: "EUR".into(),
                ccy: "USD".into(),
                tick_numer: 1,
                tick_denom: 10000,
                lot_numer: 1000000,
                lot_denom: 1,
                price_dp: 4,
                pip_dp: 4,
                qty_dp: 0,
                min_lots: 1,
                max_lots: 10,
            }],
            views: vec![View {
                cid: 1,
                settl_date: 20140302,
                list_bid: vec![level(10), level(14), level(12), level(11)],
                list_ask: vec![level(18), level(15), level(16), level(20)],
            }],
        }
    }

    #[test]
    fn test_listing_is_ordered_by_id() {
        let mut session = MemSession::open("TEST", data()).unwrap();
        assert_eq!(session.name(), "TEST");
        let ids: Vec<Iden> = session
            .list_records(EntityKind::Trader)
            .unwrap()
            .iter()
            .map(Record::id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(session.list_records(EntityKind::Accnt).unwrap().is_empty());
    }

    #[test]
    fn test_find_record_by_mnem() {
        let mut session = MemSession::open("TEST", data()).unwrap();
        let rec = session.find_record(EntityKind::Trader, "SFLAYMAN").unwrap().unwrap();
        assert_eq!(rec.id(), 2);
        assert!(session.find_record(EntityKind::Contr, "SFLAYMAN").unwrap().is_none());
    }

    #[test]
    fn test_view_levels_are_normalized() {
        let mut session = MemSession::open("TEST", data()).unwrap();
        let view = session.find_view(1, 20140302).unwrap().unwrap();
        let bids: Vec<i64> = view.list_bid.iter().map(|l| l.ticks).collect();
        let asks: Vec<i64> = view.list_ask.iter().map(|l| l.ticks).collect();
        assert_eq!(bids, vec![14, 12, 11]);
        assert_eq!(asks, vec![15, 16, 18]);
    }

    #[test]
    fn test_closed_session_rejects_everything() {
        let mut session = MemSession::open("TEST", data()).unwrap();
        session.poll(Duration::ZERO).unwrap();
        assert_eq!(session.heartbeats(), 1);

        session.close(Duration::from_millis(10)).unwrap();
        assert!(!session.is_open());
        assert_eq!(session.list_views(), Err(SessionError::Closed));
        assert_eq!(session.poll(Duration::ZERO), Err(SessionError::Closed));
        assert_eq!(session.close(Duration::ZERO), Err(SessionError::Closed));
    }
}
