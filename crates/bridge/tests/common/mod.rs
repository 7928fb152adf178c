#![allow(dead_code)]

use kura_core::refdata::entity::{ContrRec, Iden, Level, PartyRec, Record, SettlDate, View};
use kura_core::session::mock::{MockHandle, MockSession};

pub const D1: SettlDate = 20140302;
pub const D2: SettlDate = 20140303;

pub const EURUSD: Iden = 1;
pub const GBPUSD: Iden = 2;
pub const USDJPY: Iden = 3;

pub fn party(id: Iden, mnem: &str) -> PartyRec {
    PartyRec {
        id,
        mnem: mnem.to_string(),
        display: format!("{} display", mnem),
        email: format!("{}@example.com", mnem.to_lowercase()),
    }
}

pub fn contr(id: Iden, mnem: &str) -> ContrRec {
    ContrRec {
        id,
        mnem: mnem.to_string(),
        display: format!("{}/{}", &mnem[..3], &mnem[3..]),
        asset_type: "CURRENCY".to_string(),
        asset: mnem[..3].to_string(),
        ccy: mnem[3..].to_string(),
        tick_numer: 1,
        tick_denom: 10000,
        lot_numer: 1000000,
        lot_denom: 1,
        price_dp: 4,
        pip_dp: 4,
        qty_dp: 0,
        min_lots: 1,
        max_lots: 10,
    }
}

pub fn view(cid: Iden, settl_date: SettlDate) -> View {
    View {
        cid,
        settl_date,
        list_bid: vec![
            Level { ticks: 12344, lots: 10, count: 1 },
            Level { ticks: 12343, lots: 5, count: 2 },
        ],
        list_ask: vec![Level { ticks: 12346, lots: 3, count: 1 }],
    }
}

pub fn records() -> Vec<Record> {
    vec![
        Record::Trader(party(1, "WRAMIREZ")),
        Record::Trader(party(2, "SFLAYMAN")),
        Record::Trader(party(3, "GOSAYL")),
        Record::Accnt(party(1, "DBRA")),
        Record::Accnt(party(2, "DBRB")),
        Record::Contr(contr(EURUSD, "EURUSD")),
        Record::Contr(contr(GBPUSD, "GBPUSD")),
        Record::Contr(contr(USDJPY, "USDJPY")),
    ]
}

pub fn views() -> Vec<View> {
    vec![
        view(EURUSD, D1),
        view(EURUSD, D2),
        view(GBPUSD, D1),
        view(USDJPY, D2),
    ]
}

pub fn mock_session() -> (MockSession, MockHandle) {
    MockSession::new(records(), views())
}
