pub mod entity;

pub use entity::{
    ContrRec, DISPLAY_MAX, EMAIL_MAX, EntityKind, Iden, LEVEL_MAX, Level, MNEM_MAX, PartyRec,
    Record, SettlDate, View,
};
