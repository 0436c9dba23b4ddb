//! Database models for currencies.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use pricewatch_core::currencies::Currency;

/// Database model for currencies
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::currencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CurrencyDB {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insert model for currencies; the id is assigned by SQLite
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::currencies)]
pub struct NewCurrencyDB {
    pub symbol: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CurrencyDB> for Currency {
    fn from(db: CurrencyDB) -> Self {
        Self {
            id: db.id,
            symbol: db.symbol,
            name: db.name,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
