use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::{CurrencyDB, NewCurrencyDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::currencies::dsl::*;
use pricewatch_core::currencies::{Currency, CurrencyRepositoryTrait, NewCurrency};
use pricewatch_core::Result;

/// Repository for the currency registry
pub struct CurrencyRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CurrencyRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CurrencyRepositoryTrait for CurrencyRepository {
    async fn upsert_active(&self, new_currency: NewCurrency) -> Result<Currency> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Currency> {
                let now = Utc::now().naive_utc();

                let existing = currencies
                    .filter(symbol.eq(&new_currency.symbol))
                    .select(CurrencyDB::as_select())
                    .first::<CurrencyDB>(conn)
                    .optional()
                    .into_core()?;

                let row = match existing {
                    // Reactivation keeps the name given at first registration
                    Some(current) => diesel::update(currencies.find(current.id))
                        .set((is_active.eq(true), updated_at.eq(now)))
                        .returning(CurrencyDB::as_returning())
                        .get_result(conn)
                        .into_core()?,
                    None => diesel::insert_into(currencies)
                        .values(&NewCurrencyDB {
                            symbol: new_currency.symbol,
                            name: new_currency.name,
                            is_active: true,
                            created_at: now,
                            updated_at: now,
                        })
                        .returning(CurrencyDB::as_returning())
                        .get_result(conn)
                        .into_core()?,
                };

                Ok(row.into())
            })
            .await
    }

    async fn deactivate(&self, currency_symbol: &str) -> Result<usize> {
        let currency_symbol = currency_symbol.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::update(currencies.filter(symbol.eq(currency_symbol)))
                    .set((is_active.eq(false), updated_at.eq(Utc::now().naive_utc())))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn list_active(&self) -> Result<Vec<Currency>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = currencies
            .filter(is_active.eq(true))
            .order(symbol.asc())
            .select(CurrencyDB::as_select())
            .load::<CurrencyDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Currency::from).collect())
    }

    fn get_by_symbol(&self, currency_symbol: &str) -> Result<Option<Currency>> {
        let mut conn = get_connection(&self.pool)?;
        let row = currencies
            .filter(symbol.eq(currency_symbol))
            .select(CurrencyDB::as_select())
            .first::<CurrencyDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Currency::from))
    }
}
