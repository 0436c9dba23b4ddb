use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::{NewPriceDB, PriceDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::currencies::dsl as currencies_dsl;
use crate::schema::prices::dsl as prices_dsl;
use pricewatch_core::prices::{pick_nearest, NewPriceObservation, PriceObservation, PriceStore};
use pricewatch_core::Result;

/// Append-only repository of price observations
pub struct PriceRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PriceRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn currency_id_for(conn: &mut SqliteConnection, symbol: &str) -> Result<Option<i64>> {
    currencies_dsl::currencies
        .filter(currencies_dsl::symbol.eq(symbol))
        .select(currencies_dsl::id)
        .first::<i64>(conn)
        .optional()
        .into_core()
}

#[async_trait]
impl PriceStore for PriceRepository {
    async fn append(&self, observation: NewPriceObservation) -> Result<PriceObservation> {
        let row = NewPriceDB::from(&observation);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PriceObservation> {
                let saved = diesel::insert_into(prices_dsl::prices)
                    .values(&row)
                    .returning(PriceDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(saved.into())
            })
            .await
    }

    fn nearest(&self, symbol: &str, target: DateTime<Utc>) -> Result<Option<PriceObservation>> {
        let mut conn = get_connection(&self.pool)?;
        let Some(currency_id) = currency_id_for(&mut conn, symbol)? else {
            return Ok(None);
        };
        let target_micros = target.timestamp_micros();

        // Closest row at or before the target, then at or after it. Both probes
        // use the (currency_id, timestamp) index.
        let floor = prices_dsl::prices
            .filter(prices_dsl::currency_id.eq(currency_id))
            .filter(prices_dsl::timestamp.le(target_micros))
            .order((prices_dsl::timestamp.desc(), prices_dsl::id.asc()))
            .select(PriceDB::as_select())
            .first::<PriceDB>(&mut conn)
            .optional()
            .into_core()?;

        let ceiling = prices_dsl::prices
            .filter(prices_dsl::currency_id.eq(currency_id))
            .filter(prices_dsl::timestamp.ge(target_micros))
            .order((prices_dsl::timestamp.asc(), prices_dsl::id.asc()))
            .select(PriceDB::as_select())
            .first::<PriceDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(pick_nearest(
            floor.into_iter().chain(ceiling).map(PriceObservation::from),
            target,
        ))
    }

    fn latest(&self, symbol: &str) -> Result<Option<PriceObservation>> {
        Ok(self.history(symbol, 1)?.into_iter().next())
    }

    fn history(&self, symbol: &str, limit: usize) -> Result<Vec<PriceObservation>> {
        let mut conn = get_connection(&self.pool)?;
        let Some(currency_id) = currency_id_for(&mut conn, symbol)? else {
            return Ok(Vec::new());
        };

        let rows = prices_dsl::prices
            .filter(prices_dsl::currency_id.eq(currency_id))
            .order((prices_dsl::timestamp.desc(), prices_dsl::id.desc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(PriceDB::as_select())
            .load::<PriceDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(PriceObservation::from).collect())
    }

    fn list_for_currency(&self, currency_id: i64) -> Result<Vec<PriceObservation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = prices_dsl::prices
            .filter(prices_dsl::currency_id.eq(currency_id))
            .order((prices_dsl::timestamp.desc(), prices_dsl::id.desc()))
            .select(PriceDB::as_select())
            .load::<PriceDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(PriceObservation::from).collect())
    }
}
