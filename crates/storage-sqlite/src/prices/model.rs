//! Database models for price observations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::warn;

use pricewatch_core::prices::{NewPriceObservation, PriceObservation};

/// Database model for prices.
///
/// `timestamp` holds Unix microseconds so distances can be compared exactly.
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceDB {
    pub id: i64,
    pub currency_id: i64,
    pub price: f64,
    pub timestamp: i64,
    pub created_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::prices)]
pub struct NewPriceDB {
    pub currency_id: i64,
    pub price: f64,
    pub timestamp: i64,
    pub created_at: String,
}

impl From<&NewPriceObservation> for NewPriceDB {
    fn from(observation: &NewPriceObservation) -> Self {
        Self {
            currency_id: observation.currency_id,
            price: observation.price,
            timestamp: observation.timestamp.timestamp_micros(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

impl From<PriceDB> for PriceObservation {
    fn from(db: PriceDB) -> Self {
        let timestamp = DateTime::from_timestamp_micros(db.timestamp).unwrap_or_else(|| {
            warn!(
                "Price {} has out-of-range timestamp {}, using the epoch",
                db.id, db.timestamp
            );
            DateTime::default()
        });
        let created_at = match DateTime::parse_from_rfc3339(&db.created_at) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(e) => {
                warn!(
                    "Price {} has unparseable created_at '{}': {}, using the epoch",
                    db.id, db.created_at, e
                );
                DateTime::default()
            }
        };

        Self {
            id: db.id,
            currency_id: db.currency_id,
            price: db.price,
            timestamp,
            created_at,
        }
    }
}
