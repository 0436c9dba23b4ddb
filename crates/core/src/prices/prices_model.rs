//! Price observation domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// One recorded price of a currency at a point in time.
///
/// Observations are immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceObservation {
    pub id: i64,
    pub currency_id: i64,
    pub price: f64,
    /// Time the price is valid for
    pub timestamp: DateTime<Utc>,
    /// Time the row was written
    pub created_at: DateTime<Utc>,
}

impl PriceObservation {
    /// Absolute distance to `target` in microseconds.
    pub fn distance_micros(&self, target: DateTime<Utc>) -> u64 {
        self.timestamp
            .timestamp_micros()
            .abs_diff(target.timestamp_micros())
    }
}

/// Input model for appending an observation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPriceObservation {
    pub currency_id: i64,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl NewPriceObservation {
    pub fn validate(&self) -> Result<()> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Price must be a positive number, got {}",
                self.price
            ))));
        }
        Ok(())
    }
}

/// Picks the observation closest to `target`.
///
/// Ties on distance go to the lowest id, so the result does not depend on the
/// order of `candidates`.
pub fn pick_nearest<I>(candidates: I, target: DateTime<Utc>) -> Option<PriceObservation>
where
    I: IntoIterator<Item = PriceObservation>,
{
    candidates
        .into_iter()
        .min_by_key(|obs| (obs.distance_micros(target), obs.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn obs(id: i64, secs: i64) -> PriceObservation {
        let ts = Utc.timestamp_opt(secs, 0).unwrap();
        PriceObservation {
            id,
            currency_id: 1,
            price: 1.0 + id as f64,
            timestamp: ts,
            created_at: ts,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_pick_nearest_between_two_points() {
        let rows = vec![obs(1, 100), obs(2, 200)];

        assert_eq!(pick_nearest(rows.clone(), at(130)).unwrap().id, 1);
        assert_eq!(pick_nearest(rows, at(170)).unwrap().id, 2);
    }

    #[test]
    fn test_pick_nearest_tie_goes_to_lowest_id() {
        let rows = vec![obs(7, 200), obs(3, 100)];
        assert_eq!(pick_nearest(rows, at(150)).unwrap().id, 3);

        let rows = vec![obs(9, 100), obs(4, 100)];
        assert_eq!(pick_nearest(rows, at(100)).unwrap().id, 4);
    }

    #[test]
    fn test_pick_nearest_outside_range() {
        let rows = vec![obs(2, 200), obs(1, 100)];
        assert_eq!(pick_nearest(rows.clone(), at(0)).unwrap().id, 1);
        assert_eq!(pick_nearest(rows, at(10_000)).unwrap().id, 2);
    }

    #[test]
    fn test_pick_nearest_empty() {
        assert!(pick_nearest(Vec::new(), at(0)).is_none());
    }

    #[test]
    fn test_validate_price() {
        let mut input = NewPriceObservation {
            currency_id: 1,
            price: 65000.12,
            timestamp: at(0),
        };
        assert!(input.validate().is_ok());

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            input.price = bad;
            assert!(input.validate().is_err(), "accepted {}", bad);
        }
    }
}
