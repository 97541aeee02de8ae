use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Engine versions a car may be created or updated with.
pub const ENGINE_VERSIONS: &[&str] = &[
    "1.0", "1.4", "1.5", "1.6", "1.8", "2.0", "2.4", "2.5", "3.0", "3.5", "4.0",
];

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;

/// Lifecycle of a stored car. Deleted cars stay in the store but are
/// invisible to every read and write path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarState {
    Active,
    Deleted { at: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: Uuid,
    pub name: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: CarState,
}

impl Car {
    pub fn new(name: String, engine_version: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            engine_version,
            created_at: now,
            updated_at: now,
            state: CarState::Active,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self.state, CarState::Deleted { .. })
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            CarState::Active => None,
            CarState::Deleted { at } => Some(at),
        }
    }
}

impl FromRow<'_, PgRow> for Car {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let deleted_at: Option<DateTime<Utc>> = row.try_get("deleted_at")?;
        Ok(Car {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            engine_version: row.try_get("engine_version")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            state: deleted_at.map_or(CarState::Active, |at| CarState::Deleted { at }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_car_starts_active_with_matching_timestamps() {
        let car = Car::new("Honda Civic".to_string(), "2.0".to_string());
        assert!(!car.id.is_nil());
        assert_eq!(car.created_at, car.updated_at);
        assert_eq!(car.state, CarState::Active);
        assert!(car.deleted_at().is_none());
    }

    #[test]
    fn deleted_state_exposes_deletion_time() {
        let mut car = Car::new("Tesla Model 3".to_string(), "1.0".to_string());
        let at = Utc::now();
        car.state = CarState::Deleted { at };
        assert!(car.is_deleted());
        assert_eq!(car.deleted_at(), Some(at));
    }
}
