use serde::{Deserialize, Serialize};
use sqlx::{Executor, MySql};
use utoipa::ToSchema;

use crate::engine::geofence;

/// Office location with its permitted clock-in radius.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Office {
    #[schema(example = 1)]
    pub id: u64,
    pub company_id: u64,
    #[schema(example = "Head Office")]
    pub name: String,
    #[schema(example = -6.2001)]
    pub latitude: f64,
    #[schema(example = 106.8166)]
    pub longitude: f64,
    /// Permitted distance from the office coordinate, in meters.
    #[schema(example = 100)]
    pub radius: i32,
    pub is_active: bool,
}

impl Office {
    pub async fn find_by_id<'e, E>(exec: E, id: u64) -> Result<Option<Office>, sqlx::Error>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_as::<_, Office>(
            "SELECT id, company_id, name, latitude, longitude, radius, is_active \
             FROM offices WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(exec)
        .await
    }

    /// True iff the coordinate lies within this office's geofence.
    pub fn is_within_radius(&self, latitude: f64, longitude: f64) -> bool {
        geofence::distance_meters(self.latitude, self.longitude, latitude, longitude)
            <= f64::from(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office(radius: i32) -> Office {
        Office {
            id: 1,
            company_id: 1,
            name: "Head Office".to_string(),
            latitude: -6.2001,
            longitude: 106.8166,
            radius,
            is_active: true,
        }
    }

    #[test]
    fn accepts_the_office_coordinate_itself() {
        assert!(office(100).is_within_radius(-6.2001, 106.8166));
    }

    #[test]
    fn rejects_a_point_well_outside_the_radius() {
        // ~150m north of the office against a 100m radius.
        let o = office(100);
        assert!(!o.is_within_radius(-6.2001 + 0.00135, 106.8166));
        // The same point passes once the radius is widened.
        let o = office(200);
        assert!(o.is_within_radius(-6.2001 + 0.00135, 106.8166));
    }
}
