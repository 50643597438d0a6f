pub mod attendance;
pub mod overtime;
pub mod visit;

/// Reject out-of-range coordinates and unusable addresses before touching
/// storage. Returns the exact message to surface.
pub(crate) fn validate_location(
    latitude: f64,
    longitude: f64,
    address: &str,
) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("latitude must be between -90 and 90");
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("longitude must be between -180 and 180");
    }
    if address.trim().is_empty() || address.len() > 500 {
        return Err("location_address must be 1-500 characters");
    }
    Ok(())
}

/// Minutes as `HH:MM` for human-facing responses.
pub(crate) fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Map a storage failure to the generic retry-safe response, keeping the
/// detail in the logs only.
pub(crate) fn storage_error(e: sqlx::Error, context: &'static str) -> actix_web::Error {
    tracing::error!(error = %e, context, "storage failure");
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_as_hours_and_minutes() {
        assert_eq!(format_minutes(0), "00:00");
        assert_eq!(format_minutes(30), "00:30");
        assert_eq!(format_minutes(690), "11:30");
        assert_eq!(format_minutes(-5), "00:00");
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(validate_location(-91.0, 0.0, "somewhere").is_err());
        assert!(validate_location(0.0, 181.0, "somewhere").is_err());
        assert!(validate_location(f64::NAN, 0.0, "somewhere").is_err());
        assert!(validate_location(0.0, 0.0, "").is_err());
        assert!(validate_location(-6.2, 106.8, "Jl. Sudirman 1").is_ok());
    }
}
