use dotenvy::dotenv;
use std::env;

/// Attendance business policy. Every engine call receives this explicitly so
/// tests can pin the values instead of reaching for globals.
#[derive(Debug, Clone, Copy)]
pub struct AttendancePolicy {
    /// Minutes past scheduled end that are tolerated without an approved
    /// overtime grant before the excess becomes reportable.
    pub grace_minutes: i64,
    pub min_overtime_minutes: i64,
    pub max_overtime_minutes: i64,
    /// How many days ahead an overtime request may be submitted.
    pub max_advance_days: i64,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            grace_minutes: 15,
            min_overtime_minutes: 30,
            max_overtime_minutes: 240,
            max_advance_days: 7,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    pub policy: AttendancePolicy,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = AttendancePolicy::default();
        let policy = AttendancePolicy {
            grace_minutes: env_or("OVERTIME_GRACE_MINUTES", defaults.grace_minutes),
            min_overtime_minutes: env_or("OVERTIME_MIN_MINUTES", defaults.min_overtime_minutes),
            max_overtime_minutes: env_or("OVERTIME_MAX_MINUTES", defaults.max_overtime_minutes),
            max_advance_days: env_or("OVERTIME_MAX_ADVANCE_DAYS", defaults.max_advance_days),
        };

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            policy,
        }
    }
}

fn env_or(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
