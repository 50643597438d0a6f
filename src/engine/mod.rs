//! The attendance computation engine: pure functions over typed inputs,
//! no database access, no clock reads. Handlers feed it rows and a policy
//! and persist whatever comes back.

pub mod calendar;
pub mod duration;
pub mod geofence;
pub mod overtime;
