use crate::{
    api::{attendance, overtime, visit},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("").route(web::get().to(attendance::attendance_history)),
                    )
                    // /attendance/clock
                    .service(
                        web::resource("/clock").route(web::post().to(attendance::clock_in_out)),
                    )
                    // /attendance/status
                    .service(
                        web::resource("/status")
                            .route(web::get().to(attendance::attendance_status)),
                    )
                    // /attendance/activity
                    .service(
                        web::resource("/activity").route(web::get().to(attendance::activity_logs)),
                    ),
            )
            .service(
                web::scope("/overtime")
                    // /overtime
                    .service(
                        web::resource("")
                            .route(web::get().to(overtime::list_my_overtime))
                            .route(web::post().to(overtime::submit_overtime)),
                    )
                    // /overtime/approvals/pending
                    .service(
                        web::resource("/approvals/pending")
                            .route(web::get().to(overtime::pending_approvals)),
                    )
                    // /overtime/{id}
                    .service(web::resource("/{id}").route(web::get().to(overtime::get_overtime)))
                    // /overtime/{id}/cancel
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(overtime::cancel_overtime)),
                    )
                    // /overtime/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(overtime::approve_overtime)),
                    )
                    // /overtime/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(overtime::reject_overtime)),
                    ),
            )
            .service(
                web::scope("/visit")
                    // /visit
                    .service(
                        web::resource("")
                            .route(web::get().to(visit::list_my_visits))
                            .route(web::post().to(visit::request_visit)),
                    )
                    // /visit/approvals
                    .service(
                        web::resource("/approvals").route(web::get().to(visit::visit_approvals)),
                    )
                    // /visit/{id}/approve
                    .service(
                        web::resource("/{id}/approve").route(web::put().to(visit::approve_visit)),
                    )
                    // /visit/{id}/reject
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(visit::reject_visit)),
                    )
                    // /visit/{id}/start
                    .service(
                        web::resource("/{id}/start").route(web::post().to(visit::start_visit)),
                    )
                    // /visit/{id}/end
                    .service(web::resource("/{id}/end").route(web::post().to(visit::end_visit))),
            ),
    );
}

// CLOCK LIFE CYCLE
//  ├─ POST /attendance/clock  → clock in (geofenced, once per day)
//  └─ POST /attendance/clock  → clock out (same endpoint, settles durations)

// VISIT LIFE CYCLE
//  └─ request → approve → start (clock in) → end (clock out)
