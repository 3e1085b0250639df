use actix_web::web;

pub mod activities;
pub mod admin;
pub mod auth;
pub mod backend_health;
pub mod goals;
pub mod profile;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    cfg.service(
        web::scope("/api/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::refresh),
    );

    // Profile routes must be registered before the admin /api/users scope,
    // otherwise "profile" would be captured as a user id
    cfg.service(
        web::scope("/api/users/profile")
            .wrap(AuthMiddleware)
            .service(profile::get_profile)
            .service(profile::update_profile),
    );
    cfg.configure(admin::init_admin_routes);

    cfg.service(
        web::scope("/api/activities")
            .wrap(AuthMiddleware)
            .service(activities::create_activity)
            .service(activities::list_activities)
            .service(activities::get_stats)
            .service(activities::get_activity)
            .service(activities::update_activity)
            .service(activities::delete_activity),
    );

    cfg.service(
        web::scope("/api/goals")
            .wrap(AuthMiddleware)
            .service(goals::create_goal)
            .service(goals::list_goals)
            .service(goals::get_goal)
            .service(goals::update_goal)
            .service(goals::delete_goal)
            .service(goals::update_progress),
    );
}
