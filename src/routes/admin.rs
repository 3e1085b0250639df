use actix_web::web;

use crate::handlers::admin::user_handler;
use crate::middleware::admin::AdminMiddleware;

pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .wrap(AdminMiddleware)
            .service(web::resource("").route(web::get().to(user_handler::get_users)))
            .service(web::resource("/{id}").route(web::delete().to(user_handler::delete_user))),
    );
}
