use crate::{
    api::{attendance, compliance, employee, exception},
    config::Config,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    // /employees/upload
                    .service(
                        web::resource("/upload").route(web::post().to(employee::upload_roster)),
                    )
                    // /employees/{employee_id}
                    .service(
                        web::resource("/{employee_id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::get().to(attendance::list_attendance)))
                    // /attendance/upload
                    .service(
                        web::resource("/upload")
                            .route(web::post().to(attendance::upload_attendance)),
                    )
                    // /attendance/last-upload
                    .service(
                        web::resource("/last-upload").route(web::get().to(attendance::last_upload)),
                    ),
            )
            .service(
                web::scope("/compliance")
                    .service(
                        web::resource("/weekly").route(web::get().to(compliance::list_weekly)),
                    )
                    .service(
                        web::resource("/weekly/calculate")
                            .route(web::post().to(compliance::calculate_weekly)),
                    )
                    .service(
                        web::resource("/monthly").route(web::get().to(compliance::list_monthly)),
                    )
                    .service(
                        web::resource("/monthly/calculate")
                            .route(web::post().to(compliance::calculate_monthly)),
                    )
                    .service(
                        web::resource("/quarterly")
                            .route(web::get().to(compliance::list_quarterly)),
                    )
                    .service(
                        web::resource("/quarterly/calculate")
                            .route(web::post().to(compliance::calculate_quarterly)),
                    ),
            )
            .service(
                web::scope("/exceptions")
                    // /exceptions
                    .service(
                        web::resource("")
                            .route(web::get().to(exception::list_exceptions))
                            .route(web::post().to(exception::create_exception)),
                    )
                    // /exceptions/populate
                    .service(
                        web::resource("/populate")
                            .route(web::post().to(exception::populate_exceptions)),
                    )
                    // /exceptions/{exception_id}
                    .service(
                        web::resource("/{exception_id}")
                            .route(web::get().to(exception::get_exception))
                            .route(web::put().to(exception::update_exception))
                            .route(web::delete().to(exception::delete_exception)),
                    ),
            ),
    );
}
