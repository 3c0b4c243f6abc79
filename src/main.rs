#[macro_use] extern crate rocket;
extern crate diesel;

use rocket::fairing::AdHoc;
use rocket::fs::{relative, FileServer};
use rocket::{Build, Rocket};
use rocket_db_pools::diesel::MysqlPool;
use rocket_db_pools::Database;
use rocket_dyn_templates::Template;

pub mod api;
pub mod auth;
pub mod config;
pub mod email;
pub mod errors;
pub mod event;
pub mod gate;
pub mod geo;
pub mod guest;
pub mod ics;
pub mod locale;
pub mod models;
pub mod pages;
pub mod rsvp;
pub mod schema;

#[cfg(test)]
mod tests;

#[derive(Database)]
#[database("wedding")]
pub struct Db(MysqlPool);

/// Builds the full application on top of a Rocket instance; split from
/// the launch function so tests can assemble it over a custom figment.
pub fn assemble(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/", routes![
            pages::home,
            pages::invite,
            pages::invite_by_id,
            pages::calendar,
            pages::wedding,
            pages::login_page,
            pages::admin_dashboard,
            pages::admin_redirect,
            pages::admin_redirect_post,
            pages::admin_redirect_put,
            pages::admin_redirect_delete,
        ])
        .mount("/api", routes![
            api::login_json,
            api::login_form,
            api::login_other,
            api::logout,
            api::session,
            api::geo,
            api::visitor,
            api::submit_rsvp,
            api::check_email,
            api::rsvp_history,
            api::admin_rsvps,
            api::admin_redirect,
            api::admin_redirect_post,
            api::admin_redirect_put,
            api::admin_redirect_delete,
        ])
        .mount("/static", FileServer::from(relative!("static")))
        .attach(Template::fairing())
        .attach(Db::init())
        .attach(gate::LocaleBootstrap)
        .attach(AdHoc::config::<config::AppConfig>())
}

#[launch]
fn rocket() -> _ {
    assemble(rocket::build())
}
