//! HTTP inbound adapter exposing REST endpoints.

pub mod categories;
pub mod envelope;
pub mod error;
pub mod health;
pub mod orders;
pub mod products;
pub mod schemas;
pub mod state;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the catalogue and order routes along with the JSON extractor
/// configuration that maps malformed bodies into the response envelope.
///
/// # Examples
/// ```no_run
/// use actix_web::App;
/// use orderdesk::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .service(categories::create_category)
        .service(categories::list_categories)
        .service(categories::get_category)
        .service(categories::update_category)
        .service(categories::delete_category)
        .service(products::create_product)
        .service(products::list_products)
        .service(products::get_product)
        .service(products::update_product)
        .service(products::delete_product)
        .service(orders::create_order)
        .service(orders::list_orders)
        .service(orders::get_order)
        .service(orders::delete_order);
}
