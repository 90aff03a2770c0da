pub mod app_state;
pub mod auth;
pub mod http_error;
pub mod openapi;
pub mod routes;
pub mod schema;
