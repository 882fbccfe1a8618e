// Presentation layer - Views, HTML and HTTP handlers
pub mod app_state;
pub mod handlers;
pub mod html;
pub mod routes;
pub mod view;
