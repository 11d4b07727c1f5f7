pub mod health_route;
pub mod messages;
pub mod sessions_route;
