pub mod message_request;
pub mod messages_route;
