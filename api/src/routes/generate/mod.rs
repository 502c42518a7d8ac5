pub mod generate_request;
pub mod generate_response_route;
