pub mod list_models_route;
