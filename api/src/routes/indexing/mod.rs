pub mod index_db_route;
