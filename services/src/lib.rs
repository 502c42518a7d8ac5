pub mod point_id;
