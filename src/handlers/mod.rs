pub mod service_area;
pub mod travel;
