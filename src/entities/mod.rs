pub mod service_area;
