pub mod params;
pub mod table;
