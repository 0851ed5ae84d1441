pub mod distributions;
pub mod float;
pub mod stat;
pub mod transform;
pub mod vec;
