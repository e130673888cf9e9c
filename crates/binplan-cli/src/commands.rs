pub mod plan;
pub mod validate;
