pub mod composite;
pub mod ops;
