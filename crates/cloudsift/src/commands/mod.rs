pub mod check;
pub mod show;
pub mod targets;
pub mod validate;
