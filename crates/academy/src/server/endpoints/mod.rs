pub mod classes;
pub mod conflicts;
pub mod status;
