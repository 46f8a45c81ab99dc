pub mod project;
pub mod resume;
