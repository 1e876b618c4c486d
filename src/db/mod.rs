pub mod migrations;
pub mod queries;
pub mod result;
pub mod setup;
