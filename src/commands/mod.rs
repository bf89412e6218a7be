pub mod begin;
pub mod delete;
pub mod end;
pub mod interactive;
pub mod list;
pub mod projects;
pub mod summary;
pub mod week;
