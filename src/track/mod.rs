pub mod audit;
pub mod config;
pub mod ledger;
pub mod messages;
pub mod paths;
pub mod recalc;
pub mod record;
pub mod saver;
pub mod store;
pub mod summary;
pub mod tracker;
