pub mod plugin;
pub mod providers;
pub mod registry;
