pub mod config;
pub mod diagnosis;
pub mod dialogue;
pub mod gateway;
pub mod knowledge;
pub mod nlu;
pub mod store;
pub mod types;
