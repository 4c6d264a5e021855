pub mod behavior;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod kinematics;
pub mod snapshot;
pub mod stage;
pub mod tuning;
