pub mod config;
pub mod photo;
pub mod posters;
pub mod run;
pub mod scroll;
