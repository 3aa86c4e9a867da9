pub mod contact;
pub mod generator;
pub mod settings;
pub mod system;
