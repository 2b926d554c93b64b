pub mod messages;
pub mod policy;
pub mod token;
