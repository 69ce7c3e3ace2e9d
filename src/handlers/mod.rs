pub mod admin;
pub mod protected;
pub mod public;
pub mod validators;
