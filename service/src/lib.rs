pub mod collaborator;
pub mod image;
pub mod project;
pub mod retry;
