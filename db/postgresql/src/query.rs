pub mod collaborator;
pub mod collaborator_assignment;
pub mod member;
pub mod organization;
pub mod project;
pub mod role;
