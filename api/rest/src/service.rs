pub mod project;
pub mod root;
pub mod storage;
