pub mod filesystem;
pub mod shell;
