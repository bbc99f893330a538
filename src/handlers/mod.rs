pub mod devices;
pub mod help;
pub mod repl;
pub mod shell_mode;
pub mod single;
