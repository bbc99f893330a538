pub mod ast;
pub mod parser;

pub use ast::{Output, ParsedCommand, RedirectMode};
pub use parser::parse_command;

#[cfg(test)]
mod tests;
