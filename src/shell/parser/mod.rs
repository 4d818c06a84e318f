pub mod ast;
mod lexer;
mod parser;

pub use ast::Command;
pub use parser::Parser;
