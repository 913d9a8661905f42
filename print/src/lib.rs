pub mod ast;
pub mod scope;
pub mod tac;
