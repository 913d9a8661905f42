pub mod ast;
pub mod lexer;
pub mod parser;
pub mod ty;
pub mod symbol;

pub use ast::*;
pub use ty::*;
pub use symbol::*;

// below are some helper functions for the parser

use common::{Loc, Errors, ErrorKind};

// save a little typing than writing "Default::default()"
pub(crate) fn dft<T: Default>() -> T { T::default() }

pub(crate) fn mk_stmt(loc: Loc, kind: StmtKind) -> Stmt { Stmt { loc, kind } }

pub(crate) fn mk_expr(loc: Loc, kind: ExprKind) -> Expr { Expr { loc, ty: dft(), kind } }

pub(crate) fn mk_int_lit<'a, T>(loc: Loc, s: &'a str, error: &mut Errors<'a, T>) -> Expr<'a> {
  // MiniJava literals are decimal only
  let val: i32 = s.parse().unwrap_or_else(|_| error.issue(loc, ErrorKind::IntTooLarge(s)));
  mk_expr(loc, val.into())
}
