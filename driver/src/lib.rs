pub mod test_util;

use common::{IndentPrinter, Errors};
use syntax::{ASTAlloc, Ty, parser};
use typeck::TypeCkAlloc;

pub use test_util::*;

#[derive(Eq, PartialEq, Copy, Clone)]
pub enum Stage { Parse, TypeCk, Tac, C }

#[derive(Copy, Clone)]
pub struct CompileCfg {
  pub stage: Stage,
}

#[derive(Default)]
pub struct Alloc<'a> {
  ast: ASTAlloc<'a>,
  typeck: TypeCkAlloc<'a>,
}

// it is recommended to use this function to debug the compiler:
// `code` can be a hard-coded string literal, `cfg.stage` picks how far the pipeline runs,
// and the returned string is that stage's artifact (ast/scope/tac dump, or the C file)
pub fn compile<'a>(code: &'a str, alloc: &'a Alloc<'a>, cfg: CompileCfg) -> Result<String, Errors<'a, Ty<'a>>> {
  let mut p = IndentPrinter::default();
  let pr = parser::work(code, &alloc.ast)?;
  if cfg.stage == Stage::Parse {
    print::ast::program(&pr, &mut p);
    return Ok(p.finish());
  }
  // no tac is generated unless the program passed both typeck passes
  typeck::work(&pr, &alloc.typeck)?;
  if cfg.stage == Stage::TypeCk {
    print::scope::program(&pr, &mut p);
    return Ok(p.finish());
  }
  let tp = tacgen::work(pr);
  if cfg.stage == Stage::Tac {
    print::tac::program(&tp, &mut p);
    return Ok(p.finish());
  }
  Ok(codegen::work(&tp))
}
