use common::{IndentPrinter, IgnoreResult, INIT_FUNC, MAIN_FUNC};
use tac::{Tac, Reg, BinKind, TacBlock, TacProgram};
use std::fmt::Write;

// emit the whole C translation unit for a lowered program
pub fn work(pr: &TacProgram) -> String {
  let mut p = IndentPrinter::default();
  program(pr, &mut p);
  p.finish()
}

pub fn program(pr: &TacProgram, p: &mut IndentPrinter) {
  let (max_param, vg_num) = (pr.max_param(), pr.vg_num());
  write!(p, "#include <stdio.h>").ignore();
  write!(p, "#include <stdlib.h>").ignore();
  write!(p, "\n").ignore();
  // every runtime value is one word: an int, a pointer, or a function address
  write!(p, "union word {{").ignore();
  p.indent(|p| {
    write!(p, "int n;").ignore();
    write!(p, "union word* ptr;").ignore();
    write!(p, "void (*f)();").ignore();
  });
  write!(p, "}};").ignore();
  write!(p, "typedef union word word;").ignore();
  write!(p, "\n").ignore();
  // argument passing runs through these globals; each callee copies them out
  // in its prologue and resets next_param, which is what makes recursion work
  write!(p, "word param[{}];", max_param).ignore();
  write!(p, "int next_param = 0;").ignore();
  write!(p, "\n").ignore();
  write!(p, "word r0 = {{0}};").ignore();
  for i in 0..vg_num { write!(p, "word vg{} = {{0}};", i).ignore(); }
  write!(p, "\n").ignore();
  for b in &pr.block { write!(p, "void {}();", mangle(&b.name)).ignore(); }
  write!(p, "\n").ignore();
  write!(p, "int main() {{").ignore();
  p.indent(|p| {
    write!(p, "{}();", INIT_FUNC).ignore();
    write!(p, "{}();", MAIN_FUNC).ignore();
    write!(p, "return 0;").ignore();
  });
  write!(p, "}}").ignore();
  write!(p, "\n").ignore();
  for b in &pr.block { block(b, pr, max_param, p); }
}

fn block(b: &TacBlock, pr: &TacProgram, max_param: u32, p: &mut IndentPrinter) {
  write!(p, "void {}() {{", mangle(&b.name)).ignore();
  p.indent(|p| {
    // declarations first, the emitted C stays within C89
    write!(p, "word vl[{}];", b.vl_num.max(1)).ignore();
    for i in (1..b.r_num).rev() { write!(p, "word r{};", i).ignore(); }
    write!(p, "int p;").ignore();
    write!(p, "for (p = 0; p < {} && p < {}; p++) {{", b.vl_num, max_param).ignore();
    p.indent(|p| write!(p, "vl[p] = param[p];").ignore());
    write!(p, "}}").ignore();
    write!(p, "next_param = 0;").ignore();
    for t in &b.ops { op(t, b, pr, p); }
  });
  write!(p, "}}").ignore();
  write!(p, "\n").ignore();
}

// one op, one C statement (labels become C labels)
fn op(t: &Tac, b: &TacBlock, pr: &TacProgram, p: &mut IndentPrinter) {
  use Tac::*;
  match *t {
    Mov { dst, src } => write!(p, "{} = {};", reg(dst), reg(src)),
    Immed { dst, n } => write!(p, "{}.n = {};", reg(dst), n),
    Load { dst, addr } => write!(p, "{} = *({}.ptr);", reg(dst), reg(addr)),
    Store { addr, src } => write!(p, "*({}.ptr) = {};", reg(addr), reg(src)),
    Bin { op, dst, l, r } => match op {
      BinKind::Offset => write!(p, "{}.ptr = {}.ptr + {}.n;", reg(dst), reg(l), reg(r)),
      _ => write!(p, "{}.n = {}.n {} {}.n;", reg(dst), reg(l), op.to_op_str(), reg(r)),
    },
    Param { src } => write!(p, "param[next_param++] = {};", reg(src)),
    Call { target } => write!(p, "(*({}.f))();", reg(target)),
    Ret => write!(p, "return;"),
    Label { id } => write!(p, "{}:", local_label(b, id)),
    Jmp { id } => write!(p, "goto {};", local_label(b, id)),
    Jz { cond, id } => write!(p, "if ({}.n == 0) goto {};", reg(cond), local_label(b, id)),
    // calloc is load-bearing: the zeroed words are the 0/false/null defaults
    // of fresh objects and arrays
    Malloc { dst, size } => write!(p, "{}.ptr = calloc({}.n, sizeof(word));", reg(dst), reg(size)),
    Read { .. } => unreachable!("no MiniJava construct lowers to Read"),
    Write { src } => write!(p, "printf(\"%d\\n\", {});", reg(src)),
    AddrOf { dst, f } => write!(p, "{}.f = &{};", reg(dst), mangle(&pr.block[f as usize].name)),
    Nop => write!(p, ";"),
  }.ignore();
}

fn reg(r: Reg) -> String {
  match r {
    Reg::R(i) => format!("r{}", i),
    Reg::Vl(i) => format!("vl[{}]", i),
    Reg::Vg(i) => format!("vg{}", i),
  }
}

// make a label a valid C identifier; doubling '_' first keeps the mapping injective
pub fn mangle(name: &str) -> String {
  name.replace('_', "__").replace('.', "_").replace('@', "_")
}

// intra-block labels are spelled "name@id" and never escape their function
fn local_label(b: &TacBlock, id: u32) -> String {
  mangle(&format!("{}@{}", b.name, id))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mangle_stays_injective() {
    assert_eq!(mangle("Point.getx"), "Point_getx");
    assert_eq!(mangle("Point.getx@3"), "Point_getx_3");
    assert_eq!(mangle("a_b.c"), "a__b_c");
    assert_ne!(mangle("a_b.c"), mangle("a.b_c"));
    assert_eq!(mangle("INIT"), "INIT");
  }
}
