use common::{IndentPrinter, IgnoreResult};
use tac::{Tac, TacProgram};
use std::fmt::Write;

pub fn program(pr: &TacProgram, p: &mut IndentPrinter) {
  for b in &pr.block {
    write!(p, "FUNC<{}> {{", b.name).ignore();
    p.indent(|p| for t in &b.ops { write_tac(t, pr, p); });
    write!(p, "}}\n\n").ignore();
  }
}

pub fn write_tac(t: &Tac, pr: &TacProgram, p: &mut IndentPrinter) {
  use Tac::*;
  match *t {
    Mov { dst, src } => write!(p, "{:?} = {:?}", dst, src),
    Immed { dst, n } => write!(p, "{:?} = {}", dst, n),
    Load { dst, addr } => write!(p, "{:?} = *{:?}", dst, addr),
    Store { addr, src } => write!(p, "*{:?} = {:?}", addr, src),
    Bin { op, dst, l, r } => write!(p, "{:?} = ({:?} {} {:?})", dst, l, op.to_op_str(), r),
    Param { src } => write!(p, "parm {:?}", src),
    Call { target } => write!(p, "call {:?}", target),
    Ret => write!(p, "return"),
    Label { id } => write!(p, "_L{}:", id),
    Jmp { id } => write!(p, "branch _L{}", id),
    Jz { cond, id } => write!(p, "if ({:?} == 0) branch _L{}", cond, id),
    Malloc { dst, size } => write!(p, "{:?} = alloc {:?}", dst, size),
    Read { dst } => write!(p, "{:?} = read", dst),
    Write { src } => write!(p, "print {:?}", src),
    AddrOf { dst, f } => write!(p, "{:?} = FUNC<{}>", dst, pr.block[f as usize].name),
    Nop => write!(p, "nop"),
  }.ignore();
}
