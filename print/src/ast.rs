use common::{IndentPrinter, IgnoreResult};
use syntax::*;
use std::fmt::Write;

pub fn program(pr: &Program, p: &mut IndentPrinter) { pr.print(p); }

trait Printable {
  fn print(&self, p: &mut IndentPrinter);
}

// generate an impl block for Display types
macro_rules! print_basic {
  ($($t: ty)*) => {$(
    impl Printable for $t {
      fn print(&self, p: &mut IndentPrinter) { write!(p, "{}", self).ignore() }
    }
  )*};
}

print_basic!(i32 bool str);

impl<T: Printable> Printable for [T] {
  fn print(&self, p: &mut IndentPrinter) {
    write!(p, "List").ignore();
    p.indent(|p| if self.is_empty() { write!(p, "<empty>").ignore(); } else { for x in self { x.print(p); } })
  }
}

impl<T: Printable> Printable for Option<T> {
  fn print(&self, p: &mut IndentPrinter) {
    if let Some(x) = self { x.print(p); } else { write!(p, "<none>").ignore(); }
  }
}

impl<T: Printable> Printable for Box<T> {
  fn print(&self, p: &mut IndentPrinter) { self.as_ref().print(p); }
}

impl<T: Printable + ?Sized> Printable for &T {
  fn print(&self, p: &mut IndentPrinter) { (*self).print(p); }
}

impl Printable for SynTy<'_> {
  fn print(&self, p: &mut IndentPrinter) {
    match &self.kind {
      SynTyKind::Int => write!(p, "TInt @ {:?}", self.loc).ignore(),
      SynTyKind::Bool => write!(p, "TBool @ {:?}", self.loc).ignore(),
      SynTyKind::IntArray => write!(p, "TIntArray @ {:?}", self.loc).ignore(),
      SynTyKind::Named(c) => {
        write!(p, "TClass @ {:?}", self.loc).ignore();
        p.indent(|p| c.print(p));
      }
    }
  }
}

// generate an impl block for a struct, $name is its name IN THE DUMP (which may differ
// from the type's); $field are expressions over self, printed in order
macro_rules! print_struct {
  ($t: ty, $self_: ident, $loc: expr, $name: ident, $($field: expr),*) => {
    impl Printable for $t {
      fn print(&$self_, p: &mut IndentPrinter) {
        write!(p, "{} @ {:?}", stringify!($name), $loc).ignore();
        p.indent(|p| { $($field.print(p);)* });
      }
    }
  };
}

// generate a match block for an enum, $variant names both the variant and its dump label
macro_rules! print_enum {
  ($e: expr, $loc: expr, $p: expr, $name: ident, $($variant: ident => $($field: expr),*);*) => {
    match &$e {
      $($variant($name) => {
        write!($p, "{} @ {:?}", stringify!($variant), $loc).ignore();
        $p.indent(|p| { $($field.print(p);)* });
      })*
    }
  };
}

print_struct!(Program<'_>, self, self.main.loc, TopLevel, self.main, self.class);
print_struct!(MainDef<'_>, self, self.loc, MainClass, self.name, self.arg, self.body);
print_struct!(ClassDef<'_>, self, self.loc, ClassDef, self.name, self.parent, self.field, self.method);
print_struct!(MethodDef<'_>, self, self.loc, MethodDef, self.ret, self.name, self.param, self.local, self.body, self.ret_expr);
print_struct!(VarDef<'_>, self, self.loc, VarDef, self.syn_ty, self.name);

impl Printable for Stmt<'_> {
  #[allow(unused_variables)]
  fn print(&self, p: &mut IndentPrinter) {
    use StmtKind::*;
    print_enum!(self.kind, self.loc, p, x,
      Assign => x.dst, x.src; ArrayAssign => x.dst, x.idx, x.src; If => x.cond, x.on_true, x.on_false;
      While => x.cond, x.body; DoWhile => x.body, x.cond; Print => x; Block => x.stmt
    );
  }
}

impl Printable for Expr<'_> {
  #[allow(unused_variables)]
  fn print(&self, p: &mut IndentPrinter) {
    use ExprKind::*;
    print_enum!(self.kind, self.loc, p, x,
      VarSel => x.name; IndexSel => x.arr, x.idx; IntLit => x; BoolLit => x; Call => x.owner, x.name, x.arg;
      Unary => x.op.to_word_str(), x.r; Binary => x.op.to_word_str(), x.l, x.r; This => ;
      NewClass => x.name; NewArray => x.len; Length => x.arr
    );
  }
}
