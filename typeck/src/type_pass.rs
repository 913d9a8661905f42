use crate::{TypeCk, TypeCkTrait};
use common::{ErrorKind::*, ErrorKind, Loc, BinOp, Ref};
use syntax::{ast::*, ScopeOwner, Symbol, Ty};
use std::cell::Cell;
use std::ops::{Deref, DerefMut};

pub(crate) struct TypePass<'a>(pub TypeCk<'a>);

impl<'a> Deref for TypePass<'a> {
  type Target = TypeCk<'a>;
  fn deref(&self) -> &Self::Target { &self.0 }
}

impl<'a> DerefMut for TypePass<'a> {
  fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}

impl<'a> TypePass<'a> {
  pub fn program(&mut self, p: &'a Program<'a>) {
    // the main class is checked as a synthetic method with no params and no locals:
    // `this` is the main class, and every identifier in the body is undeclared
    self.cur_class = Some(p.main.class);
    self.scoped(ScopeOwner::Class(p.main.class), |s| s.stmt(&p.main.body));
    for c in &p.class { self.class_def(c); }
  }

  fn class_def(&mut self, c: &'a ClassDef<'a>) {
    self.cur_class = Some(c);
    self.scoped(ScopeOwner::Class(c), |s| for m in &c.method {
      s.scoped(ScopeOwner::Method(m), |s| {
        for st in &m.body { s.stmt(st); }
        let (expect, actual) = (m.ret_ty.get(), s.expr(&m.ret_expr));
        if !actual.assignable_to(expect) {
          s.issue(m.ret_expr.loc, ReturnMismatch { method: m.qualified_name(), expect, actual })
        }
      });
    });
  }

  fn stmt(&mut self, s: &'a Stmt<'a>) {
    match &s.kind {
      StmtKind::Assign(a) => {
        let (l, r) = (self.var_ty(s.loc, a.dst, &a.var), self.expr(&a.src));
        if !r.assignable_to(l) { self.issue(s.loc, AssignMismatch { l, r }) }
      }
      StmtKind::ArrayAssign(a) => {
        let arr = self.var_ty(s.loc, a.dst, &a.var);
        let (idx, src) = (self.expr(&a.idx), self.expr(&a.src));
        if arr != Ty::IntArray && arr != Ty::Error { self.issue(s.loc, IndexNotArray(arr)) }
        if idx != Ty::Int && idx != Ty::Error { self.issue(a.idx.loc, IndexNotInt(idx)) }
        if src != Ty::Int && src != Ty::Error { self.issue(a.src.loc, ElementNotInt(src)) }
      }
      StmtKind::If(i) => {
        self.check_bool(&i.cond, "if");
        self.stmt(&i.on_true);
        self.stmt(&i.on_false);
      }
      StmtKind::While(w) => {
        self.check_bool(&w.cond, "while");
        self.stmt(&w.body);
      }
      StmtKind::DoWhile(d) => {
        self.stmt(&d.body);
        self.check_bool(&d.cond, "do while");
      }
      StmtKind::Print(e) => {
        let ty = self.expr(e);
        if ty != Ty::Int && ty != Ty::Error { self.issue(e.loc, PrintNotInt(ty)) }
      }
      StmtKind::Block(b) => for st in &b.stmt { self.stmt(st); }
    }
  }

  fn expr(&mut self, e: &'a Expr<'a>) -> Ty<'a> {
    use ExprKind::*;
    let ty = match &e.kind {
      VarSel(v) => self.var_ty(e.loc, v.name, &v.var),
      IndexSel(i) => {
        let (arr, idx) = (self.expr(&i.arr), self.expr(&i.idx));
        if arr != Ty::IntArray && arr != Ty::Error { self.issue::<()>(i.arr.loc, IndexNotArray(arr)); }
        if idx != Ty::Int && idx != Ty::Error { self.issue::<()>(i.idx.loc, IndexNotInt(idx)); }
        Ty::Int
      }
      IntLit(_) => Ty::Int,
      BoolLit(_) => Ty::Bool,
      Call(c) => self.call(c, e.loc),
      Unary(u) => {
        let r = self.expr(&u.r);
        if r != Ty::Bool && r != Ty::Error { self.issue::<()>(e.loc, IncompatibleUnary { op: "!", r }); }
        Ty::Bool
      }
      Binary(b) => self.binary(b, e.loc),
      This(_) => Ty::mk_obj(self.cur_class.unwrap()),
      NewClass(n) => match self.scopes.lookup_class(n.name) {
        Some(c) => {
          n.class.set(Some(c));
          Ty::mk_obj(c)
        }
        None => {
          // substitute the root class and carry on, like the original
          n.class.set(Some(self.scopes.object()));
          self.issue_obj(e.loc, NoSuchClass(n.name))
        }
      },
      NewArray(n) => {
        let len = self.expr(&n.len);
        if len != Ty::Int && len != Ty::Error { self.issue::<()>(n.len.loc, NewArrayNotInt(len)); }
        Ty::IntArray
      }
      Length(l) => {
        let arr = self.expr(&l.arr);
        if arr != Ty::IntArray && arr != Ty::Error { self.issue::<()>(e.loc, LengthNotArray(arr)); }
        Ty::Int
      }
    };
    e.ty.set(ty);
    ty
  }

  fn binary(&mut self, b: &'a Binary<'a>, loc: Loc) -> Ty<'a> {
    use BinOp::*;
    let (l, r) = (self.expr(&b.l), self.expr(&b.r));
    if l == Ty::Error || r == Ty::Error {
      match b.op { Add | Sub | Mul => Ty::Int, Lt | And => Ty::Bool }
    } else {
      let (ret, ok) = match b.op {
        Add | Sub | Mul => (Ty::Int, l == Ty::Int && r == Ty::Int),
        Lt => (Ty::Bool, l == Ty::Int && r == Ty::Int),
        And => (Ty::Bool, l == Ty::Bool && r == Ty::Bool),
      };
      if !ok { self.issue::<()>(loc, IncompatibleBinary { l, op: b.op.to_op_str(), r }); }
      ret
    }
  }

  fn call(&mut self, c: &'a Call<'a>, loc: Loc) -> Ty<'a> {
    // the receiver and every argument are checked unconditionally, only then the call itself;
    // this keeps nested errors even when the call is hopeless
    let owner = self.expr(&c.owner);
    let args = c.arg.iter().map(|a| self.expr(a)).collect::<Vec<_>>();
    let cl = match owner {
      Ty::Object(Ref(cl)) => cl,
      Ty::Error => return self.object_ty(),
      _ => return self.issue_obj(loc, NotObject(owner)),
    };
    let m = match cl.lookup(c.name) {
      Some(Symbol::Method(m)) => m,
      _ => return self.issue_obj(loc, NoSuchMethod { name: c.name, owner }),
    };
    // record the static receiver class before any arity checking, lowering keys dispatch off it
    c.class.set(Some(cl));
    c.method.set(Some(m));
    if m.param.len() != c.arg.len() {
      return self.issue_obj(loc, ArgcMismatch { name: c.name, expect: m.param.len() as u32, actual: c.arg.len() as u32 });
    }
    for (idx, (arg, param)) in args.iter().zip(m.param.iter()).enumerate() {
      if !arg.assignable_to(param.ty.get()) {
        self.issue::<()>(c.arg[idx].loc, ArgMismatch { loc: idx as u32 + 1, arg: *arg, param: param.ty.get() });
      }
    }
    m.ret_ty.get()
  }

  // resolve an identifier that must denote a variable (a method local, a param, or a field)
  fn var_ty(&mut self, loc: Loc, name: &'a str, var: &Cell<Option<&'a VarDef<'a>>>) -> Ty<'a> {
    match self.scopes.lookup(name) {
      Some((Symbol::Var(v), _)) => {
        var.set(Some(v));
        v.ty.get()
      }
      _ => self.issue_obj(loc, UndeclaredVar(name)),
    }
  }

  fn check_bool(&mut self, e: &'a Expr<'a>, stmt: &'static str) {
    let actual = self.expr(e);
    if actual != Ty::Bool && actual != Ty::Error {
      self.issue(e.loc, TestNotBool { stmt, actual })
    }
  }

  // issue and recover with an object of the root class
  fn issue_obj(&mut self, loc: Loc, kind: ErrorKind<'a, Ty<'a>>) -> Ty<'a> {
    self.issue::<()>(loc, kind);
    self.object_ty()
  }
}
