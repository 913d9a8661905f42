use crate::{ty::*, symbol::*};
use common::{Loc, BinOp, UnOp, Ref};
use typed_arena::Arena;
use std::cell::{Cell, RefCell};

#[derive(Default)]
pub struct ASTAlloc<'a> {
  pub(crate) class: Arena<ClassDef<'a>>,
  pub(crate) method: Arena<MethodDef<'a>>,
  pub(crate) var: Arena<VarDef<'a>>,
  pub(crate) program: Arena<Program<'a>>,
}

// all Cell<Option<ref to ast node>> fields are written by typeck:
// those on classes/vars in symbol_pass.rs, those on expressions in type_pass.rs

pub struct Program<'a> {
  pub main: MainDef<'a>,
  // auxiliary classes in source order; the main class's synthetic def is not in this list
  pub class: Vec<&'a ClassDef<'a>>,
  pub scope: RefCell<Scope<'a>>,
  // the injected root class, allocated and set by symbol_pass
  pub object: Cell<Option<&'a ClassDef<'a>>>,
}

pub struct MainDef<'a> {
  pub loc: Loc,
  pub name: &'a str,
  // the String[] parameter name; MiniJava never reads it
  pub arg: &'a str,
  pub body: Stmt<'a>,
  // member-less def standing for the main class in the class table
  pub class: &'a ClassDef<'a>,
}

pub struct ClassDef<'a> {
  pub loc: Loc,
  pub name: &'a str,
  pub parent: Option<&'a str>,
  pub field: Vec<&'a VarDef<'a>>,
  pub method: Vec<&'a MethodDef<'a>>,
  pub parent_ref: Cell<Option<&'a ClassDef<'a>>>,
  pub scope: RefCell<Scope<'a>>,
}

impl<'a> ClassDef<'a> {
  pub fn extends(&self, rhs: &ClassDef<'a>) -> bool {
    let mut c = self;
    loop {
      if Ref(c) == Ref(rhs) { break true; }
      if let Some(p) = c.parent_ref.get() { c = p; } else { break false; }
    }
  }

  // lookup a member, searching the own scope first and then recursively all parents
  pub fn lookup(&self, name: &str) -> Option<Symbol<'a>> {
    let mut c = self;
    loop {
      match c.scope.borrow().get(name) {
        Some(&symbol) => break Some(symbol),
        None => match c.parent_ref.get() {
          Some(p) => c = p,
          None => break None,
        }
      }
    }
  }
}

pub struct MethodDef<'a> {
  pub loc: Loc,
  pub name: &'a str,
  pub ret: SynTy<'a>,
  pub param: Vec<&'a VarDef<'a>>,
  pub local: Vec<&'a VarDef<'a>>,
  pub body: Vec<Stmt<'a>>,
  // every MiniJava method ends with exactly one return expression
  pub ret_expr: Expr<'a>,
  pub ret_ty: Cell<Ty<'a>>,
  pub class: Cell<Option<&'a ClassDef<'a>>>,
  // params and locals share this one scope, params declared first
  pub scope: RefCell<Scope<'a>>,
}

impl<'a> MethodDef<'a> {
  pub fn qualified_name(&self) -> String {
    format!("{}.{}", self.class.get().map(|c| c.name).unwrap_or("?"), self.name)
  }
}

pub struct VarDef<'a> {
  pub loc: Loc,
  pub name: &'a str,
  pub syn_ty: SynTy<'a>,
  pub ty: Cell<Ty<'a>>,
  pub owner: Cell<Option<ScopeOwner<'a>>>,
}

pub struct Stmt<'a> {
  pub loc: Loc,
  pub kind: StmtKind<'a>,
}

#[derive(derive_more::From)]
pub enum StmtKind<'a> {
  Assign(Assign<'a>),
  ArrayAssign(ArrayAssign<'a>),
  // rust-clippy complains about this variant's size otherwise, wrap it in a Box
  If(Box<If<'a>>),
  While(While<'a>),
  DoWhile(DoWhile<'a>),
  Print(Expr<'a>),
  Block(Block<'a>),
}

pub struct Assign<'a> {
  pub dst: &'a str,
  pub src: Expr<'a>,
  pub var: Cell<Option<&'a VarDef<'a>>>,
}

pub struct ArrayAssign<'a> {
  pub dst: &'a str,
  pub idx: Expr<'a>,
  pub src: Expr<'a>,
  pub var: Cell<Option<&'a VarDef<'a>>>,
}

pub struct If<'a> {
  pub cond: Expr<'a>,
  pub on_true: Stmt<'a>,
  // MiniJava's if always carries an else
  pub on_false: Stmt<'a>,
}

pub struct While<'a> {
  pub cond: Expr<'a>,
  pub body: Box<Stmt<'a>>,
}

pub struct DoWhile<'a> {
  pub body: Box<Stmt<'a>>,
  pub cond: Expr<'a>,
}

pub struct Block<'a> {
  pub loc: Loc,
  pub stmt: Vec<Stmt<'a>>,
}

pub struct Expr<'a> {
  pub loc: Loc,
  pub ty: Cell<Ty<'a>>,
  pub kind: ExprKind<'a>,
}

#[derive(derive_more::From)]
pub enum ExprKind<'a> {
  VarSel(VarSel<'a>),
  IndexSel(IndexSel<'a>),
  IntLit(i32),
  BoolLit(bool),
  Call(Call<'a>),
  Unary(Unary<'a>),
  Binary(Binary<'a>),
  This(This),
  NewClass(NewClass<'a>),
  NewArray(NewArray<'a>),
  Length(Length<'a>),
}

pub struct VarSel<'a> {
  pub name: &'a str,
  pub var: Cell<Option<&'a VarDef<'a>>>,
}

pub struct IndexSel<'a> {
  pub arr: Box<Expr<'a>>,
  pub idx: Box<Expr<'a>>,
}

pub struct Call<'a> {
  pub owner: Box<Expr<'a>>,
  pub name: &'a str,
  pub arg: Vec<Expr<'a>>,
  // static class of the receiver, recorded by typeck and consumed by tacgen for slot lookup
  pub class: Cell<Option<&'a ClassDef<'a>>>,
  pub method: Cell<Option<&'a MethodDef<'a>>>,
}

pub struct Length<'a> {
  pub arr: Box<Expr<'a>>,
}

pub struct Unary<'a> {
  pub op: UnOp,
  pub r: Box<Expr<'a>>,
}

pub struct Binary<'a> {
  pub op: BinOp,
  pub l: Box<Expr<'a>>,
  pub r: Box<Expr<'a>>,
}

pub struct NewClass<'a> {
  pub name: &'a str,
  pub class: Cell<Option<&'a ClassDef<'a>>>,
}

pub struct NewArray<'a> {
  pub len: Box<Expr<'a>>,
}

// a unit struct, it exists just to keep all match patterns in the shape Xxx(x)
pub struct This;
