mod scope_stack;
mod symbol_pass;
mod type_pass;

use common::{Errors, ErrorKind::*};
use syntax::{ClassDef, SynTy, SynTyKind, ScopeOwner, Ty, Program};
use typed_arena::Arena;
use std::ops::{Deref, DerefMut};
use crate::{symbol_pass::SymbolPass, type_pass::TypePass, scope_stack::ScopeStack};

#[derive(Default)]
pub struct TypeCkAlloc<'a> {
  // home of the injected Object root, which has no source syntax to be parsed from
  pub class: Arena<ClassDef<'a>>,
}

pub fn work<'a>(p: &'a Program<'a>, alloc: &'a TypeCkAlloc<'a>) -> Result<(), Errors<'a, Ty<'a>>> {
  let mut s = SymbolPass(TypeCk { errors: Errors(vec![]), scopes: ScopeStack::new(p), cur_class: None, alloc });
  s.program(p);
  if !s.errors.0.is_empty() { return Err(s.0.errors.sorted()); }
  let mut t = TypePass(s.0);
  t.program(p);
  if !t.errors.0.is_empty() { return Err(t.0.errors.sorted()); }
  Ok(())
}

struct TypeCk<'a> {
  errors: Errors<'a, Ty<'a>>,
  scopes: ScopeStack<'a>,
  cur_class: Option<&'a ClassDef<'a>>,
  alloc: &'a TypeCkAlloc<'a>,
}

impl<'a> TypeCk<'a> {
  // resolve a source type denotation; an unknown class name reports NoSuchClass and yields Ty::Error,
  // so the malformed declaration itself stays quiet in later checks
  fn ty(&mut self, s: &SynTy<'a>) -> Ty<'a> {
    match &s.kind {
      SynTyKind::Int => Ty::Int,
      SynTyKind::Bool => Ty::Bool,
      SynTyKind::IntArray => Ty::IntArray,
      SynTyKind::Named(name) => if let Some(c) = self.scopes.lookup_class(name) {
        Ty::mk_obj(c)
      } else { self.issue(s.loc, NoSuchClass(name)) },
    }
  }

  // the conservative recovery type: an object of the root class
  fn object_ty(&self) -> Ty<'a> { Ty::mk_obj(self.scopes.object()) }
}

impl<'a> Deref for TypeCk<'a> {
  type Target = Errors<'a, Ty<'a>>;
  fn deref(&self) -> &Self::Target { &self.errors }
}

impl<'a> DerefMut for TypeCk<'a> {
  fn deref_mut(&mut self) -> &mut Self::Target { &mut self.errors }
}

trait TypeCkTrait<'a> {
  fn scoped<F: FnMut(&mut Self) -> R, R>(&mut self, s: ScopeOwner<'a>, f: F) -> R;
}

impl<'a, T: DerefMut<Target = TypeCk<'a>>> TypeCkTrait<'a> for T {
  fn scoped<F: FnMut(&mut Self) -> R, R>(&mut self, s: ScopeOwner<'a>, mut f: F) -> R {
    self.deref_mut().scopes.open(s);
    let ret = f(self);
    self.deref_mut().scopes.close();
    ret
  }
}
