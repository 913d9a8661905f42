use crate::{ClassDef, MethodDef, VarDef, Program, show_method_ty};
use common::{Loc, HashMap, Ref};
// common::Ref (pointer identity) is wanted unqualified below, so the cell guard gets the alias
use std::{cell::{RefMut, Ref as CellRef}, fmt};

pub type Scope<'a> = HashMap<&'a str, Symbol<'a>>;

#[derive(Copy, Clone)]
pub enum Symbol<'a> {
  Var(&'a VarDef<'a>),
  Method(&'a MethodDef<'a>),
  Class(&'a ClassDef<'a>),
}

impl<'a> Symbol<'a> {
  pub fn name(&self) -> &'a str {
    match self {
      Symbol::Var(v) => v.name,
      Symbol::Method(m) => m.name,
      Symbol::Class(c) => c.name,
    }
  }

  pub fn loc(&self) -> Loc {
    match self {
      Symbol::Var(v) => v.loc,
      Symbol::Method(m) => m.loc,
      Symbol::Class(c) => c.loc,
    }
  }

  pub fn is_var(&self) -> bool { if let Symbol::Var(_) = self { true } else { false } }
  pub fn is_method(&self) -> bool { if let Symbol::Method(_) = self { true } else { false } }
  pub fn is_class(&self) -> bool { if let Symbol::Class(_) = self { true } else { false } }
}

#[derive(Copy, Clone)]
pub enum ScopeOwner<'a> {
  Global(&'a Program<'a>),
  Class(&'a ClassDef<'a>),
  Method(&'a MethodDef<'a>),
}

impl<'a> ScopeOwner<'a> {
  // boilerplate code...
  pub fn scope(&self) -> CellRef<'a, Scope<'a>> {
    use ScopeOwner::*;
    match self { Global(x) => x.scope.borrow(), Class(x) => x.scope.borrow(), Method(x) => x.scope.borrow() }
  }

  pub fn scope_mut(&self) -> RefMut<'a, Scope<'a>> {
    use ScopeOwner::*;
    match self { Global(x) => x.scope.borrow_mut(), Class(x) => x.scope.borrow_mut(), Method(x) => x.scope.borrow_mut() }
  }

  pub fn is_global(&self) -> bool { if let ScopeOwner::Global(_) = self { true } else { false } }
  pub fn is_class(&self) -> bool { if let ScopeOwner::Class(_) = self { true } else { false } }
  pub fn is_method(&self) -> bool { if let ScopeOwner::Method(_) = self { true } else { false } }
}

impl fmt::Debug for Symbol<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match self {
      Symbol::Var(v) => {
        // parameters get an "@" prefix in scope dumps
        let param = if let Some(ScopeOwner::Method(m)) = v.owner.get() {
          m.param.iter().any(|p| Ref(*p) == Ref(*v))
        } else { false };
        write!(f, "{:?} -> variable {}{} : {:?}", v.loc, if param { "@" } else { "" }, v.name, v.ty.get())
      }
      Symbol::Method(m) => {
        write!(f, "{:?} -> method {} : ", m.loc, m.name)?;
        show_method_ty(m.param.iter().map(|v| v.ty.get()), m.ret_ty.get(), f)
      }
      Symbol::Class(c) => {
        write!(f, "{:?} -> class {}", c.loc, c.name)?;
        if let Some(p) = c.parent_ref.get() { write!(f, " : {}", p.name) } else { Ok(()) }
      }
    }
  }
}
