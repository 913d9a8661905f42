use crate::ClassDef;
use common::{Loc, Ref};
use std::fmt;

// a type as it is spelled in the source, before class names are resolved
#[derive(Eq, PartialEq)]
pub enum SynTyKind<'a> {
  Int,
  Bool,
  IntArray,
  Named(&'a str),
}

#[derive(Eq, PartialEq)]
pub struct SynTy<'a> {
  pub loc: Loc,
  pub kind: SynTyKind<'a>,
}

// a resolved type; `Error` marks both "not yet computed" and "declared with an unknown class",
// and is assignable in both directions so that one bad declaration doesn't cascade
#[derive(Clone, Copy, Eq, PartialEq)]
pub enum Ty<'a> {
  Int,
  Bool,
  IntArray,
  Error,
  Object(Ref<'a, ClassDef<'a>>),
}

impl Default for Ty<'_> {
  fn default() -> Self { Ty::Error }
}

impl<'a> Ty<'a> {
  // the directional compatibility relation: can a value of `self` flow into a slot of `rhs`?
  pub fn assignable_to(&self, rhs: Ty<'a>) -> bool {
    match (*self, rhs) {
      (Ty::Error, _) | (_, Ty::Error) => true,
      (Ty::Int, Ty::Int) | (Ty::Bool, Ty::Bool) | (Ty::IntArray, Ty::IntArray) => true,
      (Ty::Object(c1), Ty::Object(Ref(c2))) => c1.extends(c2),
      _ => false,
    }
  }

  pub fn mk_obj(c: &'a ClassDef<'a>) -> Ty<'a> { Ty::Object(Ref(c)) }

  pub fn is_object(&self) -> bool { if let Ty::Object(_) = self { true } else { false } }
}

impl fmt::Debug for Ty<'_> {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match self {
      Ty::Int => write!(f, "int"),
      Ty::Bool => write!(f, "boolean"),
      Ty::IntArray => write!(f, "int[]"),
      Ty::Error => write!(f, "error"), // never reached when printing a well-formed program
      Ty::Object(c) => write!(f, "class {}", c.name),
    }
  }
}

// render a method signature like "(int, boolean) => int", shared by Symbol's Debug and errors
pub fn show_method_ty<'a>(param: impl Iterator<Item = Ty<'a>>, ret: Ty, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
  write!(f, "(")?;
  for (i, p) in param.enumerate() {
    if i != 0 { write!(f, ", ")?; }
    write!(f, "{:?}", p)?;
  }
  write!(f, ") => {:?}", ret)
}

#[cfg(test)]
mod tests {
  use super::*;
  use common::NO_LOC;
  use std::cell::{Cell, RefCell};

  fn class(name: &str) -> ClassDef {
    ClassDef {
      loc: NO_LOC, name, parent: None, field: vec![], method: vec![],
      parent_ref: Cell::new(None), scope: RefCell::default(),
    }
  }

  #[test]
  fn assignability_follows_the_inheritance_chain() {
    // self-referential ClassDef is invariant over its own lifetime; never dropping
    // it (it would otherwise need to drop its scope map while still borrowed) sidesteps dropck
    let (a, b, c) = (std::mem::ManuallyDrop::new(class("A")),
      std::mem::ManuallyDrop::new(class("B")), std::mem::ManuallyDrop::new(class("C")));
    b.parent_ref.set(Some(&a));
    c.parent_ref.set(Some(&b));
    let (ta, tb, tc) = (Ty::mk_obj(&a), Ty::mk_obj(&b), Ty::mk_obj(&c));
    // reflexive, transitive up the chain, never commutative between distinct classes
    assert!(ta.assignable_to(ta));
    assert!(tb.assignable_to(ta));
    assert!(tc.assignable_to(ta));
    assert!(!ta.assignable_to(tb));
    assert!(!tb.assignable_to(tc));
    assert!(Ty::Int.assignable_to(Ty::Int));
    assert!(!Ty::Int.assignable_to(Ty::Bool));
    assert!(!Ty::IntArray.assignable_to(Ty::Int));
    // the error type stays quiet in both directions
    assert!(Ty::Error.assignable_to(tb));
    assert!(tb.assignable_to(Ty::Error));
  }
}
