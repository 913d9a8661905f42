use crate::loc::{Loc, NO_LOC};
use std::fmt;

pub struct Error<'a, Ty>(pub Loc, pub ErrorKind<'a, Ty>);

// Errors implements Debug, it prints the collected errors line by line
pub struct Errors<'a, Ty>(pub Vec<Error<'a, Ty>>);

impl<Ty> Default for Errors<'_, Ty> {
  fn default() -> Self { Self(vec![]) }
}

impl<'a, Ty> Errors<'a, Ty> {
  // issuing an error is almost always followed by returning a recovery value,
  // and in most cases that value is the type's default, so fold the two into one call
  pub fn issue<T: Default>(&mut self, loc: Loc, e: ErrorKind<'a, Ty>) -> T {
    self.0.push(Error(loc, e));
    Default::default()
  }

  pub fn sorted(mut self) -> Self {
    self.0.sort_unstable_by_key(|e| e.0);
    self
  }
}

impl<Ty: fmt::Debug> fmt::Debug for Error<'_, Ty> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.0 {
      NO_LOC => write!(f, "*** Error: {:?}", self.1),
      loc => write!(f, "*** Error at {:?}: {:?}", loc, self.1),
    }
  }
}

pub enum ErrorKind<'a, Ty> {
  IntTooLarge(&'a str),
  UnrecognizedChar(char),
  SyntaxError { expect: &'static str, found: &'a str },
  ConflictDeclaration { prev: Loc, name: &'a str },
  NoSuchClass(&'a str),
  CyclicInheritance,
  OverrideVar(&'a str),
  OverrideMismatch { method: &'a str, parent: &'a str },
  UndeclaredVar(&'a str),
  NotObject(Ty),
  NoSuchMethod { name: &'a str, owner: Ty },
  ArgcMismatch { name: &'a str, expect: u32, actual: u32 },
  ArgMismatch { loc: u32, arg: Ty, param: Ty },
  TestNotBool { stmt: &'static str, actual: Ty },
  PrintNotInt(Ty),
  AssignMismatch { l: Ty, r: Ty },
  ElementNotInt(Ty),
  IndexNotArray(Ty),
  IndexNotInt(Ty),
  LengthNotArray(Ty),
  NewArrayNotInt(Ty),
  IncompatibleUnary { op: &'static str, r: Ty },
  IncompatibleBinary { l: Ty, op: &'static str, r: Ty },
  ReturnMismatch { method: String, expect: Ty, actual: Ty },
}

impl<Ty: fmt::Debug> fmt::Debug for ErrorKind<'_, Ty> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    use ErrorKind::*;
    match self {
      IntTooLarge(s) => write!(f, "integer literal {} is too large", s),
      UnrecognizedChar(ch) => write!(f, "unrecognized character '{}'", ch),
      SyntaxError { expect, found } => write!(f, "syntax error, expected {}, found '{}'", expect, found),
      ConflictDeclaration { prev, name } => write!(f, "declaration of '{}' here conflicts with earlier declaration at {:?}", name, prev),
      NoSuchClass(name) => write!(f, "class '{}' not found", name),
      CyclicInheritance => write!(f, "illegal class inheritance (should be acyclic)"),
      OverrideVar(name) => write!(f, "field '{}' overrides an inherited field, which is not allowed", name),
      OverrideMismatch { method, parent } => write!(f, "overriding method '{}' doesn't match the signature in class '{}'", method, parent),
      UndeclaredVar(name) => write!(f, "undeclared variable: {}", name),
      NotObject(ty) => write!(f, "expected object type for method call; actual type: {:?}", ty),
      NoSuchMethod { name, owner } => write!(f, "{:?} has no matching method: {}", owner, name),
      ArgcMismatch { name, expect, actual } => write!(f, "method '{}' has {} parameter(s); method call has {} argument(s)", name, expect, actual),
      ArgMismatch { loc, arg, param } => write!(f, "argument {} of type {:?} incompatible with parameter of type {:?}", loc, arg, param),
      TestNotBool { stmt, actual } => write!(f, "expected condition of {} statement to be boolean; actual type: {:?}", stmt, actual),
      PrintNotInt(ty) => write!(f, "expected argument of println to be int; actual type: {:?}", ty),
      AssignMismatch { l, r } => write!(f, "assignment of value of type {:?} to variable of incompatible type {:?}", r, l),
      ElementNotInt(ty) => write!(f, "expected int to be assigned to int array element; actual type: {:?}", ty),
      IndexNotArray(ty) => write!(f, "expected target of array index to be int[]; actual type: {:?}", ty),
      IndexNotInt(ty) => write!(f, "expected array index to be int; actual type: {:?}", ty),
      LengthNotArray(ty) => write!(f, "expected length to be applied to expression of type int[]; actual type: {:?}", ty),
      NewArrayNotInt(ty) => write!(f, "expected int for new array size; actual type: {:?}", ty),
      IncompatibleUnary { op, r } => write!(f, "incompatible operand: {} {:?}", op, r),
      IncompatibleBinary { l, op, r } => write!(f, "incompatible operands: {:?} {} {:?}", l, op, r),
      ReturnMismatch { method, expect, actual } => write!(f, "return type of {} expected to be compatible with {:?}; actual type: {:?}", method, expect, actual),
    }
  }
}

impl<Ty: fmt::Debug> fmt::Debug for Errors<'_, Ty> {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    for e in &self.0 { writeln!(f, "{:?}", e)? }
    Ok(())
  }
}
