use crate::{TypeCk, TypeCkTrait};
use common::{ErrorKind::*, Ref, NO_LOC, OBJECT, HashMap, HashSet};
use syntax::{ast::*, ScopeOwner, Symbol};
use std::cell::{Cell, RefCell};
use hashbrown::hash_map::Entry;

pub(crate) struct SymbolPass<'a>(pub TypeCk<'a>);

// some boilerplate code...
impl<'a> std::ops::Deref for SymbolPass<'a> {
  type Target = TypeCk<'a>;
  fn deref(&self) -> &Self::Target { &self.0 }
}

impl<'a> std::ops::DerefMut for SymbolPass<'a> {
  fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}

impl<'a> SymbolPass<'a> {
  pub fn program(&mut self, p: &'a Program<'a>) {
    // pass 1: register every class name, so that all forward references below resolve;
    // the root comes first, then the main class, then auxiliary classes in source order
    let object = &*self.alloc.class.alloc(ClassDef {
      loc: NO_LOC, name: OBJECT, parent: None, field: vec![], method: vec![],
      parent_ref: Cell::new(None), scope: RefCell::default(),
    });
    p.object.set(Some(object));
    self.scopes.declare(Symbol::Class(object));
    for c in std::iter::once(p.main.class).chain(p.class.iter().copied()) {
      if let Some(prev) = self.scopes.lookup_class(c.name) {
        self.issue(c.loc, ConflictDeclaration { prev: prev.loc, name: c.name })
      } else {
        self.scopes.declare(Symbol::Class(c));
      }
    }
    // pass 2: resolve extends clauses, then reject inheritance cycles
    for c in &p.class {
      if let Some(parent) = c.parent {
        c.parent_ref.set(self.scopes.lookup_class(parent));
        if c.parent_ref.get().is_none() { self.issue(c.loc, NoSuchClass(parent)) }
      }
    }
    let mut vis = HashMap::new();
    for (idx, c) in p.class.iter().enumerate() {
      let mut c = *c;
      let mut last = c; // this assignment is useless, the value never comes from it when used
      loop {
        match vis.entry(Ref(c)) {
          Entry::Vacant(v) => {
            v.insert(idx);
            if let Some(p) = c.parent_ref.get() { (last = c, c = p); } else { break; }
          }
          Entry::Occupied(o) => {
            if *o.get() == idx { self.issue(last.loc, CyclicInheritance) }
            break;
          }
        }
      }
    }
    // class-level errors are fatal, member resolution assumes an intact class table
    if !self.errors.0.is_empty() { return; }
    let mut checked = HashSet::new();
    for c in &p.class { self.class_def(c, &mut checked); }
    // the main class has no members of its own, there is nothing left to resolve for it
  }

  fn class_def(&mut self, c: &'a ClassDef<'a>, checked: &mut HashSet<Ref<'a, ClassDef<'a>>>) {
    // parents first, their members must be resolved before override checks on ours
    if !checked.insert(Ref(c)) { return; }
    if let Some(p) = c.parent_ref.get() { self.class_def(p, checked); }
    self.cur_class = Some(c);
    self.scoped(ScopeOwner::Class(c), |s| {
      for v in &c.field { s.var_def(v); }
      for m in &c.method { s.method_def(m); }
    });
  }

  fn method_def(&mut self, m: &'a MethodDef<'a>) {
    m.ret_ty.set(self.ty(&m.ret));
    m.class.set(self.cur_class);
    self.scoped(ScopeOwner::Method(m), |s| {
      for v in &m.param { s.var_def(v); }
      for v in &m.local { s.var_def(v); }
    });
    let ok = if let Some((sym, owner)) = self.scopes.lookup(m.name) {
      match (self.scopes.cur_owner(), owner) {
        // a method may share its name with a class
        (_, ScopeOwner::Global(_)) => true,
        (ScopeOwner::Class(c), ScopeOwner::Class(p)) if Ref(c) != Ref(p) => match sym {
          Symbol::Method(pm) => {
            // an override must take exactly the same parameters and return something compatible
            let sig_ok = pm.param.len() == m.param.len()
              && m.param.iter().zip(pm.param.iter()).all(|(a, b)| a.ty.get() == b.ty.get())
              && m.ret_ty.get().assignable_to(pm.ret_ty.get());
            if sig_ok { true } else { self.issue(m.loc, OverrideMismatch { method: m.name, parent: p.name }) }
          }
          _ => self.issue(m.loc, ConflictDeclaration { prev: sym.loc(), name: m.name }),
        }
        _ => self.issue(m.loc, ConflictDeclaration { prev: sym.loc(), name: m.name }),
      }
    } else { true };
    if ok { self.scopes.declare(Symbol::Method(m)); }
  }

  fn var_def(&mut self, v: &'a VarDef<'a>) {
    v.ty.set(self.ty(&v.syn_ty));
    let ok = if let Some((sym, owner)) = self.scopes.lookup(v.name) {
      match (self.scopes.cur_owner(), owner) {
        // a field may not redeclare an inherited field
        (ScopeOwner::Class(c1), ScopeOwner::Class(c2)) if Ref(c1) != Ref(c2) && sym.is_var() =>
          self.issue(v.loc, OverrideVar(v.name)),
        (ScopeOwner::Class(c1), ScopeOwner::Class(c2)) if Ref(c1) != Ref(c2) =>
          self.issue(v.loc, ConflictDeclaration { prev: sym.loc(), name: v.name }),
        // duplicates in the same class scope, or among params/locals of one method
        (ScopeOwner::Class(_), ScopeOwner::Class(_)) | (_, ScopeOwner::Method(_)) =>
          self.issue(v.loc, ConflictDeclaration { prev: sym.loc(), name: v.name }),
        // params/locals may shadow a field, anything may shadow a class name
        _ => true,
      }
    } else { true };
    if ok {
      v.owner.set(Some(self.scopes.cur_owner()));
      self.scopes.declare(Symbol::Var(v));
    }
  }
}
