use syntax::{ScopeOwner, Symbol, ClassDef, Program};

pub(crate) struct ScopeStack<'a> {
  program: &'a Program<'a>,
  stack: Vec<ScopeOwner<'a>>,
}

impl<'a> ScopeStack<'a> {
  pub fn new(p: &'a Program<'a>) -> Self {
    ScopeStack { program: p, stack: vec![ScopeOwner::Global(p)] }
  }

  pub fn lookup(&self, name: &str) -> Option<(Symbol<'a>, ScopeOwner<'a>)> {
    for owner in self.stack.iter().rev() {
      if let Some(&symbol) = owner.scope().get(name) {
        return Some((symbol, *owner));
      }
    }
    None
  }

  pub fn declare(&mut self, symbol: Symbol<'a>) {
    self.stack.last().unwrap().scope_mut().insert(symbol.name(), symbol);
  }

  // opening a class scope also opens all its ancestors below it, so a plain
  // stack walk in `lookup` sees inherited members in the right order
  pub fn open(&mut self, owner: ScopeOwner<'a>) {
    if let ScopeOwner::Class(c) = owner {
      if let Some(p) = c.parent_ref.get() {
        self.open(ScopeOwner::Class(p));
      }
    }
    self.stack.push(owner);
  }

  pub fn close(&mut self) {
    let owner = self.stack.pop().unwrap();
    if let ScopeOwner::Class(_) = owner {
      // everything left on the stack except the global bottom is an ancestor of this class
      for _ in 1..self.stack.len() { self.stack.pop(); }
    }
  }

  pub fn cur_owner(&self) -> ScopeOwner<'a> {
    *self.stack.last().unwrap()
  }

  pub fn lookup_class(&self, name: &str) -> Option<&'a ClassDef<'a>> {
    self.stack[0].scope().get(name).map(|class| match class {
      Symbol::Class(c) => *c,
      _ => unreachable!("the global scope should only contain classes"),
    })
  }

  // the injected root is registered before anything else, so it always exists after symbol_pass
  pub fn object(&self) -> &'a ClassDef<'a> {
    self.program.object.get().unwrap()
  }
}
