mod info;

use syntax::{ast::*, ScopeOwner};
use tac::{Tac::{self, *}, Reg::{self, *}, BinKind, TacBlock, TacProgram};
use common::{Ref, IndexMap, HashMap, INIT_FUNC, MAIN_FUNC};
use crate::info::*;

#[derive(Default)]
struct TacGen<'a> {
  // both counters are reset at the beginning of every block; r0 stays reserved
  reg_num: u32,
  label_num: u32,
  // `*_info` work like extra fields on ast nodes, their meaning is documented in info.rs
  var_info: HashMap<Ref<'a, VarDef<'a>>, VarInfo>,
  method_info: HashMap<Ref<'a, MethodDef<'a>>, MethodInfo>,
  class_info: HashMap<Ref<'a, ClassDef<'a>>, ClassInfo<'a>>,
  // the vg carrying return values, one past the last class's method-table vg
  ret_vg: u32,
}

pub fn work<'a>(p: &'a Program<'a>) -> TacProgram {
  TacGen::default().program(p)
}

impl<'a> TacGen<'a> {
  fn program(mut self, p: &'a Program<'a>) -> TacProgram {
    // registration order fixes every layout decision: Object, the main class, then
    // auxiliary classes in source order; vg k is class k's method table
    let classes = std::iter::once(p.object.get().unwrap()).chain(std::iter::once(p.main.class))
      .chain(p.class.iter().copied()).collect::<Vec<_>>();
    for &c in &classes { self.resolve_field(c); }
    for (vg, &c) in classes.iter().enumerate() {
      self.class_info.get_mut(&Ref(c)).unwrap().vg = vg as u32;
    }
    self.ret_vg = classes.len() as u32;
    {
      // block 0 is INIT and block 1 is MAIN, method blocks follow in class order
      let mut idx = 2;
      for &c in &classes {
        for &m in &c.method {
          self.method_info.get_mut(&Ref(m)).unwrap().idx = idx;
          idx += 1;
        }
      }
    }
    let mut tp = TacProgram::default();
    tp.block.push(self.build_init(&classes));
    tp.block.push(self.build_main(p));
    for &c in &classes {
      for &m in &c.method { tp.block.push(self.build_method(c, m)); }
    }
    tp
  }

  // INIT allocates every class's method table, fills the slots with function
  // addresses, and publishes the table heads through the vg globals
  fn build_init(&mut self, classes: &[&'a ClassDef<'a>]) -> TacBlock {
    self.reset();
    let mut f = TacBlock::new(INIT_FUNC.to_owned());
    for &c in classes {
      let (vg, impls) = {
        let ci = &self.class_info[&Ref(c)];
        (ci.vg, ci.vtbl.iter().map(|(_, &m)| self.method_info[&Ref(m)].idx).collect::<Vec<_>>())
      };
      let size = self.immed(impls.len() as i32, &mut f);
      let tbl = self.reg();
      f.push(Malloc { dst: tbl, size });
      for (slot, &idx) in impls.iter().enumerate() {
        let (fp, off) = (self.reg(), self.immed(slot as i32, &mut f));
        let addr = self.reg();
        f.push(AddrOf { dst: fp, f: idx })
          .push(Bin { op: BinKind::Offset, dst: addr, l: tbl, r: off })
          .push(Store { addr, src: fp });
      }
      f.push(Mov { dst: Vg(vg), src: tbl });
    }
    f.push(Ret);
    f
  }

  fn build_main(&mut self, p: &'a Program<'a>) -> TacBlock {
    self.reset();
    let mut f = TacBlock::new(MAIN_FUNC.to_owned());
    self.stmt(&p.main.body, &mut f);
    f.push(Ret);
    f
  }

  fn build_method(&mut self, c: &'a ClassDef<'a>, m: &'a MethodDef<'a>) -> TacBlock {
    // vl0 is `this` (always the first Param of a call), source params and locals follow in order
    for (i, v) in m.param.iter().enumerate() {
      self.var_info.insert(Ref(v), VarInfo { off: i as u32 + 1 });
    }
    for (i, v) in m.local.iter().enumerate() {
      self.var_info.insert(Ref(v), VarInfo { off: (m.param.len() + 1 + i) as u32 });
    }
    self.reset();
    let mut f = TacBlock::new(format!("{}.{}", c.name, m.name));
    for s in &m.body { self.stmt(s, &mut f); }
    let ret = self.expr(&m.ret_expr, &mut f);
    f.push(Mov { dst: Vg(self.ret_vg), src: ret });
    f.push(Ret);
    f
  }

  fn stmt(&mut self, s: &'a Stmt<'a>, f: &mut TacBlock) {
    use StmtKind::*;
    match &s.kind {
      Assign(a) => {
        let src = self.expr(&a.src, f);
        self.var_write(a.var.get().unwrap(), src, f);
      }
      ArrayAssign(a) => {
        let arr = self.var_read(a.var.get().unwrap(), f);
        let (idx, src) = (self.expr(&a.idx, f), self.expr(&a.src, f));
        let addr = self.elem_addr(arr, idx, f);
        f.push(Store { addr, src });
      }
      If(i) => {
        //   compute cond
        //   jz before_else
        //   on_true
        //   jmp after_else
        // before_else:
        //   on_false
        // after_else:
        let (before_else, after_else) = (self.label(), self.label());
        let cond = self.expr(&i.cond, f);
        f.push(Jz { cond, id: before_else });
        self.stmt(&i.on_true, f);
        f.push(Jmp { id: after_else });
        f.push(Label { id: before_else });
        self.stmt(&i.on_false, f);
        f.push(Label { id: after_else });
      }
      While(w) => {
        // before_cond:
        //   compute cond
        //   jz after_body
        //   body
        //   jmp before_cond
        // after_body:
        let (before_cond, after_body) = (self.label(), self.label());
        f.push(Label { id: before_cond });
        let cond = self.expr(&w.cond, f);
        f.push(Jz { cond, id: after_body });
        self.stmt(&w.body, f);
        f.push(Jmp { id: before_cond });
        f.push(Label { id: after_body });
      }
      DoWhile(d) => {
        // before_body:
        //   body
        //   compute cond
        //   jz after_body
        //   jmp before_body
        // after_body:
        let (before_body, after_body) = (self.label(), self.label());
        f.push(Label { id: before_body });
        self.stmt(&d.body, f);
        let cond = self.expr(&d.cond, f);
        f.push(Jz { cond, id: after_body });
        f.push(Jmp { id: before_body });
        f.push(Label { id: after_body });
      }
      Print(e) => {
        let src = self.expr(e, f);
        f.push(Write { src });
      }
      Block(b) => for s in &b.stmt { self.stmt(s, f); }
    }
  }

  // lower an expression, leaving its value in a fresh scratch register
  fn expr(&mut self, e: &'a Expr<'a>, f: &mut TacBlock) -> Reg {
    use ExprKind::*;
    match &e.kind {
      VarSel(v) => self.var_read(v.var.get().unwrap(), f),
      IndexSel(i) => {
        // no bounds check, an out-of-range index is undefined behavior
        let (arr, idx) = (self.expr(&i.arr, f), self.expr(&i.idx, f));
        let addr = self.elem_addr(arr, idx, f);
        let dst = self.reg();
        f.push(Load { dst, addr });
        dst
      }
      IntLit(n) => self.immed(*n, f),
      BoolLit(b) => self.immed(*b as i32, f),
      Call(c) => {
        let owner = self.expr(&c.owner, f);
        let args = c.arg.iter().map(|a| self.expr(a, f)).collect::<Vec<_>>();
        f.push(Param { src: owner });
        for a in args { f.push(Param { src: a }); }
        // dispatch through the method table: slot index comes from the static
        // receiver class the type checker recorded on this call
        let cl = c.class.get().unwrap();
        let slot = self.class_info[&Ref(cl)].vtbl.get_full(c.name).unwrap().0;
        let vt = self.reg();
        f.push(Load { dst: vt, addr: owner });
        let off = self.immed(slot as i32, f);
        let addr = self.reg();
        f.push(Bin { op: BinKind::Offset, dst: addr, l: vt, r: off });
        let target = self.reg();
        f.push(Load { dst: target, addr });
        f.push(Tac::Call { target });
        // grab the return value before the next call clobbers the vg
        let dst = self.reg();
        f.push(Mov { dst, src: Vg(self.ret_vg) });
        dst
      }
      Unary(u) => {
        // booleans are canonical 0/1, so !x is 1 - x
        let r = self.expr(&u.r, f);
        let one = self.immed(1, f);
        let dst = self.reg();
        f.push(Bin { op: BinKind::Sub, dst, l: one, r });
        dst
      }
      Binary(b) => {
        // both operands of && are evaluated, there is no short circuit
        let (l, r) = (self.expr(&b.l, f), self.expr(&b.r, f));
        let dst = self.reg();
        f.push(Bin { op: b.op.into(), dst, l, r });
        dst
      }
      This(_) => {
        let dst = self.reg();
        f.push(Mov { dst, src: Vl(0) });
        dst
      }
      NewClass(n) => {
        let (field_num, vg) = {
          let ci = &self.class_info[&Ref(n.class.get().unwrap())];
          (ci.field_num, ci.vg)
        };
        let size = self.immed(field_num as i32, f);
        let dst = self.reg();
        f.push(Malloc { dst, size });
        // word 0 of every object points at its class's method table;
        // the remaining words are already zeroed by the allocation
        f.push(Store { addr: dst, src: Vg(vg) });
        dst
      }
      NewArray(n) => {
        let len = self.expr(&n.len, f);
        let one = self.immed(1, f);
        let size = self.reg();
        f.push(Bin { op: BinKind::Add, dst: size, l: len, r: one });
        let dst = self.reg();
        f.push(Malloc { dst, size });
        // word 0 holds the length, elements start at word 1
        f.push(Store { addr: dst, src: len });
        dst
      }
      Length(l) => {
        let arr = self.expr(&l.arr, f);
        let dst = self.reg();
        f.push(Load { dst, addr: arr });
        dst
      }
    }
  }
}

impl<'a> TacGen<'a> {
  fn reset(&mut self) {
    self.reg_num = 1;
    self.label_num = 0;
  }

  fn reg(&mut self) -> Reg { (R(self.reg_num), self.reg_num += 1).0 }

  fn label(&mut self) -> u32 { (self.label_num, self.label_num += 1).0 }

  // load a constant into a fresh register
  fn immed(&mut self, n: i32, f: &mut TacBlock) -> Reg {
    let dst = self.reg();
    f.push(Immed { dst, n });
    dst
  }

  fn var_read(&mut self, v: &'a VarDef<'a>, f: &mut TacBlock) -> Reg {
    let off = self.var_info[&Ref(v)].off;
    match v.owner.get().unwrap() {
      ScopeOwner::Method(_) => {
        let dst = self.reg();
        f.push(Mov { dst, src: Vl(off) });
        dst
      }
      ScopeOwner::Class(_) => {
        let addr = self.field_addr(off, f);
        let dst = self.reg();
        f.push(Load { dst, addr });
        dst
      }
      ScopeOwner::Global(_) => unreachable!("variables cannot be declared in the global scope"),
    }
  }

  fn var_write(&mut self, v: &'a VarDef<'a>, src: Reg, f: &mut TacBlock) {
    let off = self.var_info[&Ref(v)].off;
    match v.owner.get().unwrap() {
      ScopeOwner::Method(_) => { f.push(Mov { dst: Vl(off), src }); }
      ScopeOwner::Class(_) => {
        let addr = self.field_addr(off, f);
        f.push(Store { addr, src });
      }
      ScopeOwner::Global(_) => unreachable!("variables cannot be declared in the global scope"),
    }
  }

  // address of a field of `this`; `this` is always vl0
  fn field_addr(&mut self, off: u32, f: &mut TacBlock) -> Reg {
    let n = self.immed(off as i32, f);
    let addr = self.reg();
    f.push(Bin { op: BinKind::Offset, dst: addr, l: Vl(0), r: n });
    addr
  }

  // address of element `idx`; element i sits at word i + 1, word 0 being the length
  fn elem_addr(&mut self, arr: Reg, idx: Reg, f: &mut TacBlock) -> Reg {
    let one = self.immed(1, f);
    let i1 = self.reg();
    f.push(Bin { op: BinKind::Add, dst: i1, l: idx, r: one });
    let addr = self.reg();
    f.push(Bin { op: BinKind::Offset, dst: addr, l: arr, r: i1 });
    addr
  }

  // all methods (inherited, overriding and new) get a slot view via the class's vtbl;
  // field offsets start at 1 to leave room for the method-table header word
  fn resolve_field(&mut self, c: &'a ClassDef<'a>) {
    if !self.class_info.contains_key(&Ref(c)) {
      let (mut field_num, mut vtbl) = if let Some(p) = c.parent_ref.get() {
        self.resolve_field(p);
        let p = &self.class_info[&Ref(p)];
        (p.field_num, p.vtbl.clone())
      } else { (1, IndexMap::default()) };
      for &m in &c.method {
        if let Some(slot) = vtbl.get_mut(m.name) {
          *slot = m; // an override replaces the implementation but keeps the slot
        } else {
          vtbl.insert(m.name, m);
        }
        self.method_info.insert(Ref(m), MethodInfo { idx: 0 });
      }
      for &v in &c.field {
        self.var_info.insert(Ref(v), VarInfo { off: field_num });
        field_num += 1;
      }
      self.class_info.insert(Ref(c), ClassInfo { field_num, vg: 0, vtbl });
    }
  }
}
