use crate::{*, lexer::{Token, TokenKind, lex}};
use common::{Loc, Errors, ErrorKind, BinOp, UnOp};

pub fn work<'a>(code: &'a str, alloc: &'a ASTAlloc<'a>) -> Result<&'a Program<'a>, Errors<'a, Ty<'a>>> {
  let mut errors = Errors::default();
  let tokens = lex(code, &mut errors);
  let mut p = Parser { tokens, idx: 0, alloc, errors };
  match p.program() {
    Ok(pr) if p.errors.0.is_empty() => Ok(pr),
    _ => Err(p.errors.sorted()),
  }
}

// the parser bails out on the first syntax error, Err(()) just unwinds to `work`
// (the error itself is already recorded in `errors`)
type Parsed<T> = Result<T, ()>;

struct Parser<'a> {
  tokens: Vec<Token<'a>>,
  idx: usize,
  alloc: &'a ASTAlloc<'a>,
  errors: Errors<'a, Ty<'a>>,
}

impl<'a> Parser<'a> {
  // the token stream always ends with Eof, and Eof is never consumed, so indexing is in range
  fn cur(&self) -> Token<'a> { self.tokens[self.idx] }

  fn nth(&self, n: usize) -> Token<'a> {
    self.tokens[(self.idx + n).min(self.tokens.len() - 1)]
  }

  fn bump(&mut self) -> Token<'a> {
    let t = self.cur();
    if t.kind != TokenKind::Eof { self.idx += 1; }
    t
  }

  fn at(&self, kind: TokenKind) -> bool { self.cur().kind == kind }

  fn eat(&mut self, kind: TokenKind) -> bool {
    if self.at(kind) { self.idx += 1; true } else { false }
  }

  fn expect(&mut self, kind: TokenKind<'a>, expect: &'static str) -> Parsed<Token<'a>> {
    if self.at(kind) { Ok(self.bump()) } else { self.fail(expect) }
  }

  fn fail<T>(&mut self, expect: &'static str) -> Parsed<T> {
    let t = self.cur();
    self.errors.issue::<()>(t.loc, ErrorKind::SyntaxError { expect, found: t.kind.text() });
    Err(())
  }

  fn ident(&mut self, expect: &'static str) -> Parsed<(&'a str, Loc)> {
    match self.cur() {
      Token { loc, kind: TokenKind::Id(name) } => { self.idx += 1; Ok((name, loc)) }
      _ => self.fail(expect),
    }
  }

  // match an identifier with a fixed spelling, e.g. the `out` in System.out.println
  fn spelled(&mut self, spelling: &'static str, expect: &'static str) -> Parsed<Loc> {
    let (name, loc) = self.ident(expect)?;
    if name == spelling { Ok(loc) } else {
      self.errors.issue::<()>(loc, ErrorKind::SyntaxError { expect, found: name });
      Err(())
    }
  }
}

impl<'a> Parser<'a> {
  fn program(&mut self) -> Parsed<&'a Program<'a>> {
    let main = self.main_class()?;
    let mut class = vec![];
    while !self.at(TokenKind::Eof) { class.push(self.class_def()?); }
    Ok(&*self.alloc.program.alloc(Program { main, class, scope: dft(), object: dft() }))
  }

  fn main_class(&mut self) -> Parsed<MainDef<'a>> {
    use TokenKind::*;
    let loc = self.expect(Class, "'class'")?.loc;
    let (name, _) = self.ident("a class name")?;
    self.expect(LBrace, "'{'")?;
    self.expect(Public, "'public'")?;
    self.expect(Static, "'static'")?;
    self.expect(Void, "'void'")?;
    self.spelled(common::MAIN_METHOD, "'main'")?;
    self.expect(LParen, "'('")?;
    self.spelled("String", "'String'")?;
    self.expect(LBracket, "'['")?;
    self.expect(RBracket, "']'")?;
    let (arg, _) = self.ident("a parameter name")?;
    self.expect(RParen, "')'")?;
    self.expect(LBrace, "'{'")?;
    let body = self.stmt()?;
    self.expect(RBrace, "'}'")?;
    self.expect(RBrace, "'}'")?;
    let class = &*self.alloc.class.alloc(ClassDef {
      loc, name, parent: None, field: vec![], method: vec![], parent_ref: dft(), scope: dft(),
    });
    Ok(MainDef { loc, name, arg, body, class })
  }

  fn class_def(&mut self) -> Parsed<&'a ClassDef<'a>> {
    use TokenKind::*;
    let loc = self.expect(Class, "'class'")?.loc;
    let (name, _) = self.ident("a class name")?;
    let parent = if self.eat(Extends) { Some(self.ident("a class name")?.0) } else { None };
    self.expect(LBrace, "'{'")?;
    let (mut field, mut method) = (vec![], vec![]);
    while !self.eat(RBrace) {
      if self.at(Public) { method.push(self.method_def()?); } else { field.push(self.var_def()?); }
    }
    Ok(&*self.alloc.class.alloc(ClassDef { loc, name, parent, field, method, parent_ref: dft(), scope: dft() }))
  }

  fn method_def(&mut self) -> Parsed<&'a MethodDef<'a>> {
    use TokenKind::*;
    let loc = self.expect(Public, "'public'")?.loc;
    let ret = self.ty()?;
    let (name, _) = self.ident("a method name")?;
    self.expect(LParen, "'('")?;
    let mut param = vec![];
    if !self.at(RParen) {
      loop {
        let syn_ty = self.ty()?;
        let (name, loc) = self.ident("a parameter name")?;
        param.push(&*self.alloc.var.alloc(VarDef { loc, name, syn_ty, ty: dft(), owner: dft() }));
        if !self.eat(Comma) { break; }
      }
    }
    self.expect(RParen, "')'")?;
    self.expect(LBrace, "'{'")?;
    // locals first, then statements; `Id Id` starts a declaration, a lone `Id` starts a statement
    let mut local = vec![];
    loop {
      let decl = match (self.cur().kind, self.nth(1).kind) {
        (Int, _) | (Boolean, _) => true,
        (Id(_), Id(_)) => true,
        _ => false,
      };
      if !decl { break; }
      local.push(self.var_def()?);
    }
    let mut body = vec![];
    while !self.at(Return) { body.push(self.stmt()?); }
    self.expect(Return, "'return'")?;
    let ret_expr = self.expr()?;
    self.expect(Semi, "';'")?;
    self.expect(RBrace, "'}'")?;
    Ok(&*self.alloc.method.alloc(MethodDef {
      loc, name, ret, param, local, body, ret_expr, ret_ty: dft(), class: dft(), scope: dft(),
    }))
  }

  fn var_def(&mut self) -> Parsed<&'a VarDef<'a>> {
    let syn_ty = self.ty()?;
    let (name, loc) = self.ident("a variable name")?;
    self.expect(TokenKind::Semi, "';'")?;
    Ok(&*self.alloc.var.alloc(VarDef { loc, name, syn_ty, ty: dft(), owner: dft() }))
  }

  fn ty(&mut self) -> Parsed<SynTy<'a>> {
    use TokenKind::*;
    let t = self.cur();
    let kind = match t.kind {
      Int => {
        self.idx += 1;
        if self.eat(LBracket) {
          self.expect(RBracket, "']'")?;
          SynTyKind::IntArray
        } else { SynTyKind::Int }
      }
      Boolean => { self.idx += 1; SynTyKind::Bool }
      Id(name) => { self.idx += 1; SynTyKind::Named(name) }
      _ => return self.fail("a type"),
    };
    Ok(SynTy { loc: t.loc, kind })
  }

  fn stmt(&mut self) -> Parsed<Stmt<'a>> {
    use TokenKind::*;
    let loc = self.cur().loc;
    match self.cur().kind {
      LBrace => {
        self.idx += 1;
        let mut stmt = vec![];
        while !self.eat(RBrace) { stmt.push(self.stmt()?); }
        Ok(mk_stmt(loc, Block { loc, stmt }.into()))
      }
      If => {
        self.idx += 1;
        self.expect(LParen, "'('")?;
        let cond = self.expr()?;
        self.expect(RParen, "')'")?;
        let on_true = self.stmt()?;
        self.expect(Else, "'else'")?;
        let on_false = self.stmt()?;
        Ok(mk_stmt(loc, Box::new(crate::If { cond, on_true, on_false }).into()))
      }
      While => {
        self.idx += 1;
        self.expect(LParen, "'('")?;
        let cond = self.expr()?;
        self.expect(RParen, "')'")?;
        let body = Box::new(self.stmt()?);
        Ok(mk_stmt(loc, crate::While { cond, body }.into()))
      }
      Do => {
        self.idx += 1;
        let body = Box::new(self.stmt()?);
        self.expect(While, "'while'")?;
        self.expect(LParen, "'('")?;
        let cond = self.expr()?;
        self.expect(RParen, "')'")?;
        self.expect(Semi, "';'")?;
        Ok(mk_stmt(loc, DoWhile { body, cond }.into()))
      }
      Id("System") => {
        self.idx += 1;
        self.expect(Dot, "'.'")?;
        self.spelled("out", "'out'")?;
        self.expect(Dot, "'.'")?;
        self.spelled("println", "'println'")?;
        self.expect(LParen, "'('")?;
        let arg = self.expr()?;
        self.expect(RParen, "')'")?;
        self.expect(Semi, "';'")?;
        Ok(mk_stmt(loc, StmtKind::Print(arg)))
      }
      Id(dst) => {
        self.idx += 1;
        if self.eat(LBracket) {
          let idx = self.expr()?;
          self.expect(RBracket, "']'")?;
          self.expect(Assign, "'='")?;
          let src = self.expr()?;
          self.expect(Semi, "';'")?;
          Ok(mk_stmt(loc, ArrayAssign { dst, idx, src, var: dft() }.into()))
        } else {
          self.expect(Assign, "'='")?;
          let src = self.expr()?;
          self.expect(Semi, "';'")?;
          Ok(mk_stmt(loc, crate::Assign { dst, src, var: dft() }.into()))
        }
      }
      _ => self.fail("a statement"),
    }
  }

  // precedence: && < `<` < +- < * < ! < postfix < primary
  fn expr(&mut self) -> Parsed<Expr<'a>> {
    let mut l = self.cmp_expr()?;
    while self.at(TokenKind::AndAnd) {
      let loc = self.bump().loc;
      let r = self.cmp_expr()?;
      l = mk_expr(loc, Binary { op: BinOp::And, l: Box::new(l), r: Box::new(r) }.into());
    }
    Ok(l)
  }

  fn cmp_expr(&mut self) -> Parsed<Expr<'a>> {
    let mut l = self.add_expr()?;
    while self.at(TokenKind::Lt) {
      let loc = self.bump().loc;
      let r = self.add_expr()?;
      l = mk_expr(loc, Binary { op: BinOp::Lt, l: Box::new(l), r: Box::new(r) }.into());
    }
    Ok(l)
  }

  fn add_expr(&mut self) -> Parsed<Expr<'a>> {
    let mut l = self.mul_expr()?;
    loop {
      let op = match self.cur().kind {
        TokenKind::Add => BinOp::Add,
        TokenKind::Sub => BinOp::Sub,
        _ => break,
      };
      let loc = self.bump().loc;
      let r = self.mul_expr()?;
      l = mk_expr(loc, Binary { op, l: Box::new(l), r: Box::new(r) }.into());
    }
    Ok(l)
  }

  fn mul_expr(&mut self) -> Parsed<Expr<'a>> {
    let mut l = self.unary_expr()?;
    while self.at(TokenKind::Mul) {
      let loc = self.bump().loc;
      let r = self.unary_expr()?;
      l = mk_expr(loc, Binary { op: BinOp::Mul, l: Box::new(l), r: Box::new(r) }.into());
    }
    Ok(l)
  }

  fn unary_expr(&mut self) -> Parsed<Expr<'a>> {
    if self.at(TokenKind::Not) {
      let loc = self.bump().loc;
      let r = self.unary_expr()?;
      Ok(mk_expr(loc, Unary { op: UnOp::Not, r: Box::new(r) }.into()))
    } else { self.postfix_expr() }
  }

  fn postfix_expr(&mut self) -> Parsed<Expr<'a>> {
    use TokenKind::*;
    let mut e = self.primary_expr()?;
    loop {
      if self.eat(LBracket) {
        let loc = e.loc;
        let idx = self.expr()?;
        self.expect(RBracket, "']'")?;
        e = mk_expr(loc, IndexSel { arr: Box::new(e), idx: Box::new(idx) }.into());
      } else if self.eat(Dot) {
        let (name, loc) = self.ident("a method name or 'length'")?;
        if self.eat(LParen) {
          let mut arg = vec![];
          if !self.at(RParen) {
            loop {
              arg.push(self.expr()?);
              if !self.eat(Comma) { break; }
            }
          }
          self.expect(RParen, "')'")?;
          e = mk_expr(loc, Call { owner: Box::new(e), name, arg, class: dft(), method: dft() }.into());
        } else if name == "length" {
          e = mk_expr(loc, crate::Length { arr: Box::new(e) }.into());
        } else {
          return self.fail("'(' (only methods and 'length' follow '.')");
        }
      } else { break Ok(e); }
    }
  }

  fn primary_expr(&mut self) -> Parsed<Expr<'a>> {
    use TokenKind::*;
    let t = self.cur();
    match t.kind {
      IntLit(s) => { self.idx += 1; Ok(mk_int_lit(t.loc, s, &mut self.errors)) }
      True => { self.idx += 1; Ok(mk_expr(t.loc, true.into())) }
      False => { self.idx += 1; Ok(mk_expr(t.loc, false.into())) }
      This => { self.idx += 1; Ok(mk_expr(t.loc, crate::This.into())) }
      Id(name) => { self.idx += 1; Ok(mk_expr(t.loc, VarSel { name, var: dft() }.into())) }
      New => {
        self.idx += 1;
        if self.eat(Int) {
          self.expect(LBracket, "'['")?;
          let len = self.expr()?;
          self.expect(RBracket, "']'")?;
          Ok(mk_expr(t.loc, NewArray { len: Box::new(len) }.into()))
        } else {
          let (name, _) = self.ident("a class name")?;
          self.expect(LParen, "'('")?;
          self.expect(RParen, "')'")?;
          Ok(mk_expr(t.loc, NewClass { name, class: dft() }.into()))
        }
      }
      LParen => {
        self.idx += 1;
        let e = self.expr()?;
        self.expect(RParen, "')'")?;
        // grouping is a pure passthrough, the inner expression keeps its own loc
        Ok(e)
      }
      _ => self.fail("an expression"),
    }
  }
}
