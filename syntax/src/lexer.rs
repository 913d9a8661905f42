use crate::Ty;
use common::{Loc, Errors, ErrorKind};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TokenKind<'a> {
  Class, Public, Static, Void, Extends, Return, Int, Boolean,
  If, Else, While, Do, New, This, True, False,
  Id(&'a str), IntLit(&'a str),
  LBrace, RBrace, LParen, RParen, LBracket, RBracket,
  Semi, Comma, Dot, Assign, AndAnd, Lt, Add, Sub, Mul, Not,
  Eof,
}

impl<'a> TokenKind<'a> {
  // the source spelling, used in syntax error messages
  pub fn text(&self) -> &'a str {
    use TokenKind::*;
    match self {
      Class => "class", Public => "public", Static => "static", Void => "void", Extends => "extends",
      Return => "return", Int => "int", Boolean => "boolean", If => "if", Else => "else", While => "while",
      Do => "do", New => "new", This => "this", True => "true", False => "false",
      Id(s) | IntLit(s) => s,
      LBrace => "{", RBrace => "}", LParen => "(", RParen => ")", LBracket => "[", RBracket => "]",
      Semi => ";", Comma => ",", Dot => ".", Assign => "=", AndAnd => "&&", Lt => "<",
      Add => "+", Sub => "-", Mul => "*", Not => "!",
      Eof => "<end of file>",
    }
  }
}

#[derive(Copy, Clone)]
pub struct Token<'a> {
  pub loc: Loc,
  pub kind: TokenKind<'a>,
}

fn keyword(s: &str) -> Option<TokenKind> {
  use TokenKind::*;
  // main/String/System/out/println/length are deliberately NOT keywords,
  // the parser matches their spelling where the grammar demands them
  match s {
    "class" => Some(Class), "public" => Some(Public), "static" => Some(Static), "void" => Some(Void),
    "extends" => Some(Extends), "return" => Some(Return), "int" => Some(Int), "boolean" => Some(Boolean),
    "if" => Some(If), "else" => Some(Else), "while" => Some(While), "do" => Some(Do),
    "new" => Some(New), "this" => Some(This), "true" => Some(True), "false" => Some(False),
    _ => None,
  }
}

fn punct<'a>(ch: char) -> Option<TokenKind<'a>> {
  use TokenKind::*;
  match ch {
    '{' => Some(LBrace), '}' => Some(RBrace), '(' => Some(LParen), ')' => Some(RParen),
    '[' => Some(LBracket), ']' => Some(RBracket), ';' => Some(Semi), ',' => Some(Comma),
    '.' => Some(Dot), '=' => Some(Assign), '<' => Some(Lt), '+' => Some(Add),
    '-' => Some(Sub), '*' => Some(Mul), '!' => Some(Not),
    _ => None,
  }
}

// tokenize the whole input; unrecognized characters are reported and skipped,
// so a lexical error never stops the scan (the parser bails out instead)
pub fn lex<'a>(code: &'a str, errors: &mut Errors<'a, Ty<'a>>) -> Vec<Token<'a>> {
  Lexer::new(code).tokenize(errors)
}

struct Lexer<'a> {
  code: &'a str,
  pos: usize,
  loc: Loc,
}

impl<'a> Lexer<'a> {
  fn new(code: &'a str) -> Lexer<'a> {
    Lexer { code, pos: 0, loc: Loc(1, 1) }
  }

  fn rest(&self) -> &'a str { &self.code[self.pos..] }

  // consume `n` bytes, keeping the line/column position in step
  fn skip(&mut self, n: usize) {
    for ch in self.code[self.pos..self.pos + n].chars() { self.loc.advance(ch); }
    self.pos += n;
  }

  // length of the longest prefix of the remaining input whose chars satisfy `pred`
  fn take_while(&self, pred: impl Fn(char) -> bool) -> usize {
    let rest = self.rest();
    rest.find(|c: char| !pred(c)).unwrap_or(rest.len())
  }

  fn tokenize(mut self, errors: &mut Errors<'a, Ty<'a>>) -> Vec<Token<'a>> {
    use TokenKind::*;
    let mut tokens = vec![];
    while self.pos < self.code.len() {
      let start = self.loc;
      let ch = self.rest().chars().next().unwrap();
      match ch {
        ' ' | '\t' | '\r' | '\n' => self.skip(1),
        '/' if self.rest().starts_with("//") => {
          let len = self.rest().find('\n').unwrap_or(self.rest().len());
          self.skip(len);
        }
        '/' if self.rest().starts_with("/*") => {
          // an unterminated block comment silently swallows the rest of the file
          let len = self.rest()[2..].find("*/").map(|i| i + 4).unwrap_or(self.rest().len());
          self.skip(len);
        }
        'a'..='z' | 'A'..='Z' | '_' => {
          let len = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
          let s = &self.code[self.pos..self.pos + len];
          tokens.push(Token { loc: start, kind: keyword(s).unwrap_or(Id(s)) });
          self.skip(len);
        }
        '0'..='9' => {
          let len = self.take_while(|c| c.is_ascii_digit());
          tokens.push(Token { loc: start, kind: IntLit(&self.code[self.pos..self.pos + len]) });
          self.skip(len);
        }
        '&' if self.rest().starts_with("&&") => {
          tokens.push(Token { loc: start, kind: AndAnd });
          self.skip(2);
        }
        _ => {
          match punct(ch) {
            Some(kind) => tokens.push(Token { loc: start, kind }),
            None => errors.issue(start, ErrorKind::UnrecognizedChar(ch)),
          }
          self.skip(ch.len_utf8());
        }
      }
    }
    tokens.push(Token { loc: self.loc, kind: Eof });
    tokens
  }
}
