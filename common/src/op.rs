// MiniJava has exactly five binary operators and one unary operator
// they are used by several crates (ast, errors, tac), so they live here instead of `syntax`
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinOp { Add, Sub, Mul, Lt, And }

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnOp { Not }

impl BinOp {
  // an operator style string, used in error messages and in printing tac
  pub fn to_op_str(self) -> &'static str {
    use BinOp::*;
    match self { Add => "+", Sub => "-", Mul => "*", Lt => "<", And => "&&" }
  }

  // an abbreviated word, used in printing ast
  pub fn to_word_str(self) -> &'static str {
    use BinOp::*;
    match self { Add => "ADD", Sub => "SUB", Mul => "MUL", Lt => "LT", And => "AND" }
  }
}

impl UnOp {
  pub fn to_op_str(self) -> &'static str {
    match self { UnOp::Not => "!" }
  }

  pub fn to_word_str(self) -> &'static str {
    match self { UnOp::Not => "NOT" }
  }
}
