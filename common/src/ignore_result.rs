// writing into an IndentPrinter cannot fail, but write! still returns a Result,
// and rustc warns about every unused one; .ignore() states the intent in one word
pub trait IgnoreResult: Sized {
  fn ignore(self) {}
}

impl<V, E> IgnoreResult for Result<V, E> {}

impl<T> IgnoreResult for Option<T> {}
