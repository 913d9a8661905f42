use std::{hash::{Hash, Hasher}, ops::Deref};

// a reference wrapper that compares and hashes by pointer value, not content
// ast nodes have no ids, their address is their identity (this is 100% safe rust)
pub struct Ref<'a, T>(pub &'a T);

impl<'a, T> Ref<'a, T> {
  fn ptr(&self) -> *const T { self.0 as *const T }
}

impl<T> Clone for Ref<'_, T> {
  fn clone(&self) -> Self { Self(self.0) }
}

impl<T> Copy for Ref<'_, T> {}

impl<T> PartialEq for Ref<'_, T> {
  fn eq(&self, other: &Self) -> bool { self.ptr() == other.ptr() }
}

impl<T> Eq for Ref<'_, T> {}

impl<T> Hash for Ref<'_, T> {
  fn hash<H: Hasher>(&self, state: &mut H) { self.ptr().hash(state) }
}

impl<T> Deref for Ref<'_, T> {
  type Target = T;

  fn deref(&self) -> &Self::Target { self.0 }
}
