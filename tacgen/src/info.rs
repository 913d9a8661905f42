use syntax::MethodDef;
use common::IndexMap;

// these structs work like extra fields attached to ast nodes during lowering

pub struct VarInfo {
  // for a field: the word offset inside the object (1 past the method-table header)
  // for a param or local: the vl register index (this is vl0, params follow)
  pub off: u32,
}

pub struct MethodInfo {
  // which block holds this method's code in TacProgram
  pub idx: u32,
}

pub struct ClassInfo<'a> {
  // object size in words, including the method-table header word
  pub field_num: u32,
  // the vg global holding this class's method-table head
  pub vg: u32,
  // method-table layout, root-to-leaf declaration order, overrides keep their slot
  pub vtbl: IndexMap<&'a str, &'a MethodDef<'a>>,
}
