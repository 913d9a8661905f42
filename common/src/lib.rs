pub mod loc;
pub mod errors;
pub mod ignore_result;
pub mod indent_printer;
pub mod r#ref;
pub mod op;

pub use crate::{loc::*, errors::*, ignore_result::*, indent_printer::*, r#ref::*, op::*};
use hashbrown::hash_map::DefaultHashBuilder;

// the built-in root class, injected into the class table before any user class
pub const OBJECT: &str = "Object";
pub const MAIN_METHOD: &str = "main";
// entry labels of the two synthetic tac blocks
pub const INIT_FUNC: &str = "INIT";
pub const MAIN_FUNC: &str = "MAIN";
const INDENT_STR: &str = "    ";

// hashbrown's default hasher is noticeably faster than RandomState, and the scopes are hit a lot
// the aliases live here so that every crate agrees on the hasher
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, DefaultHashBuilder>;
pub type IndexSet<K> = indexmap::IndexSet<K, DefaultHashBuilder>;
pub type HashMap<K, V> = hashbrown::HashMap<K, V>;
pub type HashSet<K> = hashbrown::HashSet<K>;
