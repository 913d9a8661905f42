use std::{io, fs, fmt, panic, path::{Path, PathBuf}, any::Any, sync::{Arc, Mutex}};
use colored::*;
use crate::{CompileCfg, Alloc};

// run the compiler over every `.mj` file in `path` and compare the stage artifact
// against `result/<name>.result`; actual outputs land in `out/` for inspection
pub fn test_all(path: impl AsRef<Path>, cfg: CompileCfg) -> io::Result<Vec<TestResult>> {
  // make color work properly on windows(powershell); if you simply dislike the color,
  // add `colored::control::set_override(false);` before calling `test_all`
  #[cfg(target_os = "windows")] let _ = control::set_virtual_terminal(true);

  let path = path.as_ref();
  let ans = path.join("result");
  let out = path.join("out");
  if !out.exists() { fs::create_dir_all(&out)?; }

  let mut files = fs::read_dir(path)?.filter_map(|f| {
    let path = f.ok()?.path();
    let name = path.file_name()?.to_str()?; // in the normal case none of the above 3 ? fails
    if path.is_file() && name.ends_with(".mj") { Some(name.to_owned()) } else { None }
  }).collect::<Vec<_>>();
  files.sort_unstable(); // fs::read_dir order can be strange, sort for better debugging
  let ret = files.iter().map(|f| {
    test_one_caught(path.join(f), out.join(f).with_extension("result"), ans.join(f).with_extension("result"), cfg)
  }).collect();
  Ok(ret)
}

// like test_one, but a panic (an internal compiler error) is caught and reported
// as a RuntimeError result instead of tearing the whole run down
pub fn test_one_caught(i: impl AsRef<Path>, o: impl AsRef<Path>, ans: impl AsRef<Path>, cfg: CompileCfg) -> TestResult {
  let loc = Arc::new(Mutex::new(None));
  let loc1 = loc.clone();
  panic::set_hook(Box::new(move |panic_info| if let Some(l) = panic_info.location() {
    *loc1.lock().unwrap() = Some(PanicLoc { file: l.file().to_owned(), line: l.line(), col: l.column() });
  }));
  let ret = panic::catch_unwind(panic::AssertUnwindSafe(|| test_one(&i, &o, &ans, cfg)))
    .unwrap_or_else(|e| TestResult::new(i, o, ans, ResultKind::RuntimeError(PanicInfo { payload: get_payload(e), loc: loc.lock().unwrap().clone() })));
  let _ = panic::take_hook();
  ret
}

pub fn test_one(i: impl AsRef<Path>, o: impl AsRef<Path>, ans: impl AsRef<Path>, cfg: CompileCfg) -> TestResult {
  let kind = run(&i, &o, cfg).and_then(|out| Ok((out, fs::read_to_string(&ans)?)))
    .map_or_else(ResultKind::IOError, |(out, ans)| ResultKind::new(&out, &ans));
  TestResult::new(i, o, ans, kind)
}

// compile one file to the requested stage; compile errors become the output text,
// exactly what the goldens for ill-typed programs contain
pub fn run(i: impl AsRef<Path>, o: impl AsRef<Path>, cfg: CompileCfg) -> io::Result<String> {
  let code = fs::read_to_string(i)?;
  // the arena-backed Alloc is self-referential; never dropping it sidesteps dropck
  let alloc = std::mem::ManuallyDrop::new(Alloc::default());
  let out = match crate::compile(&code, &alloc, cfg) {
    Ok(p) => p,
    Err(e) => format!("{:?}", e),
  };
  fs::write(o, &out)?;
  Ok(out)
}

pub struct TestResult {
  pub file: PathBuf,
  pub out: PathBuf,
  pub ans: PathBuf,
  pub kind: ResultKind,
}

impl TestResult {
  pub fn new(file: impl AsRef<Path>, out: impl AsRef<Path>, ans: impl AsRef<Path>, kind: ResultKind) -> TestResult {
    TestResult { file: file.as_ref().into(), out: out.as_ref().into(), ans: ans.as_ref().into(), kind }
  }
}

pub enum ResultKind {
  Pass,
  Fail { first_diff: usize, out: String, ans: String },
  IOError(io::Error),
  RuntimeError(PanicInfo),
}

impl ResultKind {
  pub fn new(out: &str, ans: &str) -> ResultKind {
    let (mut out_lines, mut ans_lines) = (out.lines(), ans.lines());
    let mut first_diff = 1;
    // there is no builtin iter function implementing "zip and pad the shorter one"
    loop {
      match (out_lines.next(), ans_lines.next()) {
        (None, None) => break ResultKind::Pass,
        (out, ans) => {
          let (out, ans) = (out.unwrap_or(""), ans.unwrap_or(""));
          if out != ans {
            break ResultKind::Fail { first_diff, out: out.to_owned(), ans: ans.to_owned() };
          }
        }
      }
      first_diff += 1;
    }
  }
}

impl fmt::Debug for TestResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    write!(f, "{}: ", self.file.display())?;
    match &self.kind {
      ResultKind::Pass => write!(f, "{}", "Pass".green()),
      ResultKind::Fail { first_diff, out, ans } => {
        writeln!(f, "{}: {}", "Fail".red(), format!("first different line on {}", first_diff).yellow())?;
        writeln!(f, "{}", format!("your line: \"{}\" ({}:{})", out, self.out.display(), first_diff).yellow())?;
        write!(f, "{}", format!("ans  line: \"{}\" ({}:{})", ans, self.ans.display(), first_diff).yellow())
      }
      ResultKind::IOError(e) => write!(f, "{}: {}", "IOError".red(), e.to_string().yellow()),
      ResultKind::RuntimeError(e) => {
        write!(f, "{}", "RuntimeError".red())?;
        if let Some(payload) = &e.payload {
          write!(f, ": {}", format!("panicked at `{}`", payload).yellow())?;
        }
        if let Some(loc) = &e.loc {
          write!(f, "{}", format!(", {:?}", loc).yellow())?;
        }
        Ok(())
      }
    }
  }
}

// std::panic::Location borrows its `file`, which can't be conveniently stored
#[derive(Clone)]
pub struct PanicLoc {
  pub file: String,
  pub line: u32,
  pub col: u32,
}

// std::panic::PanicInfo's payload is a Box<Any>, pull the message out while it's catchable
pub struct PanicInfo {
  pub payload: Option<String>,
  pub loc: Option<PanicLoc>,
}

impl fmt::Debug for PanicLoc {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    write!(f, "{}:{}:{}", self.file, self.line, self.col)
  }
}

// try to get the String or str content from Any
fn get_payload(e: Box<dyn Any>) -> Option<String> {
  e.downcast::<String>().map(|s| *s)
    .or_else(|payload| payload.downcast::<&str>().map(|s| (*s).to_owned()))
    .ok()
}
