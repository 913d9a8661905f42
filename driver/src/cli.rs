use driver::{Stage, CompileCfg, Alloc};
use clap::{Arg, App};
use std::{io, fs, process};

fn main() -> io::Result<()> {
  let matches = App::new("mjc")
    .arg(Arg::with_name("input").required(true))
    .arg(Arg::with_name("output").long("output").short("o").takes_value(true))
    .arg(Arg::with_name("target").long("target").short("t").takes_value(true).default_value("c"))
    .get_matches();
  let stage = match matches.value_of("target").unwrap() {
    t if t.eq_ignore_ascii_case("parse") => Stage::Parse,
    t if t.eq_ignore_ascii_case("typeck") => Stage::TypeCk,
    t if t.eq_ignore_ascii_case("tac") => Stage::Tac,
    t if t.eq_ignore_ascii_case("c") => Stage::C,
    t => {
      eprintln!("invalid target: `{}`", t);
      process::exit(1);
    }
  };
  let input = matches.value_of("input").unwrap();
  let code = fs::read_to_string(input)?;
  // the arena-backed Alloc is self-referential; never dropping it sidesteps dropck
  let alloc = std::mem::ManuallyDrop::new(Alloc::default());
  let result = match driver::compile(&code, &alloc, CompileCfg { stage }) {
    Ok(p) => p,
    Err(e) => {
      eprint!("{:?}", e);
      process::exit(1);
    }
  };
  if let Some(output) = matches.value_of("output") {
    fs::write(output, result)
  } else {
    print!("{}", result);
    Ok(())
  }
}
