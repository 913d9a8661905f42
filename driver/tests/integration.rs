use driver::{compile, Alloc, CompileCfg, Stage};

fn run(code: &str, stage: Stage) -> Result<String, String> {
  // the arena-backed Alloc is self-referential; never dropping it sidesteps dropck
  let alloc = std::mem::ManuallyDrop::new(Alloc::default());
  compile(code, &alloc, CompileCfg { stage }).map_err(|e| format!("{:?}", e))
}

fn run_c(code: &str) -> Result<String, String> { run(code, Stage::C) }

const PRINT_EXPR: &str = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(1 + 2 * 3);
    }
}
"#;

#[test]
fn arith_println_compiles_to_c() {
  let c = run_c(PRINT_EXPR).unwrap();
  // a single well-formed translation unit
  assert_eq!(c.matches("int main(").count(), 1);
  assert_eq!(c.matches('{').count(), c.matches('}').count());
  assert!(c.contains("#include <stdio.h>"));
  assert!(c.contains("#include <stdlib.h>"));
  assert!(c.contains("union word"));
  assert!(c.contains("int next_param = 0;"));
  assert!(c.contains("word r0 = {0};"));
  assert!(c.contains("void INIT();"));
  assert!(c.contains("void MAIN();"));
  assert!(c.contains("INIT();"));
  assert!(c.contains("MAIN();"));
  assert!(c.contains("printf(\"%d\\n\""));
  assert!(c.contains("next_param = 0;"));
}

#[test]
fn arith_println_tac() {
  let t = run(PRINT_EXPR, Stage::Tac).unwrap();
  // no folding: all three literals are loaded and combined at runtime
  assert!(t.contains("= 1"));
  assert!(t.contains("= 2"));
  assert!(t.contains("= 3"));
  assert!(t.contains("*"));
  assert!(t.contains("print "));
  assert!(t.contains("FUNC<MAIN> {"));
  assert!(t.contains("FUNC<INIT> {"));
}

#[test]
fn parse_dump_shape() {
  let d = run(PRINT_EXPR, Stage::Parse).unwrap();
  assert!(d.contains("TopLevel @ (2,1)"));
  assert!(d.contains("MainClass"));
  assert!(d.contains("Print"));
  assert!(d.contains("MUL"));
  assert!(d.contains("ADD"));
  assert!(d.contains("IntLit"));
}

#[test]
fn empty_main_is_a_single_return() {
  let t = run("class Main { public static void main(String[] a) { { } } }", Stage::Tac).unwrap();
  assert!(t.contains("FUNC<MAIN> {\n    return\n}"));
}

const OVERRIDE: &str = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(new T().go());
    }
}
class T {
    public int go() {
        A x;
        x = new B();
        return x.f();
    }
}
class A {
    public int f() { return 1; }
}
class B extends A {
    public int f() { return 2; }
}
"#;

#[test]
fn override_replaces_the_vtable_slot() {
  let c = run_c(OVERRIDE).unwrap();
  assert!(c.contains("void A_f()"));
  assert!(c.contains("void B_f()"));
  // B's method table must point at B's implementation
  assert!(c.contains(".f = &B_f;"));
  assert!(c.contains(".f = &A_f;"));
}

#[test]
fn deep_inheritance_dispatch() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(new E().f());
    }
}
class A { public int f() { return 1; } }
class B extends A { public int g() { return 0; } }
class C extends B { public int f() { return 3; } }
class D extends C { public int h() { return 0; } }
class E extends D { public int k() { return 0; } }
"#;
  let t = run(code, Stage::Tac).unwrap();
  // A and B share A.f; C, D and E all carry C's override in the same slot
  assert_eq!(t.matches("= FUNC<A.f>").count(), 2);
  assert_eq!(t.matches("= FUNC<C.f>").count(), 3);
}

#[test]
fn array_store_and_load() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(new T().go());
    }
}
class T {
    public int go() {
        int[] a;
        a = new int[3];
        a[1] = 42;
        return a[1];
    }
}
"#;
  let c = run_c(code).unwrap();
  // calloc supplies the zeroed defaults for untouched elements
  assert!(c.contains("calloc("));
  assert!(c.contains("= 42;"));
  let t = run(code, Stage::Tac).unwrap();
  assert!(t.contains("alloc"));
}

#[test]
fn this_receiver_dispatches_through_the_vtable() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(new T().go());
    }
}
class T {
    public int go() { return this.f(6); }
    public int f(int x) { return x * 7; }
}
"#;
  let c = run_c(code).unwrap();
  assert!(c.contains("void T_go()"));
  assert!(c.contains("void T_f()"));
  // a virtual call: function pointer loaded from the table, then called
  assert!(c.contains(".f))();"));
}

#[test]
fn while_and_do_while_lower_with_jz() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(new T().go(10));
    }
}
class T {
    public int go(int n) {
        int s;
        int i;
        s = 0;
        i = 0;
        while (i < n) {
            s = s + i;
            i = i + 1;
        }
        do { s = s + 1; } while (s < 0);
        return s;
    }
}
"#;
  let t = run(code, Stage::Tac).unwrap();
  assert!(t.contains("== 0) branch _L"));
  assert!(t.contains("branch _L"));
  let c = run_c(code).unwrap();
  assert!(c.contains("goto "));
  assert!(c.contains(".n == 0) goto "));
}

#[test]
fn recursion_compiles() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(new Fac().go(10));
    }
}
class Fac {
    public int go(int n) {
        int r;
        if (n < 1)
            r = 1;
        else
            r = n * this.go(n - 1);
        return r;
    }
}
"#;
  let c = run_c(code).unwrap();
  assert!(c.contains("void Fac_go()"));
  assert!(c.contains("param[next_param++]"));
}

// ---------------------------------------------------------------------------
// rejected programs

#[test]
fn assigning_int_to_int_array_is_rejected() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(new T().go());
    }
}
class T {
    public int go() {
        int[] a;
        a = 1;
        return 0;
    }
}
"#;
  let e = run_c(code).unwrap_err();
  assert!(e.contains("variable of incompatible type int[]"));
}

#[test]
fn arity_mismatch_reports_expected_and_actual() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(new T().go());
    }
}
class T {
    public int f(int x, int y) { return x + y; }
    public int go() { return this.f(1); }
}
"#;
  let e = run_c(code).unwrap_err();
  assert!(e.contains("has 2 parameter(s)"));
  assert!(e.contains("1 argument(s)"));
}

#[test]
fn undeclared_variables_accumulate() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(new T().go());
    }
}
class T {
    public int go() {
        b = 1;
        return c;
    }
}
"#;
  let e = run_c(code).unwrap_err();
  // both errors are reported in one run, checking continues past the first
  assert!(e.contains("undeclared variable: b"));
  assert!(e.contains("undeclared variable: c"));
}

#[test]
fn cyclic_inheritance_is_rejected() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(0);
    }
}
class A extends B { }
class B extends A { }
"#;
  let e = run_c(code).unwrap_err();
  assert!(e.contains("illegal class inheritance"));
}

#[test]
fn condition_must_be_boolean() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        while (1) { }
    }
}
"#;
  let e = run_c(code).unwrap_err();
  assert!(e.contains("condition of while statement"));
}

#[test]
fn println_argument_must_be_int() {
  let e = run_c("class Main { public static void main(String[] a) { System.out.println(true); } }").unwrap_err();
  assert!(e.contains("argument of println to be int"));
  assert!(e.contains("boolean"));
}

#[test]
fn unknown_class_in_declaration() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(0);
    }
}
class T {
    public int go() {
        U x;
        return 0;
    }
}
"#;
  let e = run_c(code).unwrap_err();
  assert!(e.contains("class 'U' not found"));
}

#[test]
fn duplicate_class_names_conflict() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(0);
    }
}
class A { }
class A { }
"#;
  let e = run_c(code).unwrap_err();
  assert!(e.contains("conflicts with earlier declaration"));
}

#[test]
fn field_may_not_redeclare_inherited_field() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(0);
    }
}
class A { int x; }
class B extends A { int x; }
"#;
  let e = run_c(code).unwrap_err();
  assert!(e.contains("overrides an inherited field"));
}

#[test]
fn override_signature_must_match() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(0);
    }
}
class A { public int f(int x) { return x; } }
class B extends A { public int f(boolean x) { return 0; } }
"#;
  let e = run_c(code).unwrap_err();
  assert!(e.contains("doesn't match the signature in class 'A'"));
}

#[test]
fn supertype_value_cannot_flow_into_subtype_variable() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(0);
    }
}
class T {
    public int go() {
        B x;
        x = new A();
        return 0;
    }
}
class A { }
class B extends A { }
"#;
  let e = run_c(code).unwrap_err();
  assert!(e.contains("incompatible type class B"));
}

#[test]
fn return_type_must_be_compatible() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(0);
    }
}
class T {
    public int[] go() { return 3; }
}
"#;
  let e = run_c(code).unwrap_err();
  assert!(e.contains("return type of T.go"));
}

#[test]
fn lexical_and_literal_errors() {
  let e = run_c("class Main { public static void main(String[] a) { System.out.println($); } }").unwrap_err();
  assert!(e.contains("unrecognized character '$'"));
  let e = run_c("class Main { public static void main(String[] a) { System.out.println(99999999999); } }").unwrap_err();
  assert!(e.contains("is too large"));
}

#[test]
fn syntax_error_mentions_expectation() {
  let e = run_c("class Main { public static void main(String[] a) { }").unwrap_err();
  assert!(e.contains("syntax error"));
}

#[test]
fn scope_dump_lists_classes_and_members() {
  let code = r#"
class Main {
    public static void main(String[] a) {
        System.out.println(0);
    }
}
class A { int x; public int f(int y) { return y; } }
class B extends A { }
"#;
  let d = run(code, Stage::TypeCk).unwrap();
  assert!(d.contains("GLOBAL SCOPE:"));
  assert!(d.contains("-> class Object"));
  assert!(d.contains("-> class B : A"));
  assert!(d.contains("CLASS SCOPE OF 'A':"));
  assert!(d.contains("FORMAL SCOPE OF 'f':"));
  assert!(d.contains("variable @y : int"));
  assert!(d.contains("variable x : int"));
}
