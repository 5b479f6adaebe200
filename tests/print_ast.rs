use assert_cmd::Command;

fn ast(source: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("ember").unwrap()
        .args(["--ast", "-c", source])
        .assert()
}

#[test]
fn expression() {
    ast("-123 * (45.67);")
        .stdout("(; (* (- 123) (group 45.67)))\n")
        .success();
}

#[test]
fn integer_valued_numbers_lose_the_decimal_point() {
    ast("print 1.0 + 2.50;")
        .stdout("(print (+ 1 2.5))\n")
        .success();
}

#[test]
fn declarations() {
    ast("var a = 1;")
        .stdout("(var a = 1)\n")
        .success();

    ast("fun add(a, b) { return a + b; }")
        .stdout("(fun add (a b) (block (return (+ a b))))\n")
        .success();

    ast("class Pie < Dessert { taste() { print this; } }")
        .stdout("(class Pie < Dessert (fun taste () (block (print this))))\n")
        .success();
}

#[test]
fn control_flow() {
    ast("if (a) print 1; else print 2;")
        .stdout("(if a (print 1) (print 2))\n")
        .success();

    ast("while (true) { print 1; }")
        .stdout("(while true (block (print 1)))\n")
        .success();

    ast("for (var i = 0; i < 3; i = i + 1) print i;")
        .stdout("(for (var i = 0) (< i 3) (= i (+ i 1)) (print i))\n")
        .success();
}

#[test]
fn one_line_per_statement() {
    ast("var a = 1; print a;")
        .stdout("(var a = 1)\n(print a)\n")
        .success();
}

#[test]
fn parse_error_fails_without_printing() {
    ast("1 +;")
        .stdout("")
        .stderr("[line 1:4] ParseError at ';': Expect expression\n")
        .code(65);
}
