use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;

/// Returns a string representation of the expression in parentheses.
macro_rules! parenthesize {
    ( $self:ident, $name:expr, $( $x:expr ),+ ) => {
        {
            let mut string = String::new();
            string += "(";
            string += $name;
            $(
                string += " ";
                string += &$x.accept($self);
            )*
            string += ")";

            string
        }
    };
}

/// Renders the syntax tree in a parenthesized prefix form.
/// Re-parsing the output produces an equal tree, up to literal normalization.
pub struct ASTPrinter;

impl ASTPrinter {
    /// Prints a statement using the visitor pattern.
    pub fn print(&mut self, stmt: &Stmt) -> String {
        stmt.accept(self)
    }

    /// Prints an expression using the visitor pattern.
    pub fn print_expr(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    fn block_string(&mut self, statements: &[Stmt]) -> String {
        let mut string = String::from("(block");
        for stmt in statements {
            string += " ";
            string += &stmt.accept(self);
        }
        string += ")";

        string
    }
}

impl ExprVisitor<String> for ASTPrinter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> String {
        literal.to_string() // Uses fmt::Display impl for Literal
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> String {
        data.name.lexeme.clone()
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> String {
        parenthesize!(self, &format!("= {}", data.name.lexeme), data.value)
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> String {
        parenthesize!(self, &data.operator.lexeme, data.expr)
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> String {
        parenthesize!(self, &data.operator.lexeme, data.left, data.right)
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> String {
        parenthesize!(self, &data.operator.lexeme, data.left, data.right)
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> String {
        parenthesize!(self, "group", data.expr)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> String {
        let mut string = String::from("(call ");
        string += &data.callee.accept(self);
        for argument in &data.arguments {
            string += " ";
            string += &argument.accept(self);
        }
        string += ")";

        string
    }

    fn visit_get_expr(&mut self, data: &GetData) -> String {
        format!("(get {} {})", data.object.accept(self), data.name.lexeme)
    }

    fn visit_set_expr(&mut self, data: &SetData) -> String {
        format!(
            "(set {} {} {})",
            data.object.accept(self),
            data.name.lexeme,
            data.value.accept(self),
        )
    }

    fn visit_this_expr(&mut self, _data: &ThisData) -> String {
        String::from("this")
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> String {
        format!("(super {})", data.method.lexeme)
    }
}

impl StmtVisitor<String> for ASTPrinter {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> String {
        parenthesize!(self, ";", data.expr)
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> String {
        parenthesize!(self, "print", data.expr)
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> String {
        let initializer = match &data.initializer {
            Some(initializer) => initializer.accept(self),
            None => String::from("nil"),
        };

        format!("(var {} = {})", data.name.lexeme, initializer)
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> String {
        self.block_string(&data.statements)
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> String {
        match &data.else_branch {
            Some(else_branch) => parenthesize!(self, "if", data.condition, data.then_branch, else_branch),
            None => parenthesize!(self, "if", data.condition, data.then_branch),
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> String {
        parenthesize!(self, "while", data.condition, data.body)
    }

    fn visit_for_stmt(&mut self, data: &ForData) -> String {
        let initializer = match &data.initializer {
            Some(initializer) => initializer.accept(self),
            None => String::from(";"),
        };
        let condition = match &data.condition {
            Some(condition) => condition.accept(self),
            None => String::from("true"),
        };
        let increment = match &data.increment {
            Some(increment) => increment.accept(self),
            None => String::from(";"),
        };

        format!("(for {} {} {} {})", initializer, condition, increment, data.body.accept(self))
    }

    fn visit_function_stmt(&mut self, data: &FunctionData) -> String {
        let params = data.params.iter()
            .map(|param| param.lexeme.as_str())
            .collect::<Vec<&str>>()
            .join(" ");

        format!("(fun {} ({}) {})", data.name.lexeme, params, self.block_string(&data.body))
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> String {
        let value = match &data.value {
            Some(value) => value.accept(self),
            None => String::from("nil"),
        };

        format!("(return {value})")
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> String {
        let mut string = format!("(class {}", data.name.lexeme);
        if let Some(superclass) = &data.superclass {
            string += " < ";
            string += &superclass.accept(self);
        }
        for method in &data.methods {
            string += " ";
            string += &method.accept(self);
        }
        string += ")";

        string
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn parse(source: &str) -> Vec<Stmt> {
        Parser::new(Scanner::new(source).scan_tokens()).parse()
    }

    fn print(source: &str) -> String {
        let statements = parse(source);
        let mut printer = ASTPrinter;

        statements.iter()
            .map(|stmt| printer.print(stmt))
            .collect::<Vec<String>>()
            .join(" ")
    }

    #[test]
    fn unary_binary_grouping() {
        let statements = parse("-123 * (45.67);");
        let Stmt::Expression(data) = &statements[0] else { panic!() };

        assert_eq!(ASTPrinter.print_expr(&data.expr), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn integer_valued_numbers_print_without_decimal() {
        assert_eq!(print("print 1.0;"), "(print 1)");
        assert_eq!(print("print 1.5;"), "(print 1.5)");
    }

    #[test]
    fn statements() {
        assert_eq!(print("var a = 1;"), "(var a = 1)");
        assert_eq!(print("{ print 1; print 2; }"), "(block (print 1) (print 2))");
        assert_eq!(print("if (a) b = 1; else b = 2;"), "(if a (; (= b 1)) (; (= b 2)))");
        assert_eq!(print("while (a < 3) print a;"), "(while (< a 3) (print a))");
        assert_eq!(
            print("for (var i = 0; i < 3; i = i + 1) print i;"),
            "(for (var i = 0) (< i 3) (= i (+ i 1)) (print i))"
        );
        assert_eq!(print("for (;;) print 1;"), "(for ; true ; (print 1))");
    }

    #[test]
    fn functions_and_classes() {
        assert_eq!(
            print("fun add(a, b) { return a + b; }"),
            "(fun add (a b) (block (return (+ a b))))"
        );
        assert_eq!(
            print("class Pie < Dessert { taste() { super.taste(); print this; } }"),
            "(class Pie < Dessert (fun taste () (block (; (call (super taste))) (print this))))"
        );
    }

    #[test]
    fn printing_is_deterministic() {
        let source = "fun f(n) { if (n < 2) return n; return f(n - 1) + f(n - 2); }";

        assert_eq!(print(source), print(source));
    }

    #[test]
    fn literals() {
        assert_eq!(print("print nil;"), "(print nil)");
        assert_eq!(print("print true;"), "(print true)");
        assert_eq!(print("print \"foo\";"), "(print foo)");
        assert_eq!(print("print 1 == 1;"), "(print (== 1 1))");
    }
}
