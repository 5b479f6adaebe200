use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::mem;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{Error, RuntimeError, RuntimeInterrupt};
use crate::expr::*;
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::*;
use crate::token::{Token, Type};

/// Walks the syntax tree and produces the program's observable effects.
///
/// The interpreter owns the resolution map the resolver filled in: a variable
/// reference with an entry is read at that hop distance from the current
/// environment, one without is read from the globals.
pub struct Interpreter<'a> {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<usize, usize>,
    output: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    /// Creates a new interpreter writing `print` output to the given sink.
    pub fn new(output: &'a mut dyn Write) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::get_globals() {
            let name = native.name.lexeme.clone();
            globals.borrow_mut().define(&name, Object::from(native));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    /// Interprets the statements in order. A runtime error is reported and
    /// aborts the program.
    pub fn interpret(&mut self, statements: &Vec<Stmt>) {
        for statement in statements {
            if let Err(interrupt) = self.execute(statement) {
                match interrupt {
                    RuntimeInterrupt::Error(error) => {
                        error.throw();
                        break;
                    },
                    RuntimeInterrupt::Return(_) => {
                        unreachable!("the resolver rejects return outside a function")
                    },
                }
            }
        }
    }

    /// Records the hop distance for a reference expression.
    /// Called by the resolver.
    pub fn resolve(&mut self, id: usize, depth: usize) {
        self.locals.insert(id, depth);
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), RuntimeInterrupt> {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        expr.accept(self)
    }

    /// Executes the statements inside the given environment. The previous
    /// environment is restored on every exit path, return and error included.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<(), RuntimeInterrupt> {
        let previous = mem::replace(&mut self.environment, environment);

        let result = statements.iter().try_for_each(|statement| self.execute(statement));

        self.environment = previous;
        result
    }

    fn lookup_variable(&self, id: usize, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(distance) => self.environment.borrow().get_at(*distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn execute_for(&mut self, data: &ForData) -> Result<(), RuntimeInterrupt> {
        if let Some(initializer) = &data.initializer {
            self.execute(initializer)?;
        }

        loop {
            if let Some(condition) = &data.condition {
                if !self.evaluate(condition)?.as_bool() {
                    break;
                }
            }

            self.execute(&data.body)?;

            if let Some(increment) = &data.increment {
                self.evaluate(increment)?;
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn resolved_depth(&self, id: usize) -> Option<usize> {
        self.locals.get(&id).copied()
    }
}

impl<'a> ExprVisitor<Result<Object, RuntimeError>> for Interpreter<'a> {
    fn visit_literal_expr(&mut self, literal: &Literal) -> Result<Object, RuntimeError> {
        Ok(Object::from(literal.clone()))
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> Result<Object, RuntimeError> {
        self.lookup_variable(data.id, &data.name)
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> Result<Object, RuntimeError> {
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.id) {
            Some(distance) => {
                self.environment.borrow_mut().assign_at(*distance, &data.name, value.clone());
            },
            None => {
                self.globals.borrow_mut().assign(&data.name, value.clone())?;
            },
        }

        Ok(value)
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> Result<Object, RuntimeError> {
        let right = self.evaluate(&data.expr)?;

        match data.operator.r#type {
            Type::Bang => Ok(Object::from(!right.as_bool())),
            Type::Minus => {
                let type_str = right.type_str().to_string();

                (-right).ok_or_else(|| RuntimeError {
                    token: data.operator.clone(),
                    message: format!("Unary operation '-' is not supported for {type_str} type"),
                })
            },
            _ => unreachable!(),
        }
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;

        let types = (left.type_str().to_string(), right.type_str().to_string());

        let result = match data.operator.r#type {
            Type::Plus => left + right,
            Type::Minus => left - right,
            Type::Star => left * right,
            Type::Slash => left / right,
            Type::Greater | Type::GreaterEqual | Type::Less | Type::LessEqual => {
                match (left, right) {
                    (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => {
                        Some(Object::from(match data.operator.r#type {
                            Type::Greater => l > r,
                            Type::GreaterEqual => l >= r,
                            Type::Less => l < r,
                            Type::LessEqual => l <= r,
                            _ => unreachable!(),
                        }))
                    },
                    _ => None,
                }
            },
            Type::EqualEqual => Some(Object::from(left == right)),
            Type::BangEqual => Some(Object::from(left != right)),
            _ => unreachable!(),
        };

        result.ok_or_else(|| RuntimeError {
            token: data.operator.clone(),
            message: format!(
                "Binary operation '{}' is not supported between {} type and {} type",
                data.operator.lexeme, types.0, types.1,
            ),
        })
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;

        // Short-circuit by handing back the deciding operand untouched; the
        // result is not coerced to a boolean.
        match data.operator.r#type {
            Type::Or if left.as_bool() => Ok(left),
            Type::And if !left.as_bool() => Ok(left),
            _ => self.evaluate(&data.right),
        }
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> Result<Object, RuntimeError> {
        self.evaluate(&data.expr)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> Result<Object, RuntimeError> {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity = match &callee {
            Object::Function(function) => function.arity(),
            Object::NativeFunction(function) => function.arity(),
            Object::Class(class) => class.borrow().arity(),
            _ => return Err(RuntimeError {
                token: data.paren.clone(),
                message: "Can only call functions and classes".to_string(),
            }),
        };

        if arguments.len() != arity {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: format!("Expected {} arguments but got {}", arity, arguments.len()),
            });
        }

        match callee {
            Object::Function(function) => function.call(self, arguments),
            Object::NativeFunction(function) => function.call(self, arguments),
            Object::Class(class) => {
                let instance = Object::from(Instance::from(&class));

                let initializer = class.borrow().find_method("init");
                if let Some(initializer) = initializer {
                    initializer.bind(instance.clone()).call(self, arguments)?;
                }

                Ok(instance)
            },
            _ => unreachable!(),
        }
    }

    fn visit_get_expr(&mut self, data: &GetData) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        match &object {
            Object::Instance(instance) => instance.borrow().get(&data.name, &object),
            _ => Err(RuntimeError {
                token: data.name.clone(),
                message: "Only instances have properties".to_string(),
            }),
        }
    }

    fn visit_set_expr(&mut self, data: &SetData) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        let Object::Instance(instance) = object else {
            return Err(RuntimeError {
                token: data.name.clone(),
                message: "Only instances have fields".to_string(),
            });
        };

        let value = self.evaluate(&data.value)?;
        instance.borrow_mut().set(&data.name, value.clone());

        Ok(value)
    }

    fn visit_this_expr(&mut self, data: &ThisData) -> Result<Object, RuntimeError> {
        self.lookup_variable(data.id, &data.keyword)
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> Result<Object, RuntimeError> {
        // The resolver only lets 'super' through inside a subclass method,
        // where its distance is always recorded.
        let distance = *self.locals.get(&data.id).expect("'super' to be resolved");

        let superclass = self.environment.borrow().get_at(distance, &data.keyword)?;
        // 'this' lives in the binding scope one hop inside the 'super' scope.
        let object = self.environment.borrow().get_at(distance - 1, &Token::from("this"))?;

        let Object::Class(superclass) = superclass else { unreachable!() };

        let method = superclass.borrow().find_method(&data.method.lexeme)
            .ok_or_else(|| RuntimeError {
                token: data.method.clone(),
                message: format!("Undefined property '{}'", data.method.lexeme),
            })?;

        Ok(Object::from(method.bind(object)))
    }
}

impl<'a> StmtVisitor<Result<(), RuntimeInterrupt>> for Interpreter<'a> {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> Result<(), RuntimeInterrupt> {
        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> Result<(), RuntimeInterrupt> {
        let value = self.evaluate(&data.expr)?;

        writeln!(self.output, "{value}").expect("output sink to be writable");
        Ok(())
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> Result<(), RuntimeInterrupt> {
        let value = match &data.initializer {
            Some(initializer) => {
                // A top-level variable is visible, as nil, while its own
                // initializer runs. Locals are rejected by the resolver
                // before it gets this far.
                if Rc::ptr_eq(&self.environment, &self.globals)
                    && !self.globals.borrow().variables.contains_key(&data.name.lexeme)
                {
                    self.globals.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));
                }

                self.evaluate(initializer)?
            },
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> Result<(), RuntimeInterrupt> {
        let environment = Environment::new(Some(Rc::clone(&self.environment)));

        self.execute_block(&data.statements, Rc::new(RefCell::new(environment)))
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> Result<(), RuntimeInterrupt> {
        if self.evaluate(&data.condition)?.as_bool() {
            self.execute(&data.then_branch)?;
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)?;
        }

        Ok(())
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> Result<(), RuntimeInterrupt> {
        // The loop introduces no scope of its own; body scoping is the block
        // statement's job.
        while self.evaluate(&data.condition)?.as_bool() {
            self.execute(&data.body)?;
        }

        Ok(())
    }

    fn visit_for_stmt(&mut self, data: &ForData) -> Result<(), RuntimeInterrupt> {
        // One environment for the whole statement: a var in the initializer
        // persists across iterations instead of being rebound per iteration.
        let environment = Environment::new(Some(Rc::clone(&self.environment)));
        let previous = mem::replace(&mut self.environment, Rc::new(RefCell::new(environment)));

        let result = self.execute_for(data);

        self.environment = previous;
        result
    }

    fn visit_function_stmt(&mut self, data: &FunctionData) -> Result<(), RuntimeInterrupt> {
        // The name goes into the environment the function closes over, so
        // the body can call itself.
        let function = Function::new(data, Rc::clone(&self.environment), false);

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> Result<(), RuntimeInterrupt> {
        let value = match &data.value {
            Some(value) => self.evaluate(value)?,
            None => Object::from(Literal::Nil),
        };

        Err(RuntimeInterrupt::Return(value))
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> Result<(), RuntimeInterrupt> {
        let superclass = match &data.superclass {
            Some(expr) => {
                let Expr::Variable(variable) = expr else { unreachable!() };

                match self.evaluate(expr)? {
                    Object::Class(class) => Some(class),
                    _ => return Err(RuntimeInterrupt::Error(RuntimeError {
                        token: variable.name.clone(),
                        message: "Superclass must be a class".to_string(),
                    })),
                }
            },
            None => None,
        };

        // Two-step definition so methods can refer to the class by name.
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        // Methods of a subclass close over an extra scope that binds 'super'.
        let environment = match &superclass {
            Some(class) => {
                let mut environment = Environment::new(Some(Rc::clone(&self.environment)));
                environment.define("super", Object::from(Rc::clone(class)));
                Rc::new(RefCell::new(environment))
            },
            None => Rc::clone(&self.environment),
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let Stmt::Function(declaration) = method else { unreachable!() };

            let function = Function::new(
                declaration,
                Rc::clone(&environment),
                declaration.name.lexeme.eq("init"),
            );
            methods.insert(declaration.name.lexeme.clone(), function);
        }

        let class = Class::new(data.name.lexeme.clone(), superclass, methods);
        self.environment.borrow_mut().assign(&data.name, Object::from(class))?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    /// Runs the full pipeline on the source and returns the print output.
    fn run(source: &str) -> String {
        let mut output = Vec::new();

        {
            let mut interpreter = Interpreter::new(&mut output);
            let tokens = Scanner::new(source).scan_tokens();
            let statements = Parser::new(tokens).parse();

            Resolver::new(&mut interpreter).resolve(&statements);
            interpreter.interpret(&statements);
        }

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(run("print 1 + 2 * 3;"), "7\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(run("print \"foo\" + \"bar\";"), "foobar\n");
    }

    #[test]
    fn block_scoping_and_shadowing() {
        assert_eq!(run("var a = 1; { var a = 2; print a; } print a;"), "2\n1\n");
    }

    #[test]
    fn recursive_fibonacci() {
        assert_eq!(
            run("fun f(n) { if (n < 2) return n; return f(n - 1) + f(n - 2); } print f(10);"),
            "55\n"
        );
    }

    #[test]
    fn closure_captures_by_reference() {
        let source = "
            fun mk() {
                var i = 0;
                fun c() { i = i + 1; print i; }
                return c;
            }
            var c = mk();
            c();
            c();
        ";
        assert_eq!(run(source), "1\n2\n");
    }

    #[test]
    fn for_loop() {
        assert_eq!(run("for (var i = 0; i < 3; i = i + 1) print i;"), "0\n1\n2\n");
    }

    #[test]
    fn logical_operators_return_operands() {
        assert_eq!(run("print nil or 1;"), "1\n");
        assert_eq!(run("print nil and 1;"), "nil\n");
        assert_eq!(run("print 1 or 2;"), "1\n");
        assert_eq!(run("print false or false;"), "false\n");
    }

    #[test]
    fn ieee_division_by_zero() {
        assert_eq!(run("print 1/0 == 1/0;"), "true\n");
        assert_eq!(run("print 1/0;"), "inf\n");
    }

    #[test]
    fn equality_has_no_coercion() {
        assert_eq!(run("print 1 == \"1\";"), "false\n");
        assert_eq!(run("print nil == nil;"), "true\n");
        assert_eq!(run("print nil == false;"), "false\n");
        assert_eq!(run("print \"a\" != \"b\";"), "true\n");
    }

    #[test]
    fn truthiness_of_zero_and_empty_string() {
        assert_eq!(run("if (0) print \"zero\"; if (\"\") print \"empty\";"), "zero\nempty\n");
    }

    #[test]
    fn global_self_initializer_reads_nil() {
        assert_eq!(run("var a = a; print a;"), "nil\n");
    }

    #[test]
    fn global_redefinition_sees_previous_value() {
        assert_eq!(run("var a = 1; var a = a + 1; print a;"), "2\n");
    }

    #[test]
    fn for_iterations_share_one_environment() {
        // The closure made in the last iteration still sees the final value
        // of i because every iteration shares the loop's environment.
        let source = "
            var keep;
            for (var i = 0; i < 3; i = i + 1) {
                fun show() { print i; }
                keep = show;
            }
            keep();
        ";
        assert_eq!(run(source), "3\n");
    }

    #[test]
    fn return_unwinds_nested_blocks_and_loops() {
        let source = "
            fun find() {
                for (var i = 0; i < 10; i = i + 1) {
                    while (true) {
                        if (i == 2) return i;
                        i = i + 1;
                    }
                }
            }
            print find();
        ";
        assert_eq!(run(source), "2\n");
    }

    #[test]
    fn function_without_return_yields_nil() {
        assert_eq!(run("fun noop() {} print noop();"), "nil\n");
    }

    #[test]
    fn class_runtime() {
        let source = "
            class Counter {
                init(start) { this.count = start; }
                bump() { this.count = this.count + 1; return this.count; }
            }
            var c = Counter(40);
            c.bump();
            print c.bump();
        ";
        assert_eq!(run(source), "42\n");
    }

    #[test]
    fn inherited_method_and_super() {
        let source = "
            class A { greet() { return \"A\"; } }
            class B < A { greet() { return super.greet() + \"B\"; } }
            print B().greet();
        ";
        assert_eq!(run(source), "AB\n");
    }

    #[test]
    fn initializer_returns_the_instance() {
        let source = "
            class Early { init() { return; } }
            print Early();
        ";
        assert_eq!(run(source), "<instance Early>\n");
    }

    #[test]
    fn environment_is_restored_after_blocks_and_calls() {
        let source = "
            var a = \"global\";
            fun f() { var a = \"inner\"; }
            { var a = \"block\"; }
            f();
            print a;
        ";
        assert_eq!(run(source), "global\n");
    }

    #[test]
    fn print_is_deterministic() {
        let source = "var a = 1; { var b = a + 1; print b * 2; }";
        assert_eq!(run(source), run(source));
    }
}
