//! Ember is a tree-walk interpreter for Lox, a small dynamically typed
//! scripting language with first-class functions, lexical closures and
//! classes with single inheritance. The interpreter is a hobby project in the
//! spirit of the [Crafting Interpreters](https://craftinginterpreters.com/)
//! book and is not intended for production use.
//!
//! Source text goes through four passes, each one a module of this crate:
//!
//! ## Scanning
//! The [`scanner`](scanner) turns the raw character stream into a flat list
//! of [`Token`](token::Token)s in a single pass with one character of
//! lookahead. Line comments become `Comment` tokens so the token stream still
//! covers the whole source; the parser drops them before they reach the
//! grammar. Problems at this level are trivial ones, an unterminated string
//! or a stray character, and are reported as a
//! [`ScanError`](error::ScanError). Scanning keeps going after an error so a
//! single run reports every bad token at once.
//!
//! ## Parsing
//! The [`parser`](parser) is a hand-written recursive descent parser that
//! turns the token list into statements and expressions. Precedence is
//! encoded in the call chain, one method per grammar rule.
//! [`Expressions`](expr::Expr) produce values, [`statements`](stmt::Stmt)
//! have effects. On a [`ParseError`](error::ParseError) the parser
//! synchronizes: it skips ahead to the next likely statement boundary and
//! keeps parsing, again so that one run reports as much as possible. A
//! program with any scan or parse error is never executed.
//!
//! ## Resolving
//! The [`resolver`](resolver) walks the finished tree once and performs the
//! static scope analysis: for every variable reference it records, keyed by
//! the reference's identity, how many environment hops separate the use from
//! the binding. This is what makes closures capture the binding they were
//! written against instead of whatever happens to share its name at call
//! time. Scope violations such as reading a local in its own initializer or
//! returning from top-level code are a [`ResolveError`](error::ResolveError).
//!
//! ## Interpreting
//! The [`interpreter`](interpreter) walks the tree and evaluates it, driven
//! by the resolver's distances. Scopes are chained
//! [`Environment`](environment::Environment)s; a function value pairs its
//! declaration with the environment it was declared in, which is all a
//! closure is. Type mismatches, bad arities and unknown names surface as a
//! [`RuntimeError`](error::RuntimeError) at this point and abort the program.
//!
//! The exit code distinguishes the failure modes: 65 for errors found before
//! running (scan, parse, resolve) and 70 for a runtime error.

use std::io::Write;
use std::{fs, process};

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use ast::ASTPrinter;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The interpreter facade: owns the interpreter state shared between runs
/// and maps recorded errors to exit codes. `print` output goes to the given
/// sink, which is stdout in production and a buffer in tests.
pub struct Ember<'a> {
    interpreter: Interpreter<'a>,
}

impl<'a> Ember<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        Ember {
            interpreter: Interpreter::new(output),
        }
    }

    /// Runs a script file and exits with 65/70 if it failed.
    pub fn run_file(&mut self, path: &str) {
        let contents = fs::read_to_string(path)
            .expect("to be able to read the script file");

        self.run(&contents);
        Self::exit_on_error();
    }

    /// Runs an inline source string and exits with 65/70 if it failed.
    pub fn run_command(&mut self, source: &str) {
        self.run(source);
        Self::exit_on_error();
    }

    /// Reads and runs lines until EOF or an interrupt. Errors are reported
    /// and forgotten so the session keeps going.
    pub fn run_prompt(&mut self) {
        let mut editor = DefaultEditor::new().expect("to be able to start a line editor");

        let history = home::home_dir().map(|dir| dir.join(".ember_history"));
        if let Some(history) = &history {
            let _ = editor.load_history(history);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());

                    self.run(&line);
                    error::reset_error();
                },
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("{error}");
                    break;
                },
            }
        }

        if let Some(history) = &history {
            let _ = editor.save_history(history);
        }
    }

    /// Prints the syntax tree of a script file instead of running it.
    pub fn print_ast_file(&mut self, path: &str) {
        let contents = fs::read_to_string(path)
            .expect("to be able to read the script file");

        self.print_ast(&contents);
    }

    /// Prints the syntax tree of a source string instead of running it.
    /// Exits with 65 if the source does not scan or parse.
    pub fn print_ast(&mut self, source: &str) {
        let tokens = Scanner::new(source).scan_tokens();
        if error::did_error() {
            process::exit(65);
        }

        let statements = Parser::new(tokens).parse();
        if error::did_error() {
            process::exit(65);
        }

        let mut printer = ASTPrinter;
        for statement in &statements {
            println!("{}", printer.print(statement));
        }
    }

    fn run(&mut self, source: &str) {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();

        if error::did_error() {
            return;
        }

        let mut parser = Parser::new(tokens);
        let statements = parser.parse();

        if error::did_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);

        if error::did_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }

    fn exit_on_error() {
        if error::did_error() {
            process::exit(65);
        }
        if error::did_runtime_error() {
            process::exit(70);
        }
    }
}
