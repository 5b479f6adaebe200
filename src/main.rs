use std::io;

use clap::Parser;

use ember_lang::Ember;

/// Tree-walk interpreter for the Lox scripting language.
#[derive(Parser)]
#[command(name = "ember", version, about)]
struct Cli {
    /// Script file to run. Omit it to get an interactive prompt.
    script: Option<String>,

    /// Evaluate the given source string instead of a script file.
    #[arg(short = 'c', long = "command", value_name = "SOURCE", conflicts_with = "script", allow_hyphen_values = true)]
    command: Option<String>,

    /// Print the syntax tree instead of executing.
    #[arg(long)]
    ast: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut stdout = io::stdout();
    let mut ember = Ember::new(&mut stdout);

    match (&cli.script, &cli.command) {
        (Some(path), _) => {
            if cli.ast {
                ember.print_ast_file(path);
            } else {
                ember.run_file(path);
            }
        },
        (None, Some(source)) => {
            if cli.ast {
                ember.print_ast(source);
            } else {
                ember.run_command(source);
            }
        },
        (None, None) => ember.run_prompt(),
    }
}
