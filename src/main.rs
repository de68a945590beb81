use std::{
    collections::HashMap,
    fs::read_to_string,
    io::{self, Write},
    process,
    rc::Rc,
};

use clap::Parser as ClapParser;
use rhino::{
    compilation::Compilation,
    display_diagnostic,
    errors::errors::Diagnostic,
    init_tracing,
    parser::parser::SyntaxTree,
    symbols::symbols::SymbolId,
    value::Value,
};
use tracing::debug;

#[derive(ClapParser, Debug)]
#[command(name = "rhino", about = "Interpreter for the Rhino scripting language")]
struct Cli {
    /// Source files to run. Starts the REPL when none are given.
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Print the bound tree of the top-level code before running.
    #[arg(long = "show-tree")]
    show_tree: bool,

    /// Print the lowered program before running.
    #[arg(long = "show-program")]
    show_program: bool,

    /// Print the control flow graph of a function in Graphviz format.
    #[arg(long = "cfg", value_name = "FUNCTION")]
    cfg: Option<String>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let exit_code = if cli.files.is_empty() {
        run_repl(&cli)
    } else {
        run_files(&cli)
    };

    process::exit(exit_code);
}

fn run_files(cli: &Cli) -> i32 {
    let mut syntax_trees = vec![];

    for path in &cli.files {
        let text = match read_to_string(path) {
            Ok(text) => text,
            Err(error) => {
                eprintln!("error: cannot read '{}': {}", path, error);
                return 1;
            }
        };
        syntax_trees.push(SyntaxTree::parse(&text, Some(path.clone())));
    }

    debug!(files = syntax_trees.len(), "parsed input files");

    let compilation = Compilation::new(syntax_trees);
    let mut stdout = io::stdout();

    if let Err(error) = emit_requested(cli, &compilation, &mut stdout) {
        eprintln!("error: {}", error);
        return 1;
    }

    let mut globals = HashMap::new();
    match compilation.evaluate(&mut globals) {
        Ok(result) if result.diagnostics.is_empty() => 0,
        Ok(result) => {
            print_diagnostics(&result.diagnostics, compilation.syntax_trees());
            1
        }
        Err(error) => {
            eprintln!("runtime error: {}", error);
            1
        }
    }
}

fn emit_requested(cli: &Cli, compilation: &Compilation, out: &mut dyn Write) -> io::Result<()> {
    if cli.show_tree {
        compilation.emit_bound_tree(out)?;
    }

    if cli.show_program {
        compilation.emit_tree(out)?;
    }

    if let Some(name) = &cli.cfg {
        if !compilation.emit_control_flow_graph(name, out)? {
            eprintln!("error: function '{}' doesn't exist", name);
        }
    }

    Ok(())
}

fn print_diagnostics(diagnostics: &[Diagnostic], syntax_trees: &[SyntaxTree]) {
    let mut stderr = io::stderr();

    for diagnostic in diagnostics {
        let file = &diagnostic.get_position().1;
        let text = syntax_trees
            .iter()
            .find(|tree| tree.file == *file)
            .map(|tree| tree.text.as_str())
            .unwrap_or("");

        if let Err(error) = display_diagnostic(diagnostic, text, &mut stderr) {
            eprintln!("error: {}", error);
            return;
        }
    }
}

/// Interactive state carried from one submission to the next.
struct Repl {
    previous: Option<Rc<Compilation>>,
    globals: HashMap<SymbolId, Value>,
    show_tree: bool,
    show_program: bool,
}

impl Repl {
    fn new(cli: &Cli) -> Self {
        Repl {
            previous: None,
            globals: HashMap::new(),
            show_tree: cli.show_tree,
            show_program: cli.show_program,
        }
    }

    /// Handles `#command` lines. Returns `false` on `#exit`.
    fn run_meta_command(&mut self, command: &str) -> bool {
        match command {
            "#showTree" => {
                self.show_tree = !self.show_tree;
                println!(
                    "{}",
                    if self.show_tree { "Showing bound tree." } else { "Not showing bound tree." }
                );
            }
            "#showProgram" => {
                self.show_program = !self.show_program;
                println!(
                    "{}",
                    if self.show_program { "Showing lowered program." } else { "Not showing lowered program." }
                );
            }
            "#reset" => {
                self.previous = None;
                self.globals.clear();
                println!("Cleared all previous submissions.");
            }
            "#exit" => return false,
            other => eprintln!("error: unknown command '{}'", other),
        }

        true
    }

    fn evaluate_submission(&mut self, syntax_tree: SyntaxTree) {
        let compilation = match &self.previous {
            Some(previous) => Compilation::continue_with(Rc::clone(previous), syntax_tree),
            None => Compilation::new(vec![syntax_tree]),
        };

        let mut stdout = io::stdout();
        if self.show_tree {
            if let Err(error) = compilation.emit_bound_tree(&mut stdout) {
                eprintln!("error: {}", error);
            }
        }
        if self.show_program {
            if let Err(error) = compilation.emit_tree(&mut stdout) {
                eprintln!("error: {}", error);
            }
        }

        // Writes land in a copy that is kept only if the submission succeeds
        let mut globals = self.globals.clone();
        match compilation.evaluate(&mut globals) {
            Ok(result) if result.diagnostics.is_empty() => {
                if let Some(value) = result.value {
                    println!("{}", value);
                }
                self.globals = globals;
                self.previous = Some(Rc::new(compilation));
            }
            Ok(result) => print_diagnostics(&result.diagnostics, compilation.syntax_trees()),
            Err(error) => eprintln!("runtime error: {}", error),
        }
    }
}

fn run_repl(cli: &Cli) -> i32 {
    let mut repl = Repl::new(cli);
    let mut text = String::new();

    loop {
        print!("{} ", if text.is_empty() { "»" } else { "·" });
        if io::stdout().flush().is_err() {
            return 1;
        }

        // Stdin is not held between lines; `input()` locks it while a
        // submission runs
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => return 0,
            Ok(_) => {}
            Err(error) => {
                eprintln!("error: {}", error);
                return 1;
            }
        }
        let line = line.trim_end_matches(&['\r', '\n'][..]);

        if text.is_empty() {
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with('#') {
                if !repl.run_meta_command(line.trim()) {
                    return 0;
                }
                continue;
            }
        }

        let is_blank = line.trim().is_empty();
        text.push_str(line);
        text.push('\n');

        let syntax_tree = SyntaxTree::parse(&text, None);

        // Keep reading while the submission is unfinished, unless the user
        // forces it with an empty line
        if !is_blank && syntax_tree.is_incomplete() {
            continue;
        }

        repl.evaluate_submission(syntax_tree);
        text.clear();
    }
}
