//! Compilation driver tying the stages together.
//!
//! A `Compilation` owns one or more syntax trees and optionally continues
//! an earlier compilation, which is how the REPL keeps declarations from
//! previous submissions visible.

use std::{
    cell::OnceCell,
    collections::HashMap,
    io::{self, BufRead, Write},
    rc::Rc,
};

use crate::{
    binding::{
        binder::{bind_global_scope, bind_program, BoundProgram, GlobalScope},
        bound_tree::{BoundNode, BoundStatement},
        printer::write_tree,
    },
    control_flow::control_flow::ControlFlowGraph,
    errors::errors::{Diagnostic, RuntimeError},
    evaluator::evaluator::Evaluator,
    parser::parser::SyntaxTree,
    symbols::symbols::{Symbol, SymbolId},
    value::Value,
};

/// Outcome of [`Compilation::evaluate`]. When `diagnostics` is not empty
/// nothing ran and `value` is `None`.
#[derive(Debug)]
pub struct EvaluationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub value: Option<Value>,
}

#[derive(Debug)]
pub struct Compilation {
    previous: Option<Rc<Compilation>>,
    syntax_trees: Vec<SyntaxTree>,
    global_scope: OnceCell<Rc<GlobalScope>>,
}

impl Compilation {
    pub fn new(syntax_trees: Vec<SyntaxTree>) -> Self {
        Compilation {
            previous: None,
            syntax_trees,
            global_scope: OnceCell::new(),
        }
    }

    /// A compilation that sees everything `previous` declared.
    pub fn continue_with(previous: Rc<Compilation>, syntax_tree: SyntaxTree) -> Self {
        Compilation {
            previous: Some(previous),
            syntax_trees: vec![syntax_tree],
            global_scope: OnceCell::new(),
        }
    }

    pub fn previous(&self) -> Option<&Rc<Compilation>> {
        self.previous.as_ref()
    }

    pub fn syntax_trees(&self) -> &[SyntaxTree] {
        &self.syntax_trees
    }

    /// Binds the global scope on first use; later calls return the same
    /// scope.
    pub fn global_scope(&self) -> Rc<GlobalScope> {
        let scope = self.global_scope.get_or_init(|| {
            let previous = self
                .previous
                .as_ref()
                .map(|previous| previous.global_scope());
            let units: Vec<_> = self.syntax_trees.iter().map(|tree| &tree.root).collect();

            Rc::new(bind_global_scope(previous, &units))
        });

        Rc::clone(scope)
    }

    /// Binds every function body and lowers the whole program.
    pub fn program(&self) -> BoundProgram {
        bind_program(&self.global_scope())
    }

    /// Syntax diagnostics first, then binding diagnostics.
    pub fn diagnostics(&self, program: &BoundProgram) -> Vec<Diagnostic> {
        self.syntax_trees
            .iter()
            .flat_map(|tree| tree.diagnostics.iter().cloned())
            .chain(program.diagnostics.iter().cloned())
            .collect()
    }

    /// Evaluates against the process's standard input and output.
    pub fn evaluate(
        &self,
        globals: &mut HashMap<SymbolId, Value>,
    ) -> Result<EvaluationResult, RuntimeError> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();

        self.evaluate_with(globals, &mut input, &mut output)
    }

    /// Runs the program if it has no diagnostics. `globals` holds the
    /// values of global variables and is updated in place.
    pub fn evaluate_with(
        &self,
        globals: &mut HashMap<SymbolId, Value>,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> Result<EvaluationResult, RuntimeError> {
        let program = self.program();
        let diagnostics = self.diagnostics(&program);

        if !diagnostics.is_empty() {
            return Ok(EvaluationResult {
                diagnostics,
                value: None,
            });
        }

        let value = Evaluator::new(&program, globals, input, output).evaluate()?;

        Ok(EvaluationResult {
            diagnostics,
            value,
        })
    }

    /// Writes the lowered program: every function, then the top-level code.
    pub fn emit_tree(&self, writer: &mut dyn Write) -> io::Result<()> {
        let program = self.program();

        for function in &program.functions {
            writeln!(writer, "{}", Symbol::Function(Rc::clone(&function.symbol)))?;
            write!(
                writer,
                "{}",
                BoundStatement::Block(function.body.statements.clone())
            )?;
        }

        write!(
            writer,
            "{}",
            BoundStatement::Block(program.statements.statements.clone())
        )
    }

    /// Writes the node structure of the lowered top-level code.
    pub fn emit_bound_tree(&self, writer: &mut dyn Write) -> io::Result<()> {
        let program = self.program();
        let root = BoundStatement::Block(program.statements.statements.clone());
        write_tree(writer, BoundNode::Statement(&root))
    }

    /// Writes the Graphviz graph of the function called `name`. Returns
    /// `false` when there is no such function.
    pub fn emit_control_flow_graph(&self, name: &str, writer: &mut dyn Write) -> io::Result<bool> {
        let program = self.program();

        match program.function_by_name(name) {
            Some(function) => {
                ControlFlowGraph::create(&function.body.statements).write_to(writer)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
