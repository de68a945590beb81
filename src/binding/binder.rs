use std::{collections::HashSet, rc::Rc};

use tracing::debug;

use crate::{
    ast::{
        ast::{CompilationUnit, FunctionDecl, TypeClause},
        expressions::{AssignmentExpr, BinaryExpr, CallExpr, Expr, NameExpr, UnaryExpr},
        statements::{ForStmt, IfStmt, ReturnStmt, Stmt, VarDeclStmt, WhileStmt},
    },
    control_flow::control_flow::ControlFlowGraph,
    errors::errors::{Diagnostic, DiagnosticBag},
    lexer::tokens::Token,
    lowering::lowerer::lower,
    symbols::{
        builtins::builtin_functions,
        symbols::{FunctionSymbol, Symbol, SymbolId, TypeSymbol, VariableKind, VariableSymbol},
    },
    Span,
};

use super::{
    bound_tree::{BoundBody, BoundExpression, BoundStatement, Label},
    conversion::Conversion,
    operators::{BoundBinaryOperator, BoundUnaryOperator},
    scope::ScopeStack,
};

/// Everything declared at the top level of one submission, plus the
/// submissions it continues.
#[derive(Debug)]
pub struct GlobalScope {
    pub previous: Option<Rc<GlobalScope>>,
    pub diagnostics: Vec<Diagnostic>,
    pub functions: Vec<Rc<FunctionSymbol>>,
    pub variables: Vec<Rc<VariableSymbol>>,
    pub statements: Vec<BoundStatement>,
}

/// A function together with its lowered body.
#[derive(Debug)]
pub struct BoundFunction {
    pub symbol: Rc<FunctionSymbol>,
    pub body: BoundBody,
}

/// The fully bound and lowered program, ready to evaluate.
#[derive(Debug)]
pub struct BoundProgram {
    pub diagnostics: Vec<Diagnostic>,
    pub functions: Vec<BoundFunction>,
    pub statements: BoundBody,
}

impl BoundProgram {
    pub fn function(&self, id: SymbolId) -> Option<&BoundFunction> {
        self.functions
            .iter()
            .find(|function| function.symbol.id == id)
    }

    pub fn function_by_name(&self, name: &str) -> Option<&BoundFunction> {
        // Latest declaration wins when a submission redeclares a name
        self.functions
            .iter()
            .find(|function| function.symbol.name == name)
    }
}

#[derive(Debug)]
pub struct Binder {
    pub diagnostics: DiagnosticBag,
    pub scopes: ScopeStack,
    /// Function whose body is being bound, `None` at the top level.
    pub function: Option<Rc<FunctionSymbol>>,
    /// (break, continue) targets of the enclosing loops, innermost last.
    pub loop_stack: Vec<(Label, Label)>,
    pub label_count: usize,
}

impl Binder {
    /// Creates a binder whose scopes are the built-ins, then one level per
    /// submission in `previous` (oldest first), then a fresh level for the
    /// code being bound.
    pub fn new(previous: Option<&Rc<GlobalScope>>, function: Option<Rc<FunctionSymbol>>) -> Self {
        let mut scopes = ScopeStack::new();
        scopes.push();
        for builtin in builtin_functions() {
            scopes.try_declare(Symbol::Function(builtin));
        }

        let mut chain = vec![];
        let mut current = previous;
        while let Some(scope) = current {
            chain.push(scope);
            current = scope.previous.as_ref();
        }

        for scope in chain.into_iter().rev() {
            scopes.push();
            for function in &scope.functions {
                scopes.try_declare(Symbol::Function(Rc::clone(function)));
            }
            for variable in &scope.variables {
                scopes.try_declare(Symbol::Variable(Rc::clone(variable)));
            }
        }

        scopes.push();

        Binder {
            diagnostics: DiagnosticBag::new(),
            scopes,
            function,
            loop_stack: vec![],
            label_count: 0,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push();
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn variable_kind(&self) -> VariableKind {
        match self.function {
            Some(_) => VariableKind::Local,
            None => VariableKind::Global,
        }
    }
}

/// Binds every function signature and top-level statement of `units`.
/// Function bodies are bound later by [`bind_program`].
pub fn bind_global_scope(
    previous: Option<Rc<GlobalScope>>,
    units: &[&CompilationUnit],
) -> GlobalScope {
    let mut binder = Binder::new(previous.as_ref(), None);

    for unit in units {
        for function in unit.functions() {
            bind_function_declaration(&mut binder, function);
        }
    }

    let mut statements = vec![];
    for unit in units {
        for statement in unit.global_statements() {
            statements.push(bind_stmt(&mut binder, statement));
        }
    }

    let functions = binder.scopes.current().functions();
    let variables = binder.scopes.current().variables();
    let diagnostics = binder.diagnostics.into_vec();

    debug!(
        functions = functions.len(),
        variables = variables.len(),
        statements = statements.len(),
        diagnostics = diagnostics.len(),
        "bound global scope"
    );

    GlobalScope {
        previous,
        diagnostics,
        functions,
        variables,
        statements,
    }
}

/// Binds and lowers every function body visible from `global_scope`, and
/// lowers its top-level statements. Each body resolves names against the
/// submission that declared it, so later redeclarations don't reach it.
pub fn bind_program(global_scope: &Rc<GlobalScope>) -> BoundProgram {
    let mut diagnostics = DiagnosticBag::new();
    diagnostics.extend(global_scope.diagnostics.iter().cloned());

    let mut functions = vec![];
    let mut current = Some(global_scope);

    while let Some(scope) = current {
        for function in &scope.functions {
            let declaration = match &function.declaration {
                Some(declaration) => Rc::clone(declaration),
                None => continue,
            };

            let mut binder = Binder::new(Some(scope), Some(Rc::clone(function)));
            for parameter in &function.parameters {
                binder
                    .scopes
                    .try_declare(Symbol::Variable(Rc::clone(parameter)));
            }

            let body = bind_block(&mut binder, &declaration.body.body);
            let lowered = lower(body);

            if function.return_type != TypeSymbol::Void
                && function.return_type != TypeSymbol::Error
                && !ControlFlowGraph::all_paths_return(&lowered)
            {
                binder
                    .diagnostics
                    .report_all_paths_must_return(&declaration.identifier.span, &function.name);
            }

            debug!(
                function = %function.name,
                statements = lowered.len(),
                diagnostics = binder.diagnostics.len(),
                "bound function body"
            );

            diagnostics.extend(binder.diagnostics);
            functions.push(BoundFunction {
                symbol: Rc::clone(function),
                body: BoundBody::new(lowered),
            });
        }

        current = scope.previous.as_ref();
    }

    let statements = lower(BoundStatement::Block(global_scope.statements.clone()));

    BoundProgram {
        diagnostics: diagnostics.into_vec(),
        functions,
        statements: BoundBody::new(statements),
    }
}

pub fn bind_function_declaration(binder: &mut Binder, declaration: &Rc<FunctionDecl>) {
    let mut parameters = vec![];
    let mut seen = HashSet::new();

    for parameter in &declaration.parameters {
        let name = &parameter.identifier.value;
        let ty = bind_type_clause(binder, Some(&parameter.type_clause)).unwrap_or(TypeSymbol::Error);

        if !seen.insert(name.clone()) {
            binder
                .diagnostics
                .report_parameter_already_declared(&parameter.span, name);
        } else {
            parameters.push(VariableSymbol::new(name, true, ty, VariableKind::Parameter));
        }
    }

    let return_type =
        bind_type_clause(binder, declaration.type_clause.as_ref()).unwrap_or(TypeSymbol::Void);

    let function = FunctionSymbol::new(
        &declaration.identifier.value,
        parameters,
        return_type,
        Some(Rc::clone(declaration)),
    );

    if !binder.scopes.try_declare(Symbol::Function(function)) {
        binder.diagnostics.report_symbol_already_declared(
            &declaration.identifier.span,
            &declaration.identifier.value,
        );
    }
}

/// Resolves an optional `: type` clause. An unknown name is reported and
/// resolves to the error type.
fn bind_type_clause(binder: &mut Binder, clause: Option<&TypeClause>) -> Option<TypeSymbol> {
    let clause = clause?;

    match TypeSymbol::lookup(&clause.identifier.value) {
        Some(ty) => Some(ty),
        None => {
            binder
                .diagnostics
                .report_undefined_type(&clause.identifier.span, &clause.identifier.value);
            Some(TypeSymbol::Error)
        }
    }
}

// STATEMENTS

pub fn bind_stmt(binder: &mut Binder, stmt: &Stmt) -> BoundStatement {
    match stmt {
        Stmt::Block(block) => bind_block(binder, &block.body),
        Stmt::VarDecl(decl) => bind_var_decl_stmt(binder, decl),
        Stmt::If(stmt) => bind_if_stmt(binder, stmt),
        Stmt::While(stmt) => bind_while_stmt(binder, stmt),
        Stmt::For(stmt) => bind_for_stmt(binder, stmt),
        Stmt::Break(keyword) => bind_loop_jump(binder, keyword, true),
        Stmt::Continue(keyword) => bind_loop_jump(binder, keyword, false),
        Stmt::Return(stmt) => bind_return_stmt(binder, stmt),
        Stmt::Expression(stmt) => {
            BoundStatement::Expression(bind_expression_internal(binder, &stmt.expression, true))
        }
    }
}

fn bind_block(binder: &mut Binder, body: &[Stmt]) -> BoundStatement {
    binder.push_scope();
    let statements = body.iter().map(|stmt| bind_stmt(binder, stmt)).collect();
    binder.pop_scope();

    BoundStatement::Block(statements)
}

fn bind_var_decl_stmt(binder: &mut Binder, decl: &VarDeclStmt) -> BoundStatement {
    let ty = bind_type_clause(binder, decl.type_clause.as_ref());
    let initializer = bind_expression(binder, &decl.initializer);
    let variable_type = ty.unwrap_or_else(|| initializer.ty());

    let variable = bind_variable(binder, &decl.identifier, decl.is_read_only(), variable_type);
    let initializer = bind_conversion(
        binder,
        decl.initializer.get_span(),
        initializer,
        variable_type,
        false,
    );

    BoundStatement::VariableDeclaration {
        variable,
        initializer,
    }
}

/// Creates a variable symbol and declares it in the current scope,
/// reporting a clash with an existing name at the same level.
fn bind_variable(
    binder: &mut Binder,
    identifier: &Token,
    is_read_only: bool,
    ty: TypeSymbol,
) -> Rc<VariableSymbol> {
    let kind = binder.variable_kind();
    let variable = VariableSymbol::new(&identifier.value, is_read_only, ty, kind);

    if !binder
        .scopes
        .try_declare(Symbol::Variable(Rc::clone(&variable)))
    {
        binder
            .diagnostics
            .report_symbol_already_declared(&identifier.span, &identifier.value);
    }

    variable
}

fn bind_if_stmt(binder: &mut Binder, stmt: &IfStmt) -> BoundStatement {
    let condition = bind_expression_with_type(binder, &stmt.condition, TypeSymbol::Bool);
    let then_statement = bind_stmt(binder, &stmt.then_body);
    let else_statement = stmt
        .else_body
        .as_ref()
        .map(|else_body| Box::new(bind_stmt(binder, else_body)));

    BoundStatement::If {
        condition,
        then_statement: Box::new(then_statement),
        else_statement,
    }
}

fn bind_while_stmt(binder: &mut Binder, stmt: &WhileStmt) -> BoundStatement {
    let condition = bind_expression_with_type(binder, &stmt.condition, TypeSymbol::Bool);
    let (body, break_label, continue_label) = bind_loop_body(binder, &stmt.body);

    BoundStatement::While {
        condition,
        body: Box::new(body),
        break_label,
        continue_label,
    }
}

fn bind_for_stmt(binder: &mut Binder, stmt: &ForStmt) -> BoundStatement {
    let lower_bound = bind_expression_with_type(binder, &stmt.lower_bound, TypeSymbol::Int);
    let upper_bound = bind_expression_with_type(binder, &stmt.upper_bound, TypeSymbol::Int);

    binder.push_scope();
    let variable = bind_variable(binder, &stmt.identifier, true, TypeSymbol::Int);
    let (body, break_label, continue_label) = bind_loop_body(binder, &stmt.body);
    binder.pop_scope();

    BoundStatement::For {
        variable,
        lower_bound,
        upper_bound,
        body: Box::new(body),
        break_label,
        continue_label,
    }
}

fn bind_loop_body(binder: &mut Binder, body: &Stmt) -> (BoundStatement, Label, Label) {
    binder.label_count += 1;
    let break_label = Label::new(&format!("break{}", binder.label_count));
    let continue_label = Label::new(&format!("continue{}", binder.label_count));

    binder
        .loop_stack
        .push((break_label.clone(), continue_label.clone()));
    let body = bind_stmt(binder, body);
    binder.loop_stack.pop();

    (body, break_label, continue_label)
}

/// `break` and `continue` become plain jumps to the innermost loop's
/// labels. Outside a loop they are reported and replaced by an inert
/// statement.
fn bind_loop_jump(binder: &mut Binder, keyword: &Token, is_break: bool) -> BoundStatement {
    match binder.loop_stack.last() {
        Some((break_label, continue_label)) => {
            let label = if is_break { break_label } else { continue_label };
            BoundStatement::Goto(label.clone())
        }
        None => {
            binder
                .diagnostics
                .report_invalid_break_or_continue(&keyword.span, &keyword.value);
            BoundStatement::Expression(BoundExpression::Error)
        }
    }
}

fn bind_return_stmt(binder: &mut Binder, stmt: &ReturnStmt) -> BoundStatement {
    let expression = stmt
        .value
        .as_ref()
        .map(|value| bind_expression(binder, value));

    let function = match &binder.function {
        Some(function) => Rc::clone(function),
        None => {
            binder.diagnostics.report_invalid_return(&stmt.keyword.span);
            return BoundStatement::Return(expression);
        }
    };

    if function.return_type == TypeSymbol::Void {
        if let Some(value) = &stmt.value {
            binder
                .diagnostics
                .report_invalid_return_expression(value.get_span(), &function.name);
        }
        return BoundStatement::Return(expression);
    }

    match (expression, &stmt.value) {
        (Some(expression), Some(value)) => BoundStatement::Return(Some(bind_conversion(
            binder,
            value.get_span(),
            expression,
            function.return_type,
            false,
        ))),
        _ => {
            binder
                .diagnostics
                .report_missing_return_expression(&stmt.keyword.span, &function.name);
            BoundStatement::Return(None)
        }
    }
}

// EXPRESSIONS

/// Binds an expression that must produce a value.
pub fn bind_expression(binder: &mut Binder, expr: &Expr) -> BoundExpression {
    bind_expression_internal(binder, expr, false)
}

fn bind_expression_internal(binder: &mut Binder, expr: &Expr, can_be_void: bool) -> BoundExpression {
    let result = match expr {
        Expr::Literal(literal) => BoundExpression::Literal(literal.value.clone()),
        Expr::Name(name) => bind_name_expr(binder, name),
        Expr::Unary(unary) => bind_unary_expr(binder, unary),
        Expr::Binary(binary) => bind_binary_expr(binder, binary),
        Expr::Parenthesized(inner) => bind_expression(binder, &inner.expression),
        Expr::Assignment(assignment) => bind_assignment_expr(binder, assignment),
        Expr::Call(call) => bind_call_expr(binder, call),
    };

    if !can_be_void && result.ty() == TypeSymbol::Void {
        binder
            .diagnostics
            .report_expression_must_have_value(expr.get_span());
        return BoundExpression::Error;
    }

    result
}

fn bind_expression_with_type(binder: &mut Binder, expr: &Expr, ty: TypeSymbol) -> BoundExpression {
    let expression = bind_expression(binder, expr);
    bind_conversion(binder, expr.get_span(), expression, ty, false)
}

/// Converts `expression` to `ty`, wrapping it in a conversion node when
/// needed. Explicit conversions are only silent when `allow_explicit` is
/// set, i.e. inside a conversion call.
fn bind_conversion(
    binder: &mut Binder,
    span: &Span,
    expression: BoundExpression,
    ty: TypeSymbol,
    allow_explicit: bool,
) -> BoundExpression {
    let from = expression.ty();
    let conversion = Conversion::classify(from, ty);

    if !conversion.exists() {
        if from != TypeSymbol::Error && ty != TypeSymbol::Error {
            binder.diagnostics.report_cannot_convert(span, from, ty);
        }
        return BoundExpression::Error;
    }

    if !allow_explicit && conversion.is_explicit() {
        binder
            .diagnostics
            .report_cannot_convert_implicitly(span, from, ty);
    }

    if conversion.is_identity() {
        return expression;
    }

    BoundExpression::Conversion {
        ty,
        expression: Box::new(expression),
    }
}

/// Resolves `identifier` to a variable, reporting names that are missing
/// or that belong to something other than a variable.
fn bind_variable_reference(binder: &mut Binder, identifier: &Token) -> Option<Rc<VariableSymbol>> {
    match binder.scopes.try_lookup(&identifier.value) {
        Some(Symbol::Variable(variable)) => Some(Rc::clone(variable)),
        Some(_) => {
            binder
                .diagnostics
                .report_not_a_variable(&identifier.span, &identifier.value);
            None
        }
        None => {
            binder
                .diagnostics
                .report_undefined_variable(&identifier.span, &identifier.value);
            None
        }
    }
}

fn bind_name_expr(binder: &mut Binder, name: &NameExpr) -> BoundExpression {
    match bind_variable_reference(binder, &name.identifier) {
        Some(variable) => BoundExpression::Variable(variable),
        None => BoundExpression::Error,
    }
}

fn bind_assignment_expr(binder: &mut Binder, assignment: &AssignmentExpr) -> BoundExpression {
    let expression = bind_expression(binder, &assignment.value);

    let variable = match bind_variable_reference(binder, &assignment.identifier) {
        Some(variable) => variable,
        None => return expression,
    };

    if variable.is_read_only {
        binder
            .diagnostics
            .report_cannot_assign(&assignment.identifier.span, &variable.name);
    }

    let expression = bind_conversion(
        binder,
        assignment.value.get_span(),
        expression,
        variable.ty,
        false,
    );

    BoundExpression::Assignment {
        variable,
        expression: Box::new(expression),
    }
}

fn bind_unary_expr(binder: &mut Binder, unary: &UnaryExpr) -> BoundExpression {
    let operand = bind_expression(binder, &unary.operand);

    if operand.ty() == TypeSymbol::Error {
        return BoundExpression::Error;
    }

    match BoundUnaryOperator::bind(unary.operator.kind, operand.ty()) {
        Some(operator) => BoundExpression::Unary {
            operator,
            operand: Box::new(operand),
        },
        None => {
            binder.diagnostics.report_undefined_unary_operator(
                &unary.operator.span,
                &unary.operator.value,
                operand.ty(),
            );
            BoundExpression::Error
        }
    }
}

fn bind_binary_expr(binder: &mut Binder, binary: &BinaryExpr) -> BoundExpression {
    let left = bind_expression(binder, &binary.left);
    let right = bind_expression(binder, &binary.right);

    if left.ty() == TypeSymbol::Error || right.ty() == TypeSymbol::Error {
        return BoundExpression::Error;
    }

    match BoundBinaryOperator::bind(binary.operator.kind, left.ty(), right.ty()) {
        Some(operator) => BoundExpression::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        },
        None => {
            binder.diagnostics.report_undefined_binary_operator(
                &binary.operator.span,
                &binary.operator.value,
                left.ty(),
                right.ty(),
            );
            BoundExpression::Error
        }
    }
}

fn bind_call_expr(binder: &mut Binder, call: &CallExpr) -> BoundExpression {
    // `int(x)`, `string(x)`, ... are explicit conversions
    if call.arguments.len() == 1 {
        if let Some(ty) = TypeSymbol::lookup(&call.identifier.value) {
            let argument = &call.arguments[0];
            let expression = bind_expression(binder, argument);
            return bind_conversion(binder, argument.get_span(), expression, ty, true);
        }
    }

    let arguments: Vec<BoundExpression> = call
        .arguments
        .iter()
        .map(|argument| bind_expression(binder, argument))
        .collect();

    let function = match binder.scopes.try_lookup(&call.identifier.value) {
        Some(Symbol::Function(function)) => Rc::clone(function),
        Some(_) => {
            binder
                .diagnostics
                .report_not_a_function(&call.identifier.span, &call.identifier.value);
            return BoundExpression::Error;
        }
        None => {
            binder
                .diagnostics
                .report_undefined_function(&call.identifier.span, &call.identifier.value);
            return BoundExpression::Error;
        }
    };

    let expected = function.parameters.len();
    if arguments.len() != expected {
        let span = if arguments.len() > expected {
            let first = call.arguments[expected].get_span();
            let last = call.arguments[call.arguments.len() - 1].get_span();
            first.to(last)
        } else {
            call.close_paren.span.clone()
        };

        binder.diagnostics.report_wrong_argument_count(
            &span,
            &function.name,
            expected,
            arguments.len(),
        );
        return BoundExpression::Error;
    }

    let mut has_errors = false;
    let mut converted = Vec::with_capacity(arguments.len());

    for ((argument, syntax), parameter) in arguments
        .into_iter()
        .zip(&call.arguments)
        .zip(&function.parameters)
    {
        let from = argument.ty();
        if from == TypeSymbol::Error {
            has_errors = true;
            continue;
        }

        let conversion = Conversion::classify(from, parameter.ty);
        if conversion.is_identity() {
            converted.push(argument);
        } else if conversion.is_implicit() {
            converted.push(BoundExpression::Conversion {
                ty: parameter.ty,
                expression: Box::new(argument),
            });
        } else {
            if parameter.ty != TypeSymbol::Error {
                binder.diagnostics.report_wrong_argument_type(
                    syntax.get_span(),
                    &parameter.name,
                    parameter.ty,
                    from,
                );
            }
            has_errors = true;
        }
    }

    if has_errors {
        return BoundExpression::Error;
    }

    BoundExpression::Call {
        function,
        arguments: converted,
    }
}
