use std::{
    cmp::Ordering,
    collections::HashMap,
    io::{BufRead, Write},
};

use rand::Rng;
use tracing::{debug, trace};

use crate::{
    binding::{
        binder::BoundProgram,
        bound_tree::{BoundBody, BoundExpression, BoundStatement},
        operators::{
            BoundBinaryOperator, BoundBinaryOperatorKind, BoundUnaryOperator,
            BoundUnaryOperatorKind,
        },
    },
    errors::errors::RuntimeError,
    symbols::{
        builtins::Builtin,
        symbols::{FunctionSymbol, SymbolId, TypeSymbol, VariableSymbol},
    },
    value::Value,
};

/// Runs a bound program. Globals live in a store owned by the caller so
/// they survive across REPL submissions; every call gets its own frame of
/// locals.
pub struct Evaluator<'a> {
    program: &'a BoundProgram,
    globals: &'a mut HashMap<SymbolId, Value>,
    locals: Vec<HashMap<SymbolId, Value>>,
    input: &'a mut dyn BufRead,
    output: &'a mut dyn Write,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        program: &'a BoundProgram,
        globals: &'a mut HashMap<SymbolId, Value>,
        input: &'a mut dyn BufRead,
        output: &'a mut dyn Write,
    ) -> Self {
        Evaluator {
            program,
            globals,
            // Top-level code runs in a frame of its own for synthetic locals
            locals: vec![HashMap::new()],
            input,
            output,
        }
    }

    /// Runs the top-level statements and returns the value of the last
    /// expression statement, if any.
    pub fn evaluate(&mut self) -> Result<Option<Value>, RuntimeError> {
        debug!(
            statements = self.program.statements.statements.len(),
            "evaluation started"
        );

        let program = self.program;
        let value = self.execute_body(&program.statements)?;
        self.output.flush()?;

        debug!(value = ?value, "evaluation finished");
        Ok(value)
    }

    fn execute_body(&mut self, body: &BoundBody) -> Result<Option<Value>, RuntimeError> {
        let statements = &body.statements;
        let mut last_value = None;
        let mut index = 0;

        while index < statements.len() {
            match &statements[index] {
                BoundStatement::VariableDeclaration {
                    variable,
                    initializer,
                } => {
                    let value = self.evaluate_expression(initializer)?;
                    self.assign(variable, value);
                    index += 1;
                }
                BoundStatement::Expression(expression) => {
                    last_value = self.evaluate_statement_expression(expression)?;
                    index += 1;
                }
                BoundStatement::Goto(label) => index = body.label_target(label),
                BoundStatement::ConditionalGoto {
                    label,
                    condition,
                    jump_if_true,
                } => {
                    let condition = self.evaluate_expression(condition)?.as_bool();
                    if condition == *jump_if_true {
                        index = body.label_target(label);
                    } else {
                        index += 1;
                    }
                }
                BoundStatement::Label(_) => index += 1,
                BoundStatement::Return(expression) => {
                    return match expression {
                        Some(expression) => Ok(Some(self.evaluate_expression(expression)?)),
                        None => Ok(None),
                    };
                }
                other => panic!("cannot evaluate unlowered statement {:?}", other),
            }
        }

        Ok(last_value)
    }

    /// Expression statements may call void functions, which yield nothing.
    fn evaluate_statement_expression(
        &mut self,
        expression: &BoundExpression,
    ) -> Result<Option<Value>, RuntimeError> {
        match expression {
            BoundExpression::Call {
                function,
                arguments,
            } => self.evaluate_call(function, arguments),
            other => self.evaluate_expression(other).map(Some),
        }
    }

    pub fn evaluate_expression(&mut self, expression: &BoundExpression) -> Result<Value, RuntimeError> {
        match expression {
            BoundExpression::Literal(value) => Ok(value.clone()),
            BoundExpression::Variable(variable) => Ok(self.lookup(variable)),
            BoundExpression::Assignment {
                variable,
                expression,
            } => {
                let value = self.evaluate_expression(expression)?;
                self.assign(variable, value.clone());
                Ok(value)
            }
            BoundExpression::Unary { operator, operand } => {
                let operand = self.evaluate_expression(operand)?;
                Ok(evaluate_unary(operator, operand))
            }
            BoundExpression::Binary {
                left,
                operator,
                right,
            } => {
                // Both sides are always evaluated, `&&` and `||` included
                let left = self.evaluate_expression(left)?;
                let right = self.evaluate_expression(right)?;
                evaluate_binary(operator, left, right)
            }
            BoundExpression::Call {
                function,
                arguments,
            } => match self.evaluate_call(function, arguments)? {
                Some(value) => Ok(value),
                None => panic!("void function '{}' used as a value", function.name),
            },
            BoundExpression::Conversion { ty, expression } => {
                let value = self.evaluate_expression(expression)?;
                convert(value, *ty)
            }
            BoundExpression::Error => panic!("cannot evaluate an error expression"),
        }
    }

    fn lookup(&self, variable: &VariableSymbol) -> Value {
        let store = if variable.is_global() {
            &*self.globals
        } else {
            self.locals.last().expect("there is always a frame")
        };

        match store.get(&variable.id) {
            Some(value) => value.clone(),
            None => panic!("variable '{}' has no value", variable.name),
        }
    }

    fn assign(&mut self, variable: &VariableSymbol, value: Value) {
        if variable.is_global() {
            self.globals.insert(variable.id, value);
        } else {
            self.locals
                .last_mut()
                .expect("there is always a frame")
                .insert(variable.id, value);
        }
    }

    fn evaluate_call(
        &mut self,
        function: &FunctionSymbol,
        arguments: &[BoundExpression],
    ) -> Result<Option<Value>, RuntimeError> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate_expression(argument)?);
        }

        if let Some(builtin) = function.builtin {
            return self.call_builtin(builtin, values);
        }

        let program = self.program;
        let bound = match program.function(function.id) {
            Some(bound) => bound,
            None => panic!("function '{}' has no body", function.name),
        };

        trace!(function = %function.name, depth = self.locals.len(), "calling function");

        let frame = function
            .parameters
            .iter()
            .zip(values)
            .map(|(parameter, value)| (parameter.id, value))
            .collect();

        self.locals.push(frame);
        let result = self.execute_body(&bound.body);
        self.locals.pop();

        // A void body's trailing expression is not a result
        match function.return_type {
            TypeSymbol::Void => result.map(|_| None),
            _ => result,
        }
    }

    fn call_builtin(
        &mut self,
        builtin: Builtin,
        arguments: Vec<Value>,
    ) -> Result<Option<Value>, RuntimeError> {
        let value = match builtin {
            Builtin::Print => {
                write!(self.output, "{}", arguments[0].as_str())?;
                self.output.flush()?;
                return Ok(None);
            }
            Builtin::Println => {
                writeln!(self.output, "{}", arguments[0].as_str())?;
                return Ok(None);
            }
            Builtin::Input => {
                self.output.flush()?;
                let mut line = String::new();
                self.input.read_line(&mut line)?;
                Value::String(line.trim_end_matches(&['\r', '\n'][..]).to_string())
            }
            Builtin::Random => {
                let (min, max) = (arguments[0].as_int(), arguments[1].as_int());
                match min.cmp(&max) {
                    Ordering::Greater => return Err(RuntimeError::EmptyRandomRange { min, max }),
                    Ordering::Equal => Value::Int(min),
                    Ordering::Less => Value::Int(rand::thread_rng().gen_range(min..max)),
                }
            }
            Builtin::Cos => Value::Float(arguments[0].as_float().cos()),
            Builtin::Sin => Value::Float(arguments[0].as_float().sin()),
            Builtin::Acos => Value::Float(arguments[0].as_float().acos()),
            Builtin::Floor => Value::Int(arguments[0].as_float().floor() as i32),
        };

        Ok(Some(value))
    }
}

fn evaluate_unary(operator: &BoundUnaryOperator, operand: Value) -> Value {
    match (operator.kind, operand) {
        (BoundUnaryOperatorKind::Identity, value) => value,
        (BoundUnaryOperatorKind::Negation, Value::Int(value)) => Value::Int(value.wrapping_neg()),
        (BoundUnaryOperatorKind::Negation, Value::Float(value)) => Value::Float(-value),
        (BoundUnaryOperatorKind::Negation, Value::Double(value)) => Value::Double(-value),
        (BoundUnaryOperatorKind::LogicalNegation, Value::Bool(value)) => Value::Bool(!value),
        (BoundUnaryOperatorKind::OnesComplement, Value::Int(value)) => Value::Int(!value),
        (kind, value) => panic!("unary {:?} cannot be applied to {:?}", kind, value),
    }
}

fn evaluate_binary(
    operator: &BoundBinaryOperator,
    left: Value,
    right: Value,
) -> Result<Value, RuntimeError> {
    use BoundBinaryOperatorKind::*;

    let value = match (operator.kind, left, right) {
        (Addition, Value::Int(l), Value::Int(r)) => Value::Int(l.wrapping_add(r)),
        (Addition, Value::Float(l), Value::Float(r)) => Value::Float(l + r),
        (Addition, Value::Double(l), Value::Double(r)) => Value::Double(l + r),
        (Addition, Value::String(l), Value::String(r)) => Value::String(l + &r),

        (Subtraction, Value::Int(l), Value::Int(r)) => Value::Int(l.wrapping_sub(r)),
        (Subtraction, Value::Float(l), Value::Float(r)) => Value::Float(l - r),
        (Subtraction, Value::Double(l), Value::Double(r)) => Value::Double(l - r),

        (Multiplication, Value::Int(l), Value::Int(r)) => Value::Int(l.wrapping_mul(r)),
        (Multiplication, Value::Float(l), Value::Float(r)) => Value::Float(l * r),
        (Multiplication, Value::Double(l), Value::Double(r)) => Value::Double(l * r),

        (Division | Modulo, Value::Int(_), Value::Int(0)) => return Err(RuntimeError::DivideByZero),
        (Division, Value::Int(l), Value::Int(r)) => Value::Int(l.wrapping_div(r)),
        (Division, Value::Float(l), Value::Float(r)) => Value::Float(l / r),
        (Division, Value::Double(l), Value::Double(r)) => Value::Double(l / r),

        (Modulo, Value::Int(l), Value::Int(r)) => Value::Int(l.wrapping_rem(r)),
        (Modulo, Value::Float(l), Value::Float(r)) => Value::Float(l % r),
        (Modulo, Value::Double(l), Value::Double(r)) => Value::Double(l % r),

        (LogicalAnd, Value::Bool(l), Value::Bool(r)) => Value::Bool(l && r),
        (LogicalOr, Value::Bool(l), Value::Bool(r)) => Value::Bool(l || r),

        (BitwiseAnd, Value::Int(l), Value::Int(r)) => Value::Int(l & r),
        (BitwiseAnd, Value::Bool(l), Value::Bool(r)) => Value::Bool(l & r),
        (BitwiseOr, Value::Int(l), Value::Int(r)) => Value::Int(l | r),
        (BitwiseOr, Value::Bool(l), Value::Bool(r)) => Value::Bool(l | r),
        (BitwiseXor, Value::Int(l), Value::Int(r)) => Value::Int(l ^ r),
        (BitwiseXor, Value::Bool(l), Value::Bool(r)) => Value::Bool(l ^ r),
        (LeftShift, Value::Int(l), Value::Int(r)) => Value::Int(l.wrapping_shl(r as u32)),
        (RightShift, Value::Int(l), Value::Int(r)) => Value::Int(l.wrapping_shr(r as u32)),

        (Equals, l, r) => Value::Bool(l == r),
        (NotEquals, l, r) => Value::Bool(l != r),

        (kind @ (Less | LessOrEquals | Greater | GreaterOrEquals), l, r) => {
            let ordering = match (&l, &r) {
                (Value::Int(l), Value::Int(r)) => l.partial_cmp(r),
                (Value::Float(l), Value::Float(r)) => l.partial_cmp(r),
                (Value::Double(l), Value::Double(r)) => l.partial_cmp(r),
                _ => panic!("{:?} cannot compare {:?} and {:?}", kind, l, r),
            };

            Value::Bool(match (kind, ordering) {
                (_, None) => false,
                (Less, Some(ordering)) => ordering == Ordering::Less,
                (LessOrEquals, Some(ordering)) => ordering != Ordering::Greater,
                (Greater, Some(ordering)) => ordering == Ordering::Greater,
                (_, Some(ordering)) => ordering != Ordering::Less,
            })
        }

        (kind, l, r) => panic!("binary {:?} cannot be applied to {:?} and {:?}", kind, l, r),
    };

    Ok(value)
}

/// Converts a runtime value to `ty`. Parsing a string is the only
/// conversion that can fail.
pub fn convert(value: Value, ty: TypeSymbol) -> Result<Value, RuntimeError> {
    let invalid = |value: &str| RuntimeError::InvalidConversion {
        value: value.to_string(),
        ty,
    };

    let converted = match (value, ty) {
        (value, ty) if value.ty() == ty => value,

        (Value::String(text), TypeSymbol::Bool) => {
            Value::Bool(text.trim().parse().map_err(|_| invalid(&text))?)
        }
        (Value::String(text), TypeSymbol::Int) => {
            Value::Int(text.trim().parse().map_err(|_| invalid(&text))?)
        }
        (Value::String(text), TypeSymbol::Float) => {
            Value::Float(text.trim().parse().map_err(|_| invalid(&text))?)
        }

        (Value::Int(value), TypeSymbol::Float) => Value::Float(value as f32),
        (Value::Int(value), TypeSymbol::Bool) => Value::Bool(value != 0),
        (Value::Float(value), TypeSymbol::Int) => Value::Int(value.round() as i32),

        (value, TypeSymbol::String) => Value::String(value.to_string()),

        (value, ty) => panic!("no conversion from {:?} to {}", value, ty),
    };

    Ok(converted)
}
