use std::{
    fmt::Display,
    rc::Rc,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::ast::ast::FunctionDecl;

use super::builtins::Builtin;

/// Identity of a variable or function symbol. The evaluator keys its
/// variable stores and function table on it.
pub type SymbolId = u32;

static NEXT_SYMBOL_ID: AtomicU32 = AtomicU32::new(1);

fn next_symbol_id() -> SymbolId {
    NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSymbol {
    Int,
    Bool,
    String,
    Float,
    Double,
    Void,
    /// A type that failed to resolve. Anything of this type has already
    /// been reported.
    Error,
}

impl TypeSymbol {
    pub fn name(&self) -> &'static str {
        match self {
            TypeSymbol::Int => "int",
            TypeSymbol::Bool => "bool",
            TypeSymbol::String => "string",
            TypeSymbol::Float => "float",
            TypeSymbol::Double => "double",
            TypeSymbol::Void => "void",
            TypeSymbol::Error => "?",
        }
    }

    /// Resolves a type name written in source. `?` is never a valid name.
    pub fn lookup(name: &str) -> Option<TypeSymbol> {
        match name {
            "int" => Some(TypeSymbol::Int),
            "bool" => Some(TypeSymbol::Bool),
            "string" => Some(TypeSymbol::String),
            "float" => Some(TypeSymbol::Float),
            "double" => Some(TypeSymbol::Double),
            "void" => Some(TypeSymbol::Void),
            _ => None,
        }
    }

    pub fn all() -> [TypeSymbol; 7] {
        [
            TypeSymbol::Int,
            TypeSymbol::Bool,
            TypeSymbol::String,
            TypeSymbol::Float,
            TypeSymbol::Double,
            TypeSymbol::Void,
            TypeSymbol::Error,
        ]
    }
}

impl Display for TypeSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Global,
    Local,
    Parameter,
}

#[derive(Debug)]
pub struct VariableSymbol {
    pub id: SymbolId,
    pub name: String,
    pub is_read_only: bool,
    pub ty: TypeSymbol,
    pub kind: VariableKind,
}

impl VariableSymbol {
    pub fn new(name: &str, is_read_only: bool, ty: TypeSymbol, kind: VariableKind) -> Rc<Self> {
        Rc::new(VariableSymbol {
            id: next_symbol_id(),
            name: name.to_string(),
            is_read_only,
            ty,
            kind,
        })
    }

    pub fn is_global(&self) -> bool {
        self.kind == VariableKind::Global
    }
}

#[derive(Debug)]
pub struct FunctionSymbol {
    pub id: SymbolId,
    pub name: String,
    pub parameters: Vec<Rc<VariableSymbol>>,
    pub return_type: TypeSymbol,
    /// Source declaration; `None` for built-ins.
    pub declaration: Option<Rc<FunctionDecl>>,
    pub builtin: Option<Builtin>,
}

impl FunctionSymbol {
    pub fn new(
        name: &str,
        parameters: Vec<Rc<VariableSymbol>>,
        return_type: TypeSymbol,
        declaration: Option<Rc<FunctionDecl>>,
    ) -> Rc<Self> {
        Rc::new(FunctionSymbol {
            id: next_symbol_id(),
            name: name.to_string(),
            parameters,
            return_type,
            declaration,
            builtin: None,
        })
    }

    pub(crate) fn new_builtin(
        builtin: Builtin,
        parameters: &[(&str, TypeSymbol)],
        return_type: TypeSymbol,
    ) -> Rc<Self> {
        let parameters = parameters
            .iter()
            .map(|(name, ty)| VariableSymbol::new(name, true, *ty, VariableKind::Parameter))
            .collect();

        Rc::new(FunctionSymbol {
            id: next_symbol_id(),
            name: builtin.name().to_string(),
            parameters,
            return_type,
            declaration: None,
            builtin: Some(builtin),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Type,
    Function,
    Parameter,
    GlobalVariable,
    LocalVariable,
}

#[derive(Debug, Clone)]
pub enum Symbol {
    Type(TypeSymbol),
    Variable(Rc<VariableSymbol>),
    Function(Rc<FunctionSymbol>),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Type(ty) => ty.name(),
            Symbol::Variable(variable) => &variable.name,
            Symbol::Function(function) => &function.name,
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Type(_) => SymbolKind::Type,
            Symbol::Function(_) => SymbolKind::Function,
            Symbol::Variable(variable) => match variable.kind {
                VariableKind::Global => SymbolKind::GlobalVariable,
                VariableKind::Local => SymbolKind::LocalVariable,
                VariableKind::Parameter => SymbolKind::Parameter,
            },
        }
    }
}

/// Renders a symbol the way it would be written in source.
impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Type(ty) => write!(f, "{}", ty),
            Symbol::Variable(variable) => match variable.kind {
                VariableKind::Parameter => write!(f, "{}: {}", variable.name, variable.ty),
                _ => {
                    let keyword = if variable.is_read_only { "let" } else { "var" };
                    write!(f, "{} {}: {}", keyword, variable.name, variable.ty)
                }
            },
            Symbol::Function(function) => {
                write!(f, "function {}(", function.name)?;
                for (i, parameter) in function.parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", parameter.name, parameter.ty)?;
                }
                write!(f, ")")?;
                if function.return_type != TypeSymbol::Void {
                    write!(f, ": {}", function.return_type)?;
                }
                Ok(())
            }
        }
    }
}
