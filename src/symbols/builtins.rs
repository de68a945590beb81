use std::rc::Rc;

use super::symbols::{FunctionSymbol, TypeSymbol};

/// Functions provided by the runtime rather than declared in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Print,
    Println,
    Input,
    Random,
    Cos,
    Sin,
    Acos,
    Floor,
}

impl Builtin {
    pub const ALL: [Builtin; 8] = [
        Builtin::Print,
        Builtin::Println,
        Builtin::Input,
        Builtin::Random,
        Builtin::Cos,
        Builtin::Sin,
        Builtin::Acos,
        Builtin::Floor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Println => "println",
            Builtin::Input => "input",
            Builtin::Random => "random",
            Builtin::Cos => "cos",
            Builtin::Sin => "sin",
            Builtin::Acos => "acos",
            Builtin::Floor => "floor",
        }
    }

    pub fn symbol(self) -> Rc<FunctionSymbol> {
        match self {
            Builtin::Print | Builtin::Println => {
                FunctionSymbol::new_builtin(self, &[("text", TypeSymbol::String)], TypeSymbol::Void)
            }
            Builtin::Input => FunctionSymbol::new_builtin(self, &[], TypeSymbol::String),
            Builtin::Random => FunctionSymbol::new_builtin(
                self,
                &[("min", TypeSymbol::Int), ("max", TypeSymbol::Int)],
                TypeSymbol::Int,
            ),
            Builtin::Cos | Builtin::Sin | Builtin::Acos => {
                FunctionSymbol::new_builtin(self, &[("value", TypeSymbol::Float)], TypeSymbol::Float)
            }
            Builtin::Floor => {
                FunctionSymbol::new_builtin(self, &[("value", TypeSymbol::Float)], TypeSymbol::Int)
            }
        }
    }
}

/// Every built-in function, in registration order.
pub fn builtin_functions() -> Vec<Rc<FunctionSymbol>> {
    Builtin::ALL.iter().map(|builtin| builtin.symbol()).collect()
}
