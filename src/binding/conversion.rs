use crate::symbols::symbols::TypeSymbol;

/// How a value of one type may become another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// No conversion exists.
    None,
    /// Same type, nothing to do.
    Identity,
    /// Inserted silently wherever a value of the target type is expected.
    Implicit,
    /// Only allowed through a conversion call such as `string(1)`.
    Explicit,
}

impl Conversion {
    pub fn classify(from: TypeSymbol, to: TypeSymbol) -> Conversion {
        use TypeSymbol::*;

        if from == to {
            return Conversion::Identity;
        }

        match (from, to) {
            (Int, Float) | (Float, Int) => Conversion::Implicit,
            (Bool, String) => Conversion::Explicit,
            (String, Bool) | (String, Int) | (String, Float) => Conversion::Explicit,
            (Int, String) | (Int, Bool) => Conversion::Explicit,
            (Float, String) => Conversion::Explicit,
            _ => Conversion::None,
        }
    }

    pub fn exists(self) -> bool {
        self != Conversion::None
    }

    pub fn is_identity(self) -> bool {
        self == Conversion::Identity
    }

    pub fn is_implicit(self) -> bool {
        self == Conversion::Implicit
    }

    pub fn is_explicit(self) -> bool {
        self == Conversion::Explicit
    }
}
