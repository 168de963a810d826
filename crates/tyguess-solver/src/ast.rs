//! The slice of a function expression the guesser needs: its parameter names,
//! in declaration order.

/// A parameter binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Local {
    pub name: String,
}

impl Local {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An unannotated function expression being considered for annotation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionExpr {
    pub params: Vec<Local>,
}

impl FunctionExpr {
    pub fn with_params<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: names.into_iter().map(Local::new).collect(),
        }
    }
}
