use crate::vm::runtime::Runtime;

/// Behaviour of one segment 5 instruction variant.
///
/// Implementations carry whatever distinguishes them from their siblings (a
/// control name, a flag) as fields, and are instantiated once per opcode.
pub trait NullaryHandler: Send + Sync {
    fn execute(&self, runtime: &mut Runtime<'_>);
}

/// Instruction with one inline argument (segments 0, 2 and 3).
pub trait UnaryHandler: Send + Sync {
    fn execute(&self, runtime: &mut Runtime<'_>, arg0: u32);
}

/// Instruction with two inline arguments (segments 1 and 4).
pub trait BinaryHandler: Send + Sync {
    fn execute(&self, runtime: &mut Runtime<'_>, arg0: u32, arg1: u32);
}

/// An owned handler of any arity, as stored in the dispatch table.
pub enum Handler {
    Nullary(Box<dyn NullaryHandler>),
    Unary(Box<dyn UnaryHandler>),
    Binary(Box<dyn BinaryHandler>),
}

impl Handler {
    pub fn nullary(handler: impl NullaryHandler + 'static) -> Self {
        Handler::Nullary(Box::new(handler))
    }

    pub fn unary(handler: impl UnaryHandler + 'static) -> Self {
        Handler::Unary(Box::new(handler))
    }

    pub fn binary(handler: impl BinaryHandler + 'static) -> Self {
        Handler::Binary(Box::new(handler))
    }

    pub fn arity(&self) -> usize {
        match self {
            Handler::Nullary(_) => 0,
            Handler::Unary(_) => 1,
            Handler::Binary(_) => 2,
        }
    }

    pub(crate) fn execute(&self, runtime: &mut Runtime<'_>, args: [u32; 2]) {
        match self {
            Handler::Nullary(h) => h.execute(runtime),
            Handler::Unary(h) => h.execute(runtime, args[0]),
            Handler::Binary(h) => h.execute(runtime, args[0], args[1]),
        }
    }
}
