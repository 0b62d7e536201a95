use std::fmt;

/// Compact operand shape of an instruction, as the compiler reads it.
///
/// - `l` long, `s` short, `f` float
/// - `c` identifier string, `S` string literal
/// - `x` ignored optional argument
/// - `/` everything after it is optional (at most once)
///
/// An empty signature means the instruction takes no operands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArgSignature {
    raw: String,
    required: usize,
    optional: usize,
}

const ARGUMENT_CHARS: &[char] = &['l', 's', 'f', 'c', 'S', 'x'];

impl ArgSignature {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut required = 0;
        let mut optional = 0;
        let mut in_optional = false;

        for ch in raw.chars() {
            match ch {
                '/' if in_optional => return Err("`/` appears more than once".to_string()),
                '/' => in_optional = true,
                'x' if !in_optional => return Err("`x` is only allowed after `/`".to_string()),
                c if ARGUMENT_CHARS.contains(&c) => {
                    if in_optional {
                        optional += 1;
                    } else {
                        required += 1;
                    }
                }
                c => return Err(format!("unknown argument type `{c}`")),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            required,
            optional,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn required(&self) -> usize {
        self.required
    }

    pub fn optional(&self) -> usize {
        self.optional
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl fmt::Display for ArgSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signature() {
        let sig = ArgSignature::parse("").unwrap();
        assert!(sig.is_empty());
        assert_eq!((sig.required(), sig.optional()), (0, 0));
    }

    #[test]
    fn counts_required_and_optional() {
        let sig = ArgSignature::parse("cl/lx").unwrap();
        assert_eq!((sig.required(), sig.optional()), (2, 2));
        assert_eq!(sig.to_string(), "cl/lx");
    }

    #[test]
    fn rejects_garbage() {
        assert!(ArgSignature::parse("lq").is_err());
        assert!(ArgSignature::parse("l//").is_err());
        assert!(ArgSignature::parse("x").is_err());
    }
}
