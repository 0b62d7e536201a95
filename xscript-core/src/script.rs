//! Compiled script container.
//!
//! Layout (all little-endian):
//!
//! ```text
//! u32 code_words
//! u32 int_count
//! u32 float_count
//! u32 string_bytes
//! u32 code[code_words]
//! i32 ints[int_count]
//! f32 floats[float_count]
//! u8  strings[string_bytes]   NUL-terminated, each padded to 4 bytes
//! ```

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::ScriptError;

const HEADER_WORDS: usize = 4;

/// Literal pool referenced by index from the code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Literals {
    ints: Vec<i32>,
    floats: Vec<f32>,
    strings: Vec<String>,
}

impl Literals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `value`, adding it if it is not there yet.
    pub fn add_int(&mut self, value: i32) -> usize {
        intern(&mut self.ints, value)
    }

    pub fn add_float(&mut self, value: f32) -> usize {
        if let Some(i) = self.floats.iter().position(|f| f.to_bits() == value.to_bits()) {
            return i;
        }
        self.floats.push(value);
        self.floats.len() - 1
    }

    pub fn add_string(&mut self, value: &str) -> usize {
        if let Some(i) = self.strings.iter().position(|s| s == value) {
            return i;
        }
        self.strings.push(value.to_string());
        self.strings.len() - 1
    }

    pub fn int(&self, index: usize) -> Option<i32> {
        self.ints.get(index).copied()
    }

    pub fn float(&self, index: usize) -> Option<f32> {
        self.floats.get(index).copied()
    }

    pub fn string(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    pub fn ints(&self) -> &[i32] {
        &self.ints
    }

    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    fn string_bytes(&self) -> usize {
        self.strings.iter().map(|s| padded_len(s.len() + 1)).sum()
    }
}

fn intern<T: PartialEq + Copy>(v: &mut Vec<T>, value: T) -> usize {
    if let Some(i) = v.iter().position(|x| *x == value) {
        return i;
    }
    v.push(value);
    v.len() - 1
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub code: Vec<u32>,
    pub literals: Literals,
}

impl Script {
    pub fn new(code: Vec<u32>, literals: Literals) -> Self {
        Self { code, literals }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ScriptError> {
        let mut out = Vec::with_capacity(
            (HEADER_WORDS + self.code.len() + self.literals.ints.len() + self.literals.floats.len()) * 4
                + self.literals.string_bytes(),
        );
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Fails before writing anything if a string literal cannot be stored
    /// NUL-terminated.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), ScriptError> {
        let lits = &self.literals;
        if let Some(index) = lits.strings.iter().position(|s| s.contains('\0')) {
            return Err(ScriptError::NulInString { index });
        }

        w.write_u32::<LittleEndian>(self.code.len() as u32)?;
        w.write_u32::<LittleEndian>(lits.ints.len() as u32)?;
        w.write_u32::<LittleEndian>(lits.floats.len() as u32)?;
        w.write_u32::<LittleEndian>(lits.string_bytes() as u32)?;

        for &word in &self.code {
            w.write_u32::<LittleEndian>(word)?;
        }
        for &v in &lits.ints {
            w.write_i32::<LittleEndian>(v)?;
        }
        for &v in &lits.floats {
            w.write_f32::<LittleEndian>(v)?;
        }
        for s in &lits.strings {
            w.write_all(s.as_bytes())?;
            let pad = padded_len(s.len() + 1) - s.len();
            w.write_all(&[0u8; 4][..pad])?;
        }
        Ok(())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScriptError> {
        let mut r = Cursor::new(bytes);
        ensure(&r, "header", HEADER_WORDS * 4)?;
        let code_words = r.read_u32::<LittleEndian>()? as usize;
        let int_count = r.read_u32::<LittleEndian>()? as usize;
        let float_count = r.read_u32::<LittleEndian>()? as usize;
        let string_bytes = r.read_u32::<LittleEndian>()? as usize;

        ensure(&r, "code", code_words.saturating_mul(4))?;
        let code = (0..code_words)
            .map(|_| r.read_u32::<LittleEndian>())
            .collect::<Result<Vec<_>, _>>()?;

        ensure(&r, "integer literals", int_count.saturating_mul(4))?;
        let ints = (0..int_count)
            .map(|_| r.read_i32::<LittleEndian>())
            .collect::<Result<Vec<_>, _>>()?;

        ensure(&r, "float literals", float_count.saturating_mul(4))?;
        let floats = (0..float_count)
            .map(|_| r.read_f32::<LittleEndian>())
            .collect::<Result<Vec<_>, _>>()?;

        ensure(&r, "string literals", string_bytes)?;
        let mut raw = vec![0u8; string_bytes];
        r.read_exact(&mut raw)?;
        let strings = split_strings(&raw)?;

        Ok(Self {
            code,
            literals: Literals { ints, floats, strings },
        })
    }
}

fn ensure(r: &Cursor<&[u8]>, section: &'static str, needed: usize) -> Result<(), ScriptError> {
    let available = r.get_ref().len().saturating_sub(r.position() as usize);
    if needed > available {
        return Err(ScriptError::Truncated {
            section,
            needed,
            available,
        });
    }
    Ok(())
}

fn split_strings(mut raw: &[u8]) -> Result<Vec<String>, ScriptError> {
    let mut strings = Vec::new();
    while !raw.is_empty() {
        let index = strings.len();
        let end = raw
            .iter()
            .position(|&b| b == 0)
            .ok_or(ScriptError::UnterminatedString { index })?;
        let s = std::str::from_utf8(&raw[..end]).map_err(|_| ScriptError::InvalidString { index })?;
        strings.push(s.to_string());
        raw = &raw[padded_len(end + 1).min(raw.len())..];
    }
    Ok(strings)
}
