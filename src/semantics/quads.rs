//! Quadruple store and backpatch lists.
//!
//! The store is append-only. The single mutation after emission is a field patch, used to fill in jump targets and
//! allocation sizes once they are known.

use std::fmt::Write as _;

/// Operand text used for a field whose value is not known yet.
pub const UNRESOLVED: &str = "_";

/// One instruction: an opcode and up to three operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quadruple {
    pub opcode: String,
    pub operands: Vec<String>,
}

impl Quadruple {
    /// Field `pos`, where field 0 is the opcode.
    pub fn field(&self, pos: usize) -> Option<&str> {
        match pos {
            0 => Some(&self.opcode),
            n => self.operands.get(n - 1).map(String::as_str),
        }
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(&self.opcode);
        for operand in &self.operands {
            out.push_str(", ");
            out.push_str(operand);
        }
    }
}

/// Append-only instruction sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadStore {
    quads: Vec<Quadruple>,
}

impl QuadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction and return its index.
    pub fn emit<I, S>(&mut self, opcode: &str, operands: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.quads.len();
        let quad = Quadruple {
            opcode: opcode.to_string(),
            operands: operands.into_iter().map(Into::into).collect(),
        };
        tracing::trace!(index, opcode = %quad.opcode, "emit");
        self.quads.push(quad);
        index
    }

    /// Overwrite field `pos` of quadruple `index` (field 0 is the opcode).
    ///
    /// ## Panics
    /// - If `index` was never emitted or the quadruple has no field `pos`. Both are engine bugs.
    pub fn patch_field(&mut self, index: usize, pos: usize, value: impl Into<String>) {
        let quad = &mut self.quads[index];
        match pos {
            0 => quad.opcode = value.into(),
            n => quad.operands[n - 1] = value.into(),
        }
    }

    /// Index the next emitted instruction will get.
    pub fn next_index(&self) -> usize {
        self.quads.len()
    }

    pub fn get(&self, index: usize) -> Option<&Quadruple> {
        self.quads.get(index)
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quadruple> {
        self.quads.iter()
    }

    /// Render the listing. Quadruple 0 is the header and prints bare.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, quad) in self.quads.iter().enumerate() {
            if index == 0 {
                out.push_str(&quad.opcode);
            } else {
                let _ = write!(out, "{index}: ");
                quad.render_into(&mut out);
            }
            out.push('\n');
        }
        out
    }
}

/// Quadruple indices waiting for the same jump target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackpatchList(Vec<usize>);

impl BackpatchList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_list(index: usize) -> Self {
        Self(vec![index])
    }

    /// Concatenate, keeping encounter order.
    pub fn merge(mut self, other: BackpatchList) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Set the last field of every listed quadruple to `target`.
    pub fn backpatch(&self, store: &mut QuadStore, target: usize) {
        for &index in &self.0 {
            debug_assert!(index < store.next_index(), "backpatch of unemitted quadruple {index}");
            let last = store.quads[index].operands.len();
            store.patch_field(index, last, target.to_string());
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for BackpatchList {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}
