use super::layout::FrameLayout;
use crate::grammer::ast::{Type, VarDecl};
use crate::grammer::token::Pos;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Scalar,
    Array(usize),
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub ty: Type,
    pub name: String,
    pub pos: Pos,
    pub stack_offset: usize,
    pub storage: Storage,
}

impl Variable {
    pub fn is_array(&self) -> bool {
        matches!(self.storage, Storage::Array(_))
    }
}

/// Flat program-wide namespace of variables and labels, in declaration order
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    vars: IndexMap<String, Variable>,
    labels: IndexMap<String, Pos>,
    layout: FrameLayout,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.values()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn frame_size(&self) -> usize {
        self.layout.frame_size()
    }

    /// Allocate storage for a new variable. None if the frame overflows;
    /// the name is declared either way so later uses still resolve.
    pub(super) fn declare(&mut self, decl: &VarDecl, storage: Storage) -> Option<usize> {
        let reserved = match storage {
            Storage::Scalar => self.layout.scalar(),
            Storage::Array(len) => self.layout.array(len),
        };
        let stack_offset = reserved.unwrap_or(self.layout.used());
        self.vars.insert(
            decl.name.clone(),
            Variable {
                ty: decl.ty,
                name: decl.name.clone(),
                pos: decl.pos,
                stack_offset,
                storage,
            },
        );
        reserved
    }

    pub fn label(&self, name: &str) -> Option<Pos> {
        self.labels.get(name).copied()
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, Pos)> {
        self.labels.iter().map(|(name, pos)| (name.as_str(), *pos))
    }

    /// Returns the first declaration if the label already exists
    pub(super) fn add_label(&mut self, name: &str, pos: Pos) -> Result<(), Pos> {
        match self.labels.get(name) {
            Some(first) => Err(*first),
            None => {
                self.labels.insert(name.to_string(), pos);
                Ok(())
            }
        }
    }
}
