//! Symbol table and scope stack
//!
//! - [`SymbolEntry`]: a variable and its inferred type
//! - [`SymbolTable`]: name → entry mapping that remembers binding order
//! - [`ScopeStack`]: one table per open block, innermost last
//!
//! # Scoping
//!
//! The language has a single flat namespace. Opening a block pushes a copy of
//! the enclosing table; closing it writes every binding back into the
//! enclosing table. A name first bound inside an `if`, `while` or `for` body is
//! therefore still bound, with its latest type, after the statement ends.

use super::types::Type;
use rustc_hash::FxHashMap;
use tracing::debug;

/// A variable and its current static type
///
/// `ty` is `None` when the variable was bound to an expression whose type
/// could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub ty: Option<Type>,
}

impl SymbolEntry {
    pub fn new(name: impl Into<String>, ty: Option<Type>) -> Self {
        SymbolEntry {
            name: name.into(),
            ty,
        }
    }
}

/// Mapping from identifier to its entry
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: FxHashMap<String, SymbolEntry>,
    insertion_order: Vec<String>, // first-binding order, for display
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.get(name)
    }

    /// Insert or overwrite the entry for `entry.name`
    pub fn put(&mut self, entry: SymbolEntry) {
        if !self.entries.contains_key(&entry.name) {
            self.insertion_order.push(entry.name.clone());
        }
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Known type of `name`, `None` if unbound or unresolved
    pub fn type_of(&self, name: &str) -> Option<Type> {
        self.get(name).and_then(|entry| entry.ty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order their names were first bound
    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.entries.get(name))
    }
}

/// Stack of open scopes, never empty
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<SymbolTable>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![SymbolTable::new()],
        }
    }

    /// Number of open scopes, 1 at top level
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn innermost(&self) -> &SymbolTable {
        &self.scopes[self.scopes.len() - 1]
    }

    fn innermost_mut(&mut self) -> &mut SymbolTable {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.innermost().get(name)
    }

    pub fn put(&mut self, entry: SymbolEntry) {
        self.innermost_mut().put(entry);
    }

    /// Open a scope seeded with every binding of the enclosing one
    pub fn push(&mut self) {
        let seeded = self.innermost().clone();
        self.scopes.push(seeded);
        debug!(depth = self.depth(), "opened scope");
    }

    /// Close the innermost scope, copying its bindings outward
    ///
    /// The outermost scope is never popped.
    pub fn pop(&mut self) {
        if self.scopes.len() == 1 {
            return;
        }

        if let Some(closed) = self.scopes.pop() {
            let enclosing = self.innermost_mut();
            for entry in closed.iter() {
                enclosing.put(entry.clone());
            }
        }
        debug!(depth = self.depth(), "closed scope");
    }

    /// Consume the stack, returning the outermost table
    pub fn into_global(mut self) -> SymbolTable {
        while self.scopes.len() > 1 {
            self.pop();
        }
        self.scopes.pop().unwrap_or_default()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_overwrites_and_keeps_order() {
        let mut table = SymbolTable::new();
        table.put(SymbolEntry::new("b", Some(Type::Int)));
        table.put(SymbolEntry::new("a", Some(Type::Str)));
        table.put(SymbolEntry::new("b", Some(Type::Float)));

        assert_eq!(table.len(), 2);
        assert_eq!(table.type_of("b"), Some(Type::Float));
        let names: Vec<_> = table.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_unresolved_entry_is_present_without_type() {
        let mut table = SymbolTable::new();
        table.put(SymbolEntry::new("x", None));

        assert!(table.get("x").is_some());
        assert_eq!(table.type_of("x"), None);
        assert!(table.get("y").is_none());
    }

    #[test]
    fn test_inner_scope_sees_outer_bindings() {
        let mut scopes = ScopeStack::new();
        scopes.put(SymbolEntry::new("a", Some(Type::Int)));
        scopes.push();

        assert_eq!(scopes.depth(), 2);
        assert_eq!(scopes.get("a").and_then(|e| e.ty), Some(Type::Int));
    }

    #[test]
    fn test_block_bindings_survive_pop() {
        let mut scopes = ScopeStack::new();
        scopes.put(SymbolEntry::new("a", Some(Type::Int)));
        scopes.push();
        scopes.put(SymbolEntry::new("x", Some(Type::Float)));
        scopes.put(SymbolEntry::new("a", Some(Type::matrix(2, 2))));
        scopes.pop();

        assert_eq!(scopes.depth(), 1);
        assert_eq!(scopes.get("x").and_then(|e| e.ty), Some(Type::Float));
        assert_eq!(scopes.get("a").and_then(|e| e.ty), Some(Type::matrix(2, 2)));
    }

    #[test]
    fn test_outermost_scope_is_never_popped() {
        let mut scopes = ScopeStack::new();
        scopes.put(SymbolEntry::new("a", Some(Type::Int)));
        scopes.pop();

        assert_eq!(scopes.depth(), 1);
        assert!(scopes.get("a").is_some());
    }

    #[test]
    fn test_into_global_merges_open_scopes() {
        let mut scopes = ScopeStack::new();
        scopes.push();
        scopes.push();
        scopes.put(SymbolEntry::new("deep", Some(Type::Boolean)));

        let global = scopes.into_global();
        assert_eq!(global.type_of("deep"), Some(Type::Boolean));
    }
}
