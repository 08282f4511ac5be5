use std::collections::HashMap;

use lcpu::Word;

#[derive(Debug, Clone, Copy)]
struct Symbol {
    addr: Word,
    /// Bound by a forward `.global` rather than a label site; a later real
    /// definition overrides it without a duplicate-label error.
    provisional: bool,
}

/// Label name to address, duplicates rejected at definition time.
#[derive(Debug, Default)]
pub struct SymbolTable {
    map: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Defines a label at its site. Fails on redefinition.
    pub fn define(&mut self, name: &str, addr: Word) -> Result<(), String> {
        match self.map.get_mut(name) {
            Some(symbol) if symbol.provisional => {
                symbol.addr = addr;
                symbol.provisional = false;
                Ok(())
            }
            Some(_) => Err(format!("duplicate label: {}", name)),
            None => {
                self.map.insert(
                    name.to_string(),
                    Symbol {
                        addr,
                        provisional: false,
                    },
                );
                Ok(())
            }
        }
    }

    /// `.global` on an undefined label binds it to the directive site.
    pub fn bind_provisional(&mut self, name: &str, addr: Word) {
        self.map.entry(name.to_string()).or_insert(Symbol {
            addr,
            provisional: true,
        });
    }

    pub fn get(&self, name: &str) -> Option<Word> {
        self.map.get(name).map(|symbol| symbol.addr)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }
}
