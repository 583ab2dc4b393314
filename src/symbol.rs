/// Kind of exported symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Executable code
    Function,

    /// Data object (marked with `DATA` in module-definition files)
    Data,
}

impl SymbolKind {
    /// Keyword which introduces the symbol kind in manifests
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Data => "data",
        }
    }

    /// Get symbol kind by manifest keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "function" => Self::Function,
            "data" => Self::Data,
            _ => return None,
        })
    }
}

impl AsRef<str> for SymbolKind {
    fn as_ref(&self) -> &str {
        self.keyword()
    }
}

impl core::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Exported symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// Symbol name
    pub name: String,

    /// Symbol kind
    pub kind: SymbolKind,
}

impl Symbol {
    /// Create symbol entry
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create function symbol entry
    pub fn function(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Function)
    }

    /// Create data symbol entry
    pub fn data(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Data)
    }
}

/// Formats symbol as module-definition export line (without line terminator)
impl core::fmt::Display for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.kind {
            SymbolKind::Function => f.write_str(&self.name),
            SymbolKind::Data => write!(f, "{} DATA", self.name),
        }
    }
}
