use crate::{lines, DefWriter, Error, Result, Symbol, SymbolKind, SymbolLines};

/// Symbols manifest format
#[derive(Debug, Clone, Copy, PartialEq, Eq, educe::Educe)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[educe(Default)]
pub enum ManifestFormat {
    /// TOML tables `function` and `data` (as in `Misc/stable_abi.toml`)
    #[cfg(feature = "toml")]
    #[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "toml")))]
    #[educe(Default)]
    Toml,

    /// Lines like `function <name>` and `data <name>`
    #[cfg_attr(not(feature = "toml"), educe(Default))]
    Lines,
}

impl From<&ManifestFormat> for ManifestFormat {
    fn from(r: &Self) -> Self {
        *r
    }
}

impl core::str::FromStr for ManifestFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            #[cfg(feature = "toml")]
            "t" | "toml" => Self::Toml,
            "l" | "lines" => Self::Lines,
            _ => anyhow::bail!("Unsupported manifest format: {}", s),
        })
    }
}

impl AsRef<str> for ManifestFormat {
    fn as_ref(&self) -> &str {
        match self {
            #[cfg(feature = "toml")]
            Self::Toml => "toml",
            Self::Lines => "lines",
        }
    }
}

impl core::fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl ManifestFormat {
    pub const POSSIBLE_STRS: &'static [&'static str] = &[
        #[cfg(feature = "toml")]
        "toml",
        "lines",
    ];
}

/// Stable ABI manifest tables (metadata values are ignored)
#[cfg(feature = "toml")]
#[derive(serde::Deserialize)]
struct StableAbi {
    function: toml::Table,
    data: toml::Table,
}

/// Ordered collection of exported symbols
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Symbols in emission order
    pub symbols: Vec<Symbol>,
}

impl FromIterator<Symbol> for Manifest {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl Manifest {
    /// Number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check that manifest has no symbols
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over function symbols
    pub fn functions(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols_of(SymbolKind::Function)
    }

    /// Iterate over data symbols
    pub fn data(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols_of(SymbolKind::Data)
    }

    fn symbols_of(&self, kind: SymbolKind) -> impl Iterator<Item = &Symbol> {
        self.symbols
            .iter()
            .filter(move |symbol| symbol.kind == kind)
    }

    /// Load manifest from TOML document
    ///
    /// Functions go first then data, each in document key order.
    #[cfg(feature = "toml")]
    #[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "toml")))]
    pub fn from_toml(text: &str) -> Result<Self> {
        let StableAbi { function, data } = toml::from_str(text)
            .map_err(|error| anyhow::anyhow!("Invalid stable ABI manifest: {}", error))?;

        log::debug!(
            "Manifest has {} functions and {} data",
            function.len(),
            data.len()
        );

        Ok(function
            .into_iter()
            .map(|(name, _)| Symbol::function(name))
            .chain(data.into_iter().map(|(name, _)| Symbol::data(name)))
            .collect())
    }

    /// Load manifest from lines
    pub fn from_lines(text: &str) -> Self {
        text.lines()
            .enumerate()
            .filter_map(|(index, line)| lines::parse_line(line, index + 1))
            .collect()
    }

    /// Load manifest from raw
    pub fn from_raw(data: &[u8], format: impl Into<ManifestFormat>) -> Result<Self> {
        let text = core::str::from_utf8(data)?;

        Ok(match format.into() {
            #[cfg(feature = "toml")]
            ManifestFormat::Toml => Self::from_toml(text)?,
            ManifestFormat::Lines => Self::from_lines(text),
        })
    }

    /// Load manifest from reader
    pub async fn from_reader(
        mut reader: impl tokio::io::AsyncRead + Unpin,
        format: impl Into<ManifestFormat>,
    ) -> Result<Self> {
        use tokio::io::AsyncReadExt;

        let format = format.into();

        log::trace!("Load {} manifest", format);

        if format == ManifestFormat::Lines {
            let mut lines = SymbolLines::new(reader);
            let mut symbols = Vec::new();

            while let Some(symbol) = lines.next_symbol().await? {
                symbols.push(symbol);
            }

            return Ok(Self { symbols });
        }

        let mut data = Vec::default();

        reader.read_to_end(&mut data).await?;

        Self::from_raw(&data, format)
    }

    /// Dump module-definition document to writer
    ///
    /// Returns the number of exported symbols or error when it is less
    /// than [`MIN_SYMBOLS`](crate::MIN_SYMBOLS). The document is written
    /// in full in both cases.
    pub async fn to_writer(&self, writer: impl tokio::io::AsyncWrite + Unpin) -> Result<usize> {
        let mut def = DefWriter::new(writer).await?;

        for symbol in &self.symbols {
            def.write_symbol(symbol).await?;
        }

        def.finish().await
    }
}
