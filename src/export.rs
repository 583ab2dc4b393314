use crate::{Manifest, ManifestFormat, Result, Symbol, SymbolLines};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Name of library which exports stable ABI symbols
pub const LIBRARY_NAME: &str = "python3.dll";

/// Minimum number of symbols which valid stable ABI manifest provides
pub const MIN_SYMBOLS: usize = 859;

/// Module-definition document writer
///
/// Writes the `LIBRARY` and `EXPORTS` header on creation, then one line per
/// symbol, counting them for the final integrity check.
pub struct DefWriter<W> {
    writer: W,
    count: usize,
}

impl<W: AsyncWrite + Unpin> DefWriter<W> {
    /// Start document
    pub async fn new(mut writer: W) -> Result<Self> {
        writer
            .write_all(format!("LIBRARY {}\nEXPORTS\n", LIBRARY_NAME).as_bytes())
            .await?;

        Ok(Self { writer, count: 0 })
    }

    /// Write export line for symbol
    pub async fn write_symbol(&mut self, symbol: &Symbol) -> Result<()> {
        self.writer
            .write_all(format!("{}\n", symbol).as_bytes())
            .await?;
        self.count += 1;

        Ok(())
    }

    /// Number of symbols written so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Flush document and check that enough symbols was exported
    ///
    /// Everything is already written when the check fails, so callers
    /// must discard the output on error.
    pub async fn finish(mut self) -> Result<usize> {
        self.writer.flush().await?;

        if self.count < MIN_SYMBOLS {
            anyhow::bail!(
                "Only {} symbols exported while at least {} expected (truncated or incompatible manifest)",
                self.count,
                MIN_SYMBOLS
            );
        }

        log::debug!("Exported {} symbols", self.count);

        Ok(self.count)
    }
}

/// Generate module-definition document from manifest
///
/// Lines are converted on the fly. TOML manifest is decoded in full before
/// anything is written, so decoding errors leave the output untouched.
pub async fn generate(
    reader: impl AsyncRead + Unpin,
    writer: impl AsyncWrite + Unpin,
    format: impl Into<ManifestFormat>,
) -> Result<usize> {
    match format.into() {
        ManifestFormat::Lines => {
            let mut lines = SymbolLines::new(reader);
            let mut def = DefWriter::new(writer).await?;

            while let Some(symbol) = lines.next_symbol().await? {
                def.write_symbol(&symbol).await?;
            }

            log::trace!("Scanned {} lines", lines.line_no());

            def.finish().await
        }
        #[allow(unreachable_patterns)]
        format => Manifest::from_reader(reader, format).await?.to_writer(writer).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_lines(output: &[u8]) -> Vec<&str> {
        core::str::from_utf8(output).unwrap().lines().collect()
    }

    fn padding_lines(count: usize) -> String {
        (0..count).map(|n| format!("function Py_Pad{}\n", n)).collect()
    }

    #[tokio::test]
    async fn header_then_symbols() {
        let mut output = Vec::new();
        let mut def = DefWriter::new(&mut output).await.unwrap();

        def.write_symbol(&Symbol::function("PyList_New")).await.unwrap();
        def.write_symbol(&Symbol::data("PyExc_ValueError")).await.unwrap();
        assert_eq!(def.count(), 2);
        assert!(def.finish().await.is_err());

        assert_eq!(
            output_lines(&output),
            [
                "LIBRARY python3.dll",
                "EXPORTS",
                "PyList_New",
                "PyExc_ValueError DATA"
            ]
        );
    }

    #[tokio::test]
    async fn threshold() {
        let below: Manifest = (1..MIN_SYMBOLS)
            .map(|n| Symbol::function(format!("Py_F{}", n)))
            .collect();
        let mut output = Vec::new();
        let error = below.to_writer(&mut output).await.unwrap_err();

        assert!(error.to_string().contains("858"));
        assert!(error.to_string().contains("859"));
        assert_eq!(output_lines(&output).len(), 2 + 858);

        let exact: Manifest = (0..MIN_SYMBOLS)
            .map(|n| Symbol::data(format!("Py_D{}", n)))
            .collect();
        let mut output = Vec::new();

        assert_eq!(exact.to_writer(&mut output).await.unwrap(), MIN_SYMBOLS);
        assert_eq!(output_lines(&output)[2], "Py_D0 DATA");
    }

    #[tokio::test]
    async fn generate_from_lines() {
        let input = format!(
            "function PyList_New\ndata PyExc_ValueError\n# note\nfunction PyDict_New\n{}",
            padding_lines(MIN_SYMBOLS)
        );
        let mut output = Vec::new();

        let count = generate(input.as_bytes(), &mut output, ManifestFormat::Lines)
            .await
            .unwrap();

        assert_eq!(count, MIN_SYMBOLS + 3);

        let lines = output_lines(&output);

        assert_eq!(lines.len(), 2 + count);
        assert_eq!(
            lines[..5],
            [
                "LIBRARY python3.dll",
                "EXPORTS",
                "PyList_New",
                "PyExc_ValueError DATA",
                "PyDict_New"
            ]
        );
    }

    #[tokio::test]
    async fn comments_are_not_counted() {
        let input = format!(
            "# comment\n\nunknown foo bar\n{}",
            padding_lines(MIN_SYMBOLS - 1)
        );
        let mut output = Vec::new();

        assert!(generate(input.as_bytes(), &mut output, ManifestFormat::Lines)
            .await
            .is_err());
        assert_eq!(output_lines(&output).len(), 2 + MIN_SYMBOLS - 1);
    }

    #[cfg(feature = "toml")]
    #[tokio::test]
    async fn generate_from_toml() {
        let mut input = String::from(
            "[function]\nPyList_New = 1\nPyDict_New = 1\n",
        );
        for n in 0..MIN_SYMBOLS {
            input.push_str(&format!("Py_Pad{} = 1\n", n));
        }
        input.push_str("[data]\nPyExc_ValueError = 1\n");

        let mut output = Vec::new();
        let count = generate(input.as_bytes(), &mut output, ManifestFormat::Toml)
            .await
            .unwrap();

        assert_eq!(count, MIN_SYMBOLS + 3);

        let lines = output_lines(&output);

        assert_eq!(lines[..4], ["LIBRARY python3.dll", "EXPORTS", "PyList_New", "PyDict_New"]);
        assert_eq!(lines.last(), Some(&"PyExc_ValueError DATA"));
    }

    #[cfg(feature = "toml")]
    #[tokio::test]
    async fn toml_errors_write_nothing() {
        let mut output = Vec::new();

        assert!(generate(&b"[function]\nPyList_New = 1\n"[..], &mut output, ManifestFormat::Toml)
            .await
            .is_err());
        assert!(output.is_empty());
    }

    #[cfg(feature = "toml")]
    #[tokio::test]
    async fn small_toml_fails() {
        let mut output = Vec::new();
        let input = "function = { A = 1, B = 2, C = 3, D = 4, E = 5 }\n\
                     data = { F = 1, G = 2, H = 3, I = 4, J = 5 }\n";

        assert!(generate(input.as_bytes(), &mut output, ManifestFormat::Toml)
            .await
            .is_err());
        assert_eq!(output_lines(&output).len(), 12);
    }
}
