mod cmdline;

use cmdline::Args;
use python3_def::{generate, Result};

#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(feature = "lovely_env_logger")]
    lovely_env_logger::init_default();

    let args: Args = clap::Parser::parse();
    log::trace!("Cmdline Args: {:?}", args);

    #[cfg(feature = "implib")]
    {
        use python3_def::{ImportLibraryGenerator, Manifest};

        if let Some(cmdline::Cmd::Implib { arch, env, out_dir }) = &args.command {
            let manifest = Manifest::from_reader(tokio::io::stdin(), args.format).await?;

            log::debug!("Loaded {} symbols", manifest.len());

            let lib_path = ImportLibraryGenerator::new(arch, env)
                .generate(&manifest, out_dir)
                .await?;

            println!("Created {}", lib_path.display());

            return Ok(());
        }
    }

    let stdout = tokio::io::BufWriter::new(tokio::io::stdout());
    let count = generate(tokio::io::stdin(), stdout, args.format).await?;

    log::info!("Exported {} symbols", count);

    Ok(())
}
