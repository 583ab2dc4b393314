use crate::{Manifest, Path, PathBuf, Result, LIBRARY_NAME};
use tokio::process::Command;

/// Import library tool flavor
#[derive(Debug)]
enum Tool {
    /// MinGW-w64 `dlltool`
    MinGw(&'static str),

    /// LLVM `llvm-dlltool`
    Llvm,

    /// Visual Studio `lib.exe`
    LibExe(std::process::Command),
}

/// Windows import library generator for `python3.dll`
///
/// Writes the module-definition file for the manifest and turns it into
/// `python3.dll.a` (GNU environment ABI) or `python3.lib` (MSVC) using
/// the target's import library tool.
#[derive(Debug, Clone)]
pub struct ImportLibraryGenerator {
    /// Target architecture (as in `CARGO_CFG_TARGET_ARCH`)
    arch: String,
    /// Target environment ABI (as in `CARGO_CFG_TARGET_ENV`)
    env: String,
}

impl ImportLibraryGenerator {
    /// Create generator for target architecture and environment ABI
    pub fn new(arch: impl Into<String>, env: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            env: env.into(),
        }
    }

    /// Module-definition file name
    pub fn def_file_name(&self) -> String {
        format!("{}.def", library_stem())
    }

    /// Import library file name
    pub fn lib_file_name(&self) -> String {
        if self.env == "msvc" {
            format!("{}.lib", library_stem())
        } else {
            format!("{}.a", LIBRARY_NAME)
        }
    }

    fn tool(&self) -> Result<Tool> {
        Ok(match (self.arch.as_str(), self.env.as_str()) {
            ("x86_64", "gnu") => Tool::MinGw("x86_64-w64-mingw32-dlltool"),
            ("x86", "gnu") => Tool::MinGw("i686-w64-mingw32-dlltool"),
            (arch, "msvc") => find_lib_exe(arch).map(Tool::LibExe).unwrap_or(Tool::Llvm),
            (arch, env) => anyhow::bail!(
                "Unsupported target arch '{}' or env ABI '{}'",
                arch,
                env
            ),
        })
    }

    /// Build import library tool invocation
    pub fn command(&self, def_path: &Path, lib_path: &Path) -> Result<Command> {
        let tool = self.tool()?;

        log::trace!("Import library tool: {:?}", tool);

        Ok(match tool {
            Tool::MinGw(program) => {
                let mut command = Command::new(program);
                command
                    .arg("--input-def")
                    .arg(def_path)
                    .arg("--output-lib")
                    .arg(lib_path);
                command
            }
            Tool::Llvm => {
                let machine = match self.arch.as_str() {
                    "x86_64" => "i386:x86-64",
                    "x86" => "i386",
                    "aarch64" => "arm64",
                    arch => arch,
                };
                let mut command = Command::new("llvm-dlltool");
                command
                    .arg("-m")
                    .arg(machine)
                    .arg("-d")
                    .arg(def_path)
                    .arg("-l")
                    .arg(lib_path);
                command
            }
            Tool::LibExe(command) => {
                let machine = match self.arch.as_str() {
                    "x86_64" => "X64",
                    "x86" => "X86",
                    "aarch64" => "ARM64",
                    arch => arch,
                };
                let mut command = Command::from(command);
                command
                    .arg(format!("/MACHINE:{}", machine))
                    .arg(format!("/DEF:{}", def_path.display()))
                    .arg(format!("/OUT:{}", lib_path.display()));
                command
            }
        })
    }

    /// Generate import library in directory
    ///
    /// Returns path to the created import library.
    pub async fn generate(&self, manifest: &Manifest, out_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let out_dir = out_dir.as_ref();
        let def_path = out_dir.join(self.def_file_name());
        let lib_path = out_dir.join(self.lib_file_name());

        let mut command = self.command(&def_path, &lib_path)?;

        tokio::fs::create_dir_all(out_dir).await?;

        log::debug!("Write module-definition file: {}", def_path.display());

        let file = tokio::fs::File::create(&def_path).await?;
        manifest
            .to_writer(tokio::io::BufWriter::new(file))
            .await?;

        log::debug!("Run {:?}", command);

        let status = command
            .status()
            .await
            .map_err(|error| anyhow::anyhow!("{:?} failed with {}", command, error))?;

        if !status.success() {
            anyhow::bail!("{:?} failed with {}", command, status);
        }

        Ok(lib_path)
    }
}

fn library_stem() -> &'static str {
    LIBRARY_NAME.strip_suffix(".dll").unwrap_or(LIBRARY_NAME)
}

/// Find Visual Studio `lib.exe` when running on Windows
#[cfg(windows)]
fn find_lib_exe(arch: &str) -> Option<std::process::Command> {
    let target = match arch {
        "x86_64" => "x86_64-pc-windows-msvc",
        "x86" => "i686-pc-windows-msvc",
        "aarch64" => "aarch64-pc-windows-msvc",
        _ => return None,
    };

    cc::windows_registry::find(target, "lib.exe")
}

#[cfg(not(windows))]
fn find_lib_exe(_arch: &str) -> Option<std::process::Command> {
    None
}
