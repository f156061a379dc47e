//! `pinplan init` command

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::InitArgs;
use pinplan::ops::{init_project, InitOptions};
use pinplan::util::GlobalContext;

/// Determines the fallback program name from the arguments or directory.
pub fn determine_name(name: &Option<String>, path: &Path) -> String {
    name.clone().unwrap_or_else(|| {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string()
    })
}

pub fn execute(args: InitArgs, ctx: &GlobalContext) -> Result<()> {
    let path = match args.path {
        Some(path) if path.is_absolute() => path,
        Some(path) => ctx.cwd().join(path),
        None => ctx.cwd().to_path_buf(),
    };

    let opts = InitOptions {
        name: determine_name(&args.name, &path),
        main_program: args.main_program,
    };

    let written: PathBuf = init_project(&path, &opts)?;
    eprintln!("     Created {}", written.display());

    Ok(())
}
