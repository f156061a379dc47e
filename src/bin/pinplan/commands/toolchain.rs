//! `pinplan toolchain` command

use anyhow::Result;

use super::Session;
use crate::cli::ToolchainArgs;
use pinplan::builder::{ToolchainPinner, ToolchainSpec};
use pinplan::util::hash::short;
use pinplan::util::GlobalContext;
use pinplan::ResolveError;

pub fn execute(args: ToolchainArgs, ctx: &GlobalContext) -> Result<()> {
    let session = Session::load(ctx, &args.project, &[])?;
    let pinner = ToolchainPinner::new(session.project.toolchain.clone());

    let production = pinner.production().map_err(ResolveError::from)?;
    let development = pinner.development().map_err(ResolveError::from)?;

    print_spec("production", &production);
    print_spec("dev stable", &development.stable);
    print_spec("dev nightly", &development.nightly);

    Ok(())
}

fn print_spec(label: &str, spec: &ToolchainSpec) {
    let fingerprint = spec.fingerprint();
    println!("{:>12}: {} [{}]", label, spec, short(&fingerprint));
    if !spec.components.is_empty() {
        let packages: Vec<&str> = spec.component_packages().into_iter().collect();
        println!("{:>12}  packages: {}", "", packages.join(", "));
    }
}
