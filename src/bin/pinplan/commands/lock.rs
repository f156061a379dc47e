//! `pinplan lock` command

use anyhow::Result;

use super::Session;
use crate::cli::LockArgs;
use pinplan::core::Manifest;
use pinplan::ops::load_lock_graph;
use pinplan::util::hash::short;
use pinplan::util::GlobalContext;
use pinplan::ResolveError;

pub fn execute(args: LockArgs, ctx: &GlobalContext) -> Result<()> {
    let session = Session::load(ctx, &args.project, &[])?;
    let project = &session.project;

    let graph = load_lock_graph(&project.lock_path(), project.lock.allow_git_fetch)
        .map_err(ResolveError::from)?;

    println!("lock file: {}", project.lock_path().display());
    println!("  format version: {}", graph.format_version);
    println!("  digest: {}", short(&graph.digest));
    println!("  entries: {}", graph.len());
    for (kind, count) in graph.source_counts() {
        println!("    {}: {}", kind, count);
    }

    let policy = if graph.allow_source_fetch {
        "allowed"
    } else {
        "disallowed"
    };
    println!("  git fetch: {}", policy);
    for entry in graph.git_entries() {
        println!("    {} from {}", entry.id, entry.source);
    }

    let root = match args.root {
        Some(root) => root,
        None => {
            Manifest::load(&project.manifest_path())
                .map_err(ResolveError::from)?
                .name
        }
    };
    let closure = graph.closure(&root);
    if closure.is_empty() {
        println!("  `{}` is not in the lock file", root);
    } else {
        println!("  closure of `{}`: {} packages", root, closure.len());
        if ctx.is_verbose() {
            for entry in closure {
                println!("    {}", entry.id);
            }
        }
    }

    Ok(())
}
