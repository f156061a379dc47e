//! `pinplan build` command

use anyhow::Result;

use super::{write_json, Session};
use crate::cli::BuildArgs;
use pinplan::builder::BuildDescriptor;
use pinplan::ops::resolve_systems;
use pinplan::util::GlobalContext;

pub fn execute(args: BuildArgs, ctx: &GlobalContext) -> Result<()> {
    let session = Session::load(ctx, &args.project, &args.features)?;
    let tokens = session.host_tokens(&args.systems);

    let resolutions = resolve_systems(&session.project, &tokens)?;
    let descriptors: Vec<BuildDescriptor> = resolutions.into_iter().map(|r| r.build).collect();

    for descriptor in &descriptors {
        eprintln!(
            "    Resolved {} v{} for {} [{}]",
            descriptor.identity.name,
            descriptor.identity.version,
            descriptor.system,
            descriptor.short_fingerprint()
        );
    }

    let pretty = session.config.pretty() && !args.compact;
    match descriptors.as_slice() {
        [single] => write_json(single, args.output.as_deref(), pretty),
        many => write_json(&many, args.output.as_deref(), pretty),
    }
}
