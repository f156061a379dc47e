//! `pinplan develop` command

use anyhow::Result;

use super::{write_json, Session};
use crate::cli::DevelopArgs;
use pinplan::core::HostToken;
use pinplan::ops::resolve;
use pinplan::util::GlobalContext;

pub fn execute(args: DevelopArgs, ctx: &GlobalContext) -> Result<()> {
    let session = Session::load(ctx, &args.project, &args.features)?;
    let flags: Vec<String> = args.system.into_iter().collect();
    let token = session
        .host_tokens(&flags)
        .into_iter()
        .next()
        .unwrap_or_else(HostToken::host);

    let dev = resolve(&session.project, token)?.dev;

    eprintln!(
        "    Composed dev environment for {} ({} packages)",
        dev.system,
        dev.packages().len()
    );

    let pretty = session.config.pretty() && !args.compact;
    write_json(&dev, args.output.as_deref(), pretty)
}
