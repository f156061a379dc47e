//! `pinplan platform` command

use anyhow::Result;

use crate::cli::PlatformArgs;
use pinplan::core::{HostToken, PlatformFact};
use pinplan::util::diagnostic::{emit, suggestions, Diagnostic};
use pinplan::util::GlobalContext;

pub fn execute(args: PlatformArgs, ctx: &GlobalContext) -> Result<()> {
    let token = match args.token {
        Some(token) => HostToken::new(token),
        None => HostToken::host(),
    };
    let fact = PlatformFact::classify(&token);

    println!("{}: {}", token, fact);

    if !fact.is_classified() {
        let diag = Diagnostic::warning(format!(
            "host `{}` is not a known platform; only base inputs apply",
            token
        ))
        .with_suggestion(suggestions::UNKNOWN_PLATFORM);
        emit(&diag, ctx.color());
    }

    Ok(())
}
