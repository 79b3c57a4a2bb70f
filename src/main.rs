/*!
 * chmod-sanitize - Launcher Entry Point
 *
 * Runs a command with the shim library preloaded, so that every chmod the
 * command (and its children) makes has setuid/setgid stripped:
 *
 *     chmod-sanitize yarn install --frozen-lockfile
 */

use std::env;
use tracing::info;

use chmod_sanitize::launcher::PRELOAD_VAR;
use chmod_sanitize::{init_tracing, Launch, ShimConfig};

fn main() -> miette::Result<()> {
    let config = ShimConfig::from_env()?;
    init_tracing(config.trace_json);

    let exe = env::current_exe().ok();
    let launch = Launch::plan(
        &config,
        env::args_os().skip(1).collect(),
        env::var_os(PRELOAD_VAR),
        exe.as_deref(),
    )?;

    info!(
        program = %launch.program.to_string_lossy(),
        preloaded = launch.preload.is_some(),
        "Launching"
    );
    Err(launch.exec().into())
}
