//! Update decision for a client-reported release

#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::version::error::CheckError;
use crate::version::types::{CheckResult, ReleaseChannel, VersionDescriptor};

/// Read access to the latest known release per program and channel
#[cfg_attr(test, automock)]
pub trait ReleaseLookup: Send + Sync + 'static {
    /// Whether the program is listed at all
    fn has_program(&self, program: &str) -> bool;

    /// Get the latest release of a program on one channel
    fn latest_release(&self, program: &str, channel: ReleaseChannel) -> Option<VersionDescriptor>;
}

/// Channels a client may be offered, most stable first.
///
/// Without `check_unstable` only stable releases qualify. With it, every
/// channel at least as stable as the client's own channel qualifies, so a
/// beta client can move to beta, RC or stable but never to alpha.
pub fn eligible_channels(
    client_channel: ReleaseChannel,
    check_unstable: bool,
) -> impl Iterator<Item = ReleaseChannel> {
    ReleaseChannel::BY_STABILITY
        .into_iter()
        .filter(move |channel| {
            if check_unstable {
                *channel >= client_channel
            } else {
                *channel == ReleaseChannel::Stable
            }
        })
}

/// Decide whether `client` is the newest eligible release of `program`
///
/// The first eligible channel (most stable first) whose release supersedes
/// the client wins. When none does, the client is up to date.
pub fn check_version<L: ReleaseLookup + ?Sized>(
    lookup: &L,
    program: &str,
    client: &VersionDescriptor,
    check_unstable: bool,
) -> Result<CheckResult, CheckError> {
    if !lookup.has_program(program) {
        return Err(CheckError::ProgramNotFound(program.to_string()));
    }

    let candidate = eligible_channels(client.channel(), check_unstable)
        .filter_map(|channel| lookup.latest_release(program, channel))
        .find(|release| release.is_newer_than(client));

    let result = match candidate {
        Some(latest) => CheckResult::outdated(latest),
        None => CheckResult::up_to_date(),
    };

    debug!(
        "Checked {} {} (unstable: {}): up to date = {}",
        program, client, check_unstable, result.up_to_date
    );

    Ok(result)
}
