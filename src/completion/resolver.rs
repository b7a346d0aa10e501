//! Candidates for option values naming live objects of the daemon

use crate::cli::ExitCode;
use crate::completion::table::ArgumentKind;
use crate::completion::{Completion, CompletionContext, OptionPair};
use crate::error::Result;
use crate::protocol::Section;
use crate::session::{Connector, ControlPlane, SaFilter};
use tracing::{debug, warn};

const IKE: OptionPair = OptionPair::new("-i", "--ike");
const IKE_ID: OptionPair = OptionPair::new("-I", "--ike-id");

/// Produce the candidates for a value of the given kind
///
/// Daemon queries are best effort: any failure is logged and yields an
/// empty, successful completion.
pub async fn resolve<C: Connector>(
    kind: ArgumentKind,
    ctx: &CompletionContext,
    connector: &C,
) -> Completion {
    match kind {
        ArgumentKind::Timeout | ArgumentKind::FreeForm => Completion::empty(),
        ArgumentKind::File => Completion::deferred(ExitCode::Filedir),
        ArgumentKind::Host => Completion::deferred(ExitCode::KnownHosts),
        ArgumentKind::Fixed(values) => Completion::from_strs(values),
        live => match query(live, ctx, connector).await {
            Ok(candidates) => {
                debug!(kind = ?live, count = candidates.len(), "Resolved live candidates");
                Completion::new(candidates)
            }
            Err(e) => {
                warn!(kind = ?live, error = %e, "Querying the control plane failed");
                Completion::empty()
            }
        },
    }
}

/// Open a session, run the queries for `kind` and close the session again
async fn query<C: Connector>(
    kind: ArgumentKind,
    ctx: &CompletionContext,
    connector: &C,
) -> Result<Vec<String>> {
    let mut session = connector.connect().await?;
    match kind {
        ArgumentKind::IkeName => ike_names(&mut session, ctx.option_value(&IKE)).await,
        ArgumentKind::ActiveIkeName => active_ike_names(&mut session).await,
        ArgumentKind::ChildName => child_names(&mut session, &parent_filter(ctx)).await,
        ArgumentKind::IkeId => ike_ids(&mut session).await,
        ArgumentKind::ChildId => child_ids(&mut session, &parent_filter(ctx)).await,
        ArgumentKind::Pool => pool_names(&mut session).await,
        _ => Ok(Vec::new()),
    }
}

/// The IKE_SA already selected on the command line, by name or id
fn parent_filter(ctx: &CompletionContext) -> SaFilter {
    if let Some(name) = ctx.option_value(&IKE) {
        SaFilter::IkeName(name.to_string())
    } else if let Some(id) = ctx.option_value(&IKE_ID) {
        SaFilter::IkeId(id.to_string())
    } else {
        SaFilter::All
    }
}

/// Names of configured connections
pub async fn ike_names<S: ControlPlane>(session: &mut S, ike: Option<&str>) -> Result<Vec<String>> {
    let conns = session.list_conns(ike).await?;
    Ok(conns.keys().map(str::to_string).collect())
}

/// Names of established IKE_SAs
pub async fn active_ike_names<S: ControlPlane>(session: &mut S) -> Result<Vec<String>> {
    let sas = session.list_sas(&SaFilter::All).await?;
    Ok(dedup(sas.keys().map(str::to_string)))
}

/// Names of CHILD_SAs, configured ones first, then established ones
///
/// Both sources are concatenated; a name listed by both appears once, at
/// its first position, and unnamed CHILD_SAs are left out.
///
/// Configured children can only be narrowed down by connection name; when
/// the parent is selected by unique id, only established CHILD_SAs are
/// listed.
pub async fn child_names<S: ControlPlane>(
    session: &mut S,
    parent: &SaFilter,
) -> Result<Vec<String>> {
    let mut names = Vec::new();

    let conn_filter = match parent {
        SaFilter::All => Some(None),
        SaFilter::IkeName(name) => Some(Some(name.as_str())),
        SaFilter::IkeId(_) => None,
    };
    if let Some(ike) = conn_filter {
        let conns = session.list_conns(ike).await?;
        for (_, conn) in conns.sections() {
            if let Some(children) = conn.get_section("children") {
                names.extend(children.keys().map(str::to_string));
            }
        }
    }

    let sas = session.list_sas(parent).await?;
    for (_, child) in established_children(&sas) {
        names.push(child_name(child));
    }

    Ok(dedup(names))
}

/// Unique ids of established IKE_SAs
pub async fn ike_ids<S: ControlPlane>(session: &mut S) -> Result<Vec<String>> {
    let sas = session.list_sas(&SaFilter::All).await?;
    Ok(sas
        .sections()
        .filter_map(|(_, sa)| sa.get_str("uniqueid"))
        .map(str::to_string)
        .collect())
}

/// Unique ids of established CHILD_SAs
pub async fn child_ids<S: ControlPlane>(session: &mut S, parent: &SaFilter) -> Result<Vec<String>> {
    let sas = session.list_sas(parent).await?;
    Ok(established_children(&sas)
        .filter_map(|(_, child)| child.get_str("uniqueid"))
        .map(str::to_string)
        .collect())
}

/// Names of virtual IP pools
pub async fn pool_names<S: ControlPlane>(session: &mut S) -> Result<Vec<String>> {
    let pools = session.get_pools().await?;
    Ok(pools.keys().map(str::to_string).collect())
}

/// All CHILD_SAs of all IKE_SAs in a `list-sas` result
fn established_children(sas: &Section) -> impl Iterator<Item = (&str, &Section)> {
    sas.sections()
        .filter_map(|(_, sa)| sa.get_section("child-sas"))
        .flat_map(|children| children.sections())
}

/// CHILD_SAs are keyed by a unique name; the configured name is in `name`
fn child_name(child: &Section) -> String {
    child.get_str("name").unwrap_or_default().to_string()
}

fn dedup(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        if !name.is_empty() && !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}
