//! Concurrent fan-out over per-identity directory lookups.
//!
//! A fetch streams work items from the paginated listing into a bounded
//! channel feeding a fixed pool of workers; a single collector owns the
//! results until the pipeline has fully drained. The first failure anywhere
//! trips a cancellation token that stops producer and workers, and the
//! failed fetch returns nothing, so callers never observe a partial result.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::constants;
use crate::core::directory::remote::{Page, Resolver, TeamRef};
use crate::core::directory::{Member, Team};
use crate::core::types::{Login, TeamName};
use crate::error::DirectoryError;

type StepFuture<T> = Pin<Box<dyn Future<Output = Result<T, DirectoryError>> + Send>>;

/// A member lookup, with team memberships attached when the login is the
/// authenticated member's own.
enum MemberRecord {
    Plain(Member),
    Active {
        member: Member,
        teams: Vec<TeamName>,
    },
}

/// Resolve every organization member, sorted by login.
///
/// Membership lookups are expensive, so they run only for `active`; the
/// active member's team names come back alongside the member list.
pub(crate) async fn fetch_members<R>(
    resolver: &Arc<R>,
    active: &str,
) -> Result<(Vec<Member>, Vec<TeamName>), DirectoryError>
where
    R: Resolver + ?Sized,
{
    let pages = {
        let resolver = Arc::clone(resolver);
        move |page| -> StepFuture<Page<Login>> {
            let resolver = Arc::clone(&resolver);
            Box::pin(async move { resolver.member_page(page).await })
        }
    };

    let step = {
        let resolver = Arc::clone(resolver);
        let active: Arc<str> = Arc::from(active);
        move |login: Login| -> StepFuture<MemberRecord> {
            let resolver = Arc::clone(&resolver);
            let active = Arc::clone(&active);
            Box::pin(async move {
                let member = resolver.member(&login).await?;
                if login.as_str() == &*active {
                    let teams = resolver.memberships(&login).await?;
                    return Ok(MemberRecord::Active { member, teams });
                }
                Ok(MemberRecord::Plain(member))
            })
        }
    };

    let records = fan_out(pages, step).await?;

    let mut members = Vec::with_capacity(records.len());
    let mut active_teams = Vec::new();
    for record in records {
        match record {
            MemberRecord::Plain(member) => members.push(member),
            MemberRecord::Active { member, teams } => {
                members.push(member);
                active_teams = teams;
            }
        }
    }
    members.sort_by(|a, b| a.login.cmp(&b.login));

    debug!(members = members.len(), "member fetch complete");
    Ok((members, active_teams))
}

/// Resolve every organization team with its full roster, sorted by name.
pub(crate) async fn fetch_teams<R>(resolver: &Arc<R>) -> Result<Vec<Team>, DirectoryError>
where
    R: Resolver + ?Sized,
{
    let pages = {
        let resolver = Arc::clone(resolver);
        move |page| -> StepFuture<Page<TeamRef>> {
            let resolver = Arc::clone(&resolver);
            Box::pin(async move { resolver.team_page(page).await })
        }
    };

    let step = {
        let resolver = Arc::clone(resolver);
        move |team: TeamRef| -> StepFuture<Team> {
            let resolver = Arc::clone(&resolver);
            Box::pin(async move {
                let members = resolver.team_roster(&team).await?;
                Ok(Team {
                    name: team.name,
                    members,
                })
            })
        }
    };

    let mut teams = fan_out(pages, step).await?;
    teams.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(teams = teams.len(), "team fetch complete");
    Ok(teams)
}

/// Run the page producer and worker pool to completion.
///
/// Output order depends on worker interleaving; callers sort afterwards.
async fn fan_out<I, O, S>(
    pages: impl Fn(u32) -> StepFuture<Page<I>>,
    step: S,
) -> Result<Vec<O>, DirectoryError>
where
    I: Send + 'static,
    O: Send + 'static,
    S: Fn(I) -> StepFuture<O> + Clone + Send + 'static,
{
    let token = CancellationToken::new();
    let (in_tx, in_rx) = mpsc::channel::<I>(constants::FETCH_QUEUE);
    let (out_tx, mut out_rx) = mpsc::channel::<O>(constants::FETCH_QUEUE);
    let in_rx = Arc::new(Mutex::new(in_rx));

    let mut workers = Vec::with_capacity(constants::FETCH_WORKERS);
    for _ in 0..constants::FETCH_WORKERS {
        workers.push(tokio::spawn(worker(
            step.clone(),
            token.clone(),
            Arc::clone(&in_rx),
            out_tx.clone(),
        )));
    }
    // Workers hold the remaining output senders; the channel closes when the
    // last worker exits.
    drop(out_tx);

    let collector = tokio::spawn(async move {
        let mut results = Vec::new();
        while let Some(item) = out_rx.recv().await {
            results.push(item);
        }
        results
    });

    let mut first_err = produce(pages, in_tx, &token).await.err();

    for handle in workers {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) if first_err.is_none() => first_err = Some(e),
            Err(e) if first_err.is_none() => first_err = Some(DirectoryError::Join(e)),
            _ => {}
        }
    }

    let results = collector.await?;
    match first_err {
        Some(e) => Err(e),
        None => Ok(results),
    }
}

/// Feed work items from successive pages into the pipeline.
///
/// Consumes the sender; dropping it on return is what lets the workers
/// drain and exit.
async fn produce<I>(
    pages: impl Fn(u32) -> StepFuture<Page<I>>,
    tx: mpsc::Sender<I>,
    token: &CancellationToken,
) -> Result<(), DirectoryError> {
    let mut page = 1;
    loop {
        let batch = tokio::select! {
            _ = token.cancelled() => return Ok(()),
            batch = pages(page) => match batch {
                Ok(batch) => batch,
                Err(e) => {
                    token.cancel();
                    return Err(e);
                }
            },
        };

        for item in batch.items {
            // A closed channel means the workers already shut down; their
            // error surfaces at join. The send itself races the token so a
            // cancellation can't strand the producer on a full queue.
            tokio::select! {
                _ = token.cancelled() => return Ok(()),
                sent = tx.send(item) => {
                    if sent.is_err() {
                        return Ok(());
                    }
                }
            }
        }

        match batch.next {
            Some(next) => page = next,
            None => return Ok(()),
        }
    }
}

async fn worker<I, O, S>(
    step: S,
    token: CancellationToken,
    in_rx: Arc<Mutex<mpsc::Receiver<I>>>,
    out_tx: mpsc::Sender<O>,
) -> Result<(), DirectoryError>
where
    S: Fn(I) -> StepFuture<O>,
{
    loop {
        let item = {
            let mut rx = in_rx.lock().await;
            tokio::select! {
                _ = token.cancelled() => return Ok(()),
                item = rx.recv() => match item {
                    Some(item) => item,
                    None => return Ok(()),
                },
            }
        };

        match step(item).await {
            Ok(output) => {
                if out_tx.send(output).await.is_err() {
                    return Err(DirectoryError::PipelineClosed);
                }
            }
            Err(e) => {
                token.cancel();
                return Err(e);
            }
        }
    }
}
