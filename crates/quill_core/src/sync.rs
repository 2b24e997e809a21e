//! Reaction synchronizer planning.
//!
//! Planning is separated from execution so the convergence rules can be
//! checked without a platform: [`plan_reaction_sync`] walks the live and the
//! desired rows in lockstep and emits the operations a platform adapter then
//! performs in order. [`plan_reaction_patch`] is the cheaper variant for
//! messages whose reaction order does not matter.

use crate::{LiveReaction, ReactionToken};

/// One reaction operation against a live message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOp {
    /// Add the bot's own reaction
    Add(ReactionToken),
    /// Remove every reaction with this emoji, other users' included
    Clear(ReactionToken),
}

/// Ordered reaction operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionPlan {
    ops: Vec<ReactionOp>,
}

impl ReactionPlan {
    /// Operations in execution order.
    pub fn ops(&self) -> &[ReactionOp] {
        &self.ops
    }

    /// Nothing to do.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Whether any operation removes reactions.
    pub fn clears(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, ReactionOp::Clear(_)))
    }

    /// Whether any operation adds reactions.
    pub fn adds(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, ReactionOp::Add(_)))
    }
}

impl IntoIterator for ReactionPlan {
    type Item = ReactionOp;
    type IntoIter = std::vec::IntoIter<ReactionOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// Plan the operations converging `live` onto `desired`, positions included.
///
/// The platform appends every addition to the end of the row, so the walk
/// keeps a live entry only while it lines up with the next desired one.
/// Mismatched live entries are cleared until the wanted entry turns up; once
/// the live row is exhausted the rest of `desired` is added in order and any
/// live entries left over are cleared. An entry placed only by other users
/// gets the bot's reaction added without touching theirs, which keeps its
/// position. Executing the plan leaves the live row equal to `desired`.
///
/// # Examples
///
/// ```
/// use quill_core::{LiveReaction, ReactionOp, ReactionToken, plan_reaction_sync};
///
/// let live = vec![LiveReaction::mine("A")];
/// let desired: Vec<ReactionToken> = vec!["X".into(), "A".into()];
/// let plan = plan_reaction_sync(&live, &desired);
/// assert_eq!(
///     plan.ops(),
///     &[
///         ReactionOp::Clear("A".into()),
///         ReactionOp::Add("X".into()),
///         ReactionOp::Add("A".into()),
///     ]
/// );
/// ```
pub fn plan_reaction_sync(live: &[LiveReaction], desired: &[ReactionToken]) -> ReactionPlan {
    let mut ops = Vec::new();
    let mut cursor = 0;

    for want in desired {
        while let Some(current) = live.get(cursor)
            && &current.token != want
        {
            ops.push(ReactionOp::Clear(current.token.clone()));
            cursor += 1;
        }

        match live.get(cursor) {
            Some(current) => {
                if !current.me {
                    ops.push(ReactionOp::Add(want.clone()));
                }
                cursor += 1;
            }
            None => ops.push(ReactionOp::Add(want.clone())),
        }
    }

    for stale in &live[cursor.min(live.len())..] {
        ops.push(ReactionOp::Clear(stale.token.clone()));
    }

    ReactionPlan { ops }
}

/// Plan the fewest operations giving the bot exactly the `desired` reactions,
/// ignoring where they land.
///
/// Live entries nothing wants are cleared, then every desired entry the bot
/// has not reacted with is added. Additions land at the end of the row, so
/// the resulting order can differ from `desired`; callers re-read the live
/// row after executing a plan that adds.
///
/// ```
/// use quill_core::{LiveReaction, ReactionOp, ReactionToken, plan_reaction_patch};
///
/// let live = vec![LiveReaction::mine("A"), LiveReaction::mine("B"), LiveReaction::mine("C")];
/// let desired: Vec<ReactionToken> = vec!["A".into(), "X".into(), "C".into()];
/// let plan = plan_reaction_patch(&live, &desired);
/// assert_eq!(
///     plan.ops(),
///     &[ReactionOp::Clear("B".into()), ReactionOp::Add("X".into())]
/// );
/// ```
pub fn plan_reaction_patch(live: &[LiveReaction], desired: &[ReactionToken]) -> ReactionPlan {
    let clears = live
        .iter()
        .filter(|r| !desired.contains(&r.token))
        .map(|r| ReactionOp::Clear(r.token.clone()));
    let mut ops: Vec<ReactionOp> = clears.collect();
    ops.extend(plan_additive(live, desired));
    ReactionPlan { ops }
}

/// Plan additions only: every desired entry the bot has not reacted with yet.
///
/// Used when a full rebuild is required but clearing is not permitted; extra
/// live entries stay where they are.
pub fn plan_additive(live: &[LiveReaction], desired: &[ReactionToken]) -> ReactionPlan {
    let ops = desired
        .iter()
        .filter(|want| !live.iter().any(|r| &r.token == *want && r.me))
        .map(|want| ReactionOp::Add(want.clone()))
        .collect();
    ReactionPlan { ops }
}
