#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Block-reaction dispatch for actors whose moves were stopped.
//!
//! The world reports a stopped move as [`Event::MoveBlocked`]. The
//! [`Movement`] system routes each such event to exactly one
//! [`BlockReactionHandler`], chosen by the kind of the blocked actor, and
//! collects the resulting [`Interaction`]s for whoever tracks score, health
//! and scene transitions.

use std::fmt;

use log::debug;
use rogue_grid_core::{ActorId, ActorKind, Event, Occupant, OccupantCategory};
use serde::{Deserialize, Serialize};

/// What a blocked actor does to the occupant in its way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Damage the blocker: an enemy, a player, or a destructible wall.
    Attack,
    /// The player bumped into the exit.
    ReachExit,
}

/// Reaction produced when an actor is blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interaction {
    /// Actor whose move was blocked.
    pub actor: ActorId,
    /// Reaction chosen by the handler.
    pub kind: InteractionKind,
    /// Occupant that stopped the move.
    pub target: Occupant,
}

/// Reacts to a move that was stopped by `blocker`.
pub trait BlockReactionHandler: fmt::Debug {
    /// Called once per blocked move. Pushes zero or more interactions.
    fn on_blocked(&mut self, actor: ActorId, blocker: &Occupant, out: &mut Vec<Interaction>);
}

/// Handler that maps the blocker's category to a fixed reaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReactionTable {
    reactions: [Option<InteractionKind>; OccupantCategory::ALL.len()],
}

impl ReactionTable {
    /// Table that ignores every blocker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reactions: [None; OccupantCategory::ALL.len()],
        }
    }

    /// Player defaults: attack enemies and inner walls, leave through the exit.
    #[must_use]
    pub const fn player() -> Self {
        Self::new()
            .with(OccupantCategory::Enemy, InteractionKind::Attack)
            .with(OccupantCategory::InnerWall, InteractionKind::Attack)
            .with(OccupantCategory::Exit, InteractionKind::ReachExit)
    }

    /// Enemy defaults: attack the player.
    #[must_use]
    pub const fn enemy() -> Self {
        Self::new().with(OccupantCategory::Player, InteractionKind::Attack)
    }

    /// Returns a copy reacting to `category` with `kind`.
    #[must_use]
    pub const fn with(mut self, category: OccupantCategory, kind: InteractionKind) -> Self {
        self.reactions[category.index()] = Some(kind);
        self
    }

    /// Returns a copy that ignores `category`.
    #[must_use]
    pub const fn without(mut self, category: OccupantCategory) -> Self {
        self.reactions[category.index()] = None;
        self
    }

    /// Reaction registered for `category`.
    #[must_use]
    pub const fn reaction(&self, category: OccupantCategory) -> Option<InteractionKind> {
        self.reactions[category.index()]
    }
}

impl BlockReactionHandler for ReactionTable {
    fn on_blocked(&mut self, actor: ActorId, blocker: &Occupant, out: &mut Vec<Interaction>) {
        if let Some(kind) = self.reaction(blocker.category) {
            out.push(Interaction {
                actor,
                kind,
                target: *blocker,
            });
        }
    }
}

/// Pure system that turns blocked moves into interactions.
#[derive(Debug)]
pub struct Movement {
    player: Box<dyn BlockReactionHandler>,
    enemy: Box<dyn BlockReactionHandler>,
}

impl Movement {
    /// Creates a system with explicit handlers per actor kind.
    #[must_use]
    pub fn new(
        player: Box<dyn BlockReactionHandler>,
        enemy: Box<dyn BlockReactionHandler>,
    ) -> Self {
        Self { player, enemy }
    }

    /// Replaces the handler used for actors of `kind`.
    pub fn set_handler(&mut self, kind: ActorKind, handler: Box<dyn BlockReactionHandler>) {
        match kind {
            ActorKind::Player => self.player = handler,
            ActorKind::Enemy => self.enemy = handler,
        }
    }

    /// Consumes world events and emits the reactions to every blocked move.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Interaction>) {
        for event in events {
            let Event::MoveBlocked {
                actor,
                kind,
                blocker,
            } = event
            else {
                continue;
            };

            let handler = match kind {
                ActorKind::Player => &mut self.player,
                ActorKind::Enemy => &mut self.enemy,
            };
            let before = out.len();
            handler.on_blocked(*actor, blocker, out);
            debug!(
                "{kind:?} {} blocked by {:?}: {} interactions",
                actor.get(),
                blocker.category,
                out.len() - before
            );
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Box::new(ReactionTable::player()), Box::new(ReactionTable::enemy()))
    }
}
