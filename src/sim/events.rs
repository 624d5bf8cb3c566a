//! Gameplay events emitted by the per-frame updates

use serde::{Deserialize, Serialize};

/// Who holds (or scored with) the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Holder {
    Player,
    Opponent,
}

/// Court end a hoop stands at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Something worth reacting to (HUD, logging) happened this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball left the player's hands
    Shot,
    /// Ball touched the floor and bounced
    Bounce,
    /// Ball was deflected by a rim
    RimHit(Side),
    /// Ball came to rest on the floor
    Rested,
    /// Ball was taken by an athlete
    PickedUp(Holder),
    /// A basket was made
    Scored { by: Holder, side: Side },
    /// Ball was handed back to the player (floor reset, manual reset)
    BallReturned,
}
