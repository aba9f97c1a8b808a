//! Event kinds and payloads.
//!
//! Every inbound occurrence the host raises is tagged with an [`EventKind`]
//! and carries an [`EventPayload`] matching that kind. Payloads arrive either
//! already typed or as raw JSON values which the dispatcher hydrates into
//! entities before the first handler runs.

use crate::entity::{Account, Channel, Message};
use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::BitOr;

/// Category of an inbound event.
///
/// Each kind occupies a distinct bit so kinds can be combined into an
/// [`EventMask`], although handlers subscribe to exactly one kind each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EventKind {
    /// SASL PLAIN authentication attempt.
    AuthSaslPlain,
    /// Message delivered to a channel.
    ChannelMsg,
    /// Message delivered directly to a user.
    PrivateMsg,
    /// A user joins a channel.
    ChannelJoin,
    /// A user leaves a channel.
    ChannelLeave,
}

impl EventKind {
    /// Power-of-two tag for this kind.
    #[inline]
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }

    /// Number of positional payload values expected when hydrating from raw
    /// JSON (see [`EventPayload::hydrate`]).
    pub const fn arity(self) -> usize {
        match self {
            Self::AuthSaslPlain | Self::PrivateMsg => 1,
            Self::ChannelJoin | Self::ChannelLeave => 2,
            Self::ChannelMsg => 3,
        }
    }
}

/// A bit-combinable set of event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventMask(u32);

impl EventMask {
    pub const EMPTY: EventMask = EventMask(0);

    pub const fn contains(self, kind: EventKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl From<EventKind> for EventMask {
    fn from(kind: EventKind) -> Self {
        EventMask(kind.bit())
    }
}

impl BitOr for EventKind {
    type Output = EventMask;

    fn bitor(self, rhs: EventKind) -> EventMask {
        EventMask(self.bit() | rhs.bit())
    }
}

impl BitOr<EventKind> for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventKind) -> EventMask {
        EventMask(self.0 | rhs.bit())
    }
}

/// Outcome of an authentication attempt, filled in by auth handlers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    pub reason: Option<String>,
}

/// An in-flight SASL PLAIN authentication attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAttempt {
    /// Account name the client is authenticating as.
    pub account: String,
    /// Submitted credential. Verification itself is the host's concern.
    pub password: String,
    #[serde(default)]
    pub outcome: Option<AuthOutcome>,
}

/// Payload of a channel message event: the channel it targets, the sending
/// account, and the message itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelEvent {
    pub channel: Channel,
    pub account: Account,
    pub message: Message,
}

/// Payload of a join/leave event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub channel: Channel,
    pub account: Account,
}

/// Typed payload threaded through a handler chain.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)] // ChannelMsg dominates and is the hot variant
pub enum EventPayload {
    Auth(AuthAttempt),
    ChannelMsg(ChannelEvent),
    PrivateMsg(Message),
    Join(Membership),
    Leave(Membership),
}

impl EventPayload {
    /// The event kind this payload belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Auth(_) => EventKind::AuthSaslPlain,
            Self::ChannelMsg(_) => EventKind::ChannelMsg,
            Self::PrivateMsg(_) => EventKind::PrivateMsg,
            Self::Join(_) => EventKind::ChannelJoin,
            Self::Leave(_) => EventKind::ChannelLeave,
        }
    }

    /// Hydrate a payload from raw positional JSON values.
    ///
    /// Arity is fixed per kind: channel messages take (channel, account,
    /// message), join/leave take (channel, account), private messages and
    /// auth attempts take a single value. A wrong count or an incompatible
    /// shape is a [`DispatchError`]; hydration never invents defaults beyond
    /// the entities' own (id, creation time).
    pub fn hydrate(kind: EventKind, args: &[Value]) -> Result<Self, DispatchError> {
        let expected = kind.arity();
        if args.len() != expected {
            return Err(DispatchError::ArityMismatch {
                kind,
                expected,
                got: args.len(),
            });
        }

        let hydrate_err = |source| DispatchError::Hydrate { kind, source };

        match kind {
            EventKind::AuthSaslPlain => {
                let attempt = serde_json::from_value(args[0].clone()).map_err(hydrate_err)?;
                Ok(Self::Auth(attempt))
            }
            EventKind::ChannelMsg => {
                let channel = serde_json::from_value(args[0].clone()).map_err(hydrate_err)?;
                let account = serde_json::from_value(args[1].clone()).map_err(hydrate_err)?;
                let message = serde_json::from_value(args[2].clone()).map_err(hydrate_err)?;
                Ok(Self::ChannelMsg(ChannelEvent {
                    channel,
                    account,
                    message,
                }))
            }
            EventKind::PrivateMsg => {
                let message = serde_json::from_value(args[0].clone()).map_err(hydrate_err)?;
                Ok(Self::PrivateMsg(message))
            }
            EventKind::ChannelJoin | EventKind::ChannelLeave => {
                let channel = serde_json::from_value(args[0].clone()).map_err(hydrate_err)?;
                let account = serde_json::from_value(args[1].clone()).map_err(hydrate_err)?;
                let membership = Membership { channel, account };
                if kind == EventKind::ChannelJoin {
                    Ok(Self::Join(membership))
                } else {
                    Ok(Self::Leave(membership))
                }
            }
        }
    }

    /// Borrow the channel-message triple, if that is what this payload is.
    pub fn as_channel_msg(&self) -> Option<&ChannelEvent> {
        match self {
            Self::ChannelMsg(ev) => Some(ev),
            _ => None,
        }
    }

    /// Mutably borrow the channel-message triple.
    pub fn as_channel_msg_mut(&mut self) -> Option<&mut ChannelEvent> {
        match self {
            Self::ChannelMsg(ev) => Some(ev),
            _ => None,
        }
    }

    /// Borrow the message carried by this payload, for the kinds that have one.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::ChannelMsg(ev) => Some(&ev.message),
            Self::PrivateMsg(msg) => Some(msg),
            _ => None,
        }
    }
}
