mod event;
mod participant;

pub use event::{ClientEvent, ServerEvent};
pub use participant::{PairState, Participant, Profile};

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};
use uuid::Uuid;

const WAITING_MESSAGE: &str = "Waiting for partner...";

/// All matchmaking state lives behind one lock: every inbound event takes it
/// once and finishes all mutation before releasing, so the waiting slot's
/// check-and-set can never interleave with another pairing. Outbound sends go
/// over unbounded channels and never block while the lock is held.
#[derive(Default)]
pub struct Hub {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    participants: HashMap<Uuid, Participant>,
    waiting: Option<Uuid>,
    online: usize,
}

fn room_id(a: Uuid, b: Uuid) -> String {
    format!("room-{a}-{b}")
}

impl Hub {
    /// Registers a fresh connection and broadcasts the new user count.
    /// Ids are minted by the transport; a collision is a transport bug.
    pub fn connect(&self, id: Uuid, tx: UnboundedSender<ServerEvent>) {
        let mut inner = self.inner.lock().unwrap();
        let prev = inner.participants.insert(id, Participant::new(id, tx));
        assert!(prev.is_none(), "duplicate connection id {id}");
        inner.online += 1;
        let count = inner.online;
        inner.broadcast(ServerEvent::UserCount { count });
        info!(%id, online = count, "user connected");
    }

    pub fn handle(&self, id: Uuid, event: ClientEvent) {
        match event {
            ClientEvent::FindMatch { profile } => self.seek(id, profile),
            ClientEvent::SendMessage { content } => self.relay_message(id, content),
            ClientEvent::TypingStart => self.relay_typing(id, true),
            ClientEvent::TypingStop => self.relay_typing(id, false),
            ClientEvent::MessageStatus { partner_id, payload } => {
                self.relay_delivery_status(id, partner_id, payload)
            }
            ClientEvent::EndChat => self.end_chat(id),
        }
    }

    /// Either queues the seeker in the waiting slot or pairs it with the
    /// current occupant, first come, first served. A seeker never pairs with
    /// its own earlier waiting entry, and a stale occupant (already gone, or
    /// no longer waiting) is treated as an empty slot.
    pub fn seek(&self, id: Uuid, profile: Profile) {
        let mut inner = self.inner.lock().unwrap();
        match inner.participants.get(&id) {
            None => return,
            Some(p) if p.state == PairState::Paired => {
                debug!(%id, "seek while paired ignored");
                return;
            }
            Some(_) => {}
        }

        let slot = inner.waiting.take();
        let candidate = slot.filter(|occupant| {
            *occupant != id
                && inner
                    .participants
                    .get(occupant)
                    .is_some_and(|p| p.state == PairState::Waiting)
        });

        match candidate {
            None => inner.enqueue(id, profile),
            Some(partner_id) => inner.pair(id, profile, partner_id),
        }
    }

    /// Forwards the content untouched to the sender's room partner. Dropped
    /// when the sender isn't paired; that usually means the session already
    /// ended under us.
    pub fn relay_message(&self, from: Uuid, content: Value) {
        let inner = self.inner.lock().unwrap();
        let Some(partner_id) = inner.partner_of(from) else {
            debug!(%from, "message without a partner dropped");
            return;
        };
        inner.send_to(partner_id, ServerEvent::ReceiveMessage { content });
    }

    pub fn relay_typing(&self, from: Uuid, started: bool) {
        let inner = self.inner.lock().unwrap();
        let Some(partner_id) = inner.partner_of(from) else {
            return;
        };
        let event = if started {
            ServerEvent::TypingStart
        } else {
            ServerEvent::TypingStop
        };
        inner.send_to(partner_id, event);
    }

    /// Delivery/seen acks name their target explicitly; forward if that
    /// participant is still live, drop otherwise.
    pub fn relay_delivery_status(&self, from: Uuid, to: Uuid, payload: Value) {
        let inner = self.inner.lock().unwrap();
        if !inner.participants.contains_key(&from) {
            return;
        }
        inner.send_to(
            to,
            ServerEvent::MessageSeen {
                partner_id: to,
                payload,
            },
        );
    }

    /// Tells the partner the peer left and returns it to Idle (not
    /// re-queued), then puts the caller straight back into the waiting slot
    /// to seek a new partner, overwriting any previous occupant.
    pub fn end_chat(&self, id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        let Some(partner_id) = inner
            .participants
            .get(&id)
            .filter(|p| p.state == PairState::Paired)
            .and_then(|p| p.partner_id)
        else {
            return;
        };

        inner.unpair(partner_id, true);
        if let Some(me) = inner.participants.get_mut(&id) {
            me.state = PairState::Waiting;
            me.partner_id = None;
            me.room_id = None;
        }
        inner.waiting = Some(id);
        info!(%id, "chat ended, seeker re-queued");
    }

    /// Full unwind for a closed connection. Idempotent: a second disconnect
    /// of the same id finds no record and does nothing.
    pub fn disconnect(&self, id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        let Some(me) = inner.participants.remove(&id) else {
            return;
        };
        inner.online = inner.online.saturating_sub(1);
        let count = inner.online;
        inner.broadcast(ServerEvent::UserCount { count });

        if let Some(partner_id) = me.partner_id {
            inner.unpair(partner_id, true);
        }
        if inner.waiting == Some(id) {
            inner.waiting = None;
        }
        info!(%id, online = count, "user disconnected");
    }

    /// Read-only snapshot for the health endpoint: (online, slot occupancy).
    pub fn snapshot(&self) -> (usize, usize) {
        let inner = self.inner.lock().unwrap();
        (inner.online, usize::from(inner.waiting.is_some()))
    }
}

impl Inner {
    fn enqueue(&mut self, id: Uuid, profile: Profile) {
        let count = self.online;
        let Some(me) = self.participants.get_mut(&id) else {
            return;
        };
        me.state = PairState::Waiting;
        me.profile = Some(profile);
        self.waiting = Some(id);
        self.send_to(
            id,
            ServerEvent::Status {
                message: WAITING_MESSAGE.to_owned(),
                count,
            },
        );
        info!(%id, "waiting for a partner");
    }

    fn pair(&mut self, id: Uuid, profile: Profile, partner_id: Uuid) {
        let Some(partner_profile) = self
            .participants
            .get(&partner_id)
            .and_then(|p| p.profile.clone())
        else {
            // occupant lost its profile somehow; treat the slot as empty
            return self.enqueue(id, profile);
        };

        let room = room_id(id, partner_id);
        if let Some(me) = self.participants.get_mut(&id) {
            me.state = PairState::Paired;
            me.profile = Some(profile.clone());
            me.partner_id = Some(partner_id);
            me.room_id = Some(room.clone());
        }
        if let Some(partner) = self.participants.get_mut(&partner_id) {
            partner.state = PairState::Paired;
            partner.partner_id = Some(id);
            partner.room_id = Some(room.clone());
        }

        self.send_to(id, ServerEvent::match_found(partner_id, partner_profile));
        self.send_to(partner_id, ServerEvent::match_found(id, profile));
        info!(%id, %partner_id, %room, "matched");
    }

    /// Clears one side of a pairing back to Idle, optionally telling it the
    /// peer is gone. Tolerates the side having already disconnected.
    fn unpair(&mut self, id: Uuid, notify: bool) {
        let Some(p) = self.participants.get_mut(&id) else {
            return;
        };
        p.state = PairState::Idle;
        p.partner_id = None;
        p.room_id = None;
        if notify {
            let _ = p.tx.send(ServerEvent::PartnerDisconnected);
        }
    }

    /// The sender's partner, re-resolved against the registry: only returned
    /// when the sender is Paired and the partner is still live.
    fn partner_of(&self, id: Uuid) -> Option<Uuid> {
        let p = self.participants.get(&id)?;
        if p.state != PairState::Paired {
            return None;
        }
        let partner_id = p.partner_id?;
        self.participants
            .contains_key(&partner_id)
            .then_some(partner_id)
    }

    fn send_to(&self, id: Uuid, event: ServerEvent) {
        if let Some(p) = self.participants.get(&id) {
            let _ = p.tx.send(event);
        }
    }

    fn broadcast(&self, event: ServerEvent) {
        for p in self.participants.values() {
            let _ = p.tx.send(event.clone());
        }
    }
}
