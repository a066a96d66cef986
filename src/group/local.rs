use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, warn};

use super::{Communicator, Proposal};
use crate::{Error, Float, Result};

enum Message<T> {
    Arrive,
    Propose(Option<Proposal<T>>),
}

impl<T> Message<T> {
    fn kind(&self) -> &'static str {
        match self {
            Message::Arrive => "barrier arrival",
            Message::Propose(_) => "proposal",
        }
    }
}

enum Role<T> {
    /// Rank 0: one inbox per follower, one outbox per follower.
    Leader {
        inboxes: Vec<Receiver<Message<T>>>,
        outboxes: Vec<Sender<Message<T>>>,
    },
    Follower {
        to_leader: Sender<Message<T>>,
        from_leader: Receiver<Message<T>>,
    },
}

/// In-process group member. Collectives gather at rank 0, which combines the
/// messages and sends the result back to every follower.
pub struct LocalComm<T> {
    rank: usize,
    size: usize,
    role: Role<T>,
}

impl<T: Float> LocalComm<T> {
    /// Wire up a group of `size` members, returned in rank order.
    pub fn wire(size: usize) -> Vec<Self> {
        let mut inboxes = Vec::with_capacity(size.saturating_sub(1));
        let mut outboxes = Vec::with_capacity(size.saturating_sub(1));
        let mut followers = Vec::with_capacity(size);

        for rank in 1..size {
            let (to_leader, inbox) = bounded(1);
            let (outbox, from_leader) = bounded(1);
            inboxes.push(inbox);
            outboxes.push(outbox);
            followers.push(LocalComm {
                rank,
                size,
                role: Role::Follower {
                    to_leader,
                    from_leader,
                },
            });
        }

        let leader = LocalComm {
            rank: 0,
            size,
            role: Role::Leader { inboxes, outboxes },
        };

        let mut comms = Vec::with_capacity(size);
        comms.push(leader);
        comms.extend(followers);
        comms
    }

    fn collective(&self, local: Message<T>) -> Result<Message<T>> {
        match &self.role {
            Role::Leader { inboxes, outboxes } => {
                let mut acc = local;
                for (i, inbox) in inboxes.iter().enumerate() {
                    let rank = i + 1;
                    let message = inbox
                        .recv()
                        .map_err(|_| Error::GroupDisconnected { rank })?;
                    acc = combine(acc, message, rank)?;
                }
                for (i, outbox) in outboxes.iter().enumerate() {
                    outbox
                        .send(acc.duplicate())
                        .map_err(|_| Error::GroupDisconnected { rank: i + 1 })?;
                }
                Ok(acc)
            }
            Role::Follower {
                to_leader,
                from_leader,
            } => {
                let expected = local.kind();
                to_leader
                    .send(local)
                    .map_err(|_| Error::GroupDisconnected { rank: 0 })?;
                let reply = from_leader
                    .recv()
                    .map_err(|_| Error::GroupDisconnected { rank: 0 })?;
                if reply.kind() != expected {
                    return Err(Error::ProtocolViolation {
                        rank: 0,
                        expected,
                    });
                }
                Ok(reply)
            }
        }
    }
}

impl<T: Copy> Message<T> {
    fn duplicate(&self) -> Self {
        match self {
            Message::Arrive => Message::Arrive,
            Message::Propose(p) => Message::Propose(*p),
        }
    }
}

fn combine<T: Float>(acc: Message<T>, incoming: Message<T>, rank: usize) -> Result<Message<T>> {
    match (acc, incoming) {
        (Message::Arrive, Message::Arrive) => Ok(Message::Arrive),
        (Message::Propose(a), Message::Propose(b)) => Ok(Message::Propose(Proposal::pick(a, b))),
        (expected, _) => Err(Error::ProtocolViolation {
            rank,
            expected: expected.kind(),
        }),
    }
}

impl<T: Float> Communicator<T> for LocalComm<T> {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) -> Result<()> {
        self.collective(Message::Arrive).map(|_| ())
    }

    fn agree(&self, local: Option<Proposal<T>>) -> Result<Option<Proposal<T>>> {
        match self.collective(Message::Propose(local))? {
            Message::Propose(best) => Ok(best),
            Message::Arrive => Err(Error::ProtocolViolation {
                rank: 0,
                expected: "proposal",
            }),
        }
    }
}

/// The global pool of workers a run can draw its group from.
#[derive(Clone, Copy, Debug)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// One worker per available hardware thread.
    pub fn available() -> Self {
        let size = thread::available_parallelism().map_or(1, |n| n.get());
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Admit ranks `0..p`; the rest of the pool sits this run out.
    pub fn split(&self, p: usize) -> Result<Group> {
        if p == 0 {
            return Err(Error::InvalidParameter {
                name: "p",
                message: "a group needs at least one worker",
            });
        }
        if p > self.size {
            warn!(requested = p, available = self.size, "worker pool too small");
            return Err(Error::InsufficientWorkers {
                requested: p,
                available: self.size,
            });
        }

        debug!(admitted = p, excluded = self.size - p, "split worker pool");
        Ok(Group { size: p })
    }
}

/// A group of workers admitted from a [`WorkerPool`].
#[derive(Clone, Copy, Debug)]
pub struct Group {
    size: usize,
}

impl Group {
    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `f` on every member, each on its own thread, and return the results in
    /// rank order once all members are done.
    pub fn run<T, R, F>(&self, f: F) -> Result<Vec<R>>
    where
        T: Float,
        R: Send,
        F: Fn(&LocalComm<T>) -> Result<R> + Sync,
    {
        let f = &f;
        let outcomes: Vec<Result<R>> = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.size);
            for comm in LocalComm::<T>::wire(self.size) {
                let rank = comm.rank;
                let handle = thread::Builder::new()
                    .name(format!("dpam-worker-{}", rank))
                    .spawn_scoped(scope, move || f(&comm))?;
                handles.push(handle);
            }

            Ok::<_, Error>(
                handles
                    .into_iter()
                    .enumerate()
                    .map(|(rank, handle)| {
                        handle
                            .join()
                            .unwrap_or(Err(Error::WorkerPanicked { rank }))
                    })
                    .collect(),
            )
        })?;

        // Report the root cause rather than the peers that saw it as a disconnect.
        if outcomes.iter().any(Result::is_err) {
            let mut errors: Vec<Error> = outcomes.into_iter().filter_map(|r| r.err()).collect();
            let root = errors
                .iter()
                .position(|e| !matches!(e, Error::GroupDisconnected { .. }))
                .unwrap_or(0);
            return Err(errors.swap_remove(root));
        }

        outcomes.into_iter().collect()
    }
}
