// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host collaborators: input listener registration and frame scheduling.
//!
//! The engine never talks to a windowing system directly. Instead it tells
//! its [`DangleHost`] which input streams it currently needs and when it wants
//! a frame. The host forwards platform events to the engine only while the
//! corresponding [`Listener`] is attached, and calls
//! [`Dangle::frame`](crate::Dangle::frame) with the handle it issued.
//!
//! Listener pairing is strict:
//!
//! - [`Listener::Press`] is attached when the engine is created and detached
//!   by [`Dangle::dispose`](crate::Dangle::dispose).
//! - [`Listener::Move`] and [`Listener::Release`] are attached on press and
//!   detached when the gesture ends (abandoned, tapped, or released).
//!
//! [`PollingHost`] is a ready-made implementation for event loops that poll:
//! it records which listeners are attached and holds at most one pending frame
//! request.

use core::fmt;

/// An input stream the engine can subscribe to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Listener {
    /// Pointer/touch press on the host element.
    Press,
    /// Pointer/touch movement, anywhere.
    Move,
    /// Pointer/touch release, anywhere.
    Release,
}

impl Listener {
    const ALL: [Self; 3] = [Self::Press, Self::Move, Self::Release];

    const fn index(self) -> usize {
        match self {
            Self::Press => 0,
            Self::Move => 1,
            Self::Release => 2,
        }
    }
}

/// Capabilities the engine needs from its host.
pub trait DangleHost {
    /// Identifies one requested frame; used to cancel it and to reject stale
    /// deliveries.
    type FrameHandle: Copy + Eq + fmt::Debug;

    /// Starts delivering `listener` events to the engine.
    fn listen(&mut self, listener: Listener);

    /// Stops delivering `listener` events to the engine.
    fn unlisten(&mut self, listener: Listener);

    /// Requests one call to [`Dangle::frame`](crate::Dangle::frame), roughly at
    /// the next display refresh.
    fn request_frame(&mut self) -> Self::FrameHandle;

    /// Cancels a frame request that has not been delivered yet.
    fn cancel_frame(&mut self, handle: Self::FrameHandle);
}

/// Handle issued by [`PollingHost::request_frame`](DangleHost::request_frame).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

/// A [`DangleHost`] that records state for the event loop to poll.
///
/// ```
/// use kurbo::Point;
/// use understory_dangle::{Dangle, DangleOptions, Listener, PollingHost};
///
/// let mut dangle = Dangle::new(PollingHost::new(), DangleOptions::default()).unwrap();
/// assert!(dangle.host().is_listening(Listener::Press));
/// assert!(!dangle.host().is_listening(Listener::Move));
///
/// dangle.press(&Point::new(100.0, 0.0));
/// assert!(dangle.host().is_listening(Listener::Move));
///
/// // In the event loop, deliver any pending frame:
/// if let Some(frame) = dangle.host_mut().take_frame() {
///     dangle.frame(frame, 16.0);
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct PollingHost {
    listening: [bool; 3],
    pending: Option<FrameId>,
    next_frame: u64,
}

impl PollingHost {
    /// Creates a host with nothing attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `listener` is currently attached.
    #[must_use]
    pub fn is_listening(&self, listener: Listener) -> bool {
        self.listening[listener.index()]
    }

    /// Returns `true` if any listener is attached.
    #[must_use]
    pub fn has_listeners(&self) -> bool {
        Listener::ALL.iter().any(|l| self.is_listening(*l))
    }

    /// The frame waiting to be delivered, if any.
    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending
    }

    /// Takes the pending frame so it can be delivered.
    pub fn take_frame(&mut self) -> Option<FrameId> {
        self.pending.take()
    }
}

impl DangleHost for PollingHost {
    type FrameHandle = FrameId;

    fn listen(&mut self, listener: Listener) {
        self.listening[listener.index()] = true;
    }

    fn unlisten(&mut self, listener: Listener) {
        self.listening[listener.index()] = false;
    }

    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next_frame);
        self.next_frame += 1;
        self.pending = Some(id);
        id
    }

    fn cancel_frame(&mut self, handle: FrameId) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
