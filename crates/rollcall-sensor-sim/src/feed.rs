//! Scripted finger placements.

use std::{
  collections::VecDeque,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// A finger as seen by the simulated optics.
///
/// Two prints match when their labels are equal; `quality` becomes the
/// accuracy reported by a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
  pub label:   String,
  pub quality: u16,
}

impl Fingerprint {
  pub fn new(label: impl Into<String>) -> Self {
    Self { label: label.into(), quality: 100 }
  }

  pub fn with_quality(mut self, quality: u16) -> Self {
    self.quality = quality;
    self
  }
}

/// What a single `capture()` poll observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading {
  /// A finger is on the window.
  Finger(Fingerprint),
  /// The window is empty.
  Lifted,
  /// The link to the module drops for this poll.
  Fault(String),
}

/// A shared queue of readings consumed one per `capture()` poll.
///
/// An exhausted feed reads as an empty window. Cloning is cheap; all clones
/// share the same queue.
#[derive(Debug, Clone, Default)]
pub struct FingerFeed {
  queue: Arc<Mutex<VecDeque<Reading>>>,
}

impl FingerFeed {
  fn queue(&self) -> MutexGuard<'_, VecDeque<Reading>> {
    self.queue.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn push(&self, reading: Reading) { self.queue().push_back(reading); }

  /// Put `print` on the window for one poll.
  pub fn place(&self, print: &Fingerprint) {
    self.push(Reading::Finger(print.clone()));
  }

  /// Keep `print` on the window for `polls` consecutive polls.
  pub fn hold(&self, print: &Fingerprint, polls: usize) {
    let mut queue = self.queue();
    queue.extend(std::iter::repeat_n(Reading::Finger(print.clone()), polls));
  }

  pub fn lift(&self) { self.push(Reading::Lifted); }

  /// Place, lift, and place the same finger again: the enrollment gesture.
  pub fn place_twice(&self, print: &Fingerprint) {
    self.place(print);
    self.lift();
    self.place(print);
  }

  /// Number of readings not yet consumed.
  pub fn pending(&self) -> usize { self.queue().len() }

  pub(crate) fn next(&self) -> Option<Reading> { self.queue().pop_front() }
}
