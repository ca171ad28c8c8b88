//! Cooperative routine queue.
//!
//! Long-running scripted sequences (cutscene text, room transitions,
//! tile reveals) are expressed as closures that run once per tick and
//! report whether they are finished. Routines can be enqueued from any
//! call site - including from inside another routine - via a cloned
//! [`RoutineSender`]; hand-offs land in a channel that is drained at the
//! start of the next tick. Suspension points therefore only exist at
//! tick boundaries, and nothing ever blocks inside a tick.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Mutex, PoisonError};

/// What a routine reports after one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutineStep {
    /// Run again next tick.
    Again,
    /// Finished; drop the routine.
    Done,
}

/// A tick-resumable step function over some context (a room, the world).
pub type Routine<Ctx> = Box<dyn FnMut(&mut Ctx) -> RoutineStep + Send>;

/// Cloneable enqueue handle, safe to stash in content callbacks.
///
/// The channel sender sits behind a mutex so the handle can live inside
/// the `Send + Sync` interact/prompt callbacks content registers.
pub struct RoutineSender<Ctx> {
    tx: Mutex<Sender<Routine<Ctx>>>,
}

impl<Ctx> Clone for RoutineSender<Ctx> {
    fn clone(&self) -> Self {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        Self {
            tx: Mutex::new(tx.clone()),
        }
    }
}

impl<Ctx> RoutineSender<Ctx> {
    /// Enqueues a routine; it first runs at the start of the next tick.
    pub fn push(&self, routine: impl FnMut(&mut Ctx) -> RoutineStep + Send + 'static) {
        // A closed receiver means the owning context is gone; the routine
        // silently stops being scheduled, which is the cancellation model.
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = tx.send(Box::new(routine));
    }

    /// Enqueues a single-step routine.
    pub fn once(&self, step: impl FnOnce(&mut Ctx) + Send + 'static) {
        let mut step = Some(step);
        self.push(move |ctx| {
            if let Some(f) = step.take() {
                f(ctx);
            }
            RoutineStep::Done
        });
    }
}

/// The queue itself, owned by the context it runs over.
pub struct Routines<Ctx> {
    tx: Sender<Routine<Ctx>>,
    rx: Receiver<Routine<Ctx>>,
    active: Vec<Routine<Ctx>>,
}

impl<Ctx> Default for Routines<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> Routines<Ctx> {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            active: Vec::new(),
        }
    }

    /// Handle for enqueueing from elsewhere.
    pub fn sender(&self) -> RoutineSender<Ctx> {
        RoutineSender {
            tx: Mutex::new(self.tx.clone()),
        }
    }

    /// Enqueues directly (equivalent to `sender().push(..)`).
    pub fn push(&self, routine: impl FnMut(&mut Ctx) -> RoutineStep + Send + 'static) {
        let _ = self.tx.send(Box::new(routine));
    }

    /// Moves every pending and active routine out for this tick's run.
    ///
    /// The owner cannot run routines in place - each one needs `&mut Ctx`
    /// while living inside it - so the tick protocol is: take the batch,
    /// run it, hand back what survived via [`Routines::restore`]. Routines
    /// enqueued *during* the run stay in the channel until the next take.
    pub fn take_batch(&mut self) -> Vec<Routine<Ctx>> {
        while let Ok(routine) = self.rx.try_recv() {
            self.active.push(routine);
        }
        std::mem::take(&mut self.active)
    }

    /// Returns the surviving routines after a batch run.
    pub fn restore(&mut self, kept: Vec<Routine<Ctx>>) {
        self.active = kept;
    }

    /// True when nothing is scheduled or pending hand-off.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }
}

/// Runs one tick of a context's routine queue.
///
/// `get` projects the queue out of the context; the batch runs with full
/// `&mut Ctx` access and survivors are restored in order.
pub fn run_routines<Ctx>(ctx: &mut Ctx, get: impl Fn(&mut Ctx) -> &mut Routines<Ctx>) {
    let mut batch = get(ctx).take_batch();
    batch.retain_mut(|routine| routine(ctx) == RoutineStep::Again);
    get(ctx).restore(batch);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        ticks: Vec<u32>,
        routines: Routines<Counter>,
    }

    fn tick(c: &mut Counter) {
        run_routines(c, |c| &mut c.routines);
    }

    #[test]
    fn routine_runs_once_per_tick_until_done() {
        let mut c = Counter {
            ticks: Vec::new(),
            routines: Routines::new(),
        };
        let mut n = 0;
        c.routines.push(move |c: &mut Counter| {
            n += 1;
            c.ticks.push(n);
            if n == 3 { RoutineStep::Done } else { RoutineStep::Again }
        });

        for _ in 0..5 {
            tick(&mut c);
        }
        assert_eq!(c.ticks, vec![1, 2, 3]);
        assert!(c.routines.is_idle());
    }

    #[test]
    fn routines_queued_mid_run_start_next_tick() {
        let mut c = Counter {
            ticks: Vec::new(),
            routines: Routines::new(),
        };
        let sender = c.routines.sender();
        c.routines.push(move |_c: &mut Counter| {
            sender.once(|c| c.ticks.push(99));
            RoutineStep::Done
        });

        tick(&mut c);
        assert!(c.ticks.is_empty());
        tick(&mut c);
        assert_eq!(c.ticks, vec![99]);
    }

    #[test]
    fn once_runs_exactly_one_step() {
        let mut c = Counter {
            ticks: Vec::new(),
            routines: Routines::new(),
        };
        c.routines.sender().once(|c| c.ticks.push(1));
        tick(&mut c);
        tick(&mut c);
        assert_eq!(c.ticks, vec![1]);
    }
}
