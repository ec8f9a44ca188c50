//! Sequential playback of animation queues.

use super::animation::Animation;
use super::node::SpatialNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Built but not yet started; ticks are ignored.
    Idle,
    /// Playing the animation at this queue index.
    Running(usize),
    /// Queue drained. Terminal.
    Done,
}

/// Plays a queue of [`Animation`]s strictly one after another.
///
/// Queue order is playback order. A tick advances at most one position in
/// the queue: when an animation finishes, its successor starts on the
/// *next* tick and the leftover `dt` is dropped rather than redistributed.
/// Nothing observes sub-tick boundaries, so the simpler rule wins.
#[derive(Debug, Default)]
pub struct Animator {
    queue: Vec<Animation>,
    state: State,
}

impl Default for State {
    fn default() -> Self {
        State::Idle
    }
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an animation to the back of the queue.
    ///
    /// Animations may be queued while running and will be reached in turn,
    /// but a `Done` animator stays done; additions after the queue has
    /// drained never play.
    pub fn add_animation(&mut self, animation: Animation) {
        self.queue.push(animation);
    }

    pub fn animations(&self) -> &[Animation] {
        &self.queue
    }

    /// Arms playback at the front of the queue. An empty queue completes
    /// immediately. No-op unless idle.
    pub fn start(&mut self) {
        if self.state != State::Idle {
            return;
        }
        self.state = if self.queue.is_empty() {
            State::Done
        } else {
            State::Running(0)
        };
    }

    pub fn is_started(&self) -> bool {
        self.state != State::Idle
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Advances the current animation by `dt`, resolving its target inside
    /// `roots`.
    ///
    /// # Panics
    ///
    /// Panics when the current animation's target is not reachable from
    /// `roots`. Animations hold ids, not references; an unresolvable id
    /// means the scene was assembled wrong, not a runtime condition to
    /// limp through.
    pub fn tick(&mut self, dt: f32, roots: &mut [SpatialNode]) {
        let State::Running(index) = self.state else {
            return;
        };

        let animation = &mut self.queue[index];
        let target_id = animation.target();
        let target = roots
            .iter_mut()
            .find_map(|root| root.find_mut(target_id))
            .unwrap_or_else(|| panic!("animation target {target_id} is not in the scene"));

        animation.advance(dt, target);

        if animation.is_finished() {
            let next = index + 1;
            self.state = if next < self.queue.len() {
                State::Running(next)
            } else {
                State::Done
            };
        }
    }
}
