// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine: offset state plus the components that read and move it.

use alloc::vec::Vec;

use kurbo::Rect;
use smallvec::SmallVec;

use crate::config::{CoverFlowConfig, GestureConfig, Gravity, LayoutMode, OpacityPolicy};
use crate::error::{CoverFlowError, check_item_count, check_visible_count};
use crate::event::{CoverFlowEvent, PointerEvent, PointerKind};
use crate::frame::{CoverItem, Frame};
use crate::gesture::{GesturePhase, GestureStateMachine, MoveOutcome, ReleaseOutcome};
use crate::index::{centered_position, wrap_position};
use crate::layout::{Measured, Viewport, child_total_height, measure};
use crate::momentum::{MomentumController, MomentumStep};
use crate::reflection::{CacheStats, ReflectionCache};
use crate::source::{CoverImage, ImageSource, MemoryBudget, ReflectionRenderer};
use crate::transform::CoverGeometry;
use crate::tween::SelectionTween;
use crate::util::{is_integral, round_half_up, to_position, wrap_offset};

/// Coverflow state engine.
///
/// The engine owns the offset, item count, and visible window, and wires the
/// gesture recognizer, momentum, selection tween, transform model, and
/// reflection cache together. It never draws: the host feeds it pointer events
/// and clock ticks, asks it for a [`Frame`], and drains [`CoverFlowEvent`]s.
///
/// A typical host loop:
///
/// 1. Forward pointer input with [`on_pointer`](Self::on_pointer).
/// 2. Call [`tick`](Self::tick) once per display refresh; redraw if it returns `true`
///    or input changed the offset.
/// 3. Draw the items of [`frame`](Self::frame) in order.
/// 4. Handle [`drain_events`](Self::drain_events).
#[derive(Debug)]
pub struct CoverFlowEngine<S: ImageSource, R> {
    source: S,
    renderer: R,
    config: CoverFlowConfig,

    item_count: usize,
    half_visible: usize,
    offset: f64,

    viewport: Option<Viewport>,
    measured: Option<Measured>,
    geometry: Option<CoverGeometry>,
    needs_layout: bool,

    cache: ReflectionCache<S::Image>,
    momentum: MomentumController,
    tween: Option<SelectionTween>,
    gestures: GestureStateMachine,

    top_index: Option<usize>,
    touch_rect: Option<Rect>,
    events: Vec<CoverFlowEvent>,
}

/// Slots per side that fit into `item_count` items.
fn effective_half(configured: usize, item_count: usize) -> usize {
    configured.min(item_count.saturating_sub(1) / 2)
}

impl<S, R> CoverFlowEngine<S, R>
where
    S: ImageSource,
    R: ReflectionRenderer<S::Image>,
{
    /// Creates an engine over `source` with the first item centered.
    ///
    /// The reflection cache budget is derived from `budget`. Fails if `config`
    /// does not validate or the source holds fewer than three items.
    pub fn new(
        source: S,
        renderer: R,
        config: CoverFlowConfig,
        budget: &impl MemoryBudget,
    ) -> Result<Self, CoverFlowError> {
        config.validate()?;
        let item_count = source.count();
        check_item_count(item_count)?;
        let half_visible = effective_half(config.half_visible(), item_count);
        tracing::debug!(item_count, half_visible, "coverflow engine created");

        Ok(Self {
            source,
            renderer,
            item_count,
            half_visible,
            offset: -(half_visible as f64),
            viewport: None,
            measured: None,
            geometry: None,
            needs_layout: true,
            cache: ReflectionCache::with_memory_budget(budget),
            momentum: MomentumController::new(),
            tween: None,
            gestures: GestureStateMachine::new(config.gesture),
            top_index: None,
            touch_rect: None,
            events: Vec::new(),
            config,
        })
    }

    /// The data source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the data source.
    ///
    /// Call [`notify_data_changed`](Self::notify_data_changed) after changing the items.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &CoverFlowConfig {
        &self.config
    }

    /// Current offset.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Current item count.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Items drawn on each side of the center, after fitting the window to the item count.
    #[must_use]
    pub const fn half_visible(&self) -> usize {
        self.half_visible
    }

    /// Index of the last item that came to rest in the center.
    ///
    /// `None` until a frame has been produced at an integral offset, and again
    /// after the data set or window changes.
    #[must_use]
    pub const fn top_index(&self) -> Option<usize> {
        self.top_index
    }

    /// Hit rectangle of the item reported by [`top_index`](Self::top_index).
    #[must_use]
    pub const fn touch_rect(&self) -> Option<Rect> {
        self.touch_rect
    }

    /// Returns `true` while momentum or a selection tween is moving the offset.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.momentum.is_active() || self.tween.is_some()
    }

    /// Phase of the current pointer session.
    #[must_use]
    pub fn gesture_phase(&self) -> GesturePhase {
        self.gestures.phase()
    }

    /// Reflection cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Sets the widget size and padding.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), CoverFlowError> {
        if !(viewport.width.is_finite() && viewport.width > 0.0) {
            return Err(CoverFlowError::InvalidWidth {
                width: viewport.width,
            });
        }
        if self.viewport != Some(viewport) {
            tracing::debug!(width = viewport.width, "viewport changed");
            self.viewport = Some(viewport);
            self.needs_layout = true;
        }
        Ok(())
    }

    /// Measures the widget, if a viewport has been set.
    ///
    /// Layout otherwise happens lazily on the next frame or pointer event.
    pub fn layout(&mut self) -> Option<Measured> {
        self.ensure_geometry()?;
        self.measured
    }

    /// Re-reads the item count from the source.
    ///
    /// See [`set_item_count`](Self::set_item_count).
    pub fn notify_data_changed(&mut self) -> Result<(), CoverFlowError> {
        let count = self.source.count();
        self.set_item_count(count)
    }

    /// Changes the item count, keeping the centered item where possible.
    ///
    /// If the last centered index no longer exists, the new last item is centered.
    /// Otherwise the offset is wrapped back into the first loop over the data so
    /// the same item stays centered. Motion stops, the reflection cache is
    /// cleared, and the widget is measured again.
    pub fn set_item_count(&mut self, count: usize) -> Result<(), CoverFlowError> {
        check_item_count(count)?;

        let old_half = self.half_visible;
        let half = effective_half(self.config.half_visible(), count);
        self.offset = match self.top_index {
            Some(top) if top >= count => (count - half - 1) as f64,
            _ => wrap_offset(self.offset, self.item_count, old_half) + old_half as f64 - half as f64,
        };
        tracing::debug!(
            old_count = self.item_count,
            count,
            half_visible = half,
            offset = self.offset,
            "data set changed"
        );
        self.item_count = count;
        self.half_visible = half;

        self.stop_motion();
        self.cache.clear();
        self.invalidate_layout();
        Ok(())
    }

    /// Sets the total number of visible items and centers the first item.
    ///
    /// `count` must be odd and at least three. It is reduced to fit the item count.
    pub fn set_visible_count(&mut self, count: usize) -> Result<(), CoverFlowError> {
        check_visible_count(count)?;
        self.config.visible_count = count;
        self.half_visible = effective_half(self.config.half_visible(), self.item_count);
        self.offset = -(self.half_visible as f64);
        tracing::debug!(count, half_visible = self.half_visible, "visible count changed");

        self.stop_motion();
        self.invalidate_layout();
        Ok(())
    }

    /// Moves the offset directly, stopping any animation. Non-finite offsets are ignored.
    ///
    /// The offset is wrapped into the first loop over the data; the same items
    /// end up in the same slots.
    pub fn set_offset(&mut self, offset: f64) {
        if !offset.is_finite() {
            tracing::debug!(offset, "ignoring non-finite offset");
            return;
        }
        self.momentum.cancel();
        self.tween = None;
        self.offset = wrap_offset(offset, self.item_count, self.half_visible);
    }

    /// Animates the carousel until `index` is centered.
    ///
    /// The offset moves linearly over [`CoverFlowConfig::selection_step_ms`] per
    /// item of distance. Selecting the item already in the center does nothing.
    pub fn set_selection(&mut self, index: usize, now_ms: u64) -> Result<(), CoverFlowError> {
        let count = self.item_count;
        if index >= count {
            return Err(CoverFlowError::IndexOutOfRange { index, count });
        }
        let top = self.centered_index();
        if top == index {
            return Ok(());
        }

        let forward = (index + count).abs_diff(top);
        let direct = index.abs_diff(top);
        let duration_ms = self
            .config
            .selection_step_ms
            .saturating_mul(forward.min(direct) as u64);
        let target = centered_position(index, self.half_visible) as f64;

        self.momentum.cancel();
        self.tween = Some(SelectionTween::new(self.offset, target, now_ms, duration_ms));
        tracing::debug!(from = top, to = index, target, duration_ms, "selection started");
        Ok(())
    }

    /// Enables or disables tap reporting.
    pub fn set_tap_enabled(&mut self, enabled: bool) {
        self.config.tap_enabled = enabled;
    }

    /// Enables or disables long-press reporting.
    pub fn set_long_press_enabled(&mut self, enabled: bool) {
        self.config.long_press_enabled = enabled;
    }

    /// Sets the reflection height fraction and gap.
    ///
    /// Negative gaps become zero. Cached reflections are dropped.
    pub fn set_reflection(&mut self, height_fraction: f64, gap: f64) -> Result<(), CoverFlowError> {
        if !(0.0..=1.0).contains(&height_fraction) {
            return Err(CoverFlowError::InvalidReflectionHeight {
                fraction: height_fraction,
            });
        }
        self.config.reflection_height = height_fraction;
        self.config.reflection_gap = gap.max(0.0);
        self.cache.clear();
        self.needs_layout = true;
        Ok(())
    }

    /// Sets the vertical placement of the child band.
    pub fn set_gravity(&mut self, gravity: Gravity) {
        self.config.gravity = gravity;
        self.needs_layout = true;
    }

    /// Sets the child band sizing policy.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.config.layout_mode = mode;
        self.needs_layout = true;
    }

    /// Sets the opacity policy.
    pub fn set_opacity(&mut self, opacity: OpacityPolicy) {
        self.config.opacity = opacity;
        self.needs_layout = true;
    }

    /// Replaces the gesture thresholds. Takes effect for the next pointer session.
    pub fn set_gesture_config(&mut self, gesture: GestureConfig) {
        self.config.gesture = gesture;
        self.gestures.set_config(gesture);
    }

    /// Feeds one pointer event.
    ///
    /// Returns `true` if the engine consumed it. After a vertical swipe has been
    /// handed to the ancestor, the rest of the session is not consumed.
    pub fn on_pointer(&mut self, event: PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down => self.pointer_down(event),
            PointerKind::Move => self.pointer_move(event),
            PointerKind::Up => self.pointer_up(event),
            PointerKind::Cancel => {
                if self.gestures.cancel() {
                    tracing::trace!("gesture cancelled");
                }
                false
            }
        }
    }

    fn pointer_down(&mut self, event: PointerEvent) -> bool {
        if self.ensure_geometry().is_none() {
            return false;
        }
        self.tween = None;
        if let Some(snapped) = self.momentum.finish(self.offset) {
            self.offset = snapped;
        }
        self.events.push(CoverFlowEvent::RequestExclusive(true));

        let arm = self.config.long_press_enabled
            && self.config.tap_enabled
            && self
                .touch_rect
                .is_some_and(|rect| rect.contains(event.position));
        self.gestures
            .press(event.position, event.time_ms, self.offset, arm);
        true
    }

    fn pointer_move(&mut self, event: PointerEvent) -> bool {
        let Some(geometry) = self.ensure_geometry() else {
            return false;
        };
        match self
            .gestures
            .on_move(event.position, event.time_ms, geometry.width())
        {
            MoveOutcome::Drag(offset) => {
                self.offset = offset;
                true
            }
            MoveOutcome::Yield => {
                self.events.push(CoverFlowEvent::RequestExclusive(false));
                false
            }
            MoveOutcome::Ignored => !matches!(
                self.gestures.phase(),
                GesturePhase::Idle | GesturePhase::Yielded
            ),
        }
    }

    fn pointer_up(&mut self, event: PointerEvent) -> bool {
        let Some(geometry) = self.ensure_geometry() else {
            self.gestures.cancel();
            return false;
        };
        let outcome = self.gestures.release(
            event.position,
            event.time_ms,
            geometry.width(),
            self.offset,
            self.touch_rect,
            self.config.tap_enabled,
        );
        match outcome {
            ReleaseOutcome::Fling { offset, velocity } => {
                self.offset = offset;
                self.momentum.start(velocity, offset, event.time_ms);
                true
            }
            ReleaseOutcome::Tap => {
                if let Some(index) = self.top_index {
                    self.events.push(CoverFlowEvent::ItemTapped(index));
                }
                true
            }
            ReleaseOutcome::None => true,
            ReleaseOutcome::Ignored => false,
        }
    }

    /// Advances time-driven state to `now_ms`.
    ///
    /// Fires a due long press and moves the offset along the running momentum or
    /// selection tween. Returns `true` if the offset changed and a redraw is needed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let fired = self.gestures.poll_long_press(now_ms);
        if let Some(index) = self.top_index.filter(|_| fired) {
            self.events.push(CoverFlowEvent::ItemLongPressed(index));
        }

        let mut redraw = false;
        match self.momentum.step(now_ms) {
            MomentumStep::Idle => {}
            MomentumStep::Moving(offset) | MomentumStep::Settled(offset) => {
                self.offset = offset;
                redraw = true;
            }
        }
        if let Some(tween) = self.tween {
            self.offset = tween.sample(now_ms);
            if tween.is_done(now_ms) {
                tracing::debug!(offset = self.offset, "selection settled");
                self.tween = None;
            }
            redraw = true;
        }
        redraw
    }

    /// Produces the draw list for the current offset.
    ///
    /// Slots whose image is unavailable, and reflections that cannot be rendered,
    /// are left out of this frame and requested again on the next one. When the
    /// offset is integral the centered item becomes the top item, and
    /// [`CoverFlowEvent::ItemCentered`] is queued if it or its rectangle changed.
    ///
    /// Returns an empty frame until a viewport has been set.
    pub fn frame(&mut self) -> Frame<S::Image> {
        let Some(geometry) = self.ensure_geometry() else {
            return Frame::empty(self.offset);
        };
        let offset = self.offset;
        let mid = self.center_position();
        let half = self.half_visible as isize;

        let mut items = SmallVec::new();
        let mut center_size = None;
        // Outer slots first so the center is painted on top.
        let left = mid.saturating_sub(half)..mid;
        let right = (mid..=mid.saturating_add(half)).rev();
        for position in left.chain(right) {
            let index = self.index_at(position);
            let Some(image) = self.source.image_at(index) else {
                tracing::trace!(index, position, "image unavailable, slot skipped");
                continue;
            };
            if !image.is_usable() {
                tracing::trace!(index, position, "image released, slot skipped");
                self.cache.remove(image.id());
                continue;
            }
            let size = image.size();
            let distance = position as f64 - offset;
            let Some(transform) = geometry.transform(distance, size) else {
                tracing::warn!(index, "image has no area, slot skipped");
                continue;
            };
            if position == mid {
                center_size = Some(size);
            }
            let reflection = self.cache.get_or_render(
                &image,
                self.config.reflection_height,
                &mut self.renderer,
            );
            items.push(CoverItem {
                slot: position - mid,
                position,
                index,
                distance,
                image,
                reflection,
                transform,
            });
        }

        if let Some(size) = center_size.filter(|_| is_integral(offset)) {
            let index = self.index_at(mid);
            if let Some(rect) = geometry.centered_rect(size) {
                self.center_on(index, rect);
            }
        }
        self.events.push(CoverFlowEvent::FrameRendered);

        Frame {
            items,
            offset,
            top_index: self.top_index,
            touch_rect: self.touch_rect,
        }
    }

    /// Takes the queued events.
    pub fn drain_events(&mut self) -> alloc::vec::Drain<'_, CoverFlowEvent> {
        self.events.drain(..)
    }

    /// Stops all motion and drops cached reflections and queued events.
    ///
    /// Call when the widget leaves the screen. A running momentum snaps to the
    /// nearest item. The top item is forgotten, so the next frame announces the
    /// centered item again.
    pub fn detach(&mut self) {
        self.gestures.cancel();
        if let Some(snapped) = self.momentum.finish(self.offset) {
            self.offset = snapped;
        }
        self.tween = None;
        self.top_index = None;
        self.touch_rect = None;
        self.cache.clear();
        self.events.clear();
        tracing::debug!("coverflow detached");
    }

    fn center_on(&mut self, index: usize, rect: Rect) {
        if self.top_index == Some(index) && self.touch_rect == Some(rect) {
            return;
        }
        self.top_index = Some(index);
        self.touch_rect = Some(rect);
        tracing::debug!(index, "item centered");
        self.events
            .push(CoverFlowEvent::ItemCentered { index, rect });
    }

    fn stop_motion(&mut self) {
        self.gestures.cancel();
        self.momentum.cancel();
        self.tween = None;
    }

    fn invalidate_layout(&mut self) {
        self.top_index = None;
        self.touch_rect = None;
        self.needs_layout = true;
    }

    fn center_position(&self) -> isize {
        to_position(round_half_up(self.offset))
    }

    fn index_at(&self, position: isize) -> usize {
        wrap_position(position, self.item_count, self.half_visible).unwrap_or_default()
    }

    /// Logical index of the item nearest to the center right now.
    fn centered_index(&self) -> usize {
        self.index_at(self.center_position())
    }

    fn tallest_visible_child(&self) -> f64 {
        let mid = self.center_position();
        let half = self.half_visible as isize;
        (mid.saturating_sub(half)..=mid.saturating_add(half))
            .filter_map(|position| self.source.image_at(self.index_at(position)))
            .filter(|image| image.is_usable())
            .map(|image| child_total_height(image.size().height, &self.config))
            .fold(0.0, f64::max)
    }

    fn ensure_geometry(&mut self) -> Option<CoverGeometry> {
        let viewport = self.viewport?;
        if !self.needs_layout && self.geometry.is_some() {
            return self.geometry;
        }
        let measured = measure(&viewport, self.tallest_visible_child(), &self.config);
        match CoverGeometry::new(
            viewport.width,
            viewport.padding,
            &measured,
            &self.config,
            self.half_visible,
        ) {
            Ok(geometry) => {
                self.measured = Some(measured);
                self.geometry = Some(geometry);
                self.needs_layout = false;
                Some(geometry)
            }
            Err(err) => {
                tracing::warn!(%err, "cannot lay out coverflow");
                self.geometry = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::HeightConstraint;
    use crate::source::{FixedMemoryBudget, ImageId};
    use alloc::vec;
    use kurbo::{Point, Size};

    #[derive(Clone, Debug, PartialEq)]
    struct Img {
        id: u64,
        size: Size,
        released: bool,
    }

    impl Img {
        fn new(id: u64) -> Self {
            Self {
                id,
                size: Size::new(200.0, 300.0),
                released: false,
            }
        }
    }

    impl CoverImage for Img {
        fn id(&self) -> ImageId {
            ImageId(self.id)
        }

        fn size(&self) -> Size {
            self.size
        }

        fn byte_size(&self) -> usize {
            1_000
        }

        fn is_usable(&self) -> bool {
            !self.released
        }
    }

    #[derive(Debug)]
    struct Source {
        images: Vec<Option<Img>>,
    }

    impl Source {
        fn new(count: u64) -> Self {
            Self {
                images: (0..count).map(|i| Some(Img::new(i))).collect(),
            }
        }
    }

    impl ImageSource for Source {
        type Image = Img;

        fn count(&self) -> usize {
            self.images.len()
        }

        fn image_at(&self, index: usize) -> Option<Img> {
            self.images.get(index).cloned().flatten()
        }
    }

    #[derive(Debug, Default)]
    struct Mirror;

    impl ReflectionRenderer<Img> for Mirror {
        fn render(&mut self, image: &Img, height_fraction: f64) -> Option<Img> {
            Some(Img {
                id: image.id + 1_000,
                size: Size::new(image.size.width, image.size.height * height_fraction),
                released: false,
            })
        }
    }

    type Engine = CoverFlowEngine<Source, Mirror>;

    const CENTER_RECT: Rect = Rect::new(200.0, 50.0, 400.0, 350.0);

    fn engine_with(count: u64, config: CoverFlowConfig) -> Engine {
        let mut engine =
            Engine::new(Source::new(count), Mirror, config, &FixedMemoryBudget(21_000_000)).unwrap();
        engine
            .set_viewport(Viewport::new(600.0, HeightConstraint::Exactly(400.0)))
            .unwrap();
        engine
    }

    fn engine(count: u64) -> Engine {
        engine_with(count, CoverFlowConfig::default())
    }

    fn events(engine: &mut Engine) -> Vec<CoverFlowEvent> {
        engine.drain_events().collect()
    }

    fn settle(engine: &mut Engine, mut now: u64) -> u64 {
        while engine.is_animating() && now < 60_000 {
            now += 16;
            engine.tick(now);
        }
        now
    }

    #[test]
    fn starts_with_the_first_item_centered() {
        let mut engine = engine(5);
        assert_eq!(engine.offset(), -1.0);
        assert_eq!(engine.top_index(), None);

        let frame = engine.frame();
        let indices: Vec<usize> = frame.items.iter().map(|item| item.index).collect();
        let slots: Vec<isize> = frame.items.iter().map(|item| item.slot).collect();
        assert_eq!(indices, vec![4, 1, 0]);
        assert_eq!(slots, vec![-1, 1, 0]);
        assert_eq!(frame.center().map(|item| item.index), Some(0));
        assert_eq!(frame.top_index, Some(0));
        assert_eq!(frame.touch_rect, Some(CENTER_RECT));
        assert_eq!(
            events(&mut engine),
            vec![
                CoverFlowEvent::ItemCentered {
                    index: 0,
                    rect: CENTER_RECT
                },
                CoverFlowEvent::FrameRendered
            ]
        );

        // Nothing changed, so only the frame notification repeats.
        engine.frame();
        assert_eq!(events(&mut engine), vec![CoverFlowEvent::FrameRendered]);
    }

    #[test]
    fn paint_order_puts_the_center_last() {
        let mut engine = engine_with(7, CoverFlowConfig::default().with_visible_count(5));
        let frame = engine.frame();
        let slots: Vec<isize> = frame.items.iter().map(|item| item.slot).collect();
        assert_eq!(slots, vec![-2, -1, 2, 1, 0]);
        let distances: Vec<f64> = frame.items.iter().map(|item| item.distance).collect();
        assert_eq!(distances, vec![-2.0, -1.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn rejects_bad_configuration() {
        let budget = FixedMemoryBudget(0);
        assert!(matches!(
            Engine::new(Source::new(2), Mirror, CoverFlowConfig::default(), &budget),
            Err(CoverFlowError::TooFewItems { count: 2 })
        ));
        assert!(matches!(
            Engine::new(
                Source::new(5),
                Mirror,
                CoverFlowConfig::default().with_visible_count(4),
                &budget
            ),
            Err(CoverFlowError::EvenVisibleCount { count: 4 })
        ));

        let mut engine = engine(5);
        assert_eq!(
            engine.set_item_count(1),
            Err(CoverFlowError::TooFewItems { count: 1 })
        );
        assert_eq!(engine.item_count(), 5);
        assert_eq!(
            engine.set_visible_count(1),
            Err(CoverFlowError::VisibleCountTooSmall { count: 1 })
        );
        assert_eq!(
            engine.set_viewport(Viewport::new(0.0, HeightConstraint::Unspecified)),
            Err(CoverFlowError::InvalidWidth { width: 0.0 })
        );
        assert!(matches!(
            engine.set_reflection(2.0, 0.0),
            Err(CoverFlowError::InvalidReflectionHeight { .. })
        ));
    }

    #[test]
    fn visible_window_shrinks_to_fit_the_items() {
        let mut engine = engine_with(5, CoverFlowConfig::default().with_visible_count(7));
        assert_eq!(engine.half_visible(), 2);
        assert_eq!(engine.offset(), -2.0);
        assert_eq!(engine.frame().len(), 5);
    }

    #[test]
    fn selection_tweens_to_the_requested_index() {
        let mut engine = engine(5);
        engine.frame();
        engine.set_selection(3, 1_000).unwrap();
        assert!(engine.is_animating());

        // From -1 to 2 over 3 items of 200 ms each.
        assert!(engine.tick(1_300));
        assert_eq!(engine.offset(), 0.5);
        assert!(engine.tick(1_600));
        assert_eq!(engine.offset(), 2.0);
        assert!(!engine.is_animating());

        let frame = engine.frame();
        assert_eq!(frame.top_index, Some(3));
        assert!(events(&mut engine).contains(&CoverFlowEvent::ItemCentered {
            index: 3,
            rect: CENTER_RECT
        }));
    }

    #[test]
    fn selection_validates_and_skips_the_current_item() {
        let mut engine = engine(5);
        assert_eq!(
            engine.set_selection(5, 0),
            Err(CoverFlowError::IndexOutOfRange { index: 5, count: 5 })
        );
        engine.set_selection(0, 0).unwrap();
        assert!(!engine.is_animating());
    }

    #[test]
    fn drag_then_fling_settles_on_an_item() {
        let mut engine = engine(5);
        engine.frame();
        events(&mut engine);

        assert!(engine.on_pointer(PointerEvent::down(Point::new(300.0, 200.0), 0)));
        assert_eq!(engine.gesture_phase(), GesturePhase::Pressed);
        assert!(engine.on_pointer(PointerEvent::moved(Point::new(150.0, 200.0), 16)));
        assert_eq!(engine.gesture_phase(), GesturePhase::Dragging);
        assert_eq!(engine.offset(), -1.0 + 0.375);

        assert!(engine.on_pointer(PointerEvent::up(Point::new(150.0, 200.0), 32)));
        assert!(engine.is_animating());
        settle(&mut engine, 32);

        let offset = engine.offset();
        assert!(!engine.is_animating());
        assert!(offset > -0.625);
        assert_eq!(offset, offset.floor());
        assert_eq!(events(&mut engine), vec![CoverFlowEvent::RequestExclusive(true)]);
    }

    #[test]
    fn press_during_momentum_snaps_to_the_nearest_item() {
        let mut engine = engine(5);
        engine.frame();
        engine.on_pointer(PointerEvent::down(Point::new(300.0, 200.0), 0));
        engine.on_pointer(PointerEvent::moved(Point::new(150.0, 200.0), 16));
        engine.on_pointer(PointerEvent::up(Point::new(150.0, 200.0), 32));
        assert!(engine.is_animating());

        engine.on_pointer(PointerEvent::down(Point::new(300.0, 200.0), 40));
        assert!(!engine.is_animating());
        assert_eq!(engine.offset(), -1.0);
    }

    #[test]
    fn tap_on_the_centered_item_is_reported() {
        let mut engine = engine(5);
        engine.frame();
        events(&mut engine);

        engine.on_pointer(PointerEvent::down(Point::new(300.0, 200.0), 0));
        engine.on_pointer(PointerEvent::moved(Point::new(302.0, 201.0), 10));
        engine.on_pointer(PointerEvent::up(Point::new(302.0, 201.0), 50));
        assert_eq!(
            events(&mut engine),
            vec![
                CoverFlowEvent::RequestExclusive(true),
                CoverFlowEvent::ItemTapped(0)
            ]
        );
        assert!(!engine.is_animating());
    }

    #[test]
    fn taps_outside_or_disabled_are_not_reported() {
        let mut engine = engine(5);
        engine.frame();
        events(&mut engine);

        engine.on_pointer(PointerEvent::down(Point::new(50.0, 200.0), 0));
        engine.on_pointer(PointerEvent::up(Point::new(50.0, 200.0), 50));
        assert!(!events(&mut engine).contains(&CoverFlowEvent::ItemTapped(0)));

        engine.set_tap_enabled(false);
        engine.on_pointer(PointerEvent::down(Point::new(300.0, 200.0), 100));
        engine.on_pointer(PointerEvent::up(Point::new(300.0, 200.0), 150));
        assert!(!events(&mut engine).contains(&CoverFlowEvent::ItemTapped(0)));
    }

    #[test]
    fn long_press_fires_once_and_suppresses_the_tap() {
        let mut engine = engine_with(5, CoverFlowConfig::default().with_long_press_enabled(true));
        engine.frame();
        events(&mut engine);

        engine.on_pointer(PointerEvent::down(Point::new(300.0, 200.0), 1_000));
        assert!(!engine.tick(1_499));
        assert_eq!(engine.gesture_phase(), GesturePhase::LongPressArmed);
        engine.tick(1_500);
        engine.tick(1_600);
        engine.on_pointer(PointerEvent::up(Point::new(300.0, 200.0), 1_700));
        assert_eq!(
            events(&mut engine),
            vec![
                CoverFlowEvent::RequestExclusive(true),
                CoverFlowEvent::ItemLongPressed(0)
            ]
        );
    }

    #[test]
    fn long_press_needs_to_be_enabled() {
        let mut engine = engine(5);
        engine.frame();
        events(&mut engine);

        engine.on_pointer(PointerEvent::down(Point::new(300.0, 200.0), 0));
        engine.tick(5_000);
        engine.on_pointer(PointerEvent::up(Point::new(300.0, 200.0), 5_001));
        assert_eq!(
            events(&mut engine),
            vec![
                CoverFlowEvent::RequestExclusive(true),
                CoverFlowEvent::ItemTapped(0)
            ]
        );
    }

    #[test]
    fn vertical_swipe_is_handed_to_the_ancestor() {
        let mut engine = engine(5);
        engine.frame();
        events(&mut engine);

        assert!(engine.on_pointer(PointerEvent::down(Point::new(300.0, 200.0), 0)));
        assert!(!engine.on_pointer(PointerEvent::moved(Point::new(307.0, 240.0), 16)));
        assert!(!engine.on_pointer(PointerEvent::moved(Point::new(400.0, 240.0), 32)));
        assert!(!engine.on_pointer(PointerEvent::up(Point::new(400.0, 240.0), 48)));

        assert_eq!(engine.offset(), -1.0);
        assert!(!engine.is_animating());
        assert_eq!(
            events(&mut engine),
            vec![
                CoverFlowEvent::RequestExclusive(true),
                CoverFlowEvent::RequestExclusive(false)
            ]
        );
    }

    #[test]
    fn cancel_is_not_consumed_and_ends_the_session() {
        let mut engine = engine(5);
        engine.frame();
        engine.on_pointer(PointerEvent::down(Point::new(300.0, 200.0), 0));
        assert!(!engine.on_pointer(PointerEvent::cancel(Point::new(300.0, 200.0), 10)));
        assert_eq!(engine.gesture_phase(), GesturePhase::Idle);
        assert!(!engine.on_pointer(PointerEvent::up(Point::new(300.0, 200.0), 20)));
    }

    #[test]
    fn missing_images_are_skipped_and_retried() {
        let mut engine = engine(5);
        engine.source_mut().images[1] = None;
        let frame = engine.frame();
        let indices: Vec<usize> = frame.items.iter().map(|item| item.index).collect();
        assert_eq!(indices, vec![4, 0]);

        engine.source_mut().images[1] = Some(Img::new(1));
        assert_eq!(engine.frame().len(), 3);
    }

    #[test]
    fn released_images_are_skipped_and_their_reflections_dropped() {
        let mut engine = engine_with(5, CoverFlowConfig::default().with_reflection_height(0.5));
        assert_eq!(engine.frame().len(), 3);
        assert_eq!(engine.cache_stats().entries, 3);

        if let Some(image) = engine.source_mut().images[1].as_mut() {
            image.released = true;
        }
        let frame = engine.frame();
        let indices: Vec<usize> = frame.items.iter().map(|item| item.index).collect();
        assert_eq!(indices, vec![4, 0]);
        assert_eq!(engine.cache_stats().entries, 2);

        engine.source_mut().images[1] = Some(Img::new(1));
        assert_eq!(engine.frame().len(), 3);
        assert_eq!(engine.cache_stats().entries, 3);
    }

    #[test]
    fn reflections_are_cached_across_frames() {
        let mut engine = engine_with(5, CoverFlowConfig::default().with_reflection_height(0.5));
        let frame = engine.frame();
        assert!(frame.items.iter().all(|item| item.reflection.is_some()));
        let stats = engine.cache_stats();
        assert_eq!((stats.misses, stats.hits, stats.entries), (3, 0, 3));

        engine.frame();
        let stats = engine.cache_stats();
        assert_eq!((stats.misses, stats.hits, stats.entries), (3, 3, 3));
    }

    #[test]
    fn data_change_centers_the_last_item_when_the_top_disappears() {
        let mut engine = engine(5);
        engine.set_offset(3.0);
        assert_eq!(engine.frame().top_index, Some(4));

        engine.source_mut().images.truncate(3);
        engine.notify_data_changed().unwrap();
        assert_eq!(engine.item_count(), 3);
        assert_eq!(engine.offset(), 1.0);
        assert_eq!(engine.top_index(), None);
        assert_eq!(engine.frame().top_index, Some(2));
    }

    #[test]
    fn data_change_wraps_the_offset_into_the_first_loop() {
        let mut engine = engine_with(5, CoverFlowConfig::default().with_reflection_height(0.5));
        engine.set_offset(7.0);
        assert_eq!(engine.frame().top_index, Some(3));
        assert_eq!(engine.cache_stats().entries, 3);

        engine.notify_data_changed().unwrap();
        assert_eq!(engine.offset(), 2.0);
        assert_eq!(engine.cache_stats().entries, 0);
        assert_eq!(engine.frame().top_index, Some(3));
    }

    #[test]
    fn data_change_to_too_few_items_is_rejected() {
        let mut engine = engine(5);
        engine.source_mut().images.truncate(2);
        assert_eq!(
            engine.notify_data_changed(),
            Err(CoverFlowError::TooFewItems { count: 2 })
        );
        assert_eq!(engine.item_count(), 5);
    }

    #[test]
    fn visible_count_change_recenters_the_first_item() {
        let mut engine = engine(7);
        engine.set_offset(2.0);
        engine.set_visible_count(5).unwrap();
        assert_eq!(engine.half_visible(), 2);
        assert_eq!(engine.offset(), -2.0);
        let frame = engine.frame();
        assert_eq!(frame.len(), 5);
        assert_eq!(frame.top_index, Some(0));
    }

    #[test]
    fn nothing_happens_without_a_viewport() {
        let mut engine = Engine::new(
            Source::new(5),
            Mirror,
            CoverFlowConfig::default(),
            &FixedMemoryBudget(0),
        )
        .unwrap();
        assert!(engine.frame().is_empty());
        assert!(!engine.on_pointer(PointerEvent::down(Point::new(10.0, 10.0), 0)));
        assert!(events(&mut engine).is_empty());
        assert_eq!(engine.layout(), None);
    }

    #[test]
    fn detach_stops_motion_and_clears_the_cache() {
        let mut engine = engine_with(5, CoverFlowConfig::default().with_reflection_height(0.5));
        engine.frame();
        engine.set_selection(2, 0).unwrap();
        engine.tick(100);
        engine.detach();
        assert!(!engine.is_animating());
        assert_eq!(engine.cache_stats().entries, 0);
        assert!(events(&mut engine).is_empty());
    }

    #[test]
    fn huge_offsets_wrap_into_the_first_loop() {
        let mut engine = engine(5);
        for offset in [1e300, -1e300, f64::MAX, f64::MIN] {
            engine.set_offset(offset);
            let wrapped = engine.offset();
            assert!((-1.0..4.0).contains(&wrapped), "{offset} wrapped to {wrapped}");
            assert_eq!(engine.frame().len(), 3);
        }

        engine.set_offset(13.0);
        assert_eq!(engine.offset(), 3.0);
        assert_eq!(engine.frame().top_index, Some(4));
    }

    #[test]
    fn long_selections_saturate_the_duration() {
        let mut engine = engine_with(
            5,
            CoverFlowConfig::default().with_selection_step_ms(u64::MAX),
        );
        engine.set_selection(2, 0).unwrap();
        assert!(engine.is_animating());
        assert!(engine.tick(1_000));
        assert!(engine.is_animating());
    }

    #[test]
    fn detach_forgets_the_top_item() {
        let mut engine = engine(5);
        engine.frame();
        assert_eq!(engine.top_index(), Some(0));

        engine.detach();
        assert_eq!(engine.top_index(), None);
        assert_eq!(engine.touch_rect(), None);
        engine.frame();
        assert_eq!(
            events(&mut engine),
            vec![
                CoverFlowEvent::ItemCentered {
                    index: 0,
                    rect: CENTER_RECT
                },
                CoverFlowEvent::FrameRendered
            ]
        );
    }

    #[test]
    fn layout_reports_the_measured_widget() {
        let mut engine = engine(5);
        let measured = engine.layout().unwrap();
        assert_eq!(measured.size, Size::new(600.0, 400.0));
        assert_eq!(measured.child_height, 300.0);
        assert_eq!(measured.child_translate_y, 50.0);
    }
}
