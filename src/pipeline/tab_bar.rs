//! Main context.
//!
//! [`TabBar`] owns the navigation-facing half of the bar: it mirrors
//! navigation state into shared cells, runs layout callbacks, drains the
//! reaction channel into the navigation collaborator and derives the frame
//! the renderer draws.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use spark_signals::{signal, Signal};

use crate::config::TabBarConfig;
use crate::error::Result;
use crate::layout::{measure_bar, BarLayoutInput, MeasuredLayout, TextMeasure};
use crate::navigation::{visibility_intent, Descriptors, NavigationShape, Navigator, RouteRef};
use crate::presets::{ItemInput, ItemVisual, Preset, ResolvedSizing};
use crate::reaction::{Change, Dispatcher, SubscriptionId};
use crate::shared::{SharedIndex, SharedRect, SharedScalar};
use crate::state::{
    bridge_index_change, bridge_long_press, BarLayout, BridgeOutcome, FocusTransition,
    GestureConfig, GestureRecognizer, ItemLayout, Observation, PositionMode, SelectionState,
    VisibilityPhase, VisibilityView,
};
use crate::tabs::{merge_tabs, MergedTab};
use crate::types::{LayoutBox, Rgba};

use super::animator::{AnimatorCommand, FrameClock, InputSender, ItemSet, ItemWatch};

type IndexHook = Box<dyn FnMut(usize)>;

/// Navigation view shared with the reaction handlers.
#[derive(Default)]
pub(crate) struct BridgeState {
    pub(crate) routes: Vec<RouteRef>,
    pub(crate) on_index_change: Option<IndexHook>,
    pub(crate) on_long_press: Option<IndexHook>,
    pub(crate) last_outcome: Option<BridgeOutcome>,
}

/// Handler for SelectedIndex crossings.
pub(crate) fn index_change_handler(
    bridge: Rc<RefCell<BridgeState>>,
) -> impl FnMut(&mut (dyn Navigator + 'static), Change) + 'static {
    move |navigator, change| {
        let observed = Observation::decode(change.current);
        let state = &mut *bridge.borrow_mut();
        let outcome = bridge_index_change(observed, &state.routes, navigator);
        if let (Ok(index), Some(hook)) = (usize::try_from(observed.index), state.on_index_change.as_mut()) {
            hook(index);
        }
        state.last_outcome = Some(outcome);
    }
}

/// Handler for confirmed long presses.
pub(crate) fn long_press_handler(
    bridge: Rc<RefCell<BridgeState>>,
) -> impl FnMut(&mut (dyn Navigator + 'static), Change) + 'static {
    move |navigator, change| {
        let Ok(index) = usize::try_from(change.current) else {
            return;
        };
        let state = &mut *bridge.borrow_mut();
        if bridge_long_press(index, &state.routes, navigator) {
            if let Some(hook) = state.on_long_press.as_mut() {
                hook(index);
            }
        }
    }
}

struct MountedItem {
    route_key: String,
    layout: ItemLayout,
    focus: SharedScalar,
    region: SharedRect,
    selected: Signal<bool>,
    subscription: SubscriptionId,
}

// =============================================================================
// FRAME
// =============================================================================

/// One item as the renderer sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFrame {
    pub key: String,
    pub title: String,
    pub glyph: Option<String>,
    pub region: LayoutBox,
    pub container_width: f64,
    pub container_height: f64,
    pub focus: f64,
    pub selected: bool,
    pub visual: ItemVisual,
}

/// Everything needed to draw the bar once.
#[derive(Debug, Clone, PartialEq)]
pub struct TabBarFrame {
    pub bar: LayoutBox,
    pub translate_y: f64,
    pub position_mode: PositionMode,
    pub phase: VisibilityPhase,
    pub background: Option<Rgba>,
    pub selected_index: Option<usize>,
    pub is_rtl: bool,
    pub items: Vec<ItemFrame>,
}

/// What a preset renderer is handed.
#[derive(Debug, Clone)]
pub struct TabBarProps<'a> {
    pub preset: &'static str,
    pub tabs: &'a [MergedTab],
    /// Read-only for renderers.
    pub selected_index: SharedIndex,
    pub sizing: ResolvedSizing,
    pub is_rtl: bool,
}

// =============================================================================
// TAB BAR
// =============================================================================

pub struct TabBar {
    config: TabBarConfig,
    preset: Arc<dyn Preset>,
    sizing: ResolvedSizing,
    background: Option<Rgba>,
    selection: SelectionState,
    bar: BarLayout,
    visibility: VisibilityView,
    tabs: Vec<MergedTab>,
    items: Vec<MountedItem>,
    bridge: Rc<RefCell<BridgeState>>,
    dispatcher: Dispatcher<dyn Navigator>,
    commands: Sender<AnimatorCommand>,
    input: InputSender,
    gesture: GestureConfig,
    measure: Box<dyn TextMeasure>,
    last_layout: MeasuredLayout,
    clock: FrameClock,
}

/// Pieces assembled by `mount`.
pub(crate) struct TabBarParts {
    pub(crate) config: TabBarConfig,
    pub(crate) preset: Arc<dyn Preset>,
    pub(crate) sizing: ResolvedSizing,
    pub(crate) background: Option<Rgba>,
    pub(crate) selection: SelectionState,
    pub(crate) bar: BarLayout,
    pub(crate) visibility: VisibilityView,
    pub(crate) bridge: Rc<RefCell<BridgeState>>,
    pub(crate) dispatcher: Dispatcher<dyn Navigator>,
    pub(crate) commands: Sender<AnimatorCommand>,
    pub(crate) input: InputSender,
    pub(crate) measure: Box<dyn TextMeasure>,
    pub(crate) clock: FrameClock,
}

impl TabBar {
    pub(crate) fn from_parts(parts: TabBarParts) -> Self {
        let gesture = GestureConfig {
            long_press_min: parts.config.long_press(),
        };
        Self {
            config: parts.config,
            preset: parts.preset,
            sizing: parts.sizing,
            background: parts.background,
            selection: parts.selection,
            bar: parts.bar,
            visibility: parts.visibility,
            tabs: Vec::new(),
            items: Vec::new(),
            bridge: parts.bridge,
            dispatcher: parts.dispatcher,
            commands: parts.commands,
            input: parts.input,
            gesture,
            measure: parts.measure,
            last_layout: MeasuredLayout::default(),
            clock: parts.clock,
        }
    }

    /// Accept new navigation state. Call whenever it changes.
    pub fn sync(&mut self, shape: &NavigationShape, descriptors: &Descriptors) -> Result<()> {
        let state = shape.state();
        let active = state.active_route()?.name.clone();
        let tabs = merge_tabs(&state.routes, descriptors, &self.config.tabs)?;

        {
            let mut bridge = self.bridge.borrow_mut();
            bridge.routes = state.routes.clone();
        }

        let remount = self.items.len() != state.routes.len()
            || self
                .items
                .iter()
                .zip(&state.routes)
                .any(|(item, route)| item.route_key != route.key);

        if remount
            && self
                .selection
                .current()
                .is_some_and(|index| index >= state.routes.len())
        {
            self.selection.reset_navigation();
        }
        self.selection.set_from_navigation(state.index);

        if remount {
            self.remount(&state.routes);
        }
        self.tabs = tabs;

        let visible = visibility_intent(shape, descriptors)?;
        if self.visibility.set_intent(visible) {
            tracing::debug!(visible, route = %active, "visibility intent changed");
        }
        Ok(())
    }

    fn remount(&mut self, routes: &[RouteRef]) {
        let selected = self.selection.cell();
        let current = selected.raw();

        let mut retired = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            self.dispatcher.unregister(item.subscription);
            retired.push(item.subscription);
        }

        let mut focus = Vec::with_capacity(routes.len());
        let mut recognizers = Vec::with_capacity(routes.len());
        let mut watches = Vec::with_capacity(routes.len());
        for (index, route) in routes.iter().enumerate() {
            let transition = FocusTransition::new(index);
            let region = SharedRect::new();
            let is_selected = current == index as i64;
            let selected_signal = signal(is_selected);

            let writer = selected_signal.clone();
            let notifier = self.dispatcher.register(move |_, change: Change| {
                writer.set(change.current == 1);
            });
            let subscription = notifier.id();
            let watched = selected.clone();
            watches.push(ItemWatch {
                source: Box::new(move || (watched.raw() == index as i64) as i64),
                baseline: is_selected as i64,
                notifier,
            });

            self.items.push(MountedItem {
                route_key: route.key.clone(),
                layout: ItemLayout::new(
                    self.sizing.icon_size,
                    self.sizing.item_inner_space.horizontal(),
                ),
                focus: transition.position_cell(),
                region: region.clone(),
                selected: selected_signal,
                subscription,
            });
            focus.push(transition);
            recognizers.push(GestureRecognizer::new(index, region, self.gesture));
        }

        tracing::debug!(items = routes.len(), retired = retired.len(), "remounted tab items");
        let set = ItemSet {
            focus,
            recognizers,
            watches,
            retired,
        };
        if self.commands.send(AnimatorCommand::ReplaceItems(set)).is_err() {
            tracing::warn!("animator is gone; item set not delivered");
        }
    }

    fn container_height(&self) -> f32 {
        self.preset
            .container_height(self.sizing.icon_size, self.sizing.item_inner_space)
    }

    /// Lay the bar out in `available_width` and run the layout callbacks.
    pub fn layout_pass(&mut self, available_width: f32) -> Result<&MeasuredLayout> {
        let height = self.container_height();
        let input = BarLayoutInput {
            available_width,
            is_rtl: self.config.is_rtl,
            container_width_mode: self.sizing.item_container_width,
            outer_space: self.sizing.item_outer_space,
            safe_area_bottom: self.config.safe_area_bottom.unwrap_or(0.0),
            item_containers: self
                .items
                .iter()
                .map(|item| (item.layout.container_width() as f32, height))
                .collect(),
        };
        let measured = measure_bar(&input)?;

        self.bar.on_layout(measured.bar_height());
        for ((item, frame), tab) in self.items.iter().zip(&measured.items).zip(&self.tabs) {
            item.region.set(*frame);
            let (width, label_height) = self.measure.measure(&tab.title);
            item.layout.on_label_layout(width, label_height);
        }
        self.last_layout = measured;
        Ok(&self.last_layout)
    }

    /// Deliver pending reactions to `navigator`. Returns how many ran.
    pub fn flush<N: Navigator + 'static>(&mut self, navigator: &mut N) -> usize {
        self.dispatcher.drain(navigator)
    }

    /// Derive the frame to draw from the current shared state.
    pub fn snapshot(&self) -> TabBarFrame {
        let container_height = self.container_height() as f64;
        let items = self
            .items
            .iter()
            .zip(&self.tabs)
            .map(|(item, tab)| {
                let focus = item.focus.get();
                let container_width = item.layout.container_width();
                let visual = self.preset.item_visual(&ItemInput {
                    tab,
                    focus,
                    icon_size: self.sizing.icon_size,
                    inner_space: self.sizing.item_inner_space,
                    label_width: item.layout.label_width(),
                    label_height: item.layout.label_height(),
                    container_width,
                    container_height,
                });
                ItemFrame {
                    key: tab.key.clone(),
                    title: tab.title.clone(),
                    glyph: tab.glyph.clone(),
                    region: item.region.get(),
                    container_width,
                    container_height,
                    focus,
                    selected: item.selected.get(),
                    visual,
                }
            })
            .collect();

        TabBarFrame {
            bar: self.last_layout.bar,
            translate_y: self.visibility.translate_y(),
            position_mode: self.visibility.position_mode(),
            phase: self.visibility.phase(),
            background: self.background,
            selected_index: self.selection.current(),
            is_rtl: self.config.is_rtl,
            items,
        }
    }

    /// Run `hook` for every SelectedIndex crossing delivered by `flush`.
    pub fn on_index_change(&mut self, hook: impl FnMut(usize) + 'static) {
        self.bridge.borrow_mut().on_index_change = Some(Box::new(hook));
    }

    /// Run `hook` after each `tabLongPress` is emitted.
    pub fn on_long_press(&mut self, hook: impl FnMut(usize) + 'static) {
        self.bridge.borrow_mut().on_long_press = Some(Box::new(hook));
    }

    /// What the bridge did with the most recent crossing.
    pub fn last_bridge_outcome(&self) -> Option<BridgeOutcome> {
        self.bridge.borrow().last_outcome
    }

    /// Accessibility `selected` state of item `index`.
    pub fn selected_signal(&self, index: usize) -> Option<Signal<bool>> {
        self.items.get(index).map(|item| item.selected.clone())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.current()
    }

    pub fn bar_height(&self) -> f64 {
        self.bar.height()
    }

    pub fn container_widths(&self) -> Vec<f64> {
        self.items.iter().map(|i| i.layout.container_width()).collect()
    }

    /// Record a label measurement for item `index` (outside a layout pass).
    pub fn on_label_layout(&self, index: usize, width: f32, height: f32) -> Option<f64> {
        self.items
            .get(index)
            .map(|item| item.layout.on_label_layout(width, height))
    }

    pub fn tabs(&self) -> &[MergedTab] {
        &self.tabs
    }

    pub fn input(&self) -> InputSender {
        self.input.clone()
    }

    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    pub fn props(&self) -> TabBarProps<'_> {
        TabBarProps {
            preset: self.preset.name(),
            tabs: &self.tabs,
            selected_index: self.selection.cell(),
            sizing: self.sizing,
            is_rtl: self.config.is_rtl,
        }
    }

    /// Merged tabs keyed by route key.
    pub fn tabs_by_route_key(&self) -> HashMap<&str, &MergedTab> {
        self.tabs.iter().map(|t| (t.route_key.as_str(), t)).collect()
    }
}
