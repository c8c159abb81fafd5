//! Mount API - build both halves of a tab bar.
//!
//! # Example
//!
//! ```
//! use spark_tabbar::config::TabBarConfig;
//! use spark_tabbar::navigation::{
//!     Descriptors, EmitOutcome, NavigationShape, NavigationState, Navigator, RouteRef, TabEvent,
//! };
//! use spark_tabbar::pipeline::mount;
//! use spark_tabbar::presets::PresetRegistry;
//!
//! struct Nav;
//! impl Navigator for Nav {
//!     fn emit(&mut self, _event: &TabEvent) -> EmitOutcome {
//!         EmitOutcome::default()
//!     }
//!     fn navigate(&mut self, _route_name: &str) {}
//! }
//!
//! let shape = NavigationShape::Current(NavigationState::new(
//!     0,
//!     vec![RouteRef::new("home-1", "Home"), RouteRef::new("feed-1", "Feed")],
//! ));
//! let (mut bar, mut animator) = mount(
//!     TabBarConfig::default(),
//!     &PresetRegistry::with_builtin(),
//!     &shape,
//!     &Descriptors::new(),
//! )?;
//!
//! let clock = bar.clock();
//! bar.layout_pass(40.0)?;
//! animator.frame(clock.now());
//! bar.flush(&mut Nav);
//! let frame = bar.snapshot();
//! assert_eq!(frame.items.len(), 2);
//! # Ok::<(), spark_tabbar::error::TabBarError>(())
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

use crate::config::{parse_optional_color, TabBarConfig};
use crate::error::Result;
use crate::layout::{CellTextMeasure, TextMeasure};
use crate::navigation::{visibility_intent, Descriptors, NavigationShape, Navigator};
use crate::presets::PresetRegistry;
use crate::reaction::{Dispatcher, Reactor};
use crate::shared::SharedFlag;
use crate::state::{BarLayout, FocusDriver, SelectionState, VisibilityMachine, VisibilityView};

use super::animator::{Animator, FrameClock, InputSender};
use super::tab_bar::{
    index_change_handler, long_press_handler, BridgeState, TabBar, TabBarParts,
};

/// Mount with unicode cell-width label measurement.
pub fn mount(
    config: TabBarConfig,
    registry: &PresetRegistry,
    shape: &NavigationShape,
    descriptors: &Descriptors,
) -> Result<(TabBar, Animator)> {
    mount_with_measure(config, registry, shape, descriptors, Box::new(CellTextMeasure))
}

/// Mount a tab bar. Fails fast on an unknown preset, a bad color or an
/// unusable navigation state.
pub fn mount_with_measure(
    config: TabBarConfig,
    registry: &PresetRegistry,
    shape: &NavigationShape,
    descriptors: &Descriptors,
    measure: Box<dyn TextMeasure>,
) -> Result<(TabBar, Animator)> {
    let preset = registry.get(&config.preset)?;
    config.validate_colors()?;
    let sizing = preset.defaults().resolve(&config);
    let background =
        parse_optional_color("style.background-color", config.style.background_color.as_deref())?;

    let state = shape.state();
    state.active_route()?;

    let (command_tx, command_rx) = mpsc::channel();
    let (input_tx, input_rx) = mpsc::channel();

    let mut selection = SelectionState::new();
    selection.set_from_navigation(state.index);

    let bar = BarLayout::new();
    let intent = SharedFlag::new(visibility_intent(shape, descriptors)?);
    let machine = VisibilityMachine::new(intent.clone());
    let visibility = VisibilityView::new(intent, machine.position_cell(), bar.height_cell());

    let bridge = Rc::new(RefCell::new(BridgeState::default()));
    let mut dispatcher: Dispatcher<dyn Navigator> = Dispatcher::new();
    let mut reactor = Reactor::new();

    // Baseline now: a tap confirmed before the first frame is a crossing.
    let observe = selection.observer();
    let baseline = observe();
    let notifier = dispatcher.register(index_change_handler(bridge.clone()));
    reactor.watch_from(observe, baseline, notifier);
    let long_press = dispatcher.register(long_press_handler(bridge.clone()));

    let animator = Animator::new(
        selection.cell(),
        machine,
        FocusDriver::new(Vec::new(), sizing.timing),
        reactor,
        long_press,
        command_rx,
        input_rx,
    );

    tracing::info!(preset = preset.name(), routes = state.routes.len(), "mounting tab bar");
    let mut tab_bar = TabBar::from_parts(TabBarParts {
        config,
        preset,
        sizing,
        background,
        selection,
        bar,
        visibility,
        bridge,
        dispatcher,
        commands: command_tx,
        input: InputSender::new(input_tx),
        measure,
        clock: FrameClock::new(),
    });
    tab_bar.sync(shape, descriptors)?;

    Ok((tab_bar, animator))
}
