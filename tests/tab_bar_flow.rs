//! End-to-end flows across both execution contexts.
//!
//! Each test mounts a bar, drives the animator by hand with explicit frame
//! times and drains reactions into a recording navigator.
//!
//! Run with: cargo test --test tab_bar_flow

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use spark_tabbar::config::TabBarConfig;
use spark_tabbar::navigation::{
    Descriptor, Descriptors, EmitOutcome, NavigationShape, NavigationState, Navigator, RouteOptions,
    RouteRef, TabEvent, TabEventKind,
};
use spark_tabbar::pipeline::{mount, Animator, FrameFlags, TabBar};
use spark_tabbar::presets::PresetRegistry;
use spark_tabbar::renderer::TextRenderer;
use spark_tabbar::state::{BridgeOutcome, PointerEvent, PositionMode, VisibilityPhase};

const WIDTH: f32 = 40.0;

// =============================================================================
// HARNESS
// =============================================================================

#[derive(Default)]
struct RecordingNavigator {
    events: Vec<TabEvent>,
    navigations: Vec<String>,
    prevent: bool,
}

impl Navigator for RecordingNavigator {
    fn emit(&mut self, event: &TabEvent) -> EmitOutcome {
        self.events.push(event.clone());
        EmitOutcome {
            default_prevented: self.prevent && event.can_prevent_default,
        }
    }

    fn navigate(&mut self, route_name: &str) {
        self.navigations.push(route_name.to_string());
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn routes() -> Vec<RouteRef> {
    vec![
        RouteRef::new("a-1", "Home"),
        RouteRef::new("b-1", "Feed"),
        RouteRef::new("c-1", "Profile"),
    ]
}

fn shape(index: usize) -> NavigationShape {
    NavigationShape::Current(NavigationState::new(index, routes()))
}

fn hidden_on(route_key: &str) -> Descriptors {
    let mut descriptors = HashMap::new();
    descriptors.insert(
        route_key.to_string(),
        Descriptor {
            title: None,
            options: RouteOptions {
                tab_bar_visible: Some(false),
            },
        },
    );
    descriptors
}

/// Mounted, first frame run, laid out twice so label growth has settled.
fn mounted(index: usize) -> (TabBar, Animator) {
    let (mut bar, mut animator) = mount(
        TabBarConfig::default(),
        &PresetRegistry::with_builtin(),
        &shape(index),
        &Descriptors::new(),
    )
    .unwrap();
    animator.frame(ms(0));
    bar.layout_pass(WIDTH).unwrap();
    bar.layout_pass(WIDTH).unwrap();
    (bar, animator)
}

fn center(bar: &mut TabBar, index: usize) -> (f32, f32) {
    let region = bar.layout_pass(WIDTH).unwrap().items[index];
    (region.x + region.width / 2.0, region.y + region.height / 2.0)
}

fn tap(bar: &mut TabBar, index: usize, at: Duration) {
    let (x, y) = center(bar, index);
    let input = bar.input();
    assert!(input.send(PointerEvent::down(x, y, at)));
    assert!(input.send(PointerEvent::up(x, y, at + ms(40))));
}

// =============================================================================
// SELECTION
// =============================================================================

#[test]
fn test_repeated_sync_is_idempotent() {
    let (mut bar, mut animator) = mounted(0);
    let mut nav = RecordingNavigator::default();

    for i in 0..5 {
        bar.sync(&shape(0), &Descriptors::new()).unwrap();
        animator.frame(ms(10 * i));
    }

    assert_eq!(bar.flush(&mut nav), 0);
    assert!(nav.events.is_empty());
    assert_eq!(bar.selected_index(), Some(0));
}

#[test]
fn test_tap_round_trip() {
    let (mut bar, mut animator) = mounted(0);
    let mut nav = RecordingNavigator::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let hook = seen.clone();
    bar.on_index_change(move |index| hook.borrow_mut().push(index));

    tap(&mut bar, 1, ms(100));
    let report = animator.frame(ms(150));
    assert!(report.flags.contains(FrameFlags::GESTURE | FrameFlags::SELECTION));

    // Bridge crossing plus the two per-item selected flips.
    assert_eq!(bar.flush(&mut nav), 3);
    assert_eq!(
        nav.events,
        vec![TabEvent {
            kind: TabEventKind::TabPress,
            target: "b-1".into(),
            can_prevent_default: true,
        }]
    );
    assert_eq!(nav.navigations, vec!["Feed".to_string()]);
    assert_eq!(bar.last_bridge_outcome(), Some(BridgeOutcome::Navigated));
    assert_eq!(*seen.borrow(), vec![1]);
    assert!(bar.selected_signal(1).unwrap().get());
    assert!(!bar.selected_signal(0).unwrap().get());

    // Navigation catches up; nothing echoes back.
    bar.sync(&shape(1), &Descriptors::new()).unwrap();
    animator.frame(ms(200));
    assert_eq!(bar.flush(&mut nav), 0);
    assert_eq!(nav.events.len(), 1);
    assert_eq!(bar.selected_index(), Some(1));
}

#[test]
fn test_tap_on_active_tab_is_silent() {
    let (mut bar, mut animator) = mounted(0);
    let mut nav = RecordingNavigator::default();

    tap(&mut bar, 0, ms(100));
    let report = animator.frame(ms(150));
    assert!(report.flags.contains(FrameFlags::GESTURE));
    assert!(!report.flags.contains(FrameFlags::SELECTION));
    assert_eq!(bar.flush(&mut nav), 0);
    assert!(nav.events.is_empty());
}

#[test]
fn test_external_navigation_does_not_emit() {
    let (mut bar, mut animator) = mounted(0);
    let mut nav = RecordingNavigator::default();

    bar.sync(&shape(2), &Descriptors::new()).unwrap();
    animator.frame(ms(50));
    bar.flush(&mut nav);

    assert!(nav.events.is_empty());
    assert!(nav.navigations.is_empty());
    assert_eq!(bar.last_bridge_outcome(), Some(BridgeOutcome::AlreadyActive));
    assert_eq!(bar.selected_index(), Some(2));
}

#[test]
fn test_prevented_tap_skips_navigation() {
    let (mut bar, mut animator) = mounted(0);
    let mut nav = RecordingNavigator {
        prevent: true,
        ..Default::default()
    };

    tap(&mut bar, 2, ms(100));
    animator.frame(ms(150));
    bar.flush(&mut nav);

    assert_eq!(nav.events.len(), 1);
    assert!(nav.navigations.is_empty());
    assert_eq!(bar.last_bridge_outcome(), Some(BridgeOutcome::Prevented));
    assert_eq!(bar.selected_index(), Some(2));

    // Navigation did not move; re-syncing the same index keeps the tap.
    bar.sync(&shape(0), &Descriptors::new()).unwrap();
    animator.frame(ms(200));
    assert_eq!(bar.flush(&mut nav), 0);
    assert_eq!(bar.selected_index(), Some(2));
}

#[test]
fn test_navigation_moving_away_and_back_does_not_emit() {
    let (mut bar, mut animator) = mounted(0);
    let mut nav = RecordingNavigator::default();

    // Both crossings are queued before the main context drains either.
    bar.sync(&shape(1), &Descriptors::new()).unwrap();
    animator.frame(ms(50));
    bar.sync(&shape(0), &Descriptors::new()).unwrap();
    animator.frame(ms(60));
    bar.flush(&mut nav);

    assert!(nav.events.is_empty());
    assert!(nav.navigations.is_empty());
    assert_eq!(bar.last_bridge_outcome(), Some(BridgeOutcome::AlreadyActive));
    assert_eq!(bar.selected_index(), Some(0));
}

#[test]
fn test_tap_before_first_frame_is_delivered() {
    let (mut bar, mut animator) = mount(
        TabBarConfig::default(),
        &PresetRegistry::with_builtin(),
        &shape(0),
        &Descriptors::new(),
    )
    .unwrap();
    bar.layout_pass(WIDTH).unwrap();
    bar.layout_pass(WIDTH).unwrap();
    let mut nav = RecordingNavigator::default();

    tap(&mut bar, 1, ms(0));
    animator.frame(ms(50));
    animator.frame(ms(60));
    bar.flush(&mut nav);

    assert_eq!(nav.navigations, vec!["Feed".to_string()]);
    assert_eq!(bar.last_bridge_outcome(), Some(BridgeOutcome::Navigated));
}

#[test]
fn test_tap_and_sync_in_one_frame_tap_wins() {
    let (mut bar, mut animator) = mounted(0);
    let mut nav = RecordingNavigator::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let hook = seen.clone();
    bar.on_index_change(move |index| hook.borrow_mut().push(index));

    // The sync lands first; the frame then confirms the tap over it.
    tap(&mut bar, 2, ms(100));
    bar.sync(&shape(1), &Descriptors::new()).unwrap();
    animator.frame(ms(150));
    bar.flush(&mut nav);

    assert_eq!(bar.selected_index(), Some(2));
    assert_eq!(
        nav.events,
        vec![TabEvent {
            kind: TabEventKind::TabPress,
            target: "c-1".into(),
            can_prevent_default: true,
        }]
    );
    assert_eq!(nav.navigations, vec!["Profile".to_string()]);
    assert_eq!(*seen.borrow(), vec![2]);
}

#[test]
fn test_queued_crossings_drain_in_order() {
    let (mut bar, mut animator) = mounted(0);
    let mut nav = RecordingNavigator::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let hook = seen.clone();
    bar.on_index_change(move |index| hook.borrow_mut().push(index));

    tap(&mut bar, 2, ms(100));
    animator.frame(ms(150));
    bar.sync(&shape(1), &Descriptors::new()).unwrap();
    animator.frame(ms(200));
    bar.flush(&mut nav);

    // The tap crossing navigates; the later navigation crossing stays quiet.
    assert_eq!(*seen.borrow(), vec![2, 1]);
    assert_eq!(nav.events.len(), 1);
    assert_eq!(nav.events[0].target, "c-1");
    assert_eq!(nav.navigations, vec!["Profile".to_string()]);
    assert_eq!(bar.last_bridge_outcome(), Some(BridgeOutcome::AlreadyActive));
    assert_eq!(bar.selected_index(), Some(1));
}

#[test]
fn test_props_expose_merged_tabs() {
    let (bar, _animator) = mounted(0);

    let props = bar.props();
    assert_eq!(props.preset, "bubble");
    assert_eq!(props.tabs.len(), 3);
    assert_eq!(props.selected_index.get(), Some(0));
    assert!(!props.is_rtl);

    let by_key = bar.tabs_by_route_key();
    assert_eq!(by_key.len(), 3);
    assert_eq!(by_key["b-1"].title, "Feed");
    assert_eq!(by_key["c-1"].route_key, "c-1");
}

// =============================================================================
// GESTURES
// =============================================================================

#[test]
fn test_long_press_emits_without_navigating() {
    let (mut bar, mut animator) = mounted(0);
    let mut nav = RecordingNavigator::default();
    let pressed = Rc::new(RefCell::new(Vec::new()));
    let hook = pressed.clone();
    bar.on_long_press(move |index| hook.borrow_mut().push(index));

    let (x, y) = center(&mut bar, 1);
    bar.input().send(PointerEvent::down(x, y, ms(100)));
    let report = animator.frame(ms(300));
    assert!(!report.flags.contains(FrameFlags::GESTURE));
    assert!(report.animating);

    let report = animator.frame(ms(700));
    assert!(report.flags.contains(FrameFlags::GESTURE));
    assert_eq!(bar.flush(&mut nav), 1);
    assert_eq!(
        nav.events,
        vec![TabEvent {
            kind: TabEventKind::TabLongPress,
            target: "b-1".into(),
            can_prevent_default: false,
        }]
    );
    assert!(nav.navigations.is_empty());
    assert_eq!(*pressed.borrow(), vec![1]);

    // Releasing after a long press is not a tap.
    bar.input().send(PointerEvent::up(x, y, ms(800)));
    let report = animator.frame(ms(810));
    assert!(!report.flags.contains(FrameFlags::GESTURE));
    assert_eq!(bar.flush(&mut nav), 0);
    assert_eq!(bar.selected_index(), Some(0));
}

#[test]
fn test_canceled_touch_selects_nothing() {
    let (mut bar, mut animator) = mounted(0);
    let mut nav = RecordingNavigator::default();

    let (x, y) = center(&mut bar, 2);
    let input = bar.input();
    input.send(PointerEvent::down(x, y, ms(100)));
    input.send(PointerEvent::cancel(ms(120)));
    input.send(PointerEvent::up(x, y, ms(140)));
    animator.frame(ms(150));

    assert_eq!(bar.flush(&mut nav), 0);
    assert_eq!(bar.selected_index(), Some(0));
}

// =============================================================================
// LAYOUT AND FOCUS
// =============================================================================

#[test]
fn test_container_width_never_shrinks() {
    let (mut bar, _animator) = mounted(0);
    let before = bar.container_widths()[0];

    assert_eq!(bar.on_label_layout(0, 20.0, 1.0), Some(22.0));
    assert_eq!(bar.on_label_layout(0, 3.0, 1.0), Some(22.0));
    bar.layout_pass(WIDTH).unwrap();

    assert!(before < 22.0);
    assert_eq!(bar.container_widths()[0], 22.0);
    assert_eq!(bar.on_label_layout(9, 1.0, 1.0), None);
}

#[test]
fn test_focus_settles_on_exactly_one_item() {
    let (mut bar, mut animator) = mounted(0);

    animator.frame(ms(1000));
    assert_eq!(animator.focus_values(), vec![1.0, 0.0, 0.0]);

    tap(&mut bar, 2, ms(1000));
    let report = animator.frame(ms(1050));
    assert!(report.flags.contains(FrameFlags::FOCUS));
    assert!(report.animating);

    animator.frame(ms(2500));
    let values = animator.focus_values();
    assert_eq!(values.iter().filter(|v| **v == 1.0).count(), 1);
    assert_eq!(values, vec![0.0, 0.0, 1.0]);
    assert!(animator.frame(ms(2600)).is_idle());
}

// =============================================================================
// VISIBILITY
// =============================================================================

#[test]
fn test_hide_then_show_converges() {
    let (mut bar, mut animator) = mounted(0);
    assert_eq!(bar.snapshot().phase, VisibilityPhase::Visible);

    bar.sync(&shape(0), &hidden_on("a-1")).unwrap();
    assert_eq!(bar.snapshot().position_mode, PositionMode::Absolute);
    let report = animator.frame(ms(100));
    assert!(report.flags.contains(FrameFlags::VISIBILITY));
    assert_eq!(
        bar.snapshot().phase,
        VisibilityPhase::Transitioning {
            toward_visible: false
        }
    );

    animator.frame(ms(400));
    let frame = bar.snapshot();
    assert_eq!(frame.phase, VisibilityPhase::Hidden);
    assert!(frame.translate_y > 0.0);
    assert_eq!(frame.translate_y, bar.bar_height());

    bar.sync(&shape(0), &Descriptors::new()).unwrap();
    animator.frame(ms(500));
    animator.frame(ms(800));
    let frame = bar.snapshot();
    assert_eq!(frame.phase, VisibilityPhase::Visible);
    assert_eq!(frame.translate_y, 0.0);
    assert_eq!(frame.position_mode, PositionMode::Relative);
}

#[test]
fn test_visibility_reverses_mid_flight() {
    let (mut bar, mut animator) = mounted(0);

    bar.sync(&shape(0), &hidden_on("a-1")).unwrap();
    animator.frame(ms(100));
    animator.frame(ms(200));
    let partway = bar.snapshot().translate_y;
    assert!(partway > 0.0 && partway < bar.bar_height());

    bar.sync(&shape(0), &Descriptors::new()).unwrap();
    animator.frame(ms(210));
    assert_eq!(
        bar.snapshot().phase,
        VisibilityPhase::Transitioning {
            toward_visible: true
        }
    );
    animator.frame(ms(600));
    assert_eq!(bar.snapshot().phase, VisibilityPhase::Visible);
}

#[test]
fn test_navigating_to_hidden_route_hides_bar() {
    let (mut bar, mut animator) = mounted(0);
    bar.sync(&shape(1), &hidden_on("b-1")).unwrap();
    animator.frame(ms(100));
    animator.frame(ms(500));
    assert_eq!(bar.snapshot().phase, VisibilityPhase::Hidden);
}

#[test]
fn test_legacy_shape_is_always_visible() {
    let (mut bar, mut animator) = mounted(0);
    let legacy = NavigationShape::Legacy {
        state: NavigationState::new(0, routes()),
    };
    bar.sync(&legacy, &hidden_on("a-1")).unwrap();
    animator.frame(ms(100));
    animator.frame(ms(500));
    assert_eq!(bar.snapshot().phase, VisibilityPhase::Visible);
}

// =============================================================================
// REMOUNT
// =============================================================================

#[test]
fn test_route_change_remounts_items() {
    let (mut bar, mut animator) = mounted(0);
    let mut nav = RecordingNavigator::default();
    let next = NavigationShape::Current(NavigationState::new(
        0,
        vec![RouteRef::new("a-1", "Home"), RouteRef::new("d-1", "Search")],
    ));

    bar.sync(&next, &Descriptors::new()).unwrap();
    let report = animator.frame(ms(100));
    assert!(report.flags.contains(FrameFlags::REMOUNT));
    assert_eq!(animator.item_count(), 2);
    assert_eq!(bar.tabs().len(), 2);
    assert_eq!(bar.flush(&mut nav), 0);

    bar.layout_pass(WIDTH).unwrap();
    bar.layout_pass(WIDTH).unwrap();
    tap(&mut bar, 1, ms(200));
    animator.frame(ms(250));
    bar.flush(&mut nav);
    assert_eq!(nav.navigations, vec!["Search".to_string()]);
}

#[test]
fn test_shrinking_route_list_clamps_selection() {
    let (mut bar, mut animator) = mounted(2);
    let mut nav = RecordingNavigator::default();
    let next = NavigationShape::Current(NavigationState::new(
        1,
        vec![RouteRef::new("a-1", "Home"), RouteRef::new("b-1", "Feed")],
    ));

    bar.sync(&next, &Descriptors::new()).unwrap();
    animator.frame(ms(100));
    bar.flush(&mut nav);

    assert_eq!(bar.selected_index(), Some(1));
    assert!(nav.events.is_empty());
    assert!(bar.selected_signal(1).unwrap().get());
}

// =============================================================================
// RENDERING AND THREADING
// =============================================================================

#[test]
fn test_snapshot_renders_titles() {
    let (bar, mut animator) = mounted(0);
    animator.frame(ms(1000));
    let frame = bar.snapshot();
    assert_eq!(frame.items.len(), 3);
    assert_eq!(frame.selected_index, Some(0));
    assert!(frame.items[0].selected);
    assert_eq!(frame.items[0].focus, 1.0);

    let lines = TextRenderer.render(&frame).lines();
    assert!(lines.iter().any(|line| line.contains("Home")));
}

#[test]
fn test_spawned_animator_delivers_taps() {
    let (mut bar, animator) = mount(
        TabBarConfig::default(),
        &PresetRegistry::with_builtin(),
        &shape(0),
        &Descriptors::new(),
    )
    .unwrap();
    bar.layout_pass(WIDTH).unwrap();
    bar.layout_pass(WIDTH).unwrap();

    let clock = bar.clock();
    let running = animator.spawn(clock, ms(2)).unwrap();
    let (x, y) = center(&mut bar, 1);
    let input = bar.input();
    let at = clock.now();
    input.send(PointerEvent::down(x, y, at));
    input.send(PointerEvent::up(x, y, at + ms(10)));

    let mut nav = RecordingNavigator::default();
    for _ in 0..500 {
        bar.flush(&mut nav);
        if !nav.navigations.is_empty() {
            break;
        }
        thread::sleep(ms(2));
    }
    assert_eq!(nav.navigations, vec!["Feed".to_string()]);

    let animator = running.stop().unwrap();
    assert_eq!(animator.item_count(), 3);
}
