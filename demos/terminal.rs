//! Terminal Demo - an animated tab bar on the last rows of the screen
//!
//! - Click a tab to select it, hold it for a long press
//! - Left / Right navigate from "outside" (no tabPress is emitted)
//! - `h` hides or shows the bar on the current route
//! - `p` toggles preventing tab presses
//! - `q` or Esc quits
//!
//! An optional argument names a TOML config file. Logs go to
//! `tabbar-demo.log`; `RUST_LOG` overrides the level.
//!
//! Run with: cargo run --example terminal [config.toml]

use std::collections::HashSet;
use std::io::{self, Stdout, Write};
use std::path::Path;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
};
use crossterm::style::Print;
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use spark_tabbar::{
    init_logging, mount, write_frame, Descriptor, Descriptors, EmitOutcome, NavigationShape,
    NavigationState, Navigator, PresetRegistry, RouteRef, TabBar, TabBarConfig, TabEvent,
    TextRenderer,
};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const DEFAULT_CONFIG: &str = r##"
preset = "flashy"
duration-ms = 600

[style]
background-color = "#1e1e2e"

[tabs.Home]
label-color = "#f5c2e7"
icon = { glyph = "⌂" }
indicator = { size = 1 }

[tabs.Search]
label-color = "#89b4fa"
icon = { glyph = "?" }
indicator = { size = 1 }

[tabs.Inbox]
title = "Messages"
label-color = "#a6e3a1"
icon = { glyph = "✉" }
indicator = { size = 1 }

[tabs.Profile]
label-color = "#fab387"
icon = { glyph = "☺" }
indicator = { size = 1 }
"##;

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Owns the "real" navigation state the bar mirrors.
struct DemoNavigator {
    state: NavigationState,
    hidden: HashSet<String>,
    prevent: bool,
    status: String,
    dirty: bool,
}

impl DemoNavigator {
    fn new() -> Self {
        let routes = ["Home", "Search", "Inbox", "Profile"]
            .iter()
            .enumerate()
            .map(|(i, name)| RouteRef::new(format!("{}-{i}", name.to_lowercase()), *name))
            .collect();
        Self {
            state: NavigationState::new(0, routes),
            hidden: HashSet::new(),
            prevent: false,
            status: String::from("ready"),
            dirty: false,
        }
    }

    fn shape(&self) -> NavigationShape {
        NavigationShape::Current(self.state.clone())
    }

    fn descriptors(&self) -> Descriptors {
        self.state
            .routes
            .iter()
            .map(|route| {
                let mut descriptor = Descriptor::default();
                if self.hidden.contains(&route.key) {
                    descriptor.options.tab_bar_visible = Some(false);
                }
                (route.key.clone(), descriptor)
            })
            .collect()
    }

    fn step(&mut self, delta: isize) {
        let len = self.state.routes.len() as isize;
        self.state.index = (self.state.index as isize + delta).rem_euclid(len) as usize;
        self.dirty = true;
    }

    fn toggle_hidden(&mut self) {
        let key = self.state.routes[self.state.index].key.clone();
        if !self.hidden.remove(&key) {
            self.hidden.insert(key);
        }
        self.dirty = true;
    }
}

impl Navigator for DemoNavigator {
    fn emit(&mut self, event: &TabEvent) -> EmitOutcome {
        let prevented = self.prevent && event.can_prevent_default;
        self.status = format!(
            "{} -> {}{}",
            event.kind.as_str(),
            event.target,
            if prevented { " (prevented)" } else { "" }
        );
        EmitOutcome {
            default_prevented: prevented,
        }
    }

    fn navigate(&mut self, route_name: &str) {
        if let Some(index) = self.state.routes.iter().position(|r| r.name == route_name) {
            self.state.index = index;
            self.dirty = true;
        }
    }
}

// =============================================================================
// MAIN LOOP
// =============================================================================

fn main() -> spark_tabbar::Result<()> {
    init_logging("debug", Some(Path::new("tabbar-demo.log")))?;

    let config = match std::env::args().nth(1) {
        Some(path) => TabBarConfig::load(path)?,
        None => TabBarConfig::from_toml_str(DEFAULT_CONFIG)?,
    };
    let mut nav = DemoNavigator::new();
    let (mut bar, animator) = mount(
        config,
        &PresetRegistry::with_builtin(),
        &nav.shape(),
        &nav.descriptors(),
    )?;
    let running = animator.spawn(bar.clock(), FRAME_INTERVAL)?;

    let mut out = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

    let result = run(&mut out, &mut bar, &mut nav);

    execute!(out, DisableMouseCapture, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    drop(running);
    result
}

fn run(out: &mut Stdout, bar: &mut TabBar, nav: &mut DemoNavigator) -> spark_tabbar::Result<()> {
    let input = bar.input();
    let clock = bar.clock();

    loop {
        bar.flush(nav);
        if nav.dirty {
            nav.dirty = false;
            bar.sync(&nav.shape(), &nav.descriptors())?;
        }

        let (columns, rows) = terminal::size()?;
        let height = bar.layout_pass(columns as f32)?.bar_height();
        let origin = rows.saturating_sub(height.round() as u16);

        let rendered = TextRenderer.render(&bar.snapshot());
        queue!(
            out,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            Print(format!(
                "route: {}  prevent: {}  last: {}",
                nav.state.routes[nav.state.index].name, nav.prevent, nav.status
            ))
        )?;
        write_frame(out, &rendered, origin)?;
        out.flush()?;

        if !event::poll(FRAME_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('h') => nav.toggle_hidden(),
                KeyCode::Char('p') => nav.prevent = !nav.prevent,
                KeyCode::Left => nav.step(-1),
                KeyCode::Right => nav.step(1),
                _ => {}
            },
            Event::Mouse(mouse) => {
                input.send_mouse(&mouse, origin, clock.now());
            }
            Event::Resize(..) => {
                execute!(out, terminal::Clear(ClearType::All))?;
            }
            _ => {}
        }
    }
}
