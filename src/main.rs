use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use crossterm::event::{Event, KeyEvent, MouseEvent, MouseEventKind};
use indoc::indoc;
use ratatui::layout::Rect;

use desk_wm::config::WmConfig;
use desk_wm::desktop::{ClickOutcome, Desktop, DesktopCommand, IconAction, PointerTarget};
use desk_wm::drivers::OutputDriver;
use desk_wm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use desk_wm::event_loop::{ControlFlow, EventLoop, LoopHandler};
use desk_wm::keybindings::{Action, KeyBindings};
use desk_wm::launch::{AppDescriptor, LaunchRegistry};
use desk_wm::render::render_desktop;
use desk_wm::tracing_sub;
use desk_wm::window::decorator::ClassicDecorator;
use desk_wm::window::{Position, Size};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const KEYS_HELP: &str = indoc! {"
    Keys:
      Ctrl+Q        quit
      Tab           cycle window focus
      Ctrl+N        new window
      Ctrl+W        close the active window
      Ctrl+D        minimize the active window
      Ctrl+X        maximize / restore the active window
      Ctrl+S, Esc   toggle the start menu
      Left/Right    select a desktop icon
      Enter, Space  open the selected icon

    Drag a title bar to move a window, the bottom-right corner to resize it.
"};

const CALCULATOR_FACE: &str = indoc! {"
     7  8  9  /
     4  5  6  *
     1  2  3  -
     0  .  =  +
"};

const RESUME_TEXT: &str = indoc! {"
    Experience
      Window systems, input routing, terminal UIs.

    Skills
      Rust, ratatui, crossterm.
"};

#[derive(Parser, Debug)]
#[command(
    name = "desk-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "A desktop shell with overlapping windows, a taskbar and a start menu",
    after_help = KEYS_HELP
)]
struct Cli {
    /// Maximum gap between two icon clicks that still counts as a double click.
    #[arg(long = "double-click-ms", value_name = "MS", default_value_t = 300)]
    double_click_ms: u64,

    /// Smallest width, in cells, a window may be resized to.
    #[arg(long = "min-width", value_name = "CELLS", default_value_t = 16)]
    min_width: u16,

    /// Smallest height, in cells, a window may be resized to.
    #[arg(long = "min-height", value_name = "CELLS", default_value_t = 5)]
    min_height: u16,

    /// Append debug logs to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Start with an empty desktop.
    #[arg(long = "no-icons")]
    no_icons: bool,
}

impl TryFrom<&Cli> for WmConfig {
    type Error = String;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(50..=2000).contains(&cli.double_click_ms) {
            return Err("double-click window must be between 50 and 2000 ms".to_string());
        }
        if cli.min_width < 8 || cli.min_height < 3 {
            return Err("windows need at least 8x3 cells for their chrome".to_string());
        }
        // Cell-scale chrome: one row each for the menu bar, taskbar and title.
        let config = WmConfig::default()
            .with_containment(Rect {
                x: 0,
                y: 1,
                width: 80,
                height: 23,
            })
            .with_menu_bar_height(1)
            .with_chrome_height(1)
            .with_title_bar_height(1)
            .with_button_width(3)
            .with_resize_handle(1)
            .with_min_size(cli.min_width, cli.min_height)
            .with_double_click(Duration::from_millis(cli.double_click_ms));
        config.validate().map_err(|err| err.to_string())?;
        Ok(config)
    }
}

fn demo_apps() -> LaunchRegistry<String> {
    LaunchRegistry::new(|n| format!("Untitled document #{n}"))
        .with_untitled_layout(Position::new(20, 4), 2, Size::new(36, 10))
        .with_app(
            AppDescriptor::new("Calculator", || CALCULATOR_FACE.to_string())
                .with_origin(8, 3)
                .with_step(2)
                .with_size(24, 8)
                .with_resizable(false),
        )
        .with_app(
            AppDescriptor::new("Notepad", String::new)
                .with_origin(14, 5)
                .with_step(2)
                .with_size(40, 12),
        )
        .with_app(
            AppDescriptor::new("Resume", || RESUME_TEXT.to_string())
                .with_title("Resume.txt")
                .with_origin(24, 2)
                .with_step(2)
                .with_size(44, 14),
        )
}

struct App<O> {
    desktop: Desktop<String>,
    bindings: KeyBindings,
    decorator: ClassicDecorator,
    output: O,
}

impl<O: OutputDriver> App<O> {
    fn new(desktop: Desktop<String>, output: O) -> Self {
        Self {
            desktop,
            bindings: KeyBindings::default(),
            decorator: ClassicDecorator,
            output,
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let desktop = &self.desktop;
        let decorator = &self.decorator;
        self.output
            .draw(|frame| render_desktop(desktop, decorator, frame))
    }

    fn handle_key(&mut self, key: KeyEvent) -> ControlFlow {
        let Some(action) = self.bindings.action_for_key(&key) else {
            return ControlFlow::Continue;
        };
        tracing::debug!(%action, "key action");
        match action {
            Action::Quit => return ControlFlow::Quit,
            Action::CycleFocus => self.desktop.dispatch(DesktopCommand::CycleFocus),
            Action::CloseWindow => self.desktop.dispatch(DesktopCommand::CloseActive),
            Action::MinimizeWindow => self.desktop.dispatch(DesktopCommand::MinimizeActive),
            Action::ToggleMaximize => {
                self.desktop.dispatch(DesktopCommand::ToggleMaximizeActive)
            }
            Action::NewWindow => self.desktop.dispatch(DesktopCommand::NewWindow),
            Action::StartMenu => self.desktop.dispatch(DesktopCommand::ToggleStartMenu),
            Action::PrevIcon => {
                self.desktop.select_next_icon(false);
            }
            Action::NextIcon => {
                self.desktop.select_next_icon(true);
            }
            Action::ActivateIcon => {
                self.desktop.activate_selected_icon();
            }
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let point = Position::new(mouse.column as i32, mouse.row as i32);
        match mouse.kind {
            MouseEventKind::Down(_) => {
                if let PointerTarget::Icon(ClickOutcome::Activated(icon)) =
                    self.desktop.pointer_down(point)
                {
                    tracing::debug!(?icon, "icon opened");
                }
            }
            MouseEventKind::Drag(_) => {
                self.desktop.pointer_move(point);
            }
            MouseEventKind::Up(_) => {
                self.desktop.pointer_up(point);
            }
            _ => {}
        }
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.desktop.shutdown();
        self.output.exit()
    }
}

impl<O: OutputDriver> LoopHandler for App<O> {
    fn next_deadline(&self) -> Option<Duration> {
        self.desktop.next_timer_deadline()
    }

    fn tick(&mut self, elapsed: Duration) -> io::Result<ControlFlow> {
        for outcome in self.desktop.tick(elapsed) {
            tracing::debug!(?outcome, "click window closed");
        }
        self.draw()?;
        Ok(ControlFlow::Continue)
    }

    fn handle_event(&mut self, event: Event) -> io::Result<ControlFlow> {
        match event {
            Event::Key(key) => return Ok(self.handle_key(key)),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.desktop.set_screen(Rect {
                x: 0,
                y: 0,
                width,
                height,
            }),
            _ => {}
        }
        Ok(ControlFlow::Continue)
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = WmConfig::try_from(&cli).map_err(io::Error::other)?;
    tracing_sub::init_default(cli.log_file.as_deref())?;

    let mut desktop = Desktop::new(config, demo_apps())
        .map_err(io::Error::other)?
        .with_icon_size(10, 2)
        .with_clock(|| Local::now().time());
    if !cli.no_icons {
        desktop.add_app_icons();
        desktop.add_icon("New", IconAction::NewWindow);
    }

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    desktop.set_screen(output.area()?);
    tracing::info!(screen = ?desktop.screen(), "desktop started");

    let mut app = App::new(desktop, output);
    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), FRAME_INTERVAL);
    let result = event_loop.run(&mut app);
    app.shutdown()?;
    result
}
