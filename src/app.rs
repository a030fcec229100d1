use crate::animation::Player;
use crate::config::Settings;
use crate::controller::{ActionController, Command, CommandReport};
use crate::directive::{ActivityDirective, DirectiveTable};
use crate::frames::{AsciiFrames, FrameProvider};
use crate::input::{collect_input_nonblocking, map_event_to_action, PlayerAction, Scene};
use crate::model::PetState;
use crate::render::{draw_center_box, draw_pet, ui_overlay, Banner, CellBuffer, Terminal};
use crate::timer::{Scheduler, TimerEvent, TimerId, TimerQueue};
use crossterm::style::Color;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const NAME_INPUT_MAX: usize = 18;

const HELP_TEXT: &str = "Keep your pet fed, rested and happy.\n\
    Hunger creeps up and energy/happiness drain over time.\n\n\
    F Feed: -hunger, +happiness.\n\
    P Play: +happiness, costs energy, makes it hungry.\n\
    S Sleep: +energy, only when tired.\n\
    R Rename: short names only, and it may not like yours.\n\n\
    Esc or H to close help.";

/// Everything the loop mutates, minus the terminal. Split out so the
/// command and timer plumbing can run without a tty.
pub struct Session {
    pub controller: ActionController,
    pub timers: TimerQueue,
    pub player: Player,
    pub frames: AsciiFrames,
    pub scene: Scene,
    pub banner: Option<Banner>,
    pub name_edit: String,
    frame_interval: Duration,
    frame_timer: Option<TimerId>,
}

impl Session {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let frames = AsciiFrames;
        let frame_interval = settings.frame_interval();
        let directives = DirectiveTable::default().resolve(&frames, frame_interval);
        let pet = PetState::new(settings.name.clone(), settings.rules());
        let controller = ActionController::seeded(
            pet,
            directives,
            settings.rename_policy(),
            settings.decay_interval(),
            seed,
        );
        Self {
            controller,
            timers: TimerQueue::new(),
            player: Player::new(),
            frames,
            scene: Scene::Main,
            banner: None,
            name_edit: String::new(),
            frame_interval,
            frame_timer: None,
        }
    }

    pub fn start(&mut self) {
        let directive = self.controller.start(&mut self.timers);
        self.present(&directive);
    }

    /// Runs every timer due by `now` (time since start).
    pub fn advance(&mut self, now: Duration) {
        while let Some((id, event)) = self.timers.pop_due(now) {
            match event {
                TimerEvent::FrameAdvance if self.frame_timer == Some(id) => {
                    self.player.advance(&self.frames);
                    self.arm_frame_timer();
                }
                _ => {
                    let changed = self.controller.on_timer(id, event, &mut self.timers);
                    if let Some(directive) = changed {
                        self.present(&directive);
                    }
                }
            }
        }
    }

    /// Applies one input action. Returns `false` when the user asked to quit.
    pub fn handle(&mut self, action: PlayerAction) -> bool {
        match action {
            PlayerAction::Quit => return false,
            PlayerAction::Command(command) => {
                self.dispatch(command);
            }
            PlayerAction::HelpToggle => {
                self.scene = match self.scene {
                    Scene::Help => Scene::Main,
                    _ => Scene::Help,
                };
            }
            PlayerAction::Back => self.scene = Scene::Main,
            PlayerAction::RenameOpen => {
                self.name_edit.clear();
                self.banner = None;
                self.scene = Scene::Rename;
            }
            PlayerAction::RenameChar(ch) => {
                if self.name_edit.chars().count() < NAME_INPUT_MAX {
                    self.name_edit.push(ch);
                }
            }
            PlayerAction::RenameBackspace => {
                self.name_edit.pop();
            }
            PlayerAction::RenameCommit => {
                let candidate = std::mem::take(&mut self.name_edit);
                let result = self.dispatch(Command::Rename(candidate));
                // rejected names keep the prompt open for another try
                self.scene = if result.retry {
                    Scene::Rename
                } else {
                    Scene::Main
                };
            }
            PlayerAction::RenameCancel => {
                self.name_edit.clear();
                self.scene = Scene::Main;
            }
        }
        true
    }

    fn dispatch(&mut self, command: Command) -> CommandReport {
        let result = self.controller.command(command, &mut self.timers);
        if let Some(directive) = result.directive {
            self.present(&directive);
        }
        self.banner = Some(Banner {
            text: result.report.message.clone(),
            applied: result.report.outcome.is_applied(),
        });
        result
    }

    /// Switches the player to a new directive and restarts the frame clock,
    /// so its first frame gets a full interval on screen.
    fn present(&mut self, directive: &ActivityDirective) {
        debug!(activity = directive.activity.label(), "showing directive");
        self.player.show(directive);
        if let Some(old) = self.frame_timer.take() {
            self.timers.cancel(old);
        }
        self.arm_frame_timer();
    }

    fn arm_frame_timer(&mut self) {
        self.frame_timer = Some(
            self.timers
                .schedule(self.frame_interval, TimerEvent::FrameAdvance),
        );
    }

    pub fn draw(&self, buf: &mut CellBuffer, enable_color: bool) {
        let cols = buf.w as i32;
        let rows = buf.h as i32;
        let pet_x = cols / 2 + cols / 6;
        let pet_y = rows / 2;
        let fg = if enable_color { Color::Yellow } else { Color::White };
        draw_pet(buf, self.player.frame(&self.frames), pet_x, pet_y, fg);

        ui_overlay(
            buf,
            self.controller.pet(),
            self.banner.as_ref(),
            self.scene,
            enable_color,
        );

        match self.scene {
            Scene::Help => draw_center_box(buf, "How to play", HELP_TEXT),
            Scene::Rename => {
                let mut preview = self.name_edit.clone();
                if preview.chars().count() < NAME_INPUT_MAX {
                    preview.push('_');
                }
                let hint = match &self.banner {
                    Some(b) if !b.applied => b.text.as_str(),
                    _ => "",
                };
                draw_center_box(
                    buf,
                    "Rename pet",
                    &format!(
                        "Pick a new name.\n\nName: {}\n\n{}\n\nEnter submit | Esc cancel | Backspace delete",
                        preview, hint
                    ),
                );
            }
            Scene::Main => {}
        }
    }

    pub fn frame_provider(&self) -> &dyn FrameProvider {
        &self.frames
    }
}

pub struct App {
    settings: Settings,
    session: Session,
    term: Terminal,
}

impl App {
    pub fn init(settings: Settings, seed: u64) -> anyhow::Result<Self> {
        let session = Session::new(&settings, seed);
        let term = Terminal::begin()?;
        Ok(Self {
            settings,
            session,
            term,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(1, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let started = Instant::now();

        self.session.start();
        info!(fps, "event loop running");

        let mut running = true;
        while running {
            self.term.resize_if_needed()?;

            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(action) = map_event_to_action(self.session.scene, ev) {
                    if !self.session.handle(action) {
                        running = false;
                        break;
                    }
                }
            }

            self.session.advance(started.elapsed());

            self.term.cur.clear(Color::Black);
            self.session.draw(&mut self.term.cur, self.settings.enable_color);
            self.term.present(true)?;

            spin_sleep(frame_dt, Instant::now());
        }

        info!(summary = %self.session.controller.pet().describe(), "quitting");
        Ok(())
    }

    pub fn shutdown(mut self) -> anyhow::Result<()> {
        self.term.end()
    }
}

pub fn run(settings: Settings, seed: u64) -> anyhow::Result<()> {
    let mut app = App::init(settings, seed)?;
    let result = app.run();
    app.shutdown()?;
    result
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
