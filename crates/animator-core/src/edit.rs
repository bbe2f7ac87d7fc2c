//! # Edit Session
//!
//! Interactive editing of a model while it plays.
//!
//! ## Responsibilities
//! - **Commands**: `EditCommand` parses one line of user input.
//! - **Controller**: `EditSession` applies commands to the model, the
//!   playback clock and the current selection. Failed edits are reported and
//!   the session carries on.
//! - **Event Loop**: `run_interactive` multiplexes the playback ticker and a
//!   line reader over channels.

use animator_data::{write_text, ShapeKind, StateSpec};
use crossbeam_channel::{select, unbounded};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread;
use tracing::{debug, info, warn};

use crate::animation::EasingType;
use crate::error::Result;
use crate::model::{AnimatorModel, RenderedShape};
use crate::playback::{Playback, Ticker};
use crate::views::frame_svg;

pub const HELP: &str = "\
commands:
  start | pause | restart | faster | slower | loop on|off
  rectangle | ellipse                  kind of the next added shape
  add-shape <id>                       add a shape of the current kind
  select <id>                          select a shape and list its keyframes
  remove-shape                         remove the selected shape
  add-keyframe <t> <x> <y> <w> <h> <r> <g> <b>
  pick <t>                             pick a keyframe of the selected shape
  modify-keyframe <x> <y> <w> <h> <r> <g> <b>
  remove-keyframe                      remove the picked keyframe
  show                                 print the frame at the current tick
  save <path>                          write the animation as text
  help | quit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditCommand {
    Start,
    Pause,
    Restart,
    SpeedUp,
    SlowDown,
    SetLooping(bool),
    NextKind(ShapeKind),
    AddShape(String),
    Select(String),
    RemoveShape,
    AddKeyframe { tick: u32, state: StateSpec },
    Pick(u32),
    ModifyKeyframe(StateSpec),
    RemoveKeyframe,
    Show,
    Save(PathBuf),
    Help,
    Quit,
}

fn parse_state(args: &[&str]) -> std::result::Result<StateSpec, String> {
    if args.len() != 7 {
        return Err(format!("expected 7 numbers (x y w h r g b), found {}", args.len()));
    }
    let mut values = [0i32; 7];
    for (slot, token) in values.iter_mut().zip(args) {
        *slot = token
            .parse()
            .map_err(|_| format!("'{}' is not a number", token))?;
    }
    Ok(StateSpec::from_array(values))
}

fn parse_tick(token: Option<&&str>) -> std::result::Result<u32, String> {
    let token = token.ok_or("missing tick")?;
    token
        .parse()
        .map_err(|_| format!("'{}' is not a tick", token))
}

impl FromStr for EditCommand {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            return Err("empty command".to_string());
        };

        let no_args = |cmd: EditCommand| {
            if args.is_empty() {
                Ok(cmd)
            } else {
                Err(format!("'{}' takes no arguments", name))
            }
        };
        let one_arg = || match args {
            [arg] => Ok(arg.to_string()),
            _ => Err(format!("'{}' takes exactly one argument", name)),
        };

        match name {
            "start" => no_args(EditCommand::Start),
            "pause" => no_args(EditCommand::Pause),
            "restart" => no_args(EditCommand::Restart),
            "faster" => no_args(EditCommand::SpeedUp),
            "slower" => no_args(EditCommand::SlowDown),
            "loop" => match one_arg()?.as_str() {
                "on" => Ok(EditCommand::SetLooping(true)),
                "off" => Ok(EditCommand::SetLooping(false)),
                other => Err(format!("expected 'loop on' or 'loop off', found '{}'", other)),
            },
            "rectangle" | "ellipse" => no_args(EditCommand::NextKind(name.parse()?)),
            "add-shape" => Ok(EditCommand::AddShape(one_arg()?)),
            "select" => Ok(EditCommand::Select(one_arg()?)),
            "remove-shape" => no_args(EditCommand::RemoveShape),
            "add-keyframe" => Ok(EditCommand::AddKeyframe {
                tick: parse_tick(args.first())?,
                state: parse_state(args.get(1..).unwrap_or_default())?,
            }),
            "pick" => Ok(EditCommand::Pick(parse_tick(args.first())?)),
            "modify-keyframe" => Ok(EditCommand::ModifyKeyframe(parse_state(args)?)),
            "remove-keyframe" => no_args(EditCommand::RemoveKeyframe),
            "show" => no_args(EditCommand::Show),
            "save" => Ok(EditCommand::Save(PathBuf::from(one_arg()?))),
            "help" | "?" => no_args(EditCommand::Help),
            "quit" | "exit" => no_args(EditCommand::Quit),
            other => Err(format!("unknown command '{}' (try 'help')", other)),
        }
    }
}

/// What a command produced: lines for the user, and whether to stop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl EditOutcome {
    fn say(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            quit: false,
        }
    }

    fn silent() -> Self {
        Self::default()
    }
}

pub struct EditSession {
    model: AnimatorModel,
    playback: Playback,
    selected: Option<String>,
    picked: Option<u32>,
    next_kind: ShapeKind,
}

impl EditSession {
    pub fn new(model: AnimatorModel, speed: u32) -> Result<Self> {
        Ok(Self {
            model,
            playback: Playback::new(speed)?,
            selected: None,
            picked: None,
            next_kind: ShapeKind::Rectangle,
        })
    }

    pub fn model(&self) -> &AnimatorModel {
        &self.model
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn picked(&self) -> Option<u32> {
        self.picked
    }

    /// Advances the playback clock by one timer tick.
    pub fn on_tick(&mut self) -> Option<Vec<RenderedShape>> {
        self.playback.advance(&self.model)
    }

    /// Parses and applies one line of input.
    pub fn handle_line(&mut self, line: &str) -> EditOutcome {
        let line = line.trim();
        if line.is_empty() {
            return EditOutcome::silent();
        }
        match line.parse::<EditCommand>() {
            Ok(cmd) => self.apply(cmd),
            Err(e) => EditOutcome::say(e),
        }
    }

    pub fn apply(&mut self, cmd: EditCommand) -> EditOutcome {
        debug!(?cmd, "edit command");
        match cmd {
            EditCommand::Start => {
                self.playback.start();
                EditOutcome::silent()
            }
            EditCommand::Pause => {
                self.playback.pause();
                EditOutcome::silent()
            }
            EditCommand::Restart => {
                self.playback.restart();
                EditOutcome::silent()
            }
            EditCommand::SpeedUp => {
                self.playback.speed_up();
                EditOutcome::say(format!("delay {:?}", self.playback.delay()))
            }
            EditCommand::SlowDown => {
                self.playback.slow_down();
                EditOutcome::say(format!("delay {:?}", self.playback.delay()))
            }
            EditCommand::SetLooping(on) => {
                self.playback.set_looping(on);
                EditOutcome::silent()
            }
            EditCommand::NextKind(kind) => {
                self.next_kind = kind;
                EditOutcome::silent()
            }
            EditCommand::AddShape(id) => self.add_shape(&id),
            EditCommand::Select(id) => self.select(id),
            EditCommand::RemoveShape => self.remove_shape(),
            EditCommand::AddKeyframe { tick, state } => self.add_keyframe(tick, &state),
            EditCommand::Pick(tick) => self.pick(tick),
            EditCommand::ModifyKeyframe(state) => self.modify_keyframe(&state),
            EditCommand::RemoveKeyframe => self.remove_keyframe(),
            EditCommand::Show => EditOutcome {
                lines: describe_frame(self.playback.tick(), &self.model.tween(self.playback.tick())),
                quit: false,
            },
            EditCommand::Save(path) => self.save(&path),
            EditCommand::Help => EditOutcome::say(HELP),
            EditCommand::Quit => EditOutcome {
                lines: Vec::new(),
                quit: true,
            },
        }
    }

    fn add_shape(&mut self, id: &str) -> EditOutcome {
        match self.model.add_shape(id, self.next_kind) {
            Ok(()) => EditOutcome::say(format!("shapes: {}", self.model.ids().join(" "))),
            Err(e) => {
                warn!(error = %e, "add shape failed");
                EditOutcome::say(format!("Shape could not be created: {}", e))
            }
        }
    }

    fn select(&mut self, id: String) -> EditOutcome {
        if self.model.shape(&id).is_none() {
            return EditOutcome::say(format!("no shape named '{}'", id));
        }
        self.selected = Some(id);
        self.picked = None;
        EditOutcome {
            lines: self.keyframe_listing(),
            quit: false,
        }
    }

    fn remove_shape(&mut self) -> EditOutcome {
        let Some(id) = self.selected.take() else {
            return EditOutcome::say("no shape selected");
        };
        self.picked = None;
        match self.model.remove_shape(&id) {
            Ok(()) => EditOutcome::say(format!("shapes: {}", self.model.ids().join(" "))),
            Err(e) => EditOutcome::say(e.to_string()),
        }
    }

    fn add_keyframe(&mut self, tick: u32, state: &StateSpec) -> EditOutcome {
        let Some(id) = self.selected.clone() else {
            return EditOutcome::say("no shape selected");
        };
        if let Err(e) = self.model.add_keyframe(&id, tick, state, EasingType::Linear) {
            warn!(error = %e, "add keyframe failed");
            let mut out = EditOutcome::say(format!("Keyframe could not be created: {}", e));
            out.lines.extend(self.keyframe_listing());
            return out;
        }
        EditOutcome {
            lines: self.keyframe_listing(),
            quit: false,
        }
    }

    fn pick(&mut self, tick: u32) -> EditOutcome {
        let Some(id) = self.selected.as_deref() else {
            return EditOutcome::say("no shape selected");
        };
        match self.model.shape(id).and_then(|s| s.keyframe(tick)) {
            Some(_) => {
                self.picked = Some(tick);
                EditOutcome::say(format!("picked keyframe {}", tick))
            }
            None => EditOutcome::say(format!("'{}' has no keyframe at tick {}", id, tick)),
        }
    }

    fn modify_keyframe(&mut self, state: &StateSpec) -> EditOutcome {
        let (Some(id), Some(tick)) = (self.selected.clone(), self.picked.take()) else {
            return EditOutcome::say("no keyframe picked");
        };
        let mut out = match self.model.modify_keyframe(&id, tick, state) {
            Ok(()) => EditOutcome::silent(),
            Err(e) => {
                warn!(error = %e, "modify keyframe failed");
                EditOutcome::say(format!("Keyframe could not be changed: {}", e))
            }
        };
        out.lines.extend(self.keyframe_listing());
        out
    }

    fn remove_keyframe(&mut self) -> EditOutcome {
        let (Some(id), Some(tick)) = (self.selected.clone(), self.picked.take()) else {
            return EditOutcome::say("no keyframe picked");
        };
        match self.model.remove_keyframe(&id, tick) {
            Ok(_) => EditOutcome {
                lines: self.keyframe_listing(),
                quit: false,
            },
            Err(e) => EditOutcome::say(e.to_string()),
        }
    }

    fn save(&self, path: &Path) -> EditOutcome {
        match fs::write(path, write_text(&self.model.to_doc())) {
            Ok(()) => {
                info!(path = %path.display(), "saved animation");
                EditOutcome::say(format!("saved {}", path.display()))
            }
            Err(e) => EditOutcome::say(format!("could not save {}: {}", path.display(), e)),
        }
    }

    /// One line per keyframe of the selected shape: `tick x y w h r g b`.
    fn keyframe_listing(&self) -> Vec<String> {
        let Some(shape) = self.selected.as_deref().and_then(|id| self.model.shape(id)) else {
            return Vec::new();
        };
        let mut lines = vec![format!("{} ({})", shape.id, shape.kind)];
        for k in shape.keyframes() {
            let s = k.state.to_spec();
            lines.push(format!(
                "  {} {} {} {} {} {} {} {}",
                k.tick, s.x, s.y, s.w, s.h, s.r, s.g, s.b
            ));
        }
        lines
    }
}

fn describe_frame(tick: u32, shapes: &[RenderedShape]) -> Vec<String> {
    let mut lines = vec![format!("tick {}", tick)];
    for shape in shapes {
        let s = &shape.state;
        lines.push(format!(
            "  {} {} at ({:.1}, {:.1}) size {:.1}x{:.1} {}",
            shape.id,
            shape.kind,
            s.x,
            s.y,
            s.width,
            s.height,
            s.color.rgb()
        ));
    }
    lines
}

/// Runs the session until `quit` or end of input.
///
/// Input lines are read on their own thread; timer ticks come from a
/// [`Ticker`]. When `preview` is set, every displayed frame is written there
/// as a static SVG.
///
/// At end of input the reader thread is joined before returning. After
/// `quit` it may still be blocked reading `input`, so it is left detached and
/// exits once its next read returns.
pub fn run_interactive<R, W>(
    mut session: EditSession,
    input: R,
    mut out: W,
    preview: Option<PathBuf>,
) -> Result<EditSession>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let (line_tx, line_rx) = unbounded::<String>();
    let reader = thread::Builder::new()
        .name("edit-input".to_string())
        .spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    let mut input_closed = false;

    let ticker = Ticker::spawn(session.playback().delay());
    writeln!(out, "{}", HELP)?;
    out.flush()?;

    loop {
        select! {
            recv(ticker.ticks()) -> _ => {
                if let Some(frame) = session.on_tick() {
                    if let Some(path) = &preview {
                        let svg = frame_svg(session.model().canvas(), &frame, None);
                        if let Err(e) = fs::write(path, svg) {
                            warn!(path = %path.display(), error = %e, "could not write preview");
                        }
                    }
                }
            }
            recv(line_rx) -> line => {
                let Ok(line) = line else {
                    debug!("input closed");
                    input_closed = true;
                    break;
                };
                let delay = session.playback().delay();
                let outcome = session.handle_line(&line);
                if session.playback().delay() != delay {
                    ticker.set_delay(session.playback().delay());
                }
                for l in &outcome.lines {
                    writeln!(out, "{}", l)?;
                }
                out.flush()?;
                if outcome.quit {
                    break;
                }
            }
        }
    }

    drop(line_rx);
    if input_closed && reader.join().is_err() {
        warn!("input reader panicked");
    }
    Ok(session)
}
