use crate::controller::Command;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    Main,
    Help,
    Rename,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    Command(Command),
    RenameOpen,
    RenameChar(char),
    RenameBackspace,
    RenameCommit,
    RenameCancel,
    HelpToggle,
    Back,
    Quit,
}

#[derive(Clone, Copy, Debug)]
pub struct InputEvent {
    pub key: KeyCode,
    pub mods: KeyModifiers,
}

pub fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub fn map_event_to_action(scene: Scene, ev: InputEvent) -> Option<PlayerAction> {
    if matches!(ev.key, KeyCode::Char('c') | KeyCode::Char('C'))
        && ev.mods.contains(KeyModifiers::CONTROL)
    {
        return Some(PlayerAction::Quit);
    }

    if scene == Scene::Rename {
        return match ev.key {
            KeyCode::Enter => Some(PlayerAction::RenameCommit),
            KeyCode::Esc => Some(PlayerAction::RenameCancel),
            KeyCode::Backspace => Some(PlayerAction::RenameBackspace),
            KeyCode::Char(ch) if !ch.is_control() => Some(PlayerAction::RenameChar(ch)),
            _ => None,
        };
    }

    match ev.key {
        KeyCode::Char('h') | KeyCode::Char('H') => return Some(PlayerAction::HelpToggle),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(PlayerAction::Quit),
        KeyCode::Esc => return Some(PlayerAction::Back),
        _ => {}
    }

    match scene {
        Scene::Main => match ev.key {
            KeyCode::Char('f') | KeyCode::Char('F') => Some(PlayerAction::Command(Command::Feed)),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(PlayerAction::Command(Command::Play)),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(PlayerAction::Command(Command::Sleep)),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(PlayerAction::RenameOpen),
            _ => None,
        },
        Scene::Help | Scene::Rename => None,
    }
}
