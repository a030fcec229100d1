use crate::frames::Frame;
use crate::input::Scene;
use crate::model::PetState;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub struct CellBuffer {
    pub w: u16,
    pub h: u16,
    pub cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }

    pub fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }

    pub fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell {
            bg,
            ..Cell::default()
        });
    }

    /// Row `y` as a string, for tests and debugging.
    pub fn row(&self, y: u16) -> String {
        (0..self.w).filter_map(|x| self.get(x, y)).map(|c| c.ch).collect()
    }
}

pub struct Terminal {
    pub out: io::Stdout,
    pub cols: u16,
    pub rows: u16,
    pub prev: CellBuffer,
    pub cur: CellBuffer,
}

impl Terminal {
    pub fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/// Last action result shown under the meters.
#[derive(Clone, Debug)]
pub struct Banner {
    pub text: String,
    pub applied: bool,
}

pub fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

fn bar(value: u8, width: usize) -> String {
    let fill = (value.min(100) as usize * width + 50) / 100;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

/// Draws a frame centred on (`cx`, `cy`). Spaces are transparent.
pub fn draw_pet(buf: &mut CellBuffer, frame: Option<Frame>, cx: i32, cy: i32, fg: Color) {
    let Some(frame) = frame else {
        return;
    };
    let h = frame.len() as i32;
    let w = frame.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
    let x0 = cx - w / 2;
    let y0 = cy - h / 2;

    for (yy, line) in frame.iter().enumerate() {
        let y = y0 + yy as i32;
        if y < 0 || y >= buf.h as i32 {
            continue;
        }
        for (xx, ch) in line.chars().enumerate() {
            let x = x0 + xx as i32;
            if ch == ' ' || x < 0 || x >= buf.w as i32 {
                continue;
            }
            buf.set(
                x as u16,
                y as u16,
                Cell {
                    ch,
                    fg,
                    bg: Color::Black,
                },
            );
        }
    }
}

pub fn ui_overlay(
    buf: &mut CellBuffer,
    pet: &PetState,
    banner: Option<&Banner>,
    scene: Scene,
    enable_color: bool,
) {
    let bg = Color::Black;
    let fg = Color::White;

    let title = format!("Virtual Pet  |  {}  |  {}", pet.name(), pet.activity().label());
    draw_text(buf, 1, 0, &title, fg, bg);

    let stats = pet.status();
    let lines = [
        ("Hunger   ", stats.hunger),
        ("Energy   ", stats.energy),
        ("Happiness", stats.happiness),
    ];
    for (i, (name, val)) in lines.iter().enumerate() {
        let s = format!("{name}: {} {:>3}", bar(*val, 14), val);
        draw_text(buf, 1, 2 + i as u16, &s, fg, bg);
    }
    draw_text(buf, 1, 6, &pet.describe(), fg, bg);

    if let Some(b) = banner {
        let color = match (enable_color, b.applied) {
            (false, _) => fg,
            (true, true) => Color::Green,
            (true, false) => Color::Red,
        };
        draw_text(buf, 1, 8, &b.text, color, bg);
    }

    let help = match scene {
        Scene::Main => "Keys: f feed | p play | s sleep | r rename | h help | q quit",
        Scene::Help => "Help: esc back | h close | q quit",
        Scene::Rename => "Rename: type name | enter submit | esc cancel",
    };
    draw_text(buf, 1, buf.h.saturating_sub(1), help, fg, bg);
}

pub fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str) {
    let w = buf.w;
    let h = buf.h;
    if w < 6 || h < 6 {
        return;
    }

    let bw = 60.min(w.saturating_sub(4));
    let bh = 14.min(h.saturating_sub(4));
    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;

    let edge = |ch| Cell {
        ch,
        fg: Color::White,
        bg: Color::Black,
    };

    for y in y0..y0 + bh {
        for x in x0..x0 + bw {
            buf.set(x, y, edge(' '));
        }
    }
    for x in x0..x0 + bw {
        buf.set(x, y0, edge('─'));
        buf.set(x, y0 + bh - 1, edge('─'));
    }
    for y in y0..y0 + bh {
        buf.set(x0, y, edge('│'));
        buf.set(x0 + bw - 1, y, edge('│'));
    }
    buf.set(x0, y0, edge('┌'));
    buf.set(x0 + bw - 1, y0, edge('┐'));
    buf.set(x0, y0 + bh - 1, edge('└'));
    buf.set(x0 + bw - 1, y0 + bh - 1, edge('┘'));

    draw_text(buf, x0 + 2, y0 + 1, title, Color::White, Color::Black);

    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        draw_text(buf, x0 + 2, yy, line, Color::White, Color::Black);
        yy += 1;
    }
}
