use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{self, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use sort_visualiser_core::{Color, Renderer};

const BAR_WIDTH: usize = 40;

#[derive(Debug, Default, Clone)]
struct Canvas {
    heights: Vec<i64>,
    colors: Vec<Option<Color>>,
}

/// Both lanes' canvases, redrawn together as two columns.
#[derive(Debug, Default)]
pub struct Board {
    canvases: [Canvas; 2],
}

impl Board {
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Largest magnitude across both canvases, never below one.
    fn peak(&self) -> u64 {
        self.canvases
            .iter()
            .flat_map(|c| c.heights.iter().copied())
            .map(i64::unsigned_abs)
            .max()
            .unwrap_or(1)
            .max(1)
    }

    fn draw(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

        let rows = self.canvases.iter().map(|c| c.heights.len()).max().unwrap_or(0);
        let peak = self.peak();
        for row in 0..rows {
            for canvas in &self.canvases {
                if canvas.heights.is_empty() {
                    continue;
                }
                write_bar(&mut out, canvas, row, peak)?;
                queue!(out, Print("  "))?;
            }
            queue!(out, Print("\n"))?;
        }
        out.flush()
    }
}

/// Cells filled for `height` when `peak` spans the whole bar.
fn bar_cells(height: i64, peak: u64) -> usize {
    let scaled = u128::from(height.unsigned_abs()) * BAR_WIDTH as u128 / u128::from(peak.max(1));
    usize::try_from(scaled).map_or(BAR_WIDTH, |cells| cells.min(BAR_WIDTH))
}

fn write_bar(out: &mut impl Write, canvas: &Canvas, row: usize, peak: u64) -> io::Result<()> {
    let Some(&height) = canvas.heights.get(row) else {
        return queue!(out, Print(" ".repeat(BAR_WIDTH)));
    };
    let filled = bar_cells(height, peak);
    let bar = "█".repeat(filled);
    let pad = " ".repeat(BAR_WIDTH - filled);
    match canvas.colors.get(row).and_then(Option::as_ref).and_then(Color::rgb) {
        Some((r, g, b)) => queue!(
            out,
            SetForegroundColor(style::Color::Rgb { r, g, b }),
            Print(bar),
            ResetColor,
            Print(pad)
        ),
        None => queue!(out, Print(bar), Print(pad)),
    }
}

/// Draws one lane of a shared [`Board`] on stdout using ANSI truecolour.
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    board: Rc<RefCell<Board>>,
    lane: usize,
}

impl TerminalRenderer {
    pub fn new(board: Rc<RefCell<Board>>, lane: usize) -> Self {
        Self { board, lane }
    }

    fn update(&mut self, change: impl FnOnce(&mut Canvas)) {
        let mut board = self.board.borrow_mut();
        change(&mut board.canvases[self.lane]);
        if let Err(err) = board.draw() {
            tracing::warn!(error = %err, "failed to draw board");
        }
    }
}

impl Renderer for TerminalRenderer {
    fn populate(&mut self, heights: &[i64]) {
        self.update(|canvas| {
            canvas.heights = heights.to_vec();
            canvas.colors = vec![None; heights.len()];
        });
    }

    fn highlight(&mut self, index: usize, color: &Color) {
        self.update(|canvas| {
            if let Some(slot) = canvas.colors.get_mut(index) {
                *slot = Some(color.clone());
            }
        });
    }

    fn set_value(&mut self, index: usize, value: i64) {
        self.update(|canvas| {
            if let Some(slot) = canvas.heights.get_mut(index) {
                *slot = value;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderers_share_one_board() {
        let board = Board::shared();
        let mut first = TerminalRenderer::new(board.clone(), 0);
        let mut second = TerminalRenderer::new(board.clone(), 1);

        first.populate(&[3, 1]);
        second.populate(&[5]);
        first.set_value(1, 9);
        second.highlight(0, &Color::new("#98C379"));

        let board = board.borrow();
        assert_eq!(board.canvases[0].heights, vec![3, 9]);
        assert_eq!(board.canvases[1].colors[0], Some(Color::new("#98C379")));
    }

    #[test]
    fn bars_scale_to_the_peak() {
        let canvas = Canvas {
            heights: vec![10, 5],
            colors: vec![None, None],
        };
        let mut out = Vec::new();
        write_bar(&mut out, &canvas, 1, 10).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert_eq!(line.chars().filter(|&c| c == '█').count(), BAR_WIDTH / 2);
        assert_eq!(line.chars().count(), BAR_WIDTH);
    }

    #[test]
    fn extreme_heights_fit_the_bar() {
        let canvas = Canvas {
            heights: vec![i64::MAX, i64::MIN, 1],
            colors: vec![None; 3],
        };
        let peak = i64::MIN.unsigned_abs();
        assert_eq!(bar_cells(i64::MIN, peak), BAR_WIDTH);
        assert_eq!(bar_cells(i64::MAX, peak), BAR_WIDTH - 1);
        assert_eq!(bar_cells(i64::MAX, 1), BAR_WIDTH);
        assert_eq!(bar_cells(1, peak), 0);

        for row in 0..canvas.heights.len() {
            let mut out = Vec::new();
            write_bar(&mut out, &canvas, row, peak).unwrap();
            assert_eq!(String::from_utf8(out).unwrap().chars().count(), BAR_WIDTH);
        }
    }

    #[test]
    fn coloured_bars_use_truecolour() {
        let canvas = Canvas {
            heights: vec![4],
            colors: vec![Some(Color::new("#98C379"))],
        };
        let mut out = Vec::new();
        write_bar(&mut out, &canvas, 0, 4).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert!(line.contains("38;2;152;195;121"));
        assert_eq!(line.chars().filter(|&c| c == '█').count(), BAR_WIDTH);
    }
}
