//! Terminal form driver.
//!
//! Draws a [`FormHandle`] on the alternate screen following its
//! [`FormLayout`] and blocks until the operator submits or cancels.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mtg_form::{
    Control, FormDriver, FormHandle, FormLayout, Outcome, Placement, Result, Widget,
};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use ratatui::{DefaultTerminal, Frame};

/// Approximate pixel size of a terminal cell, used to scale window sizes.
const CELL_PX: (u32, u32) = (8, 16);

/// Interactive driver on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalDriver;

impl FormDriver for TerminalDriver {
    fn run(&mut self, mut form: FormHandle) -> Result<Outcome> {
        let layout = FormLayout::compute(form.spec());
        let mut terminal = ratatui::try_init()?;
        let result = event_loop(&mut terminal, &mut form, &layout);
        ratatui::restore();
        result
    }
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    form: &mut FormHandle,
    layout: &FormLayout,
) -> Result<Outcome> {
    loop {
        terminal.draw(|frame| draw(frame, form, layout))?;
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(outcome) = handle_key(form, key)? {
                return Ok(outcome);
            }
        }
    }
}

/// Apply one key press. Returns the outcome once the form closes.
fn handle_key(form: &mut FormHandle, key: KeyEvent) -> Result<Option<Outcome>> {
    let focus = form.focus();
    match key.code {
        KeyCode::Enter => return Ok(Some(Outcome::Submitted(form.submit()?))),
        KeyCode::Esc => {
            form.cancel()?;
            return Ok(Some(Outcome::Cancelled));
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.cancel()?;
            return Ok(Some(Outcome::Cancelled));
        }
        KeyCode::Tab | KeyCode::Down => form.focus_next()?,
        KeyCode::BackTab | KeyCode::Up => form.focus_prev()?,
        code => match form.control(focus).cloned() {
            Some(Control::Entry { mut text }) => match code {
                KeyCode::Char(c) => {
                    text.push(c);
                    form.set_text(focus, text)?;
                }
                KeyCode::Backspace => {
                    text.pop();
                    form.set_text(focus, text)?;
                }
                _ => {}
            },
            Some(Control::Choice { options, selected }) => {
                let next = match code {
                    KeyCode::Right | KeyCode::Char(' ') => (selected + 1) % options.len(),
                    KeyCode::Left => (selected + options.len() - 1) % options.len(),
                    _ => selected,
                };
                form.select(focus, next)?;
            }
            None => {}
        },
    }
    Ok(None)
}

fn draw(frame: &mut Frame, form: &FormHandle, layout: &FormLayout) {
    let (width_px, height_px) = layout.window_size();
    let area = frame.area();

    // Instructions get three lines; every other grid row one
    let row_heights: Vec<u16> = (0..layout.rows)
        .map(|r| if r == 0 { 3 } else { 1 })
        .collect();
    let needed_height = row_heights.iter().sum::<u16>() + 2;
    let width = ((width_px / CELL_PX.0) as u16).max(layout.columns as u16 * 6);
    let height = ((height_px / CELL_PX.1) as u16).max(needed_height);
    let window = centered(area, width, height);

    let block = Block::bordered()
        .title(Line::from(format!(" {} ", form.spec().title)).bold())
        .title_bottom(" Enter: OK  Esc: Cancel  Tab: next field  \u{2190}/\u{2192}: choose ");
    let inner = block.inner(window);
    frame.render_widget(Clear, window);
    frame.render_widget(block, window);

    let cell_width = inner.width / layout.columns.max(1) as u16;
    let mut row_y = Vec::with_capacity(row_heights.len());
    let mut y = inner.y;
    for h in &row_heights {
        row_y.push(y);
        y = y.saturating_add(*h);
    }

    for placement in &layout.placements {
        let Some(rect) = cell_rect(inner, placement, cell_width, &row_y, &row_heights) else {
            continue;
        };
        match placement.widget {
            Widget::Image => {
                let name = form
                    .spec()
                    .image
                    .as_ref()
                    .and_then(|i| i.path.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                frame.render_widget(Paragraph::new(format!("[{name}]")).dim(), rect);
            }
            Widget::Instructions => {
                let text = Paragraph::new(form.spec().instructions.as_str())
                    .wrap(Wrap { trim: true });
                frame.render_widget(text, rect);
            }
            Widget::Heading(col) => {
                let header = form
                    .spec()
                    .columns
                    .get(col)
                    .and_then(|c| c.header.clone())
                    .unwrap_or_default();
                frame.render_widget(Paragraph::new(header).bold(), rect);
            }
            Widget::Separator(_) => {
                let rule = "\u{2500}".repeat(rect.width as usize);
                frame.render_widget(Paragraph::new(rule).dim(), rect);
            }
            Widget::Label(f) => {
                if let Some((name, _)) = form.controls().get(f) {
                    frame.render_widget(Paragraph::new(format!("{name} : ")), rect);
                }
            }
            Widget::Input(f) => {
                let focused = f == form.focus();
                let style = if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default().add_modifier(Modifier::UNDERLINED)
                };
                match form.control(f) {
                    Some(Control::Entry { text }) => {
                        frame.render_widget(Paragraph::new(text.as_str()).style(style), rect);
                        if focused {
                            let end = rect.x + (text.chars().count() as u16).min(rect.width.saturating_sub(1));
                            frame.set_cursor_position((end, rect.y));
                        }
                    }
                    Some(Control::Choice { options, selected }) => {
                        let label = options.get(*selected).map(String::as_str).unwrap_or("");
                        frame.render_widget(
                            Paragraph::new(format!("\u{25c2} {label} \u{25b8}")).style(style),
                            rect,
                        );
                    }
                    None => {}
                }
            }
            Widget::Ok => frame.render_widget(Paragraph::new("[ OK ]").bold(), rect),
            Widget::Cancel => frame.render_widget(Paragraph::new("[ Cancel ]"), rect),
        }
    }
}

/// Screen rectangle of a grid placement, clipped to `inner`.
fn cell_rect(
    inner: Rect,
    placement: &Placement,
    cell_width: u16,
    row_y: &[u16],
    row_heights: &[u16],
) -> Option<Rect> {
    let y = *row_y.get(placement.row)?;
    let height = *row_heights.get(placement.row)?;
    let x = inner.x + placement.column as u16 * cell_width;
    let rect = Rect::new(x, y, placement.span as u16 * cell_width, height);
    let clipped = rect.intersection(inner);
    (clipped.width > 0 && clipped.height > 0).then_some(clipped)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtg_form::{FieldValue, FormSpec, ParameterField};

    fn form() -> FormHandle {
        FormHandle::build(FormSpec::new(
            "t",
            "i",
            vec![
                ParameterField::new("Name", "ab"),
                ParameterField::new("Nozzle", FieldValue::choice(["x", "y", "z"], 1)),
            ],
        ))
        .unwrap()
    }

    fn press(form: &mut FormHandle, code: KeyCode) -> Option<Outcome> {
        handle_key(form, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn test_typing_edits_focused_entry() {
        let mut f = form();
        press(&mut f, KeyCode::Char('c'));
        press(&mut f, KeyCode::Backspace);
        press(&mut f, KeyCode::Backspace);
        press(&mut f, KeyCode::Char('q'));
        assert_eq!(f.control(0).unwrap().value(), "aq");
    }

    #[test]
    fn test_arrows_cycle_choice() {
        let mut f = form();
        press(&mut f, KeyCode::Tab);
        assert_eq!(f.focus(), 1);
        press(&mut f, KeyCode::Right);
        assert_eq!(f.control(1).unwrap().value(), "z");
        press(&mut f, KeyCode::Right);
        assert_eq!(f.control(1).unwrap().value(), "x");
        press(&mut f, KeyCode::Left);
        assert_eq!(f.control(1).unwrap().value(), "z");
    }

    #[test]
    fn test_enter_submits_and_esc_cancels() {
        let mut f = form();
        let outcome = press(&mut f, KeyCode::Enter).unwrap();
        assert_eq!(outcome.values(), ["ab", "y"]);

        let mut f = form();
        assert_eq!(press(&mut f, KeyCode::Esc), Some(Outcome::Cancelled));

        let mut f = form();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut f, ctrl_c).unwrap(), Some(Outcome::Cancelled));
    }

    #[test]
    fn test_centered_clamps_to_screen() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered(area, 40, 10), Rect::new(20, 7, 40, 10));
        assert_eq!(centered(area, 100, 30), area);
    }
}
