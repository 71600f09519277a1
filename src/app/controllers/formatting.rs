//! Character and paragraph formatting over a selection.
//!
//! Mixed selections resolve against the document's base font: a toggle
//! always leaves the whole selection with one value for the toggled bit.

use super::session::DocumentSession;
use crate::app::domain::prompts::Prompter;
use crate::app::domain::style::{CharStyle, Effective, FontSize, FontSpec, Rgb, StyleBit, StyleFlags};
use crate::app::domain::surface::{Selection, TextSurface};
use crate::app::infrastructure::error::{AppError, Result};

/// Font the tie-break rules read from: the selection's font when uniform,
/// otherwise the base font.
fn reference_font<S: TextSurface + ?Sized>(surface: &S, selection: Selection) -> FontSpec {
    match surface.effective_font(selection) {
        Effective::Uniform(font) => font,
        Effective::Mixed => surface.base_font(),
    }
}

/// Sets `bit` across the selection if the reference font lacks it, clears it
/// otherwise. Returns the new state of `bit`.
pub fn toggle_style<S>(surface: &mut S, session: &DocumentSession, selection: Selection, bit: StyleBit) -> bool
where
    S: TextSurface + ?Sized,
{
    let reference = reference_font(surface, selection);
    let on = !reference.flags.has(bit);
    let font = reference.with_flags(reference.flags.with(bit, on));
    surface.set_font(selection, &font);
    session.mark_dirty();
    on
}

pub fn is_style_active<S: TextSurface + ?Sized>(surface: &S, selection: Selection, bit: StyleBit) -> bool {
    reference_font(surface, selection).flags.has(bit)
}

/// Keeps family and style bits of the reference font. Zero and sizes too
/// large to represent are rejected without touching the document.
pub fn apply_font_size<S>(surface: &mut S, session: &DocumentSession, selection: Selection, points: u32) -> Result<()>
where
    S: TextSurface + ?Sized,
{
    let size = FontSize::from_points(points)
        .ok_or_else(|| AppError::InvalidArgument(format!("font size must be a positive number of points, got {}", points)))?;
    let font = reference_font(surface, selection).with_size(size);
    surface.set_font(selection, &font);
    session.mark_dirty();
    Ok(())
}

pub fn apply_color<S>(surface: &mut S, session: &DocumentSession, selection: Selection, color: Rgb)
where
    S: TextSurface + ?Sized,
{
    surface.set_color(selection, color);
    session.mark_dirty();
}

/// Asks for a colour starting from the selection's colour (black if mixed).
/// Returns `false` if the dialog was cancelled.
pub fn choose_and_apply_color<S, P>(
    surface: &mut S,
    session: &DocumentSession,
    prompter: &mut P,
    selection: Selection,
) -> bool
where
    S: TextSurface + ?Sized,
    P: Prompter + ?Sized,
{
    let initial = surface.effective_color(selection).unwrap_or(Rgb::BLACK);
    match prompter.choose_color(initial) {
        Some(color) => {
            apply_color(surface, session, selection, color);
            true
        }
        None => false,
    }
}

/// Flips every touched paragraph to the negation of the current state. A
/// mixed state counts as not bulleted. Returns the new state.
pub fn toggle_bullet<S>(surface: &mut S, session: &DocumentSession, selection: Selection) -> bool
where
    S: TextSurface + ?Sized,
{
    let bulleted = !surface.bullet_state(selection).unwrap_or(false);
    surface.set_bullet(selection, bulleted);
    session.mark_dirty();
    bulleted
}

/// Base family and size, regular style, black, no bullet.
pub fn clear_formatting<S>(surface: &mut S, session: &DocumentSession, selection: Selection)
where
    S: TextSurface + ?Sized,
{
    let base = surface.base_font();
    let style = CharStyle::new(base.with_flags(StyleFlags::REGULAR), Rgb::BLACK);
    surface.set_style(selection, &style);
    surface.set_bullet(selection, false);
    session.mark_dirty();
}
