use std::io;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

/// What: Switch the terminal into raw mode on the alternate screen.
///
/// # Errors
/// - Any I/O error from crossterm.
pub fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    Ok(())
}

/// What: Undo [`setup_terminal`].
///
/// # Errors
/// - The first I/O error from either step.
///
/// Details:
/// - Both steps are attempted even if the first fails; the first error wins.
pub fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen);
    raw.and(screen)
}
