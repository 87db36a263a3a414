use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    NextFocus,
    PrevFocus,
    MoveUp,
    MoveDown,
    Cancel,
    EditRoster,
    EditCount,
    IncreaseCount,
    DecreaseCount,
    ToggleDedupe,
    Draw,
    CopyResult,
    Reset,
    NextPreset,
    LoadPreset,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Esc => InputAction::Cancel,
        KeyCode::Tab => InputAction::NextFocus,
        KeyCode::BackTab => InputAction::PrevFocus,
        KeyCode::Up => InputAction::MoveUp,
        KeyCode::Down => InputAction::MoveDown,
        KeyCode::Enter => InputAction::Draw,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char(' ') | KeyCode::Char('d') => InputAction::Draw,
        KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Char('e') | KeyCode::Char('i') => InputAction::EditRoster,
        KeyCode::Char('n') => InputAction::EditCount,
        KeyCode::Char('+') | KeyCode::Char('=') => InputAction::IncreaseCount,
        KeyCode::Char('-') => InputAction::DecreaseCount,
        KeyCode::Char('u') => InputAction::ToggleDedupe,
        KeyCode::Char('y') | KeyCode::Char('c') => InputAction::CopyResult,
        KeyCode::Char('R') => InputAction::Reset,
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Reset,
        KeyCode::Char('p') => InputAction::NextPreset,
        KeyCode::Char('P') | KeyCode::Char('l') => InputAction::LoadPreset,
        _ => InputAction::None,
    }
}
