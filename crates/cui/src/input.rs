use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    Back,
    ToggleHelp,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Activate,
    SwitchTab,
    Digit(u8),
    Erase,
    NewGame,
    AddPlayer,
    RemoveSelected,
    Rename,
    EditNote,
    DeleteGame,
    FinishGame,
    ToggleScoreboard,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => InputAction::Quit,
            _ => InputAction::None,
        };
    }
    match key.code {
        KeyCode::Esc => InputAction::Back,
        KeyCode::Tab | KeyCode::BackTab => InputAction::SwitchTab,
        KeyCode::Up => InputAction::MoveUp,
        KeyCode::Down => InputAction::MoveDown,
        KeyCode::Left => InputAction::MoveLeft,
        KeyCode::Right => InputAction::MoveRight,
        KeyCode::Enter => InputAction::Activate,
        KeyCode::Backspace => InputAction::Erase,
        KeyCode::Delete => InputAction::DeleteGame,
        KeyCode::Char(ch @ '0'..='9') => InputAction::Digit(ch as u8 - b'0'),
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Char('h') => InputAction::MoveLeft,
        KeyCode::Char('l') => InputAction::MoveRight,
        KeyCode::Char('n') => InputAction::NewGame,
        KeyCode::Char('a') | KeyCode::Char('+') => InputAction::AddPlayer,
        KeyCode::Char('x') | KeyCode::Char('-') => InputAction::RemoveSelected,
        KeyCode::Char('r') => InputAction::Rename,
        KeyCode::Char('e') => InputAction::EditNote,
        KeyCode::Char('d') => InputAction::DeleteGame,
        KeyCode::Char('f') => InputAction::FinishGame,
        KeyCode::Char('s') => InputAction::ToggleScoreboard,
        _ => InputAction::None,
    }
}
