use crate::app::App;
use crate::input::InputAction;
use crowns_store::StorageBackend;

pub fn dispatch<B: StorageBackend>(app: &mut App<B>, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::Back => app.back(),
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::MoveUp => app.move_cursor(false),
        InputAction::MoveDown => app.move_cursor(true),
        InputAction::MoveLeft => app.move_sideways(false),
        InputAction::MoveRight => app.move_sideways(true),
        InputAction::Activate => app.activate_primary(),
        InputAction::SwitchTab => app.switch_tab(),
        InputAction::Digit(digit) => app.push_digit(digit),
        InputAction::Erase => app.erase_digit(),
        InputAction::NewGame => app.new_game(),
        InputAction::AddPlayer => app.add_slot(),
        InputAction::RemoveSelected => app.remove_selected(),
        InputAction::Rename => app.open_rename_prompt(),
        InputAction::EditNote => app.open_note_prompt(),
        InputAction::DeleteGame => app.delete_selected_game(),
        InputAction::FinishGame => app.finish_game(),
        InputAction::ToggleScoreboard => app.toggle_scoreboard(),
    }
}
