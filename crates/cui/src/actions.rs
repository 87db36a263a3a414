use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::NextFocus => app.cycle_focus(true),
        InputAction::PrevFocus => app.cycle_focus(false),
        InputAction::MoveUp => app.move_cursor(false),
        InputAction::MoveDown => app.move_cursor(true),
        InputAction::Cancel => app.dismiss(),
        InputAction::EditRoster => app.start_roster_edit(),
        InputAction::EditCount => app.open_count_prompt(),
        InputAction::IncreaseCount => app.adjust_count(1),
        InputAction::DecreaseCount => app.adjust_count(-1),
        InputAction::ToggleDedupe => app.toggle_dedupe(),
        InputAction::Draw => app.start_draw(),
        InputAction::CopyResult => app.copy_result(),
        InputAction::Reset => app.request_reset(),
        InputAction::NextPreset => app.cycle_preset(true),
        InputAction::LoadPreset => app.load_selected_preset(),
    }
}
