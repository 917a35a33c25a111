/// What the user asked for on one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Send(String),
    Reset,
    Quit,
}

pub fn parse(line: &str) -> Option<InputAction> {
    match line.trim() {
        "" => None,
        "/reset" | "/new" => Some(InputAction::Reset),
        "/quit" | "/exit" => Some(InputAction::Quit),
        _ => Some(InputAction::Send(line.to_string())),
    }
}
