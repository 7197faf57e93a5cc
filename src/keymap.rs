//! Key bindings for the listing page and the saved-entries lists.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::Disposition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Next,
    Previous,
    OpenStory(Disposition),
    OpenDiscussion(Disposition),
    Save,
    ShowSaved,
    Reload,
    Back,
    Forward,
    Prompt,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Next,
    Previous,
    Open,
    Delete,
    Close,
    CancelDelete,
}

/// Edits for a single-line text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
}

fn disposition(modifiers: KeyModifiers) -> Disposition {
    if modifiers.contains(KeyModifiers::SHIFT) {
        Disposition::NewTab
    } else {
        Disposition::CurrentTab
    }
}

fn is_command(modifiers: KeyModifiers) -> bool {
    modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META)
}

pub fn page_action(key: &KeyEvent) -> Option<PageAction> {
    let modifiers = key.modifiers;

    if is_command(modifiers) {
        return match key.code {
            KeyCode::Char('k') | KeyCode::Char('K') => Some(PageAction::ShowSaved),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(PageAction::Quit)
            }
            _ => None,
        };
    }

    if modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Left => Some(PageAction::Back),
            KeyCode::Right => Some(PageAction::Forward),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(PageAction::Next),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(PageAction::Previous),
        KeyCode::Enter | KeyCode::Char('o') | KeyCode::Char('O') => {
            Some(PageAction::OpenStory(disposition(modifiers)))
        }
        KeyCode::Char('c') | KeyCode::Char('C') => {
            Some(PageAction::OpenDiscussion(disposition(modifiers)))
        }
        KeyCode::Char('s') | KeyCode::Char('S') if modifiers.contains(KeyModifiers::SHIFT) => {
            Some(PageAction::Save)
        }
        KeyCode::Char('r') => Some(PageAction::Reload),
        KeyCode::Char('[') => Some(PageAction::Back),
        KeyCode::Char(']') => Some(PageAction::Forward),
        KeyCode::Char(':') => Some(PageAction::Prompt),
        KeyCode::Char('?') => Some(PageAction::Help),
        KeyCode::Char('q') => Some(PageAction::Quit),
        _ => None,
    }
}

/// Keys in the saved-entries modal and popup. While a delete is being
/// confirmed only the delete and escape keys do anything.
pub fn list_action(key: &KeyEvent, confirming: bool) -> Option<ListAction> {
    if confirming {
        return match key.code {
            KeyCode::Delete | KeyCode::Backspace => Some(ListAction::Delete),
            KeyCode::Esc => Some(ListAction::CancelDelete),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(ListAction::Next),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(ListAction::Previous),
        KeyCode::Enter => Some(ListAction::Open),
        KeyCode::Delete | KeyCode::Backspace => Some(ListAction::Delete),
        KeyCode::Esc => Some(ListAction::Close),
        _ => None,
    }
}

/// Every key goes to the text input while it has focus.
pub fn input_action(key: &KeyEvent) -> Option<InputAction> {
    match key.code {
        KeyCode::Enter => Some(InputAction::Submit),
        KeyCode::Esc => Some(InputAction::Cancel),
        KeyCode::Backspace => Some(InputAction::Backspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputAction::Insert(c))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn shift(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::SHIFT)
    }

    #[test]
    fn test_page_navigation_keys() {
        for code in [KeyCode::Down, KeyCode::Char('j'), KeyCode::Char('J')] {
            assert_eq!(page_action(&key(code)), Some(PageAction::Next));
        }
        for code in [KeyCode::Up, KeyCode::Char('k'), KeyCode::Char('K')] {
            assert_eq!(page_action(&key(code)), Some(PageAction::Previous));
        }
        assert_eq!(page_action(&shift(KeyCode::Char('J'))), Some(PageAction::Next));
    }

    #[test]
    fn test_page_open_keys() {
        let current = Some(PageAction::OpenStory(Disposition::CurrentTab));
        let new_tab = Some(PageAction::OpenStory(Disposition::NewTab));
        assert_eq!(page_action(&key(KeyCode::Enter)), current);
        assert_eq!(page_action(&shift(KeyCode::Enter)), new_tab);
        assert_eq!(page_action(&key(KeyCode::Char('o'))), current);
        assert_eq!(page_action(&shift(KeyCode::Char('O'))), new_tab);
    }

    #[test]
    fn test_save_requires_shift() {
        assert_eq!(page_action(&shift(KeyCode::Char('S'))), Some(PageAction::Save));
        assert_eq!(page_action(&key(KeyCode::Char('s'))), None);
        assert_eq!(page_action(&key(KeyCode::Char('S'))), None);
    }

    #[test]
    fn test_command_k_opens_saved_overlay() {
        let ctrl = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        let cmd = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::SUPER);
        assert_eq!(page_action(&ctrl), Some(PageAction::ShowSaved));
        assert_eq!(page_action(&cmd), Some(PageAction::ShowSaved));
    }

    #[test]
    fn test_discussion_keys() {
        assert_eq!(
            page_action(&key(KeyCode::Char('c'))),
            Some(PageAction::OpenDiscussion(Disposition::CurrentTab))
        );
        assert_eq!(
            page_action(&shift(KeyCode::Char('C'))),
            Some(PageAction::OpenDiscussion(Disposition::NewTab))
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(page_action(&ctrl_c), Some(PageAction::Quit));
    }

    #[test]
    fn test_list_keys() {
        assert_eq!(list_action(&key(KeyCode::Char('j')), false), Some(ListAction::Next));
        assert_eq!(list_action(&key(KeyCode::Up), false), Some(ListAction::Previous));
        assert_eq!(list_action(&key(KeyCode::Enter), false), Some(ListAction::Open));
        assert_eq!(list_action(&key(KeyCode::Backspace), false), Some(ListAction::Delete));
        assert_eq!(list_action(&key(KeyCode::Delete), false), Some(ListAction::Delete));
        assert_eq!(list_action(&key(KeyCode::Esc), false), Some(ListAction::Close));
    }

    #[test]
    fn test_confirming_only_accepts_delete_and_escape() {
        assert_eq!(list_action(&key(KeyCode::Delete), true), Some(ListAction::Delete));
        assert_eq!(list_action(&key(KeyCode::Esc), true), Some(ListAction::CancelDelete));
        assert_eq!(list_action(&key(KeyCode::Char('j')), true), None);
        assert_eq!(list_action(&key(KeyCode::Enter), true), None);
    }

    #[test]
    fn test_input_swallows_bound_keys() {
        assert_eq!(input_action(&key(KeyCode::Char('j'))), Some(InputAction::Insert('j')));
        assert_eq!(input_action(&shift(KeyCode::Char('S'))), Some(InputAction::Insert('S')));
        assert_eq!(input_action(&key(KeyCode::Enter)), Some(InputAction::Submit));
        assert_eq!(input_action(&key(KeyCode::Esc)), Some(InputAction::Cancel));
        assert_eq!(input_action(&key(KeyCode::Backspace)), Some(InputAction::Backspace));
    }
}
