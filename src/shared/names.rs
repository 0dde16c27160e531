use crate::game::constants::MAX_ROOM_NAME_LENGTH;

/// Trims and truncates a requested room name. Blank names are refused.
pub fn sanitize_room_name(name: &str) -> Option<String> {
    let cleaned = name.trim();
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.chars().take(MAX_ROOM_NAME_LENGTH).collect())
}
