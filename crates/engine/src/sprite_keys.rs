use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteKeyError {
    #[error("sprite id must not be empty")]
    Empty,
    #[error("sprite id must be relative")]
    Absolute,
    #[error("sprite id must not contain '..'")]
    ParentTraversal,
    #[error("sprite id contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

/// Sprite ids are `/`-separated relative paths without extension, e.g.
/// `player/player_FW1`.
pub(crate) fn validate_sprite_key(key: &str) -> Result<(), SpriteKeyError> {
    if key.is_empty() {
        return Err(SpriteKeyError::Empty);
    }
    if key.starts_with('/') {
        return Err(SpriteKeyError::Absolute);
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(SpriteKeyError::ParentTraversal);
    }
    match key
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '_' | '/' | '-')))
    {
        Some(character) => Err(SpriteKeyError::InvalidCharacter { character }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_sprite_ids_used_by_scenes() {
        for key in ["player/player_F", "player/player_BW2", "creatures/bulbasaur", "a-b/c_d"] {
            assert!(validate_sprite_key(key).is_ok(), "key={key}");
        }
    }

    #[test]
    fn rejects_paths_that_escape_the_sprite_root() {
        assert_eq!(validate_sprite_key(""), Err(SpriteKeyError::Empty));
        assert_eq!(validate_sprite_key("/etc"), Err(SpriteKeyError::Absolute));
        assert_eq!(
            validate_sprite_key("a/../b"),
            Err(SpriteKeyError::ParentTraversal)
        );
        assert_eq!(
            validate_sprite_key("a.png"),
            Err(SpriteKeyError::InvalidCharacter { character: '.' })
        );
        assert!(validate_sprite_key(r"a\b").is_err());
    }
}
