use once_cell::sync::Lazy;
use regex::Regex;

static ROOM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_:-]+$").expect("Invalid room name regex"));

pub fn validate_room_name(room: &str) -> Result<(), &'static str> {
    // 房间名长度校验：1 <= x <= 64
    if room.is_empty() || room.len() > 64 {
        return Err("Room name length must be between 1 and 64 characters");
    }
    // 房间名格式校验：只能包含字母、数字、下划线、冒号或连字符
    if !ROOM_RE.is_match(room) {
        return Err("Room name must contain only letters, numbers, underscores, colons or hyphens");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_room_names() {
        assert!(validate_room_name("user_42").is_ok());
        assert!(validate_room_name("class:7-b").is_ok());
        assert!(validate_room_name("a").is_ok());
        assert!(validate_room_name(&"r".repeat(64)).is_ok());
    }

    #[test]
    fn test_invalid_room_names() {
        assert!(validate_room_name("").is_err());
        assert!(validate_room_name(&"r".repeat(65)).is_err());
        assert!(validate_room_name("with space").is_err());
        assert!(validate_room_name("room/1").is_err());
        assert!(validate_room_name("房间").is_err());
    }
}
