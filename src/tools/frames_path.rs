use std::fmt;
use std::path::Path;

/// 取代名稱中 `/` 的字元（U+2215 DIVISION SLASH）
const SEPARATOR_SUBSTITUTE: char = '\u{2215}';

/// 影片快取子目錄名稱：`$Artistname/$Videoname`
///
/// 兩段名稱中的 `/` 都會被換成 `∕`，所以永遠只有兩層目錄。
/// 已知限制：原本就含有 `∕` 的名稱會與含 `/` 的名稱對應到同一個目錄。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FramesDirectory(String);

impl FramesDirectory {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 拆回（藝人, 影片）兩段
    #[must_use]
    pub fn segments(&self) -> (&str, &str) {
        self.0
            .split_once('/')
            .unwrap_or((self.0.as_str(), ""))
    }

    /// 由資料庫中儲存的字串還原，不做任何替換
    #[must_use]
    pub fn from_stored(stored: impl Into<String>) -> Self {
        Self(stored.into())
    }
}

impl fmt::Display for FramesDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for FramesDirectory {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

fn escape_segment(name: &str) -> String {
    name.replace('/', &SEPARATOR_SUBSTITUTE.to_string())
}

#[must_use]
pub fn frames_directory_name(artist_name: &str, video_name: &str) -> FramesDirectory {
    FramesDirectory(format!(
        "{}/{}",
        escape_segment(artist_name),
        escape_segment(video_name)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names() {
        let dir = frames_directory_name("Rammstein", "Sonne");
        assert_eq!(dir.as_str(), "Rammstein/Sonne");
        assert_eq!(dir.segments(), ("Rammstein", "Sonne"));
    }

    #[test]
    fn test_separator_in_video_name() {
        let dir = frames_directory_name("Tribute Band", "AC/DC Tribute");
        assert_eq!(dir.as_str(), "Tribute Band/AC\u{2215}DC Tribute");
        assert_eq!(dir.segments().1, "AC∕DC Tribute");
    }

    #[test]
    fn test_always_two_segments() {
        let cases = [
            ("", ""),
            ("/", "/"),
            ("a/b/c", "//x//"),
            ("AC/DC", "Back/In/Black"),
            ("../..", "../etc"),
        ];

        for (artist, video) in cases {
            let dir = frames_directory_name(artist, video);
            assert_eq!(
                dir.as_str().matches('/').count(),
                1,
                "{artist:?}/{video:?} -> {dir}"
            );
            assert!(Path::new(dir.as_str()).components().count() <= 2);
        }
    }

    #[test]
    fn test_distinct_inputs_do_not_collide() {
        let a = frames_directory_name("A/B", "C");
        let b = frames_directory_name("A", "B/C");
        assert_ne!(a, b);
    }

    #[test]
    fn test_substitute_collision_is_documented_limitation() {
        let slash = frames_directory_name("AC/DC", "Thunderstruck");
        let division = frames_directory_name("AC∕DC", "Thunderstruck");
        assert_eq!(slash, division);
    }
}
