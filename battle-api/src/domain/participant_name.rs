use unicode_segmentation::UnicodeSegmentation;

/// A participant name as typed into a request, checked before any lookup.
#[derive(Debug)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn parse(s: String) -> Result<Self, String> {
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let s = s.trim().to_owned();

        if s.is_empty() {
            Err("Participant name has no non-whitespace characters.".to_owned())
        } else if s.graphemes(true).count() > 64 {
            Err(format!("Participant name {} is too long.", s))
        } else if s.chars().any(|g| forbidden_characters.contains(&g)) {
            Err(format!("Participant name {} contains forbidden characters.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for ParticipantName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
