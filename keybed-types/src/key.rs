use serde::{Deserialize, Serialize};

/// Number of keys on the instrument: one chromatic octave plus the closing C.
pub const KEY_COUNT: usize = 13;

/// Index of the key tuned to the reference pitch (A above the first C).
pub const REFERENCE_INDEX: u8 = 9;

const KEY_NAMES: [&str; KEY_COUNT] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B", "C",
];

/// One of the 13 semitone positions on the keyboard.
///
/// Index 0 sits nine semitones below the reference pitch, so with A4 = 440 Hz
/// the keyboard spans C4..=C5. A `Key` can only be built from a valid index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Key(u8);

impl Key {
    /// All keys, lowest first.
    pub const ALL: [Key; KEY_COUNT] = [
        Key(0), Key(1), Key(2), Key(3), Key(4), Key(5), Key(6),
        Key(7), Key(8), Key(9), Key(10), Key(11), Key(12),
    ];

    pub fn new(index: u8) -> Option<Self> {
        if (index as usize) < KEY_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Pitch class name, e.g. "C#".
    pub fn name(self) -> &'static str {
        KEY_NAMES[self.0 as usize]
    }

    /// Whether this is a sharp (black) key.
    pub fn is_sharp(self) -> bool {
        self.name().ends_with('#')
    }

    pub fn all() -> impl Iterator<Item = Key> {
        Key::ALL.into_iter()
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A key index outside `0..KEY_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyIndexError(pub u8);

impl std::fmt::Display for KeyIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "key index {} out of range 0..{}", self.0, KEY_COUNT)
    }
}

impl std::error::Error for KeyIndexError {}

impl TryFrom<u8> for Key {
    type Error = KeyIndexError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Key::new(index).ok_or(KeyIndexError(index))
    }
}

impl From<Key> for u8 {
    fn from(key: Key) -> u8 {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_has_13_keys() {
        assert_eq!(Key::all().count(), KEY_COUNT);
        for (i, key) in Key::ALL.iter().enumerate() {
            assert_eq!(key.index() as usize, i);
        }
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(Key::new(12).is_some());
        assert!(Key::new(13).is_none());
        assert_eq!(Key::try_from(200), Err(KeyIndexError(200)));
    }

    #[test]
    fn names_follow_chromatic_scale() {
        let names: Vec<&str> = Key::all().map(Key::name).collect();
        assert_eq!(names[0], "C");
        assert_eq!(names[1], "C#");
        assert_eq!(names[REFERENCE_INDEX as usize], "A");
        assert_eq!(names[12], "C");
    }

    #[test]
    fn sharps_are_black_keys() {
        let sharps: Vec<u8> = Key::all().filter(|k| k.is_sharp()).map(Key::index).collect();
        assert_eq!(sharps, vec![1, 3, 6, 8, 10]);
    }

    #[test]
    fn serde_rejects_invalid_index() {
        let key: Key = deserialize_index("4").unwrap();
        assert_eq!(key.index(), 4);
        assert!(deserialize_index("13").is_err());
    }

    // Drives the serde impl through a bare u8 deserializer.
    fn deserialize_index(s: &str) -> Result<Key, String> {
        use serde::de::value::{Error, U8Deserializer};
        use serde::de::IntoDeserializer;
        let n: u8 = s.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
        let de: U8Deserializer<Error> = n.into_deserializer();
        Key::deserialize(de).map_err(|e| e.to_string())
    }
}
