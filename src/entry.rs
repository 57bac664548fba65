use serde::{Deserialize, Serialize};

/// One element of the dictionary API's response array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phonetic {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
}

impl DictionaryEntry {
    /// Parse a response body and keep the first entry, which is the one displayed
    pub fn first_from_slice(body: &[u8]) -> serde_json::Result<Option<Self>> {
        let entries: Vec<DictionaryEntry> = serde_json::from_slice(body)?;
        Ok(entries.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::HELLO_ENTRY;

    #[test]
    fn test_parse_first_entry() {
        let entry = DictionaryEntry::first_from_slice(HELLO_ENTRY.as_bytes())
            .unwrap()
            .unwrap();

        assert_eq!(entry.word, "hello");
        assert_eq!(entry.phonetic.as_deref(), Some("/həˈloʊ/"));
        assert_eq!(entry.meanings[0].part_of_speech, "exclamation");
        assert_eq!(entry.meanings[0].definitions[0].definition, "used as a greeting");
        assert_eq!(entry.meanings[0].synonyms, vec!["hi", "greetings"]);
    }

    #[test]
    fn test_parse_sparse_entry() {
        let body = br#"[{"word":"x","meanings":[{"partOfSpeech":"noun","definitions":[]}]},{"word":"y"}]"#;
        let entry = DictionaryEntry::first_from_slice(body).unwrap().unwrap();

        assert_eq!(entry.word, "x");
        assert!(entry.phonetic.is_none());
        assert!(entry.phonetics.is_empty());
        assert!(entry.meanings[0].synonyms.is_empty());
    }

    #[test]
    fn test_parse_empty_and_invalid() {
        assert!(DictionaryEntry::first_from_slice(b"[]").unwrap().is_none());
        assert!(DictionaryEntry::first_from_slice(b"not json").is_err());
        assert!(DictionaryEntry::first_from_slice(br#"{"message":"x"}"#).is_err());
    }
}
