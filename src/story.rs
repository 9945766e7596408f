//! Story parameters and the typed request sent to `generate_story/`.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_NUM_WORDS: u32 = 1;
pub const DEFAULT_READER_AGE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub gender: String,
}

/// Raw story settings as the page submits them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoryForm {
    pub genre: String,
    pub num_words: Option<u32>,
    pub num_characters: Option<u32>,
    pub reader_age: Option<u32>,
    pub language: Option<String>,
    /// Comma-separated free text
    pub character_names: String,
    /// Comma-separated free text
    pub character_genders: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryParams {
    pub genre: String,
    pub num_words: u32,
    pub num_characters: u32,
    pub reader_age: u32,
    pub language: String,
    pub character_names: Vec<String>,
    pub character_genders: Vec<String>,
}

/// Splits comma-separated text, trimming each token and dropping empty ones.
pub fn parse_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

impl StoryParams {
    /// Applies defaults and validates numbers. When the form names no
    /// characters, the session roster fills both lists, one entry per
    /// character in each.
    pub fn from_form(form: StoryForm, roster: &[Character]) -> Result<Self> {
        let mut character_names = parse_list(&form.character_names);
        let mut character_genders = parse_list(&form.character_genders);
        if character_names.is_empty() && character_genders.is_empty() {
            character_names = roster.iter().map(|c| c.name.clone()).collect();
            character_genders = roster.iter().map(|c| c.gender.clone()).collect();
        }

        let num_words = form.num_words.unwrap_or(DEFAULT_NUM_WORDS);
        if num_words == 0 {
            return Err(AppError::InvalidInput(
                "num_words must be at least 1".to_string(),
            ));
        }

        let num_characters = match form.num_characters {
            Some(0) => {
                return Err(AppError::InvalidInput(
                    "num_characters must be at least 1".to_string(),
                ))
            }
            Some(n) => n,
            None => (character_names.len() as u32).max(1),
        };

        let language = form
            .language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(Self {
            genre: form.genre.trim().to_string(),
            num_words,
            num_characters,
            reader_age: form.reader_age.unwrap_or(DEFAULT_READER_AGE),
            language,
            character_names,
            character_genders,
        })
    }
}

/// Payload for `generate_story/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRequest {
    pub params: StoryParams,
    pub image_captions: Vec<String>,
}

impl StoryRequest {
    pub fn new(params: StoryParams, image_captions: Vec<String>) -> Self {
        Self {
            params,
            image_captions,
        }
    }

    /// Urlencoded form fields. List fields repeat their key once per item.
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        let p = &self.params;
        let mut fields = vec![
            ("genre", p.genre.clone()),
            ("num_words", p.num_words.to_string()),
            ("num_characters", p.num_characters.to_string()),
            ("reader_age", p.reader_age.to_string()),
            ("language", p.language.clone()),
        ];
        fields.extend(p.character_names.iter().map(|n| ("character_names", n.clone())));
        fields.extend(
            p.character_genders
                .iter()
                .map(|g| ("character_genders", g.clone())),
        );
        fields.extend(self.image_captions.iter().map(|c| ("image_captions", c.clone())));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_drops_blanks() {
        assert_eq!(parse_list("Lola, , Max,"), vec!["Lola", "Max"]);
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ,").is_empty());
        assert_eq!(parse_list("  girl ,boy"), vec!["girl", "boy"]);
    }

    #[test]
    fn defaults_fill_unset_fields() {
        let params = StoryParams::from_form(StoryForm::default(), &[]).unwrap();
        assert_eq!(params.genre, "");
        assert_eq!(params.num_words, DEFAULT_NUM_WORDS);
        assert_eq!(params.num_characters, 1);
        assert_eq!(params.reader_age, DEFAULT_READER_AGE);
        assert_eq!(params.language, "English");

        let form = StoryForm {
            language: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(StoryParams::from_form(form, &[]).unwrap().language, "English");
    }

    #[test]
    fn character_count_follows_names_when_unset() {
        let form = StoryForm {
            character_names: "Lola, Max, Ana".into(),
            ..Default::default()
        };
        let params = StoryParams::from_form(form, &[]).unwrap();
        assert_eq!(params.num_characters, 3);
    }

    #[test]
    fn roster_used_when_form_names_nobody() {
        let roster = vec![
            Character {
                name: "Lola".into(),
                gender: "girl".into(),
            },
            Character {
                name: "Max".into(),
                gender: "boy".into(),
            },
        ];
        let params = StoryParams::from_form(StoryForm::default(), &roster).unwrap();
        assert_eq!(params.character_names, vec!["Lola", "Max"]);
        assert_eq!(params.character_genders, vec!["girl", "boy"]);
        assert_eq!(params.num_characters, 2);

        let form = StoryForm {
            character_names: "Zed".into(),
            ..Default::default()
        };
        let params = StoryParams::from_form(form, &roster).unwrap();
        assert_eq!(params.character_names, vec!["Zed"]);
        assert!(params.character_genders.is_empty());
    }

    #[test]
    fn zero_counts_rejected() {
        let form = StoryForm {
            num_words: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            StoryParams::from_form(form, &[]),
            Err(AppError::InvalidInput(_))
        ));

        let form = StoryForm {
            num_characters: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            StoryParams::from_form(form, &[]),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn form_repeats_list_fields() {
        let form = StoryForm {
            genre: "adventure".into(),
            num_words: Some(300),
            reader_age: Some(6),
            character_names: "Lola, Max".into(),
            character_genders: "girl, boy".into(),
            ..Default::default()
        };
        let params = StoryParams::from_form(form, &[]).unwrap();
        let request = StoryRequest::new(params, vec!["a dog running".into(), "a park".into()]);
        let fields = request.to_form();

        assert_eq!(fields[0], ("genre", "adventure".to_string()));
        assert!(fields.contains(&("num_words", "300".to_string())));
        assert!(fields.contains(&("num_characters", "2".to_string())));
        assert!(fields.contains(&("reader_age", "6".to_string())));
        assert!(fields.contains(&("language", "English".to_string())));

        let captions: Vec<_> = fields
            .iter()
            .filter(|(k, _)| *k == "image_captions")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(captions, vec!["a dog running", "a park"]);

        let names = fields.iter().filter(|(k, _)| *k == "character_names").count();
        assert_eq!(names, 2);
    }
}
