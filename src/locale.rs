use crate::catalog::LocalizedText;
use crate::error::ManifestError;

/// Returns the content of the first label matching the requested language.
///
/// Every localized field the normalizer reads is expected to carry an entry
/// for the target language; a miss is a catalog data-quality problem and is
/// surfaced as an error rather than papered over.
pub fn select_lang<'a>(
    labels: &'a [LocalizedText],
    language: &str,
) -> Result<&'a str, ManifestError> {
    labels
        .iter()
        .find(|label| label.lang == language)
        .map(|label| label.content.as_str())
        .ok_or_else(|| ManifestError::LabelNotFound {
            language: language.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn label(lang: &str, content: &str) -> LocalizedText {
        LocalizedText {
            lang: lang.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn first_matching_language_wins() {
        let labels = vec![
            label("en", "Income"),
            label("fr", "Revenus"),
            label("fr", "Revenus (bis)"),
        ];
        assert_eq!(select_lang(&labels, "fr").unwrap(), "Revenus");
    }

    #[test]
    fn missing_language_is_an_error() {
        let labels = vec![label("en", "Income")];
        let err = select_lang(&labels, "fr").unwrap_err();
        assert_matches!(err, ManifestError::LabelNotFound { language } if language == "fr");
    }

    #[test]
    fn empty_list_is_an_error() {
        let err = select_lang(&[], "fr").unwrap_err();
        assert_matches!(err, ManifestError::LabelNotFound { .. });
    }
}
