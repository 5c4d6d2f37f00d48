use camino::Utf8Path;
use rustc_hash::FxHashSet;

/// A registered language and the file-name suffixes it recognizes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
    id: String,
    extensions: Vec<String>,
}

impl Language {
    pub fn new<I, S>(id: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: id.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Recognized suffixes, each with a leading `.`.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

/// Languages known to the host, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl LanguageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a language, replacing any previous one with the same id.
    pub fn register(&mut self, language: Language) {
        if let Some(existing) = self
            .languages
            .iter_mut()
            .find(|existing| existing.id == language.id)
        {
            *existing = language;
        } else {
            self.languages.push(language);
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Language> {
        self.languages.iter().find(|language| language.id == id)
    }

    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Union of the suffixes of every registered language.
    #[must_use]
    pub fn file_extensions(&self) -> FileExtensionSet {
        self.languages
            .iter()
            .flat_map(|language| language.extensions.iter())
            .collect()
    }
}

impl FromIterator<Language> for LanguageRegistry {
    fn from_iter<T: IntoIterator<Item = Language>>(iter: T) -> Self {
        let mut registry = Self::new();
        for language in iter {
            registry.register(language);
        }
        registry
    }
}

/// Set of recognized file-name suffixes.
///
/// Suffixes are stored with a leading `.`; lookups accept either form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileExtensionSet(FxHashSet<String>);

impl FileExtensionSet {
    #[must_use]
    pub fn contains(&self, extension: &str) -> bool {
        if extension.starts_with('.') {
            self.0.contains(extension)
        } else {
            self.0.contains(&normalize_extension(extension))
        }
    }

    /// Whether `file_name`'s final suffix is recognized.
    ///
    /// A leading dot does not start a suffix, so `.lang` on its own never matches.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        Utf8Path::new(file_name)
            .extension()
            .is_some_and(|extension| self.contains(extension))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for FileExtensionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        )
    }
}

fn normalize_extension(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions_are_normalized() {
        let language = Language::new("lang", ["lang", ".langx"]);
        assert_eq!(language.extensions(), &[".lang", ".langx"]);
    }

    #[test]
    fn test_union_across_languages() {
        let registry: LanguageRegistry = [
            Language::new("a", [".a", ".shared"]),
            Language::new("b", [".b", ".shared"]),
        ]
        .into_iter()
        .collect();

        let extensions = registry.file_extensions();
        assert_eq!(extensions.len(), 3);
        assert!(extensions.contains(".a"));
        assert!(extensions.contains("b"));
        assert!(extensions.contains(".shared"));
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = LanguageRegistry::new();
        registry.register(Language::new("lang", [".old"]));
        registry.register(Language::new("lang", [".new"]));

        assert_eq!(registry.languages().len(), 1);
        assert_eq!(registry.get("lang").unwrap().extensions(), &[".new"]);
        assert!(!registry.file_extensions().contains(".old"));
    }

    #[test]
    fn test_language_without_extensions() {
        let registry: LanguageRegistry = [Language::new("empty", Vec::<String>::new())]
            .into_iter()
            .collect();
        assert!(registry.file_extensions().is_empty());
    }

    #[test]
    fn test_matches_final_suffix() {
        let extensions: FileExtensionSet = [".lang"].into_iter().collect();
        assert!(extensions.matches("a.lang"));
        assert!(extensions.matches("a.test.lang"));
        assert!(!extensions.matches("a.lang.bak"));
        assert!(!extensions.matches("b.txt"));
        assert!(!extensions.matches("lang"));
        assert!(!extensions.matches(".lang"));
    }
}
