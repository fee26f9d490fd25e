/// Media type classification by file extension.
///
/// Every record in the library is filed under one of two coarse categories,
/// `picture` or `movie`. The mapping is a plain extension table; nothing
/// inspects file contents.
///
/// # Examples
///
/// ```
/// use picman::media_type::{Category, TypeMapper};
///
/// let mapper = TypeMapper::default();
/// assert_eq!(mapper.classify("JPG"), Some(Category::Picture));
/// assert_eq!(mapper.classify("mp4"), Some(Category::Movie));
/// assert_eq!(mapper.classify("xyz"), None);
/// ```
use std::collections::HashMap;
use std::fmt;

/// Coarse media category a record is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Still images (JPG, PNG, GIF, ...)
    Picture,
    /// Video clips (MP4, MOV, AVI, ...)
    Movie,
}

impl Category {
    /// Returns the top-level directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use picman::media_type::Category;
    ///
    /// assert_eq!(Category::Picture.dir_name(), "picture");
    /// assert_eq!(Category::Movie.dir_name(), "movie");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Picture => "picture",
            Category::Movie => "movie",
        }
    }

    /// Returns a human-readable description of this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Picture => "Pictures",
            Category::Movie => "Movies",
        }
    }

    /// Parses a category name as written in configuration files.
    ///
    /// Accepts the directory names plus the short forms `pic` and `mov`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "picture" | "pic" => Some(Category::Picture),
            "movie" | "mov" => Some(Category::Movie),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Maps file extensions to categories.
///
/// Built once at startup and handed by reference to validation and copy
/// code; lookups never mutate it.
#[derive(Debug, Clone)]
pub struct TypeMapper {
    extension_map: HashMap<String, Category>,
}

impl TypeMapper {
    /// Creates a `TypeMapper` with the standard extension table.
    pub fn new() -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        mapper.populate_standard_mappings();
        mapper
    }

    /// Creates a `TypeMapper` with the standard table plus `extra` mappings.
    ///
    /// Entries in `extra` only add extensions; a standard extension keeps
    /// its standard category.
    pub fn with_extra<'a, I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Category)>,
    {
        let mut mapper = Self::new();
        for (ext, category) in extra {
            mapper
                .extension_map
                .entry(ext.to_lowercase())
                .or_insert(category);
        }
        mapper
    }

    fn populate_standard_mappings(&mut self) {
        // Pictures
        self.add_extension_mapping("jpg", Category::Picture);
        self.add_extension_mapping("jpeg", Category::Picture);
        self.add_extension_mapping("png", Category::Picture);
        self.add_extension_mapping("gif", Category::Picture);
        self.add_extension_mapping("bmp", Category::Picture);

        // Movies
        self.add_extension_mapping("mp4", Category::Movie);
        self.add_extension_mapping("m4v", Category::Movie);
        self.add_extension_mapping("mov", Category::Movie);
        self.add_extension_mapping("avi", Category::Movie);
        self.add_extension_mapping("mpg", Category::Movie);

        // NOTE: cr2 is Canon RAW, a still format, but existing libraries were
        // organized with it under movie. Keep it there until that is confirmed.
        self.add_extension_mapping("cr2", Category::Movie);
    }

    fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        self.extension_map.insert(ext.to_lowercase(), category);
    }

    /// Maps a file extension to a category, ignoring case.
    ///
    /// Returns `None` for extensions outside the table.
    pub fn classify(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }

    /// Returns true if `ext` is in the standard table, ignoring case.
    pub fn is_standard(ext: &str) -> bool {
        Self::new().classify(ext).is_some()
    }

    /// Number of known extensions.
    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Picture.dir_name(), "picture");
        assert_eq!(Category::Movie.dir_name(), "movie");
        assert_eq!(Category::Movie.to_string(), "movie");
    }

    #[test]
    fn test_classify_pictures() {
        let mapper = TypeMapper::default();
        for ext in ["jpg", "jpeg", "png", "gif", "bmp"] {
            assert_eq!(mapper.classify(ext), Some(Category::Picture), "{}", ext);
        }
    }

    #[test]
    fn test_classify_movies() {
        let mapper = TypeMapper::default();
        for ext in ["mp4", "m4v", "mov", "avi", "mpg"] {
            assert_eq!(mapper.classify(ext), Some(Category::Movie), "{}", ext);
        }
    }

    #[test]
    fn test_cr2_is_filed_as_movie() {
        let mapper = TypeMapper::default();
        assert_eq!(mapper.classify("cr2"), Some(Category::Movie));
        assert_eq!(mapper.classify("CR2"), Some(Category::Movie));
    }

    #[test]
    fn test_classify_case_insensitive() {
        let mapper = TypeMapper::default();
        assert_eq!(mapper.classify("JPG"), Some(Category::Picture));
        assert_eq!(mapper.classify("jPG"), Some(Category::Picture));
        assert_eq!(mapper.classify("jpg"), mapper.classify("JPG"));
        assert_eq!(mapper.classify("Mp4"), Some(Category::Movie));
    }

    #[test]
    fn test_classify_unknown() {
        let mapper = TypeMapper::default();
        assert_eq!(mapper.classify("xyz"), None);
        assert_eq!(mapper.classify("txt"), None);
        assert_eq!(mapper.classify(""), None);
        assert_eq!(mapper.classify(".jpg"), None);
    }

    #[test]
    fn test_with_extra_mappings() {
        let mapper = TypeMapper::with_extra([("HEIC", Category::Picture), ("cr2", Category::Picture)]);

        assert_eq!(mapper.classify("heic"), Some(Category::Picture));
        assert_eq!(mapper.classify("cr2"), Some(Category::Movie));
        assert_eq!(mapper.classify("jpg"), Some(Category::Picture));
        assert_eq!(mapper.len(), TypeMapper::default().len() + 1);
    }

    #[test]
    fn test_is_standard() {
        assert!(TypeMapper::is_standard("CR2"));
        assert!(TypeMapper::is_standard("mpg"));
        assert!(!TypeMapper::is_standard("heic"));
    }

    #[test]
    fn test_category_from_name() {
        assert_eq!(Category::from_name("picture"), Some(Category::Picture));
        assert_eq!(Category::from_name("PIC"), Some(Category::Picture));
        assert_eq!(Category::from_name("movie"), Some(Category::Movie));
        assert_eq!(Category::from_name("mov"), Some(Category::Movie));
        assert_eq!(Category::from_name("audio"), None);
    }
}
