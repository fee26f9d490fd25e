//! Destination path derivation.
//!
//! A record lands at `<category>/<year>/<month>/<day>/<basename>`, where the
//! date is the record's capture time in the local time zone and the basename
//! comes from the record's first original path.

use crate::media_type::Category;
use chrono::{DateTime, Datelike, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the month directory is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthFormat {
    /// Zero-padded month number, `03`.
    #[default]
    Numeric,
    /// English month name, `March`.
    Name,
}

impl MonthFormat {
    fn render(&self, date: &DateTime<Local>) -> String {
        match self {
            MonthFormat::Numeric => date.format("%m").to_string(),
            MonthFormat::Name => date.format("%B").to_string(),
        }
    }
}

/// Returns the last `/`-separated segment of a stored path.
///
/// Stored paths are always slash-delimited regardless of the host, so this
/// does not go through `std::path`.
///
/// ```
/// use picman::destination::basename;
///
/// assert_eq!(basename("t.jpg"), "t.jpg");
/// assert_eq!(basename("/this/is/a/sub/t.jpg"), "t.jpg");
/// ```
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Converts a capture time in epoch milliseconds to a local date.
///
/// Returns `None` if the value is outside chrono's representable range.
pub fn capture_date(millis: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(millis).single()
}

/// Derives the destination of a record, relative to the destination root.
///
/// Returns `None` if `capture_millis` cannot be represented as a date.
///
/// ```
/// use picman::destination::{derive, MonthFormat};
/// use picman::media_type::Category;
///
/// let path = derive(Category::Picture, 0, "/a/b/c/photo.jpg", MonthFormat::Numeric).unwrap();
/// assert!(path.starts_with("picture"));
/// assert!(path.ends_with("photo.jpg"));
/// ```
pub fn derive(
    category: Category,
    capture_millis: i64,
    original_path: &str,
    month_format: MonthFormat,
) -> Option<PathBuf> {
    let date = capture_date(capture_millis)?;

    let mut path = PathBuf::from(category.dir_name());
    path.push(format!("{:04}", date.year()));
    path.push(month_format.render(&date));
    path.push(format!("{:02}", date.day()));
    path.push(basename(original_path));
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn local_millis(year: i32, month: u32, day: u32) -> i64 {
        Local
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("unambiguous local noon")
            .timestamp_millis()
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("t.jpg"), "t.jpg");
        assert_eq!(basename("/this/is/a/sub/t.jpg"), "t.jpg");
        assert_eq!(basename("relative/dir/IMG_0001.JPG"), "IMG_0001.JPG");
    }

    #[test]
    fn test_basename_does_not_split_backslashes() {
        assert_eq!(basename("C:\\photos\\t.jpg"), "C:\\photos\\t.jpg");
    }

    #[test]
    fn test_basename_trailing_slash_is_empty() {
        assert_eq!(basename("dir/"), "");
    }

    #[test]
    fn test_derive_epoch_keeps_category_and_name() {
        let path = derive(Category::Picture, 0, "/a/b/c/photo.jpg", MonthFormat::Numeric).unwrap();
        let parts: Vec<_> = path.iter().map(|p| p.to_string_lossy().into_owned()).collect();

        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], "picture");
        assert_eq!(parts[4], "photo.jpg");
    }

    #[test]
    fn test_derive_numeric_month() {
        let millis = local_millis(2020, 3, 14);
        let path = derive(Category::Picture, millis, "trip/IMG_1.jpg", MonthFormat::Numeric).unwrap();
        assert_eq!(path, Path::new("picture/2020/03/14/IMG_1.jpg"));
    }

    #[test]
    fn test_derive_zero_pads_day() {
        let millis = local_millis(2018, 11, 5);
        let path = derive(Category::Movie, millis, "clip.mp4", MonthFormat::Numeric).unwrap();
        assert_eq!(path, Path::new("movie/2018/11/05/clip.mp4"));
    }

    #[test]
    fn test_derive_month_name() {
        let millis = local_millis(2020, 3, 14);
        let path = derive(Category::Movie, millis, "a/b.mov", MonthFormat::Name).unwrap();
        assert_eq!(path, Path::new("movie/2020/March/14/b.mov"));
    }

    #[test]
    fn test_derive_out_of_range_date() {
        assert_eq!(derive(Category::Picture, i64::MAX, "a.jpg", MonthFormat::Numeric), None);
    }

    #[test]
    fn test_month_format_from_toml_value() {
        #[derive(Deserialize)]
        struct Holder {
            month_format: MonthFormat,
        }
        let holder: Holder = toml::from_str("month_format = \"name\"").unwrap();
        assert_eq!(holder.month_format, MonthFormat::Name);
    }
}
