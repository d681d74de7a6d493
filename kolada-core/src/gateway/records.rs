//! Catalog rows and data pages as delivered by a [`super::Gateway`].

/// One entry of the area catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaRecord {
    /// Area code, e.g. `"0180"`.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Raw area-type code as reported by the catalog (`"K"`, `"L"`, ...).
    pub area_type: String,
}

impl AreaRecord {
    /// Construct a record from its parts.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        area_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            area_type: area_type.into(),
        }
    }
}

/// One entry of the area-group catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaGroupRecord {
    /// Group code.
    pub id: String,
    /// Display title, used to classify the group.
    pub title: String,
}

impl AreaGroupRecord {
    /// Construct a record from its parts.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Continuation state attached to a page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Another page is available at the given reference.
    HasNext(String),
    /// The sequence is exhausted.
    #[default]
    Done,
}

impl Cursor {
    /// Interpret an optional continuation reference.
    ///
    /// A missing or blank reference terminates the sequence.
    ///
    /// # Examples
    /// ```
    /// use kolada_core::Cursor;
    ///
    /// assert_eq!(Cursor::from_next(None), Cursor::Done);
    /// assert_eq!(Cursor::from_next(Some(String::new())), Cursor::Done);
    /// assert_eq!(
    ///     Cursor::from_next(Some("http://example.test/p2".into())),
    ///     Cursor::HasNext("http://example.test/p2".into())
    /// );
    /// ```
    #[must_use]
    pub fn from_next(next: Option<String>) -> Self {
        match next {
            Some(reference) if !reference.trim().is_empty() => Self::HasNext(reference),
            _ => Self::Done,
        }
    }

    /// Whether more pages follow.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        matches!(self, Self::HasNext(_))
    }
}

/// A single observation nested inside a [`DataRow`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowValue {
    /// Observed value; `None` when the source reports no value.
    pub value: Option<f64>,
    /// Gender breakdown code (`"T"`, `"K"`, `"M"`).
    pub gender: String,
    /// Status flag reported alongside the value.
    pub status: String,
}

/// One row of a data page: an area and period with its nested observations.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    /// Area code the row belongs to.
    pub area: String,
    /// Period the row belongs to.
    pub period: String,
    /// Per-gender/status observations, in server order.
    pub values: Vec<RowValue>,
}

/// One page of observation data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataPage {
    /// Rows in server order.
    pub rows: Vec<DataRow>,
    /// Where the next page lives, if anywhere.
    pub cursor: Cursor,
}
